use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn smtl(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_smtl"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn smtl")
}

fn run_fixture(name: &str, extra: &[&str]) -> Output {
    let path = fixture(name);
    let path = path.to_str().expect("fixture path must be UTF-8");
    let mut args = vec![path];
    args.extend_from_slice(extra);
    smtl(&args)
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn z3_available() -> bool {
    match smtl_solve::SolverConfig::auto_detect() {
        Ok(_) => true,
        Err(err) => {
            eprintln!("skipping: {err}");
            false
        }
    }
}

#[test]
fn missing_argument_is_usage_error() {
    let out = smtl(&[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("Usage"), "stderr: {}", stderr(&out));
}

#[test]
fn unreadable_file_exits_2() {
    let out = smtl(&["/definitely/not/here.smtl"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("cannot read"));
}

#[test]
fn compile_errors_exit_2_with_diagnostic() {
    let out = run_fixture("duplicate.smtl", &[]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("smtl::duplicate_declaration"), "stderr: {}", stderr(&out));

    let out = run_fixture("unknown_variable.smtl", &[]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("smtl::unknown_variable"), "stderr: {}", stderr(&out));
}

#[test]
fn syntax_errors_exit_2() {
    let out = run_fixture("syntax_error.smtl", &[]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("smtl::parse"), "stderr: {}", stderr(&out));
}

#[test]
fn emit_smt2_prints_query_without_solving() {
    let out = run_fixture("two_equations.smtl", &["--emit-smt2", "--solver-path", "/no/such/z3"]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(
        stdout(&out),
        "(set-logic QF_LIA)\n\
         (declare-const x Int)\n\
         (declare-const y Int)\n\
         (assert (= (+ x y) 24))\n\
         (assert (= (- x y) 2))\n\
         (check-sat)\n\
         (get-value (x y))\n"
    );
}

#[test]
fn missing_solver_exits_4() {
    let out = run_fixture("two_equations.smtl", &["--solver-path", "/no/such/z3"]);
    assert_eq!(out.status.code(), Some(4));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("smtl::solver::not_found"), "stderr: {}", stderr(&out));
}

// A stand-in solver that records its argv and answers `unsat`.
#[cfg(unix)]
#[test]
fn solver_args_reach_the_subprocess() {
    use std::os::unix::fs::PermissionsExt;

    let dir = std::env::temp_dir().join(format!("smtl-solver-arg-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let solver = dir.join("fake-z3");
    let argv = dir.join("argv");
    std::fs::write(
        &solver,
        format!("#!/bin/sh\nprintf '%s ' \"$@\" > '{}'\ncat > /dev/null\necho unsat\n", argv.display()),
    )
    .expect("write fake solver");
    std::fs::set_permissions(&solver, std::fs::Permissions::from_mode(0o755)).expect("chmod");

    let solver_path = solver.to_str().expect("temp path must be UTF-8");
    let out = run_fixture(
        "two_equations.smtl",
        &[
            "--solver-path",
            solver_path,
            "--timeout-ms",
            "500",
            "--solver-arg",
            "smt.random_seed=7",
            "--solver-arg",
            "-v:0",
        ],
    );
    assert_eq!(out.status.code(), Some(3), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "unsat\n");
    let recorded = std::fs::read_to_string(&argv).expect("fake solver recorded argv");
    assert_eq!(recorded.trim(), "-in -t:500 smt.random_seed=7 -v:0");
    let _ = std::fs::remove_dir_all(&dir);
}

#[cfg(not(feature = "z3"))]
#[test]
fn native_backend_without_feature_exits_4() {
    let out = run_fixture("two_equations.smtl", &["--backend", "native"]);
    assert_eq!(out.status.code(), Some(4));
}

#[test]
fn solves_two_equations() {
    if !z3_available() {
        return;
    }
    let out = run_fixture("two_equations.smtl", &[]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "x = 13\ny = 11\n");
}

#[test]
fn solves_magic_square() {
    if !z3_available() {
        return;
    }
    let out = run_fixture("magic_square.smtl", &["--timeout-ms", "30000"]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    assert_eq!(
        stdout(&out),
        "c00 = 4\nc01 = 9\nc02 = 2\nc10 = 3\nc11 = 5\nc12 = 7\nc20 = 8\nc21 = 1\nc22 = 6\n"
    );
}

#[test]
fn contradiction_exits_3() {
    if !z3_available() {
        return;
    }
    let out = run_fixture("contradiction.smtl", &[]);
    assert_eq!(out.status.code(), Some(3));
    assert_eq!(stdout(&out), "unsat\n");
}

#[test]
fn json_format() {
    if !z3_available() {
        return;
    }
    let out = run_fixture("two_equations.smtl", &["--format", "json"]);
    assert_eq!(out.status.code(), Some(0));
    let v: serde_json::Value = serde_json::from_str(stdout(&out).trim()).expect("valid json");
    assert_eq!(v["status"], "sat");
    assert_eq!(v["model"]["x"], "13");
    assert_eq!(v["model"]["y"], "11");

    let out = run_fixture("contradiction.smtl", &["--format", "json"]);
    assert_eq!(out.status.code(), Some(3));
    assert_eq!(stdout(&out).trim(), r#"{"status":"unsat"}"#);
}
