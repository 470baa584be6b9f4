use smtl_core::{compile_file, Assignment, Compilation, Value};
use smtl_parse::parse_source;
use smtl_solve::{
    solve, CliSolver, Logic, Script, SolverBackend, SolverConfig, SolverError, SolverResult, Verdict,
};

fn compile_main(body: &str) -> Compilation {
    let src = format!("package smtl\n\nfunc main() {{\n{body}\n}}\n");
    let file = parse_source(&src).expect("source should parse");
    compile_file(&file).expect("source should compile")
}

/// Returns a fixed answer regardless of the script.
struct Canned(SolverResult);

impl SolverBackend for Canned {
    fn name(&self) -> &'static str {
        "canned"
    }

    fn check_sat(&self, _script: &Script) -> Result<SolverResult, SolverError> {
        Ok(self.0.clone())
    }
}

fn assignment(pairs: &[(&str, Value)]) -> Assignment {
    pairs.iter().map(|(n, v)| (n.to_string(), v.clone())).collect()
}

fn z3() -> Option<CliSolver> {
    match SolverConfig::auto_detect() {
        Ok(config) => Some(CliSolver::new(config)),
        Err(err) => {
            eprintln!("skipping: {err}");
            None
        }
    }
}

const MAGIC_SQUARE: &str = r#"
    var c00, c01, c02 int
    var c10, c11, c12 int
    var c20, c21, c22 int
    assert(c00 >= 1 && c00 <= 9)
    assert(c01 >= 1 && c01 <= 9)
    assert(c02 >= 1 && c02 <= 9)
    assert(c10 >= 1 && c10 <= 9)
    assert(c11 >= 1 && c11 <= 9)
    assert(c12 >= 1 && c12 <= 9)
    assert(c20 >= 1 && c20 <= 9)
    assert(c21 >= 1 && c21 <= 9)
    assert(c22 >= 1 && c22 <= 9)
    assert(distinct(c00, c01, c02, c10, c11, c12, c20, c21, c22))
    assert(c00 == 4)
    assert(c12 == 7)
    assert(c00+c01+c02 == 15)
    assert(c10+c11+c12 == 15)
    assert(c20+c21+c22 == 15)
    assert(c00+c10+c20 == 15)
    assert(c01+c11+c21 == 15)
    assert(c02+c12+c22 == 15)
    assert(c00+c11+c22 == 15)
    assert(c02+c11+c20 == 15)
"#;

#[test]
fn script_declares_in_name_order() {
    let c = compile_main("\tvar y, x int\n\tvar p bool\n\tassert(p.implies(x > y))");
    let script = Script::from_compilation(&c);
    assert_eq!(script.logic, Logic::QfLia);
    assert_eq!(
        script.to_string(),
        "(set-logic QF_LIA)\n\
         (declare-const p Bool)\n\
         (declare-const x Int)\n\
         (declare-const y Int)\n\
         (assert (=> p (> x y)))\n\
         (check-sat)\n\
         (get-value (p x y))\n"
    );
}

#[test]
fn product_of_variables_selects_nonlinear_logic() {
    let c = compile_main("\tvar x, y int\n\tassert(x*y == 12)");
    assert_eq!(Script::from_compilation(&c).logic, Logic::QfNia);
    let c = compile_main("\tvar x int\n\tassert(3*x == 12)");
    assert_eq!(Script::from_compilation(&c).logic, Logic::QfLia);
}

#[test]
fn checked_model_becomes_solution() {
    let c = compile_main("\tvar x, y int\n\tassert(x+y == 24)\n\tassert(x-y == 2)");
    let backend = Canned(SolverResult::Sat(assignment(&[
        ("x", Value::int(13)),
        ("y", Value::int(11)),
    ])));
    let Verdict::Sat { model } = solve(&c, &backend).unwrap() else {
        panic!("expected sat");
    };
    assert_eq!(model.lines(), vec!["x = 13", "y = 11"]);
}

#[test]
fn model_violating_a_constraint_is_rejected() {
    let c = compile_main("\tvar x int\n\tassert(x > 0)\n\tassert(x < 5)");
    let backend = Canned(SolverResult::Sat(assignment(&[("x", Value::int(7))])));
    let err = solve(&c, &backend).unwrap_err();
    assert_eq!(
        err,
        SolverError::InvalidModel {
            index: 1,
            constraint: "(< x 5)".to_string()
        }
    );
}

#[test]
fn model_values_beyond_i64_are_checked_and_kept_verbatim() {
    let c = compile_main(
        "\tvar x, y int\n\tassert(x > 4000000000)\n\tassert(x*x > 0)\n\tassert(y > 9223372036854775807)",
    );
    let backend = Canned(SolverResult::Sat(assignment(&[
        ("x", Value::int(4_000_000_001_i64)),
        ("y", Value::Int("9223372036854775808".parse().unwrap())),
    ])));
    let Verdict::Sat { model } = solve(&c, &backend).unwrap() else {
        panic!("expected sat");
    };
    assert_eq!(model.lines(), vec!["x = 4000000001", "y = 9223372036854775808"]);

    let wrong = Canned(SolverResult::Sat(assignment(&[
        ("x", Value::int(4_000_000_001_i64)),
        ("y", Value::int(i64::MAX)),
    ])));
    assert!(matches!(
        solve(&c, &wrong),
        Err(SolverError::InvalidModel { index: 2, .. })
    ));
}

#[test]
fn model_missing_a_symbol_is_rejected() {
    let c = compile_main("\tvar x, y int");
    let backend = Canned(SolverResult::Sat(assignment(&[("x", Value::int(1))])));
    let err = solve(&c, &backend).unwrap_err();
    assert!(matches!(err, SolverError::Parse(ref m) if m.contains("`y`")), "{err}");
}

#[test]
fn model_with_wrong_sort_is_rejected() {
    let c = compile_main("\tvar p bool");
    let backend = Canned(SolverResult::Sat(assignment(&[("p", Value::int(1))])));
    assert!(matches!(solve(&c, &backend), Err(SolverError::Parse(_))));
}

#[test]
fn unsat_and_unknown_pass_through() {
    let c = compile_main("\tvar x int\n\tassert(x > 10)\n\tassert(x < 5)");
    assert_eq!(solve(&c, &Canned(SolverResult::Unsat)), Ok(Verdict::Unsat));
    assert_eq!(
        solve(&c, &Canned(SolverResult::Unknown("timeout".into()))),
        Ok(Verdict::Unknown {
            reason: "timeout".into()
        })
    );
}

#[test]
fn verdicts_serialize_with_status_tag() {
    let sat = Verdict::Sat {
        model: assignment(&[("b", Value::Bool(false)), ("a", Value::int(-3))]).into(),
    };
    assert_eq!(
        serde_json::to_string(&sat).unwrap(),
        r#"{"status":"sat","model":{"a":"-3","b":"false"}}"#
    );
    assert_eq!(
        serde_json::to_string(&Verdict::Unsat).unwrap(),
        r#"{"status":"unsat"}"#
    );
    assert_eq!(
        serde_json::to_string(&Verdict::Unknown {
            reason: "timeout".into()
        })
        .unwrap(),
        r#"{"status":"unknown","reason":"timeout"}"#
    );
}

#[test]
fn z3_solves_two_equations() {
    let Some(z3) = z3() else { return };
    let c = compile_main("\tvar x, y int\n\tassert(x+y == 24)\n\tassert(x-y == 2)");
    let Verdict::Sat { model } = solve(&c, &z3).unwrap() else {
        panic!("expected sat");
    };
    assert_eq!(model.to_string(), "x = 13\ny = 11\n");
}

#[test]
fn z3_solves_magic_square() {
    let Some(z3) = z3() else { return };
    let c = compile_main(MAGIC_SQUARE);
    let Verdict::Sat { model } = solve(&c, &z3).unwrap() else {
        panic!("expected sat");
    };
    let grid: Vec<String> = model.iter().map(|(_, v)| v.to_string()).collect();
    assert_eq!(grid, vec!["4", "9", "2", "3", "5", "7", "8", "1", "6"]);
}

#[test]
fn z3_reports_contradiction_as_unsat() {
    let Some(z3) = z3() else { return };
    let c = compile_main("\tvar x int\n\tassert(x > 10)\n\tassert(x < 5)");
    assert_eq!(solve(&c, &z3), Ok(Verdict::Unsat));
}

#[test]
fn z3_assigns_unconstrained_and_reserved_names() {
    let Some(z3) = z3() else { return };
    let c = compile_main("\tvar b, a, c int\n\tvar and bool\n\tassert(a < 0)");
    let Verdict::Sat { model } = solve(&c, &z3).unwrap() else {
        panic!("expected sat");
    };
    let names: Vec<&str> = model.iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["a", "and", "b", "c"]);
    assert!(model.get("a").is_some_and(|v| v.to_string().starts_with('-')));
}

#[test]
fn empty_program_is_trivially_sat() {
    let Some(z3) = z3() else { return };
    let c = compile_main("");
    let Verdict::Sat { model } = solve(&c, &z3).unwrap() else {
        panic!("expected sat");
    };
    assert!(model.is_empty());
}
