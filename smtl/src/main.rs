#![forbid(unsafe_code)]

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use miette::{NamedSource, Report};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use smtl_solve::{create_backend, BackendKind, Script, SolverConfig, SolverError, Verdict};

const EXIT_SAT: u8 = 0;
const EXIT_USAGE: u8 = 1;
const EXIT_COMPILE: u8 = 2;
const EXIT_UNSOLVED: u8 = 3;
const EXIT_SOLVER: u8 = 4;

#[derive(Parser, Debug)]
#[command(name = "smtl", version, about = "Solve SMTL constraint programs with z3")]
struct Cli {
    /// SMTL source file.
    file: PathBuf,

    /// Path to the z3 binary (default: auto-detect).
    #[arg(long, env = "SMTL_Z3_PATH")]
    solver_path: Option<PathBuf>,

    /// Solver timeout in milliseconds; 0 disables it.
    #[arg(long, default_value_t = 0)]
    timeout_ms: u64,

    /// Extra argument passed to the z3 subprocess; repeatable.
    #[arg(long = "solver-arg", value_name = "ARG", allow_hyphen_values = true)]
    solver_args: Vec<String>,

    #[arg(long, value_enum, default_value_t = BackendArg::Cli)]
    backend: BackendArg,

    /// Print the SMT-LIB query instead of solving it.
    #[arg(long, default_value_t = false)]
    emit_smt2: bool,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum BackendArg {
    /// z3 subprocess over stdin
    Cli,
    /// In-process z3 (needs the `z3` feature)
    Native,
}

impl From<BackendArg> for BackendKind {
    fn from(v: BackendArg) -> Self {
        match v {
            BackendArg::Cli => BackendKind::Cli,
            BackendArg::Native => BackendKind::Native,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// `name = value` lines
    Text,
    /// One JSON object
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { EXIT_USAGE } else { EXIT_SAT };
            // Help and version go to stdout, usage errors to stderr.
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    ExitCode::from(run(&cli))
}

fn run(cli: &Cli) -> u8 {
    let src = match fs::read_to_string(&cli.file) {
        Ok(src) => src,
        Err(err) => {
            eprintln!("error: cannot read {}: {err}", cli.file.display());
            return EXIT_COMPILE;
        }
    };

    let compilation = match compile(&cli.file, &src) {
        Ok(c) => c,
        Err(report) => {
            eprintln!("{report:?}");
            return EXIT_COMPILE;
        }
    };

    if cli.emit_smt2 {
        print!("{}", Script::from_compilation(&compilation));
        return EXIT_SAT;
    }

    match solve(cli, &compilation) {
        Ok(verdict) => render(&verdict, cli.format),
        Err(err) => {
            eprintln!("{:?}", Report::new(err));
            EXIT_SOLVER
        }
    }
}

fn compile(path: &Path, src: &str) -> Result<smtl_core::Compilation, Report> {
    let source = || NamedSource::new(path.display().to_string(), src.to_string());
    let file = smtl_parse::parse_file(src).map_err(|e| Report::new(e).with_source_code(source()))?;
    let compilation =
        smtl_core::compile_file(&file).map_err(|e| Report::new(e).with_source_code(source()))?;
    debug!(
        symbols = compilation.symbols.len(),
        constraints = compilation.constraints.len(),
        "compiled"
    );
    Ok(compilation)
}

fn solve(cli: &Cli, compilation: &smtl_core::Compilation) -> Result<Verdict, SolverError> {
    let backend = create_backend(
        cli.backend.into(),
        || {
            SolverConfig::resolve(cli.solver_path.clone())
                .map(|config| config.with_extra_args(cli.solver_args.clone()))
        },
        cli.timeout_ms,
    )?;
    smtl_solve::solve(compilation, backend.as_ref())
}

fn render(verdict: &Verdict, format: Format) -> u8 {
    match format {
        Format::Json => match serde_json::to_string(verdict) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: cannot serialize verdict: {err}");
                return EXIT_SOLVER;
            }
        },
        Format::Text => match verdict {
            Verdict::Sat { model } => print!("{model}"),
            Verdict::Unsat => println!("unsat"),
            Verdict::Unknown { reason } => println!("unknown: {reason}"),
        },
    }
    if verdict.is_sat() { EXIT_SAT } else { EXIT_UNSOLVED }
}
