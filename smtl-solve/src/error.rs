#![forbid(unsafe_code)]
#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::Diagnostic;
use smtl_core::ErrorKind;
use thiserror::Error;

/// Failures talking to the solver. An unsatisfiable or unknown verdict is not an error.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq)]
pub enum SolverError {
    #[error("z3 binary not found at: {}", .0.display())]
    #[diagnostic(code(smtl::solver::not_found), help("install z3 or pass --solver-path / set SMTL_Z3_PATH"))]
    NotFound(PathBuf),

    #[error("solver process error: {0}")]
    #[diagnostic(code(smtl::solver::process))]
    Process(String),

    #[error("failed to parse solver output: {0}")]
    #[diagnostic(code(smtl::solver::output))]
    Parse(String),

    #[error("solver returned a model that violates constraint #{index}: {constraint}")]
    #[diagnostic(code(smtl::solver::invalid_model))]
    InvalidModel { index: usize, constraint: String },

    #[error("the native z3 backend is not available in this build")]
    #[diagnostic(code(smtl::solver::backend), help("rebuild with `--features z3` or use `--backend cli`"))]
    BackendUnavailable,
}

impl SolverError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::SolverFailure
    }
}
