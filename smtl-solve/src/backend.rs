#![forbid(unsafe_code)]

//! Pluggable solver backends: the z3 subprocess, and the in-process z3 API when the
//! `z3` feature is enabled.

use std::fmt;
use std::str::FromStr;

use crate::cli::CliSolver;
use crate::config::SolverConfig;
use crate::error::SolverError;
use crate::result::SolverResult;
use crate::script::Script;

pub trait SolverBackend {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Decides the script. `Sat` carries a value for every declared constant.
    fn check_sat(&self, script: &Script) -> Result<SolverResult, SolverError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    #[default]
    Cli,
    Native,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Cli => f.write_str("cli"),
            BackendKind::Native => f.write_str("native"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cli" => Ok(BackendKind::Cli),
            "native" => Ok(BackendKind::Native),
            _ => Err(format!("unknown backend: {s}. Valid options: cli, native")),
        }
    }
}

/// Builds the requested backend. The subprocess backend needs a resolved `config`; the
/// native one only uses its timeout.
pub fn create_backend(
    kind: BackendKind,
    config: impl FnOnce() -> Result<SolverConfig, SolverError>,
    timeout_ms: u64,
) -> Result<Box<dyn SolverBackend>, SolverError> {
    match kind {
        BackendKind::Cli => {
            let config = config()?.with_timeout(timeout_ms);
            tracing::debug!(path = %config.solver_path.display(), "using z3 subprocess backend");
            Ok(Box::new(CliSolver::new(config)))
        }
        #[cfg(feature = "z3")]
        BackendKind::Native => {
            tracing::debug!("using z3 native backend");
            Ok(Box::new(crate::native::Z3NativeSolver::new().with_timeout(timeout_ms)))
        }
        #[cfg(not(feature = "z3"))]
        BackendKind::Native => Err(SolverError::BackendUnavailable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_kind_parses_case_insensitively() {
        assert_eq!("CLI".parse::<BackendKind>(), Ok(BackendKind::Cli));
        assert_eq!("native".parse::<BackendKind>(), Ok(BackendKind::Native));
        assert!("cvc5".parse::<BackendKind>().is_err());
    }

    #[test]
    fn cli_backend_propagates_config_errors() {
        let result = create_backend(
            BackendKind::Cli,
            || Err(SolverError::NotFound("z3".into())),
            0,
        );
        assert!(matches!(result, Err(SolverError::NotFound(_))));
    }

    #[cfg(not(feature = "z3"))]
    #[test]
    fn native_backend_requires_feature() {
        let result = create_backend(BackendKind::Native, || unreachable!(), 0);
        assert!(matches!(result, Err(SolverError::BackendUnavailable)));
    }
}
