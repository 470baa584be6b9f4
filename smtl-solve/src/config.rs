#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::Command;

use crate::error::SolverError;

const BINARY: &str = "z3";

/// Checked when `z3` is not on `PATH`.
const COMMON_PATHS: &[&str] = &["/opt/homebrew/bin/z3", "/usr/local/bin/z3", "/usr/bin/z3"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// Path to the z3 binary.
    pub solver_path: PathBuf,
    /// Timeout in milliseconds (0 = no timeout).
    pub timeout_ms: u64,
    /// Additional solver arguments.
    pub extra_args: Vec<String>,
}

impl SolverConfig {
    pub fn new(solver_path: PathBuf) -> Self {
        Self {
            solver_path,
            timeout_ms: 0,
            extra_args: Vec::new(),
        }
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// Tries `which z3` first, then common installation paths.
    pub fn auto_detect() -> Result<Self, SolverError> {
        if let Ok(output) = Command::new("which").arg(BINARY).output()
            && output.status.success()
        {
            let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !found.is_empty() {
                let path = PathBuf::from(found);
                if path.exists() {
                    return Ok(Self::new(path));
                }
            }
        }

        COMMON_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
            .map(Self::new)
            .ok_or_else(|| SolverError::NotFound(PathBuf::from(BINARY)))
    }

    /// Explicit path if given, auto-detection otherwise.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self, SolverError> {
        match explicit {
            Some(path) => {
                let config = Self::new(path);
                config.validate()?;
                Ok(config)
            }
            None => Self::auto_detect(),
        }
    }

    /// Arguments for reading a script from stdin.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec!["-in".to_string()];
        if self.timeout_ms > 0 {
            args.push(format!("-t:{}", self.timeout_ms));
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }

    pub fn validate(&self) -> Result<(), SolverError> {
        if !self.solver_path.exists() {
            return Err(SolverError::NotFound(self.solver_path.clone()));
        }
        Ok(())
    }
}
