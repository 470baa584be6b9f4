#![forbid(unsafe_code)]

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::backend::SolverBackend;
use crate::config::SolverConfig;
use crate::error::SolverError;
use crate::parser::parse_solver_output;
use crate::result::SolverResult;
use crate::script::Script;

/// Runs z3 as a subprocess and pipes the SMT-LIB text over stdin.
#[derive(Debug, Clone)]
pub struct CliSolver {
    config: SolverConfig,
}

impl CliSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn check_sat_raw(&self, smtlib: &str) -> Result<SolverResult, SolverError> {
        self.config.validate()?;
        let args = self.config.build_args();
        info!(solver = %self.config.solver_path.display(), ?args, "running z3");

        let mut child = Command::new(&self.config.solver_path)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SolverError::Process(format!("failed to start z3: {e}")))?;

        {
            let stdin = child
                .stdin
                .as_mut()
                .ok_or_else(|| SolverError::Process("failed to open z3 stdin".to_string()))?;
            stdin
                .write_all(smtlib.as_bytes())
                .map_err(|e| SolverError::Process(format!("failed to write to z3 stdin: {e}")))?;
        }

        // Dropping stdin inside `wait_with_output` closes the pipe, ending z3's input.
        let output = child
            .wait_with_output()
            .map_err(|e| SolverError::Process(format!("failed to wait for z3: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(status = ?output.status, %stdout, %stderr, "z3 finished");

        parse_solver_output(&stdout, &stderr)
    }
}

impl SolverBackend for CliSolver {
    fn name(&self) -> &'static str {
        "z3-cli"
    }

    fn check_sat(&self, script: &Script) -> Result<SolverResult, SolverError> {
        self.check_sat_raw(&script.to_string())
    }
}
