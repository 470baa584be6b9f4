#![forbid(unsafe_code)]

//! Deciding compiled SMTL constraint sets with z3.

mod backend;
mod cli;
mod config;
mod driver;
mod error;
#[cfg(feature = "z3")]
mod native;
mod parser;
mod result;
mod script;

pub use backend::{create_backend, BackendKind, SolverBackend};
pub use cli::CliSolver;
pub use config::SolverConfig;
pub use driver::{solve, Solution, Verdict};
pub use error::SolverError;
#[cfg(feature = "z3")]
pub use native::Z3NativeSolver;
pub use parser::{parse_solver_output, parse_values};
pub use result::SolverResult;
pub use script::{Logic, Script};
