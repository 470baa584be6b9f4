#![forbid(unsafe_code)]

use smtl_core::Assignment;

/// Raw answer of a backend, before the model is checked.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverResult {
    Sat(Assignment),
    Unsat,
    /// Timeout, resource limit, or incompleteness.
    Unknown(String),
}
