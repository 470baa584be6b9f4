#![forbid(unsafe_code)]

//! SMTL constraint compiler: turns the host syntax tree of an SMTL source into a
//! symbol table and an ordered set of boolean constraints.

mod adapter;
mod error;
mod expr;
mod node;
mod stmt;
mod symbol;
mod term;

use smtl_ast::File;

pub use adapter::{adapt, ENTRY_POINT, PACKAGE_NAME};
pub use error::{CompileError, ErrorKind};
pub use expr::compile_expr;
pub use node::{ExprNode, StmtNode};
pub use stmt::compile_stmts;
pub use symbol::{Symbol, SymbolTable};
pub use term::{smt_symbol, Assignment, EvalError, Sort, Term, Value};

/// Result of a successful compilation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Compilation {
    pub symbols: SymbolTable,
    /// Boolean constraints in assertion order.
    pub constraints: Vec<Term>,
}

impl Compilation {
    /// Whether the constraint set needs non-linear integer arithmetic.
    pub fn is_nonlinear(&self) -> bool {
        self.constraints.iter().any(Term::is_nonlinear)
    }

    /// Evaluates every constraint under `env`; returns the index of the first one that does
    /// not hold.
    pub fn first_violated(&self, env: &Assignment) -> Result<Option<usize>, EvalError> {
        for (i, c) in self.constraints.iter().enumerate() {
            if c.eval(env)? != Value::Bool(true) {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }
}

pub fn compile_file(file: &File) -> Result<Compilation, CompileError> {
    let stmts = adapt(file)?;
    compile_stmts(stmts)
}
