#![forbid(unsafe_code)]

//! SMT-LIB 2 query built from a compilation.

use std::fmt;

use smtl_core::{smt_symbol, Compilation, Sort, Term};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Logic {
    /// Quantifier-free linear integer arithmetic.
    QfLia,
    /// Quantifier-free non-linear integer arithmetic.
    QfNia,
}

impl Logic {
    pub fn as_str(self) -> &'static str {
        match self {
            Logic::QfLia => "QF_LIA",
            Logic::QfNia => "QF_NIA",
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One satisfiability query: declarations in name order, assertions in source order.
#[derive(Clone, Debug, PartialEq)]
pub struct Script {
    pub logic: Logic,
    pub consts: Vec<(String, Sort)>,
    pub assertions: Vec<Term>,
}

impl Script {
    pub fn from_compilation(compilation: &Compilation) -> Self {
        let logic = if compilation.is_nonlinear() {
            Logic::QfNia
        } else {
            Logic::QfLia
        };
        Self {
            logic,
            consts: compilation
                .symbols
                .iter()
                .map(|s| (s.name.clone(), s.sort))
                .collect(),
            assertions: compilation.constraints.clone(),
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "(set-logic {})", self.logic)?;
        for (name, sort) in &self.consts {
            writeln!(f, "(declare-const {} {})", smt_symbol(name), sort.smt_name())?;
        }
        for a in &self.assertions {
            writeln!(f, "(assert {a})")?;
        }
        writeln!(f, "(check-sat)")?;
        // `get-value` needs at least one term.
        if !self.consts.is_empty() {
            f.write_str("(get-value (")?;
            for (i, (name, _)) in self.consts.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                f.write_str(&smt_symbol(name))?;
            }
            writeln!(f, "))")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_full_query() {
        let script = Script {
            logic: Logic::QfLia,
            consts: vec![("p".to_string(), Sort::Bool), ("x".to_string(), Sort::Int)],
            assertions: vec![Term::Gt(
                Box::new(Term::constant("x", Sort::Int)),
                Box::new(Term::IntLit(3)),
            )],
        };
        let expected = "(set-logic QF_LIA)\n\
                        (declare-const p Bool)\n\
                        (declare-const x Int)\n\
                        (assert (> x 3))\n\
                        (check-sat)\n\
                        (get-value (p x))\n";
        assert_eq!(script.to_string(), expected);
    }

    #[test]
    fn empty_query_skips_get_value() {
        let script = Script {
            logic: Logic::QfLia,
            consts: Vec::new(),
            assertions: Vec::new(),
        };
        assert_eq!(script.to_string(), "(set-logic QF_LIA)\n(check-sat)\n");
    }
}
