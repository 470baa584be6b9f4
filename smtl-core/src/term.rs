#![forbid(unsafe_code)]

//! Sorted logical terms produced by the compiler.
//!
//! Terms form an owned tree. `Display` renders SMT-LIB 2 concrete syntax, which is
//! what the solver backends consume, and [`Term::eval`] evaluates a term under a
//! concrete assignment so models can be checked independently of the solver.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use num_bigint::BigInt;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sort {
    Int,
    Bool,
}

impl Sort {
    /// SMT-LIB sort name.
    pub fn smt_name(self) -> &'static str {
        match self {
            Sort::Int => "Int",
            Sort::Bool => "Bool",
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sort::Int => f.write_str("int"),
            Sort::Bool => f.write_str("bool"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Term {
    BoolLit(bool),
    IntLit(i64),
    Const { name: String, sort: Sort },

    Add(Box<Term>, Box<Term>),
    Sub(Box<Term>, Box<Term>),
    Mul(Box<Term>, Box<Term>),

    And(Box<Term>, Box<Term>),
    Or(Box<Term>, Box<Term>),
    Not(Box<Term>),
    Implies(Box<Term>, Box<Term>),
    Iff(Box<Term>, Box<Term>),

    Eq(Box<Term>, Box<Term>),
    Lt(Box<Term>, Box<Term>),
    Gt(Box<Term>, Box<Term>),
    Le(Box<Term>, Box<Term>),
    Ge(Box<Term>, Box<Term>),
    /// Pairwise distinctness; always carries at least two operands.
    Distinct(Vec<Term>),
}

impl Term {
    pub fn constant(name: impl Into<String>, sort: Sort) -> Self {
        Term::Const {
            name: name.into(),
            sort,
        }
    }

    pub fn sort(&self) -> Sort {
        match self {
            Term::IntLit(_) | Term::Add(..) | Term::Sub(..) | Term::Mul(..) => Sort::Int,
            Term::Const { sort, .. } => *sort,
            _ => Sort::Bool,
        }
    }

    /// True when some product has no literal factor, i.e. the term leaves linear arithmetic.
    pub fn is_nonlinear(&self) -> bool {
        match self {
            Term::BoolLit(_) | Term::IntLit(_) | Term::Const { .. } => false,
            Term::Mul(l, r) => {
                let literal = |t: &Term| matches!(t, Term::IntLit(_));
                (!literal(l) && !literal(r)) || l.is_nonlinear() || r.is_nonlinear()
            }
            Term::Not(t) => t.is_nonlinear(),
            Term::Distinct(ts) => ts.iter().any(Term::is_nonlinear),
            Term::Add(l, r)
            | Term::Sub(l, r)
            | Term::And(l, r)
            | Term::Or(l, r)
            | Term::Implies(l, r)
            | Term::Iff(l, r)
            | Term::Eq(l, r)
            | Term::Lt(l, r)
            | Term::Gt(l, r)
            | Term::Le(l, r)
            | Term::Ge(l, r) => l.is_nonlinear() || r.is_nonlinear(),
        }
    }

    pub fn eval(&self, env: &Assignment) -> Result<Value, EvalError> {
        match self {
            Term::BoolLit(b) => Ok(Value::Bool(*b)),
            Term::IntLit(n) => Ok(Value::int(*n)),
            Term::Const { name, sort } => {
                let value = env
                    .get(name)
                    .ok_or_else(|| EvalError::Unbound(name.clone()))?;
                if value.sort() != *sort {
                    return Err(EvalError::SortMismatch(name.clone()));
                }
                Ok(value.clone())
            }

            Term::Add(l, r) => Ok(Value::Int(l.eval_int(env)? + r.eval_int(env)?)),
            Term::Sub(l, r) => Ok(Value::Int(l.eval_int(env)? - r.eval_int(env)?)),
            Term::Mul(l, r) => Ok(Value::Int(l.eval_int(env)? * r.eval_int(env)?)),

            Term::And(l, r) => Ok(Value::Bool(l.eval_bool(env)? && r.eval_bool(env)?)),
            Term::Or(l, r) => Ok(Value::Bool(l.eval_bool(env)? || r.eval_bool(env)?)),
            Term::Not(t) => Ok(Value::Bool(!t.eval_bool(env)?)),
            Term::Implies(l, r) => Ok(Value::Bool(!l.eval_bool(env)? || r.eval_bool(env)?)),
            Term::Iff(l, r) => Ok(Value::Bool(l.eval_bool(env)? == r.eval_bool(env)?)),

            Term::Eq(l, r) => Ok(Value::Bool(l.eval(env)? == r.eval(env)?)),
            Term::Lt(l, r) => Ok(Value::Bool(l.eval_int(env)? < r.eval_int(env)?)),
            Term::Gt(l, r) => Ok(Value::Bool(l.eval_int(env)? > r.eval_int(env)?)),
            Term::Le(l, r) => Ok(Value::Bool(l.eval_int(env)? <= r.eval_int(env)?)),
            Term::Ge(l, r) => Ok(Value::Bool(l.eval_int(env)? >= r.eval_int(env)?)),
            Term::Distinct(ts) => {
                let values = ts.iter().map(|t| t.eval(env)).collect::<Result<Vec<_>, _>>()?;
                let all_distinct = values
                    .iter()
                    .enumerate()
                    .all(|(i, v)| values[i + 1..].iter().all(|w| w != v));
                Ok(Value::Bool(all_distinct))
            }
        }
    }

    fn eval_int(&self, env: &Assignment) -> Result<BigInt, EvalError> {
        match self.eval(env)? {
            Value::Int(n) => Ok(n),
            Value::Bool(_) => Err(EvalError::IllSorted),
        }
    }

    fn eval_bool(&self, env: &Assignment) -> Result<bool, EvalError> {
        match self.eval(env)? {
            Value::Bool(b) => Ok(b),
            Value::Int(_) => Err(EvalError::IllSorted),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::BoolLit(b) => write!(f, "{b}"),
            Term::IntLit(n) if *n < 0 => write!(f, "(- {})", n.unsigned_abs()),
            Term::IntLit(n) => write!(f, "{n}"),
            Term::Const { name, .. } => f.write_str(&smt_symbol(name)),
            Term::Add(l, r) => write!(f, "(+ {l} {r})"),
            Term::Sub(l, r) => write!(f, "(- {l} {r})"),
            Term::Mul(l, r) => write!(f, "(* {l} {r})"),
            Term::And(l, r) => write!(f, "(and {l} {r})"),
            Term::Or(l, r) => write!(f, "(or {l} {r})"),
            Term::Not(t) => write!(f, "(not {t})"),
            Term::Implies(l, r) => write!(f, "(=> {l} {r})"),
            Term::Iff(l, r) | Term::Eq(l, r) => write!(f, "(= {l} {r})"),
            Term::Lt(l, r) => write!(f, "(< {l} {r})"),
            Term::Gt(l, r) => write!(f, "(> {l} {r})"),
            Term::Le(l, r) => write!(f, "(<= {l} {r})"),
            Term::Ge(l, r) => write!(f, "(>= {l} {r})"),
            Term::Distinct(ts) => {
                f.write_str("(distinct")?;
                for t in ts {
                    write!(f, " {t}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Words an identifier may spell that would be misread as SMT-LIB syntax or a core/Ints
/// theory symbol when written bare.
const RESERVED: &[&str] = &[
    "_", "!", "as", "let", "exists", "forall", "match", "par", "BINARY", "DECIMAL", "HEXADECIMAL",
    "NUMERAL", "STRING", "true", "false", "not", "and", "or", "xor", "ite", "distinct", "div",
    "mod", "abs", "Int", "Bool", "assert", "check", "push", "pop", "exit",
];

/// Renders a declared name as an SMT-LIB symbol, quoting it with `|...|` when needed.
pub fn smt_symbol(name: &str) -> Cow<'_, str> {
    if RESERVED.contains(&name) {
        Cow::Owned(format!("|{name}|"))
    } else {
        Cow::Borrowed(name)
    }
}

/// A concrete value of one of the two sorts. Integers are unbounded, like SMT-LIB `Int`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Int(BigInt),
    Bool(bool),
}

impl Value {
    pub fn int(n: impl Into<BigInt>) -> Self {
        Value::Int(n.into())
    }

    pub fn sort(&self) -> Sort {
        match self {
            Value::Int(_) => Sort::Int,
            Value::Bool(_) => Sort::Bool,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

pub type Assignment = BTreeMap<String, Value>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("no value for `{0}`")]
    Unbound(String),
    #[error("value for `{0}` has the wrong sort")]
    SortMismatch(String),
    #[error("ill-sorted term")]
    IllSorted,
}
