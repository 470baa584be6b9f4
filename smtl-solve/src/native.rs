#![forbid(unsafe_code)]

//! In-process z3 backend (requires libz3 at link time).

use std::collections::BTreeMap;

use smtl_core::{Assignment, Sort, Term, Value};
use tracing::info;
use z3::ast::{Ast, Bool, Int};
use z3::{Config, Context, Params, SatResult, Solver};

use crate::backend::SolverBackend;
use crate::error::SolverError;
use crate::parser::parse_value;
use crate::result::SolverResult;
use crate::script::Script;

#[derive(Debug, Clone, Default)]
pub struct Z3NativeSolver {
    timeout_ms: u64,
}

impl Z3NativeSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

enum Z3Term<'ctx> {
    Int(Int<'ctx>),
    Bool(Bool<'ctx>),
}

struct Translator<'ctx> {
    ctx: &'ctx Context,
    consts: BTreeMap<String, Z3Term<'ctx>>,
}

impl<'ctx> Translator<'ctx> {
    fn new(ctx: &'ctx Context, script: &Script) -> Self {
        let consts = script
            .consts
            .iter()
            .map(|(name, sort)| {
                let term = match sort {
                    Sort::Int => Z3Term::Int(Int::new_const(ctx, name.as_str())),
                    Sort::Bool => Z3Term::Bool(Bool::new_const(ctx, name.as_str())),
                };
                (name.clone(), term)
            })
            .collect();
        Self { ctx, consts }
    }

    fn term(&self, t: &Term) -> Result<Z3Term<'ctx>, SolverError> {
        let ctx = self.ctx;
        Ok(match t {
            Term::BoolLit(b) => Z3Term::Bool(Bool::from_bool(ctx, *b)),
            Term::IntLit(n) => Z3Term::Int(Int::from_i64(ctx, *n)),
            Term::Const { name, .. } => match self.consts.get(name) {
                Some(Z3Term::Int(v)) => Z3Term::Int(v.clone()),
                Some(Z3Term::Bool(v)) => Z3Term::Bool(v.clone()),
                None => {
                    return Err(SolverError::Process(format!("undeclared constant `{name}`")));
                }
            },

            Term::Add(l, r) => Z3Term::Int(Int::add(ctx, &[&self.int(l)?, &self.int(r)?])),
            Term::Sub(l, r) => Z3Term::Int(Int::sub(ctx, &[&self.int(l)?, &self.int(r)?])),
            Term::Mul(l, r) => Z3Term::Int(Int::mul(ctx, &[&self.int(l)?, &self.int(r)?])),

            Term::And(l, r) => Z3Term::Bool(Bool::and(ctx, &[&self.bool(l)?, &self.bool(r)?])),
            Term::Or(l, r) => Z3Term::Bool(Bool::or(ctx, &[&self.bool(l)?, &self.bool(r)?])),
            Term::Not(t) => Z3Term::Bool(self.bool(t)?.not()),
            Term::Implies(l, r) => Z3Term::Bool(self.bool(l)?.implies(&self.bool(r)?)),
            Term::Iff(l, r) => Z3Term::Bool(self.bool(l)?.iff(&self.bool(r)?)),

            Term::Eq(l, r) => Z3Term::Bool(match (self.term(l)?, self.term(r)?) {
                (Z3Term::Int(a), Z3Term::Int(b)) => a._eq(&b),
                (Z3Term::Bool(a), Z3Term::Bool(b)) => a._eq(&b),
                _ => return Err(ill_sorted()),
            }),
            Term::Lt(l, r) => Z3Term::Bool(self.int(l)?.lt(&self.int(r)?)),
            Term::Gt(l, r) => Z3Term::Bool(self.int(l)?.gt(&self.int(r)?)),
            Term::Le(l, r) => Z3Term::Bool(self.int(l)?.le(&self.int(r)?)),
            Term::Ge(l, r) => Z3Term::Bool(self.int(l)?.ge(&self.int(r)?)),
            Term::Distinct(ts) => match ts.first().map(Term::sort) {
                Some(Sort::Int) => {
                    let vs = ts.iter().map(|t| self.int(t)).collect::<Result<Vec<_>, _>>()?;
                    let refs: Vec<&Int<'ctx>> = vs.iter().collect();
                    Z3Term::Bool(Int::distinct(ctx, &refs))
                }
                _ => {
                    let vs = ts.iter().map(|t| self.bool(t)).collect::<Result<Vec<_>, _>>()?;
                    let refs: Vec<&Bool<'ctx>> = vs.iter().collect();
                    Z3Term::Bool(Bool::distinct(ctx, &refs))
                }
            },
        })
    }

    fn int(&self, t: &Term) -> Result<Int<'ctx>, SolverError> {
        match self.term(t)? {
            Z3Term::Int(v) => Ok(v),
            Z3Term::Bool(_) => Err(ill_sorted()),
        }
    }

    fn bool(&self, t: &Term) -> Result<Bool<'ctx>, SolverError> {
        match self.term(t)? {
            Z3Term::Bool(v) => Ok(v),
            Z3Term::Int(_) => Err(ill_sorted()),
        }
    }
}

fn ill_sorted() -> SolverError {
    SolverError::Process("ill-sorted term".to_string())
}

impl SolverBackend for Z3NativeSolver {
    fn name(&self) -> &'static str {
        "z3-native"
    }

    fn check_sat(&self, script: &Script) -> Result<SolverResult, SolverError> {
        let mut cfg = Config::new();
        cfg.set_model_generation(true);
        let ctx = Context::new(&cfg);

        let solver = Solver::new(&ctx);
        if self.timeout_ms > 0 {
            let mut params = Params::new(&ctx);
            params.set_u32("timeout", u32::try_from(self.timeout_ms).unwrap_or(u32::MAX));
            solver.set_params(&params);
        }

        let tr = Translator::new(&ctx, script);
        for a in &script.assertions {
            solver.assert(&tr.bool(a)?);
        }

        info!(assertions = script.assertions.len(), "checking with native z3");
        match solver.check() {
            SatResult::Unsat => Ok(SolverResult::Unsat),
            SatResult::Unknown => Ok(SolverResult::Unknown(
                solver
                    .get_reason_unknown()
                    .unwrap_or_else(|| "unknown".to_string()),
            )),
            SatResult::Sat => {
                let model = solver
                    .get_model()
                    .ok_or_else(|| SolverError::Process("z3 reported sat without a model".to_string()))?;
                let mut values = Assignment::new();
                for (name, term) in &tr.consts {
                    let missing = || SolverError::Parse(format!("no value for `{name}` in model"));
                    let value = match term {
                        Z3Term::Int(v) => {
                            let x = model.eval(v, true).ok_or_else(missing)?;
                            match x.as_i64() {
                                Some(n) => Value::int(n),
                                None => parse_value(&x.to_string())?,
                            }
                        }
                        Z3Term::Bool(v) => model
                            .eval(v, true)
                            .and_then(|x| x.as_bool())
                            .map(Value::Bool)
                            .ok_or_else(missing)?,
                    };
                    values.insert(name.clone(), value);
                }
                Ok(SolverResult::Sat(values))
            }
        }
    }
}
