#![forbid(unsafe_code)]

use smtl_ast::{BinOp, Expr, Ident, Span, UnaryOp};

use crate::error::CompileError;
use crate::node::ExprNode;
use crate::symbol::SymbolTable;
use crate::term::{Sort, Term};

pub const DISTINCT: &str = "distinct";
pub const IMPLIES: &str = "implies";
pub const IFF: &str = "iff";

/// Compiles one expression against the current symbol table.
pub fn compile_expr(expr: &Expr, symbols: &SymbolTable) -> Result<Term, CompileError> {
    match ExprNode::classify(expr)? {
        ExprNode::BoolLit(b) => Ok(Term::BoolLit(b)),
        ExprNode::IntLit(text) => parse_int_literal(text, expr.span).map(Term::IntLit),
        ExprNode::Ident(ident) => resolve(ident, symbols),
        ExprNode::Binary { op, left, right } => {
            let l = compile_expr(left, symbols)?;
            let r = compile_expr(right, symbols)?;
            binary(op, expr.span, (l, left.span), (r, right.span))
        }
        ExprNode::Unary { op, operand } => {
            let t = compile_expr(operand, symbols)?;
            match op {
                UnaryOp::Not => {
                    expect_sort(&t, Sort::Bool, operand.span, "operator `!`")?;
                    Ok(Term::Not(Box::new(t)))
                }
                other => Err(CompileError::UnsupportedOperator {
                    op: format!("unary {other}"),
                    span: expr.span,
                }),
            }
        }
        ExprNode::Call { name, args } => {
            if name.node != DISTINCT {
                return Err(CompileError::UnsupportedCall {
                    name: name.node.clone(),
                    span: name.span,
                });
            }
            let terms = args
                .iter()
                .map(|a| compile_expr(a, symbols))
                .collect::<Result<Vec<_>, _>>()?;
            if terms.len() < 2 {
                return Err(CompileError::ArityError {
                    callee: DISTINCT.to_string(),
                    expected: "at least two arguments".to_string(),
                    found: terms.len(),
                    span: expr.span,
                });
            }
            let sort = terms[0].sort();
            for (t, a) in terms.iter().zip(args).skip(1) {
                expect_sort(t, sort, a.span, "`distinct` arguments")?;
            }
            Ok(Term::Distinct(terms))
        }
        ExprNode::Method {
            receiver,
            name,
            args,
        } => {
            let recv = compile_expr(receiver, symbols)?;
            let build: fn(Box<Term>, Box<Term>) -> Term = match name.node.as_str() {
                IMPLIES => Term::Implies,
                IFF => Term::Iff,
                _ => {
                    return Err(CompileError::UnsupportedMethod {
                        name: name.node.clone(),
                        span: name.span,
                    });
                }
            };
            let [arg] = args else {
                return Err(CompileError::ArityError {
                    callee: name.node.clone(),
                    expected: "exactly one argument".to_string(),
                    found: args.len(),
                    span: expr.span,
                });
            };
            let rhs = compile_expr(arg, symbols)?;
            let context = format!("method `{}`", name.node);
            expect_sort(&recv, Sort::Bool, receiver.span, &context)?;
            expect_sort(&rhs, Sort::Bool, arg.span, &context)?;
            Ok(build(Box::new(recv), Box::new(rhs)))
        }
    }
}

fn resolve(ident: &Ident, symbols: &SymbolTable) -> Result<Term, CompileError> {
    symbols
        .lookup(&ident.node)
        .map(|s| s.term.clone())
        .ok_or_else(|| CompileError::UnknownVariable {
            name: ident.node.clone(),
            span: ident.span,
        })
}

/// Decimal only: the host grammar's other integer spellings are rejected.
fn parse_int_literal(text: &str, span: Span) -> Result<i64, CompileError> {
    let malformed = || CompileError::MalformedLiteral {
        text: text.to_string(),
        span,
    };
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    text.parse::<i64>().map_err(|_| malformed())
}

fn binary(
    op: BinOp,
    span: Span,
    (l, l_span): (Term, Span),
    (r, r_span): (Term, Span),
) -> Result<Term, CompileError> {
    let operand_sort = match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Lss | BinOp::Gtr | BinOp::Leq | BinOp::Geq => {
            Sort::Int
        }
        BinOp::LAnd | BinOp::LOr => Sort::Bool,
        BinOp::Eql | BinOp::Neq => l.sort(),
        _ => {
            return Err(CompileError::UnsupportedOperator {
                op: op.to_string(),
                span,
            });
        }
    };

    let context = format!("operator `{op}`");
    expect_sort(&l, operand_sort, l_span, &context)?;
    expect_sort(&r, operand_sort, r_span, &context)?;

    let (l, r) = (Box::new(l), Box::new(r));
    Ok(match op {
        BinOp::Add => Term::Add(l, r),
        BinOp::Sub => Term::Sub(l, r),
        BinOp::Mul => Term::Mul(l, r),
        BinOp::LAnd => Term::And(l, r),
        BinOp::LOr => Term::Or(l, r),
        BinOp::Eql => Term::Eq(l, r),
        BinOp::Neq => Term::Not(Box::new(Term::Eq(l, r))),
        BinOp::Lss => Term::Lt(l, r),
        BinOp::Gtr => Term::Gt(l, r),
        BinOp::Leq => Term::Le(l, r),
        _ => Term::Ge(l, r),
    })
}

fn expect_sort(term: &Term, expected: Sort, span: Span, context: &str) -> Result<(), CompileError> {
    let found = term.sort();
    if found == expected {
        Ok(())
    } else {
        Err(CompileError::TypeMismatch {
            context: context.to_string(),
            expected,
            found,
            span,
        })
    }
}
