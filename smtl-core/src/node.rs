#![forbid(unsafe_code)]

//! Closed views over the generic host tree.
//!
//! Each `classify` call inspects exactly one level of the tree. Children stay as host
//! nodes and are classified when the compiler reaches them, so errors surface in the
//! same left-to-right order the compiler visits the source.

use smtl_ast::{BinOp, Expr, ExprKind, GenKind, Ident, LitKind, Span, Spec, Stmt, StmtKind, UnaryOp};

use crate::error::CompileError;

pub const ASSERT: &str = "assert";

#[derive(Clone, Copy, Debug)]
pub enum StmtNode<'a> {
    /// `var a, b T`
    Declaration(&'a Spec),
    /// `assert(arg)`
    Assertion { arg: &'a Expr },
}

impl<'a> StmtNode<'a> {
    pub fn classify(stmt: &'a Stmt) -> Result<Self, CompileError> {
        match &stmt.kind {
            StmtKind::Decl(decl) => {
                if decl.kind != GenKind::Var {
                    return Err(CompileError::UnsupportedStatement {
                        what: stmt.kind.describe().to_string(),
                        span: stmt.span,
                    });
                }
                match decl.specs.as_slice() {
                    [spec] => Ok(StmtNode::Declaration(spec)),
                    specs => Err(CompileError::UnsupportedStatement {
                        what: format!("grouped declaration with {} entries", specs.len()),
                        span: stmt.span,
                    }),
                }
            }
            StmtKind::Expr(expr) => {
                let ExprKind::Call { callee, args } = &expr.kind else {
                    return Err(CompileError::UnsupportedStatement {
                        what: format!("{} used as a statement", expr.kind.describe()),
                        span: stmt.span,
                    });
                };
                let is_assert =
                    matches!(&callee.kind, ExprKind::Ident(name) if name.node == ASSERT);
                if !is_assert {
                    return Err(CompileError::UnsupportedAssertion {
                        message: format!("only `{ASSERT}(...)` may be called as a statement"),
                        span: callee.span,
                    });
                }
                match args.as_slice() {
                    [arg] => Ok(StmtNode::Assertion { arg }),
                    _ => Err(CompileError::UnsupportedAssertion {
                        message: format!(
                            "`{ASSERT}` takes exactly one argument, found {}",
                            args.len()
                        ),
                        span: expr.span,
                    }),
                }
            }
            other => Err(CompileError::UnsupportedStatement {
                what: other.describe().to_string(),
                span: stmt.span,
            }),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum ExprNode<'a> {
    BoolLit(bool),
    /// Raw literal text; parsed by the expression compiler.
    IntLit(&'a str),
    Ident(&'a Ident),
    Binary {
        op: BinOp,
        left: &'a Expr,
        right: &'a Expr,
    },
    Unary {
        op: UnaryOp,
        operand: &'a Expr,
    },
    /// `name(args...)`, at least one argument.
    Call { name: &'a Ident, args: &'a [Expr] },
    /// `receiver.name(args...)`
    Method {
        receiver: &'a Expr,
        name: &'a Ident,
        args: &'a [Expr],
    },
}

impl<'a> ExprNode<'a> {
    /// Classifies `expr`, looking through parentheses.
    pub fn classify(expr: &'a Expr) -> Result<Self, CompileError> {
        match &expr.kind {
            ExprKind::Paren(inner) => Self::classify(inner),
            ExprKind::Ident(ident) => Ok(match ident.node.as_str() {
                "true" => ExprNode::BoolLit(true),
                "false" => ExprNode::BoolLit(false),
                _ => ExprNode::Ident(ident),
            }),
            ExprKind::BasicLit(lit) if lit.kind == LitKind::Int => Ok(ExprNode::IntLit(&lit.value)),
            ExprKind::Binary { left, op, right } => Ok(ExprNode::Binary {
                op: *op,
                left,
                right,
            }),
            ExprKind::Unary { op, expr: operand } => Ok(ExprNode::Unary { op: *op, operand }),
            ExprKind::Call { callee, args } => classify_call(expr.span, callee, args),
            other => Err(CompileError::UnsupportedExpression {
                what: other.describe().to_string(),
                span: expr.span,
            }),
        }
    }
}

fn classify_call<'a>(
    span: Span,
    callee: &'a Expr,
    args: &'a [Expr],
) -> Result<ExprNode<'a>, CompileError> {
    match &callee.kind {
        ExprKind::Ident(name) if args.is_empty() => Err(CompileError::ArityError {
            callee: name.node.clone(),
            expected: "at least one argument".to_string(),
            found: 0,
            span,
        }),
        ExprKind::Ident(name) => Ok(ExprNode::Call { name, args }),
        // Receiver, then name, then arity: the expression compiler checks them in that order.
        ExprKind::Selector { base, member } => Ok(ExprNode::Method {
            receiver: base,
            name: member,
            args,
        }),
        other => Err(CompileError::UnsupportedCall {
            name: other.describe().to_string(),
            span: callee.span,
        }),
    }
}
