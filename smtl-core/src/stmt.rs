#![forbid(unsafe_code)]

use smtl_ast::{Spec, Stmt, TypeExpr, TypeKind};
use tracing::debug;

use crate::error::CompileError;
use crate::expr::compile_expr;
use crate::node::StmtNode;
use crate::symbol::SymbolTable;
use crate::term::{Sort, Term};
use crate::Compilation;

/// Compiles the entry point's statements in order, stopping at the first error.
pub fn compile_stmts(stmts: &[Stmt]) -> Result<Compilation, CompileError> {
    let mut symbols = SymbolTable::new();
    let mut constraints: Vec<Term> = Vec::new();

    for stmt in stmts {
        match StmtNode::classify(stmt)? {
            StmtNode::Declaration(spec) => declare(spec, &mut symbols)?,
            StmtNode::Assertion { arg } => {
                let term = compile_expr(arg, &symbols)?;
                if term.sort() != Sort::Bool {
                    return Err(CompileError::TypeMismatch {
                        context: "assertion".to_string(),
                        expected: Sort::Bool,
                        found: term.sort(),
                        span: arg.span,
                    });
                }
                debug!(index = constraints.len(), constraint = %term, "asserted");
                constraints.push(term);
            }
        }
    }

    Ok(Compilation {
        symbols,
        constraints,
    })
}

fn declare(spec: &Spec, symbols: &mut SymbolTable) -> Result<(), CompileError> {
    let Some(ty) = &spec.ty else {
        return Err(CompileError::UnsupportedType {
            ty: "<inferred>".to_string(),
            span: spec.span,
        });
    };
    let sort = resolve_sort(ty)?;

    if let Some(first) = spec.values.first() {
        return Err(CompileError::UnsupportedStatement {
            what: "variable declaration with initializer".to_string(),
            span: first.span,
        });
    }

    for name in &spec.names {
        if name.node == "_" {
            return Err(CompileError::UnsupportedStatement {
                what: "declaring the blank identifier".to_string(),
                span: name.span,
            });
        }
        let symbol = symbols.declare(&name.node, sort, name.span)?;
        debug!(name = %symbol.name, sort = %symbol.sort, "declared");
    }
    Ok(())
}

fn resolve_sort(ty: &TypeExpr) -> Result<Sort, CompileError> {
    match &ty.kind {
        TypeKind::Named {
            package: None,
            name,
        } => match name.node.as_str() {
            "int" => Ok(Sort::Int),
            "bool" => Ok(Sort::Bool),
            other => Err(CompileError::UnsupportedType {
                ty: other.to_string(),
                span: ty.span,
            }),
        },
        TypeKind::Named {
            package: Some(pkg),
            name,
        } => Err(CompileError::UnsupportedType {
            ty: format!("{}.{}", pkg.node, name.node),
            span: ty.span,
        }),
        other => Err(CompileError::UnsupportedType {
            ty: other.describe().to_string(),
            span: ty.span,
        }),
    }
}
