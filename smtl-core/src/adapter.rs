#![forbid(unsafe_code)]

use smtl_ast::{Decl, File, FuncDecl, Stmt};
use tracing::warn;

use crate::error::CompileError;

pub const PACKAGE_NAME: &str = "smtl";
pub const ENTRY_POINT: &str = "main";

/// Checks the module contract and returns the entry point's statements in source order.
///
/// A file without `func main` yields no statements.
pub fn adapt(file: &File) -> Result<&[Stmt], CompileError> {
    if file.package.node != PACKAGE_NAME {
        return Err(CompileError::UnsupportedModule {
            name: file.package.node.clone(),
            span: file.package.span,
        });
    }

    let mut entry: Option<&FuncDecl> = None;
    for decl in &file.decls {
        match decl {
            Decl::Func(func) if func.name.node == ENTRY_POINT => {
                if entry.is_some() {
                    return Err(CompileError::InvalidEntryPoint {
                        message: "`main` is declared more than once".to_string(),
                        span: func.name.span,
                    });
                }
                if !func.params.is_empty() || !func.results.is_empty() {
                    return Err(CompileError::InvalidEntryPoint {
                        message: "`main` must not declare parameters or results".to_string(),
                        span: func.span,
                    });
                }
                entry = Some(func);
            }
            Decl::Func(func) => {
                warn!(name = %func.name.node, "ignoring top-level function");
            }
            Decl::Import(_) => warn!("ignoring import declaration"),
            Decl::Gen(gen_decl) => {
                warn!(keyword = gen_decl.kind.keyword(), "ignoring top-level declaration");
            }
        }
    }

    Ok(entry
        .and_then(|f| f.body.as_ref())
        .map_or(&[][..], |body| body.stmts.as_slice()))
}
