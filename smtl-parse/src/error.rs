#![forbid(unsafe_code)]
#![allow(unused_assignments)]

use miette::Diagnostic;
use smtl_ast::Span;
use smtl_lex::LexError;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
#[error("parse error: {message}")]
#[diagnostic(code(smtl::parse))]
#[allow(unused_assignments)]
pub struct ParseError {
    pub message: String,
    #[label]
    pub span: Span,
}

/// Any failure to turn source text into a host syntax tree.
#[derive(Debug, Error, Diagnostic)]
pub enum SyntaxError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}

impl SyntaxError {
    pub fn span(&self) -> Span {
        match self {
            SyntaxError::Lex(e) => e.span,
            SyntaxError::Parse(e) => e.span,
        }
    }
}
