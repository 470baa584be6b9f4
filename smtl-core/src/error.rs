#![forbid(unsafe_code)]
#![allow(unused_assignments)]

use std::fmt;

use miette::Diagnostic;
use smtl_ast::Span;
use thiserror::Error;

use crate::term::Sort;

/// Fieldless classification of every failure the toolchain reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnsupportedModule,
    InvalidEntryPoint,
    DuplicateDeclaration,
    UnsupportedType,
    UnknownVariable,
    UnsupportedStatement,
    UnsupportedAssertion,
    UnsupportedExpression,
    UnsupportedOperator,
    UnsupportedCall,
    UnsupportedMethod,
    ArityError,
    MalformedLiteral,
    TypeMismatch,
    SolverFailure,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::UnsupportedModule => "unsupported_module",
            ErrorKind::InvalidEntryPoint => "invalid_entry_point",
            ErrorKind::DuplicateDeclaration => "duplicate_declaration",
            ErrorKind::UnsupportedType => "unsupported_type",
            ErrorKind::UnknownVariable => "unknown_variable",
            ErrorKind::UnsupportedStatement => "unsupported_statement",
            ErrorKind::UnsupportedAssertion => "unsupported_assertion",
            ErrorKind::UnsupportedExpression => "unsupported_expression",
            ErrorKind::UnsupportedOperator => "unsupported_operator",
            ErrorKind::UnsupportedCall => "unsupported_call",
            ErrorKind::UnsupportedMethod => "unsupported_method",
            ErrorKind::ArityError => "arity_error",
            ErrorKind::MalformedLiteral => "malformed_literal",
            ErrorKind::TypeMismatch => "type_mismatch",
            ErrorKind::SolverFailure => "solver_failure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Diagnostic, Clone, PartialEq)]
#[allow(unused_assignments)]
pub enum CompileError {
    #[error("package `{name}` is not supported; expected `smtl`")]
    #[diagnostic(code(smtl::unsupported_module))]
    UnsupportedModule {
        name: String,
        #[label("package declared here")]
        span: Span,
    },

    #[error("invalid entry point: {message}")]
    #[diagnostic(code(smtl::invalid_entry_point), help("declare exactly one `func main()` without parameters or results"))]
    InvalidEntryPoint {
        message: String,
        #[label]
        span: Span,
    },

    #[error("variable `{name}` is already declared")]
    #[diagnostic(code(smtl::duplicate_declaration))]
    DuplicateDeclaration {
        name: String,
        #[label("declared again here")]
        span: Span,
        #[label("first declared here")]
        previous: Span,
    },

    #[error("type `{ty}` is not supported")]
    #[diagnostic(code(smtl::unsupported_type), help("variables must be declared `int` or `bool`"))]
    UnsupportedType {
        ty: String,
        #[label]
        span: Span,
    },

    #[error("`{name}` is an unknown variable")]
    #[diagnostic(code(smtl::unknown_variable))]
    UnknownVariable {
        name: String,
        #[label("not declared before this use")]
        span: Span,
    },

    #[error("{what} is not supported")]
    #[diagnostic(code(smtl::unsupported_statement), help("only `var` declarations and `assert(...)` calls are allowed"))]
    UnsupportedStatement {
        what: String,
        #[label]
        span: Span,
    },

    #[error("unsupported assertion: {message}")]
    #[diagnostic(code(smtl::unsupported_assertion))]
    UnsupportedAssertion {
        message: String,
        #[label]
        span: Span,
    },

    #[error("{what} is not supported in constraints")]
    #[diagnostic(code(smtl::unsupported_expression))]
    UnsupportedExpression {
        what: String,
        #[label]
        span: Span,
    },

    #[error("operator `{op}` is not supported")]
    #[diagnostic(code(smtl::unsupported_operator))]
    UnsupportedOperator {
        op: String,
        #[label]
        span: Span,
    },

    #[error("call to `{name}` is not supported")]
    #[diagnostic(code(smtl::unsupported_call), help("the only callable predicate is `distinct`"))]
    UnsupportedCall {
        name: String,
        #[label]
        span: Span,
    },

    #[error("method `{name}` is not supported")]
    #[diagnostic(code(smtl::unsupported_method), help("supported methods are `implies` and `iff`"))]
    UnsupportedMethod {
        name: String,
        #[label]
        span: Span,
    },

    #[error("`{callee}` expects {expected}, found {found}")]
    #[diagnostic(code(smtl::arity))]
    ArityError {
        callee: String,
        expected: String,
        found: usize,
        #[label]
        span: Span,
    },

    #[error("malformed integer literal `{text}`")]
    #[diagnostic(code(smtl::malformed_literal), help("integer literals must be plain decimal and fit in 64 bits"))]
    MalformedLiteral {
        text: String,
        #[label]
        span: Span,
    },

    #[error("type mismatch in {context}: expected {expected}, found {found}")]
    #[diagnostic(code(smtl::type_mismatch))]
    TypeMismatch {
        context: String,
        expected: Sort,
        found: Sort,
        #[label("this is {found}")]
        span: Span,
    },
}

impl CompileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompileError::UnsupportedModule { .. } => ErrorKind::UnsupportedModule,
            CompileError::InvalidEntryPoint { .. } => ErrorKind::InvalidEntryPoint,
            CompileError::DuplicateDeclaration { .. } => ErrorKind::DuplicateDeclaration,
            CompileError::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            CompileError::UnknownVariable { .. } => ErrorKind::UnknownVariable,
            CompileError::UnsupportedStatement { .. } => ErrorKind::UnsupportedStatement,
            CompileError::UnsupportedAssertion { .. } => ErrorKind::UnsupportedAssertion,
            CompileError::UnsupportedExpression { .. } => ErrorKind::UnsupportedExpression,
            CompileError::UnsupportedOperator { .. } => ErrorKind::UnsupportedOperator,
            CompileError::UnsupportedCall { .. } => ErrorKind::UnsupportedCall,
            CompileError::UnsupportedMethod { .. } => ErrorKind::UnsupportedMethod,
            CompileError::ArityError { .. } => ErrorKind::ArityError,
            CompileError::MalformedLiteral { .. } => ErrorKind::MalformedLiteral,
            CompileError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
        }
    }

    /// Primary source location of the error.
    pub fn span(&self) -> Span {
        match self {
            CompileError::UnsupportedModule { span, .. }
            | CompileError::InvalidEntryPoint { span, .. }
            | CompileError::DuplicateDeclaration { span, .. }
            | CompileError::UnsupportedType { span, .. }
            | CompileError::UnknownVariable { span, .. }
            | CompileError::UnsupportedStatement { span, .. }
            | CompileError::UnsupportedAssertion { span, .. }
            | CompileError::UnsupportedExpression { span, .. }
            | CompileError::UnsupportedOperator { span, .. }
            | CompileError::UnsupportedCall { span, .. }
            | CompileError::UnsupportedMethod { span, .. }
            | CompileError::ArityError { span, .. }
            | CompileError::MalformedLiteral { span, .. }
            | CompileError::TypeMismatch { span, .. } => *span,
        }
    }
}
