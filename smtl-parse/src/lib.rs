#![forbid(unsafe_code)]

mod error;
mod parser;

use miette::IntoDiagnostic;
use smtl_lex::Lexer;

pub use error::{ParseError, SyntaxError};
pub use parser::Parser;

pub fn parse_source(src: &str) -> miette::Result<smtl_ast::File> {
    parse_file(src).into_diagnostic()
}

/// Typed variant of [`parse_source`] for callers that attach their own source context.
pub fn parse_file(src: &str) -> Result<smtl_ast::File, SyntaxError> {
    let tokens = Lexer::new(src).lex()?;
    let mut parser = Parser::new(&tokens);
    Ok(parser.parse_file()?)
}

pub fn parse_expr(src: &str) -> miette::Result<smtl_ast::Expr> {
    let tokens = Lexer::new(src).lex().into_diagnostic()?;
    let mut parser = Parser::new(&tokens);
    let expr = parser.parse_expr().into_diagnostic()?;
    parser.finish().into_diagnostic()?;
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smtl_ast::{BinOp, ExprKind};

    #[test]
    fn parse_expr_respects_precedence() {
        let e = parse_expr("x + y * 2 == 24").unwrap();
        let ExprKind::Binary { left, op, .. } = e.kind else {
            panic!("expected binary");
        };
        assert_eq!(op, BinOp::Eql);
        let ExprKind::Binary { right, op, .. } = left.kind else {
            panic!("expected binary lhs");
        };
        assert_eq!(op, BinOp::Add);
        assert!(matches!(right.kind, ExprKind::Binary { op: BinOp::Mul, .. }));
    }

    #[test]
    fn parse_expr_method_call_is_call_on_selector() {
        let e = parse_expr("(a > 1).implies(b)").unwrap();
        let ExprKind::Call { callee, args } = e.kind else {
            panic!("expected call");
        };
        assert_eq!(args.len(), 1);
        let ExprKind::Selector { base, member } = callee.kind else {
            panic!("expected selector");
        };
        assert_eq!(member.node, "implies");
        assert!(matches!(base.kind, ExprKind::Paren(_)));
    }

    #[test]
    fn parse_expr_rejects_trailing_tokens() {
        assert!(parse_expr("x y").is_err());
    }

    #[test]
    fn parse_file_reports_lex_errors_as_syntax_errors() {
        let err = parse_file("package smtl\n$").unwrap_err();
        assert!(matches!(err, SyntaxError::Lex(_)));
    }
}
