#![forbid(unsafe_code)]
#![allow(unused_assignments)]

use logos::Logos;
use miette::Diagnostic;
use smtl_ast::{span_between, Span};
use thiserror::Error;

use crate::token::{Token, TokenKind};

#[derive(Debug, Error, Diagnostic)]
#[error("lex error: {message}")]
#[diagnostic(code(smtl::lex))]
#[allow(unused_assignments)]
pub struct LexError {
    pub message: String,
    #[label]
    pub span: Span,
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip r"//[^\n]*")]
enum RawToken {
    #[token("\n")]
    Newline,
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", |lex| lex.slice().contains('\n'))]
    BlockComment(bool),

    #[token("package")]
    KwPackage,
    #[token("import")]
    KwImport,
    #[token("func")]
    KwFunc,
    #[token("var")]
    KwVar,
    #[token("const")]
    KwConst,
    #[token("type")]
    KwType,
    #[token("return")]
    KwReturn,
    #[token("if")]
    KwIf,
    #[token("else")]
    KwElse,
    #[token("for")]
    KwFor,
    #[token("break")]
    KwBreak,
    #[token("continue")]
    KwContinue,
    #[token("map")]
    KwMap,

    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,

    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    #[token("==")]
    EqEq,
    #[token("!=")]
    Neq,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("&^")]
    AmpCaret,
    #[token(":=")]
    Define,

    #[token("!")]
    Bang,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("=")]
    Assign,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,

    // Integer text is kept verbatim; numeric interpretation belongs to later stages.
    #[regex(r"0[xX][0-9a-fA-F_]+", |lex| lex.slice().to_string())]
    #[regex(r"0[bB][01_]+", |lex| lex.slice().to_string())]
    #[regex(r"0[oO][0-7_]+", |lex| lex.slice().to_string())]
    #[regex(r"[0-9][0-9_]*", |lex| lex.slice().to_string())]
    Int(String),

    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().to_string())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    Float(String),

    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| lex.slice().to_string())]
    #[regex(r"`[^`]*`", |lex| lex.slice().to_string())]
    String(String),

    #[regex(r"'([^'\\\n]|\\.)*'", |lex| lex.slice().to_string())]
    Char(String),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

pub struct Lexer<'a> {
    src: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src }
    }

    pub fn lex(&self) -> Result<Vec<Token>, LexError> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut lex = RawToken::lexer(self.src);

        while let Some(raw) = lex.next() {
            let range = lex.span();
            let span = span_between(range.start, range.end);

            let kind = match raw {
                Ok(RawToken::Newline) | Ok(RawToken::BlockComment(true)) => {
                    insert_semicolon(&mut tokens, range.start);
                    continue;
                }
                Ok(RawToken::BlockComment(false)) => continue,

                Ok(RawToken::KwPackage) => TokenKind::KwPackage,
                Ok(RawToken::KwImport) => TokenKind::KwImport,
                Ok(RawToken::KwFunc) => TokenKind::KwFunc,
                Ok(RawToken::KwVar) => TokenKind::KwVar,
                Ok(RawToken::KwConst) => TokenKind::KwConst,
                Ok(RawToken::KwType) => TokenKind::KwType,
                Ok(RawToken::KwReturn) => TokenKind::KwReturn,
                Ok(RawToken::KwIf) => TokenKind::KwIf,
                Ok(RawToken::KwElse) => TokenKind::KwElse,
                Ok(RawToken::KwFor) => TokenKind::KwFor,
                Ok(RawToken::KwBreak) => TokenKind::KwBreak,
                Ok(RawToken::KwContinue) => TokenKind::KwContinue,
                Ok(RawToken::KwMap) => TokenKind::KwMap,

                Ok(RawToken::PlusEq) => TokenKind::PlusEq,
                Ok(RawToken::MinusEq) => TokenKind::MinusEq,
                Ok(RawToken::StarEq) => TokenKind::StarEq,
                Ok(RawToken::SlashEq) => TokenKind::SlashEq,
                Ok(RawToken::PercentEq) => TokenKind::PercentEq,

                Ok(RawToken::AndAnd) => TokenKind::AndAnd,
                Ok(RawToken::OrOr) => TokenKind::OrOr,
                Ok(RawToken::PlusPlus) => TokenKind::PlusPlus,
                Ok(RawToken::MinusMinus) => TokenKind::MinusMinus,

                Ok(RawToken::EqEq) => TokenKind::EqEq,
                Ok(RawToken::Neq) => TokenKind::Neq,
                Ok(RawToken::Shl) => TokenKind::Shl,
                Ok(RawToken::Shr) => TokenKind::Shr,
                Ok(RawToken::Le) => TokenKind::Le,
                Ok(RawToken::Ge) => TokenKind::Ge,
                Ok(RawToken::Lt) => TokenKind::Lt,
                Ok(RawToken::Gt) => TokenKind::Gt,
                Ok(RawToken::AmpCaret) => TokenKind::AmpCaret,
                Ok(RawToken::Define) => TokenKind::Define,

                Ok(RawToken::Bang) => TokenKind::Bang,
                Ok(RawToken::Plus) => TokenKind::Plus,
                Ok(RawToken::Minus) => TokenKind::Minus,
                Ok(RawToken::Star) => TokenKind::Star,
                Ok(RawToken::Slash) => TokenKind::Slash,
                Ok(RawToken::Percent) => TokenKind::Percent,
                Ok(RawToken::Amp) => TokenKind::Amp,
                Ok(RawToken::Pipe) => TokenKind::Pipe,
                Ok(RawToken::Caret) => TokenKind::Caret,
                Ok(RawToken::Assign) => TokenKind::Assign,

                Ok(RawToken::LParen) => TokenKind::LParen,
                Ok(RawToken::RParen) => TokenKind::RParen,
                Ok(RawToken::LBracket) => TokenKind::LBracket,
                Ok(RawToken::RBracket) => TokenKind::RBracket,
                Ok(RawToken::LBrace) => TokenKind::LBrace,
                Ok(RawToken::RBrace) => TokenKind::RBrace,
                Ok(RawToken::Comma) => TokenKind::Comma,
                Ok(RawToken::Dot) => TokenKind::Dot,
                Ok(RawToken::Colon) => TokenKind::Colon,
                Ok(RawToken::Semicolon) => TokenKind::Semicolon,

                Ok(RawToken::Int(s)) => TokenKind::Int(s),
                Ok(RawToken::Float(s)) => TokenKind::Float(s),
                Ok(RawToken::String(s)) => TokenKind::String(s),
                Ok(RawToken::Char(s)) => TokenKind::Char(s),
                Ok(RawToken::Ident(s)) => TokenKind::Ident(s),

                Err(_) => {
                    let text = lex.slice();
                    let message = if text.starts_with('"') || text.starts_with('`') {
                        "unterminated string literal".to_string()
                    } else if text.starts_with("/*") {
                        "unterminated block comment".to_string()
                    } else {
                        format!("unexpected character {text:?}")
                    };
                    return Err(LexError { message, span });
                }
            };

            tokens.push(Token { kind, span });
        }

        // A file that does not end in a newline still terminates its last statement.
        insert_semicolon(&mut tokens, self.src.len());

        tokens.push(Token {
            kind: TokenKind::Eof,
            span: span_between(self.src.len(), self.src.len()),
        });

        Ok(tokens)
    }
}

fn insert_semicolon(tokens: &mut Vec<Token>, at: usize) {
    if tokens.last().is_some_and(|t| t.kind.ends_statement()) {
        tokens.push(Token {
            kind: TokenKind::Semicolon,
            span: span_between(at, at),
        });
    }
}
