#![forbid(unsafe_code)]

use smtl_ast::Span;

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Keywords
    KwPackage,
    KwImport,
    KwFunc,
    KwVar,
    KwConst,
    KwType,
    KwReturn,
    KwIf,
    KwElse,
    KwFor,
    KwBreak,
    KwContinue,
    KwMap,

    // Operators / punctuation
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,
    AmpCaret,

    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,

    AndAnd,
    OrOr,
    PlusPlus,
    MinusMinus,

    EqEq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    Bang,

    Assign,
    Define,

    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Colon,

    /// Explicit `;` or one inserted at a line break.
    Semicolon,
    Eof,

    // Literals / identifiers (raw source text)
    Ident(String),
    Int(String),
    Float(String),
    String(String),
    Char(String),
}

impl TokenKind {
    /// Whether a line break directly after this token terminates the statement.
    pub(crate) fn ends_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Ident(_)
                | TokenKind::Int(_)
                | TokenKind::Float(_)
                | TokenKind::String(_)
                | TokenKind::Char(_)
                | TokenKind::KwReturn
                | TokenKind::KwBreak
                | TokenKind::KwContinue
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
        )
    }

    /// Human-readable name used in "expected X, found Y" messages.
    pub fn describe(&self) -> String {
        let fixed = match self {
            TokenKind::KwPackage => "`package`",
            TokenKind::KwImport => "`import`",
            TokenKind::KwFunc => "`func`",
            TokenKind::KwVar => "`var`",
            TokenKind::KwConst => "`const`",
            TokenKind::KwType => "`type`",
            TokenKind::KwReturn => "`return`",
            TokenKind::KwIf => "`if`",
            TokenKind::KwElse => "`else`",
            TokenKind::KwFor => "`for`",
            TokenKind::KwBreak => "`break`",
            TokenKind::KwContinue => "`continue`",
            TokenKind::KwMap => "`map`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::Amp => "`&`",
            TokenKind::Pipe => "`|`",
            TokenKind::Caret => "`^`",
            TokenKind::Shl => "`<<`",
            TokenKind::Shr => "`>>`",
            TokenKind::AmpCaret => "`&^`",
            TokenKind::PlusEq => "`+=`",
            TokenKind::MinusEq => "`-=`",
            TokenKind::StarEq => "`*=`",
            TokenKind::SlashEq => "`/=`",
            TokenKind::PercentEq => "`%=`",
            TokenKind::AndAnd => "`&&`",
            TokenKind::OrOr => "`||`",
            TokenKind::PlusPlus => "`++`",
            TokenKind::MinusMinus => "`--`",
            TokenKind::EqEq => "`==`",
            TokenKind::Neq => "`!=`",
            TokenKind::Lt => "`<`",
            TokenKind::Le => "`<=`",
            TokenKind::Gt => "`>`",
            TokenKind::Ge => "`>=`",
            TokenKind::Bang => "`!`",
            TokenKind::Assign => "`=`",
            TokenKind::Define => "`:=`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::Dot => "`.`",
            TokenKind::Colon => "`:`",
            TokenKind::Semicolon => "`;` or newline",
            TokenKind::Eof => "end of input",
            TokenKind::Ident(name) if !name.is_empty() => return format!("identifier `{name}`"),
            TokenKind::Ident(_) => "identifier",
            TokenKind::Int(text) | TokenKind::Float(text) | TokenKind::String(text) | TokenKind::Char(text) => {
                return format!("literal {text}");
            }
        };
        fixed.to_string()
    }
}
