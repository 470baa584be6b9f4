#![forbid(unsafe_code)]

//! Generic syntax tree for the Go-subset host grammar SMTL sources are written in.
//!
//! The tree is deliberately wider than SMTL itself: it can represent assignments,
//! control flow, string literals and composite types so that later stages can
//! reject them with a precise diagnostic instead of a syntax error.

use std::fmt;

use miette::SourceSpan;

pub type Span = SourceSpan;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spanned<T> {
    pub span: Span,
    pub node: T,
}

impl<T> Spanned<T> {
    pub fn new(span: Span, node: T) -> Self {
        Self { span, node }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanned<U> {
        Spanned {
            span: self.span,
            node: f(self.node),
        }
    }
}

pub fn span(start: usize, len: usize) -> Span {
    SourceSpan::new(start.into(), len)
}

pub fn span_between(start: usize, end: usize) -> Span {
    debug_assert!(end >= start);
    span(start, end - start)
}

/// Smallest span covering both `a` and `b`.
pub fn join(a: Span, b: Span) -> Span {
    let a0: usize = a.offset();
    let b0: usize = b.offset();
    let start = a0.min(b0);
    let end = (a0 + a.len()).max(b0 + b.len());
    span_between(start, end)
}

pub type Ident = Spanned<String>;

/// A parsed source file: `package <name>` followed by top-level declarations.
#[derive(Clone, Debug, PartialEq)]
pub struct File {
    pub span: Span,
    pub package: Ident,
    pub decls: Vec<Decl>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Decl {
    Import(ImportDecl),
    Func(FuncDecl),
    Gen(GenDecl),
}

impl Decl {
    pub fn span(&self) -> Span {
        match self {
            Decl::Import(d) => d.span,
            Decl::Func(d) => d.span,
            Decl::Gen(d) => d.span,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportDecl {
    pub span: Span,
    pub paths: Vec<Spanned<String>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FuncDecl {
    pub span: Span,
    pub name: Ident,
    pub params: Vec<Field>,
    pub results: Vec<Field>,
    /// `None` for a declaration without a body (`func f()`).
    pub body: Option<Block>,
}

/// A parameter or result group: `a, b int` or an unnamed `int`.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub span: Span,
    pub names: Vec<Ident>,
    pub ty: TypeExpr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenKind {
    Var,
    Const,
    Type,
}

impl GenKind {
    pub fn keyword(self) -> &'static str {
        match self {
            GenKind::Var => "var",
            GenKind::Const => "const",
            GenKind::Type => "type",
        }
    }
}

/// `var`/`const`/`type` declaration, either a single spec or a parenthesized group.
#[derive(Clone, Debug, PartialEq)]
pub struct GenDecl {
    pub span: Span,
    pub kind: GenKind,
    pub grouped: bool,
    pub specs: Vec<Spec>,
}

/// One line of a general declaration: `a, b int = 1, 2`.
#[derive(Clone, Debug, PartialEq)]
pub struct Spec {
    pub span: Span,
    pub names: Vec<Ident>,
    pub ty: Option<TypeExpr>,
    pub values: Vec<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeExpr {
    pub span: Span,
    pub kind: TypeKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypeKind {
    Named {
        package: Option<Ident>,
        name: Ident,
    },
    Array {
        len: Box<Expr>,
        elem: Box<TypeExpr>,
    },
    Slice {
        elem: Box<TypeExpr>,
    },
    Pointer {
        elem: Box<TypeExpr>,
    },
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
}

impl TypeKind {
    pub fn describe(&self) -> &'static str {
        match self {
            TypeKind::Named { .. } => "named type",
            TypeKind::Array { .. } => "array type",
            TypeKind::Slice { .. } => "slice type",
            TypeKind::Pointer { .. } => "pointer type",
            TypeKind::Map { .. } => "map type",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub span: Span,
    pub stmts: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub span: Span,
    pub kind: StmtKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    Decl(GenDecl),
    Expr(Expr),
    Assign {
        lhs: Vec<Expr>,
        op: AssignOp,
        rhs: Vec<Expr>,
    },
    IncDec {
        target: Expr,
        increment: bool,
    },
    Return(Vec<Expr>),
    Branch(BranchKind),
    If(IfStmt),
    For(ForStmt),
    Block(Block),
    Empty,
}

impl StmtKind {
    pub fn describe(&self) -> &'static str {
        match self {
            StmtKind::Decl(d) => match d.kind {
                GenKind::Var => "variable declaration",
                GenKind::Const => "constant declaration",
                GenKind::Type => "type declaration",
            },
            StmtKind::Expr(_) => "expression statement",
            StmtKind::Assign { op: AssignOp::Define, .. } => "short variable declaration",
            StmtKind::Assign { .. } => "assignment",
            StmtKind::IncDec { .. } => "increment/decrement statement",
            StmtKind::Return(_) => "return statement",
            StmtKind::Branch(BranchKind::Break) => "break statement",
            StmtKind::Branch(BranchKind::Continue) => "continue statement",
            StmtKind::If(_) => "if statement",
            StmtKind::For(_) => "for statement",
            StmtKind::Block(_) => "block",
            StmtKind::Empty => "empty statement",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchKind {
    Break,
    Continue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Define,
    Add,
    Sub,
    Mul,
    Quo,
    Rem,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Define => ":=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Quo => "/=",
            AssignOp::Rem => "%=",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Expr,
    pub then_block: Block,
    /// Either a `Block` or a nested `If` statement.
    pub else_branch: Option<Box<Stmt>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub post: Option<Box<Stmt>>,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub span: Span,
    pub kind: ExprKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Ident(Ident),
    BasicLit(BasicLit),
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `base.member`
    Selector {
        base: Box<Expr>,
        member: Ident,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    Paren(Box<Expr>),
}

impl ExprKind {
    pub fn describe(&self) -> &'static str {
        match self {
            ExprKind::Ident(_) => "identifier",
            ExprKind::BasicLit(lit) => match lit.kind {
                LitKind::Int => "integer literal",
                LitKind::Float => "floating-point literal",
                LitKind::String => "string literal",
                LitKind::Char => "rune literal",
            },
            ExprKind::Unary { .. } => "unary expression",
            ExprKind::Binary { .. } => "binary expression",
            ExprKind::Call { .. } => "call expression",
            ExprKind::Selector { .. } => "selector expression",
            ExprKind::Index { .. } => "index expression",
            ExprKind::Paren(_) => "parenthesized expression",
        }
    }
}

/// A literal as written in the source. `value` keeps the raw text (quotes included
/// for strings and runes), mirroring how the host grammar's scanner reports it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicLit {
    pub kind: LitKind,
    pub value: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    String,
    Char,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Pos,
    /// Bitwise complement `^x`.
    Xor,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::Xor => "^",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Quo,
    Rem,

    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,

    LAnd,
    LOr,

    Eql,
    Neq,
    Lss,
    Leq,
    Gtr,
    Geq,
}

impl BinOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Quo => "/",
            BinOp::Rem => "%",
            BinOp::And => "&",
            BinOp::Or => "|",
            BinOp::Xor => "^",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::AndNot => "&^",
            BinOp::LAnd => "&&",
            BinOp::LOr => "||",
            BinOp::Eql => "==",
            BinOp::Neq => "!=",
            BinOp::Lss => "<",
            BinOp::Leq => "<=",
            BinOp::Gtr => ">",
            BinOp::Geq => ">=",
        }
    }

    /// Binding strength following the host grammar (higher binds tighter).
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::LOr => 1,
            BinOp::LAnd => 2,
            BinOp::Eql | BinOp::Neq | BinOp::Lss | BinOp::Leq | BinOp::Gtr | BinOp::Geq => 3,
            BinOp::Add | BinOp::Sub | BinOp::Or | BinOp::Xor => 4,
            BinOp::Mul | BinOp::Quo | BinOp::Rem | BinOp::Shl | BinOp::Shr | BinOp::And | BinOp::AndNot => 5,
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_covers_both_spans_in_either_order() {
        let a = span(4, 2);
        let b = span(10, 3);
        assert_eq!(join(a, b), span_between(4, 13));
        assert_eq!(join(b, a), span_between(4, 13));
    }

    #[test]
    fn comparison_binds_looser_than_arithmetic() {
        assert!(BinOp::Eql.precedence() < BinOp::Add.precedence());
        assert!(BinOp::Add.precedence() < BinOp::Mul.precedence());
        assert!(BinOp::LOr.precedence() < BinOp::LAnd.precedence());
    }
}
