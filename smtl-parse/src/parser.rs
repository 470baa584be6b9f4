#![forbid(unsafe_code)]

use std::mem;

use smtl_ast::{
    join, span_between, AssignOp, BasicLit, BinOp, Block, BranchKind, Decl, Expr, ExprKind, Field,
    File, ForStmt, FuncDecl, GenDecl, GenKind, Ident, IfStmt, ImportDecl, LitKind, Span, Spanned,
    Spec, Stmt, StmtKind, TypeExpr, TypeKind, UnaryOp,
};
use smtl_lex::{Token, TokenKind};

use crate::error::ParseError;

pub struct Parser<'a> {
    tokens: &'a [Token],
    idx: usize,
}

/// One entry of a parameter list before names and types are paired up.
enum ParamEntry {
    Named(Ident, TypeExpr),
    Bare(TypeExpr),
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, idx: 0 }
    }

    pub fn parse_file(&mut self) -> Result<File, ParseError> {
        let kw = self.expect(TokenKind::KwPackage)?;
        let package = self.expect_ident()?;
        self.expect_semi()?;

        let mut decls = Vec::new();
        while !self.at(TokenKind::Eof) {
            if self.at(TokenKind::Semicolon) {
                self.next();
                continue;
            }
            let decl = match self.peek_kind() {
                Some(TokenKind::KwImport) => Decl::Import(self.parse_import_decl()?),
                Some(TokenKind::KwFunc) => Decl::Func(self.parse_func_decl()?),
                Some(TokenKind::KwVar | TokenKind::KwConst | TokenKind::KwType) => {
                    Decl::Gen(self.parse_gen_decl()?)
                }
                _ => {
                    return Err(ParseError {
                        message: "expected declaration".to_string(),
                        span: self.current_span(),
                    });
                }
            };
            decls.push(decl);
            self.expect_semi()?;
        }

        let end = self.current_span();
        Ok(File {
            span: join(kw.span, end),
            package,
            decls,
        })
    }

    fn parse_import_decl(&mut self) -> Result<ImportDecl, ParseError> {
        let kw = self.expect(TokenKind::KwImport)?;
        let mut paths = Vec::new();
        let end = if self.at(TokenKind::LParen) {
            self.next();
            while !self.at(TokenKind::RParen) {
                paths.push(self.parse_import_spec()?);
                if !self.at(TokenKind::RParen) {
                    self.expect(TokenKind::Semicolon)?;
                }
            }
            self.expect(TokenKind::RParen)?.span
        } else {
            let path = self.parse_import_spec()?;
            let span = path.span;
            paths.push(path);
            span
        };
        Ok(ImportDecl {
            span: join(kw.span, end),
            paths,
        })
    }

    fn parse_import_spec(&mut self) -> Result<Spanned<String>, ParseError> {
        // Optional alias: `import z "math"` or `import . "math"`.
        if self.at(TokenKind::Ident(String::new())) || self.at(TokenKind::Dot) {
            self.next();
        }
        let tok = self.expect_any()?;
        match tok.kind {
            TokenKind::String(path) => Ok(Spanned::new(tok.span, path)),
            _ => Err(ParseError {
                message: "expected import path".to_string(),
                span: tok.span,
            }),
        }
    }

    fn parse_func_decl(&mut self) -> Result<FuncDecl, ParseError> {
        let kw = self.expect(TokenKind::KwFunc)?;
        if self.at(TokenKind::LParen) {
            return Err(ParseError {
                message: "method declarations are not supported".to_string(),
                span: self.current_span(),
            });
        }
        let name = self.expect_ident()?;
        let (params, mut end) = self.parse_params()?;

        let results = if self.at(TokenKind::LParen) {
            let (results, rp) = self.parse_params()?;
            end = rp;
            results
        } else if self.starts_type() {
            let ty = self.parse_type()?;
            end = ty.span;
            vec![Field {
                span: ty.span,
                names: Vec::new(),
                ty,
            }]
        } else {
            Vec::new()
        };

        let body = if self.at(TokenKind::LBrace) {
            let block = self.parse_block()?;
            end = block.span;
            Some(block)
        } else {
            None
        };

        Ok(FuncDecl {
            span: join(kw.span, end),
            name,
            params,
            results,
            body,
        })
    }

    /// Parses `( ... )` and returns the fields plus the span of the closing paren.
    fn parse_params(&mut self) -> Result<(Vec<Field>, Span), ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut entries = Vec::new();
        while !self.at(TokenKind::RParen) {
            let named = matches!(self.peek_kind(), Some(TokenKind::Ident(_)))
                && !matches!(
                    self.peek_kind_n(1),
                    Some(TokenKind::Comma | TokenKind::RParen | TokenKind::Dot)
                );
            if named {
                let name = self.expect_ident()?;
                let ty = self.parse_type()?;
                entries.push(ParamEntry::Named(name, ty));
            } else {
                entries.push(ParamEntry::Bare(self.parse_type()?));
            }
            if !self.at(TokenKind::RParen) {
                self.expect(TokenKind::Comma)?;
            }
        }
        let rp = self.expect(TokenKind::RParen)?;
        Ok((group_params(entries)?, rp.span))
    }

    fn parse_gen_decl(&mut self) -> Result<GenDecl, ParseError> {
        let kw = self.expect_any()?;
        let kind = match kw.kind {
            TokenKind::KwVar => GenKind::Var,
            TokenKind::KwConst => GenKind::Const,
            TokenKind::KwType => GenKind::Type,
            _ => {
                return Err(ParseError {
                    message: "expected `var`, `const` or `type`".to_string(),
                    span: kw.span,
                });
            }
        };

        if self.at(TokenKind::LParen) {
            self.next();
            let mut specs = Vec::new();
            while !self.at(TokenKind::RParen) {
                specs.push(self.parse_spec(kind)?);
                if !self.at(TokenKind::RParen) {
                    self.expect(TokenKind::Semicolon)?;
                }
            }
            let rp = self.expect(TokenKind::RParen)?;
            return Ok(GenDecl {
                span: join(kw.span, rp.span),
                kind,
                grouped: true,
                specs,
            });
        }

        let spec = self.parse_spec(kind)?;
        Ok(GenDecl {
            span: join(kw.span, spec.span),
            kind,
            grouped: false,
            specs: vec![spec],
        })
    }

    fn parse_spec(&mut self, kind: GenKind) -> Result<Spec, ParseError> {
        if kind == GenKind::Type {
            let name = self.expect_ident()?;
            if self.at(TokenKind::Assign) {
                self.next();
            }
            let ty = self.parse_type()?;
            return Ok(Spec {
                span: join(name.span, ty.span),
                names: vec![name],
                ty: Some(ty),
                values: Vec::new(),
            });
        }

        let mut names = vec![self.expect_ident()?];
        while self.at(TokenKind::Comma) {
            self.next();
            names.push(self.expect_ident()?);
        }
        let mut end = names[names.len() - 1].span;

        let ty = if self.starts_type() {
            let ty = self.parse_type()?;
            end = ty.span;
            Some(ty)
        } else {
            None
        };

        let values = if self.at(TokenKind::Assign) {
            self.next();
            let values = self.parse_expr_list()?;
            if let Some(last) = values.last() {
                end = last.span;
            }
            values
        } else {
            Vec::new()
        };

        if ty.is_none() && values.is_empty() && kind == GenKind::Var {
            return Err(ParseError {
                message: "expected type or initializer in variable declaration".to_string(),
                span: self.current_span(),
            });
        }

        Ok(Spec {
            span: join(names[0].span, end),
            names,
            ty,
            values,
        })
    }

    fn starts_type(&self) -> bool {
        matches!(
            self.peek_kind(),
            Some(
                TokenKind::Ident(_)
                    | TokenKind::LBracket
                    | TokenKind::Star
                    | TokenKind::KwMap
                    | TokenKind::LParen
            )
        )
    }

    fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        let tok = self.expect_any()?;
        match tok.kind {
            TokenKind::Ident(name) => {
                let first = Ident {
                    span: tok.span,
                    node: name,
                };
                if self.at(TokenKind::Dot) {
                    self.next();
                    let name = self.expect_ident()?;
                    return Ok(TypeExpr {
                        span: join(first.span, name.span),
                        kind: TypeKind::Named {
                            package: Some(first),
                            name,
                        },
                    });
                }
                Ok(TypeExpr {
                    span: first.span,
                    kind: TypeKind::Named {
                        package: None,
                        name: first,
                    },
                })
            }
            TokenKind::LBracket => {
                if self.at(TokenKind::RBracket) {
                    self.next();
                    let elem = self.parse_type()?;
                    return Ok(TypeExpr {
                        span: join(tok.span, elem.span),
                        kind: TypeKind::Slice {
                            elem: Box::new(elem),
                        },
                    });
                }
                let len = self.parse_expr()?;
                self.expect(TokenKind::RBracket)?;
                let elem = self.parse_type()?;
                Ok(TypeExpr {
                    span: join(tok.span, elem.span),
                    kind: TypeKind::Array {
                        len: Box::new(len),
                        elem: Box::new(elem),
                    },
                })
            }
            TokenKind::Star => {
                let elem = self.parse_type()?;
                Ok(TypeExpr {
                    span: join(tok.span, elem.span),
                    kind: TypeKind::Pointer {
                        elem: Box::new(elem),
                    },
                })
            }
            TokenKind::KwMap => {
                self.expect(TokenKind::LBracket)?;
                let key = self.parse_type()?;
                self.expect(TokenKind::RBracket)?;
                let value = self.parse_type()?;
                Ok(TypeExpr {
                    span: join(tok.span, value.span),
                    kind: TypeKind::Map {
                        key: Box::new(key),
                        value: Box::new(value),
                    },
                })
            }
            TokenKind::LParen => {
                let inner = self.parse_type()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            _ => Err(ParseError {
                message: "expected type".to_string(),
                span: tok.span,
            }),
        }
    }

    fn parse_block(&mut self) -> Result<Block, ParseError> {
        let lb = self.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.at(TokenKind::RBrace) {
            if self.at(TokenKind::Eof) {
                return Err(ParseError {
                    message: "unclosed block".to_string(),
                    span: lb.span,
                });
            }
            if self.at(TokenKind::Semicolon) {
                let tok = self.expect_any()?;
                // Line-end semicolons are separators; an explicit one is a statement.
                if tok.span.len() > 0 {
                    stmts.push(Stmt {
                        span: tok.span,
                        kind: StmtKind::Empty,
                    });
                }
                continue;
            }
            stmts.push(self.parse_stmt()?);
            if !self.at(TokenKind::RBrace) {
                self.expect(TokenKind::Semicolon)?;
            }
        }
        let rb = self.expect(TokenKind::RBrace)?;
        Ok(Block {
            span: join(lb.span, rb.span),
            stmts,
        })
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::KwVar | TokenKind::KwConst | TokenKind::KwType) => {
                let decl = self.parse_gen_decl()?;
                Ok(Stmt {
                    span: decl.span,
                    kind: StmtKind::Decl(decl),
                })
            }
            Some(TokenKind::KwReturn) => {
                let kw = self.expect_any()?;
                if self.at(TokenKind::Semicolon) || self.at(TokenKind::RBrace) {
                    return Ok(Stmt {
                        span: kw.span,
                        kind: StmtKind::Return(Vec::new()),
                    });
                }
                let values = self.parse_expr_list()?;
                let end = values.last().map_or(kw.span, |e| e.span);
                Ok(Stmt {
                    span: join(kw.span, end),
                    kind: StmtKind::Return(values),
                })
            }
            Some(TokenKind::KwBreak | TokenKind::KwContinue) => {
                let kw = self.expect_any()?;
                let kind = if kw.kind == TokenKind::KwBreak {
                    BranchKind::Break
                } else {
                    BranchKind::Continue
                };
                Ok(Stmt {
                    span: kw.span,
                    kind: StmtKind::Branch(kind),
                })
            }
            Some(TokenKind::KwIf) => self.parse_if_stmt(),
            Some(TokenKind::KwFor) => self.parse_for_stmt(),
            Some(TokenKind::LBrace) => {
                let block = self.parse_block()?;
                Ok(Stmt {
                    span: block.span,
                    kind: StmtKind::Block(block),
                })
            }
            _ => self.parse_simple_stmt(),
        }
    }

    fn parse_simple_stmt(&mut self) -> Result<Stmt, ParseError> {
        let lhs = self.parse_expr_list()?;
        let start = lhs[0].span;

        let assign_op = match self.peek_kind() {
            Some(TokenKind::Assign) => Some(AssignOp::Assign),
            Some(TokenKind::Define) => Some(AssignOp::Define),
            Some(TokenKind::PlusEq) => Some(AssignOp::Add),
            Some(TokenKind::MinusEq) => Some(AssignOp::Sub),
            Some(TokenKind::StarEq) => Some(AssignOp::Mul),
            Some(TokenKind::SlashEq) => Some(AssignOp::Quo),
            Some(TokenKind::PercentEq) => Some(AssignOp::Rem),
            _ => None,
        };
        if let Some(op) = assign_op {
            self.next();
            let rhs = self.parse_expr_list()?;
            let end = rhs.last().map_or(start, |e| e.span);
            return Ok(Stmt {
                span: join(start, end),
                kind: StmtKind::Assign { lhs, op, rhs },
            });
        }

        if self.at(TokenKind::PlusPlus) || self.at(TokenKind::MinusMinus) {
            let tok = self.expect_any()?;
            let target = single_expr(lhs, tok.span)?;
            return Ok(Stmt {
                span: join(start, tok.span),
                kind: StmtKind::IncDec {
                    target,
                    increment: tok.kind == TokenKind::PlusPlus,
                },
            });
        }

        let expr = single_expr(lhs, self.current_span())?;
        Ok(Stmt {
            span: expr.span,
            kind: StmtKind::Expr(expr),
        })
    }

    fn parse_if_stmt(&mut self) -> Result<Stmt, ParseError> {
        let kw = self.expect(TokenKind::KwIf)?;
        let first = self.parse_simple_stmt()?;
        let (init, cond) = if self.at(TokenKind::Semicolon) {
            self.next();
            (Some(Box::new(first)), self.parse_expr()?)
        } else {
            (None, stmt_as_expr(first, "if condition")?)
        };
        let then_block = self.parse_block()?;
        let mut end = then_block.span;

        let else_branch = if self.at(TokenKind::KwElse) {
            self.next();
            let stmt = if self.at(TokenKind::KwIf) {
                self.parse_if_stmt()?
            } else {
                let block = self.parse_block()?;
                Stmt {
                    span: block.span,
                    kind: StmtKind::Block(block),
                }
            };
            end = stmt.span;
            Some(Box::new(stmt))
        } else {
            None
        };

        Ok(Stmt {
            span: join(kw.span, end),
            kind: StmtKind::If(IfStmt {
                init,
                cond,
                then_block,
                else_branch,
            }),
        })
    }

    fn parse_for_stmt(&mut self) -> Result<Stmt, ParseError> {
        let kw = self.expect(TokenKind::KwFor)?;
        let mut init = None;
        let mut cond = None;
        let mut post = None;

        if !self.at(TokenKind::LBrace) {
            let first = if self.at(TokenKind::Semicolon) {
                None
            } else {
                Some(self.parse_simple_stmt()?)
            };

            if self.at(TokenKind::Semicolon) {
                self.next();
                init = first.map(Box::new);
                if !self.at(TokenKind::Semicolon) {
                    cond = Some(self.parse_expr()?);
                }
                self.expect(TokenKind::Semicolon)?;
                if !self.at(TokenKind::LBrace) {
                    post = Some(Box::new(self.parse_simple_stmt()?));
                }
            } else if let Some(first) = first {
                cond = Some(stmt_as_expr(first, "for condition")?);
            }
        }

        let body = self.parse_block()?;
        Ok(Stmt {
            span: join(kw.span, body.span),
            kind: StmtKind::For(ForStmt {
                init,
                cond,
                post,
                body,
            }),
        })
    }

    fn parse_expr_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = vec![self.parse_expr()?];
        while self.at(TokenKind::Comma) {
            self.next();
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_expr(1)
    }

    /// Precedence climbing over the host grammar's five binary levels.
    fn parse_binary_expr(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary_expr()?;
        loop {
            let Some(op) = self.peek_kind().and_then(binary_op) else {
                break;
            };
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.next();
            let right = self.parse_binary_expr(prec + 1)?;
            let span = join(left.span, right.span);
            left = Expr {
                span,
                kind: ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
            };
        }
        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek_kind() {
            Some(TokenKind::Bang) => Some(UnaryOp::Not),
            Some(TokenKind::Minus) => Some(UnaryOp::Neg),
            Some(TokenKind::Plus) => Some(UnaryOp::Pos),
            Some(TokenKind::Caret) => Some(UnaryOp::Xor),
            Some(TokenKind::Star | TokenKind::Amp) => {
                return Err(ParseError {
                    message: "pointer operations are not supported".to_string(),
                    span: self.current_span(),
                });
            }
            _ => None,
        };
        let Some(op) = op else {
            return self.parse_postfix_expr();
        };
        let t = self.expect_any()?;
        let expr = self.parse_unary_expr()?;
        let span = join(t.span, expr.span);
        Ok(Expr {
            span,
            kind: ExprKind::Unary {
                op,
                expr: Box::new(expr),
            },
        })
    }

    fn parse_postfix_expr(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary_expr()?;
        loop {
            if self.at(TokenKind::Dot) {
                self.next();
                let member = self.expect_ident()?;
                let span = join(expr.span, member.span);
                expr = Expr {
                    span,
                    kind: ExprKind::Selector {
                        base: Box::new(expr),
                        member,
                    },
                };
                continue;
            }

            if self.at(TokenKind::LParen) {
                self.next();
                let mut args = Vec::new();
                while !self.at(TokenKind::RParen) {
                    args.push(self.parse_expr()?);
                    if !self.at(TokenKind::RParen) {
                        self.expect(TokenKind::Comma)?;
                    }
                }
                let rp = self.expect(TokenKind::RParen)?;
                let span = join(expr.span, rp.span);
                expr = Expr {
                    span,
                    kind: ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    },
                };
                continue;
            }

            if self.at(TokenKind::LBracket) {
                self.next();
                let index = self.parse_expr()?;
                let rb = self.expect(TokenKind::RBracket)?;
                let span = join(expr.span, rb.span);
                expr = Expr {
                    span,
                    kind: ExprKind::Index {
                        base: Box::new(expr),
                        index: Box::new(index),
                    },
                };
                continue;
            }

            break;
        }
        Ok(expr)
    }

    fn parse_primary_expr(&mut self) -> Result<Expr, ParseError> {
        let tok = self.expect_any()?;
        let lit = |kind: LitKind, value: String| ExprKind::BasicLit(BasicLit { kind, value });
        let kind = match tok.kind {
            TokenKind::Ident(name) => ExprKind::Ident(Ident {
                span: tok.span,
                node: name,
            }),
            TokenKind::Int(text) => lit(LitKind::Int, text),
            TokenKind::Float(text) => lit(LitKind::Float, text),
            TokenKind::String(text) => lit(LitKind::String, text),
            TokenKind::Char(text) => lit(LitKind::Char, text),
            TokenKind::LParen => {
                let inner = self.parse_expr()?;
                let rp = self.expect(TokenKind::RParen)?;
                return Ok(Expr {
                    span: join(tok.span, rp.span),
                    kind: ExprKind::Paren(Box::new(inner)),
                });
            }
            TokenKind::KwFunc => {
                return Err(ParseError {
                    message: "function literals are not supported".to_string(),
                    span: tok.span,
                });
            }
            _ => {
                return Err(ParseError {
                    message: "expected expression".to_string(),
                    span: tok.span,
                });
            }
        };
        Ok(Expr {
            span: tok.span,
            kind,
        })
    }

    /// Succeeds only when every token has been consumed.
    pub fn finish(&mut self) -> Result<(), ParseError> {
        if self.at(TokenKind::Semicolon) {
            self.next();
        }
        self.expect(TokenKind::Eof).map(|_| ())
    }

    /// A statement terminator: `;` (explicit or inserted) or end of input.
    fn expect_semi(&mut self) -> Result<(), ParseError> {
        if self.at(TokenKind::Eof) {
            return Ok(());
        }
        self.expect(TokenKind::Semicolon).map(|_| ())
    }

    fn expect_ident(&mut self) -> Result<Ident, ParseError> {
        let tok = self.expect_any()?;
        match tok.kind {
            TokenKind::Ident(name) => Ok(Ident {
                span: tok.span,
                node: name,
            }),
            _ => Err(ParseError {
                message: "expected identifier".to_string(),
                span: tok.span,
            }),
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        let tok = self.expect_any()?;
        if mem::discriminant(&tok.kind) == mem::discriminant(&expected) {
            Ok(tok)
        } else {
            Err(ParseError {
                message: format!("expected {}, found {}", expected.describe(), tok.kind.describe()),
                span: tok.span,
            })
        }
    }

    fn expect_any(&mut self) -> Result<Token, ParseError> {
        let span = self.current_span();
        self.next().ok_or_else(|| ParseError {
            message: "unexpected end of input".to_string(),
            span,
        })
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind()
            .is_some_and(|k| mem::discriminant(k) == mem::discriminant(&kind))
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.idx)?.clone();
        self.idx += 1;
        Some(tok)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.idx).map(|t| &t.kind)
    }

    fn peek_kind_n(&self, n: usize) -> Option<&TokenKind> {
        self.tokens.get(self.idx + n).map(|t| &t.kind)
    }

    fn current_span(&self) -> Span {
        self.tokens
            .get(self.idx)
            .or_else(|| self.tokens.last())
            .map_or(span_between(0, 0), |t| t.span)
    }
}

fn binary_op(kind: &TokenKind) -> Option<BinOp> {
    Some(match kind {
        TokenKind::Plus => BinOp::Add,
        TokenKind::Minus => BinOp::Sub,
        TokenKind::Star => BinOp::Mul,
        TokenKind::Slash => BinOp::Quo,
        TokenKind::Percent => BinOp::Rem,
        TokenKind::Amp => BinOp::And,
        TokenKind::Pipe => BinOp::Or,
        TokenKind::Caret => BinOp::Xor,
        TokenKind::Shl => BinOp::Shl,
        TokenKind::Shr => BinOp::Shr,
        TokenKind::AmpCaret => BinOp::AndNot,
        TokenKind::AndAnd => BinOp::LAnd,
        TokenKind::OrOr => BinOp::LOr,
        TokenKind::EqEq => BinOp::Eql,
        TokenKind::Neq => BinOp::Neq,
        TokenKind::Lt => BinOp::Lss,
        TokenKind::Le => BinOp::Leq,
        TokenKind::Gt => BinOp::Gtr,
        TokenKind::Ge => BinOp::Geq,
        _ => return None,
    })
}

/// Pairs `a, b int, c bool` style entries into fields. Without any named entry
/// every entry is an unnamed type.
fn group_params(entries: Vec<ParamEntry>) -> Result<Vec<Field>, ParseError> {
    let any_named = entries.iter().any(|e| matches!(e, ParamEntry::Named(..)));
    let mut fields = Vec::new();

    if !any_named {
        for entry in entries {
            if let ParamEntry::Bare(ty) = entry {
                fields.push(Field {
                    span: ty.span,
                    names: Vec::new(),
                    ty,
                });
            }
        }
        return Ok(fields);
    }

    let mut pending: Vec<Ident> = Vec::new();
    for entry in entries {
        match entry {
            ParamEntry::Bare(ty) => match ty.kind {
                TypeKind::Named {
                    package: None,
                    name,
                } => pending.push(name),
                _ => {
                    return Err(ParseError {
                        message: "mixed named and unnamed parameters".to_string(),
                        span: ty.span,
                    });
                }
            },
            ParamEntry::Named(name, ty) => {
                pending.push(name);
                let span = join(pending[0].span, ty.span);
                fields.push(Field {
                    span,
                    names: mem::take(&mut pending),
                    ty,
                });
            }
        }
    }

    if let Some(orphan) = pending.first() {
        return Err(ParseError {
            message: "mixed named and unnamed parameters".to_string(),
            span: orphan.span,
        });
    }
    Ok(fields)
}

fn single_expr(mut exprs: Vec<Expr>, at: Span) -> Result<Expr, ParseError> {
    if exprs.len() != 1 {
        return Err(ParseError {
            message: "expected assignment after expression list".to_string(),
            span: at,
        });
    }
    exprs.pop().ok_or_else(|| ParseError {
        message: "expected expression".to_string(),
        span: at,
    })
}

fn stmt_as_expr(stmt: Stmt, what: &str) -> Result<Expr, ParseError> {
    match stmt.kind {
        StmtKind::Expr(expr) => Ok(expr),
        _ => Err(ParseError {
            message: format!("expected expression as {what}"),
            span: stmt.span,
        }),
    }
}
