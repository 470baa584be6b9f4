#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use smtl_ast::Span;

use crate::error::CompileError;
use crate::term::{Sort, Term};

#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub sort: Sort,
    pub term: Term,
    /// Where the variable was declared.
    pub span: Span,
}

/// Declared variables keyed by name; iteration is lexicographic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SymbolTable {
    symbols: BTreeMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: &str, sort: Sort, span: Span) -> Result<&Symbol, CompileError> {
        if let Some(prev) = self.symbols.get(name) {
            return Err(CompileError::DuplicateDeclaration {
                name: name.to_string(),
                span,
                previous: prev.span,
            });
        }
        let symbol = Symbol {
            name: name.to_string(),
            sort,
            term: Term::constant(name, sort),
            span,
        };
        Ok(self.symbols.entry(name.to_string()).or_insert(symbol))
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use smtl_ast::span;

    #[test]
    fn iteration_is_lexicographic() {
        let mut table = SymbolTable::new();
        for (i, name) in ["b", "a", "c"].into_iter().enumerate() {
            table.declare(name, Sort::Int, span(i, 1)).unwrap();
        }
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn redeclaration_points_at_both_sites() {
        let mut table = SymbolTable::new();
        table.declare("x", Sort::Int, span(4, 1)).unwrap();
        let err = table.declare("x", Sort::Bool, span(20, 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateDeclaration);
        let CompileError::DuplicateDeclaration { previous, span: at, .. } = err else {
            unreachable!();
        };
        assert_eq!(previous.offset(), 4);
        assert_eq!(at.offset(), 20);
        assert_eq!(table.lookup("x").map(|s| s.sort), Some(Sort::Int));
    }
}
