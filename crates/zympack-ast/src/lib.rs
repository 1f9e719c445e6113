//! # Zympack AST
//!
//! Abstract Syntax Tree definitions for the JavaScript modules zympack bundles.
//! Covers script-mode JavaScript: statements, expressions, functions, classes
//! and destructuring patterns. ES module declarations are not represented.

use std::fmt;

// =============================================================================
// Core Types (kept in lib.rs - used by all modules)
// =============================================================================

/// Source location information (byte offsets into the module text)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub file_id: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, file_id: usize) -> Self {
        Self { start, end, file_id }
    }

    /// A span for nodes that do not come from source text.
    pub fn synthetic() -> Self {
        Self::default()
    }

    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            file_id: self.file_id,
        }
    }

    /// Moves the span forward by `offset` bytes.
    pub fn shifted(&self, offset: usize) -> Span {
        Span {
            start: self.start + offset,
            end: self.end + offset,
            file_id: self.file_id,
        }
    }
}

/// AST node wrapper that includes span information
#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    pub span: Span,
    pub value: T,
}

impl<T> Node<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { span, value }
    }

    /// Wraps a value built by a transform rather than the parser.
    pub fn synthetic(value: T) -> Self {
        Self::new(value, Span::synthetic())
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Node<U> {
        Node {
            span: self.span,
            value: f(self.value),
        }
    }
}

/// Identifier. Private class names keep their leading `#`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    pub name: String,
}

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn is_private(&self) -> bool {
        self.name.starts_with('#')
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// =============================================================================
// Module Declarations
// =============================================================================

pub mod expr;
pub mod stmt;
pub mod decl;
pub mod module;
pub mod fold;

pub use expr::*;
pub use stmt::*;
pub use decl::*;
pub use module::*;
pub use fold::Fold;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_span() -> Span {
        Span::new(0, 0, 0)
    }

    #[test]
    fn test_span_merge_and_shift() {
        let a = Span::new(4, 8, 0);
        let b = Span::new(2, 6, 0);
        assert_eq!(a.merge(&b), Span::new(2, 8, 0));
        assert_eq!(a.shifted(10), Span::new(14, 18, 0));
    }

    #[test]
    fn test_expressions() {
        let literal = Expr::Literal(Literal::Number("42".to_string()));
        assert!(matches!(literal, Expr::Literal(Literal::Number(_))));

        let ident = Expr::Ident(Ident::new("x"));
        assert!(matches!(ident, Expr::Ident(_)));
    }

    #[test]
    fn test_binary_op() {
        assert_eq!(format!("{}", BinaryOp::Add), "+");
        assert_eq!(format!("{}", BinaryOp::StrictEq), "===");
        assert_eq!(format!("{}", BinaryOp::InstanceOf), "instanceof");
    }

    #[test]
    fn test_private_ident() {
        assert!(Ident::new("#count").is_private());
        assert!(!Ident::new("count").is_private());
    }

    #[test]
    fn test_string_literal_helper() {
        let lit = Literal::string("./b.js");
        match lit {
            Literal::String { value, raw } => {
                assert_eq!(value, "./b.js");
                assert!(raw.is_none());
            }
            other => panic!("Expected string literal, got {:?}", other),
        }
    }

    #[test]
    fn test_var_decl() {
        let decl = VarDecl {
            kind: VarDeclKind::Const,
            declarations: vec![VarDeclarator {
                pattern: Node::new(
                    Pattern::Ident(Node::new(Ident::new("x"), dummy_span())),
                    dummy_span(),
                ),
                init: Some(Node::new(
                    Expr::Literal(Literal::Number("10".to_string())),
                    dummy_span(),
                )),
            }],
        };

        assert_eq!(decl.kind, VarDeclKind::Const);
        assert_eq!(format!("{}", decl.kind), "const");
        assert_eq!(decl.declarations.len(), 1);
    }

    #[test]
    fn test_function_decl() {
        let func = Function {
            name: Some(Node::new(Ident::new("foo"), dummy_span())),
            params: vec![],
            body: Node::new(BlockStmt { stmts: vec![] }, dummy_span()),
            is_async: false,
            is_generator: false,
        };

        assert_eq!(func.name.as_ref().map(|n| n.value.name.as_str()), Some("foo"));
        assert!(!func.is_async);
    }
}
