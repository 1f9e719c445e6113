//! Root node definitions for the AST

use super::*;

/// Root AST node - represents a complete module source file
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// `#!...` line at the very start of the file, without the newline
    pub hashbang: Option<String>,
    pub body: Vec<Node<Stmt>>,
    pub span: Span,
}

impl Program {
    pub fn new(body: Vec<Node<Stmt>>, span: Span) -> Self {
        Self {
            hashbang: None,
            body,
            span,
        }
    }
}
