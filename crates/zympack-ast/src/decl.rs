//! Function and class definitions shared by declarations and expressions

use super::*;
use std::fmt;

/// Function declaration or expression
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Option<Node<Ident>>,
    pub params: Vec<Param>,
    pub body: Node<BlockStmt>,
    pub is_async: bool,
    pub is_generator: bool,
}

/// Function parameter. Defaults are expressed as `Pattern::Assignment`.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub pattern: Node<Pattern>,
    pub is_rest: bool,
}

/// Class declaration or expression
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: Option<Node<Ident>>,
    pub extends: Option<Box<Node<Expr>>>,
    pub members: Vec<ClassMember>,
}

/// Class member
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    /// Constructor
    Constructor(Box<Function>),

    /// Method, getter or setter
    Method {
        key: PropertyName,
        kind: MethodKind,
        function: Box<Function>,
        is_static: bool,
    },

    /// Field: `name = value;`
    Property {
        key: PropertyName,
        value: Option<Node<Expr>>,
        is_static: bool,
    },

    /// Static initialization block: `static { ... }`
    StaticBlock(Node<BlockStmt>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Method,
    Getter,
    Setter,
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodKind::Method => Ok(()),
            MethodKind::Getter => write!(f, "get"),
            MethodKind::Setter => write!(f, "set"),
        }
    }
}
