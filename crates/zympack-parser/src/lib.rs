//! # Zympack Parser
//!
//! Recursive descent parser for script-mode JavaScript (CommonJS modules).
//! Uses Pratt parsing for expressions with proper operator precedence, and
//! rejects ES module `import`/`export` declarations.

use zympack_ast::*;
use zympack_lexer::{cook_string, Lexer, Token, TokenKind};

// Module declarations
mod error;
mod parser;
mod expr;
mod stmt;
mod decl;
mod pattern;
mod helpers;

// Re-export public types
pub use error::{ParseError, ParseResult};
pub use parser::{Parser, MAX_NESTING_DEPTH};

/// Lexes and parses a module source.
pub fn parse(source: &str) -> Result<Program, Vec<ParseError>> {
    parse_with_file_id(source, 0)
}

pub fn parse_with_file_id(source: &str, file_id: usize) -> Result<Program, Vec<ParseError>> {
    let tokens = Lexer::with_file_id(source, file_id).tokenize();
    Parser::new(tokens).parse_program()
}

// =============================================================================
// Tests
// =============================================================================
