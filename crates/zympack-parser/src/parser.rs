//! Core Parser struct and program-level parsing

use super::*;

/// Recursive descent parser for script-mode JavaScript
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) current: usize,
    /// Set while parsing a `for (...)` head, where `in` is not an operator.
    pub(crate) no_in: bool,
    /// Current statement, expression and pattern nesting.
    pub(crate) depth: usize,
}

/// Deepest nesting accepted before parsing gives up with an error.
pub const MAX_NESTING_DEPTH: usize = 128;

impl Parser {
    /// Creates a new parser from a token stream
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            current: 0,
            no_in: false,
            depth: 0,
        }
    }

    /// Parses a complete program
    pub fn parse_program(&mut self) -> Result<Program, Vec<ParseError>> {
        let start_span = self.current_token().span;

        let hashbang = if self.check(TokenKind::Hashbang) {
            Some(self.advance().value.clone())
        } else {
            None
        };

        let mut body = Vec::new();
        let mut errors = Vec::new();

        while !self.is_at_end() {
            match self.parse_statement() {
                Ok(stmt) => body.push(stmt),
                Err(err) => {
                    errors.push(err);
                    self.synchronize();
                }
            }
        }

        // A lexer error at the very end never reaches a statement
        if let Some(token) = self.tokens.iter().find(|t| t.kind == TokenKind::Error) {
            if errors.is_empty() {
                errors.push(ParseError::new(token.value.clone(), token.span));
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let end_span = body.last().map_or(start_span, |stmt| stmt.span);
        Ok(Program {
            hashbang,
            body,
            span: start_span.merge(&end_span),
        })
    }

    /// Parses a single expression that must span all tokens.
    pub fn parse_standalone_expression(&mut self) -> ParseResult<Node<Expr>> {
        let expr = self.parse_expression()?;
        if !self.is_at_end() {
            return Err(self.unexpected("end of expression"));
        }
        Ok(expr)
    }
}
