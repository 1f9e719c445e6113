//! Pattern parsing

use super::*;

impl Parser {
    pub(crate) fn parse_pattern(&mut self) -> ParseResult<Node<Pattern>> {
        self.nested(Self::parse_nested_pattern)
    }

    fn parse_nested_pattern(&mut self) -> ParseResult<Node<Pattern>> {
        let start = self.current_token().span;

        let pattern = match self.current_token().kind {
            TokenKind::LBracket => self.parse_array_pattern()?,
            TokenKind::LBrace => self.parse_object_pattern()?,
            TokenKind::Identifier => Pattern::Ident(self.parse_identifier()?),
            _ => return Err(self.unexpected("binding pattern")),
        };

        Ok(Node::new(pattern, start.merge(&self.previous_token().span)))
    }

    /// Parse a pattern that may have a default value (used in destructuring contexts)
    pub(crate) fn parse_pattern_with_default(&mut self) -> ParseResult<Node<Pattern>> {
        let pattern = self.parse_pattern()?;
        self.parse_pattern_default(pattern)
    }

    fn parse_pattern_default(&mut self, pattern: Node<Pattern>) -> ParseResult<Node<Pattern>> {
        if !self.check(TokenKind::Eq) {
            return Ok(pattern);
        }

        self.advance();
        let default = Box::new(self.allow_in(|p| p.parse_assignment())?);
        let span = pattern.span.merge(&default.span);
        Ok(Node::new(
            Pattern::Assignment {
                pattern: Box::new(pattern),
                default,
            },
            span,
        ))
    }

    pub(crate) fn parse_array_pattern(&mut self) -> ParseResult<Pattern> {
        self.consume(TokenKind::LBracket)?;
        let mut elements = Vec::new();
        let mut rest = None;

        while !self.check(TokenKind::RBracket) && !self.is_at_end() {
            if self.check(TokenKind::DotDotDot) {
                self.advance();
                rest = Some(Box::new(self.parse_pattern()?));
                break;
            } else if self.check(TokenKind::Comma) {
                elements.push(None);
                self.advance();
            } else {
                elements.push(Some(self.parse_pattern_with_default()?));
                if !self.check(TokenKind::RBracket) {
                    self.consume(TokenKind::Comma)?;
                }
            }
        }

        self.consume(TokenKind::RBracket)?;

        Ok(Pattern::Array { elements, rest })
    }

    pub(crate) fn parse_object_pattern(&mut self) -> ParseResult<Pattern> {
        self.consume(TokenKind::LBrace)?;
        let mut properties = Vec::new();
        let mut rest = None;

        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            if self.check(TokenKind::DotDotDot) {
                self.advance();
                rest = Some(Box::new(self.parse_pattern()?));
                break;
            }

            let key = self.parse_property_name()?;

            let (value, shorthand) = if self.check(TokenKind::Colon) {
                self.advance();
                (self.parse_pattern_with_default()?, false)
            } else {
                let PropertyName::Ident(ref ident) = key else {
                    return Err(self.error("Invalid object pattern shorthand".to_string()));
                };
                let binding = Node::new(Pattern::Ident(ident.clone()), ident.span);
                (self.parse_pattern_default(binding)?, true)
            };

            properties.push(ObjectPatternProperty {
                key,
                value,
                shorthand,
            });

            if !self.check(TokenKind::RBrace) {
                self.consume(TokenKind::Comma)?;
            }
        }

        self.consume(TokenKind::RBrace)?;

        Ok(Pattern::Object { properties, rest })
    }

    /// Reinterprets an already parsed expression as a binding target, as in
    /// the head of `for ([a, b] of pairs)`.
    pub(crate) fn expr_to_pattern(&self, expr: Node<Expr>) -> ParseResult<Node<Pattern>> {
        let span = expr.span;

        let pattern = match expr.value {
            Expr::Ident(ident) => Pattern::Ident(Node::new(ident, span)),
            Expr::Assignment {
                target,
                op: AssignmentOp::Assign,
                value,
            } => Pattern::Assignment {
                pattern: Box::new(self.expr_to_pattern(*target)?),
                default: value,
            },
            Expr::Array(items) => {
                let mut elements = Vec::new();
                let mut rest = None;
                let count = items.len();
                for (i, item) in items.into_iter().enumerate() {
                    match item {
                        Some(Node { value: Expr::Spread(inner), .. }) if i + 1 == count => {
                            rest = Some(Box::new(self.expr_to_pattern(*inner)?));
                        }
                        Some(element) => elements.push(Some(self.expr_to_pattern(element)?)),
                        None => elements.push(None),
                    }
                }
                Pattern::Array { elements, rest }
            }
            Expr::Object(props) => {
                let mut properties = Vec::new();
                let mut rest = None;
                for prop in props {
                    match prop {
                        ObjectProperty::Property {
                            key,
                            value,
                            shorthand,
                        } => properties.push(ObjectPatternProperty {
                            key,
                            value: self.expr_to_pattern(value)?,
                            shorthand,
                        }),
                        ObjectProperty::Spread(inner) => {
                            rest = Some(Box::new(self.expr_to_pattern(inner)?));
                        }
                        ObjectProperty::Method { .. } => {
                            return Err(ParseError::new("Invalid destructuring target", span));
                        }
                    }
                }
                Pattern::Object { properties, rest }
            }
            _ => return Err(ParseError::new("Invalid destructuring target", span)),
        };

        Ok(Node::new(pattern, span))
    }
}
