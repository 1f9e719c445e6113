//! Expression parsing

use super::*;

impl Parser {
    /// Full expression, comma operator included.
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Node<Expr>> {
        let first = self.parse_assignment()?;
        if !self.check(TokenKind::Comma) {
            return Ok(first);
        }

        let start = first.span;
        let mut exprs = vec![first];
        while self.check(TokenKind::Comma) {
            self.advance();
            exprs.push(self.parse_assignment()?);
        }

        let span = start.merge(&self.previous_token().span);
        Ok(Node::new(Expr::Sequence(exprs), span))
    }

    /// Expression without a top-level comma: call arguments, initializers,
    /// array elements and property values.
    pub(crate) fn parse_assignment(&mut self) -> ParseResult<Node<Expr>> {
        self.parse_expression_with_precedence(0)
    }

    pub(crate) fn parse_expression_with_precedence(&mut self, min_precedence: u8) -> ParseResult<Node<Expr>> {
        self.nested(|p| p.parse_operators(min_precedence))
    }

    fn parse_operators(&mut self, min_precedence: u8) -> ParseResult<Node<Expr>> {
        let mut left = self.parse_prefix_expression()?;

        loop {
            // An arrow function takes no operator or suffix after its body
            if ends_with_arrow(&left.value) {
                break;
            }

            let precedence = self.get_infix_precedence();

            if precedence == 0 || precedence < min_precedence {
                break;
            }

            left = self.parse_infix_expression(left, precedence)?;
        }

        Ok(left)
    }

    fn parse_prefix_expression(&mut self) -> ParseResult<Node<Expr>> {
        let start = self.current_token().span;

        let unary = match self.current_token().kind {
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::Typeof => Some(UnaryOp::TypeOf),
            TokenKind::Void => Some(UnaryOp::Void),
            TokenKind::Delete => Some(UnaryOp::Delete),
            TokenKind::PlusPlus => Some(UnaryOp::PreIncrement),
            TokenKind::MinusMinus => Some(UnaryOp::PreDecrement),
            _ => None,
        };

        let expr = if let Some(op) = unary {
            self.advance();
            let operand = self.parse_expression_with_precedence(15)?;
            Expr::Unary {
                op,
                expr: Box::new(operand),
            }
        } else {
            match self.current_token().kind {
                TokenKind::Await => {
                    self.advance();
                    Expr::Await(Box::new(self.parse_expression_with_precedence(15)?))
                }
                TokenKind::Yield => {
                    self.advance();
                    let delegate = if self.check(TokenKind::Star) {
                        self.advance();
                        true
                    } else {
                        false
                    };
                    let bare = self.at_statement_end()
                        || matches!(
                            self.current_token().kind,
                            TokenKind::RParen | TokenKind::RBracket | TokenKind::Comma | TokenKind::Colon
                        );
                    let argument = if bare && !delegate {
                        None
                    } else {
                        Some(Box::new(self.parse_assignment()?))
                    };
                    Expr::Yield { argument, delegate }
                }
                _ => return self.parse_primary_expression(),
            }
        };

        let span = start.merge(&self.previous_token().span);
        Ok(Node::new(expr, span))
    }

    fn parse_infix_expression(&mut self, left: Node<Expr>, precedence: u8) -> ParseResult<Node<Expr>> {
        let start = left.span;
        let kind = self.current_token().kind;

        let expr = if let Some(op) = Self::assignment_operator(kind) {
            self.advance();
            let value = Box::new(self.parse_expression_with_precedence(1)?);
            Expr::Assignment {
                target: Box::new(left),
                op,
                value,
            }
        } else if let Some(op) = Self::binary_operator(kind) {
            if op == BinaryOp::Pow && is_unary_operand(&left.value) {
                return Err(ParseError::new(
                    "Unary operator before '**' needs parentheses",
                    left.span,
                ));
            }
            self.advance();
            // `**` is right-associative
            let next = if op == BinaryOp::Pow { precedence } else { precedence + 1 };
            let right = Box::new(self.parse_expression_with_precedence(next)?);
            Expr::Binary {
                left: Box::new(left),
                op,
                right,
            }
        } else {
            match kind {
                TokenKind::Question => {
                    self.advance();
                    let then_expr = Box::new(self.allow_in(|p| p.parse_assignment())?);
                    self.consume(TokenKind::Colon)?;
                    let else_expr = Box::new(self.parse_expression_with_precedence(1)?);
                    Expr::Ternary {
                        condition: Box::new(left),
                        then_expr,
                        else_expr,
                    }
                }
                TokenKind::PlusPlus => {
                    self.advance();
                    Expr::Unary {
                        op: UnaryOp::PostIncrement,
                        expr: Box::new(left),
                    }
                }
                TokenKind::MinusMinus => {
                    self.advance();
                    Expr::Unary {
                        op: UnaryOp::PostDecrement,
                        expr: Box::new(left),
                    }
                }
                _ => return self.parse_member_suffix(left),
            }
        };

        let span = start.merge(&self.previous_token().span);
        Ok(Node::new(expr, span))
    }

    /// `.name`, `?.`, `[index]`, `(args)` or a tagged template after `left`.
    fn parse_member_suffix(&mut self, left: Node<Expr>) -> ParseResult<Node<Expr>> {
        let start = left.span;

        let expr = match self.current_token().kind {
            TokenKind::Dot => {
                self.advance();
                let property = self.parse_identifier_name()?;
                Expr::Member {
                    object: Box::new(left),
                    property,
                }
            }
            TokenKind::QuestionDot => {
                self.advance();
                if self.check(TokenKind::LParen) {
                    let args = self.parse_arguments()?;
                    Expr::OptionalCall {
                        callee: Box::new(left),
                        args,
                    }
                } else if self.check(TokenKind::LBracket) {
                    self.advance();
                    let index = Box::new(self.allow_in(|p| p.parse_expression())?);
                    self.consume(TokenKind::RBracket)?;
                    Expr::OptionalIndex {
                        object: Box::new(left),
                        index,
                    }
                } else {
                    let property = self.parse_identifier_name()?;
                    Expr::OptionalMember {
                        object: Box::new(left),
                        property,
                    }
                }
            }
            TokenKind::LBracket => {
                self.advance();
                let index = Box::new(self.allow_in(|p| p.parse_expression())?);
                self.consume(TokenKind::RBracket)?;
                Expr::Index {
                    object: Box::new(left),
                    index,
                }
            }
            TokenKind::LParen => {
                let args = self.parse_arguments()?;
                Expr::Call {
                    callee: Box::new(left),
                    args,
                }
            }
            TokenKind::TemplateLiteral => {
                let token = self.advance().clone();
                let (parts, exprs) = self.parse_template_parts(&token)?;
                Expr::TaggedTemplate {
                    tag: Box::new(left),
                    parts,
                    exprs,
                }
            }
            _ => return Ok(left),
        };

        let span = start.merge(&self.previous_token().span);
        Ok(Node::new(expr, span))
    }

    pub(crate) fn parse_primary_expression(&mut self) -> ParseResult<Node<Expr>> {
        let start = self.current_token().span;

        let expr = match self.current_token().kind {
            // Literals
            TokenKind::NumberLiteral => {
                let raw = self.advance().value.clone();
                Expr::Literal(Literal::Number(raw))
            }
            TokenKind::BigIntLiteral => {
                let digits = self.advance().value.clone();
                Expr::Literal(Literal::BigInt(digits))
            }
            TokenKind::StringLiteral => {
                let raw = self.advance().value.clone();
                let value = cook_string(raw.get(1..raw.len() - 1).unwrap_or_default());
                Expr::Literal(Literal::String {
                    value,
                    raw: Some(raw),
                })
            }
            TokenKind::RegexLiteral => {
                let raw = self.advance().value.clone();
                let (pattern, flags) = split_regex(&raw);
                Expr::Literal(Literal::RegExp { pattern, flags })
            }
            TokenKind::True => {
                self.advance();
                Expr::Literal(Literal::Boolean(true))
            }
            TokenKind::False => {
                self.advance();
                Expr::Literal(Literal::Boolean(false))
            }
            TokenKind::Null => {
                self.advance();
                Expr::Literal(Literal::Null)
            }

            // Template literal
            TokenKind::TemplateLiteral => {
                let token = self.advance().clone();
                let (parts, exprs) = self.parse_template_parts(&token)?;
                Expr::Template { parts, exprs }
            }

            // Identifiers, including `x => ...` and `async` forms
            TokenKind::Identifier => return self.parse_identifier_expression(),

            TokenKind::This => {
                self.advance();
                Expr::This
            }
            TokenKind::Super => {
                self.advance();
                Expr::Super
            }

            TokenKind::LBracket => self.parse_array_literal()?,
            TokenKind::LBrace => self.parse_object_literal()?,
            TokenKind::LParen => return self.parse_paren_or_arrow(),

            TokenKind::Function => Expr::Function(Box::new(self.parse_function(false)?)),
            TokenKind::Class => Expr::Class(Box::new(self.parse_class()?)),
            TokenKind::New => return self.parse_new_expression(),

            // Dynamic `import(...)` and `import.meta`
            TokenKind::Import => {
                self.advance();
                if self.check(TokenKind::Dot) {
                    self.advance();
                    let property = self.parse_identifier_name()?;
                    Expr::MetaProperty {
                        meta: Node::new(Ident::new("import"), start),
                        property,
                    }
                } else if self.check(TokenKind::LParen) {
                    Expr::Ident(Ident::new("import"))
                } else {
                    return Err(ParseError::new(
                        "ES module imports are not supported; use require()",
                        start,
                    ));
                }
            }

            _ => return Err(self.unexpected("expression")),
        };

        let span = start.merge(&self.previous_token().span);
        Ok(Node::new(expr, span))
    }

    fn parse_identifier_expression(&mut self) -> ParseResult<Node<Expr>> {
        let start = self.current_token().span;

        if self.check_word("async") {
            // async function () {}
            if self.peek_same_line(1, TokenKind::Function) {
                self.advance();
                let function = self.parse_function(true)?;
                let span = start.merge(&self.previous_token().span);
                return Ok(Node::new(Expr::Function(Box::new(function)), span));
            }

            // async x => ...
            if self.peek_same_line(1, TokenKind::Identifier) && self.peek_same_line(2, TokenKind::FatArrow) {
                self.advance();
                let param = self.parse_identifier_param()?;
                return self.parse_arrow_function(start, vec![param], true);
            }

            // async (a, b) => ..., otherwise a call to something named `async`
            if self.peek_same_line(1, TokenKind::LParen) {
                let checkpoint = self.current;
                self.advance();
                self.advance();
                if let Ok(params) = self.allow_in(|p| p.parse_function_params()) {
                    if self.check(TokenKind::RParen) && self.peek_same_line(1, TokenKind::FatArrow) {
                        self.advance();
                        return self.parse_arrow_function(start, params, true);
                    }
                }
                self.current = checkpoint;
            }
        }

        // x => ...
        if self.peek_same_line(1, TokenKind::FatArrow) {
            let param = self.parse_identifier_param()?;
            return self.parse_arrow_function(start, vec![param], false);
        }

        let ident = self.parse_identifier()?;
        Ok(Node::new(Expr::Ident(ident.value), ident.span))
    }

    fn parse_identifier_param(&mut self) -> ParseResult<Param> {
        let ident = self.parse_identifier()?;
        let span = ident.span;
        Ok(Param {
            pattern: Node::new(Pattern::Ident(ident), span),
            is_rest: false,
        })
    }

    fn parse_array_literal(&mut self) -> ParseResult<Expr> {
        self.consume(TokenKind::LBracket)?;

        let elements = self.allow_in(|p| {
            let mut elements = Vec::new();
            while !p.check(TokenKind::RBracket) && !p.is_at_end() {
                if p.check(TokenKind::Comma) {
                    elements.push(None);
                    p.advance();
                } else {
                    elements.push(Some(p.parse_spread_or_assignment()?));
                    if !p.check(TokenKind::RBracket) {
                        p.consume(TokenKind::Comma)?;
                    }
                }
            }
            Ok(elements)
        })?;

        self.consume(TokenKind::RBracket)?;
        Ok(Expr::Array(elements))
    }

    fn parse_object_literal(&mut self) -> ParseResult<Expr> {
        self.consume(TokenKind::LBrace)?;

        let properties = self.allow_in(|p| {
            let mut properties = Vec::new();
            while !p.check(TokenKind::RBrace) && !p.is_at_end() {
                properties.push(p.parse_object_property()?);
                if !p.check(TokenKind::RBrace) {
                    p.consume(TokenKind::Comma)?;
                }
            }
            Ok(properties)
        })?;

        self.consume(TokenKind::RBrace)?;
        Ok(Expr::Object(properties))
    }

    fn parse_object_property(&mut self) -> ParseResult<ObjectProperty> {
        if self.check(TokenKind::DotDotDot) {
            self.advance();
            return Ok(ObjectProperty::Spread(self.parse_assignment()?));
        }

        let (kind, is_async, is_generator) = self.parse_method_modifiers();
        let key = self.parse_property_name()?;

        // Method shorthand, getter or setter
        if kind != MethodKind::Method || is_async || is_generator || self.check(TokenKind::LParen) {
            let function = self.parse_method_function(is_async, is_generator)?;
            return Ok(ObjectProperty::Method {
                key,
                kind,
                function: Box::new(function),
            });
        }

        if self.check(TokenKind::Colon) {
            self.advance();
            let value = self.parse_assignment()?;
            return Ok(ObjectProperty::Property {
                key,
                value,
                shorthand: false,
            });
        }

        // Shorthand property; `{ a = 1 }` only appears as a destructuring target
        let PropertyName::Ident(ident) = &key else {
            return Err(self.error("Invalid property shorthand".to_string()));
        };
        let mut value = Node::new(Expr::Ident(ident.value.clone()), ident.span);
        if self.check(TokenKind::Eq) {
            self.advance();
            let default = self.parse_assignment()?;
            let span = value.span.merge(&default.span);
            value = Node::new(
                Expr::Assignment {
                    target: Box::new(value),
                    op: AssignmentOp::Assign,
                    value: Box::new(default),
                },
                span,
            );
        }

        Ok(ObjectProperty::Property {
            key,
            value,
            shorthand: true,
        })
    }

    fn parse_paren_or_arrow(&mut self) -> ParseResult<Node<Expr>> {
        let start = self.current_token().span;
        self.consume(TokenKind::LParen)?;

        // Try the arrow parameter list first, then fall back to an expression
        let checkpoint = self.current;
        if let Ok(params) = self.allow_in(|p| p.parse_function_params()) {
            if self.check(TokenKind::RParen) && self.peek_same_line(1, TokenKind::FatArrow) {
                self.advance();
                return self.parse_arrow_function(start, params, false);
            }
        }
        self.current = checkpoint;

        let expr = self.allow_in(|p| p.parse_expression())?;
        self.consume(TokenKind::RParen)?;

        let span = start.merge(&self.previous_token().span);
        Ok(Node::new(Expr::Paren(Box::new(expr)), span))
    }

    fn parse_arrow_function(
        &mut self,
        start: Span,
        params: Vec<Param>,
        is_async: bool,
    ) -> ParseResult<Node<Expr>> {
        self.consume(TokenKind::FatArrow)?;

        let body = if self.check(TokenKind::LBrace) {
            ArrowBody::Block(Box::new(self.parse_function_body()?))
        } else {
            ArrowBody::Expr(Box::new(self.parse_assignment()?))
        };

        let span = start.merge(&self.previous_token().span);
        Ok(Node::new(
            Expr::Arrow {
                params,
                body,
                is_async,
            },
            span,
        ))
    }

    fn parse_new_expression(&mut self) -> ParseResult<Node<Expr>> {
        let start = self.consume(TokenKind::New)?.span;

        // new.target
        if self.check(TokenKind::Dot) {
            self.advance();
            let property = self.parse_identifier_name()?;
            let span = start.merge(&property.span);
            return Ok(Node::new(
                Expr::MetaProperty {
                    meta: Node::new(Ident::new("new"), start),
                    property,
                },
                span,
            ));
        }

        let mut callee = if self.check(TokenKind::New) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };

        // Member accesses bind to the callee; the first argument list belongs to `new`
        while matches!(
            self.current_token().kind,
            TokenKind::Dot | TokenKind::LBracket | TokenKind::TemplateLiteral
        ) {
            callee = self.parse_member_suffix(callee)?;
        }

        let args = if self.check(TokenKind::LParen) {
            Some(self.parse_arguments()?)
        } else {
            None
        };

        let span = start.merge(&self.previous_token().span);
        Ok(Node::new(
            Expr::New {
                callee: Box::new(callee),
                args,
            },
            span,
        ))
    }

    /// Splits a template token and parses each substitution with spans
    /// pointing back into the module text.
    pub(crate) fn parse_template_parts(&self, token: &Token) -> ParseResult<(Vec<String>, Vec<Node<Expr>>)> {
        let parts = Lexer::split_template(&token.value);

        let mut exprs = Vec::with_capacity(parts.substitutions.len());
        for (offset, text) in parts.substitutions {
            let base = token.span.start + offset;
            let mut tokens = Lexer::with_file_id(text, token.span.file_id).tokenize();
            for sub_token in &mut tokens {
                sub_token.span = sub_token.span.shifted(base);
            }
            let mut parser = Parser::new(tokens);
            parser.depth = self.depth;
            exprs.push(parser.parse_standalone_expression()?);
        }

        let quasis = parts.quasis.into_iter().map(String::from).collect();
        Ok((quasis, exprs))
    }
}

/// `/pattern/flags` into its two halves.
fn split_regex(raw: &str) -> (String, String) {
    match raw.rfind('/') {
        Some(end) if end > 0 => (raw[1..end].to_string(), raw[end + 1..].to_string()),
        _ => (raw.to_string(), String::new()),
    }
}

/// Whether `expr` ends in an arrow function.
fn ends_with_arrow(expr: &Expr) -> bool {
    match expr {
        Expr::Arrow { .. } => true,
        Expr::Assignment { value, .. } => ends_with_arrow(&value.value),
        Expr::Ternary { else_expr, .. } => ends_with_arrow(&else_expr.value),
        Expr::Binary { right, .. } => ends_with_arrow(&right.value),
        Expr::Unary { expr, .. } | Expr::Await(expr) => ends_with_arrow(&expr.value),
        Expr::Yield {
            argument: Some(argument),
            ..
        } => ends_with_arrow(&argument.value),
        _ => false,
    }
}

/// Prefix unary and `await` expressions, which cannot be the base of `**`.
fn is_unary_operand(expr: &Expr) -> bool {
    match expr {
        Expr::Unary { op, .. } => !op.is_postfix(),
        Expr::Await(_) => true,
        _ => false,
    }
}
