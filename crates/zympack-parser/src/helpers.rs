//! Helper methods and utilities

use super::*;

impl Parser {
    pub(crate) fn parse_identifier(&mut self) -> ParseResult<Node<Ident>> {
        let token = self.consume(TokenKind::Identifier)?;
        Ok(Node::new(Ident::new(token.value.clone()), token.span))
    }

    /// Identifier or reserved word, as allowed after `.` and in keys.
    pub(crate) fn parse_identifier_name(&mut self) -> ParseResult<Node<Ident>> {
        if !self.current_token().is_identifier_name() {
            return Err(self.error(format!(
                "Expected property name, found {:?}",
                self.current_token().kind
            )));
        }
        let token = self.advance();
        Ok(Node::new(Ident::new(token.value.clone()), token.span))
    }

    pub(crate) fn parse_property_name(&mut self) -> ParseResult<PropertyName> {
        match self.current_token().kind {
            TokenKind::StringLiteral => {
                let raw = self.advance().value.clone();
                Ok(PropertyName::String(raw))
            }
            TokenKind::NumberLiteral => {
                let raw = self.advance().value.clone();
                Ok(PropertyName::Number(raw))
            }
            TokenKind::LBracket => {
                self.advance();
                let expr = Box::new(self.allow_in(|p| p.parse_assignment())?);
                self.consume(TokenKind::RBracket)?;
                Ok(PropertyName::Computed(expr))
            }
            _ if self.current_token().is_identifier_name() => {
                Ok(PropertyName::Ident(self.parse_identifier_name()?))
            }
            _ => Err(self.error("Expected property name".to_string())),
        }
    }

    pub(crate) fn is_property_name_start(kind: Option<TokenKind>) -> bool {
        match kind {
            Some(TokenKind::StringLiteral | TokenKind::NumberLiteral | TokenKind::LBracket) => {
                true
            }
            Some(kind) => kind == TokenKind::Identifier || kind.is_keyword(),
            None => false,
        }
    }

    /// Contextual modifier (`get`, `set`, `async`, `static`) followed by
    /// something it can modify, as opposed to a member with that name.
    pub(crate) fn check_modifier(&self, word: &str) -> bool {
        if !self.check_word(word) {
            return false;
        }
        match self.peek_token(1) {
            Some(next) => {
                let same_line = word != "async" || !next.newline_before;
                same_line && (next.kind == TokenKind::Star || Self::is_property_name_start(Some(next.kind)))
            }
            None => false,
        }
    }

    pub(crate) fn parse_function_params(&mut self) -> ParseResult<Vec<Param>> {
        let mut params = Vec::new();

        while !self.check(TokenKind::RParen) && !self.is_at_end() {
            params.push(self.parse_function_param()?);
            if !self.check(TokenKind::RParen) {
                self.consume(TokenKind::Comma)?;
            }
        }

        Ok(params)
    }

    pub(crate) fn parse_function_param(&mut self) -> ParseResult<Param> {
        if self.check(TokenKind::DotDotDot) {
            self.advance();
            return Ok(Param {
                pattern: self.parse_pattern()?,
                is_rest: true,
            });
        }

        Ok(Param {
            pattern: self.parse_pattern_with_default()?,
            is_rest: false,
        })
    }

    /// Parses a call argument list, including the parentheses.
    pub(crate) fn parse_arguments(&mut self) -> ParseResult<Vec<Node<Expr>>> {
        self.consume(TokenKind::LParen)?;
        let args = self.allow_in(|p| {
            let mut args = Vec::new();
            while !p.check(TokenKind::RParen) && !p.is_at_end() {
                args.push(p.parse_spread_or_assignment()?);
                if !p.check(TokenKind::RParen) {
                    p.consume(TokenKind::Comma)?;
                }
            }
            Ok(args)
        })?;
        self.consume(TokenKind::RParen)?;
        Ok(args)
    }

    pub(crate) fn parse_spread_or_assignment(&mut self) -> ParseResult<Node<Expr>> {
        if self.check(TokenKind::DotDotDot) {
            let start = self.advance().span;
            let expr = self.parse_assignment()?;
            let span = start.merge(&expr.span);
            return Ok(Node::new(Expr::Spread(Box::new(expr)), span));
        }
        self.parse_assignment()
    }

    pub(crate) fn binary_operator(kind: TokenKind) -> Option<BinaryOp> {
        let op = match kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Mod,
            TokenKind::StarStar => BinaryOp::Pow,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::BangEq => BinaryOp::NotEq,
            TokenKind::EqEqEq => BinaryOp::StrictEq,
            TokenKind::BangEqEq => BinaryOp::StrictNotEq,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::GtEq,
            TokenKind::AmpAmp => BinaryOp::And,
            TokenKind::PipePipe => BinaryOp::Or,
            TokenKind::QuestionQuestion => BinaryOp::NullishCoalesce,
            TokenKind::Amp => BinaryOp::BitAnd,
            TokenKind::Pipe => BinaryOp::BitOr,
            TokenKind::Caret => BinaryOp::BitXor,
            TokenKind::LtLt => BinaryOp::LeftShift,
            TokenKind::GtGt => BinaryOp::RightShift,
            TokenKind::GtGtGt => BinaryOp::UnsignedRightShift,
            TokenKind::In => BinaryOp::In,
            TokenKind::Instanceof => BinaryOp::InstanceOf,
            _ => return None,
        };
        Some(op)
    }

    pub(crate) fn assignment_operator(kind: TokenKind) -> Option<AssignmentOp> {
        let op = match kind {
            TokenKind::Eq => AssignmentOp::Assign,
            TokenKind::PlusEq => AssignmentOp::AddAssign,
            TokenKind::MinusEq => AssignmentOp::SubAssign,
            TokenKind::StarEq => AssignmentOp::MulAssign,
            TokenKind::SlashEq => AssignmentOp::DivAssign,
            TokenKind::PercentEq => AssignmentOp::ModAssign,
            TokenKind::StarStarEq => AssignmentOp::PowAssign,
            TokenKind::AmpAmpEq => AssignmentOp::AndAssign,
            TokenKind::PipePipeEq => AssignmentOp::OrAssign,
            TokenKind::QuestionQuestionEq => AssignmentOp::NullishAssign,
            TokenKind::LtLtEq => AssignmentOp::LeftShiftAssign,
            TokenKind::GtGtEq => AssignmentOp::RightShiftAssign,
            TokenKind::GtGtGtEq => AssignmentOp::UnsignedRightShiftAssign,
            TokenKind::AmpEq => AssignmentOp::BitAndAssign,
            TokenKind::PipeEq => AssignmentOp::BitOrAssign,
            TokenKind::CaretEq => AssignmentOp::BitXorAssign,
            _ => return None,
        };
        Some(op)
    }

    // =========================================================================
    // Operator Precedence
    // =========================================================================

    pub(crate) fn get_infix_precedence(&self) -> u8 {
        let token = self.current_token();
        if Self::assignment_operator(token.kind).is_some() {
            return 1;
        }
        match token.kind {
            TokenKind::Question => 2,
            TokenKind::QuestionQuestion => 3,
            TokenKind::PipePipe => 4,
            TokenKind::AmpAmp => 5,
            TokenKind::Pipe => 6,
            TokenKind::Caret => 7,
            TokenKind::Amp => 8,
            TokenKind::EqEq | TokenKind::BangEq | TokenKind::EqEqEq | TokenKind::BangEqEq => 9,
            TokenKind::In if self.no_in => 0,
            TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::LtEq
            | TokenKind::GtEq
            | TokenKind::In
            | TokenKind::Instanceof => 10,
            TokenKind::LtLt | TokenKind::GtGt | TokenKind::GtGtGt => 11,
            TokenKind::Plus | TokenKind::Minus => 12,
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => 13,
            TokenKind::StarStar => 14,
            // A line break before `++`/`--` ends the statement
            TokenKind::PlusPlus | TokenKind::MinusMinus if token.newline_before => 0,
            TokenKind::PlusPlus | TokenKind::MinusMinus => 16,
            TokenKind::Dot
            | TokenKind::QuestionDot
            | TokenKind::LBracket
            | TokenKind::LParen
            | TokenKind::TemplateLiteral => 17,
            _ => 0,
        }
    }

    // =========================================================================
    // Utility Methods (Token Manipulation)
    // =========================================================================

    pub(crate) fn current_token(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    pub(crate) fn previous_token(&self) -> &Token {
        &self.tokens[(self.current.saturating_sub(1)).min(self.tokens.len() - 1)]
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous_token()
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.current_token().kind == kind
    }

    /// Checks for an identifier spelled `word` (contextual keywords).
    pub(crate) fn check_word(&self, word: &str) -> bool {
        self.check(TokenKind::Identifier) && self.current_token().value == word
    }

    pub(crate) fn peek_token(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.current + offset)
    }

    pub(crate) fn peek_kind(&self, offset: usize) -> Option<TokenKind> {
        self.peek_token(offset).map(|token| token.kind)
    }

    /// The token at `offset` has the given kind and no line break before it.
    pub(crate) fn peek_same_line(&self, offset: usize, kind: TokenKind) -> bool {
        self.peek_token(offset)
            .is_some_and(|token| token.kind == kind && !token.newline_before)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len() || self.current_token().kind == TokenKind::Eof
    }

    pub(crate) fn consume(&mut self, kind: TokenKind) -> ParseResult<&Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("{:?}", kind)))
        }
    }

    /// Consumes a `;`, or accepts its automatic insertion before `}`, the end
    /// of input or a line break.
    pub(crate) fn consume_semicolon(&mut self) -> ParseResult<()> {
        if self.check(TokenKind::Semicolon) {
            self.advance();
            return Ok(());
        }
        if self.check(TokenKind::RBrace) || self.is_at_end() || self.current_token().newline_before {
            return Ok(());
        }
        Err(self.unexpected("';'"))
    }

    /// Whether a `;` could be inserted at the current position.
    pub(crate) fn at_statement_end(&self) -> bool {
        self.check(TokenKind::Semicolon)
            || self.check(TokenKind::RBrace)
            || self.is_at_end()
            || self.current_token().newline_before
    }

    /// Runs `f` one nesting level deeper.
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error(format!(
                "Nesting deeper than {} levels",
                MAX_NESTING_DEPTH
            )));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Runs `f` with `in` parsed as an operator again (inside brackets).
    pub(crate) fn allow_in<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let saved = std::mem::replace(&mut self.no_in, false);
        let result = f(self);
        self.no_in = saved;
        result
    }

    pub(crate) fn error(&self, message: String) -> ParseError {
        ParseError::new(message, self.current_token().span)
    }

    /// "Expected X, found Y", reporting lexer errors by their own message.
    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.current_token();
        match token.kind {
            TokenKind::Error => ParseError::new(token.value.clone(), token.span),
            TokenKind::Eof => self.error(format!("Expected {}, found end of input", expected)),
            _ => self.error(format!("Expected {}, found '{}'", expected, token.value)),
        }
    }

    pub(crate) fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous_token().kind == TokenKind::Semicolon {
                return;
            }

            match self.current_token().kind {
                TokenKind::Class
                | TokenKind::Function
                | TokenKind::Let
                | TokenKind::Const
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Return => return,
                _ => {}
            }

            self.advance();
        }
    }
}
