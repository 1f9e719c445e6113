//! Statement parsing

use super::*;

impl Parser {
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Node<Stmt>> {
        self.nested(Self::parse_nested_statement)
    }

    fn parse_nested_statement(&mut self) -> ParseResult<Node<Stmt>> {
        let start = self.current_token().span;

        let stmt = match self.current_token().kind {
            TokenKind::LBrace => Stmt::Block(self.parse_block_statement()?.value),
            TokenKind::If => self.parse_if_statement()?,
            TokenKind::For => self.parse_for_statement()?,
            TokenKind::While => self.parse_while_statement()?,
            TokenKind::Do => self.parse_do_while_statement()?,
            TokenKind::Switch => self.parse_switch_statement()?,
            TokenKind::Return => self.parse_return_statement()?,
            TokenKind::Break => Stmt::Break(self.parse_jump_label(TokenKind::Break)?),
            TokenKind::Continue => Stmt::Continue(self.parse_jump_label(TokenKind::Continue)?),
            TokenKind::Throw => self.parse_throw_statement()?,
            TokenKind::Try => self.parse_try_statement()?,
            TokenKind::Debugger => {
                self.advance();
                self.consume_semicolon()?;
                Stmt::Debugger
            }
            TokenKind::Semicolon => {
                self.advance();
                Stmt::Empty
            }
            TokenKind::Const | TokenKind::Let | TokenKind::Var => {
                let var_decl = self.parse_var_declaration_list()?;
                self.consume_semicolon()?;
                Stmt::VarDecl(var_decl)
            }
            TokenKind::Function => Stmt::FunctionDecl(self.parse_function_declaration(false)?),
            _ if self.check_word("async") && self.peek_same_line(1, TokenKind::Function) => {
                self.advance();
                Stmt::FunctionDecl(self.parse_function_declaration(true)?)
            }
            TokenKind::Class => {
                let class = self.parse_class()?;
                if class.name.is_none() {
                    return Err(ParseError::new("Class declarations require a name", start));
                }
                Stmt::ClassDecl(class)
            }
            // `import(...)` and `import.meta` are expressions; everything else is ESM
            TokenKind::Import
                if !matches!(self.peek_kind(1), Some(TokenKind::LParen | TokenKind::Dot)) =>
            {
                return Err(ParseError::new(
                    "ES module imports are not supported; use require()",
                    start,
                ));
            }
            TokenKind::Export => {
                return Err(ParseError::new(
                    "ES module exports are not supported; assign to module.exports",
                    start,
                ));
            }
            TokenKind::With => {
                return Err(ParseError::new("'with' statements are not supported", start));
            }
            _ => {
                // Check for labeled statement
                if self.check(TokenKind::Identifier) && self.peek_kind(1) == Some(TokenKind::Colon) {
                    let label = self.parse_identifier()?;
                    self.consume(TokenKind::Colon)?;
                    let stmt = Box::new(self.parse_statement()?);
                    Stmt::Labeled { label, stmt }
                } else {
                    let expr = self.parse_expression()?;
                    self.consume_semicolon()?;
                    Stmt::Expr(expr)
                }
            }
        };

        let span = start.merge(&self.previous_token().span);
        Ok(Node::new(stmt, span))
    }

    pub(crate) fn parse_block_statement(&mut self) -> ParseResult<Node<BlockStmt>> {
        let start = self.current_token().span;
        self.consume(TokenKind::LBrace)?;

        let mut stmts = Vec::new();

        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            stmts.push(self.parse_statement()?);
        }

        self.consume(TokenKind::RBrace)?;
        let span = start.merge(&self.previous_token().span);

        Ok(Node::new(BlockStmt { stmts }, span))
    }

    /// `var|let|const` and its declarators, without the terminating `;`.
    pub(crate) fn parse_var_declaration_list(&mut self) -> ParseResult<VarDecl> {
        let kind = match self.current_token().kind {
            TokenKind::Const => VarDeclKind::Const,
            TokenKind::Let => VarDeclKind::Let,
            TokenKind::Var => VarDeclKind::Var,
            _ => return Err(self.unexpected("var, let or const")),
        };
        self.advance();

        let mut declarations = Vec::new();

        loop {
            let pattern = self.parse_pattern()?;
            let init = if self.check(TokenKind::Eq) {
                self.advance();
                Some(self.parse_assignment()?)
            } else {
                None
            };

            declarations.push(VarDeclarator { pattern, init });

            if !self.check(TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        Ok(VarDecl { kind, declarations })
    }

    fn parse_function_declaration(&mut self, is_async: bool) -> ParseResult<Function> {
        let start = self.current_token().span;
        let function = self.parse_function(is_async)?;
        if function.name.is_none() {
            return Err(ParseError::new("Function declarations require a name", start));
        }
        Ok(function)
    }

    /// `else if` chains are read in a loop and linked back to front, so a
    /// long chain is not deep nesting.
    fn parse_if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::If)?;
        let condition = self.parse_paren_condition()?;
        let then_stmt = Box::new(self.parse_statement()?);

        let mut chain = Vec::new();
        let mut else_stmt = None;
        while self.check(TokenKind::Else) {
            self.advance();
            if !self.check(TokenKind::If) {
                else_stmt = Some(Box::new(self.parse_statement()?));
                break;
            }
            let start = self.advance().span;
            let condition = self.parse_paren_condition()?;
            let then_stmt = Box::new(self.parse_statement()?);
            chain.push((start, condition, then_stmt));
        }

        let end = self.previous_token().span;
        for (start, condition, then_stmt) in chain.into_iter().rev() {
            let stmt = Stmt::If {
                condition,
                then_stmt,
                else_stmt,
            };
            else_stmt = Some(Box::new(Node::new(stmt, start.merge(&end))));
        }

        Ok(Stmt::If {
            condition,
            then_stmt,
            else_stmt,
        })
    }

    fn parse_paren_condition(&mut self) -> ParseResult<Node<Expr>> {
        self.consume(TokenKind::LParen)?;
        let condition = self.allow_in(|p| p.parse_expression())?;
        self.consume(TokenKind::RParen)?;
        Ok(condition)
    }

    fn parse_for_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::For)?;

        let is_await = if self.check(TokenKind::Await) {
            self.advance();
            true
        } else {
            false
        };

        self.consume(TokenKind::LParen)?;

        // Head: `in` is not an operator until the first `;`
        let init = if self.check(TokenKind::Semicolon) {
            None
        } else if matches!(
            self.current_token().kind,
            TokenKind::Const | TokenKind::Let | TokenKind::Var
        ) {
            self.no_in = true;
            let decl = self.parse_var_declaration_list();
            self.no_in = false;
            Some(ForInit::VarDecl(decl?))
        } else {
            self.no_in = true;
            let expr = self.parse_expression();
            self.no_in = false;
            Some(ForInit::Expr(expr?))
        };

        if let Some(init) = init {
            let is_in = self.check(TokenKind::In);
            if is_in || self.check_word("of") {
                self.advance();
                let left = match init {
                    ForInit::VarDecl(decl) => ForInLeft::VarDecl(decl),
                    ForInit::Expr(expr) => ForInLeft::Pattern(self.expr_to_pattern(expr)?),
                };
                let right = if is_in {
                    self.parse_expression()?
                } else {
                    self.parse_assignment()?
                };
                self.consume(TokenKind::RParen)?;
                let body = Box::new(self.parse_statement()?);

                return Ok(if is_in {
                    Stmt::ForIn { left, right, body }
                } else {
                    Stmt::ForOf {
                        left,
                        right,
                        body,
                        is_await,
                    }
                });
            }

            self.consume(TokenKind::Semicolon)?;
            return self.parse_for_rest(Some(init));
        }

        self.consume(TokenKind::Semicolon)?;
        self.parse_for_rest(None)
    }

    /// Condition, update and body of a C-style `for`, after the first `;`.
    fn parse_for_rest(&mut self, init: Option<ForInit>) -> ParseResult<Stmt> {
        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume(TokenKind::Semicolon)?;

        let update = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume(TokenKind::RParen)?;

        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::For {
            init,
            condition,
            update,
            body,
        })
    }

    fn parse_while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::While)?;
        let condition = self.parse_paren_condition()?;
        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::While { condition, body })
    }

    fn parse_do_while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::Do)?;
        let body = Box::new(self.parse_statement()?);
        self.consume(TokenKind::While)?;
        let condition = self.parse_paren_condition()?;

        // A `;` is always insertable after do-while
        if self.check(TokenKind::Semicolon) {
            self.advance();
        }

        Ok(Stmt::DoWhile { body, condition })
    }

    fn parse_switch_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::Switch)?;
        let discriminant = self.parse_paren_condition()?;
        self.consume(TokenKind::LBrace)?;

        let mut cases = Vec::new();

        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            let test = if self.check(TokenKind::Default) {
                self.advance();
                None
            } else {
                self.consume(TokenKind::Case)?;
                Some(self.parse_expression()?)
            };
            self.consume(TokenKind::Colon)?;

            let mut consequent = Vec::new();
            while !matches!(
                self.current_token().kind,
                TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Eof
            ) {
                consequent.push(self.parse_statement()?);
            }

            cases.push(SwitchCase { test, consequent });
        }

        self.consume(TokenKind::RBrace)?;

        Ok(Stmt::Switch {
            discriminant,
            cases,
        })
    }

    fn parse_return_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::Return)?;

        let value = if self.at_statement_end() {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.consume_semicolon()?;
        Ok(Stmt::Return(value))
    }

    /// Optional label after `break`/`continue`, on the same line.
    fn parse_jump_label(&mut self, keyword: TokenKind) -> ParseResult<Option<Node<Ident>>> {
        self.consume(keyword)?;

        let label = if self.check(TokenKind::Identifier) && !self.current_token().newline_before {
            Some(self.parse_identifier()?)
        } else {
            None
        };

        self.consume_semicolon()?;
        Ok(label)
    }

    fn parse_throw_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::Throw)?;

        if self.current_token().newline_before {
            return Err(self.error("Illegal newline after throw".to_string()));
        }

        let value = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(Stmt::Throw(value))
    }

    fn parse_try_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::Try)?;
        let block = self.parse_block_statement()?;

        let catch = if self.check(TokenKind::Catch) {
            self.advance();

            // Optional catch binding
            let param = if self.check(TokenKind::LParen) {
                self.advance();
                let pattern = self.parse_pattern()?;
                self.consume(TokenKind::RParen)?;
                Some(pattern)
            } else {
                None
            };

            let body = self.parse_block_statement()?;
            Some(CatchClause { param, body })
        } else {
            None
        };

        let finally = if self.check(TokenKind::Finally) {
            self.advance();
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        if catch.is_none() && finally.is_none() {
            return Err(self.error("Missing catch or finally after try".to_string()));
        }

        Ok(Stmt::Try {
            block,
            catch,
            finally,
        })
    }
}
