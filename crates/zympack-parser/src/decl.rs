//! Function and class parsing

use super::*;

impl Parser {
    /// `function [*] [name] (params) { body }`, from the `function` keyword on.
    pub(crate) fn parse_function(&mut self, is_async: bool) -> ParseResult<Function> {
        self.consume(TokenKind::Function)?;

        let is_generator = if self.check(TokenKind::Star) {
            self.advance();
            true
        } else {
            false
        };

        let name = if self.check(TokenKind::Identifier) {
            Some(self.parse_identifier()?)
        } else {
            None
        };

        self.parse_function_rest(name, is_async, is_generator)
    }

    /// Parameter list and body of any function form.
    pub(crate) fn parse_function_rest(
        &mut self,
        name: Option<Node<Ident>>,
        is_async: bool,
        is_generator: bool,
    ) -> ParseResult<Function> {
        self.consume(TokenKind::LParen)?;
        let params = self.allow_in(|p| p.parse_function_params())?;
        self.consume(TokenKind::RParen)?;

        let body = self.parse_function_body()?;

        Ok(Function {
            name,
            params,
            body,
            is_async,
            is_generator,
        })
    }

    pub(crate) fn parse_method_function(&mut self, is_async: bool, is_generator: bool) -> ParseResult<Function> {
        self.parse_function_rest(None, is_async, is_generator)
    }

    pub(crate) fn parse_function_body(&mut self) -> ParseResult<Node<BlockStmt>> {
        self.allow_in(|p| p.parse_block_statement())
    }

    /// Leading `async`, `*`, `get` or `set` of a method definition.
    pub(crate) fn parse_method_modifiers(&mut self) -> (MethodKind, bool, bool) {
        let is_async = if self.check_modifier("async") {
            self.advance();
            true
        } else {
            false
        };

        let is_generator = if self.check(TokenKind::Star) {
            self.advance();
            true
        } else {
            false
        };

        let mut kind = MethodKind::Method;
        if !is_async && !is_generator {
            if self.check_modifier("get") {
                self.advance();
                kind = MethodKind::Getter;
            } else if self.check_modifier("set") {
                self.advance();
                kind = MethodKind::Setter;
            }
        }

        (kind, is_async, is_generator)
    }

    /// `class [name] [extends expr] { members }`, from the `class` keyword on.
    pub(crate) fn parse_class(&mut self) -> ParseResult<Class> {
        self.consume(TokenKind::Class)?;

        let name = if self.check(TokenKind::Identifier) {
            Some(self.parse_identifier()?)
        } else {
            None
        };

        let extends = if self.check(TokenKind::Extends) {
            self.advance();
            // Left-hand-side expression: member accesses and calls only
            Some(Box::new(self.parse_expression_with_precedence(17)?))
        } else {
            None
        };

        self.consume(TokenKind::LBrace)?;
        let members = self.allow_in(|p| {
            let mut members = Vec::new();
            while !p.check(TokenKind::RBrace) && !p.is_at_end() {
                if p.check(TokenKind::Semicolon) {
                    p.advance();
                    continue;
                }
                members.push(p.parse_class_member()?);
            }
            Ok(members)
        })?;
        self.consume(TokenKind::RBrace)?;

        Ok(Class {
            name,
            extends,
            members,
        })
    }

    pub(crate) fn parse_class_member(&mut self) -> ParseResult<ClassMember> {
        // static { ... }
        if self.check_word("static") && self.peek_kind(1) == Some(TokenKind::LBrace) {
            self.advance();
            return Ok(ClassMember::StaticBlock(self.parse_function_body()?));
        }

        let is_static = if self.check_modifier("static") {
            self.advance();
            true
        } else {
            false
        };

        let (kind, is_async, is_generator) = self.parse_method_modifiers();
        let key = self.parse_property_name()?;

        if kind != MethodKind::Method || is_async || is_generator || self.check(TokenKind::LParen) {
            let function = self.parse_method_function(is_async, is_generator)?;

            let is_constructor = !is_static
                && kind == MethodKind::Method
                && matches!(&key, PropertyName::Ident(ident) if ident.value.name == "constructor");
            if is_constructor {
                return Ok(ClassMember::Constructor(Box::new(function)));
            }

            return Ok(ClassMember::Method {
                key,
                kind,
                function: Box::new(function),
                is_static,
            });
        }

        // Field
        let value = if self.check(TokenKind::Eq) {
            self.advance();
            Some(self.parse_assignment()?)
        } else {
            None
        };
        self.consume_semicolon()?;

        Ok(ClassMember::Property {
            key,
            value,
            is_static,
        })
    }
}
