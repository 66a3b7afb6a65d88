//! Function and class parsing

use super::*;

impl Parser {
    /// `function [*] name(params) { body }`; a leading `async` has already
    /// been consumed when `is_async` is set.
    pub(crate) fn parse_function_decl(&mut self, is_async: bool) -> ParseResult<FnDecl> {
        self.consume(TokenKind::Function)?;
        let is_generator = if self.check(&TokenKind::Star) {
            self.advance();
            true
        } else {
            false
        };
        let ident = self.parse_identifier()?;
        let function = self.parse_function_rest(is_async, is_generator)?;
        Ok(FnDecl { ident, function })
    }

    /// Parameter list and body, shared by every function form.
    pub(crate) fn parse_function_rest(&mut self, is_async: bool, is_generator: bool) -> ParseResult<Function> {
        self.consume(TokenKind::LParen)?;
        let params = self.parse_params_until_rparen()?;
        let body = self.allow_in(|p| p.parse_block_statement())?;
        Ok(Function {
            params,
            body,
            is_async,
            is_generator,
        })
    }

    /// Parameters after an already consumed `(`, through the closing `)`.
    pub(crate) fn parse_params_until_rparen(&mut self) -> ParseResult<Vec<Param>> {
        let mut params = Vec::new();

        while !self.check(&TokenKind::RParen) && !self.is_at_end() {
            if self.check(&TokenKind::DotDotDot) {
                self.advance();
                let pattern = self.parse_binding_pattern()?;
                params.push(Param { pattern, is_rest: true });
                break;
            }
            let pattern = self.parse_binding_element()?;
            params.push(Param { pattern, is_rest: false });
            if !self.check(&TokenKind::RParen) {
                self.consume(TokenKind::Comma)?;
            }
        }

        self.consume(TokenKind::RParen)?;
        Ok(params)
    }

    pub(crate) fn parse_class_decl(&mut self) -> ParseResult<ClassDecl> {
        self.consume(TokenKind::Class)?;
        let ident = self.parse_identifier()?;
        let class = self.parse_class_rest()?;
        Ok(ClassDecl { ident, class })
    }

    pub(crate) fn parse_class_expression(&mut self) -> ParseResult<Expr> {
        self.consume(TokenKind::Class)?;
        let ident = if self.check(&TokenKind::Identifier) {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        let class = self.parse_class_rest()?;
        Ok(Expr::Class { ident, class })
    }

    fn parse_class_rest(&mut self) -> ParseResult<Class> {
        let extends = if self.check(&TokenKind::Extends) {
            self.advance();
            Some(Box::new(self.parse_assignment()?))
        } else {
            None
        };

        self.consume(TokenKind::LBrace)?;
        let members = self.allow_in(|p| {
            let mut members = Vec::new();
            while !p.check(&TokenKind::RBrace) && !p.is_at_end() {
                if p.check(&TokenKind::Semicolon) {
                    p.advance();
                    continue;
                }
                members.push(p.parse_class_member()?);
            }
            Ok(members)
        })?;
        self.consume(TokenKind::RBrace)?;

        Ok(Class { extends, members })
    }

    fn parse_class_member(&mut self) -> ParseResult<Node<ClassMember>> {
        let start = self.current_token().span;

        // `static` is a modifier unless it is the member name itself.
        let is_static = self.check_word("static")
            && !matches!(
                self.peek_kind(1),
                Some(TokenKind::LParen) | Some(TokenKind::Eq) | Some(TokenKind::Semicolon) | Some(TokenKind::RBrace)
            );
        if is_static {
            self.advance();
        }

        let (kind, is_async, is_generator) = self.parse_method_modifiers();
        let key = self.parse_property_name()?;

        let member = if self.check(&TokenKind::LParen) {
            let kind = match (&key, kind) {
                (PropertyName::Ident(name), MethodKind::Method) if name == "constructor" && !is_static => {
                    MethodKind::Constructor
                }
                _ => kind,
            };
            let function = self.parse_function_rest(is_async, is_generator)?;
            ClassMember::Method {
                key,
                kind,
                is_static,
                function,
            }
        } else {
            if kind != MethodKind::Method || is_async || is_generator {
                return Err(self.error("Expected '(' after method name".to_string()));
            }
            let value = if self.check(&TokenKind::Eq) {
                self.advance();
                Some(self.parse_assignment()?)
            } else {
                None
            };
            self.consume_semicolon()?;
            ClassMember::Field { key, value, is_static }
        };

        Ok(Node::new(member, self.span_from(start)))
    }
}
