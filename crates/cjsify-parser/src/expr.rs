//! Expression parsing
//!
//! Assignment and conditional expressions are parsed by recursive descent,
//! binary operators by precedence climbing over [`binary_precedence`].

use super::*;
use crate::helpers::{binary_precedence, parse_number};

impl Parser {
    /// Expression: one or more comma-separated assignment expressions
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Node<Expr>> {
        let first = self.parse_assignment()?;
        if !self.check(&TokenKind::Comma) {
            return Ok(first);
        }

        let start = first.span;
        let mut exprs = vec![first];
        while self.check(&TokenKind::Comma) {
            self.advance();
            exprs.push(self.parse_assignment()?);
        }
        Ok(Node::new(Expr::Sequence(exprs), self.span_from(start)))
    }

    /// Runs `f` with the `in` operator re-enabled, for nested brackets.
    pub(crate) fn allow_in<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let saved = std::mem::replace(&mut self.no_in, false);
        let result = f(self);
        self.no_in = saved;
        result
    }

    pub(crate) fn parse_assignment(&mut self) -> ParseResult<Node<Expr>> {
        if self.is_arrow_start() {
            return self.parse_arrow_function();
        }
        if self.check(&TokenKind::Yield) {
            return self.parse_yield();
        }

        let start = self.current_token().span;
        let target = self.parse_conditional()?;

        let Some(op) = self.assignment_operator() else {
            return Ok(target);
        };

        let valid_target = match &target.value {
            Expr::Ident(_) | Expr::Member { .. } | Expr::Index { .. } => true,
            Expr::Array(_) | Expr::Object(_) => op == AssignOp::Assign,
            _ => false,
        };
        if !valid_target {
            return Err(ParseError::new("Invalid assignment target", target.span));
        }

        self.advance();
        let value = self.parse_assignment()?;
        Ok(Node::new(Expr::assign(target, op, value), self.span_from(start)))
    }

    fn parse_yield(&mut self) -> ParseResult<Node<Expr>> {
        let start = self.consume(TokenKind::Yield)?.span;
        let delegate = if self.check(&TokenKind::Star) {
            self.advance();
            true
        } else {
            false
        };

        let has_argument = !self.current_token().newline_before
            && !matches!(
                self.current_token().kind,
                TokenKind::Semicolon
                    | TokenKind::RBrace
                    | TokenKind::RParen
                    | TokenKind::RBracket
                    | TokenKind::Colon
                    | TokenKind::Comma
                    | TokenKind::Eof
            );
        let argument = if has_argument || delegate {
            Some(Box::new(self.parse_assignment()?))
        } else {
            None
        };

        Ok(Node::new(Expr::Yield { argument, delegate }, self.span_from(start)))
    }

    fn parse_conditional(&mut self) -> ParseResult<Node<Expr>> {
        let start = self.current_token().span;
        let test = self.parse_binary(1)?;

        if !self.check(&TokenKind::Question) {
            return Ok(test);
        }
        self.advance();

        let consequent = self.allow_in(|p| p.parse_assignment())?;
        self.consume(TokenKind::Colon)?;
        let alternate = self.parse_assignment()?;

        Ok(Node::new(
            Expr::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            self.span_from(start),
        ))
    }

    /// Precedence climbing; `**` is the only right-associative operator.
    fn parse_binary(&mut self, min_precedence: u8) -> ParseResult<Node<Expr>> {
        let mut left = self.parse_unary()?;

        while let Some((precedence, op)) = self.binary_operator() {
            if precedence < min_precedence {
                break;
            }
            self.advance();

            let next_min = if op == BinaryOp::Pow {
                precedence
            } else {
                precedence + 1
            };
            let right = self.parse_binary(next_min)?;
            let span = left.span.merge(&right.span);
            left = Node::new(
                Expr::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Node<Expr>> {
        let start = self.current_token().span;

        let op = match self.current_token().kind {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Tilde => UnaryOp::BitNot,
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Minus,
            TokenKind::Typeof => UnaryOp::TypeOf,
            TokenKind::Void => UnaryOp::Void,
            TokenKind::Delete => UnaryOp::Delete,
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let op = if self.advance().kind == TokenKind::PlusPlus {
                    UpdateOp::Increment
                } else {
                    UpdateOp::Decrement
                };
                let argument = self.parse_unary()?;
                self.check_update_target(&argument)?;
                return Ok(Node::new(
                    Expr::Update {
                        op,
                        prefix: true,
                        argument: Box::new(argument),
                    },
                    self.span_from(start),
                ));
            }
            TokenKind::Await => {
                self.advance();
                let argument = self.parse_unary()?;
                return Ok(Node::new(Expr::Await(Box::new(argument)), self.span_from(start)));
            }
            _ => return self.parse_postfix(),
        };

        self.advance();
        let operand = self.parse_unary()?;
        Ok(Node::new(
            Expr::Unary {
                op,
                expr: Box::new(operand),
            },
            self.span_from(start),
        ))
    }

    fn parse_postfix(&mut self) -> ParseResult<Node<Expr>> {
        let start = self.current_token().span;
        let expr = self.parse_call_member()?;

        let op = match self.current_token().kind {
            TokenKind::PlusPlus => UpdateOp::Increment,
            TokenKind::MinusMinus => UpdateOp::Decrement,
            _ => return Ok(expr),
        };
        // `a\n++b` is two statements.
        if self.current_token().newline_before {
            return Ok(expr);
        }
        self.check_update_target(&expr)?;
        self.advance();

        Ok(Node::new(
            Expr::Update {
                op,
                prefix: false,
                argument: Box::new(expr),
            },
            self.span_from(start),
        ))
    }

    fn check_update_target(&self, expr: &Node<Expr>) -> ParseResult<()> {
        match expr.value {
            Expr::Ident(_) | Expr::Member { .. } | Expr::Index { .. } => Ok(()),
            _ => Err(ParseError::new("Invalid update target", expr.span)),
        }
    }

    /// Member accesses, calls and `new`.
    fn parse_call_member(&mut self) -> ParseResult<Node<Expr>> {
        let start = self.current_token().span;
        let mut expr = if self.check(&TokenKind::New) {
            self.parse_new()?
        } else {
            self.parse_primary_expression()?
        };

        loop {
            match self.current_token().kind {
                TokenKind::LParen => {
                    let args = self.parse_arguments()?;
                    expr = Node::new(Expr::call(expr, args), self.span_from(start));
                }
                TokenKind::Dot | TokenKind::LBracket => {
                    expr = self.parse_member_suffix(expr, start)?;
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    /// `new Callee(args)`; the callee takes member accesses but not calls.
    fn parse_new(&mut self) -> ParseResult<Node<Expr>> {
        let start = self.consume(TokenKind::New)?.span;

        let mut callee = if self.check(&TokenKind::New) {
            self.parse_new()?
        } else {
            self.parse_primary_expression()?
        };
        let callee_start = callee.span;
        while matches!(self.current_token().kind, TokenKind::Dot | TokenKind::LBracket) {
            callee = self.parse_member_suffix(callee, callee_start)?;
        }

        let args = if self.check(&TokenKind::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };

        Ok(Node::new(
            Expr::New {
                callee: Box::new(callee),
                args,
            },
            self.span_from(start),
        ))
    }

    fn parse_member_suffix(&mut self, object: Node<Expr>, start: Span) -> ParseResult<Node<Expr>> {
        let expr = if self.check(&TokenKind::Dot) {
            self.advance();
            let property = self.parse_identifier_name()?;
            Expr::Member {
                object: Box::new(object),
                property,
            }
        } else {
            self.consume(TokenKind::LBracket)?;
            let index = self.allow_in(|p| p.parse_expression())?;
            self.consume(TokenKind::RBracket)?;
            Expr::Index {
                object: Box::new(object),
                index: Box::new(index),
            }
        };
        Ok(Node::new(expr, self.span_from(start)))
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<Node<Expr>>> {
        self.consume(TokenKind::LParen)?;
        self.allow_in(|p| {
            let mut args = Vec::new();
            while !p.check(&TokenKind::RParen) && !p.is_at_end() {
                args.push(p.parse_spread_or_assignment()?);
                if !p.check(&TokenKind::RParen) {
                    p.consume(TokenKind::Comma)?;
                }
            }
            p.consume(TokenKind::RParen)?;
            Ok(args)
        })
    }

    fn parse_spread_or_assignment(&mut self) -> ParseResult<Node<Expr>> {
        if !self.check(&TokenKind::DotDotDot) {
            return self.parse_assignment();
        }
        let start = self.advance().span;
        let argument = self.parse_assignment()?;
        Ok(Node::new(Expr::Spread(Box::new(argument)), self.span_from(start)))
    }

    pub(crate) fn parse_primary_expression(&mut self) -> ParseResult<Node<Expr>> {
        let token = self.current_token().clone();

        let expr = match token.kind {
            TokenKind::This => {
                self.advance();
                Expr::This
            }
            TokenKind::Super => {
                self.advance();
                Expr::Super
            }
            TokenKind::Null => {
                self.advance();
                Expr::Literal(Literal::Null)
            }
            TokenKind::True | TokenKind::False => {
                self.advance();
                Expr::Literal(Literal::Boolean(token.kind == TokenKind::True))
            }
            TokenKind::NumberLiteral => {
                self.advance();
                let value = parse_number(&token.value)
                    .ok_or_else(|| ParseError::new("Invalid numeric literal", token.span))?;
                Expr::number(value)
            }
            TokenKind::StringLiteral => {
                self.advance();
                Expr::string(token.value)
            }
            TokenKind::TemplateLiteral => {
                self.advance();
                Expr::Template(token.value)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.allow_in(|p| p.parse_expression())?;
                self.consume(TokenKind::RParen)?;
                return Ok(inner);
            }
            TokenKind::LBracket => self.parse_array_literal()?,
            TokenKind::LBrace => self.parse_object_literal()?,
            TokenKind::Function => {
                self.advance();
                self.parse_function_expression(false)?
            }
            TokenKind::Class => self.parse_class_expression()?,
            TokenKind::Identifier if self.is_async_function_start() => {
                self.advance();
                self.advance();
                self.parse_function_expression(true)?
            }
            TokenKind::Identifier => {
                self.advance();
                Expr::Ident(Ident::new(token.value))
            }
            _ => {
                return Err(self.error(format!("Unexpected token {:?} in expression", token.kind)));
            }
        };

        Ok(Node::new(expr, self.span_from(token.span)))
    }

    fn parse_array_literal(&mut self) -> ParseResult<Expr> {
        self.consume(TokenKind::LBracket)?;
        self.allow_in(|p| {
            let mut elements = Vec::new();
            while !p.check(&TokenKind::RBracket) && !p.is_at_end() {
                if p.check(&TokenKind::Comma) {
                    p.advance();
                    elements.push(None);
                    continue;
                }
                elements.push(Some(p.parse_spread_or_assignment()?));
                if !p.check(&TokenKind::RBracket) {
                    p.consume(TokenKind::Comma)?;
                }
            }
            p.consume(TokenKind::RBracket)?;
            Ok(Expr::Array(elements))
        })
    }

    fn parse_object_literal(&mut self) -> ParseResult<Expr> {
        self.consume(TokenKind::LBrace)?;
        self.allow_in(|p| {
            let mut props = Vec::new();
            while !p.check(&TokenKind::RBrace) && !p.is_at_end() {
                props.push(p.parse_object_property()?);
                if !p.check(&TokenKind::RBrace) {
                    p.consume(TokenKind::Comma)?;
                }
            }
            p.consume(TokenKind::RBrace)?;
            Ok(Expr::Object(props))
        })
    }

    fn parse_object_property(&mut self) -> ParseResult<Node<ObjectProperty>> {
        let start = self.current_token().span;

        if self.check(&TokenKind::DotDotDot) {
            self.advance();
            let value = self.parse_assignment()?;
            return Ok(Node::new(ObjectProperty::Spread(value), self.span_from(start)));
        }

        let (kind, is_async, is_generator) = self.parse_method_modifiers();
        if kind != MethodKind::Method || is_async || is_generator {
            let key = self.parse_property_name()?;
            let function = self.parse_function_rest(is_async, is_generator)?;
            return Ok(Node::new(ObjectProperty::Method { key, kind, function }, self.span_from(start)));
        }

        let key_token = self.current_token().clone();
        let key = self.parse_property_name()?;

        let prop = if self.check(&TokenKind::LParen) {
            let function = self.parse_function_rest(false, false)?;
            ObjectProperty::Method {
                key,
                kind: MethodKind::Method,
                function,
            }
        } else if self.check(&TokenKind::Colon) {
            self.advance();
            let value = self.parse_assignment()?;
            ObjectProperty::Property {
                key,
                value,
                shorthand: false,
            }
        } else {
            match key {
                PropertyName::Ident(name) if key_token.kind == TokenKind::Identifier => {
                    let value = Node::new(Expr::ident(name.clone()), key_token.span);
                    ObjectProperty::Property {
                        key: PropertyName::Ident(name),
                        value,
                        shorthand: true,
                    }
                }
                _ => return Err(self.error("Expected ':' after property name".to_string())),
            }
        };

        Ok(Node::new(prop, self.span_from(start)))
    }

    /// Consumes `get`, `set`, `async` and `*` when they prefix a method name
    /// rather than being the name themselves.
    pub(crate) fn parse_method_modifiers(&mut self) -> (MethodKind, bool, bool) {
        let name_follows = |p: &Self, allow_star: bool| {
            p.peek(1).map_or(false, |t| {
                matches!(
                    t.kind,
                    TokenKind::Identifier | TokenKind::StringLiteral | TokenKind::NumberLiteral | TokenKind::LBracket
                ) || t.kind.is_keyword()
                    || (allow_star && t.kind == TokenKind::Star)
            })
        };

        if (self.check_word("get") || self.check_word("set")) && name_follows(self, false) {
            let kind = if self.advance().value == "get" {
                MethodKind::Getter
            } else {
                MethodKind::Setter
            };
            return (kind, false, false);
        }

        let is_async = self.check_word("async")
            && name_follows(self, true)
            && !self.peek(1).map_or(false, |t| t.newline_before);
        if is_async {
            self.advance();
        }
        let is_generator = if self.check(&TokenKind::Star) {
            self.advance();
            true
        } else {
            false
        };
        (MethodKind::Method, is_async, is_generator)
    }

    fn parse_function_expression(&mut self, is_async: bool) -> ParseResult<Expr> {
        let is_generator = if self.check(&TokenKind::Star) {
            self.advance();
            true
        } else {
            false
        };
        let ident = if self.check(&TokenKind::Identifier) {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        let function = self.parse_function_rest(is_async, is_generator)?;
        Ok(Expr::Function { ident, function })
    }

    // =========================================================================
    // Arrow Functions
    // =========================================================================

    /// `x =>`, `(…) =>`, `async x =>` or `async (…) =>` ahead.
    fn is_arrow_start(&self) -> bool {
        let offset = if self.check_word("async")
            && self
                .peek(1)
                .map_or(false, |t| !t.newline_before && matches!(t.kind, TokenKind::Identifier | TokenKind::LParen))
        {
            1
        } else {
            0
        };

        match self.peek_kind(offset) {
            Some(TokenKind::Identifier) => self.peek_kind(offset + 1) == Some(&TokenKind::FatArrow),
            Some(TokenKind::LParen) => self
                .matching_paren(self.current + offset)
                .and_then(|close| self.tokens.get(close + 1))
                .map_or(false, |t| t.kind == TokenKind::FatArrow && !t.newline_before),
            _ => false,
        }
    }

    /// Index of the `)` closing the `(` at `open`.
    fn matching_paren(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (index, token) in self.tokens.iter().enumerate().skip(open) {
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return (token.kind == TokenKind::RParen).then_some(index);
                    }
                }
                TokenKind::Eof => return None,
                _ => {}
            }
        }
        None
    }

    fn parse_arrow_function(&mut self) -> ParseResult<Node<Expr>> {
        let start = self.current_token().span;
        let is_async = if self.check_word("async") && self.peek_kind(1) != Some(&TokenKind::FatArrow) {
            self.advance();
            true
        } else {
            false
        };

        let params = if self.check(&TokenKind::LParen) {
            self.advance();
            self.parse_params_until_rparen()?
        } else {
            let ident = self.parse_identifier()?;
            let span = ident.span;
            vec![Param {
                pattern: Node::new(Pattern::Ident(ident.value), span),
                is_rest: false,
            }]
        };
        self.consume(TokenKind::FatArrow)?;

        let body = if self.check(&TokenKind::LBrace) {
            ArrowBody::Block(self.allow_in(|p| p.parse_block_statement())?)
        } else {
            ArrowBody::Expr(Box::new(self.parse_assignment()?))
        };

        Ok(Node::new(
            Expr::Arrow {
                params,
                body,
                is_async,
            },
            self.span_from(start),
        ))
    }
}
