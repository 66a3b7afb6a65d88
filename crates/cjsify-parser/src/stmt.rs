//! Statement parsing

use super::*;

impl Parser {
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Node<Stmt>> {
        let start = self.current_token().span;

        let stmt = match self.current_token().kind {
            TokenKind::LBrace => Stmt::Block(self.parse_block_statement()?.value),
            TokenKind::If => self.parse_if_statement()?,
            TokenKind::For => self.parse_for_statement()?,
            TokenKind::While => {
                self.advance();
                let test = self.parse_paren_expression()?;
                let body = Box::new(self.parse_statement()?);
                Stmt::While { test, body }
            }
            TokenKind::Do => {
                self.advance();
                let body = Box::new(self.parse_statement()?);
                self.consume(TokenKind::While)?;
                let test = self.parse_paren_expression()?;
                // A semicolon after do-while is always optional.
                if self.check(&TokenKind::Semicolon) {
                    self.advance();
                }
                Stmt::DoWhile { body, test }
            }
            TokenKind::Switch => self.parse_switch_statement()?,
            TokenKind::Return => {
                self.advance();
                let argument = if self.at_statement_end() {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.consume_semicolon()?;
                Stmt::Return(argument)
            }
            TokenKind::Break | TokenKind::Continue => {
                let is_break = self.advance().kind == TokenKind::Break;
                let label = if self.check(&TokenKind::Identifier) && !self.current_token().newline_before {
                    Some(self.parse_identifier()?)
                } else {
                    None
                };
                self.consume_semicolon()?;
                if is_break {
                    Stmt::Break(label)
                } else {
                    Stmt::Continue(label)
                }
            }
            TokenKind::Throw => {
                self.advance();
                if self.current_token().newline_before {
                    return Err(self.error("Line break is not allowed after 'throw'".to_string()));
                }
                let argument = self.parse_expression()?;
                self.consume_semicolon()?;
                Stmt::Throw(argument)
            }
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
                let var_decl = self.parse_var_decl()?;
                self.consume_semicolon()?;
                Stmt::Decl(Decl::Var(var_decl))
            }
            TokenKind::Function => Stmt::Decl(Decl::Function(self.parse_function_decl(false)?)),
            TokenKind::Class => Stmt::Decl(Decl::Class(self.parse_class_decl()?)),
            TokenKind::Import | TokenKind::Export
                if !matches!(self.peek_kind(1), Some(TokenKind::LParen) | Some(TokenKind::Dot)) =>
            {
                return Err(self.error("Module declarations are only allowed at the top level".to_string()));
            }
            _ if self.is_async_function_start() => {
                self.advance();
                Stmt::Decl(Decl::Function(self.parse_function_decl(true)?))
            }
            _ if self.check(&TokenKind::Identifier) && self.peek_kind(1) == Some(&TokenKind::Colon) => {
                let label = self.parse_identifier()?;
                self.consume(TokenKind::Colon)?;
                let body = Box::new(self.parse_statement()?);
                Stmt::Labeled { label, body }
            }
            _ => {
                let expr = self.parse_expression()?;
                self.consume_semicolon()?;
                Stmt::Expr(expr)
            }
        };

        Ok(Node::new(stmt, self.span_from(start)))
    }

    fn at_statement_end(&self) -> bool {
        self.check(&TokenKind::Semicolon)
            || self.check(&TokenKind::RBrace)
            || self.is_at_end()
            || self.current_token().newline_before
    }

    pub(crate) fn parse_block_statement(&mut self) -> ParseResult<Node<BlockStmt>> {
        let start = self.current_token().span;
        self.consume(TokenKind::LBrace)?;

        let mut stmts = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            stmts.push(self.parse_statement()?);
        }

        self.consume(TokenKind::RBrace)?;

        Ok(Node::new(BlockStmt { stmts }, self.span_from(start)))
    }

    /// `var`/`let`/`const` declarators, without the terminator.
    pub(crate) fn parse_var_decl(&mut self) -> ParseResult<VarDecl> {
        let kind = match self.current_token().kind {
            TokenKind::Const => VarDeclKind::Const,
            TokenKind::Let => VarDeclKind::Let,
            TokenKind::Var => VarDeclKind::Var,
            _ => return Err(self.error("Expected var, let, or const".to_string())),
        };
        self.advance();

        let mut declarations = Vec::new();

        loop {
            let pattern = self.parse_binding_pattern()?;
            let init = if self.check(&TokenKind::Eq) {
                self.advance();
                Some(self.parse_assignment()?)
            } else {
                None
            };

            declarations.push(VarDeclarator { pattern, init });

            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        Ok(VarDecl { kind, declarations })
    }

    fn parse_paren_expression(&mut self) -> ParseResult<Node<Expr>> {
        self.consume(TokenKind::LParen)?;
        let expr = self.parse_expression()?;
        self.consume(TokenKind::RParen)?;
        Ok(expr)
    }

    fn parse_if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::If)?;
        let test = self.parse_paren_expression()?;
        let consequent = Box::new(self.parse_statement()?);

        let alternate = if self.check(&TokenKind::Else) {
            self.advance();
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            test,
            consequent,
            alternate,
        })
    }

    fn parse_for_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::For)?;
        self.consume(TokenKind::LParen)?;

        // Initializer, parsed with `in` disabled
        let saved_no_in = std::mem::replace(&mut self.no_in, true);
        let init = if self.check(&TokenKind::Semicolon) {
            Ok(None)
        } else if matches!(
            self.current_token().kind,
            TokenKind::Var | TokenKind::Let | TokenKind::Const
        ) {
            self.parse_var_decl().map(|var| Some(ForInit::Var(var)))
        } else {
            self.parse_expression().map(|expr| Some(ForInit::Expr(expr)))
        };
        self.no_in = saved_no_in;
        let init = init?;

        // for-in / for-of
        let is_in = self.check(&TokenKind::In);
        if is_in || self.check_word("of") {
            let left = match init {
                Some(ForInit::Var(var)) => {
                    if var.declarations.len() != 1 || var.declarations[0].init.is_some() {
                        return Err(self.error("Invalid left-hand side in for-in/of loop".to_string()));
                    }
                    ForHead::Var(var)
                }
                Some(ForInit::Expr(expr)) => ForHead::Pattern(self.expr_to_pattern(expr)?),
                None => return Err(self.error("Missing left-hand side in for-in/of loop".to_string())),
            };
            self.advance();
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
                Stmt::ForOf { left, right, body }
            });
        }

        self.consume(TokenKind::Semicolon)?;
        let test = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume(TokenKind::Semicolon)?;
        let update = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume(TokenKind::RParen)?;
        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::For {
            init,
            test,
            update,
            body,
        })
    }

    fn parse_switch_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::Switch)?;
        let discriminant = self.parse_paren_expression()?;
        self.consume(TokenKind::LBrace)?;

        let mut cases = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            let test = if self.check(&TokenKind::Default) {
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
        Ok(Stmt::Switch { discriminant, cases })
    }

    fn parse_try_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::Try)?;
        let block = self.parse_block_statement()?;

        let handler = if self.check(&TokenKind::Catch) {
            let start = self.advance().span;
            let param = if self.check(&TokenKind::LParen) {
                self.advance();
                let param = self.parse_binding_pattern()?;
                self.consume(TokenKind::RParen)?;
                Some(param)
            } else {
                None
            };
            let body = self.parse_block_statement()?;
            Some(Node::new(CatchClause { param, body }, self.span_from(start)))
        } else {
            None
        };

        let finalizer = if self.check(&TokenKind::Finally) {
            self.advance();
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(self.error("Missing catch or finally after try".to_string()));
        }

        Ok(Stmt::Try {
            block,
            handler,
            finalizer,
        })
    }
}
