//! Helper methods and utilities

use super::*;

impl Parser {
    pub(crate) fn parse_identifier(&mut self) -> ParseResult<Node<Ident>> {
        let token = self.consume(TokenKind::Identifier)?;
        Ok(Node::new(Ident::new(token.value.clone()), token.span))
    }

    /// IdentifierName: identifiers and reserved words, as after `.` or in
    /// import/export specifiers.
    pub(crate) fn parse_identifier_name(&mut self) -> ParseResult<Node<Ident>> {
        let token = self.current_token();
        if token.kind == TokenKind::Identifier || token.kind.is_keyword() {
            let node = Node::new(Ident::new(token.value.clone()), token.span);
            self.advance();
            Ok(node)
        } else {
            Err(self.error(format!("Expected identifier, found {:?}", token.kind)))
        }
    }

    pub(crate) fn parse_property_name(&mut self) -> ParseResult<PropertyName> {
        let kind = self.current_token().kind;
        match kind {
            TokenKind::StringLiteral => {
                let value = self.advance().value.clone();
                Ok(PropertyName::String(value))
            }
            TokenKind::NumberLiteral => {
                let token = self.advance().clone();
                let value = parse_number(&token.value)
                    .ok_or_else(|| ParseError::new("Invalid numeric literal", token.span))?;
                Ok(PropertyName::Number(value))
            }
            TokenKind::LBracket => {
                self.advance();
                let expr = Box::new(self.parse_assignment()?);
                self.consume(TokenKind::RBracket)?;
                Ok(PropertyName::Computed(expr))
            }
            _ if kind == TokenKind::Identifier || kind.is_keyword() => {
                let name = self.advance().value.clone();
                Ok(PropertyName::Ident(name))
            }
            _ => Err(self.error("Expected property name".to_string())),
        }
    }

    pub(crate) fn binary_operator(&self) -> Option<(u8, BinaryOp)> {
        let op = match self.current_token().kind {
            TokenKind::QuestionQuestion => BinaryOp::NullishCoalesce,
            TokenKind::PipePipe => BinaryOp::Or,
            TokenKind::AmpAmp => BinaryOp::And,
            TokenKind::Pipe => BinaryOp::BitOr,
            TokenKind::Caret => BinaryOp::BitXor,
            TokenKind::Amp => BinaryOp::BitAnd,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::BangEq => BinaryOp::NotEq,
            TokenKind::EqEqEq => BinaryOp::StrictEq,
            TokenKind::BangEqEq => BinaryOp::StrictNotEq,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::GtEq,
            TokenKind::Instanceof => BinaryOp::InstanceOf,
            TokenKind::In if !self.no_in => BinaryOp::In,
            TokenKind::LtLt => BinaryOp::LeftShift,
            TokenKind::GtGt => BinaryOp::RightShift,
            TokenKind::GtGtGt => BinaryOp::UnsignedRightShift,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Mod,
            TokenKind::StarStar => BinaryOp::Pow,
            _ => return None,
        };
        Some((binary_precedence(op), op))
    }

    pub(crate) fn assignment_operator(&self) -> Option<AssignOp> {
        let op = match self.current_token().kind {
            TokenKind::Eq => AssignOp::Assign,
            TokenKind::PlusEq => AssignOp::AddAssign,
            TokenKind::MinusEq => AssignOp::SubAssign,
            TokenKind::StarEq => AssignOp::MulAssign,
            TokenKind::SlashEq => AssignOp::DivAssign,
            TokenKind::PercentEq => AssignOp::ModAssign,
            TokenKind::StarStarEq => AssignOp::PowAssign,
            TokenKind::AmpAmpEq => AssignOp::AndAssign,
            TokenKind::PipePipeEq => AssignOp::OrAssign,
            TokenKind::QuestionQuestionEq => AssignOp::NullishAssign,
            TokenKind::LtLtEq => AssignOp::LeftShiftAssign,
            TokenKind::GtGtEq => AssignOp::RightShiftAssign,
            TokenKind::GtGtGtEq => AssignOp::UnsignedRightShiftAssign,
            TokenKind::AmpEq => AssignOp::BitAndAssign,
            TokenKind::PipeEq => AssignOp::BitOrAssign,
            TokenKind::CaretEq => AssignOp::BitXorAssign,
            _ => return None,
        };
        Some(op)
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

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        !self.is_at_end() && &self.current_token().kind == kind
    }

    /// Identifier with the given text, for contextual words like `from`.
    pub(crate) fn check_word(&self, word: &str) -> bool {
        self.check(&TokenKind::Identifier) && self.current_token().value == word
    }

    pub(crate) fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.current + offset)
    }

    pub(crate) fn peek_kind(&self, offset: usize) -> Option<&TokenKind> {
        self.peek(offset).map(|t| &t.kind)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len() || self.current_token().kind == TokenKind::Eof
    }

    pub(crate) fn consume(&mut self, kind: TokenKind) -> ParseResult<&Token> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(self.error(format!("Expected {:?}, found {:?}", kind, self.current_token().kind)))
        }
    }

    pub(crate) fn consume_word(&mut self, word: &str) -> ParseResult<()> {
        if self.check_word(word) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!("Expected '{}', found {:?}", word, self.current_token().kind)))
        }
    }

    /// Statement terminator with automatic semicolon insertion before `}`,
    /// end of input, or a line break.
    pub(crate) fn consume_semicolon(&mut self) -> ParseResult<()> {
        if self.check(&TokenKind::Semicolon) {
            self.advance();
            return Ok(());
        }
        if self.check(&TokenKind::RBrace) || self.is_at_end() || self.current_token().newline_before {
            return Ok(());
        }
        Err(self.error(format!("Expected ';', found {:?}", self.current_token().kind)))
    }

    pub(crate) fn span_from(&self, start: Span) -> Span {
        start.merge(&self.previous_token().span)
    }

    pub(crate) fn error(&self, message: String) -> ParseError {
        let token = self.current_token();
        let message = if token.kind == TokenKind::Error {
            token.value.clone()
        } else {
            message
        };
        ParseError::new(message, token.span)
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
                | TokenKind::Return
                | TokenKind::Import
                | TokenKind::Export => return,
                _ => {}
            }

            self.advance();
        }
    }
}

// =========================================================================
// Operator Precedence
// =========================================================================

/// Binding power of binary operators; higher binds tighter.
pub(crate) fn binary_precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::NullishCoalesce => 1,
        BinaryOp::Or => 2,
        BinaryOp::And => 3,
        BinaryOp::BitOr => 4,
        BinaryOp::BitXor => 5,
        BinaryOp::BitAnd => 6,
        BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::StrictEq | BinaryOp::StrictNotEq => 7,
        BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq
        | BinaryOp::In
        | BinaryOp::InstanceOf => 8,
        BinaryOp::LeftShift | BinaryOp::RightShift | BinaryOp::UnsignedRightShift => 9,
        BinaryOp::Add | BinaryOp::Sub => 10,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 11,
        BinaryOp::Pow => 12,
    }
}

pub(crate) fn parse_number(text: &str) -> Option<f64> {
    let radix = match text.get(..2) {
        Some("0x") | Some("0X") => 16,
        Some("0o") | Some("0O") => 8,
        Some("0b") | Some("0B") => 2,
        _ => return text.parse::<f64>().ok(),
    };
    u64::from_str_radix(&text[2..], radix).ok().map(|v| v as f64)
}
