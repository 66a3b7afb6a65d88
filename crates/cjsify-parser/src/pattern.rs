//! Pattern parsing

use super::*;

impl Parser {
    pub(crate) fn parse_binding_pattern(&mut self) -> ParseResult<Node<Pattern>> {
        let start = self.current_token().span;

        let pattern = match self.current_token().kind {
            TokenKind::LBracket => self.parse_array_pattern()?,
            TokenKind::LBrace => self.parse_object_pattern()?,
            TokenKind::Identifier => Pattern::Ident(self.parse_identifier()?.value),
            kind => return Err(self.error(format!("Expected pattern, found {:?}", kind))),
        };

        Ok(Node::new(pattern, self.span_from(start)))
    }

    /// A pattern that may have a default value (elements, properties, parameters)
    pub(crate) fn parse_binding_element(&mut self) -> ParseResult<Node<Pattern>> {
        let pattern = self.parse_binding_pattern()?;
        self.parse_pattern_default(pattern)
    }

    fn parse_pattern_default(&mut self, pattern: Node<Pattern>) -> ParseResult<Node<Pattern>> {
        if !self.check(&TokenKind::Eq) {
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

    fn parse_array_pattern(&mut self) -> ParseResult<Pattern> {
        self.consume(TokenKind::LBracket)?;
        let mut elements = Vec::new();
        let mut rest = None;

        while !self.check(&TokenKind::RBracket) && !self.is_at_end() {
            if self.check(&TokenKind::DotDotDot) {
                self.advance();
                rest = Some(Box::new(self.parse_binding_pattern()?));
                break;
            } else if self.check(&TokenKind::Comma) {
                elements.push(None);
                self.advance();
            } else {
                elements.push(Some(self.parse_binding_element()?));
                if !self.check(&TokenKind::RBracket) {
                    self.consume(TokenKind::Comma)?;
                }
            }
        }

        self.consume(TokenKind::RBracket)?;

        Ok(Pattern::Array { elements, rest })
    }

    fn parse_object_pattern(&mut self) -> ParseResult<Pattern> {
        self.consume(TokenKind::LBrace)?;
        let mut properties = Vec::new();
        let mut rest = None;

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            if self.check(&TokenKind::DotDotDot) {
                self.advance();
                rest = Some(Box::new(self.parse_binding_pattern()?));
                break;
            }

            let key_token = self.current_token().clone();
            let key = self.parse_property_name()?;

            let (value, shorthand) = if self.check(&TokenKind::Colon) {
                self.advance();
                (self.parse_binding_element()?, false)
            } else {
                match &key {
                    PropertyName::Ident(name) if key_token.kind == TokenKind::Identifier => {
                        let pattern = Node::<Pattern>::ident(name.clone(), key_token.span);
                        (self.parse_pattern_default(pattern)?, true)
                    }
                    _ => return Err(ParseError::new("Invalid object pattern shorthand", key_token.span)),
                }
            };

            properties.push(ObjectPatternProperty {
                key,
                value,
                shorthand,
            });

            if !self.check(&TokenKind::RBrace) {
                self.consume(TokenKind::Comma)?;
            }
        }

        self.consume(TokenKind::RBrace)?;

        Ok(Pattern::Object { properties, rest })
    }

    /// Reinterprets an already parsed expression as a binding target, as in
    /// the head of `for (x in obj)`.
    pub(crate) fn expr_to_pattern(&self, expr: Node<Expr>) -> ParseResult<Node<Pattern>> {
        let span = expr.span;
        let pattern = match expr.value {
            Expr::Ident(ident) => Pattern::Ident(ident),
            Expr::Array(elements) => {
                let mut patterns = Vec::new();
                let mut rest = None;
                let count = elements.len();
                for (i, element) in elements.into_iter().enumerate() {
                    match element {
                        Some(Node {
                            value: Expr::Spread(inner),
                            ..
                        }) if i + 1 == count => rest = Some(Box::new(self.expr_to_pattern(*inner)?)),
                        Some(element) => patterns.push(Some(self.expr_to_pattern(element)?)),
                        None => patterns.push(None),
                    }
                }
                Pattern::Array {
                    elements: patterns,
                    rest,
                }
            }
            Expr::Object(props) => {
                let mut properties = Vec::new();
                let mut rest = None;
                for prop in props {
                    match prop.value {
                        ObjectProperty::Property { key, value, shorthand } => {
                            properties.push(ObjectPatternProperty {
                                key,
                                value: self.expr_to_pattern(value)?,
                                shorthand,
                            });
                        }
                        ObjectProperty::Spread(inner) => rest = Some(Box::new(self.expr_to_pattern(inner)?)),
                        ObjectProperty::Method { .. } => {
                            return Err(ParseError::new("Invalid destructuring target", prop.span))
                        }
                    }
                }
                Pattern::Object { properties, rest }
            }
            Expr::Assignment {
                target,
                op: AssignOp::Assign,
                value,
            } => Pattern::Assignment {
                pattern: Box::new(self.expr_to_pattern(*target)?),
                default: value,
            },
            _ => return Err(ParseError::new("Invalid destructuring target", span)),
        };
        Ok(Node::new(pattern, span))
    }
}
