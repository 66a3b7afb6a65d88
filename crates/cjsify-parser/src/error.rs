//! Parse error types

use cjsify_ast::Span;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("Parse error at {}..{}: {message}", .span.start, .span.end)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
