//! Lowering error types

use crate::templates::TemplateName;
use cjsify_ast::{Span, WalkError};
use thiserror::Error;

/// Contract violations that abort the pass for one file.
///
/// Mutations that do not resolve to an exported binding are not errors; they
/// are left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("template `{template}` was given no value for {slot}")]
    MissingTemplateSlot {
        template: TemplateName,
        slot: &'static str,
    },

    #[error("slot {slot} of template `{template}` needs an identifier")]
    InvalidTemplateSlot {
        template: TemplateName,
        slot: &'static str,
    },

    #[error("template `{template}` is not a single statement: {message}")]
    TemplateSyntax {
        template: TemplateName,
        message: String,
    },

    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error("malformed export at {}..{}: {reason}", .span.start, .span.end)]
    MalformedExport { span: Span, reason: &'static str },
}

pub type TransformResult<T> = Result<T, TransformError>;
