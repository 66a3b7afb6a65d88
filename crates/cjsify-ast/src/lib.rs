//! # cjsify AST
//!
//! Abstract Syntax Tree definitions for the cjsify module lowering compiler.
//! Covers the JavaScript statement and expression grammar plus the declarative
//! module syntax (`import`/`export`) that the lowering pass removes.

use std::fmt;

// =============================================================================
// Core Types (kept in lib.rs - used by all modules)
// =============================================================================

/// Source location information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub file_id: usize,
}

impl Span {
    /// Location given to nodes synthesized by a transformation.
    pub const DUMMY: Span = Span {
        start: 0,
        end: 0,
        file_id: usize::MAX,
    };

    pub fn new(start: usize, end: usize, file_id: usize) -> Self {
        Self { start, end, file_id }
    }

    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            file_id: self.file_id,
        }
    }

    pub fn is_dummy(&self) -> bool {
        self.file_id == usize::MAX
    }

    /// Whether `pos` falls inside this span (end exclusive).
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }
}

/// AST node wrapper that includes span information
#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    pub span: Span,
    pub value: T,
}

impl<T> Node<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { span, value }
    }

    /// Node created by a transformation, with no source location.
    pub fn dummy(value: T) -> Self {
        Self::new(value, Span::DUMMY)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Node<U> {
        Node::new(f(self.value), self.span)
    }
}

/// Identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    pub name: String,
}

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// =============================================================================
// Module Declarations
// =============================================================================

pub mod expr;
pub mod stmt;
pub mod module;
pub mod walk;

// =============================================================================
// Re-exports
// =============================================================================

pub use expr::*;
pub use stmt::*;
pub use module::*;
pub use walk::{walk_expr, walk_program, walk_stmt, walk_stmts, ExprPosition, Rewrite, Rewriter, WalkError};

// =============================================================================
// Tests
// =============================================================================
