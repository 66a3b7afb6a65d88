//! # cjsify Emitter
//!
//! Prints syntax trees back to JavaScript source. Parentheses are inserted
//! from operator precedence and statement-start rules, so any tree built by
//! the parser or by the lowering pass prints as source that reads back to the
//! same tree. Output uses two-space indentation and one statement per line.

mod emitter;
mod expr;

pub use emitter::Emitter;

use cjsify_ast::{Expr, Node, Program, Script};

/// Prints a lowered script.
pub fn emit_script(script: &Script) -> String {
    let mut emitter = Emitter::new();
    emitter.script(script);
    emitter.finish()
}

/// Prints a module program, import and export declarations included.
pub fn emit_program(program: &Program) -> String {
    let mut emitter = Emitter::new();
    emitter.program(program);
    emitter.finish()
}

/// Prints a single expression at the lowest precedence.
pub fn emit_expr(expr: &Node<Expr>) -> String {
    let mut emitter = Emitter::new();
    emitter.expr(expr, expr::SEQUENCE);
    emitter.finish()
}
