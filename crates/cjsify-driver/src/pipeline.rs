//! Compilation pipeline: source text to CommonJS source text

use cjsify_emit::emit_script;
use cjsify_modules::{lower_program, ModuleOptions, TransformError};
use cjsify_parser::{parse_source, ParseError};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{} syntax error(s)", .0.len())]
    Parse(Vec<ParseError>),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Compiles one module to a CommonJS script.
pub fn compile_source(source: &str, options: &ModuleOptions) -> Result<String, CompileError> {
    info!(file = %options.filename, bytes = source.len(), "compiling");

    let program = parse_source(source, 0).map_err(CompileError::Parse)?;
    debug!(items = program.items.len(), module_syntax = program.has_module_syntax(), "parsed");

    let script = lower_program(program, options)?;
    Ok(emit_script(&script))
}
