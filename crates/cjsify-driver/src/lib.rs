//! cjsify Compiler Driver Library
//!
//! The pipeline behind the `cjsify` binary (lex → parse → lower → emit),
//! option loading, diagnostics rendering and logging setup.

pub mod config;
pub mod diagnostics;
pub mod logging;
pub mod pipeline;

pub use config::{load_options, OptionOverrides};
pub use pipeline::{compile_source, CompileError};
