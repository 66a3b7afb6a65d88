//! # cjsify Modules
//!
//! Lowers ES module syntax to CommonJS.
//!
//! The pass runs in three steps over one file:
//!
//! 1. **Discovery** ([`discover_bindings`]) records every binding introduced by
//!    an export that carries a declaration.
//! 2. **Live bindings** ([`rewrite_live_bindings`]) rewrites each mutation of
//!    such a binding so the new value is also written to `exports`.
//! 3. **Expansion** ([`ModuleFormatter`]) turns each import and export item
//!    into plain statements.
//!
//! [`lower_program`] runs all three and returns a [`Script`](cjsify_ast::Script)
//! that no longer contains module syntax.

mod bindings;
mod error;
mod expand;
mod formatter;
mod imports;
mod live;
mod options;
mod output;
mod pass;
mod templates;

pub use bindings::{discover_bindings, BindingTable, ExportBinding};
pub use error::{TransformError, TransformResult};
pub use formatter::{CommonJsFormatter, ModuleFormatter};
pub use live::{rewrite_live_bindings, LiveBindingRewriter};
pub use options::{module_name, ModuleOptions};
pub use output::OutputStatements;
pub use pass::{lower_program, lower_program_with_scope};
pub use templates::{Slot, TemplateName, Templates};

/// Identifier of the CommonJS export object
pub const EXPORTS: &str = "exports";
