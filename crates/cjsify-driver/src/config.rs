//! Option loading: command-line flags over a JSON config file over defaults

use anyhow::{Context, Result};
use cjsify_modules::ModuleOptions;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Values given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    pub module_root: Option<String>,
    pub source_root: Option<String>,
    pub no_strict: bool,
    pub no_es_module_marker: bool,
}

/// Options for compiling `input`.
///
/// `filename` is always the input path. `filenameRelative` falls back to the
/// input path as given when the config file does not set it.
pub fn load_options(input: &Path, config: Option<&Path>, overrides: &OptionOverrides) -> Result<ModuleOptions> {
    let mut options = match config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            serde_json::from_str::<ModuleOptions>(&text)
                .with_context(|| format!("invalid config file {}", path.display()))?
        }
        None => ModuleOptions::default(),
    };

    let input = input.to_string_lossy().into_owned();
    options.filename_relative.get_or_insert_with(|| input.clone());
    options.filename = input;

    if let Some(root) = &overrides.module_root {
        options.module_root = Some(root.clone());
    }
    if let Some(root) = &overrides.source_root {
        options.source_root = Some(root.clone());
    }
    if overrides.no_strict {
        options.strict = false;
    }
    if overrides.no_es_module_marker {
        options.es_module_marker = false;
    }

    debug!(?options, "loaded options");
    Ok(options)
}
