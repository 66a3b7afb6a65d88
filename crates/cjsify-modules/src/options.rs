//! Per-file options and module name derivation

use serde::Deserialize;

/// Options for lowering one file. Deserializes from camelCase JSON with every
/// key optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModuleOptions {
    pub filename: String,
    pub filename_relative: Option<String>,
    pub module_root: Option<String>,
    pub source_root: Option<String>,
    /// Prepend a `"use strict";` directive
    pub strict: bool,
    /// Mark files with exports through `exports.__esModule`
    pub es_module_marker: bool,
}

impl Default for ModuleOptions {
    fn default() -> Self {
        Self {
            filename: "unknown".to_string(),
            filename_relative: None,
            module_root: None,
            source_root: None,
            strict: true,
            es_module_marker: true,
        }
    }
}

impl ModuleOptions {
    pub fn for_file(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Name a module is known by: `module_root/` followed by the relative filename
/// without its source root and extension. Without a relative filename the
/// plain filename is used, minus a leading `/`.
pub fn module_name(options: &ModuleOptions) -> String {
    let mut name = String::new();
    if let Some(root) = non_empty(&options.module_root) {
        name.push_str(root);
        name.push('/');
    }

    let Some(mut relative) = non_empty(&options.filename_relative) else {
        let filename = &options.filename;
        name.push_str(filename.strip_prefix('/').unwrap_or(filename));
        return name;
    };

    if let Some(source_root) = non_empty(&options.source_root) {
        if let Some(rest) = relative.strip_prefix(source_root) {
            relative = rest.strip_prefix('/').unwrap_or(rest);
        }
    }

    name.push_str(strip_extension(relative));
    name
}

/// Drops everything from the first dot of the last path component; dots in
/// directory names are kept.
fn strip_extension(path: &str) -> &str {
    let file_start = path.rfind('/').map_or(0, |slash| slash + 1);
    match path[file_start..].find('.') {
        Some(dot) => &path[..file_start + dot],
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relative(path: &str) -> ModuleOptions {
        ModuleOptions {
            filename: format!("/abs/{}", path),
            filename_relative: Some(path.to_string()),
            ..ModuleOptions::default()
        }
    }

    #[test]
    fn test_defaults() {
        let options = ModuleOptions::default();
        assert_eq!(options.filename, "unknown");
        assert!(options.strict);
        assert!(options.es_module_marker);
        assert_eq!(module_name(&options), "unknown");
    }

    #[test]
    fn test_filename_without_relative() {
        let options = ModuleOptions::for_file("/lib/foo.js");
        assert_eq!(module_name(&options), "lib/foo.js");
    }

    #[test]
    fn test_relative_strips_extension() {
        assert_eq!(module_name(&relative("src/foo.js")), "src/foo");
        assert_eq!(module_name(&relative("foo.spec.js")), "foo");
        assert_eq!(module_name(&relative("v1.2/foo.js")), "v1.2/foo");
        assert_eq!(module_name(&relative("Makefile")), "Makefile");
    }

    #[test]
    fn test_source_root_and_module_root() {
        let options = ModuleOptions {
            module_root: Some("app".to_string()),
            source_root: Some("src".to_string()),
            ..relative("src/util/strings.js")
        };
        assert_eq!(module_name(&options), "app/util/strings");

        let unrelated_root = ModuleOptions {
            source_root: Some("lib".to_string()),
            ..relative("src/a.js")
        };
        assert_eq!(module_name(&unrelated_root), "src/a");
    }

    #[test]
    fn test_module_root_with_plain_filename() {
        let options = ModuleOptions {
            module_root: Some("pkg".to_string()),
            ..ModuleOptions::for_file("/index.js")
        };
        assert_eq!(module_name(&options), "pkg/index.js");
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{"filenameRelative": "src/a.js", "sourceRoot": "src", "esModuleMarker": false}"#;
        let options: ModuleOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.filename, "unknown");
        assert_eq!(options.source_root.as_deref(), Some("src"));
        assert!(options.strict);
        assert!(!options.es_module_marker);
        assert_eq!(module_name(&options), "a");
    }
}
