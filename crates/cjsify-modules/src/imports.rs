//! Import lowering to `require` calls

use crate::error::TransformResult;
use crate::formatter::CommonJsFormatter;
use crate::output::OutputStatements;
use crate::templates::{Slot, TemplateName};
use cjsify_ast::*;
use tracing::debug;

impl CommonJsFormatter<'_> {
    /// `import "m"` requires the module for its side effects; every specifier
    /// becomes a `var` bound to the module object or one of its members.
    pub(crate) fn lower_import(&mut self, import: Node<ImportDecl>, out: &mut OutputStatements) -> TransformResult<()> {
        let span = import.span;
        let ImportDecl { specifiers, source } = import.value;
        debug!(source = %source, specifiers = specifiers.len(), "lowering import");

        if specifiers.is_empty() {
            let mut stmt = self
                .templates
                .build(TemplateName::Require, [("MODULE_NAME", Slot::string(&source))])?;
            stmt.span = span;
            out.push(stmt);
            return Ok(());
        }

        for (i, specifier) in specifiers.into_iter().enumerate() {
            let mut stmt = match specifier.value {
                ImportSpecifier::Namespace(local) => self.templates.build(
                    TemplateName::RequireAssign,
                    [
                        ("VARIABLE_NAME", Slot::name(local.value.name)),
                        ("MODULE_NAME", Slot::string(&source)),
                    ],
                )?,
                ImportSpecifier::Default(local) => self.require_key(local.value.name, &source, "default")?,
                ImportSpecifier::Named { imported, local } => {
                    let local = local.unwrap_or_else(|| imported.clone());
                    self.require_key(local.value.name, &source, imported.value.name)?
                }
            };
            if i == 0 {
                stmt.span = span;
            }
            out.push(stmt);
        }
        Ok(())
    }

    /// `var VARIABLE = require("source").KEY;`
    fn require_key(&mut self, variable: String, source: &str, key: impl Into<String>) -> TransformResult<Node<Stmt>> {
        self.templates.build(
            TemplateName::RequireAssignKey,
            [
                ("VARIABLE_NAME", Slot::name(variable)),
                ("MODULE_NAME", Slot::string(source)),
                ("KEY", Slot::name(key)),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::ModuleFormatter;
    use cjsify_emit::emit_script;
    use cjsify_parser::parse_source;
    use cjsify_scope::ScopeTree;

    fn lower_imports(source: &str) -> String {
        let mut program = parse_source(source, 0).unwrap();
        let scope = ScopeTree::analyze(&program);
        let mut formatter = CommonJsFormatter::new(&mut program, &scope).unwrap();
        let mut out = OutputStatements::new();
        for item in program.items {
            if let ModuleItem::Import(import) = item.value {
                formatter
                    .import_declaration(Node::new(import, item.span), &mut out)
                    .unwrap();
            }
        }
        emit_script(&Script {
            body: out.finish(),
            span: Span::DUMMY,
        })
    }

    #[test]
    fn test_side_effect_import() {
        assert_eq!(lower_imports("import \"./setup\";"), "require(\"./setup\");\n");
    }

    #[test]
    fn test_default_namespace_and_named_imports() {
        assert_eq!(
            lower_imports("import React, * as all from \"react\";\nimport { a, b as c } from \"m\";"),
            "var React = require(\"react\").default;\n\
             var all = require(\"react\");\n\
             var a = require(\"m\").a;\n\
             var c = require(\"m\").b;\n"
        );
    }
}
