//! Statement templates
//!
//! Small snippets of JavaScript with UPPER_CASE placeholders, parsed once with
//! the project parser and filled by substitution. Placeholders can stand for
//! an expression, a member property name or a declared variable name.

use crate::error::{TransformError, TransformResult};
use cjsify_ast::*;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateName {
    ExportsAssign,
    ExportsWildcard,
    Require,
    RequireAssign,
    RequireAssignKey,
    EsModuleMarker,
}

impl TemplateName {
    pub fn source(&self) -> &'static str {
        match self {
            TemplateName::ExportsAssign => "exports.KEY = VALUE;",
            TemplateName::ExportsWildcard => {
                r#"(function (obj) { for (var key in obj) { if (key !== "__esModule") exports[key] = obj[key]; } })(OBJECT);"#
            }
            TemplateName::Require => "require(MODULE_NAME);",
            TemplateName::RequireAssign => "var VARIABLE_NAME = require(MODULE_NAME);",
            TemplateName::RequireAssignKey => "var VARIABLE_NAME = require(MODULE_NAME).KEY;",
            TemplateName::EsModuleMarker => {
                r#"Object.defineProperty(exports, "__esModule", { value: true });"#
            }
        }
    }

    /// Placeholders that must be given a value
    pub fn slots(&self) -> &'static [&'static str] {
        match self {
            TemplateName::ExportsAssign => &["KEY", "VALUE"],
            TemplateName::ExportsWildcard => &["OBJECT"],
            TemplateName::Require => &["MODULE_NAME"],
            TemplateName::RequireAssign => &["VARIABLE_NAME", "MODULE_NAME"],
            TemplateName::RequireAssignKey => &["VARIABLE_NAME", "MODULE_NAME", "KEY"],
            TemplateName::EsModuleMarker => &[],
        }
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemplateName::ExportsAssign => "exports-assign",
            TemplateName::ExportsWildcard => "exports-wildcard",
            TemplateName::Require => "require",
            TemplateName::RequireAssign => "require-assign",
            TemplateName::RequireAssignKey => "require-assign-key",
            TemplateName::EsModuleMarker => "es-module-marker",
        };
        write!(f, "{}", name)
    }
}

/// Value for one placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Expr(Node<Expr>),
    Name(String),
}

impl Slot {
    pub fn name(name: impl Into<String>) -> Self {
        Slot::Name(name.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Slot::Expr(Node::dummy(Expr::string(value)))
    }

    fn to_expr(&self) -> Node<Expr> {
        match self {
            Slot::Expr(expr) => expr.clone(),
            Slot::Name(name) => Node::dummy(Expr::ident(name.as_str())),
        }
    }

    fn as_name(&self) -> Option<&str> {
        match self {
            Slot::Name(name) => Some(name),
            Slot::Expr(expr) => expr.value.as_ident().map(|ident| ident.name.as_str()),
        }
    }
}

/// Parsed templates, cached per pass.
#[derive(Debug, Default)]
pub struct Templates {
    parsed: FxHashMap<TemplateName, Node<Stmt>>,
}

impl Templates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the statement for `name` with every placeholder substituted.
    pub fn build<I>(&mut self, name: TemplateName, slots: I) -> TransformResult<Node<Stmt>>
    where
        I: IntoIterator<Item = (&'static str, Slot)>,
    {
        let slots: FxHashMap<&'static str, Slot> = slots.into_iter().collect();
        if let Some(missing) = name.slots().iter().find(|slot| !slots.contains_key(*slot)) {
            return Err(TransformError::MissingTemplateSlot {
                template: name,
                slot: missing,
            });
        }

        let mut stmt = self.parsed(name)?.clone();
        let mut filler = SlotFiller {
            template: name,
            slots: &slots,
        };
        if let Rewrite::Replace(new) = walk_stmt(&mut stmt, &mut filler)? {
            stmt = new;
        }
        Ok(stmt)
    }

    /// Builds an expression-statement template and unwraps the expression.
    pub fn build_expr<I>(&mut self, name: TemplateName, slots: I) -> TransformResult<Node<Expr>>
    where
        I: IntoIterator<Item = (&'static str, Slot)>,
    {
        match self.build(name, slots)?.value {
            Stmt::Expr(expr) => Ok(expr),
            _ => Err(TransformError::TemplateSyntax {
                template: name,
                message: "expected an expression statement".to_string(),
            }),
        }
    }

    fn parsed(&mut self, name: TemplateName) -> TransformResult<&Node<Stmt>> {
        let stmt = match self.parsed.entry(name) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(parse_template(name)?),
        };
        Ok(stmt)
    }
}

/// Template nodes carry synthesized spans.
fn parse_template(name: TemplateName) -> TransformResult<Node<Stmt>> {
    let program = cjsify_parser::parse_source(name.source(), Span::DUMMY.file_id).map_err(|errors| {
        TransformError::TemplateSyntax {
            template: name,
            message: errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        }
    })?;

    let mut items = program.items.into_iter();
    match (items.next(), items.next()) {
        (Some(Node { value: ModuleItem::Stmt(stmt), .. }), None) => Ok(stmt),
        _ => Err(TransformError::TemplateSyntax {
            template: name,
            message: "expected exactly one statement".to_string(),
        }),
    }
}

struct SlotFiller<'a> {
    template: TemplateName,
    slots: &'a FxHashMap<&'static str, Slot>,
}

impl SlotFiller<'_> {
    /// Name substituted for a placeholder in identifier position.
    fn name_for(&self, placeholder: &str) -> TransformResult<Option<String>> {
        let Some((&slot_name, slot)) = self.slots.get_key_value(placeholder) else {
            return Ok(None);
        };
        match slot.as_name() {
            Some(name) => Ok(Some(name.to_string())),
            None => Err(TransformError::InvalidTemplateSlot {
                template: self.template,
                slot: slot_name,
            }),
        }
    }
}

impl Rewriter for SlotFiller<'_> {
    type Error = TransformError;

    fn rewrite_stmt(&mut self, stmt: &mut Node<Stmt>) -> TransformResult<Rewrite<Node<Stmt>>> {
        if let Stmt::Decl(Decl::Var(var)) = &mut stmt.value {
            for declarator in &mut var.declarations {
                if let Pattern::Ident(ident) = &mut declarator.pattern.value {
                    if let Some(name) = self.name_for(&ident.name)? {
                        ident.name = name;
                    }
                }
            }
        }
        Ok(Rewrite::Unchanged)
    }

    fn rewrite_expr(
        &mut self,
        expr: &mut Node<Expr>,
        _position: ExprPosition,
    ) -> TransformResult<Rewrite<Node<Expr>>> {
        match &mut expr.value {
            Expr::Ident(ident) => {
                if let Some(slot) = self.slots.get(ident.name.as_str()) {
                    return Ok(Rewrite::Replace(slot.to_expr()));
                }
            }
            Expr::Member { property, .. } => {
                if let Some(name) = self.name_for(&property.value.name)? {
                    property.value.name = name;
                }
            }
            _ => {}
        }
        Ok(Rewrite::Unchanged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cjsify_emit::{emit_expr, emit_script};

    fn print(stmt: Node<Stmt>) -> String {
        emit_script(&Script {
            body: vec![stmt],
            span: Span::DUMMY,
        })
    }

    #[test]
    fn test_every_template_parses() {
        for name in [
            TemplateName::ExportsAssign,
            TemplateName::ExportsWildcard,
            TemplateName::Require,
            TemplateName::RequireAssign,
            TemplateName::RequireAssignKey,
            TemplateName::EsModuleMarker,
        ] {
            assert!(parse_template(name).is_ok(), "{}", name);
        }
    }

    #[test]
    fn test_exports_assign() {
        let mut templates = Templates::new();
        let stmt = templates
            .build(
                TemplateName::ExportsAssign,
                [("KEY", Slot::name("answer")), ("VALUE", Slot::Expr(Node::dummy(Expr::number(42.0))))],
            )
            .unwrap();
        assert_eq!(print(stmt), "exports.answer = 42;\n");
    }

    #[test]
    fn test_require_assign_key() {
        let mut templates = Templates::new();
        let stmt = templates
            .build(
                TemplateName::RequireAssignKey,
                [
                    ("VARIABLE_NAME", Slot::name("local")),
                    ("MODULE_NAME", Slot::string("./dep")),
                    ("KEY", Slot::name("remote")),
                ],
            )
            .unwrap();
        assert_eq!(print(stmt), "var local = require(\"./dep\").remote;\n");
    }

    #[test]
    fn test_wildcard_and_marker() {
        let mut templates = Templates::new();
        let object = templates
            .build_expr(TemplateName::Require, [("MODULE_NAME", Slot::string("m"))])
            .unwrap();
        assert_eq!(emit_expr(&object), "require(\"m\")");

        let wildcard = templates
            .build(TemplateName::ExportsWildcard, [("OBJECT", Slot::Expr(object))])
            .unwrap();
        assert_eq!(
            print(wildcard),
            "(function (obj) {\n  for (var key in obj) {\n    if (key !== \"__esModule\") exports[key] = obj[key];\n  }\n})(require(\"m\"));\n"
        );

        let marker = templates.build(TemplateName::EsModuleMarker, std::iter::empty()).unwrap();
        assert_eq!(
            print(marker),
            "Object.defineProperty(exports, \"__esModule\", { value: true });\n"
        );
    }

    #[test]
    fn test_filled_values_are_not_refilled() {
        let mut templates = Templates::new();
        let stmt = templates
            .build(
                TemplateName::ExportsAssign,
                [("KEY", Slot::name("VALUE")), ("VALUE", Slot::name("KEY"))],
            )
            .unwrap();
        assert_eq!(print(stmt), "exports.VALUE = KEY;\n");
    }

    #[test]
    fn test_missing_slot() {
        let mut templates = Templates::new();
        let err = templates
            .build(TemplateName::ExportsAssign, [("KEY", Slot::name("x"))])
            .unwrap_err();
        assert_eq!(
            err,
            TransformError::MissingTemplateSlot {
                template: TemplateName::ExportsAssign,
                slot: "VALUE"
            }
        );
        assert_eq!(err.to_string(), "template `exports-assign` was given no value for VALUE");
    }

    #[test]
    fn test_name_slot_rejects_expressions() {
        let mut templates = Templates::new();
        let err = templates
            .build(
                TemplateName::ExportsAssign,
                [("KEY", Slot::string("x")), ("VALUE", Slot::name("x"))],
            )
            .unwrap_err();
        assert_eq!(
            err,
            TransformError::InvalidTemplateSlot {
                template: TemplateName::ExportsAssign,
                slot: "KEY"
            }
        );
    }
}
