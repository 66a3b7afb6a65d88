//! Export declaration expansion
//!
//! | source                          | output                                          |
//! |---------------------------------|-------------------------------------------------|
//! | `export var a = 1, b;`          | `var a = exports.a = 1;` `var b = exports.b = undefined;` |
//! | `export function f() {}`        | `function f() {}` + hoisted `exports.f = f;`    |
//! | `export class C {}`             | `class C {}` `exports.C = C;`                   |
//! | `export default 42;`            | `exports.default = 42;`                         |
//! | `export { a as b };`            | `exports.b = a;`                                |
//! | `export { a as b } from "m";`   | `exports.b = require("m").a;`                   |
//! | `export * as ns from "m";`      | `exports.ns = require("m");`                    |
//! | `export * from "m";`            | copy of every member of `require("m")`          |

use crate::error::{TransformError, TransformResult};
use crate::formatter::CommonJsFormatter;
use crate::output::OutputStatements;
use crate::templates::{Slot, TemplateName};
use cjsify_ast::*;
use cjsify_scope::Lookup;
use tracing::{debug, warn};

fn single_var(kind: VarDeclKind, declarator: VarDeclarator, span: Span) -> Node<Stmt> {
    Node::new(
        Stmt::Decl(Decl::Var(VarDecl {
            kind,
            declarations: vec![declarator],
        })),
        span,
    )
}

impl CommonJsFormatter<'_> {
    pub(crate) fn expand_export(&mut self, export: Node<ExportDecl>, out: &mut OutputStatements) -> TransformResult<()> {
        let before = out.len();
        let span = export.span;
        match export.value {
            ExportDecl::Decl(decl) => self.export_decl(decl, out)?,
            ExportDecl::Default(default) => self.export_default(default, out)?,
            ExportDecl::Specifiers {
                specifiers,
                source: None,
            } => self.export_specifiers(specifiers, out)?,
            ExportDecl::Specifiers {
                specifiers,
                source: Some(source),
            } => self.reexport_specifiers(specifiers, &source, out)?,
        }
        debug!(
            start = span.start,
            end = span.end,
            statements = out.len() - before,
            "expanded export"
        );
        Ok(())
    }

    fn export_decl(&mut self, decl: Node<Decl>, out: &mut OutputStatements) -> TransformResult<()> {
        let span = decl.span;
        match decl.value {
            Decl::Var(var) => self.export_var(var, span, out),
            Decl::Function(func) => {
                let local = func.ident.clone();
                let exported = local.value.name.clone();
                self.export_binding(Decl::Function(func), local, &exported, span, out)
            }
            Decl::Class(class) => {
                let local = class.ident.clone();
                let exported = local.value.name.clone();
                self.export_binding(Decl::Class(class), local, &exported, span, out)
            }
        }
    }

    /// One declaration per declarator. Only the first keeps the source span.
    fn export_var(&mut self, var: VarDecl, span: Span, out: &mut OutputStatements) -> TransformResult<()> {
        if var.declarations.is_empty() {
            return Err(TransformError::MalformedExport {
                span,
                reason: "variable export without declarators",
            });
        }

        let kind = var.kind;
        for (i, declarator) in var.declarations.into_iter().enumerate() {
            let stmt_span = if i == 0 { span } else { Span::DUMMY };
            let Some(name) = declarator.pattern.as_ident().map(|ident| ident.name.clone()) else {
                // Destructuring: declare as written, then publish each bound name.
                let bound = declarator.pattern.bound_idents();
                out.push(single_var(kind, declarator, stmt_span));
                for ident in bound {
                    let reference = Node::dummy(Expr::Ident(ident.value.clone()));
                    out.push(self.exports_assign(&ident.value.name, reference)?);
                }
                continue;
            };

            let value = declarator.init.unwrap_or_else(|| Node::dummy(Expr::undefined()));
            let init = self.templates.build_expr(
                TemplateName::ExportsAssign,
                [("KEY", Slot::name(name)), ("VALUE", Slot::Expr(value))],
            )?;
            let declarator = VarDeclarator {
                pattern: declarator.pattern,
                init: Some(init),
            };
            out.push(single_var(kind, declarator, stmt_span));
        }
        Ok(())
    }

    /// Emits the declaration unchanged followed by `exports.EXPORTED = local`.
    /// The assignment for a function declaration is hoisted.
    fn export_binding(
        &mut self,
        decl: Decl,
        local: Node<Ident>,
        exported: &str,
        span: Span,
        out: &mut OutputStatements,
    ) -> TransformResult<()> {
        let hoist = matches!(decl, Decl::Function(_));
        out.push(Node::new(Stmt::Decl(decl), span));

        let assign = self.exports_assign(exported, Node::dummy(Expr::Ident(local.value)))?;
        if hoist {
            out.push_hoisted(assign);
        } else {
            out.push(assign);
        }
        Ok(())
    }

    fn export_default(&mut self, default: Node<DefaultExport>, out: &mut OutputStatements) -> TransformResult<()> {
        let span = default.span;
        match default.value {
            DefaultExport::Function(func) => {
                let local = func.ident.clone();
                self.export_binding(Decl::Function(func), local, "default", span, out)
            }
            DefaultExport::Class(class) => {
                let local = class.ident.clone();
                self.export_binding(Decl::Class(class), local, "default", span, out)
            }
            DefaultExport::Expr(expr) => {
                let mut assign = self.exports_assign("default", expr)?;
                assign.span = span;
                out.push(assign);
                Ok(())
            }
        }
    }

    /// `export { a, b as c };`
    fn export_specifiers(
        &mut self,
        specifiers: Vec<Node<ExportSpecifier>>,
        out: &mut OutputStatements,
    ) -> TransformResult<()> {
        for specifier in specifiers {
            let ExportSpecifier::Named { local, exported } = specifier.value else {
                return Err(TransformError::MalformedExport {
                    span: specifier.span,
                    reason: "`*` export without a source module",
                });
            };

            let name = &local.value.name;
            if self.scope.resolve(name, local.span, Lookup::ModuleOnly).is_none() {
                warn!(name = %name, start = local.span.start, "exported name is not declared at module level");
            }

            let key = exported.as_ref().unwrap_or(&local).value.name.clone();
            let reference = Node::new(Expr::Ident(local.value), local.span);
            out.push(self.exports_assign(&key, reference)?);
        }
        Ok(())
    }

    /// Re-exports from another module. The `require` reference is built on
    /// first use and shared by every specifier of the statement.
    fn reexport_specifiers(
        &mut self,
        specifiers: Vec<Node<ExportSpecifier>>,
        source: &str,
        out: &mut OutputStatements,
    ) -> TransformResult<()> {
        let mut reference: Option<Node<Expr>> = None;
        for specifier in specifiers {
            let module = match reference.clone() {
                Some(module) => module,
                None => {
                    let module = self.require(source)?;
                    reference = Some(module.clone());
                    module
                }
            };
            let stmt = match specifier.value {
                ExportSpecifier::All { alias: None } => self
                    .templates
                    .build(TemplateName::ExportsWildcard, [("OBJECT", Slot::Expr(module))])?,
                ExportSpecifier::All { alias: Some(alias) } => self.exports_assign(&alias.value.name, module)?,
                ExportSpecifier::Named { local, exported } => {
                    let key = exported.as_ref().unwrap_or(&local).value.name.clone();
                    let member = Node::dummy(Expr::member(module, local.value.name));
                    self.exports_assign(&key, member)?
                }
            };
            out.push(stmt);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::ModuleFormatter;
    use cjsify_emit::emit_script;
    use cjsify_parser::parse_source;
    use cjsify_scope::ScopeTree;

    /// Expands every export item of `source`, leaving other items out.
    fn expand(source: &str) -> TransformResult<String> {
        let mut program = parse_source(source, 0).unwrap();
        let scope = ScopeTree::analyze(&program);
        let mut formatter = CommonJsFormatter::new(&mut program, &scope)?;
        let mut out = OutputStatements::new();
        for item in program.items {
            if let ModuleItem::Export(export) = item.value {
                formatter.export_declaration(Node::new(export, item.span), &mut out)?;
            }
        }
        Ok(emit_script(&Script {
            body: out.finish(),
            span: Span::DUMMY,
        }))
    }

    #[test]
    fn test_var_export_splits_declarators() {
        assert_eq!(
            expand("export var a = 1, b;").unwrap(),
            "var a = exports.a = 1;\nvar b = exports.b = undefined;\n"
        );
    }

    #[test]
    fn test_first_declarator_keeps_span() {
        let source = "export let a = 1, b = 2;";
        let mut program = parse_source(source, 0).unwrap();
        let scope = ScopeTree::analyze(&program);
        let mut formatter = CommonJsFormatter::new(&mut program, &scope).unwrap();
        let mut out = OutputStatements::new();
        let item = program.items.remove(0);
        let ModuleItem::Export(export) = item.value else {
            panic!("expected export");
        };
        let ExportDecl::Decl(decl) = &export else {
            panic!("expected declaration export");
        };
        let decl_span = decl.span;
        formatter
            .export_declaration(Node::new(export, item.span), &mut out)
            .unwrap();

        let stmts = out.finish();
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0].span, decl_span);
        assert!(stmts[1].span.is_dummy());
    }

    #[test]
    fn test_destructuring_export() {
        assert_eq!(
            expand("export const { a, b: [c] } = obj;").unwrap(),
            "const { a, b: [c] } = obj;\nexports.a = a;\nexports.c = c;\n"
        );
    }

    #[test]
    fn test_function_export_is_hoisted() {
        assert_eq!(
            expand("export class A {}\nexport function f() {}").unwrap(),
            "exports.f = f;\nclass A {}\nexports.A = A;\nfunction f() {}\n"
        );
    }

    #[test]
    fn test_default_exports() {
        assert_eq!(expand("export default 42;").unwrap(), "exports.default = 42;\n");
        assert_eq!(
            expand("export default function named() {}").unwrap(),
            "exports.default = named;\nfunction named() {}\n"
        );
        assert_eq!(
            expand("export default class Named {}").unwrap(),
            "class Named {}\nexports.default = Named;\n"
        );
        assert_eq!(
            expand("export default function () {}").unwrap(),
            "exports.default = function () {};\n"
        );
    }

    #[test]
    fn test_local_specifiers() {
        assert_eq!(
            expand("let a = 1, b = 2;\nexport { a, b as c };").unwrap(),
            "exports.a = a;\nexports.c = b;\n"
        );
    }

    #[test]
    fn test_reexports() {
        assert_eq!(
            expand("export { a, b as c } from \"m\";\nexport * as ns from \"n\";").unwrap(),
            "exports.a = require(\"m\").a;\nexports.c = require(\"m\").b;\nexports.ns = require(\"n\");\n"
        );
        assert_eq!(
            expand("export * from \"m\";").unwrap(),
            "(function (obj) {\n  for (var key in obj) {\n    if (key !== \"__esModule\") exports[key] = obj[key];\n  }\n})(require(\"m\"));\n"
        );
    }

    #[test]
    fn test_empty_reexport_list_requires_nothing() {
        assert_eq!(expand("export {} from \"m\";").unwrap(), "");
    }

    #[test]
    fn test_empty_var_export_is_malformed() {
        let mut program = parse_source("", 0).unwrap();
        let scope = ScopeTree::analyze(&program);
        let mut formatter = CommonJsFormatter::new(&mut program, &scope).unwrap();
        let export = ExportDecl::Decl(Node::new(
            Decl::Var(VarDecl {
                kind: VarDeclKind::Var,
                declarations: vec![],
            }),
            Span::new(0, 10, 0),
        ));
        let err = formatter
            .export_declaration(Node::new(export, Span::new(0, 10, 0)), &mut OutputStatements::new())
            .unwrap_err();
        assert!(matches!(err, TransformError::MalformedExport { .. }));
    }

    #[test]
    fn test_star_without_source_is_malformed() {
        let mut program = parse_source("", 0).unwrap();
        let scope = ScopeTree::analyze(&program);
        let mut formatter = CommonJsFormatter::new(&mut program, &scope).unwrap();
        let export = ExportDecl::Specifiers {
            specifiers: vec![Node::dummy(ExportSpecifier::All { alias: None })],
            source: None,
        };
        let err = formatter
            .export_declaration(Node::dummy(export), &mut OutputStatements::new())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed export at 0..0: `*` export without a source module"
        );
    }
}
