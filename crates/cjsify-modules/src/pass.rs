//! Lowering a whole program to a script

use crate::error::TransformResult;
use crate::formatter::{CommonJsFormatter, ModuleFormatter};
use crate::options::{module_name, ModuleOptions};
use crate::output::OutputStatements;
use cjsify_ast::*;
use cjsify_scope::{ScopeResolver, ScopeTree};
use tracing::{debug, debug_span};

/// Lowers `program` with scopes computed from the program itself.
pub fn lower_program(program: Program, options: &ModuleOptions) -> TransformResult<Script> {
    let scope = ScopeTree::analyze(&program);
    lower_program_with_scope(program, options, &scope)
}

/// Lowers `program`, resolving identifiers through `scope`.
///
/// Exported bindings are discovered and their mutations rewritten before any
/// module item is lowered; imports and exports are then expanded in source
/// order.
pub fn lower_program_with_scope(
    mut program: Program,
    options: &ModuleOptions,
    scope: &dyn ScopeResolver,
) -> TransformResult<Script> {
    let name = module_name(options);
    let pass_span = debug_span!("lower_module", module = %name);
    let _guard = pass_span.enter();

    let has_exports = program
        .items
        .iter()
        .any(|item| matches!(item.value, ModuleItem::Export(_)));
    let mut formatter = CommonJsFormatter::new(&mut program, scope)?;

    let mut out = OutputStatements::new();
    for item in program.items {
        let span = item.span;
        match item.value {
            ModuleItem::Stmt(stmt) => out.push(stmt),
            ModuleItem::Import(import) => formatter.import_declaration(Node::new(import, span), &mut out)?,
            ModuleItem::Export(mut export) => {
                ensure_initializer(&mut export);
                formatter.export_declaration(Node::new(export, span), &mut out)?;
            }
        }
    }

    let mut body = Vec::new();
    if options.strict {
        body.push(Stmt::expr(Node::dummy(Expr::string("use strict"))));
    }
    if has_exports && options.es_module_marker {
        body.push(formatter.es_module_marker()?);
    }
    body.extend(out.finish());

    debug!(
        exports = formatter.bindings().len(),
        rewritten = formatter.rewritten(),
        statements = body.len(),
        "lowered module"
    );
    Ok(Script {
        body,
        span: program.span,
    })
}

/// The first declarator of a variable export always gets an initializer.
fn ensure_initializer(export: &mut ExportDecl) {
    if let ExportDecl::Decl(Node {
        value: Decl::Var(var), ..
    }) = export
    {
        if let Some(first) = var.declarations.first_mut() {
            first.init.get_or_insert_with(|| Node::dummy(Expr::undefined()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cjsify_emit::emit_script;
    use cjsify_parser::parse_source;

    fn lower(source: &str, options: &ModuleOptions) -> String {
        let program = parse_source(source, 0).unwrap();
        emit_script(&lower_program(program, options).unwrap())
    }

    #[test]
    fn test_preamble() {
        let options = ModuleOptions::default();
        assert_eq!(
            lower("export default 1;", &options),
            "\"use strict\";\nObject.defineProperty(exports, \"__esModule\", { value: true });\nexports.default = 1;\n"
        );
        assert_eq!(lower("import \"m\";", &options), "\"use strict\";\nrequire(\"m\");\n");
    }

    #[test]
    fn test_preamble_can_be_disabled() {
        let options = ModuleOptions {
            strict: false,
            es_module_marker: false,
            ..ModuleOptions::default()
        };
        assert_eq!(lower("export default 1;", &options), "exports.default = 1;\n");
    }

    #[test]
    fn test_ensure_initializer() {
        let mut export = ExportDecl::Decl(Node::dummy(Decl::Var(VarDecl {
            kind: VarDeclKind::Let,
            declarations: vec![
                VarDeclarator {
                    pattern: Node::<Pattern>::ident("a", Span::DUMMY),
                    init: None,
                },
                VarDeclarator {
                    pattern: Node::<Pattern>::ident("b", Span::DUMMY),
                    init: None,
                },
            ],
        })));
        ensure_initializer(&mut export);
        let ExportDecl::Decl(Node {
            value: Decl::Var(var), ..
        }) = &export
        else {
            panic!("expected variable export");
        };
        assert_eq!(var.declarations[0].init, Some(Node::dummy(Expr::undefined())));
        assert_eq!(var.declarations[1].init, None);
    }
}
