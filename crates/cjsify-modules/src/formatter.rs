//! Module formatters: the seam between the pass and a module target

use crate::bindings::{discover_bindings, BindingTable};
use crate::error::TransformResult;
use crate::live::rewrite_live_bindings;
use crate::output::OutputStatements;
use crate::templates::{Slot, TemplateName, Templates};
use cjsify_ast::*;
use cjsify_scope::ScopeResolver;

/// Lowers the declarative module items of one file for a module target.
pub trait ModuleFormatter {
    fn import_declaration(&mut self, import: Node<ImportDecl>, out: &mut OutputStatements) -> TransformResult<()>;

    fn export_declaration(&mut self, export: Node<ExportDecl>, out: &mut OutputStatements) -> TransformResult<()>;
}

/// CommonJS target: imports become `require` calls and exports become writes
/// to the `exports` object.
pub struct CommonJsFormatter<'a> {
    pub(crate) table: BindingTable,
    pub(crate) scope: &'a dyn ScopeResolver,
    pub(crate) templates: Templates,
    rewritten: usize,
}

impl<'a> CommonJsFormatter<'a> {
    /// Discovers the file's exported bindings and rewrites their mutations in
    /// place, before any module item is lowered.
    pub fn new(program: &mut Program, scope: &'a dyn ScopeResolver) -> TransformResult<Self> {
        let table = discover_bindings(program);
        let rewritten = rewrite_live_bindings(program, &table, scope)?;
        Ok(Self {
            table,
            scope,
            templates: Templates::new(),
            rewritten,
        })
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.table
    }

    /// Mutation sites rewritten at construction
    pub fn rewritten(&self) -> usize {
        self.rewritten
    }

    /// `Object.defineProperty(exports, "__esModule", { value: true });`
    pub fn es_module_marker(&mut self) -> TransformResult<Node<Stmt>> {
        self.templates.build(TemplateName::EsModuleMarker, std::iter::empty())
    }

    /// `exports.KEY = VALUE;`
    pub(crate) fn exports_assign(&mut self, key: &str, value: Node<Expr>) -> TransformResult<Node<Stmt>> {
        self.templates.build(
            TemplateName::ExportsAssign,
            [("KEY", Slot::name(key)), ("VALUE", Slot::Expr(value))],
        )
    }

    /// `require("source")`
    pub(crate) fn require(&mut self, source: &str) -> TransformResult<Node<Expr>> {
        self.templates
            .build_expr(TemplateName::Require, [("MODULE_NAME", Slot::string(source))])
    }
}

impl ModuleFormatter for CommonJsFormatter<'_> {
    fn import_declaration(&mut self, import: Node<ImportDecl>, out: &mut OutputStatements) -> TransformResult<()> {
        self.lower_import(import, out)
    }

    fn export_declaration(&mut self, export: Node<ExportDecl>, out: &mut OutputStatements) -> TransformResult<()> {
        self.expand_export(export, out)
    }
}
