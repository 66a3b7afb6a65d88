//! Module system definitions for the AST

use super::*;

/// Module item (top-level in a module)
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleItem {
    /// Import declaration
    Import(ImportDecl),

    /// Export declaration
    Export(ExportDecl),

    /// Statement
    Stmt(Node<Stmt>),
}

/// Import declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub specifiers: Vec<Node<ImportSpecifier>>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportSpecifier {
    /// import name from "module"
    Default(Node<Ident>),

    /// import * as name from "module"
    Namespace(Node<Ident>),

    /// import { name } from "module" or import { name as alias } from "module"
    Named {
        imported: Node<Ident>,
        local: Option<Node<Ident>>,
    },
}

impl ImportSpecifier {
    /// The binding this specifier introduces in the importing module.
    pub fn local(&self) -> &Node<Ident> {
        match self {
            ImportSpecifier::Default(local) | ImportSpecifier::Namespace(local) => local,
            ImportSpecifier::Named { imported, local } => local.as_ref().unwrap_or(imported),
        }
    }
}

/// Export declaration
#[derive(Debug, Clone, PartialEq)]
pub enum ExportDecl {
    /// export var/let/const/function/class ...
    Decl(Node<Decl>),

    /// export default ...
    Default(Node<DefaultExport>),

    /// export { a, b as c } [from "module"], export * [as ns] from "module"
    Specifiers {
        specifiers: Vec<Node<ExportSpecifier>>,
        source: Option<String>,
    },
}

/// Payload of `export default`
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultExport {
    /// export default function name() {}
    Function(FnDecl),

    /// export default class Name {}
    Class(ClassDecl),

    /// Any other expression, including anonymous functions and classes
    Expr(Node<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportSpecifier {
    /// name, name as alias
    Named {
        local: Node<Ident>,
        exported: Option<Node<Ident>>,
    },

    /// * or * as ns
    All { alias: Option<Node<Ident>> },
}

impl ExportSpecifier {
    /// Name under which the value appears on the export object.
    pub fn exported_name(&self) -> Option<&str> {
        match self {
            ExportSpecifier::Named { local, exported } => {
                Some(exported.as_ref().unwrap_or(local).value.name.as_str())
            }
            ExportSpecifier::All { alias } => alias.as_ref().map(|a| a.value.name.as_str()),
        }
    }
}

/// Root AST node - represents a complete source file
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub items: Vec<Node<ModuleItem>>,
    pub span: Span,
}

impl Program {
    pub fn has_module_syntax(&self) -> bool {
        self.items
            .iter()
            .any(|item| !matches!(item.value, ModuleItem::Stmt(_)))
    }
}

/// Lowered output: a plain statement list with no module syntax left in it
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub body: Vec<Node<Stmt>>,
    pub span: Span,
}
