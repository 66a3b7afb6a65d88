//! Export discovery: which top-level bindings a file exports

use cjsify_ast::*;
use cjsify_scope::DeclId;
use indexmap::IndexMap;
use tracing::debug;

/// One exported local binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBinding {
    /// Declaration the local name was introduced by
    pub decl: DeclId,
    /// Member of `exports` the binding is published as
    pub exported: String,
}

/// Exported local bindings keyed by local name, in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingTable {
    entries: IndexMap<String, ExportBinding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later entries replace earlier ones for the same name.
    pub fn insert(&mut self, name: impl Into<String>, binding: ExportBinding) {
        self.entries.insert(name.into(), binding);
    }

    pub fn get(&self, name: &str) -> Option<&ExportBinding> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExportBinding)> {
        self.entries.iter().map(|(name, binding)| (name.as_str(), binding))
    }

    fn insert_ident(&mut self, ident: &Node<Ident>, exported: &str) {
        self.insert(
            ident.value.name.clone(),
            ExportBinding {
                decl: DeclId::of(ident),
                exported: exported.to_string(),
            },
        );
    }
}

/// Collects every binding introduced by an export that carries a declaration.
/// Specifier lists (`export { a }`) add nothing.
pub fn discover_bindings(program: &Program) -> BindingTable {
    let mut table = BindingTable::new();
    for item in &program.items {
        let ModuleItem::Export(export) = &item.value else {
            continue;
        };
        match export {
            ExportDecl::Decl(decl) => {
                for ident in decl.value.bound_idents() {
                    table.insert_ident(&ident, &ident.value.name);
                }
            }
            ExportDecl::Default(default) => match &default.value {
                DefaultExport::Function(func) => table.insert_ident(&func.ident, "default"),
                DefaultExport::Class(class) => table.insert_ident(&class.ident, "default"),
                DefaultExport::Expr(_) => {}
            },
            ExportDecl::Specifiers { .. } => {}
        }
    }

    debug!(
        count = table.len(),
        names = ?table.iter().map(|(name, _)| name).collect::<Vec<_>>(),
        "discovered export bindings"
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use cjsify_parser::parse_source;

    fn discover(source: &str) -> BindingTable {
        discover_bindings(&parse_source(source, 0).unwrap())
    }

    fn decl_at(source: &str, needle: &str) -> DeclId {
        let start = source.find(needle).unwrap();
        DeclId(Span::new(start, start + needle.len(), 0))
    }

    #[test]
    fn test_every_declarator_is_discovered() {
        let source = "export let first = 1, second, { third, inner: [fourth] } = obj;";
        let table = discover(source);
        let names: Vec<_> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["first", "second", "third", "fourth"]);
        assert_eq!(table.get("second").unwrap().decl, decl_at(source, "second"));
        assert_eq!(table.get("fourth").unwrap().exported, "fourth");
    }

    #[test]
    fn test_functions_classes_and_defaults() {
        let source = "export function run() {}\nexport class Widget {}\nexport default function main() {}";
        let table = discover(source);
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("run").unwrap().decl, decl_at(source, "run"));
        assert_eq!(table.get("Widget").unwrap().exported, "Widget");
        assert_eq!(table.get("main").unwrap().exported, "default");
    }

    #[test]
    fn test_specifiers_and_expressions_add_nothing() {
        let table = discover("let a = 1;\nexport { a };\nexport default a + 1;\nexport * from \"m\";");
        assert!(table.is_empty());
    }

    #[test]
    fn test_last_writer_wins() {
        let mut table = BindingTable::new();
        let binding = |start| ExportBinding {
            decl: DeclId(Span::new(start, start + 1, 0)),
            exported: "x".to_string(),
        };
        table.insert("x", binding(0));
        table.insert("x", binding(10));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("x"), Some(&binding(10)));
    }
}
