//! # cjsify Scope
//!
//! Lexical scope analysis for module programs.
//!
//! [`ScopeTree::analyze`] records every declaration of a [`Program`] in the
//! scope JavaScript places it in, and [`ScopeResolver`] answers "which
//! declaration does this name refer to at this position". A declaration is
//! identified by the span of its declaring identifier ([`DeclId`]), so two
//! identifiers bind to the same variable exactly when they resolve to the same
//! `DeclId`.

use cjsify_ast::*;
use rustc_hash::FxHashMap;

mod analyze;

/// Identity of a declaration: the span of the identifier that introduces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub Span);

impl DeclId {
    pub fn of(ident: &Node<Ident>) -> Self {
        DeclId(ident.span)
    }
}

/// How far a lookup may search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Innermost scope at the position outwards to the module scope
    Chain,
    /// The module scope only, whatever the position
    ModuleOnly,
}

/// Name resolution capability consumed by the module lowering pass.
pub trait ScopeResolver {
    fn resolve(&self, name: &str, at: Span, lookup: Lookup) -> Option<DeclId>;
}

pub type ScopeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Function,
    Block,
    Catch,
}

impl ScopeKind {
    /// Scopes that receive `var` declarations and parameters
    pub fn is_function_like(&self) -> bool {
        matches!(self, ScopeKind::Module | ScopeKind::Function)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Function,
    Class,
    Param,
    CatchParam,
    Import,
}

impl From<VarDeclKind> for BindingKind {
    fn from(kind: VarDeclKind) -> Self {
        match kind {
            VarDeclKind::Var => BindingKind::Var,
            VarDeclKind::Let => BindingKind::Let,
            VarDeclKind::Const => BindingKind::Const,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub decl: DeclId,
    pub kind: BindingKind,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub span: Span,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub bindings: FxHashMap<String, Binding>,
}

impl Scope {
    fn new(id: ScopeId, kind: ScopeKind, span: Span, parent: Option<ScopeId>) -> Self {
        Self {
            id,
            kind,
            span,
            parent,
            children: Vec::new(),
            bindings: FxHashMap::default(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }
}

/// All scopes of one program; index 0 is the module scope.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    pub const ROOT: ScopeId = 0;

    pub fn analyze(program: &Program) -> Self {
        analyze::ScopeBuilder::new(program.span).build(program)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    pub fn module_scope(&self) -> &Scope {
        &self.scopes[Self::ROOT]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Deepest scope whose span contains `pos`. Synthesized positions fall
    /// back to the module scope.
    pub fn innermost_at(&self, at: Span) -> ScopeId {
        let mut current = Self::ROOT;
        if at.is_dummy() {
            return current;
        }
        'descend: loop {
            for &child in &self.scopes[current].children {
                if self.scopes[child].span.contains(at.start) {
                    current = child;
                    continue 'descend;
                }
            }
            return current;
        }
    }

    /// Looks `name` up from `scope` outwards.
    pub fn lookup_from(&self, scope: ScopeId, name: &str) -> Option<&Binding> {
        let mut next = Some(scope);
        while let Some(id) = next {
            let scope = &self.scopes[id];
            if let Some(binding) = scope.get(name) {
                return Some(binding);
            }
            next = scope.parent;
        }
        None
    }
}

impl ScopeResolver for ScopeTree {
    fn resolve(&self, name: &str, at: Span, lookup: Lookup) -> Option<DeclId> {
        let binding = match lookup {
            Lookup::Chain => self.lookup_from(self.innermost_at(at), name),
            Lookup::ModuleOnly => self.module_scope().get(name),
        };
        binding.map(|b| b.decl)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cjsify_parser::parse_source;

    /// Span of the `nth` occurrence of `needle` in `source`.
    fn at(source: &str, needle: &str, nth: usize) -> Span {
        let (start, _) = source
            .match_indices(needle)
            .nth(nth)
            .unwrap_or_else(|| panic!("'{}' occurs fewer than {} times", needle, nth + 1));
        Span::new(start, start + needle.len(), 0)
    }

    fn analyze(source: &str) -> ScopeTree {
        ScopeTree::analyze(&parse_source(source, 0).unwrap())
    }

    #[test]
    fn test_module_binding_resolves_at_use() {
        let source = "export let count = 0;\ncount++;";
        let tree = analyze(source);
        assert_eq!(
            tree.resolve("count", at(source, "count", 1), Lookup::Chain),
            Some(DeclId(at(source, "count", 0)))
        );
        assert_eq!(tree.module_scope().get("count").map(|b| b.kind), Some(BindingKind::Let));
    }

    #[test]
    fn test_inner_declaration_shadows() {
        let source = "let count = 0;\nfunction f() { let count = 1; count++; }\ncount;";
        let tree = analyze(source);
        let inner = tree.resolve("count", at(source, "count", 2), Lookup::Chain);
        assert_eq!(inner, Some(DeclId(at(source, "count", 1))));
        let outer = tree.resolve("count", at(source, "count", 3), Lookup::Chain);
        assert_eq!(outer, Some(DeclId(at(source, "count", 0))));
    }

    #[test]
    fn test_parameter_shadows() {
        let source = "var x = 1;\nfunction f(x) { return x; }";
        let tree = analyze(source);
        assert_eq!(
            tree.resolve("x", at(source, "x", 2), Lookup::Chain),
            Some(DeclId(at(source, "x", 1)))
        );
    }

    #[test]
    fn test_var_hoists_out_of_blocks() {
        let source = "function f() { if (a) { var hoisted = 1; } return hoisted; }";
        let tree = analyze(source);
        let decl = DeclId(at(source, "hoisted", 0));
        assert_eq!(tree.resolve("hoisted", at(source, "hoisted", 1), Lookup::Chain), Some(decl));
        assert_eq!(tree.module_scope().get("hoisted"), None);
    }

    #[test]
    fn test_let_stays_in_block() {
        let source = "{ let b = 1; }\nb;";
        let tree = analyze(source);
        assert_eq!(tree.resolve("b", at(source, "b", 1), Lookup::Chain), None);
    }

    #[test]
    fn test_for_let_scoped_to_loop() {
        let source = "for (let i = 0; i < 3; i++) {}\ni;";
        let tree = analyze(source);
        let decl = DeclId(at(source, "i", 0));
        assert_eq!(tree.resolve("i", at(source, "i++", 0), Lookup::Chain), Some(decl));
        assert_eq!(tree.resolve("i", at(source, "i;", 0), Lookup::Chain), None);
    }

    #[test]
    fn test_catch_parameter() {
        let source = "let err = 0;\ntry {} catch (err) { err; }\nerr;";
        let tree = analyze(source);
        let kind = tree
            .lookup_from(tree.innermost_at(at(source, "err;", 0)), "err")
            .map(|b| b.kind);
        assert_eq!(kind, Some(BindingKind::CatchParam));
        assert_eq!(
            tree.resolve("err", at(source, "err;", 1), Lookup::Chain),
            Some(DeclId(at(source, "err", 0)))
        );
    }

    #[test]
    fn test_named_function_expression_binds_itself() {
        let source = "var g = function fact(n) { return fact(n); };\nfact;";
        let tree = analyze(source);
        assert_eq!(
            tree.resolve("fact", at(source, "fact", 1), Lookup::Chain),
            Some(DeclId(at(source, "fact", 0)))
        );
        assert_eq!(tree.resolve("fact", at(source, "fact", 2), Lookup::Chain), None);
    }

    #[test]
    fn test_arrow_parameters() {
        let source = "let x = 1;\nconst f = (x) => x + 1;";
        let tree = analyze(source);
        assert_eq!(
            tree.resolve("x", at(source, "x + 1", 0), Lookup::Chain),
            Some(DeclId(at(source, "x", 1)))
        );
    }

    #[test]
    fn test_module_only_lookup_ignores_inner_scopes() {
        let source = "export var n = 1;\nfunction f() { var n = 2; n; }";
        let tree = analyze(source);
        let module_decl = DeclId(at(source, "n", 0));
        assert_eq!(tree.resolve("n", at(source, "n;", 0), Lookup::ModuleOnly), Some(module_decl));
        assert_ne!(tree.resolve("n", at(source, "n;", 0), Lookup::Chain), Some(module_decl));
    }

    #[test]
    fn test_imports_and_declarations_bind_in_module_scope() {
        let source = r#"
            import def, { a as b } from "m";
            import * as ns from "n";
            export function f() {}
            export default class K {}
        "#;
        let tree = analyze(source);
        let module = tree.module_scope();
        for name in ["def", "b", "ns"] {
            assert_eq!(module.get(name).map(|b| b.kind), Some(BindingKind::Import), "{}", name);
        }
        assert_eq!(module.get("a"), None);
        assert_eq!(module.get("f").map(|b| b.kind), Some(BindingKind::Function));
        assert_eq!(module.get("K").map(|b| b.kind), Some(BindingKind::Class));
    }

    #[test]
    fn test_first_declaration_wins() {
        let source = "var q = 1;\nvar q = 2;\nq;";
        let tree = analyze(source);
        assert_eq!(
            tree.resolve("q", at(source, "q;", 0), Lookup::Chain),
            Some(DeclId(at(source, "q", 0)))
        );
    }

    #[test]
    fn test_switch_discriminant_resolves_outside_cases() {
        let source = "let x = 0;\nswitch (x) {\n  case 1:\n    let x = 5;\n    x;\n}";
        let tree = analyze(source);
        assert_eq!(
            tree.resolve("x", at(source, "x)", 0), Lookup::Chain),
            Some(DeclId(at(source, "x", 0)))
        );
        assert_eq!(
            tree.resolve("x", at(source, "x;", 0), Lookup::Chain),
            Some(DeclId(at(source, "x", 2)))
        );
    }

    #[test]
    fn test_parameter_default_ignores_body_var() {
        let source = "let count = 0;\nfunction f(a = count) { var count; return a + count; }";
        let tree = analyze(source);
        assert_eq!(
            tree.resolve("count", at(source, "count)", 0), Lookup::Chain),
            Some(DeclId(at(source, "count", 0)))
        );
        assert_eq!(
            tree.resolve("count", at(source, "count;", 1), Lookup::Chain),
            Some(DeclId(at(source, "count", 2)))
        );
        assert_eq!(
            tree.resolve("a", at(source, "a +", 0), Lookup::Chain),
            Some(DeclId(at(source, "a", 0)))
        );
    }

    #[test]
    fn test_arrow_parameter_default_ignores_body_var() {
        let source = "let total = 0;\nconst g = (t = total) => { var total; };";
        let tree = analyze(source);
        assert_eq!(
            tree.resolve("total", at(source, "total)", 0), Lookup::Chain),
            Some(DeclId(at(source, "total", 0)))
        );
    }

    #[test]
    fn test_dummy_positions_use_module_scope() {
        let source = "export let total = 1;\nfunction f() { let total = 2; }";
        let tree = analyze(source);
        assert_eq!(
            tree.resolve("total", Span::DUMMY, Lookup::Chain),
            Some(DeclId(at(source, "total", 0)))
        );
    }
}
