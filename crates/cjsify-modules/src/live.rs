//! Live-binding rewrite
//!
//! Every mutation of an exported binding also writes the new value to the
//! export object, so importers never observe a stale copy:
//!
//! ```text
//! count += 5      =>  exports.count = count += 5
//! ++count         =>  exports.count = count += 1
//! count++ (value) =>  (exports.count = count += 1, count - 1)
//! ```
//!
//! A mutation qualifies only when its target identifier resolves, through the
//! scope chain at the point of use, to the declaration recorded in the
//! [`BindingTable`]. Inner variables that shadow an exported name are left
//! alone.

use crate::bindings::BindingTable;
use crate::error::{TransformError, TransformResult};
use crate::EXPORTS;
use cjsify_ast::*;
use cjsify_scope::{Lookup, ScopeResolver};
use tracing::{debug, trace};

pub struct LiveBindingRewriter<'a> {
    table: &'a BindingTable,
    scope: &'a dyn ScopeResolver,
    rewritten: usize,
}

impl<'a> LiveBindingRewriter<'a> {
    pub fn new(table: &'a BindingTable, scope: &'a dyn ScopeResolver) -> Self {
        Self {
            table,
            scope,
            rewritten: 0,
        }
    }

    /// Number of mutation sites rewritten so far
    pub fn rewritten(&self) -> usize {
        self.rewritten
    }

    /// Export member name when `expr` refers to an exported binding.
    fn exported_name(&self, expr: &Node<Expr>) -> Option<&'a str> {
        let ident = expr.value.as_ident()?;
        let binding = self.table.get(&ident.name)?;
        let resolved = self.scope.resolve(&ident.name, expr.span, Lookup::Chain)?;
        (resolved == binding.decl).then_some(binding.exported.as_str())
    }

    /// `exports.NAME = (assignment)`
    fn remap(&mut self, exported: &str, assignment: Node<Expr>) -> Node<Expr> {
        self.rewritten += 1;
        trace!(
            export = exported,
            start = assignment.span.start,
            end = assignment.span.end,
            "rewrote live binding mutation"
        );
        let span = assignment.span;
        let member = Node::dummy(Expr::member(Node::dummy(Expr::ident(EXPORTS)), exported));
        Node::new(Expr::assign(member, AssignOp::Assign, assignment), span)
    }
}

impl Rewriter for LiveBindingRewriter<'_> {
    type Error = TransformError;

    fn rewrite_expr(
        &mut self,
        expr: &mut Node<Expr>,
        position: ExprPosition,
    ) -> TransformResult<Rewrite<Node<Expr>>> {
        let span = expr.span;
        match &mut expr.value {
            Expr::Assignment { target, value, .. } => {
                let Some(exported) = self.exported_name(target) else {
                    return Ok(Rewrite::Unchanged);
                };
                // `a = b = 1` with both exported: the inner write is rewritten too.
                walk_expr(value, ExprPosition::Value, self)?;
                let assignment = expr.take();
                Ok(Rewrite::Replace(self.remap(exported, assignment)))
            }
            Expr::Update {
                op,
                prefix,
                argument,
            } => {
                let Some(exported) = self.exported_name(argument) else {
                    return Ok(Rewrite::Unchanged);
                };
                let (op, prefix) = (*op, *prefix);
                let target = argument.take();
                let compound = Node::new(
                    Expr::assign(target.clone(), op.compound_op(), Node::dummy(Expr::number(1.0))),
                    span,
                );
                let remapped = self.remap(exported, compound);

                if prefix || position.is_discarded() {
                    return Ok(Rewrite::Replace(remapped));
                }

                // Postfix in value position yields the value from before the update.
                let previous = Node::dummy(Expr::Binary {
                    left: Box::new(target),
                    op: op.inverse_op(),
                    right: Box::new(Node::dummy(Expr::number(1.0))),
                });
                Ok(Rewrite::Replace(Node::new(
                    Expr::Sequence(vec![remapped, previous]),
                    span,
                )))
            }
            _ => Ok(Rewrite::Unchanged),
        }
    }
}

/// Rewrites every live-binding mutation in `program`, returning how many sites
/// changed.
pub fn rewrite_live_bindings(
    program: &mut Program,
    table: &BindingTable,
    scope: &dyn ScopeResolver,
) -> TransformResult<usize> {
    if table.is_empty() {
        return Ok(0);
    }
    let mut rewriter = LiveBindingRewriter::new(table, scope);
    walk_program(program, &mut rewriter)?;
    debug!(sites = rewriter.rewritten(), "rewrote live bindings");
    Ok(rewriter.rewritten())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::discover_bindings;
    use cjsify_emit::emit_program;
    use cjsify_parser::parse_source;
    use cjsify_scope::ScopeTree;

    fn rewrite(source: &str) -> (String, usize) {
        let mut program = parse_source(source, 0).unwrap();
        let scope = ScopeTree::analyze(&program);
        let table = discover_bindings(&program);
        let count = rewrite_live_bindings(&mut program, &table, &scope).unwrap();
        (emit_program(&program), count)
    }

    #[test]
    fn test_assignment_and_compound_assignment() {
        let (out, count) = rewrite("export let count = 0;\ncount = 2;\ncount += f();\n");
        assert_eq!(
            out,
            "export let count = 0;\nexports.count = count = 2;\nexports.count = count += f();\n"
        );
        assert_eq!(count, 2);
    }

    #[test]
    fn test_updates_by_position() {
        let (out, _) = rewrite(
            "export let n = 0;\nn++;\n--n;\nvar a = n++;\nvar b = ++n;\nvar c = n--;\nfor (;; n++) {}\n",
        );
        assert_eq!(
            out,
            "export let n = 0;\n\
             exports.n = n += 1;\n\
             exports.n = n -= 1;\n\
             var a = (exports.n = n += 1, n - 1);\n\
             var b = exports.n = n += 1;\n\
             var c = (exports.n = n -= 1, n + 1);\n\
             for (;; exports.n = n += 1) {}\n"
        );
    }

    #[test]
    fn test_shadowed_names_are_untouched() {
        let source = "export var total = 0;\nfunction f(total) { total++; }\nfunction g() { let total = 1; total = 2; }\n";
        let (out, count) = rewrite(source);
        assert_eq!(count, 0);
        assert_eq!(
            out,
            "export var total = 0;\nfunction f(total) {\n  total++;\n}\nfunction g() {\n  let total = 1;\n  total = 2;\n}\n"
        );
    }

    #[test]
    fn test_nested_function_reaches_module_binding() {
        let (out, count) = rewrite("export let hits = 0;\nfunction hit() { return hits++; }\n");
        assert_eq!(count, 1);
        assert_eq!(
            out,
            "export let hits = 0;\nfunction hit() {\n  return exports.hits = hits += 1, hits - 1;\n}\n"
        );
    }

    #[test]
    fn test_chained_assignment_rewrites_each_target() {
        let (out, count) = rewrite("export let a = 0;\nexport let b = 0;\na = b = 3;\n");
        assert_eq!(count, 2);
        assert_eq!(
            out,
            "export let a = 0;\nexport let b = 0;\nexports.a = a = exports.b = b = 3;\n"
        );
    }

    #[test]
    fn test_default_function_binding_writes_default() {
        let (out, _) = rewrite("export default function handler() {}\nhandler = null;\n");
        assert_eq!(
            out,
            "export default function handler() {}\nexports.default = handler = null;\n"
        );
    }

    #[test]
    fn test_unexported_and_member_targets_are_ignored() {
        let (out, count) = rewrite("export let x = 0;\nlet y = 0;\ny++;\nobj.x = 1;\nx.y++;\n");
        assert_eq!(count, 0);
        assert_eq!(out, "export let x = 0;\nlet y = 0;\ny++;\nobj.x = 1;\nx.y++;\n");
    }

    #[test]
    fn test_empty_table_is_a_no_op() {
        let (out, count) = rewrite("let x = 0;\nx++;\n");
        assert_eq!(count, 0);
        assert_eq!(out, "let x = 0;\nx++;\n");
    }
}
