//! Output statement accumulator

use cjsify_ast::{Node, Stmt};

/// Statements produced for one file. Hoisted statements go ahead of the rest,
/// each group keeping the order it was pushed in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputStatements {
    hoisted: Vec<Node<Stmt>>,
    body: Vec<Node<Stmt>>,
}

impl OutputStatements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stmt: Node<Stmt>) {
        self.body.push(stmt);
    }

    pub fn push_hoisted(&mut self, stmt: Node<Stmt>) {
        self.hoisted.push(stmt);
    }

    pub fn len(&self) -> usize {
        self.hoisted.len() + self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn finish(self) -> Vec<Node<Stmt>> {
        let mut stmts = self.hoisted;
        stmts.extend(self.body);
        stmts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cjsify_ast::Expr;

    fn stmt(name: &str) -> Node<Stmt> {
        Stmt::expr(Node::dummy(Expr::ident(name)))
    }

    #[test]
    fn test_hoisted_statements_come_first_in_order() {
        let mut out = OutputStatements::new();
        out.push(stmt("a"));
        out.push_hoisted(stmt("h1"));
        out.push(stmt("b"));
        out.push_hoisted(stmt("h2"));
        assert_eq!(out.len(), 4);
        assert_eq!(out.finish(), vec![stmt("h1"), stmt("h2"), stmt("a"), stmt("b")]);
    }
}
