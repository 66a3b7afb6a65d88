//! Mutable pre-order traversal with node substitution.
//!
//! A [`Rewriter`] sees every statement and expression before its children.
//! Returning [`Rewrite::Replace`] or [`Rewrite::Expand`] substitutes the node
//! and stops descent into it; [`Rewrite::Unchanged`] continues into the
//! children.

use super::*;
use thiserror::Error;

/// Result of visiting one node
#[derive(Debug, Clone, PartialEq)]
pub enum Rewrite<T> {
    Unchanged,
    Replace(T),
    /// Only legal where a statement list is accepted.
    Expand(Vec<T>),
}

/// Whether the value an expression produces is consumed by its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprPosition {
    /// Expression statement, for-init clause or non-final sequence element
    Statement,
    /// Update clause of a `for (;;)` loop
    ForUpdate,
    /// Anything whose value is used
    Value,
}

impl ExprPosition {
    pub fn is_discarded(&self) -> bool {
        !matches!(self, ExprPosition::Value)
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum WalkError {
    #[error("expression rewrite at {}..{} produced {count} nodes; expressions accept exactly one", .span.start, .span.end)]
    ExpandInExpression { span: Span, count: usize },
}

pub trait Rewriter {
    type Error: From<WalkError>;

    fn rewrite_stmt(&mut self, _stmt: &mut Node<Stmt>) -> Result<Rewrite<Node<Stmt>>, Self::Error> {
        Ok(Rewrite::Unchanged)
    }

    fn rewrite_expr(
        &mut self,
        _expr: &mut Node<Expr>,
        _position: ExprPosition,
    ) -> Result<Rewrite<Node<Expr>>, Self::Error> {
        Ok(Rewrite::Unchanged)
    }
}

// =============================================================================
// Entry points
// =============================================================================

/// Walks every top-level item, including the declarations attached to exports.
pub fn walk_program<R: Rewriter + ?Sized>(program: &mut Program, rw: &mut R) -> Result<(), R::Error> {
    let mut i = 0;
    while i < program.items.len() {
        let item = &mut program.items[i];
        match &mut item.value {
            ModuleItem::Stmt(stmt) => match walk_stmt(stmt, rw)? {
                Rewrite::Unchanged => i += 1,
                Rewrite::Replace(new) => {
                    *stmt = new;
                    i += 1;
                }
                Rewrite::Expand(stmts) => {
                    let count = stmts.len();
                    let items = stmts.into_iter().map(|s| {
                        let span = s.span;
                        Node::new(ModuleItem::Stmt(s), span)
                    });
                    program.items.splice(i..=i, items);
                    i += count;
                }
            },
            ModuleItem::Export(export) => {
                walk_export(export, rw)?;
                i += 1;
            }
            ModuleItem::Import(_) => i += 1,
        }
    }
    Ok(())
}

/// Walks a statement list, splicing in expansions.
pub fn walk_stmts<R: Rewriter + ?Sized>(stmts: &mut Vec<Node<Stmt>>, rw: &mut R) -> Result<(), R::Error> {
    let mut i = 0;
    while i < stmts.len() {
        match walk_stmt(&mut stmts[i], rw)? {
            Rewrite::Unchanged => i += 1,
            Rewrite::Replace(new) => {
                stmts[i] = new;
                i += 1;
            }
            Rewrite::Expand(new) => {
                let count = new.len();
                stmts.splice(i..=i, new);
                i += count;
            }
        }
    }
    Ok(())
}

/// Offers `stmt` to the rewriter and descends into it when left unchanged.
/// The caller applies the returned substitution.
pub fn walk_stmt<R: Rewriter + ?Sized>(
    stmt: &mut Node<Stmt>,
    rw: &mut R,
) -> Result<Rewrite<Node<Stmt>>, R::Error> {
    match rw.rewrite_stmt(stmt)? {
        Rewrite::Unchanged => {
            walk_stmt_children(stmt, rw)?;
            Ok(Rewrite::Unchanged)
        }
        substituted => Ok(substituted),
    }
}

/// Offers `expr` to the rewriter and applies the substitution in place.
pub fn walk_expr<R: Rewriter + ?Sized>(
    expr: &mut Node<Expr>,
    position: ExprPosition,
    rw: &mut R,
) -> Result<(), R::Error> {
    match rw.rewrite_expr(expr, position)? {
        Rewrite::Unchanged => walk_expr_children(expr, position, rw),
        Rewrite::Replace(new) => {
            *expr = new;
            Ok(())
        }
        Rewrite::Expand(exprs) => Err(WalkError::ExpandInExpression {
            span: expr.span,
            count: exprs.len(),
        }
        .into()),
    }
}

// =============================================================================
// Statements
// =============================================================================

fn walk_export<R: Rewriter + ?Sized>(export: &mut ExportDecl, rw: &mut R) -> Result<(), R::Error> {
    match export {
        ExportDecl::Decl(decl) => walk_decl(&mut decl.value, rw),
        ExportDecl::Default(default) => match &mut default.value {
            DefaultExport::Function(func) => walk_function(&mut func.function, rw),
            DefaultExport::Class(class) => walk_class(&mut class.class, rw),
            DefaultExport::Expr(expr) => walk_expr(expr, ExprPosition::Value, rw),
        },
        ExportDecl::Specifiers { .. } => Ok(()),
    }
}

/// A statement slot that holds exactly one statement; expansions become a block.
fn walk_body<R: Rewriter + ?Sized>(body: &mut Node<Stmt>, rw: &mut R) -> Result<(), R::Error> {
    match walk_stmt(body, rw)? {
        Rewrite::Unchanged => {}
        Rewrite::Replace(new) => *body = new,
        Rewrite::Expand(stmts) => {
            *body = Node::new(Stmt::Block(BlockStmt { stmts }), body.span);
        }
    }
    Ok(())
}

fn walk_block<R: Rewriter + ?Sized>(block: &mut Node<BlockStmt>, rw: &mut R) -> Result<(), R::Error> {
    walk_stmts(&mut block.value.stmts, rw)
}

fn walk_stmt_children<R: Rewriter + ?Sized>(stmt: &mut Node<Stmt>, rw: &mut R) -> Result<(), R::Error> {
    match &mut stmt.value {
        Stmt::Expr(expr) => walk_expr(expr, ExprPosition::Statement, rw)?,
        Stmt::Decl(decl) => walk_decl(decl, rw)?,
        Stmt::Block(block) => walk_stmts(&mut block.stmts, rw)?,
        Stmt::Return(arg) => {
            if let Some(arg) = arg {
                walk_expr(arg, ExprPosition::Value, rw)?;
            }
        }
        Stmt::If {
            test,
            consequent,
            alternate,
        } => {
            walk_expr(test, ExprPosition::Value, rw)?;
            walk_body(consequent, rw)?;
            if let Some(alternate) = alternate {
                walk_body(alternate, rw)?;
            }
        }
        Stmt::For {
            init,
            test,
            update,
            body,
        } => {
            match init {
                Some(ForInit::Var(var)) => walk_var_decl(var, rw)?,
                Some(ForInit::Expr(expr)) => walk_expr(expr, ExprPosition::Statement, rw)?,
                None => {}
            }
            if let Some(test) = test {
                walk_expr(test, ExprPosition::Value, rw)?;
            }
            if let Some(update) = update {
                walk_expr(update, ExprPosition::ForUpdate, rw)?;
            }
            walk_body(body, rw)?;
        }
        Stmt::ForIn { left, right, body } | Stmt::ForOf { left, right, body } => {
            match left {
                ForHead::Var(var) => walk_var_decl(var, rw)?,
                ForHead::Pattern(pattern) => walk_pattern(pattern, rw)?,
            }
            walk_expr(right, ExprPosition::Value, rw)?;
            walk_body(body, rw)?;
        }
        Stmt::While { test, body } | Stmt::DoWhile { body, test } => {
            walk_expr(test, ExprPosition::Value, rw)?;
            walk_body(body, rw)?;
        }
        Stmt::Throw(arg) => walk_expr(arg, ExprPosition::Value, rw)?,
        Stmt::Try {
            block,
            handler,
            finalizer,
        } => {
            walk_block(block, rw)?;
            if let Some(handler) = handler {
                if let Some(param) = &mut handler.value.param {
                    walk_pattern(param, rw)?;
                }
                walk_block(&mut handler.value.body, rw)?;
            }
            if let Some(finalizer) = finalizer {
                walk_block(finalizer, rw)?;
            }
        }
        Stmt::Switch { discriminant, cases } => {
            walk_expr(discriminant, ExprPosition::Value, rw)?;
            for case in cases {
                if let Some(test) = &mut case.test {
                    walk_expr(test, ExprPosition::Value, rw)?;
                }
                walk_stmts(&mut case.consequent, rw)?;
            }
        }
        Stmt::Labeled { body, .. } => walk_body(body, rw)?,
        Stmt::Break(_) | Stmt::Continue(_) | Stmt::Empty | Stmt::Debugger => {}
    }
    Ok(())
}

fn walk_decl<R: Rewriter + ?Sized>(decl: &mut Decl, rw: &mut R) -> Result<(), R::Error> {
    match decl {
        Decl::Var(var) => walk_var_decl(var, rw),
        Decl::Function(func) => walk_function(&mut func.function, rw),
        Decl::Class(class) => walk_class(&mut class.class, rw),
    }
}

fn walk_var_decl<R: Rewriter + ?Sized>(var: &mut VarDecl, rw: &mut R) -> Result<(), R::Error> {
    for declarator in &mut var.declarations {
        walk_pattern(&mut declarator.pattern, rw)?;
        if let Some(init) = &mut declarator.init {
            walk_expr(init, ExprPosition::Value, rw)?;
        }
    }
    Ok(())
}

/// Patterns only contain expressions in defaults and computed keys.
fn walk_pattern<R: Rewriter + ?Sized>(pattern: &mut Node<Pattern>, rw: &mut R) -> Result<(), R::Error> {
    match &mut pattern.value {
        Pattern::Ident(_) => {}
        Pattern::Array { elements, rest } => {
            for element in elements.iter_mut().flatten() {
                walk_pattern(element, rw)?;
            }
            if let Some(rest) = rest {
                walk_pattern(rest, rw)?;
            }
        }
        Pattern::Object { properties, rest } => {
            for prop in properties {
                walk_property_name(&mut prop.key, rw)?;
                walk_pattern(&mut prop.value, rw)?;
            }
            if let Some(rest) = rest {
                walk_pattern(rest, rw)?;
            }
        }
        Pattern::Assignment { pattern, default } => {
            walk_pattern(pattern, rw)?;
            walk_expr(default, ExprPosition::Value, rw)?;
        }
    }
    Ok(())
}

fn walk_function<R: Rewriter + ?Sized>(function: &mut Function, rw: &mut R) -> Result<(), R::Error> {
    for param in &mut function.params {
        walk_pattern(&mut param.pattern, rw)?;
    }
    walk_block(&mut function.body, rw)
}

fn walk_class<R: Rewriter + ?Sized>(class: &mut Class, rw: &mut R) -> Result<(), R::Error> {
    if let Some(extends) = &mut class.extends {
        walk_expr(extends, ExprPosition::Value, rw)?;
    }
    for member in &mut class.members {
        match &mut member.value {
            ClassMember::Method { key, function, .. } => {
                walk_property_name(key, rw)?;
                walk_function(function, rw)?;
            }
            ClassMember::Field { key, value, .. } => {
                walk_property_name(key, rw)?;
                if let Some(value) = value {
                    walk_expr(value, ExprPosition::Value, rw)?;
                }
            }
        }
    }
    Ok(())
}

fn walk_property_name<R: Rewriter + ?Sized>(key: &mut PropertyName, rw: &mut R) -> Result<(), R::Error> {
    if let PropertyName::Computed(expr) = key {
        walk_expr(expr, ExprPosition::Value, rw)?;
    }
    Ok(())
}

// =============================================================================
// Expressions
// =============================================================================

fn walk_expr_children<R: Rewriter + ?Sized>(
    expr: &mut Node<Expr>,
    position: ExprPosition,
    rw: &mut R,
) -> Result<(), R::Error> {
    use ExprPosition::Value;

    match &mut expr.value {
        Expr::Literal(_) | Expr::Ident(_) | Expr::This | Expr::Super | Expr::Template(_) => {}
        Expr::Array(elements) => {
            for element in elements.iter_mut().flatten() {
                walk_expr(element, Value, rw)?;
            }
        }
        Expr::Object(props) => {
            for prop in props {
                match &mut prop.value {
                    ObjectProperty::Property { key, value, .. } => {
                        walk_property_name(key, rw)?;
                        walk_expr(value, Value, rw)?;
                    }
                    ObjectProperty::Method { key, function, .. } => {
                        walk_property_name(key, rw)?;
                        walk_function(function, rw)?;
                    }
                    ObjectProperty::Spread(value) => walk_expr(value, Value, rw)?,
                }
            }
        }
        Expr::Function { function, .. } => walk_function(function, rw)?,
        Expr::Arrow { params, body, .. } => {
            for param in params {
                walk_pattern(&mut param.pattern, rw)?;
            }
            match body {
                ArrowBody::Expr(body) => walk_expr(body, Value, rw)?,
                ArrowBody::Block(block) => walk_block(block, rw)?,
            }
        }
        Expr::Class { class, .. } => walk_class(class, rw)?,
        Expr::Unary { expr: operand, .. } => walk_expr(operand, Value, rw)?,
        Expr::Update { argument, .. } => walk_expr(argument, Value, rw)?,
        Expr::Binary { left, right, .. } => {
            walk_expr(left, Value, rw)?;
            walk_expr(right, Value, rw)?;
        }
        Expr::Assignment { target, value, .. } => {
            walk_expr(target, Value, rw)?;
            walk_expr(value, Value, rw)?;
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => {
            walk_expr(test, Value, rw)?;
            walk_expr(consequent, Value, rw)?;
            walk_expr(alternate, Value, rw)?;
        }
        Expr::Call { callee, args } | Expr::New { callee, args } => {
            walk_expr(callee, Value, rw)?;
            for arg in args {
                walk_expr(arg, Value, rw)?;
            }
        }
        Expr::Member { object, .. } => walk_expr(object, Value, rw)?,
        Expr::Index { object, index } => {
            walk_expr(object, Value, rw)?;
            walk_expr(index, Value, rw)?;
        }
        Expr::Sequence(exprs) => {
            let last = exprs.len().saturating_sub(1);
            for (i, element) in exprs.iter_mut().enumerate() {
                let element_position = if i == last { position } else { ExprPosition::Statement };
                walk_expr(element, element_position, rw)?;
            }
        }
        Expr::Spread(arg) | Expr::Await(arg) => walk_expr(arg, Value, rw)?,
        Expr::Yield { argument, .. } => {
            if let Some(argument) = argument {
                walk_expr(argument, Value, rw)?;
            }
        }
    }
    Ok(())
}
