//! Declaration collection

use super::*;
use tracing::debug;

pub(crate) struct ScopeBuilder {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl ScopeBuilder {
    pub(crate) fn new(program_span: Span) -> Self {
        Self {
            scopes: vec![Scope::new(ScopeTree::ROOT, ScopeKind::Module, program_span, None)],
            current: ScopeTree::ROOT,
        }
    }

    pub(crate) fn build(mut self, program: &Program) -> ScopeTree {
        for item in &program.items {
            match &item.value {
                ModuleItem::Import(import) => {
                    for specifier in &import.specifiers {
                        self.declare(specifier.value.local(), BindingKind::Import);
                    }
                }
                ModuleItem::Export(export) => self.visit_export(export),
                ModuleItem::Stmt(stmt) => self.visit_stmt(stmt),
            }
        }

        debug!(
            scopes = self.scopes.len(),
            module_bindings = self.scopes[ScopeTree::ROOT].bindings.len(),
            "scope analysis complete"
        );
        ScopeTree { scopes: self.scopes }
    }

    // =========================================================================
    // Scope bookkeeping
    // =========================================================================

    fn with_scope(&mut self, kind: ScopeKind, span: Span, f: impl FnOnce(&mut Self)) {
        let id = self.scopes.len();
        let parent = self.current;
        self.scopes.push(Scope::new(id, kind, span, Some(parent)));
        self.scopes[parent].children.push(id);

        self.current = id;
        f(self);
        self.current = parent;
    }

    /// Binds in the current scope; an existing binding of the same name is kept.
    fn declare(&mut self, ident: &Node<Ident>, kind: BindingKind) {
        self.declare_in(self.current, ident, kind);
    }

    /// Binds in the nearest function or module scope.
    fn declare_var(&mut self, ident: &Node<Ident>, kind: BindingKind) {
        let mut scope = self.current;
        while !self.scopes[scope].kind.is_function_like() {
            match self.scopes[scope].parent {
                Some(parent) => scope = parent,
                None => break,
            }
        }
        self.declare_in(scope, ident, kind);
    }

    fn declare_in(&mut self, scope: ScopeId, ident: &Node<Ident>, kind: BindingKind) {
        self.scopes[scope]
            .bindings
            .entry(ident.value.name.clone())
            .or_insert(Binding {
                decl: DeclId::of(ident),
                kind,
            });
    }

    fn declare_pattern(&mut self, pattern: &Node<Pattern>, kind: BindingKind) {
        for ident in pattern.bound_idents() {
            if kind == BindingKind::Var || kind == BindingKind::Param {
                self.declare_var(&ident, kind);
            } else {
                self.declare(&ident, kind);
            }
        }
        self.visit_pattern(pattern);
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn visit_export(&mut self, export: &ExportDecl) {
        match export {
            ExportDecl::Decl(decl) => self.visit_decl(&decl.value),
            ExportDecl::Default(default) => match &default.value {
                DefaultExport::Function(func) => self.visit_fn_decl(func),
                DefaultExport::Class(class) => self.visit_class_decl(class),
                DefaultExport::Expr(expr) => self.visit_expr(expr),
            },
            ExportDecl::Specifiers { .. } => {}
        }
    }

    fn visit_stmts(&mut self, stmts: &[Node<Stmt>]) {
        for stmt in stmts {
            self.visit_stmt(stmt);
        }
    }

    fn visit_block(&mut self, block: &Node<BlockStmt>) {
        self.with_scope(ScopeKind::Block, block.span, |b| b.visit_stmts(&block.value.stmts));
    }

    fn visit_stmt(&mut self, stmt: &Node<Stmt>) {
        match &stmt.value {
            Stmt::Expr(expr) | Stmt::Throw(expr) => self.visit_expr(expr),
            Stmt::Decl(decl) => self.visit_decl(decl),
            Stmt::Block(block) => {
                self.with_scope(ScopeKind::Block, stmt.span, |b| b.visit_stmts(&block.stmts));
            }
            Stmt::Return(arg) => {
                if let Some(arg) = arg {
                    self.visit_expr(arg);
                }
            }
            Stmt::If {
                test,
                consequent,
                alternate,
            } => {
                self.visit_expr(test);
                self.visit_stmt(consequent);
                if let Some(alternate) = alternate {
                    self.visit_stmt(alternate);
                }
            }
            Stmt::For {
                init,
                test,
                update,
                body,
            } => self.with_scope(ScopeKind::Block, stmt.span, |b| {
                match init {
                    Some(ForInit::Var(var)) => b.visit_var_decl(var),
                    Some(ForInit::Expr(expr)) => b.visit_expr(expr),
                    None => {}
                }
                for expr in test.iter().chain(update.iter()) {
                    b.visit_expr(expr);
                }
                b.visit_stmt(body);
            }),
            Stmt::ForIn { left, right, body } | Stmt::ForOf { left, right, body } => {
                self.with_scope(ScopeKind::Block, stmt.span, |b| {
                    match left {
                        ForHead::Var(var) => b.visit_var_decl(var),
                        ForHead::Pattern(pattern) => b.visit_pattern(pattern),
                    }
                    b.visit_expr(right);
                    b.visit_stmt(body);
                })
            }
            Stmt::While { test, body } | Stmt::DoWhile { body, test } => {
                self.visit_expr(test);
                self.visit_stmt(body);
            }
            Stmt::Try {
                block,
                handler,
                finalizer,
            } => {
                self.visit_block(block);
                if let Some(handler) = handler {
                    self.with_scope(ScopeKind::Catch, handler.span, |b| {
                        if let Some(param) = &handler.value.param {
                            b.declare_pattern(param, BindingKind::CatchParam);
                        }
                        b.visit_stmts(&handler.value.body.value.stmts);
                    });
                }
                if let Some(finalizer) = finalizer {
                    self.visit_block(finalizer);
                }
            }
            Stmt::Switch { discriminant, cases } => {
                self.visit_expr(discriminant);
                // The case block starts after the discriminant.
                let cases_span = Span::new(discriminant.span.end, stmt.span.end, stmt.span.file_id);
                self.with_scope(ScopeKind::Block, cases_span, |b| {
                    for case in cases {
                        if let Some(test) = &case.test {
                            b.visit_expr(test);
                        }
                        b.visit_stmts(&case.consequent);
                    }
                });
            }
            Stmt::Labeled { body, .. } => self.visit_stmt(body),
            Stmt::Break(_) | Stmt::Continue(_) | Stmt::Empty | Stmt::Debugger => {}
        }
    }

    fn visit_decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Var(var) => self.visit_var_decl(var),
            Decl::Function(func) => self.visit_fn_decl(func),
            Decl::Class(class) => self.visit_class_decl(class),
        }
    }

    fn visit_var_decl(&mut self, var: &VarDecl) {
        let kind = BindingKind::from(var.kind);
        for declarator in &var.declarations {
            self.declare_pattern(&declarator.pattern, kind);
            if let Some(init) = &declarator.init {
                self.visit_expr(init);
            }
        }
    }

    fn visit_fn_decl(&mut self, func: &FnDecl) {
        self.declare(&func.ident, BindingKind::Function);
        self.visit_function(&func.function, None);
    }

    fn visit_class_decl(&mut self, class: &ClassDecl) {
        self.declare(&class.ident, BindingKind::Class);
        self.visit_class(&class.class);
    }

    fn visit_function(&mut self, function: &Function, own_name: Option<&Node<Ident>>) {
        self.visit_params_and_body(&function.params, function.body.span, own_name, |b| {
            b.visit_stmts(&function.body.value.stmts)
        });
    }

    /// Parameters bind in a scope covering the whole function. A list with
    /// defaults, patterns or a rest element gets a separate body scope, so
    /// parameter initializers never see the body's `var`s.
    fn visit_params_and_body(
        &mut self,
        params: &[Param],
        body_span: Span,
        own_name: Option<&Node<Ident>>,
        body: impl FnOnce(&mut Self),
    ) {
        let start = params.first().map_or(body_span, |p| p.pattern.span);

        self.with_scope(ScopeKind::Function, start.merge(&body_span), |b| {
            for param in params {
                b.declare_pattern(&param.pattern, BindingKind::Param);
            }
            if has_simple_params(params) {
                body(b);
            } else {
                b.with_scope(ScopeKind::Function, body_span, body);
            }
            // Parameters and locals shadow the expression's own name.
            if let Some(name) = own_name {
                b.declare(name, BindingKind::Function);
            }
        });
    }

    fn visit_class(&mut self, class: &Class) {
        if let Some(extends) = &class.extends {
            self.visit_expr(extends);
        }
        for member in &class.members {
            match &member.value {
                ClassMember::Method { key, function, .. } => {
                    self.visit_property_name(key);
                    self.visit_function(function, None);
                }
                ClassMember::Field { key, value, .. } => {
                    self.visit_property_name(key);
                    if let Some(value) = value {
                        self.visit_expr(value);
                    }
                }
            }
        }
    }

    /// Expressions nested in a pattern: defaults and computed keys.
    fn visit_pattern(&mut self, pattern: &Node<Pattern>) {
        match &pattern.value {
            Pattern::Ident(_) => {}
            Pattern::Array { elements, rest } => {
                for element in elements.iter().flatten() {
                    self.visit_pattern(element);
                }
                if let Some(rest) = rest {
                    self.visit_pattern(rest);
                }
            }
            Pattern::Object { properties, rest } => {
                for prop in properties {
                    self.visit_property_name(&prop.key);
                    self.visit_pattern(&prop.value);
                }
                if let Some(rest) = rest {
                    self.visit_pattern(rest);
                }
            }
            Pattern::Assignment { pattern, default } => {
                self.visit_pattern(pattern);
                self.visit_expr(default);
            }
        }
    }

    fn visit_property_name(&mut self, key: &PropertyName) {
        if let PropertyName::Computed(expr) = key {
            self.visit_expr(expr);
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn visit_expr(&mut self, expr: &Node<Expr>) {
        match &expr.value {
            Expr::Literal(_) | Expr::Ident(_) | Expr::This | Expr::Super | Expr::Template(_) => {}
            Expr::Array(elements) => {
                for element in elements.iter().flatten() {
                    self.visit_expr(element);
                }
            }
            Expr::Object(props) => {
                for prop in props {
                    match &prop.value {
                        ObjectProperty::Property { key, value, .. } => {
                            self.visit_property_name(key);
                            self.visit_expr(value);
                        }
                        ObjectProperty::Method { key, function, .. } => {
                            self.visit_property_name(key);
                            self.visit_function(function, None);
                        }
                        ObjectProperty::Spread(value) => self.visit_expr(value),
                    }
                }
            }
            Expr::Function { ident, function } => self.visit_function(function, ident.as_ref()),
            Expr::Arrow { params, body, .. } => {
                let body_span = match body {
                    ArrowBody::Expr(body) => body.span,
                    ArrowBody::Block(block) => block.span,
                };
                self.visit_params_and_body(params, body_span, None, |b| match body {
                    ArrowBody::Expr(body) => b.visit_expr(body),
                    ArrowBody::Block(block) => b.visit_stmts(&block.value.stmts),
                });
            }
            Expr::Class { ident, class } => match ident {
                Some(ident) => self.with_scope(ScopeKind::Block, expr.span, |b| {
                    b.declare(ident, BindingKind::Class);
                    b.visit_class(class);
                }),
                None => self.visit_class(class),
            },
            Expr::Unary { expr: operand, .. } => self.visit_expr(operand),
            Expr::Update { argument, .. } => self.visit_expr(argument),
            Expr::Binary { left, right, .. } => {
                self.visit_expr(left);
                self.visit_expr(right);
            }
            Expr::Assignment { target, value, .. } => {
                self.visit_expr(target);
                self.visit_expr(value);
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.visit_expr(test);
                self.visit_expr(consequent);
                self.visit_expr(alternate);
            }
            Expr::Call { callee, args } | Expr::New { callee, args } => {
                self.visit_expr(callee);
                for arg in args {
                    self.visit_expr(arg);
                }
            }
            Expr::Member { object, .. } => self.visit_expr(object),
            Expr::Index { object, index } => {
                self.visit_expr(object);
                self.visit_expr(index);
            }
            Expr::Sequence(exprs) => {
                for expr in exprs {
                    self.visit_expr(expr);
                }
            }
            Expr::Spread(arg) | Expr::Await(arg) => self.visit_expr(arg),
            Expr::Yield { argument, .. } => {
                if let Some(argument) = argument {
                    self.visit_expr(argument);
                }
            }
        }
    }
}

fn has_simple_params(params: &[Param]) -> bool {
    params
        .iter()
        .all(|p| !p.is_rest && matches!(p.pattern.value, Pattern::Ident(_)))
}
