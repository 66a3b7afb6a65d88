//! Statement and module item printing

use cjsify_ast::*;

const INDENT: &str = "  ";

/// JavaScript source printer. One instance prints one tree.
pub struct Emitter {
    pub(crate) out: String,
    indent: usize,
    /// The next token starts an expression statement.
    pub(crate) at_start: bool,
    /// Inside a `for` initializer, where a bare `in` would end the clause.
    pub(crate) no_in: bool,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
            at_start: false,
            no_in: false,
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    // =========================================================================
    // Output helpers
    // =========================================================================

    pub(crate) fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    /// Each statement on its own indented line.
    pub(crate) fn stmt_lines(&mut self, stmts: &[Node<Stmt>]) {
        for stmt in stmts {
            self.write_indent();
            self.stmt(stmt);
            self.newline();
        }
    }

    pub(crate) fn block(&mut self, stmts: &[Node<Stmt>]) {
        if stmts.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.newline();
        self.indent += 1;
        self.stmt_lines(stmts);
        self.indent -= 1;
        self.write_indent();
        self.write("}");
    }

    // =========================================================================
    // Module items
    // =========================================================================

    pub fn script(&mut self, script: &Script) {
        self.stmt_lines(&script.body);
    }

    pub fn program(&mut self, program: &Program) {
        for item in &program.items {
            self.write_indent();
            match &item.value {
                ModuleItem::Import(import) => self.import_decl(import),
                ModuleItem::Export(export) => self.export_decl(export),
                ModuleItem::Stmt(stmt) => self.stmt(stmt),
            }
            self.newline();
        }
    }

    fn import_decl(&mut self, import: &ImportDecl) {
        self.write("import ");
        if !import.specifiers.is_empty() {
            let mut parts = Vec::new();
            let mut named = Vec::new();
            for specifier in &import.specifiers {
                match &specifier.value {
                    ImportSpecifier::Default(local) => parts.push(local.value.name.clone()),
                    ImportSpecifier::Namespace(local) => parts.push(format!("* as {}", local.value)),
                    ImportSpecifier::Named { imported, local } => named.push(match local {
                        Some(local) => format!("{} as {}", imported.value, local.value),
                        None => imported.value.name.clone(),
                    }),
                }
            }
            if !named.is_empty() {
                parts.push(format!("{{ {} }}", named.join(", ")));
            }
            self.write(&parts.join(", "));
            self.write(" from ");
        }
        self.string_literal(&import.source);
        self.write(";");
    }

    fn export_decl(&mut self, export: &ExportDecl) {
        self.write("export ");
        match export {
            ExportDecl::Decl(decl) => self.decl(&decl.value),
            ExportDecl::Default(default) => {
                self.write("default ");
                match &default.value {
                    DefaultExport::Function(func) => self.fn_decl(func),
                    DefaultExport::Class(class) => self.class_decl(class),
                    DefaultExport::Expr(expr) => {
                        self.expr(expr, crate::expr::ASSIGN);
                        self.write(";");
                    }
                }
            }
            ExportDecl::Specifiers { specifiers, source } => {
                let mut named = Vec::new();
                for specifier in specifiers {
                    match &specifier.value {
                        ExportSpecifier::All { alias: None } => self.write("*"),
                        ExportSpecifier::All { alias: Some(alias) } => {
                            self.write("* as ");
                            self.write(&alias.value.name);
                        }
                        ExportSpecifier::Named { local, exported } => named.push(match exported {
                            Some(exported) => format!("{} as {}", local.value, exported.value),
                            None => local.value.name.clone(),
                        }),
                    }
                }
                if !named.is_empty() {
                    self.write(&format!("{{ {} }}", named.join(", ")));
                } else if specifiers.is_empty() {
                    self.write("{}");
                }
                if let Some(source) = source {
                    self.write(" from ");
                    self.string_literal(source);
                }
                self.write(";");
            }
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Prints one statement without leading indentation or trailing newline.
    pub(crate) fn stmt(&mut self, stmt: &Node<Stmt>) {
        match &stmt.value {
            Stmt::Expr(expr) => {
                self.at_start = true;
                self.expr(expr, crate::expr::SEQUENCE);
                self.at_start = false;
                self.write(";");
            }
            Stmt::Decl(decl) => self.decl(decl),
            Stmt::Block(block) => self.block(&block.stmts),
            Stmt::Return(arg) => {
                self.write("return");
                if let Some(arg) = arg {
                    self.write(" ");
                    self.expr(arg, crate::expr::SEQUENCE);
                }
                self.write(";");
            }
            Stmt::If {
                test,
                consequent,
                alternate,
            } => {
                self.write("if (");
                self.expr(test, crate::expr::SEQUENCE);
                self.write(") ");

                // `if (a) if (b) x; else y;` would rebind the else.
                let dangling = alternate.is_some()
                    && matches!(consequent.value, Stmt::If { alternate: None, .. });
                if dangling {
                    self.block(std::slice::from_ref(consequent));
                } else {
                    self.stmt(consequent);
                }

                if let Some(alternate) = alternate {
                    if dangling || matches!(consequent.value, Stmt::Block(_)) {
                        self.write(" ");
                    } else {
                        self.newline();
                        self.write_indent();
                    }
                    self.write("else ");
                    self.stmt(alternate);
                }
            }
            Stmt::For {
                init,
                test,
                update,
                body,
            } => {
                self.write("for (");
                self.no_in = true;
                match init {
                    Some(ForInit::Var(var)) => self.var_decl(var),
                    Some(ForInit::Expr(expr)) => self.expr(expr, crate::expr::SEQUENCE),
                    None => {}
                }
                self.no_in = false;
                self.write(";");
                if let Some(test) = test {
                    self.write(" ");
                    self.expr(test, crate::expr::SEQUENCE);
                }
                self.write(";");
                if let Some(update) = update {
                    self.write(" ");
                    self.expr(update, crate::expr::SEQUENCE);
                }
                self.write(") ");
                self.stmt(body);
            }
            Stmt::ForIn { left, right, body } | Stmt::ForOf { left, right, body } => {
                let keyword = if matches!(stmt.value, Stmt::ForIn { .. }) { "in" } else { "of" };
                self.write("for (");
                match left {
                    ForHead::Var(var) => self.var_decl(var),
                    ForHead::Pattern(pattern) => self.pattern(pattern),
                }
                self.write(" ");
                self.write(keyword);
                self.write(" ");
                self.expr(right, crate::expr::ASSIGN);
                self.write(") ");
                self.stmt(body);
            }
            Stmt::While { test, body } => {
                self.write("while (");
                self.expr(test, crate::expr::SEQUENCE);
                self.write(") ");
                self.stmt(body);
            }
            Stmt::DoWhile { body, test } => {
                self.write("do ");
                self.stmt(body);
                self.write(" while (");
                self.expr(test, crate::expr::SEQUENCE);
                self.write(");");
            }
            Stmt::Break(label) => self.jump("break", label.as_ref()),
            Stmt::Continue(label) => self.jump("continue", label.as_ref()),
            Stmt::Throw(arg) => {
                self.write("throw ");
                self.expr(arg, crate::expr::SEQUENCE);
                self.write(";");
            }
            Stmt::Try {
                block,
                handler,
                finalizer,
            } => {
                self.write("try ");
                self.block(&block.value.stmts);
                if let Some(handler) = handler {
                    self.write(" catch ");
                    if let Some(param) = &handler.value.param {
                        self.write("(");
                        self.pattern(param);
                        self.write(") ");
                    }
                    self.block(&handler.value.body.value.stmts);
                }
                if let Some(finalizer) = finalizer {
                    self.write(" finally ");
                    self.block(&finalizer.value.stmts);
                }
            }
            Stmt::Switch { discriminant, cases } => {
                self.write("switch (");
                self.expr(discriminant, crate::expr::SEQUENCE);
                self.write(") {");
                self.newline();
                self.indent += 1;
                for case in cases {
                    self.write_indent();
                    match &case.test {
                        Some(test) => {
                            self.write("case ");
                            self.expr(test, crate::expr::SEQUENCE);
                            self.write(":");
                        }
                        None => self.write("default:"),
                    }
                    self.newline();
                    self.indent += 1;
                    self.stmt_lines(&case.consequent);
                    self.indent -= 1;
                }
                self.indent -= 1;
                self.write_indent();
                self.write("}");
            }
            Stmt::Labeled { label, body } => {
                self.write(&label.value.name);
                self.write(": ");
                self.stmt(body);
            }
            Stmt::Empty => self.write(";"),
            Stmt::Debugger => self.write("debugger;"),
        }
    }

    fn jump(&mut self, keyword: &str, label: Option<&Node<Ident>>) {
        self.write(keyword);
        if let Some(label) = label {
            self.write(" ");
            self.write(&label.value.name);
        }
        self.write(";");
    }

    fn decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Var(var) => {
                self.var_decl(var);
                self.write(";");
            }
            Decl::Function(func) => self.fn_decl(func),
            Decl::Class(class) => self.class_decl(class),
        }
    }

    /// Declarators without the terminating semicolon.
    pub(crate) fn var_decl(&mut self, var: &VarDecl) {
        self.write(&var.kind.to_string());
        self.write(" ");
        for (i, declarator) in var.declarations.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.pattern(&declarator.pattern);
            if let Some(init) = &declarator.init {
                self.write(" = ");
                self.expr(init, crate::expr::ASSIGN);
            }
        }
    }

    fn fn_decl(&mut self, func: &FnDecl) {
        self.function(Some(&func.ident), &func.function);
    }

    fn class_decl(&mut self, class: &ClassDecl) {
        self.class(Some(&class.ident), &class.class);
    }

    /// `[async] function[*] [name](params) { body }`
    pub(crate) fn function(&mut self, name: Option<&Node<Ident>>, function: &Function) {
        if function.is_async {
            self.write("async ");
        }
        self.write("function");
        if function.is_generator {
            self.write("*");
        }
        self.write(" ");
        if let Some(name) = name {
            self.write(&name.value.name);
        }
        self.function_rest(function);
    }

    /// Parameter list and body
    pub(crate) fn function_rest(&mut self, function: &Function) {
        self.params(&function.params);
        self.write(" ");
        self.block(&function.body.value.stmts);
    }

    pub(crate) fn params(&mut self, params: &[Param]) {
        self.write("(");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            if param.is_rest {
                self.write("...");
            }
            self.pattern(&param.pattern);
        }
        self.write(")");
    }

    pub(crate) fn class(&mut self, name: Option<&Node<Ident>>, class: &Class) {
        self.write("class ");
        if let Some(name) = name {
            self.write(&name.value.name);
            self.write(" ");
        }
        if let Some(extends) = &class.extends {
            self.write("extends ");
            self.expr(extends, crate::expr::CALL);
            self.write(" ");
        }
        if class.members.is_empty() {
            self.write("{}");
            return;
        }

        self.write("{");
        self.newline();
        self.indent += 1;
        for member in &class.members {
            self.write_indent();
            match &member.value {
                ClassMember::Method {
                    key,
                    kind,
                    is_static,
                    function,
                } => {
                    if *is_static {
                        self.write("static ");
                    }
                    self.method(key, *kind, function);
                }
                ClassMember::Field { key, value, is_static } => {
                    if *is_static {
                        self.write("static ");
                    }
                    self.property_name(key);
                    if let Some(value) = value {
                        self.write(" = ");
                        self.expr(value, crate::expr::ASSIGN);
                    }
                    self.write(";");
                }
            }
            self.newline();
        }
        self.indent -= 1;
        self.write_indent();
        self.write("}");
    }

    pub(crate) fn method(&mut self, key: &PropertyName, kind: MethodKind, function: &Function) {
        match kind {
            MethodKind::Getter => self.write("get "),
            MethodKind::Setter => self.write("set "),
            MethodKind::Method | MethodKind::Constructor => {}
        }
        if function.is_async {
            self.write("async ");
        }
        if function.is_generator {
            self.write("*");
        }
        self.property_name(key);
        self.function_rest(function);
    }
}
