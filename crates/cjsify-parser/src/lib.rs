//! # cjsify Parser
//!
//! Recursive descent parser for JavaScript modules. Binary operators use
//! precedence climbing; parentheses are dropped from the tree.

use cjsify_ast::*;
use cjsify_lexer::{Lexer, Token, TokenKind};

// Module declarations
mod error;
mod parser;
mod expr;
mod stmt;
mod decl;
mod pattern;
mod helpers;

// Re-export public types
pub use error::{ParseError, ParseResult};
pub use parser::Parser;

/// Lexes and parses one source file. Lexical errors are reported together
/// before any parsing is attempted.
pub fn parse_source(source: &str, file_id: usize) -> Result<Program, Vec<ParseError>> {
    let tokens = Lexer::with_file_id(source, file_id).tokenize();

    let lex_errors: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Error)
        .map(|t| ParseError::new(t.value.clone(), t.span))
        .collect();
    if !lex_errors.is_empty() {
        return Err(lex_errors);
    }

    Parser::new(tokens).parse_program()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Program, Vec<ParseError>> {
        parse_source(source, 0)
    }

    fn stmt(program: &Program, index: usize) -> &Stmt {
        match &program.items[index].value {
            ModuleItem::Stmt(stmt) => &stmt.value,
            other => panic!("expected statement, got {:?}", other),
        }
    }

    fn expr(program: &Program, index: usize) -> &Expr {
        match stmt(program, index) {
            Stmt::Expr(expr) => &expr.value,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    fn export(program: &Program, index: usize) -> &ExportDecl {
        match &program.items[index].value {
            ModuleItem::Export(export) => export,
            other => panic!("expected export, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_variable_declaration() {
        let program = parse("let x = 42, y;").unwrap();
        assert_eq!(program.items.len(), 1);
        let Stmt::Decl(Decl::Var(var)) = stmt(&program, 0) else {
            panic!("expected var decl");
        };
        assert_eq!(var.kind, VarDeclKind::Let);
        assert_eq!(var.declarations.len(), 2);
        assert!(var.declarations[1].init.is_none());
    }

    #[test]
    fn test_parse_function_declaration() {
        let program = parse("function add(a, b = 1, ...rest) { return a + b; }").unwrap();
        let Stmt::Decl(Decl::Function(func)) = stmt(&program, 0) else {
            panic!("expected function");
        };
        assert_eq!(func.ident.value.name, "add");
        assert_eq!(func.function.params.len(), 3);
        assert!(func.function.params[2].is_rest);
        assert!(matches!(func.function.params[1].pattern.value, Pattern::Assignment { .. }));
    }

    #[test]
    fn test_parse_update_expressions() {
        let program = parse("count++; ++count; x = count--;").unwrap();
        assert!(matches!(
            expr(&program, 0),
            Expr::Update { op: UpdateOp::Increment, prefix: false, .. }
        ));
        assert!(matches!(
            expr(&program, 1),
            Expr::Update { op: UpdateOp::Increment, prefix: true, .. }
        ));
        let Expr::Assignment { value, .. } = expr(&program, 2) else {
            panic!("expected assignment");
        };
        assert!(matches!(value.value, Expr::Update { op: UpdateOp::Decrement, prefix: false, .. }));
    }

    #[test]
    fn test_postfix_needs_same_line() {
        let program = parse("a\n++b").unwrap();
        assert_eq!(program.items.len(), 2);
        assert!(matches!(expr(&program, 1), Expr::Update { prefix: true, .. }));
    }

    #[test]
    fn test_parse_precedence() {
        let program = parse("a = 1 + 2 * 3 ** 2 ** 1;").unwrap();
        let Expr::Assignment { value, .. } = expr(&program, 0) else {
            panic!("expected assignment");
        };
        let Expr::Binary { op: BinaryOp::Add, right, .. } = &value.value else {
            panic!("expected addition at the root");
        };
        let Expr::Binary { op: BinaryOp::Mul, right, .. } = &right.value else {
            panic!("expected multiplication");
        };
        let Expr::Binary { op: BinaryOp::Pow, right, .. } = &right.value else {
            panic!("expected exponent");
        };
        // Right associative
        assert!(matches!(right.value, Expr::Binary { op: BinaryOp::Pow, .. }));
    }

    #[test]
    fn test_parse_compound_assignment_chain() {
        let program = parse("a += b = c;").unwrap();
        let Expr::Assignment { op, value, .. } = expr(&program, 0) else {
            panic!("expected assignment");
        };
        assert_eq!(*op, AssignOp::AddAssign);
        assert!(matches!(value.value, Expr::Assignment { op: AssignOp::Assign, .. }));
    }

    #[test]
    fn test_invalid_assignment_target() {
        let errors = parse("a + b = c;").unwrap_err();
        assert_eq!(errors[0].message, "Invalid assignment target");
    }

    #[test]
    fn test_parse_arrow_functions() {
        let program = parse("const f = (a, { b }) => a + b; const g = x => { return x; }; const h = async () => 1;")
            .unwrap();
        assert_eq!(program.items.len(), 3);
        let Stmt::Decl(Decl::Var(var)) = stmt(&program, 2) else {
            panic!("expected var decl");
        };
        assert!(matches!(
            var.declarations[0].init.as_ref().map(|e| &e.value),
            Some(Expr::Arrow { is_async: true, .. })
        ));
    }

    #[test]
    fn test_parse_object_literal() {
        let program = parse("x = { a, b: 1, 'c': 2, [d]: 3, get e() { return 1; }, f() {}, ...g, default: 4 };").unwrap();
        let Expr::Assignment { value, .. } = expr(&program, 0) else {
            panic!("expected assignment");
        };
        let Expr::Object(props) = &value.value else {
            panic!("expected object");
        };
        assert_eq!(props.len(), 8);
        assert!(matches!(props[0].value, ObjectProperty::Property { shorthand: true, .. }));
        assert!(matches!(props[4].value, ObjectProperty::Method { kind: MethodKind::Getter, .. }));
        assert!(matches!(props[6].value, ObjectProperty::Spread(_)));
    }

    #[test]
    fn test_parse_class_declaration() {
        let source = r#"
            class Point extends Base {
                static origin = 0;
                constructor(x, y) {
                    super();
                    this.x = x;
                }
                get length() { return 0; }
            }
        "#;
        let program = parse(source).unwrap();
        let Stmt::Decl(Decl::Class(class)) = stmt(&program, 0) else {
            panic!("expected class");
        };
        assert_eq!(class.class.members.len(), 3);
        assert!(matches!(
            class.class.members[1].value,
            ClassMember::Method { kind: MethodKind::Constructor, .. }
        ));
    }

    #[test]
    fn test_parse_imports() {
        let source = r#"
            import "side-effect";
            import def, * as ns from "a";
            import { x, y as z, default as w } from "b";
        "#;
        let program = parse(source).unwrap();
        assert_eq!(program.items.len(), 3);

        let ModuleItem::Import(import) = &program.items[1].value else {
            panic!("expected import");
        };
        assert_eq!(import.source, "a");
        assert!(matches!(import.specifiers[0].value, ImportSpecifier::Default(_)));
        assert!(matches!(import.specifiers[1].value, ImportSpecifier::Namespace(_)));

        let ModuleItem::Import(import) = &program.items[2].value else {
            panic!("expected import");
        };
        let locals: Vec<_> = import.specifiers.iter().map(|s| s.value.local().value.name.as_str()).collect();
        assert_eq!(locals, vec!["x", "z", "w"]);
    }

    #[test]
    fn test_parse_export_declarations() {
        let source = r#"
            export var a = 1, b;
            export function f() {}
            export class C {}
            export async function g() {}
        "#;
        let program = parse(source).unwrap();
        assert_eq!(program.items.len(), 4);
        assert!(matches!(export(&program, 0), ExportDecl::Decl(Node { value: Decl::Var(_), .. })));
        assert!(matches!(export(&program, 1), ExportDecl::Decl(Node { value: Decl::Function(_), .. })));
        assert!(matches!(export(&program, 2), ExportDecl::Decl(Node { value: Decl::Class(_), .. })));
        let ExportDecl::Decl(Node { value: Decl::Function(g), .. }) = export(&program, 3) else {
            panic!("expected async function");
        };
        assert!(g.function.is_async);
    }

    #[test]
    fn test_parse_export_defaults() {
        let source = r#"
            export default 42;
            export default function named() {}
            export default function () {}
            export default class {}
        "#;
        let program = parse(source).unwrap();
        let kinds: Vec<_> = (0..4)
            .map(|i| match export(&program, i) {
                ExportDecl::Default(d) => match &d.value {
                    DefaultExport::Function(_) => "function",
                    DefaultExport::Class(_) => "class",
                    DefaultExport::Expr(_) => "expr",
                },
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["expr", "function", "expr", "expr"]);
    }

    #[test]
    fn test_parse_export_specifiers() {
        let source = r#"
            export { a, b as c };
            export { default, x as y } from "m";
            export * from "n";
            export * as ns from "o";
        "#;
        let program = parse(source).unwrap();

        let ExportDecl::Specifiers { specifiers, source } = export(&program, 1) else {
            panic!("expected specifiers");
        };
        assert_eq!(source.as_deref(), Some("m"));
        assert_eq!(specifiers[1].value.exported_name(), Some("y"));

        let ExportDecl::Specifiers { specifiers, source } = export(&program, 3) else {
            panic!("expected specifiers");
        };
        assert_eq!(source.as_deref(), Some("o"));
        assert_eq!(specifiers[0].value.exported_name(), Some("ns"));
    }

    #[test]
    fn test_reserved_local_export_rejected() {
        let errors = parse("export { default };").unwrap_err();
        assert!(errors[0].message.contains("reserved word"));
    }

    #[test]
    fn test_nested_export_rejected() {
        let errors = parse("function f() { export var a = 1; }").unwrap_err();
        assert!(errors[0].message.contains("top level"));
    }

    #[test]
    fn test_parse_control_flow() {
        let source = r#"
            if (x > 0) {
                log("positive");
            } else log("negative");

            for (let i = 0; i < 10; i++) {
                log(i);
            }

            for (var key in obj) {}
            for (const item of list) {}
            for (k in obj);

            while (true) {
                break;
            }

            do { x--; } while (x)

            switch (x) {
                case 1:
                    y();
                    break;
                default:
                    z();
            }

            try { a(); } catch (e) { b(); } finally { c(); }

            outer: for (;;) { continue outer; }
        "#;
        let program = parse(source).unwrap();
        assert_eq!(program.items.len(), 10);
        assert!(matches!(stmt(&program, 2), Stmt::ForIn { left: ForHead::Var(_), .. }));
        assert!(matches!(stmt(&program, 3), Stmt::ForOf { .. }));
        assert!(matches!(stmt(&program, 4), Stmt::ForIn { left: ForHead::Pattern(_), .. }));
    }

    #[test]
    fn test_in_operator_inside_for_init_parens() {
        let program = parse("for (var x = ('a' in o); x; ) {}").unwrap();
        assert!(matches!(stmt(&program, 0), Stmt::For { .. }));
    }

    #[test]
    fn test_automatic_semicolons() {
        let program = parse("let a = 1\nlet b = 2\nfunction f() { return }").unwrap();
        assert_eq!(program.items.len(), 3);
        assert!(parse("let a = 1 let b = 2").is_err());
    }

    #[test]
    fn test_destructuring_declarations() {
        let program = parse("const { a, b: [c, , d = 1], ...rest } = obj;").unwrap();
        let Stmt::Decl(decl) = stmt(&program, 0) else {
            panic!("expected declaration");
        };
        let names: Vec<_> = decl.bound_idents().into_iter().map(|i| i.value.name).collect();
        assert_eq!(names, vec!["a", "c", "d", "rest"]);
    }

    #[test]
    fn test_member_and_call_chains() {
        let program = parse("new Foo.Bar(1).baz[qux](...args).default;").unwrap();
        let Expr::Member { property, .. } = expr(&program, 0) else {
            panic!("expected member access");
        };
        assert_eq!(property.value.name, "default");
    }

    #[test]
    fn test_spans_cover_items() {
        let source = "export var a = 1;";
        let program = parse(source).unwrap();
        assert_eq!(program.items[0].span, Span::new(0, source.len(), 0));
        let ExportDecl::Decl(decl) = export(&program, 0) else {
            panic!("expected export declaration");
        };
        assert_eq!(decl.span, Span::new(7, source.len(), 0));
    }

    #[test]
    fn test_lexer_errors_reported() {
        let errors = parse("let s = 'unterminated").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Unterminated string literal");
    }

    #[test]
    fn test_error_recovery_collects_multiple() {
        let errors = parse("let = 1;\nlet ok = 2;\nvar = 3;").unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
