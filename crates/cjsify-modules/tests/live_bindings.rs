mod common;

use cjsify_emit::emit_script;
use cjsify_modules::{lower_program, ModuleOptions};
use cjsify_parser::parse_source;
use common::{run, Value};

fn num(n: f64) -> Value {
    Value::Number(n)
}

#[test]
fn test_exports_follow_every_mutation() {
    let state = run("export let count = 0;\ncount++;\ncount += 5;");
    assert_eq!(state.var("count"), num(6.0));
    assert_eq!(state.export("count"), num(6.0));
    assert!(state.es_module);
}

#[test]
fn test_postfix_increment_yields_previous_value() {
    let state = run("export let count = 0;\nvar before = count++;");
    assert_eq!(state.var("before"), num(0.0));
    assert_eq!(state.export("count"), num(1.0));
}

#[test]
fn test_prefix_increment_yields_updated_value() {
    let state = run("export let count = 0;\nvar after = ++count;");
    assert_eq!(state.var("after"), num(1.0));
    assert_eq!(state.export("count"), num(1.0));
}

#[test]
fn test_decrement_parity() {
    let state = run("export let n = 5;\nvar a = n--;\nvar b = --n;");
    assert_eq!(state.var("a"), num(5.0));
    assert_eq!(state.var("b"), num(3.0));
    assert_eq!(state.export("n"), num(3.0));
}

#[test]
fn test_discarded_sequence_element() {
    let state = run("export let k = 0;\nvar s = (k++, k);");
    assert_eq!(state.var("s"), num(1.0));
    assert_eq!(state.export("k"), num(1.0));
}

#[test]
fn test_compound_assignment_value_is_preserved() {
    let state = run("export let m = 2;\nvar z = (m *= 3) + 1;");
    assert_eq!(state.var("z"), num(7.0));
    assert_eq!(state.export("m"), num(6.0));
}

#[test]
fn test_chained_assignment() {
    let state = run("export let a = 0;\nexport let b = 0;\nvar r = a = b = 3;");
    assert_eq!(state.var("r"), num(3.0));
    assert_eq!(state.export("a"), num(3.0));
    assert_eq!(state.export("b"), num(3.0));
}

#[test]
fn test_uninitialized_export_is_published() {
    let state = run("export var u;\nexport let w, x = 2;");
    assert_eq!(state.export("u"), Value::Undefined);
    assert_eq!(state.export("w"), Value::Undefined);
    assert_eq!(state.export("x"), num(2.0));
}

#[test]
fn test_specifier_export_is_a_snapshot() {
    let state = run("let v = 1;\nexport { v };\nv = 2;");
    assert_eq!(state.var("v"), num(2.0));
    assert_eq!(state.export("v"), num(1.0));
}

#[test]
fn test_switch_discriminant_updates_export() {
    let state = run("export let x = 0;\nswitch (x++) {\n  case 7:\n    let x = 5;\n    break;\n}");
    assert_eq!(state.var("x"), num(1.0));
    assert_eq!(state.export("x"), num(1.0));
}

#[test]
fn test_parameter_default_updates_export() {
    let source = "export let n = 0;\nfunction f(a = n++) {\n  var n;\n  return a;\n}";
    let program = parse_source(source, 0).expect("source parses");
    let script = lower_program(program, &ModuleOptions::default()).expect("source lowers");
    let output = emit_script(&script);
    assert!(
        output.contains("function f(a = (exports.n = n += 1, n - 1)) {\n  var n;\n  return a;\n}"),
        "{}",
        output
    );
}
