use cjsify_ast::Span;
use cjsify_emit::emit_script;
use cjsify_modules::{lower_program, lower_program_with_scope, ModuleOptions, TransformError};
use cjsify_parser::parse_source;
use cjsify_scope::{DeclId, Lookup, ScopeResolver};

const PREAMBLE: &str =
    "\"use strict\";\nObject.defineProperty(exports, \"__esModule\", { value: true });\n";

fn lower(source: &str) -> Result<String, TransformError> {
    let program = parse_source(source, 0).expect("source parses");
    let script = lower_program(program, &ModuleOptions::default())?;
    Ok(emit_script(&script))
}

#[test]
fn test_complete_module() {
    let source = r#"
import { helper } from "./helper";
export let count = 0;
export function increment() {
  return count++;
}
export default class Counter {}
export * from "./extra";
"#;
    let expected = format!(
        "{}{}",
        PREAMBLE,
        r#"exports.increment = increment;
var helper = require("./helper").helper;
let count = exports.count = 0;
function increment() {
  return exports.count = count += 1, count - 1;
}
class Counter {}
exports.default = Counter;
(function (obj) {
  for (var key in obj) {
    if (key !== "__esModule") exports[key] = obj[key];
  }
})(require("./extra"));
"#
    );
    assert_eq!(lower(source).unwrap(), expected);
}

#[test]
fn test_shadowing_function_is_left_alone() {
    let source = r#"
export var value = 1;
function shadow() {
  var value = 2;
  value += 1;
  return value;
}
value = 3;
"#;
    let expected = format!(
        "{}{}",
        PREAMBLE,
        r#"var value = exports.value = 1;
function shadow() {
  var value = 2;
  value += 1;
  return value;
}
exports.value = value = 3;
"#
    );
    assert_eq!(lower(source).unwrap(), expected);
}

#[test]
fn test_hoisted_export_precedes_callers() {
    let source = "run();\nexport function run() {}\n";
    let expected = format!("{}exports.run = run;\nrun();\nfunction run() {{}}\n", PREAMBLE);
    assert_eq!(lower(source).unwrap(), expected);
}

#[test]
fn test_script_without_module_syntax() {
    assert_eq!(lower("let x = 1;\nx++;\n").unwrap(), "\"use strict\";\nlet x = 1;\nx++;\n");
}

#[test]
fn test_mutations_in_nested_statements() {
    let source = "export let total = 0;\nfor (let i = 0; i < 3; i++) {\n  if (i) total += i;\n  else total--;\n}\n";
    let expected = format!(
        "{}let total = exports.total = 0;\nfor (let i = 0; i < 3; i++) {{\n  if (i) exports.total = total += i;\n  else exports.total = total -= 1;\n}}\n",
        PREAMBLE
    );
    assert_eq!(lower(source).unwrap(), expected);
}

/// Resolver that knows no declarations at all.
struct Unresolved;

impl ScopeResolver for Unresolved {
    fn resolve(&self, _name: &str, _at: Span, _lookup: Lookup) -> Option<DeclId> {
        None
    }
}

#[test]
fn test_resolver_decides_what_is_live() {
    let program = parse_source("export let count = 0;\ncount++;\n", 0).unwrap();
    let options = ModuleOptions {
        strict: false,
        es_module_marker: false,
        ..ModuleOptions::default()
    };
    let script = lower_program_with_scope(program, &options, &Unresolved).unwrap();
    assert_eq!(emit_script(&script), "let count = exports.count = 0;\ncount++;\n");
}
