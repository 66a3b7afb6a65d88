//! Minimal interpreter for lowered scripts.
//!
//! Covers what the lowering produces for numeric module state: variable
//! declarations, `exports` member writes, assignments, updates, sequences,
//! arithmetic and `switch` with `break`. Anything else panics.

#![allow(dead_code)]

use cjsify_ast::*;
use cjsify_modules::{lower_program, ModuleOptions};
use cjsify_parser::parse_source;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Number(f64),
    Str(String),
    Bool(bool),
}

impl Value {
    fn number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            other => panic!("expected a number, got {:?}", other),
        }
    }
}

#[derive(Debug, Default)]
pub struct Evaluator {
    pub vars: HashMap<String, Value>,
    pub exports: HashMap<String, Value>,
    pub es_module: bool,
}

/// Parses, lowers with default options and runs `source`.
pub fn run(source: &str) -> Evaluator {
    let program = parse_source(source, 0).expect("source parses");
    let script = lower_program(program, &ModuleOptions::default()).expect("source lowers");
    let mut evaluator = Evaluator::default();
    evaluator.script(&script);
    evaluator
}

impl Evaluator {
    pub fn var(&self, name: &str) -> Value {
        self.vars.get(name).cloned().unwrap_or_else(|| panic!("no variable {}", name))
    }

    pub fn export(&self, name: &str) -> Value {
        self.exports.get(name).cloned().unwrap_or_else(|| panic!("no export {}", name))
    }

    pub fn script(&mut self, script: &Script) {
        for stmt in &script.body {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Node<Stmt>) {
        match &stmt.value {
            Stmt::Expr(expr) => {
                self.expr(expr);
            }
            Stmt::Decl(Decl::Var(var)) => {
                for declarator in &var.declarations {
                    let name = declarator
                        .pattern
                        .as_ident()
                        .expect("identifier declarator")
                        .name
                        .clone();
                    let value = match &declarator.init {
                        Some(init) => self.expr(init),
                        None => Value::Undefined,
                    };
                    self.vars.insert(name, value);
                }
            }
            Stmt::Block(block) => {
                for stmt in &block.stmts {
                    self.stmt(stmt);
                }
            }
            Stmt::Switch { discriminant, cases } => {
                let value = self.expr(discriminant);
                let mut matched = false;
                'cases: for case in cases {
                    if !matched {
                        matched = match &case.test {
                            Some(test) => self.expr(test) == value,
                            None => true,
                        };
                    }
                    if matched {
                        for stmt in &case.consequent {
                            if matches!(stmt.value, Stmt::Break(None)) {
                                break 'cases;
                            }
                            self.stmt(stmt);
                        }
                    }
                }
            }
            other => panic!("unsupported statement {:?}", other),
        }
    }

    fn expr(&mut self, expr: &Node<Expr>) -> Value {
        match &expr.value {
            Expr::Literal(Literal::Number(n)) => Value::Number(*n),
            Expr::Literal(Literal::String(s)) => Value::Str(s.clone()),
            Expr::Literal(Literal::Boolean(b)) => Value::Bool(*b),
            Expr::Ident(_) | Expr::Member { .. } => self.read(expr),
            Expr::Assignment { target, op, value } => {
                let current = (*op != AssignOp::Assign).then(|| self.read(target));
                let rhs = self.expr(value);
                let result = match (op, current) {
                    (AssignOp::Assign, _) => rhs,
                    (AssignOp::AddAssign, Some(old)) => Value::Number(old.number() + rhs.number()),
                    (AssignOp::SubAssign, Some(old)) => Value::Number(old.number() - rhs.number()),
                    (AssignOp::MulAssign, Some(old)) => Value::Number(old.number() * rhs.number()),
                    (op, _) => panic!("unsupported assignment operator {}", op),
                };
                self.write(target, result.clone());
                result
            }
            Expr::Update { op, prefix, argument } => {
                let old = self.read(argument).number();
                let new = match op {
                    UpdateOp::Increment => old + 1.0,
                    UpdateOp::Decrement => old - 1.0,
                };
                self.write(argument, Value::Number(new));
                Value::Number(if *prefix { new } else { old })
            }
            Expr::Binary { left, op, right } => {
                let left = self.expr(left).number();
                let right = self.expr(right).number();
                match op {
                    BinaryOp::Add => Value::Number(left + right),
                    BinaryOp::Sub => Value::Number(left - right),
                    BinaryOp::Mul => Value::Number(left * right),
                    op => panic!("unsupported binary operator {}", op),
                }
            }
            Expr::Sequence(exprs) => {
                let mut last = Value::Undefined;
                for element in exprs {
                    last = self.expr(element);
                }
                last
            }
            Expr::Call { callee, .. } if is_define_property(callee) => {
                self.es_module = true;
                Value::Undefined
            }
            other => panic!("unsupported expression {:?}", other),
        }
    }

    fn read(&self, target: &Node<Expr>) -> Value {
        match &target.value {
            Expr::Ident(ident) if ident.name == "undefined" => Value::Undefined,
            Expr::Ident(ident) => self.var(&ident.name),
            Expr::Member { object, property } if is_exports(object) => self
                .exports
                .get(&property.value.name)
                .cloned()
                .unwrap_or(Value::Undefined),
            other => panic!("cannot read {:?}", other),
        }
    }

    fn write(&mut self, target: &Node<Expr>, value: Value) {
        match &target.value {
            Expr::Ident(ident) => {
                self.vars.insert(ident.name.clone(), value);
            }
            Expr::Member { object, property } if is_exports(object) => {
                self.exports.insert(property.value.name.clone(), value);
            }
            other => panic!("cannot assign to {:?}", other),
        }
    }
}

fn is_exports(expr: &Node<Expr>) -> bool {
    matches!(&expr.value, Expr::Ident(ident) if ident.name == "exports")
}

fn is_define_property(callee: &Node<Expr>) -> bool {
    matches!(
        &callee.value,
        Expr::Member { object, property }
            if matches!(&object.value, Expr::Ident(ident) if ident.name == "Object")
                && property.value.name == "defineProperty"
    )
}
