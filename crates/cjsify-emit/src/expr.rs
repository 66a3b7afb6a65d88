//! Expression printing
//!
//! Parentheses are derived from operator precedence: a child printed where a
//! tighter binding is required gets wrapped.

use crate::emitter::Emitter;
use cjsify_ast::*;

pub(crate) const SEQUENCE: u8 = 1;
pub(crate) const ASSIGN: u8 = 2;
const CONDITIONAL: u8 = 3;
const UNARY: u8 = 16;
const UPDATE: u8 = 17;
pub(crate) const CALL: u8 = 18;
const PRIMARY: u8 = 19;

fn binary_prec(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::NullishCoalesce => 4,
        BinaryOp::Or => 5,
        BinaryOp::And => 6,
        BinaryOp::BitOr => 7,
        BinaryOp::BitXor => 8,
        BinaryOp::BitAnd => 9,
        BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::StrictEq | BinaryOp::StrictNotEq => 10,
        BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq
        | BinaryOp::In
        | BinaryOp::InstanceOf => 11,
        BinaryOp::LeftShift | BinaryOp::RightShift | BinaryOp::UnsignedRightShift => 12,
        BinaryOp::Add | BinaryOp::Sub => 13,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 14,
        BinaryOp::Pow => 15,
    }
}

pub(crate) fn expr_prec(expr: &Expr) -> u8 {
    match expr {
        Expr::Sequence(_) => SEQUENCE,
        Expr::Assignment { .. } | Expr::Arrow { .. } | Expr::Yield { .. } => ASSIGN,
        Expr::Conditional { .. } => CONDITIONAL,
        Expr::Binary { op, .. } => binary_prec(*op),
        Expr::Unary { .. } | Expr::Await(_) => UNARY,
        Expr::Update { .. } => UPDATE,
        Expr::Call { .. } | Expr::New { .. } | Expr::Member { .. } | Expr::Index { .. } => CALL,
        Expr::Literal(Literal::Number(n)) if n.is_sign_negative() && *n != 0.0 => UNARY,
        // Only legal in argument and element lists
        Expr::Spread(_) => ASSIGN,
        _ => PRIMARY,
    }
}

/// `??` cannot be mixed with `||` or `&&` without parentheses.
fn mixes_nullish(parent: BinaryOp, child: &Expr) -> bool {
    let Expr::Binary { op: child, .. } = child else {
        return false;
    };
    let logical = |op: BinaryOp| matches!(op, BinaryOp::Or | BinaryOp::And);
    (parent == BinaryOp::NullishCoalesce && logical(*child))
        || (logical(parent) && *child == BinaryOp::NullishCoalesce)
}

/// Expressions that would be read as a declaration or block at the start of
/// a statement.
fn starts_with_brace_or_keyword(expr: &Expr) -> bool {
    match expr {
        Expr::Function { .. } | Expr::Class { .. } | Expr::Object(_) => true,
        // `({ a } = b)` must be wrapped as a whole
        Expr::Assignment { target, .. } => matches!(target.value, Expr::Object(_)),
        _ => false,
    }
}

/// Callee of `new` must not contain a call outside parentheses.
fn has_call_in_chain(expr: &Expr) -> bool {
    match expr {
        Expr::Call { .. } => true,
        Expr::Member { object, .. } | Expr::Index { object, .. } => has_call_in_chain(&object.value),
        _ => false,
    }
}

pub(crate) fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{}", value as i128)
    } else {
        format!("{}", value)
    }
}

impl Emitter {
    /// Prints `expr`, parenthesized when it binds looser than `min_prec`.
    pub(crate) fn expr(&mut self, expr: &Node<Expr>, min_prec: u8) {
        let at_start = std::mem::take(&mut self.at_start);
        let parens = expr_prec(&expr.value) < min_prec
            || (self.no_in && matches!(expr.value, Expr::Binary { op: BinaryOp::In, .. }))
            || (at_start && starts_with_brace_or_keyword(&expr.value));

        if parens {
            self.write("(");
            self.expr_inner(expr, false);
            self.write(")");
        } else {
            self.expr_inner(expr, at_start);
        }
    }

    /// Left operands inherit the statement-start position of their parent.
    fn left_operand(&mut self, expr: &Node<Expr>, min_prec: u8, at_start: bool) {
        self.at_start = at_start;
        self.expr(expr, min_prec);
    }

    fn expr_inner(&mut self, expr: &Node<Expr>, at_start: bool) {
        match &expr.value {
            Expr::Literal(literal) => self.literal(literal),
            Expr::Ident(ident) => self.write(&ident.name),
            Expr::This => self.write("this"),
            Expr::Super => self.write("super"),
            Expr::Template(raw) => {
                self.write("`");
                self.write(raw);
                self.write("`");
            }
            Expr::Array(elements) => {
                self.write("[");
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if let Some(element) = element {
                        self.expr(element, ASSIGN);
                    }
                }
                if matches!(elements.last(), Some(None)) {
                    self.write(",");
                }
                self.write("]");
            }
            Expr::Object(props) => self.object(props),
            Expr::Function { ident, function } => self.function(ident.as_ref(), function),
            Expr::Arrow { params, body, is_async } => {
                if *is_async {
                    self.write("async ");
                }
                self.params(params);
                self.write(" => ");
                match body {
                    ArrowBody::Expr(body) => {
                        // An object body would read as a block.
                        self.at_start = true;
                        self.expr(body, ASSIGN);
                    }
                    ArrowBody::Block(block) => self.block(&block.value.stmts),
                }
            }
            Expr::Class { ident, class } => self.class(ident.as_ref(), class),
            Expr::Unary { op, expr: operand } => {
                self.write(&op.to_string());
                if op.is_keyword() {
                    self.write(" ");
                }
                let at = self.out.len();
                self.expr(operand, UNARY);
                self.separate_signs(at);
            }
            Expr::Update { op, prefix, argument } => {
                if *prefix {
                    self.write(&op.to_string());
                    let at = self.out.len();
                    self.expr(argument, UPDATE);
                    self.separate_signs(at);
                } else {
                    self.left_operand(argument, CALL, at_start);
                    self.write(&op.to_string());
                }
            }
            Expr::Binary { left, op, right } => {
                let prec = binary_prec(*op);
                let (left_min, right_min) = if *op == BinaryOp::Pow {
                    // `-a ** b` is a syntax error
                    (UPDATE, prec)
                } else {
                    (prec, prec + 1)
                };

                if mixes_nullish(*op, &left.value) {
                    self.write("(");
                    self.expr(left, SEQUENCE);
                    self.write(")");
                } else {
                    self.left_operand(left, left_min, at_start);
                }
                self.write(" ");
                self.write(&op.to_string());
                self.write(" ");
                if mixes_nullish(*op, &right.value) {
                    self.write("(");
                    self.expr(right, SEQUENCE);
                    self.write(")");
                } else {
                    self.expr(right, right_min);
                }
            }
            Expr::Assignment { target, op, value } => {
                self.left_operand(target, CALL, at_start);
                self.write(" ");
                self.write(&op.to_string());
                self.write(" ");
                self.expr(value, ASSIGN);
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.left_operand(test, CONDITIONAL + 1, at_start);
                self.write(" ? ");
                self.expr(consequent, ASSIGN);
                self.write(" : ");
                self.expr(alternate, ASSIGN);
            }
            Expr::Call { callee, args } => {
                self.left_operand(callee, CALL, at_start);
                self.arguments(args);
            }
            Expr::New { callee, args } => {
                self.write("new ");
                if has_call_in_chain(&callee.value) {
                    self.write("(");
                    self.expr(callee, SEQUENCE);
                    self.write(")");
                } else {
                    self.expr(callee, CALL);
                }
                self.arguments(args);
            }
            Expr::Member { object, property } => {
                if matches!(object.value, Expr::Literal(Literal::Number(_))) {
                    self.write("(");
                    self.expr(object, SEQUENCE);
                    self.write(")");
                } else {
                    self.left_operand(object, CALL, at_start);
                }
                self.write(".");
                self.write(&property.value.name);
            }
            Expr::Index { object, index } => {
                self.left_operand(object, CALL, at_start);
                self.write("[");
                self.expr(index, SEQUENCE);
                self.write("]");
            }
            Expr::Sequence(exprs) => {
                for (i, element) in exprs.iter().enumerate() {
                    if i == 0 {
                        self.left_operand(element, ASSIGN, at_start);
                    } else {
                        self.write(", ");
                        self.expr(element, ASSIGN);
                    }
                }
            }
            Expr::Spread(arg) => {
                self.write("...");
                self.expr(arg, ASSIGN);
            }
            Expr::Await(arg) => {
                self.write("await ");
                self.expr(arg, UNARY);
            }
            Expr::Yield { argument, delegate } => {
                self.write("yield");
                if *delegate {
                    self.write("*");
                }
                if let Some(argument) = argument {
                    self.write(" ");
                    self.expr(argument, ASSIGN);
                }
            }
        }
    }

    /// `- -x` and `+ +x` must not fuse into `--x` / `++x`.
    fn separate_signs(&mut self, operand_start: usize) {
        let before = self.out[..operand_start].chars().next_back();
        let after = self.out[operand_start..].chars().next();
        if let (Some(before), Some(after)) = (before, after) {
            if (before == '-' || before == '+') && before == after {
                self.out.insert(operand_start, ' ');
            }
        }
    }

    fn arguments(&mut self, args: &[Node<Expr>]) {
        self.write("(");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.expr(arg, ASSIGN);
        }
        self.write(")");
    }

    fn literal(&mut self, literal: &Literal) {
        match literal {
            Literal::Number(value) => self.write(&format_number(*value)),
            Literal::String(value) => self.string_literal(value),
            Literal::Boolean(value) => self.write(if *value { "true" } else { "false" }),
            Literal::Null => self.write("null"),
        }
    }

    /// Double-quoted string with the escapes needed to read it back.
    pub(crate) fn string_literal(&mut self, value: &str) {
        self.out.push('"');
        let mut chars = value.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\\' => self.out.push_str("\\\\"),
                '"' => self.out.push_str("\\\""),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                '\0' => {
                    if chars.peek().is_some_and(|c| c.is_ascii_digit()) {
                        self.out.push_str("\\x00");
                    } else {
                        self.out.push_str("\\0");
                    }
                }
                '\u{2028}' => self.out.push_str("\\u2028"),
                '\u{2029}' => self.out.push_str("\\u2029"),
                ch if ch < '\u{20}' => self.out.push_str(&format!("\\x{:02X}", ch as u32)),
                ch => self.out.push(ch),
            }
        }
        self.out.push('"');
    }

    fn object(&mut self, props: &[Node<ObjectProperty>]) {
        if props.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{ ");
        for (i, prop) in props.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            match &prop.value {
                ObjectProperty::Property { key, value, shorthand } => {
                    let same_name = matches!(
                        (key, &value.value),
                        (PropertyName::Ident(key), Expr::Ident(ident)) if *key == ident.name
                    );
                    if *shorthand && same_name {
                        self.property_name(key);
                    } else {
                        self.property_name(key);
                        self.write(": ");
                        self.expr(value, ASSIGN);
                    }
                }
                ObjectProperty::Method { key, kind, function } => self.method(key, *kind, function),
                ObjectProperty::Spread(value) => {
                    self.write("...");
                    self.expr(value, ASSIGN);
                }
            }
        }
        self.write(" }");
    }

    pub(crate) fn property_name(&mut self, key: &PropertyName) {
        match key {
            PropertyName::Ident(name) => self.write(name),
            PropertyName::String(value) => self.string_literal(value),
            PropertyName::Number(value) => self.write(&format_number(*value)),
            PropertyName::Computed(expr) => {
                self.write("[");
                self.expr(expr, ASSIGN);
                self.write("]");
            }
        }
    }

    pub(crate) fn pattern(&mut self, pattern: &Node<Pattern>) {
        match &pattern.value {
            Pattern::Ident(ident) => self.write(&ident.name),
            Pattern::Array { elements, rest } => {
                self.write("[");
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if let Some(element) = element {
                        self.pattern(element);
                    }
                }
                if let Some(rest) = rest {
                    if !elements.is_empty() {
                        self.write(", ");
                    }
                    self.write("...");
                    self.pattern(rest);
                } else if matches!(elements.last(), Some(None)) {
                    self.write(",");
                }
                self.write("]");
            }
            Pattern::Object { properties, rest } => {
                if properties.is_empty() && rest.is_none() {
                    self.write("{}");
                    return;
                }
                self.write("{ ");
                for (i, prop) in properties.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if prop.shorthand {
                        self.pattern(&prop.value);
                    } else {
                        self.property_name(&prop.key);
                        self.write(": ");
                        self.pattern(&prop.value);
                    }
                }
                if let Some(rest) = rest {
                    if !properties.is_empty() {
                        self.write(", ");
                    }
                    self.write("...");
                    self.pattern(rest);
                }
                self.write(" }");
            }
            Pattern::Assignment { pattern, default } => {
                self.pattern(pattern);
                self.write(" = ");
                self.expr(default, ASSIGN);
            }
        }
    }
}
