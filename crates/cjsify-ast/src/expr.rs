//! Expression definitions for the AST

use super::*;
use std::fmt;

/// Expression
///
/// Parentheses are not represented; the emitter reinserts them from operator
/// precedence.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal values
    Literal(Literal),

    /// Identifier reference (`undefined` is an identifier, not a literal)
    Ident(Ident),

    /// This expression
    This,

    /// Super expression
    Super,

    /// Array literal: [elem1, , elem3, ...spread]
    Array(Vec<Option<Node<Expr>>>),

    /// Object literal: { key: value, method() {}, ...spread }
    Object(Vec<Node<ObjectProperty>>),

    /// Function expression: function name?(params) { body }
    Function {
        ident: Option<Node<Ident>>,
        function: Function,
    },

    /// Arrow function: (params) => body
    Arrow {
        params: Vec<Param>,
        body: ArrowBody,
        is_async: bool,
    },

    /// Class expression: class name? extends base { members }
    Class {
        ident: Option<Node<Ident>>,
        class: Class,
    },

    /// Template literal without substitutions, raw text between the backticks
    Template(String),

    /// Unary operation: op expr
    Unary {
        op: UnaryOp,
        expr: Box<Node<Expr>>,
    },

    /// Update expression: ++x, x++, --x, x--
    Update {
        op: UpdateOp,
        prefix: bool,
        argument: Box<Node<Expr>>,
    },

    /// Binary operation: left op right
    Binary {
        left: Box<Node<Expr>>,
        op: BinaryOp,
        right: Box<Node<Expr>>,
    },

    /// Assignment: target op value
    Assignment {
        target: Box<Node<Expr>>,
        op: AssignOp,
        value: Box<Node<Expr>>,
    },

    /// Conditional: test ? consequent : alternate
    Conditional {
        test: Box<Node<Expr>>,
        consequent: Box<Node<Expr>>,
        alternate: Box<Node<Expr>>,
    },

    /// Function call: callee(args)
    Call {
        callee: Box<Node<Expr>>,
        args: Vec<Node<Expr>>,
    },

    /// New expression: new Constructor(args)
    New {
        callee: Box<Node<Expr>>,
        args: Vec<Node<Expr>>,
    },

    /// Member access: object.property
    Member {
        object: Box<Node<Expr>>,
        property: Node<Ident>,
    },

    /// Computed member access: object[index]
    Index {
        object: Box<Node<Expr>>,
        index: Box<Node<Expr>>,
    },

    /// Sequence expression: expr1, expr2, ...
    Sequence(Vec<Node<Expr>>),

    /// Spread element: ...expr (array literals and call arguments only)
    Spread(Box<Node<Expr>>),

    /// Await expression: await expr
    Await(Box<Node<Expr>>),

    /// Yield expression: yield expr, yield* expr
    Yield {
        argument: Option<Box<Node<Expr>>>,
        delegate: bool,
    },
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Expr {
        Expr::Ident(Ident::new(name))
    }

    pub fn undefined() -> Expr {
        Expr::ident("undefined")
    }

    pub fn number(value: f64) -> Expr {
        Expr::Literal(Literal::Number(value))
    }

    pub fn string(value: impl Into<String>) -> Expr {
        Expr::Literal(Literal::String(value.into()))
    }

    /// `object.property` with a synthesized property name.
    pub fn member(object: Node<Expr>, property: impl Into<String>) -> Expr {
        Expr::Member {
            object: Box::new(object),
            property: Node::dummy(Ident::new(property)),
        }
    }

    pub fn assign(target: Node<Expr>, op: AssignOp, value: Node<Expr>) -> Expr {
        Expr::Assignment {
            target: Box::new(target),
            op,
            value: Box::new(value),
        }
    }

    pub fn call(callee: Node<Expr>, args: Vec<Node<Expr>>) -> Expr {
        Expr::Call {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn as_ident(&self) -> Option<&Ident> {
        match self {
            Expr::Ident(ident) => Some(ident),
            _ => None,
        }
    }
}

impl Node<Expr> {
    /// Moves the expression out, leaving `undefined` behind.
    pub fn take(&mut self) -> Node<Expr> {
        let span = self.span;
        let value = std::mem::replace(&mut self.value, Expr::undefined());
        Node::new(value, span)
    }
}

/// Literal values
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub pattern: Node<Pattern>,
    pub is_rest: bool,
}

/// Shared shape of function declarations, expressions and methods
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub params: Vec<Param>,
    pub body: Node<BlockStmt>,
    pub is_async: bool,
    pub is_generator: bool,
}

/// Arrow function body
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Expr(Box<Node<Expr>>),
    Block(Node<BlockStmt>),
}

/// Shared shape of class declarations and expressions
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub extends: Option<Box<Node<Expr>>>,
    pub members: Vec<Node<ClassMember>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    Method {
        key: PropertyName,
        kind: MethodKind,
        is_static: bool,
        function: Function,
    },
    Field {
        key: PropertyName,
        value: Option<Node<Expr>>,
        is_static: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Method,
    Getter,
    Setter,
    Constructor,
}

/// Object property
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectProperty {
    Property {
        key: PropertyName,
        value: Node<Expr>,
        shorthand: bool,
    },
    Method {
        key: PropertyName,
        kind: MethodKind,
        function: Function,
    },
    Spread(Node<Expr>),
}

/// Property name
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyName {
    Ident(String),
    String(String),
    Number(f64),
    Computed(Box<Node<Expr>>),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,

    // Comparison
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,
    NullishCoalesce,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    LeftShift,
    RightShift,
    UnsignedRightShift,

    // Other
    In,
    InstanceOf,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    BitNot,
    TypeOf,
    Void,
    Delete,
}

impl UnaryOp {
    /// Keyword operators need a space before their operand.
    pub fn is_keyword(&self) -> bool {
        matches!(self, UnaryOp::TypeOf | UnaryOp::Void | UnaryOp::Delete)
    }
}

/// Update operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

impl UpdateOp {
    /// Compound assignment with the same effect: `x++` is `x += 1`.
    pub fn compound_op(&self) -> AssignOp {
        match self {
            UpdateOp::Increment => AssignOp::AddAssign,
            UpdateOp::Decrement => AssignOp::SubAssign,
        }
    }

    /// Operator that recovers the previous value from the updated one.
    pub fn inverse_op(&self) -> BinaryOp {
        match self {
            UpdateOp::Increment => BinaryOp::Sub,
            UpdateOp::Decrement => BinaryOp::Add,
        }
    }
}

/// Assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    PowAssign,
    LeftShiftAssign,
    RightShiftAssign,
    UnsignedRightShiftAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    AndAssign,
    OrAssign,
    NullishAssign,
}

// Display implementations

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNotEq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::NullishCoalesce => "??",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::LeftShift => "<<",
            BinaryOp::RightShift => ">>",
            BinaryOp::UnsignedRightShift => ">>>",
            BinaryOp::In => "in",
            BinaryOp::InstanceOf => "instanceof",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::TypeOf => "typeof",
            UnaryOp::Void => "void",
            UnaryOp::Delete => "delete",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for UpdateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateOp::Increment => write!(f, "++"),
            UpdateOp::Decrement => write!(f, "--"),
        }
    }
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
            AssignOp::ModAssign => "%=",
            AssignOp::PowAssign => "**=",
            AssignOp::LeftShiftAssign => "<<=",
            AssignOp::RightShiftAssign => ">>=",
            AssignOp::UnsignedRightShiftAssign => ">>>=",
            AssignOp::BitAndAssign => "&=",
            AssignOp::BitOrAssign => "|=",
            AssignOp::BitXorAssign => "^=",
            AssignOp::AndAssign => "&&=",
            AssignOp::OrAssign => "||=",
            AssignOp::NullishAssign => "??=",
        };
        write!(f, "{}", s)
    }
}
