//! Statement definitions for the AST

use super::*;
use std::fmt;

/// Statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Expression statement
    Expr(Node<Expr>),

    /// Variable, function or class declaration
    Decl(Decl),

    /// Block statement: { stmts }
    Block(BlockStmt),

    /// Return statement
    Return(Option<Node<Expr>>),

    /// If statement
    If {
        test: Node<Expr>,
        consequent: Box<Node<Stmt>>,
        alternate: Option<Box<Node<Stmt>>>,
    },

    /// For statement: for (init; test; update) body
    For {
        init: Option<ForInit>,
        test: Option<Node<Expr>>,
        update: Option<Node<Expr>>,
        body: Box<Node<Stmt>>,
    },

    /// For-in statement: for (left in right) body
    ForIn {
        left: ForHead,
        right: Node<Expr>,
        body: Box<Node<Stmt>>,
    },

    /// For-of statement: for (left of right) body
    ForOf {
        left: ForHead,
        right: Node<Expr>,
        body: Box<Node<Stmt>>,
    },

    /// While statement
    While {
        test: Node<Expr>,
        body: Box<Node<Stmt>>,
    },

    /// Do-while statement
    DoWhile {
        body: Box<Node<Stmt>>,
        test: Node<Expr>,
    },

    /// Break statement
    Break(Option<Node<Ident>>),

    /// Continue statement
    Continue(Option<Node<Ident>>),

    /// Throw statement
    Throw(Node<Expr>),

    /// Try-catch-finally statement
    Try {
        block: Node<BlockStmt>,
        handler: Option<Node<CatchClause>>,
        finalizer: Option<Node<BlockStmt>>,
    },

    /// Switch statement
    Switch {
        discriminant: Node<Expr>,
        cases: Vec<SwitchCase>,
    },

    /// Labeled statement
    Labeled {
        label: Node<Ident>,
        body: Box<Node<Stmt>>,
    },

    /// Empty statement: ;
    Empty,

    /// Debugger statement
    Debugger,
}

impl Stmt {
    /// `expr;` as a statement node spanning the expression.
    pub fn expr(expr: Node<Expr>) -> Node<Stmt> {
        let span = expr.span;
        Node::new(Stmt::Expr(expr), span)
    }
}

/// Declarations usable in statement position
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Var(VarDecl),
    Function(FnDecl),
    Class(ClassDecl),
}

impl Decl {
    /// Every identifier this declaration binds, in source order.
    pub fn bound_idents(&self) -> Vec<Node<Ident>> {
        match self {
            Decl::Var(var) => var.bound_idents(),
            Decl::Function(func) => vec![func.ident.clone()],
            Decl::Class(class) => vec![class.ident.clone()],
        }
    }
}

/// Function declaration: function name(params) { body }
#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub ident: Node<Ident>,
    pub function: Function,
}

/// Class declaration: class Name extends Base { members }
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub ident: Node<Ident>,
    pub class: Class,
}

/// Block statement
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub stmts: Vec<Node<Stmt>>,
}

/// Variable declaration
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub kind: VarDeclKind,
    pub declarations: Vec<VarDeclarator>,
}

impl VarDecl {
    pub fn bound_idents(&self) -> Vec<Node<Ident>> {
        let mut out = Vec::new();
        for declarator in &self.declarations {
            declarator.pattern.collect_bound_idents(&mut out);
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarDeclKind {
    Let,
    Const,
    Var,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    pub pattern: Node<Pattern>,
    pub init: Option<Node<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Var(VarDecl),
    Expr(Node<Expr>),
}

/// Left-hand side of for-in / for-of
#[derive(Debug, Clone, PartialEq)]
pub enum ForHead {
    Var(VarDecl),
    Pattern(Node<Pattern>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub param: Option<Node<Pattern>>,
    pub body: Node<BlockStmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub test: Option<Node<Expr>>,
    pub consequent: Vec<Node<Stmt>>,
}

/// Binding pattern for declarations and parameters
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Identifier pattern
    Ident(Ident),

    /// Array pattern: [a, , b, ...rest]
    Array {
        elements: Vec<Option<Node<Pattern>>>,
        rest: Option<Box<Node<Pattern>>>,
    },

    /// Object pattern: { a, b: c, ...rest }
    Object {
        properties: Vec<ObjectPatternProperty>,
        rest: Option<Box<Node<Pattern>>>,
    },

    /// Assignment pattern: pattern = default_value
    Assignment {
        pattern: Box<Node<Pattern>>,
        default: Box<Node<Expr>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPatternProperty {
    pub key: PropertyName,
    pub value: Node<Pattern>,
    pub shorthand: bool,
}

impl Node<Pattern> {
    pub fn ident(name: impl Into<String>, span: Span) -> Self {
        Node::new(Pattern::Ident(Ident::new(name)), span)
    }

    pub fn bound_idents(&self) -> Vec<Node<Ident>> {
        let mut out = Vec::new();
        self.collect_bound_idents(&mut out);
        out
    }

    /// Identifier patterns carry the span of the identifier itself.
    pub fn collect_bound_idents(&self, out: &mut Vec<Node<Ident>>) {
        match &self.value {
            Pattern::Ident(ident) => out.push(Node::new(ident.clone(), self.span)),
            Pattern::Array { elements, rest } => {
                for element in elements.iter().flatten() {
                    element.collect_bound_idents(out);
                }
                if let Some(rest) = rest {
                    rest.collect_bound_idents(out);
                }
            }
            Pattern::Object { properties, rest } => {
                for prop in properties {
                    prop.value.collect_bound_idents(out);
                }
                if let Some(rest) = rest {
                    rest.collect_bound_idents(out);
                }
            }
            Pattern::Assignment { pattern, .. } => pattern.collect_bound_idents(out),
        }
    }

    pub fn as_ident(&self) -> Option<&Ident> {
        match &self.value {
            Pattern::Ident(ident) => Some(ident),
            _ => None,
        }
    }
}

// Display implementations

impl fmt::Display for VarDeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarDeclKind::Let => write!(f, "let"),
            VarDeclKind::Const => write!(f, "const"),
            VarDeclKind::Var => write!(f, "var"),
        }
    }
}
