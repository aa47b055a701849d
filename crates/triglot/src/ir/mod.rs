//! The canonical intermediate representation.
//!
//! Every reader lowers into these types and every writer generates from
//! them. The node set is closed: adding a variant is a compile-time visible
//! change for every reader and writer.
//!
//! Builtins whose surface form has a receiver (`xs.append(v)`,
//! `xs.length`) carry that receiver as their first argument, so the IR for
//! `APPEND` is always `Call(APPEND, [collection, value])`.

mod structure_eq;
pub(crate) mod walk;

pub use structure_eq::StructureEq;

use crate::builtins::BuiltinOp;
use crate::error::Position;
use serde::{Deserialize, Serialize};

/// Root of a translation unit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Module {
    pub items: Vec<Item>,
}

impl Module {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// Iterate over top-level function definitions.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDef> {
        self.items.iter().filter_map(|item| match item {
            Item::Function(f) => Some(f),
            _ => None,
        })
    }

    /// Iterate over class definitions.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDef> {
        self.items.iter().filter_map(|item| match item {
            Item::Class(c) => Some(c),
            _ => None,
        })
    }

    /// Iterate over free top-level statements.
    pub fn statements(&self) -> impl Iterator<Item = &Stmt> {
        self.items.iter().filter_map(|item| match item {
            Item::Stmt(s) => Some(s),
            _ => None,
        })
    }

    /// Pretty JSON dump of the tree.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A top-level entry of a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Function(FunctionDef),
    Class(ClassDef),
    Stmt(Stmt),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl FunctionDef {
    pub fn new(name: impl Into<String>, params: Vec<Param>, body: Vec<Stmt>) -> Self {
        Self {
            name: name.into(),
            params,
            body,
            position: None,
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Number of parameters without a default.
    pub fn required_params(&self) -> usize {
        self.params.iter().take_while(|p| p.default.is_none()).count()
    }

    /// Whether any `return` in the body (at any depth) carries a value.
    pub fn returns_value(&self) -> bool {
        fn any(stmts: &[Stmt]) -> bool {
            stmts.iter().any(|stmt| match stmt {
                Stmt::Return(value) => value.is_some(),
                Stmt::If {
                    then_body,
                    else_body,
                    ..
                } => any(then_body) || any(else_body),
                Stmt::For { body, .. } | Stmt::ForRange { body, .. } | Stmt::While { body, .. } => {
                    any(body)
                }
                _ => false,
            })
        }
        any(&self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Expr>,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default(name: impl Into<String>, default: Expr) -> Self {
        Self {
            name: name.into(),
            default: Some(default),
        }
    }
}

/// A simple class: an optional constructor and methods, no base classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    /// Named after the class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constructor: Option<FunctionDef>,
    pub methods: Vec<FunctionDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl ClassDef {
    pub fn new(
        name: impl Into<String>,
        constructor: Option<FunctionDef>,
        methods: Vec<FunctionDef>,
    ) -> Self {
        Self {
            name: name.into(),
            constructor,
            methods,
            position: None,
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Constructor first, then methods in order.
    pub fn members(&self) -> impl Iterator<Item = &FunctionDef> {
        self.constructor.iter().chain(self.methods.iter())
    }

    /// Attribute names assigned through the receiver, in first-assignment
    /// order across all members.
    pub fn fields(&self) -> Vec<&str> {
        fn collect<'a>(stmts: &'a [Stmt], out: &mut Vec<&'a str>) {
            for stmt in stmts {
                match stmt {
                    Stmt::Assign {
                        target: AssignTarget::Attribute { object, name },
                        ..
                    } if matches!(object, Expr::SelfRef) => {
                        if !out.contains(&name.as_str()) {
                            out.push(name);
                        }
                    }
                    Stmt::If {
                        then_body,
                        else_body,
                        ..
                    } => {
                        collect(then_body, out);
                        collect(else_body, out);
                    }
                    Stmt::For { body, .. }
                    | Stmt::ForRange { body, .. }
                    | Stmt::While { body, .. } => collect(body, out),
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        for member in self.members() {
            collect(&member.body, &mut out);
        }
        out
    }
}

/// Statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    If {
        cond: Expr,
        then_body: Vec<Stmt>,
        else_body: Vec<Stmt>,
    },

    /// For-each over an iterable.
    For {
        var: String,
        iterable: Expr,
        body: Vec<Stmt>,
    },

    /// Counting loop over `start..stop`.
    ForRange {
        var: String,
        start: Expr,
        stop: Expr,
        body: Vec<Stmt>,
    },

    While {
        cond: Expr,
        body: Vec<Stmt>,
    },

    Return(Option<Expr>),

    Assign {
        target: AssignTarget,
        value: Expr,
    },

    Expr(Expr),

    Break,

    Continue,
}

impl Stmt {
    pub fn if_stmt(cond: Expr, then_body: Vec<Stmt>, else_body: Vec<Stmt>) -> Self {
        Stmt::If {
            cond,
            then_body,
            else_body,
        }
    }

    pub fn for_each(var: impl Into<String>, iterable: Expr, body: Vec<Stmt>) -> Self {
        Stmt::For {
            var: var.into(),
            iterable,
            body,
        }
    }

    pub fn for_range(var: impl Into<String>, start: Expr, stop: Expr, body: Vec<Stmt>) -> Self {
        Stmt::ForRange {
            var: var.into(),
            start,
            stop,
            body,
        }
    }

    pub fn while_loop(cond: Expr, body: Vec<Stmt>) -> Self {
        Stmt::While { cond, body }
    }

    pub fn return_stmt(value: Option<Expr>) -> Self {
        Stmt::Return(value)
    }

    pub fn assign(name: impl Into<String>, value: Expr) -> Self {
        Stmt::Assign {
            target: AssignTarget::Name(name.into()),
            value,
        }
    }

    pub fn assign_attr(object: Expr, name: impl Into<String>, value: Expr) -> Self {
        Stmt::Assign {
            target: AssignTarget::Attribute {
                object,
                name: name.into(),
            },
            value,
        }
    }

    pub fn expr(expr: Expr) -> Self {
        Stmt::Expr(expr)
    }
}

/// Left-hand side of an assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssignTarget {
    Name(String),
    Attribute { object: Expr, name: String },
}

/// Expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal(Literal),

    Name(String),

    /// The receiver inside a method (`self` / `this`).
    SelfRef,

    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    Call {
        callee: Callee,
        args: Vec<Expr>,
    },

    Attribute {
        object: Box<Expr>,
        name: String,
    },

    /// Instantiation of a class defined in the snippet.
    New {
        class: String,
        args: Vec<Expr>,
    },

    List(Vec<Expr>),

    Dict(Vec<(Expr, Expr)>),
}

impl Expr {
    pub fn string(s: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(s.into()))
    }

    pub fn int(n: i64) -> Self {
        Expr::Literal(Literal::Number(Number::Int(n)))
    }

    pub fn float(n: f64) -> Self {
        Expr::Literal(Literal::Number(Number::Float(n)))
    }

    pub fn bool(b: bool) -> Self {
        Expr::Literal(Literal::Bool(b))
    }

    pub fn null() -> Self {
        Expr::Literal(Literal::Null)
    }

    pub fn name(name: impl Into<String>) -> Self {
        Expr::Name(name.into())
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Callee::Name(name.into()),
            args,
        }
    }

    pub fn builtin(op: BuiltinOp, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Callee::Builtin(op),
            args,
        }
    }

    pub fn method(receiver: Expr, name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Callee::Method {
                receiver: Box::new(receiver),
                name: name.into(),
            },
            args,
        }
    }

    pub fn attribute(object: Expr, name: impl Into<String>) -> Self {
        Expr::Attribute {
            object: Box::new(object),
            name: name.into(),
        }
    }

    pub fn new_object(class: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::New {
            class: class.into(),
            args,
        }
    }
}

/// What a call invokes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Callee {
    /// A free-standing function, by name.
    Name(String),
    /// A canonical builtin operation.
    Builtin(BuiltinOp),
    /// A method on an object expression.
    Method { receiver: Box<Expr>, name: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    String(String),
    Number(Number),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Number {
    Int(i64),
    Float(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_params() {
        let f = FunctionDef::new(
            "add",
            vec![Param::new("a"), Param::with_default("b", Expr::int(0))],
            vec![],
        );
        assert_eq!(f.required_params(), 1);
    }

    #[test]
    fn test_returns_value_looks_into_blocks() {
        let f = FunctionDef::new(
            "f",
            vec![],
            vec![Stmt::while_loop(
                Expr::bool(true),
                vec![Stmt::return_stmt(Some(Expr::int(1)))],
            )],
        );
        assert!(f.returns_value());
        let g = FunctionDef::new("g", vec![], vec![Stmt::return_stmt(None)]);
        assert!(!g.returns_value());
    }

    #[test]
    fn test_class_fields_in_order() {
        let ctor = FunctionDef::new(
            "Point",
            vec![Param::new("x")],
            vec![Stmt::assign_attr(Expr::SelfRef, "x", Expr::name("x"))],
        );
        let method = FunctionDef::new(
            "reset",
            vec![],
            vec![
                Stmt::assign_attr(Expr::SelfRef, "y", Expr::int(0)),
                Stmt::assign_attr(Expr::SelfRef, "x", Expr::int(0)),
            ],
        );
        let class = ClassDef::new("Point", Some(ctor), vec![method]);
        assert_eq!(class.fields(), vec!["x", "y"]);
    }

    #[test]
    fn test_json_dump_tags_variants() {
        let module = Module::new(vec![Item::Stmt(Stmt::expr(Expr::builtin(
            BuiltinOp::Print,
            vec![Expr::name("x")],
        )))]);
        let json = module.to_json().unwrap();
        assert!(json.contains("\"Builtin\": \"Print\""));
    }
}
