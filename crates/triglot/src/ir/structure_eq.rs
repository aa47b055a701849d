//! Structural equality for IR types.
//!
//! `structure_eq` compares IR trees ignoring source position metadata, which
//! differs between a snippet and its translation even when the trees agree.
//!
//! # Ignored Fields
//!
//! - `FunctionDef::position`
//! - `ClassDef::position`
//!
//! # Core Fields (must match exactly)
//!
//! - All names, literal values, operators, builtins
//! - Variant shape of every statement and expression

use super::{AssignTarget, Callee, ClassDef, Expr, FunctionDef, Item, Module, Param, Stmt};

/// Trait for structural equality comparison.
///
/// Unlike `PartialEq`, this ignores position metadata.
pub trait StructureEq {
    /// Compare two values for structural equality.
    fn structure_eq(&self, other: &Self) -> bool;
}

impl StructureEq for Module {
    fn structure_eq(&self, other: &Self) -> bool {
        vec_structure_eq(&self.items, &other.items)
    }
}

impl StructureEq for Item {
    fn structure_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Item::Function(a), Item::Function(b)) => a.structure_eq(b),
            (Item::Class(a), Item::Class(b)) => a.structure_eq(b),
            (Item::Stmt(a), Item::Stmt(b)) => a.structure_eq(b),
            _ => false,
        }
    }
}

// Ignore `position`
impl StructureEq for FunctionDef {
    fn structure_eq(&self, other: &Self) -> bool {
        self.name == other.name
            && vec_structure_eq(&self.params, &other.params)
            && vec_structure_eq(&self.body, &other.body)
    }
}

impl StructureEq for Param {
    fn structure_eq(&self, other: &Self) -> bool {
        self.name == other.name && option_structure_eq(self.default.as_ref(), other.default.as_ref())
    }
}

impl StructureEq for ClassDef {
    fn structure_eq(&self, other: &Self) -> bool {
        self.name == other.name
            && option_structure_eq(self.constructor.as_ref(), other.constructor.as_ref())
            && vec_structure_eq(&self.methods, &other.methods)
    }
}

impl StructureEq for Stmt {
    fn structure_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Stmt::If {
                    cond: c1,
                    then_body: t1,
                    else_body: e1,
                },
                Stmt::If {
                    cond: c2,
                    then_body: t2,
                    else_body: e2,
                },
            ) => c1.structure_eq(c2) && vec_structure_eq(t1, t2) && vec_structure_eq(e1, e2),

            (
                Stmt::For {
                    var: v1,
                    iterable: i1,
                    body: b1,
                },
                Stmt::For {
                    var: v2,
                    iterable: i2,
                    body: b2,
                },
            ) => v1 == v2 && i1.structure_eq(i2) && vec_structure_eq(b1, b2),

            (
                Stmt::ForRange {
                    var: v1,
                    start: s1,
                    stop: e1,
                    body: b1,
                },
                Stmt::ForRange {
                    var: v2,
                    start: s2,
                    stop: e2,
                    body: b2,
                },
            ) => {
                v1 == v2 && s1.structure_eq(s2) && e1.structure_eq(e2) && vec_structure_eq(b1, b2)
            }

            (Stmt::While { cond: c1, body: b1 }, Stmt::While { cond: c2, body: b2 }) => {
                c1.structure_eq(c2) && vec_structure_eq(b1, b2)
            }

            (Stmt::Return(a), Stmt::Return(b)) => option_structure_eq(a.as_ref(), b.as_ref()),

            (
                Stmt::Assign {
                    target: t1,
                    value: v1,
                },
                Stmt::Assign {
                    target: t2,
                    value: v2,
                },
            ) => t1.structure_eq(t2) && v1.structure_eq(v2),

            (Stmt::Expr(a), Stmt::Expr(b)) => a.structure_eq(b),
            (Stmt::Break, Stmt::Break) => true,
            (Stmt::Continue, Stmt::Continue) => true,

            _ => false,
        }
    }
}

impl StructureEq for AssignTarget {
    fn structure_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AssignTarget::Name(a), AssignTarget::Name(b)) => a == b,
            (
                AssignTarget::Attribute {
                    object: o1,
                    name: n1,
                },
                AssignTarget::Attribute {
                    object: o2,
                    name: n2,
                },
            ) => n1 == n2 && o1.structure_eq(o2),
            _ => false,
        }
    }
}

impl StructureEq for Expr {
    fn structure_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expr::Literal(a), Expr::Literal(b)) => a == b,
            (Expr::Name(a), Expr::Name(b)) => a == b,
            (Expr::SelfRef, Expr::SelfRef) => true,

            (
                Expr::Binary {
                    op: o1,
                    left: l1,
                    right: r1,
                },
                Expr::Binary {
                    op: o2,
                    left: l2,
                    right: r2,
                },
            ) => o1 == o2 && l1.structure_eq(l2) && r1.structure_eq(r2),

            (
                Expr::Unary {
                    op: o1,
                    operand: e1,
                },
                Expr::Unary {
                    op: o2,
                    operand: e2,
                },
            ) => o1 == o2 && e1.structure_eq(e2),

            (
                Expr::Call {
                    callee: c1,
                    args: a1,
                },
                Expr::Call {
                    callee: c2,
                    args: a2,
                },
            ) => c1.structure_eq(c2) && vec_structure_eq(a1, a2),

            (
                Expr::Attribute {
                    object: o1,
                    name: n1,
                },
                Expr::Attribute {
                    object: o2,
                    name: n2,
                },
            ) => n1 == n2 && o1.structure_eq(o2),

            (
                Expr::New {
                    class: c1,
                    args: a1,
                },
                Expr::New {
                    class: c2,
                    args: a2,
                },
            ) => c1 == c2 && vec_structure_eq(a1, a2),

            (Expr::List(a), Expr::List(b)) => vec_structure_eq(a, b),

            (Expr::Dict(a), Expr::Dict(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|((k1, v1), (k2, v2))| k1.structure_eq(k2) && v1.structure_eq(v2))
            }

            _ => false,
        }
    }
}

impl StructureEq for Callee {
    fn structure_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callee::Name(a), Callee::Name(b)) => a == b,
            (Callee::Builtin(a), Callee::Builtin(b)) => a == b,
            (
                Callee::Method {
                    receiver: r1,
                    name: n1,
                },
                Callee::Method {
                    receiver: r2,
                    name: n2,
                },
            ) => n1 == n2 && r1.structure_eq(r2),
            _ => false,
        }
    }
}

// Helper functions

fn vec_structure_eq<T: StructureEq>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structure_eq(y))
}

fn option_structure_eq<T: StructureEq>(a: Option<&T>, b: Option<&T>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => x.structure_eq(y),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Position;

    #[test]
    fn test_position_is_ignored() {
        let a = FunctionDef::new("f", vec![], vec![Stmt::return_stmt(None)]).at(Position::new(1, 1));
        let b = FunctionDef::new("f", vec![], vec![Stmt::return_stmt(None)]).at(Position::new(7, 5));

        assert!(a.structure_eq(&b));
        assert_ne!(a, b); // Regular equality still differs
    }

    #[test]
    fn test_different_literals_not_equal() {
        let one = Stmt::assign("x", Expr::int(1));
        let float_one = Stmt::assign("x", Expr::float(1.0));

        assert!(!one.structure_eq(&float_one));
    }

    #[test]
    fn test_default_values_compared() {
        let a = Param::with_default("b", Expr::int(0));
        let b = Param::with_default("b", Expr::int(1));
        let c = Param::new("b");

        assert!(!a.structure_eq(&b));
        assert!(!a.structure_eq(&c));
    }

    #[test]
    fn test_module_equality() {
        let m1 = Module::new(vec![Item::Stmt(Stmt::assign("x", Expr::int(1)))]);
        let m2 = Module::new(vec![Item::Stmt(Stmt::assign("x", Expr::int(1)))]);
        let m3 = Module::new(vec![]);

        assert!(m1.structure_eq(&m2));
        assert!(!m1.structure_eq(&m3));
    }
}
