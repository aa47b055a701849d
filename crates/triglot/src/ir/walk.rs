//! Read-only queries over statement and expression trees.

use super::{AssignTarget, Callee, Expr, FunctionDef, Item, Module, Stmt};
use crate::builtins::BuiltinOp;

/// Whether any statement in `stmts` (at any depth) assigns `name`.
pub(crate) fn assigns_name(stmts: &[Stmt], name: &str) -> bool {
    stmts.iter().any(|stmt| match stmt {
        Stmt::Assign {
            target: AssignTarget::Name(target),
            ..
        } => target == name,
        Stmt::If {
            then_body,
            else_body,
            ..
        } => assigns_name(then_body, name) || assigns_name(else_body, name),
        Stmt::For { var, body, .. } | Stmt::ForRange { var, body, .. } => {
            var == name || assigns_name(body, name)
        }
        Stmt::While { body, .. } => assigns_name(body, name),
        _ => false,
    })
}

/// Whether `name` is read or assigned anywhere in `stmts` once every loop
/// that rebinds it is reduced to its header expressions.
pub(crate) fn mentions_outside_loops(stmts: &[Stmt], name: &str) -> bool {
    let is_name = |e: &Expr| matches!(e, Expr::Name(n) if n == name);
    stmts.iter().any(|stmt| match stmt {
        Stmt::For {
            var,
            iterable,
            body,
        } => expr_any(iterable, &is_name) || (var != name && mentions_outside_loops(body, name)),
        Stmt::ForRange {
            var,
            start,
            stop,
            body,
        } => {
            expr_any(start, &is_name)
                || expr_any(stop, &is_name)
                || (var != name && mentions_outside_loops(body, name))
        }
        Stmt::If {
            cond,
            then_body,
            else_body,
        } => {
            expr_any(cond, &is_name)
                || mentions_outside_loops(then_body, name)
                || mentions_outside_loops(else_body, name)
        }
        Stmt::While { cond, body } => expr_any(cond, &is_name) || mentions_outside_loops(body, name),
        Stmt::Assign {
            target: AssignTarget::Name(target),
            value,
        } => target == name || expr_any(value, &is_name),
        other => stmts_any_expr(std::slice::from_ref(other), &is_name),
    })
}

/// Whether a counting loop means the same thing as a Python `range` loop
/// and as a C-style `for`: the body never rebinds the counter and the bound
/// cannot change while the loop runs.
pub(crate) fn counting_loop_is_stable(var: &str, stop: &Expr, body: &[Stmt]) -> bool {
    !assigns_name(body, var) && is_loop_invariant(stop, var, body)
}

fn is_loop_invariant(expr: &Expr, var: &str, body: &[Stmt]) -> bool {
    match expr {
        Expr::Literal(_) => true,
        Expr::Name(name) => name != var && !assigns_name(body, name),
        Expr::Attribute { object, name } if matches!(**object, Expr::SelfRef) => {
            !assigns_self_attr(body, name) && !calls_user_code(body)
        }
        Expr::Unary { operand, .. } => is_loop_invariant(operand, var, body),
        Expr::Binary { left, right, .. } => {
            is_loop_invariant(left, var, body) && is_loop_invariant(right, var, body)
        }
        Expr::Call {
            callee: Callee::Builtin(BuiltinOp::Len),
            args,
        } => match args.as_slice() {
            [collection @ (Expr::Name(_) | Expr::Attribute { .. })] => {
                is_loop_invariant(collection, var, body) && !mutates(body, collection)
            }
            _ => false,
        },
        _ => false,
    }
}

/// Whether a call in `body` could change the length of `collection`: an
/// append to it, a method on it, or handing it to user code. Subscript
/// assignment inside a counting loop rewrites existing slots.
fn mutates(body: &[Stmt], collection: &Expr) -> bool {
    stmts_any_expr(body, &|expr| match expr {
        Expr::Call {
            callee: Callee::Builtin(BuiltinOp::Append),
            args,
        } => args.first() == Some(collection),
        Expr::Call {
            callee: Callee::Builtin(_),
            ..
        } => false,
        Expr::Call { callee, args } => {
            matches!(callee, Callee::Method { receiver, .. } if **receiver == *collection)
                || args.contains(collection)
        }
        Expr::New { args, .. } => args.contains(collection),
        _ => false,
    })
}

fn assigns_self_attr(stmts: &[Stmt], name: &str) -> bool {
    stmts.iter().any(|stmt| match stmt {
        Stmt::Assign {
            target: AssignTarget::Attribute { object, name: attr },
            ..
        } => attr == name && matches!(object, Expr::SelfRef),
        Stmt::If {
            then_body,
            else_body,
            ..
        } => assigns_self_attr(then_body, name) || assigns_self_attr(else_body, name),
        Stmt::For { body, .. } | Stmt::ForRange { body, .. } | Stmt::While { body, .. } => {
            assigns_self_attr(body, name)
        }
        _ => false,
    })
}

/// Methods and free functions may assign receiver fields.
fn calls_user_code(body: &[Stmt]) -> bool {
    stmts_any_expr(body, &|expr| {
        matches!(
            expr,
            Expr::Call {
                callee: Callee::Name(_) | Callee::Method { .. },
                ..
            }
        )
    })
}

/// Whether `pred` holds for any expression in the module.
pub(crate) fn module_any_expr(module: &Module, pred: &impl Fn(&Expr) -> bool) -> bool {
    let function_any = |f: &FunctionDef| {
        f.params
            .iter()
            .filter_map(|p| p.default.as_ref())
            .any(|d| expr_any(d, pred))
            || stmts_any_expr(&f.body, pred)
    };
    module.items.iter().any(|item| match item {
        Item::Function(f) => function_any(f),
        Item::Class(c) => c.members().any(&function_any),
        Item::Stmt(s) => stmts_any_expr(std::slice::from_ref(s), pred),
    })
}

pub(crate) fn stmts_any_expr(stmts: &[Stmt], pred: &impl Fn(&Expr) -> bool) -> bool {
    stmts.iter().any(|stmt| match stmt {
        Stmt::If {
            cond,
            then_body,
            else_body,
        } => expr_any(cond, pred) || stmts_any_expr(then_body, pred) || stmts_any_expr(else_body, pred),
        Stmt::For { iterable, body, .. } => expr_any(iterable, pred) || stmts_any_expr(body, pred),
        Stmt::ForRange {
            start, stop, body, ..
        } => expr_any(start, pred) || expr_any(stop, pred) || stmts_any_expr(body, pred),
        Stmt::While { cond, body } => expr_any(cond, pred) || stmts_any_expr(body, pred),
        Stmt::Return(value) => value.as_ref().is_some_and(|v| expr_any(v, pred)),
        Stmt::Assign { target, value } => {
            expr_any(value, pred)
                || matches!(target, AssignTarget::Attribute { object, .. } if expr_any(object, pred))
        }
        Stmt::Expr(expr) => expr_any(expr, pred),
        Stmt::Break | Stmt::Continue => false,
    })
}

pub(crate) fn expr_any(expr: &Expr, pred: &impl Fn(&Expr) -> bool) -> bool {
    if pred(expr) {
        return true;
    }
    match expr {
        Expr::Literal(_) | Expr::Name(_) | Expr::SelfRef => false,
        Expr::Binary { left, right, .. } => expr_any(left, pred) || expr_any(right, pred),
        Expr::Unary { operand, .. } => expr_any(operand, pred),
        Expr::Call { callee, args } => {
            matches!(callee, Callee::Method { receiver, .. } if expr_any(receiver, pred))
                || args.iter().any(|a| expr_any(a, pred))
        }
        Expr::Attribute { object, .. } => expr_any(object, pred),
        Expr::New { args, .. } | Expr::List(args) => args.iter().any(|a| expr_any(a, pred)),
        Expr::Dict(entries) => entries
            .iter()
            .any(|(k, v)| expr_any(k, pred) || expr_any(v, pred)),
    }
}
