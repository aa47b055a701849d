//! Output writers - emit IR as source code.
//!
//! Writers share the builtin layout logic, literal spelling and, for the
//! C-family targets, local declaration planning.

pub mod java;
pub mod javascript;
pub mod python;

pub use java::{JAVA_WRITER, JavaWriter, JavaWriterImpl};
pub use javascript::{JAVASCRIPT_WRITER, JavaScriptWriter, JavaScriptWriterImpl};
pub use python::{PYTHON_WRITER, PythonWriter, PythonWriterImpl};

use crate::builtins::{Arity, BuiltinOp, CallShape, emission_rule};
use crate::error::GenerateError;
use crate::ir::walk::{counting_loop_is_stable, mentions_outside_loops};
use crate::ir::{AssignTarget, Expr, Item, Literal, Module, Number, Stmt};
use crate::language::Language;
use std::collections::HashSet;

/// Layout of one builtin call in one target, with its IR arguments bound.
pub(crate) enum Emission<'e> {
    /// `symbol(args)`
    Call {
        symbol: &'static str,
        args: &'e [Expr],
    },
    /// `symbol(a + " " + b)`
    JoinedCall {
        symbol: &'static str,
        args: &'e [Expr],
    },
    /// `receiver.symbol(args)`
    Method {
        receiver: &'e Expr,
        symbol: &'static str,
        args: &'e [Expr],
    },
    /// `receiver.symbol`
    Property {
        receiver: &'e Expr,
        symbol: &'static str,
    },
    /// `object[key]`
    Subscript { object: &'e Expr, key: &'e Expr },
    /// `object[key] = value`, statement position only.
    SubscriptAssign {
        object: &'e Expr,
        key: &'e Expr,
        value: &'e Expr,
    },
}

/// Bind `args` to the target's canonical surface form for `op`.
pub(crate) fn builtin_emission(
    op: BuiltinOp,
    target: Language,
    args: &[Expr],
) -> Result<Emission<'_>, GenerateError> {
    let arity_error = |expected| GenerateError::Arity {
        op,
        expected,
        found: args.len(),
    };
    if let Arity::Exactly(expected) = op.arity() {
        if args.len() != expected {
            return Err(arity_error(expected));
        }
    }

    let rule = emission_rule(op, target);
    let symbol = rule.symbol;
    Ok(match (rule.shape, args) {
        (CallShape::FreeCall, args) if rule.joins_args => Emission::JoinedCall { symbol, args },
        (CallShape::FreeCall, args) => Emission::Call { symbol, args },
        (CallShape::MethodCall, [receiver, args @ ..]) => Emission::Method {
            receiver,
            symbol,
            args,
        },
        (CallShape::PropertyAccess, [receiver]) => Emission::Property { receiver, symbol },
        (CallShape::Subscript, [object, key]) => Emission::Subscript { object, key },
        (CallShape::SubscriptAssign, [object, key, value]) => {
            Emission::SubscriptAssign { object, key, value }
        }
        (CallShape::MethodCall | CallShape::PropertyAccess, _) => return Err(arity_error(1)),
        (CallShape::Subscript, _) => return Err(arity_error(2)),
        (CallShape::SubscriptAssign, _) => return Err(arity_error(3)),
    })
}

/// Double-quoted string body for `target`.
pub(crate) fn escape_string(s: &str, target: Language) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // Java rewrites \u escapes before lexing, so use octal there
            c if c.is_control() && target == Language::Java && (c as u32) < 0o400 => {
                out.push_str(&format!("\\{:03o}", c as u32));
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Numeric literal spelling for `target`.
pub(crate) fn format_number(number: Number, target: Language) -> Result<String, GenerateError> {
    match number {
        Number::Int(n) if target == Language::Java && i32::try_from(n).is_err() => Ok(format!("{n}L")),
        Number::Int(n) => Ok(n.to_string()),
        Number::Float(f) if !f.is_finite() => Err(GenerateError::InvalidLiteral {
            text: f.to_string(),
            target,
        }),
        Number::Float(f) => Ok(format!("{f:?}")),
    }
}

/// Whether `expr` is a negative numeric literal (renders with a leading `-`).
pub(crate) fn is_negative_literal(expr: &Expr) -> bool {
    match expr {
        Expr::Literal(Literal::Number(Number::Int(n))) => *n < 0,
        Expr::Literal(Literal::Number(Number::Float(f))) => f.is_sign_negative(),
        _ => false,
    }
}

const PYTHON_RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

const JAVASCRIPT_RESERVED: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

const JAVA_RESERVED: &[&str] = &[
    "_", "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
    "const", "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "void", "volatile", "while",
];

/// Reject names that are keywords in `target`.
pub(crate) fn check_identifier(name: &str, target: Language) -> Result<(), GenerateError> {
    let reserved = match target {
        Language::Python => PYTHON_RESERVED,
        Language::JavaScript => JAVASCRIPT_RESERVED,
        Language::Java => JAVA_RESERVED,
    };
    if reserved.contains(&name) {
        return Err(GenerateError::Unrepresentable {
            what: format!("the reserved word `{name}` as an identifier"),
            target,
        });
    }
    Ok(())
}

/// Binding strength shared by JavaScript and Java.
pub(crate) mod c_family {
    use crate::ir::{BinaryOp, Expr, UnaryOp};

    pub const UNARY: u8 = 7;
    pub const PRIMARY: u8 = 8;

    pub fn binary(op: BinaryOp) -> u8 {
        match op {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq | BinaryOp::Ne => 3,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 4,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 6,
        }
    }

    pub fn of(expr: &Expr) -> u8 {
        match expr {
            Expr::Binary { op, .. } => binary(*op),
            Expr::Unary {
                op: UnaryOp::Neg | UnaryOp::Not,
                ..
            } => UNARY,
            expr if super::is_negative_literal(expr) => UNARY,
            _ => PRIMARY,
        }
    }
}

/// Where locals get declared in a C-family function body.
///
/// A name first assigned at the top level of the body is declared at that
/// assignment; a name first assigned inside a nested block is declared
/// before the body so it stays visible afterwards.
///
/// A loop variable normally lives in the loop header. When the scope also
/// touches it outside its loops it is declared like any other local and
/// the loop assigns it from a separate counter, so it keeps the last value
/// the loop produced.
#[derive(Debug, Default)]
pub(crate) struct Declarations {
    inline: HashSet<String>,
    pub hoisted: Vec<String>,
    shared: HashSet<String>,
    bound: HashSet<String>,
}

impl Declarations {
    pub fn plan<'s>(stmts: impl IntoIterator<Item = &'s Stmt>, params: &[&str]) -> Self {
        Self::plan_with_readers(stmts, params, &[])
    }

    /// Module scope, where functions and methods may read top-level names.
    pub fn plan_module(module: &Module) -> Self {
        let readers: Vec<&[Stmt]> = module
            .items
            .iter()
            .flat_map(|item| match item {
                Item::Function(f) => vec![f.body.as_slice()],
                Item::Class(c) => c.members().map(|m| m.body.as_slice()).collect(),
                Item::Stmt(_) => Vec::new(),
            })
            .collect();
        Self::plan_with_readers(module.statements(), &[], &readers)
    }

    fn plan_with_readers<'s>(
        stmts: impl IntoIterator<Item = &'s Stmt>,
        params: &[&str],
        readers: &[&[Stmt]],
    ) -> Self {
        let stmts: Vec<&Stmt> = stmts.into_iter().collect();
        let mut plan = Declarations::default();

        let mut loop_vars = HashSet::new();
        for stmt in &stmts {
            collect_loop_vars(stmt, &mut loop_vars);
        }
        for var in loop_vars {
            let touched = params.contains(&var.as_str())
                || stmts
                    .iter()
                    .any(|stmt| mentions_outside_loops(std::slice::from_ref(*stmt), &var))
                || readers.iter().any(|body| mentions_outside_loops(body, &var));
            if touched {
                plan.shared.insert(var);
            }
        }

        let mut seen: HashSet<String> = params.iter().map(|p| p.to_string()).collect();
        plan.bound = seen.clone();
        for stmt in &stmts {
            plan.visit(stmt, 0, &mut seen);
        }
        plan
    }

    fn visit(&mut self, stmt: &Stmt, depth: usize, seen: &mut HashSet<String>) {
        match stmt {
            Stmt::Assign {
                target: AssignTarget::Name(name),
                ..
            } => {
                self.bound.insert(name.clone());
                if seen.insert(name.clone()) {
                    if depth == 0 {
                        self.inline.insert(name.clone());
                    } else {
                        self.hoisted.push(name.clone());
                    }
                }
            }
            Stmt::If {
                then_body,
                else_body,
                ..
            } => {
                for stmt in then_body.iter().chain(else_body) {
                    self.visit(stmt, depth + 1, seen);
                }
            }
            Stmt::While { body, .. } => {
                for stmt in body {
                    self.visit(stmt, depth + 1, seen);
                }
            }
            Stmt::For { var, body, .. } | Stmt::ForRange { var, body, .. } => {
                self.bound.insert(var.clone());
                if self.shared.contains(var) {
                    if seen.insert(var.clone()) {
                        self.hoisted.push(var.clone());
                    }
                    for stmt in body {
                        self.visit(stmt, depth + 1, seen);
                    }
                    return;
                }
                // The loop header declares its own variable.
                let fresh = seen.insert(var.clone());
                for stmt in body {
                    self.visit(stmt, depth + 1, seen);
                }
                if fresh {
                    seen.remove(var);
                }
            }
            _ => {}
        }
    }

    /// Whether the assignment to `name` at the top level declares it.
    pub fn declares_inline(&self, name: &str) -> bool {
        self.inline.contains(name)
    }

    /// Whether the loop variable `name` is a scope local rather than a
    /// header binding.
    pub fn is_shared_loop_var(&self, name: &str) -> bool {
        self.shared.contains(name)
    }

    /// A counter name for a loop over the shared variable `var`. `$` never
    /// appears in Python names, so clashes only come from C-family sources.
    pub fn counter_for(&self, var: &str) -> String {
        let mut name = format!("{var}$");
        while self.bound.contains(&name) {
            name.push('$');
        }
        name
    }
}

fn collect_loop_vars(stmt: &Stmt, out: &mut HashSet<String>) {
    match stmt {
        Stmt::For { var, body, .. } | Stmt::ForRange { var, body, .. } => {
            out.insert(var.clone());
            for stmt in body {
                collect_loop_vars(stmt, out);
            }
        }
        Stmt::If {
            then_body,
            else_body,
            ..
        } => {
            for stmt in then_body.iter().chain(else_body) {
                collect_loop_vars(stmt, out);
            }
        }
        Stmt::While { body, .. } => {
            for stmt in body {
                collect_loop_vars(stmt, out);
            }
        }
        _ => {}
    }
}

/// `for (...) { var = counter; body }`: the loop body with the shared
/// variable assigned from the header's counter.
pub(crate) fn counter_body(var: &str, counter: &str, body: &[Stmt]) -> Vec<Stmt> {
    std::iter::once(Stmt::assign(var, Expr::name(counter)))
        .chain(body.iter().cloned())
        .collect()
}

/// Reject counting loops that a C-style `for` would run differently.
pub(crate) fn check_counting_loop(
    var: &str,
    stop: &Expr,
    body: &[Stmt],
    target: Language,
) -> Result<(), GenerateError> {
    if counting_loop_is_stable(var, stop, body) {
        return Ok(());
    }
    Err(GenerateError::Unrepresentable {
        what: format!("a counting loop over `{var}` whose body changes its counter or bound"),
        target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::BinaryOp;

    #[test]
    fn test_builtin_emission_checks_arity() {
        let args = [Expr::name("xs")];
        let err = builtin_emission(BuiltinOp::Append, Language::Python, &args)
            .err()
            .unwrap();
        assert_eq!(
            err,
            GenerateError::Arity {
                op: BuiltinOp::Append,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_builtin_emission_binds_receiver() {
        let args = [Expr::name("xs"), Expr::int(1)];
        match builtin_emission(BuiltinOp::Append, Language::JavaScript, &args).unwrap() {
            Emission::Method {
                receiver,
                symbol,
                args,
            } => {
                assert_eq!(*receiver, Expr::name("xs"));
                assert_eq!(symbol, "push");
                assert_eq!(args, &[Expr::int(1)]);
            }
            _ => panic!("expected method emission"),
        }
    }

    #[test]
    fn test_escape_string_per_target() {
        assert_eq!(escape_string("a\"b\n", Language::Python), "a\\\"b\\n");
        assert_eq!(escape_string("\u{1}", Language::JavaScript), "\\u0001");
        assert_eq!(escape_string("\u{1}2", Language::Java), "\\0012");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(Number::Float(1.0), Language::Python).unwrap(), "1.0");
        assert_eq!(format_number(Number::Int(1 << 40), Language::Java).unwrap(), "1099511627776L");
        assert_eq!(format_number(Number::Int(7), Language::Java).unwrap(), "7");
        assert!(format_number(Number::Float(f64::NAN), Language::JavaScript).is_err());
    }

    #[test]
    fn test_reserved_words() {
        assert!(check_identifier("lambda", Language::Python).is_err());
        assert!(check_identifier("lambda", Language::JavaScript).is_ok());
        assert!(check_identifier("function", Language::JavaScript).is_err());
        assert!(check_identifier("int", Language::Java).is_err());
    }

    #[test]
    fn test_declaration_plan() {
        let body = vec![
            Stmt::assign("a", Expr::int(1)),
            Stmt::if_stmt(
                Expr::name("c"),
                vec![Stmt::assign("b", Expr::int(2)), Stmt::assign("a", Expr::int(3))],
                vec![],
            ),
            Stmt::for_range(
                "i",
                Expr::int(0),
                Expr::int(3),
                vec![Stmt::assign("i", Expr::binary(Expr::name("i"), BinaryOp::Add, Expr::int(1)))],
            ),
            Stmt::assign("p", Expr::int(0)),
        ];
        let plan = Declarations::plan(&body, &["p"]);
        assert!(plan.declares_inline("a"));
        assert!(!plan.declares_inline("p"));
        assert_eq!(plan.hoisted, vec!["b".to_string()]);
    }
}
