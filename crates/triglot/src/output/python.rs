//! Python writer for the IR.
//!
//! Emits IR as Python source code.

use super::{Emission, builtin_emission, check_identifier, escape_string, format_number};
use crate::builtins::BuiltinOp;
use crate::error::GenerateError;
use crate::ir::*;
use crate::language::Language;
use crate::traits::{WriteOptions, Writer};

/// Static instance of the Python writer for registry.
pub static PYTHON_WRITER: PythonWriterImpl = PythonWriterImpl;

/// Python writer implementing the Writer trait.
pub struct PythonWriterImpl;

impl Writer for PythonWriterImpl {
    fn language(&self) -> Language {
        Language::Python
    }

    fn write(&self, module: &Module, _options: &WriteOptions) -> Result<String, GenerateError> {
        PythonWriter::emit(module)
    }
}

const TARGET: Language = Language::Python;

// Binding strength, loosest first.
const OR: u8 = 1;
const AND: u8 = 2;
const NOT: u8 = 3;
const COMPARISON: u8 = 4;
const ADDITIVE: u8 = 5;
const MULTIPLICATIVE: u8 = 6;
const NEGATION: u8 = 7;
const PRIMARY: u8 = 8;

fn binary_precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Or => OR,
        BinaryOp::And => AND,
        BinaryOp::Add | BinaryOp::Sub => ADDITIVE,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => MULTIPLICATIVE,
        _ => COMPARISON,
    }
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Binary { op, .. } => binary_precedence(*op),
        Expr::Unary {
            op: UnaryOp::Not, ..
        } => NOT,
        Expr::Unary {
            op: UnaryOp::Neg, ..
        } => NEGATION,
        expr if super::is_negative_literal(expr) => NEGATION,
        _ => PRIMARY,
    }
}

/// Emits IR as Python source code.
pub struct PythonWriter {
    output: String,
    indent: usize,
    in_method: bool,
}

impl PythonWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
            in_method: false,
        }
    }

    /// Emit a module to Python source.
    pub fn emit(module: &Module) -> Result<String, GenerateError> {
        let mut writer = Self::new();
        writer.write_module(module)?;
        Ok(writer.output)
    }

    fn write_module(&mut self, module: &Module) -> Result<(), GenerateError> {
        let mut previous_was_definition = false;
        for (index, item) in module.items.iter().enumerate() {
            let is_definition = !matches!(item, Item::Stmt(_));
            if index > 0 && (is_definition || previous_was_definition) {
                self.output.push('\n');
            }
            match item {
                Item::Function(f) => self.write_function(f, "")?,
                Item::Class(c) => self.write_class(c)?,
                Item::Stmt(s) => self.write_stmt(s)?,
            }
            previous_was_definition = is_definition;
        }
        Ok(())
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
    }

    fn write_name(&mut self, name: &str) -> Result<(), GenerateError> {
        check_identifier(name, TARGET)?;
        self.output.push_str(name);
        Ok(())
    }

    /// `def name(receiver, params):` followed by the body. `receiver` is
    /// empty for free functions.
    fn write_function(&mut self, f: &FunctionDef, receiver: &str) -> Result<(), GenerateError> {
        self.write_indent();
        self.output.push_str("def ");
        self.write_name(&f.name)?;
        self.output.push('(');
        let mut first = true;
        if !receiver.is_empty() {
            self.output.push_str(receiver);
            first = false;
        }
        for param in &f.params {
            if !first {
                self.output.push_str(", ");
            }
            first = false;
            self.write_name(&param.name)?;
            if let Some(default) = &param.default {
                self.output.push('=');
                self.write_expr(default, 0)?;
            }
        }
        self.output.push_str("):\n");

        let was_in_method = std::mem::replace(&mut self.in_method, !receiver.is_empty());
        self.write_body(&f.body)?;
        self.in_method = was_in_method;
        Ok(())
    }

    fn write_class(&mut self, class: &ClassDef) -> Result<(), GenerateError> {
        self.write_indent();
        self.output.push_str("class ");
        self.write_name(&class.name)?;
        self.output.push_str(":\n");
        self.indent += 1;

        if class.constructor.is_none() && class.methods.is_empty() {
            self.write_indent();
            self.output.push_str("pass\n");
        }
        if let Some(ctor) = &class.constructor {
            if ctor.returns_value() {
                return Err(GenerateError::Unrepresentable {
                    what: "a constructor that returns a value".into(),
                    target: TARGET,
                });
            }
            let init = FunctionDef {
                name: "__init__".into(),
                ..ctor.clone()
            };
            self.write_function(&init, "self")?;
        }
        for (index, method) in class.methods.iter().enumerate() {
            if index > 0 || class.constructor.is_some() {
                self.output.push('\n');
            }
            self.write_function(method, "self")?;
        }

        self.indent -= 1;
        Ok(())
    }

    fn write_body(&mut self, stmts: &[Stmt]) -> Result<(), GenerateError> {
        self.indent += 1;
        if stmts.is_empty() {
            self.write_indent();
            self.output.push_str("pass\n");
        }
        for stmt in stmts {
            self.write_stmt(stmt)?;
        }
        self.indent -= 1;
        Ok(())
    }

    fn write_stmt(&mut self, stmt: &Stmt) -> Result<(), GenerateError> {
        self.write_indent();
        match stmt {
            Stmt::Expr(Expr::Call {
                callee: Callee::Builtin(op),
                args,
            }) => match builtin_emission(*op, TARGET, args)? {
                Emission::SubscriptAssign { object, key, value } => {
                    self.write_expr(object, PRIMARY)?;
                    self.output.push('[');
                    self.write_expr(key, 0)?;
                    self.output.push_str("] = ");
                    self.write_expr(value, 0)?;
                }
                emission => self.write_emission(emission, *op)?,
            },
            Stmt::Expr(expr) => self.write_expr(expr, 0)?,

            Stmt::Assign { target, value } => {
                match target {
                    AssignTarget::Name(name) => self.write_name(name)?,
                    AssignTarget::Attribute { object, name } => {
                        self.write_expr(object, PRIMARY)?;
                        self.output.push('.');
                        self.write_name(name)?;
                    }
                }
                self.output.push_str(" = ");
                self.write_expr(value, 0)?;
            }

            Stmt::If {
                cond,
                then_body,
                else_body,
            } => {
                self.output.push_str("if ");
                self.write_expr(cond, 0)?;
                self.output.push_str(":\n");
                self.write_body(then_body)?;

                // Fold `else: if` into `elif`
                let mut rest = else_body.as_slice();
                loop {
                    match rest {
                        [] => break,
                        [
                            Stmt::If {
                                cond,
                                then_body,
                                else_body,
                            },
                        ] => {
                            self.write_indent();
                            self.output.push_str("elif ");
                            self.write_expr(cond, 0)?;
                            self.output.push_str(":\n");
                            self.write_body(then_body)?;
                            rest = else_body.as_slice();
                        }
                        other => {
                            self.write_indent();
                            self.output.push_str("else:\n");
                            self.write_body(other)?;
                            break;
                        }
                    }
                }
                return Ok(());
            }

            Stmt::For {
                var,
                iterable,
                body,
            } => {
                self.output.push_str("for ");
                self.write_name(var)?;
                self.output.push_str(" in ");
                self.write_expr(iterable, 0)?;
                self.output.push_str(":\n");
                self.write_body(body)?;
                return Ok(());
            }

            Stmt::ForRange {
                var,
                start,
                stop,
                body,
            } => {
                self.output.push_str("for ");
                self.write_name(var)?;
                self.output.push_str(" in range(");
                if *start != Expr::int(0) {
                    self.write_expr(start, 0)?;
                    self.output.push_str(", ");
                }
                self.write_expr(stop, 0)?;
                self.output.push_str("):\n");
                self.write_body(body)?;
                return Ok(());
            }

            Stmt::While { cond, body } => {
                self.output.push_str("while ");
                self.write_expr(cond, 0)?;
                self.output.push_str(":\n");
                self.write_body(body)?;
                return Ok(());
            }

            Stmt::Return(value) => {
                self.output.push_str("return");
                if let Some(value) = value {
                    self.output.push(' ');
                    self.write_expr(value, 0)?;
                }
            }

            Stmt::Break => self.output.push_str("break"),
            Stmt::Continue => self.output.push_str("continue"),
        }
        self.output.push('\n');
        Ok(())
    }

    fn write_expr(&mut self, expr: &Expr, min_precedence: u8) -> Result<(), GenerateError> {
        let own = precedence(expr);
        let parens = own < min_precedence;
        if parens {
            self.output.push('(');
        }

        match expr {
            Expr::Literal(lit) => self.write_literal(lit)?,
            Expr::Name(name) => self.write_name(name)?,
            Expr::SelfRef => {
                if !self.in_method {
                    return Err(GenerateError::Unrepresentable {
                        what: "a receiver reference outside a method".into(),
                        target: TARGET,
                    });
                }
                self.output.push_str("self");
            }

            Expr::Binary { op, left, right } => {
                // Comparisons do not chain in the IR; parenthesize both sides
                let left_min = if op.is_comparison() { own + 1 } else { own };
                self.write_expr(left, left_min)?;
                self.output.push(' ');
                self.output.push_str(binary_symbol(*op));
                self.output.push(' ');
                self.write_expr(right, own + 1)?;
            }

            Expr::Unary { op, operand } => match op {
                UnaryOp::Not => {
                    self.output.push_str("not ");
                    self.write_expr(operand, NOT)?;
                }
                UnaryOp::Neg => {
                    self.output.push('-');
                    self.write_expr(operand, NEGATION)?;
                }
            },

            Expr::Call { callee, args } => match callee {
                Callee::Name(name) => {
                    self.write_name(name)?;
                    self.write_args(args)?;
                }
                Callee::Builtin(op) => {
                    let emission = builtin_emission(*op, TARGET, args)?;
                    self.write_emission(emission, *op)?;
                }
                Callee::Method { receiver, name } => {
                    self.write_expr(receiver, PRIMARY)?;
                    self.output.push('.');
                    self.write_name(name)?;
                    self.write_args(args)?;
                }
            },

            Expr::Attribute { object, name } => {
                self.write_expr(object, PRIMARY)?;
                self.output.push('.');
                self.write_name(name)?;
            }

            Expr::New { class, args } => {
                self.write_name(class)?;
                self.write_args(args)?;
            }

            Expr::List(elements) => {
                self.output.push('[');
                self.write_comma_separated(elements)?;
                self.output.push(']');
            }

            Expr::Dict(entries) => {
                self.output.push('{');
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        self.output.push_str(", ");
                    }
                    self.write_expr(key, 0)?;
                    self.output.push_str(": ");
                    self.write_expr(value, 0)?;
                }
                self.output.push('}');
            }
        }

        if parens {
            self.output.push(')');
        }
        Ok(())
    }

    fn write_emission(&mut self, emission: Emission<'_>, op: BuiltinOp) -> Result<(), GenerateError> {
        match emission {
            Emission::Call { symbol, args } => {
                self.output.push_str(symbol);
                self.write_args(args)?;
            }
            Emission::JoinedCall { symbol, args } => {
                self.output.push_str(symbol);
                self.output.push('(');
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        self.output.push_str(" + \" \" + ");
                    }
                    self.write_expr(arg, MULTIPLICATIVE)?;
                }
                self.output.push(')');
            }
            Emission::Method {
                receiver,
                symbol,
                args,
            } => {
                self.write_expr(receiver, PRIMARY)?;
                self.output.push('.');
                self.output.push_str(symbol);
                self.write_args(args)?;
            }
            Emission::Property { receiver, symbol } => {
                self.write_expr(receiver, PRIMARY)?;
                self.output.push('.');
                self.output.push_str(symbol);
            }
            Emission::Subscript { object, key } => {
                self.write_expr(object, PRIMARY)?;
                self.output.push('[');
                self.write_expr(key, 0)?;
                self.output.push(']');
            }
            Emission::SubscriptAssign { .. } => {
                return Err(GenerateError::StatementOnly { op, target: TARGET });
            }
        }
        Ok(())
    }

    fn write_args(&mut self, args: &[Expr]) -> Result<(), GenerateError> {
        self.output.push('(');
        self.write_comma_separated(args)?;
        self.output.push(')');
        Ok(())
    }

    fn write_comma_separated(&mut self, exprs: &[Expr]) -> Result<(), GenerateError> {
        for (index, expr) in exprs.iter().enumerate() {
            if index > 0 {
                self.output.push_str(", ");
            }
            self.write_expr(expr, 0)?;
        }
        Ok(())
    }

    fn write_literal(&mut self, lit: &Literal) -> Result<(), GenerateError> {
        match lit {
            Literal::String(s) => {
                self.output.push('"');
                self.output.push_str(&escape_string(s, TARGET));
                self.output.push('"');
            }
            Literal::Number(n) => self.output.push_str(&format_number(*n, TARGET)?),
            Literal::Bool(true) => self.output.push_str("True"),
            Literal::Bool(false) => self.output.push_str("False"),
            Literal::Null => self.output.push_str("None"),
        }
        Ok(())
    }
}

fn binary_symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::Eq => "==",
        BinaryOp::Ne => "!=",
        BinaryOp::Lt => "<",
        BinaryOp::Le => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::Ge => ">=",
        BinaryOp::And => "and",
        BinaryOp::Or => "or",
    }
}

impl Default for PythonWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(items: Vec<Item>) -> String {
        PythonWriter::emit(&Module::new(items)).unwrap()
    }

    #[test]
    fn test_simple_assignment() {
        let out = emit(vec![Item::Stmt(Stmt::assign("x", Expr::int(42)))]);
        assert_eq!(out, "x = 42\n");
    }

    #[test]
    fn test_precedence_parentheses() {
        let sum = Expr::binary(Expr::name("a"), BinaryOp::Add, Expr::name("b"));
        let product = Expr::binary(sum.clone(), BinaryOp::Mul, Expr::name("c"));
        let difference = Expr::binary(
            Expr::name("a"),
            BinaryOp::Sub,
            Expr::binary(Expr::name("b"), BinaryOp::Sub, Expr::name("c")),
        );
        let negated = Expr::unary(
            UnaryOp::Not,
            Expr::binary(Expr::name("a"), BinaryOp::And, Expr::name("b")),
        );
        let out = emit(vec![
            Item::Stmt(Stmt::assign("x", product)),
            Item::Stmt(Stmt::assign("y", difference)),
            Item::Stmt(Stmt::assign("z", negated)),
        ]);
        assert_eq!(out, "x = (a + b) * c\ny = a - (b - c)\nz = not (a and b)\n");
    }

    #[test]
    fn test_function_with_default_and_empty_body() {
        let f = FunctionDef::new(
            "f",
            vec![Param::new("a"), Param::with_default("b", Expr::null())],
            vec![],
        );
        assert_eq!(emit(vec![Item::Function(f)]), "def f(a, b=None):\n    pass\n");
    }

    #[test]
    fn test_else_if_becomes_elif() {
        let stmt = Stmt::if_stmt(
            Expr::name("a"),
            vec![Stmt::Break],
            vec![Stmt::if_stmt(
                Expr::name("b"),
                vec![Stmt::Continue],
                vec![Stmt::return_stmt(None)],
            )],
        );
        assert_eq!(
            emit(vec![Item::Stmt(stmt)]),
            "if a:\n    break\nelif b:\n    continue\nelse:\n    return\n"
        );
    }

    #[test]
    fn test_builtins() {
        let out = emit(vec![
            Item::Stmt(Stmt::expr(Expr::builtin(
                BuiltinOp::DictSet,
                vec![Expr::name("d"), Expr::string("k"), Expr::int(1)],
            ))),
            Item::Stmt(Stmt::expr(Expr::builtin(
                BuiltinOp::Print,
                vec![
                    Expr::builtin(BuiltinOp::Len, vec![Expr::name("xs")]),
                    Expr::builtin(BuiltinOp::Str, vec![Expr::int(1)]),
                ],
            ))),
        ]);
        assert_eq!(out, "d[\"k\"] = 1\nprint(len(xs), str(1))\n");
    }

    #[test]
    fn test_subscript_assign_outside_statement_fails() {
        let set = Expr::builtin(
            BuiltinOp::DictSet,
            vec![Expr::name("d"), Expr::string("k"), Expr::int(1)],
        );
        let module = Module::new(vec![Item::Stmt(Stmt::assign("x", set))]);
        assert_eq!(
            PythonWriter::emit(&module).unwrap_err(),
            GenerateError::StatementOnly {
                op: BuiltinOp::DictSet,
                target: Language::Python
            }
        );
    }

    #[test]
    fn test_class() {
        let ctor = FunctionDef::new(
            "Point",
            vec![Param::new("x")],
            vec![Stmt::assign_attr(Expr::SelfRef, "x", Expr::name("x"))],
        );
        let get = FunctionDef::new(
            "get",
            vec![],
            vec![Stmt::return_stmt(Some(Expr::attribute(Expr::SelfRef, "x")))],
        );
        let class = ClassDef::new("Point", Some(ctor), vec![get]);
        assert_eq!(
            emit(vec![Item::Class(class)]),
            "class Point:\n    def __init__(self, x):\n        self.x = x\n\n    def get(self):\n        return self.x\n"
        );
    }

    #[test]
    fn test_self_outside_method_fails() {
        let module = Module::new(vec![Item::Stmt(Stmt::expr(Expr::SelfRef))]);
        assert!(matches!(
            PythonWriter::emit(&module),
            Err(GenerateError::Unrepresentable { .. })
        ));
    }

    #[test]
    fn test_range_loop_omits_zero_start() {
        let out = emit(vec![Item::Stmt(Stmt::for_range(
            "i",
            Expr::int(0),
            Expr::name("n"),
            vec![],
        ))]);
        assert_eq!(out, "for i in range(n):\n    pass\n");
    }
}
