//! JavaScript writer for the IR.
//!
//! Emits IR as JavaScript source code.

use super::{
    Declarations, Emission, builtin_emission, c_family, check_counting_loop, check_identifier,
    counter_body, escape_string, format_number,
};
use crate::builtins::BuiltinOp;
use crate::error::GenerateError;
use crate::ir::walk::assigns_name;
use crate::ir::*;
use crate::language::Language;
use crate::traits::{WriteOptions, Writer};
use std::collections::HashSet;

/// Static instance of the JavaScript writer for registry.
pub static JAVASCRIPT_WRITER: JavaScriptWriterImpl = JavaScriptWriterImpl;

/// JavaScript writer implementing the Writer trait.
pub struct JavaScriptWriterImpl;

impl Writer for JavaScriptWriterImpl {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn write(&self, module: &Module, _options: &WriteOptions) -> Result<String, GenerateError> {
        JavaScriptWriter::emit(module)
    }
}

const TARGET: Language = Language::JavaScript;

/// Emits IR as JavaScript source code.
pub struct JavaScriptWriter {
    output: String,
    indent: usize,
    /// Block nesting inside the current function body.
    depth: usize,
    in_method: bool,
    declarations: Declarations,
    declared: HashSet<String>,
}

impl JavaScriptWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
            depth: 0,
            in_method: false,
            declarations: Declarations::default(),
            declared: HashSet::new(),
        }
    }

    /// Emit a module to JavaScript source.
    pub fn emit(module: &Module) -> Result<String, GenerateError> {
        let mut writer = Self::new();
        writer.write_module(module)?;
        Ok(writer.output)
    }

    fn write_module(&mut self, module: &Module) -> Result<(), GenerateError> {
        self.declarations = Declarations::plan_module(module);
        self.write_hoisted()?;

        let mut previous_was_definition = false;
        for (index, item) in module.items.iter().enumerate() {
            let is_definition = !matches!(item, Item::Stmt(_));
            if index > 0 && (is_definition || previous_was_definition) {
                self.output.push('\n');
            }
            match item {
                Item::Function(f) => self.write_function(f, "function ", false)?,
                Item::Class(c) => self.write_class(c)?,
                Item::Stmt(s) => self.write_stmt(s)?,
            }
            previous_was_definition = is_definition;
        }
        Ok(())
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
    }

    /// `let x;` for every name the current scope declares up front.
    fn write_hoisted(&mut self) -> Result<(), GenerateError> {
        for name in self.declarations.hoisted.clone() {
            check_identifier(&name, TARGET)?;
            self.write_indent();
            self.output.push_str(&format!("let {name};\n"));
        }
        Ok(())
    }

    fn write_name(&mut self, name: &str) -> Result<(), GenerateError> {
        check_identifier(name, TARGET)?;
        self.output.push_str(name);
        Ok(())
    }

    /// `{keyword}name(params) { ... }` with its own declaration scope.
    fn write_function(
        &mut self,
        f: &FunctionDef,
        keyword: &str,
        in_method: bool,
    ) -> Result<(), GenerateError> {
        self.write_indent();
        self.output.push_str(keyword);
        self.write_name(&f.name)?;
        self.output.push('(');
        for (index, param) in f.params.iter().enumerate() {
            if index > 0 {
                self.output.push_str(", ");
            }
            self.write_name(&param.name)?;
            if let Some(default) = &param.default {
                self.output.push_str(" = ");
                self.write_expr(default, 0)?;
            }
        }
        self.output.push_str(") {\n");

        let params: Vec<&str> = f.params.iter().map(|p| p.name.as_str()).collect();
        let outer_declarations = std::mem::replace(
            &mut self.declarations,
            Declarations::plan(&f.body, &params),
        );
        let outer_declared = std::mem::take(&mut self.declared);
        let outer_depth = std::mem::replace(&mut self.depth, 0);
        let outer_in_method = std::mem::replace(&mut self.in_method, in_method);

        self.indent += 1;
        self.write_hoisted()?;
        for stmt in &f.body {
            self.write_stmt(stmt)?;
        }
        self.indent -= 1;

        self.declarations = outer_declarations;
        self.declared = outer_declared;
        self.depth = outer_depth;
        self.in_method = outer_in_method;

        self.write_indent();
        self.output.push_str("}\n");
        Ok(())
    }

    fn write_class(&mut self, class: &ClassDef) -> Result<(), GenerateError> {
        self.write_indent();
        self.output.push_str("class ");
        self.write_name(&class.name)?;
        if class.constructor.is_none() && class.methods.is_empty() {
            self.output.push_str(" {}\n");
            return Ok(());
        }
        self.output.push_str(" {\n");
        self.indent += 1;

        if let Some(ctor) = &class.constructor {
            let ctor = FunctionDef {
                name: "constructor".into(),
                ..ctor.clone()
            };
            self.write_function(&ctor, "", true)?;
        }
        for (index, method) in class.methods.iter().enumerate() {
            if method.name == "constructor" {
                return Err(GenerateError::Unrepresentable {
                    what: "a method named `constructor`".into(),
                    target: TARGET,
                });
            }
            if index > 0 || class.constructor.is_some() {
                self.output.push('\n');
            }
            self.write_function(method, "", true)?;
        }

        self.indent -= 1;
        self.write_indent();
        self.output.push_str("}\n");
        Ok(())
    }

    /// `{` newline, nested statements, then the closing brace (no newline).
    fn write_block(&mut self, stmts: &[Stmt]) -> Result<(), GenerateError> {
        self.output.push_str("{\n");
        self.indent += 1;
        self.depth += 1;
        for stmt in stmts {
            self.write_stmt(stmt)?;
        }
        self.depth -= 1;
        self.indent -= 1;
        self.write_indent();
        self.output.push('}');
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
                    self.write_receiver(object)?;
                    self.output.push('[');
                    self.write_expr(key, 0)?;
                    self.output.push_str("] = ");
                    self.write_expr(value, 0)?;
                    self.output.push(';');
                }
                emission => {
                    self.write_emission(emission, *op)?;
                    self.output.push(';');
                }
            },

            Stmt::Expr(expr) => {
                // A leading `{` would open a block
                let start = self.output.len();
                self.write_expr(expr, 0)?;
                if self.output[start..].starts_with('{') {
                    self.output.insert(start, '(');
                    self.output.push(')');
                }
                self.output.push(';');
            }

            Stmt::Assign { target, value } => {
                match target {
                    AssignTarget::Name(name) => {
                        if self.depth == 0
                            && self.declarations.declares_inline(name)
                            && self.declared.insert(name.clone())
                        {
                            self.output.push_str("let ");
                        }
                        self.write_name(name)?;
                    }
                    AssignTarget::Attribute { object, name } => {
                        self.write_receiver(object)?;
                        self.output.push('.');
                        self.write_name(name)?;
                    }
                }
                self.output.push_str(" = ");
                self.write_expr(value, 0)?;
                self.output.push(';');
            }

            Stmt::If {
                cond,
                then_body,
                else_body,
            } => {
                self.output.push_str("if (");
                self.write_expr(cond, 0)?;
                self.output.push_str(") ");
                self.write_block(then_body)?;

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
                            self.output.push_str(" else if (");
                            self.write_expr(cond, 0)?;
                            self.output.push_str(") ");
                            self.write_block(then_body)?;
                            rest = else_body.as_slice();
                        }
                        other => {
                            self.output.push_str(" else ");
                            self.write_block(other)?;
                            break;
                        }
                    }
                }
            }

            Stmt::For {
                var,
                iterable,
                body,
            } => {
                self.output.push_str("for (");
                if !self.declarations.is_shared_loop_var(var) {
                    let binding = if assigns_name(body, var) { "let " } else { "const " };
                    self.output.push_str(binding);
                }
                self.write_name(var)?;
                self.output.push_str(" of ");
                self.write_expr(iterable, 0)?;
                self.output.push_str(") ");
                self.write_block(body)?;
            }

            Stmt::ForRange {
                var,
                start,
                stop,
                body,
            } => {
                check_identifier(var, TARGET)?;
                check_counting_loop(var, stop, body, TARGET)?;
                let shared = self.declarations.is_shared_loop_var(var);
                let counter = if shared {
                    self.declarations.counter_for(var)
                } else {
                    var.clone()
                };
                self.output.push_str(&format!("for (let {counter} = "));
                self.write_expr(start, 0)?;
                self.output.push_str(&format!("; {counter} < "));
                self.write_expr(stop, c_family::binary(BinaryOp::Lt) + 1)?;
                self.output.push_str(&format!("; {counter}++) "));
                if shared {
                    self.write_block(&counter_body(var, &counter, body))?;
                } else {
                    self.write_block(body)?;
                }
            }

            Stmt::While { cond, body } => {
                self.output.push_str("while (");
                self.write_expr(cond, 0)?;
                self.output.push_str(") ");
                self.write_block(body)?;
            }

            Stmt::Return(value) => {
                self.output.push_str("return");
                if let Some(value) = value {
                    self.output.push(' ');
                    self.write_expr(value, 0)?;
                }
                self.output.push(';');
            }

            Stmt::Break => self.output.push_str("break;"),
            Stmt::Continue => self.output.push_str("continue;"),
        }
        self.output.push('\n');
        Ok(())
    }

    fn write_expr(&mut self, expr: &Expr, min_precedence: u8) -> Result<(), GenerateError> {
        let own = c_family::of(expr);
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
                        what: "`this` outside a method".into(),
                        target: TARGET,
                    });
                }
                self.output.push_str("this");
            }

            Expr::Binary { op, left, right } => {
                self.write_expr(left, own)?;
                self.output.push(' ');
                self.output.push_str(binary_symbol(*op));
                self.output.push(' ');
                self.write_expr(right, own + 1)?;
            }

            Expr::Unary { op, operand } => match op {
                UnaryOp::Not => {
                    self.output.push('!');
                    self.write_expr(operand, c_family::UNARY)?;
                }
                UnaryOp::Neg => {
                    self.output.push('-');
                    // `--x` would be a decrement
                    let doubled = matches!(
                        operand.as_ref(),
                        Expr::Unary {
                            op: UnaryOp::Neg,
                            ..
                        }
                    ) || super::is_negative_literal(operand);
                    let min = if doubled { c_family::PRIMARY } else { c_family::UNARY };
                    self.write_expr(operand, min)?;
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
                    self.write_receiver(receiver)?;
                    self.output.push('.');
                    self.write_name(name)?;
                    self.write_args(args)?;
                }
            },

            Expr::Attribute { object, name } => {
                self.write_receiver(object)?;
                self.output.push('.');
                self.write_name(name)?;
            }

            Expr::New { class, args } => {
                self.output.push_str("new ");
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
                    match key {
                        Expr::Literal(Literal::String(_) | Literal::Number(_))
                            if !super::is_negative_literal(key) =>
                        {
                            self.write_expr(key, 0)?;
                        }
                        _ => {
                            self.output.push('[');
                            self.write_expr(key, 0)?;
                            self.output.push(']');
                        }
                    }
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

    /// Object of a member access. Integer literals need parentheses so the
    /// dot is not read as a decimal point.
    fn write_receiver(&mut self, receiver: &Expr) -> Result<(), GenerateError> {
        if matches!(receiver, Expr::Literal(Literal::Number(Number::Int(_)))) {
            self.output.push('(');
            self.write_expr(receiver, 0)?;
            self.output.push(')');
            return Ok(());
        }
        self.write_expr(receiver, c_family::PRIMARY)
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
                let min = if args.len() > 1 { c_family::binary(BinaryOp::Mul) } else { 0 };
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        self.output.push_str(" + \" \" + ");
                    }
                    self.write_expr(arg, min)?;
                }
                self.output.push(')');
            }
            Emission::Method {
                receiver,
                symbol,
                args,
            } => {
                self.write_receiver(receiver)?;
                self.output.push('.');
                self.output.push_str(symbol);
                self.write_args(args)?;
            }
            Emission::Property { receiver, symbol } => {
                self.write_receiver(receiver)?;
                self.output.push('.');
                self.output.push_str(symbol);
            }
            Emission::Subscript { object, key } => {
                self.write_receiver(object)?;
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
            Literal::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Literal::Null => self.output.push_str("null"),
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
        BinaryOp::Eq => "===",
        BinaryOp::Ne => "!==",
        BinaryOp::Lt => "<",
        BinaryOp::Le => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::Ge => ">=",
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
    }
}

impl Default for JavaScriptWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(items: Vec<Item>) -> String {
        JavaScriptWriter::emit(&Module::new(items)).unwrap()
    }

    #[test]
    fn test_declares_on_first_assignment() {
        let out = emit(vec![
            Item::Stmt(Stmt::assign("x", Expr::int(1))),
            Item::Stmt(Stmt::assign("x", Expr::int(2))),
        ]);
        assert_eq!(out, "let x = 1;\nx = 2;\n");
    }

    #[test]
    fn test_hoists_names_first_assigned_in_blocks() {
        let f = FunctionDef::new(
            "pick",
            vec![Param::new("c")],
            vec![
                Stmt::if_stmt(
                    Expr::name("c"),
                    vec![Stmt::assign("r", Expr::int(1))],
                    vec![Stmt::assign("r", Expr::int(2))],
                ),
                Stmt::return_stmt(Some(Expr::name("r"))),
            ],
        );
        assert_eq!(
            emit(vec![Item::Function(f)]),
            "function pick(c) {\n  let r;\n  if (c) {\n    r = 1;\n  } else {\n    r = 2;\n  }\n  return r;\n}\n"
        );
    }

    #[test]
    fn test_default_params_and_operators() {
        let f = FunctionDef::new(
            "f",
            vec![Param::new("a"), Param::with_default("b", Expr::int(0))],
            vec![Stmt::return_stmt(Some(Expr::binary(
                Expr::binary(Expr::name("a"), BinaryOp::Eq, Expr::name("b")),
                BinaryOp::Or,
                Expr::unary(UnaryOp::Not, Expr::name("a")),
            )))],
        );
        assert_eq!(
            emit(vec![Item::Function(f)]),
            "function f(a, b = 0) {\n  return a === b || !a;\n}\n"
        );
    }

    #[test]
    fn test_loops() {
        let out = emit(vec![
            Item::Stmt(Stmt::for_each("x", Expr::name("xs"), vec![Stmt::Break])),
            Item::Stmt(Stmt::for_range(
                "i",
                Expr::int(1),
                Expr::name("n"),
                vec![Stmt::Continue],
            )),
        ]);
        assert_eq!(
            out,
            "for (const x of xs) {\n  break;\n}\nfor (let i = 1; i < n; i++) {\n  continue;\n}\n"
        );
    }

    #[test]
    fn test_loop_variables_read_after_loop() {
        let print = |name: &str| {
            Item::Stmt(Stmt::expr(Expr::builtin(BuiltinOp::Print, vec![Expr::name(name)])))
        };
        let out = emit(vec![
            Item::Stmt(Stmt::for_range(
                "i",
                Expr::int(0),
                Expr::int(3),
                vec![Stmt::expr(Expr::call("f", vec![Expr::name("i")]))],
            )),
            print("i"),
            Item::Stmt(Stmt::for_each("x", Expr::name("xs"), vec![])),
            print("x"),
        ]);
        assert_eq!(
            out,
            "let i;\nlet x;\nfor (let i$ = 0; i$ < 3; i$++) {\n  i = i$;\n  f(i);\n}\nconsole.log(i);\nfor (x of xs) {\n}\nconsole.log(x);\n"
        );
    }

    #[test]
    fn test_counting_loop_that_moves_its_counter_rejected() {
        let body = vec![
            Stmt::expr(Expr::builtin(BuiltinOp::Print, vec![Expr::name("i")])),
            Stmt::assign("i", Expr::binary(Expr::name("i"), BinaryOp::Add, Expr::int(1))),
        ];
        let module = Module::new(vec![Item::Stmt(Stmt::for_range(
            "i",
            Expr::int(0),
            Expr::int(6),
            body,
        ))]);
        let err = JavaScriptWriter::emit(&module).unwrap_err();
        assert!(matches!(err, GenerateError::Unrepresentable { .. }), "{err:?}");
    }

    #[test]
    fn test_builtins() {
        let out = emit(vec![
            Item::Stmt(Stmt::expr(Expr::builtin(
                BuiltinOp::Append,
                vec![Expr::name("xs"), Expr::int(1)],
            ))),
            Item::Stmt(Stmt::expr(Expr::builtin(
                BuiltinOp::Print,
                vec![
                    Expr::builtin(BuiltinOp::Len, vec![Expr::name("xs")]),
                    Expr::builtin(BuiltinOp::DictGet, vec![Expr::name("d"), Expr::string("k")]),
                ],
            ))),
        ]);
        assert_eq!(out, "xs.push(1);\nconsole.log(xs.length, d[\"k\"]);\n");
    }

    #[test]
    fn test_class() {
        let ctor = FunctionDef::new(
            "Counter",
            vec![],
            vec![Stmt::assign_attr(Expr::SelfRef, "n", Expr::int(0))],
        );
        let class = ClassDef::new("Counter", Some(ctor), vec![]);
        assert_eq!(
            emit(vec![Item::Class(class)]),
            "class Counter {\n  constructor() {\n    this.n = 0;\n  }\n}\n"
        );
    }

    #[test]
    fn test_method_named_constructor_fails() {
        let class = ClassDef::new(
            "A",
            None,
            vec![FunctionDef::new("constructor", vec![], vec![])],
        );
        let module = Module::new(vec![Item::Class(class)]);
        assert!(matches!(
            JavaScriptWriter::emit(&module),
            Err(GenerateError::Unrepresentable { .. })
        ));
    }

    #[test]
    fn test_double_negation_is_parenthesized() {
        let out = emit(vec![Item::Stmt(Stmt::assign(
            "x",
            Expr::unary(UnaryOp::Neg, Expr::int(-1)),
        ))]);
        assert_eq!(out, "let x = -(-1);\n");
    }

    #[test]
    fn test_leading_object_literal_is_wrapped() {
        let out = emit(vec![Item::Stmt(Stmt::expr(Expr::Dict(vec![(
            Expr::string("a"),
            Expr::int(1),
        )])))]);
        assert_eq!(out, "({\"a\": 1});\n");
    }
}
