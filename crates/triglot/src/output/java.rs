//! Java writer for the IR.
//!
//! Java has no free functions, no top-level statements and no default
//! arguments. User classes are emitted first; top-level functions become
//! `public static` methods of a wrapper class whose `main` holds the
//! top-level statements. Defaulted parameters become forwarding overloads.
//! Values are untyped (`Object` parameters and fields, `var` locals).

use super::{
    Declarations, Emission, builtin_emission, c_family, check_counting_loop, check_identifier,
    counter_body, escape_string, format_number,
};
use crate::builtins::BuiltinOp;
use crate::error::GenerateError;
use crate::ir::walk::module_any_expr;
use crate::ir::*;
use crate::language::Language;
use crate::traits::{WriteOptions, Writer};
use std::collections::HashSet;

/// Static instance of the Java writer for registry.
pub static JAVA_WRITER: JavaWriterImpl = JavaWriterImpl;

/// Java writer implementing the Writer trait.
pub struct JavaWriterImpl;

impl Writer for JavaWriterImpl {
    fn language(&self) -> Language {
        Language::Java
    }

    fn write(&self, module: &Module, options: &WriteOptions) -> Result<String, GenerateError> {
        JavaWriter::emit(module, options)
    }
}

const TARGET: Language = Language::Java;

/// What a generated method belongs to, which decides its header and how
/// its overloads forward.
#[derive(Clone, Copy, PartialEq, Eq)]
enum MemberKind {
    /// `public static` method of the wrapper class.
    Static,
    /// Instance method of a user class.
    Method,
    Constructor,
}

/// Emits IR as Java source code.
pub struct JavaWriter {
    output: String,
    indent: usize,
    /// Block nesting inside the current method body.
    depth: usize,
    in_method: bool,
    declarations: Declarations,
    declared: HashSet<String>,
}

impl JavaWriter {
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

    /// Emit a module to Java source.
    pub fn emit(module: &Module, options: &WriteOptions) -> Result<String, GenerateError> {
        let mut writer = Self::new();
        writer.write_module(module, &options.java_class)?;
        Ok(writer.output)
    }

    fn write_module(&mut self, module: &Module, wrapper: &str) -> Result<(), GenerateError> {
        let functions: Vec<&FunctionDef> = module.functions().collect();
        let statements: Vec<&Stmt> = module.statements().collect();
        let needs_wrapper = !functions.is_empty() || !statements.is_empty();

        let mut class_names = HashSet::new();
        for class in module.classes() {
            if !class_names.insert(class.name.as_str()) || (needs_wrapper && class.name == wrapper) {
                return Err(clash(&class.name));
            }
        }
        unique_names(functions.iter().copied())?;

        let uses_collections =
            module_any_expr(module, &|expr| matches!(expr, Expr::List(_) | Expr::Dict(_)));
        if uses_collections {
            self.output.push_str("import java.util.*;\n");
        }

        let mut first = !uses_collections;
        for class in module.classes() {
            if !first {
                self.output.push('\n');
            }
            first = false;
            self.write_class(class)?;
        }

        if !needs_wrapper {
            return Ok(());
        }
        if !first {
            self.output.push('\n');
        }
        self.output.push_str("public class ");
        self.write_name(wrapper)?;
        self.output.push_str(" {\n");
        self.indent += 1;

        for (index, f) in functions.iter().enumerate() {
            if index > 0 {
                self.output.push('\n');
            }
            self.write_member(f, MemberKind::Static)?;
        }

        if !statements.is_empty() {
            if !functions.is_empty() {
                self.output.push('\n');
            }
            self.write_indent();
            self.output.push_str("public static void main(String[] args) {\n");
            self.enter_scope(statements.iter().copied(), &[], false);
            self.write_body(statements.iter().copied())?;
            self.write_indent();
            self.output.push_str("}\n");
        }

        self.indent -= 1;
        self.output.push_str("}\n");
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

    fn write_class(&mut self, class: &ClassDef) -> Result<(), GenerateError> {
        unique_names(class.methods.iter())?;

        self.output.push_str("class ");
        self.write_name(&class.name)?;
        self.output.push_str(" {\n");
        self.indent += 1;

        let fields = class.fields();
        for field in &fields {
            self.write_indent();
            self.output.push_str("private Object ");
            self.write_name(field)?;
            self.output.push_str(";\n");
        }

        let mut first = fields.is_empty();
        if let Some(ctor) = &class.constructor {
            if ctor.returns_value() {
                return Err(GenerateError::Unrepresentable {
                    what: "a constructor that returns a value".into(),
                    target: TARGET,
                });
            }
            let ctor = FunctionDef {
                name: class.name.clone(),
                ..ctor.clone()
            };
            if !first {
                self.output.push('\n');
            }
            first = false;
            self.write_member(&ctor, MemberKind::Constructor)?;
        }
        for method in &class.methods {
            if !first {
                self.output.push('\n');
            }
            first = false;
            self.write_member(method, MemberKind::Method)?;
        }

        self.indent -= 1;
        self.output.push_str("}\n");
        Ok(())
    }

    /// The full definition, then one forwarding overload per defaulted
    /// suffix, longest first.
    fn write_member(&mut self, f: &FunctionDef, kind: MemberKind) -> Result<(), GenerateError> {
        let returns_value = f.returns_value();
        let in_method = kind != MemberKind::Static;

        self.write_header(f, kind, returns_value, f.params.len())?;
        let params: Vec<&str> = f.params.iter().map(|p| p.name.as_str()).collect();
        self.enter_scope(&f.body, &params, in_method);
        self.write_body(&f.body)?;
        self.write_indent();
        self.output.push_str("}\n");

        for arity in (f.required_params()..f.params.len()).rev() {
            self.output.push('\n');
            self.write_header(f, kind, returns_value, arity)?;
            self.indent += 1;
            self.write_indent();
            match kind {
                MemberKind::Constructor => self.output.push_str("this"),
                MemberKind::Static | MemberKind::Method => {
                    if returns_value {
                        self.output.push_str("return ");
                    }
                    if kind == MemberKind::Method {
                        self.output.push_str("this.");
                    }
                    self.output.push_str(&f.name);
                }
            }
            self.output.push('(');
            for (index, param) in f.params.iter().enumerate() {
                if index > 0 {
                    self.output.push_str(", ");
                }
                match (&param.default, index < arity) {
                    (Some(default), false) => self.write_expr(default, 0)?,
                    _ => self.output.push_str(&param.name),
                }
            }
            self.output.push_str(");\n");
            self.indent -= 1;
            self.write_indent();
            self.output.push_str("}\n");
        }
        Ok(())
    }

    /// `public [static] Object|void name(Object a, ...) {` over the first
    /// `arity` parameters.
    fn write_header(
        &mut self,
        f: &FunctionDef,
        kind: MemberKind,
        returns_value: bool,
        arity: usize,
    ) -> Result<(), GenerateError> {
        self.write_indent();
        self.output.push_str("public ");
        if kind == MemberKind::Static {
            self.output.push_str("static ");
        }
        if kind != MemberKind::Constructor {
            self.output
                .push_str(if returns_value { "Object " } else { "void " });
        }
        self.write_name(&f.name)?;
        self.output.push('(');
        for (index, param) in f.params[..arity].iter().enumerate() {
            if index > 0 {
                self.output.push_str(", ");
            }
            self.output.push_str("Object ");
            self.write_name(&param.name)?;
        }
        self.output.push_str(") {\n");
        Ok(())
    }

    /// Reset per-method state for a new body.
    fn enter_scope<'s>(
        &mut self,
        body: impl IntoIterator<Item = &'s Stmt>,
        params: &[&str],
        in_method: bool,
    ) {
        self.declarations = Declarations::plan(body, params);
        self.declared.clear();
        self.depth = 0;
        self.in_method = in_method;
    }

    /// Method body: hoisted declarations, then the statements.
    fn write_body<'s>(&mut self, stmts: impl IntoIterator<Item = &'s Stmt>) -> Result<(), GenerateError> {
        self.indent += 1;
        for name in self.declarations.hoisted.clone() {
            check_identifier(&name, TARGET)?;
            self.write_indent();
            // A loop may run zero times, so its variable needs a value
            if self.declarations.is_shared_loop_var(&name) {
                self.output.push_str(&format!("Object {name} = null;\n"));
            } else {
                self.output.push_str(&format!("Object {name};\n"));
            }
        }
        for stmt in stmts {
            self.write_stmt(stmt)?;
        }
        self.indent -= 1;
        Ok(())
    }

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
            Stmt::Expr(expr) => {
                if !matches!(expr, Expr::Call { .. } | Expr::New { .. }) {
                    return Err(GenerateError::Unrepresentable {
                        what: "an expression statement that is not a call".into(),
                        target: TARGET,
                    });
                }
                self.write_expr(expr, 0)?;
                self.output.push(';');
            }

            Stmt::Assign { target, value } => {
                match target {
                    AssignTarget::Name(name) => {
                        if self.depth == 0
                            && self.declarations.declares_inline(name)
                            && self.declared.insert(name.clone())
                        {
                            let declared_type = if *value == Expr::null() { "Object " } else { "var " };
                            self.output.push_str(declared_type);
                        }
                        self.write_name(name)?;
                    }
                    AssignTarget::Attribute { object, name } => {
                        self.write_expr(object, c_family::PRIMARY)?;
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
                let shared = self.declarations.is_shared_loop_var(var);
                let counter = if shared {
                    self.declarations.counter_for(var)
                } else {
                    var.clone()
                };
                self.output.push_str("for (var ");
                self.write_name(&counter)?;
                self.output.push_str(" : ");
                self.write_expr(iterable, 0)?;
                self.output.push_str(") ");
                if shared {
                    self.write_block(&counter_body(var, &counter, body))?;
                } else {
                    self.write_block(body)?;
                }
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
                self.output.push_str(&format!("for (int {counter} = "));
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
                        what: "`this` outside an instance method".into(),
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
                    self.write_expr(receiver, c_family::PRIMARY)?;
                    self.output.push('.');
                    self.write_name(name)?;
                    self.write_args(args)?;
                }
            },

            Expr::Attribute { object, name } => {
                self.write_expr(object, c_family::PRIMARY)?;
                self.output.push('.');
                self.write_name(name)?;
            }

            Expr::New { class, args } => {
                self.output.push_str("new ");
                self.write_name(class)?;
                self.write_args(args)?;
            }

            Expr::List(elements) => {
                if elements.is_empty() {
                    self.output.push_str("new ArrayList<>()");
                } else {
                    self.output.push_str("new ArrayList<>(List.of(");
                    self.write_comma_separated(elements)?;
                    self.output.push_str("))");
                }
            }

            Expr::Dict(entries) => {
                if entries.is_empty() {
                    self.output.push_str("new HashMap<>()");
                } else {
                    self.output.push_str("new HashMap<>(Map.ofEntries(");
                    for (index, (key, value)) in entries.iter().enumerate() {
                        if index > 0 {
                            self.output.push_str(", ");
                        }
                        self.output.push_str("Map.entry(");
                        self.write_expr(key, 0)?;
                        self.output.push_str(", ");
                        self.write_expr(value, 0)?;
                        self.output.push(')');
                    }
                    self.output.push_str("))");
                }
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
                self.write_expr(receiver, c_family::PRIMARY)?;
                self.output.push('.');
                self.output.push_str(symbol);
                self.write_args(args)?;
            }
            Emission::Property { receiver, symbol } => {
                self.write_expr(receiver, c_family::PRIMARY)?;
                self.output.push('.');
                self.output.push_str(symbol);
            }
            Emission::Subscript { object, key } => {
                self.write_expr(object, c_family::PRIMARY)?;
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

fn clash(name: &str) -> GenerateError {
    GenerateError::NameClash {
        name: name.to_string(),
        target: TARGET,
    }
}

fn unique_names<'f>(defs: impl IntoIterator<Item = &'f FunctionDef>) -> Result<(), GenerateError> {
    let mut seen = HashSet::new();
    for def in defs {
        if !seen.insert(def.name.as_str()) {
            return Err(clash(&def.name));
        }
    }
    Ok(())
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
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
    }
}

impl Default for JavaWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(items: Vec<Item>) -> Result<String, GenerateError> {
        JavaWriter::emit(&Module::new(items), &WriteOptions::default())
    }

    #[test]
    fn test_loop_variable_read_after_loop() {
        let out = emit(vec![
            Item::Stmt(Stmt::for_range("i", Expr::int(0), Expr::int(3), vec![])),
            Item::Stmt(Stmt::expr(Expr::builtin(BuiltinOp::Print, vec![Expr::name("i")]))),
        ])
        .unwrap();
        assert_eq!(
            out,
            "public class Main {\n    public static void main(String[] args) {\n        Object i = null;\n        for (int i$ = 0; i$ < 3; i$++) {\n            i = i$;\n        }\n        System.out.println(i);\n    }\n}\n"
        );
    }

    #[test]
    fn test_counting_loop_with_moving_bound_rejected() {
        let grow = Stmt::assign("n", Expr::binary(Expr::name("n"), BinaryOp::Add, Expr::int(1)));
        let err = emit(vec![Item::Stmt(Stmt::for_range(
            "i",
            Expr::int(0),
            Expr::name("n"),
            vec![grow],
        ))])
        .unwrap_err();
        assert!(matches!(err, GenerateError::Unrepresentable { .. }), "{err:?}");
    }

    #[test]
    fn test_statements_go_into_main() {
        let out = emit(vec![
            Item::Stmt(Stmt::assign("x", Expr::int(1))),
            Item::Stmt(Stmt::assign("y", Expr::null())),
            Item::Stmt(Stmt::expr(Expr::builtin(
                BuiltinOp::Print,
                vec![Expr::name("x"), Expr::name("y")],
            ))),
        ])
        .unwrap();
        assert_eq!(
            out,
            "public class Main {\n    public static void main(String[] args) {\n        var x = 1;\n        Object y = null;\n        System.out.println(x + \" \" + y);\n    }\n}\n"
        );
    }

    #[test]
    fn test_defaults_become_overloads() {
        let f = FunctionDef::new(
            "add",
            vec![Param::new("a"), Param::with_default("b", Expr::int(0))],
            vec![Stmt::return_stmt(Some(Expr::binary(
                Expr::name("a"),
                BinaryOp::Add,
                Expr::name("b"),
            )))],
        );
        let out = emit(vec![Item::Function(f)]).unwrap();
        assert_eq!(
            out,
            "public class Main {\n    public static Object add(Object a, Object b) {\n        return a + b;\n    }\n\n    public static Object add(Object a) {\n        return add(a, 0);\n    }\n}\n"
        );
    }

    #[test]
    fn test_class_with_fields_and_constructor_overload() {
        let ctor = FunctionDef::new(
            "Point",
            vec![Param::new("x"), Param::with_default("y", Expr::int(0))],
            vec![
                Stmt::assign_attr(Expr::SelfRef, "x", Expr::name("x")),
                Stmt::assign_attr(Expr::SelfRef, "y", Expr::name("y")),
            ],
        );
        let class = ClassDef::new("Point", Some(ctor), vec![]);
        let out = emit(vec![Item::Class(class)]).unwrap();
        assert_eq!(
            out,
            "class Point {\n    private Object x;\n    private Object y;\n\n    public Point(Object x, Object y) {\n        this.x = x;\n        this.y = y;\n    }\n\n    public Point(Object x) {\n        this(x, 0);\n    }\n}\n"
        );
    }

    #[test]
    fn test_collections_import_and_builtins() {
        let out = emit(vec![
            Item::Stmt(Stmt::assign("xs", Expr::List(vec![]))),
            Item::Stmt(Stmt::expr(Expr::builtin(
                BuiltinOp::Append,
                vec![Expr::name("xs"), Expr::int(1)],
            ))),
            Item::Stmt(Stmt::expr(Expr::builtin(
                BuiltinOp::Print,
                vec![Expr::builtin(BuiltinOp::Len, vec![Expr::name("xs")])],
            ))),
        ])
        .unwrap();
        assert_eq!(
            out,
            "import java.util.*;\n\npublic class Main {\n    public static void main(String[] args) {\n        var xs = new ArrayList<>();\n        xs.add(1);\n        System.out.println(xs.size());\n    }\n}\n"
        );
    }

    #[test]
    fn test_duplicate_functions_clash() {
        let f = FunctionDef::new("f", vec![], vec![]);
        let err = emit(vec![Item::Function(f.clone()), Item::Function(f)]).unwrap_err();
        assert_eq!(
            err,
            GenerateError::NameClash {
                name: "f".into(),
                target: Language::Java
            }
        );
    }

    #[test]
    fn test_class_named_like_wrapper_clashes() {
        let class = ClassDef::new("Main", None, vec![]);
        let stmt = Stmt::expr(Expr::new_object("Main", vec![]));
        let err = emit(vec![Item::Class(class.clone()), Item::Stmt(stmt)]).unwrap_err();
        assert!(matches!(err, GenerateError::NameClash { .. }));
        assert_eq!(emit(vec![Item::Class(class)]).unwrap(), "class Main {\n}\n");
    }

    #[test]
    fn test_bare_expression_statement_fails() {
        let err = emit(vec![Item::Stmt(Stmt::expr(Expr::name("x")))]).unwrap_err();
        assert!(matches!(err, GenerateError::Unrepresentable { .. }));
    }

    #[test]
    fn test_custom_wrapper_name() {
        let options = WriteOptions {
            java_class: "Snippet".into(),
        };
        let module = Module::new(vec![Item::Stmt(Stmt::expr(Expr::builtin(
            BuiltinOp::Print,
            vec![],
        )))]);
        let out = JavaWriter::emit(&module, &options).unwrap();
        assert!(out.starts_with("public class Snippet {\n"));
    }
}
