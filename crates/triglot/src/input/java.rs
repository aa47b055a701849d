//! Tree-sitter based Java reader.
//!
//! Java has no free functions or top-level statements, so a class whose
//! members are all static methods is treated as a wrapper: its methods
//! become module functions and the body of `main(String[] args)` becomes
//! the module's statements. Overloads that forward to a longer overload
//! fold back into default parameter values.

use super::{
    attribute_access, check_params, dotted_path, field, field_children, free_call, has_token,
    method_call, named_children, node_text, only_child, parse_float, parse_int, parse_source,
    position, subscript, subscript_assign, unescape, unsupported, unsupported_kind, update_step,
};
use crate::error::{LowerError, ParseError, TranslateError};
use crate::ir::walk::counting_loop_is_stable;
use crate::ir::*;
use crate::language::Language;
use crate::traits::Reader;
use tree_sitter::{Node, Tree};

/// Static instance of the Java reader for registry.
pub static JAVA_READER: JavaReader = JavaReader;

/// Java reader using tree-sitter.
pub struct JavaReader;

impl Reader for JavaReader {
    fn language(&self) -> Language {
        Language::Java
    }

    fn parse(&self, source: &str) -> Result<Tree, ParseError> {
        parse_source(Language::Java, arborium_java::language().into(), source)
    }

    fn lower(&self, tree: &Tree, source: &str) -> Result<Module, LowerError> {
        LowerContext::new(source).lower_program(tree.root_node())
    }
}

/// Parse and lower Java source.
pub fn read_java(source: &str) -> Result<Module, TranslateError> {
    JAVA_READER.read(source)
}

/// Merge overloads sharing a name into one definition with defaults.
///
/// Every shorter overload must consist of a single call forwarding its own
/// parameters, in order, followed by the values for the missing ones.
fn fold_overloads(defs: Vec<FunctionDef>, construct: &str) -> Result<Vec<FunctionDef>, LowerError> {
    let mut groups: Vec<Vec<FunctionDef>> = Vec::new();
    for def in defs {
        match groups.iter_mut().find(|group| group[0].name == def.name) {
            Some(group) => group.push(def),
            None => groups.push(vec![def]),
        }
    }
    groups
        .into_iter()
        .map(|group| fold_group(group, construct))
        .collect()
}

fn fold_group(mut group: Vec<FunctionDef>, construct: &str) -> Result<FunctionDef, LowerError> {
    let clash = |def: &FunctionDef| LowerError::Unsupported {
        construct: construct.to_string(),
        position: def.position.unwrap_or_default(),
    };

    // Longest first; the rest ascend so the shortest sets every default.
    group.sort_by_key(|def| std::cmp::Reverse(def.params.len()));
    let mut full = group.remove(0);
    group.reverse();

    for overload in &group {
        let arity = overload.params.len();
        if arity == full.params.len() {
            return Err(clash(overload));
        }
        let args = forwarded_args(overload, &full.name).ok_or_else(|| clash(overload))?;
        if args.len() != full.params.len() {
            return Err(clash(overload));
        }
        let passes_own_params = overload
            .params
            .iter()
            .zip(&full.params)
            .zip(args)
            .all(|((own, target), arg)| {
                own.name == target.name && matches!(arg, Expr::Name(n) if *n == own.name)
            });
        if !passes_own_params {
            return Err(clash(overload));
        }
        for (param, value) in full.params[arity..].iter_mut().zip(&args[arity..]) {
            match &param.default {
                None => param.default = Some(value.clone()),
                Some(existing) if existing.structure_eq(value) => {}
                Some(_) => return Err(clash(overload)),
            }
        }
    }
    Ok(full)
}

/// Arguments of the sole call in a forwarding body (`return f(a, 0);`).
fn forwarded_args<'d>(def: &'d FunctionDef, target: &str) -> Option<&'d [Expr]> {
    let call = match def.body.as_slice() {
        [Stmt::Return(Some(call))] | [Stmt::Expr(call)] => call,
        _ => return None,
    };
    match call {
        Expr::Call {
            callee: Callee::Name(name),
            args,
        } if name == target => Some(args.as_slice()),
        Expr::Call {
            callee: Callee::Method { receiver, name },
            args,
        } if **receiver == Expr::SelfRef && name == target => Some(args.as_slice()),
        _ => None,
    }
}

#[derive(Clone, Copy)]
struct LowerContext<'a> {
    source: &'a str,
    /// Inside an instance member, where `this` is the receiver.
    in_method: bool,
}

impl<'a> LowerContext<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            in_method: false,
        }
    }

    fn text(&self, node: Node) -> &'a str {
        node_text(node, self.source)
    }

    fn lower_program(&self, root: Node) -> Result<Module, LowerError> {
        let mut items = Vec::new();
        let mut loose_methods = Vec::new();
        let mut loose_at = None;

        for child in named_children(root) {
            match child.kind() {
                "class_declaration" => self.lower_class_declaration(child, &mut items)?,
                "method_declaration" => {
                    loose_at.get_or_insert(items.len());
                    loose_methods.push(self.lower_method(child)?);
                }
                "import_declaration" if self.is_collections_import(child) => {}
                "import_declaration" | "package_declaration" => {
                    return Err(unsupported("package or import declaration", child));
                }
                "interface_declaration"
                | "enum_declaration"
                | "record_declaration"
                | "annotation_type_declaration" => return Err(unsupported_kind(child)),
                _ => {
                    let mut stmts = Vec::new();
                    self.lower_stmt_into(child, &mut stmts)?;
                    items.extend(stmts.into_iter().map(Item::Stmt));
                }
            }
        }

        if let Some(index) = loose_at {
            let functions = fold_overloads(loose_methods, "method overloading")?;
            let tail = items.split_off(index);
            items.extend(functions.into_iter().map(Item::Function));
            items.extend(tail);
        }
        Ok(Module::new(items))
    }

    /// `import java.util.*;` and friends carry no meaning for the IR.
    fn is_collections_import(&self, node: Node) -> bool {
        let path = self
            .text(node)
            .trim_start_matches("import")
            .trim()
            .trim_end_matches(';')
            .trim();
        path.starts_with("java.util.")
    }

    // ---- definitions ----

    fn lower_class_declaration(&self, node: Node, items: &mut Vec<Item>) -> Result<(), LowerError> {
        self.check_modifiers(node)?;
        for (name, construct) in [
            ("superclass", "inheritance"),
            ("interfaces", "inheritance"),
            ("type_parameters", "generic class"),
        ] {
            if let Some(child) = node.child_by_field_name(name) {
                return Err(unsupported(construct, child));
            }
        }

        let name = self.text(field(node, "name")?);
        let members = named_children(field(node, "body")?);
        let is_wrapper = !members.is_empty()
            && members
                .iter()
                .all(|member| member.kind() == "method_declaration" && self.is_static(*member));

        if is_wrapper {
            let mut functions = Vec::new();
            let mut entry = Vec::new();
            for member in members {
                if self.is_entry_point(member)? {
                    entry = self.lower_body(field(member, "body")?)?;
                } else {
                    functions.push(self.lower_method(member)?);
                }
            }
            let functions = fold_overloads(functions, "method overloading")?;
            items.extend(functions.into_iter().map(Item::Function));
            items.extend(entry.into_iter().map(Item::Stmt));
        } else {
            items.push(Item::Class(self.lower_class(node, name, members)?));
        }
        Ok(())
    }

    fn lower_class(&self, node: Node, name: &str, members: Vec<Node>) -> Result<ClassDef, LowerError> {
        let member_ctx = LowerContext {
            in_method: true,
            ..*self
        };
        let mut constructors = Vec::new();
        let mut methods = Vec::new();

        for member in members {
            match member.kind() {
                "field_declaration" => {
                    if self.is_static(member) {
                        return Err(unsupported("static field", member));
                    }
                    for declarator in field_children(member, "declarator") {
                        if declarator.child_by_field_name("value").is_some() {
                            return Err(unsupported("field initializer", declarator));
                        }
                    }
                }
                "constructor_declaration" => {
                    constructors.push(member_ctx.lower_constructor(member, name)?);
                }
                "method_declaration" => {
                    if self.is_static(member) {
                        return Err(unsupported("static method", member));
                    }
                    methods.push(member_ctx.lower_method(member)?);
                }
                "class_declaration" | "interface_declaration" | "enum_declaration" => {
                    return Err(unsupported("nested class", member));
                }
                _ => return Err(unsupported_kind(member)),
            }
        }

        let constructor = fold_overloads(constructors, "constructor overloading")?.pop();
        let methods = fold_overloads(methods, "method overloading")?;
        Ok(ClassDef::new(name, constructor, methods).at(position(node)))
    }

    fn lower_method(&self, node: Node) -> Result<FunctionDef, LowerError> {
        self.check_modifiers(node)?;
        if let Some(params) = node.child_by_field_name("type_parameters") {
            return Err(unsupported("generic method", params));
        }
        if let Some(throws) = named_children(node).into_iter().find(|c| c.kind() == "throws") {
            return Err(unsupported("throws clause", throws));
        }
        let name = self.text(field(node, "name")?);
        let params_node = field(node, "parameters")?;
        let params = self.lower_parameters(params_node)?;
        check_params(name, &params, params_node)?;
        let body = node
            .child_by_field_name("body")
            .ok_or_else(|| unsupported("method without a body", node))?;
        let body = self.lower_body(body)?;
        Ok(FunctionDef::new(name, params, body).at(position(node)))
    }

    fn lower_constructor(&self, node: Node, class: &str) -> Result<FunctionDef, LowerError> {
        self.check_modifiers(node)?;
        let params_node = field(node, "parameters")?;
        let params = self.lower_parameters(params_node)?;
        check_params(class, &params, params_node)?;

        let mut body = Vec::new();
        for child in named_children(field(node, "body")?) {
            if child.kind() == "explicit_constructor_invocation" {
                let target = field(child, "constructor")?;
                if target.kind() != "this" {
                    return Err(unsupported("inheritance", target));
                }
                let args = self.lower_arguments(field(child, "arguments")?)?;
                body.push(Stmt::expr(Expr::call(class, args)));
            } else {
                self.lower_stmt_into(child, &mut body)?;
            }
        }
        Ok(FunctionDef::new(class, params, body).at(position(node)))
    }

    fn lower_parameters(&self, node: Node) -> Result<Vec<Param>, LowerError> {
        let mut params = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "formal_parameter" => params.push(Param::new(self.text(field(child, "name")?))),
                "spread_parameter" => return Err(unsupported("varargs parameter", child)),
                _ => return Err(unsupported_kind(child)),
            }
        }
        Ok(params)
    }

    fn modifiers<'t>(&self, node: Node<'t>) -> Option<Node<'t>> {
        named_children(node)
            .into_iter()
            .find(|child| child.kind() == "modifiers")
    }

    fn is_static(&self, node: Node) -> bool {
        self.modifiers(node)
            .is_some_and(|modifiers| has_token(modifiers, "static"))
    }

    /// Only `@Override` is tolerated; other annotations change meaning.
    fn check_modifiers(&self, node: Node) -> Result<(), LowerError> {
        let Some(modifiers) = self.modifiers(node) else {
            return Ok(());
        };
        for annotation in named_children(modifiers) {
            if self.text(annotation) != "@Override" {
                return Err(unsupported("annotation", annotation));
            }
        }
        Ok(())
    }

    /// `static void main(String[] args)`.
    fn is_entry_point(&self, node: Node) -> Result<bool, LowerError> {
        if self.text(field(node, "name")?) != "main" {
            return Ok(false);
        }
        if field(node, "type")?.kind() != "void_type" {
            return Ok(false);
        }
        let params = named_children(field(node, "parameters")?);
        let [param] = params.as_slice() else {
            return Ok(false);
        };
        if param.kind() != "formal_parameter" {
            return Ok(false);
        }
        let param_type = self.text(field(*param, "type")?).replace(' ', "");
        Ok(param_type == "String[]")
    }

    // ---- statements ----

    fn lower_body(&self, node: Node) -> Result<Vec<Stmt>, LowerError> {
        let mut stmts = Vec::new();
        if node.kind() == "block" {
            for child in named_children(node) {
                self.lower_stmt_into(child, &mut stmts)?;
            }
        } else {
            self.lower_stmt_into(node, &mut stmts)?;
        }
        Ok(stmts)
    }

    fn lower_stmt_into(&self, node: Node, out: &mut Vec<Stmt>) -> Result<(), LowerError> {
        match node.kind() {
            "local_variable_declaration" => {
                for declarator in field_children(node, "declarator") {
                    let name = self.text(field(declarator, "name")?);
                    if let Some(value) = declarator.child_by_field_name("value") {
                        out.push(Stmt::assign(name, self.lower_expr(value)?));
                    }
                }
            }
            "expression_statement" => out.push(self.lower_expression_statement(node)?),

            // Control flow
            "if_statement" => {
                let cond = self.lower_expr(field(node, "condition")?)?;
                let then_body = self.lower_body(field(node, "consequence")?)?;
                let else_body = match node.child_by_field_name("alternative") {
                    Some(alternative) => self.lower_body(alternative)?,
                    None => Vec::new(),
                };
                out.push(Stmt::if_stmt(cond, then_body, else_body));
            }
            "while_statement" => {
                let cond = self.lower_expr(field(node, "condition")?)?;
                let body = self.lower_body(field(node, "body")?)?;
                out.push(Stmt::while_loop(cond, body));
            }
            "enhanced_for_statement" => {
                let var = self.text(field(node, "name")?);
                let iterable = self.lower_expr(field(node, "value")?)?;
                let body = self.lower_body(field(node, "body")?)?;
                out.push(Stmt::for_each(var, iterable, body));
            }
            "for_statement" => out.push(self.lower_counting_for(node)?),
            "return_statement" => {
                let value = match named_children(node).first() {
                    Some(value) => Some(self.lower_expr(*value)?),
                    None => None,
                };
                out.push(Stmt::return_stmt(value));
            }
            "break_statement" | "continue_statement" => {
                if !named_children(node).is_empty() {
                    return Err(unsupported("labeled jump", node));
                }
                out.push(if node.kind() == "break_statement" {
                    Stmt::Break
                } else {
                    Stmt::Continue
                });
            }

            "block" => return Err(unsupported("bare block", node)),
            "try_statement" | "try_with_resources_statement" | "throw_statement" => {
                return Err(unsupported("exception handling", node));
            }
            "switch_expression" | "switch_statement" => {
                return Err(unsupported("switch statement", node));
            }
            "do_statement" => return Err(unsupported("do-while loop", node)),
            "local_class_declaration" | "class_declaration" => {
                return Err(unsupported("nested class", node));
            }
            _ => return Err(unsupported_kind(node)),
        }
        Ok(())
    }

    fn lower_expression_statement(&self, node: Node) -> Result<Stmt, LowerError> {
        let child = only_child(node, "expression statement")?;
        match child.kind() {
            "assignment_expression" => {
                let left = field(child, "left")?;
                let operator = field(child, "operator")?;
                let right = self.lower_expr(field(child, "right")?)?;
                let op = match self.text(operator) {
                    "=" => return self.assign_to(left, right),
                    "+=" => BinaryOp::Add,
                    "-=" => BinaryOp::Sub,
                    "*=" => BinaryOp::Mul,
                    "/=" => BinaryOp::Div,
                    "%=" => BinaryOp::Mod,
                    other => return Err(unsupported(format!("`{other}` assignment"), operator)),
                };
                let current = self.lower_target_value(left)?;
                self.assign_to(left, Expr::binary(current, op, right))
            }
            "update_expression" => {
                let step = update_step(child).ok_or_else(|| unsupported_kind(child))?;
                let target = only_child(child, "update expression")?;
                let (op, amount) = if step > 0 {
                    (BinaryOp::Add, step)
                } else {
                    (BinaryOp::Sub, -step)
                };
                let value = Expr::binary(self.lower_target_value(target)?, op, Expr::int(amount));
                self.assign_to(target, value)
            }
            _ => Ok(Stmt::expr(self.lower_expr(child)?)),
        }
    }

    fn lower_target_value(&self, target: Node) -> Result<Expr, LowerError> {
        match target.kind() {
            "identifier" | "field_access" => self.lower_expr(target),
            _ => Err(unsupported("compound assignment target", target)),
        }
    }

    fn assign_to(&self, target: Node, value: Expr) -> Result<Stmt, LowerError> {
        match target.kind() {
            "identifier" => Ok(Stmt::assign(self.text(target), value)),
            "field_access" => {
                let object = self.lower_expr(field(target, "object")?)?;
                let name = self.text(field(target, "field")?);
                Ok(Stmt::assign_attr(object, name, value))
            }
            "array_access" => {
                let object = self.lower_expr(field(target, "array")?)?;
                let key = self.lower_expr(field(target, "index")?)?;
                let call = subscript_assign(Language::Java, object, key, value, target)?;
                Ok(Stmt::expr(call))
            }
            _ => Err(unsupported_kind(target)),
        }
    }

    /// `for (int i = a; i < b; i++)` is the only accepted C-style loop.
    fn lower_counting_for(&self, node: Node) -> Result<Stmt, LowerError> {
        let not_counting = || unsupported("C-style for loop", node);

        let inits = field_children(node, "init");
        let [init] = inits.as_slice() else {
            return Err(not_counting());
        };
        let (var, start) = match init.kind() {
            "local_variable_declaration" => {
                let declarators = field_children(*init, "declarator");
                let [declarator] = declarators.as_slice() else {
                    return Err(not_counting());
                };
                let value = declarator.child_by_field_name("value").ok_or_else(not_counting)?;
                (field(*declarator, "name")?, value)
            }
            "assignment_expression" => {
                return Err(unsupported("C-style for loop over an outer variable", node));
            }
            _ => return Err(not_counting()),
        };
        if var.kind() != "identifier" {
            return Err(not_counting());
        }
        let var = self.text(var);

        let cond = node.child_by_field_name("condition").ok_or_else(not_counting)?;
        let bounded = cond.kind() == "binary_expression"
            && self.text(field(cond, "operator")?) == "<"
            && self.text(field(cond, "left")?) == var;
        if !bounded {
            return Err(not_counting());
        }

        let updates = field_children(node, "update");
        let [update] = updates.as_slice() else {
            return Err(not_counting());
        };
        if !self.increments_by_one(*update, var)? {
            return Err(not_counting());
        }

        let start = self.lower_expr(start)?;
        let stop = self.lower_expr(field(cond, "right")?)?;
        let body = self.lower_body(field(node, "body")?)?;
        if !counting_loop_is_stable(var, &stop, &body) {
            return Err(unsupported("counting loop that changes its counter or bound", node));
        }
        Ok(Stmt::for_range(var, start, stop, body))
    }

    fn increments_by_one(&self, node: Node, var: &str) -> Result<bool, LowerError> {
        let is_var = |n: Node| n.kind() == "identifier" && self.text(n) == var;
        let is_one = |n: Node| n.kind() == "decimal_integer_literal" && self.text(n) == "1";
        Ok(match node.kind() {
            "update_expression" => {
                update_step(node) == Some(1) && is_var(only_child(node, "update expression")?)
            }
            "assignment_expression" => {
                let left = field(node, "left")?;
                let right = field(node, "right")?;
                match self.text(field(node, "operator")?) {
                    "+=" => is_var(left) && is_one(right),
                    "=" => {
                        is_var(left)
                            && right.kind() == "binary_expression"
                            && self.text(field(right, "operator")?) == "+"
                            && is_var(field(right, "left")?)
                            && is_one(field(right, "right")?)
                    }
                    _ => false,
                }
            }
            _ => false,
        })
    }

    // ---- expressions ----

    fn lower_expr(&self, node: Node) -> Result<Expr, LowerError> {
        match node.kind() {
            // Literals
            "decimal_integer_literal"
            | "hex_integer_literal"
            | "octal_integer_literal"
            | "binary_integer_literal" => parse_int(self.text(node), Language::Java, node),
            "decimal_floating_point_literal" => parse_float(self.text(node), node),
            "hex_floating_point_literal" => Err(unsupported("hexadecimal float literal", node)),
            "string_literal" => {
                let text = self.text(node);
                if text.starts_with("\"\"\"") {
                    return Err(unsupported("text block", node));
                }
                let body = text.get(1..text.len().saturating_sub(1)).unwrap_or("");
                unescape(body, Language::Java, node).map(Expr::string)
            }
            "character_literal" => {
                let text = self.text(node);
                let body = text.get(1..text.len().saturating_sub(1)).unwrap_or("");
                unescape(body, Language::Java, node).map(Expr::string)
            }
            "true" => Ok(Expr::bool(true)),
            "false" => Ok(Expr::bool(false)),
            "null_literal" => Ok(Expr::null()),
            "identifier" => Ok(Expr::name(self.text(node))),
            "this" => {
                if self.in_method {
                    Ok(Expr::SelfRef)
                } else {
                    Err(unsupported("`this` outside an instance method", node))
                }
            }

            // Operators
            "binary_expression" => self.lower_binary(node),
            "unary_expression" => {
                let operator = field(node, "operator")?;
                let operand = self.lower_expr(field(node, "operand")?)?;
                match self.text(operator) {
                    "!" => Ok(Expr::unary(UnaryOp::Not, operand)),
                    "-" => Ok(Expr::unary(UnaryOp::Neg, operand)),
                    "+" => Ok(operand),
                    _ => Err(unsupported("bitwise operator", operator)),
                }
            }

            // Access
            "method_invocation" => self.lower_method_invocation(node),
            "field_access" => {
                let object = field(node, "object")?;
                if object.kind() == "super" {
                    return Err(unsupported("inheritance", object));
                }
                let object = self.lower_expr(object)?;
                let name = self.text(field(node, "field")?);
                Ok(attribute_access(Language::Java, object, name))
            }
            "array_access" => {
                let object = self.lower_expr(field(node, "array")?)?;
                let key = self.lower_expr(field(node, "index")?)?;
                subscript(Language::Java, object, key, node)
            }
            "object_creation_expression" => self.lower_object_creation(node),

            "parenthesized_expression" => {
                self.lower_expr(only_child(node, "parenthesized expression")?)
            }

            "lambda_expression" | "method_reference" => {
                Err(unsupported("function expression", node))
            }
            "ternary_expression" => Err(unsupported("conditional expression", node)),
            "cast_expression" => Err(unsupported("cast", node)),
            "instanceof_expression" => Err(unsupported("instanceof", node)),
            "array_creation_expression" | "array_initializer" => {
                Err(unsupported("array literal", node))
            }
            "assignment_expression" => Err(unsupported("assignment inside an expression", node)),
            "update_expression" => Err(unsupported("increment inside an expression", node)),
            _ => Err(unsupported_kind(node)),
        }
    }

    fn lower_binary(&self, node: Node) -> Result<Expr, LowerError> {
        let operator = field(node, "operator")?;
        let op = match self.text(operator) {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Mod,
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::Ne,
            "<" => BinaryOp::Lt,
            "<=" => BinaryOp::Le,
            ">" => BinaryOp::Gt,
            ">=" => BinaryOp::Ge,
            "&&" => BinaryOp::And,
            "||" => BinaryOp::Or,
            _ => return Err(unsupported("bitwise operator", operator)),
        };
        let left = self.lower_expr(field(node, "left")?)?;
        let right = self.lower_expr(field(node, "right")?)?;
        Ok(Expr::binary(left, op, right))
    }

    fn lower_method_invocation(&self, node: Node) -> Result<Expr, LowerError> {
        let name = self.text(field(node, "name")?);
        let args = self.lower_arguments(field(node, "arguments")?)?;

        let Some(object) = node.child_by_field_name("object") else {
            return Ok(free_call(Language::Java, name, args));
        };
        if object.kind() == "super" {
            return Err(unsupported("inheritance", object));
        }
        let receiver = self.lower_expr(object)?;

        let qualified = dotted_path(&receiver).map(|path| format!("{path}.{name}"));
        match qualified.as_deref() {
            Some("List.of" | "Arrays.asList") => Ok(Expr::List(args)),
            Some("Map.of") => {
                if args.len() % 2 != 0 {
                    return Err(unsupported("odd argument count to Map.of", node));
                }
                let mut entries = Vec::with_capacity(args.len() / 2);
                let mut args = args.into_iter();
                while let (Some(key), Some(value)) = (args.next(), args.next()) {
                    entries.push((key, value));
                }
                Ok(Expr::Dict(entries))
            }
            Some("Map.ofEntries") => {
                let mut entries = Vec::with_capacity(args.len());
                for arg in args {
                    match arg {
                        Expr::Call {
                            callee: Callee::Method { receiver, name },
                            args,
                        } if *receiver == Expr::name("Map") && name == "entry" && args.len() == 2 => {
                            let mut pair = args.into_iter();
                            if let (Some(key), Some(value)) = (pair.next(), pair.next()) {
                                entries.push((key, value));
                            }
                        }
                        _ => return Err(unsupported("map entry", node)),
                    }
                }
                Ok(Expr::Dict(entries))
            }
            _ => Ok(method_call(Language::Java, receiver, name, args)),
        }
    }

    /// `new ArrayList<>()` and `new HashMap<>()` are collection literals;
    /// anything else instantiates a class.
    fn lower_object_creation(&self, node: Node) -> Result<Expr, LowerError> {
        if let Some(body) = named_children(node)
            .into_iter()
            .find(|child| child.kind() == "class_body")
        {
            return Err(unsupported("anonymous class", body));
        }
        let type_node = field(node, "type")?;
        let type_node = if type_node.kind() == "generic_type" {
            named_children(type_node)
                .first()
                .copied()
                .ok_or_else(|| unsupported_kind(type_node))?
        } else {
            type_node
        };
        let class = self.text(type_node).rsplit('.').next().unwrap_or_default();
        let mut args = self.lower_arguments(field(node, "arguments")?)?;

        let wrong_argument = || unsupported("collection constructor argument", node);
        match class {
            "ArrayList" | "LinkedList" => match args.pop() {
                None => Ok(Expr::List(Vec::new())),
                Some(list @ Expr::List(_)) if args.is_empty() => Ok(list),
                Some(_) => Err(wrong_argument()),
            },
            "HashMap" | "LinkedHashMap" | "TreeMap" => match args.pop() {
                None => Ok(Expr::Dict(Vec::new())),
                Some(dict @ Expr::Dict(_)) if args.is_empty() => Ok(dict),
                Some(_) => Err(wrong_argument()),
            },
            _ => Ok(Expr::new_object(class, args)),
        }
    }

    fn lower_arguments(&self, node: Node) -> Result<Vec<Expr>, LowerError> {
        named_children(node)
            .into_iter()
            .map(|child| self.lower_expr(child))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::BuiltinOp;

    fn lower(source: &str) -> Module {
        read_java(source).unwrap()
    }

    fn unsupported_construct(source: &str) -> String {
        match read_java(source).unwrap_err() {
            TranslateError::Lower(LowerError::Unsupported { construct, .. }) => construct,
            other => panic!("expected unsupported construct, got {other:?}"),
        }
    }

    #[test]
    fn test_wrapper_class_unwraps() {
        let ir = lower(
            "public class Main {\n    public static int twice(int x) {\n        return x * 2;\n    }\n\n    public static void main(String[] args) {\n        System.out.println(twice(3));\n    }\n}\n",
        );
        assert_eq!(ir.functions().count(), 1);
        assert_eq!(ir.classes().count(), 0);
        assert_eq!(
            ir.statements().next(),
            Some(&Stmt::expr(Expr::builtin(
                BuiltinOp::Print,
                vec![Expr::call("twice", vec![Expr::int(3)])],
            )))
        );
    }

    #[test]
    fn test_overloads_fold_into_defaults() {
        let ir = lower(
            "class Main {\n    static int add(int a, int b) { return a + b; }\n    static int add(int a) { return add(a, 0); }\n}\n",
        );
        let add = ir.functions().next().unwrap();
        assert_eq!(
            add.params,
            vec![Param::new("a"), Param::with_default("b", Expr::int(0))]
        );
        assert_eq!(ir.functions().count(), 1);
    }

    #[test]
    fn test_unrelated_overloads_rejected() {
        assert_eq!(
            unsupported_construct(
                "class Main {\n    static int f(int a) { return a; }\n    static int f(int a, int b) { return a * b; }\n}\n"
            ),
            "method overloading"
        );
    }

    #[test]
    fn test_class_with_constructor_chain() {
        let ir = lower(
            "class Point {\n    private Object x;\n    public Point(Object x) { this.x = x; }\n    public Point() { this(0); }\n    public Object getX() { return this.x; }\n}\n",
        );
        let class = ir.classes().next().unwrap();
        let ctor = class.constructor.as_ref().unwrap();
        assert_eq!(ctor.params, vec![Param::with_default("x", Expr::int(0))]);
        assert_eq!(
            ctor.body,
            vec![Stmt::assign_attr(Expr::SelfRef, "x", Expr::name("x"))]
        );
        assert_eq!(class.methods[0].name, "getX");
    }

    #[test]
    fn test_collections() {
        let ir = lower(
            "class Main {\n    public static void main(String[] args) {\nvar xs = new ArrayList<>(List.of(1, 2));\nvar m = new HashMap<>();\nm.put(\"a\", xs.size());\nxs.add(m.get(\"a\"));\n    }\n}\n",
        );
        let stmts: Vec<_> = ir.statements().cloned().collect();
        assert_eq!(
            stmts[0],
            Stmt::assign("xs", Expr::List(vec![Expr::int(1), Expr::int(2)]))
        );
        assert_eq!(stmts[1], Stmt::assign("m", Expr::Dict(vec![])));
        assert_eq!(
            stmts[2],
            Stmt::expr(Expr::builtin(
                BuiltinOp::DictSet,
                vec![
                    Expr::name("m"),
                    Expr::string("a"),
                    Expr::builtin(BuiltinOp::Len, vec![Expr::name("xs")]),
                ],
            ))
        );
        assert!(matches!(
            &stmts[3],
            Stmt::Expr(Expr::Call { callee: Callee::Builtin(BuiltinOp::Append), args }) if args.len() == 2
        ));
    }

    #[test]
    fn test_counting_and_enhanced_for() {
        let ir = lower("class Main {\n    public static void main(String[] args) {\nfor (int i = 0; i < 10; i++) { total += i; }\nfor (var x : xs) { f(x); }\n    }\n}\n");
        assert!(matches!(&ir.items[0], Item::Stmt(Stmt::ForRange { var, .. }) if var == "i"));
        assert!(matches!(&ir.items[1], Item::Stmt(Stmt::For { var, .. }) if var == "x"));
    }

    #[test]
    fn test_literal_suffixes() {
        let ir = lower("class Main {\n    public static void main(String[] args) {\nlong a = 10L;\ndouble b = 2.5d;\nchar c = 'c';\n    }\n}\n");
        let values: Vec<_> = ir
            .statements()
            .map(|stmt| match stmt {
                Stmt::Assign { value, .. } => value.clone(),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(values, vec![Expr::int(10), Expr::float(2.5), Expr::string("c")]);
    }

    fn main_values(body: &str) -> Vec<Expr> {
        let source = format!("class Main {{\n    public static void main(String[] args) {{\n{body}\n    }}\n}}\n");
        lower(&source)
            .statements()
            .map(|stmt| match stmt {
                Stmt::Assign { value, .. } => value.clone(),
                other => panic!("unexpected {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_integer_radixes() {
        let values = main_values("var a = 017;\nvar b = 0x1F;\nvar c = 0b101;\nvar d = 0;\nvar e = 00;");
        assert_eq!(
            values,
            vec![Expr::int(15), Expr::int(31), Expr::int(5), Expr::int(0), Expr::int(0)]
        );
    }

    #[test]
    fn test_string_escapes() {
        let values = main_values("var s = \"\\001\\t\\u0041\\s\\1012\";");
        assert_eq!(values, vec![Expr::string("\u{1}\tA A2")]);

        let err = read_java("class Main {\n    public static void main(String[] args) {\nvar s = \"\\d\";\n    }\n}\n")
            .unwrap_err();
        assert!(
            matches!(err, TranslateError::Lower(LowerError::InvalidLiteral { .. })),
            "{err:?}"
        );
    }

    #[test]
    fn test_counting_loop_must_keep_counter_and_bound() {
        let wrap = |body: &str| {
            format!("class Main {{\n    public static void main(String[] args) {{\n{body}\n    }}\n}}\n")
        };
        let moving = "counting loop that changes its counter or bound";
        assert_eq!(
            unsupported_construct(&wrap("for (int i = 0; i < 6; i++) { System.out.println(i); i++; }")),
            moving
        );
        assert_eq!(
            unsupported_construct(&wrap("for (int i = 0; i < xs.size(); i++) { xs.add(i); }")),
            moving
        );
        assert_eq!(
            unsupported_construct(&wrap("int i;\nfor (i = 0; i < 3; i++) { f(i); }")),
            "C-style for loop over an outer variable"
        );
        let ir = lower(&wrap("for (int i = 0; i < xs.size(); i++) { f(xs.get(i)); }"));
        assert!(matches!(&ir.items[0], Item::Stmt(Stmt::ForRange { .. })));
    }

    #[test]
    fn test_unsupported_constructs() {
        assert_eq!(
            unsupported_construct("class A extends B { void f() {} }"),
            "inheritance"
        );
        assert_eq!(
            unsupported_construct(
                "class Main {\n    public static void main(String[] args) {\n        int x = c ? 1 : 2;\n    }\n}\n"
            ),
            "conditional expression"
        );
        assert_eq!(
            unsupported_construct(
                "class Main {\n    public static void main(String[] args) {\n        try { f(); } catch (Exception e) { }\n    }\n}\n"
            ),
            "exception handling"
        );
        assert_eq!(
            unsupported_construct("class A { int n = 0; }"),
            "field initializer"
        );
    }
}
