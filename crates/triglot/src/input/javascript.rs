//! Tree-sitter based JavaScript reader.

use super::{
    attribute_access, check_params, field, free_call, has_token, method_call, named_children,
    node_text, only_child, parse_float, parse_int, parse_source, position, subscript,
    subscript_assign, unescape, unsupported, unsupported_kind, update_step,
};
use crate::error::{LowerError, ParseError, TranslateError};
use crate::ir::walk::counting_loop_is_stable;
use crate::ir::*;
use crate::language::Language;
use crate::traits::Reader;
use tree_sitter::{Node, Tree};

/// Static instance of the JavaScript reader for registry.
pub static JAVASCRIPT_READER: JavaScriptReader = JavaScriptReader;

/// JavaScript reader using tree-sitter.
pub struct JavaScriptReader;

impl Reader for JavaScriptReader {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn parse(&self, source: &str) -> Result<Tree, ParseError> {
        parse_source(
            Language::JavaScript,
            arborium_javascript::language().into(),
            source,
        )
    }

    fn lower(&self, tree: &Tree, source: &str) -> Result<Module, LowerError> {
        LowerContext::new(source).lower_program(tree.root_node())
    }
}

/// Parse and lower JavaScript source.
pub fn read_javascript(source: &str) -> Result<Module, TranslateError> {
    JAVASCRIPT_READER.read(source)
}

#[derive(Clone, Copy)]
struct LowerContext<'a> {
    source: &'a str,
    /// Inside a class member, where `this` is the receiver.
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
        for child in named_children(root) {
            match child.kind() {
                "function_declaration" => items.push(Item::Function(self.lower_function(child)?)),
                "class_declaration" => items.push(Item::Class(self.lower_class(child)?)),
                "hash_bang_line" => {}
                _ => {
                    let mut stmts = Vec::new();
                    self.lower_stmt_into(child, &mut stmts)?;
                    items.extend(stmts.into_iter().map(Item::Stmt));
                }
            }
        }
        Ok(Module::new(items))
    }

    // ---- definitions ----

    fn lower_function(&self, node: Node) -> Result<FunctionDef, LowerError> {
        if has_token(node, "async") {
            return Err(unsupported("async function", node));
        }
        let name = self.text(field(node, "name")?);
        let params_node = field(node, "parameters")?;
        let params = self.lower_parameters(params_node)?;
        check_params(name, &params, params_node)?;
        let body = self.lower_body(field(node, "body")?)?;
        Ok(FunctionDef::new(name, params, body).at(position(node)))
    }

    fn lower_parameters(&self, node: Node) -> Result<Vec<Param>, LowerError> {
        let mut params = Vec::new();
        for child in named_children(node) {
            let param = match child.kind() {
                "identifier" => Param::new(self.text(child)),
                "assignment_pattern" => {
                    let name = field(child, "left")?;
                    if name.kind() != "identifier" {
                        return Err(unsupported("destructuring parameter", name));
                    }
                    let default = self.lower_expr(field(child, "right")?)?;
                    Param::with_default(self.text(name), default)
                }
                "rest_pattern" => return Err(unsupported("rest parameter", child)),
                "object_pattern" | "array_pattern" => {
                    return Err(unsupported("destructuring parameter", child));
                }
                _ => return Err(unsupported_kind(child)),
            };
            params.push(param);
        }
        Ok(params)
    }

    fn lower_class(&self, node: Node) -> Result<ClassDef, LowerError> {
        let name = self.text(field(node, "name")?);
        for child in named_children(node) {
            match child.kind() {
                "class_heritage" => return Err(unsupported("inheritance", child)),
                "decorator" => return Err(unsupported("decorator", child)),
                _ => {}
            }
        }

        let member_ctx = LowerContext {
            in_method: true,
            ..*self
        };
        let mut constructor = None;
        let mut methods = Vec::new();
        for member in named_children(field(node, "body")?) {
            if member.kind() != "method_definition" {
                return Err(match member.kind() {
                    "field_definition" => unsupported("class field", member),
                    "class_static_block" => unsupported("static block", member),
                    _ => unsupported_kind(member),
                });
            }
            for (token, construct) in [
                ("static", "static method"),
                ("get", "accessor"),
                ("set", "accessor"),
                ("async", "async method"),
                ("*", "generator method"),
            ] {
                if has_token(member, token) {
                    return Err(unsupported(construct, member));
                }
            }

            let name_node = field(member, "name")?;
            if name_node.kind() != "property_identifier" {
                return Err(unsupported("computed or private method name", name_node));
            }
            let method_name = self.text(name_node);
            let params_node = field(member, "parameters")?;
            let params = member_ctx.lower_parameters(params_node)?;
            check_params(method_name, &params, params_node)?;
            let body = member_ctx.lower_body(field(member, "body")?)?;

            if method_name == "constructor" {
                if constructor.is_some() {
                    return Err(unsupported("second constructor", member));
                }
                constructor = Some(FunctionDef::new(name, params, body).at(position(member)));
            } else {
                methods.push(FunctionDef::new(method_name, params, body).at(position(member)));
            }
        }

        Ok(ClassDef::new(name, constructor, methods).at(position(node)))
    }

    // ---- statements ----

    /// Statements of a block, or a single unbraced statement.
    fn lower_body(&self, node: Node) -> Result<Vec<Stmt>, LowerError> {
        let mut stmts = Vec::new();
        if node.kind() == "statement_block" {
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
            "expression_statement" => out.push(self.lower_expression_statement(node)?),

            // Declarations: `let x = v` assigns, `let x;` declares nothing
            "lexical_declaration" | "variable_declaration" => {
                for declarator in named_children(node) {
                    let name = field(declarator, "name")?;
                    if name.kind() != "identifier" {
                        return Err(unsupported("destructuring declaration", name));
                    }
                    if let Some(value) = declarator.child_by_field_name("value") {
                        out.push(Stmt::assign(self.text(name), self.lower_expr(value)?));
                    }
                }
            }

            // Control flow
            "if_statement" => {
                let cond = self.lower_expr(field(node, "condition")?)?;
                let then_body = self.lower_body(field(node, "consequence")?)?;
                let else_body = match node.child_by_field_name("alternative") {
                    Some(clause) => self.lower_body(only_child(clause, "else clause")?)?,
                    None => Vec::new(),
                };
                out.push(Stmt::if_stmt(cond, then_body, else_body));
            }
            "while_statement" => {
                let cond = self.lower_expr(field(node, "condition")?)?;
                let body = self.lower_body(field(node, "body")?)?;
                out.push(Stmt::while_loop(cond, body));
            }
            "for_in_statement" => out.push(self.lower_for_of(node)?),
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
            "empty_statement" => {}

            "function_declaration" => return Err(unsupported("nested function", node)),
            "generator_function_declaration" => {
                return Err(unsupported("generator function", node));
            }
            "class_declaration" => return Err(unsupported("nested class", node)),
            "statement_block" => return Err(unsupported("bare block", node)),
            "do_statement" => return Err(unsupported("do-while loop", node)),
            "try_statement" | "throw_statement" => {
                return Err(unsupported("exception handling", node));
            }
            "import_statement" | "export_statement" => {
                return Err(unsupported("module import or export", node));
            }
            _ => return Err(unsupported_kind(node)),
        }
        Ok(())
    }

    fn lower_expression_statement(&self, node: Node) -> Result<Stmt, LowerError> {
        let child = only_child(node, "expression statement")?;
        match child.kind() {
            "assignment_expression" => {
                let value = self.lower_expr(field(child, "right")?)?;
                self.assign_to(field(child, "left")?, value)
            }
            "augmented_assignment_expression" => {
                let operator = field(child, "operator")?;
                let op = match self.text(operator) {
                    "+=" => BinaryOp::Add,
                    "-=" => BinaryOp::Sub,
                    "*=" => BinaryOp::Mul,
                    "/=" => BinaryOp::Div,
                    "%=" => BinaryOp::Mod,
                    other => return Err(unsupported(format!("`{other}` assignment"), operator)),
                };
                let left = field(child, "left")?;
                let right = self.lower_expr(field(child, "right")?)?;
                self.assign_to(left, Expr::binary(self.lower_target_value(left)?, op, right))
            }
            "update_expression" => {
                let step = update_step(child).ok_or_else(|| unsupported_kind(child))?;
                let target = field(child, "argument")?;
                let (op, amount) = if step > 0 {
                    (BinaryOp::Add, step)
                } else {
                    (BinaryOp::Sub, -step)
                };
                let value = Expr::binary(self.lower_target_value(target)?, op, Expr::int(amount));
                self.assign_to(target, value)
            }
            "sequence_expression" => Err(unsupported("comma expression", child)),
            _ => Ok(Stmt::expr(self.lower_expr(child)?)),
        }
    }

    /// Current value of an assignment target, for `x += y` desugaring.
    fn lower_target_value(&self, target: Node) -> Result<Expr, LowerError> {
        match target.kind() {
            "identifier" | "member_expression" => self.lower_expr(target),
            _ => Err(unsupported("compound assignment target", target)),
        }
    }

    fn assign_to(&self, target: Node, value: Expr) -> Result<Stmt, LowerError> {
        match target.kind() {
            "identifier" => Ok(Stmt::assign(self.text(target), value)),
            "member_expression" => {
                let object = self.lower_expr(field(target, "object")?)?;
                let property = field(target, "property")?;
                if property.kind() != "property_identifier" {
                    return Err(unsupported("private field", property));
                }
                Ok(Stmt::assign_attr(object, self.text(property), value))
            }
            "subscript_expression" => {
                let object = self.lower_expr(field(target, "object")?)?;
                let key = self.lower_expr(field(target, "index")?)?;
                let call = subscript_assign(Language::JavaScript, object, key, value, target)?;
                Ok(Stmt::expr(call))
            }
            "object_pattern" | "array_pattern" => {
                Err(unsupported("destructuring assignment", target))
            }
            _ => Err(unsupported_kind(target)),
        }
    }

    fn lower_for_of(&self, node: Node) -> Result<Stmt, LowerError> {
        if has_token(node, "await") {
            return Err(unsupported("for-await loop", node));
        }
        if !has_token(node, "of") {
            return Err(unsupported("for-in loop", node));
        }
        let left = field(node, "left")?;
        if left.kind() != "identifier" {
            return Err(unsupported("destructuring loop target", left));
        }
        let iterable = self.lower_expr(field(node, "right")?)?;
        let body = self.lower_body(field(node, "body")?)?;
        Ok(Stmt::for_each(self.text(left), iterable, body))
    }

    /// `for (let i = a; i < b; i++)` is the only accepted C-style loop.
    fn lower_counting_for(&self, node: Node) -> Result<Stmt, LowerError> {
        let not_counting = || unsupported("C-style for loop", node);

        let init = field(node, "initializer")?;
        let (var, start) = match init.kind() {
            "lexical_declaration" | "variable_declaration" => {
                let declarators = named_children(init);
                let [declarator] = declarators.as_slice() else {
                    return Err(not_counting());
                };
                let declarator = *declarator;
                let name = field(declarator, "name")?;
                let value = declarator.child_by_field_name("value").ok_or_else(not_counting)?;
                (name, value)
            }
            "expression_statement" | "assignment_expression" => {
                return Err(unsupported("C-style for loop over an outer variable", node));
            }
            _ => return Err(not_counting()),
        };
        if var.kind() != "identifier" {
            return Err(not_counting());
        }
        let var = self.text(var);

        let mut cond = field(node, "condition")?;
        if cond.kind() == "expression_statement" {
            cond = only_child(cond, "C-style for loop")?;
        }
        let bounded = cond.kind() == "binary_expression"
            && self.text(field(cond, "operator")?) == "<"
            && self.text(field(cond, "left")?) == var;
        if !bounded {
            return Err(not_counting());
        }

        let increment = node.child_by_field_name("increment").ok_or_else(not_counting)?;
        if !self.increments_by_one(increment, var)? {
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

    /// `i++`, `++i`, `i += 1` or `i = i + 1`.
    fn increments_by_one(&self, node: Node, var: &str) -> Result<bool, LowerError> {
        let is_var = |n: Node| n.kind() == "identifier" && self.text(n) == var;
        let is_one = |n: Node| n.kind() == "number" && self.text(n) == "1";
        Ok(match node.kind() {
            "update_expression" => update_step(node) == Some(1) && is_var(field(node, "argument")?),
            "augmented_assignment_expression" => {
                self.text(field(node, "operator")?) == "+="
                    && is_var(field(node, "left")?)
                    && is_one(field(node, "right")?)
            }
            "assignment_expression" => {
                let right = field(node, "right")?;
                is_var(field(node, "left")?)
                    && right.kind() == "binary_expression"
                    && self.text(field(right, "operator")?) == "+"
                    && is_var(field(right, "left")?)
                    && is_one(field(right, "right")?)
            }
            _ => false,
        })
    }

    // ---- expressions ----

    fn lower_expr(&self, node: Node) -> Result<Expr, LowerError> {
        match node.kind() {
            // Literals
            "number" => {
                let text = self.text(node);
                if text.ends_with('n') {
                    return Err(unsupported("bigint literal", node));
                }
                let lower = text.to_ascii_lowercase();
                let radix_prefixed = ["0x", "0o", "0b"].iter().any(|p| lower.starts_with(p));
                if !radix_prefixed && (lower.contains('.') || lower.contains('e')) {
                    parse_float(text, node)
                } else {
                    parse_int(text, Language::JavaScript, node)
                }
            }
            "string" => {
                let text = self.text(node);
                let body = text.get(1..text.len().saturating_sub(1)).unwrap_or("");
                unescape(body, Language::JavaScript, node).map(Expr::string)
            }
            "template_string" => {
                if let Some(sub) = named_children(node)
                    .into_iter()
                    .find(|child| child.kind() == "template_substitution")
                {
                    return Err(unsupported("template literal substitution", sub));
                }
                let text = self.text(node);
                let body = text.get(1..text.len().saturating_sub(1)).unwrap_or("");
                unescape(body, Language::JavaScript, node).map(Expr::string)
            }
            "true" => Ok(Expr::bool(true)),
            "false" => Ok(Expr::bool(false)),
            "null" | "undefined" => Ok(Expr::null()),
            "identifier" => match self.text(node) {
                "undefined" => Ok(Expr::null()),
                name => Ok(Expr::name(name)),
            },
            "this" => {
                if self.in_method {
                    Ok(Expr::SelfRef)
                } else {
                    Err(unsupported("`this` outside a method", node))
                }
            }

            // Operators
            "binary_expression" => self.lower_binary(node),
            "unary_expression" => {
                let operator = field(node, "operator")?;
                let operand = self.lower_expr(field(node, "argument")?)?;
                match self.text(operator) {
                    "!" => Ok(Expr::unary(UnaryOp::Not, operand)),
                    "-" => Ok(Expr::unary(UnaryOp::Neg, operand)),
                    "+" => Err(unsupported("numeric conversion", operator)),
                    "~" => Err(unsupported("bitwise operator", operator)),
                    other => Err(unsupported(format!("`{other}` operator"), operator)),
                }
            }

            // Access
            "call_expression" => self.lower_call(node),
            "member_expression" => {
                if has_token(node, "?.") || node.child_by_field_name("optional_chain").is_some() {
                    return Err(unsupported("optional chaining", node));
                }
                let object = self.lower_expr(field(node, "object")?)?;
                let property = field(node, "property")?;
                if property.kind() != "property_identifier" {
                    return Err(unsupported("private field", property));
                }
                Ok(attribute_access(Language::JavaScript, object, self.text(property)))
            }
            "subscript_expression" => {
                let object = self.lower_expr(field(node, "object")?)?;
                let key = self.lower_expr(field(node, "index")?)?;
                subscript(Language::JavaScript, object, key, node)
            }
            "new_expression" => {
                let constructor = field(node, "constructor")?;
                if constructor.kind() != "identifier" {
                    return Err(unsupported("computed constructor", constructor));
                }
                let args = match node.child_by_field_name("arguments") {
                    Some(arguments) => self.lower_arguments(arguments)?,
                    None => Vec::new(),
                };
                Ok(Expr::new_object(self.text(constructor), args))
            }

            // Collections
            "array" => {
                let mut elements = Vec::new();
                for child in named_children(node) {
                    if child.kind() == "spread_element" {
                        return Err(unsupported("spread element", child));
                    }
                    elements.push(self.lower_expr(child)?);
                }
                Ok(Expr::List(elements))
            }
            "object" => self.lower_object(node),

            "parenthesized_expression" => self.lower_expr(only_child(node, "comma expression")?),

            "arrow_function" | "function_expression" | "function" | "generator_function" => {
                Err(unsupported("function expression", node))
            }
            "ternary_expression" => Err(unsupported("conditional expression", node)),
            "assignment_expression" | "augmented_assignment_expression" => {
                Err(unsupported("assignment inside an expression", node))
            }
            "update_expression" => Err(unsupported("increment inside an expression", node)),
            "await_expression" => Err(unsupported("await expression", node)),
            "regex" => Err(unsupported("regular expression literal", node)),
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
            "===" | "==" => BinaryOp::Eq,
            "!==" | "!=" => BinaryOp::Ne,
            "<" => BinaryOp::Lt,
            "<=" => BinaryOp::Le,
            ">" => BinaryOp::Gt,
            ">=" => BinaryOp::Ge,
            "&&" => BinaryOp::And,
            "||" => BinaryOp::Or,
            "**" => return Err(unsupported("exponentiation", operator)),
            "??" => return Err(unsupported("nullish coalescing", operator)),
            "in" => return Err(unsupported("membership test", operator)),
            "instanceof" => return Err(unsupported("instanceof", operator)),
            _ => return Err(unsupported("bitwise operator", operator)),
        };
        let left = self.lower_expr(field(node, "left")?)?;
        let right = self.lower_expr(field(node, "right")?)?;
        Ok(Expr::binary(left, op, right))
    }

    fn lower_call(&self, node: Node) -> Result<Expr, LowerError> {
        if node.child_by_field_name("optional_chain").is_some() || has_token(node, "?.") {
            return Err(unsupported("optional chaining", node));
        }
        let function = field(node, "function")?;
        let arguments = field(node, "arguments")?;
        if arguments.kind() != "arguments" {
            return Err(unsupported("tagged template", arguments));
        }
        let args = self.lower_arguments(arguments)?;

        match function.kind() {
            "identifier" => Ok(free_call(Language::JavaScript, self.text(function), args)),
            "member_expression" => {
                let receiver = self.lower_expr(field(function, "object")?)?;
                let property = field(function, "property")?;
                if property.kind() != "property_identifier" {
                    return Err(unsupported("private method", property));
                }
                Ok(method_call(
                    Language::JavaScript,
                    receiver,
                    self.text(property),
                    args,
                ))
            }
            _ => Err(unsupported("call of a computed callee", function)),
        }
    }

    fn lower_arguments(&self, node: Node) -> Result<Vec<Expr>, LowerError> {
        let mut args = Vec::new();
        for child in named_children(node) {
            if child.kind() == "spread_element" {
                return Err(unsupported("spread argument", child));
            }
            args.push(self.lower_expr(child)?);
        }
        Ok(args)
    }

    fn lower_object(&self, node: Node) -> Result<Expr, LowerError> {
        let mut entries = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "pair" => {
                    let key_node = field(child, "key")?;
                    let key = match key_node.kind() {
                        "property_identifier" => Expr::string(self.text(key_node)),
                        "computed_property_name" => {
                            self.lower_expr(only_child(key_node, "computed key")?)?
                        }
                        _ => self.lower_expr(key_node)?,
                    };
                    entries.push((key, self.lower_expr(field(child, "value")?)?));
                }
                "shorthand_property_identifier" => {
                    let name = self.text(child);
                    entries.push((Expr::string(name), Expr::name(name)));
                }
                "method_definition" => return Err(unsupported("object method", child)),
                "spread_element" => return Err(unsupported("spread element", child)),
                _ => return Err(unsupported_kind(child)),
            }
        }
        Ok(Expr::Dict(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::BuiltinOp;

    fn lower(source: &str) -> Module {
        read_javascript(source).unwrap()
    }

    fn unsupported_construct(source: &str) -> String {
        match read_javascript(source).unwrap_err() {
            TranslateError::Lower(LowerError::Unsupported { construct, .. }) => construct,
            other => panic!("expected unsupported construct, got {other:?}"),
        }
    }

    #[test]
    fn test_declarations_become_assignments() {
        let ir = lower("let x = 1, y;\nconst z = x;");
        assert_eq!(
            ir.items,
            vec![
                Item::Stmt(Stmt::assign("x", Expr::int(1))),
                Item::Stmt(Stmt::assign("z", Expr::name("x"))),
            ]
        );
    }

    #[test]
    fn test_console_log_and_length() {
        let ir = lower("console.log(xs.length);");
        assert_eq!(
            ir.items,
            vec![Item::Stmt(Stmt::expr(Expr::builtin(
                BuiltinOp::Print,
                vec![Expr::builtin(BuiltinOp::Len, vec![Expr::name("xs")])],
            )))]
        );
    }

    #[test]
    fn test_strict_and_loose_equality_agree() {
        let strict = lower("a === b;");
        let loose = lower("a == b;");
        assert_eq!(strict, loose);
    }

    #[test]
    fn test_counting_loop() {
        let ir = lower("for (let i = 0; i < n; i++) { total += i; }");
        let Item::Stmt(Stmt::ForRange { var, start, stop, body }) = &ir.items[0] else {
            panic!("expected ForRange, got {:?}", ir.items[0]);
        };
        assert_eq!(var, "i");
        assert_eq!(*start, Expr::int(0));
        assert_eq!(*stop, Expr::name("n"));
        assert_eq!(
            body[0],
            Stmt::assign(
                "total",
                Expr::binary(Expr::name("total"), BinaryOp::Add, Expr::name("i")),
            )
        );
    }

    #[test]
    fn test_for_of_and_else_if() {
        let ir = lower("for (const x of xs) { if (x > 1) { f(x); } else if (x < 0) { g(); } }");
        let Item::Stmt(Stmt::For { var, body, .. }) = &ir.items[0] else {
            panic!("expected For");
        };
        assert_eq!(var, "x");
        assert!(matches!(
            body.as_slice(),
            [Stmt::If { else_body, .. }] if matches!(else_body.as_slice(), [Stmt::If { .. }])
        ));
    }

    #[test]
    fn test_class_with_this() {
        let ir = lower(
            "class Counter {\n  constructor(start = 0) { this.n = start; }\n  inc() { this.n += 1; return this.n; }\n}\nconst c = new Counter();",
        );
        let class = ir.classes().next().unwrap();
        assert_eq!(class.constructor.as_ref().unwrap().name, "Counter");
        assert_eq!(class.fields(), vec!["n"]);
        assert_eq!(
            ir.statements().next(),
            Some(&Stmt::assign("c", Expr::new_object("Counter", vec![])))
        );
    }

    #[test]
    fn test_object_literal_keys() {
        let ir = lower("const d = {a: 1, \"b\": 2};\nd[\"c\"] = d.a;");
        let stmts: Vec<_> = ir.statements().cloned().collect();
        assert_eq!(
            stmts[0],
            Stmt::assign(
                "d",
                Expr::Dict(vec![
                    (Expr::string("a"), Expr::int(1)),
                    (Expr::string("b"), Expr::int(2)),
                ]),
            )
        );
        assert!(matches!(
            &stmts[1],
            Stmt::Expr(Expr::Call { callee: Callee::Builtin(BuiltinOp::DictSet), .. })
        ));
    }

    #[test]
    fn test_numbers() {
        let ir = lower("a = 1.5; b = 0x10; c = 1e3; d = 017; e = 019;");
        let values: Vec<_> = ir
            .statements()
            .map(|stmt| match stmt {
                Stmt::Assign { value, .. } => value.clone(),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            values,
            vec![
                Expr::float(1.5),
                Expr::int(16),
                Expr::float(1000.0),
                Expr::int(15),
                Expr::int(19),
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        let ir = lower("s = \"\\d\\x41\\101\\0\\u{1F600}\";");
        assert_eq!(
            ir.items,
            vec![Item::Stmt(Stmt::assign("s", Expr::string("dAA\0\u{1F600}")))]
        );
    }

    #[test]
    fn test_counting_loop_must_keep_counter_and_bound() {
        let moving = "counting loop that changes its counter or bound";
        assert_eq!(
            unsupported_construct("for (let i = 0; i < 6; i++) { console.log(i); i++; }"),
            moving
        );
        assert_eq!(
            unsupported_construct("for (let i = 0; i < n; i++) { n = n - 1; }"),
            moving
        );
        assert_eq!(
            unsupported_construct("for (let i = 0; i < xs.length; i++) { xs.push(i); }"),
            moving
        );
        assert_eq!(
            unsupported_construct("let i; for (i = 0; i < 3; i++) { f(i); }"),
            "C-style for loop over an outer variable"
        );
    }

    #[test]
    fn test_unsupported_constructs() {
        assert_eq!(unsupported_construct("const f = (x) => x;"), "function expression");
        assert_eq!(unsupported_construct("for (const k in obj) {}"), "for-in loop");
        assert_eq!(
            unsupported_construct("for (let i = 0; i < n; i += 2) {}"),
            "C-style for loop"
        );
        assert_eq!(unsupported_construct("x = `a${b}`;"), "template literal substitution");
        assert_eq!(unsupported_construct("this.x = 1;"), "`this` outside a method");
        assert_eq!(unsupported_construct("class A extends B {}"), "inheritance");
        assert_eq!(unsupported_construct("try { f(); } catch (e) {}"), "exception handling");
    }

    #[test]
    fn test_syntax_error_is_parse_error() {
        let err = read_javascript("function (").unwrap_err();
        assert!(matches!(err, TranslateError::Parse(_)));
    }
}
