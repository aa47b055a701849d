//! Tree-sitter based Python reader.

use super::{
    attribute_access, check_params, field, field_children, free_call, has_token, method_call,
    named_children, node_text, only_child, parse_float, parse_int, parse_source, position,
    subscript, subscript_assign, unescape, unsupported, unsupported_kind,
};
use crate::error::{LowerError, ParseError, TranslateError};
use crate::ir::*;
use crate::language::Language;
use crate::traits::Reader;
use std::collections::HashSet;
use tree_sitter::{Node, Tree};

/// Static instance of the Python reader for registry.
pub static PYTHON_READER: PythonReader = PythonReader;

/// Python reader using tree-sitter.
pub struct PythonReader;

impl Reader for PythonReader {
    fn language(&self) -> Language {
        Language::Python
    }

    fn parse(&self, source: &str) -> Result<Tree, ParseError> {
        parse_source(Language::Python, arborium_python::language().into(), source)
    }

    fn lower(&self, tree: &Tree, source: &str) -> Result<Module, LowerError> {
        let root = tree.root_node();
        let classes = collect_class_names(root, source);
        LowerContext::new(source, &classes).lower_module(root)
    }
}

/// Parse and lower Python source.
pub fn read_python(source: &str) -> Result<Module, TranslateError> {
    PYTHON_READER.read(source)
}

/// Names of top-level classes; calls to these lower to `New`.
fn collect_class_names(root: Node, source: &str) -> HashSet<String> {
    named_children(root)
        .into_iter()
        .filter(|child| child.kind() == "class_definition")
        .filter_map(|child| child.child_by_field_name("name"))
        .map(|name| node_text(name, source).to_string())
        .collect()
}

/// A lone string literal at the head of a body is documentation.
fn is_docstring(node: Node) -> bool {
    node.kind() == "expression_statement"
        && matches!(named_children(node).as_slice(), [child] if child.kind() == "string")
}

#[derive(Clone)]
struct LowerContext<'a> {
    source: &'a str,
    classes: &'a HashSet<String>,
    /// Name of the receiver parameter while inside a method.
    receiver: Option<String>,
}

impl<'a> LowerContext<'a> {
    fn new(source: &'a str, classes: &'a HashSet<String>) -> Self {
        Self {
            source,
            classes,
            receiver: None,
        }
    }

    fn text(&self, node: Node) -> &'a str {
        node_text(node, self.source)
    }

    fn lower_module(&self, root: Node) -> Result<Module, LowerError> {
        let mut items = Vec::new();
        for (index, child) in named_children(root).into_iter().enumerate() {
            match child.kind() {
                "function_definition" => items.push(Item::Function(self.lower_function(child)?)),
                "class_definition" => items.push(Item::Class(self.lower_class(child)?)),
                _ if index == 0 && is_docstring(child) => {}
                _ => {
                    if let Some(stmt) = self.lower_stmt(child)? {
                        items.push(Item::Stmt(stmt));
                    }
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
        let body = self.lower_block(field(node, "body")?)?;
        Ok(FunctionDef::new(name, params, body).at(position(node)))
    }

    /// A method: the first parameter is the receiver and becomes `SelfRef`.
    fn lower_method(&self, node: Node) -> Result<FunctionDef, LowerError> {
        if has_token(node, "async") {
            return Err(unsupported("async method", node));
        }
        let name = self.text(field(node, "name")?);
        let params_node = field(node, "parameters")?;
        let mut params = self.lower_parameters(params_node)?;
        check_params(name, &params, params_node)?;

        if params.is_empty() {
            return Err(unsupported("method without a receiver parameter", params_node));
        }
        let receiver = params.remove(0);
        if receiver.default.is_some() {
            return Err(unsupported("defaulted receiver parameter", params_node));
        }

        let inner = LowerContext {
            receiver: Some(receiver.name),
            ..self.clone()
        };
        let body = inner.lower_block(field(node, "body")?)?;
        Ok(FunctionDef::new(name, params, body).at(position(node)))
    }

    fn lower_parameters(&self, node: Node) -> Result<Vec<Param>, LowerError> {
        let mut params = Vec::new();
        for child in named_children(node) {
            let param = match child.kind() {
                "identifier" => Param::new(self.text(child)),
                "typed_parameter" => match named_children(child).first() {
                    Some(name) if name.kind() == "identifier" => Param::new(self.text(*name)),
                    _ => return Err(unsupported("variadic parameter", child)),
                },
                "default_parameter" | "typed_default_parameter" => {
                    let name = field(child, "name")?;
                    if name.kind() != "identifier" {
                        return Err(unsupported("destructuring parameter", name));
                    }
                    let default = self.lower_expr(field(child, "value")?)?;
                    Param::with_default(self.text(name), default)
                }
                "list_splat_pattern" | "dictionary_splat_pattern" => {
                    return Err(unsupported("variadic parameter", child));
                }
                "keyword_separator" | "positional_separator" => {
                    return Err(unsupported("keyword-only or positional-only marker", child));
                }
                _ => return Err(unsupported_kind(child)),
            };
            params.push(param);
        }
        Ok(params)
    }

    fn lower_class(&self, node: Node) -> Result<ClassDef, LowerError> {
        let name = self.text(field(node, "name")?);
        if let Some(bases) = node.child_by_field_name("superclasses") {
            if !named_children(bases).is_empty() {
                return Err(unsupported("inheritance", bases));
            }
        }
        if let Some(params) = node.child_by_field_name("type_parameters") {
            return Err(unsupported("generic class", params));
        }

        let mut constructor = None;
        let mut methods = Vec::new();
        for (index, member) in named_children(field(node, "body")?).into_iter().enumerate() {
            match member.kind() {
                "function_definition" => {
                    let mut method = self.lower_method(member)?;
                    if method.name == "__init__" {
                        if constructor.is_some() {
                            return Err(unsupported("second constructor", member));
                        }
                        method.name = name.to_string();
                        constructor = Some(method);
                    } else {
                        methods.push(method);
                    }
                }
                "pass_statement" => {}
                "decorated_definition" => return Err(unsupported("decorator", member)),
                _ if index == 0 && is_docstring(member) => {}
                _ => return Err(unsupported("class attribute", member)),
            }
        }

        Ok(ClassDef::new(name, constructor, methods).at(position(node)))
    }

    // ---- statements ----

    fn lower_block(&self, node: Node) -> Result<Vec<Stmt>, LowerError> {
        let mut stmts = Vec::new();
        for (index, child) in named_children(node).into_iter().enumerate() {
            if index == 0 && is_docstring(child) {
                continue;
            }
            if let Some(stmt) = self.lower_stmt(child)? {
                stmts.push(stmt);
            }
        }
        Ok(stmts)
    }

    fn lower_stmt(&self, node: Node) -> Result<Option<Stmt>, LowerError> {
        match node.kind() {
            "expression_statement" => self.lower_expression_statement(node).map(Some),

            // Control flow
            "if_statement" => self.lower_if(node).map(Some),
            "while_statement" => self.lower_while(node).map(Some),
            "for_statement" => self.lower_for(node).map(Some),
            "return_statement" => {
                let value = match named_children(node).as_slice() {
                    [] => None,
                    [value] => Some(self.lower_expr(*value)?),
                    _ => return Err(unsupported("multiple return values", node)),
                };
                Ok(Some(Stmt::return_stmt(value)))
            }
            "break_statement" => Ok(Some(Stmt::Break)),
            "continue_statement" => Ok(Some(Stmt::Continue)),
            "pass_statement" => Ok(None),

            "function_definition" => Err(unsupported("nested function", node)),
            "class_definition" => Err(unsupported("nested class", node)),
            "decorated_definition" => Err(unsupported("decorator", node)),
            "try_statement" | "raise_statement" => Err(unsupported("exception handling", node)),
            "import_statement" | "import_from_statement" | "future_import_statement" => {
                Err(unsupported("import", node))
            }
            "global_statement" | "nonlocal_statement" => {
                Err(unsupported("scope declaration", node))
            }
            _ => Err(unsupported_kind(node)),
        }
    }

    fn lower_expression_statement(&self, node: Node) -> Result<Stmt, LowerError> {
        let child = only_child(node, "tuple expression")?;
        match child.kind() {
            "assignment" => self.lower_assignment(child),
            "augmented_assignment" => self.lower_augmented_assignment(child),
            _ => Ok(Stmt::expr(self.lower_expr(child)?)),
        }
    }

    fn lower_assignment(&self, node: Node) -> Result<Stmt, LowerError> {
        let left = field(node, "left")?;
        // `x: int` declares without assigning
        let right = node
            .child_by_field_name("right")
            .ok_or_else(|| unsupported("annotation without a value", node))?;
        if right.kind() == "assignment" {
            return Err(unsupported("chained assignment", right));
        }
        let value = self.lower_expr(right)?;
        self.assign_to(left, value)
    }

    fn assign_to(&self, target: Node, value: Expr) -> Result<Stmt, LowerError> {
        match target.kind() {
            "identifier" => Ok(Stmt::assign(self.text(target), value)),
            "attribute" => {
                let object = self.lower_expr(field(target, "object")?)?;
                let name = self.text(field(target, "attribute")?);
                Ok(Stmt::assign_attr(object, name, value))
            }
            "subscript" => {
                let object = self.lower_expr(field(target, "value")?)?;
                let key = self.lower_subscript_key(target)?;
                let call = subscript_assign(Language::Python, object, key, value, target)?;
                Ok(Stmt::expr(call))
            }
            "pattern_list" | "tuple_pattern" | "list_pattern" | "list_splat_pattern" => {
                Err(unsupported("destructuring assignment", target))
            }
            _ => Err(unsupported_kind(target)),
        }
    }

    fn lower_augmented_assignment(&self, node: Node) -> Result<Stmt, LowerError> {
        let operator = field(node, "operator")?;
        let op = match self.text(operator) {
            "+=" => BinaryOp::Add,
            "-=" => BinaryOp::Sub,
            "*=" => BinaryOp::Mul,
            "/=" => BinaryOp::Div,
            "%=" => BinaryOp::Mod,
            other => return Err(unsupported(format!("`{other}` assignment"), operator)),
        };
        let left = field(node, "left")?;
        let right = self.lower_expr(field(node, "right")?)?;

        // x += y  =>  x = x + y
        let current = match left.kind() {
            "identifier" | "attribute" => self.lower_expr(left)?,
            _ => return Err(unsupported("augmented assignment target", left)),
        };
        self.assign_to(left, Expr::binary(current, op, right))
    }

    fn lower_if(&self, node: Node) -> Result<Stmt, LowerError> {
        let cond = self.lower_expr(field(node, "condition")?)?;
        let then_body = self.lower_block(field(node, "consequence")?)?;
        let alternatives = field_children(node, "alternative");
        let else_body = self.lower_alternatives(&alternatives)?;
        Ok(Stmt::if_stmt(cond, then_body, else_body))
    }

    /// `elif` chains nest as a single `If` in the else branch.
    fn lower_alternatives(&self, alternatives: &[Node]) -> Result<Vec<Stmt>, LowerError> {
        let Some((first, rest)) = alternatives.split_first() else {
            return Ok(Vec::new());
        };
        match first.kind() {
            "else_clause" => self.lower_block(field(*first, "body")?),
            "elif_clause" => {
                let cond = self.lower_expr(field(*first, "condition")?)?;
                let then_body = self.lower_block(field(*first, "consequence")?)?;
                let else_body = self.lower_alternatives(rest)?;
                Ok(vec![Stmt::if_stmt(cond, then_body, else_body)])
            }
            _ => Err(unsupported_kind(*first)),
        }
    }

    fn lower_while(&self, node: Node) -> Result<Stmt, LowerError> {
        if let Some(alternative) = node.child_by_field_name("alternative") {
            return Err(unsupported("while-else", alternative));
        }
        let cond = self.lower_expr(field(node, "condition")?)?;
        let body = self.lower_block(field(node, "body")?)?;
        Ok(Stmt::while_loop(cond, body))
    }

    fn lower_for(&self, node: Node) -> Result<Stmt, LowerError> {
        if has_token(node, "async") {
            return Err(unsupported("async for", node));
        }
        if let Some(alternative) = node.child_by_field_name("alternative") {
            return Err(unsupported("for-else", alternative));
        }
        let left = field(node, "left")?;
        if left.kind() != "identifier" {
            return Err(unsupported("destructuring loop target", left));
        }
        let var = self.text(left);
        let right = field(node, "right")?;
        let body = self.lower_block(field(node, "body")?)?;

        if let Some((start, stop)) = self.range_bounds(right)? {
            return Ok(Stmt::for_range(var, start, stop, body));
        }
        Ok(Stmt::for_each(var, self.lower_expr(right)?, body))
    }

    /// `range(stop)` / `range(start, stop)` as a loop iterable.
    fn range_bounds(&self, node: Node) -> Result<Option<(Expr, Expr)>, LowerError> {
        if node.kind() != "call" {
            return Ok(None);
        }
        let function = field(node, "function")?;
        if function.kind() != "identifier" || self.text(function) != "range" {
            return Ok(None);
        }
        let arguments = field(node, "arguments")?;
        let mut args = self.lower_arguments(arguments)?;
        match args.len() {
            1 => Ok(args.pop().map(|stop| (Expr::int(0), stop))),
            2 => {
                let stop = args.pop();
                let start = args.pop();
                Ok(start.zip(stop))
            }
            _ => Err(unsupported("range with a step", arguments)),
        }
    }

    // ---- expressions ----

    fn lower_expr(&self, node: Node) -> Result<Expr, LowerError> {
        match node.kind() {
            // Literals
            "integer" => {
                let text = self.text(node);
                if text.ends_with(|c: char| c == 'j' || c == 'J') {
                    return Err(unsupported("complex literal", node));
                }
                parse_int(text, Language::Python, node)
            }
            "float" => {
                let text = self.text(node);
                if text.ends_with(|c: char| c == 'j' || c == 'J') {
                    return Err(unsupported("complex literal", node));
                }
                parse_float(text, node)
            }
            "string" => self.lower_string(node).map(Expr::string),
            "concatenated_string" => {
                let mut value = String::new();
                for part in named_children(node) {
                    value.push_str(&self.lower_string(part)?);
                }
                Ok(Expr::string(value))
            }
            "true" => Ok(Expr::bool(true)),
            "false" => Ok(Expr::bool(false)),
            "none" => Ok(Expr::null()),

            "identifier" => {
                let name = self.text(node);
                if self.receiver.as_deref() == Some(name) {
                    Ok(Expr::SelfRef)
                } else {
                    Ok(Expr::name(name))
                }
            }

            // Operators
            "binary_operator" => self.lower_binary_operator(node),
            "comparison_operator" => self.lower_comparison(node),
            "boolean_operator" => {
                let operator = field(node, "operator")?;
                let op = match operator.kind() {
                    "and" => BinaryOp::And,
                    "or" => BinaryOp::Or,
                    _ => return Err(unsupported_kind(operator)),
                };
                let left = self.lower_expr(field(node, "left")?)?;
                let right = self.lower_expr(field(node, "right")?)?;
                Ok(Expr::binary(left, op, right))
            }
            "not_operator" => {
                let operand = self.lower_expr(field(node, "argument")?)?;
                Ok(Expr::unary(UnaryOp::Not, operand))
            }
            "unary_operator" => {
                let operator = field(node, "operator")?;
                let operand = self.lower_expr(field(node, "argument")?)?;
                match self.text(operator) {
                    "-" => Ok(Expr::unary(UnaryOp::Neg, operand)),
                    "+" => Ok(operand),
                    _ => Err(unsupported("bitwise operator", operator)),
                }
            }

            // Access
            "call" => self.lower_call(node),
            "attribute" => {
                let object = self.lower_expr(field(node, "object")?)?;
                let name = self.text(field(node, "attribute")?);
                Ok(attribute_access(Language::Python, object, name))
            }
            "subscript" => {
                let object = self.lower_expr(field(node, "value")?)?;
                let key = self.lower_subscript_key(node)?;
                subscript(Language::Python, object, key, node)
            }

            // Collections
            "list" => {
                let mut elements = Vec::new();
                for child in named_children(node) {
                    if child.kind() == "list_splat" {
                        return Err(unsupported("unpacking", child));
                    }
                    elements.push(self.lower_expr(child)?);
                }
                Ok(Expr::List(elements))
            }
            "dictionary" => {
                let mut entries = Vec::new();
                for child in named_children(node) {
                    if child.kind() != "pair" {
                        return Err(unsupported("unpacking", child));
                    }
                    let key = self.lower_expr(field(child, "key")?)?;
                    let value = self.lower_expr(field(child, "value")?)?;
                    entries.push((key, value));
                }
                Ok(Expr::Dict(entries))
            }

            "parenthesized_expression" => self.lower_expr(only_child(node, "parenthesized yield")?),

            "tuple" => Err(unsupported("tuple", node)),
            "list_comprehension"
            | "dictionary_comprehension"
            | "set_comprehension"
            | "generator_expression" => Err(unsupported("comprehension", node)),
            "set" => Err(unsupported("set literal", node)),
            "conditional_expression" => Err(unsupported("conditional expression", node)),
            _ => Err(unsupported_kind(node)),
        }
    }

    /// String literal value. Rejects f-strings and bytes.
    fn lower_string(&self, node: Node) -> Result<String, LowerError> {
        let text = self.text(node);
        let invalid = || LowerError::InvalidLiteral {
            text: text.to_string(),
            position: position(node),
        };

        let quote_at = text.find(|c: char| c == '"' || c == '\'').ok_or_else(invalid)?;
        let prefix = text[..quote_at].to_ascii_lowercase();
        if prefix.contains('f') {
            return Err(unsupported("f-string", node));
        }
        if prefix.contains('b') {
            return Err(unsupported("bytes literal", node));
        }

        let quoted = &text[quote_at..];
        let delimiter = if quoted.starts_with("\"\"\"") || quoted.starts_with("'''") {
            3
        } else {
            1
        };
        if quoted.len() < delimiter * 2 {
            return Err(invalid());
        }
        let body = &quoted[delimiter..quoted.len() - delimiter];
        if prefix.contains('r') {
            Ok(body.to_string())
        } else {
            unescape(body, Language::Python, node)
        }
    }

    fn lower_binary_operator(&self, node: Node) -> Result<Expr, LowerError> {
        let operator = field(node, "operator")?;
        let op = match self.text(operator) {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Mod,
            "//" => return Err(unsupported("floor division", operator)),
            "**" => return Err(unsupported("exponentiation", operator)),
            "@" => return Err(unsupported("matrix multiplication", operator)),
            _ => return Err(unsupported("bitwise operator", operator)),
        };
        let left = self.lower_expr(field(node, "left")?)?;
        let right = self.lower_expr(field(node, "right")?)?;
        Ok(Expr::binary(left, op, right))
    }

    fn lower_comparison(&self, node: Node) -> Result<Expr, LowerError> {
        let operands = named_children(node);
        let operators = field_children(node, "operators");
        let ([left, right], [operator]) = (operands.as_slice(), operators.as_slice()) else {
            return Err(unsupported("chained comparison", node));
        };
        let op = match operator.kind() {
            "<" => BinaryOp::Lt,
            "<=" => BinaryOp::Le,
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::Ne,
            ">" => BinaryOp::Gt,
            ">=" => BinaryOp::Ge,
            "in" | "not in" => return Err(unsupported("membership test", *operator)),
            "is" | "is not" => return Err(unsupported("identity comparison", *operator)),
            _ => return Err(unsupported_kind(*operator)),
        };
        Ok(Expr::binary(
            self.lower_expr(*left)?,
            op,
            self.lower_expr(*right)?,
        ))
    }

    fn lower_call(&self, node: Node) -> Result<Expr, LowerError> {
        let function = field(node, "function")?;
        let arguments = field(node, "arguments")?;
        if arguments.kind() != "argument_list" {
            return Err(unsupported("generator argument", arguments));
        }
        let args = self.lower_arguments(arguments)?;

        match function.kind() {
            "identifier" => {
                let name = self.text(function);
                let call = free_call(Language::Python, name, args);
                match call {
                    Expr::Call {
                        callee: Callee::Name(name),
                        args,
                    } if self.classes.contains(&name) => Ok(Expr::new_object(name, args)),
                    call => Ok(call),
                }
            }
            "attribute" => {
                let receiver = self.lower_expr(field(function, "object")?)?;
                let name = self.text(field(function, "attribute")?);
                Ok(method_call(Language::Python, receiver, name, args))
            }
            _ => Err(unsupported("call of a computed callee", function)),
        }
    }

    fn lower_arguments(&self, node: Node) -> Result<Vec<Expr>, LowerError> {
        let mut args = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "keyword_argument" => return Err(unsupported("keyword argument", child)),
                "list_splat" | "dictionary_splat" => {
                    return Err(unsupported("argument unpacking", child));
                }
                _ => args.push(self.lower_expr(child)?),
            }
        }
        Ok(args)
    }

    fn lower_subscript_key(&self, node: Node) -> Result<Expr, LowerError> {
        match field_children(node, "subscript").as_slice() {
            [key] if key.kind() == "slice" => Err(unsupported("slice", *key)),
            [key] => self.lower_expr(*key),
            _ => Err(unsupported("multi-dimensional subscript", node)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::BuiltinOp;

    fn lower(source: &str) -> Module {
        read_python(source).unwrap()
    }

    fn lower_err(source: &str) -> LowerError {
        match read_python(source).unwrap_err() {
            TranslateError::Lower(err) => err,
            other => panic!("expected lowering error, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_assignment() {
        let ir = lower("x = 42");
        assert_eq!(ir.items, vec![Item::Stmt(Stmt::assign("x", Expr::int(42)))]);
    }

    #[test]
    fn test_function_with_default() {
        let ir = lower("def add(a, b=0):\n    return a + b\n");
        let f = ir.functions().next().unwrap();
        assert_eq!(f.name, "add");
        assert_eq!(f.params[1], Param::with_default("b", Expr::int(0)));
        assert_eq!(
            f.body,
            vec![Stmt::return_stmt(Some(Expr::binary(
                Expr::name("a"),
                BinaryOp::Add,
                Expr::name("b"),
            )))]
        );
    }

    #[test]
    fn test_builtins_recognized() {
        let ir = lower("print(len(xs))\nxs.append(1)\nd[\"k\"] = d[\"j\"]\n");
        let stmts: Vec<_> = ir.statements().cloned().collect();
        assert_eq!(
            stmts[0],
            Stmt::expr(Expr::builtin(
                BuiltinOp::Print,
                vec![Expr::builtin(BuiltinOp::Len, vec![Expr::name("xs")])],
            ))
        );
        assert_eq!(
            stmts[1],
            Stmt::expr(Expr::builtin(
                BuiltinOp::Append,
                vec![Expr::name("xs"), Expr::int(1)],
            ))
        );
        assert_eq!(
            stmts[2],
            Stmt::expr(Expr::builtin(
                BuiltinOp::DictSet,
                vec![
                    Expr::name("d"),
                    Expr::string("k"),
                    Expr::builtin(BuiltinOp::DictGet, vec![Expr::name("d"), Expr::string("j")]),
                ],
            ))
        );
    }

    #[test]
    fn test_elif_nests() {
        let ir = lower("if a:\n    x = 1\nelif b:\n    x = 2\nelse:\n    x = 3\n");
        let Item::Stmt(Stmt::If { else_body, .. }) = &ir.items[0] else {
            panic!("expected If");
        };
        assert!(matches!(else_body.as_slice(), [Stmt::If { else_body, .. }] if else_body.len() == 1));
    }

    #[test]
    fn test_augmented_assignment_desugars() {
        let ir = lower("total += x");
        assert_eq!(
            ir.items,
            vec![Item::Stmt(Stmt::assign(
                "total",
                Expr::binary(Expr::name("total"), BinaryOp::Add, Expr::name("x")),
            ))]
        );
    }

    #[test]
    fn test_range_loop() {
        let ir = lower("for i in range(2, n):\n    print(i)\n");
        assert!(matches!(
            &ir.items[0],
            Item::Stmt(Stmt::ForRange { var, start, .. }) if var == "i" && *start == Expr::int(2)
        ));
        let ir = lower("for x in xs:\n    pass\n");
        assert!(matches!(&ir.items[0], Item::Stmt(Stmt::For { body, .. }) if body.is_empty()));
    }

    #[test]
    fn test_class_receiver_and_constructor() {
        let ir = lower(
            "class Point:\n    def __init__(self, x):\n        self.x = x\n    def get(self):\n        return self.x\n\np = Point(1)\n",
        );
        let class = ir.classes().next().unwrap();
        let ctor = class.constructor.as_ref().unwrap();
        assert_eq!(ctor.name, "Point");
        assert_eq!(ctor.params, vec![Param::new("x")]);
        assert_eq!(
            ctor.body,
            vec![Stmt::assign_attr(Expr::SelfRef, "x", Expr::name("x"))]
        );
        assert_eq!(class.methods[0].params, vec![]);
        assert_eq!(
            ir.statements().next(),
            Some(&Stmt::assign("p", Expr::new_object("Point", vec![Expr::int(1)])))
        );
    }

    #[test]
    fn test_string_escapes() {
        let ir = lower("s = 'a\\n\"b\"'\nr = r'\\d'\n");
        let stmts: Vec<_> = ir.statements().cloned().collect();
        assert_eq!(stmts[0], Stmt::assign("s", Expr::string("a\n\"b\"")));
        assert_eq!(stmts[1], Stmt::assign("r", Expr::string("\\d")));
    }

    #[test]
    fn test_octal_escapes_and_unknown_escapes() {
        let ir = lower("s = '\\001\\101\\x41\\d'\n");
        assert_eq!(
            ir.statements().next(),
            Some(&Stmt::assign("s", Expr::string("\u{1}AA\\d")))
        );
    }

    #[test]
    fn test_integer_radixes() {
        let ir = lower("a = 0o17\nb = 0x1f\nc = 00\n");
        let values: Vec<_> = ir
            .statements()
            .map(|stmt| match stmt {
                Stmt::Assign { value, .. } => value.clone(),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(values, vec![Expr::int(15), Expr::int(31), Expr::int(0)]);
    }

    #[test]
    fn test_range_loop_keeps_python_counter_semantics() {
        // Rebinding the counter does not change the iteration
        let ir = lower("for i in range(6):\n    print(i)\n    i = i + 1\n");
        assert!(matches!(
            &ir.items[0],
            Item::Stmt(Stmt::ForRange { body, .. }) if body.len() == 2
        ));
    }

    #[test]
    fn test_comments_and_docstrings_ignored() {
        let ir = lower("\"\"\"Module doc.\"\"\"\n# comment\ndef f():\n    \"\"\"Doc.\"\"\"\n    return 1  # trailing\n");
        assert_eq!(ir.items.len(), 1);
        assert_eq!(ir.functions().next().unwrap().body.len(), 1);
    }

    #[test]
    fn test_unsupported_constructs() {
        let cases = [
            ("try:\n    x = 1\nexcept E:\n    pass\n", "exception handling"),
            ("x = [i for i in xs]\n", "comprehension"),
            ("x = a if b else c\n", "conditional expression"),
            ("x = a // b\n", "floor division"),
            ("x = 1 < y < 3\n", "chained comparison"),
            ("f(x=1)\n", "keyword argument"),
            ("import os\n", "import"),
            ("x = f\"{y}\"\n", "f-string"),
            ("class A(B):\n    pass\n", "inheritance"),
            ("def f():\n    def g():\n        pass\n", "nested function"),
        ];
        for (source, construct) in cases {
            match lower_err(source) {
                LowerError::Unsupported { construct: found, .. } => {
                    assert_eq!(found, construct, "for {source:?}")
                }
                other => panic!("unexpected {other:?} for {source:?}"),
            }
        }
    }

    #[test]
    fn test_non_trailing_default_rejected() {
        let err = lower_err("def f(a=1, b):\n    pass\n");
        assert!(matches!(err, LowerError::NonTrailingDefault { ref param, .. } if param == "b"));
    }
}
