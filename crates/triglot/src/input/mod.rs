//! Input readers - parse source code and lower it into IR.
//!
//! Each reader wraps a tree-sitter grammar as its native parser and walks
//! the resulting tree top-down. The helpers here are shared by all three.

pub mod java;
pub mod javascript;
pub mod python;

pub use java::{JAVA_READER, JavaReader, read_java};
pub use javascript::{JAVASCRIPT_READER, JavaScriptReader, read_javascript};
pub use python::{PYTHON_READER, PythonReader, read_python};

use crate::builtins;
use crate::error::{LowerError, ParseError, Position};
use crate::ir::{Expr, Param};
use crate::language::Language;
use std::collections::HashSet;
use tree_sitter::{Node, Parser, Tree};

/// Run a tree-sitter grammar over `source`, failing on the first syntax error.
pub(crate) fn parse_source(
    language: Language,
    grammar: tree_sitter::Language,
    source: &str,
) -> Result<Tree, ParseError> {
    let mut parser = Parser::new();
    parser.set_language(&grammar).map_err(|err| ParseError {
        language,
        position: Position::new(1, 1),
        message: err.to_string(),
    })?;

    let tree = parser.parse(source, None).ok_or_else(|| ParseError {
        language,
        position: Position::new(1, 1),
        message: "failed to parse".into(),
    })?;

    if let Some(node) = first_error(tree.root_node()) {
        return Err(ParseError {
            language,
            position: node.start_position().into(),
            message: describe_error(node, source),
        });
    }

    Ok(tree)
}

/// First `ERROR` or `MISSING` node in document order.
fn first_error(node: Node) -> Option<Node> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    Some(node)
}

fn describe_error(node: Node, source: &str) -> String {
    if node.is_missing() {
        return format!("missing `{}`", node.kind());
    }
    let text = node_text(node, source);
    let first_line = text.lines().next().unwrap_or("").trim();
    if first_line.is_empty() {
        return "unexpected end of input".into();
    }
    let snippet: String = first_line.chars().take(24).collect();
    format!("unexpected `{snippet}`")
}

pub(crate) fn node_text<'s>(node: Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

pub(crate) fn position(node: Node) -> Position {
    node.start_position().into()
}

/// Named children, skipping comments and other extras.
pub(crate) fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

/// All children attached to a (possibly repeated) field.
pub(crate) fn field_children<'t>(node: Node<'t>, name: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(name, &mut cursor).collect()
}

/// A required field, or a `Malformed` error naming it.
pub(crate) fn field<'t>(node: Node<'t>, name: &'static str) -> Result<Node<'t>, LowerError> {
    node.child_by_field_name(name)
        .ok_or_else(|| LowerError::Malformed {
            node: node.kind(),
            field: name,
            position: position(node),
        })
}

/// Whether `node` has an anonymous child token of the given kind.
pub(crate) fn has_token(node: Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == kind)
}

/// The single named child of a wrapper node (parentheses, statements).
pub(crate) fn only_child<'t>(node: Node<'t>, what: &str) -> Result<Node<'t>, LowerError> {
    match named_children(node).as_slice() {
        [child] => Ok(*child),
        _ => Err(unsupported(what, node)),
    }
}

pub(crate) fn unsupported(construct: impl Into<String>, node: Node) -> LowerError {
    LowerError::Unsupported {
        construct: construct.into(),
        position: position(node),
    }
}

/// Unsupported construct named after its grammar kind (`try_statement` ->
/// "try statement").
pub(crate) fn unsupported_kind(node: Node) -> LowerError {
    unsupported(node.kind().replace('_', " "), node)
}

/// Enforce unique names and the trailing-defaults invariant.
pub(crate) fn check_params(function: &str, params: &[Param], node: Node) -> Result<(), LowerError> {
    let mut seen = HashSet::new();
    let mut defaulted = false;
    for param in params {
        if !seen.insert(param.name.as_str()) {
            return Err(LowerError::DuplicateParam {
                function: function.to_string(),
                param: param.name.clone(),
                position: position(node),
            });
        }
        if param.default.is_some() {
            defaulted = true;
        } else if defaulted {
            return Err(LowerError::NonTrailingDefault {
                function: function.to_string(),
                param: param.name.clone(),
                position: position(node),
            });
        }
    }
    Ok(())
}

/// Integer literal text (`1_000`, `0x1F`, `10L`, Java `017`).
pub(crate) fn parse_int(text: &str, language: Language, node: Node) -> Result<Expr, LowerError> {
    let invalid = || LowerError::InvalidLiteral {
        text: text.to_string(),
        position: position(node),
    };
    let cleaned: String = text
        .chars()
        .filter(|&c| c != '_')
        .collect::<String>()
        .to_ascii_lowercase();
    let cleaned = cleaned.trim_end_matches('l');
    let parsed = if let Some(hex) = cleaned.strip_prefix("0x") {
        i64::from_str_radix(hex, 16)
    } else if let Some(oct) = cleaned.strip_prefix("0o") {
        i64::from_str_radix(oct, 8)
    } else if let Some(bin) = cleaned.strip_prefix("0b") {
        i64::from_str_radix(bin, 2)
    } else if cleaned.len() > 1 && cleaned.starts_with('0') {
        let octal_digits = cleaned.chars().all(|c| matches!(c, '0'..='7'));
        match language {
            Language::Java => i64::from_str_radix(&cleaned[1..], 8),
            Language::JavaScript if octal_digits => i64::from_str_radix(cleaned, 8),
            // Legacy `089` is decimal
            Language::JavaScript => cleaned.parse::<i64>(),
            Language::Python if cleaned.chars().all(|c| c == '0') => Ok(0),
            Language::Python => return Err(invalid()),
        }
    } else {
        cleaned.parse::<i64>()
    };
    parsed.map(Expr::int).map_err(|_| invalid())
}

/// Floating-point literal text (`1.5`, `1e3`, `2.0f`).
pub(crate) fn parse_float(text: &str, node: Node) -> Result<Expr, LowerError> {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    let cleaned = cleaned.trim_end_matches(|c: char| matches!(c, 'f' | 'F' | 'd' | 'D'));
    cleaned
        .parse::<f64>()
        .map(Expr::float)
        .map_err(|_| LowerError::InvalidLiteral {
            text: text.to_string(),
            position: position(node),
        })
}

/// Resolve backslash escapes inside a string body the way `language`
/// reads them.
pub(crate) fn unescape(body: &str, language: Language, node: Node) -> Result<String, LowerError> {
    let invalid = || LowerError::InvalidLiteral {
        text: body.to_string(),
        position: position(node),
    };

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escape) = chars.next() else {
            return Err(invalid());
        };
        match (escape, language) {
            ('n', _) => out.push('\n'),
            ('t', _) => out.push('\t'),
            ('r', _) => out.push('\r'),
            ('b', _) => out.push('\u{8}'),
            ('f', _) => out.push('\u{c}'),
            ('\\' | '"' | '\'', _) => out.push(escape),
            ('v', Language::Python | Language::JavaScript) => out.push('\u{b}'),
            ('a', Language::Python) => out.push('\u{7}'),
            ('s', Language::Java) => out.push(' '),
            // Line continuation
            ('\n', Language::Python | Language::JavaScript) => {}
            ('\r', Language::Python | Language::JavaScript) => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            ('0'..='7', _) => {
                // Java and JavaScript stop at \377
                let max_digits = if language == Language::Python || escape <= '3' { 3 } else { 2 };
                let mut code = escape as u32 - '0' as u32;
                for _ in 1..max_digits {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            code = code * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(code).ok_or_else(invalid)?);
            }
            ('x', Language::Python | Language::JavaScript) => {
                let digits: String = chars.by_ref().take(2).collect();
                out.push(fixed_hex(&digits, 2).ok_or_else(invalid)?);
            }
            ('u', Language::JavaScript) if chars.peek() == Some(&'{') => {
                chars.next();
                let digits: String = chars.by_ref().take_while(|&c| c != '}').collect();
                out.push(hex_char(&digits).ok_or_else(invalid)?);
            }
            ('u', _) => {
                if language == Language::Java {
                    while chars.next_if_eq(&'u').is_some() {}
                }
                let digits: String = chars.by_ref().take(4).collect();
                out.push(fixed_hex(&digits, 4).ok_or_else(invalid)?);
            }
            ('U', Language::Python) => {
                let digits: String = chars.by_ref().take(8).collect();
                out.push(fixed_hex(&digits, 8).ok_or_else(invalid)?);
            }
            ('N', Language::Python) => return Err(invalid()),
            (other, Language::Python) => {
                out.push('\\');
                out.push(other);
            }
            (other, Language::JavaScript) => out.push(other),
            (_, Language::Java) => return Err(invalid()),
        }
    }
    Ok(out)
}

fn hex_char(digits: &str) -> Option<char> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)
}

fn fixed_hex(digits: &str, width: usize) -> Option<char> {
    if digits.len() != width {
        return None;
    }
    hex_char(digits)
}

/// `a.b.c` for a chain of plain names, used to match qualified builtins
/// such as `console.log` or `System.out.println`.
pub(crate) fn dotted_path(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Name(name) => Some(name.clone()),
        Expr::Attribute { object, name } => dotted_path(object).map(|path| format!("{path}.{name}")),
        _ => None,
    }
}

/// Lower a call to a bare name: a builtin if the name matches, otherwise a
/// free call.
pub(crate) fn free_call(language: Language, name: &str, args: Vec<Expr>) -> Expr {
    match builtins::recognize_free_call(language, name, args.len()) {
        Some(op) => Expr::builtin(op, args),
        None => Expr::call(name, args),
    }
}

/// Lower `receiver.name(args)`: a qualified free builtin, a method-shaped
/// builtin (receiver becomes the first argument), or a plain method call.
/// Calls through the receiver of a method always stay user method calls.
pub(crate) fn method_call(language: Language, receiver: Expr, name: &str, args: Vec<Expr>) -> Expr {
    if let Some(path) = dotted_path(&receiver) {
        let qualified = format!("{path}.{name}");
        if let Some(op) = builtins::recognize_free_call(language, &qualified, args.len()) {
            return Expr::builtin(op, args);
        }
    }
    if receiver == Expr::SelfRef {
        return Expr::method(receiver, name, args);
    }
    match builtins::recognize_method_call(language, name, args.len()) {
        Some(op) => {
            let mut all = Vec::with_capacity(args.len() + 1);
            all.push(receiver);
            all.extend(args);
            Expr::builtin(op, all)
        }
        None => Expr::method(receiver, name, args),
    }
}

/// Lower an uncalled `object.name`.
pub(crate) fn attribute_access(language: Language, object: Expr, name: &str) -> Expr {
    match builtins::recognize_property(language, name) {
        Some(op) if object != Expr::SelfRef => Expr::builtin(op, vec![object]),
        _ => Expr::attribute(object, name),
    }
}

/// Lower `object[key]`.
pub(crate) fn subscript(
    language: Language,
    object: Expr,
    key: Expr,
    node: Node,
) -> Result<Expr, LowerError> {
    builtins::recognize_subscript(language)
        .map(|op| Expr::builtin(op, vec![object, key]))
        .ok_or_else(|| unsupported("subscript", node))
}

/// Lower `object[key] = value` into a statement-level builtin call.
pub(crate) fn subscript_assign(
    language: Language,
    object: Expr,
    key: Expr,
    value: Expr,
    node: Node,
) -> Result<Expr, LowerError> {
    builtins::recognize_subscript_assign(language)
        .map(|op| Expr::builtin(op, vec![object, key, value]))
        .ok_or_else(|| unsupported("subscript assignment", node))
}

/// Step of a `++`/`--` update expression, if `node` is one.
pub(crate) fn update_step(node: Node) -> Option<i64> {
    if node.kind() != "update_expression" {
        return None;
    }
    if has_token(node, "++") {
        Some(1)
    } else if has_token(node, "--") {
        Some(-1)
    } else {
        None
    }
}
