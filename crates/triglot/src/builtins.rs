//! Builtin equivalence table.
//!
//! Maps each canonical [`BuiltinOp`] to the surface form it takes in each
//! [`Language`]. The same table drives both directions: writers emit the
//! canonical rule, readers recognise any of the listed surface forms.
//!
//! Argument binding is determined by the call shape:
//!
//! | shape             | IR args            | surface            |
//! |-------------------|--------------------|--------------------|
//! | `FreeCall`        | `a, b, ...`        | `sym(a, b, ...)`   |
//! | `MethodCall`      | `recv, a, ...`     | `recv.sym(a, ...)` |
//! | `PropertyAccess`  | `recv`             | `recv.sym`         |
//! | `Subscript`       | `obj, key`         | `obj[key]`         |
//! | `SubscriptAssign` | `obj, key, value`  | `obj[key] = value` |

use crate::language::Language;
use serde::{Deserialize, Serialize};

/// Canonical builtin operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltinOp {
    Print,
    Len,
    Append,
    DictGet,
    DictSet,
    Str,
}

/// How many IR arguments an operation takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    Any,
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => n == count,
            Arity::Any => true,
        }
    }
}

impl BuiltinOp {
    pub const ALL: [BuiltinOp; 6] = [
        BuiltinOp::Print,
        BuiltinOp::Len,
        BuiltinOp::Append,
        BuiltinOp::DictGet,
        BuiltinOp::DictSet,
        BuiltinOp::Str,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BuiltinOp::Print => "PRINT",
            BuiltinOp::Len => "LEN",
            BuiltinOp::Append => "APPEND",
            BuiltinOp::DictGet => "DICT_GET",
            BuiltinOp::DictSet => "DICT_SET",
            BuiltinOp::Str => "STR",
        }
    }

    /// Number of IR arguments, receiver included.
    pub fn arity(self) -> Arity {
        match self {
            BuiltinOp::Print => Arity::Any,
            BuiltinOp::Len | BuiltinOp::Str => Arity::Exactly(1),
            BuiltinOp::Append | BuiltinOp::DictGet => Arity::Exactly(2),
            BuiltinOp::DictSet => Arity::Exactly(3),
        }
    }
}

impl std::fmt::Display for BuiltinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Surface shape of a builtin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallShape {
    FreeCall,
    MethodCall,
    PropertyAccess,
    Subscript,
    SubscriptAssign,
}

/// Target-specific recipe for rendering a builtin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmissionRule {
    pub shape: CallShape,
    /// Function, method or property name. Dotted for qualified free calls
    /// (`System.out.println`); empty for subscripts.
    pub symbol: &'static str,
    /// The surface call takes a single argument: several IR arguments are
    /// concatenated with a space separator.
    pub joins_args: bool,
}

const fn free(symbol: &'static str) -> EmissionRule {
    EmissionRule {
        shape: CallShape::FreeCall,
        symbol,
        joins_args: false,
    }
}

const fn method(symbol: &'static str) -> EmissionRule {
    EmissionRule {
        shape: CallShape::MethodCall,
        symbol,
        joins_args: false,
    }
}

const fn property(symbol: &'static str) -> EmissionRule {
    EmissionRule {
        shape: CallShape::PropertyAccess,
        symbol,
        joins_args: false,
    }
}

const SUBSCRIPT: EmissionRule = EmissionRule {
    shape: CallShape::Subscript,
    symbol: "",
    joins_args: false,
};

const SUBSCRIPT_ASSIGN: EmissionRule = EmissionRule {
    shape: CallShape::SubscriptAssign,
    symbol: "",
    joins_args: false,
};

const JAVA_PRINTLN: EmissionRule = EmissionRule {
    shape: CallShape::FreeCall,
    symbol: "System.out.println",
    joins_args: true,
};

/// Every surface form of `op` in `language`. The first entry is the one
/// writers emit; the rest are only recognised when reading.
pub fn surface_forms(op: BuiltinOp, language: Language) -> &'static [EmissionRule] {
    use BuiltinOp::*;
    use Language::*;
    match (op, language) {
        (Print, Python) => const { &[free("print")] },
        (Print, JavaScript) => const { &[free("console.log")] },
        (Print, Java) => &[JAVA_PRINTLN],

        (Len, Python) => const { &[free("len")] },
        (Len, JavaScript) => const { &[property("length")] },
        (Len, Java) => const { &[method("size"), method("length"), property("length")] },

        (Append, Python) => const { &[method("append")] },
        (Append, JavaScript) => const { &[method("push")] },
        (Append, Java) => const { &[method("add")] },

        (DictGet, Python) => &[SUBSCRIPT],
        (DictGet, JavaScript) => &[SUBSCRIPT],
        (DictGet, Java) => const { &[method("get")] },

        (DictSet, Python) => &[SUBSCRIPT_ASSIGN],
        (DictSet, JavaScript) => &[SUBSCRIPT_ASSIGN],
        (DictSet, Java) => const { &[method("put")] },

        (Str, Python) => const { &[free("str")] },
        (Str, JavaScript) => const { &[free("String")] },
        (Str, Java) => const { &[free("String.valueOf")] },
    }
}

/// The rule writers use for `op` in `language`.
pub fn emission_rule(op: BuiltinOp, language: Language) -> EmissionRule {
    surface_forms(op, language)[0]
}

fn recognize(
    language: Language,
    shape: CallShape,
    symbol: &str,
    arg_count: usize,
) -> Option<BuiltinOp> {
    BuiltinOp::ALL.into_iter().find(|&op| {
        surface_forms(op, language).iter().any(|rule| {
            rule.shape == shape
                && rule.symbol == symbol
                && if rule.joins_args {
                    arg_count <= 1
                } else {
                    op.arity().accepts(arg_count)
                }
        })
    })
}

/// Recognise a call to a (possibly dotted) free function path.
pub fn recognize_free_call(language: Language, path: &str, arg_count: usize) -> Option<BuiltinOp> {
    recognize(language, CallShape::FreeCall, path, arg_count)
}

/// Recognise `receiver.name(args)`. `arg_count` excludes the receiver.
pub fn recognize_method_call(
    language: Language,
    name: &str,
    arg_count: usize,
) -> Option<BuiltinOp> {
    recognize(language, CallShape::MethodCall, name, arg_count + 1)
}

/// Recognise an uncalled `receiver.name`.
pub fn recognize_property(language: Language, name: &str) -> Option<BuiltinOp> {
    recognize(language, CallShape::PropertyAccess, name, 1)
}

/// The builtin a subscript read lowers to, if the language spells one that way.
pub fn recognize_subscript(language: Language) -> Option<BuiltinOp> {
    recognize(language, CallShape::Subscript, "", 2)
}

/// The builtin a subscript assignment lowers to, if any.
pub fn recognize_subscript_assign(language: Language) -> Option<BuiltinOp> {
    recognize(language, CallShape::SubscriptAssign, "", 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_cell_has_a_canonical_rule() {
        for op in BuiltinOp::ALL {
            for lang in Language::ALL {
                assert!(!surface_forms(op, lang).is_empty(), "{op} / {lang}");
            }
        }
    }

    #[test]
    fn test_len_shapes_differ_per_target() {
        assert_eq!(emission_rule(BuiltinOp::Len, Language::Python).shape, CallShape::FreeCall);
        assert_eq!(
            emission_rule(BuiltinOp::Len, Language::JavaScript).shape,
            CallShape::PropertyAccess
        );
        assert_eq!(emission_rule(BuiltinOp::Len, Language::Java).shape, CallShape::MethodCall);
    }

    #[test]
    fn test_canonical_rules_are_recognised() {
        for op in BuiltinOp::ALL {
            for lang in Language::ALL {
                let rule = emission_rule(op, lang);
                let argc = match op.arity() {
                    Arity::Exactly(n) => n,
                    Arity::Any => 1,
                };
                let found = match rule.shape {
                    CallShape::FreeCall => recognize_free_call(lang, rule.symbol, argc),
                    CallShape::MethodCall => recognize_method_call(lang, rule.symbol, argc - 1),
                    CallShape::PropertyAccess => recognize_property(lang, rule.symbol),
                    CallShape::Subscript => recognize_subscript(lang),
                    CallShape::SubscriptAssign => recognize_subscript_assign(lang),
                };
                assert_eq!(found, Some(op), "{op} / {lang}");
            }
        }
    }

    #[test]
    fn test_arity_gates_recognition() {
        assert_eq!(recognize_free_call(Language::Python, "len", 2), None);
        assert_eq!(recognize_method_call(Language::Python, "append", 2), None);
        assert_eq!(
            recognize_free_call(Language::Python, "print", 3),
            Some(BuiltinOp::Print)
        );
        assert_eq!(recognize_free_call(Language::Java, "System.out.println", 2), None);
        assert_eq!(
            recognize_free_call(Language::Java, "System.out.println", 0),
            Some(BuiltinOp::Print)
        );
    }

    #[test]
    fn test_java_len_aliases() {
        assert_eq!(
            recognize_method_call(Language::Java, "length", 0),
            Some(BuiltinOp::Len)
        );
        assert_eq!(recognize_property(Language::Java, "length"), Some(BuiltinOp::Len));
        assert_eq!(recognize_property(Language::Python, "length"), None);
    }
}
