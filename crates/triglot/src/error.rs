//! Error taxonomy for the three translation stages.

use crate::builtins::BuiltinOp;
use crate::language::Language;
use serde::{Deserialize, Serialize};

/// A 1-based line/column location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl From<tree_sitter::Point> for Position {
    fn from(point: tree_sitter::Point) -> Self {
        Self {
            line: point.row + 1,
            column: point.column + 1,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The native parser rejected the source text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{language} syntax error at {position}: {message}")]
pub struct ParseError {
    pub language: Language,
    pub position: Position,
    pub message: String,
}

/// Well-formed source uses something the IR cannot represent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LowerError {
    #[error("unsupported {construct} at {position}")]
    Unsupported {
        construct: String,
        position: Position,
    },

    #[error(
        "parameter `{param}` of `{function}` has no default but follows a defaulted parameter (at {position})"
    )]
    NonTrailingDefault {
        function: String,
        param: String,
        position: Position,
    },

    #[error("duplicate parameter `{param}` in `{function}` at {position}")]
    DuplicateParam {
        function: String,
        param: String,
        position: Position,
    },

    #[error("malformed {node} at {position}: missing {field}")]
    Malformed {
        node: &'static str,
        field: &'static str,
        position: Position,
    },

    #[error("invalid literal `{text}` at {position}")]
    InvalidLiteral { text: String, position: Position },
}

impl LowerError {
    /// Where in the source the failure was detected.
    pub fn position(&self) -> Position {
        match self {
            LowerError::Unsupported { position, .. }
            | LowerError::NonTrailingDefault { position, .. }
            | LowerError::DuplicateParam { position, .. }
            | LowerError::Malformed { position, .. }
            | LowerError::InvalidLiteral { position, .. } => *position,
        }
    }
}

/// Valid IR that the requested target cannot express.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("{op} expects {expected} argument(s) but got {found}")]
    Arity {
        op: BuiltinOp,
        expected: usize,
        found: usize,
    },

    #[error("{op} can only be used as a statement in {target}")]
    StatementOnly { op: BuiltinOp, target: Language },

    #[error("{target} cannot express {what}")]
    Unrepresentable { what: String, target: Language },

    #[error("name `{name}` is defined more than once in {target} output")]
    NameClash { name: String, target: Language },

    #[error("literal {text} has no {target} spelling")]
    InvalidLiteral { text: String, target: Language },
}

/// Pipeline stage at which a translation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Parse,
    Lower,
    Generate,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Parse => "parse",
            Stage::Lower => "lowering",
            Stage::Generate => "generation",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed translation, tagged with the stage that produced it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Lower(#[from] LowerError),

    #[error(transparent)]
    Generate(#[from] GenerateError),
}

impl TranslateError {
    pub fn stage(&self) -> Stage {
        match self {
            TranslateError::Parse(_) => Stage::Parse,
            TranslateError::Lower(_) => Stage::Lower,
            TranslateError::Generate(_) => Stage::Generate,
        }
    }
}
