//! Traits for language readers and writers.

use crate::error::{GenerateError, LowerError, ParseError, TranslateError};
use crate::ir::Module;
use crate::language::Language;
use tree_sitter::Tree;

/// A reader parses source code and lowers the syntax tree into the IR.
pub trait Reader: Send + Sync {
    /// The language this reader handles.
    fn language(&self) -> Language;

    /// File extensions this reader handles (e.g., &["js", "mjs"]).
    fn extensions(&self) -> &'static [&'static str] {
        self.language().extensions()
    }

    /// Run the native parser.
    fn parse(&self, source: &str) -> Result<Tree, ParseError>;

    /// Lower a syntax tree produced by [`Reader::parse`] on `source`.
    fn lower(&self, tree: &Tree, source: &str) -> Result<Module, LowerError>;

    /// Parse and lower in one step.
    fn read(&self, source: &str) -> Result<Module, TranslateError> {
        let tree = self.parse(source)?;
        Ok(self.lower(&tree, source)?)
    }
}

/// Options that affect generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Name of the public class wrapping top-level Java functions and
    /// statements.
    pub java_class: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            java_class: "Main".to_string(),
        }
    }
}

/// A writer emits the IR as source code in a target language.
pub trait Writer: Send + Sync {
    /// The language this writer emits.
    fn language(&self) -> Language;

    /// File extension for output (e.g., "py").
    fn extension(&self) -> &'static str {
        self.language().extensions()[0]
    }

    /// Emit the IR as source code.
    fn write(&self, module: &Module, options: &WriteOptions) -> Result<String, GenerateError>;
}
