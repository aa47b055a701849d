//! Snippet translation between Python, JavaScript and Java.
//!
//! `triglot` lowers each source language into one canonical IR and
//! generates every target language from it. Builtins with different surface
//! idioms (`print(x)`, `console.log(x)`, `System.out.println(x)`) meet in a
//! single [`BuiltinOp`].
//!
//! # Architecture
//!
//! ```text
//! Source Languages        IR               Target Languages
//! ────────────────    ─────────────    ────────────────────
//! Python          ─┐                ┌─> Python
//! JavaScript      ─┼─> Module ──────┼─> JavaScript
//! Java            ─┘    (ir/)       └─> Java
//!                         │
//!                    builtins.rs
//! ```
//!
//! Parsing is done by tree-sitter grammars. Lowering rejects anything
//! outside the supported subset with a [`LowerError`] rather than dropping
//! it; generation fails with a [`GenerateError`] when a target cannot
//! express a piece of valid IR.
//!
//! # Example
//!
//! ```ignore
//! use triglot::{Language, translate};
//!
//! let js = translate("def add(a, b=0):\n    return a + b\n", Language::Python, Language::JavaScript)?;
//! // => "function add(a, b = 0) {\n  return a + b;\n}\n"
//! ```

pub mod builtins;
pub mod error;
pub mod input;
pub mod ir;
pub mod language;
pub mod output;
pub mod registry;
pub mod traits;
pub mod translate;

// Re-exports: IR types
pub use ir::{
    AssignTarget, BinaryOp, Callee, ClassDef, Expr, FunctionDef, Item, Literal, Module, Number,
    Param, Stmt, StructureEq, UnaryOp,
};

// Re-exports: builtins and languages
pub use builtins::{BuiltinOp, CallShape, EmissionRule, emission_rule};
pub use language::Language;

// Re-exports: errors
pub use error::{GenerateError, LowerError, ParseError, Position, Stage, TranslateError};

// Re-exports: traits
pub use traits::{Reader, WriteOptions, Writer};

// Re-exports: registry
pub use registry::{reader_for_extension, reader_for_language, readers, writer_for_language, writers};

// Re-exports: orchestrator
pub use translate::{lower_source, translate, translate_with};
