//! Registry of readers and writers.
//!
//! The language set is closed, so lookup is an exhaustive match over
//! [`Language`] rather than a runtime table.

use crate::input::{JAVASCRIPT_READER, JAVA_READER, PYTHON_READER};
use crate::language::Language;
use crate::output::{JAVASCRIPT_WRITER, JAVA_WRITER, PYTHON_WRITER};
use crate::traits::{Reader, Writer};

/// Get the reader for a language.
pub fn reader_for_language(lang: Language) -> &'static dyn Reader {
    match lang {
        Language::Python => &PYTHON_READER,
        Language::JavaScript => &JAVASCRIPT_READER,
        Language::Java => &JAVA_READER,
    }
}

/// Get a reader by file extension.
pub fn reader_for_extension(ext: &str) -> Option<&'static dyn Reader> {
    Language::from_extension(ext).map(reader_for_language)
}

/// Get the writer for a language.
pub fn writer_for_language(lang: Language) -> &'static dyn Writer {
    match lang {
        Language::Python => &PYTHON_WRITER,
        Language::JavaScript => &JAVASCRIPT_WRITER,
        Language::Java => &JAVA_WRITER,
    }
}

/// Get all readers.
pub fn readers() -> Vec<&'static dyn Reader> {
    Language::ALL.into_iter().map(reader_for_language).collect()
}

/// Get all writers.
pub fn writers() -> Vec<&'static dyn Writer> {
    Language::ALL.into_iter().map(writer_for_language).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::WriteOptions;

    #[test]
    fn test_reader_lookup() {
        let reader = reader_for_language(Language::Python);
        assert_eq!(reader.language(), Language::Python);
        assert!(reader.extensions().contains(&"py"));

        let reader = reader_for_extension("mjs").expect("mjs extension");
        assert_eq!(reader.language(), Language::JavaScript);
        assert!(reader_for_extension("lua").is_none());
    }

    #[test]
    fn test_writer_lookup() {
        let writer = writer_for_language(Language::Java);
        assert_eq!(writer.language(), Language::Java);
        assert_eq!(writer.extension(), "java");
    }

    #[test]
    fn test_every_language_registered() {
        assert_eq!(readers().len(), 3);
        assert_eq!(writers().len(), 3);
    }

    #[test]
    fn test_roundtrip_via_registry() {
        let reader = reader_for_language(Language::Python);
        let writer = writer_for_language(Language::JavaScript);

        let ir = reader.read("x = 1 + 2").unwrap();
        let js = writer.write(&ir, &WriteOptions::default()).unwrap();

        assert!(js.contains("let x = 1 + 2;"));
    }
}
