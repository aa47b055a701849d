//! Translation orchestrator: parse, lower, generate.

use crate::error::TranslateError;
use crate::ir::Module;
use crate::language::Language;
use crate::registry::{reader_for_language, writer_for_language};
use crate::traits::WriteOptions;

/// Translate `source` from one language to another with default options.
pub fn translate(source: &str, from: Language, to: Language) -> Result<String, TranslateError> {
    translate_with(source, from, to, &WriteOptions::default())
}

/// Translate `source`, stopping at the first failing stage.
pub fn translate_with(
    source: &str,
    from: Language,
    to: Language,
    options: &WriteOptions,
) -> Result<String, TranslateError> {
    let _span = tracing::debug_span!("translate", %from, %to).entered();

    let module = lower_source(source, from)?;

    let code = writer_for_language(to).write(&module, options).map_err(|err| {
        tracing::debug!(%err, "generation failed");
        TranslateError::from(err)
    })?;
    tracing::debug!(bytes = code.len(), "generated");
    Ok(code)
}

/// Parse and lower `source` without generating anything.
pub fn lower_source(source: &str, from: Language) -> Result<Module, TranslateError> {
    let reader = reader_for_language(from);

    let tree = reader.parse(source).map_err(|err| {
        tracing::debug!(%err, "parse failed");
        TranslateError::from(err)
    })?;

    let module = reader.lower(&tree, source).map_err(|err| {
        tracing::debug!(%err, "lowering failed");
        TranslateError::from(err)
    })?;
    tracing::debug!(items = module.items.len(), "lowered");
    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stage;

    #[test]
    fn test_failure_is_tagged_with_stage() {
        let err = translate("def f(:\n", Language::Python, Language::Java).unwrap_err();
        assert_eq!(err.stage(), Stage::Parse);

        let err = translate("try:\n    x = 1\nexcept E:\n    pass\n", Language::Python, Language::Java)
            .unwrap_err();
        assert_eq!(err.stage(), Stage::Lower);
    }

    #[test]
    fn test_same_language_translation_runs_full_pipeline() {
        let out = translate("x = len(items)\n", Language::Python, Language::Python).unwrap();
        assert_eq!(out, "x = len(items)\n");
    }
}
