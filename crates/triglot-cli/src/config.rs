//! Configuration for the triglot CLI.
//!
//! Loads config from:
//! 1. Global: ~/.config/triglot/config.toml
//! 2. Per-project: .triglot/config.toml (overrides global)
//!
//! Example config.toml:
//! ```toml
//! [translate]
//! from = "py"
//! to = "java"
//!
//! [java]
//! class_name = "Snippet"
//! ```
//!
//! Command-line flags override both files.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use triglot::Language;

/// Default languages for `triglot <INPUT>`.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TranslateConfig {
    /// Source language when it cannot be detected from the input.
    pub from: Option<Language>,
    /// Target language when neither `--to` nor the output extension names one.
    pub to: Option<Language>,
}

/// Java output settings.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct JavaConfig {
    /// Name of the public wrapper class.
    pub class_name: Option<String>,
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TriglotConfig {
    pub translate: TranslateConfig,
    pub java: JavaConfig,
}

impl TriglotConfig {
    /// Load configuration for a project.
    ///
    /// Loads global config from ~/.config/triglot/config.toml,
    /// then merges with per-project config from .triglot/config.toml.
    pub fn load(root: &Path) -> Self {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::load_file(&global_path) {
                config = config.merge(global);
            }
        }

        let project_path = root.join(".triglot").join("config.toml");
        if let Some(project) = Self::load_file(&project_path) {
            config = config.merge(project);
        }

        config
    }

    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("triglot").join("config.toml"))
    }

    /// Load config from a file path. A missing file is silent; an invalid
    /// one is reported and skipped.
    fn load_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                Some(config)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "ignoring invalid config");
                None
            }
        }
    }

    /// Merge another config into this one. Keys set in `other` win.
    fn merge(self, other: Self) -> Self {
        Self {
            translate: TranslateConfig {
                from: other.translate.from.or(self.translate.from),
                to: other.translate.to.or(self.translate.to),
            },
            java: JavaConfig {
                class_name: other.java.class_name.or(self.java.class_name),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_project_config(dir: &TempDir, content: &str) -> PathBuf {
        let triglot_dir = dir.path().join(".triglot");
        std::fs::create_dir_all(&triglot_dir).unwrap();
        let config_path = triglot_dir.join("config.toml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "{content}").unwrap();
        config_path
    }

    #[test]
    fn test_default_config() {
        let config = TriglotConfig::default();
        assert_eq!(config.translate.from, None);
        assert_eq!(config.java.class_name, None);
    }

    #[test]
    fn test_load_project_config() {
        let dir = TempDir::new().unwrap();
        write_project_config(
            &dir,
            r#"
[translate]
from = "python"
to = "java"

[java]
class_name = "Snippet"
"#,
        );

        let config = TriglotConfig::load(dir.path());
        assert_eq!(config.translate.from, Some(Language::Python));
        assert_eq!(config.translate.to, Some(Language::Java));
        assert_eq!(config.java.class_name.as_deref(), Some("Snippet"));
    }

    #[test]
    fn test_merge_keeps_unset_keys() {
        let global = TriglotConfig {
            translate: TranslateConfig {
                from: Some(Language::Python),
                to: Some(Language::Java),
            },
            java: JavaConfig {
                class_name: Some("Global".into()),
            },
        };
        let project = TriglotConfig {
            translate: TranslateConfig {
                from: None,
                to: Some(Language::JavaScript),
            },
            java: JavaConfig::default(),
        };

        let merged = TriglotConfig::default().merge(global).merge(project);
        assert_eq!(merged.translate.from, Some(Language::Python));
        assert_eq!(merged.translate.to, Some(Language::JavaScript));
        assert_eq!(merged.java.class_name.as_deref(), Some("Global"));
    }

    #[test]
    fn test_invalid_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_project_config(&dir, "[translate]\nfrom = \"cobol\"\n");
        assert_eq!(TriglotConfig::load_file(&path), None);
    }
}
