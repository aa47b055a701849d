//! The three surface languages.

use serde::{Deserialize, Serialize};

/// A surface language that can be read from and written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "py", alias = "python")]
    Python,
    #[serde(rename = "js", alias = "javascript")]
    JavaScript,
    #[serde(rename = "java")]
    Java,
}

impl Language {
    /// Every supported language, in a fixed order.
    pub const ALL: [Language; 3] = [Language::Python, Language::JavaScript, Language::Java];

    /// Short identifier used on the command line and in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "py",
            Language::JavaScript => "js",
            Language::Java => "java",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::Java => "Java",
        }
    }

    /// File extensions recognised for this language. The first one is used
    /// for output files.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["py"],
            Language::JavaScript => &["js", "mjs", "cjs"],
            Language::Java => &["java"],
        }
    }

    /// Detect a language from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Language> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext))
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "py" | "python" => Ok(Self::Python),
            "js" | "javascript" => Ok(Self::JavaScript),
            "java" => Ok(Self::Java),
            _ => Err(format!("unknown language: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_long_names() {
        assert_eq!("python".parse::<Language>(), Ok(Language::Python));
        assert_eq!("js".parse::<Language>(), Ok(Language::JavaScript));
        assert!("lua".parse::<Language>().is_err());
    }

    #[test]
    fn test_extension_lookup() {
        assert_eq!(Language::from_extension("mjs"), Some(Language::JavaScript));
        assert_eq!(Language::from_extension("java"), Some(Language::Java));
        assert_eq!(Language::from_extension("ts"), None);
    }

    #[test]
    fn test_serde_names() {
        let lang: Language = serde_json::from_str("\"python\"").unwrap();
        assert_eq!(lang, Language::Python);
        assert_eq!(serde_json::to_string(&Language::Java).unwrap(), "\"java\"");
    }
}
