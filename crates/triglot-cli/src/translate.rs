//! Translate command - convert a snippet between languages.

use crate::config::TriglotConfig;
use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};
use triglot::{Language, Stage, TranslateError, WriteOptions, lower_source, translate_with};

/// Translate command arguments
#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// Input source file, use - for stdin
    pub input: PathBuf,

    /// Source language (auto-detected from the input extension otherwise)
    #[arg(short, long, value_enum)]
    pub from: Option<LanguageArg>,

    /// Target language (auto-detected from the output extension otherwise)
    #[arg(short, long, value_enum)]
    pub to: Option<LanguageArg>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the lowered IR as JSON instead of generating code
    #[arg(long)]
    pub emit_ir: bool,

    /// Name of the public Java class wrapping functions and statements
    #[arg(long)]
    pub java_class: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LanguageArg {
    /// Python
    #[value(alias = "python")]
    Py,
    /// JavaScript
    #[value(alias = "javascript")]
    Js,
    /// Java
    Java,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::Py => Language::Python,
            LanguageArg::Js => Language::JavaScript,
            LanguageArg::Java => Language::Java,
        }
    }
}

/// Process exit code for a failed translation.
fn exit_code(err: &TranslateError) -> i32 {
    match err.stage() {
        Stage::Parse => 2,
        Stage::Lower => 3,
        Stage::Generate => 4,
    }
}

fn detect(path: &Path) -> Option<Language> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(Language::from_extension)
}

/// Run the translate command
pub fn run(args: TranslateArgs) -> i32 {
    let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = TriglotConfig::load(&root);
    execute(&args, &config)
}

fn execute(args: &TranslateArgs, config: &TriglotConfig) -> i32 {
    let is_stdin = args.input.as_os_str() == "-";

    // Read input (file or stdin)
    let content = if is_stdin {
        use std::io::Read;
        let mut buf = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
            eprintln!("Failed to read stdin: {}", e);
            return 1;
        }
        buf
    } else {
        match std::fs::read_to_string(&args.input) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to read {}: {}", args.input.display(), e);
                return 1;
            }
        }
    };

    // Flag, then input extension, then config
    let detected = if is_stdin { None } else { detect(&args.input) };
    let Some(from) = args
        .from
        .map(Language::from)
        .or(detected)
        .or(config.translate.from)
    else {
        eprintln!("Cannot detect the source language. Use --from to specify it.");
        return 1;
    };

    let output = if args.emit_ir {
        let module = match lower_source(&content, from) {
            Ok(module) => module,
            Err(err) => return report(args, &err),
        };
        match module.to_json() {
            Ok(json) => json + "\n",
            Err(e) => {
                eprintln!("Failed to serialize the IR: {}", e);
                return 1;
            }
        }
    } else {
        // Flag, then output extension, then config
        let Some(to) = args
            .to
            .map(Language::from)
            .or_else(|| args.output.as_deref().and_then(detect))
            .or(config.translate.to)
        else {
            eprintln!("No target language. Use --to to specify it.");
            return 1;
        };

        let options = WriteOptions {
            java_class: java_class(args, config),
        };
        tracing::debug!(%from, %to, class = %options.java_class, "translating");
        match translate_with(&content, from, to, &options) {
            Ok(code) => code,
            Err(err) => return report(args, &err),
        }
    };

    // Write output
    if let Some(path) = &args.output {
        if let Err(e) = std::fs::write(path, &output) {
            eprintln!("Failed to write {}: {}", path.display(), e);
            return 1;
        }
        eprintln!("Translated {} -> {}", args.input.display(), path.display());
    } else {
        print!("{}", output);
    }

    0
}

/// Flag, then the output file's stem (Java wants them to match), then
/// config, then `Main`.
fn java_class(args: &TranslateArgs, config: &TriglotConfig) -> String {
    let stem = args
        .output
        .as_deref()
        .filter(|path| detect(path) == Some(Language::Java))
        .and_then(|path| path.file_stem())
        .and_then(|stem| stem.to_str());
    args.java_class
        .as_deref()
        .or(stem)
        .or(config.java.class_name.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| WriteOptions::default().java_class)
}

fn report(args: &TranslateArgs, err: &TranslateError) -> i32 {
    eprintln!("{}: {} error: {}", args.input.display(), err.stage(), err);
    exit_code(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(input: PathBuf) -> TranslateArgs {
        TranslateArgs {
            input,
            from: None,
            to: None,
            output: None,
            emit_ir: false,
            java_class: None,
        }
    }

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_translate_to_file_detects_both_languages() {
        let dir = TempDir::new().unwrap();
        let input = write(&dir, "snippet.py", "print(len(xs))\n");
        let output = dir.path().join("snippet.js");

        let code = execute(
            &TranslateArgs {
                output: Some(output.clone()),
                ..args(input)
            },
            &TriglotConfig::default(),
        );
        assert_eq!(code, 0);
        assert_eq!(std::fs::read_to_string(output).unwrap(), "console.log(xs.length);\n");
    }

    #[test]
    fn test_java_class_follows_output_file() {
        let dir = TempDir::new().unwrap();
        let input = write(&dir, "snippet.js", "console.log(1);\n");
        let output = dir.path().join("Hello.java");

        let code = execute(
            &TranslateArgs {
                output: Some(output.clone()),
                ..args(input)
            },
            &TriglotConfig::default(),
        );
        assert_eq!(code, 0);
        let java = std::fs::read_to_string(output).unwrap();
        assert!(java.starts_with("public class Hello {"), "{java}");
    }

    #[test]
    fn test_config_supplies_target() {
        let dir = TempDir::new().unwrap();
        let input = write(&dir, "snippet.txt", "x = 1\n");
        let output = dir.path().join("out");
        let mut config = TriglotConfig::default();
        config.translate.from = Some(Language::Python);
        config.translate.to = Some(Language::JavaScript);

        let code = execute(
            &TranslateArgs {
                output: Some(output.clone()),
                ..args(input)
            },
            &config,
        );
        assert_eq!(code, 0);
        assert_eq!(std::fs::read_to_string(output).unwrap(), "let x = 1;\n");
    }

    #[test]
    fn test_emit_ir() {
        let dir = TempDir::new().unwrap();
        let input = write(&dir, "snippet.py", "print(x)\n");
        let output = dir.path().join("ir.json");

        let code = execute(
            &TranslateArgs {
                output: Some(output.clone()),
                emit_ir: true,
                ..args(input)
            },
            &TriglotConfig::default(),
        );
        assert_eq!(code, 0);
        let json = std::fs::read_to_string(output).unwrap();
        assert!(json.contains("\"Builtin\": \"Print\""));
    }

    #[test]
    fn test_exit_codes_follow_stage() {
        let dir = TempDir::new().unwrap();
        let cases = [
            ("parse.py", "def f(:\n", 2),
            ("lower.py", "try:\n    pass\nexcept E:\n    pass\n", 3),
            ("generate.py", "class Main:\n    pass\n\nm = Main()\n", 4),
        ];
        for (name, content, expected) in cases {
            let input = write(&dir, name, content);
            let code = execute(
                &TranslateArgs {
                    to: Some(LanguageArg::Java),
                    ..args(input)
                },
                &TriglotConfig::default(),
            );
            assert_eq!(code, expected, "{name}");
        }
    }

    #[test]
    fn test_usage_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.py");
        let code = execute(
            &TranslateArgs {
                to: Some(LanguageArg::Js),
                ..args(missing)
            },
            &TriglotConfig::default(),
        );
        assert_eq!(code, 1);

        let input = write(&dir, "snippet.py", "x = 1\n");
        assert_eq!(execute(&args(input), &TriglotConfig::default()), 1);
    }
}
