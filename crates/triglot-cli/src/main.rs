//! Command-line front end for triglot.

mod config;
mod translate;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Translate code snippets between Python, JavaScript and Java.
#[derive(Parser, Debug)]
#[command(name = "triglot", version, about)]
struct Cli {
    #[command(flatten)]
    translate: translate::TranslateArgs,

    /// Log pipeline stages to stderr (-vv for everything)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// `-v` wins over `TRIGLOT_LOG`; without either only warnings are shown.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("TRIGLOT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("triglot=debug,triglot_cli=debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    std::process::exit(translate::run(cli.translate));
}
