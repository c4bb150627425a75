//! # Canvas MD
//!
//! Command-line tool for canvas Markdown documents.

use std::io;
use std::process::ExitCode;

use canvas_md_cli::{run, Cli, Outcome};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,canvas_md_core=info,canvas_md_cli=info"));

    // Reports go to stdout, so logs stay on stderr.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // Use JSON format when RUST_LOG_FORMAT=json
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let mut stdout = io::stdout().lock();
    match run(&cli, &mut stdout)? {
        Outcome::Success => Ok(ExitCode::SUCCESS),
        Outcome::NotFound => Ok(ExitCode::FAILURE),
    }
}
