mod commands;
mod diagnostics;
mod watch;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::OutputFormat;

#[derive(Parser)]
#[command(name = "wikibridge", about = "Resolve wiki links and bare filenames in a markdown tree")]
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
    /// Project root holding `.wikibridge.toml`.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
    /// Log every rewritten link (same as `RUST_LOG=debug`).
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite every document into an output directory
    Build {
        /// Output directory, mirrored from the docs tree.
        #[arg(long, default_value = "site_src")]
        out: PathBuf,
    },
    /// Report links that cannot be resolved
    Check {
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Build, then rebuild whenever the docs tree changes
    Watch {
        /// Output directory, mirrored from the docs tree.
        #[arg(long, default_value = "site_src")]
        out: PathBuf,
    },
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| return EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Build { out } => commands::build(&cli.root, &out).map(|()| return ExitCode::SUCCESS),
        Commands::Check { format } => commands::check(&cli.root, format),
        Commands::Watch { out } => watch::run(&cli.root, &out).map(|()| return ExitCode::SUCCESS),
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(2)
        },
    };
}
