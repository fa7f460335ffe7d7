//! guardgen - runtime type guards from TypeScript declarations.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "guardgen", version, about = "Generate runtime type guards from TypeScript declarations")]
struct Cli {
    /// Enable debug logging (overrides GUARDGEN_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate guard files for interfaces and type aliases
    Generate(commands::generate::GenerateArgs),
    /// List the declarations found in TypeScript sources
    List(commands::list::ListArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Generate(args) => commands::generate::run(args),
        Command::List(args) => commands::list::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, filtered by `GUARDGEN_LOG` (default `warn`).
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("GUARDGEN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}
