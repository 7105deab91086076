//! Outpost CLI — resolves the agent configuration.
//!
//! Commands:
//! - `validate` — Build the configuration and report problems
//! - `show`     — Print the resolved configuration
//!
//! Both commands layer built-in defaults, then `--config-dir` /
//! `--config-file` sources in command-line order, then the remaining flags.

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};

mod commands;
mod flags;

use commands::show::OutputFormat;
use flags::AgentFlags;

#[derive(Parser)]
#[command(
    name = "outpost",
    about = "Outpost — network agent configuration",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the agent configuration and report problems
    Validate {
        #[command(flatten)]
        flags: AgentFlags,
    },

    /// Print the resolved agent configuration
    Show {
        /// Output format
        #[arg(long, value_enum, default_value = "toml")]
        format: OutputFormat,

        #[command(flatten)]
        flags: AgentFlags,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parsed through ArgMatches so config sources keep their positions.
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let Some((_, sub_matches)) = matches.subcommand() else {
        return Err("no command given".into());
    };

    match cli.command {
        Commands::Validate { flags } => commands::validate::run(flags, sub_matches)?,
        Commands::Show { format, flags } => commands::show::run(flags, sub_matches, format)?,
    }

    Ok(())
}
