//! Pagesmith - template search and page source generation
//!
//! Command-line access to the page builder's keyword template search, the
//! template catalog, and layout-to-React source export.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pagesmith::cli::{CliResult, GenerateArgs, MatchArgs, TemplateArgs};
use pagesmith::constants::APP_BINARY_NAME;

/// Pagesmith - template search and page source generation
#[derive(Parser, Debug)]
#[command(name = APP_BINARY_NAME, author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search templates by keywords
    Match(MatchArgs),
    /// Generate React page source from a layout or template
    Generate(GenerateArgs),
    /// Browse the template catalog
    Template(TemplateArgs),
}

impl Command {
    fn execute(&self) -> CliResult<()> {
        match self {
            Command::Match(args) => args.execute(),
            Command::Generate(args) => args.execute(),
            Command::Template(args) => args.execute(),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = cli.command.execute() {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
