mod cli;
mod commands;

use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

/// Log to stderr; `RUST_LOG` wins over the -v count.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match &cli.command {
        Commands::Drill(args) => commands::drill(&cli, args),
        Commands::Legend(args) => commands::legend(&cli, args),
        Commands::Click(args) => commands::click(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
