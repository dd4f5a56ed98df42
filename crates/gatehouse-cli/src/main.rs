use clap::{Parser, Subcommand};

mod commands;

/// gatehouse: inspect and probe identity-provider adapters
#[derive(Parser)]
#[command(name = "gatehouse", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a token and fetch the identity behind it
    Probe(commands::probe::ProbeArgs),

    /// List supported providers and their default endpoints
    Providers(commands::providers::ProvidersArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Probe(args) => commands::probe::run(args),
        Commands::Providers(args) => commands::providers::run(args),
    };

    if let Err(e) = result {
        eprintln!("{} {}", colored::Colorize::red("error:"), e);
        std::process::exit(1);
    }
}
