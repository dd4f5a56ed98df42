// `gatehouse providers`: list provider ids with their default endpoints.

use clap::Args;
use colored::Colorize;
use gatehouse_core::ProviderKind;
use gatehouse_providers::{provider_defaults, PROVIDER_IDS};

#[derive(Args)]
pub struct ProvidersArgs {
    /// Output as JSON
    #[arg(short, long)]
    json: bool,
}

/// Print every supported provider with its default endpoints.
pub fn run(args: ProvidersArgs) -> Result<(), Box<dyn std::error::Error>> {
    let kinds = PROVIDER_IDS
        .iter()
        .map(|id| id.parse::<ProviderKind>())
        .collect::<Result<Vec<_>, _>>()?;

    if args.json {
        let listing: Vec<_> = kinds
            .iter()
            .map(|kind| {
                let defaults = provider_defaults(*kind);
                serde_json::json!({
                    "id": kind.id(),
                    "name": defaults.provider_name,
                    "loginUrl": defaults.login_url,
                    "redeemUrl": defaults.redeem_url,
                    "validateUrl": defaults.validate_url,
                    "scope": defaults.scope,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    for kind in kinds {
        let defaults = provider_defaults(kind);
        println!();
        println!("{} ({})", defaults.provider_name.bold(), kind.id().dimmed());
        println!("  {} {}", "Login:".cyan(), defaults.login_url);
        println!("  {} {}", "Redeem:".cyan(), defaults.redeem_url);
        println!("  {} {}", "Validate:".cyan(), defaults.validate_url);
        println!("  {} {}", "Scope:".cyan(), defaults.scope);
    }
    println!();

    Ok(())
}
