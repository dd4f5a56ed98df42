// `gatehouse probe`: validate a token against a provider and show the
// identity behind it. Settings come from GATEHOUSE_* variables; flags win.

use clap::Args;
use colored::Colorize;
use gatehouse_core::env::init_logger;
use gatehouse_core::{AuthLogger, ProviderOptions, SessionState};
use gatehouse_providers::{new_provider, Provider};

#[derive(Args)]
pub struct ProbeArgs {
    /// Provider id (github, gitlab); defaults to GATEHOUSE_PROVIDER
    #[arg(short, long)]
    provider: Option<String>,

    /// Token to probe
    #[arg(short, long)]
    token: String,

    /// Treat the token as a personal access token instead of a delegated one
    #[arg(long)]
    personal: bool,

    /// Require membership of this organization
    #[arg(long)]
    org: Option<String>,

    /// Comma-separated team slugs accepted within --org
    #[arg(long)]
    team: Option<String>,

    /// API base (GitHub) or user endpoint (GitLab)
    #[arg(long)]
    api_url: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,
}

#[derive(Debug, Default)]
struct ProbeReport {
    provider: String,
    valid: bool,
    username: Option<String>,
    email: Option<String>,
    error: Option<String>,
}

/// Probe the configured provider with one token and print the report.
pub fn run(args: ProbeArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logger();

    let options = apply_overrides(ProviderOptions::from_env()?, &args)?;
    let provider = new_provider(&options, AuthLogger::default())?;
    let session = session_for(&args);

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let report = runtime.block_on(probe(provider.as_ref(), &session));

    if args.json {
        let output = serde_json::json!({
            "provider": report.provider,
            "valid": report.valid,
            "username": report.username,
            "email": report.email,
            "error": report.error,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    println!("{} {}", "Provider:".cyan(), report.provider);
    if report.valid {
        println!("{} {}", "Session:".cyan(), "valid".green());
    } else {
        println!("{} {}", "Session:".cyan(), "invalid".red());
    }
    if let Some(username) = &report.username {
        println!("{} {}", "Username:".cyan(), username);
    }
    match &report.email {
        Some(email) => println!("{} {}", "Email:".cyan(), email),
        None if report.valid && report.error.is_none() => println!(
            "{} {}",
            "Email:".cyan(),
            "none (no primary address or membership denied)".dimmed()
        ),
        None => {}
    }
    if let Some(error) = &report.error {
        println!("{} {}", "Error:".cyan(), error.red());
    }
    println!();

    Ok(())
}

fn apply_overrides(
    mut options: ProviderOptions,
    args: &ProbeArgs,
) -> Result<ProviderOptions, Box<dyn std::error::Error>> {
    if let Some(id) = &args.provider {
        options.provider = id.parse()?;
    }
    if let Some(org) = &args.org {
        options.github_org = Some(org.clone());
    }
    if let Some(team) = &args.team {
        options.github_team = Some(team.clone());
    }
    if let Some(url) = &args.api_url {
        options.data.validate_url = Some(url.clone());
    }
    Ok(options)
}

fn session_for(args: &ProbeArgs) -> SessionState {
    if args.personal {
        SessionState::personal(args.token.as_str())
    } else {
        SessionState::delegated(args.token.as_str())
    }
}

async fn probe(provider: &dyn Provider, session: &SessionState) -> ProbeReport {
    let mut report = ProbeReport {
        provider: provider.name().to_string(),
        valid: provider.validate_session(session).await,
        ..Default::default()
    };
    if !report.valid {
        return report;
    }

    match provider.fetch_username(session).await {
        Ok(username) => report.username = Some(username),
        Err(e) => {
            report.error = Some(format!("[{}] {e}", e.code()));
            return report;
        }
    }
    match provider.fetch_email(session).await {
        Ok(email) => report.email = email,
        Err(e) => report.error = Some(format!("[{}] {e}", e.code())),
    }
    report
}
