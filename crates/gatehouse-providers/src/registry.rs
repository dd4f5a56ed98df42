// Provider registry.
//
// Builds the adapter named in `ProviderOptions` and applies its org/team
// policy in one step, so callers never see an adapter whose scope is stale.

use gatehouse_core::{AuthLogger, ProviderDefaults, ProviderKind, ProviderOptions, Result};

use crate::github::{GitHubProvider, GITHUB_DEFAULTS};
use crate::gitlab::{GitLabProvider, GITLAB_DEFAULTS};
use crate::provider::Provider;

/// All provider IDs.
pub const PROVIDER_IDS: &[&str] = &["github", "gitlab"];

/// Default endpoints and scope for `kind`.
pub fn provider_defaults(kind: ProviderKind) -> &'static ProviderDefaults {
    match kind {
        ProviderKind::GitHub => &GITHUB_DEFAULTS,
        ProviderKind::GitLab => &GITLAB_DEFAULTS,
    }
}

/// Construct the configured adapter.
pub fn new_provider(options: &ProviderOptions, logger: AuthLogger) -> Result<Box<dyn Provider>> {
    let data = options.data.clone();
    let mut provider: Box<dyn Provider> = match options.provider {
        ProviderKind::GitHub => {
            Box::new(GitHubProvider::new(data, &options.upstream)?.with_logger(logger))
        }
        ProviderKind::GitLab => {
            Box::new(GitLabProvider::new(data, &options.upstream)?.with_logger(logger))
        }
    };

    provider.configure_org_team_policy(
        options.github_org.as_deref().unwrap_or_default(),
        options.github_team.as_deref().unwrap_or_default(),
    )?;

    tracing::debug!(
        provider = provider.name(),
        scope = %provider.data().scope,
        "identity provider configured"
    );
    Ok(provider)
}
