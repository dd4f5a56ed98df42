// The adapter contract shared by every identity provider.

use async_trait::async_trait;
use gatehouse_core::{AuthLogger, ProviderData, ProviderError, Result, SessionState};

/// An identity-provider adapter.
///
/// Every call performs a fresh upstream round trip; implementations hold only
/// immutable configuration and may be shared across tasks.
#[async_trait]
pub trait Provider: Send + Sync + std::fmt::Debug {
    /// Endpoint and scope configuration, with defaults applied.
    fn data(&self) -> &ProviderData;

    /// Human-readable provider name ("GitHub", "GitLab").
    fn name(&self) -> &str {
        &self.data().provider_name
    }

    /// Whether users may sign in with a personal token instead of the OAuth flow.
    fn supports_personal_tokens(&self) -> bool {
        false
    }

    /// Restrict access to members of `org` (and, optionally, one of the
    /// comma-separated `team` slugs). Must run before the authorization URL
    /// is built since it may widen the requested scope.
    fn configure_org_team_policy(&mut self, org: &str, team: &str) -> Result<()> {
        if org.is_empty() && team.is_empty() {
            return Ok(());
        }
        Err(ProviderError::Config(format!(
            "{} does not support organization/team restrictions",
            self.name()
        )))
    }

    /// Whether the session's credential is currently accepted upstream.
    /// Every failure collapses to `false`; the cause goes to the logger.
    async fn validate_session(&self, session: &SessionState) -> bool;

    /// The account's primary email. `Ok(None)` means "unknown": no primary
    /// address, or the membership gate denied access.
    async fn fetch_email(&self, session: &SessionState) -> Result<Option<String>>;

    /// The account's canonical username.
    async fn fetch_username(&self, session: &SessionState) -> Result<String>;
}

/// Collapse a validation result to a boolean, reporting the failure.
pub(crate) fn report_validation(logger: &AuthLogger, provider: &str, result: Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(ProviderError::NoCredential) => {
            logger.debug(&format!("{provider} session has no credential [NO_CREDENTIAL]"));
            false
        }
        Err(err) => {
            logger.warn(&format!(
                "{provider} session validation failed [{}]: {err}",
                err.code()
            ));
            false
        }
    }
}
