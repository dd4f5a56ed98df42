// GitLab adapter.
//
// The validate URL is the user endpoint itself; username and email both come
// from that one response. Credentials travel in the query string, with the
// parameter name chosen by credential kind. Org/team gating is not offered.

use async_trait::async_trait;
use gatehouse_core::{
    AuthLogger, ProviderData, ProviderDefaults, Result, SessionState, UpstreamOptions,
};
use serde::Deserialize;
use url::Url;

use crate::attach::{CredentialAttacher, TokenQueryParameter};
use crate::http::{parse_url, UpstreamClient};
use crate::provider::{report_validation, Provider};

/// Endpoints and scope used when the caller leaves them unset.
pub static GITLAB_DEFAULTS: ProviderDefaults = ProviderDefaults {
    provider_name: "GitLab",
    login_url: "https://gitlab.com/oauth/authorize",
    redeem_url: "https://gitlab.com/oauth/token",
    validate_url: "https://gitlab.com/api/v4/user",
    scope: "read_user",
};

/// The fields of `GET /api/v4/user` the adapter cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct GitLabUser {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug)]
pub struct GitLabProvider {
    data: ProviderData,
    client: UpstreamClient,
    attacher: TokenQueryParameter,
    logger: AuthLogger,
}

impl GitLabProvider {
    /// Build the adapter, filling unset endpoints and scope from `GITLAB_DEFAULTS`.
    pub fn new(mut data: ProviderData, upstream: &UpstreamOptions) -> Result<Self> {
        data.apply_defaults(&GITLAB_DEFAULTS);
        Ok(Self {
            data,
            client: UpstreamClient::new(upstream)?,
            attacher: TokenQueryParameter,
            logger: AuthLogger::default(),
        })
    }

    /// Replace the logger used for validation failures.
    pub fn with_logger(mut self, logger: AuthLogger) -> Self {
        self.logger = logger;
        self
    }

    fn user_url(&self) -> Result<Url> {
        parse_url(self.data.validate_url())
    }

    /// Fetch the user record behind the session credential.
    pub async fn fetch_user(&self, session: &SessionState) -> Result<GitLabUser> {
        let credential = session.credential()?;
        let url = self.user_url()?;
        let request = self.attacher.attach(self.client.get(&url), &credential);
        self.client.get_json(request, &url).await
    }

    async fn probe(&self, session: &SessionState) -> Result<()> {
        let credential = session.credential()?;
        let url = self.user_url()?;
        let request = self.attacher.attach(self.client.get(&url), &credential);
        self.client.send(request, &url).await.map(|_| ())
    }
}

#[async_trait]
impl Provider for GitLabProvider {
    fn data(&self) -> &ProviderData {
        &self.data
    }

    fn supports_personal_tokens(&self) -> bool {
        true
    }

    async fn validate_session(&self, session: &SessionState) -> bool {
        let result = self.probe(session).await;
        report_validation(&self.logger, self.name(), result)
    }

    async fn fetch_email(&self, session: &SessionState) -> Result<Option<String>> {
        let user = self.fetch_user(session).await?;
        Ok(user.email.filter(|e| !e.is_empty()))
    }

    async fn fetch_username(&self, session: &SessionState) -> Result<String> {
        Ok(self.fetch_user(session).await?.username)
    }
}
