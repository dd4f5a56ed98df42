// GitHub adapter.
//
// Credentials travel as `Authorization: token <value>` regardless of kind.
// The validate URL is the API base; every endpoint is joined onto it so
// GitHub Enterprise bases such as `https://ghe.corp/api/v3` work unchanged.

use async_trait::async_trait;
use gatehouse_core::{
    AuthLogger, Credential, ProviderData, ProviderDefaults, Result, SessionState, UpstreamOptions,
    READ_ORG_SCOPE,
};
use reqwest::header::ACCEPT;
use reqwest::RequestBuilder;
use serde::Deserialize;
use url::Url;

use crate::attach::{CredentialAttacher, TokenHeader};
use crate::http::{api_endpoint, UpstreamClient};
use crate::membership::{collect_pages, GateOutcome, MembershipPolicy, Organization, Team};
use crate::provider::{report_validation, Provider};

/// Endpoints and scope used when the caller leaves them unset.
pub static GITHUB_DEFAULTS: ProviderDefaults = ProviderDefaults {
    provider_name: "GitHub",
    login_url: "https://github.com/login/oauth/authorize",
    redeem_url: "https://github.com/login/oauth/access_token",
    validate_url: "https://api.github.com/",
    scope: "user:email",
};

const GITHUB_V3_ACCEPT: &str = "application/vnd.github.v3+json";
const LISTING_LIMIT: &str = "200";

/// Entry from `GET /user/emails`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubEmail {
    pub email: String,
    #[serde(default)]
    pub primary: bool,
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
}

/// The address marked primary, if any. No primary means no answer.
pub fn primary_email(emails: &[GitHubEmail]) -> Option<String> {
    emails.iter().find(|e| e.primary).map(|e| e.email.clone())
}

#[derive(Debug)]
pub struct GitHubProvider {
    data: ProviderData,
    policy: MembershipPolicy,
    client: UpstreamClient,
    attacher: TokenHeader,
    logger: AuthLogger,
}

impl GitHubProvider {
    /// Build the adapter, filling unset endpoints and scope from `GITHUB_DEFAULTS`.
    /// No membership policy is active until `configure_org_team_policy` runs.
    pub fn new(mut data: ProviderData, upstream: &UpstreamOptions) -> Result<Self> {
        data.apply_defaults(&GITHUB_DEFAULTS);
        Ok(Self {
            data,
            policy: MembershipPolicy::default(),
            client: UpstreamClient::new(upstream)?,
            attacher: TokenHeader,
            logger: AuthLogger::default(),
        })
    }

    /// Replace the logger used for gate diagnostics and validation failures.
    pub fn with_logger(mut self, logger: AuthLogger) -> Self {
        self.logger = logger;
        self
    }

    /// The active org/team policy.
    pub fn policy(&self) -> &MembershipPolicy {
        &self.policy
    }

    fn api_url(&self, path: &str) -> Result<Url> {
        api_endpoint(self.data.validate_url(), path)
    }

    fn authorized_get(&self, url: &Url, credential: &Credential) -> RequestBuilder {
        self.attacher.attach(self.client.get(url), credential)
    }

    /// Run the membership gate. Denials are logged with what was present;
    /// callers only see the boolean.
    pub async fn authorize(&self, credential: &Credential) -> Result<bool> {
        let outcome = self.check_membership(credential).await?;
        match outcome {
            GateOutcome::Unrestricted => {}
            GateOutcome::Granted { .. } => self.logger.info(&outcome.to_string()),
            GateOutcome::Denied(_) => self.logger.warn(&outcome.to_string()),
        }
        Ok(outcome.is_granted())
    }

    /// Evaluate the configured policy against the account's memberships.
    pub async fn check_membership(&self, credential: &Credential) -> Result<GateOutcome> {
        if !self.policy.is_enabled() {
            return Ok(GateOutcome::Unrestricted);
        }
        if self.policy.requires_team() {
            let teams = self.list_teams(credential).await?;
            Ok(self.policy.check_teams(&teams))
        } else {
            let orgs = self.list_orgs(credential).await?;
            Ok(self.policy.check_orgs(&orgs))
        }
    }

    /// Every organization the account belongs to, across all pages.
    pub async fn list_orgs(&self, credential: &Credential) -> Result<Vec<Organization>> {
        let endpoint = self.api_url("/user/orgs")?;
        collect_pages(endpoint.as_str(), self.client.max_pages(), |page| {
            self.fetch_org_page(credential, page)
        })
        .await
    }

    async fn fetch_org_page(
        &self,
        credential: &Credential,
        page: u32,
    ) -> Result<Vec<Organization>> {
        let mut url = self.api_url("/user/orgs")?;
        url.query_pairs_mut()
            .append_pair("limit", LISTING_LIMIT)
            .append_pair("page", &page.to_string());

        let request = self.authorized_get(&url, credential).header(ACCEPT, GITHUB_V3_ACCEPT);
        self.client.get_json(request, &url).await
    }

    /// Teams the account belongs to (single request).
    pub async fn list_teams(&self, credential: &Credential) -> Result<Vec<Team>> {
        let mut url = self.api_url("/user/teams")?;
        url.query_pairs_mut().append_pair("limit", LISTING_LIMIT);

        let request = self.authorized_get(&url, credential).header(ACCEPT, GITHUB_V3_ACCEPT);
        self.client.get_json(request, &url).await
    }

    /// Lightweight authenticated request against `/user`.
    async fn probe(&self, session: &SessionState) -> Result<()> {
        let credential = session.credential()?;
        let url = self.api_url("/user")?;
        self.client
            .send(self.authorized_get(&url, &credential), &url)
            .await
            .map(|_| ())
    }

    /// Every address on the account, primary or not.
    pub async fn list_emails(&self, credential: &Credential) -> Result<Vec<GitHubEmail>> {
        let url = self.api_url("/user/emails")?;
        let request = self.authorized_get(&url, credential);
        self.client.get_json(request, &url).await
    }
}

#[async_trait]
impl Provider for GitHubProvider {
    fn data(&self) -> &ProviderData {
        &self.data
    }

    fn supports_personal_tokens(&self) -> bool {
        true
    }

    fn configure_org_team_policy(&mut self, org: &str, team: &str) -> Result<()> {
        self.policy = MembershipPolicy::new(org, team);
        if !org.is_empty() || !team.is_empty() {
            self.data.add_scope(READ_ORG_SCOPE);
        }
        Ok(())
    }

    async fn validate_session(&self, session: &SessionState) -> bool {
        let result = self.probe(session).await;
        report_validation(&self.logger, self.name(), result)
    }

    async fn fetch_email(&self, session: &SessionState) -> Result<Option<String>> {
        let credential = session.credential()?;
        if !self.authorize(&credential).await? {
            return Ok(None);
        }
        let emails = self.list_emails(&credential).await?;
        Ok(primary_email(&emails))
    }

    async fn fetch_username(&self, session: &SessionState) -> Result<String> {
        let credential = session.credential()?;
        let url = self.api_url("/user")?;
        let user: GitHubUser = self
            .client
            .get_json(self.authorized_get(&url, &credential), &url)
            .await?;
        Ok(user.login)
    }
}
