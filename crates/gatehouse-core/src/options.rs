// Provider configuration.
//
// `ProviderData` is the caller-supplied, partially populated endpoint/scope
// record; each adapter fills the gaps from its `ProviderDefaults`.
// `ProviderOptions` is the full configuration loaded from serde or the
// environment.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};

/// Scope GitHub needs to list a user's organizations and teams.
pub const READ_ORG_SCOPE: &str = "read:org";

/// Supported identity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    GitHub,
    GitLab,
}

impl ProviderKind {
    /// Identifier used in configuration (`github`, `gitlab`).
    pub fn id(&self) -> &'static str {
        match self {
            ProviderKind::GitHub => "github",
            ProviderKind::GitLab => "gitlab",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "github" => Ok(ProviderKind::GitHub),
            "gitlab" => Ok(ProviderKind::GitLab),
            other => Err(ProviderError::Config(format!("unknown provider '{other}'"))),
        }
    }
}

/// Literal endpoint and scope defaults for one provider.
#[derive(Debug, Clone, Copy)]
pub struct ProviderDefaults {
    pub provider_name: &'static str,
    pub login_url: &'static str,
    pub redeem_url: &'static str,
    /// API base for GitHub, the user endpoint itself for GitLab.
    pub validate_url: &'static str,
    pub scope: &'static str,
}

/// Endpoint URLs and scope for a provider. Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderData {
    #[serde(default)]
    pub provider_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redeem_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_url: Option<String>,
    #[serde(default)]
    pub scope: String,
}

impl ProviderData {
    /// Fill every unset URL and an empty scope from `defaults`. Values the
    /// caller supplied are never touched, so this is idempotent.
    pub fn apply_defaults(&mut self, defaults: &ProviderDefaults) {
        self.provider_name = defaults.provider_name.to_string();
        fill_if_unset(&mut self.login_url, defaults.login_url);
        fill_if_unset(&mut self.redeem_url, defaults.redeem_url);
        fill_if_unset(&mut self.validate_url, defaults.validate_url);
        if self.scope.is_empty() {
            self.scope = defaults.scope.to_string();
        }
    }

    /// Authorization endpoint, or `""` before defaults are applied.
    pub fn login_url(&self) -> &str {
        self.login_url.as_deref().unwrap_or_default()
    }

    /// Token-exchange endpoint.
    pub fn redeem_url(&self) -> &str {
        self.redeem_url.as_deref().unwrap_or_default()
    }

    /// API base (GitHub) or user endpoint (GitLab) used for profile fetches and
    /// validity checks.
    pub fn validate_url(&self) -> &str {
        self.validate_url.as_deref().unwrap_or_default()
    }

    /// Whether `scope` is one of the space-separated requested scopes.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scope.split_whitespace().any(|s| s == scope)
    }

    /// Append `scope` unless it is already requested.
    pub fn add_scope(&mut self, scope: &str) {
        if self.has_scope(scope) {
            return;
        }
        if self.scope.is_empty() {
            self.scope = scope.to_string();
        } else {
            self.scope.push(' ');
            self.scope.push_str(scope);
        }
    }
}

fn fill_if_unset(slot: &mut Option<String>, default: &str) {
    if slot.as_deref().map_or(true, str::is_empty) {
        *slot = Some(default.to_string());
    }
}

/// Limits applied to every upstream call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamOptions {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Hard cap on pages fetched from a paginated listing.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_request_timeout_secs() -> u64 {
    10
}
fn default_max_pages() -> u32 {
    100
}
fn default_user_agent() -> String {
    "gatehouse".to_string()
}

impl Default for UpstreamOptions {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            max_pages: default_max_pages(),
            user_agent: default_user_agent(),
        }
    }
}

impl UpstreamOptions {
    /// Client-wide timeout applied to every upstream request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Complete adapter configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOptions {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default)]
    pub data: ProviderData,
    #[serde(default)]
    pub upstream: UpstreamOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_org: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_team: Option<String>,
}

impl ProviderOptions {
    /// Defaults for `provider`.
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            ..Default::default()
        }
    }

    /// Load from `GATEHOUSE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Missing or empty keys keep their
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut options = match get("GATEHOUSE_PROVIDER") {
            Some(id) => Self::new(id.parse()?),
            None => Self::default(),
        };

        options.data.login_url = get("GATEHOUSE_LOGIN_URL");
        options.data.redeem_url = get("GATEHOUSE_REDEEM_URL");
        options.data.validate_url = get("GATEHOUSE_VALIDATE_URL");
        options.data.scope = get("GATEHOUSE_SCOPE").unwrap_or_default();
        options.github_org = get("GATEHOUSE_GITHUB_ORG");
        options.github_team = get("GATEHOUSE_GITHUB_TEAM");

        if let Some(raw) = get("GATEHOUSE_REQUEST_TIMEOUT_SECS") {
            options.upstream.request_timeout_secs =
                parse_number("GATEHOUSE_REQUEST_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = get("GATEHOUSE_MAX_PAGES") {
            options.upstream.max_pages = parse_number("GATEHOUSE_MAX_PAGES", &raw)?;
        }
        if let Some(ua) = get("GATEHOUSE_USER_AGENT") {
            options.upstream.user_agent = ua;
        }

        Ok(options)
    }
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| {
            ProviderError::Config(format!("{key} must be a non-negative integer, got '{raw}'"))
        })
}
