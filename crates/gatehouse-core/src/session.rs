// Session record and credential resolution.
//
// A session carries at most one effective token. The gateway obtains a
// delegated token through the OAuth flow; a personal token is supplied by the
// user out-of-band. Both are opaque bearer strings, and only the way they are
// attached to upstream requests differs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};

/// Session state handed to the adapters by the surrounding gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl SessionState {
    /// Session holding a token obtained through the OAuth flow.
    pub fn delegated(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            ..Default::default()
        }
    }

    /// Session holding a user-provisioned personal token.
    pub fn personal(token: impl Into<String>) -> Self {
        Self {
            personal_access_token: Some(token.into()),
            ..Default::default()
        }
    }

    /// Pick the effective credential. The delegated token wins when both are
    /// present; empty strings count as absent.
    pub fn credential(&self) -> Result<Credential> {
        if let Some(token) = non_empty(&self.access_token) {
            return Ok(Credential::Delegated(token.to_string()));
        }
        if let Some(token) = non_empty(&self.personal_access_token) {
            return Ok(Credential::Personal(token.to_string()));
        }
        Err(ProviderError::NoCredential)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    Delegated,
    Personal,
}

/// The resolved bearer token. `Debug` output never contains the secret.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Delegated(String),
    Personal(String),
}

impl Credential {
    /// The raw token value.
    pub fn token(&self) -> &str {
        match self {
            Credential::Delegated(t) | Credential::Personal(t) => t,
        }
    }

    /// Which session field the token came from.
    pub fn kind(&self) -> CredentialKind {
        match self {
            Credential::Delegated(_) => CredentialKind::Delegated,
            Credential::Personal(_) => CredentialKind::Personal,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Credential::Delegated(_) => "Delegated",
            Credential::Personal(_) => "Personal",
        };
        f.debug_tuple(name).field(&"<redacted>").finish()
    }
}
