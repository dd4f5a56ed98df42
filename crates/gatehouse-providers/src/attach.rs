// Credential attachment.
//
// Providers differ only in how a resolved credential travels on the wire, so
// that choice lives behind `CredentialAttacher` and the gate and profile
// logic above it stays provider-agnostic.

use gatehouse_core::Credential;
use reqwest::RequestBuilder;

/// Attaches a resolved credential to an outbound request.
pub trait CredentialAttacher: Send + Sync + std::fmt::Debug {
    fn attach(&self, request: RequestBuilder, credential: &Credential) -> RequestBuilder;
}

/// `Authorization: token <value>` for either credential kind (GitHub).
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenHeader;

impl CredentialAttacher for TokenHeader {
    fn attach(&self, request: RequestBuilder, credential: &Credential) -> RequestBuilder {
        request.header(
            reqwest::header::AUTHORIZATION,
            format!("token {}", credential.token()),
        )
    }
}

/// Query parameter whose name depends on the credential kind (GitLab):
/// `access_token` for delegated tokens, `private_token` for personal ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenQueryParameter;

impl TokenQueryParameter {
    /// `access_token` for delegated tokens, `private_token` for personal ones.
    pub fn parameter_name(credential: &Credential) -> &'static str {
        match credential {
            Credential::Delegated(_) => "access_token",
            Credential::Personal(_) => "private_token",
        }
    }
}

impl CredentialAttacher for TokenQueryParameter {
    fn attach(&self, request: RequestBuilder, credential: &Credential) -> RequestBuilder {
        request.query(&[(Self::parameter_name(credential), credential.token())])
    }
}
