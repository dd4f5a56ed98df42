//! Identity-provider adapters for an authentication gateway.
//!
//! Given a session holding a delegated OAuth token or a personal token, an
//! adapter answers whether the credential is valid, what the account's
//! username is, and what its primary email is, optionally gated on
//! organization/team membership.

pub mod attach;
pub mod github;
pub mod gitlab;
pub mod http;
pub mod membership;
pub mod provider;
pub mod registry;

pub use attach::{CredentialAttacher, TokenHeader, TokenQueryParameter};
pub use github::{GitHubProvider, GITHUB_DEFAULTS};
pub use gitlab::{GitLabProvider, GITLAB_DEFAULTS};
pub use http::UpstreamClient;
pub use membership::{GateOutcome, MembershipPolicy, Organization, Team};
pub use provider::Provider;
pub use registry::{new_provider, provider_defaults, PROVIDER_IDS};
