//! Shared building blocks for gatehouse identity-provider adapters: the
//! error taxonomy, the injectable logger, provider configuration and the
//! session/credential model.

pub mod env;
pub mod error;
pub mod logger;
pub mod options;
pub mod session;

pub use error::{ProviderError, Result};
pub use logger::{AuthLogger, LogHandler, LogLevel, LoggerConfig, RecordingLogHandler};
pub use options::{
    ProviderData, ProviderDefaults, ProviderKind, ProviderOptions, UpstreamOptions, READ_ORG_SCOPE,
};
pub use session::{Credential, CredentialKind, SessionState};
