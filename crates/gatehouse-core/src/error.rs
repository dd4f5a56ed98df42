// Error taxonomy for provider adapter calls.
//
// Every upstream-facing operation returns `ProviderError`. The session
// validity check is the one place that collapses these to a boolean, and it
// reports the `code()` of the swallowed error through the logger instead.

/// Errors surfaced by identity-provider adapters.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The session holds neither a delegated nor a personal token.
    #[error("no access token or personal access token in session")]
    NoCredential,

    /// The upstream answered with a non-2xx status.
    #[error("got {status} from {endpoint:?} {body}")]
    UpstreamHttp {
        status: u16,
        endpoint: String,
        body: String,
    },

    /// The upstream body could not be decoded into the expected shape.
    #[error("failed to decode response from {endpoint:?}: {message}")]
    UpstreamDecode { endpoint: String, message: String },

    /// The request never produced a response (connect, TLS, timeout...).
    #[error("request to {endpoint:?} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A paginated listing kept returning non-empty pages past the cap.
    #[error("{endpoint:?} still returned results after {max_pages} pages")]
    PaginationLimitExceeded { endpoint: String, max_pages: u32 },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProviderError {
    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoCredential => "NO_CREDENTIAL",
            Self::UpstreamHttp { .. } => "UPSTREAM_HTTP",
            Self::UpstreamDecode { .. } => "UPSTREAM_DECODE",
            Self::Transport { .. } => "TRANSPORT",
            Self::PaginationLimitExceeded { .. } => "PAGINATION_LIMIT_EXCEEDED",
            Self::Config(_) => "CONFIG",
        }
    }

    /// HTTP status of an `UpstreamHttp` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UpstreamHttp { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// A request that failed before any response arrived.
    pub fn transport(
        endpoint: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            source: source.into(),
        }
    }

    /// A 2xx body that did not match the expected shape.
    pub fn decode(endpoint: impl Into<String>, message: impl ToString) -> Self {
        Self::UpstreamDecode {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }
}

/// Unified result type for adapter operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            ProviderError::NoCredential,
            ProviderError::UpstreamHttp {
                status: 403,
                endpoint: "https://api.github.com/user".into(),
                body: "forbidden".into(),
            },
            ProviderError::decode("https://api.github.com/user", "eof"),
            ProviderError::transport("https://api.github.com/user", "connection refused"),
            ProviderError::PaginationLimitExceeded {
                endpoint: "https://api.github.com/user/orgs".into(),
                max_pages: 3,
            },
            ProviderError::Config("bad".into()),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_upstream_http_display_and_status() {
        let err = ProviderError::UpstreamHttp {
            status: 403,
            endpoint: "https://api.github.com/user/emails".into(),
            body: "{\"message\":\"Forbidden\"}".into(),
        };
        assert_eq!(err.status(), Some(403));
        let msg = err.to_string();
        assert!(msg.starts_with("got 403 from"));
        assert!(msg.contains("/user/emails"));
        assert!(msg.contains("Forbidden"));
    }

    #[test]
    fn test_transport_keeps_source() {
        let err = ProviderError::transport("https://gitlab.com/api/v4/user", "timed out");
        assert_eq!(err.code(), "TRANSPORT");
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.status(), None);
    }
}
