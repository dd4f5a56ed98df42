// Upstream HTTP client.
//
// Thin wrapper over `reqwest::Client` that applies the request timeout and
// user agent, and maps every failure onto `ProviderError`. Endpoints handed to
// it are the pre-attachment URLs, so credentials carried in query strings
// never end up in errors or logs.

use gatehouse_core::{ProviderError, Result, UpstreamOptions};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use url::Url;

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    max_pages: u32,
}

impl UpstreamClient {
    /// Build a client with the configured timeout and user agent.
    ///
    /// Fails with `Config` when `max_pages` is zero or the TLS backend cannot
    /// be initialised.
    pub fn new(options: &UpstreamOptions) -> Result<Self> {
        if options.max_pages == 0 {
            return Err(ProviderError::Config("max_pages must be at least 1".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(options.request_timeout())
            .user_agent(options.user_agent.clone())
            .build()
            .map_err(|e| ProviderError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_pages: options.max_pages,
        })
    }

    /// Page cap for paginated listings.
    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Start an unauthenticated GET; adapters attach the credential.
    pub fn get(&self, url: &Url) -> RequestBuilder {
        self.client.get(url.clone())
    }

    /// Send `request` and return the body of a 2xx response.
    pub async fn send(&self, request: RequestBuilder, endpoint: &Url) -> Result<String> {
        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::transport(endpoint.as_str(), e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::transport(endpoint.as_str(), e.without_url()))?;

        tracing::debug!(endpoint = %endpoint, status = status.as_u16(), "upstream response");

        if !status.is_success() {
            return Err(ProviderError::UpstreamHttp {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
                body,
            });
        }
        Ok(body)
    }

    /// Send `request` and decode a 2xx body as JSON.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &Url,
    ) -> Result<T> {
        let body = self.send(request, endpoint).await?;
        serde_json::from_str(&body).map_err(|e| ProviderError::decode(endpoint.as_str(), e))
    }
}

/// Parse a configured URL.
pub fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| ProviderError::Config(format!("invalid URL '{raw}': {e}")))
}

/// Join `suffix` onto the path of the API base, keeping any base path
/// (`https://ghe.corp/api/v3` + `/user` gives `/api/v3/user`).
pub fn api_endpoint(base: &str, suffix: &str) -> Result<Url> {
    let mut url = parse_url(base)?;
    let path = format!(
        "{}/{}",
        url.path().trim_end_matches('/'),
        suffix.trim_start_matches('/')
    );
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_endpoint_root_base() {
        let url = api_endpoint("https://api.github.com/", "/user/orgs").unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/user/orgs");

        let bare = api_endpoint("https://api.github.com", "user").unwrap();
        assert_eq!(bare.as_str(), "https://api.github.com/user");
    }

    #[test]
    fn test_api_endpoint_keeps_base_path() {
        let url = api_endpoint("https://ghe.corp/api/v3/", "/user/teams").unwrap();
        assert_eq!(url.as_str(), "https://ghe.corp/api/v3/user/teams");
    }

    #[test]
    fn test_api_endpoint_drops_base_query() {
        let url = api_endpoint("https://ghe.corp/api/v3?x=1", "/user").unwrap();
        assert_eq!(url.as_str(), "https://ghe.corp/api/v3/user");
    }

    #[test]
    fn test_invalid_base_is_config_error() {
        let err = api_endpoint("not a url", "/user").unwrap_err();
        assert_eq!(err.code(), "CONFIG");
    }

    #[test]
    fn test_zero_max_pages_rejected() {
        let options = UpstreamOptions {
            max_pages: 0,
            ..Default::default()
        };
        assert!(matches!(UpstreamClient::new(&options), Err(ProviderError::Config(_))));
    }
}
