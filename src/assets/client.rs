// Raw content HTTP client.
// Fetches static files from raw.githubusercontent.com style URLs as opaque bytes.

use reqwest::{
    Client, Response, StatusCode,
    header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::error::{Error, Result};

const CLIENT_USER_AGENT: &str = concat!("backend-helpers/", env!("CARGO_PKG_VERSION"));

/// Something that can fetch the full body of a URL.
pub trait Fetch {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// HTTP client for raw repository content.
#[derive(Debug, Clone)]
pub struct RawContentClient {
    client: Client,
}

impl RawContentClient {
    /// Create a client, optionally authenticated for private repositories.
    pub fn new(token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| Error::Config(format!("invalid GITHUB_TOKEN: {}", e)))?,
            );
        }
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(Error::Http)?;

        Ok(Self { client })
    }

    /// Create a client using GITHUB_TOKEN when it is set.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
        Self::new(token.as_deref())
    }

    /// Make a GET request.
    pub async fn get(&self, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await.map_err(Error::Http)?;
        check_response(response)
    }
}

impl Fetch for RawContentClient {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get(url).await?;
        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

/// Check response status and convert errors.
fn check_response(response: Response) -> Result<Response> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(Error::NotFound(response.url().to_string())),
        status => Err(Error::Status {
            status,
            url: response.url().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds() {
        assert!(RawContentClient::new(None).is_ok());
        assert!(RawContentClient::new(Some("ghp_example")).is_ok());
    }

    #[test]
    fn test_invalid_token_rejected() {
        let err = RawContentClient::new(Some("bad\ntoken")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
