//! Token issuance: the remote authentication collaborator.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

use crate::credentials::Credentials;
use crate::token::AuthToken;

/// Path of the console's token endpoint, relative to the console base URL.
const TOKEN_ENDPOINT: &str = "auth/token";

/// Default timeout for one exchange request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The external authentication collaborator: credentials in, token out.
///
/// The returned future must be `Send` so the flow driver can run the
/// exchange on the runtime.
pub trait TokenIssuer {
    /// Exchanges the credential pair for a bearer token.
    fn create_token(
        &self,
        credentials: Credentials,
    ) -> impl Future<Output = Result<AuthToken>> + Send;
}

/// Issues tokens from the console's `POST /auth/token` endpoint.
pub struct HttpTokenIssuer {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpTokenIssuer {
    /// Creates an issuer for the console at `console_url`.
    pub fn new(console_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(console_url)
            .with_context(|| format!("Invalid console URL: {console_url}"))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { base_url, http })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl TokenIssuer for HttpTokenIssuer {
    async fn create_token(&self, credentials: Credentials) -> Result<AuthToken> {
        let url = self
            .base_url
            .join(TOKEN_ENDPOINT)
            .context("Failed to build token endpoint URL")?;

        let response = self
            .http
            .post(url)
            .json(&credentials)
            .send()
            .await
            .context("Failed to send token request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Login failed (HTTP {}): {}", status, body);
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse token response")?;

        Ok(AuthToken::new(token.access_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Test: a successful exchange decodes the access token.
    #[tokio::test]
    async fn test_create_token_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/token"))
            .and(body_json(
                serde_json::json!({"username": "admin", "password": "hunter2"}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"access_token": "tok-long-token-value-here"}),
            ))
            .mount(&server)
            .await;

        let issuer = HttpTokenIssuer::new(&server.uri(), DEFAULT_TIMEOUT).unwrap();
        let token = issuer
            .create_token(Credentials::new("admin", "hunter2"))
            .await
            .unwrap();

        assert_eq!(token.as_str(), "tok-long-token-value-here");
    }

    /// Test: a rejection surfaces the status and body verbatim.
    #[tokio::test]
    async fn test_create_token_surfaces_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/token"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid credentials"))
            .mount(&server)
            .await;

        let issuer = HttpTokenIssuer::new(&server.uri(), DEFAULT_TIMEOUT).unwrap();
        let err = issuer
            .create_token(Credentials::new("admin", "wrong"))
            .await
            .unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("401"), "message: {message}");
        assert!(message.contains("Invalid credentials"), "message: {message}");
    }

    /// Test: a malformed success body is an error, not a panic.
    #[tokio::test]
    async fn test_create_token_rejects_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let issuer = HttpTokenIssuer::new(&server.uri(), DEFAULT_TIMEOUT).unwrap();
        let err = issuer
            .create_token(Credentials::new("admin", "hunter2"))
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("Failed to parse token response"));
    }
}
