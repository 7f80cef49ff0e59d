//! Zoom OAuth token endpoint adapter. Implements TokenExchanger.
//!
//! Standard Authorization Code exchange: one form-encoded POST with HTTP
//! Basic client credentials.

use crate::domain::{DomainError, TokenSet};
use crate::ports::TokenExchanger;
use reqwest::Client;
use serde::Deserialize;

const TOKEN_URL: &str = "https://zoom.us/oauth/token";

/// Token exchange adapter. Client credentials are set once at construction.
pub struct ZoomTokenExchanger {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
}

impl ZoomTokenExchanger {
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            client: Client::new(),
            token_url: TOKEN_URL.to_string(),
            client_id,
            client_secret,
            redirect_uri,
        }
    }
}

#[async_trait::async_trait]
impl TokenExchanger for ZoomTokenExchanger {
    async fn exchange(&self, code: &str) -> Result<TokenSet, DomainError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&params)
            .send()
            .await
            .map_err(|e| DomainError::Network(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::Http {
                status: status.as_u16(),
                code: None,
                message: format!(
                    "token exchange failed: {}",
                    body.trim().chars().take(200).collect::<String>()
                ),
            });
        }

        let tokens: TokenResponse = response.json().await.map_err(|e| {
            DomainError::Http {
                status: 200,
                code: None,
                message: format!("failed to parse token response: {e}"),
            }
        })?;

        Ok(TokenSet {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
        })
    }
}
