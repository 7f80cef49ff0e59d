//! OAuth bootstrap flow: capture an authorization code via the one-shot
//! local listener, exchange it for tokens, persist them.
//!
//! One run of this flow equals one authorize/exchange round trip. Token
//! refresh is out of scope; rerun the flow when the access token expires.

use crate::domain::{DomainError, TokenSet};
use crate::ports::{CodeListener, TokenExchanger, TokenStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use url::Url;

const AUTHORIZE_URL: &str = "https://zoom.us/oauth/authorize";

/// OAuth scopes the tool needs (message listing, reaction update, channel
/// listing, identity).
pub const REQUIRED_SCOPES: &[&str] = &[
    "team_chat:read:list_user_messages",
    "team_chat:update:message_emoji",
    "team_chat:read:list_user_channels",
    "user:read:user",
];

/// Auth service. Orchestrates listener, exchanger and store via ports.
pub struct AuthService {
    listener: Arc<dyn CodeListener>,
    exchanger: Arc<dyn TokenExchanger>,
    store: Arc<dyn TokenStore>,
    client_id: String,
    redirect_uri: String,
    /// How long the listener waits for the browser redirect.
    wait_timeout: Duration,
}

impl AuthService {
    pub fn new(
        listener: Arc<dyn CodeListener>,
        exchanger: Arc<dyn TokenExchanger>,
        store: Arc<dyn TokenStore>,
        client_id: String,
        redirect_uri: String,
        wait_timeout: Duration,
    ) -> Self {
        Self {
            listener,
            exchanger,
            store,
            client_id,
            redirect_uri,
            wait_timeout,
        }
    }

    /// The URL the user opens in a browser to authorize the app.
    pub fn authorize_url(&self) -> String {
        let mut url = Url::parse(AUTHORIZE_URL).expect("static authorize URL");
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri);
        url.to_string()
    }

    /// Wait for the redirect, exchange the code, save the tokens.
    pub async fn run_flow(&self) -> Result<TokenSet, DomainError> {
        let code = self.listener.wait_for_code(self.wait_timeout).await?;
        info!("authorization code received");

        let tokens = self.exchanger.exchange(&code).await?;
        if tokens.access_token.is_empty() {
            return Err(DomainError::Auth(
                "token endpoint returned an empty access token".into(),
            ));
        }

        self.store.save(&tokens).await?;
        info!(
            expires_in = tokens.expires_in,
            has_refresh = tokens.refresh_token.is_some(),
            "tokens saved"
        );
        Ok(tokens)
    }
}
