//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{
    Channel, ChatMessage, DomainError, MessageQuery, ReactionAction, ReactionSymbol,
    ReactionTarget, TokenSet, UserProfile,
};
use std::time::Duration;

/// Zoom Team Chat API gateway. Resolve identity, list channels/messages,
/// apply reactions.
#[async_trait::async_trait]
pub trait ChatGateway: Send + Sync {
    /// Resolve the acting user from the bearer token (GET /users/me).
    async fn get_me(&self) -> Result<UserProfile, DomainError>;

    /// List all channels the user is a member of. Follows `next_page_token`
    /// pagination until exhausted; pages are concatenated in order.
    async fn list_channels(&self, user_id: &str) -> Result<Vec<Channel>, DomainError>;

    /// List messages matching `query`. Paginated like `list_channels`.
    async fn list_messages(
        &self,
        user_id: &str,
        query: &MessageQuery,
    ) -> Result<Vec<ChatMessage>, DomainError>;

    /// Apply (or remove) one reaction on the target message. A 204 response
    /// is success with no body; otherwise the response JSON is returned.
    async fn add_reaction(
        &self,
        user_id: &str,
        target: &ReactionTarget,
        symbol: &ReactionSymbol,
        action: ReactionAction,
    ) -> Result<Option<serde_json::Value>, DomainError>;
}

/// Source of the reaction symbols offered in the menus. One implementation
/// reads a file, one returns a built-in list; the sender never cares which.
#[async_trait::async_trait]
pub trait EmojiCatalog: Send + Sync {
    async fn load(&self) -> Result<Vec<ReactionSymbol>, DomainError>;
}

/// Persist tokens so the next run finds them (flat key=value .env file).
#[async_trait::async_trait]
pub trait TokenStore: Send + Sync {
    async fn save(&self, tokens: &TokenSet) -> Result<(), DomainError>;
}

/// OAuth Authorization Code exchange against the token endpoint.
#[async_trait::async_trait]
pub trait TokenExchanger: Send + Sync {
    async fn exchange(&self, code: &str) -> Result<TokenSet, DomainError>;
}

/// One-shot capture of the authorization code from the OAuth redirect.
/// Holds its port for a single request, released on every exit path.
#[async_trait::async_trait]
pub trait CodeListener: Send + Sync {
    async fn wait_for_code(&self, timeout: Duration) -> Result<String, DomainError>;
}
