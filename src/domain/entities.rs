//! Domain entities. Pure data structures for the core business.
//!
//! No Zoom/IO types here — these are mapped from adapters.

use crate::domain::errors::DomainError;
use crate::domain::reaction::ReactionSymbol;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A Zoom Team Chat channel the user is a member of.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
}

/// A single Team Chat message, as shown in the selection menus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender: String,
    pub date_time: Option<DateTime<Utc>>,
    pub text: String,
    /// Channel the message was fetched from, when browsing across channels.
    pub channel_id: Option<String>,
}

/// The acting identity resolved from /users/me.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// Where a reaction lands: a 1:1 contact chat or a channel. Exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Container {
    Contact(String),
    Channel(String),
}

/// A (message, container) pair a reaction is applied to.
///
/// Construction validates the invariant: message id non-empty, exactly one
/// of contact/channel set. There is no silent fallback.
#[derive(Debug, Clone)]
pub struct ReactionTarget {
    message_id: String,
    container: Container,
}

impl ReactionTarget {
    pub fn new(
        message_id: impl Into<String>,
        to_contact: Option<String>,
        to_channel: Option<String>,
    ) -> Result<Self, DomainError> {
        let message_id = message_id.into();
        if message_id.trim().is_empty() {
            return Err(DomainError::Input("message id must not be empty".into()));
        }
        let container = match (to_contact, to_channel) {
            (Some(contact), None) => Container::Contact(contact),
            (None, Some(channel)) => Container::Channel(channel),
            (None, None) => {
                return Err(DomainError::Input(
                    "reaction target needs a contact or a channel".into(),
                ));
            }
            (Some(_), Some(_)) => {
                return Err(DomainError::Input(
                    "reaction target cannot have both a contact and a channel".into(),
                ));
            }
        };
        Ok(Self {
            message_id,
            container,
        })
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    pub fn container(&self) -> &Container {
        &self.container
    }
}

/// Per-symbol result of a batch send. Created once, never mutated.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub symbol: ReactionSymbol,
    pub success: bool,
    /// API response body on success (None for 204 No Content).
    pub response: Option<serde_json::Value>,
    /// Rendered error on failure.
    pub error: Option<String>,
}

impl SendOutcome {
    pub fn ok(symbol: ReactionSymbol, response: Option<serde_json::Value>) -> Self {
        Self {
            symbol,
            success: true,
            response,
            error: None,
        }
    }

    pub fn failed(symbol: ReactionSymbol, error: &DomainError) -> Self {
        Self {
            symbol,
            success: false,
            response: None,
            error: Some(error.to_string()),
        }
    }
}

/// Filters for the message lister. `container` narrows to a contact or
/// channel; dates are inclusive YYYY-MM-DD bounds on the Zoom side.
#[derive(Debug, Clone, Default)]
pub struct MessageQuery {
    pub container: Option<Container>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub page_size: u32,
}

/// Tokens returned by the OAuth code exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
}
