//! Zoom Team Chat REST adapter. Implements ChatGateway via reqwest.
//!
//! Error bodies are JSON `{code, message}`; the domain error code is parsed
//! and classified alongside the HTTP status, so retryable conditions (429,
//! code 5301) come back as their own DomainError variants.

use crate::domain::errors::TRANSIENT_SERVER_CODE;
use crate::domain::{
    Channel, ChatMessage, Container, DomainError, MessageQuery, ReactionAction, ReactionSymbol,
    ReactionTarget, UserProfile,
};
use crate::ports::ChatGateway;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::debug;

const BASE_URL: &str = "https://api.zoom.us/v2";

/// Zoom API adapter. Bearer-token authenticated REST calls.
pub struct ZoomChatGateway {
    client: Client,
    base_url: String,
    access_token: String,
    /// Page size for paginated listings.
    page_size: u32,
}

impl ZoomChatGateway {
    pub fn new(access_token: String, page_size: u32) -> Self {
        Self {
            client: Client::new(),
            base_url: BASE_URL.to_string(),
            access_token,
            page_size,
        }
    }

    /// Check a response status; non-2xx becomes a classified DomainError.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, DomainError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_error(status.as_u16(), &body))
    }
}

fn network_error(e: reqwest::Error) -> DomainError {
    DomainError::Network(e.to_string())
}

fn parse_error(e: reqwest::Error) -> DomainError {
    DomainError::Http {
        status: 200,
        code: None,
        message: format!("failed to parse API response: {e}"),
    }
}

/// Map a non-2xx status plus raw body to the structured error taxonomy.
fn classify_error(status: u16, body: &str) -> DomainError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
    let code = parsed.as_ref().and_then(|b| b.code);
    let message = parsed
        .and_then(|b| b.message)
        .unwrap_or_else(|| body.trim().chars().take(200).collect());

    if status == 429 {
        return DomainError::RateLimited(message);
    }
    if code == Some(TRANSIENT_SERVER_CODE) {
        return DomainError::TransientServer {
            code: TRANSIENT_SERVER_CODE,
            message,
        };
    }
    if status == 401 {
        return DomainError::Auth(message);
    }
    DomainError::Http {
        status,
        code,
        message,
    }
}

/// One page of a `next_page_token` listing.
struct Page<T> {
    items: Vec<T>,
    next_page_token: Option<String>,
}

/// Follow `next_page_token` until the API stops sending one (absent or
/// empty), concatenating pages in order.
async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>, DomainError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, DomainError>>,
{
    let mut items = Vec::new();
    let mut token: Option<String> = None;
    loop {
        let page = fetch(token.take()).await?;
        items.extend(page.items);
        match page.next_page_token.filter(|t| !t.is_empty()) {
            Some(t) => token = Some(t),
            None => break,
        }
    }
    Ok(items)
}

// ── Wire DTOs ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct UserDto {
    id: String,
    display_name: Option<String>,
    email: Option<String>,
}

#[derive(Deserialize)]
struct ChannelPage {
    #[serde(default)]
    channels: Vec<ChannelDto>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct ChannelDto {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct MessagePage {
    #[serde(default)]
    messages: Vec<MessageDto>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct MessageDto {
    id: String,
    #[serde(default)]
    sender: String,
    date_time: Option<String>,
    #[serde(default)]
    message: String,
}

impl MessageDto {
    fn into_domain(self) -> ChatMessage {
        let date_time = self
            .date_time
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));
        ChatMessage {
            id: self.id,
            sender: self.sender,
            date_time,
            text: self.message,
            channel_id: None,
        }
    }
}

#[derive(Serialize)]
struct ReactionBody<'a> {
    action: ReactionAction,
    emoji: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_contact: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_channel: Option<&'a str>,
}

#[async_trait::async_trait]
impl ChatGateway for ZoomChatGateway {
    async fn get_me(&self) -> Result<UserProfile, DomainError> {
        let url = format!("{}/users/me", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(network_error)?;
        let response = Self::check(response).await?;
        let user: UserDto = response.json().await.map_err(parse_error)?;
        Ok(UserProfile {
            id: user.id,
            display_name: user.display_name,
            email: user.email,
        })
    }

    async fn list_channels(&self, user_id: &str) -> Result<Vec<Channel>, DomainError> {
        let url = format!("{}/chat/users/{}/channels", self.base_url, user_id);
        let channels = collect_pages(|token| {
            let url = url.clone();
            async move {
                let mut request = self
                    .client
                    .get(&url)
                    .bearer_auth(&self.access_token)
                    .query(&[("page_size", self.page_size.to_string())]);
                if let Some(t) = token {
                    request = request.query(&[("next_page_token", t)]);
                }
                let response = request.send().await.map_err(network_error)?;
                let response = Self::check(response).await?;
                let page: ChannelPage = response.json().await.map_err(parse_error)?;
                Ok(Page {
                    items: page.channels,
                    next_page_token: page.next_page_token,
                })
            }
        })
        .await?;

        debug!(count = channels.len(), "listed channels");
        Ok(channels
            .into_iter()
            .map(|c| Channel {
                id: c.id,
                name: c.name,
            })
            .collect())
    }

    async fn list_messages(
        &self,
        user_id: &str,
        query: &MessageQuery,
    ) -> Result<Vec<ChatMessage>, DomainError> {
        let url = format!("{}/chat/users/{}/messages", self.base_url, user_id);
        let page_size = if query.page_size > 0 {
            query.page_size
        } else {
            self.page_size
        };

        let messages = collect_pages(|token| {
            let url = url.clone();
            async move {
                let mut params: Vec<(&str, String)> =
                    vec![("page_size", page_size.to_string())];
                match &query.container {
                    Some(Container::Contact(contact)) => {
                        params.push(("to_contact", contact.clone()));
                    }
                    Some(Container::Channel(channel)) => {
                        params.push(("to_channel", channel.clone()));
                    }
                    None => {}
                }
                if let Some(from) = query.date_from {
                    params.push(("from", from.format("%Y-%m-%d").to_string()));
                }
                if let Some(to) = query.date_to {
                    params.push(("to", to.format("%Y-%m-%d").to_string()));
                }
                if let Some(t) = token {
                    params.push(("next_page_token", t));
                }

                let response = self
                    .client
                    .get(&url)
                    .bearer_auth(&self.access_token)
                    .query(&params)
                    .send()
                    .await
                    .map_err(network_error)?;
                let response = Self::check(response).await?;
                let page: MessagePage = response.json().await.map_err(parse_error)?;
                Ok(Page {
                    items: page.messages,
                    next_page_token: page.next_page_token,
                })
            }
        })
        .await?;

        debug!(count = messages.len(), "listed messages");
        Ok(messages.into_iter().map(MessageDto::into_domain).collect())
    }

    async fn add_reaction(
        &self,
        user_id: &str,
        target: &ReactionTarget,
        symbol: &ReactionSymbol,
        action: ReactionAction,
    ) -> Result<Option<serde_json::Value>, DomainError> {
        let emoji = symbol.to_wire()?;
        let url = format!(
            "{}/chat/users/{}/messages/{}/emoji_reactions",
            self.base_url,
            user_id,
            target.message_id()
        );
        let (to_contact, to_channel) = match target.container() {
            Container::Contact(c) => (Some(c.as_str()), None),
            Container::Channel(c) => (None, Some(c.as_str())),
        };
        let body = ReactionBody {
            action,
            emoji,
            to_contact,
            to_channel,
        };

        let response = self
            .client
            .patch(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        // 204 No Content is the normal success shape for this endpoint.
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let response = Self::check(response).await?;
        Ok(response.json::<serde_json::Value>().await.ok())
    }
}
