//! Channel and message browsing: feeds the selection menus.
//!
//! Aggregates paginated listings from the gateway, merges recent messages
//! across channels, and keeps the lookback window in one place.

use crate::domain::{Channel, ChatMessage, Container, DomainError, MessageQuery};
use crate::ports::ChatGateway;
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use tracing::warn;

/// Browse service. Read-only lookups for the interactive selector.
pub struct BrowseService {
    gateway: Arc<dyn ChatGateway>,
    /// How many days back the message listings reach.
    lookback_days: i64,
    /// Cap on the merged recent-messages view.
    recent_limit: usize,
}

impl BrowseService {
    pub fn new(gateway: Arc<dyn ChatGateway>, lookback_days: i64, recent_limit: usize) -> Self {
        Self {
            gateway,
            lookback_days,
            recent_limit,
        }
    }

    /// All channels the user is a member of (every page).
    pub async fn channels(&self, user_id: &str) -> Result<Vec<Channel>, DomainError> {
        self.gateway.list_channels(user_id).await
    }

    /// Most recent messages across every channel, newest first, capped at
    /// `recent_limit`. Channels that fail to list are skipped with a warning
    /// so one broken channel does not hide the rest.
    pub async fn recent_across_channels(
        &self,
        user_id: &str,
    ) -> Result<Vec<ChatMessage>, DomainError> {
        let channels = self.gateway.list_channels(user_id).await?;
        let mut merged: Vec<ChatMessage> = Vec::new();

        for channel in &channels {
            let query = self.window_query(Some(Container::Channel(channel.id.clone())), 10);
            match self.gateway.list_messages(user_id, &query).await {
                Ok(messages) => {
                    merged.extend(messages.into_iter().map(|mut m| {
                        m.channel_id = Some(channel.id.clone());
                        m
                    }));
                }
                Err(e) => {
                    warn!(channel = %channel.name, error = %e, "skipping channel, listing failed");
                }
            }
        }

        merged.sort_by(|a, b| b.date_time.cmp(&a.date_time));
        merged.truncate(self.recent_limit);
        Ok(merged)
    }

    /// Messages from one channel within the lookback window.
    pub async fn messages_in_channel(
        &self,
        user_id: &str,
        channel_id: &str,
    ) -> Result<Vec<ChatMessage>, DomainError> {
        let query = self.window_query(Some(Container::Channel(channel_id.to_string())), 20);
        let mut messages = self.gateway.list_messages(user_id, &query).await?;
        for m in &mut messages {
            m.channel_id = Some(channel_id.to_string());
        }
        Ok(messages)
    }

    fn window_query(&self, container: Option<Container>, page_size: u32) -> MessageQuery {
        let today = Utc::now().date_naive();
        MessageQuery {
            container,
            date_from: Some(today - ChronoDuration::days(self.lookback_days)),
            date_to: None,
            page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ReactionAction, ReactionSymbol, ReactionTarget, UserProfile};
    use chrono::TimeZone;
    use std::sync::Mutex;

    /// Gateway with two channels; "bad" fails to list messages.
    struct TwoChannelGateway {
        queries: Mutex<Vec<MessageQuery>>,
    }

    fn msg(id: &str, ts: i64) -> ChatMessage {
        ChatMessage {
            id: id.to_string(),
            sender: "someone@example.com".to_string(),
            date_time: Some(Utc.timestamp_opt(ts, 0).unwrap()),
            text: format!("message {id}"),
            channel_id: None,
        }
    }

    #[async_trait::async_trait]
    impl ChatGateway for TwoChannelGateway {
        async fn get_me(&self) -> Result<UserProfile, DomainError> {
            unimplemented!()
        }

        async fn list_channels(&self, _user_id: &str) -> Result<Vec<Channel>, DomainError> {
            Ok(vec![
                Channel {
                    id: "good".into(),
                    name: "general".into(),
                },
                Channel {
                    id: "bad".into(),
                    name: "broken".into(),
                },
                Channel {
                    id: "good2".into(),
                    name: "random".into(),
                },
            ])
        }

        async fn list_messages(
            &self,
            _user_id: &str,
            query: &MessageQuery,
        ) -> Result<Vec<ChatMessage>, DomainError> {
            self.queries.lock().unwrap().push(query.clone());
            match &query.container {
                Some(Container::Channel(id)) if id == "good" => {
                    Ok(vec![msg("m1", 1_000), msg("m2", 3_000)])
                }
                Some(Container::Channel(id)) if id == "good2" => Ok(vec![msg("m3", 2_000)]),
                _ => Err(DomainError::Http {
                    status: 403,
                    code: None,
                    message: "forbidden".into(),
                }),
            }
        }

        async fn add_reaction(
            &self,
            _user_id: &str,
            _target: &ReactionTarget,
            _symbol: &ReactionSymbol,
            _action: ReactionAction,
        ) -> Result<Option<serde_json::Value>, DomainError> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn test_recent_merges_sorts_and_tags() {
        let gateway = Arc::new(TwoChannelGateway {
            queries: Mutex::new(Vec::new()),
        });
        let svc = BrowseService::new(Arc::clone(&gateway) as Arc<dyn ChatGateway>, 7, 20);

        let recent = svc.recent_across_channels("me").await.unwrap();

        // Broken channel skipped, survivors merged newest-first.
        assert_eq!(
            recent.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(),
            vec!["m2", "m3", "m1"]
        );
        assert_eq!(recent[0].channel_id.as_deref(), Some("good"));
        assert_eq!(recent[1].channel_id.as_deref(), Some("good2"));
    }

    #[tokio::test]
    async fn test_recent_respects_limit() {
        let gateway = Arc::new(TwoChannelGateway {
            queries: Mutex::new(Vec::new()),
        });
        let svc = BrowseService::new(Arc::clone(&gateway) as Arc<dyn ChatGateway>, 7, 2);

        let recent = svc.recent_across_channels("me").await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, "m2");
    }

    #[tokio::test]
    async fn test_queries_carry_lookback_window() {
        let gateway = Arc::new(TwoChannelGateway {
            queries: Mutex::new(Vec::new()),
        });
        let svc = BrowseService::new(Arc::clone(&gateway) as Arc<dyn ChatGateway>, 7, 20);

        svc.messages_in_channel("me", "good").await.unwrap();

        let queries = gateway.queries.lock().unwrap();
        let expected = Utc::now().date_naive() - ChronoDuration::days(7);
        assert_eq!(queries[0].date_from, Some(expected));
        assert_eq!(queries[0].page_size, 20);
    }
}
