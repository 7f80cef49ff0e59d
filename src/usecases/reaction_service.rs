//! Batch reaction sender: the rate-limited core of the tool.
//!
//! - Strictly sequential, one symbol at a time (Zoom caps at 2 req/s and
//!   2000 req/day; pacing is the point, not an optimization target)
//! - Per-symbol retry budget: 429 backs off exponentially, domain code 5301
//!   waits a fixed doubled delay, anything else fails the symbol immediately
//! - Best-effort per item: a failed symbol never aborts the rest of the batch

use crate::domain::{DomainError, ReactionAction, ReactionSymbol, ReactionTarget, SendOutcome};
use crate::ports::ChatGateway;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Reaction service. Applies an ordered list of symbols to one message.
pub struct ReactionService {
    gateway: Arc<dyn ChatGateway>,
    /// Base pause between requests. Default 1s keeps us under the 2 req/s cap.
    delay: Duration,
    /// Retries allowed per symbol, on top of the initial attempt.
    max_retries: u32,
}

impl ReactionService {
    pub fn new(gateway: Arc<dyn ChatGateway>, delay: Duration, max_retries: u32) -> Self {
        Self {
            gateway,
            delay,
            max_retries,
        }
    }

    /// Send every symbol to the target, in input order. Returns one outcome
    /// per symbol, same order. `on_outcome` fires once per finished symbol
    /// (for progress display); failures are aggregated, never propagated.
    pub async fn send_batch<F>(
        &self,
        user_id: &str,
        target: &ReactionTarget,
        symbols: &[ReactionSymbol],
        mut on_outcome: F,
    ) -> Vec<SendOutcome>
    where
        F: FnMut(&SendOutcome),
    {
        let mut outcomes = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let outcome = self.send_one(user_id, target, symbol).await;
            on_outcome(&outcome);
            outcomes.push(outcome);
        }

        let sent = outcomes.iter().filter(|o| o.success).count();
        info!(
            message_id = target.message_id(),
            sent,
            total = outcomes.len(),
            "batch complete"
        );
        outcomes
    }

    /// One symbol's send loop. Owns the transient retry state; the attempt
    /// counter dies with the loop.
    async fn send_one(
        &self,
        user_id: &str,
        target: &ReactionTarget,
        symbol: &ReactionSymbol,
    ) -> SendOutcome {
        let mut attempt: u32 = 0;

        loop {
            match self
                .gateway
                .add_reaction(user_id, target, symbol, ReactionAction::Add)
                .await
            {
                Ok(response) => {
                    if attempt > 0 {
                        info!(%symbol, retries = attempt, "reaction added after retry");
                    } else {
                        info!(%symbol, "reaction added");
                    }
                    let outcome = SendOutcome::ok(symbol.clone(), response);
                    tokio::time::sleep(self.delay).await;
                    return outcome;
                }
                Err(err @ DomainError::RateLimited(_)) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        warn!(%symbol, max_retries = self.max_retries, "rate limited, budget spent");
                        return SendOutcome::failed(symbol.clone(), &err);
                    }
                    // Exponential: delay * 2^attempt.
                    let wait = self.delay * 2u32.pow(attempt);
                    warn!(
                        %symbol,
                        attempt,
                        max_retries = self.max_retries,
                        wait_secs = wait.as_secs_f64(),
                        "rate limited, backing off"
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(err @ DomainError::TransientServer { .. }) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        warn!(%symbol, max_retries = self.max_retries, "transient server error, budget spent");
                        return SendOutcome::failed(symbol.clone(), &err);
                    }
                    // Fixed doubled delay, not exponential.
                    let wait = self.delay * 2;
                    warn!(
                        %symbol,
                        attempt,
                        wait_secs = wait.as_secs_f64(),
                        "transient server error, retrying"
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(err) => {
                    warn!(%symbol, error = %err, "reaction failed, not retrying");
                    let outcome = SendOutcome::failed(symbol.clone(), &err);
                    // Keep overall pacing predictable even on failure.
                    tokio::time::sleep(self.delay).await;
                    return outcome;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scripted gateway result, cloneable unlike DomainError.
    #[derive(Clone, Copy)]
    enum Scripted {
        Ok,
        RateLimited,
        Transient,
        NotFound,
    }

    impl Scripted {
        fn into_result(self) -> Result<Option<serde_json::Value>, DomainError> {
            match self {
                Scripted::Ok => Ok(None),
                Scripted::RateLimited => Err(DomainError::RateLimited("too many requests".into())),
                Scripted::Transient => Err(DomainError::TransientServer {
                    code: 5301,
                    message: "internal error".into(),
                }),
                Scripted::NotFound => Err(DomainError::Http {
                    status: 404,
                    code: Some(4130),
                    message: "message not found".into(),
                }),
            }
        }
    }

    /// Gateway that pops a scripted result per symbol and counts requests.
    struct ScriptedGateway {
        script: Mutex<HashMap<String, Vec<Scripted>>>,
        requests: Mutex<Vec<String>>,
    }

    impl ScriptedGateway {
        fn new(script: &[(&str, &[Scripted])]) -> Self {
            let map = script
                .iter()
                .map(|(sym, results)| (sym.to_string(), results.to_vec()))
                .collect();
            Self {
                script: Mutex::new(map),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl ChatGateway for ScriptedGateway {
        async fn get_me(&self) -> Result<crate::domain::UserProfile, DomainError> {
            unimplemented!("not used by ReactionService")
        }

        async fn list_channels(
            &self,
            _user_id: &str,
        ) -> Result<Vec<crate::domain::Channel>, DomainError> {
            unimplemented!("not used by ReactionService")
        }

        async fn list_messages(
            &self,
            _user_id: &str,
            _query: &crate::domain::MessageQuery,
        ) -> Result<Vec<crate::domain::ChatMessage>, DomainError> {
            unimplemented!("not used by ReactionService")
        }

        async fn add_reaction(
            &self,
            _user_id: &str,
            _target: &ReactionTarget,
            symbol: &ReactionSymbol,
            _action: ReactionAction,
        ) -> Result<Option<serde_json::Value>, DomainError> {
            self.requests.lock().unwrap().push(symbol.to_string());
            let mut script = self.script.lock().unwrap();
            let queue = script.get_mut(symbol.as_str()).expect("unscripted symbol");
            // Drained queue means the symbol succeeds from here on.
            if queue.is_empty() {
                Scripted::Ok.into_result()
            } else {
                queue.remove(0).into_result()
            }
        }
    }

    fn target() -> ReactionTarget {
        ReactionTarget::new("msg1", None, Some("chan1".into())).unwrap()
    }

    fn symbols(glyphs: &[&str]) -> Vec<ReactionSymbol> {
        glyphs.iter().map(|g| ReactionSymbol::from(*g)).collect()
    }

    fn service(gateway: Arc<ScriptedGateway>, max_retries: u32) -> ReactionService {
        ReactionService::new(gateway, Duration::from_secs(1), max_retries)
    }

    #[tokio::test(start_paused = true)]
    async fn test_outcomes_preserve_input_order() {
        let gateway = Arc::new(ScriptedGateway::new(&[
            ("😀", &[Scripted::Ok]),
            ("👍", &[Scripted::Ok]),
            ("🔥", &[Scripted::Ok]),
        ]));
        let svc = service(Arc::clone(&gateway), 3);

        let syms = symbols(&["😀", "👍", "🔥"]);
        let outcomes = svc.send_batch("me", &target(), &syms, |_| {}).await;

        assert_eq!(outcomes.len(), 3);
        for (outcome, symbol) in outcomes.iter().zip(&syms) {
            assert_eq!(&outcome.symbol, symbol);
            assert!(outcome.success);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_rate_limit_spends_exact_budget() {
        // Always 429: 1 initial + 3 retries = 4 requests, then failure.
        let gateway = Arc::new(ScriptedGateway::new(&[(
            "😀",
            &[
                Scripted::RateLimited,
                Scripted::RateLimited,
                Scripted::RateLimited,
                Scripted::RateLimited,
            ],
        )]));
        let svc = service(Arc::clone(&gateway), 3);

        let outcomes = svc
            .send_batch("me", &target(), &symbols(&["😀"]), |_| {})
            .await;

        assert_eq!(gateway.request_count(), 4);
        assert!(!outcomes[0].success);
        assert!(outcomes[0].error.as_deref().unwrap().contains("Rate limited"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_backoff_grows_exponentially() {
        // delay=1s, three backoffs: 2s + 4s + 8s = 14s of virtual time.
        let gateway = Arc::new(ScriptedGateway::new(&[(
            "😀",
            &[
                Scripted::RateLimited,
                Scripted::RateLimited,
                Scripted::RateLimited,
                Scripted::RateLimited,
            ],
        )]));
        let svc = service(Arc::clone(&gateway), 3);

        let started = tokio::time::Instant::now();
        svc.send_batch("me", &target(), &symbols(&["😀"]), |_| {})
            .await;

        assert_eq!(started.elapsed(), Duration::from_secs(14));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_server_error_uses_fixed_backoff() {
        // 5301 twice then success: two fixed 2s waits + 1s base pause = 5s.
        let gateway = Arc::new(ScriptedGateway::new(&[(
            "😀",
            &[Scripted::Transient, Scripted::Transient, Scripted::Ok],
        )]));
        let svc = service(Arc::clone(&gateway), 3);

        let started = tokio::time::Instant::now();
        let outcomes = svc
            .send_batch("me", &target(), &symbols(&["😀"]), |_| {})
            .await;

        assert!(outcomes[0].success);
        assert_eq!(gateway.request_count(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_does_not_block_batch() {
        let gateway = Arc::new(ScriptedGateway::new(&[
            ("😀", &[Scripted::NotFound]),
            ("👍", &[Scripted::Ok]),
        ]));
        let svc = service(Arc::clone(&gateway), 3);

        let outcomes = svc
            .send_batch("me", &target(), &symbols(&["😀", "👍"]), |_| {})
            .await;

        // One attempt each: 404 is never retried.
        assert_eq!(gateway.request_count(), 2);
        assert!(!outcomes[0].success);
        assert!(outcomes[1].success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mixed_batch_end_to_end() {
        // Symbol 1 succeeds, symbol 2 hits 429 once then succeeds, symbol 3
        // 404s: outcomes [ok, ok, failed], 1 + 2 + 1 = 4 requests total.
        let gateway = Arc::new(ScriptedGateway::new(&[
            ("😀", &[Scripted::Ok]),
            ("👍", &[Scripted::RateLimited, Scripted::Ok]),
            ("🔥", &[Scripted::NotFound]),
        ]));
        let svc = service(Arc::clone(&gateway), 3);

        let mut seen = Vec::new();
        let outcomes = svc
            .send_batch("me", &target(), &symbols(&["😀", "👍", "🔥"]), |o| {
                seen.push(o.symbol.to_string());
            })
            .await;

        assert_eq!(gateway.request_count(), 4);
        assert_eq!(
            outcomes.iter().map(|o| o.success).collect::<Vec<_>>(),
            vec![true, true, false]
        );
        // Progress callback fired once per symbol, in order.
        assert_eq!(seen, vec!["😀", "👍", "🔥"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_symbol_records_encoding_failure() {
        // The gateway rejects the empty symbol before any request is built;
        // the outcome is a recorded failure, not a panic or a retry.
        struct EncodingProbe;

        #[async_trait::async_trait]
        impl ChatGateway for EncodingProbe {
            async fn get_me(&self) -> Result<crate::domain::UserProfile, DomainError> {
                unimplemented!()
            }
            async fn list_channels(
                &self,
                _user_id: &str,
            ) -> Result<Vec<crate::domain::Channel>, DomainError> {
                unimplemented!()
            }
            async fn list_messages(
                &self,
                _user_id: &str,
                _query: &crate::domain::MessageQuery,
            ) -> Result<Vec<crate::domain::ChatMessage>, DomainError> {
                unimplemented!()
            }
            async fn add_reaction(
                &self,
                _user_id: &str,
                _target: &ReactionTarget,
                symbol: &ReactionSymbol,
                _action: ReactionAction,
            ) -> Result<Option<serde_json::Value>, DomainError> {
                symbol.to_wire()?;
                Ok(None)
            }
        }

        let svc = ReactionService::new(Arc::new(EncodingProbe), Duration::from_secs(1), 3);
        let outcomes = svc
            .send_batch("me", &target(), &symbols(&[""]), |_| {})
            .await;

        assert!(!outcomes[0].success);
        assert!(outcomes[0].error.as_deref().unwrap().contains("encoding"));
    }
}
