//! Implements InputPort. Inquire-based interactive prompts.
//!
//! Walks the user from message selection to emoji selection to the batch
//! send, then prints the outcome summary. All user-facing text lives here;
//! the services only log.

use crate::adapters::ui::progress;
use crate::domain::{ChatMessage, DomainError, ReactionSymbol, ReactionTarget, UserProfile};
use crate::ports::{EmojiCatalog, InputPort};
use crate::usecases::{BrowseService, ReactionService};
use async_trait::async_trait;
use inquire::error::InquireError;
use inquire::ui::{Color, RenderConfig, StyleSheet, Styled};
use inquire::{Confirm, CustomType, Select, Text};
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;

/// Zoom caps chat API requests at 2000/day; larger batches cannot finish.
const DAILY_REQUEST_QUOTA: usize = 2000;

/// Applies the prompt theme. Called once from init_ui.
pub fn apply_theme() {
    let mut config = RenderConfig::default_colored();
    config.prompt_prefix = Styled::new("»").with_fg(Color::LightBlue);
    config.highlighted_option_prefix = Styled::new("›").with_fg(Color::LightCyan);
    config.answer = StyleSheet::new().with_fg(Color::LightCyan);
    inquire::set_global_render_config(config);
}

fn map_inquire(e: InquireError) -> DomainError {
    match e {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            DomainError::Cancelled
        }
        other => DomainError::Input(other.to_string()),
    }
}

/// Single-line preview: trimmed, newlines collapsed, capped at `max` chars.
fn truncate(text: &str, max: usize) -> String {
    let flat = text.trim().replace(['\n', '\r'], " ");
    if flat.chars().count() <= max {
        flat
    } else {
        let cut: String = flat.chars().take(max).collect();
        format!("{cut}...")
    }
}

fn message_line(msg: &ChatMessage) -> String {
    let time = msg
        .date_time
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown time".to_string());
    format!("{} | {} | {}", time, msg.sender, truncate(&msg.text, 60))
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    user: UserProfile,
    browse: Arc<BrowseService>,
    reactions: Arc<ReactionService>,
    catalog: Arc<dyn EmojiCatalog>,
    /// Base inter-request delay; used for the duration estimate only.
    delay: Duration,
}

impl TuiInputPort {
    pub fn new(
        user: UserProfile,
        browse: Arc<BrowseService>,
        reactions: Arc<ReactionService>,
        catalog: Arc<dyn EmojiCatalog>,
        delay: Duration,
    ) -> Self {
        Self {
            user,
            browse,
            reactions,
            catalog,
            delay,
        }
    }

    async fn pick_target(&self) -> Result<ReactionTarget, DomainError> {
        let source = Select::new(
            "Where is the message?",
            vec![
                "Recent messages across all channels",
                "Messages from a specific channel",
                "Enter a message ID directly",
            ],
        )
        .raw_prompt()
        .map_err(map_inquire)?;

        match source.index {
            0 => {
                println!("Fetching recent messages, this can take a moment...");
                let messages = self.browse.recent_across_channels(&self.user.id).await?;
                self.pick_message(&messages)
            }
            1 => {
                let channels = self.browse.channels(&self.user.id).await?;
                if channels.is_empty() {
                    return Err(DomainError::Input("no channels found".into()));
                }
                let options: Vec<String> = channels
                    .iter()
                    .map(|c| format!("{} ({})", c.name, c.id))
                    .collect();
                let picked = Select::new("Select a channel", options)
                    .raw_prompt()
                    .map_err(map_inquire)?;
                let channel_id = &channels[picked.index].id;

                let messages = self
                    .browse
                    .messages_in_channel(&self.user.id, channel_id)
                    .await?;
                self.pick_message(&messages)
            }
            _ => self.enter_target_directly(),
        }
    }

    fn pick_message(&self, messages: &[ChatMessage]) -> Result<ReactionTarget, DomainError> {
        if messages.is_empty() {
            return Err(DomainError::Input("no recent messages found".into()));
        }
        let options: Vec<String> = messages.iter().map(message_line).collect();
        let picked = Select::new("Select the message to react to", options)
            .raw_prompt()
            .map_err(map_inquire)?;
        let msg = &messages[picked.index];
        ReactionTarget::new(msg.id.clone(), None, msg.channel_id.clone())
    }

    fn enter_target_directly(&self) -> Result<ReactionTarget, DomainError> {
        let message_id = Text::new("Message ID:").prompt().map_err(map_inquire)?;
        let kind = Select::new(
            "Where does the message live?",
            vec!["In a channel", "In a 1:1 chat (contact)"],
        )
        .raw_prompt()
        .map_err(map_inquire)?;

        if kind.index == 0 {
            let channel = Text::new("Channel ID:").prompt().map_err(map_inquire)?;
            ReactionTarget::new(message_id, None, Some(channel))
        } else {
            let contact = Text::new("Contact email or ID:")
                .prompt()
                .map_err(map_inquire)?;
            ReactionTarget::new(message_id, Some(contact), None)
        }
    }

    async fn pick_symbols(&self) -> Result<Vec<ReactionSymbol>, DomainError> {
        let all = self.catalog.load().await?;
        let mode = Select::new(
            "Which emojis?",
            vec![
                format!("All supported emojis ({})", all.len()),
                "Random selection".to_string(),
                "Enter custom emojis".to_string(),
            ],
        )
        .raw_prompt()
        .map_err(map_inquire)?;

        match mode.index {
            0 => Ok(all),
            1 => {
                let max = all.len();
                let count = loop {
                    let n = CustomType::<usize>::new(&format!("How many random emojis? (1-{max})"))
                        .with_error_message("enter a number")
                        .prompt()
                        .map_err(map_inquire)?;
                    if (1..=max).contains(&n) {
                        break n;
                    }
                    println!("Please enter a number between 1 and {max}");
                };
                let mut rng = rand::thread_rng();
                let sample: Vec<ReactionSymbol> =
                    all.choose_multiple(&mut rng, count).cloned().collect();
                Ok(sample)
            }
            _ => {
                let raw = Text::new("Emojis separated by spaces (e.g. 😀 👍 ❤️):")
                    .prompt()
                    .map_err(map_inquire)?;
                let symbols: Vec<ReactionSymbol> =
                    raw.split_whitespace().map(ReactionSymbol::from).collect();
                if symbols.is_empty() {
                    return Err(DomainError::Input("no emojis provided".into()));
                }
                Ok(symbols)
            }
        }
    }

    fn confirm_send(
        &self,
        target: &ReactionTarget,
        symbols: &[ReactionSymbol],
    ) -> Result<bool, DomainError> {
        let preview: Vec<&str> = symbols.iter().take(10).map(|s| s.as_str()).collect();
        println!(
            "\nAbout to send {} reactions to message {}",
            symbols.len(),
            target.message_id()
        );
        println!("Sample: {}", preview.join(" "));

        if symbols.len() > DAILY_REQUEST_QUOTA {
            println!(
                "WARNING: {} reactions exceeds the daily quota of {} requests; \
                 the batch cannot finish today.",
                symbols.len(),
                DAILY_REQUEST_QUOTA
            );
        }
        let estimated_min = symbols.len() as f64 * self.delay.as_secs_f64() / 60.0;
        println!("Estimated time: {estimated_min:.1} minutes (paced for the 2 req/s cap)");

        Confirm::new("Proceed?")
            .with_default(false)
            .prompt()
            .map_err(map_inquire)
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        let target = self.pick_target().await?;
        let symbols = self.pick_symbols().await?;

        if !self.confirm_send(&target, &symbols)? {
            println!("Cancelled.");
            return Ok(());
        }

        let bar = progress::batch_bar(symbols.len() as u64);
        let outcomes = self
            .reactions
            .send_batch(&self.user.id, &target, &symbols, |outcome| {
                bar.inc(1);
                let mark = if outcome.success { "ok" } else { "failed" };
                bar.set_message(format!("{} {}", outcome.symbol, mark));
            })
            .await;
        bar.finish_and_clear();

        let sent = outcomes.iter().filter(|o| o.success).count();
        println!("\nSent {sent}/{} emoji reactions", outcomes.len());
        let failed: Vec<_> = outcomes.iter().filter(|o| !o.success).collect();
        if !failed.is_empty() {
            println!("Failed ({}):", failed.len());
            for outcome in failed.iter().take(5) {
                println!(
                    "  {} - {}",
                    outcome.symbol,
                    outcome.error.as_deref().unwrap_or("unknown error")
                );
            }
            if failed.len() > 5 {
                println!("  ... and {} more", failed.len() - 5);
            }
        }
        Ok(())
    }
}
