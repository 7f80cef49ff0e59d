//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here; the batch semantics live in ReactionService.

use dotenv::dotenv;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use zoom_react::adapters::emoji::{BuiltinEmojiCatalog, FileEmojiCatalog};
use zoom_react::adapters::ui::tui::TuiInputPort;
use zoom_react::adapters::zoom::ZoomChatGateway;
use zoom_react::domain::DomainError;
use zoom_react::ports::{ChatGateway, EmojiCatalog, InputPort};
use zoom_react::shared::config::AppConfig;
use zoom_react::usecases::{BrowseService, ReactionService};

#[tokio::main]
async fn main() {
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!("no .env found (run zoom-react-auth to create one)"),
    }

    zoom_react::adapters::ui::init_ui("ZOOM-REACT");

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run() -> Result<(), DomainError> {
    let cfg = AppConfig::load().map_err(|e| DomainError::Config(e.to_string()))?;

    let access_token = match cfg.access_token.clone().filter(|t| !t.is_empty()) {
        Some(token) => token,
        None => {
            println!("No ZOOM_ACCESS_TOKEN found in the environment.");
            inquire::Text::new("Paste your Zoom OAuth access token:")
                .prompt()
                .map_err(|_| DomainError::Cancelled)?
                .trim()
                .to_string()
        }
    };
    if access_token.is_empty() {
        return Err(DomainError::Auth(
            "access token is required; run zoom-react-auth to obtain one".into(),
        ));
    }

    // --- Gateway ---
    let gateway: Arc<dyn ChatGateway> = Arc::new(ZoomChatGateway::new(
        access_token,
        cfg.page_size_or_default(),
    ));

    info!("resolving identity");
    let user = gateway.get_me().await?;
    println!(
        "Signed in as {} ({})",
        user.display_name.as_deref().unwrap_or("unknown"),
        user.email.as_deref().unwrap_or(&user.id)
    );

    // --- Emoji catalog: file when present, built-in list otherwise ---
    let emoji_file = cfg.emoji_file_or_default();
    let catalog: Arc<dyn EmojiCatalog> = if Path::new(&emoji_file).exists() {
        info!(path = %emoji_file, "emoji catalog from file");
        Arc::new(FileEmojiCatalog::new(&emoji_file))
    } else {
        warn!(path = %emoji_file, "emoji file not found, using built-in list");
        Arc::new(BuiltinEmojiCatalog)
    };

    // --- Services ---
    let send_delay = Duration::from_millis(cfg.send_delay_ms_or_default());
    info!(
        delay_ms = send_delay.as_millis() as u64,
        max_retries = cfg.max_retries_or_default(),
        "send pacing configured"
    );
    let browse = Arc::new(BrowseService::new(
        Arc::clone(&gateway),
        cfg.lookback_days_or_default(),
        cfg.recent_limit_or_default(),
    ));
    let reactions = Arc::new(ReactionService::new(
        Arc::clone(&gateway),
        send_delay,
        cfg.max_retries_or_default(),
    ));

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        user,
        browse,
        reactions,
        catalog,
        send_delay,
    ));

    // --- Run (pick message -> pick emojis -> send batch -> summary) ---
    input_port.run().await
}
