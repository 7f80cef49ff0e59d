//! Wiring for the OAuth bootstrap binary (zoom-react-auth).
//!
//! Walks the user through the Authorization Code flow once: local listener,
//! browser authorization, code exchange, .env write.

use dotenv::dotenv;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use zoom_react::adapters::http::CallbackServer;
use zoom_react::adapters::persistence::EnvFileStore;
use zoom_react::adapters::zoom::ZoomTokenExchanger;
use zoom_react::domain::{DomainError, TokenSet};
use zoom_react::shared::config::AppConfig;
use zoom_react::usecases::auth_service::{AuthService, REQUIRED_SCOPES};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    zoom_react::adapters::ui::init_ui("ZM-AUTH");

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run() -> Result<(), DomainError> {
    let cfg = AppConfig::load().map_err(|e| DomainError::Config(e.to_string()))?;

    println!("Before starting, make sure your Zoom OAuth app (marketplace.zoom.us) has:");
    for scope in REQUIRED_SCOPES {
        println!("  - {scope}");
    }
    println!(
        "and the redirect URI set to: {}\n",
        cfg.redirect_uri()
    );

    let client_id = prompt_if_missing(cfg.client_id.clone(), "Zoom OAuth Client ID:")?;
    let client_secret = match cfg.client_secret.clone().filter(|s| !s.is_empty()) {
        Some(secret) => secret,
        None => inquire::Password::new("Zoom OAuth Client Secret:")
            .without_confirmation()
            .prompt()
            .map_err(|_| DomainError::Cancelled)?,
    };
    if client_id.is_empty() || client_secret.is_empty() {
        return Err(DomainError::Input(
            "client ID and secret are both required".into(),
        ));
    }

    let redirect_uri = cfg.redirect_uri();
    let listener = Arc::new(CallbackServer::new(cfg.redirect_port_or_default()));
    let exchanger = Arc::new(ZoomTokenExchanger::new(
        client_id.clone(),
        client_secret,
        redirect_uri.clone(),
    ));
    let store = Arc::new(EnvFileStore::new(".env"));

    let auth_service = AuthService::new(
        listener,
        exchanger,
        store,
        client_id,
        redirect_uri,
        Duration::from_secs(cfg.oauth_timeout_secs_or_default()),
    );

    println!("\nOpen this URL in your browser and authorize the app:\n");
    println!("  {}\n", auth_service.authorize_url());
    println!("Waiting for the redirect...");

    let tokens = auth_service.run_flow().await?;
    report(&tokens);
    Ok(())
}

fn prompt_if_missing(configured: Option<String>, prompt: &str) -> Result<String, DomainError> {
    match configured.filter(|s| !s.is_empty()) {
        Some(value) => Ok(value),
        None => inquire::Text::new(prompt)
            .prompt()
            .map(|s| s.trim().to_string())
            .map_err(|_| DomainError::Cancelled),
    }
}

/// Shortened preview so the full credential never lands in the terminal.
fn preview(token: &str) -> String {
    if token.len() > 48 {
        format!("{}...{}", &token[..20], &token[token.len() - 20..])
    } else {
        "(short token)".to_string()
    }
}

fn report(tokens: &TokenSet) {
    info!("token exchange complete");
    println!("\nAccess token obtained: {}", preview(&tokens.access_token));
    if let Some(expires_in) = tokens.expires_in {
        println!("Expires in: {} hours", expires_in / 3600);
    }
    if tokens.refresh_token.is_some() {
        println!("Refresh token saved alongside it.");
    }
    println!("\nTokens saved to .env — you can now run: zoom-react");
    println!("Note: access tokens typically expire after 1 hour; rerun this tool for a new one.");
}
