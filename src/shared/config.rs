//! Application configuration. API credentials, pacing, paths.

use serde::Deserialize;

/// Default base delay between reaction requests, in milliseconds.
/// 1 req/s stays comfortably under Zoom's 2 req/s ceiling.
pub const DEFAULT_SEND_DELAY_MS: u64 = 1000;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// OAuth access token. Read from ZOOM_ACCESS_TOKEN.
    #[serde(default)]
    pub access_token: Option<String>,

    /// OAuth refresh token, written by the bootstrap flow. Read from ZOOM_REFRESH_TOKEN.
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// OAuth app client ID (bootstrap flow). Read from ZOOM_CLIENT_ID.
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth app client secret (bootstrap flow). Read from ZOOM_CLIENT_SECRET.
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Port for the one-shot OAuth redirect listener (default 3000). Read from ZOOM_REDIRECT_PORT.
    #[serde(default)]
    pub redirect_port: Option<u16>,

    /// Seconds to wait for the browser redirect (default 300). Read from ZOOM_OAUTH_TIMEOUT_SECS.
    #[serde(default)]
    pub oauth_timeout_secs: Option<u64>,

    /// Base delay in ms between reaction requests. Read from ZOOM_SEND_DELAY_MS.
    #[serde(default)]
    pub send_delay_ms: Option<u64>,

    /// Retries per symbol on retryable errors (default 3). Read from ZOOM_MAX_RETRIES.
    #[serde(default)]
    pub max_retries: Option<u32>,

    /// Page size for paginated listings (default 50). Read from ZOOM_PAGE_SIZE.
    #[serde(default)]
    pub page_size: Option<u32>,

    /// How many days back message browsing reaches (default 7). Read from ZOOM_LOOKBACK_DAYS.
    #[serde(default)]
    pub lookback_days: Option<i64>,

    /// Cap on the merged recent-messages menu (default 20). Read from ZOOM_RECENT_LIMIT.
    #[serde(default)]
    pub recent_limit: Option<usize>,

    /// Path to a whitespace-separated emoji catalog file. Read from ZOOM_EMOJI_FILE.
    #[serde(default)]
    pub emoji_file: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("ZOOM").try_parsing(true));
        if let Ok(path) = std::env::var("ZOOM_REACT_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    pub fn redirect_port_or_default(&self) -> u16 {
        self.redirect_port.unwrap_or(3000)
    }

    pub fn oauth_timeout_secs_or_default(&self) -> u64 {
        self.oauth_timeout_secs.unwrap_or(300)
    }

    pub fn send_delay_ms_or_default(&self) -> u64 {
        self.send_delay_ms.unwrap_or(DEFAULT_SEND_DELAY_MS)
    }

    pub fn max_retries_or_default(&self) -> u32 {
        self.max_retries.unwrap_or(3)
    }

    pub fn page_size_or_default(&self) -> u32 {
        self.page_size.unwrap_or(50)
    }

    pub fn lookback_days_or_default(&self) -> i64 {
        self.lookback_days.unwrap_or(7)
    }

    pub fn recent_limit_or_default(&self) -> usize {
        self.recent_limit.unwrap_or(20)
    }

    /// Emoji catalog file path; relative to the working directory.
    pub fn emoji_file_or_default(&self) -> String {
        self.emoji_file
            .clone()
            .unwrap_or_else(|| "zoom_supported_emojis.txt".to_string())
    }

    /// Redirect URI as registered in the Zoom OAuth app.
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}", self.redirect_port_or_default())
    }
}
