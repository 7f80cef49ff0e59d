//! Zoom adapters: REST gateway and OAuth token exchange.

pub mod client;
pub mod oauth;

pub use client::ZoomChatGateway;
pub use oauth::ZoomTokenExchanger;
