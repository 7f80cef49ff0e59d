//! Cross-cutting helpers shared by both binaries.

pub mod config;
