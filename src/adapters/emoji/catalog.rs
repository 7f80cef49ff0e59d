//! Emoji catalog adapters: a file-backed list and a built-in fallback.
//!
//! The catalog file is whitespace-separated glyphs (one grapheme per token,
//! so flags and keycaps survive intact). Duplicates are dropped, first
//! occurrence wins. Which source is used is decided at wiring time; the
//! sender never knows.

use crate::domain::{DomainError, ReactionSymbol};
use crate::ports::EmojiCatalog;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// Catalog read from a file of whitespace-separated emoji.
pub struct FileEmojiCatalog {
    path: PathBuf,
}

impl FileEmojiCatalog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl EmojiCatalog for FileEmojiCatalog {
    async fn load(&self) -> Result<Vec<ReactionSymbol>, DomainError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::Config(format!("emoji file {}: {e}", self.path.display()))
        })?;
        let symbols = parse_catalog(&content);
        if symbols.is_empty() {
            return Err(DomainError::Config(format!(
                "emoji file {} contains no emoji",
                self.path.display()
            )));
        }
        info!(
            count = symbols.len(),
            path = %self.path.display(),
            "loaded emoji catalog"
        );
        Ok(symbols)
    }
}

/// Built-in fallback catalog used when no file is available.
pub struct BuiltinEmojiCatalog;

#[async_trait::async_trait]
impl EmojiCatalog for BuiltinEmojiCatalog {
    async fn load(&self) -> Result<Vec<ReactionSymbol>, DomainError> {
        Ok(POPULAR_EMOJIS
            .iter()
            .map(|g| ReactionSymbol::from(*g))
            .collect())
    }
}

/// Whitespace-split glyphs, ASCII-only tokens dropped, ordered dedup.
fn parse_catalog(content: &str) -> Vec<ReactionSymbol> {
    let mut seen = HashSet::new();
    content
        .split_whitespace()
        .filter(|token| token.chars().any(|c| !c.is_ascii()))
        .filter(|token| seen.insert(token.to_string()))
        .map(ReactionSymbol::from)
        .collect()
}

/// Popular reactions, grouped roughly like the picker in the Zoom client.
const POPULAR_EMOJIS: &[&str] = &[
    // Smileys & emotion
    "😀", "😃", "😄", "😁", "😆", "😅", "🤣", "😂", "🙂", "🙃", "😉", "😊", "😇", "🥰", "😍",
    "🤩", "😘", "😋", "😛", "😜", "🤪", "😝", "🤑", "🤗", "🤭", "🤫", "🤔", "🤨", "😐", "😏",
    "😒", "🙄", "😬", "😌", "😔", "😪", "😴", "😷", "🤒", "🤯", "🤠", "🥳", "😎", "🤓", "🧐",
    "😕", "😟", "🙁", "😮", "😯", "😲", "😳", "🥺", "😢", "😭", "😱", "😤", "😡", "😈", "💀",
    // Hand gestures
    "👍", "👎", "👊", "✊", "🤛", "🤜", "🤞", "🤟", "🤘", "👌", "🤏", "👈", "👉", "👆", "👇",
    "👋", "🤚", "✋", "🖖", "👏", "🙌", "👐", "🤲", "🤝", "🙏", "💅", "🤳",
    // Hearts & symbols
    "❤️", "🧡", "💛", "💚", "💙", "💜", "🖤", "🤍", "🤎", "💔", "💕", "💞", "💓", "💗", "💖",
    "💘", "💝", "💯", "💥", "💫", "⭐", "🌟", "✨", "🔥", "💧", "🌈", "☀️", "❄️", "🌊",
    // Celebrations & activities
    "🎉", "🎊", "🎈", "🎁", "🎀", "🎂", "🍰", "🏆", "🥇", "🥈", "🥉", "🏅", "🎯", "🎮", "🎲",
    "🎤", "🎧", "🎸", "🎹", "🎺",
    // Food & drink
    "🍕", "🍔", "🍟", "🌭", "🍿", "🌮", "🌯", "🍣", "🍜", "🍩", "🍪", "☕", "🍺", "🥂",
    // Animals & nature
    "🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🐨", "🐯", "🦁", "🐸", "🐵", "🦄", "🐝",
    "🦋",
    // Objects & misc
    "⚽", "🏀", "🏈", "⚾", "🎾", "🚀", "✈️", "🚗", "⌚", "📱", "💻", "📷", "🔑", "💡", "📌",
    "✅", "❌", "❗", "❓", "🚩", "🏁",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_and_dedups_in_order() {
        let symbols = parse_catalog("😀 👍 😀\n🔥\t👍 🔥 🎉");
        let glyphs: Vec<&str> = symbols.iter().map(|s| s.as_str()).collect();
        assert_eq!(glyphs, vec!["😀", "👍", "🔥", "🎉"]);
    }

    #[test]
    fn test_parse_keeps_multi_codepoint_glyphs_whole() {
        let symbols = parse_catalog("🇺🇸 ❤️");
        assert_eq!(symbols[0].as_str(), "🇺🇸");
        assert_eq!(symbols[0].to_wire().unwrap(), "U+1F1FA-U+1F1F8");
        assert_eq!(symbols[1].to_wire().unwrap(), "U+2764-U+FE0F");
    }

    #[test]
    fn test_parse_drops_ascii_noise() {
        let symbols = parse_catalog("# header\n😀 (grinning)\n👍 thumbs-up");
        let glyphs: Vec<&str> = symbols.iter().map(|s| s.as_str()).collect();
        assert_eq!(glyphs, vec!["😀", "👍"]);
    }

    #[tokio::test]
    async fn test_builtin_catalog_is_nonempty_and_unique() {
        let symbols = BuiltinEmojiCatalog.load().await.unwrap();
        assert!(symbols.len() > 100);
        let unique: HashSet<&str> = symbols.iter().map(|s| s.as_str()).collect();
        assert_eq!(unique.len(), symbols.len());
    }
}
