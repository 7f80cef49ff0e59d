//! Reaction symbols and their wire encoding.
//!
//! Zoom's emoji_reactions endpoint wants codepoints, not the glyph itself:
//! "😀" travels as "U+1F600", and multi-codepoint graphemes (flags, keycaps)
//! as a hyphen-joined sequence like "U+1F1FA-U+1F1F8".

use crate::domain::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One user-facing reaction glyph. May span several codepoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReactionSymbol(String);

impl ReactionSymbol {
    pub fn new(glyph: impl Into<String>) -> Self {
        Self(glyph.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Encode to the wire format: uppercase hex per codepoint, `U+` prefixed,
    /// joined with `-`. Deterministic and total for any non-empty symbol.
    pub fn to_wire(&self) -> Result<String, DomainError> {
        if self.0.is_empty() {
            return Err(DomainError::Encoding("empty reaction symbol".into()));
        }
        let encoded: Vec<String> = self
            .0
            .chars()
            .map(|c| format!("U+{:X}", c as u32))
            .collect();
        Ok(encoded.join("-"))
    }
}

impl fmt::Display for ReactionSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReactionSymbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Reaction operation sent to the API. The CLI only adds; remove exists for
/// completeness of the endpoint contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionAction {
    Add,
    Remove,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_single_codepoint() {
        assert_eq!(ReactionSymbol::from("😀").to_wire().unwrap(), "U+1F600");
        assert_eq!(ReactionSymbol::from("👍").to_wire().unwrap(), "U+1F44D");
    }

    #[test]
    fn test_wire_no_leading_zero_padding() {
        // Plain ASCII encodes to its natural hex width.
        assert_eq!(ReactionSymbol::from("A").to_wire().unwrap(), "U+41");
    }

    #[test]
    fn test_wire_multi_codepoint() {
        // US flag: two regional indicator symbols.
        assert_eq!(
            ReactionSymbol::from("🇺🇸").to_wire().unwrap(),
            "U+1F1FA-U+1F1F8"
        );
        // Red heart: heart + variation selector.
        assert_eq!(
            ReactionSymbol::from("❤️").to_wire().unwrap(),
            "U+2764-U+FE0F"
        );
    }

    #[test]
    fn test_wire_empty_symbol_fails() {
        let err = ReactionSymbol::new("").to_wire().unwrap_err();
        assert!(matches!(err, DomainError::Encoding(_)));
    }

    #[test]
    fn test_action_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ReactionAction::Add).unwrap(),
            "\"add\""
        );
        assert_eq!(
            serde_json::to_string(&ReactionAction::Remove).unwrap(),
            "\"remove\""
        );
    }
}
