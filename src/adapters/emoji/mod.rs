//! Reaction symbol sources. Implement EmojiCatalog.

pub mod catalog;

pub use catalog::{BuiltinEmojiCatalog, FileEmojiCatalog};
