//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod reaction;

pub use entities::{
    Channel, ChatMessage, Container, MessageQuery, ReactionTarget, SendOutcome, TokenSet,
    UserProfile,
};
pub use errors::DomainError;
pub use reaction::{ReactionAction, ReactionSymbol};
