//! Local HTTP plumbing for the OAuth redirect.

pub mod callback;

pub use callback::CallbackServer;
