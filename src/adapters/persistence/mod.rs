//! Persistence adapters. Token storage on the local filesystem.

pub mod env_file;

pub use env_file::EnvFileStore;
