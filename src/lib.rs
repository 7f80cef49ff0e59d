//! zoom-react: batch emoji reactions for Zoom Team Chat with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
