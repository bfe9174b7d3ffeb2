//! Command-line control for Indigo home-automation servers
//!
//! This crate queries and controls smart-home devices behind a
//! digest-authenticated REST API, and can hand a free-text question to a
//! chat-completion endpoint to pick the relevant devices and drive them to a
//! desired state.
//!
//! # Modules
//!
//! - [`client`] — device API models and digest-authenticated HTTP client
//! - [`llm`] — prompt rendering, completion client, reply interpretation
//! - [`assist`] — the two-round AI-query flow
//! - [`config`] — credentials and endpoint configuration parsed at startup

pub mod assist;
pub mod client;
pub mod config;
pub mod error;
pub mod llm;

// Re-export main types for convenience
pub use error::{IndigoError, Result};
