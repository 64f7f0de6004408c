//! A streaming terminal chat client for Ollama-compatible inference servers.
//!
//! The client keeps a bounded transcript, POSTs it to `<URL>/api/chat`,
//! decodes the newline-delimited JSON reply, and prints it.

// Public modules
pub mod accumulate;
pub mod chat;
pub mod client;
pub mod error;
pub mod ndjson;
mod observability;
pub mod transcript;
pub mod transport;
pub mod types;

// Re-exports
pub use accumulate::accumulate_reply;
pub use client::Ollama;
pub use error::{Error, Result};
pub use ndjson::process_ndjson;
pub use observability::register_biometrics;
pub use transcript::{MAX_HISTORY, Transcript};
pub use transport::ChatTransport;
pub use types::*;
