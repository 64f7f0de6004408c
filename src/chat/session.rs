//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the transcript and
//! performs one request/response exchange per user message.

use crate::chat::config::ChatConfig;
use crate::error::Result;
use crate::transcript::Transcript;
use crate::transport::ChatTransport;
use crate::types::{ChatRequest, Turn};

/// A chat session that manages conversation state and server interactions.
///
/// The session is the only owner of the transcript.  Requests are built from
/// a snapshot of it, so nothing the transport does can change the history.
pub struct ChatSession<T: ChatTransport> {
    transport: T,
    config: ChatConfig,
    transcript: Transcript,
}

impl<T: ChatTransport> ChatSession<T> {
    /// Creates a new chat session with the given transport and configuration.
    pub fn new(transport: T, config: ChatConfig) -> Self {
        let transcript = Transcript::new(config.max_history);
        Self {
            transport,
            config,
            transcript,
        }
    }

    /// Sends a user message and returns the assistant's reply.
    ///
    /// The user turn is recorded before the request is made and stays in the
    /// transcript if the request fails.  The assistant turn is recorded only
    /// on success.
    ///
    /// # Errors
    ///
    /// Returns the transport's error if the exchange fails.
    pub async fn send(&mut self, user_input: &str) -> Result<String> {
        self.transcript.push(Turn::user(user_input));
        let request = self.request();
        let reply = self.transport.complete(&request).await?;
        self.transcript.push(Turn::assistant(reply.clone()));
        Ok(reply)
    }

    /// Builds the request that [`send`](Self::send) would issue right now.
    pub fn request(&self) -> ChatRequest {
        ChatRequest::new(self.config.model.clone(), self.transcript.snapshot())
    }

    /// Discards the transcript to begin a new conversation.
    pub fn reset(&mut self) {
        self.transcript.clear();
    }

    /// Returns the current transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Returns the number of turns in the conversation.
    pub fn message_count(&self) -> usize {
        self.transcript.len()
    }

    /// Returns the current model.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
