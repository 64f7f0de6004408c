use serde::{Deserialize, Serialize};

/// The message fragment carried by a [`StreamChunk`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMessage {
    /// Partial reply text.
    #[serde(default)]
    pub content: String,
}

/// One line of the chat endpoint's newline-delimited JSON response.
///
/// Only the fields the client folds into a reply are modelled; anything else
/// the server sends (timings, token counts, `model`, `created_at`) is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamChunk {
    /// The partial message, absent on some terminal records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<ChunkMessage>,

    /// Marks the final record of the stream.
    #[serde(default)]
    pub done: bool,

    /// Set when the server aborts generation mid-stream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StreamChunk {
    /// Create a chunk carrying `content`.
    pub fn new(content: impl Into<String>, done: bool) -> Self {
        Self {
            message: Some(ChunkMessage {
                content: content.into(),
            }),
            done,
            error: None,
        }
    }

    /// The text this chunk contributes to the reply.
    pub fn content(&self) -> &str {
        self.message
            .as_ref()
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }
}
