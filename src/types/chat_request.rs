use serde::{Deserialize, Serialize};

use crate::types::Turn;

/// Body of a POST to the chat endpoint.
///
/// Built fresh for every turn from the configured model and a snapshot of the
/// transcript.  Nothing else is sent: the server streams by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The model identifier.
    pub model: String,

    /// The conversation so far, oldest first.
    pub messages: Vec<Turn>,
}

impl ChatRequest {
    /// Create a new `ChatRequest` from a model and the turns to send.
    pub fn new(model: impl Into<String>, messages: Vec<Turn>) -> Self {
        Self {
            model: model.into(),
            messages,
        }
    }
}
