//! The seam between the session loop and the inference server.

use crate::Result;
use crate::types::ChatRequest;

/// Sends one chat request and returns the assembled reply.
///
/// Implementations report every transport-level failure as an `Err`; the
/// session loop decides how to surface it.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// Complete `request`, returning the full reply text.
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}

#[async_trait::async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for Box<T> {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        (**self).complete(request).await
    }
}
