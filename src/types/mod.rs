// Public modules
pub mod chat_request;
pub mod stream_chunk;
pub mod turn;

// Re-exports
pub use chat_request::ChatRequest;
pub use stream_chunk::{ChunkMessage, StreamChunk};
pub use turn::{Role, Turn};
