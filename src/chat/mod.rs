//! Interactive streaming chat against a local inference server.
//!
//! # Architecture
//!
//! - [`config`]: environment-derived configuration
//! - [`session`]: transcript ownership and one exchange per message
//! - [`controller`]: the prompt loop and the restart prompt around it
//! - [`commands`]: exit keywords and restart answers
//! - [`input`] / [`render`]: console seams, swapped out in tests
//! - [`interrupt`]: Ctrl-C propagation

pub mod commands;
pub mod config;
pub mod controller;
pub mod input;
pub mod interrupt;
pub mod render;
pub mod session;

pub use commands::{ChatCommand, parse_command, wants_restart};
pub use config::ChatConfig;
pub use controller::{ConversationEnd, RESTART_PROMPT, Shutdown, USER_PROMPT, run, run_conversation};
pub use input::{EditorInput, Input, LineSource};
pub use interrupt::{INTERRUPTED_EXIT_CODE, Interrupt};
pub use render::{ASSISTANT_LABEL, PlainTextRenderer, Renderer};
pub use session::ChatSession;
