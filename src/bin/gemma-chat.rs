//! Interactive chat with a model served by a local Ollama-compatible server.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: gemma3:1b-it-q4_K_M at http://localhost:11434
//! gemma-chat
//!
//! # Another model on another host
//! MODEL_NAME=llama3.2:3b URL=http://gpu-box:11434 gemma-chat
//!
//! # Show skipped stream records and request diagnostics
//! RUST_LOG=gemma_chat=debug gemma-chat
//! ```
//!
//! Type `exit` or `quit` to end a conversation, then `y` to start a new one.
//! Ctrl-C ends the program at any point.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use gemma_chat::Ollama;
use gemma_chat::chat::{
    ChatConfig, ChatSession, EditorInput, INTERRUPTED_EXIT_CODE, Interrupt, PlainTextRenderer,
    Shutdown, run,
};

/// Main entry point for the gemma-chat application.
#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    match chat().await {
        Ok(Shutdown::Finished) => ExitCode::SUCCESS,
        Ok(Shutdown::Interrupted) => ExitCode::from(INTERRUPTED_EXIT_CODE),
        Err(err) => {
            eprintln!("gemma-chat: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn chat() -> gemma_chat::Result<Shutdown> {
    let config = ChatConfig::from_env()?;
    let client = Ollama::new(&config)?;
    tracing::debug!(model = %config.model, url = %client.chat_url(), "configured");

    let interrupt = Interrupt::new();
    interrupt.install()?;

    let mut input = EditorInput::new()?;
    let mut renderer = PlainTextRenderer::with_color(io::stdout().is_terminal());
    let mut session = ChatSession::new(client, config);

    run(&mut session, &mut input, &mut renderer, &interrupt).await
}
