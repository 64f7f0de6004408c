//! The interactive loop and the restart prompt around it.

use crate::chat::commands::{ChatCommand, parse_command, wants_restart};
use crate::chat::input::{Input, LineSource};
use crate::chat::interrupt::Interrupt;
use crate::chat::render::Renderer;
use crate::chat::session::ChatSession;
use crate::error::Result;
use crate::transport::ChatTransport;

/// Prompt shown before each user message.
pub const USER_PROMPT: &str = "You: ";

/// Prompt shown after a conversation ends.
pub const RESTART_PROMPT: &str = "Start a new conversation? (y/n): ";

/// How a single conversation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationEnd {
    /// The user typed an exit keyword.
    Exited,

    /// Input reached end-of-file.
    InputClosed,

    /// Ctrl-C.
    Interrupted,
}

/// How the whole program ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// The user declined to start another conversation.
    Finished,

    /// Ctrl-C.
    Interrupted,
}

/// Runs one conversation until an exit keyword, end of input, or interrupt.
///
/// Failed exchanges are printed inline and the loop carries on.  The
/// transcript is left as it is; callers decide whether to reset it.
pub async fn run_conversation<T, L, R>(
    session: &mut ChatSession<T>,
    input: &mut L,
    renderer: &mut R,
    interrupt: &Interrupt,
) -> Result<ConversationEnd>
where
    T: ChatTransport,
    L: LineSource + ?Sized,
    R: Renderer + ?Sized,
{
    renderer.print_welcome();
    loop {
        if interrupt.is_triggered() {
            return Ok(ConversationEnd::Interrupted);
        }

        let line = match input.read_line(USER_PROMPT)? {
            Input::Line(line) => line,
            Input::Interrupted => return Ok(ConversationEnd::Interrupted),
            Input::Eof => return Ok(ConversationEnd::InputClosed),
        };

        let message = match parse_command(&line) {
            ChatCommand::Quit => {
                renderer.print_exiting();
                return Ok(ConversationEnd::Exited);
            }
            ChatCommand::Message(message) => message,
        };

        renderer.print_thinking();
        let outcome = tokio::select! {
            outcome = session.send(&message) => outcome,
            _ = interrupt.wait() => return Ok(ConversationEnd::Interrupted),
        };
        match outcome {
            Ok(reply) => renderer.print_reply(&reply),
            Err(err) => renderer.print_error(&err.to_string()),
        }
    }
}

/// Runs conversations until the user declines a new one or interrupts.
///
/// Every conversation starts with an empty transcript.
pub async fn run<T, L, R>(
    session: &mut ChatSession<T>,
    input: &mut L,
    renderer: &mut R,
    interrupt: &Interrupt,
) -> Result<Shutdown>
where
    T: ChatTransport,
    L: LineSource + ?Sized,
    R: Renderer + ?Sized,
{
    loop {
        session.reset();
        match run_conversation(&mut *session, &mut *input, &mut *renderer, interrupt).await? {
            ConversationEnd::Exited => {}
            ConversationEnd::InputClosed => {
                renderer.print_farewell();
                return Ok(Shutdown::Finished);
            }
            ConversationEnd::Interrupted => return Ok(interrupted(renderer, interrupt)),
        }

        let restart = match input.read_line(RESTART_PROMPT)? {
            _ if interrupt.is_triggered() => None,
            Input::Line(answer) => Some(wants_restart(&answer)),
            Input::Eof => Some(false),
            Input::Interrupted => None,
        };
        match restart {
            Some(true) => tracing::debug!("starting a new conversation"),
            Some(false) => {
                renderer.print_farewell();
                return Ok(Shutdown::Finished);
            }
            None => return Ok(interrupted(renderer, interrupt)),
        }
    }
}

/// Prints the goodbye unless the signal handler already has.
fn interrupted<R: Renderer + ?Sized>(renderer: &mut R, interrupt: &Interrupt) -> Shutdown {
    if interrupt.claim_goodbye() {
        renderer.print_interrupted();
    }
    Shutdown::Interrupted
}
