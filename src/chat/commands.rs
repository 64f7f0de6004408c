//! Interpreting what the user typed.
//!
//! The chat has no slash commands: a line is either an exit keyword or a
//! message for the model.  Blank lines are messages too.

/// Keywords that end the current conversation.
const EXIT_KEYWORDS: &[&str] = &["exit", "quit"];

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// End the current conversation.
    Quit,

    /// Send this text to the model.
    Message(String),
}

/// Parses one line typed at the `You: ` prompt.
///
/// Exit keywords are matched after trimming and case-folding.  Messages are
/// passed through as typed.
///
/// # Examples
///
/// ```
/// # use gemma_chat::chat::{ChatCommand, parse_command};
/// assert_eq!(parse_command("  Quit  "), ChatCommand::Quit);
/// assert_eq!(parse_command("exit please"), ChatCommand::Message("exit please".to_string()));
/// ```
pub fn parse_command(input: &str) -> ChatCommand {
    let trimmed = input.trim();
    if EXIT_KEYWORDS
        .iter()
        .any(|keyword| trimmed.eq_ignore_ascii_case(keyword))
    {
        ChatCommand::Quit
    } else {
        ChatCommand::Message(input.to_string())
    }
}

/// True when the answer to the restart prompt asks for a new conversation.
///
/// Only `y` (trimmed, any case) counts; everything else means no.
pub fn wants_restart(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}
