//! Output rendering for the chat application.
//!
//! This module provides a trait-based rendering abstraction so the session
//! loop never writes to the console directly.  The default implementation
//! prints plain text with optional ANSI styling.

use std::io::{self, Stdout, Write};

/// Label printed in front of everything the assistant says.
pub const ASSISTANT_LABEL: &str = "GEMMA";

/// ANSI escape code for dim text (used for the progress indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for bold text (used for the assistant label).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Trait for rendering chat output.
pub trait Renderer {
    /// Print the greeting shown at the start of every conversation.
    fn print_welcome(&mut self);

    /// Print the in-progress indicator shown while a request is outstanding.
    fn print_thinking(&mut self);

    /// Print an assembled assistant reply.
    fn print_reply(&mut self, reply: &str);

    /// Print a failed exchange inline.
    fn print_error(&mut self, error: &str);

    /// Print the note shown when a conversation is ended with an exit keyword.
    fn print_exiting(&mut self);

    /// Print the farewell shown when the program ends normally.
    fn print_farewell(&mut self);

    /// Print the goodbye shown when the program is interrupted.
    fn print_interrupted(&mut self);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer<W: Write = Stdout> {
    out: W,
    use_color: bool,
}

impl PlainTextRenderer<Stdout> {
    /// Creates a new PlainTextRenderer on stdout with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer on stdout with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self::with_writer(io::stdout(), use_color)
    }
}

impl Default for PlainTextRenderer<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> PlainTextRenderer<W> {
    /// Creates a renderer writing to `out`.
    pub fn with_writer(out: W, use_color: bool) -> Self {
        Self { out, use_color }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn label(&self) -> String {
        if self.use_color {
            format!("{ANSI_BOLD}{ASSISTANT_LABEL}:{ANSI_RESET}")
        } else {
            format!("{ASSISTANT_LABEL}:")
        }
    }

    fn emit(&mut self, text: &str) {
        // Console writes are best effort; a closed stdout must not end the chat.
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }
}

impl<W: Write> Renderer for PlainTextRenderer<W> {
    fn print_welcome(&mut self) {
        self.emit(&format!(
            "\nWelcome to chat with {ASSISTANT_LABEL}. Type 'exit' or 'quit' to end the chat.\n"
        ));
    }

    fn print_thinking(&mut self) {
        let label = self.label();
        if self.use_color {
            self.emit(&format!("{label} {ANSI_DIM}Thinking...{ANSI_RESET}"));
        } else {
            self.emit(&format!("{label} Thinking..."));
        }
    }

    fn print_reply(&mut self, reply: &str) {
        let label = self.label();
        self.emit(&format!("{label} {reply}\n"));
    }

    fn print_error(&mut self, error: &str) {
        let label = self.label();
        if self.use_color {
            self.emit(&format!(
                "{label} {ANSI_RED}[Error communicating with server: {error}]{ANSI_RESET}\n"
            ));
        } else {
            self.emit(&format!(
                "{label} [Error communicating with server: {error}]\n"
            ));
        }
    }

    fn print_exiting(&mut self) {
        self.emit("\n[Exiting chat]\n");
    }

    fn print_farewell(&mut self) {
        let label = self.label();
        self.emit(&format!("\n{label} See you later!\n"));
    }

    fn print_interrupted(&mut self) {
        self.emit(&format!(
            "\n\n[{ASSISTANT_LABEL}: Chat interrupted. Goodbye!]\n"
        ));
    }
}
