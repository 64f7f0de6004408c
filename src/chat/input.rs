//! Line-oriented console input.

use std::io;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::error::{Error, Result};

/// What a prompt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A line of text, without its terminator.
    Line(String),

    /// The user pressed Ctrl-C at the prompt.
    Interrupted,

    /// No more input will arrive (Ctrl-D or closed stdin).
    Eof,
}

/// A source of prompted input lines.
pub trait LineSource {
    /// Shows `prompt` and blocks for one line.
    fn read_line(&mut self, prompt: &str) -> Result<Input>;
}

/// Reads lines from the terminal with rustyline.
pub struct EditorInput {
    editor: DefaultEditor,
}

impl EditorInput {
    /// Creates a new editor-backed input.
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().map_err(readline_error)?;
        Ok(Self { editor })
    }
}

impl LineSource for EditorInput {
    fn read_line(&mut self, prompt: &str) -> Result<Input> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Input::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Eof),
            Err(err) => Err(readline_error(err)),
        }
    }
}

fn readline_error(err: ReadlineError) -> Error {
    match err {
        ReadlineError::Io(source) => Error::io("failed to read input", source),
        other => Error::io("failed to read input", io::Error::other(other.to_string())),
    }
}
