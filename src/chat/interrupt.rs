//! Ctrl-C handling.
//!
//! At a terminal prompt rustyline reports Ctrl-C itself.  Everywhere else
//! (waiting on the server, streaming) SIGINT arrives through the handler
//! installed here, which records it and wakes whoever is waiting.  The
//! goodbye line is printed exactly once, by whichever side claims it first.

use std::io;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tokio::sync::Notify;

use crate::chat::render::{PlainTextRenderer, Renderer};
use crate::error::{Error, Result};

/// Exit status used when the process ends because of an interrupt.
pub const INTERRUPTED_EXIT_CODE: u8 = 130;

/// How long the signal handler waits for the chat loop to notice a Ctrl-C.
const SIGNAL_GRACE: Duration = Duration::from_millis(500);

/// A shared, one-way interrupt flag.
#[derive(Clone, Debug, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
    notify: Arc<Notify>,
    goodbye: Arc<AtomicBool>,
}

impl Interrupt {
    /// Creates an untriggered interrupt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the process-wide SIGINT handler.
    ///
    /// If the chat loop does not pick the interrupt up in time (for example
    /// while blocked reading a piped stdin), the handler prints the goodbye
    /// and exits.  A second Ctrl-C exits immediately.
    pub fn install(&self) -> Result<()> {
        let this = self.clone();
        ctrlc::set_handler(move || {
            let mut renderer = PlainTextRenderer::with_color(false);
            if this.on_signal(SIGNAL_GRACE, &mut renderer) {
                process::exit(i32::from(INTERRUPTED_EXIT_CODE));
            }
        })
        .map_err(|err| {
            Error::io(
                "failed to install Ctrl-C handler",
                io::Error::other(err.to_string()),
            )
        })
    }

    /// Records an interrupt and wakes a waiter.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Returns true once an interrupt has been recorded.
    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Claims the right to print the goodbye line.
    ///
    /// Returns true for the first caller only.
    pub fn claim_goodbye(&self) -> bool {
        !self.goodbye.swap(true, Ordering::SeqCst)
    }

    /// Handles one delivered SIGINT; returns true when the process should
    /// exit from the handler.
    fn on_signal<R: Renderer + ?Sized>(&self, grace: Duration, renderer: &mut R) -> bool {
        let repeated = self.is_triggered();
        if !repeated {
            self.trigger();
            thread::sleep(grace);
        }
        if self.claim_goodbye() {
            renderer.print_interrupted();
            return true;
        }
        repeated
    }

    /// Resolves once an interrupt has been recorded.
    pub async fn wait(&self) {
        while !self.is_triggered() {
            self.notify.notified().await;
        }
    }
}
