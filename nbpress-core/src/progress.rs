//! User-facing progress messages.
//!
//! The core never writes to stdout itself. Each stage hands its messages to a
//! [`Progress`] sink, and the caller decides where they go (the CLI prints them,
//! or drops them when stdout is reserved for the JSON report).

/// Receives one message before each step a run performs or, in dry-run mode, skips.
pub trait Progress {
    fn step(&self, message: &str);
}

impl<F> Progress for F
where
    F: Fn(&str),
{
    fn step(&self, message: &str) {
        self(message)
    }
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Progress for Silent {
    fn step(&self, _message: &str) {}
}
