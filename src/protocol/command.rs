//! Command definitions
//!
//! Represents commands from clients.

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// End the session
    Quit,

    /// Write `payload` starting at `address`
    Poke { address: usize, payload: String },

    /// Read `length` cells starting at `address`
    Peek { address: usize, length: usize },
}

impl Command {
    /// Lowercase keyword that selects this command
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::Quit => "quit",
            Command::Poke { .. } => "poke",
            Command::Peek { .. } => "peek",
        }
    }
}
