//! Server-side text
//!
//! Banners, prompt, and the reply produced for each command.

use crate::grid::DATA_GRID_MAX;

/// Sent before every command line, without a newline
pub const PROMPT: &str = "ready> ";

/// Second banner line, sent once on connect
pub const COMMAND_BANNER: &str =
    "commands: poke <address> <data> | peek <address> [length] | quit";

/// First banner line, sent once on connect
pub fn capacity_banner() -> String {
    format!("{} bytes ram available.", DATA_GRID_MAX)
}

/// What a session does after running one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Nothing to send
    Silent,

    /// Send this text followed by a newline
    Line(String),

    /// Close the session without sending anything
    Close,
}

impl Reply {
    pub fn line(text: impl Into<String>) -> Self {
        Reply::Line(text.into())
    }
}
