//! Protocol Module
//!
//! Line-based text protocol spoken by clients.
//!
//! ## Session Transcript
//! ```text
//! S: 65535 bytes ram available.
//! S: commands: poke <address> <data> | peek <address> [length] | quit
//! S: ready> C: poke 0x10 hello
//! S: ready> C: peek 16 5
//! S: hello
//! S: ready> C: peek 70000
//! S: address out of range.
//! S: ready> C: quit
//! ```
//!
//! ### Commands (first token is case-insensitive)
//! - `poke <address> <data>`  - Silent on success, error line otherwise
//! - `peek <address> [length]` - One line with the cells read, or an error line
//! - `quit`                    - Ends the session, no reply
//!
//! Anything else is ignored. Numbers are decimal first, then hex
//! (`0x`-prefixed or bare), and must consume the whole token.

mod command;
mod response;
mod codec;

pub use command::Command;
pub use response::{capacity_banner, Reply, COMMAND_BANNER, PROMPT};
pub use codec::{decode_line, parse_command, parse_numeric, MAX_LINE, PEEK_USAGE, POKE_USAGE};
