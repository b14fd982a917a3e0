//! Protocol codec
//!
//! Turns one client line into a `Command`.
//!
//! ## Line Format
//! ```text
//! <keyword> [arg ...]\n        tokens split on any whitespace
//! ```
//!
//! ### Arguments by Command
//! - POKE: address, payload (extra tokens ignored)
//! - PEEK: address, optional length (default 1)
//! - QUIT: none (extra tokens ignored)

use crate::error::CodecError;

use super::Command;

/// Longest accepted line in bytes, terminator excluded
///
/// Comfortably above `poke <hex address> <63 four-byte chars>`.
pub const MAX_LINE: usize = 512;

/// Usage hint sent when `poke` lacks arguments
pub const POKE_USAGE: &str = "usage: poke <address> <data>";

/// Usage hint sent when `peek` lacks arguments
pub const PEEK_USAGE: &str = "usage: peek <address> [length]";

// =============================================================================
// Line Decoding
// =============================================================================

/// Strip the line terminator and check the bytes are UTF-8
pub fn decode_line(bytes: &[u8]) -> Result<&str, CodecError> {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    std::str::from_utf8(bytes).map_err(|_| CodecError::InvalidEncoding)
}

// =============================================================================
// Numbers
// =============================================================================

/// Parse an address or length token
///
/// Decimal wins: `10` is ten. Only a token that is not entirely decimal
/// digits is tried as hex, with an optional `0x`/`0X` prefix. Either way the
/// digits must consume the whole token.
pub fn parse_numeric(token: &str) -> Result<usize, CodecError> {
    let invalid = || CodecError::InvalidNumber(token.to_string());

    if is_all(token, |b| b.is_ascii_digit()) {
        if let Ok(value) = token.parse::<usize>() {
            return Ok(value);
        }
    }

    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);

    if is_all(digits, |b| b.is_ascii_hexdigit()) {
        return usize::from_str_radix(digits, 16).map_err(|_| invalid());
    }

    Err(invalid())
}

/// Non-empty and every byte satisfies `pred`
fn is_all(s: &str, pred: impl Fn(u8) -> bool) -> bool {
    !s.is_empty() && s.bytes().all(pred)
}

// =============================================================================
// Commands
// =============================================================================

/// Parse one line into a command
///
/// - `Ok(Some(_))`: a command to run
/// - `Ok(None)`: blank line or unknown keyword, ignored silently
/// - `Err(Usage)`: known keyword with too few arguments
/// - `Err(InvalidNumber)`: an address or length failed `parse_numeric`
pub fn parse_command(line: &str) -> Result<Option<Command>, CodecError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    let Some(keyword) = tokens.first() else {
        return Ok(None);
    };

    match keyword.to_ascii_lowercase().as_str() {
        "quit" => Ok(Some(Command::Quit)),
        "poke" => {
            if tokens.len() < 3 {
                return Err(CodecError::Usage(POKE_USAGE));
            }
            Ok(Some(Command::Poke {
                address: parse_numeric(tokens[1])?,
                payload: tokens[2].to_string(),
            }))
        }
        "peek" => {
            if tokens.len() < 2 {
                return Err(CodecError::Usage(PEEK_USAGE));
            }
            let address = parse_numeric(tokens[1])?;
            let length = match tokens.get(2) {
                Some(token) => parse_numeric(token)?,
                None => 1,
            };
            Ok(Some(Command::Peek { address, length }))
        }
        _ => Ok(None),
    }
}
