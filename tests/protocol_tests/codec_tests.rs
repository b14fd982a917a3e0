//! Codec Tests
//!
//! Tests for numeric tokens and command-line parsing.

use heartgrid::protocol::{
    decode_line, parse_command, parse_numeric, Command, PEEK_USAGE, POKE_USAGE,
};
use heartgrid::CodecError;

// =============================================================================
// Numeric Parsing Tests
// =============================================================================

#[test]
fn test_decimal_wins_over_hex() {
    assert_eq!(parse_numeric("10").unwrap(), 10);
    assert_eq!(parse_numeric("0").unwrap(), 0);
    assert_eq!(parse_numeric("65534").unwrap(), 65534);
    assert_eq!(parse_numeric("007").unwrap(), 7);
}

#[test]
fn test_prefixed_hex() {
    assert_eq!(parse_numeric("0xA").unwrap(), 10);
    assert_eq!(parse_numeric("0xa").unwrap(), 10);
    assert_eq!(parse_numeric("0XfF").unwrap(), 255);
    assert_eq!(parse_numeric("0x10").unwrap(), 16);
}

#[test]
fn test_bare_hex() {
    assert_eq!(parse_numeric("a").unwrap(), 10);
    assert_eq!(parse_numeric("FFFE").unwrap(), 0xfffe);
    assert_eq!(parse_numeric("1f").unwrap(), 31);
}

#[test]
fn test_partial_matches_fail() {
    for token in ["10x", "0x", "x10", "-1", "+1", "1.5", "0xg", "zz", "", " 1"] {
        assert_eq!(
            parse_numeric(token),
            Err(CodecError::InvalidNumber(token.to_string())),
            "token {:?}",
            token
        );
    }
}

#[test]
fn test_overflow_fails() {
    assert!(parse_numeric("0xffffffffffffffffffffffffffffffff").is_err());
    assert!(parse_numeric("999999999999999999999999999999999999").is_err());
}

#[test]
fn test_invalid_number_message() {
    let err = parse_numeric("10x").unwrap_err();
    assert_eq!(err.to_string(), "invalid number: 10x");
}

// =============================================================================
// Command Parsing Tests
// =============================================================================

#[test]
fn test_parse_quit() {
    assert_eq!(parse_command("quit").unwrap(), Some(Command::Quit));
    assert_eq!(parse_command("QUIT now please").unwrap(), Some(Command::Quit));
}

#[test]
fn test_parse_poke() {
    assert_eq!(
        parse_command("poke 5 hi").unwrap(),
        Some(Command::Poke {
            address: 5,
            payload: "hi".to_string()
        })
    );
    assert_eq!(
        parse_command("PoKe 0x10 data extra tokens").unwrap(),
        Some(Command::Poke {
            address: 16,
            payload: "data".to_string()
        })
    );
}

#[test]
fn test_parse_poke_keeps_out_of_range_address() {
    // Range checks belong to the grid
    assert_eq!(
        parse_command("poke 70000 x").unwrap(),
        Some(Command::Poke {
            address: 70000,
            payload: "x".to_string()
        })
    );
}

#[test]
fn test_parse_peek() {
    assert_eq!(
        parse_command("peek 5").unwrap(),
        Some(Command::Peek { address: 5, length: 1 })
    );
    assert_eq!(
        parse_command("PEEK ff 0x3").unwrap(),
        Some(Command::Peek { address: 255, length: 3 })
    );
}

#[test]
fn test_command_keywords() {
    for line in ["QUIT", "Poke 1 x", "peek 1"] {
        let command = parse_command(line).unwrap().unwrap();
        assert_eq!(command.keyword(), line.split(' ').next().unwrap().to_lowercase());
    }
}

#[test]
fn test_usage_hints() {
    assert_eq!(parse_command("poke"), Err(CodecError::Usage(POKE_USAGE)));
    assert_eq!(parse_command("poke 5"), Err(CodecError::Usage(POKE_USAGE)));
    assert_eq!(parse_command("peek"), Err(CodecError::Usage(PEEK_USAGE)));
    assert_eq!(
        CodecError::Usage(POKE_USAGE).to_string(),
        "usage: poke <address> <data>"
    );
}

#[test]
fn test_bad_numbers_in_commands() {
    assert_eq!(
        parse_command("poke 10x hi"),
        Err(CodecError::InvalidNumber("10x".to_string()))
    );
    assert_eq!(
        parse_command("peek 1 two"),
        Err(CodecError::InvalidNumber("two".to_string()))
    );
}

#[test]
fn test_unknown_and_blank_lines_are_ignored() {
    assert_eq!(parse_command("").unwrap(), None);
    assert_eq!(parse_command("   \t ").unwrap(), None);
    assert_eq!(parse_command("hello world").unwrap(), None);
    assert_eq!(parse_command("pokes 1 2").unwrap(), None);
}

#[test]
fn test_whitespace_splitting() {
    assert_eq!(
        parse_command("  peek\t 3   2 ").unwrap(),
        Some(Command::Peek { address: 3, length: 2 })
    );
}

// =============================================================================
// Line Decoding Tests
// =============================================================================

#[test]
fn test_decode_line_strips_terminators() {
    assert_eq!(decode_line(b"peek 1\n").unwrap(), "peek 1");
    assert_eq!(decode_line(b"peek 1\r\n").unwrap(), "peek 1");
    assert_eq!(decode_line(b"peek 1").unwrap(), "peek 1");
}

#[test]
fn test_decode_line_rejects_invalid_utf8() {
    assert_eq!(decode_line(b"poke 1 \xc3\n"), Err(CodecError::InvalidEncoding));
}
