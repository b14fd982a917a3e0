//! Grid cell
//!
//! A cell is either empty or holds one printable character.
//!
//! ## Dump Encoding
//! - `Cell::Char(c)` ⇄ the one-character JSON string `"c"`
//! - `Cell::Empty`   →  the number `0`
//!
//! On load, any falsy placeholder (`0`, `false`, `null`, `""`) is read back
//! as `Cell::Empty`. Note the string `"0"` is a literal character.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// One addressable unit of storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Char(char),
}

impl Cell {
    /// Character sent on the wire for this cell
    ///
    /// Empty cells render as `'0'`, so they are indistinguishable from a
    /// stored literal `'0'`.
    pub fn render(self) -> char {
        match self {
            Cell::Empty => '0',
            Cell::Char(c) => c,
        }
    }

    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Empty => serializer.serialize_u8(0),
            Cell::Char(c) => serializer.serialize_char(*c),
        }
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CellVisitor)
    }
}

struct CellVisitor;

impl<'de> Visitor<'de> for CellVisitor {
    type Value = Cell;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a single-character string or an empty placeholder (0, false, null, \"\")")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Cell, E> {
        if v == 0 {
            Ok(Cell::Empty)
        } else {
            Err(E::invalid_value(de::Unexpected::Unsigned(v), &self))
        }
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Cell, E> {
        if v == 0 {
            Ok(Cell::Empty)
        } else {
            Err(E::invalid_value(de::Unexpected::Signed(v), &self))
        }
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Cell, E> {
        if v {
            Err(E::invalid_value(de::Unexpected::Bool(v), &self))
        } else {
            Ok(Cell::Empty)
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<Cell, E> {
        Ok(Cell::Empty)
    }

    fn visit_none<E: de::Error>(self) -> Result<Cell, E> {
        Ok(Cell::Empty)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Cell, E> {
        let mut chars = v.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(Cell::Empty),
            (Some(c), None) => Ok(Cell::Char(c)),
            _ => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
        }
    }
}
