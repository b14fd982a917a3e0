//! Grid Module
//!
//! The addressable memory: a circular array of single-character cells.
//!
//! ## Responsibilities
//! - Validated, wrapping reads and writes
//! - One coarse lock serializing every operation
//! - Full-state JSON dump and best-effort restore
//!
//! ## Addressing
//! ```text
//!   address:  0     1     2          N-2   N-1
//!           ┌─────┬─────┬─────┬ ··· ┬─────┬─────┐
//!           │  a  │  0  │  0  │     │  x  │  y  │──┐
//!           └─────┴─────┴─────┴ ··· ┴─────┴─────┘  │
//!              ▲                                   │
//!              └──────────── wraps ────────────────┘
//! ```
//! Input addresses are never wrapped: anything `>= N` is rejected.
//! Only the cells touched after the start address wrap.

mod cell;
mod charset;
mod store;

pub use cell::Cell;
pub use charset::is_printable;
pub use store::Grid;

/// Number of addressable cells
pub const DATA_GRID_MAX: usize = 65535;

/// Exclusive upper bound on a write payload length
pub const INPUT_MAX: usize = 64;

/// Exclusive upper bound on a read length
pub const REQUEST_MAX: usize = 64;
