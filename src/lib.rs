//! # HeartGrid
//!
//! A fixed-size addressable memory served over TCP:
//! - 65535 single-character cells with wraparound addressing
//! - Line-based `poke`/`peek`/`quit` protocol, one thread per client
//! - Printable-only input, all-or-nothing writes
//! - JSON dump on exit and on SIGUSR1, best-effort restore on startup
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │              (one Session thread per client)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ parse_command → execute
//!                       ▼
//!               ┌───────────────┐        ┌──────────────────────┐
//!               │     Grid      │◄───────│  Lifecycle (signals) │
//!               │ (one Mutex)   │  dump  │  SIGUSR1/INT/TERM    │
//!               └───────┬───────┘        └──────────────────────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐
//!               │  dump.json    │
//!               └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod grid;
pub mod protocol;
pub mod network;
pub mod lifecycle;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CodecError, GridError, HeartGridError, Result};
pub use config::Config;
pub use grid::Grid;
pub use lifecycle::{Lifecycle, SignalAction};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of HeartGrid
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
