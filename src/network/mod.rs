//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread
//! - One thread per connection, running a `Session` until quit or disconnect
//! - Every session goes through the same `Arc<Grid>`

mod server;
mod session;

pub use server::{Server, ShutdownHandle};
pub use session::{execute, Session};
