//! Lifecycle Module
//!
//! Signal-driven persistence for a running server.
//!
//! ## Signals
//! - SIGUSR1         - dump the grid, keep serving
//! - SIGINT, SIGTERM - dump the grid, exit with status 0
//!
//! Without a dump path every hook still runs but writes nothing.

use std::path::PathBuf;
use std::sync::Arc;

use crate::grid::Grid;

/// What the signal thread does after handling a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    Continue,
    Exit,
}

/// Dump/exit callbacks bound to one grid
#[derive(Clone)]
pub struct Lifecycle {
    grid: Arc<Grid>,
    dump_path: Option<PathBuf>,
}

impl Lifecycle {
    pub fn new(grid: Arc<Grid>, dump_path: Option<PathBuf>) -> Self {
        Self { grid, dump_path }
    }

    /// On-demand snapshot while the server keeps running
    ///
    /// Returns whether a dump file was written.
    pub fn force_dump(&self) -> bool {
        self.dump("forced")
    }

    /// Final snapshot before the process exits
    ///
    /// Returns whether a dump file was written.
    pub fn exit_dump(&self) -> bool {
        self.dump("exit")
    }

    /// Failures are logged and dropped; the caller carries on either way.
    fn dump(&self, reason: &str) -> bool {
        let Some(path) = self.dump_path.as_deref() else {
            tracing::debug!("No dump path configured, skipping {} dump", reason);
            return false;
        };

        match self.grid.dump(path) {
            Ok(()) => {
                tracing::info!("Grid dumped to {} ({})", path.display(), reason);
                true
            }
            Err(e) => {
                tracing::warn!("Failed {} dump to {}: {}", reason, path.display(), e);
                false
            }
        }
    }
}

#[cfg(unix)]
mod unix {
    use std::thread::{self, JoinHandle};

    use signal_hook::consts::{SIGINT, SIGTERM, SIGUSR1};
    use signal_hook::iterator::Signals;

    use super::{Lifecycle, SignalAction};
    use crate::error::{HeartGridError, Result};

    impl Lifecycle {
        /// Run the hook for one delivered signal
        pub fn handle(&self, signal: i32) -> SignalAction {
            match signal {
                SIGUSR1 => {
                    tracing::info!("Received SIGUSR1, forcing dump");
                    self.force_dump();
                    SignalAction::Continue
                }
                SIGINT | SIGTERM => {
                    tracing::info!("Received signal {}, shutting down", signal);
                    self.exit_dump();
                    SignalAction::Exit
                }
                other => {
                    tracing::debug!("Ignoring signal {}", other);
                    SignalAction::Continue
                }
            }
        }

        /// Register the signal hooks and serve them on a dedicated thread
        ///
        /// On SIGINT/SIGTERM the thread exits the whole process with status 0.
        pub fn install(&self) -> Result<JoinHandle<()>> {
            let mut signals = Signals::new([SIGINT, SIGTERM, SIGUSR1])
                .map_err(|e| HeartGridError::Signal(e.to_string()))?;

            let controller = self.clone();
            let handle = thread::Builder::new()
                .name("lifecycle".to_string())
                .spawn(move || {
                    for signal in signals.forever() {
                        if controller.handle(signal) == SignalAction::Exit {
                            std::process::exit(0);
                        }
                    }
                })?;

            Ok(handle)
        }
    }
}
