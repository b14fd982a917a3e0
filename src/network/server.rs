//! TCP Server
//!
//! Accepts connections and hands each one to its own session thread.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::Config;
use crate::error::Result;
use crate::grid::Grid;

use super::Session;

/// First pause after a failed `accept`
const ACCEPT_BACKOFF_MIN: Duration = Duration::from_millis(10);

/// Cap on the pause between repeated `accept` failures
const ACCEPT_BACKOFF_MAX: Duration = Duration::from_secs(1);

/// TCP server for HeartGrid
pub struct Server {
    listener: TcpListener,

    /// Bound address (resolved, so port 0 becomes the real port)
    local_addr: SocketAddr,

    grid: Arc<Grid>,

    shutdown: Arc<AtomicBool>,
}

/// Stops a running accept loop from another thread
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    wake_addr: SocketAddr,
}

impl Server {
    /// Bind the listening socket described by `config`
    pub fn bind(config: &Config, grid: Arc<Grid>) -> Result<Self> {
        let listener = TcpListener::bind(config.socket_addr()?)?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Listening on {}", local_addr);

        Ok(Self {
            listener,
            local_addr,
            grid,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Start accepting connections (blocking)
    ///
    /// Returns once a `ShutdownHandle` fires. Sessions already running are
    /// left to finish on their own.
    ///
    /// Persistent `accept` failures (e.g. out of file descriptors) back off
    /// exponentially instead of spinning.
    pub fn run(&self) -> Result<()> {
        let mut backoff: Option<Duration> = None;

        for stream in self.listener.incoming() {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }

            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    let pause = next_backoff(backoff);
                    tracing::warn!(
                        "Failed to accept connection: {} (retrying in {:?})",
                        e,
                        pause
                    );
                    thread::sleep(pause);
                    backoff = Some(pause);
                    continue;
                }
            };

            backoff = None;
            self.spawn_session(stream);
        }

        tracing::info!("Accept loop on {} stopped", self.local_addr);
        Ok(())
    }

    fn spawn_session(&self, stream: TcpStream) {
        let grid = Arc::clone(&self.grid);
        let name = match stream.peer_addr() {
            Ok(addr) => format!("session-{}", addr),
            Err(_) => "session".to_string(),
        };

        let spawned = thread::Builder::new().name(name).spawn(move || {
            match Session::from_stream(stream, grid) {
                Ok(mut session) => {
                    let _ = session.run();
                }
                Err(e) => tracing::warn!("Failed to set up session: {}", e),
            }
        });

        if let Err(e) = spawned {
            tracing::error!("Failed to spawn session thread: {}", e);
        }
    }

    /// Address the server is actually bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle that stops `run`
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        let mut wake_addr = self.local_addr;
        if wake_addr.ip().is_unspecified() {
            wake_addr.set_ip(match wake_addr {
                SocketAddr::V4(_) => std::net::Ipv4Addr::LOCALHOST.into(),
                SocketAddr::V6(_) => std::net::Ipv6Addr::LOCALHOST.into(),
            });
        }

        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
            wake_addr,
        }
    }
}

/// Pause after an `accept` failure, doubling from the previous one
fn next_backoff(previous: Option<Duration>) -> Duration {
    match previous {
        None => ACCEPT_BACKOFF_MIN,
        Some(pause) => (pause * 2).min(ACCEPT_BACKOFF_MAX),
    }
}

impl ShutdownHandle {
    /// Signal the server to stop accepting
    ///
    /// `accept` blocks, so a throwaway connection wakes it up to see the flag.
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
        let _ = TcpStream::connect(self.wake_addr);
    }
}
