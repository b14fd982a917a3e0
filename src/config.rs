//! Configuration for HeartGrid
//!
//! Centralized configuration with sensible defaults.

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

use crate::error::{HeartGridError, Result};

/// Main configuration for a HeartGrid instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Address (host or IP) to listen on
    pub listen_addr: String,

    /// TCP port to listen on. `0` asks the OS for a free port.
    pub port: u16,

    // -------------------------------------------------------------------------
    // Persistence Configuration
    // -------------------------------------------------------------------------
    /// JSON dump file. `None` disables both restore and dump.
    pub dump_path: Option<PathBuf>,

    // -------------------------------------------------------------------------
    // Logging Configuration
    // -------------------------------------------------------------------------
    /// Verbose (debug) logging
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            port: 8025,
            dump_path: None,
            verbose: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Resolve `listen_addr:port` into a socket address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        (self.listen_addr.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| {
                HeartGridError::Config(format!("cannot resolve {}: {}", self.listen_addr, e))
            })?
            .next()
            .ok_or_else(|| {
                HeartGridError::Config(format!("no address found for {}", self.listen_addr))
            })
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the listen port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the dump file path
    pub fn dump_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.dump_path = Some(path.into());
        self
    }

    /// Set or clear the dump file path
    pub fn dump_path_opt(mut self, path: Option<PathBuf>) -> Self {
        self.config.dump_path = path;
        self
    }

    /// Enable verbose logging
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
