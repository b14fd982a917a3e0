//! HeartGrid Server Binary
//!
//! Starts the TCP server for HeartGrid.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use heartgrid::network::Server;
use heartgrid::{Config, Grid, Lifecycle};
use tracing_subscriber::{fmt, EnvFilter};

/// HeartGrid Server
#[derive(Parser, Debug)]
#[command(name = "heartgrid")]
#[command(about = "Addressable memory grid served over TCP")]
#[command(version)]
struct Args {
    /// The address on which to listen for connections
    #[arg(short = 's', long = "serve-address", default_value = "0.0.0.0")]
    address: String,

    /// The port on which to listen for connections
    #[arg(short, long, default_value = "8025")]
    port: u16,

    /// JSON file to restore the grid from and dump it to
    #[arg(short, long = "dump-file")]
    dump_file: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let config = Config::builder()
        .listen_addr(&args.address)
        .port(args.port)
        .dump_path_opt(args.dump_file)
        .verbose(args.verbose)
        .build();

    // Initialize tracing/logging
    let default_level = if config.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .init();

    tracing::info!("HeartGrid Server v{}", heartgrid::VERSION);
    match &config.dump_path {
        Some(path) => tracing::info!("Dump file: {}", path.display()),
        None => tracing::info!("No dump file, persistence disabled"),
    }

    let grid = Arc::new(Grid::open(config.dump_path.as_deref()));
    let lifecycle = Lifecycle::new(Arc::clone(&grid), config.dump_path.clone());

    #[cfg(unix)]
    {
        if let Err(e) = lifecycle.install() {
            tracing::error!("Failed to install signal handlers: {}", e);
            std::process::exit(1);
        }
    }

    let server = match Server::bind(&config, grid) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to bind {}:{}: {}", config.listen_addr, config.port, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        lifecycle.exit_dump();
        std::process::exit(1);
    }

    lifecycle.exit_dump();
    tracing::info!("Server stopped");
}
