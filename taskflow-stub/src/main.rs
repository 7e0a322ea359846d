//! `TaskFlow` stub API server — standalone runner.
//!
//! Serves the in-memory tasks API for manual testing of the client:
//!
//! ```bash
//! # Run on default address 127.0.0.1:3456
//! cargo run --bin taskflow-stub
//!
//! # Run on custom address
//! cargo run --bin taskflow-stub -- --bind 0.0.0.0:8080
//! ```

use std::sync::Arc;

use clap::Parser;

use taskflow_stub::{StubState, start_server_with_state};

/// CLI arguments for the stub server.
#[derive(Parser, Debug)]
#[command(version, about = "In-memory tasks API stub server")]
struct CliArgs {
    /// Address to bind the HTTP listener to.
    #[arg(long, default_value = "127.0.0.1:3456", env = "TASKFLOW_STUB_ADDR")]
    bind: String,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TASKFLOW_STUB_LOG")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let cli = CliArgs::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let state = Arc::new(StubState::new());

    match start_server_with_state(&cli.bind, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "stub tasks API listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "stub server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start stub server");
            std::process::exit(1);
        }
    }
}
