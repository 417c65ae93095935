//! barrage client
//!
//! - Logs into one room of the barrage server and joins its chat group
//! - Heartbeat keep-alive + read loop on one TCP connection
//! - Chat text goes to the player every few seconds
//! - Ctrl-C logs out and exits

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use barrage_client::player::LogSpeaker;
use barrage_client::{config, BarrageClient};

#[derive(Debug, Parser)]
#[command(name = "barrage-client", about = "Follow the barrage of one live room")]
struct Args {
    /// Room id to join.
    room_id: String,

    /// Optional YAML config file.
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let cfg = match config::load(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "config load failed");
            return ExitCode::FAILURE;
        }
    };

    let client = BarrageClient::new(cfg, Arc::new(LogSpeaker));
    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    match client.run(&args.room_id, interrupted).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(room = %args.room_id, code = e.code().as_str(), error = %e, "fatal");
            ExitCode::FAILURE
        }
    }
}
