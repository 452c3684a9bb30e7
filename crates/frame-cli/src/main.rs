//! # corvus-probe
//!
//! Drive a merchant backend through the card-frame checkout calls.
//!
//! ## Usage
//!
//! ```bash
//! export MERCHANT_BASE_URL=http://localhost:8000
//!
//! corvus-probe init --amount 1.23 --currency EUR --profile-id new
//! corvus-probe session-token --profile-id SHOP_1760000000000 --token tok_...
//! corvus-probe verify --query "status=ok&paymentId=...&signature=..."
//! ```

use clap::Parser;
use frame_cli::{handlers, Cli, Command, ProbeState};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    let state = ProbeState::from_cli(&cli).map_err(|e| anyhow::anyhow!(e.display_message()))?;

    let result = match &cli.command {
        Command::Init(args) => handlers::init(&state, args).await,
        Command::SessionToken { profile_id, token } => {
            handlers::session_token(&state, profile_id, token).await
        }
        Command::Verify { query } => handlers::verify(&state, query).await,
    };

    result.map_err(|e| anyhow::anyhow!(e.display_message()))
}

fn init_logging(json: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    // stdout carries command output
    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
}
