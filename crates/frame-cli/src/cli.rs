//! # Command Line
//!
//! Argument definitions for `corvus-probe`.

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "corvus-probe", author, version, about, long_about = None)]
pub struct Cli {
    /// Merchant backend origin; falls back to MERCHANT_BASE_URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Checkout config file with endpoint paths and destinations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Announce a payment and print the payment id
    Init(InitArgs),

    /// Exchange a stored card for a session token
    SessionToken {
        /// Card profile id the card was registered under
        #[arg(long)]
        profile_id: String,

        /// Stored card token
        #[arg(long)]
        token: String,
    },

    /// Route a card-frame result the way the checkout page does
    Verify {
        /// Result as a terminal-page query, e.g. "status=ok&paymentId=..."
        #[arg(long)]
        query: String,
    },
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Amount in the major currency unit
    #[arg(long)]
    pub amount: Decimal,

    /// ISO 4217 currency code
    #[arg(long, default_value = "EUR")]
    pub currency: String,

    /// Cart description
    #[arg(long, default_value = "Product 1")]
    pub cart: String,

    #[arg(long)]
    pub email: Option<String>,

    /// Cardholder name and surname
    #[arg(long, num_args = 2, value_names = ["NAME", "SURNAME"])]
    pub cardholder: Option<Vec<String>>,

    /// Also register the card under this profile id ("new" generates one)
    #[arg(long, conflicts_with = "session_token")]
    pub profile_id: Option<String>,

    /// Pay with a stored card unlocked by this session token
    #[arg(long)]
    pub session_token: Option<String>,
}
