//! # frame-cli
//!
//! Command-line probe for a merchant backend. Runs the same clients the
//! checkout pages run, with the page replaced by the console.
//!
//! ## Commands
//!
//! | Command | Endpoint | Prints |
//! |---------|----------|--------|
//! | `init` | init-payment / init-payment-with-token | payment id |
//! | `session-token` | fetch-session-token | session token and expiry |
//! | `verify` | check-payment-response (status `ok` only) | terminal destination |

pub mod cli;
pub mod console;
pub mod handlers;
pub mod state;

pub use cli::{Cli, Command, InitArgs};
pub use state::ProbeState;
