//! Command-line front-end for the event merchandise marketplace.
//!
//! The binary in `src/bin/market.rs` parses arguments with [`cli::Cli`],
//! builds a [`market_client::Context`] from configuration and runs one
//! command against the backend.

pub mod cli;
pub mod settings;

pub use settings::load_config;
