//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure using clap and the terminal
//! output helpers shared by every command.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Event merchandise marketplace client
#[derive(Parser, Debug)]
#[command(name = "market")]
#[command(about = "Publish event merchandise requests and manage offers and orders")]
#[command(version)]
pub struct Cli {
	/// Path to a TOML configuration file (defaults to ./market.toml when present)
	#[arg(short, long, global = true, env = "MARKET_CONFIG")]
	pub config: Option<PathBuf>,

	/// Backend base URL, overriding the configuration
	#[arg(long, global = true)]
	pub api_url: Option<String>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Log in and store the session
	Login(commands::LoginArgs),

	/// Forget the stored session
	Logout,

	/// Show the logged-in user
	Whoami,

	/// Manage events
	Event(commands::EventCommand),

	/// Manage the product requirements of an event
	Requirement(commands::RequirementCommand),

	/// Manage auctions
	Auction(commands::AuctionCommand),

	/// Manage offers
	Offer(commands::OfferCommand),

	/// Manage orders
	Order(commands::OrderCommand),

	/// Manage companies
	Company(commands::CompanyCommand),

	/// Manage company products
	Product(commands::ProductCommand),

	/// Publish an order request: event, requirement and auction in one go
	Publish(commands::PublishArgs),

	/// Overview of your order requests
	Dashboard(commands::DashboardArgs),
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;

	#[test]
	fn test_cli_definition_is_valid() {
		Cli::command().debug_assert();
	}

	#[test]
	fn test_global_options_after_subcommand() {
		let cli = Cli::try_parse_from([
			"market",
			"event",
			"list",
			"--api-url",
			"http://127.0.0.1:4000",
		])
		.unwrap();

		assert_eq!(cli.api_url.as_deref(), Some("http://127.0.0.1:4000"));
		assert!(matches!(cli.command, Commands::Event(_)));
	}

	#[test]
	fn test_publish_requires_core_fields() {
		assert!(Cli::try_parse_from(["market", "publish", "--name", "Gala"]).is_err());

		let cli = Cli::try_parse_from([
			"market",
			"publish",
			"--event-type",
			"wedding",
			"--name",
			"Gala",
			"--date",
			"2026-12-01",
			"--location",
			"Lima",
			"--description",
			"Guest mugs",
			"--quantity",
			"80",
			"--product-type",
			"Tazas",
			"--budget",
			"450.5",
		])
		.unwrap();

		let Commands::Publish(args) = cli.command else {
			panic!("expected publish");
		};
		assert_eq!(args.quantity, 80);
		assert_eq!(args.budget, 450.5);
		assert!(args.size.is_none());
	}
}
