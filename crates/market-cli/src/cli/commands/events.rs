//! Events, requirements, auctions and the flows built on them.

use clap::{Args, Subcommand, ValueEnum};
use market_client::operations::OrderProgress;
use market_types::ProductType;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct EventCommand {
	#[command(subcommand)]
	pub command: EventSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum EventSubcommand {
	/// List events
	List {
		/// Show every event instead of only your own
		#[arg(long)]
		all: bool,
	},

	/// Show an event and its requirements
	Show {
		id: String,
	},

	/// Create an event owned by the logged-in user
	Create {
		#[arg(long)]
		name: String,

		/// Event date, e.g. 2026-12-01 or 2026-12-01T18:30
		#[arg(long)]
		date: String,

		#[arg(long)]
		location: String,
	},

	/// Delete an event
	Delete {
		id: String,
	},
}

#[derive(Args, Debug)]
pub struct RequirementCommand {
	#[command(subcommand)]
	pub command: RequirementSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RequirementSubcommand {
	/// List the requirements of an event
	List {
		event_id: String,
	},

	/// Add requirements to an event
	///
	/// Either describe one requirement with flags, or pass a JSON file
	/// holding a list of requirements.
	Add {
		event_id: String,

		/// JSON file with a list of requirements
		#[arg(long, conflicts_with_all = ["product_type", "description", "quantity"])]
		from_file: Option<PathBuf>,

		/// camisetas, gorras, posters, tazas or otro
		#[arg(long, required_unless_present = "from_file")]
		product_type: Option<ProductType>,

		#[arg(long, required_unless_present = "from_file")]
		description: Option<String>,

		#[arg(long, required_unless_present = "from_file", allow_negative_numbers = true)]
		quantity: Option<i64>,

		/// Extra spec as key=value, repeatable
		#[arg(long = "spec", value_parser = parse_key_val)]
		specs: Vec<(String, String)>,

		/// Reference image file, repeatable
		#[arg(long = "image")]
		images: Vec<PathBuf>,
	},
}

#[derive(Args, Debug)]
pub struct AuctionCommand {
	#[command(subcommand)]
	pub command: AuctionSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuctionSubcommand {
	/// Open an auction for an event
	Create {
		#[arg(long)]
		event_id: String,

		/// Closing date of the auction
		#[arg(long)]
		end: String,

		/// Opening date of the auction (defaults to now)
		#[arg(long)]
		start: Option<String>,

		/// Suggested price
		#[arg(long)]
		price: f64,
	},

	/// Show an auction and its offers
	Show {
		id: String,
	},

	/// Cancel an auction
	Cancel {
		id: String,
	},

	/// Close an auction
	End {
		id: String,
	},
}

/// Fields of the new order request form.
#[derive(Args, Debug)]
pub struct PublishArgs {
	/// Kind of event, e.g. wedding or conference
	#[arg(long)]
	pub event_type: String,

	#[arg(long)]
	pub name: String,

	/// Event date, which is also when the auction closes
	#[arg(long)]
	pub date: String,

	#[arg(long)]
	pub location: String,

	/// What should be produced
	#[arg(long)]
	pub description: String,

	#[arg(long, allow_negative_numbers = true)]
	pub quantity: i64,

	#[arg(long)]
	pub product_type: String,

	#[arg(long)]
	pub size: Option<String>,

	#[arg(long)]
	pub colors: Option<String>,

	#[arg(long)]
	pub material: Option<String>,

	/// Anything else the companies should know
	#[arg(long)]
	pub info: Option<String>,

	/// Estimated budget, used as the suggested auction price
	#[arg(long, allow_negative_numbers = true)]
	pub budget: f64,
}

#[derive(Args, Debug)]
pub struct DashboardArgs {
	/// Only show orders with this status
	#[arg(long, value_enum)]
	pub status: Option<ProgressFilter>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressFilter {
	Pending,
	#[value(name = "in_progress", alias = "in-progress")]
	InProgress,
	Completed,
}

impl From<ProgressFilter> for OrderProgress {
	fn from(filter: ProgressFilter) -> Self {
		match filter {
			ProgressFilter::Pending => OrderProgress::Pending,
			ProgressFilter::InProgress => OrderProgress::InProgress,
			ProgressFilter::Completed => OrderProgress::Completed,
		}
	}
}

/// Parses `key=value`.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
	let (key, value) = s
		.split_once('=')
		.ok_or_else(|| format!("expected key=value, got '{s}'"))?;
	let key = key.trim();
	if key.is_empty() {
		return Err(format!("empty key in '{s}'"));
	}
	Ok((key.to_string(), value.to_string()))
}
