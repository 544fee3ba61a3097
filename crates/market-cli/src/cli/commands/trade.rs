//! Offers and orders.

use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct OfferCommand {
	#[command(subcommand)]
	pub command: OfferSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum OfferSubcommand {
	/// List the offers made to an auction or by a company
	List {
		#[arg(long, required_unless_present = "company", conflicts_with = "company")]
		auction: Option<String>,

		#[arg(long)]
		company: Option<String>,
	},

	/// Show an offer
	Show {
		id: String,
	},

	/// Submit an offer to an auction on behalf of a company
	Create {
		#[arg(long)]
		auction: String,

		#[arg(long)]
		company: String,

		#[arg(long)]
		price: f64,

		/// Days needed to deliver
		#[arg(long)]
		lead_time_days: u32,
	},

	/// Accept an offer, turning it into an order for the logged-in user
	Accept {
		id: String,
	},

	/// Reject an offer
	Reject {
		id: String,

		#[arg(long)]
		reason: Option<String>,
	},
}

#[derive(Args, Debug)]
pub struct OrderCommand {
	#[command(subcommand)]
	pub command: OrderSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum OrderSubcommand {
	/// List orders of a client (defaults to the logged-in user)
	List {
		#[arg(long)]
		client: Option<String>,
	},

	/// Show an order
	Show {
		id: String,
	},

	/// Set the status of an order
	Status {
		id: String,
		status: String,
	},

	/// Cancel an order
	Cancel {
		id: String,
	},
}
