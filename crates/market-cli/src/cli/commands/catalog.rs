//! Companies and their products.

use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct CompanyCommand {
	#[command(subcommand)]
	pub command: CompanySubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CompanySubcommand {
	/// List companies
	List,

	/// Register a company owned by the logged-in user
	Create {
		#[arg(long)]
		name: String,

		/// Contact email shown to clients
		#[arg(long)]
		email: String,
	},
}

#[derive(Args, Debug)]
pub struct ProductCommand {
	#[command(subcommand)]
	pub command: ProductSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProductSubcommand {
	/// List the products of a company
	List {
		company_id: String,
	},

	/// Add a product to a company catalogue
	Create {
		company_id: String,

		#[arg(long)]
		name: String,

		/// Base price per unit
		#[arg(long)]
		price: f64,

		/// Available colors, comma separated
		#[arg(long, value_delimiter = ',')]
		colors: Vec<String>,

		/// Available sizes, comma separated
		#[arg(long, value_delimiter = ',')]
		sizes: Vec<String>,

		/// Available materials, comma separated
		#[arg(long, value_delimiter = ',')]
		materials: Vec<String>,
	},
}
