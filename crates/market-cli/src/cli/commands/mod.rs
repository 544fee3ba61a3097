//! CLI command definitions and argument parsing

mod account;
mod catalog;
mod events;
mod trade;

pub use account::LoginArgs;
pub use catalog::{CompanyCommand, CompanySubcommand, ProductCommand, ProductSubcommand};
pub use events::{
	AuctionCommand, AuctionSubcommand, DashboardArgs, EventCommand, EventSubcommand, PublishArgs,
	RequirementCommand, RequirementSubcommand,
};
pub use trade::{OfferCommand, OfferSubcommand, OrderCommand, OrderSubcommand};
