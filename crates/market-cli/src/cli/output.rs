//! Terminal output utilities and formatting
//!
//! Provides consistent formatting for CLI output: coloured status messages,
//! key-value details and one-line summaries of marketplace records.

use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use market_client::operations::OrderProgress;
use market_types::{AuctionStatus, OfferStatus};

/// Terminal display utilities for formatted CLI output
pub struct Display;

impl Display {
	/// Displays a formatted section header with underline
	///
	/// # Arguments
	/// * `text` - Title shown above the underline
	pub fn header(text: &str) {
		println!("\n{}", text.bold().cyan());
		println!("{}", "─".repeat(text.chars().count()).cyan());
	}

	/// Displays a success message with green checkmark
	///
	/// # Arguments
	/// * `message` - What completed, e.g. the id of a created record
	pub fn success(message: &str) {
		println!("{} {}", "✓".green().bold(), message);
	}

	/// Displays an error message with red X symbol to stderr
	///
	/// # Arguments
	/// * `message` - User-facing description of the failure
	pub fn error(message: &str) {
		eprintln!("{} {}", "✗".red().bold(), message.red());
	}

	/// Displays a warning message with yellow warning symbol
	///
	/// # Arguments
	/// * `message` - Condition the user should act on
	pub fn warning(message: &str) {
		println!("{} {}", "⚠".yellow().bold(), message.yellow());
	}

	/// Displays an informational message with blue info symbol
	///
	/// # Arguments
	/// * `message` - Neutral status text, such as an empty listing
	pub fn info(message: &str) {
		println!("{} {}", "ℹ".blue().bold(), message);
	}

	/// Displays a key-value pair with formatted labels
	///
	/// # Arguments
	/// * `key` - Field label, printed in bold
	/// * `value` - Already formatted field value
	pub fn kv(key: &str, value: &str) {
		println!("  {} {}", format!("{key}:").bold(), value);
	}

	/// Displays a formatted section title with arrow prefix
	///
	/// # Arguments
	/// * `title` - Name of the block that follows
	pub fn section(title: &str) {
		println!("\n{}", format!("▸ {title}").bold());
	}

	/// Displays one entry of a list
	///
	/// # Arguments
	/// * `id` - Backend identifier, printed dimmed
	/// * `summary` - One-line description of the record
	pub fn item(id: &str, summary: &str) {
		println!("  {} {}", id.dimmed(), summary);
	}

	/// Displays a numbered list of next steps
	///
	/// # Arguments
	/// * `steps` - Suggested commands, in the order to run them
	pub fn next_steps(steps: &[&str]) {
		Self::section("Next Steps");
		for (i, step) in steps.iter().enumerate() {
			println!("  {}. {}", i + 1, step);
		}
	}
}

pub fn format_date(date: &DateTime<Utc>) -> String {
	date.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Formats an amount with two decimals and thousands separators.
pub fn format_price(amount: f64) -> String {
	let fixed = format!("{:.2}", amount.abs());
	let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

	let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
	for (i, digit) in whole.chars().enumerate() {
		if i > 0 && (whole.len() - i) % 3 == 0 {
			grouped.push(',');
		}
		grouped.push(digit);
	}

	let sign = if amount < 0.0 { "-" } else { "" };
	format!("{sign}${grouped}.{cents}")
}

pub fn progress_badge(progress: OrderProgress) -> ColoredString {
	match progress {
		OrderProgress::Pending => "● pending".yellow(),
		OrderProgress::InProgress => "◐ in progress".blue(),
		OrderProgress::Completed => "✓ completed".green(),
	}
}

pub fn auction_badge(status: AuctionStatus) -> ColoredString {
	match status {
		AuctionStatus::Active => "● active".green(),
		AuctionStatus::Cancelled => "✗ cancelled".red(),
		AuctionStatus::Ended => "■ ended".dimmed(),
	}
}

pub fn offer_badge(status: OfferStatus) -> ColoredString {
	match status {
		OfferStatus::Pending => "● pending".yellow(),
		OfferStatus::Accepted => "✓ accepted".green(),
		OfferStatus::Rejected => "✗ rejected".red(),
	}
}
