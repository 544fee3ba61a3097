//! Event, auction and requirement types.
//!
//! A client creates an event, attaches requirements describing the products
//! needed, and opens an auction so companies can bid on those requirements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Free-form product specification attached to a requirement or offer.
pub type SpecMap = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
	pub id: String,
	pub user_id: String,
	pub name: String,
	pub date: DateTime<Utc>,
	pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
	pub user_id: String,
	pub name: String,
	pub date: DateTime<Utc>,
	pub location: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub date: Option<DateTime<Utc>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
}

/// Lifecycle state of an auction as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuctionStatus {
	Active,
	Cancelled,
	Ended,
}

impl fmt::Display for AuctionStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let status = match self {
			AuctionStatus::Active => "active",
			AuctionStatus::Cancelled => "cancelled",
			AuctionStatus::Ended => "ended",
		};
		write!(f, "{status}")
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Auction {
	pub id: String,
	pub event_id: String,
	pub start_at: DateTime<Utc>,
	pub end_at: DateTime<Utc>,
	pub suggested_price: f64,
	pub status: AuctionStatus,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub company_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuctionRequest {
	pub event_id: String,
	pub start_at: DateTime<Utc>,
	pub end_at: DateTime<Utc>,
	pub suggested_price: f64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub company_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
	pub id: String,
	pub event_id: String,
	pub description: String,
	pub quantity: u32,
	#[serde(default, rename = "specs_json")]
	pub specs_json: SpecMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequirementRequest {
	pub event_id: String,
	pub description: String,
	pub quantity: u32,
	#[serde(rename = "specs_json")]
	pub specs_json: SpecMap,
}

/// Requirement fields supplied by the caller; the event comes from the
/// request path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementDraft {
	pub description: String,
	pub quantity: u32,
	#[serde(default)]
	pub specs_json: SpecMap,
}

impl RequirementDraft {
	/// Binds the draft to the event it is created under.
	pub fn for_event(&self, event_id: &str) -> CreateRequirementRequest {
		CreateRequirementRequest {
			event_id: event_id.to_string(),
			description: self.description.clone(),
			quantity: self.quantity,
			specs_json: self.specs_json.clone(),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequirementRequest {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub quantity: Option<u32>,
	#[serde(rename = "specs_json", skip_serializing_if = "Option::is_none")]
	pub specs_json: Option<SpecMap>,
}

/// Product families a requirement can ask for.
///
/// The serialized codes are the values stored in a requirement's
/// `specs_json.productType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
	#[serde(rename = "camisetas")]
	TShirts,
	#[serde(rename = "gorras")]
	Caps,
	#[serde(rename = "posters")]
	Posters,
	#[serde(rename = "tazas")]
	Mugs,
	#[serde(rename = "otro")]
	Other,
}

impl ProductType {
	pub const ALL: [ProductType; 5] = [
		ProductType::TShirts,
		ProductType::Caps,
		ProductType::Posters,
		ProductType::Mugs,
		ProductType::Other,
	];

	/// Wire code of the product type.
	pub fn code(&self) -> &'static str {
		match self {
			ProductType::TShirts => "camisetas",
			ProductType::Caps => "gorras",
			ProductType::Posters => "posters",
			ProductType::Mugs => "tazas",
			ProductType::Other => "otro",
		}
	}

	/// Human-readable label used as the requirement description prefix.
	pub fn label(&self) -> &'static str {
		match self {
			ProductType::TShirts => "T-shirts",
			ProductType::Caps => "Caps",
			ProductType::Posters => "Posters",
			ProductType::Mugs => "Mugs",
			ProductType::Other => "Other product",
		}
	}
}

impl fmt::Display for ProductType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.code())
	}
}

impl FromStr for ProductType {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let normalized = s.trim().to_lowercase();
		ProductType::ALL
			.into_iter()
			.find(|p| p.code() == normalized || p.label().to_lowercase() == normalized)
			.ok_or_else(|| format!("Unknown product type: {s}"))
	}
}
