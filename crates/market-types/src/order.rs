//! Offer and order types.
//!
//! Companies bid on an auction with offers; accepting an offer turns it into
//! an order owned by the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::event::SpecMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
	Pending,
	Accepted,
	Rejected,
}

impl fmt::Display for OfferStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let status = match self {
			OfferStatus::Pending => "pending",
			OfferStatus::Accepted => "accepted",
			OfferStatus::Rejected => "rejected",
		};
		write!(f, "{status}")
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
	pub id: String,
	pub auction_id: String,
	pub company_id: String,
	pub price: f64,
	pub lead_time_days: u32,
	pub status: OfferStatus,
	pub created_at: DateTime<Utc>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub specs_json: Option<SpecMap>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOfferRequest {
	pub auction_id: String,
	pub company_id: String,
	pub price: f64,
	pub lead_time_days: u32,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub specs_json: Option<SpecMap>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOfferRequest {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub price: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub lead_time_days: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub specs_json: Option<SpecMap>,
}

/// Body of `POST /offers/accept`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptOfferRequest {
	pub offer_id: String,
	pub client_id: String,
}

/// Body of `POST /offers/{id}/reject`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RejectOfferRequest {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub reason: Option<String>,
}

/// Order status is an open set owned by the backend, so it stays a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
	pub id: String,
	pub client_id: String,
	pub offer_id: String,
	pub status: String,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
	pub client_id: String,
	pub offer_id: String,
}

/// Body of `PUT /orders/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
	pub status: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_offer_decodes_backend_shape() {
		let offer: Offer = serde_json::from_value(serde_json::json!({
			"id": "off-1",
			"auction_id": "auc-1",
			"company_id": "comp-1",
			"price": 980.5,
			"lead_time_days": 12,
			"status": "pending",
			"created_at": "2026-02-11T09:30:00Z"
		}))
		.unwrap();

		assert_eq!(offer.status, OfferStatus::Pending);
		assert_eq!(offer.lead_time_days, 12);
		assert!(offer.specs_json.is_none());
	}

	#[test]
	fn test_accept_offer_uses_camel_case() {
		let body = AcceptOfferRequest {
			offer_id: "off-1".to_string(),
			client_id: "user-7".to_string(),
		};
		assert_eq!(
			serde_json::to_value(body).unwrap(),
			serde_json::json!({ "offerId": "off-1", "clientId": "user-7" })
		);
	}

	#[test]
	fn test_reject_without_reason_sends_empty_object() {
		let body = RejectOfferRequest::default();
		assert_eq!(serde_json::to_value(body).unwrap(), serde_json::json!({}));
	}
}
