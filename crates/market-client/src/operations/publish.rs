//! Publishing a new order request
//!
//! An order request is three backend resources created in sequence: the
//! event, one requirement describing the merchandise, and the auction in
//! which companies bid for it. The requirement and the auction both point
//! at the id the backend assigned to the event.

use crate::error::Result;
use crate::Context;
use chrono::{DateTime, Utc};
use market_types::validation::{
	not_in_past, parse_event_date, positive_amount, positive_quantity, require_text,
};
use market_types::{
	Auction, CreateAuctionRequest, CreateEventRequest, Event, Requirement, RequirementDraft, SpecMap,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Input of the "new order" form.
#[derive(Debug, Clone, Default)]
pub struct OrderRequestForm {
	pub event_type: String,
	pub event_name: String,
	/// Date as typed by the user; see [`parse_event_date`] for accepted forms.
	pub event_date: String,
	pub event_location: String,
	pub description: String,
	pub quantity: i64,
	pub product_type: String,
	pub size: Option<String>,
	pub colors: Option<String>,
	pub material: Option<String>,
	pub additional_info: Option<String>,
	/// Suggested price for the auction.
	pub budget: f64,
}

impl OrderRequestForm {
	/// Specs stored with the requirement. Blank optional fields are left out.
	pub fn specs(&self) -> SpecMap {
		let mut specs = SpecMap::new();
		specs.insert("eventType".to_string(), self.event_type.clone().into());
		specs.insert("productType".to_string(), self.product_type.clone().into());

		let optional = [
			("size", &self.size),
			("colors", &self.colors),
			("material", &self.material),
			("additionalInfo", &self.additional_info),
		];
		for (key, value) in optional {
			if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
				specs.insert(key.to_string(), value.into());
			}
		}
		specs
	}
}

/// The resources created for one order request.
#[derive(Debug, Clone)]
pub struct PublishedOrder {
	pub event: Event,
	pub requirement: Requirement,
	pub auction: Auction,
}

pub struct PublishOps {
	ctx: Arc<Context>,
}

impl PublishOps {
	pub fn new(ctx: Arc<Context>) -> Self {
		Self { ctx }
	}

	/// Publishes an order request, with the auction opening now
	///
	/// # Errors
	/// Returns `Error::NotAuthenticated` without a logged-in user and
	/// `Error::Validation` for a blank required field, a past or unreadable
	/// date, or a non-positive quantity or budget. Both are raised before any
	/// request is sent.
	pub async fn publish(&self, form: &OrderRequestForm) -> Result<PublishedOrder> {
		self.publish_at(form, Utc::now()).await
	}

	/// Same as [`publish`](Self::publish) with an explicit auction start.
	#[instrument(skip(self, form), fields(event = %form.event_name))]
	pub async fn publish_at(
		&self,
		form: &OrderRequestForm,
		now: DateTime<Utc>,
	) -> Result<PublishedOrder> {
		let user = self.ctx.require_user()?;
		require_text("event_type", &form.event_type)?;
		let name = require_text("event_name", &form.event_name)?;
		let date = parse_event_date("event_date", &form.event_date)?;
		let date = not_in_past("event_date", date, now)?;
		let location = require_text("event_location", &form.event_location)?;
		let description = require_text("description", &form.description)?;
		let quantity = positive_quantity("quantity", form.quantity)?;
		let budget = positive_amount("budget", form.budget)?;

		let event = self
			.ctx
			.events
			.create_event(&CreateEventRequest {
				user_id: user.id,
				name,
				date,
				location,
			})
			.await?;
		info!(event_id = %event.id, "Event created");

		let draft = RequirementDraft {
			description,
			quantity,
			specs_json: form.specs(),
		};
		let requirement = self.ctx.events.create_requirement(&event.id, &draft).await?;

		let auction = self
			.ctx
			.events
			.create_auction(&CreateAuctionRequest {
				event_id: event.id.clone(),
				start_at: now,
				end_at: date,
				suggested_price: budget,
				company_id: None,
			})
			.await?;
		info!(event_id = %event.id, auction_id = %auction.id, "Order request published");

		Ok(PublishedOrder {
			event,
			requirement,
			auction,
		})
	}
}
