//! Events, their auctions and their product requirements.

use crate::api::{ApiClient, ApiRequest};
use crate::error::Result;
use market_types::{
	Auction, CreateAuctionRequest, CreateEventRequest, Event, MessageResponse, Requirement,
	RequirementDraft, UpdateEventRequest, UpdateRequirementRequest,
};

#[derive(Debug, Clone)]
pub struct EventsService {
	api: ApiClient,
}

impl EventsService {
	pub fn new(api: ApiClient) -> Self {
		Self { api }
	}

	pub async fn create_event(&self, request: &CreateEventRequest) -> Result<Event> {
		self.api.post(&["events"], request).await
	}

	pub async fn list_events(&self) -> Result<Vec<Event>> {
		self.api.get(&["events"]).await
	}

	pub async fn get_event(&self, id: &str) -> Result<Event> {
		self.api.get(&["events", id]).await
	}

	pub async fn update_event(&self, id: &str, request: &UpdateEventRequest) -> Result<Event> {
		self.api.put(&["events", id], request).await
	}

	pub async fn delete_event(&self, id: &str) -> Result<Option<MessageResponse>> {
		self.api.delete(&["events", id]).await
	}

	pub async fn create_auction(&self, request: &CreateAuctionRequest) -> Result<Auction> {
		self.api.post(&["events", "auctions"], request).await
	}

	pub async fn get_auction(&self, id: &str) -> Result<Auction> {
		self.api.get(&["events", "auctions", id]).await
	}

	pub async fn cancel_auction(&self, id: &str) -> Result<Auction> {
		self.api
			.execute(ApiRequest::put(&["events", "auctions", id, "cancel"]))
			.await
	}

	pub async fn end_auction(&self, id: &str) -> Result<Auction> {
		self.api
			.execute(ApiRequest::put(&["events", "auctions", id, "end"]))
			.await
	}

	/// `POST /events/{eventId}/requirements`; the body carries the same event id.
	pub async fn create_requirement(
		&self,
		event_id: &str,
		draft: &RequirementDraft,
	) -> Result<Requirement> {
		self.api
			.post(&["events", event_id, "requirements"], &draft.for_event(event_id))
			.await
	}

	pub async fn list_requirements(&self, event_id: &str) -> Result<Vec<Requirement>> {
		self.api.get(&["events", event_id, "requirements"]).await
	}

	pub async fn update_requirement(
		&self,
		id: &str,
		request: &UpdateRequirementRequest,
	) -> Result<Requirement> {
		self.api
			.put(&["events", "requirements", id], request)
			.await
	}

	pub async fn delete_requirement(&self, id: &str) -> Result<Option<MessageResponse>> {
		self.api.delete(&["events", "requirements", id]).await
	}
}
