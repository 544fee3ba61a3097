//! Orders and the offers companies submit to auctions.

use crate::api::{ApiClient, ApiRequest};
use crate::error::Result;
use market_types::{
	AcceptOfferRequest, CreateOfferRequest, CreateOrderRequest, MessageResponse, Offer, Order,
	RejectOfferRequest, UpdateOfferRequest, UpdateOrderStatusRequest,
};

#[derive(Debug, Clone)]
pub struct OrdersService {
	api: ApiClient,
}

impl OrdersService {
	pub fn new(api: ApiClient) -> Self {
		Self { api }
	}

	pub async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order> {
		self.api.post(&["orders"], request).await
	}

	pub async fn get_order(&self, id: &str) -> Result<Order> {
		self.api.get(&["orders", id]).await
	}

	pub async fn list_client_orders(&self, client_id: &str) -> Result<Vec<Order>> {
		self.api.get(&["clients", client_id, "orders"]).await
	}

	pub async fn update_order_status(&self, id: &str, status: &str) -> Result<Order> {
		let body = UpdateOrderStatusRequest {
			status: status.to_string(),
		};
		self.api.put(&["orders", id, "status"], &body).await
	}

	pub async fn cancel_order(&self, id: &str) -> Result<Order> {
		self.api
			.execute(ApiRequest::put(&["orders", id, "cancel"]))
			.await
	}

	pub async fn delete_order(&self, id: &str) -> Result<Option<MessageResponse>> {
		self.api.delete(&["orders", id]).await
	}

	pub async fn create_offer(&self, request: &CreateOfferRequest) -> Result<Offer> {
		self.api.post(&["offers"], request).await
	}

	pub async fn get_offer(&self, id: &str) -> Result<Offer> {
		self.api.get(&["offers", id]).await
	}

	pub async fn list_auction_offers(&self, auction_id: &str) -> Result<Vec<Offer>> {
		self.api.get(&["auctions", auction_id, "offers"]).await
	}

	pub async fn list_company_offers(&self, company_id: &str) -> Result<Vec<Offer>> {
		self.api.get(&["companies", company_id, "offers"]).await
	}

	pub async fn update_offer(&self, id: &str, request: &UpdateOfferRequest) -> Result<Offer> {
		self.api.put(&["offers", id], request).await
	}

	pub async fn delete_offer(&self, id: &str) -> Result<Option<MessageResponse>> {
		self.api.delete(&["offers", id]).await
	}

	/// Accepts an offer, which the backend turns into an order.
	pub async fn accept_offer(&self, request: &AcceptOfferRequest) -> Result<Order> {
		self.api.post(&["offers", "accept"], request).await
	}

	pub async fn reject_offer(&self, id: &str, reason: Option<&str>) -> Result<Option<MessageResponse>> {
		let body = RejectOfferRequest {
			reason: reason.map(str::to_string),
		};
		self.api.post(&["offers", id, "reject"], &body).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_support::client_for;
	use wiremock::matchers::{body_json, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn order_json(status: &str) -> serde_json::Value {
		serde_json::json!({
			"id": "ord-1",
			"client_id": "u-1",
			"offer_id": "off-1",
			"status": status,
			"created_at": "2026-02-12T08:00:00Z"
		})
	}

	#[tokio::test]
	async fn test_accept_offer_returns_order() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/offers/accept"))
			.and(body_json(serde_json::json!({"offerId": "off-1", "clientId": "u-1"})))
			.respond_with(ResponseTemplate::new(201).set_body_json(order_json("pending")))
			.expect(1)
			.mount(&server)
			.await;

		let orders = OrdersService::new(client_for(&server).await);
		let order = orders
			.accept_offer(&AcceptOfferRequest {
				offer_id: "off-1".to_string(),
				client_id: "u-1".to_string(),
			})
			.await
			.unwrap();
		assert_eq!(order.offer_id, "off-1");
	}

	#[tokio::test]
	async fn test_status_and_cancel() {
		let server = MockServer::start().await;
		Mock::given(method("PUT"))
			.and(path("/orders/ord-1/status"))
			.and(body_json(serde_json::json!({"status": "shipped"})))
			.respond_with(ResponseTemplate::new(200).set_body_json(order_json("shipped")))
			.expect(1)
			.mount(&server)
			.await;
		Mock::given(method("PUT"))
			.and(path("/orders/ord-1/cancel"))
			.respond_with(ResponseTemplate::new(200).set_body_json(order_json("cancelled")))
			.expect(1)
			.mount(&server)
			.await;

		let orders = OrdersService::new(client_for(&server).await);
		assert_eq!(
			orders.update_order_status("ord-1", "shipped").await.unwrap().status,
			"shipped"
		);
		assert_eq!(orders.cancel_order("ord-1").await.unwrap().status, "cancelled");
	}

	#[tokio::test]
	async fn test_reject_offer_sends_reason() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/offers/off-2/reject"))
			.and(body_json(serde_json::json!({"reason": "Lead time too long"})))
			.respond_with(
				ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "Offer rejected"})),
			)
			.expect(1)
			.mount(&server)
			.await;
		Mock::given(method("POST"))
			.and(path("/offers/off-3/reject"))
			.and(body_json(serde_json::json!({})))
			.respond_with(ResponseTemplate::new(204))
			.expect(1)
			.mount(&server)
			.await;

		let orders = OrdersService::new(client_for(&server).await);
		let rejected = orders
			.reject_offer("off-2", Some("Lead time too long"))
			.await
			.unwrap();
		assert_eq!(rejected.map(|m| m.message).as_deref(), Some("Offer rejected"));
		assert!(orders.reject_offer("off-3", None).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_client_and_company_listings() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/clients/u-1/orders"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([order_json("pending")])))
			.expect(1)
			.mount(&server)
			.await;
		Mock::given(method("GET"))
			.and(path("/companies/comp-1/offers"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
			.expect(1)
			.mount(&server)
			.await;

		let orders = OrdersService::new(client_for(&server).await);
		assert_eq!(orders.list_client_orders("u-1").await.unwrap().len(), 1);
		assert!(orders.list_company_offers("comp-1").await.unwrap().is_empty());
	}
}
