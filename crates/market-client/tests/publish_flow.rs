//! The order request flow against a mock backend.

use chrono::{TimeZone, Utc};
use market_client::operations::{OrderRequestForm, PublishOps};
use market_client::{ClientConfig, Context};
use market_storage::MemoryStorage;
use market_types::{TokenPair, User};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn context(server: &MockServer) -> Arc<Context> {
	let config: ClientConfig = format!("[api]\nbase_url = \"{}\"\n[storage]\nbackend = \"memory\"", server.uri())
		.parse()
		.unwrap();
	let ctx = Context::with_storage(config, Arc::new(MemoryStorage::new()))
		.await
		.unwrap();
	ctx.session
		.save(
			&TokenPair {
				access_token: "a-1".to_string(),
				refresh_token: "r-1".to_string(),
			},
			&User {
				id: "u-1".to_string(),
				email: "ana@example.org".to_string(),
				name: "Ana".to_string(),
				role_id: "client".to_string(),
			},
		)
		.await
		.unwrap();
	Arc::new(ctx)
}

#[tokio::test]
async fn publish_creates_event_requirement_and_auction_in_order() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/events"))
		.respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
			"id": "ev-42",
			"userId": "u-1",
			"name": "DevConf",
			"date": "2026-11-20T18:00:00Z",
			"location": "Bogotá"
		})))
		.expect(1)
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path("/events/ev-42/requirements"))
		.respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
			"id": "req-1",
			"eventId": "ev-42",
			"description": "Staff shirts",
			"quantity": 50,
			"specs_json": {"eventType": "conference", "productType": "Camisetas"}
		})))
		.expect(1)
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path("/events/auctions"))
		.respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
			"id": "auc-7",
			"event_id": "ev-42",
			"start_at": "2026-10-01T12:00:00Z",
			"end_at": "2026-11-20T18:00:00Z",
			"suggested_price": 900.0,
			"status": "active"
		})))
		.expect(1)
		.mount(&server)
		.await;

	let form = OrderRequestForm {
		event_type: "conference".to_string(),
		event_name: "DevConf".to_string(),
		event_date: "2026-11-20T18:00".to_string(),
		event_location: "Bogotá".to_string(),
		description: "Staff shirts".to_string(),
		quantity: 50,
		product_type: "Camisetas".to_string(),
		budget: 900.0,
		..Default::default()
	};
	let now = Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap();

	let published = PublishOps::new(context(&server).await)
		.publish_at(&form, now)
		.await
		.unwrap();
	assert_eq!(published.event.id, "ev-42");
	assert_eq!(published.requirement.id, "req-1");
	assert_eq!(published.auction.id, "auc-7");

	let requests = server.received_requests().await.unwrap();
	let paths: Vec<_> = requests.iter().map(|r| r.url.path().to_string()).collect();
	assert_eq!(
		paths,
		vec!["/events", "/events/ev-42/requirements", "/events/auctions"]
	);

	let event: serde_json::Value = requests[0].body_json().unwrap();
	assert_eq!(event["userId"], "u-1");
	assert_eq!(event["date"], "2026-11-20T18:00:00Z");

	let requirement: serde_json::Value = requests[1].body_json().unwrap();
	assert_eq!(requirement["eventId"], "ev-42");
	assert_eq!(requirement["quantity"], 50);
	assert_eq!(requirement["specs_json"]["eventType"], "conference");

	let auction: serde_json::Value = requests[2].body_json().unwrap();
	assert_eq!(auction["event_id"], "ev-42");
	assert_eq!(auction["start_at"], "2026-10-01T12:00:00Z");
	assert_eq!(auction["end_at"], "2026-11-20T18:00:00Z");
	assert_eq!(auction["suggested_price"], 900.0);
}

#[tokio::test]
async fn failed_event_creation_stops_the_flow() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/events"))
		.respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
			"statusCode": 400,
			"message": ["date must be a valid ISO 8601 date string"]
		})))
		.expect(1)
		.mount(&server)
		.await;

	let form = OrderRequestForm {
		event_type: "wedding".to_string(),
		event_name: "Ana & Luis".to_string(),
		event_date: "2026-11-20".to_string(),
		event_location: "Medellín".to_string(),
		description: "Favour mugs".to_string(),
		quantity: 5,
		product_type: "Tazas".to_string(),
		budget: 100.0,
		..Default::default()
	};
	let now = Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap();

	let err = PublishOps::new(context(&server).await)
		.publish_at(&form, now)
		.await
		.unwrap_err();
	assert_eq!(err.user_message(), "date must be a valid ISO 8601 date string");
	assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
