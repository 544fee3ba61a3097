//! The client's order overview.
//!
//! Each event the user owns is shown as one order. Its first requirement
//! supplies the quantity and event type, and its progress is derived from
//! how close the event date is.

use crate::error::Result;
use crate::Context;
use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use market_types::{Event, Requirement};
use std::fmt;
use std::sync::Arc;
use tracing::{instrument, warn};

/// Window before the event date in which an order counts as in progress.
pub const IN_PROGRESS_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderProgress {
	Pending,
	InProgress,
	Completed,
}

impl OrderProgress {
	pub const ALL: [OrderProgress; 3] = [
		OrderProgress::Pending,
		OrderProgress::InProgress,
		OrderProgress::Completed,
	];

	/// Progress of an event happening at `date`, seen from `now`.
	pub fn for_event_date(date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
		let remaining = date - now;
		if remaining <= Duration::zero() {
			OrderProgress::Completed
		} else if remaining <= Duration::days(IN_PROGRESS_WINDOW_DAYS) {
			OrderProgress::InProgress
		} else {
			OrderProgress::Pending
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			OrderProgress::Pending => "pending",
			OrderProgress::InProgress => "in_progress",
			OrderProgress::Completed => "completed",
		}
	}
}

impl fmt::Display for OrderProgress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One row of the overview.
#[derive(Debug, Clone)]
pub struct ClientOrder {
	pub event: Event,
	/// First requirement of the event, if it could be loaded.
	pub requirement: Option<Requirement>,
	pub progress: OrderProgress,
}

impl ClientOrder {
	/// `eventType` from the requirement specs, else the event name.
	pub fn event_type(&self) -> &str {
		self.requirement
			.as_ref()
			.and_then(|r| r.specs_json.get("eventType"))
			.and_then(|v| v.as_str())
			.unwrap_or(&self.event.name)
	}

	pub fn quantity(&self) -> u32 {
		self.requirement.as_ref().map_or(0, |r| r.quantity)
	}
}

#[derive(Debug, Clone, Default)]
pub struct ClientDashboard {
	pub orders: Vec<ClientOrder>,
}

impl ClientDashboard {
	pub fn count(&self, progress: OrderProgress) -> usize {
		self.orders.iter().filter(|o| o.progress == progress).count()
	}

	pub fn with_progress(&self, progress: OrderProgress) -> impl Iterator<Item = &ClientOrder> {
		self.orders.iter().filter(move |o| o.progress == progress)
	}
}

pub struct DashboardOps {
	ctx: Arc<Context>,
}

impl DashboardOps {
	pub fn new(ctx: Arc<Context>) -> Self {
		Self { ctx }
	}

	pub async fn load(&self) -> Result<ClientDashboard> {
		self.load_at(Utc::now()).await
	}

	/// Builds the overview as seen at `now`
	///
	/// Requirements are fetched for all events concurrently. A failed fetch
	/// is logged and the event is shown without a requirement.
	#[instrument(skip(self))]
	pub async fn load_at(&self, now: DateTime<Utc>) -> Result<ClientDashboard> {
		let user = self.ctx.require_user()?;

		let events: Vec<Event> = self
			.ctx
			.events
			.list_events()
			.await?
			.into_iter()
			.filter(|event| event.user_id == user.id)
			.collect();

		let requirements = join_all(events.iter().map(|event| async move {
			match self.ctx.events.list_requirements(&event.id).await {
				Ok(list) => list.into_iter().next(),
				Err(e) => {
					warn!(event_id = %event.id, error = %e, "Could not load requirements");
					None
				},
			}
		}))
		.await;

		let orders = events
			.into_iter()
			.zip(requirements)
			.map(|(event, requirement)| ClientOrder {
				progress: OrderProgress::for_event_date(event.date, now),
				event,
				requirement,
			})
			.collect();

		Ok(ClientDashboard { orders })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_support::logged_in_context;
	use chrono::TimeZone;
	use wiremock::matchers::{method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn now() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap()
	}

	#[test]
	fn test_progress_boundaries() {
		let now = now();
		assert_eq!(OrderProgress::for_event_date(now, now), OrderProgress::Completed);
		assert_eq!(
			OrderProgress::for_event_date(now - Duration::days(3), now),
			OrderProgress::Completed
		);
		assert_eq!(
			OrderProgress::for_event_date(now + Duration::seconds(1), now),
			OrderProgress::InProgress
		);
		assert_eq!(
			OrderProgress::for_event_date(now + Duration::days(7), now),
			OrderProgress::InProgress
		);
		assert_eq!(
			OrderProgress::for_event_date(now + Duration::days(7) + Duration::seconds(1), now),
			OrderProgress::Pending
		);
	}

	#[tokio::test]
	async fn test_dashboard_keeps_own_events_and_tolerates_failures() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/events"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
				{"id": "ev-1", "userId": "u-1", "name": "Gala", "date": "2026-10-05T20:00:00Z", "location": "Lima"},
				{"id": "ev-2", "userId": "u-2", "name": "Other", "date": "2026-12-01T00:00:00Z", "location": "Quito"},
				{"id": "ev-3", "userId": "u-1", "name": "Fair", "date": "2026-12-10T09:00:00Z", "location": "Cali"}
			])))
			.expect(1)
			.mount(&server)
			.await;
		Mock::given(method("GET"))
			.and(path("/events/ev-1/requirements"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
				{"id": "req-1", "eventId": "ev-1", "description": "Mugs: logo", "quantity": 40,
				 "specs_json": {"eventType": "wedding"}},
				{"id": "req-2", "eventId": "ev-1", "description": "Caps", "quantity": 5}
			])))
			.expect(1)
			.mount(&server)
			.await;
		Mock::given(method("GET"))
			.and(path("/events/ev-3/requirements"))
			.respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({"message": "boom"})))
			.expect(1)
			.mount(&server)
			.await;
		Mock::given(method("GET"))
			.and(path("/events/ev-2/requirements"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
			.expect(0)
			.mount(&server)
			.await;

		let ops = DashboardOps::new(logged_in_context(&server).await);
		let dashboard = ops.load_at(now()).await.unwrap();

		assert_eq!(dashboard.orders.len(), 2);
		let gala = &dashboard.orders[0];
		assert_eq!(gala.event.id, "ev-1");
		assert_eq!(gala.event_type(), "wedding");
		assert_eq!(gala.quantity(), 40);
		assert_eq!(gala.progress, OrderProgress::InProgress);

		let fair = &dashboard.orders[1];
		assert!(fair.requirement.is_none());
		assert_eq!(fair.event_type(), "Fair");
		assert_eq!(fair.quantity(), 0);
		assert_eq!(fair.progress, OrderProgress::Pending);

		assert_eq!(dashboard.count(OrderProgress::Pending), 1);
		assert_eq!(dashboard.with_progress(OrderProgress::Completed).count(), 0);
	}
}
