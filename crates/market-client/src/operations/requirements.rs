//! Adding product requirements to an existing event.

use crate::error::Result;
use crate::Context;
use futures::future::try_join_all;
use market_types::validation::{positive_quantity, require_text};
use market_types::{ProductType, Requirement, RequirementDraft, SpecMap, ValidationError};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// One requirement as entered by the user.
#[derive(Debug, Clone)]
pub struct RequirementForm {
	pub product_type: ProductType,
	pub description: String,
	pub quantity: i64,
	/// Free-form specs such as `color`, `size` or `material`.
	pub specs: BTreeMap<String, String>,
	/// Reference images, base64 encoded.
	pub images: Vec<String>,
}

impl RequirementForm {
	pub fn new(product_type: ProductType, description: impl Into<String>, quantity: i64) -> Self {
		Self {
			product_type,
			description: description.into(),
			quantity,
			specs: BTreeMap::new(),
			images: Vec::new(),
		}
	}

	pub fn with_spec(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.specs.insert(key.into(), value.into());
		self
	}

	/// Validates the form and builds the draft sent to the backend.
	///
	/// The description is prefixed with the product label. Specs carry the
	/// product code, then the user's specs, then the images.
	pub fn to_draft(&self, index: usize) -> std::result::Result<RequirementDraft, ValidationError> {
		let description = require_text(&format!("requirements[{index}].description"), &self.description)?;
		let quantity = positive_quantity(&format!("requirements[{index}].quantity"), self.quantity)?;

		let mut specs = SpecMap::new();
		specs.insert("productType".to_string(), self.product_type.code().into());
		for (key, value) in &self.specs {
			specs.insert(key.clone(), value.as_str().into());
		}
		specs.insert("images".to_string(), self.images.clone().into());

		Ok(RequirementDraft {
			description: format!("{}: {description}", self.product_type.label()),
			quantity,
			specs_json: specs,
		})
	}
}

pub struct RequirementOps {
	ctx: Arc<Context>,
}

impl RequirementOps {
	pub fn new(ctx: Arc<Context>) -> Self {
		Self { ctx }
	}

	/// Creates every requirement for `event_id` concurrently
	///
	/// All forms are validated first; a single invalid form means nothing is
	/// sent. Results come back in form order. The first failing request fails
	/// the whole call, although requests already accepted by the backend stay.
	#[instrument(skip(self, forms), fields(count = forms.len()))]
	pub async fn add(&self, event_id: &str, forms: &[RequirementForm]) -> Result<Vec<Requirement>> {
		if forms.is_empty() {
			return Err(ValidationError::MissingField("requirements".to_string()).into());
		}

		let drafts = forms
			.iter()
			.enumerate()
			.map(|(index, form)| form.to_draft(index))
			.collect::<std::result::Result<Vec<_>, _>>()?;

		let created = try_join_all(
			drafts
				.iter()
				.map(|draft| self.ctx.events.create_requirement(event_id, draft)),
		)
		.await?;

		info!(event_id, count = created.len(), "Requirements created");
		Ok(created)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::Error;
	use crate::test_support::logged_in_context;
	use wiremock::matchers::{body_partial_json, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn requirement_json(id: &str, description: &str) -> serde_json::Value {
		serde_json::json!({
			"id": id,
			"eventId": "ev-1",
			"description": description,
			"quantity": 10
		})
	}

	#[test]
	fn test_draft_shape() {
		let mut form = RequirementForm::new(ProductType::Caps, " embroidered logo ", 30)
			.with_spec("color", "navy");
		form.images.push("aGVsbG8=".to_string());

		let draft = form.to_draft(0).unwrap();
		assert_eq!(draft.description, "Caps: embroidered logo");
		assert_eq!(draft.quantity, 30);
		assert_eq!(draft.specs_json["productType"], "gorras");
		assert_eq!(draft.specs_json["color"], "navy");
		assert_eq!(draft.specs_json["images"], serde_json::json!(["aGVsbG8="]));
	}

	#[test]
	fn test_invalid_form_names_its_position() {
		let form = RequirementForm::new(ProductType::Mugs, "", 5);
		let err = form.to_draft(2).unwrap_err();
		assert_eq!(err.field(), "requirements[2].description");

		let form = RequirementForm::new(ProductType::Mugs, "white", -3);
		assert_eq!(form.to_draft(0).unwrap_err().field(), "requirements[0].quantity");
	}

	#[tokio::test]
	async fn test_add_creates_all_concurrently() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/events/ev-1/requirements"))
			.and(body_partial_json(serde_json::json!({"description": "T-shirts: staff"})))
			.respond_with(ResponseTemplate::new(201).set_body_json(requirement_json("req-1", "T-shirts: staff")))
			.expect(1)
			.mount(&server)
			.await;
		Mock::given(method("POST"))
			.and(path("/events/ev-1/requirements"))
			.and(body_partial_json(serde_json::json!({"description": "Posters: venue"})))
			.respond_with(ResponseTemplate::new(201).set_body_json(requirement_json("req-2", "Posters: venue")))
			.expect(1)
			.mount(&server)
			.await;

		let ops = RequirementOps::new(logged_in_context(&server).await);
		let created = ops
			.add(
				"ev-1",
				&[
					RequirementForm::new(ProductType::TShirts, "staff", 10),
					RequirementForm::new(ProductType::Posters, "venue", 10),
				],
			)
			.await
			.unwrap();

		let ids: Vec<_> = created.iter().map(|r| r.id.as_str()).collect();
		assert_eq!(ids, vec!["req-1", "req-2"]);
	}

	#[tokio::test]
	async fn test_one_invalid_form_blocks_all() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(201))
			.expect(0)
			.mount(&server)
			.await;

		let ops = RequirementOps::new(logged_in_context(&server).await);
		let err = ops
			.add(
				"ev-1",
				&[
					RequirementForm::new(ProductType::TShirts, "staff", 10),
					RequirementForm::new(ProductType::Other, "lanyards", 0),
				],
			)
			.await
			.unwrap_err();
		assert!(matches!(err, Error::Validation(_)));

		let err = ops.add("ev-1", &[]).await.unwrap_err();
		assert!(matches!(err, Error::Validation(ValidationError::MissingField(_))));
	}
}
