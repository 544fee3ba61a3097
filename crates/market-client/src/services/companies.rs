//! Companies and their product catalogues.

use crate::api::ApiClient;
use crate::error::Result;
use market_types::{
	Company, CreateCompanyRequest, MessageResponse, Product, ProductDraft, UpdateCompanyRequest,
	UpdateProductRequest,
};

#[derive(Debug, Clone)]
pub struct CompaniesService {
	api: ApiClient,
}

impl CompaniesService {
	pub fn new(api: ApiClient) -> Self {
		Self { api }
	}

	pub async fn create_company(&self, request: &CreateCompanyRequest) -> Result<Company> {
		self.api.post(&["companies"], request).await
	}

	pub async fn list_companies(&self) -> Result<Vec<Company>> {
		self.api.get(&["companies"]).await
	}

	pub async fn get_company(&self, id: &str) -> Result<Company> {
		self.api.get(&["companies", id]).await
	}

	pub async fn update_company(&self, id: &str, request: &UpdateCompanyRequest) -> Result<Company> {
		self.api.put(&["companies", id], request).await
	}

	pub async fn delete_company(&self, id: &str) -> Result<Option<MessageResponse>> {
		self.api.delete(&["companies", id]).await
	}

	/// `POST /companies/{companyId}/products`; the body carries the same company id.
	pub async fn create_product(&self, company_id: &str, draft: &ProductDraft) -> Result<Product> {
		self.api
			.post(
				&["companies", company_id, "products"],
				&draft.for_company(company_id),
			)
			.await
	}

	pub async fn list_products(&self, company_id: &str) -> Result<Vec<Product>> {
		self.api.get(&["companies", company_id, "products"]).await
	}

	pub async fn get_product(&self, id: &str) -> Result<Product> {
		self.api.get(&["companies", "products", id]).await
	}

	pub async fn update_product(&self, id: &str, request: &UpdateProductRequest) -> Result<Product> {
		self.api.put(&["companies", "products", id], request).await
	}

	pub async fn delete_product(&self, id: &str) -> Result<Option<MessageResponse>> {
		self.api.delete(&["companies", "products", id]).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_support::client_for;
	use market_types::ProductOptions;
	use wiremock::matchers::{body_json, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	#[tokio::test]
	async fn test_create_product_under_company() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/companies/comp-1/products"))
			.and(body_json(serde_json::json!({
				"companyId": "comp-1",
				"name": "Classic tee",
				"basePrice": 7.5,
				"optionsJson": {"colors": ["white", "black"]}
			})))
			.respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
				"id": "prod-1",
				"companyId": "comp-1",
				"name": "Classic tee",
				"basePrice": 7.5,
				"optionsJson": {"colors": ["white", "black"]}
			})))
			.expect(1)
			.mount(&server)
			.await;

		let companies = CompaniesService::new(client_for(&server).await);
		let draft = ProductDraft {
			name: "Classic tee".to_string(),
			base_price: 7.5,
			options_json: Some(ProductOptions {
				colors: Some(vec!["white".to_string(), "black".to_string()]),
				..Default::default()
			}),
		};

		let product = companies.create_product("comp-1", &draft).await.unwrap();
		assert_eq!(product.id, "prod-1");
		assert_eq!(product.company_id, "comp-1");
	}

	#[tokio::test]
	async fn test_product_lookups_use_flat_path() {
		let server = MockServer::start().await;
		Mock::given(method("DELETE"))
			.and(path("/companies/products/prod-1"))
			.respond_with(
				ResponseTemplate::new(200)
					.set_body_json(serde_json::json!({"message": "Product deleted"})),
			)
			.expect(1)
			.mount(&server)
			.await;
		Mock::given(method("GET"))
			.and(path("/companies/comp-1/products"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
			.expect(1)
			.mount(&server)
			.await;

		let companies = CompaniesService::new(client_for(&server).await);
		assert!(companies.list_products("comp-1").await.unwrap().is_empty());
		assert!(companies.delete_product("prod-1").await.unwrap().is_some());
	}
}
