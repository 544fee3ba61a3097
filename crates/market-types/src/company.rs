//! Company and product catalogue types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
	pub id: String,
	pub user_id: String,
	pub name: String,
	pub contact_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
	pub user_id: String,
	pub name: String,
	pub contact_email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyRequest {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub contact_email: Option<String>,
}

/// Customisation options a company offers for a product.
///
/// Colors, sizes and materials are the well-known keys; anything else the
/// company publishes is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductOptions {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub colors: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sizes: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub materials: Option<Vec<String>>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
	pub id: String,
	pub company_id: String,
	pub name: String,
	pub base_price: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub options_json: Option<ProductOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
	pub company_id: String,
	pub name: String,
	pub base_price: f64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub options_json: Option<ProductOptions>,
}

/// Product fields supplied by the caller; the owning company comes from the
/// request path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
	pub name: String,
	pub base_price: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub options_json: Option<ProductOptions>,
}

impl ProductDraft {
	/// Binds the draft to the company it is created under.
	pub fn for_company(&self, company_id: &str) -> CreateProductRequest {
		CreateProductRequest {
			company_id: company_id.to_string(),
			name: self.name.clone(),
			base_price: self.base_price,
			options_json: self.options_json.clone(),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub base_price: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub options_json: Option<ProductOptions>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_product_options_keep_unknown_keys() {
		let product: Product = serde_json::from_value(serde_json::json!({
			"id": "prod-1",
			"companyId": "comp-1",
			"name": "Cotton T-shirt",
			"basePrice": 8.5,
			"optionsJson": {
				"colors": ["white", "black"],
				"printArea": "front"
			}
		}))
		.unwrap();

		let options = product.options_json.unwrap();
		assert_eq!(options.colors.unwrap(), vec!["white", "black"]);
		assert!(options.sizes.is_none());
		assert_eq!(options.extra["printArea"], "front");
	}

	#[test]
	fn test_draft_takes_company_from_path() {
		let draft = ProductDraft {
			name: "Mug".to_string(),
			base_price: 4.0,
			options_json: None,
		};

		let request = serde_json::to_value(draft.for_company("comp-9")).unwrap();
		assert_eq!(
			request,
			serde_json::json!({ "companyId": "comp-9", "name": "Mug", "basePrice": 4.0 })
		);
	}
}
