//! Authentication, users and roles.

use crate::api::ApiClient;
use crate::error::Result;
use market_types::{
	CreateRoleRequest, CreateUserRequest, LoginRequest, MessageResponse, Role, TokenPair,
	UpdateRoleRequest, UpdateUserRequest, User,
};
use serde::de::IgnoredAny;

#[derive(Debug, Clone)]
pub struct AuthService {
	api: ApiClient,
}

impl AuthService {
	pub fn new(api: ApiClient) -> Self {
		Self { api }
	}

	/// `POST /auth/login`, storing the session on success.
	pub async fn login(&self, credentials: &LoginRequest) -> Result<User> {
		self.api.login(credentials).await
	}

	/// `POST /auth/refresh-token` with the stored refresh token.
	pub async fn refresh_token(&self) -> Result<TokenPair> {
		self.api.refresh().await
	}

	pub async fn logout(&self) -> Result<()> {
		self.api.logout().await
	}

	/// The cached profile of the logged-in user, if the session is active.
	pub fn current_user(&self) -> Option<User> {
		self.api.session().active_user()
	}

	pub fn is_authenticated(&self) -> bool {
		self.api.session().is_active()
	}

	pub async fn create_user(&self, request: &CreateUserRequest) -> Result<User> {
		self.api.post(&["auth", "users"], request).await
	}

	pub async fn get_user(&self, id: &str) -> Result<User> {
		self.api.get(&["auth", "users", id]).await
	}

	pub async fn list_users(&self) -> Result<Vec<User>> {
		self.api.get(&["auth", "users"]).await
	}

	pub async fn update_user(&self, id: &str, request: &UpdateUserRequest) -> Result<User> {
		self.api.put(&["auth", "users", id, "update"], request).await
	}

	pub async fn delete_user(&self, id: &str) -> Result<Option<MessageResponse>> {
		self.api.delete(&["auth", "users", id, "delete"]).await
	}

	pub async fn user_exists_by_email(&self, email: &str) -> Result<bool> {
		self.api
			.get(&["auth", "users", "exists", "email", email])
			.await
	}

	pub async fn user_exists_by_id(&self, id: &str) -> Result<bool> {
		self.api.get(&["auth", "users", "exists", "id", id]).await
	}

	pub async fn create_role(&self, request: &CreateRoleRequest) -> Result<Role> {
		self.api.post(&["auth", "roles"], request).await
	}

	pub async fn list_roles(&self) -> Result<Vec<Role>> {
		self.api.get(&["auth", "roles"]).await
	}

	pub async fn get_role(&self, id: &str) -> Result<Role> {
		self.api.get(&["auth", "roles", id]).await
	}

	pub async fn update_role(&self, id: &str, request: &UpdateRoleRequest) -> Result<Role> {
		self.api.put(&["auth", "roles", id], request).await
	}

	pub async fn delete_role(&self, id: &str) -> Result<()> {
		let _: IgnoredAny = self.api.delete(&["auth", "roles", id]).await?;
		Ok(())
	}

	pub async fn role_exists_by_name(&self, name: &str) -> Result<bool> {
		self.api
			.get(&["auth", "roles", "exists", "name", name])
			.await
	}

	pub async fn role_exists_by_id(&self, id: &str) -> Result<bool> {
		self.api.get(&["auth", "roles", "exists", "id", id]).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_support::client_for;
	use wiremock::matchers::{body_json, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	#[tokio::test]
	async fn test_update_and_delete_user_paths() {
		let server = MockServer::start().await;
		Mock::given(method("PUT"))
			.and(path("/auth/users/u-1/update"))
			.and(body_json(serde_json::json!({"name": "Ana María"})))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"id": "u-1",
				"email": "ana@example.org",
				"name": "Ana María",
				"roleId": "client"
			})))
			.expect(1)
			.mount(&server)
			.await;
		Mock::given(method("DELETE"))
			.and(path("/auth/users/u-1/delete"))
			.respond_with(
				ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "User deleted"})),
			)
			.expect(1)
			.mount(&server)
			.await;

		let auth = AuthService::new(client_for(&server).await);
		let updated = auth
			.update_user(
				"u-1",
				&UpdateUserRequest {
					name: Some("Ana María".to_string()),
					..Default::default()
				},
			)
			.await
			.unwrap();
		assert_eq!(updated.name, "Ana María");

		let deleted = auth.delete_user("u-1").await.unwrap();
		assert_eq!(deleted.map(|m| m.message).as_deref(), Some("User deleted"));
	}

	#[tokio::test]
	async fn test_exists_checks() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/auth/users/exists/email/ana@example.org"))
			.respond_with(ResponseTemplate::new(200).set_body_json(true))
			.mount(&server)
			.await;
		Mock::given(method("GET"))
			.and(path("/auth/roles/exists/name/admin"))
			.respond_with(ResponseTemplate::new(200).set_body_json(false))
			.mount(&server)
			.await;

		let auth = AuthService::new(client_for(&server).await);
		assert!(auth.user_exists_by_email("ana@example.org").await.unwrap());
		assert!(!auth.role_exists_by_name("admin").await.unwrap());
	}

	#[tokio::test]
	async fn test_delete_role_accepts_empty_body() {
		let server = MockServer::start().await;
		Mock::given(method("DELETE"))
			.and(path("/auth/roles/r-1"))
			.respond_with(ResponseTemplate::new(204))
			.expect(1)
			.mount(&server)
			.await;

		let auth = AuthService::new(client_for(&server).await);
		auth.delete_role("r-1").await.unwrap();
	}

	#[tokio::test]
	async fn test_logged_out_by_default() {
		let server = MockServer::start().await;
		let auth = AuthService::new(client_for(&server).await);

		assert!(!auth.is_authenticated());
		assert!(auth.current_user().is_none());
	}
}
