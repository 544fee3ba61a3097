//! Authentication, user and role types.
//!
//! The backend issues an access/refresh token pair on login and on refresh.
//! The profile part of the login response is what the client caches as the
//! current user.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Credentials submitted to `POST /auth/login`.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
	pub email: String,
	pub password: String,
}

impl LoginRequest {
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self {
			email: email.into(),
			password: password.into(),
		}
	}
}

impl fmt::Debug for LoginRequest {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LoginRequest")
			.field("email", &self.email)
			.field("password", &"[REDACTED]")
			.finish()
	}
}

/// Response of a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
	pub access_token: String,
	pub refresh_token: String,
	pub user_id: String,
	pub email: String,
	pub name: String,
	pub role_id: String,
}

impl AuthResponse {
	/// Token pair carried by this response.
	pub fn tokens(&self) -> TokenPair {
		TokenPair {
			access_token: self.access_token.clone(),
			refresh_token: self.refresh_token.clone(),
		}
	}

	/// Profile of the user that logged in.
	pub fn user(&self) -> User {
		User {
			id: self.user_id.clone(),
			email: self.email.clone(),
			name: self.name.clone(),
			role_id: self.role_id.clone(),
		}
	}
}

/// Body of `POST /auth/refresh-token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
	pub refresh_token: String,
}

/// Access/refresh token pair.
///
/// Refresh responses may carry the full login payload; unknown fields are
/// ignored so either shape decodes.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
	pub access_token: String,
	pub refresh_token: String,
}

impl fmt::Debug for TokenPair {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TokenPair")
			.field("access_token", &"[REDACTED]")
			.field("refresh_token", &"[REDACTED]")
			.finish()
	}
}

/// User profile.
///
/// Older sessions cached the profile with a `userId` key instead of `id`;
/// both are accepted when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	#[serde(alias = "userId")]
	pub id: String,
	pub email: String,
	pub name: String,
	pub role_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
	pub email: String,
	pub name: String,
	pub password: String,
	pub role_id: String,
}

/// Partial update of a user. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub password: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub role_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoleRequest {
	pub name: String,
	pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRoleRequest {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub permissions: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
	pub id: String,
	pub name: String,
	pub permissions: Vec<String>,
}
