//! HTTP request pipeline for the marketplace backend
//!
//! Every call goes through [`ApiClient::execute`]. It attaches the bearer
//! token from the session, decodes the response and recovers from an
//! expired access token: a 401 triggers one token refresh followed by one
//! retry of the original request. If the refresh cannot be performed the
//! session is cleared and the caller gets an authorization error.
//!
//! Refreshes are serialised across every clone of a client. A request that
//! was rejected with a token another request has since replaced retries with
//! the new token instead of spending the refresh token again.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::session::SessionStore;
use market_types::{ApiErrorBody, AuthResponse, LoginRequest, RefreshTokenRequest, TokenPair, User};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Description of a single backend call.
///
/// Paths are given as segments and percent-encoded when the URL is built,
/// so identifiers never need escaping by the caller.
#[derive(Debug, Clone)]
pub struct ApiRequest {
	method: Method,
	segments: Vec<String>,
	body: Option<serde_json::Value>,
	headers: HeaderMap,
	anonymous: bool,
}

impl ApiRequest {
	pub fn new(method: Method, segments: &[&str]) -> Self {
		Self {
			method,
			segments: segments.iter().map(|s| s.to_string()).collect(),
			body: None,
			headers: HeaderMap::new(),
			anonymous: false,
		}
	}

	pub fn get(segments: &[&str]) -> Self {
		Self::new(Method::GET, segments)
	}

	pub fn post(segments: &[&str]) -> Self {
		Self::new(Method::POST, segments)
	}

	pub fn put(segments: &[&str]) -> Self {
		Self::new(Method::PUT, segments)
	}

	pub fn delete(segments: &[&str]) -> Self {
		Self::new(Method::DELETE, segments)
	}

	/// Sets the JSON body.
	pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
		self.body = Some(serde_json::to_value(body)?);
		Ok(self)
	}

	/// Adds a header that overrides the defaults.
	pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);
		self
	}

	/// Sends the request without credentials and without 401 recovery.
	pub fn anonymous(mut self) -> Self {
		self.anonymous = true;
		self
	}

	pub fn method(&self) -> &Method {
		&self.method
	}

	/// Unencoded path, for logs and error messages.
	pub fn path(&self) -> String {
		format!("/{}", self.segments.join("/"))
	}
}

/// How many token refreshes a single request may trigger.
///
/// The backend treats refresh tokens as single use, so more than one refresh
/// per request is never useful. Larger values are clamped to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthRetryPolicy {
	max_refresh_attempts: u32,
}

impl AuthRetryPolicy {
	pub const MAX_REFRESH_ATTEMPTS: u32 = 1;

	pub fn new(max_refresh_attempts: u32) -> Self {
		if max_refresh_attempts > Self::MAX_REFRESH_ATTEMPTS {
			warn!(
				requested = max_refresh_attempts,
				allowed = Self::MAX_REFRESH_ATTEMPTS,
				"Clamping auth.max_refresh_attempts"
			);
		}
		Self {
			max_refresh_attempts: max_refresh_attempts.min(Self::MAX_REFRESH_ATTEMPTS),
		}
	}

	/// A policy that never refreshes. A 401 ends the session immediately.
	pub fn disabled() -> Self {
		Self {
			max_refresh_attempts: 0,
		}
	}

	pub fn max_refresh_attempts(&self) -> u32 {
		self.max_refresh_attempts
	}
}

impl Default for AuthRetryPolicy {
	fn default() -> Self {
		Self {
			max_refresh_attempts: Self::MAX_REFRESH_ATTEMPTS,
		}
	}
}

/// HTTP client for the marketplace backend
///
/// Cheap to clone; clones share the connection pool and the session.
#[derive(Clone)]
pub struct ApiClient {
	http: Client,
	base_url: Url,
	session: SessionStore,
	retry: AuthRetryPolicy,
	refresh_lock: Arc<Mutex<()>>,
}

impl fmt::Debug for ApiClient {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ApiClient")
			.field("base_url", &self.base_url.as_str())
			.field("retry", &self.retry)
			.finish_non_exhaustive()
	}
}

impl ApiClient {
	/// Creates a new API client with the default timeout
	///
	/// # Arguments
	/// * `base_url` - Base URL of the backend, e.g. `http://localhost:3000`
	/// * `session` - Session providing and receiving credentials
	///
	/// # Errors
	/// Returns error if the URL is invalid or the HTTP client cannot be built
	pub fn new(base_url: &str, session: SessionStore) -> Result<Self> {
		Self::with_timeout(base_url, session, DEFAULT_TIMEOUT)
	}

	pub fn with_timeout(base_url: &str, session: SessionStore, timeout: Duration) -> Result<Self> {
		let http = Client::builder()
			.timeout(timeout)
			.build()
			.map_err(Error::Network)?;
		let base_url = Url::parse(base_url)?;
		if base_url.cannot_be_a_base() {
			return Err(Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
		}

		Ok(Self {
			http,
			base_url,
			session,
			retry: AuthRetryPolicy::default(),
			refresh_lock: Arc::new(Mutex::new(())),
		})
	}

	/// Creates a client from configuration.
	pub fn from_config(config: &ClientConfig, session: SessionStore) -> Result<Self> {
		let client = Self::with_timeout(&config.api.base_url, session, config.timeout())?;
		Ok(client.with_retry_policy(AuthRetryPolicy::new(config.auth.max_refresh_attempts)))
	}

	pub fn with_retry_policy(mut self, retry: AuthRetryPolicy) -> Self {
		self.retry = retry;
		self
	}

	pub fn session(&self) -> &SessionStore {
		&self.session
	}

	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Logs in and stores the resulting session
	///
	/// # Returns
	/// The profile of the logged-in user
	///
	/// # Errors
	/// Returns `Error::Http` when the backend rejects the credentials
	#[instrument(skip_all, fields(email = %credentials.email))]
	pub async fn login(&self, credentials: &LoginRequest) -> Result<User> {
		let request = ApiRequest::post(&["auth", "login"])
			.json(credentials)?
			.anonymous();
		let response: AuthResponse = self.execute(request).await?;

		let user = response.user();
		self.session.save(&response.tokens(), &user).await?;
		info!(user_id = %user.id, "Logged in");
		Ok(user)
	}

	/// Ends the local session. The backend keeps no logout state.
	pub async fn logout(&self) -> Result<()> {
		self.session.clear().await?;
		info!("Logged out");
		Ok(())
	}

	/// Exchanges the stored refresh token for a new token pair.
	///
	/// On failure the session is cleared.
	#[instrument(skip(self))]
	pub async fn refresh(&self) -> Result<TokenPair> {
		let _guard = self.refresh_lock.lock().await;
		self.exchange_refresh_token().await
	}

	/// Recovers from a 401 received while sending `rejected`.
	///
	/// Waits for any refresh in flight. If the session token has changed
	/// since the request was sent, the new token is used as is.
	async fn recover_from_unauthorized(&self, rejected: Option<&str>) -> Result<()> {
		let _guard = self.refresh_lock.lock().await;

		let current = self.session.access_token();
		if current.is_some() && current.as_deref() != rejected {
			debug!("Access token already replaced, retrying");
			return Ok(());
		}
		self.exchange_refresh_token().await.map(|_| ())
	}

	/// Caller must hold `refresh_lock`.
	async fn exchange_refresh_token(&self) -> Result<TokenPair> {
		let Some(refresh_token) = self.session.refresh_token() else {
			warn!("No refresh token available");
			self.expire_session().await;
			return Err(Error::SessionExpired);
		};

		let request = ApiRequest::post(&["auth", "refresh-token"])
			.json(&RefreshTokenRequest { refresh_token })?
			.anonymous();

		let exchanged = match self.send(&request).await {
			Ok((response, _)) => self.decode::<TokenPair>(response).await,
			Err(e) => Err(e),
		};

		match exchanged {
			Ok(tokens) => {
				self.session.update_tokens(&tokens).await?;
				info!("Access token refreshed");
				Ok(tokens)
			},
			Err(e) => {
				warn!(error = %e, "Token refresh failed");
				self.expire_session().await;
				Err(Error::RefreshFailed(e.to_string()))
			},
		}
	}

	/// Executes a request and decodes the response
	///
	/// A 401 on an authenticated request triggers at most
	/// `max_refresh_attempts` refreshes, each followed by a retry. When the
	/// retry is still rejected the session is cleared.
	///
	/// # Errors
	/// * `Error::Network` if the backend cannot be reached
	/// * `Error::Http` for any other non-success status
	/// * `Error::SessionExpired` / `Error::RefreshFailed` when the session is gone
	/// * `Error::Decode` if the body does not match `T`
	#[instrument(skip(self, request), fields(method = %request.method, path = %request.path()))]
	pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
		let mut refreshes = 0;

		loop {
			let (response, sent_token) = self.send(&request).await?;

			if response.status() == StatusCode::UNAUTHORIZED && !request.anonymous {
				if refreshes >= self.retry.max_refresh_attempts() {
					warn!("Request unauthorized, ending session");
					self.expire_session().await;
					return Err(Error::SessionExpired);
				}
				refreshes += 1;
				debug!(attempt = refreshes, "Access token rejected, refreshing");
				self.recover_from_unauthorized(sent_token.as_deref())
					.await?;
				continue;
			}

			return self.decode(response).await;
		}
	}

	/// Generic GET request
	pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
		self.execute(ApiRequest::get(segments)).await
	}

	/// Generic POST request with a JSON body
	pub async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<T>
	where
		B: Serialize + ?Sized,
		T: DeserializeOwned,
	{
		self.execute(ApiRequest::post(segments).json(body)?).await
	}

	/// Generic PUT request with a JSON body
	pub async fn put<B, T>(&self, segments: &[&str], body: &B) -> Result<T>
	where
		B: Serialize + ?Sized,
		T: DeserializeOwned,
	{
		self.execute(ApiRequest::put(segments).json(body)?).await
	}

	/// Generic DELETE request
	pub async fn delete<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
		self.execute(ApiRequest::delete(segments)).await
	}

	fn url_for(&self, segments: &[String]) -> Result<Url> {
		let mut url = self.base_url.clone();
		url.path_segments_mut()
			.map_err(|_| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
			.pop_if_empty()
			.extend(segments);
		Ok(url)
	}

	/// Sends `request`, returning the response and the access token it
	/// carried.
	async fn send(&self, request: &ApiRequest) -> Result<(Response, Option<String>)> {
		let url = self.url_for(&request.segments)?;

		let mut headers = HeaderMap::new();
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		let token = if request.anonymous {
			None
		} else {
			self.session.access_token()
		};
		if let Some(token) = &token {
			let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
				.map_err(|e| anyhow::anyhow!("Access token is not a valid header: {e}"))?;
			value.set_sensitive(true);
			headers.insert(AUTHORIZATION, value);
		}
		for (name, value) in &request.headers {
			headers.insert(name.clone(), value.clone());
		}

		let mut builder = self.http.request(request.method.clone(), url).headers(headers);
		if let Some(body) = &request.body {
			builder = builder.body(serde_json::to_vec(body)?);
		}

		let response = builder.send().await.map_err(Error::Network)?;
		debug!(status = %response.status(), "Response received");
		Ok((response, token))
	}

	/// Turns a response into `T`, or into the matching error
	///
	/// No content (204 or an empty body) decodes as JSON `null`, so callers
	/// expecting `()` or `Option<_>` get an empty value.
	async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
		let status = response.status();
		if !status.is_success() {
			return Err(http_error(status, response).await);
		}

		let bytes = response.bytes().await.map_err(Error::Network)?;
		if status == StatusCode::NO_CONTENT || bytes.iter().all(u8::is_ascii_whitespace) {
			return serde_json::from_value(serde_json::Value::Null)
				.map_err(|e| Error::Decode(format!("Expected a response body: {e}")));
		}

		serde_json::from_slice(&bytes).map_err(|e| Error::Decode(e.to_string()))
	}

	async fn expire_session(&self) {
		if let Err(e) = self.session.clear().await {
			warn!(error = %e, "Failed to clear expired session");
		}
	}
}

/// Builds the error for a non-success response.
///
/// Prefers the `message` of a JSON error body. A JSON body without one gives
/// `HTTP Error <code>`; a non-JSON body gives the status text.
async fn http_error(status: StatusCode, response: Response) -> Error {
	let text = response.text().await.unwrap_or_default();
	let fallback = || format!("HTTP Error {}", status.as_u16());

	let message = match serde_json::from_str::<ApiErrorBody>(&text) {
		Ok(body) => body.message_text().unwrap_or_else(fallback),
		Err(_) => status
			.canonical_reason()
			.map(str::to_string)
			.unwrap_or_else(fallback),
	};

	Error::Http {
		status: status.as_u16(),
		message,
	}
}
