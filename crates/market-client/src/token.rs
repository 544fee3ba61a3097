//! Reading access token claims.
//!
//! Tokens are decoded without verifying the signature. The result is only
//! used for display, never for authorization decisions.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// The registered claims the client cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
	#[serde(default)]
	pub sub: Option<String>,
	#[serde(default)]
	pub exp: Option<i64>,
	#[serde(default)]
	pub iat: Option<i64>,
}

impl TokenClaims {
	pub fn expires_at(&self) -> Option<DateTime<Utc>> {
		self.exp.and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
	}

	pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
		self.expires_at().is_some_and(|exp| exp <= now)
	}
}

/// Decodes the payload of a JWT. Returns `None` for anything that is not one.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
	let mut parts = token.split('.');
	let (Some(_header), Some(payload), Some(_signature), None) =
		(parts.next(), parts.next(), parts.next(), parts.next())
	else {
		return None;
	};

	let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
	serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	fn token_with(payload: &serde_json::Value) -> String {
		let encoded = URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload).unwrap());
		format!("eyJhbGciOiJIUzI1NiJ9.{encoded}.c2ln")
	}

	#[test]
	fn test_decode_claims() {
		let token = token_with(&serde_json::json!({"sub": "u-1", "exp": 1_800_000_000, "iat": 1_799_990_000}));
		let claims = decode_claims(&token).unwrap();

		assert_eq!(claims.sub.as_deref(), Some("u-1"));
		assert_eq!(
			claims.expires_at(),
			Some(Utc.timestamp_opt(1_800_000_000, 0).unwrap())
		);
		assert!(claims.is_expired_at(Utc.timestamp_opt(1_800_000_000, 0).unwrap()));
		assert!(!claims.is_expired_at(Utc.timestamp_opt(1_799_999_999, 0).unwrap()));
	}

	#[test]
	fn test_opaque_tokens_have_no_claims() {
		assert!(decode_claims("opaque-token").is_none());
		assert!(decode_claims("a.b.c.d").is_none());
		assert!(decode_claims("a.!!!.c").is_none());
		assert!(decode_claims(&token_with(&serde_json::json!({}))).is_some_and(|c| c.exp.is_none()));
	}
}
