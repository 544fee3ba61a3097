//! Client-side validation of form input.
//!
//! These checks run before anything is submitted. A failure is reported
//! next to the offending field and never retried.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

/// Errors produced while validating form input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
	/// A required field was left empty.
	#[error("Missing required field: {0}")]
	MissingField(String),
	/// A field holds a value the backend would reject.
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
}

impl ValidationError {
	pub fn invalid(field: &str, message: impl Into<String>) -> Self {
		ValidationError::InvalidValue {
			field: field.to_string(),
			message: message.into(),
		}
	}

	/// Name of the field the error refers to.
	pub fn field(&self) -> &str {
		match self {
			ValidationError::MissingField(field) => field,
			ValidationError::InvalidValue { field, .. } => field,
		}
	}
}

/// Returns the trimmed value, or an error if nothing is left.
pub fn require_text(field: &str, value: &str) -> Result<String, ValidationError> {
	let trimmed = value.trim();
	if trimmed.is_empty() {
		return Err(ValidationError::MissingField(field.to_string()));
	}
	Ok(trimmed.to_string())
}

/// Accepts a quantity strictly greater than zero.
pub fn positive_quantity(field: &str, value: i64) -> Result<u32, ValidationError> {
	if value <= 0 {
		return Err(ValidationError::invalid(
			field,
			"must be a number greater than zero",
		));
	}
	u32::try_from(value).map_err(|_| ValidationError::invalid(field, "is too large"))
}

/// Accepts a finite amount strictly greater than zero.
pub fn positive_amount(field: &str, value: f64) -> Result<f64, ValidationError> {
	if !value.is_finite() || value <= 0.0 {
		return Err(ValidationError::invalid(
			field,
			"must be a number greater than zero",
		));
	}
	Ok(value)
}

/// Parses an event date.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DDTHH:MM` local-form values and
/// bare `YYYY-MM-DD` dates. Values without an offset are taken as UTC.
pub fn parse_event_date(field: &str, value: &str) -> Result<DateTime<Utc>, ValidationError> {
	let value = value.trim();
	if value.is_empty() {
		return Err(ValidationError::MissingField(field.to_string()));
	}

	if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
		return Ok(parsed.with_timezone(&Utc));
	}

	for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
		if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
			return Ok(naive.and_utc());
		}
	}

	if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
		if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
			return Ok(midnight.and_utc());
		}
	}

	Err(ValidationError::invalid(field, "is not a valid date"))
}

/// Rejects a date on a calendar day before `now`. Any time today is accepted.
pub fn not_in_past(
	field: &str,
	date: DateTime<Utc>,
	now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ValidationError> {
	if date.date_naive() < now.date_naive() {
		return Err(ValidationError::invalid(field, "must not be in the past"));
	}
	Ok(date)
}
