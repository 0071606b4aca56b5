//! Error types for transport, stores and session

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Rejection returned by the transport.
///
/// `status` is the HTTP status, or `0` when no response arrived.
/// `validation` carries the backend's per-field payload when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("API error ({status}): {message}")]
pub struct ApiError {
	pub status: u16,
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub validation: Option<Value>,
}

impl ApiError {
	pub fn new(status: u16, message: impl Into<String>) -> Self {
		Self {
			status,
			message: message.into(),
			validation: None,
		}
	}

	/// A failure before any response was received
	pub fn network(message: impl Into<String>) -> Self {
		Self::new(0, message)
	}

	pub fn with_validation(mut self, payload: Value) -> Self {
		self.validation = Some(payload);
		self
	}

	pub fn is_network(&self) -> bool {
		self.status == 0
	}

	/// Flattens the validation payload into `(field, first message)` pairs.
	///
	/// Accepts `{"field": "msg"}` and `{"field": ["msg", ...]}`.
	pub fn field_errors(&self) -> Vec<(String, String)> {
		let Some(Value::Object(fields)) = &self.validation else {
			return Vec::new();
		};
		fields
			.iter()
			.filter_map(|(field, messages)| {
				let message = match messages {
					Value::String(s) => Some(s.clone()),
					Value::Array(items) => items.first().and_then(Value::as_str).map(str::to_string),
					_ => None,
				}?;
				Some((field.clone(), message))
			})
			.collect()
	}
}

/// Errors raised by entity stores
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
	#[error(transparent)]
	Api(#[from] ApiError),

	/// Update or delete on an entity that has no id yet
	#[error("{entity} has no id; save it before {operation}")]
	MissingId {
		entity: &'static str,
		operation: &'static str,
	},

	/// Response body did not have the expected shape
	#[error("Unexpected payload from {endpoint}: expected {expected}")]
	UnexpectedPayload {
		endpoint: String,
		expected: &'static str,
	},

	/// URL template names a parameter that was not supplied
	#[error("Missing route parameter '{param}' for {endpoint}")]
	MissingRouteParam { endpoint: String, param: String },

	/// Request body could not be encoded as a query string
	#[error("Cannot encode query for {endpoint}: {reason}")]
	Query { endpoint: String, reason: String },
}

impl StoreError {
	/// HTTP status of a transport rejection
	pub fn status(&self) -> Option<u16> {
		match self {
			StoreError::Api(e) => Some(e.status),
			_ => None,
		}
	}
}

/// Errors raised while constructing the application session
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
	#[error("The application session has already been initialized")]
	AlreadyInitialized,
}

pub type StoreResult<T> = Result<T, StoreError>;
