//! Transport collaborator contract

use crate::endpoint::{Endpoint, RouteParams};
use crate::error::{ApiError, StoreResult};
use async_trait::async_trait;
use serde_json::Value;

/// Successful response from the backend
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
	pub status: u16,
	pub data: Value,
}

impl ApiResponse {
	pub fn ok(data: Value) -> Self {
		Self { status: 200, data }
	}

	pub fn created(data: Value) -> Self {
		Self { status: 201, data }
	}
}

/// Performs one backend call.
///
/// Every store operation goes through this trait. Implementations resolve
/// the endpoint's URL template from `params`, send `body` (as the query
/// string for `GET`), and reject with an [`ApiError`] on non-2xx responses.
#[async_trait(?Send)]
pub trait Transport {
	async fn call_api(
		&self,
		endpoint: &Endpoint,
		body: Option<&Value>,
		params: &RouteParams,
	) -> Result<ApiResponse, ApiError>;
}

/// Checks route parameters, calls the transport and logs rejections.
pub(crate) async fn call(
	transport: &dyn Transport,
	endpoint: &Endpoint,
	body: Option<&Value>,
	params: &RouteParams,
) -> StoreResult<ApiResponse> {
	endpoint.resolve(params)?;
	match transport.call_api(endpoint, body, params).await {
		Ok(response) => Ok(response),
		Err(err) => {
			tracing::warn!(
				endpoint = endpoint.name(),
				status = err.status,
				message = %err.message,
				"transport rejected call"
			);
			Err(err.into())
		}
	}
}
