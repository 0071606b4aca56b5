//! In-memory transport for tests

use crate::endpoint::{Endpoint, HttpMethod, RouteParams};
use crate::error::ApiError;
use crate::transport::{ApiResponse, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// A call received by [`MockTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
	pub endpoint: String,
	pub method: HttpMethod,
	/// Resolved path, or the raw template when a parameter was missing
	pub path: String,
	pub body: Option<Value>,
	pub params: RouteParams,
}

type Handler = Box<dyn Fn(&RecordedCall) -> Result<ApiResponse, ApiError>>;

/// Transport answering from canned responses keyed by endpoint name.
///
/// One-shot responses queued with [`MockTransport::respond_once`] take
/// priority over the standing handler of the same endpoint. Endpoints with
/// neither reject with status 404.
#[derive(Default)]
pub struct MockTransport {
	handlers: RefCell<HashMap<String, Handler>>,
	queued: RefCell<HashMap<String, VecDeque<Result<ApiResponse, ApiError>>>>,
	calls: RefCell<Vec<RecordedCall>>,
	latency: Cell<Duration>,
}

impl MockTransport {
	pub fn new() -> Self {
		Self::default()
	}

	/// Answers every call to `endpoint` with `data` and status 200.
	pub fn respond(&self, endpoint: &str, data: Value) {
		self.respond_with(endpoint, move |_| Ok(ApiResponse::ok(data.clone())));
	}

	/// Rejects every call to `endpoint` with `error`.
	pub fn reject(&self, endpoint: &str, error: ApiError) {
		self.respond_with(endpoint, move |_| Err(error.clone()));
	}

	/// Answers calls to `endpoint` by running `handler` on the recorded call.
	pub fn respond_with<F>(&self, endpoint: &str, handler: F)
	where
		F: Fn(&RecordedCall) -> Result<ApiResponse, ApiError> + 'static,
	{
		self.handlers
			.borrow_mut()
			.insert(endpoint.to_string(), Box::new(handler));
	}

	/// Queues a single response for the next call to `endpoint`.
	pub fn respond_once(&self, endpoint: &str, result: Result<ApiResponse, ApiError>) {
		self.queued
			.borrow_mut()
			.entry(endpoint.to_string())
			.or_default()
			.push_back(result);
	}

	/// Delays every response by `latency` (use with a paused tokio clock).
	pub fn set_latency(&self, latency: Duration) {
		self.latency.set(latency);
	}

	pub fn calls(&self) -> Vec<RecordedCall> {
		self.calls.borrow().clone()
	}

	pub fn calls_to(&self, endpoint: &str) -> Vec<RecordedCall> {
		self.calls
			.borrow()
			.iter()
			.filter(|c| c.endpoint == endpoint)
			.cloned()
			.collect()
	}

	pub fn call_count(&self, endpoint: &str) -> usize {
		self.calls.borrow().iter().filter(|c| c.endpoint == endpoint).count()
	}

	pub fn last_call(&self) -> Option<RecordedCall> {
		self.calls.borrow().last().cloned()
	}
}

#[async_trait(?Send)]
impl Transport for MockTransport {
	async fn call_api(
		&self,
		endpoint: &Endpoint,
		body: Option<&Value>,
		params: &RouteParams,
	) -> Result<ApiResponse, ApiError> {
		let call = RecordedCall {
			endpoint: endpoint.name().to_string(),
			method: endpoint.method(),
			path: endpoint
				.resolve(params)
				.unwrap_or_else(|_| endpoint.template().to_string()),
			body: body.cloned(),
			params: params.clone(),
		};
		self.calls.borrow_mut().push(call.clone());

		let latency = self.latency.get();
		if !latency.is_zero() {
			tokio::time::sleep(latency).await;
		}

		let queued = self
			.queued
			.borrow_mut()
			.get_mut(&call.endpoint)
			.and_then(VecDeque::pop_front);
		if let Some(result) = queued {
			return result;
		}

		match self.handlers.borrow().get(&call.endpoint) {
			Some(handler) => handler(&call),
			None => Err(ApiError::new(
				404,
				format!("No mock response for {}", call.endpoint),
			)),
		}
	}
}
