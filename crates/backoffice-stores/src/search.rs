//! Debounced remote option search
//!
//! Each call to [`RemoteSearch::search`] starts a new generation. Terms
//! shorter than the minimum never reach the backend. Longer terms wait for
//! the debounce delay; if another keystroke arrived meanwhile, or arrives
//! while the request is in flight, the older result is dropped.

use crate::endpoint::Endpoint;
use crate::error::StoreError;
use crate::reference::ReferenceKey;
use crate::transport::{Transport, call};
use backoffice_pages::Observable;
use serde_json::{Value, json};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// What happened to one keystroke
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
	/// Below the minimum length; no request made
	TooShort,
	/// A newer keystroke replaced this one
	Superseded,
	/// Results were stored; carries their count
	Applied(usize),
	Failed(StoreError),
}

pub struct RemoteSearch {
	transport: Rc<dyn Transport>,
	endpoint: Endpoint,
	min_length: usize,
	delay: Duration,
	generation: Cell<u64>,
	results: Observable<Vec<Value>>,
}

impl RemoteSearch {
	pub fn new(
		transport: Rc<dyn Transport>,
		endpoint: Endpoint,
		min_length: usize,
		delay: Duration,
	) -> Self {
		Self {
			transport,
			endpoint,
			min_length,
			delay,
			generation: Cell::new(0),
			results: Observable::new(Vec::new()),
		}
	}

	/// Content title lookup with the console defaults (3 characters, 300 ms)
	pub fn content_titles(transport: Rc<dyn Transport>) -> Self {
		Self::new(
			transport,
			ReferenceKey::ContentTitles.endpoint(),
			3,
			Duration::from_millis(300),
		)
	}

	pub fn results(&self) -> &Observable<Vec<Value>> {
		&self.results
	}

	pub fn min_length(&self) -> usize {
		self.min_length
	}

	fn is_current(&self, generation: u64) -> bool {
		self.generation.get() == generation
	}

	/// Handles one keystroke.
	pub async fn search(&self, term: &str) -> SearchOutcome {
		let generation = self.generation.get() + 1;
		self.generation.set(generation);

		let term = term.trim();
		if term.chars().count() < self.min_length {
			return SearchOutcome::TooShort;
		}

		tokio::time::sleep(self.delay).await;
		if !self.is_current(generation) {
			tracing::warn!(endpoint = self.endpoint.name(), term, "search superseded before request");
			return SearchOutcome::Superseded;
		}

		let body = json!({ "search": term });
		let result = call(self.transport.as_ref(), &self.endpoint, Some(&body), &Default::default()).await;
		if !self.is_current(generation) {
			tracing::warn!(endpoint = self.endpoint.name(), term, "search result discarded as superseded");
			return SearchOutcome::Superseded;
		}

		match result {
			Ok(response) => {
				let items = match response.data {
					Value::Array(items) => items,
					Value::Object(mut map) => match map.remove("results") {
						Some(Value::Array(items)) => items,
						_ => Vec::new(),
					},
					_ => Vec::new(),
				};
				let count = items.len();
				self.results.set(items);
				SearchOutcome::Applied(count)
			}
			Err(err) => SearchOutcome::Failed(err),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::MockTransport;
	use crate::transport::ApiResponse;
	use futures::future::join;
	use rstest::rstest;

	fn echo_transport() -> Rc<MockTransport> {
		let transport = Rc::new(MockTransport::new());
		transport.respond_with("content_titles.list", |call| {
			let term = call.body.as_ref().and_then(|b| b["search"].as_str()).unwrap_or("");
			Ok(ApiResponse::ok(json!([{ "title": term }])))
		});
		transport
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_short_terms_never_fetch() {
		// Arrange
		let transport = echo_transport();
		let search = RemoteSearch::content_titles(transport.clone());

		// Act
		let outcome = search.search("ab").await;

		// Assert
		assert_eq!(outcome, SearchOutcome::TooShort);
		assert!(transport.calls().is_empty());
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_only_last_keystroke_is_fetched() {
		// Arrange
		let transport = echo_transport();
		let search = RemoteSearch::content_titles(transport.clone());

		// Act
		let (first, second) = join(search.search("sta"), async {
			tokio::time::sleep(Duration::from_millis(100)).await;
			search.search("star").await
		})
		.await;

		// Assert
		assert_eq!(first, SearchOutcome::Superseded);
		assert_eq!(second, SearchOutcome::Applied(1));
		assert_eq!(transport.call_count("content_titles.list"), 1);
		assert_eq!(search.results().get(), vec![json!({"title": "star"})]);
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_in_flight_result_is_ignored_after_new_keystroke() {
		// Arrange
		let transport = echo_transport();
		transport.set_latency(Duration::from_millis(500));
		let search = RemoteSearch::content_titles(transport.clone());

		// Act
		let (first, second) = join(search.search("star"), async {
			// Past the first debounce, while its request is in flight
			tokio::time::sleep(Duration::from_millis(400)).await;
			search.search("ab").await
		})
		.await;

		// Assert
		assert_eq!(first, SearchOutcome::Superseded);
		assert_eq!(second, SearchOutcome::TooShort);
		assert_eq!(transport.call_count("content_titles.list"), 1);
		assert!(search.results().get().is_empty());
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_failure_is_reported() {
		let transport = Rc::new(MockTransport::new());
		let search = RemoteSearch::content_titles(transport.clone());

		let outcome = search.search("anything").await;

		assert!(matches!(outcome, SearchOutcome::Failed(ref e) if e.status() == Some(404)));
	}
}
