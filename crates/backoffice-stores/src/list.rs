//! Paged list of one entity kind

use crate::endpoint::{CrudOp, EntityKind, RouteParams};
use crate::error::{StoreError, StoreResult};
use crate::transport::{Transport, call};
use backoffice_pages::{Observable, Pagination};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// Rows and pagination of a list screen.
///
/// The backend answers `{"results": [...], "count": n}`.
pub struct ListStore {
	kind: EntityKind,
	route: RouteParams,
	pagination: Observable<Pagination>,
	items: Observable<Vec<Value>>,
	search: RefCell<String>,
	transport: Rc<dyn Transport>,
}

impl ListStore {
	pub fn new(kind: EntityKind, page_size: usize, transport: Rc<dyn Transport>) -> Self {
		Self {
			kind,
			route: RouteParams::new(),
			pagination: Observable::new(Pagination::new(page_size)),
			items: Observable::new(Vec::new()),
			search: RefCell::new(String::new()),
			transport,
		}
	}

	pub fn with_parent(mut self, parent_id: impl ToString) -> Self {
		if let Some(param) = self.kind.parent_param() {
			self.route.insert(param.to_string(), parent_id.to_string());
		}
		self
	}

	pub fn kind(&self) -> EntityKind {
		self.kind
	}

	pub fn items(&self) -> &Observable<Vec<Value>> {
		&self.items
	}

	pub fn pagination(&self) -> &Observable<Pagination> {
		&self.pagination
	}

	/// Loads the current page.
	pub async fn load(&self) -> StoreResult<()> {
		let endpoint = self.kind.endpoint(CrudOp::List);
		let mut query = match serde_json::to_value(self.pagination.with(Pagination::query)) {
			Ok(Value::Object(map)) => map,
			_ => Map::new(),
		};
		let search = self.search.borrow().clone();
		if !search.is_empty() {
			query.insert("search".to_string(), Value::String(search));
		}

		let response = call(
			self.transport.as_ref(),
			&endpoint,
			Some(&Value::Object(query)),
			&self.route,
		)
		.await?;

		let unexpected = || StoreError::UnexpectedPayload {
			endpoint: endpoint.name().to_string(),
			expected: "object with results and count",
		};
		let Value::Object(mut body) = response.data else {
			return Err(unexpected());
		};
		let Some(Value::Array(rows)) = body.remove("results") else {
			return Err(unexpected());
		};
		let count = body
			.get("count")
			.and_then(Value::as_u64)
			.map_or(rows.len(), |n| n as usize);

		self.pagination.update(|p| p.set_total_items(count));
		self.items.set(rows);
		Ok(())
	}

	/// Moves to `page` and reloads.
	pub async fn goto_page(&self, page: usize) -> StoreResult<()> {
		self.pagination.update(|p| {
			p.current_page = page.max(1);
		});
		self.load().await
	}

	/// Sets the search term, returns to page 1 and reloads.
	pub async fn set_search(&self, term: &str) -> StoreResult<()> {
		*self.search.borrow_mut() = term.trim().to_string();
		self.pagination.update(|p| p.current_page = 1);
		self.load().await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::MockTransport;
	use rstest::rstest;
	use serde_json::json;

	fn rows(n: usize) -> Vec<Value> {
		(0..n).map(|i| json!({"id": i})).collect()
	}

	#[rstest]
	#[tokio::test]
	async fn test_load_updates_items_and_total() {
		// Arrange
		let transport = Rc::new(MockTransport::new());
		transport.respond("content.list", json!({"results": rows(10), "count": 42}));
		let list = ListStore::new(EntityKind::Content, 10, transport.clone());

		// Act
		list.goto_page(3).await.unwrap();

		// Assert
		assert_eq!(list.items().borrow().len(), 10);
		let pagination = list.pagination().get();
		assert_eq!(pagination.total_pages(), 5);
		assert_eq!(pagination.current_page, 3);
		assert_eq!(
			transport.last_call().unwrap().body,
			Some(json!({"page": 3, "page_size": 10}))
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_search_resets_page() {
		let transport = Rc::new(MockTransport::new());
		transport.respond("episode.list", json!({"results": rows(2), "count": 2}));
		let list = ListStore::new(EntityKind::Episode, 10, transport.clone()).with_parent(8);
		list.pagination().update(|p| p.current_page = 4);

		list.set_search(" pilot ").await.unwrap();

		let call = transport.last_call().unwrap();
		assert_eq!(call.path, "/seasons/8/episodes");
		assert_eq!(call.body, Some(json!({"page": 1, "page_size": 10, "search": "pilot"})));
		assert_eq!(list.pagination().get().current_page, 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_bare_array_is_unexpected() {
		let transport = Rc::new(MockTransport::new());
		transport.respond("page.list", json!([]));
		let list = ListStore::new(EntityKind::Page, 10, transport.clone());

		assert!(matches!(
			list.load().await,
			Err(StoreError::UnexpectedPayload { .. })
		));
	}
}
