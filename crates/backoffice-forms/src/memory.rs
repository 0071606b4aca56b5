//! Store-less forms (filters, dialogs) keep their values here

use backoffice_pages::Observable;
use backoffice_stores::{FieldStore, OptionQuery};
use indexmap::IndexMap;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory [`FieldStore`] with no backend.
///
/// Option lists are supplied with [`MemoryStore::set_options`]; requests for
/// missing lists are recorded and can be read back.
#[derive(Debug, Default)]
pub struct MemoryStore {
	values: Observable<IndexMap<String, Value>>,
	options: RefCell<HashMap<OptionQuery, Vec<Value>>>,
	requested: RefCell<Vec<OptionQuery>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_value(self, key: impl Into<String>, value: Value) -> Self {
		self.values.update(|values| {
			values.insert(key.into(), value);
		});
		self
	}

	pub fn values(&self) -> &Observable<IndexMap<String, Value>> {
		&self.values
	}

	pub fn set_options(&self, query: impl Into<OptionQuery>, options: Vec<Value>) {
		self.options.borrow_mut().insert(query.into(), options);
	}

	pub fn requested(&self) -> Vec<OptionQuery> {
		self.requested.borrow().clone()
	}
}

impl FieldStore for MemoryStore {
	fn get_store_value(&self, key: &str) -> Value {
		self.values
			.with(|values| values.get(key).cloned())
			.unwrap_or(Value::Null)
	}

	fn set_field(&self, key: &str, value: Value) {
		self.values.update(|values| {
			values.insert(key.to_string(), value);
		});
	}

	fn store_property(&self, query: &OptionQuery) -> Option<Vec<Value>> {
		self.options.borrow().get(query).cloned()
	}

	fn request_options(&self, query: &OptionQuery) {
		let mut requested = self.requested.borrow_mut();
		if !requested.contains(query) {
			requested.push(query.clone());
		}
	}
}
