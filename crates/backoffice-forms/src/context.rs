//! Contexts handed to renderers and builder callbacks

use backoffice_pages::Callback;
use backoffice_stores::FieldStore;
use indexmap::IndexMap;
use serde_json::Value;

/// A value change coming from a rendered control
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
	/// Rendered control name, including any positional suffix
	pub name: String,
	/// Logical store key
	pub key: String,
	/// Position of a repeated field
	pub index: Option<usize>,
	pub value: Value,
}

/// Everything a render pass needs besides the descriptor.
///
/// `errors` is a snapshot of the form's client-side errors keyed by control
/// name; a field without a client error falls back to the store's server
/// error for its key.
pub struct RenderContext<'a> {
	store: &'a dyn FieldStore,
	errors: IndexMap<String, String>,
	on_change: Callback<FieldChange>,
}

impl<'a> RenderContext<'a> {
	pub fn new(store: &'a dyn FieldStore, on_change: impl Into<Callback<FieldChange>>) -> Self {
		Self {
			store,
			errors: IndexMap::new(),
			on_change: on_change.into(),
		}
	}

	pub fn with_errors(mut self, errors: IndexMap<String, String>) -> Self {
		self.errors = errors;
		self
	}

	pub fn store(&self) -> &'a dyn FieldStore {
		self.store
	}

	pub fn on_change(&self) -> &Callback<FieldChange> {
		&self.on_change
	}

	/// Message to show under the control `name` bound to `key`
	pub fn error_for(&self, name: &str, key: &str) -> Option<String> {
		self.errors
			.get(name)
			.cloned()
			.or_else(|| self.store.server_error(key))
	}
}

/// Narrow view of the enclosing form given to wrapper builder callbacks
pub struct BuilderContext<'a> {
	pub key: &'a str,
	pub name: &'a str,
	pub index: Option<usize>,
	/// Resolved value bound to the control
	pub value: &'a Value,
	/// Reports a new value for this field
	pub on_change: Callback<Value>,
	store: &'a dyn FieldStore,
}

impl<'a> BuilderContext<'a> {
	pub(crate) fn new(
		key: &'a str,
		name: &'a str,
		index: Option<usize>,
		value: &'a Value,
		on_change: Callback<Value>,
		store: &'a dyn FieldStore,
	) -> Self {
		Self {
			key,
			name,
			index,
			value,
			on_change,
			store,
		}
	}

	/// Current store value of another field
	pub fn sibling(&self, key: &str) -> Value {
		self.store.get_store_value(key)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::memory::MemoryStore;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_client_error_first() {
		let store = MemoryStore::new();
		let mut errors = IndexMap::new();
		errors.insert("email".to_string(), "Required".to_string());
		let ctx = RenderContext::new(&store, |_: FieldChange| {}).with_errors(errors);

		assert_eq!(ctx.error_for("email", "email").as_deref(), Some("Required"));
		assert_eq!(ctx.error_for("title", "title"), None);
	}

	#[rstest]
	fn test_builder_context_reads_siblings() {
		let store = MemoryStore::new().with_value("genre", json!(3));
		let value = json!("");
		let ctx = BuilderContext::new("subgenre", "subgenre", None, &value, Callback::new(|_| {}), &store);

		assert_eq!(ctx.sibling("genre"), json!(3));
		assert_eq!(ctx.sibling("missing"), Value::Null);
	}
}
