//! Entity stores
//!
//! An [`EntityStore`] holds the editable state of one backend entity plus the
//! reference lists its select fields draw from. Field change handlers write
//! through [`FieldStore::set_field`]; CRUD methods proxy to the [`Transport`].
//!
//! Option lists are fetched lazily. Rendering a select whose list is missing
//! calls [`FieldStore::request_options`], which only queues the query; the
//! owner of the store then awaits [`EntityStore::fetch_pending_options`] and
//! re-renders when the reference observable notifies.

use crate::endpoint::{CrudOp, EntityKind, RouteParams};
use crate::error::{StoreError, StoreResult};
use crate::reference::OptionQuery;
use crate::transport::{Transport, call};
use backoffice_pages::{Observable, SubscriptionId};
use futures::future::join_all;
use indexmap::IndexMap;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Editable state of one entity, in field order
pub type EntityData = IndexMap<String, Value>;

/// Field-level access used by rendered fields.
///
/// This is the typed replacement for looking up `setXxx`/`fetchXxx` methods
/// by name: fields call these four methods and nothing else.
pub trait FieldStore {
	/// Current value of `key`, `Value::Null` when unset
	fn get_store_value(&self, key: &str) -> Value;

	fn set_field(&self, key: &str, value: Value);

	/// Resolved option list, `None` while it is not loaded
	fn store_property(&self, query: &OptionQuery) -> Option<Vec<Value>>;

	/// Asks for `query` to be fetched. Repeated requests are ignored.
	fn request_options(&self, query: &OptionQuery);

	/// Error reported by the backend for `key` on the last save
	fn server_error(&self, _key: &str) -> Option<String> {
		None
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
	Create,
	Edit,
}

/// Load state of one option list
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceSlot {
	Loading,
	Ready(Vec<Value>),
	Failed(String),
}

/// Subscription to both the data and the reference lists of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSubscription {
	data: SubscriptionId,
	references: SubscriptionId,
}

pub struct EntityStore {
	kind: EntityKind,
	mode: Cell<FormMode>,
	id: RefCell<Option<String>>,
	route: RefCell<RouteParams>,
	data: Observable<EntityData>,
	references: Observable<HashMap<OptionQuery, ReferenceSlot>>,
	pending: RefCell<Vec<OptionQuery>>,
	server_errors: Observable<IndexMap<String, String>>,
	local_fields: Vec<String>,
	is_loading: Cell<bool>,
	transport: Rc<dyn Transport>,
}

impl EntityStore {
	/// A store for a new entity, starting from empty data.
	pub fn new_create(kind: EntityKind, transport: Rc<dyn Transport>) -> Self {
		Self::new(kind, FormMode::Create, None, transport)
	}

	/// A store for an existing entity; call [`EntityStore::load`] to fetch it.
	pub fn new_edit(kind: EntityKind, id: impl ToString, transport: Rc<dyn Transport>) -> Self {
		Self::new(kind, FormMode::Edit, Some(id.to_string()), transport)
	}

	fn new(
		kind: EntityKind,
		mode: FormMode,
		id: Option<String>,
		transport: Rc<dyn Transport>,
	) -> Self {
		Self {
			kind,
			mode: Cell::new(mode),
			id: RefCell::new(id),
			route: RefCell::new(RouteParams::new()),
			data: Observable::new(EntityData::new()),
			references: Observable::new(HashMap::new()),
			pending: RefCell::new(Vec::new()),
			server_errors: Observable::new(IndexMap::new()),
			local_fields: Vec::new(),
			is_loading: Cell::new(false),
			transport,
		}
	}

	/// Sets the id of the parent entity (season → content, episode → season).
	pub fn with_parent(self, parent_id: impl ToString) -> Self {
		if let Some(param) = self.kind.parent_param() {
			self.route
				.borrow_mut()
				.insert(param.to_string(), parent_id.to_string());
		}
		self
	}

	/// Initial field values for create mode
	pub fn with_defaults<K: Into<String>>(self, defaults: impl IntoIterator<Item = (K, Value)>) -> Self {
		self.data.update(|data| {
			for (k, v) in defaults {
				data.insert(k.into(), v);
			}
		});
		self
	}

	/// Fields held for the form only and left out of the saved body
	pub fn with_local_fields<K: Into<String>>(mut self, keys: impl IntoIterator<Item = K>) -> Self {
		self.local_fields.extend(keys.into_iter().map(Into::into));
		self
	}

	pub fn kind(&self) -> EntityKind {
		self.kind
	}

	pub fn mode(&self) -> FormMode {
		self.mode.get()
	}

	pub fn id(&self) -> Option<String> {
		self.id.borrow().clone()
	}

	pub fn is_loading(&self) -> bool {
		self.is_loading.get()
	}

	/// Observable entity data
	pub fn data(&self) -> &Observable<EntityData> {
		&self.data
	}

	pub fn snapshot(&self) -> EntityData {
		self.data.get()
	}

	/// Sum of data, reference and error versions; changes on any write
	pub fn version(&self) -> u64 {
		self.data.version() + self.references.version() + self.server_errors.version()
	}

	pub fn subscribe(&self, on_change: impl Fn() + 'static) -> StoreSubscription {
		let on_change = Rc::new(on_change);
		let data = self.data.subscribe({
			let on_change = Rc::clone(&on_change);
			move |_| on_change()
		});
		let references = self.references.subscribe(move |_| on_change());
		StoreSubscription { data, references }
	}

	pub fn unsubscribe(&self, subscription: StoreSubscription) {
		self.data.unsubscribe(subscription.data);
		self.references.unsubscribe(subscription.references);
	}

	fn item_params(&self, operation: &'static str) -> StoreResult<RouteParams> {
		let id = self.id().ok_or(StoreError::MissingId {
			entity: self.kind.as_str(),
			operation,
		})?;
		let mut params = self.route.borrow().clone();
		params.insert("id".to_string(), id);
		Ok(params)
	}

	fn expect_object(&self, op: CrudOp, data: Value) -> StoreResult<EntityData> {
		match data {
			Value::Object(map) => Ok(map.into_iter().collect()),
			_ => Err(StoreError::UnexpectedPayload {
				endpoint: self.kind.endpoint(op).name().to_string(),
				expected: "object",
			}),
		}
	}

	/// Fetches the entity in edit mode. Create mode keeps its defaults.
	pub async fn load(&self) -> StoreResult<()> {
		if self.mode() == FormMode::Create {
			return Ok(());
		}
		let params = self.item_params("loading")?;
		let endpoint = self.kind.endpoint(CrudOp::Get);

		self.is_loading.set(true);
		let result = call(self.transport.as_ref(), &endpoint, None, &params).await;
		self.is_loading.set(false);

		let data = self.expect_object(CrudOp::Get, result?.data)?;
		self.data.set(data);
		Ok(())
	}

	/// Creates or updates the entity from the current data.
	///
	/// A successful create records the returned `id` and switches the store
	/// to edit mode. Backend validation errors are kept per field and can be
	/// read with [`FieldStore::server_error`].
	pub async fn save(&self) -> StoreResult<EntityData> {
		let (op, params) = match self.mode() {
			FormMode::Create => (CrudOp::Create, self.route.borrow().clone()),
			FormMode::Edit => (CrudOp::Update, self.item_params("updating")?),
		};
		let endpoint = self.kind.endpoint(op);
		let body = Value::Object(
			self.snapshot()
				.into_iter()
				.filter(|(key, _)| !self.local_fields.contains(key))
				.collect(),
		);

		self.is_loading.set(true);
		let result = call(self.transport.as_ref(), &endpoint, Some(&body), &params).await;
		self.is_loading.set(false);

		let response = match result {
			Ok(response) => response,
			Err(err) => {
				if let StoreError::Api(api) = &err {
					let errors: IndexMap<_, _> = api.field_errors().into_iter().collect();
					if !errors.is_empty() || !self.server_errors.borrow().is_empty() {
						self.server_errors.set(errors);
					}
				}
				return Err(err);
			}
		};

		let saved = self.expect_object(op, response.data)?;
		if op == CrudOp::Create {
			if let Some(id) = saved.get("id").and_then(id_string) {
				*self.id.borrow_mut() = Some(id);
				self.mode.set(FormMode::Edit);
			}
			tracing::info!(entity = self.kind.as_str(), id = ?self.id(), "entity created");
		} else {
			tracing::info!(entity = self.kind.as_str(), id = ?self.id(), "entity updated");
		}

		if !self.server_errors.borrow().is_empty() {
			self.server_errors.set(IndexMap::new());
		}
		self.data.update(|data| {
			for (k, v) in &saved {
				data.insert(k.clone(), v.clone());
			}
		});
		Ok(saved)
	}

	/// Deletes the entity.
	pub async fn delete(&self) -> StoreResult<()> {
		let params = self.item_params("deleting")?;
		let endpoint = self.kind.endpoint(CrudOp::Delete);
		call(self.transport.as_ref(), &endpoint, None, &params).await?;
		tracing::info!(entity = self.kind.as_str(), id = ?self.id(), "entity deleted");
		Ok(())
	}

	/// Supplies an option list from a parent store; it counts as loaded.
	pub fn inject_reference(&self, query: impl Into<OptionQuery>, options: Vec<Value>) {
		let query = query.into();
		self.pending.borrow_mut().retain(|q| *q != query);
		self.references.update(|refs| {
			refs.insert(query, ReferenceSlot::Ready(options));
		});
	}

	pub fn reference_slot(&self, query: &OptionQuery) -> Option<ReferenceSlot> {
		self.references.with(|refs| refs.get(query).cloned())
	}

	/// Queries requested but not fetched yet
	pub fn pending_requests(&self) -> Vec<OptionQuery> {
		self.pending.borrow().clone()
	}

	/// Fetches one option list.
	///
	/// Accepts a bare array or an object with a `results` array.
	pub async fn fetch_options(&self, query: &OptionQuery) -> StoreResult<()> {
		let endpoint = query.key.endpoint();
		let mut params = RouteParams::new();
		if let (Some(param), Some(parent)) = (query.key.parent_param(), &query.parent) {
			params.insert(param.to_string(), parent.clone());
		}

		self.references.update(|refs| {
			refs.insert(query.clone(), ReferenceSlot::Loading);
		});

		let outcome = call(self.transport.as_ref(), &endpoint, None, &params)
			.await
			.and_then(|response| match response.data {
				Value::Array(items) => Ok(items),
				Value::Object(mut map) => match map.remove("results") {
					Some(Value::Array(items)) => Ok(items),
					_ => Err(StoreError::UnexpectedPayload {
						endpoint: endpoint.name().to_string(),
						expected: "array",
					}),
				},
				_ => Err(StoreError::UnexpectedPayload {
					endpoint: endpoint.name().to_string(),
					expected: "array",
				}),
			});

		let slot = match &outcome {
			Ok(items) => ReferenceSlot::Ready(items.clone()),
			Err(err) => ReferenceSlot::Failed(err.to_string()),
		};
		self.references.update(|refs| {
			refs.insert(query.clone(), slot);
		});
		outcome.map(|_| ())
	}

	/// Fetches every queued option list concurrently.
	///
	/// Returns the number of lists fetched, or the first error once all calls
	/// have finished.
	pub async fn fetch_pending_options(&self) -> StoreResult<usize> {
		let queries: Vec<OptionQuery> = self.pending.borrow_mut().drain(..).collect();
		let results = join_all(queries.iter().map(|q| self.fetch_options(q))).await;
		let count = results.len();
		results.into_iter().collect::<StoreResult<Vec<()>>>()?;
		Ok(count)
	}
}

fn id_string(value: &Value) -> Option<String> {
	match value {
		Value::String(s) if !s.is_empty() => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		_ => None,
	}
}

impl FieldStore for EntityStore {
	fn get_store_value(&self, key: &str) -> Value {
		self.data
			.with(|data| data.get(key).cloned())
			.unwrap_or(Value::Null)
	}

	fn set_field(&self, key: &str, value: Value) {
		self.data.update(|data| {
			data.insert(key.to_string(), value);
		});
		if self.server_errors.with(|errors| errors.contains_key(key)) {
			self.server_errors.update(|errors| {
				errors.shift_remove(key);
			});
		}
	}

	fn store_property(&self, query: &OptionQuery) -> Option<Vec<Value>> {
		self.references.with(|refs| match refs.get(query) {
			Some(ReferenceSlot::Ready(items)) => Some(items.clone()),
			_ => None,
		})
	}

	fn request_options(&self, query: &OptionQuery) {
		let known = self.references.with(|refs| refs.contains_key(query));
		let mut pending = self.pending.borrow_mut();
		if known || pending.contains(query) {
			return;
		}
		tracing::debug!(entity = self.kind.as_str(), query = %query, "option fetch requested");
		pending.push(query.clone());
	}

	fn server_error(&self, key: &str) -> Option<String> {
		self.server_errors.with(|errors| errors.get(key).cloned())
	}
}

impl<S: FieldStore + ?Sized> FieldStore for Rc<S> {
	fn get_store_value(&self, key: &str) -> Value {
		(**self).get_store_value(key)
	}

	fn set_field(&self, key: &str, value: Value) {
		(**self).set_field(key, value)
	}

	fn store_property(&self, query: &OptionQuery) -> Option<Vec<Value>> {
		(**self).store_property(query)
	}

	fn request_options(&self, query: &OptionQuery) {
		(**self).request_options(query)
	}

	fn server_error(&self, key: &str) -> Option<String> {
		(**self).server_error(key)
	}
}

impl std::fmt::Debug for EntityStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EntityStore")
			.field("kind", &self.kind)
			.field("mode", &self.mode.get())
			.field("id", &self.id.borrow())
			.field("data", &self.data)
			.finish()
	}
}
