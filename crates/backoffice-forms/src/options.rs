//! Option list resolution for select fields

use crate::descriptor::{FieldDescriptor, OptionSource};
use backoffice_stores::{FieldStore, OptionQuery};
use backoffice_validators::{as_text, is_blank};
use serde_json::Value;

/// One `<option>` ready to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
	pub value: String,
	pub label: String,
	pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedOptions {
	/// Not a select field
	NotApplicable,
	/// The source returned nothing yet
	Loading,
	Ready(Vec<SelectOption>),
}

impl ResolvedOptions {
	pub fn is_loading(&self) -> bool {
		matches!(self, ResolvedOptions::Loading)
	}
}

/// Resolves the descriptor's option source.
///
/// A store-backed list that is not loaded yet is requested from the store,
/// once per distinct query; a dependent list is keyed by the parent field's
/// current value and is empty while no parent is chosen.
pub fn resolve_options(
	descriptor: &FieldDescriptor,
	key: &str,
	store: &dyn FieldStore,
) -> ResolvedOptions {
	if !descriptor.element_type().has_options() {
		return ResolvedOptions::NotApplicable;
	}

	let raw = match descriptor.options() {
		OptionSource::None => Some(Vec::new()),
		OptionSource::Static(items) => Some(items.clone()),
		OptionSource::Store(query) => from_store(query, store),
		OptionSource::Dependent { key, parent_field } => {
			let parent = store.get_store_value(parent_field);
			if is_blank(&parent) {
				Some(Vec::new())
			} else {
				let parent = as_text(&parent).map(|t| t.into_owned()).unwrap_or_default();
				from_store(&OptionQuery::dependent(*key, parent), store)
			}
		}
		OptionSource::Loader(loader) => loader(key),
	};

	match raw {
		None => ResolvedOptions::Loading,
		Some(items) => ResolvedOptions::Ready(build_options(descriptor, &items)),
	}
}

fn from_store(query: &OptionQuery, store: &dyn FieldStore) -> Option<Vec<Value>> {
	let items = store.store_property(query);
	if items.is_none() {
		store.request_options(query);
	}
	items
}

/// Applies the value/label selectors and the disabled predicate.
pub fn build_options(descriptor: &FieldDescriptor, items: &[Value]) -> Vec<SelectOption> {
	items
		.iter()
		.map(|item| {
			let value = descriptor.option_value_selector().apply(item);
			SelectOption {
				label: descriptor.option_label_selector().apply(item),
				disabled: descriptor.is_option_disabled(&value),
				value,
			}
		})
		.collect()
}
