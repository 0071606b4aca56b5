//! Field descriptors
//!
//! A [`FieldDescriptor`] is the static configuration of one form field: its
//! element type, name, label, validation rules and, for selects, where the
//! options come from and how each raw option becomes a value and a label.
//! Descriptors are built once with the consuming builder methods below and
//! never change afterwards; only the value bound to them and the resolved
//! option list vary between renders.
//!
//! ```
//! use backoffice_forms::{FieldDescriptor, RuleSpec};
//! use backoffice_stores::ReferenceKey;
//! use serde_json::json;
//!
//! let title = FieldDescriptor::text("title", "Title")
//!     .rule("required")
//!     .rule_spec(RuleSpec::new("maxLength").arg(json!(120)));
//!
//! let genre = FieldDescriptor::select("genre", "Genre")
//!     .options_from_store(ReferenceKey::Genres)
//!     .placeholder("Choose a genre");
//!
//! assert_eq!(title.rules().len(), 2);
//! assert_eq!(genre.name(), "genre");
//! ```

use backoffice_stores::{FieldStore, OptionQuery, ReferenceKey};
use backoffice_validators::as_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// Control rendered for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
	Text,
	/// Masked input that never echoes its value into the markup
	Password,
	Textarea,
	Select,
	Multiselect,
}

impl ElementType {
	pub fn has_options(&self) -> bool {
		matches!(self, ElementType::Select | ElementType::Multiselect)
	}
}

/// One argument of a rule
#[derive(Clone)]
pub enum RuleArg {
	Literal(Value),
	/// Read from the store on every render, e.g. a sibling field for `match`.
	/// At submit a sibling control of the same name supplies its current value.
	StoreValue(String),
	/// Computed from the store on every render
	Computed(Rc<dyn Fn(&dyn FieldStore) -> Value>),
}

impl RuleArg {
	pub fn resolve(&self, store: &dyn FieldStore) -> Value {
		match self {
			RuleArg::Literal(value) => value.clone(),
			RuleArg::StoreValue(key) => store.get_store_value(key),
			RuleArg::Computed(f) => f(store),
		}
	}

	pub fn is_dynamic(&self) -> bool {
		!matches!(self, RuleArg::Literal(_))
	}
}

impl fmt::Debug for RuleArg {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RuleArg::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
			RuleArg::StoreValue(key) => f.debug_tuple("StoreValue").field(key).finish(),
			RuleArg::Computed(_) => f.write_str("Computed(<function>)"),
		}
	}
}

impl From<Value> for RuleArg {
	fn from(value: Value) -> Self {
		RuleArg::Literal(value)
	}
}

/// A rule attached to a field: name, arguments, optional message override
#[derive(Debug, Clone)]
pub struct RuleSpec {
	name: String,
	args: Vec<RuleArg>,
	custom_message: Option<String>,
}

impl RuleSpec {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			args: Vec::new(),
			custom_message: None,
		}
	}

	pub fn arg(mut self, arg: impl Into<RuleArg>) -> Self {
		self.args.push(arg.into());
		self
	}

	/// Argument read live from the store field `key`
	pub fn store_arg(self, key: impl Into<String>) -> Self {
		self.arg(RuleArg::StoreValue(key.into()))
	}

	pub fn computed_arg<F>(self, f: F) -> Self
	where
		F: Fn(&dyn FieldStore) -> Value + 'static,
	{
		self.arg(RuleArg::Computed(Rc::new(f)))
	}

	pub fn message(mut self, message: impl Into<String>) -> Self {
		self.custom_message = Some(message.into());
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn args(&self) -> &[RuleArg] {
		&self.args
	}

	pub fn custom_message(&self) -> Option<&str> {
		self.custom_message.as_deref()
	}

	pub fn has_dynamic_args(&self) -> bool {
		self.args.iter().any(RuleArg::is_dynamic)
	}

	/// Fixes the arguments against the current store state.
	pub fn resolve(&self, store: &dyn FieldStore) -> ResolvedRule {
		ResolvedRule {
			name: self.name.clone(),
			args: self.args.iter().map(|a| a.resolve(store)).collect(),
			store_keys: self
				.args
				.iter()
				.map(|a| match a {
					RuleArg::StoreValue(key) => Some(key.clone()),
					_ => None,
				})
				.collect(),
			custom_message: self.custom_message.clone(),
		}
	}
}

/// A rule with concrete arguments, as attached to a rendered field
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRule {
	pub name: String,
	pub args: Vec<Value>,
	/// Store key behind each argument, `None` for literal and computed ones
	pub store_keys: Vec<Option<String>>,
	pub custom_message: Option<String>,
}

impl ResolvedRule {
	/// Arguments with store-backed ones replaced by `current` where it knows the key.
	pub fn args_with(&self, current: impl Fn(&str) -> Option<Value>) -> Vec<Value> {
		self.args
			.iter()
			.zip(&self.store_keys)
			.map(|(arg, key)| key.as_deref().and_then(&current).unwrap_or_else(|| arg.clone()))
			.collect()
	}
}

/// Option loader: returns `None` while the list is still loading
pub type OptionLoader = Rc<dyn Fn(&str) -> Option<Vec<Value>>>;

/// Where a select field's options come from
#[derive(Clone, Default)]
pub enum OptionSource {
	#[default]
	None,
	Static(Vec<Value>),
	/// A reference list held by the store
	Store(OptionQuery),
	/// A reference list keyed by the current value of another field
	Dependent {
		key: ReferenceKey,
		parent_field: String,
	},
	/// A function of the field's logical key
	Loader(OptionLoader),
}

impl fmt::Debug for OptionSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OptionSource::None => f.write_str("None"),
			OptionSource::Static(items) => f.debug_tuple("Static").field(items).finish(),
			OptionSource::Store(query) => f.debug_tuple("Store").field(query).finish(),
			OptionSource::Dependent { key, parent_field } => f
				.debug_struct("Dependent")
				.field("key", key)
				.field("parent_field", parent_field)
				.finish(),
			OptionSource::Loader(_) => f.write_str("Loader(<function>)"),
		}
	}
}

/// Derives an option's value or label
#[derive(Clone)]
pub enum KeySelector {
	/// Attribute of an object option; scalar options use themselves
	Attribute(String),
	Format(Rc<dyn Fn(&Value) -> String>),
}

impl KeySelector {
	pub fn attribute(name: impl Into<String>) -> Self {
		KeySelector::Attribute(name.into())
	}

	pub fn format<F>(f: F) -> Self
	where
		F: Fn(&Value) -> String + 'static,
	{
		KeySelector::Format(Rc::new(f))
	}

	pub fn apply(&self, option: &Value) -> String {
		match self {
			KeySelector::Attribute(attr) => {
				let field = match option {
					Value::Object(map) => map.get(attr).unwrap_or(&Value::Null),
					scalar => scalar,
				};
				as_text(field).map(|t| t.into_owned()).unwrap_or_default()
			}
			KeySelector::Format(f) => f(option),
		}
	}
}

impl fmt::Debug for KeySelector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			KeySelector::Attribute(attr) => f.debug_tuple("Attribute").field(attr).finish(),
			KeySelector::Format(_) => f.write_str("Format(<function>)"),
		}
	}
}

/// Predicate disabling individual options by value
pub type DisabledPredicate = Rc<dyn Fn(&str) -> bool>;

/// Static configuration of one form field
#[derive(Clone)]
pub struct FieldDescriptor {
	element_type: ElementType,
	name: String,
	label: String,
	rules: Vec<RuleSpec>,
	options: OptionSource,
	option_value: KeySelector,
	option_label: KeySelector,
	disabled: Option<DisabledPredicate>,
	placeholder: Option<String>,
}

impl FieldDescriptor {
	pub fn new(element_type: ElementType, name: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			element_type,
			name: name.into(),
			label: label.into(),
			rules: Vec::new(),
			options: OptionSource::None,
			option_value: KeySelector::attribute("id"),
			option_label: KeySelector::attribute("name"),
			disabled: None,
			placeholder: None,
		}
	}

	pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
		Self::new(ElementType::Text, name, label)
	}

	pub fn password(name: impl Into<String>, label: impl Into<String>) -> Self {
		Self::new(ElementType::Password, name, label)
	}

	pub fn textarea(name: impl Into<String>, label: impl Into<String>) -> Self {
		Self::new(ElementType::Textarea, name, label)
	}

	pub fn select(name: impl Into<String>, label: impl Into<String>) -> Self {
		Self::new(ElementType::Select, name, label)
	}

	pub fn multiselect(name: impl Into<String>, label: impl Into<String>) -> Self {
		Self::new(ElementType::Multiselect, name, label)
	}

	/// Adds a rule without arguments.
	pub fn rule(self, name: impl Into<String>) -> Self {
		self.rule_spec(RuleSpec::new(name))
	}

	pub fn rule_spec(mut self, spec: RuleSpec) -> Self {
		self.rules.push(spec);
		self
	}

	pub fn static_options(mut self, options: Vec<Value>) -> Self {
		self.options = OptionSource::Static(options);
		self
	}

	pub fn options_from_store(mut self, query: impl Into<OptionQuery>) -> Self {
		self.options = OptionSource::Store(query.into());
		self
	}

	pub fn dependent_options(mut self, key: ReferenceKey, parent_field: impl Into<String>) -> Self {
		self.options = OptionSource::Dependent {
			key,
			parent_field: parent_field.into(),
		};
		self
	}

	pub fn option_loader<F>(mut self, loader: F) -> Self
	where
		F: Fn(&str) -> Option<Vec<Value>> + 'static,
	{
		self.options = OptionSource::Loader(Rc::new(loader));
		self
	}

	pub fn option_value(mut self, selector: KeySelector) -> Self {
		self.option_value = selector;
		self
	}

	pub fn option_label(mut self, selector: KeySelector) -> Self {
		self.option_label = selector;
		self
	}

	pub fn disabled_when<F>(mut self, predicate: F) -> Self
	where
		F: Fn(&str) -> bool + 'static,
	{
		self.disabled = Some(Rc::new(predicate));
		self
	}

	/// Label of the empty first option of a single select
	pub fn placeholder(mut self, text: impl Into<String>) -> Self {
		self.placeholder = Some(text.into());
		self
	}

	pub fn element_type(&self) -> ElementType {
		self.element_type
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn rules(&self) -> &[RuleSpec] {
		&self.rules
	}

	pub fn options(&self) -> &OptionSource {
		&self.options
	}

	pub fn option_value_selector(&self) -> &KeySelector {
		&self.option_value
	}

	pub fn option_label_selector(&self) -> &KeySelector {
		&self.option_label
	}

	pub fn is_option_disabled(&self, value: &str) -> bool {
		self.disabled.as_ref().is_some_and(|p| p(value))
	}

	pub fn placeholder_text(&self) -> Option<&str> {
		self.placeholder.as_deref()
	}

	/// Resolves every rule's arguments against the store.
	pub fn resolve_rules(&self, store: &dyn FieldStore) -> Vec<ResolvedRule> {
		self.rules.iter().map(|r| r.resolve(store)).collect()
	}
}

impl fmt::Debug for FieldDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldDescriptor")
			.field("element_type", &self.element_type)
			.field("name", &self.name)
			.field("label", &self.label)
			.field("rules", &self.rules)
			.field("options", &self.options)
			.field("has_disabled_predicate", &self.disabled.is_some())
			.finish()
	}
}
