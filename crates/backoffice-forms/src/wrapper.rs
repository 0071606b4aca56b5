//! Field wrapper
//!
//! [`FieldWrapper`] renders the same element types as [`Field`](crate::Field)
//! but adds what list and composite screens need:
//!
//! - a custom element builder replacing the built-in control
//! - extra props and children, given literally or built from a
//!   [`BuilderContext`]
//! - value precedence: explicit value, then the store value for the key, then
//!   the empty string (`0` counts as a value with [`FieldWrapper::zero_is_value`])
//! - positional name suffixing for repeated fields
//! - an action slot rendered after the control, e.g. an "Add New" button
//!
//! ```
//! use backoffice_forms::{FieldChange, FieldDescriptor, FieldWrapper, MemoryStore, RenderContext};
//! use serde_json::json;
//!
//! let store = MemoryStore::new().with_value("title", json!("Pilot"));
//! let ctx = RenderContext::new(&store, |_: FieldChange| {});
//!
//! let rendered = FieldWrapper::new(FieldDescriptor::text("title", "Title"))
//!     .index(2)
//!     .prop("maxlength", "120")
//!     .render(&ctx);
//!
//! assert_eq!(rendered.registration.name, "title2");
//! assert_eq!(rendered.registration.value, json!("Pilot"));
//! ```

use crate::context::{BuilderContext, RenderContext};
use crate::descriptor::FieldDescriptor;
use crate::field::{Control, FieldRegistration, RenderedField, change_emitter, control_id, scope_view};
use crate::options::resolve_options;
use backoffice_pages::{Callback, ElementView, EventType, IntoView, View};
use backoffice_validators::is_truthy;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// Builds a custom control element
pub type ElementBuilder = Rc<dyn Fn(&BuilderContext<'_>) -> ElementView>;

/// Attribute value added to the control
#[derive(Clone)]
pub enum Prop {
	Literal(String),
	Computed(Rc<dyn Fn(&BuilderContext<'_>) -> String>),
}

impl Prop {
	fn resolve(&self, ctx: &BuilderContext<'_>) -> String {
		match self {
			Prop::Literal(value) => value.clone(),
			Prop::Computed(f) => f(ctx),
		}
	}
}

/// Child appended to the control
#[derive(Clone)]
pub enum WrapperChild {
	Text(String),
	Builder(Rc<dyn Fn(&BuilderContext<'_>) -> View>),
}

/// Button rendered after the control; clicking it reports the field key
#[derive(Debug, Clone)]
pub struct ActionSlot {
	label: String,
	on_action: Callback<String>,
}

#[derive(Clone)]
pub struct FieldWrapper {
	descriptor: FieldDescriptor,
	key: String,
	value: Option<Value>,
	zero_is_value: bool,
	index: Option<usize>,
	element: Option<ElementBuilder>,
	props: Vec<(String, Prop)>,
	children: Vec<WrapperChild>,
	action: Option<ActionSlot>,
}

impl FieldWrapper {
	/// Wraps `descriptor`; the store key defaults to the descriptor name.
	pub fn new(descriptor: FieldDescriptor) -> Self {
		Self {
			key: descriptor.name().to_string(),
			descriptor,
			value: None,
			zero_is_value: false,
			index: None,
			element: None,
			props: Vec::new(),
			children: Vec::new(),
			action: None,
		}
	}

	pub fn key(mut self, key: impl Into<String>) -> Self {
		self.key = key.into();
		self
	}

	/// Explicit value, used when truthy
	pub fn value(mut self, value: Value) -> Self {
		self.value = Some(value);
		self
	}

	pub fn zero_is_value(mut self, enabled: bool) -> Self {
		self.zero_is_value = enabled;
		self
	}

	/// Position of this repetition in a repeated field
	pub fn index(mut self, index: usize) -> Self {
		self.index = Some(index);
		self
	}

	pub fn element<F>(mut self, builder: F) -> Self
	where
		F: Fn(&BuilderContext<'_>) -> ElementView + 'static,
	{
		self.element = Some(Rc::new(builder));
		self
	}

	pub fn prop(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.props.push((name.into(), Prop::Literal(value.into())));
		self
	}

	pub fn computed_prop<F>(mut self, name: impl Into<String>, f: F) -> Self
	where
		F: Fn(&BuilderContext<'_>) -> String + 'static,
	{
		self.props.push((name.into(), Prop::Computed(Rc::new(f))));
		self
	}

	pub fn text_child(mut self, text: impl Into<String>) -> Self {
		self.children.push(WrapperChild::Text(text.into()));
		self
	}

	pub fn child_builder<F>(mut self, f: F) -> Self
	where
		F: Fn(&BuilderContext<'_>) -> View + 'static,
	{
		self.children.push(WrapperChild::Builder(Rc::new(f)));
		self
	}

	pub fn action(mut self, label: impl Into<String>, on_action: impl Into<Callback<String>>) -> Self {
		self.action = Some(ActionSlot {
			label: label.into(),
			on_action: on_action.into(),
		});
		self
	}

	pub fn descriptor(&self) -> &FieldDescriptor {
		&self.descriptor
	}

	/// Rendered control name: the descriptor name, suffixed with the index
	/// unless it already ends in a digit.
	pub fn control_name(&self) -> String {
		let base = self.descriptor.name();
		match self.index {
			Some(index) if !base.ends_with(|c: char| c.is_ascii_digit()) => format!("{base}{index}"),
			_ => base.to_string(),
		}
	}

	/// Value bound to the control.
	pub fn resolve_value(&self, ctx: &RenderContext<'_>) -> Value {
		let present = |v: &Value| is_truthy(v) || (self.zero_is_value && is_zero(v));
		if let Some(value) = self.value.as_ref().filter(|v| present(*v)) {
			return value.clone();
		}
		let stored = ctx.store().get_store_value(&self.key);
		if present(&stored) {
			stored
		} else {
			Value::String(String::new())
		}
	}

	pub fn render(&self, ctx: &RenderContext<'_>) -> RenderedField {
		let name = self.control_name();
		let value = self.resolve_value(ctx);
		let on_change = change_emitter(ctx.on_change(), &name, &self.key, self.index);
		let builder_ctx = BuilderContext::new(&self.key, &name, self.index, &value, on_change.clone(), ctx.store());

		let (element, loading) = match &self.element {
			Some(build) => {
				let element = build(&builder_ctx);
				let element = if element.has_attr("name") {
					element
				} else {
					element.attr("name", name.clone()).attr("id", control_id(&name))
				};
				(element, false)
			}
			None => {
				let options = resolve_options(&self.descriptor, &self.key, ctx.store());
				let control = Control::build(&self.descriptor, &name, &value, &options, on_change);
				(control.element, control.loading)
			}
		};

		let mut element = element;
		for (attr, prop) in &self.props {
			element = element.attr(attr.clone(), prop.resolve(&builder_ctx));
		}
		for child in &self.children {
			element = match child {
				WrapperChild::Text(text) => element.child(text.clone()),
				WrapperChild::Builder(f) => element.child(f(&builder_ctx)),
			};
		}

		let control = Control { element, loading }.into_view();
		let after = self.action_view(&name);
		let error = ctx.error_for(&name, &self.key);

		RenderedField {
			view: scope_view(&name, self.descriptor.label(), control, error.as_deref(), after),
			registration: FieldRegistration {
				rules: self.descriptor.resolve_rules(ctx.store()),
				name,
				key: self.key.clone(),
				value,
			},
		}
	}

	fn action_view(&self, name: &str) -> View {
		let Some(action) = &self.action else {
			return View::empty();
		};
		let on_action = action.on_action.clone();
		let key = self.key.clone();
		View::element("button")
			.attr("type", "button")
			.attr("class", "field-action")
			.attr("name", format!("{name}-action"))
			.on_event(EventType::Click, move |_| on_action.call(key.clone()))
			.child(action.label.clone())
			.into_view()
	}
}

fn is_zero(value: &Value) -> bool {
	value.as_f64() == Some(0.0)
}

impl fmt::Debug for FieldWrapper {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldWrapper")
			.field("descriptor", &self.descriptor)
			.field("key", &self.key)
			.field("value", &self.value)
			.field("zero_is_value", &self.zero_is_value)
			.field("index", &self.index)
			.field("custom_element", &self.element.is_some())
			.field("props", &self.props.len())
			.field("children", &self.children.len())
			.field("action", &self.action)
			.finish()
	}
}
