//! Field renderer
//!
//! [`Field::render`] turns a [`FieldDescriptor`] and a value into the control
//! markup, wrapped in its own error scope, and returns the registration the
//! enclosing [`FormValidation`](crate::FormValidation) validates on submit.
//!
//! Scope markup:
//!
//! ```text
//! <div class="form-group [has-error]" data-field="{name}">
//!   <label for="field-{name}">{label}</label>
//!   {control}
//!   [<span class="loading-indicator">Loading…</span>]
//!   [<span class="error-message">{message}</span>]
//! </div>
//! ```

use crate::context::{FieldChange, RenderContext};
use crate::descriptor::{ElementType, FieldDescriptor, ResolvedRule};
use crate::options::{ResolvedOptions, SelectOption, resolve_options};
use backoffice_pages::{Callback, ElementView, EventType, IntoView, View};
use backoffice_validators::as_text;
use serde_json::Value;

pub const LOADING_TEXT: &str = "Loading…";

/// What the form container needs to validate one rendered control
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRegistration {
	pub name: String,
	pub key: String,
	/// Value bound at render time
	pub value: Value,
	/// Rules with arguments resolved during this render
	pub rules: Vec<ResolvedRule>,
}

#[derive(Debug)]
pub struct RenderedField {
	pub view: View,
	pub registration: FieldRegistration,
}

/// Renders built-in controls from a descriptor
pub struct Field;

impl Field {
	pub fn render(descriptor: &FieldDescriptor, value: &Value, ctx: &RenderContext<'_>) -> RenderedField {
		let name = descriptor.name();
		let options = resolve_options(descriptor, name, ctx.store());
		let on_change = change_emitter(ctx.on_change(), name, name, None);
		let control = Control::build(descriptor, name, value, &options, on_change);
		let error = ctx.error_for(name, name);

		RenderedField {
			view: scope_view(name, descriptor.label(), control.into_view(), error.as_deref(), View::empty()),
			registration: FieldRegistration {
				name: name.to_string(),
				key: name.to_string(),
				value: value.clone(),
				rules: descriptor.resolve_rules(ctx.store()),
			},
		}
	}
}

pub(crate) fn control_id(name: &str) -> String {
	format!("field-{name}")
}

/// Maps a raw control value to a [`FieldChange`] for `name`.
pub(crate) fn change_emitter(
	on_change: &Callback<FieldChange>,
	name: &str,
	key: &str,
	index: Option<usize>,
) -> Callback<Value> {
	let on_change = on_change.clone();
	let name = name.to_string();
	let key = key.to_string();
	Callback::new(move |value: Value| {
		on_change.call(FieldChange {
			name: name.clone(),
			key: key.clone(),
			index,
			value,
		})
	})
}

/// A control element plus whether its options are still loading
pub(crate) struct Control {
	pub element: ElementView,
	pub loading: bool,
}

impl Control {
	pub fn build(
		descriptor: &FieldDescriptor,
		name: &str,
		value: &Value,
		options: &ResolvedOptions,
		on_change: Callback<Value>,
	) -> Self {
		let text = value_text(value);
		let element = match descriptor.element_type() {
			ElementType::Text => View::element("input")
				.attr("type", "text")
				.attr("value", text),
			ElementType::Password => View::element("input").attr("type", "password"),
			ElementType::Textarea => View::element("textarea").child(text),
			ElementType::Select => {
				let mut select = View::element("select");
				if let Some(placeholder) = descriptor.placeholder_text() {
					select = select.child(
						View::element("option")
							.attr("value", "")
							.bool_attr("selected", text.is_empty())
							.child(placeholder.to_string()),
					);
				}
				select.children(option_views(options, |v| v == text))
			}
			ElementType::Multiselect => {
				let chosen = chosen_values(value);
				View::element("select")
					.bool_attr("multiple", true)
					.children(option_views(options, |v| chosen.iter().any(|c| c == v)))
			}
		};

		let element = element
			.attr("name", name.to_string())
			.attr("id", control_id(name));
		let element = bind_change(element, descriptor.element_type(), on_change);

		Self {
			element,
			loading: options.is_loading(),
		}
	}

	pub fn into_view(self) -> View {
		if self.loading {
			View::fragment(vec![
				self.element.bool_attr("disabled", true).into_view(),
				loading_indicator(),
			])
		} else {
			self.element.into_view()
		}
	}
}

fn bind_change(element: ElementView, element_type: ElementType, on_change: Callback<Value>) -> ElementView {
	let element = match element_type {
		ElementType::Text | ElementType::Password | ElementType::Textarea => {
			let on_input = on_change.clone();
			element.on_event(EventType::Input, move |e| on_input.call(e.value().clone()))
		}
		ElementType::Select | ElementType::Multiselect => element,
	};
	element.on_event(EventType::Change, move |e| on_change.call(e.value().clone()))
}

fn option_views(options: &ResolvedOptions, is_selected: impl Fn(&str) -> bool) -> Vec<View> {
	match options {
		ResolvedOptions::Ready(items) => items.iter().map(|o| option_view(o, is_selected(&o.value))).collect(),
		ResolvedOptions::Loading | ResolvedOptions::NotApplicable => Vec::new(),
	}
}

fn option_view(option: &SelectOption, selected: bool) -> View {
	View::element("option")
		.attr("value", option.value.clone())
		.bool_attr("selected", selected)
		.bool_attr("disabled", option.disabled)
		.child(option.label.clone())
		.into_view()
}

fn loading_indicator() -> View {
	View::element("span")
		.attr("class", "loading-indicator")
		.child(LOADING_TEXT)
		.into_view()
}

/// Wraps a control in its label and error scope.
pub(crate) fn scope_view(name: &str, label: &str, control: View, error: Option<&str>, after: View) -> View {
	let class = if error.is_some() { "form-group has-error" } else { "form-group" };
	let error = error.map(|message| {
		View::element("span")
			.attr("class", "error-message")
			.child(message.to_string())
	});

	View::element("div")
		.attr("class", class)
		.attr("data-field", name.to_string())
		.child(
			View::element("label")
				.attr("for", control_id(name))
				.child(label.to_string()),
		)
		.child(control)
		.child(after)
		.child(error)
		.into_view()
}

pub(crate) fn value_text(value: &Value) -> String {
	as_text(value).map(|t| t.into_owned()).unwrap_or_default()
}

fn chosen_values(value: &Value) -> Vec<String> {
	match value {
		Value::Array(items) => items.iter().map(value_text).collect(),
		Value::Null => Vec::new(),
		scalar => vec![value_text(scalar)],
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::descriptor::RuleSpec;
	use crate::memory::MemoryStore;
	use backoffice_pages::Event;
	use backoffice_stores::{FieldStore, ReferenceKey};
	use rstest::rstest;
	use serde_json::json;
	use std::cell::RefCell;
	use std::rc::Rc;

	fn recording() -> (Rc<RefCell<Vec<FieldChange>>>, Callback<FieldChange>) {
		let seen = Rc::new(RefCell::new(Vec::new()));
		let sink = Rc::clone(&seen);
		(seen, Callback::new(move |change: FieldChange| sink.borrow_mut().push(change)))
	}

	#[rstest]
	fn test_text_field_markup() {
		// Arrange
		let store = MemoryStore::new();
		let (_, on_change) = recording();
		let ctx = RenderContext::new(&store, on_change);
		let field = FieldDescriptor::text("title", "Title");

		// Act
		let rendered = Field::render(&field, &json!("Dune"), &ctx);

		// Assert
		assert_eq!(
			rendered.view.render_to_string(),
			"<div class=\"form-group\" data-field=\"title\"><label for=\"field-title\">Title</label>\
			 <input type=\"text\" value=\"Dune\" name=\"title\" id=\"field-title\" /></div>"
		);
		assert_eq!(rendered.registration.value, json!("Dune"));
	}

	#[rstest]
	fn test_password_field_does_not_echo_value() {
		// Arrange
		let store = MemoryStore::new();
		let (seen, on_change) = recording();
		let ctx = RenderContext::new(&store, on_change);
		let field = FieldDescriptor::password("password", "Password");

		// Act
		let rendered = Field::render(&field, &json!("secret1"), &ctx);
		rendered.view.dispatch(&Event::input("password", json!("secret2")));

		// Assert
		assert_eq!(
			rendered.view.render_to_string(),
			"<div class=\"form-group\" data-field=\"password\"><label for=\"field-password\">Password</label>\
			 <input type=\"password\" name=\"password\" id=\"field-password\" /></div>"
		);
		assert_eq!(rendered.registration.value, json!("secret1"));
		assert_eq!(seen.borrow()[0].value, json!("secret2"));
	}

	#[rstest]
	fn test_input_and_change_report_value() {
		// Arrange
		let store = MemoryStore::new();
		let (seen, on_change) = recording();
		let ctx = RenderContext::new(&store, on_change);
		let rendered = Field::render(&FieldDescriptor::textarea("summary", "Summary"), &Value::Null, &ctx);

		// Act
		rendered.view.dispatch(&Event::input("summary", json!("A")));
		rendered.view.dispatch(&Event::change("summary", json!("AB")));

		// Assert
		let seen = seen.borrow();
		assert_eq!(seen.len(), 2);
		assert_eq!(seen[1].key, "summary");
		assert_eq!(seen[1].value, json!("AB"));
		assert_eq!(seen[1].index, None);
	}

	#[rstest]
	fn test_select_with_placeholder_and_selection() {
		// Arrange
		let store = MemoryStore::new();
		let ctx = RenderContext::new(&store, |_: FieldChange| {});
		let field = FieldDescriptor::select("lang", "Language")
			.static_options(vec![json!({"id": "en", "name": "English"}), json!({"id": "fr", "name": "French"})])
			.placeholder("Choose")
			.disabled_when(|v| v == "en");

		// Act
		let view = Field::render(&field, &json!("fr"), &ctx).view;

		// Assert
		let options = view.find_all_by_tag("option");
		assert_eq!(options.len(), 3);
		assert_eq!(options[0].get_attr("value"), Some(""));
		assert!(!options[0].has_attr("selected"));
		assert!(options[1].has_attr("disabled"));
		assert!(options[2].has_attr("selected"));
		assert_eq!(options[2].text_content(), "French");
	}

	#[rstest]
	fn test_multiselect_marks_every_chosen_value() {
		let store = MemoryStore::new();
		let ctx = RenderContext::new(&store, |_: FieldChange| {});
		let field = FieldDescriptor::multiselect("langs", "Languages")
			.static_options(vec![json!({"id": 1, "name": "A"}), json!({"id": 2, "name": "B"}), json!({"id": 3, "name": "C"})]);

		let view = Field::render(&field, &json!([1, 3]), &ctx).view;

		let select = view.find_by_name("langs").map(|el| el.has_attr("multiple"));
		let selected: Vec<_> = view
			.find_all(|el| el.tag_name() == "option" && el.has_attr("selected"))
			.iter()
			.map(|el| el.text_content())
			.collect();
		assert_eq!(select, Some(true));
		assert_eq!(selected, vec!["A", "C"]);
	}

	#[rstest]
	fn test_loading_select_shows_indicator_only() {
		// Arrange
		let store = MemoryStore::new();
		let ctx = RenderContext::new(&store, |_: FieldChange| {});
		let field = FieldDescriptor::select("genre", "Genre")
			.options_from_store(ReferenceKey::Genres)
			.placeholder("Choose");

		// Act
		let view = Field::render(&field, &Value::Null, &ctx).view;

		// Assert
		assert_eq!(view.find_all_by_class("loading-indicator").len(), 1);
		assert_eq!(view.find_all(|el| el.tag_name() == "option" && el.get_attr("value") != Some("")).len(), 0);
		assert!(view.find_by_name("genre").is_some_and(|el| el.has_attr("disabled")));
	}

	#[rstest]
	fn test_error_scope_and_server_fallback() {
		// Arrange
		struct ServerErrors(MemoryStore);
		impl FieldStore for ServerErrors {
			fn get_store_value(&self, key: &str) -> Value {
				self.0.get_store_value(key)
			}
			fn set_field(&self, key: &str, value: Value) {
				self.0.set_field(key, value)
			}
			fn store_property(&self, query: &backoffice_stores::OptionQuery) -> Option<Vec<Value>> {
				self.0.store_property(query)
			}
			fn request_options(&self, query: &backoffice_stores::OptionQuery) {
				self.0.request_options(query)
			}
			fn server_error(&self, key: &str) -> Option<String> {
				(key == "slug").then(|| "Slug already taken".to_string())
			}
		}
		let store = ServerErrors(MemoryStore::new());
		let ctx = RenderContext::new(&store, |_: FieldChange| {});

		// Act
		let slug = Field::render(&FieldDescriptor::text("slug", "Slug"), &json!("a"), &ctx).view;
		let title = Field::render(&FieldDescriptor::text("title", "Title"), &json!("a"), &ctx).view;

		// Assert
		assert!(slug.find_all_by_class("form-group")[0].has_class("has-error"));
		assert_eq!(slug.find_all_by_class("error-message")[0].text_content(), "Slug already taken");
		assert!(title.find_all_by_class("error-message").is_empty());
	}

	#[rstest]
	fn test_dynamic_rule_args_resolved_each_render() {
		// Arrange
		let store = MemoryStore::new().with_value("password", json!("one"));
		let ctx = RenderContext::new(&store, |_: FieldChange| {});
		let confirm = FieldDescriptor::text("confirm", "Confirm")
			.rule_spec(RuleSpec::new("match").store_arg("password"));

		// Act
		let first = Field::render(&confirm, &json!(""), &ctx).registration;
		store.set_field("password", json!("two"));
		let second = Field::render(&confirm, &json!(""), &ctx).registration;

		// Assert
		assert_eq!(first.rules[0].args, vec![json!("one")]);
		assert_eq!(second.rules[0].args, vec![json!("two")]);
	}
}
