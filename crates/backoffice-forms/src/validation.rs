//! Form validation container
//!
//! [`FormValidation`] gates a form's submission. It is mounted once per form
//! and renders the `<form>` element around the fields of each render pass.
//! Validation is driven only by submit events dispatched into the rendered
//! view:
//!
//! ```text
//! Idle --submit--> Validating --all pass--> Submitted (on_submit called)
//!                            \--any fail--> Blocked (event prevented, errors set)
//! ```
//!
//! Each field's rules run in declared order against the value the form holds
//! at submit time; the first failing rule supplies the field's message.
//! Store-backed rule arguments naming another control of the form take that
//! control's value at submit time.
//! Errors are published through [`FormValidation::errors`] so the owner can
//! re-render with them.

use crate::field::{FieldRegistration, RenderedField};
use backoffice_pages::{Callback, Event, EventType, IntoView, Observable, View};
use backoffice_validators::{RuleOutcome, RuleTable};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Per-field error messages keyed by control name
pub type FormErrors = IndexMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
	Idle,
	Validating,
	/// Last submit passed and reached `on_submit`
	Submitted,
	/// Last submit was stopped by at least one failing rule
	Blocked,
}

/// Control values of the form at the moment of submit, in render order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormSnapshot {
	values: IndexMap<String, Value>,
}

impl FormSnapshot {
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.values.get(name)
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.values.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn into_values(self) -> IndexMap<String, Value> {
		self.values
	}
}

/// Submission gate for one mounted form
pub struct FormValidation {
	table: Rc<RuleTable>,
	on_submit: Callback<FormSnapshot>,
	state: Cell<FormState>,
	errors: Observable<FormErrors>,
	external: RefCell<FormErrors>,
	registrations: RefCell<Vec<FieldRegistration>>,
	live: RefCell<IndexMap<String, Value>>,
	submit_count: Cell<usize>,
}

impl FormValidation {
	pub fn new(table: Rc<RuleTable>, on_submit: impl Into<Callback<FormSnapshot>>) -> Rc<Self> {
		Rc::new(Self {
			table,
			on_submit: on_submit.into(),
			state: Cell::new(FormState::Idle),
			errors: Observable::default(),
			external: RefCell::new(IndexMap::new()),
			registrations: RefCell::new(Vec::new()),
			live: RefCell::new(IndexMap::new()),
			submit_count: Cell::new(0),
		})
	}

	/// Renders the form around `fields`, followed by `extra` (buttons etc.).
	///
	/// The fields' registrations replace those of the previous render, and
	/// values typed since then are discarded in favour of the rendered ones.
	pub fn render(self: &Rc<Self>, fields: Vec<RenderedField>, extra: impl IntoView) -> View {
		let mut views = Vec::with_capacity(fields.len());
		let mut registrations = Vec::with_capacity(fields.len());
		for field in fields {
			views.push(field.view);
			registrations.push(field.registration);
		}
		*self.registrations.borrow_mut() = registrations;
		self.live.borrow_mut().clear();

		let on_submit = Rc::clone(self);
		let on_change = Rc::clone(self);
		let on_input = Rc::clone(self);
		View::element("form")
			.attr("novalidate", "novalidate")
			.on_event(EventType::Submit, move |e| on_submit.handle_submit(e))
			.on_event(EventType::Change, move |e| on_change.track(e))
			.on_event(EventType::Input, move |e| on_input.track(e))
			.children(views)
			.child(extra)
			.into_view()
	}

	pub fn state(&self) -> FormState {
		self.state.get()
	}

	/// Current errors; subscribe to re-render when they change
	pub fn errors(&self) -> &Observable<FormErrors> {
		&self.errors
	}

	pub fn error_for(&self, name: &str) -> Option<String> {
		self.errors.with(|errors| errors.get(name).cloned())
	}

	/// Number of submissions that passed validation
	pub fn submit_count(&self) -> usize {
		self.submit_count.get()
	}

	/// Records an error found outside the rule table, e.g. by an async check.
	///
	/// It blocks submission until the field changes or
	/// [`FormValidation::clear_error`] is called.
	pub fn set_error(&self, name: impl Into<String>, message: impl Into<String>) {
		let name = name.into();
		let message = message.into();
		self.external.borrow_mut().insert(name.clone(), message.clone());
		self.errors.update(|errors| {
			errors.insert(name, message);
		});
	}

	pub fn clear_error(&self, name: &str) {
		let removed = self.external.borrow_mut().shift_remove(name).is_some();
		if removed || self.error_for(name).is_some() {
			self.errors.update(|errors| {
				errors.shift_remove(name);
			});
		}
	}

	fn track(&self, event: &Event) {
		let Some(name) = event.target() else {
			return;
		};
		let known = self.registrations.borrow().iter().any(|r| r.name == name);
		if !known {
			return;
		}
		self.live
			.borrow_mut()
			.insert(name.to_string(), event.value().clone());
		self.clear_error(name);
	}

	fn snapshot(&self) -> FormSnapshot {
		let live = self.live.borrow();
		let values = self
			.registrations
			.borrow()
			.iter()
			.map(|r| {
				let value = live.get(&r.name).unwrap_or(&r.value).clone();
				(r.name.clone(), value)
			})
			.collect();
		FormSnapshot { values }
	}

	fn validate(&self, snapshot: &FormSnapshot) -> FormErrors {
		let mut errors = FormErrors::new();
		for registration in self.registrations.borrow().iter() {
			let value = snapshot.get(&registration.name).unwrap_or(&Value::Null);
			let failure = registration.rules.iter().find_map(|rule| {
				let args = rule.args_with(|key| snapshot.get(key).cloned());
				let outcome = self
					.table
					.try_evaluate(&rule.name, value, &args)
					.unwrap_or_else(|err| {
						tracing::error!(field = %registration.name, error = %err, "rule cannot be evaluated");
						RuleOutcome::misconfigured(&rule.name)
					});
				outcome
					.blocks_submit()
					.then(|| rule.custom_message.clone().unwrap_or(outcome.message))
			});
			if let Some(message) = failure {
				tracing::debug!(field = %registration.name, "field failed validation");
				errors.insert(registration.name.clone(), message);
			}
		}
		for (name, message) in self.external.borrow().iter() {
			errors.entry(name.clone()).or_insert_with(|| message.clone());
		}
		errors
	}

	fn handle_submit(&self, event: &Event) {
		self.state.set(FormState::Validating);
		let snapshot = self.snapshot();
		let errors = self.validate(&snapshot);

		if errors.is_empty() {
			self.errors.set(errors);
			self.state.set(FormState::Submitted);
			self.submit_count.set(self.submit_count.get() + 1);
			self.on_submit.call(snapshot);
		} else {
			event.prevent_default();
			self.state.set(FormState::Blocked);
			self.errors.set(errors);
		}
	}
}

impl std::fmt::Debug for FormValidation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FormValidation")
			.field("state", &self.state.get())
			.field("errors", &*self.errors.borrow())
			.field("fields", &self.registrations.borrow().len())
			.field("submit_count", &self.submit_count.get())
			.finish()
	}
}
