//! UI events delivered to view handlers

use serde_json::Value;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Kinds of events a view element can handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
	/// Committed value change (select, blur of a text input)
	Change,
	/// Keystroke-level value change
	Input,
	Click,
	Submit,
}

impl EventType {
	pub fn as_str(&self) -> &'static str {
		match self {
			EventType::Change => "change",
			EventType::Input => "input",
			EventType::Click => "click",
			EventType::Submit => "submit",
		}
	}
}

impl fmt::Display for EventType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for EventType {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"change" => Ok(EventType::Change),
			"input" => Ok(EventType::Input),
			"click" => Ok(EventType::Click),
			"submit" => Ok(EventType::Submit),
			other => Err(format!("Unknown event type: {}", other)),
		}
	}
}

/// An event carrying the target element's name and current value.
///
/// Handlers may call [`Event::prevent_default`]; the dispatcher reads the
/// flag back after all handlers ran.
#[derive(Debug, Clone)]
pub struct Event {
	event_type: EventType,
	target: Option<String>,
	value: Value,
	default_prevented: Cell<bool>,
}

impl Event {
	pub fn new(event_type: EventType, target: Option<String>, value: Value) -> Self {
		Self {
			event_type,
			target,
			value,
			default_prevented: Cell::new(false),
		}
	}

	/// A change event on the control named `target`
	pub fn change(target: impl Into<String>, value: Value) -> Self {
		Self::new(EventType::Change, Some(target.into()), value)
	}

	/// An input (keystroke) event on the control named `target`
	pub fn input(target: impl Into<String>, value: Value) -> Self {
		Self::new(EventType::Input, Some(target.into()), value)
	}

	pub fn click(target: impl Into<String>) -> Self {
		Self::new(EventType::Click, Some(target.into()), Value::Null)
	}

	/// A form submission
	pub fn submit() -> Self {
		Self::new(EventType::Submit, None, Value::Null)
	}

	pub fn event_type(&self) -> EventType {
		self.event_type
	}

	pub fn target(&self) -> Option<&str> {
		self.target.as_deref()
	}

	pub fn value(&self) -> &Value {
		&self.value
	}

	/// Stops the default action (for a submit: propagation to the form handler).
	pub fn prevent_default(&self) {
		self.default_prevented.set(true);
	}

	pub fn is_default_prevented(&self) -> bool {
		self.default_prevented.get()
	}
}

/// Handler attached to a view element
pub type ViewEventHandler = Rc<dyn Fn(&Event)>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("change", EventType::Change)]
	#[case("input", EventType::Input)]
	#[case("click", EventType::Click)]
	#[case("submit", EventType::Submit)]
	fn test_event_type_round_trips_through_str(#[case] name: &str, #[case] expected: EventType) {
		let parsed: EventType = name.parse().unwrap();
		assert_eq!(parsed, expected);
		assert_eq!(parsed.to_string(), name);
	}

	#[rstest]
	fn test_unknown_event_type() {
		assert!("hover".parse::<EventType>().is_err());
	}

	#[rstest]
	fn test_prevent_default_through_shared_reference() {
		// Arrange
		let event = Event::change("email", json!("a@b.co"));
		let handler: ViewEventHandler = Rc::new(|e: &Event| e.prevent_default());

		// Act
		handler(&event);

		// Assert
		assert!(event.is_default_prevented());
		assert_eq!(event.target(), Some("email"));
		assert_eq!(event.value(), &json!("a@b.co"));
	}
}
