//! Rule definitions and the built-in predicates

use crate::patterns::{
	EMAIL_REGEX, HOUR_MINUTE_SECONDS_REGEX, INTEGER_REGEX, MINUTE_SECONDS_REGEX,
};
use crate::value::{as_text, is_blank, is_truthy, js_length};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Predicate signature shared by every synchronous rule.
///
/// A plain function pointer keeps rules free of captured state: the result
/// depends on `(value, args)` only.
pub type RulePredicate = fn(&Value, &[Value]) -> bool;

/// How a failing rule affects submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	/// Blocks submission and is shown next to the field
	#[default]
	Error,
	/// Shown next to the field, submission still goes through
	Warning,
}

/// A named predicate with its message template
#[derive(Debug, Clone)]
pub struct ValidationRule {
	name: &'static str,
	severity: Severity,
	message: &'static str,
	arity: usize,
	validate: RulePredicate,
}

impl ValidationRule {
	/// Creates an error-level rule.
	///
	/// `arity` is the number of arguments the predicate reads from `args`.
	pub const fn new(
		name: &'static str,
		message: &'static str,
		arity: usize,
		validate: RulePredicate,
	) -> Self {
		Self {
			name,
			severity: Severity::Error,
			message,
			arity,
			validate,
		}
	}

	/// Downgrades the rule to a warning.
	pub const fn as_warning(mut self) -> Self {
		self.severity = Severity::Warning;
		self
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn severity(&self) -> Severity {
		self.severity
	}

	/// Raw message template, placeholders unfilled
	pub fn message(&self) -> &'static str {
		self.message
	}

	pub fn arity(&self) -> usize {
		self.arity
	}

	/// Runs the predicate. `true` means the value passes.
	pub fn validate(&self, value: &Value, args: &[Value]) -> bool {
		(self.validate)(value, args)
	}
}

/// Result of evaluating one rule against one value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
	pub rule: String,
	pub passed: bool,
	pub severity: Severity,
	pub message: String,
}

/// Shown for a rule the table cannot evaluate
pub const MISCONFIGURED_RULE_MESSAGE: &str = "This field could not be validated.";

impl RuleOutcome {
	/// A failing outcome for a rule that is unknown or lacks arguments
	pub fn misconfigured(rule: &str) -> Self {
		Self {
			rule: rule.to_string(),
			passed: false,
			severity: Severity::Error,
			message: MISCONFIGURED_RULE_MESSAGE.to_string(),
		}
	}

	/// Whether this outcome should stop a submission
	pub fn blocks_submit(&self) -> bool {
		!self.passed && self.severity == Severity::Error
	}
}

// ============================================================================
// Built-in predicates
// ============================================================================

fn number_arg(args: &[Value], index: usize) -> Option<f64> {
	match args.get(index)? {
		Value::Number(n) => n.as_f64(),
		Value::String(s) => s.trim().parse().ok(),
		_ => None,
	}
}

fn length_or_zero(value: &Value) -> f64 {
	js_length(value).unwrap_or(0) as f64
}

/// Strict equality; numbers compare by numeric value.
fn strict_equals(a: &Value, b: &Value) -> bool {
	match (a, b) {
		(Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
		_ => a == b,
	}
}

fn matches_text(value: &Value, regex: &regex::Regex) -> bool {
	as_text(value).is_some_and(|text| regex.is_match(&text))
}

// Known inconsistency: `0` is falsy and fails here, while field wrappers with
// `zero_is_value` treat `0` as a chosen value.
pub(crate) fn required(value: &Value, _args: &[Value]) -> bool {
	is_truthy(value)
		&& match value {
			Value::String(s) => !s.trim().is_empty(),
			_ => true,
		}
}

pub(crate) fn email(value: &Value, _args: &[Value]) -> bool {
	matches_text(value, &EMAIL_REGEX)
}

pub(crate) fn max_length(value: &Value, args: &[Value]) -> bool {
	number_arg(args, 0).is_some_and(|max| length_or_zero(value) <= max)
}

pub(crate) fn min_length(value: &Value, args: &[Value]) -> bool {
	number_arg(args, 0).is_some_and(|min| length_or_zero(value) >= min)
}

pub(crate) fn data_in_range(value: &Value, args: &[Value]) -> bool {
	match (number_arg(args, 0), number_arg(args, 1)) {
		(Some(min), Some(max)) => {
			let len = length_or_zero(value);
			min <= len && len <= max
		}
		_ => false,
	}
}

pub(crate) fn match_value(value: &Value, args: &[Value]) -> bool {
	args.first().is_some_and(|other| strict_equals(value, other))
}

pub(crate) fn minute_seconds(value: &Value, _args: &[Value]) -> bool {
	matches_text(value, &MINUTE_SECONDS_REGEX)
}

pub(crate) fn optional_minute_seconds(value: &Value, args: &[Value]) -> bool {
	is_empty_input(value) || minute_seconds(value, args)
}

pub(crate) fn hour_minute_seconds(value: &Value, _args: &[Value]) -> bool {
	matches_text(value, &HOUR_MINUTE_SECONDS_REGEX)
}

pub(crate) fn optional_hour_minute_seconds(value: &Value, args: &[Value]) -> bool {
	is_empty_input(value) || hour_minute_seconds(value, args)
}

fn is_empty_input(value: &Value) -> bool {
	matches!(value, Value::Null) || value.as_str().is_some_and(str::is_empty)
}

pub(crate) fn numeric_range(value: &Value, args: &[Value]) -> bool {
	let Some(text) = as_text(value) else {
		return false;
	};
	if !INTEGER_REGEX.is_match(&text) {
		return false;
	}
	let Ok(number) = text.parse::<i64>() else {
		return false;
	};
	// Leading zeros and "-0" re-stringify shorter than the input.
	if number.to_string().len() != text.len() {
		return false;
	}
	match (number_arg(args, 0), number_arg(args, 1)) {
		(Some(min), Some(max)) => {
			let n = number as f64;
			min <= n && n <= max
		}
		_ => false,
	}
}

pub(crate) fn required_one(value: &Value, args: &[Value]) -> bool {
	let alternate = args.first().unwrap_or(&Value::Null);
	!(is_blank(value) && is_blank(alternate))
}

/// The standard rules, in table order
pub(crate) const STANDARD_RULES: &[ValidationRule] = &[
	ValidationRule::new("required", "This field is required.", 0, required),
	ValidationRule::new("email", "Please enter a valid email address.", 0, email),
	ValidationRule::new(
		"maxLength",
		"Please enter no more than {0} characters.",
		1,
		max_length,
	),
	ValidationRule::new(
		"minLength",
		"Please enter at least {0} characters.",
		1,
		min_length,
	),
	ValidationRule::new(
		"dataInRange",
		"Please enter between {0} and {1} characters.",
		2,
		data_in_range,
	),
	ValidationRule::new("match", "Values do not match.", 1, match_value),
	ValidationRule::new(
		"minuteSeconds",
		"Please use the mm:ss format.",
		0,
		minute_seconds,
	),
	ValidationRule::new(
		"optionalMinuteSeconds",
		"Please use the mm:ss format.",
		0,
		optional_minute_seconds,
	),
	ValidationRule::new(
		"hourMinuteSeconds",
		"Please use the hh:mm:ss format.",
		0,
		hour_minute_seconds,
	),
	ValidationRule::new(
		"optionalHourMinuteSeconds",
		"Please use the hh:mm:ss format.",
		0,
		optional_hour_minute_seconds,
	),
	ValidationRule::new(
		"numericRange",
		"Please enter a whole number between {0} and {1}.",
		2,
		numeric_range,
	),
	ValidationRule::new(
		"requiredOne",
		"Please fill in at least one of these fields.",
		1,
		required_one,
	),
];
