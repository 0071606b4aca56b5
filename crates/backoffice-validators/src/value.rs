//! Value helpers with browser-compatible semantics
//!
//! Field values travel as [`serde_json::Value`]. Rules compare against the
//! values a browser form would hold, so truthiness and string length follow
//! the same conventions a script engine applies to them.

use serde_json::Value;
use std::borrow::Cow;

/// Returns whether a value is truthy.
///
/// `null`, `false`, `0`, `NaN` and the empty string are falsy. Every array and
/// object is truthy, including empty ones.
///
/// # Examples
///
/// ```
/// use backoffice_validators::value::is_truthy;
/// use serde_json::json;
///
/// assert!(is_truthy(&json!("a")));
/// assert!(is_truthy(&json!([])));
/// assert!(!is_truthy(&json!(0)));
/// assert!(!is_truthy(&json!("")));
/// ```
pub fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
		Value::String(s) => !s.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}

/// Length of a value as a script `length` property would report it.
///
/// Strings are measured in UTF-16 code units and arrays by element count.
/// Anything else has no length.
pub fn js_length(value: &Value) -> Option<usize> {
	match value {
		Value::String(s) => Some(s.encode_utf16().count()),
		Value::Array(items) => Some(items.len()),
		_ => None,
	}
}

/// String form of a scalar value.
///
/// Numbers and booleans are stringified, `null` becomes the empty string.
/// Arrays and objects yield `None`.
pub fn as_text(value: &Value) -> Option<Cow<'_, str>> {
	match value {
		Value::String(s) => Some(Cow::Borrowed(s.as_str())),
		Value::Number(n) => Some(Cow::Owned(n.to_string())),
		Value::Bool(b) => Some(Cow::Owned(b.to_string())),
		Value::Null => Some(Cow::Borrowed("")),
		Value::Array(_) | Value::Object(_) => None,
	}
}

/// Whether a value is empty after trimming.
///
/// `null` and whitespace-only strings are blank; numbers, booleans and
/// collections never are.
pub fn is_blank(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::String(s) => s.trim().is_empty(),
		_ => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(json!(null), false)]
	#[case(json!(false), false)]
	#[case(json!(true), true)]
	#[case(json!(0), false)]
	#[case(json!(0.0), false)]
	#[case(json!(-1), true)]
	#[case(json!(""), false)]
	#[case(json!(" "), true)]
	#[case(json!([]), true)]
	#[case(json!({}), true)]
	fn test_is_truthy(#[case] value: Value, #[case] expected: bool) {
		assert_eq!(is_truthy(&value), expected);
	}

	#[rstest]
	fn test_js_length_counts_utf16_units() {
		// Arrange
		let ascii = json!("abcde");
		let astral = json!("😀");

		// Act + Assert
		assert_eq!(js_length(&ascii), Some(5));
		assert_eq!(js_length(&astral), Some(2));
		assert_eq!(js_length(&json!([1, 2, 3])), Some(3));
		assert_eq!(js_length(&json!(12)), None);
	}

	#[rstest]
	#[case(json!(null), true)]
	#[case(json!("   "), true)]
	#[case(json!(" a "), false)]
	#[case(json!(0), false)]
	fn test_is_blank(#[case] value: Value, #[case] expected: bool) {
		assert_eq!(is_blank(&value), expected);
	}

	#[rstest]
	fn test_as_text() {
		assert_eq!(as_text(&json!(42)).as_deref(), Some("42"));
		assert_eq!(as_text(&json!(null)).as_deref(), Some(""));
		assert_eq!(as_text(&json!("x")).as_deref(), Some("x"));
		assert!(as_text(&json!([1])).is_none());
	}
}
