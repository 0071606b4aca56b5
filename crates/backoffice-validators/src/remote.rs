//! Server-backed validation
//!
//! The `transcoding` rule cannot be decided locally: it asks the backend
//! whether a transcoded asset exists for the entered identifier and maps the
//! response status to a pass or to a status-specific message.

use crate::rule::{RuleOutcome, Severity};
use async_trait::async_trait;

/// Name under which the transcoding rule reports its outcomes
pub const TRANSCODING_RULE: &str = "transcoding";

/// Issues an existence check and returns the HTTP status of the response.
///
/// Implementations report transport failures as status `0`.
#[async_trait(?Send)]
pub trait StatusProbe {
	async fn probe(&self, value: &str) -> u16;
}

/// Asynchronous rule checking that a transcoded asset exists.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use backoffice_validators::remote::{StatusProbe, TranscodingRule};
///
/// struct AlwaysFound;
///
/// #[async_trait(?Send)]
/// impl StatusProbe for AlwaysFound {
///     async fn probe(&self, _value: &str) -> u16 {
///         200
///     }
/// }
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let rule = TranscodingRule::new(AlwaysFound);
/// assert!(rule.evaluate("media-42").await.passed);
/// # });
/// ```
pub struct TranscodingRule<P> {
	probe: P,
}

impl<P: StatusProbe> TranscodingRule<P> {
	pub fn new(probe: P) -> Self {
		Self { probe }
	}

	/// Message shown for a failing status
	pub fn message_for_status(status: u16) -> &'static str {
		match status {
			400 => "This identifier is not valid.",
			404 => "No transcoded media was found for this identifier.",
			409 => "This media is still being transcoded.",
			401 | 403 => "You are not allowed to check this media.",
			_ => "The transcoding status could not be verified.",
		}
	}

	/// Checks `value` against the backend.
	///
	/// A blank value fails without a request.
	pub async fn evaluate(&self, value: &str) -> RuleOutcome {
		let value = value.trim();
		if value.is_empty() {
			return Self::outcome(false, "Please enter a media identifier.");
		}

		let status = self.probe.probe(value).await;
		if status == 200 {
			return Self::outcome(true, "");
		}

		tracing::debug!(rule = TRANSCODING_RULE, status, "validation rule failed");
		Self::outcome(false, Self::message_for_status(status))
	}

	fn outcome(passed: bool, message: &str) -> RuleOutcome {
		RuleOutcome {
			rule: TRANSCODING_RULE.to_string(),
			passed,
			severity: Severity::Error,
			message: message.to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::cell::RefCell;

	struct FixedStatus {
		status: u16,
		seen: RefCell<Vec<String>>,
	}

	impl FixedStatus {
		fn new(status: u16) -> Self {
			Self {
				status,
				seen: RefCell::new(Vec::new()),
			}
		}
	}

	#[async_trait(?Send)]
	impl StatusProbe for FixedStatus {
		async fn probe(&self, value: &str) -> u16 {
			self.seen.borrow_mut().push(value.to_string());
			self.status
		}
	}

	#[rstest]
	#[case(200, true, "")]
	#[case(404, false, "No transcoded media was found for this identifier.")]
	#[case(409, false, "This media is still being transcoded.")]
	#[case(403, false, "You are not allowed to check this media.")]
	#[case(0, false, "The transcoding status could not be verified.")]
	#[case(500, false, "The transcoding status could not be verified.")]
	#[tokio::test]
	async fn test_status_maps_to_outcome(
		#[case] status: u16,
		#[case] passed: bool,
		#[case] message: &str,
	) {
		// Arrange
		let rule = TranscodingRule::new(FixedStatus::new(status));

		// Act
		let outcome = rule.evaluate("media-42").await;

		// Assert
		assert_eq!(outcome.passed, passed);
		assert_eq!(outcome.message, message);
		assert_eq!(outcome.rule, TRANSCODING_RULE);
	}

	#[tokio::test]
	async fn test_blank_value_skips_probe() {
		// Arrange
		let rule = TranscodingRule::new(FixedStatus::new(200));

		// Act
		let outcome = rule.evaluate("   ").await;

		// Assert
		assert!(!outcome.passed);
		assert!(rule.probe.seen.borrow().is_empty());
	}

	#[tokio::test]
	async fn test_value_is_trimmed_before_probe() {
		let rule = TranscodingRule::new(FixedStatus::new(200));

		rule.evaluate("  media-7 ").await;

		assert_eq!(rule.probe.seen.borrow().as_slice(), ["media-7".to_string()]);
	}
}
