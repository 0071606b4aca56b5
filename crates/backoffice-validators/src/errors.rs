//! Error types for the rule table

use thiserror::Error;

/// Configuration errors raised while looking up rules.
///
/// These indicate a programming mistake in a field descriptor, never a
/// user input problem.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
	/// No rule is registered under this name
	#[error("Unknown validation rule '{0}'")]
	UnknownRule(String),

	/// The rule needs more arguments than were supplied
	#[error("Validation rule '{rule}' expects {expected} argument(s), got {actual}")]
	MissingArguments {
		rule: String,
		expected: usize,
		actual: usize,
	},
}

/// Result type for rule lookups
pub type RuleResult<T> = Result<T, RuleError>;
