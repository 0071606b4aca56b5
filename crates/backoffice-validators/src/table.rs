//! Rule table: lookup by name and evaluation

use crate::errors::{RuleError, RuleResult};
use crate::message::format_message;
use crate::rule::{RuleOutcome, STANDARD_RULES, ValidationRule};
use serde_json::Value;
use std::collections::HashMap;

/// Mapping from rule name to [`ValidationRule`].
///
/// Rules are looked up by name at evaluation time. A name that is not in the
/// table is a configuration bug: [`RuleTable::try_evaluate`] reports it as a
/// [`RuleError`], while [`RuleTable::evaluate`] logs it and fails the value.
///
/// # Examples
///
/// ```
/// use backoffice_validators::RuleTable;
/// use serde_json::json;
///
/// let table = RuleTable::standard();
///
/// let outcome = table.evaluate("maxLength", &json!("abcdef"), &[json!(5)]);
/// assert!(!outcome.passed);
/// assert_eq!(outcome.message, "Please enter no more than 5 characters.");
/// ```
#[derive(Debug, Clone)]
pub struct RuleTable {
	rules: HashMap<&'static str, ValidationRule>,
}

impl RuleTable {
	/// An empty table
	pub fn empty() -> Self {
		Self {
			rules: HashMap::new(),
		}
	}

	/// A table holding every built-in rule
	pub fn standard() -> Self {
		let mut table = Self::empty();
		for rule in STANDARD_RULES {
			table.register(rule.clone());
		}
		table
	}

	/// Adds a rule, replacing any rule with the same name.
	pub fn register(&mut self, rule: ValidationRule) {
		self.rules.insert(rule.name(), rule);
	}

	pub fn get(&self, name: &str) -> Option<&ValidationRule> {
		self.rules.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.rules.contains_key(name)
	}

	/// Rule names in alphabetical order
	pub fn names(&self) -> Vec<&'static str> {
		let mut names: Vec<_> = self.rules.keys().copied().collect();
		names.sort_unstable();
		names
	}

	/// Checks that `name` exists and receives enough arguments.
	pub fn check(&self, name: &str, arg_count: usize) -> RuleResult<&ValidationRule> {
		let rule = self
			.get(name)
			.ok_or_else(|| RuleError::UnknownRule(name.to_string()))?;
		if arg_count < rule.arity() {
			return Err(RuleError::MissingArguments {
				rule: name.to_string(),
				expected: rule.arity(),
				actual: arg_count,
			});
		}
		Ok(rule)
	}

	/// Evaluates a rule, reporting configuration problems as errors.
	pub fn try_evaluate(&self, name: &str, value: &Value, args: &[Value]) -> RuleResult<RuleOutcome> {
		let rule = self.check(name, args.len())?;
		let passed = rule.validate(value, args);
		if !passed {
			tracing::debug!(rule = name, "validation rule failed");
		}
		Ok(RuleOutcome {
			rule: name.to_string(),
			passed,
			severity: rule.severity(),
			message: format_message(rule.message(), args),
		})
	}

	/// Evaluates a rule against a value.
	///
	/// An unknown rule or a short argument list is logged and counts as a
	/// failure, see [`RuleOutcome::misconfigured`].
	pub fn evaluate(&self, name: &str, value: &Value, args: &[Value]) -> RuleOutcome {
		self.try_evaluate(name, value, args).unwrap_or_else(|err| {
			tracing::error!(rule = name, error = %err, "validation rule cannot be evaluated");
			RuleOutcome::misconfigured(name)
		})
	}
}

impl Default for RuleTable {
	fn default() -> Self {
		Self::standard()
	}
}
