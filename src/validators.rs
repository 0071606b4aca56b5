//! Named validation rules
//!
//! Rules are looked up by name in a [`RuleTable`] and evaluated against a
//! JSON value plus positional arguments.
//!
//! ## Example
//!
//! ```rust
//! use backoffice::validators::RuleTable;
//! use serde_json::json;
//!
//! let table = RuleTable::standard();
//! let outcome = table.evaluate("dataInRange", &json!("abc"), &[json!(6), json!(255)]);
//! assert_eq!(outcome.message, "Please enter between 6 and 255 characters.");
//! ```

pub use backoffice_validators::*;
