//! Validation rules for BackOffice form fields
//!
//! This crate provides:
//! - A named rule table with message templates (`required`, `email`,
//!   `maxLength`, `dataInRange`, `match`, time formats, `numericRange`, ...)
//! - Positional `{N}` placeholder substitution for rule messages
//! - Value helpers reproducing browser truthiness and string length
//! - The server-backed `transcoding` rule

pub mod errors;
pub mod message;
mod patterns;
pub mod remote;
pub mod rule;
pub mod table;
pub mod value;

pub use errors::{RuleError, RuleResult};
pub use message::format_message;
pub use remote::{StatusProbe, TRANSCODING_RULE, TranscodingRule};
pub use rule::{MISCONFIGURED_RULE_MESSAGE, RuleOutcome, RulePredicate, Severity, ValidationRule};
pub use table::RuleTable;
pub use value::{as_text, is_blank, is_truthy, js_length};
