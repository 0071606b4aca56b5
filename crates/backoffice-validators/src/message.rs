//! Message templates with positional placeholders

use crate::value::as_text;
use serde_json::Value;

/// Fills `{0}`, `{1}`, ... in `template` from `args`.
///
/// Placeholders without a matching argument are left untouched, as are
/// braces that do not enclose a plain index.
///
/// # Examples
///
/// ```
/// use backoffice_validators::message::format_message;
/// use serde_json::json;
///
/// let msg = format_message("Between {0} and {1} characters", &[json!(6), json!(255)]);
/// assert_eq!(msg, "Between 6 and 255 characters");
/// ```
pub fn format_message(template: &str, args: &[Value]) -> String {
	let mut output = String::with_capacity(template.len());
	let mut rest = template;

	while let Some(open) = rest.find('{') {
		output.push_str(&rest[..open]);
		let after = &rest[open + 1..];

		let replaced = after.find('}').and_then(|close| {
			let index: usize = after[..close].parse().ok()?;
			let arg = args.get(index)?;
			let text = as_text(arg).map(|t| t.into_owned()).unwrap_or_else(|| arg.to_string());
			Some((text, close))
		});

		match replaced {
			Some((text, close)) => {
				output.push_str(&text);
				rest = &after[close + 1..];
			}
			None => {
				output.push('{');
				rest = after;
			}
		}
	}

	output.push_str(rest);
	output
}
