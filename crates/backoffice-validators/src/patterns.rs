//! Compiled patterns shared by the rule table.

use regex::Regex;
use std::sync::LazyLock;

// `\w` is spelled out as ASCII word characters so that non-ASCII letters are
// rejected the same way a browser regex engine rejects them.
pub(crate) static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"^[A-Za-z0-9_]+([-+.'][A-Za-z0-9_]+)*@[A-Za-z0-9_]+([-.][A-Za-z0-9_]+)*\.[A-Za-z0-9_]+([-.][A-Za-z0-9_]+)*$",
	)
	.expect("EMAIL_REGEX: invalid regex pattern")
});

// Two-digit minutes and seconds, each within 00-59.
pub(crate) static MINUTE_SECONDS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[0-5][0-9]:[0-5][0-9]$").expect("MINUTE_SECONDS_REGEX: invalid regex pattern")
});

// Two-digit hours (00-99), then minutes and seconds within 00-59.
pub(crate) static HOUR_MINUTE_SECONDS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[0-9]{2}:[0-5][0-9]:[0-5][0-9]$")
		.expect("HOUR_MINUTE_SECONDS_REGEX: invalid regex pattern")
});

// Optional leading minus followed by ASCII digits only.
pub(crate) static INTEGER_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^-?[0-9]+$").expect("INTEGER_REGEX: invalid regex pattern"));
