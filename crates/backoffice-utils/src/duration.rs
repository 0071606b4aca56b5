//! `HH:MM:SS` durations used by episode and media fields

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
	#[error("Duration must be HH:MM:SS or MM:SS, got '{0}'")]
	Format(String),
	#[error("{unit} must be below 60, got {value}")]
	OutOfRange { unit: &'static str, value: u64 },
	#[error("Duration '{0}' is too long")]
	TooLong(String),
}

/// Formats seconds as `HH:MM:SS`; hours are not capped.
///
/// ```
/// use backoffice_utils::format_seconds;
///
/// assert_eq!(format_seconds(5_430), "01:30:30");
/// ```
pub fn format_seconds(total: u64) -> String {
	let hours = total / 3600;
	let minutes = (total % 3600) / 60;
	let seconds = total % 60;
	format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Parses `HH:MM:SS` or `MM:SS` into seconds.
pub fn parse_duration(input: &str) -> Result<u64, DurationError> {
	let format_error = || DurationError::Format(input.to_string());
	let parts = input
		.trim()
		.split(':')
		.map(|part| {
			if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
				return Err(format_error());
			}
			part.parse::<u64>().map_err(|_| format_error())
		})
		.collect::<Result<Vec<_>, _>>()?;

	let (hours, minutes, seconds) = match parts.as_slice() {
		[m, s] => (0, *m, *s),
		[h, m, s] => (*h, *m, *s),
		_ => return Err(format_error()),
	};
	if parts.len() == 3 && minutes >= 60 {
		return Err(DurationError::OutOfRange {
			unit: "Minutes",
			value: minutes,
		});
	}
	if seconds >= 60 {
		return Err(DurationError::OutOfRange {
			unit: "Seconds",
			value: seconds,
		});
	}
	hours
		.checked_mul(3600)
		.and_then(|h| h.checked_add(minutes * 60 + seconds))
		.ok_or_else(|| DurationError::TooLong(input.to_string()))
}
