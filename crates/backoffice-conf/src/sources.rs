//! Configuration sources merged by priority

use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

pub trait ConfigSource {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Higher priorities override lower ones
	fn priority(&self) -> u8;

	fn description(&self) -> String;
}

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Parse error: {0}")]
	Parse(String),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Environment variables starting with a prefix.
///
/// The prefix is stripped and the rest lowercased, so
/// `BACKOFFICE_PAGE_SIZE=50` becomes `page_size = 50`. Integer and boolean
/// values are parsed; everything else stays a string.
pub struct EnvSource {
	prefix: String,
}

impl EnvSource {
	pub fn new(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
		}
	}

	fn parse_value(value: String) -> Value {
		if let Ok(num) = value.parse::<i64>() {
			Value::Number(num.into())
		} else {
			match value.trim().to_lowercase().as_str() {
				"true" | "yes" | "on" => Value::Bool(true),
				"false" | "no" | "off" => Value::Bool(false),
				_ => Value::String(value),
			}
		}
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		let mut config = IndexMap::new();
		for (key, value) in std::env::vars() {
			let Some(clean_key) = key.strip_prefix(&self.prefix) else {
				continue;
			};
			if clean_key.is_empty() {
				continue;
			}
			config.insert(clean_key.to_lowercase(), Self::parse_value(value));
		}
		Ok(config)
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		format!("Environment variables (prefix: {})", self.prefix)
	}
}

/// A TOML file; a missing file yields no values
pub struct TomlFileSource {
	path: PathBuf,
}

impl TomlFileSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let toml_value: toml::Value = toml::from_str(&content)?;
		let json_value = serde_json::to_value(toml_value)?;

		match json_value {
			Value::Object(map) => Ok(map.into_iter().collect()),
			_ => Err(SourceError::Parse("Expected table at root".to_string())),
		}
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// Fixed values with the lowest priority
#[derive(Default)]
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}
