//! Typed console settings

use crate::sources::{ConfigSource, DefaultSource, EnvSource, SourceError, TomlFileSource};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

/// Prefix of the environment variables read by [`BackOfficeSettings::load`]
pub const ENV_PREFIX: &str = "BACKOFFICE_";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("Failed to load {source_name}: {error}")]
	Source {
		source_name: String,
		#[source]
		error: SourceError,
	},

	#[error("Invalid settings: {0}")]
	Deserialize(#[from] serde_json::Error),

	#[error("Invalid value for '{key}': {message}")]
	InvalidValue { key: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackOfficeSettings {
	/// Prefix of every backend URL
	pub api_base_url: String,
	/// Rows per list page
	pub page_size: usize,
	/// Characters typed before a remote option search starts
	pub search_min_length: usize,
	pub search_debounce_ms: u64,
	/// Characters typed before a checkbox tree is filtered
	pub tree_search_min_length: usize,
}

impl Default for BackOfficeSettings {
	fn default() -> Self {
		Self {
			api_base_url: "/api".to_string(),
			page_size: 25,
			search_min_length: 3,
			search_debounce_ms: 300,
			tree_search_min_length: 2,
		}
	}
}

impl BackOfficeSettings {
	/// Loads defaults, then `path` if given, then `BACKOFFICE_*` variables.
	pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
		let mut loader = SettingsLoader::new().add_source(Self::default_source());
		if let Some(path) = path {
			loader = loader.add_source(TomlFileSource::new(path));
		}
		loader.add_source(EnvSource::new(ENV_PREFIX)).build()
	}

	/// The defaults as a configuration source
	pub fn default_source() -> DefaultSource {
		let defaults = Self::default();
		DefaultSource::new()
			.with_value("api_base_url", Value::from(defaults.api_base_url))
			.with_value("page_size", Value::from(defaults.page_size))
			.with_value("search_min_length", Value::from(defaults.search_min_length))
			.with_value("search_debounce_ms", Value::from(defaults.search_debounce_ms))
			.with_value("tree_search_min_length", Value::from(defaults.tree_search_min_length))
	}

	pub fn search_debounce(&self) -> Duration {
		Duration::from_millis(self.search_debounce_ms)
	}

	pub fn validate(&self) -> Result<(), SettingsError> {
		if self.page_size == 0 {
			return Err(SettingsError::InvalidValue {
				key: "page_size",
				message: "must be at least 1".to_string(),
			});
		}
		if self.tree_search_min_length == 0 {
			return Err(SettingsError::InvalidValue {
				key: "tree_search_min_length",
				message: "must be at least 1".to_string(),
			});
		}
		if self.api_base_url.trim().is_empty() {
			return Err(SettingsError::InvalidValue {
				key: "api_base_url",
				message: "must not be empty".to_string(),
			});
		}
		Ok(())
	}
}

/// Merges sources by priority and deserializes the result
#[derive(Default)]
pub struct SettingsLoader {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsLoader {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_source(mut self, source: impl ConfigSource + 'static) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Merged key/value map; later equal-priority sources win
	pub fn merged(&self) -> Result<IndexMap<String, Value>, SettingsError> {
		let mut sources: Vec<&dyn ConfigSource> = self.sources.iter().map(|s| s.as_ref()).collect();
		sources.sort_by_key(|s| s.priority());

		let mut merged = IndexMap::new();
		for source in sources {
			let values = source.load().map_err(|error| SettingsError::Source {
				source_name: source.description(),
				error,
			})?;
			tracing::debug!(source = %source.description(), keys = values.len(), "settings source loaded");
			merged.extend(values);
		}
		Ok(merged)
	}

	pub fn build(&self) -> Result<BackOfficeSettings, SettingsError> {
		let merged = self.merged()?;
		let settings: BackOfficeSettings = serde_json::from_value(Value::Object(merged.into_iter().collect()))?;
		settings.validate()?;
		Ok(settings)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serial_test::serial;
	use std::env;
	use tempfile::TempDir;

	#[rstest]
	#[serial(env)]
	fn test_defaults_when_nothing_configured() {
		let settings = BackOfficeSettings::load(None).unwrap();
		assert_eq!(settings, BackOfficeSettings::default());
		assert_eq!(settings.search_debounce(), Duration::from_millis(300));
	}

	#[rstest]
	#[serial(env)]
	fn test_env_overrides_file_overrides_defaults() {
		// Arrange
		let temp_dir = TempDir::new().unwrap();
		let path = temp_dir.path().join("backoffice.toml");
		std::fs::write(&path, "page_size = 10\nsearch_min_length = 4\n").unwrap();
		// SAFETY: serialized with every other test touching the environment
		unsafe {
			env::set_var("BACKOFFICE_PAGE_SIZE", "50");
		}

		// Act
		let settings = BackOfficeSettings::load(Some(&path));
		unsafe {
			env::remove_var("BACKOFFICE_PAGE_SIZE");
		}

		// Assert
		let settings = settings.unwrap();
		assert_eq!(settings.page_size, 50);
		assert_eq!(settings.search_min_length, 4);
		assert_eq!(settings.api_base_url, "/api");
	}

	#[rstest]
	#[case("page_size", Value::from(0), "page_size")]
	#[case("tree_search_min_length", Value::from(0), "tree_search_min_length")]
	#[case("api_base_url", Value::from("  "), "api_base_url")]
	fn test_invalid_values_rejected(#[case] key: &str, #[case] value: Value, #[case] expected: &str) {
		let result = SettingsLoader::new()
			.add_source(BackOfficeSettings::default_source())
			.add_source(DefaultSource::new().with_value(key, value))
			.build();

		assert!(matches!(result, Err(SettingsError::InvalidValue { key, .. }) if key == expected));
	}

	#[rstest]
	fn test_wrong_type_is_deserialize_error() {
		let result = SettingsLoader::new()
			.add_source(DefaultSource::new().with_value("page_size", Value::from("many")))
			.build();

		assert!(matches!(result, Err(SettingsError::Deserialize(_))));
	}

	#[rstest]
	fn test_broken_file_names_source() {
		let temp_dir = TempDir::new().unwrap();
		let path = temp_dir.path().join("broken.toml");
		std::fs::write(&path, "[unclosed").unwrap();

		let result = SettingsLoader::new().add_source(TomlFileSource::new(&path)).build();

		match result {
			Err(SettingsError::Source { source_name, .. }) => assert!(source_name.contains("broken.toml")),
			other => panic!("expected source error, got {other:?}"),
		}
	}
}
