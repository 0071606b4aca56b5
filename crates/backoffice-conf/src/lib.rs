//! Settings for the BackOffice console
//!
//! Settings are merged from layered sources, lowest priority first:
//!
//! 1. [`DefaultSource`]: built-in defaults
//! 2. [`TomlFileSource`]: a TOML file, skipped when missing
//! 3. [`EnvSource`]: `BACKOFFICE_*` environment variables
//!
//! ```no_run
//! use backoffice_conf::BackOfficeSettings;
//!
//! let settings = BackOfficeSettings::load(Some("backoffice.toml".as_ref())).unwrap();
//! println!("{} items per page", settings.page_size);
//! ```

pub mod settings;
pub mod sources;

pub use settings::{BackOfficeSettings, ENV_PREFIX, SettingsError, SettingsLoader};
pub use sources::{ConfigSource, DefaultSource, EnvSource, SourceError, TomlFileSource};
