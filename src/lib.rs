//! # BackOffice
//!
//! Core of the administration console of a video-on-demand platform.
//!
//! Screens are built from declarative field descriptors rendered into a view
//! tree, validated by a named rule table before submit, and bound to
//! observable entity stores that talk to the REST backend through a
//! [`Transport`](stores::Transport).
//!
//! ## Feature Flags
//!
//! - `standard` (default) - Every crate below plus the representative screens
//! - `forms` - Field renderer, field wrapper and form validation container
//! - `stores` - Entity stores, endpoint table, session and remote search
//! - `utils` - Gap fill, checkbox tree search and duration helpers
//! - `conf` - Layered settings (defaults, TOML file, environment)
//! - `testing` - In-memory `MockTransport`
//! - `full` - All features enabled
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use backoffice::prelude::*;
//! use std::rc::Rc;
//!
//! # async fn run(transport: Rc<dyn Transport>) -> Result<(), Box<dyn std::error::Error>> {
//! let settings = BackOfficeSettings::load(None)?;
//! let session = backoffice::bootstrap(&settings, transport)?;
//!
//! let screen = UserFormScreen::mount(&session, None, Rc::new(RuleTable::standard()));
//! screen.load().await;
//! let view = screen.render();
//! let saved = screen.submit(&view).await;
//! # let _ = saved;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "conf")]
pub mod conf;
#[cfg(feature = "forms")]
pub mod forms;
pub mod pages;
#[cfg(all(feature = "forms", feature = "stores", feature = "utils"))]
pub mod screens;
#[cfg(feature = "stores")]
pub mod stores;
#[cfg(feature = "utils")]
pub mod utils;
pub mod validators;

#[cfg(feature = "conf")]
pub use backoffice_conf::{BackOfficeSettings, SettingsError};

#[cfg(feature = "stores")]
pub use backoffice_stores::{AppSession, SessionError, SessionFactory, StoreError, Transport};

#[cfg(all(feature = "forms", feature = "stores", feature = "utils"))]
pub use screens::{ContentFormScreen, SeasonFormScreen, UserFormScreen};

/// Errors raised while starting the console
#[cfg(all(feature = "conf", feature = "stores"))]
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
	#[error(transparent)]
	Settings(#[from] SettingsError),

	#[error(transparent)]
	Session(#[from] SessionError),
}

/// Builds the process-wide session from validated settings.
///
/// Fails when the settings are invalid or when a session was already
/// created in this process.
#[cfg(all(feature = "conf", feature = "stores"))]
pub fn bootstrap(
	settings: &BackOfficeSettings,
	transport: std::rc::Rc<dyn Transport>,
) -> Result<std::rc::Rc<AppSession>, BootstrapError> {
	settings.validate()?;
	let session = SessionFactory::new()?
		.page_size(settings.page_size)
		.build(transport);
	tracing::info!(api_base_url = %settings.api_base_url, "console bootstrapped");
	Ok(session)
}

pub mod prelude {
	pub use crate::pages::{Callback, Event, EventType, IntoView, Observable, View};
	pub use crate::validators::{RuleOutcome, RuleTable, Severity};

	#[cfg(feature = "conf")]
	pub use crate::conf::BackOfficeSettings;

	#[cfg(feature = "forms")]
	pub use crate::forms::{
		Field, FieldChange, FieldDescriptor, FieldWrapper, FormState, FormValidation, RenderContext,
		RuleSpec,
	};

	#[cfg(feature = "stores")]
	pub use crate::stores::{
		AppSession, EntityKind, EntityStore, FieldStore, ListStore, OptionQuery, ReferenceKey,
		SessionFactory, Transport,
	};

	#[cfg(feature = "utils")]
	pub use crate::utils::{CheckboxTree, format_seconds, next_sequence_number, parse_duration};

	#[cfg(all(feature = "forms", feature = "stores", feature = "utils"))]
	pub use crate::screens::{ContentFormScreen, SeasonFormScreen, UserFormScreen};
}
