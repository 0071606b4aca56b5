//! Application session
//!
//! The session is the one process-wide object of the console: it owns the
//! transport handed to every store and the notification list. It is built
//! once at startup through [`SessionFactory`] and passed by reference to
//! screens.
//!
//! ```
//! use backoffice_stores::{ApiError, ApiResponse, Endpoint, RouteParams, SessionFactory, Transport};
//! use async_trait::async_trait;
//! use serde_json::Value;
//! use std::rc::Rc;
//!
//! struct Offline;
//!
//! #[async_trait(?Send)]
//! impl Transport for Offline {
//!     async fn call_api(&self, _: &Endpoint, _: Option<&Value>, _: &RouteParams) -> Result<ApiResponse, ApiError> {
//!         Err(ApiError::network("offline"))
//!     }
//! }
//!
//! let session = SessionFactory::new().unwrap().build(Rc::new(Offline));
//! assert!(SessionFactory::new().is_err());
//! assert!(session.notifications().is_empty());
//! ```

use crate::endpoint::EntityKind;
use crate::error::{SessionError, StoreError, StoreResult};
use crate::store::EntityStore;
use crate::list::ListStore;
use crate::transport::Transport;
use backoffice_pages::Observable;
use serde::Serialize;
use serde_json::Value;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

static SESSION_CREATED: AtomicBool = AtomicBool::new(false);

/// One-shot builder for [`AppSession`].
///
/// Only one factory can exist per process; a second [`SessionFactory::new`]
/// fails with [`SessionError::AlreadyInitialized`].
#[derive(Debug)]
pub struct SessionFactory {
	page_size: usize,
}

impl SessionFactory {
	pub fn new() -> Result<Self, SessionError> {
		if SESSION_CREATED.swap(true, Ordering::SeqCst) {
			return Err(SessionError::AlreadyInitialized);
		}
		Ok(Self { page_size: 25 })
	}

	/// Page size used by list stores
	pub fn page_size(mut self, page_size: usize) -> Self {
		self.page_size = page_size.max(1);
		self
	}

	pub fn build(self, transport: Rc<dyn Transport>) -> Rc<AppSession> {
		tracing::info!(page_size = self.page_size, "application session initialized");
		Rc::new(AppSession::new(transport, self.page_size))
	}

	/// Allows the next [`SessionFactory::new`] to succeed again.
	#[cfg(any(test, feature = "testing"))]
	pub fn reset() {
		SESSION_CREATED.store(false, Ordering::SeqCst);
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
	Info,
	Success,
	Error,
}

/// A user-facing message shown by the console shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
	pub id: u64,
	pub level: NotificationLevel,
	pub message: String,
}

pub struct AppSession {
	transport: Rc<dyn Transport>,
	page_size: usize,
	current_user: Observable<Option<Value>>,
	notifications: Observable<Vec<Notification>>,
	next_notification: Cell<u64>,
}

impl AppSession {
	fn new(transport: Rc<dyn Transport>, page_size: usize) -> Self {
		Self {
			transport,
			page_size,
			current_user: Observable::new(None),
			notifications: Observable::new(Vec::new()),
			next_notification: Cell::new(1),
		}
	}

	/// A session outside the once-per-process guard, for tests.
	#[cfg(any(test, feature = "testing"))]
	pub fn detached(transport: Rc<dyn Transport>) -> Rc<Self> {
		Rc::new(Self::new(transport, 25))
	}

	pub fn transport(&self) -> Rc<dyn Transport> {
		Rc::clone(&self.transport)
	}

	pub fn page_size(&self) -> usize {
		self.page_size
	}

	/// Store for a new entity
	pub fn create_store(&self, kind: EntityKind) -> EntityStore {
		EntityStore::new_create(kind, self.transport())
	}

	/// Store for an existing entity (not loaded yet)
	pub fn edit_store(&self, kind: EntityKind, id: impl ToString) -> EntityStore {
		EntityStore::new_edit(kind, id, self.transport())
	}

	pub fn list_store(&self, kind: EntityKind) -> ListStore {
		ListStore::new(kind, self.page_size, self.transport())
	}

	pub fn current_user(&self) -> &Observable<Option<Value>> {
		&self.current_user
	}

	pub fn notifications(&self) -> Vec<Notification> {
		self.notifications.get()
	}

	pub fn notifications_observable(&self) -> &Observable<Vec<Notification>> {
		&self.notifications
	}

	/// Adds a notification and returns its id.
	pub fn notify(&self, level: NotificationLevel, message: impl Into<String>) -> u64 {
		let id = self.next_notification.get();
		self.next_notification.set(id + 1);
		let notification = Notification {
			id,
			level,
			message: message.into(),
		};
		self.notifications.update(|list| list.push(notification));
		id
	}

	pub fn notify_error(&self, error: &StoreError) -> u64 {
		let message = match error {
			StoreError::Api(api) if api.is_network() => {
				"The server could not be reached. Please try again.".to_string()
			}
			StoreError::Api(api) => api.message.clone(),
			other => other.to_string(),
		};
		self.notify(NotificationLevel::Error, message)
	}

	/// Passes a successful result through; turns an error into a notification.
	pub fn report<T>(&self, result: StoreResult<T>) -> Option<T> {
		match result {
			Ok(value) => Some(value),
			Err(err) => {
				self.notify_error(&err);
				None
			}
		}
	}

	pub fn dismiss(&self, id: u64) -> bool {
		let present = self
			.notifications
			.with(|list| list.iter().any(|n| n.id == id));
		if present {
			self.notifications.update(|list| list.retain(|n| n.id != id));
		}
		present
	}
}

impl std::fmt::Debug for AppSession {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AppSession")
			.field("page_size", &self.page_size)
			.field("notifications", &self.notifications)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ApiError;
	use crate::testing::MockTransport;
	use rstest::rstest;
	use serial_test::serial;

	#[rstest]
	#[serial(session)]
	fn test_second_factory_fails_fast() {
		// Arrange
		SessionFactory::reset();
		let first = SessionFactory::new();

		// Act
		let second = SessionFactory::new();

		// Assert
		assert!(first.is_ok());
		assert_eq!(second.unwrap_err(), SessionError::AlreadyInitialized);
		SessionFactory::reset();
	}

	#[rstest]
	#[serial(session)]
	fn test_build_hands_transport_to_stores() {
		SessionFactory::reset();
		let transport = Rc::new(MockTransport::new());
		let session = SessionFactory::new()
			.unwrap()
			.page_size(50)
			.build(transport.clone());

		assert_eq!(session.list_store(EntityKind::User).pagination().get().per_page, 50);
		assert_eq!(session.create_store(EntityKind::User).kind(), EntityKind::User);
		SessionFactory::reset();
	}

	#[rstest]
	fn test_notifications_report_and_dismiss() {
		// Arrange
		let session = AppSession::detached(Rc::new(MockTransport::new()));

		// Act
		let ok = session.report(Ok::<_, StoreError>(5));
		let failed = session.report::<()>(Err(ApiError::new(409, "Title already exists.").into()));
		session.report::<()>(Err(ApiError::network("timeout").into()));

		// Assert
		assert_eq!(ok, Some(5));
		assert_eq!(failed, None);
		let messages: Vec<_> = session.notifications().into_iter().map(|n| n.message).collect();
		assert_eq!(
			messages,
			vec![
				"Title already exists.".to_string(),
				"The server could not be reached. Please try again.".to_string(),
			]
		);
		assert!(session.dismiss(1));
		assert!(!session.dismiss(1));
		assert_eq!(session.notifications().len(), 1);
	}
}
