//! Observable entity stores for the BackOffice console
//!
//! This crate provides:
//! - The [`Transport`] contract every backend call goes through, plus the
//!   endpoint descriptor table
//! - [`EntityStore`] and [`ListStore`] for every [`EntityKind`]
//! - [`FieldStore`], the typed interface rendered fields use to read values,
//!   write changes and request option lists
//! - [`AppSession`], built once per process by [`SessionFactory`]
//! - [`RemoteSearch`], a debounced last-request-wins lookup
//!
//! With the `testing` feature, [`testing::MockTransport`] answers calls from
//! canned responses.

pub mod endpoint;
pub mod error;
pub mod list;
pub mod probe;
pub mod reference;
pub mod search;
pub mod session;
pub mod store;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use endpoint::{
	CrudOp, Endpoint, EntityKind, HttpMethod, RouteParams, route_params, transcoding_endpoint,
};
pub use error::{ApiError, SessionError, StoreError, StoreResult};
pub use list::ListStore;
pub use probe::TransportProbe;
pub use reference::{OptionQuery, ReferenceKey};
pub use search::{RemoteSearch, SearchOutcome};
pub use session::{AppSession, Notification, NotificationLevel, SessionFactory};
pub use store::{EntityData, EntityStore, FieldStore, FormMode, ReferenceSlot, StoreSubscription};
pub use transport::{ApiResponse, Transport};
