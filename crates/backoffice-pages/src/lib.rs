//! View layer primitives for the BackOffice console
//!
//! - [`View`] / [`ElementView`]: render output with HTML serialization, tree
//!   queries and event dispatch
//! - [`Observable`]: explicit state-update-and-notify cell with a version
//!   counter
//! - [`Callback`]: cloneable `Rc` closure wrapper
//! - [`Pagination`]: page arithmetic and the page-link widget

pub mod callback;
pub mod event;
pub mod observable;
pub mod pagination;
pub mod view;

pub use callback::Callback;
pub use event::{Event, EventType, ViewEventHandler};
pub use observable::{Observable, Snapshot, SubscriptionId};
pub use pagination::{PageLink, PageQuery, Pagination};
pub use view::{ElementView, IntoView, View, html_escape};
