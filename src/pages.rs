//! View tree, observables and pagination
//!
//! Everything a screen renders is a [`View`]: elements carry attributes,
//! children and event handlers, and events dispatched into the tree bubble
//! from the named control up to the `<form>`.
//!
//! ## Example
//!
//! ```rust
//! use backoffice::pages::{Event, EventType, IntoView, Observable, View};
//!
//! let clicks = Observable::new(0);
//! let counter = clicks.clone();
//! let view = View::element("button")
//!     .attr("name", "more")
//!     .on_event(EventType::Click, move |_| counter.update(|n| *n += 1))
//!     .child("More")
//!     .into_view();
//!
//! view.dispatch(&Event::click("more"));
//! assert_eq!(clicks.get(), 1);
//! ```

pub use backoffice_pages::*;
