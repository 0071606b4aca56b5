//! Entity stores and backend transport

pub use backoffice_stores::*;
