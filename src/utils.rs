//! Sequence numbers, checkbox tree search and durations

pub use backoffice_utils::*;
