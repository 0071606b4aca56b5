//! Helpers shared by BackOffice screens
//!
//! - [`next_sequence_number`]: smallest free number in a numbered series
//!   (seasons, episodes)
//! - [`CheckboxTree`]: label search over a tree of checkable nodes
//! - [`format_seconds`] / [`parse_duration`]: `HH:MM:SS` conversions

pub mod duration;
pub mod sequence;
pub mod tree;

pub use duration::{DurationError, format_seconds, parse_duration};
pub use sequence::next_sequence_number;
pub use tree::{CheckboxTree, DEFAULT_MIN_SEARCH_LENGTH, TreeNode, TreeSearch};
