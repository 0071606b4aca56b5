//! Declarative form fields
//!
//! A [`FieldDescriptor`] describes one control; [`Field`] and
//! [`FieldWrapper`] render it against a store, and [`FormValidation`] gates
//! submission on the descriptors' rules.

pub use backoffice_forms::*;
