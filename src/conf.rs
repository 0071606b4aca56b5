//! Console settings
//!
//! Settings are merged from defaults, an optional TOML file and
//! `BACKOFFICE_*` environment variables, in that order of precedence.

pub use backoffice_conf::*;
