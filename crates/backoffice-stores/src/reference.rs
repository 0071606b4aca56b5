//! Typed reference lists (select option sources)

use crate::endpoint::{Endpoint, HttpMethod};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference lists a store can provide to select fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKey {
	Genres,
	/// Subgenres of one genre; requires the parent genre id
	Subgenres,
	Languages,
	AgeGroups,
	Editors,
	Playlists,
	ContentTitles,
}

impl ReferenceKey {
	pub const ALL: [ReferenceKey; 7] = [
		ReferenceKey::Genres,
		ReferenceKey::Subgenres,
		ReferenceKey::Languages,
		ReferenceKey::AgeGroups,
		ReferenceKey::Editors,
		ReferenceKey::Playlists,
		ReferenceKey::ContentTitles,
	];

	/// Store property name
	pub fn property(&self) -> &'static str {
		match self {
			ReferenceKey::Genres => "genres",
			ReferenceKey::Subgenres => "subgenres",
			ReferenceKey::Languages => "languages",
			ReferenceKey::AgeGroups => "age_groups",
			ReferenceKey::Editors => "editors",
			ReferenceKey::Playlists => "playlists",
			ReferenceKey::ContentTitles => "content_titles",
		}
	}

	pub fn from_property(property: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|key| key.property() == property)
	}

	/// Route parameter carrying the parent selection for dependent lists
	pub fn parent_param(&self) -> Option<&'static str> {
		match self {
			ReferenceKey::Subgenres => Some("genre_id"),
			_ => None,
		}
	}

	pub fn endpoint(&self) -> Endpoint {
		let template = match self {
			ReferenceKey::Genres => "/genres",
			ReferenceKey::Subgenres => "/genres/:genre_id/subgenres",
			ReferenceKey::Languages => "/languages",
			ReferenceKey::AgeGroups => "/age-groups",
			ReferenceKey::Editors => "/editors",
			ReferenceKey::Playlists => "/playlists",
			ReferenceKey::ContentTitles => "/contents/titles",
		};
		Endpoint::new(format!("{}.list", self.property()), HttpMethod::Get, template)
	}
}

impl fmt::Display for ReferenceKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.property())
	}
}

/// One concrete option list: a key plus the parent selection it depends on.
///
/// Its [`Display`](fmt::Display) form is the dot path `subgenres.12`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptionQuery {
	pub key: ReferenceKey,
	pub parent: Option<String>,
}

impl OptionQuery {
	pub fn new(key: ReferenceKey) -> Self {
		Self { key, parent: None }
	}

	pub fn dependent(key: ReferenceKey, parent: impl Into<String>) -> Self {
		Self {
			key,
			parent: Some(parent.into()),
		}
	}

	/// Parses a dot path such as `genres` or `subgenres.12`.
	pub fn parse(path: &str) -> Option<Self> {
		match path.split_once('.') {
			Some((property, parent)) if !parent.is_empty() => {
				ReferenceKey::from_property(property).map(|key| Self::dependent(key, parent))
			}
			Some(_) => None,
			None => ReferenceKey::from_property(path).map(Self::new),
		}
	}
}

impl From<ReferenceKey> for OptionQuery {
	fn from(key: ReferenceKey) -> Self {
		Self::new(key)
	}
}

impl fmt::Display for OptionQuery {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.parent {
			Some(parent) => write!(f, "{}.{}", self.key, parent),
			None => write!(f, "{}", self.key),
		}
	}
}
