//! Endpoint descriptor table
//!
//! Every backend operation is a named [`Endpoint`] with a URL template such as
//! `/contents/:content_id/seasons/:id`. Route parameters fill the `:name`
//! segments, percent-encoded so a value always stays one segment; for `GET`
//! requests the body is sent as the query string.

use crate::error::{StoreError, StoreResult};
use indexmap::IndexMap;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

// Everything but the RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Values for the `:name` segments of a URL template
pub type RouteParams = IndexMap<String, String>;

/// Builds [`RouteParams`] from pairs.
pub fn route_params<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> RouteParams
where
	K: Into<String>,
	V: ToString,
{
	pairs
		.into_iter()
		.map(|(k, v)| (k.into(), v.to_string()))
		.collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	Get,
	Post,
	Put,
	Delete,
}

impl HttpMethod {
	pub fn as_str(&self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Delete => "DELETE",
		}
	}
}

impl fmt::Display for HttpMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A named backend operation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
	name: Cow<'static, str>,
	template: Cow<'static, str>,
	method: HttpMethod,
}

impl Endpoint {
	pub fn new(
		name: impl Into<Cow<'static, str>>,
		method: HttpMethod,
		template: impl Into<Cow<'static, str>>,
	) -> Self {
		Self {
			name: name.into(),
			template: template.into(),
			method,
		}
	}

	/// Logical operation name, e.g. `contents.update`
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn template(&self) -> &str {
		&self.template
	}

	pub fn method(&self) -> HttpMethod {
		self.method
	}

	/// Parameter names used by the template, in order
	pub fn param_names(&self) -> Vec<&str> {
		self.template
			.split('/')
			.filter_map(|segment| segment.strip_prefix(':'))
			.collect()
	}

	/// Fills the template from `params`.
	pub fn resolve(&self, params: &RouteParams) -> StoreResult<String> {
		let mut path = String::with_capacity(self.template.len());
		for (i, segment) in self.template.split('/').enumerate() {
			if i > 0 {
				path.push('/');
			}
			match segment.strip_prefix(':') {
				Some(param) => {
					let value = params.get(param).ok_or_else(|| StoreError::MissingRouteParam {
						endpoint: self.name.to_string(),
						param: param.to_string(),
					})?;
					path.extend(utf8_percent_encode(value, PATH_SEGMENT));
				}
				None => path.push_str(segment),
			}
		}
		Ok(path)
	}

	/// Full request URL under `base`, with a `GET` body as the query string.
	pub fn url(&self, base: &str, params: &RouteParams, body: Option<&Value>) -> StoreResult<String> {
		let mut url = format!("{}{}", base.trim_end_matches('/'), self.resolve(params)?);
		if self.method == HttpMethod::Get
			&& let Some(body) = body
		{
			let query = serde_urlencoded::to_string(body).map_err(|e| StoreError::Query {
				endpoint: self.name.to_string(),
				reason: e.to_string(),
			})?;
			if !query.is_empty() {
				url.push('?');
				url.push_str(&query);
			}
		}
		Ok(url)
	}
}

impl fmt::Display for Endpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {} ({})", self.method, self.template, self.name)
	}
}

/// Entity kinds managed by the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
	Content,
	Season,
	Episode,
	Page,
	Playlist,
	Slider,
	Editor,
	User,
}

/// CRUD operations available on every entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrudOp {
	List,
	Get,
	Create,
	Update,
	Delete,
}

impl CrudOp {
	pub fn as_str(&self) -> &'static str {
		match self {
			CrudOp::List => "list",
			CrudOp::Get => "get",
			CrudOp::Create => "create",
			CrudOp::Update => "update",
			CrudOp::Delete => "delete",
		}
	}

	pub fn method(&self) -> HttpMethod {
		match self {
			CrudOp::List | CrudOp::Get => HttpMethod::Get,
			CrudOp::Create => HttpMethod::Post,
			CrudOp::Update => HttpMethod::Put,
			CrudOp::Delete => HttpMethod::Delete,
		}
	}

	fn targets_item(&self) -> bool {
		matches!(self, CrudOp::Get | CrudOp::Update | CrudOp::Delete)
	}
}

impl EntityKind {
	pub const ALL: [EntityKind; 8] = [
		EntityKind::Content,
		EntityKind::Season,
		EntityKind::Episode,
		EntityKind::Page,
		EntityKind::Playlist,
		EntityKind::Slider,
		EntityKind::Editor,
		EntityKind::User,
	];

	/// Singular name used in messages and logs
	pub fn as_str(&self) -> &'static str {
		match self {
			EntityKind::Content => "content",
			EntityKind::Season => "season",
			EntityKind::Episode => "episode",
			EntityKind::Page => "page",
			EntityKind::Playlist => "playlist",
			EntityKind::Slider => "slider",
			EntityKind::Editor => "editor",
			EntityKind::User => "user",
		}
	}

	/// Collection path, nested under the parent for child entities
	pub fn collection_path(&self) -> &'static str {
		match self {
			EntityKind::Content => "/contents",
			EntityKind::Season => "/contents/:content_id/seasons",
			EntityKind::Episode => "/seasons/:season_id/episodes",
			EntityKind::Page => "/pages",
			EntityKind::Playlist => "/playlists",
			EntityKind::Slider => "/sliders",
			EntityKind::Editor => "/editors",
			EntityKind::User => "/users",
		}
	}

	/// Route parameter naming the parent entity, if any
	pub fn parent_param(&self) -> Option<&'static str> {
		match self {
			EntityKind::Season => Some("content_id"),
			EntityKind::Episode => Some("season_id"),
			_ => None,
		}
	}

	pub fn endpoint(&self, op: CrudOp) -> Endpoint {
		let template = if op.targets_item() {
			Cow::Owned(format!("{}/:id", self.collection_path()))
		} else {
			Cow::Borrowed(self.collection_path())
		};
		let name = format!("{}.{}", self.as_str(), op.as_str());
		Endpoint::new(name, op.method(), template)
	}
}

impl fmt::Display for EntityKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Existence check used by the `transcoding` rule
pub fn transcoding_endpoint() -> Endpoint {
	Endpoint::new("transcoding.check", HttpMethod::Get, "/transcodings/:media_id")
}
