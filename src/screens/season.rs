//! Season edit screen with its episode list

use super::{FormScreen, submit_button};
use backoffice_forms::{FieldChange, FieldDescriptor, FieldWrapper, FormValidation, RuleSpec};
use backoffice_pages::{Callback, EventType, IntoView, View};
use backoffice_stores::{AppSession, EntityData, EntityKind, EntityStore, FieldStore, FormMode};
use backoffice_utils::{format_seconds, next_sequence_number, parse_duration};
use backoffice_validators::{RuleTable, as_text};
use serde_json::{Map, Value, json};
use std::rc::Rc;

const EPISODE_TITLE_KEY: &str = "episodes.title";
const EPISODE_DURATION_KEY: &str = "episodes.duration";

/// Number and title of a season plus one title and duration per episode.
///
/// A new season is numbered with the first free number among the content's
/// existing seasons. Episodes are stored as `{"title", "duration"}` objects
/// with the duration in seconds and edited as `HH:MM:SS`; a duration that
/// does not parse is kept as typed so the `hourMinuteSeconds` rule reports it.
pub struct SeasonFormScreen {
	screen: FormScreen,
	content_id: String,
}

impl SeasonFormScreen {
	pub fn mount(
		session: &Rc<AppSession>,
		content_id: &str,
		id: Option<&str>,
		table: Rc<RuleTable>,
	) -> Self {
		let store = match id {
			Some(id) => session.edit_store(EntityKind::Season, id),
			None => session
				.create_store(EntityKind::Season)
				.with_defaults([("episodes", json!([]))]),
		};
		Self {
			screen: FormScreen::new("season", session, store.with_parent(content_id), table),
			content_id: content_id.to_string(),
		}
	}

	pub fn store(&self) -> &Rc<EntityStore> {
		&self.screen.store
	}

	pub fn form(&self) -> &Rc<FormValidation> {
		&self.screen.form
	}

	/// Loads the season, or numbers a new one after the existing seasons.
	pub async fn load(&self) -> bool {
		if self.screen.store.mode() == FormMode::Edit {
			return self.screen.load().await;
		}

		let seasons = self
			.screen
			.session
			.list_store(EntityKind::Season)
			.with_parent(&self.content_id);
		if self.screen.session.report(seasons.load().await).is_none() {
			return false;
		}
		let taken: Vec<u32> = seasons.items().with(|items| {
			items
				.iter()
				.filter_map(|season| season.get("number").and_then(Value::as_u64))
				.filter_map(|n| u32::try_from(n).ok())
				.collect()
		});
		let number = next_sequence_number(&taken);
		tracing::debug!(content = %self.content_id, number, "season number defaulted");
		self.screen.store.set_field("number", Value::from(number));
		true
	}

	pub fn episode_count(&self) -> usize {
		episodes(&*self.screen.store).len()
	}

	/// Appends an empty episode.
	pub fn add_episode(&self) {
		push_episode(&*self.screen.store);
	}

	pub fn render(&self) -> View {
		let store = &*self.screen.store;
		let mut fields = vec![
			FieldWrapper::new(
				FieldDescriptor::text("number", "Season number").rule_spec(
					RuleSpec::new("numericRange")
						.arg(Value::from(1))
						.arg(Value::from(999)),
				),
			),
			FieldWrapper::new(FieldDescriptor::text("title", "Title").rule("required")),
		];
		for (index, episode) in episodes(store).iter().enumerate() {
			fields.push(
				FieldWrapper::new(FieldDescriptor::text("episode_title", "Episode title").rule("required"))
					.key(EPISODE_TITLE_KEY)
					.index(index)
					.value(episode.get("title").cloned().unwrap_or(Value::Null)),
			);
			fields.push(
				FieldWrapper::new(FieldDescriptor::text("episode_duration", "Duration").rule("hourMinuteSeconds"))
					.key(EPISODE_DURATION_KEY)
					.index(index)
					.value(duration_text(episode.get("duration"))),
			);
		}

		let add = Rc::clone(&self.screen.store);
		let add_button = View::element("button")
			.attr("type", "button")
			.attr("name", "add-episode")
			.on_event(EventType::Click, move |_| push_episode(&*add))
			.child("Add episode");
		self.screen.render(
			&fields,
			self.on_change(),
			(add_button, submit_button("Save season")).into_view(),
		)
	}

	/// Validates and saves the season shown in `view`.
	pub async fn submit(&self, view: &View) -> Option<EntityData> {
		self.screen.submit(view).await
	}

	fn on_change(&self) -> Callback<FieldChange> {
		let store = Rc::clone(&self.screen.store);
		Callback::new(move |change: FieldChange| match (change.key.as_str(), change.index) {
			(EPISODE_TITLE_KEY, Some(index)) => update_episode(&*store, index, "title", change.value),
			(EPISODE_DURATION_KEY, Some(index)) => {
				let text = as_text(&change.value).map(|t| t.into_owned()).unwrap_or_default();
				let duration = match parse_duration(&text) {
					Ok(seconds) => Value::from(seconds),
					Err(err) => {
						tracing::debug!(index, error = %err, "episode duration kept as typed");
						Value::String(text)
					}
				};
				update_episode(&*store, index, "duration", duration);
			}
			("number", _) => {
				let parsed = as_text(&change.value).and_then(|t| t.trim().parse::<u64>().ok());
				store.set_field("number", parsed.map_or(change.value, Value::from));
			}
			_ => store.set_field(&change.key, change.value),
		})
	}
}

fn episodes(store: &dyn FieldStore) -> Vec<Value> {
	match store.get_store_value("episodes") {
		Value::Array(items) => items,
		_ => Vec::new(),
	}
}

fn push_episode(store: &dyn FieldStore) {
	let mut list = episodes(store);
	list.push(json!({"title": "", "duration": 0}));
	store.set_field("episodes", Value::Array(list));
}

fn update_episode(store: &dyn FieldStore, index: usize, attribute: &str, value: Value) {
	let mut list = episodes(store);
	let Some(episode) = list.get_mut(index) else {
		return;
	};
	if !episode.is_object() {
		*episode = Value::Object(Map::new());
	}
	if let Value::Object(map) = episode {
		map.insert(attribute.to_string(), value);
	}
	store.set_field("episodes", Value::Array(list));
}

fn duration_text(duration: Option<&Value>) -> Value {
	match duration {
		Some(Value::Number(n)) => n
			.as_u64()
			.map_or(Value::Null, |seconds| Value::String(format_seconds(seconds))),
		Some(other) => other.clone(),
		None => Value::Null,
	}
}
