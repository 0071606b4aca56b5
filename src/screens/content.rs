//! Content edit screen

use super::{FormScreen, submit_button};
use backoffice_forms::{
	FieldChange, FieldDescriptor, FieldWrapper, FormValidation, KeySelector, RuleSpec, resolve_options,
};
use backoffice_pages::{Callback, Observable, View};
use backoffice_stores::{
	AppSession, EntityData, EntityKind, EntityStore, FieldStore, ReferenceKey, TransportProbe,
};
use backoffice_validators::{RuleTable, TranscodingRule, as_text};
use serde_json::Value;
use std::rc::Rc;

pub const TITLE_MAX_LENGTH: u64 = 120;

/// Title, description, genre and subgenre, languages, age group and the
/// transcoded media of one content.
///
/// Changing the genre clears the subgenre, whose options depend on it. The
/// genre select offers an "Add New" action; the key it was triggered for is
/// exposed through [`ContentFormScreen::dialog`] until closed.
pub struct ContentFormScreen {
	screen: FormScreen,
	fields: Vec<FieldWrapper>,
	dialog: Observable<Option<String>>,
}

impl ContentFormScreen {
	/// Mounts the screen for content `id`, or for a new content.
	pub fn mount(session: &Rc<AppSession>, id: Option<&str>, table: Rc<RuleTable>) -> Self {
		let store = match id {
			Some(id) => session.edit_store(EntityKind::Content, id),
			None => session.create_store(EntityKind::Content),
		};
		let dialog = Observable::new(None);
		Self {
			screen: FormScreen::new("content", session, store, table),
			fields: content_fields(&dialog),
			dialog,
		}
	}

	pub fn store(&self) -> &Rc<EntityStore> {
		&self.screen.store
	}

	pub fn form(&self) -> &Rc<FormValidation> {
		&self.screen.form
	}

	/// Reference key of the open "Add New" dialog
	pub fn dialog(&self) -> Option<String> {
		self.dialog.get()
	}

	pub fn close_dialog(&self) {
		self.dialog.set(None);
	}

	/// Loads the content, then every option list its fields draw from.
	pub async fn load(&self) -> bool {
		self.screen.load().await && self.refresh_options().await
	}

	/// Fetches the option lists the current values call for.
	///
	/// Call again after the genre changes to load its subgenres.
	pub async fn refresh_options(&self) -> bool {
		let store = &*self.screen.store;
		for field in &self.fields {
			resolve_options(field.descriptor(), field.descriptor().name(), store);
		}
		self.screen.fetch_options().await
	}

	pub fn render(&self) -> View {
		self.screen
			.render(&self.fields, self.on_change(), submit_button("Save content"))
	}

	/// Checks the media identifier against the transcoding backend.
	///
	/// A failure is shown on the `media_id` field and blocks the next submit
	/// until the field changes or a later check passes.
	pub async fn check_media(&self) -> bool {
		let value = self.screen.store.get_store_value("media_id");
		let text = as_text(&value).map(|t| t.into_owned()).unwrap_or_default();
		let rule = TranscodingRule::new(TransportProbe::new(self.screen.session.transport()));
		let outcome = rule.evaluate(&text).await;
		if outcome.passed {
			self.screen.form.clear_error("media_id");
		} else {
			self.screen.form.set_error("media_id", outcome.message);
		}
		outcome.passed
	}

	/// Validates and saves the content shown in `view`.
	///
	/// A filled-in media identifier is checked first.
	pub async fn submit(&self, view: &View) -> Option<EntityData> {
		let media = self.screen.store.get_store_value("media_id");
		if as_text(&media).is_some_and(|t| !t.trim().is_empty()) {
			self.check_media().await;
		}
		self.screen.submit(view).await
	}

	fn on_change(&self) -> Callback<FieldChange> {
		let store = Rc::clone(&self.screen.store);
		Callback::new(move |change: FieldChange| {
			let genre_changed = change.key == "genre" && store.get_store_value("genre") != change.value;
			store.set_field(&change.key, change.value);
			if genre_changed {
				store.set_field("subgenre", Value::Null);
			}
		})
	}
}

fn content_fields(dialog: &Observable<Option<String>>) -> Vec<FieldWrapper> {
	let dialog = dialog.clone();
	vec![
		FieldWrapper::new(
			FieldDescriptor::text("title", "Title")
				.rule("required")
				.rule_spec(RuleSpec::new("maxLength").arg(Value::from(TITLE_MAX_LENGTH))),
		),
		FieldWrapper::new(FieldDescriptor::textarea("description", "Description")),
		FieldWrapper::new(
			FieldDescriptor::select("genre", "Genre")
				.options_from_store(ReferenceKey::Genres)
				.placeholder("Select a genre")
				.rule("required"),
		)
		.action("Add New", move |key: String| dialog.set(Some(key))),
		FieldWrapper::new(
			FieldDescriptor::select("subgenre", "Subgenre")
				.dependent_options(ReferenceKey::Subgenres, "genre")
				.placeholder("Select a subgenre"),
		),
		FieldWrapper::new(
			FieldDescriptor::multiselect("languages", "Languages").options_from_store(ReferenceKey::Languages),
		),
		FieldWrapper::new(
			FieldDescriptor::select("age_group", "Age group")
				.options_from_store(ReferenceKey::AgeGroups)
				.option_value(KeySelector::attribute("min_age"))
				.placeholder("Select an age group"),
		)
		.zero_is_value(true),
		FieldWrapper::new(FieldDescriptor::text("media_id", "Media identifier")),
	]
}
