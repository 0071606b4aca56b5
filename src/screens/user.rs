//! Console user screen

use super::{FormScreen, submit_button};
use backoffice_forms::{FieldChange, FieldDescriptor, FieldWrapper, FormValidation, RuleSpec};
use backoffice_pages::{Callback, View};
use backoffice_stores::{AppSession, EntityData, EntityKind, EntityStore, FieldStore};
use backoffice_validators::RuleTable;
use serde_json::{Value, json};
use std::rc::Rc;

pub const PASSWORD_MIN_LENGTH: u64 = 6;
pub const PASSWORD_MAX_LENGTH: u64 = 255;

const PASSWORD_CONFIRM_KEY: &str = "password_confirm";

pub struct UserFormScreen {
	screen: FormScreen,
	fields: Vec<FieldWrapper>,
}

impl UserFormScreen {
	pub fn mount(session: &Rc<AppSession>, id: Option<&str>, table: Rc<RuleTable>) -> Self {
		let store = match id {
			Some(id) => session.edit_store(EntityKind::User, id),
			None => session.create_store(EntityKind::User),
		}
		.with_local_fields([PASSWORD_CONFIRM_KEY]);
		Self {
			screen: FormScreen::new("user", session, store, table),
			fields: user_fields(),
		}
	}

	pub fn store(&self) -> &Rc<EntityStore> {
		&self.screen.store
	}

	pub fn form(&self) -> &Rc<FormValidation> {
		&self.screen.form
	}

	pub async fn load(&self) -> bool {
		self.screen.load().await
	}

	pub fn render(&self) -> View {
		let store = Rc::clone(&self.screen.store);
		let on_change = Callback::new(move |change: FieldChange| store.set_field(&change.key, change.value));
		self.screen.render(&self.fields, on_change, submit_button("Save user"))
	}

	pub async fn submit(&self, view: &View) -> Option<EntityData> {
		self.screen.submit(view).await
	}
}

fn user_fields() -> Vec<FieldWrapper> {
	vec![
		FieldWrapper::new(FieldDescriptor::text("email", "Email").rule("required").rule("email")),
		FieldWrapper::new(
			FieldDescriptor::password("password", "Password")
				.rule("required")
				.rule_spec(
					RuleSpec::new("dataInRange")
						.arg(Value::from(PASSWORD_MIN_LENGTH))
						.arg(Value::from(PASSWORD_MAX_LENGTH)),
				),
		)
		.prop("autocomplete", "new-password"),
		FieldWrapper::new(
			FieldDescriptor::password(PASSWORD_CONFIRM_KEY, "Confirm password").rule_spec(
				RuleSpec::new("match")
					.store_arg("password")
					.message("Passwords do not match."),
			),
		)
		.prop("autocomplete", "new-password"),
		FieldWrapper::new(
			FieldDescriptor::select("role", "Role")
				.static_options(vec![
					json!({"id": "editor", "name": "Editor"}),
					json!({"id": "admin", "name": "Administrator"}),
				])
				.placeholder("Select a role")
				.rule("required"),
		),
	]
}
