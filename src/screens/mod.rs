//! Representative console screens
//!
//! Each screen mounts an [`EntityStore`], renders its fields through
//! [`FieldWrapper`]s inside a [`FormValidation`] container and saves through
//! the store once the form accepts a submit. Transport failures become
//! session notifications; nothing here returns an error to the caller.

mod content;
mod season;
mod user;

pub use content::ContentFormScreen;
pub use season::SeasonFormScreen;
pub use user::UserFormScreen;

use backoffice_forms::{FieldChange, FieldWrapper, FormSnapshot, FormValidation, RenderContext};
use backoffice_pages::{Callback, Event, IntoView, View};
use backoffice_stores::{AppSession, EntityData, EntityStore, FormMode, NotificationLevel};
use backoffice_validators::RuleTable;
use std::rc::Rc;

/// State shared by every form screen
struct FormScreen {
	entity: &'static str,
	session: Rc<AppSession>,
	store: Rc<EntityStore>,
	form: Rc<FormValidation>,
}

impl FormScreen {
	fn new(entity: &'static str, session: &Rc<AppSession>, store: EntityStore, table: Rc<RuleTable>) -> Self {
		let form = FormValidation::new(table, move |snapshot: FormSnapshot| {
			tracing::debug!(entity, fields = snapshot.len(), "form accepted");
		});
		Self {
			entity,
			session: Rc::clone(session),
			store: Rc::new(store),
			form,
		}
	}

	/// Fetches the entity when editing. Returns `false` after a reported failure.
	async fn load(&self) -> bool {
		if self.store.mode() == FormMode::Create {
			return true;
		}
		self.session.report(self.store.load().await).is_some()
	}

	/// Fetches every option list queued by the last render or request.
	async fn fetch_options(&self) -> bool {
		self.session
			.report(self.store.fetch_pending_options().await)
			.is_some()
	}

	fn render(&self, fields: &[FieldWrapper], on_change: Callback<FieldChange>, extra: impl IntoView) -> View {
		let ctx = RenderContext::new(&*self.store, on_change).with_errors(self.form.errors().get());
		let rendered = fields.iter().map(|field| field.render(&ctx)).collect();
		self.form.render(rendered, extra)
	}

	/// Dispatches a submit into `view` and saves when the form lets it through.
	async fn submit(&self, view: &View) -> Option<EntityData> {
		let event = Event::submit();
		view.dispatch(&event);
		if event.is_default_prevented() {
			return None;
		}
		let saved = self.session.report(self.store.save().await)?;
		self.session
			.notify(NotificationLevel::Success, format!("The {} was saved.", self.entity));
		Some(saved)
	}
}

fn submit_button(label: &'static str) -> View {
	View::element("button")
		.attr("type", "submit")
		.child(label)
		.into_view()
}
