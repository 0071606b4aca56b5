//! User screen: password confirmation against the live password

use backoffice::UserFormScreen;
use backoffice::pages::{Event, View};
use backoffice::stores::{ApiError, ApiResponse, AppSession, FieldStore};
use backoffice::validators::RuleTable;
use backoffice_stores::testing::MockTransport;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::rc::Rc;

struct Harness {
	transport: Rc<MockTransport>,
	screen: UserFormScreen,
}

impl Harness {
	/// Fills every field, re-rendering after the password like the console does.
	fn fill(&self, email: &str, password: &str, confirm: &str, role: &str) -> View {
		let view = self.screen.render();
		view.dispatch(&Event::change("email", json!(email)));
		view.dispatch(&Event::change("password", json!(password)));
		let view = self.screen.render();
		view.dispatch(&Event::change("password_confirm", json!(confirm)));
		view.dispatch(&Event::change("role", json!(role)));
		view
	}
}

#[fixture]
fn harness() -> Harness {
	let transport = Rc::new(MockTransport::new());
	transport.respond_with("user.create", |call| {
		let mut saved = call.body.clone().unwrap_or(Value::Null);
		saved["id"] = json!(5);
		Ok(ApiResponse::created(saved))
	});
	let session = AppSession::detached(transport.clone());
	let screen = UserFormScreen::mount(&session, None, Rc::new(RuleTable::standard()));
	Harness { transport, screen }
}

#[rstest]
#[tokio::test]
async fn test_matching_passwords_create_user(harness: Harness) {
	// Arrange
	let view = harness.fill("editor@example.com", "secret1", "secret1", "editor");

	// Act
	let saved = harness.screen.submit(&view).await;

	// Assert
	assert_eq!(saved.and_then(|s| s.get("id").cloned()), Some(json!(5)));
	let body = harness.transport.calls_to("user.create")[0].body.clone();
	assert_eq!(
		body,
		Some(json!({"email": "editor@example.com", "password": "secret1", "role": "editor"}))
	);
}

#[rstest]
fn test_password_controls_are_masked(harness: Harness) {
	// Act
	let view = harness.fill("editor@example.com", "secret1", "secret1", "editor");

	// Assert
	for name in ["password", "password_confirm"] {
		let control = view.find_by_name(name).expect("password control");
		assert_eq!(control.get_attr("type"), Some("password"));
		assert_eq!(control.get_attr("value"), None);
	}
	assert!(!harness.screen.render().render_to_string().contains("secret1"));
}

#[rstest]
#[tokio::test]
async fn test_confirmation_follows_password_typed_without_rerender(harness: Harness) {
	// Arrange
	let view = harness.fill("editor@example.com", "secret1", "secret1", "editor");

	// Act
	view.dispatch(&Event::change("password", json!("changed1")));
	view.dispatch(&Event::change("password_confirm", json!("changed1")));
	let saved = harness.screen.submit(&view).await;

	// Assert
	assert!(saved.is_some());
	let body = harness.transport.calls_to("user.create")[0].body.clone();
	assert_eq!(body.as_ref().and_then(|b| b.get("password")), Some(&json!("changed1")));
}

#[rstest]
#[case("secret1", "secret2", "password_confirm", "Passwords do not match.")]
#[case("abc", "abc", "password", "Please enter between 6 and 255 characters.")]
#[case("", "", "password", "This field is required.")]
#[tokio::test]
async fn test_invalid_password_blocks_submit(
	harness: Harness,
	#[case] password: &str,
	#[case] confirm: &str,
	#[case] field: &str,
	#[case] expected: &str,
) {
	// Arrange
	let view = harness.fill("editor@example.com", password, confirm, "editor");

	// Act
	let saved = harness.screen.submit(&view).await;

	// Assert
	assert_eq!(saved, None);
	assert_eq!(harness.screen.form().error_for(field).as_deref(), Some(expected));
	assert_eq!(harness.transport.call_count("user.create"), 0);
}

#[rstest]
#[tokio::test]
async fn test_role_placeholder_is_not_a_choice(harness: Harness) {
	// Arrange
	let view = harness.fill("editor@example.com", "secret1", "secret1", "");

	// Act
	harness.screen.submit(&view).await;

	// Assert
	assert_eq!(
		harness.screen.form().error_for("role").as_deref(),
		Some("This field is required.")
	);
}

#[rstest]
#[tokio::test]
async fn test_backend_field_errors_show_on_next_render(harness: Harness) {
	// Arrange
	harness.transport.reject(
		"user.create",
		ApiError::new(400, "Invalid user").with_validation(json!({"email": ["Email already taken."]})),
	);
	let view = harness.fill("editor@example.com", "secret1", "secret1", "admin");

	// Act
	let saved = harness.screen.submit(&view).await;
	let view = harness.screen.render();

	// Assert
	assert_eq!(saved, None);
	assert_eq!(
		harness.screen.store().server_error("email").as_deref(),
		Some("Email already taken.")
	);
	let messages: Vec<String> = view
		.find_all_by_class("error-message")
		.iter()
		.map(|el| el.text_content())
		.collect();
	assert_eq!(messages, vec!["Email already taken."]);
}
