//! Content screen against an in-memory backend

use backoffice::ContentFormScreen;
use backoffice::forms::LOADING_TEXT;
use backoffice::pages::{ElementView, Event, View};
use backoffice::stores::{ApiError, ApiResponse, AppSession, FieldStore, FormMode, NotificationLevel};
use backoffice::validators::RuleTable;
use backoffice_stores::testing::MockTransport;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::rc::Rc;

struct Backend {
	transport: Rc<MockTransport>,
	session: Rc<AppSession>,
}

#[fixture]
fn backend() -> Backend {
	let transport = Rc::new(MockTransport::new());
	transport.respond(
		"genres.list",
		json!([{"id": 1, "name": "Drama"}, {"id": 2, "name": "Comedy"}]),
	);
	transport.respond_with("subgenres.list", |call| {
		let genre = call.params.get("genre_id").cloned().unwrap_or_default();
		Ok(ApiResponse::ok(json!([
			{"id": format!("{genre}0"), "name": format!("Sub {genre}")}
		])))
	});
	transport.respond("languages.list", json!({"results": [{"id": "en", "name": "English"}]}));
	transport.respond(
		"age_groups.list",
		json!([{"min_age": 0, "name": "All ages"}, {"min_age": 16, "name": "16+"}]),
	);
	transport.respond_with("content.create", |call| {
		let mut saved = call.body.clone().unwrap_or(Value::Null);
		saved["id"] = json!(7);
		Ok(ApiResponse::created(saved))
	});
	let session = AppSession::detached(transport.clone());
	Backend { transport, session }
}

fn mount(backend: &Backend) -> ContentFormScreen {
	ContentFormScreen::mount(&backend.session, None, Rc::new(RuleTable::standard()))
}

fn options<'a>(view: &'a View, name: &str) -> Vec<&'a ElementView> {
	view.find_by_name(name)
		.map(|select| {
			select
				.child_views()
				.iter()
				.filter_map(|child| match child {
					View::Element(option) if option.tag_name() == "option" => Some(option),
					_ => None,
				})
				.collect()
		})
		.unwrap_or_default()
}

fn option_values(view: &View, name: &str) -> Vec<String> {
	options(view, name)
		.into_iter()
		.filter_map(|option| option.get_attr("value"))
		.filter(|value| !value.is_empty())
		.map(str::to_string)
		.collect()
}

#[rstest]
#[tokio::test]
async fn test_options_load_lazily_and_subgenres_follow_genre(backend: Backend) {
	// Arrange
	let screen = mount(&backend);
	let before = screen.render();
	assert_eq!(before.find_all_by_class("loading-indicator").len(), 3);
	assert!(before.render_to_string().contains(LOADING_TEXT));

	// Act
	assert!(screen.load().await);
	let view = screen.render();

	// Assert
	assert_eq!(option_values(&view, "genre"), vec!["1", "2"]);
	assert_eq!(option_values(&view, "languages"), vec!["en"]);
	assert_eq!(option_values(&view, "subgenre"), Vec::<String>::new());
	assert_eq!(backend.transport.call_count("subgenres.list"), 0);

	// Act
	view.dispatch(&Event::change("genre", json!("2")));
	assert!(screen.refresh_options().await);
	let view = screen.render();

	// Assert
	assert_eq!(option_values(&view, "subgenre"), vec!["20"]);
	let calls = backend.transport.calls_to("subgenres.list");
	assert_eq!(calls.len(), 1);
	assert_eq!(calls[0].params.get("genre_id").map(String::as_str), Some("2"));
	assert_eq!(backend.transport.call_count("genres.list"), 1);
}

#[rstest]
#[tokio::test]
async fn test_changing_genre_clears_subgenre(backend: Backend) {
	// Arrange
	let screen = mount(&backend);
	screen.load().await;
	let view = screen.render();
	view.dispatch(&Event::change("genre", json!("1")));
	screen.refresh_options().await;
	let view = screen.render();
	view.dispatch(&Event::change("subgenre", json!("10")));
	assert_eq!(screen.store().get_store_value("subgenre"), json!("10"));

	// Act
	view.dispatch(&Event::change("genre", json!("1")));
	let unchanged = screen.store().get_store_value("subgenre");
	view.dispatch(&Event::change("genre", json!("2")));

	// Assert
	assert_eq!(unchanged, json!("10"));
	assert_eq!(screen.store().get_store_value("subgenre"), Value::Null);
}

#[rstest]
#[tokio::test]
async fn test_empty_submit_is_blocked_without_backend_call(backend: Backend) {
	// Arrange
	let screen = mount(&backend);
	screen.load().await;
	let view = screen.render();

	// Act
	let saved = screen.submit(&view).await;
	let view = screen.render();

	// Assert
	assert_eq!(saved, None);
	assert_eq!(backend.transport.call_count("content.create"), 0);
	assert_eq!(screen.form().error_for("title").as_deref(), Some("This field is required."));
	assert_eq!(screen.form().error_for("genre").as_deref(), Some("This field is required."));
	assert_eq!(view.find_all_by_class("error-message").len(), 2);
}

#[rstest]
#[tokio::test]
async fn test_valid_submit_creates_content(backend: Backend) {
	// Arrange
	let screen = mount(&backend);
	screen.load().await;
	let view = screen.render();
	view.dispatch(&Event::change("title", json!("Dune")));
	view.dispatch(&Event::change("genre", json!("1")));
	view.dispatch(&Event::change("languages", json!(["en"])));

	// Act
	let saved = screen.submit(&view).await;

	// Assert
	let saved = saved.expect("content should be saved");
	assert_eq!(saved.get("id"), Some(&json!(7)));
	assert_eq!(saved.get("title"), Some(&json!("Dune")));
	assert_eq!(screen.store().mode(), FormMode::Edit);
	let body = backend.transport.calls_to("content.create")[0].body.clone();
	assert_eq!(body.as_ref().and_then(|b| b.get("languages")), Some(&json!(["en"])));
	let notifications = backend.session.notifications();
	assert_eq!(notifications.len(), 1);
	assert_eq!(notifications[0].level, NotificationLevel::Success);
}

#[rstest]
#[case(json!("x".repeat(121)), Some("Please enter no more than 120 characters."))]
#[case(json!("x".repeat(120)), None)]
#[tokio::test]
async fn test_title_length_limit(backend: Backend, #[case] title: Value, #[case] expected: Option<&str>) {
	// Arrange
	let screen = mount(&backend);
	screen.load().await;
	let view = screen.render();
	view.dispatch(&Event::change("title", title));
	view.dispatch(&Event::change("genre", json!("1")));

	// Act
	screen.submit(&view).await;

	// Assert
	assert_eq!(screen.form().error_for("title").as_deref(), expected);
}

#[rstest]
#[tokio::test]
async fn test_untranscoded_media_blocks_submit(backend: Backend) {
	// Arrange
	backend
		.transport
		.reject("transcoding.check", ApiError::new(409, "Conflict"));
	let screen = mount(&backend);
	screen.load().await;
	let view = screen.render();
	view.dispatch(&Event::change("title", json!("Dune")));
	view.dispatch(&Event::change("genre", json!("1")));
	view.dispatch(&Event::change("media_id", json!("media-42")));

	// Act
	let saved = screen.submit(&view).await;

	// Assert
	assert_eq!(saved, None);
	assert_eq!(backend.transport.call_count("content.create"), 0);
	assert_eq!(
		screen.form().error_for("media_id").as_deref(),
		Some("This media is still being transcoded.")
	);
	let calls = backend.transport.calls_to("transcoding.check");
	assert_eq!(calls[0].params.get("media_id").map(String::as_str), Some("media-42"));
}

#[rstest]
#[tokio::test]
async fn test_transcoded_media_lets_submit_through(backend: Backend) {
	// Arrange
	backend.transport.respond("transcoding.check", json!({"status": "ready"}));
	let screen = mount(&backend);
	screen.load().await;
	let view = screen.render();
	view.dispatch(&Event::change("title", json!("Dune")));
	view.dispatch(&Event::change("genre", json!("1")));
	view.dispatch(&Event::change("media_id", json!("media-42")));

	// Act
	let saved = screen.submit(&view).await;

	// Assert
	assert!(saved.is_some());
	assert_eq!(screen.form().error_for("media_id"), None);
}

#[rstest]
#[tokio::test]
async fn test_add_new_action_opens_dialog(backend: Backend) {
	// Arrange
	let screen = mount(&backend);
	let view = screen.render();

	// Act
	view.dispatch(&Event::click("genre-action"));

	// Assert
	assert_eq!(screen.dialog().as_deref(), Some("genre"));
	screen.close_dialog();
	assert_eq!(screen.dialog(), None);
}

#[rstest]
#[tokio::test]
async fn test_zero_age_group_stays_selected(backend: Backend) {
	// Arrange
	let screen = mount(&backend);
	screen.load().await;
	screen.store().set_field("age_group", json!(0));

	// Act
	let view = screen.render();

	// Assert
	let selected: Vec<_> = options(&view, "age_group")
		.into_iter()
		.filter(|option| option.has_attr("selected"))
		.filter_map(|option| option.get_attr("value"))
		.collect();
	assert_eq!(selected, vec!["0"]);
}

#[rstest]
#[tokio::test]
async fn test_failed_load_becomes_notification(backend: Backend) {
	// Arrange
	backend
		.transport
		.reject("content.get", ApiError::network("connection refused"));
	let screen = ContentFormScreen::mount(&backend.session, Some("7"), Rc::new(RuleTable::standard()));

	// Act
	let loaded = screen.load().await;

	// Assert
	assert!(!loaded);
	assert_eq!(backend.transport.call_count("genres.list"), 0);
	let notifications = backend.session.notifications();
	assert_eq!(notifications.len(), 1);
	assert_eq!(notifications[0].level, NotificationLevel::Error);
	assert_eq!(
		notifications[0].message,
		"The server could not be reached. Please try again."
	);
}
