//! View tree produced by rendering.
//!
//! A [`View`] is plain data: elements, text, fragments. Rendering a screen
//! yields a fresh tree; [`View::render_to_string`] turns it into HTML and
//! the query helpers let tests inspect it and fire events into it.

use crate::event::{Event, EventType, ViewEventHandler};
use std::borrow::Cow;
use std::rc::Rc;

/// A unified representation of renderable content.
#[derive(Debug)]
pub enum View {
	/// An element.
	Element(ElementView),
	/// A text node.
	Text(Cow<'static, str>),
	/// Several views without a wrapper element.
	Fragment(Vec<View>),
	/// Renders nothing.
	Empty,
}

/// An element in the view tree.
pub struct ElementView {
	tag: Cow<'static, str>,
	attrs: Vec<(Cow<'static, str>, Cow<'static, str>)>,
	children: Vec<View>,
	is_void: bool,
	event_handlers: Vec<(EventType, ViewEventHandler)>,
}

impl std::fmt::Debug for ElementView {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ElementView")
			.field("tag", &self.tag)
			.field("attrs", &self.attrs)
			.field("children", &self.children)
			.field("is_void", &self.is_void)
			.field("event_handlers_count", &self.event_handlers.len())
			.finish()
	}
}

impl ElementView {
	/// Creates a new element view.
	pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
		let tag = tag.into();
		let is_void = matches!(
			tag.as_ref(),
			"area" | "br" | "col" | "hr" | "img" | "input" | "link" | "meta" | "source" | "wbr"
		);
		Self {
			tag,
			attrs: Vec::new(),
			children: Vec::new(),
			is_void,
			event_handlers: Vec::new(),
		}
	}

	/// Adds an attribute.
	pub fn attr(
		mut self,
		name: impl Into<Cow<'static, str>>,
		value: impl Into<Cow<'static, str>>,
	) -> Self {
		self.attrs.push((name.into(), value.into()));
		self
	}

	/// Adds a boolean attribute (`disabled`, `selected`, ...) when `enabled`.
	pub fn bool_attr(self, name: &'static str, enabled: bool) -> Self {
		if enabled { self.attr(name, name) } else { self }
	}

	/// Adds a child view.
	pub fn child(mut self, child: impl IntoView) -> Self {
		self.children.push(child.into_view());
		self
	}

	/// Adds multiple child views.
	pub fn children(mut self, children: impl IntoIterator<Item = impl IntoView>) -> Self {
		self.children
			.extend(children.into_iter().map(|c| c.into_view()));
		self
	}

	/// Adds an event handler.
	pub fn on(mut self, event_type: EventType, handler: ViewEventHandler) -> Self {
		self.event_handlers.push((event_type, handler));
		self
	}

	/// Adds an event handler from a closure.
	pub fn on_event<F>(self, event_type: EventType, handler: F) -> Self
	where
		F: Fn(&Event) + 'static,
	{
		self.on(event_type, Rc::new(handler))
	}

	pub fn tag_name(&self) -> &str {
		&self.tag
	}

	pub fn attrs(&self) -> &[(Cow<'static, str>, Cow<'static, str>)] {
		&self.attrs
	}

	/// Value of the first attribute named `name`
	pub fn get_attr(&self, name: &str) -> Option<&str> {
		self.attrs
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, v)| v.as_ref())
	}

	pub fn has_attr(&self, name: &str) -> bool {
		self.get_attr(name).is_some()
	}

	/// Whether the `class` attribute lists `class`
	pub fn has_class(&self, class: &str) -> bool {
		self.get_attr("class")
			.is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
	}

	pub fn child_views(&self) -> &[View] {
		&self.children
	}

	pub fn is_void(&self) -> bool {
		self.is_void
	}

	pub fn event_handlers(&self) -> &[(EventType, ViewEventHandler)] {
		&self.event_handlers
	}

	/// Concatenated text of all descendant text nodes
	pub fn text_content(&self) -> String {
		let mut out = String::new();
		for child in &self.children {
			child.collect_text(&mut out);
		}
		out
	}
}

impl View {
	/// Creates an element view.
	pub fn element(tag: impl Into<Cow<'static, str>>) -> ElementView {
		ElementView::new(tag)
	}

	/// Creates a text view.
	pub fn text(content: impl Into<Cow<'static, str>>) -> Self {
		Self::Text(content.into())
	}

	/// Creates a fragment view.
	pub fn fragment(children: impl IntoIterator<Item = impl IntoView>) -> Self {
		Self::Fragment(children.into_iter().map(|c| c.into_view()).collect())
	}

	/// Creates an empty view.
	pub fn empty() -> Self {
		Self::Empty
	}

	/// Renders the view to an HTML string.
	pub fn render_to_string(&self) -> String {
		let mut output = String::new();
		self.render_to_string_inner(&mut output);
		output
	}

	fn render_to_string_inner(&self, output: &mut String) {
		match self {
			View::Element(el) => {
				output.push('<');
				output.push_str(el.tag_name());

				for (name, value) in el.attrs() {
					output.push(' ');
					output.push_str(name);
					output.push_str("=\"");
					output.push_str(&html_escape(value));
					output.push('"');
				}

				if el.is_void() {
					output.push_str(" />");
				} else {
					output.push('>');
					for child in el.child_views() {
						child.render_to_string_inner(output);
					}
					output.push_str("</");
					output.push_str(el.tag_name());
					output.push('>');
				}
			}
			View::Text(text) => {
				output.push_str(&html_escape(text));
			}
			View::Fragment(children) => {
				for child in children {
					child.render_to_string_inner(output);
				}
			}
			View::Empty => {}
		}
	}

	fn collect_text(&self, out: &mut String) {
		match self {
			View::Element(el) => {
				for child in el.child_views() {
					child.collect_text(out);
				}
			}
			View::Text(text) => out.push_str(text),
			View::Fragment(children) => {
				for child in children {
					child.collect_text(out);
				}
			}
			View::Empty => {}
		}
	}

	/// Concatenated text of the whole tree
	pub fn text_content(&self) -> String {
		let mut out = String::new();
		self.collect_text(&mut out);
		out
	}

	/// Visits every element in document order.
	pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a ElementView)) {
		match self {
			View::Element(el) => {
				visit(el);
				for child in el.child_views() {
					child.walk(visit);
				}
			}
			View::Fragment(children) => {
				for child in children {
					child.walk(visit);
				}
			}
			View::Text(_) | View::Empty => {}
		}
	}

	/// All elements matching `predicate`, in document order
	pub fn find_all(&self, predicate: impl Fn(&ElementView) -> bool) -> Vec<&ElementView> {
		let mut found = Vec::new();
		self.walk(&mut |el| {
			if predicate(el) {
				found.push(el);
			}
		});
		found
	}

	/// First element matching `predicate`
	pub fn find(&self, predicate: impl Fn(&ElementView) -> bool) -> Option<&ElementView> {
		self.find_all(predicate).into_iter().next()
	}

	/// First control whose `name` attribute equals `name`
	pub fn find_by_name(&self, name: &str) -> Option<&ElementView> {
		self.find(|el| el.get_attr("name") == Some(name))
	}

	pub fn find_all_by_tag(&self, tag: &str) -> Vec<&ElementView> {
		self.find_all(|el| el.tag_name() == tag)
	}

	pub fn find_all_by_class(&self, class: &str) -> Vec<&ElementView> {
		self.find_all(|el| el.has_class(class))
	}

	/// Delivers `event` to the matching handlers and returns how many ran.
	///
	/// Targeted events start at the elements whose `name` attribute equals
	/// the event's target and bubble through their ancestors, innermost
	/// first. Untargeted events go to every element handling that event type
	/// (a submit reaches the `form`).
	pub fn dispatch(&self, event: &Event) -> usize {
		let mut handlers: Vec<ViewEventHandler> = Vec::new();
		match event.target() {
			Some(target) => {
				self.collect_bubbling(target, event.event_type(), &mut handlers);
			}
			None => self.walk(&mut |el| push_handlers(el, event.event_type(), &mut handlers)),
		}
		for handler in &handlers {
			handler(event);
		}
		handlers.len()
	}

	// Returns whether `target` is inside this subtree.
	fn collect_bubbling(
		&self,
		target: &str,
		event_type: EventType,
		out: &mut Vec<ViewEventHandler>,
	) -> bool {
		match self {
			View::Element(el) => {
				let mut contains = false;
				for child in el.child_views() {
					contains |= child.collect_bubbling(target, event_type, out);
				}
				if el.get_attr("name") == Some(target) {
					contains = true;
				}
				if contains {
					push_handlers(el, event_type, out);
				}
				contains
			}
			View::Fragment(children) => {
				let mut contains = false;
				for child in children {
					contains |= child.collect_bubbling(target, event_type, out);
				}
				contains
			}
			View::Text(_) | View::Empty => false,
		}
	}
}

fn push_handlers(el: &ElementView, event_type: EventType, out: &mut Vec<ViewEventHandler>) {
	out.extend(
		el.event_handlers()
			.iter()
			.filter(|(ty, _)| *ty == event_type)
			.map(|(_, h)| Rc::clone(h)),
	);
}

/// Trait for types that can be converted into a View.
pub trait IntoView {
	fn into_view(self) -> View;
}

impl IntoView for View {
	fn into_view(self) -> View {
		self
	}
}

impl IntoView for ElementView {
	fn into_view(self) -> View {
		View::Element(self)
	}
}

impl IntoView for String {
	fn into_view(self) -> View {
		View::Text(Cow::Owned(self))
	}
}

impl IntoView for &'static str {
	fn into_view(self) -> View {
		View::Text(Cow::Borrowed(self))
	}
}

impl<T: IntoView> IntoView for Option<T> {
	fn into_view(self) -> View {
		match self {
			Some(v) => v.into_view(),
			None => View::Empty,
		}
	}
}

impl<T: IntoView> IntoView for Vec<T> {
	fn into_view(self) -> View {
		View::Fragment(self.into_iter().map(|v| v.into_view()).collect())
	}
}

impl IntoView for () {
	fn into_view(self) -> View {
		View::Empty
	}
}

impl<A: IntoView, B: IntoView> IntoView for (A, B) {
	fn into_view(self) -> View {
		View::Fragment(vec![self.0.into_view(), self.1.into_view()])
	}
}

impl<A: IntoView, B: IntoView, C: IntoView> IntoView for (A, B, C) {
	fn into_view(self) -> View {
		View::Fragment(vec![
			self.0.into_view(),
			self.1.into_view(),
			self.2.into_view(),
		])
	}
}

/// Escapes HTML special characters.
pub fn html_escape(s: &str) -> Cow<'_, str> {
	if s.contains(['&', '<', '>', '"', '\'']) {
		let mut escaped = String::with_capacity(s.len() + 8);
		for c in s.chars() {
			match c {
				'&' => escaped.push_str("&amp;"),
				'<' => escaped.push_str("&lt;"),
				'>' => escaped.push_str("&gt;"),
				'"' => escaped.push_str("&quot;"),
				'\'' => escaped.push_str("&#x27;"),
				_ => escaped.push(c),
			}
		}
		Cow::Owned(escaped)
	} else {
		Cow::Borrowed(s)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;
	use std::cell::RefCell;

	fn sample_form() -> View {
		View::element("form")
			.child(
				View::element("div")
					.attr("class", "field has-error")
					.child(View::element("input").attr("name", "email").attr("type", "text"))
					.child(View::element("span").attr("class", "error").child("Required")),
			)
			.child(View::element("button").attr("type", "submit").child("Save"))
			.into_view()
	}

	#[rstest]
	fn test_void_element_detection() {
		assert!(ElementView::new("input").is_void());
		assert!(ElementView::new("br").is_void());
		assert!(!ElementView::new("select").is_void());
		assert!(!ElementView::new("textarea").is_void());
	}

	#[rstest]
	fn test_render_nested_with_attrs() {
		// Arrange
		let view = View::element("select")
			.attr("name", "genre")
			.child(View::element("option").attr("value", "1").bool_attr("selected", true).child("Drama"))
			.child(View::element("option").attr("value", "2").bool_attr("selected", false).child("Comedy"))
			.into_view();

		// Act
		let html = view.render_to_string();

		// Assert
		assert_eq!(
			html,
			"<select name=\"genre\"><option value=\"1\" selected=\"selected\">Drama</option><option value=\"2\">Comedy</option></select>"
		);
	}

	#[rstest]
	fn test_render_escapes_text_and_attrs() {
		let view = View::element("input").attr("value", "\"quoted\" & <b>").into_view();
		assert_eq!(
			view.render_to_string(),
			"<input value=\"&quot;quoted&quot; &amp; &lt;b&gt;\" />"
		);
		assert_eq!(
			View::text("<script>").render_to_string(),
			"&lt;script&gt;"
		);
	}

	#[rstest]
	fn test_queries() {
		// Arrange
		let view = sample_form();

		// Act
		let input = view.find_by_name("email");
		let errors = view.find_all_by_class("error");
		let fields = view.find_all_by_class("field");

		// Assert
		assert_eq!(input.map(|el| el.tag_name()), Some("input"));
		assert_eq!(errors.len(), 1);
		assert_eq!(errors[0].text_content(), "Required");
		assert!(fields[0].has_class("has-error"));
		assert_eq!(view.find_all_by_tag("button").len(), 1);
		assert_eq!(view.text_content(), "RequiredSave");
	}

	#[rstest]
	fn test_dispatch_targets_named_control() {
		// Arrange
		let seen = Rc::new(RefCell::new(Vec::new()));
		let email_seen = Rc::clone(&seen);
		let other_seen = Rc::clone(&seen);
		let view = View::fragment(vec![
			View::element("input")
				.attr("name", "email")
				.on_event(EventType::Change, move |e| {
					email_seen.borrow_mut().push(("email", e.value().clone()))
				})
				.into_view(),
			View::element("input")
				.attr("name", "title")
				.on_event(EventType::Change, move |e| {
					other_seen.borrow_mut().push(("title", e.value().clone()))
				})
				.into_view(),
		]);

		// Act
		let ran = view.dispatch(&Event::change("email", json!("a@b.co")));

		// Assert
		assert_eq!(ran, 1);
		assert_eq!(seen.borrow().as_slice(), [("email", json!("a@b.co"))]);
	}

	#[rstest]
	fn test_targeted_event_bubbles_to_ancestors() {
		// Arrange
		let order = Rc::new(RefCell::new(Vec::new()));
		let inner = Rc::clone(&order);
		let outer = Rc::clone(&order);
		let view = View::element("form")
			.on_event(EventType::Change, move |_| outer.borrow_mut().push("form"))
			.child(
				View::element("div").child(
					View::element("input")
						.attr("name", "title")
						.on_event(EventType::Change, move |_| inner.borrow_mut().push("input")),
				),
			)
			.child(View::element("input").attr("name", "other"))
			.into_view();

		// Act
		let ran = view.dispatch(&Event::change("title", json!("x")));

		// Assert
		assert_eq!(ran, 2);
		assert_eq!(order.borrow().as_slice(), ["input", "form"]);
	}

	#[rstest]
	fn test_dispatch_untargeted_submit_reaches_form() {
		// Arrange
		let view = View::element("form")
			.on_event(EventType::Submit, |e| e.prevent_default())
			.child(View::element("input").attr("name", "x"))
			.into_view();
		let event = Event::submit();

		// Act
		let ran = view.dispatch(&event);

		// Assert
		assert_eq!(ran, 1);
		assert!(event.is_default_prevented());
	}

	#[rstest]
	fn test_dispatch_ignores_other_event_types() {
		let view = View::element("button")
			.attr("name", "add")
			.on_event(EventType::Click, |_| {})
			.into_view();
		assert_eq!(view.dispatch(&Event::change("add", json!(null))), 0);
		assert_eq!(view.dispatch(&Event::click("add")), 1);
	}

	#[rstest]
	fn test_into_view_option_and_tuple() {
		let none: View = None::<String>.into_view();
		assert_eq!(none.render_to_string(), "");
		assert_eq!(("a", "b").into_view().render_to_string(), "ab");
	}
}
