//! Pagination for list screens

use crate::callback::Callback;
use crate::event::EventType;
use crate::view::{IntoView, View};
use serde::{Deserialize, Serialize};

/// Pagination state of a page table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
	/// Number of items per page
	pub per_page: usize,
	/// Current page number (1-indexed)
	pub current_page: usize,
	/// Total number of items
	pub total_items: usize,
}

/// One entry of the rendered page list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
	Page(usize),
	/// Elided pages between two links
	Gap,
}

/// Query parameters sent with a list request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageQuery {
	pub page: usize,
	pub page_size: usize,
}

impl Pagination {
	/// Creates pagination on page 1 with no items.
	///
	/// A `per_page` of zero is raised to one.
	pub fn new(per_page: usize) -> Self {
		Self {
			per_page: per_page.max(1),
			current_page: 1,
			total_items: 0,
		}
	}

	/// Returns the total number of pages
	pub fn total_pages(&self) -> usize {
		if self.total_items == 0 {
			0
		} else {
			self.total_items.div_ceil(self.per_page)
		}
	}

	/// Returns the start index for the current page (0-indexed)
	pub fn start_index(&self) -> usize {
		(self.current_page.saturating_sub(1)) * self.per_page
	}

	/// Returns the end index for the current page (exclusive, 0-indexed)
	pub fn end_index(&self) -> usize {
		(self.start_index() + self.per_page).min(self.total_items)
	}

	/// Updates the item count and pulls the current page back into range.
	pub fn set_total_items(&mut self, total_items: usize) {
		self.total_items = total_items;
		self.set_page(self.current_page);
	}

	/// Moves to the next page if available
	pub fn next_page(&mut self) -> bool {
		if self.current_page < self.total_pages() {
			self.current_page += 1;
			true
		} else {
			false
		}
	}

	/// Moves to the previous page if available
	pub fn prev_page(&mut self) -> bool {
		if self.current_page > 1 {
			self.current_page -= 1;
			true
		} else {
			false
		}
	}

	/// Sets the current page, clamped to the available pages
	pub fn set_page(&mut self, page: usize) {
		self.current_page = page.max(1).min(self.total_pages().max(1));
	}

	pub fn query(&self) -> PageQuery {
		PageQuery {
			page: self.current_page,
			page_size: self.per_page,
		}
	}

	/// Page links around the current page.
	///
	/// The first and last pages are always listed, plus `radius` pages on each
	/// side of the current one; skipped runs collapse into a single
	/// [`PageLink::Gap`].
	pub fn window(&self, radius: usize) -> Vec<PageLink> {
		let total = self.total_pages();
		if total == 0 {
			return Vec::new();
		}
		let low = self.current_page.saturating_sub(radius).max(1);
		let high = self.current_page.saturating_add(radius).min(total);

		let mut pages = Vec::with_capacity(high.saturating_sub(low) + 3);
		pages.push(1);
		pages.extend(low..=high);
		pages.push(total);
		pages.dedup();

		let mut links = Vec::with_capacity(pages.len() + 2);
		let mut previous = 0;
		for page in pages {
			if previous != 0 && page > previous + 1 {
				links.push(PageLink::Gap);
			}
			links.push(PageLink::Page(page));
			previous = page;
		}
		links
	}

	/// Renders the page list as buttons calling `on_select` with a page number.
	pub fn render(&self, radius: usize, on_select: Callback<usize>) -> View {
		if self.total_pages() <= 1 {
			return View::empty();
		}

		let links = self.window(radius).into_iter().map(|link| match link {
			PageLink::Gap => View::element("span")
				.attr("class", "page-gap")
				.child("…")
				.into_view(),
			PageLink::Page(page) => {
				let on_select = on_select.clone();
				let class = if page == self.current_page {
					"page-link active"
				} else {
					"page-link"
				};
				View::element("button")
					.attr("type", "button")
					.attr("class", class)
					.attr("name", format!("page-{page}"))
					.on_event(EventType::Click, move |_| on_select.call(page))
					.child(page.to_string())
					.into_view()
			}
		});

		View::element("nav")
			.attr("class", "pagination")
			.children(links)
			.into_view()
	}
}
