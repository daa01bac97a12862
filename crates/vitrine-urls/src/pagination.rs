//! Pagination links.

use serde::Serialize;

use crate::binding::PathQuery;
use crate::error::StateError;
use crate::link::LinkBuilder;

/// One link of a pagination control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
	/// Page the link leads to.
	pub page: i64,
	/// Target path.
	pub href: String,
	/// Whether this is the current page.
	pub selected: bool,
}

/// Previous, next and numbered page links for the current location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationLinks {
	/// The current page.
	pub current: i64,
	/// Link to the page before the current one.
	pub previous: PageLink,
	/// Link to the page after the current one.
	pub next: PageLink,
	/// Links to pages `1..=pages`.
	pub pages: Vec<PageLink>,
	/// No page precedes the current one; the previous link is disabled.
	pub is_first: bool,
	/// No page follows the current one; the next link is disabled.
	pub is_last: bool,
}

impl PaginationLinks {
	/// Builds the links from the page `binding` and `links`.
	///
	/// Every href is computed by the same step a page write uses, so clicking
	/// a link lands on exactly the path the binding would produce. Neighbour
	/// pages saturate at the `i64` bounds.
	pub fn build(
		binding: &PathQuery<i64>,
		links: &LinkBuilder,
		pages: i64,
	) -> Result<Self, StateError> {
		let current = binding.read();
		let link = |page: i64| -> Result<PageLink, StateError> {
			Ok(PageLink {
				page,
				href: links.link(binding.key(), &page, &[])?,
				selected: page == current,
			})
		};

		Ok(Self {
			current,
			previous: link(current.saturating_sub(1))?,
			next: link(current.saturating_add(1))?,
			pages: (1..=pages.max(0)).map(link).collect::<Result<_, _>>()?,
			is_first: current <= 1,
			is_last: current >= pages,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::navigation::MemoryHistory;
	use rstest::rstest;
	use std::sync::Arc;

	fn build(path: &str, pages: i64) -> PaginationLinks {
		let history = Arc::new(MemoryHistory::new("/products/{params:*}", path));
		let binding = PathQuery::new(history, "page", 1_i64);
		let links = binding.link_builder();
		PaginationLinks::build(&binding, &links, pages).unwrap()
	}

	#[rstest]
	fn test_middle_page() {
		let links = build("/products/shoes/page=3;sort=new", 5);

		assert_eq!(links.current, 3);
		assert_eq!(links.previous.href, "/products/shoes/page=2;sort=new");
		assert_eq!(links.next.href, "/products/shoes/page=4;sort=new");
		assert!(!links.is_first);
		assert!(!links.is_last);
	}

	#[rstest]
	fn test_numbered_links() {
		let links = build("/products/shoes/page=2", 3);

		let hrefs: Vec<&str> = links.pages.iter().map(|l| l.href.as_str()).collect();
		let selected: Vec<bool> = links.pages.iter().map(|l| l.selected).collect();

		assert_eq!(
			hrefs,
			vec![
				"/products/shoes/page=1",
				"/products/shoes/page=2",
				"/products/shoes/page=3"
			]
		);
		assert_eq!(selected, vec![false, true, false]);
	}

	#[rstest]
	#[case("/products/shoes", 5, true, false)]
	#[case("/products/shoes/page=5", 5, false, true)]
	#[case("/products/shoes/page=1", 1, true, true)]
	fn test_bounds(
		#[case] path: &str,
		#[case] pages: i64,
		#[case] is_first: bool,
		#[case] is_last: bool,
	) {
		let links = build(path, pages);

		assert_eq!(links.is_first, is_first);
		assert_eq!(links.is_last, is_last);
	}

	#[rstest]
	fn test_saturated_page() {
		// Arrange: the page overflows i64 and reads as i64::MAX
		let path = "/products/shoes/page=99999999999999999999";

		// Act
		let links = build(path, 5);

		// Assert
		assert_eq!(links.current, i64::MAX);
		assert_eq!(links.next.page, i64::MAX);
		assert_eq!(links.next.href, format!("/products/shoes/page={}", i64::MAX));
		assert_eq!(links.previous.page, i64::MAX - 1);
		assert!(!links.is_first);
		assert!(links.is_last);
	}

	#[rstest]
	#[case("/products/shoes/page=-99999999999999999999", -i64::MAX)]
	#[case("/products/shoes/page=-3", -3)]
	#[case("/products/shoes/page=0", 0)]
	fn test_page_below_one(#[case] path: &str, #[case] current: i64) {
		let links = build(path, 5);

		assert_eq!(links.current, current);
		assert_eq!(links.previous.page, current.saturating_sub(1));
		assert!(links.is_first);
		assert!(!links.is_last);
		assert!(links.pages.iter().all(|l| !l.selected));
	}

	#[rstest]
	fn test_no_pages() {
		let links = build("/products/shoes", 0);

		assert!(links.pages.is_empty());
		assert!(links.is_last);
	}
}
