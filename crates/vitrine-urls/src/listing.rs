//! Listing requests derived from a path on the server side.

use serde::Serialize;
use tracing::debug;
use vitrine_codec::{FieldMap, decode};
use vitrine_query::{Pagination, QueryKeys, get_multi_value, get_pagination, get_products_sort_by};

use crate::error::ListingError;
use crate::location::PathState;
use crate::template::RouteTemplate;

/// What a product listing page asks the catalog for.
///
/// Derived from the path alone, so a statically generated page and a
/// server-rendered one interpret the same URL identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductListing {
	/// The category, first catch-all part.
	pub category: String,
	/// The decoded state.
	pub query: FieldMap,
	/// Requested page.
	pub pagination: Pagination,
	/// Backend sort expressions.
	pub sort: Vec<String>,
	/// Selected colours, sorted.
	pub colors: Vec<String>,
}

impl ProductListing {
	/// Derives the listing for `path`.
	///
	/// # Errors
	///
	/// Fails with [`ListingError::NotFound`] when the path has no category.
	///
	/// # Examples
	///
	/// ```
	/// use vitrine_query::QueryKeys;
	/// use vitrine_urls::{PathState, ProductListing, RouteTemplate};
	///
	/// let template = RouteTemplate::new("/products/{params:*}").unwrap();
	/// let listing = ProductListing::from_path(
	///     "/products/shoes/color=yellow_blue;sort=priceHigh",
	///     &template,
	///     &PathState::default(),
	///     &QueryKeys::default(),
	/// )
	/// .unwrap();
	///
	/// assert_eq!(listing.category, "shoes");
	/// assert_eq!(listing.pagination.page, 1);
	/// assert_eq!(listing.sort, ["sortByPrice:desc"]);
	/// assert_eq!(listing.colors, ["blue", "yellow"]);
	/// ```
	pub fn from_path(
		path: &str,
		template: &RouteTemplate,
		state: &PathState,
		keys: &QueryKeys,
	) -> Result<Self, ListingError> {
		let parts = template
			.catch_all(path)
			.ok_or_else(|| ListingError::NotFound(path.to_string()))?;
		let category = parts
			.first()
			.cloned()
			.ok_or_else(|| ListingError::NotFound(path.to_string()))?;

		let query = decode(state.segment(&parts));
		let listing = Self {
			pagination: get_pagination(&query, &keys.page),
			sort: get_products_sort_by(&query, &keys.sort),
			colors: get_multi_value(&query, &keys.color),
			category,
			query,
		};
		debug!(
			category = %listing.category,
			page = listing.pagination.page,
			sort = ?listing.sort,
			colors = ?listing.colors,
			"derived listing"
		);
		Ok(listing)
	}
}
