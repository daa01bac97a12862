//! # Vitrine Query
//!
//! Pure helpers that turn a decoded [`FieldMap`](vitrine_codec::FieldMap) into
//! the typed values a catalog request needs.
//!
//! Each helper is total: missing keys, values of the wrong shape and
//! unparseable text all resolve to a default instead of an error. This keeps
//! the interpretation of the URL in one place whether the page is statically
//! generated, server-rendered or driven by client-side navigation.
//!
//! - [`pagination`]: page number derivation and upper-bound clamping
//! - [`sorting`]: sort token to backend sort expression mapping
//! - [`filtering`]: multi-value extraction and selection toggling
//!
//! ## Example
//!
//! ```
//! use vitrine_codec::decode;
//! use vitrine_query::{ProductQuery, QueryKeys};
//!
//! let fields = decode(Some("color=yellow_blue;page=0;sort=priceHigh"));
//! let query = ProductQuery::from_fields(&fields, &QueryKeys::default());
//!
//! assert_eq!(query.pagination.page, 1);
//! assert_eq!(query.sort, vec!["sortByPrice:desc".to_string()]);
//! assert_eq!(query.colors, vec!["blue".to_string(), "yellow".to_string()]);
//! ```

pub mod filtering;
pub mod pagination;
pub mod sorting;

use serde::{Deserialize, Serialize};
use vitrine_codec::FieldMap;

pub use filtering::{get_multi_value, toggle_value};
pub use pagination::{Pagination, get_pagination, parse_int};
pub use sorting::{
	DEFAULT_SORT_KEY, ProductSort, SortDirection, SortExpression, get_products_sort,
	get_products_sort_by,
};

/// Field keys the storefront stores its state under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryKeys {
	/// Key of the page number.
	pub page: String,
	/// Key of the sort token.
	pub sort: String,
	/// Key of the colour filter.
	pub color: String,
}

impl Default for QueryKeys {
	fn default() -> Self {
		Self {
			page: "page".to_string(),
			sort: DEFAULT_SORT_KEY.to_string(),
			color: "color".to_string(),
		}
	}
}

/// Everything a product listing request needs, derived from a field map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductQuery {
	/// The requested page.
	pub pagination: Pagination,
	/// Backend sort expressions.
	pub sort: Vec<String>,
	/// Selected colours, sorted.
	pub colors: Vec<String>,
}

impl ProductQuery {
	/// Derives the query from decoded fields.
	pub fn from_fields(fields: &FieldMap, keys: &QueryKeys) -> Self {
		Self {
			pagination: get_pagination(fields, &keys.page),
			sort: get_products_sort_by(fields, &keys.sort),
			colors: get_multi_value(fields, &keys.color),
		}
	}
}
