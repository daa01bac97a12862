//! # Vitrine
//!
//! Path-embedded listing state for storefronts.
//!
//! Filters, sort order and page number live inside the URL path instead of
//! the query string, so every combination is a distinct, cacheable and
//! statically generatable page:
//!
//! ```text
//! /products/shoes/color=blue_yellow;page=2;sort=priceHigh
//! ```
//!
//! ## Crates
//!
//! - [`codec`]: the compact `key=value;key=a_b` segment format
//! - [`query`]: typed readers for page, sort and colour fields
//! - [`urls`]: route templates, locations, bindings, links and navigation
//! - [`conf`]: layered settings (feature `conf`, enabled by default)
//!
//! ## Quick Example
//!
//! ```
//! use std::sync::Arc;
//! use vitrine::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let history = Arc::new(MemoryHistory::new("/products/{params:*}", "/products/shoes"));
//! let page = PathQuery::new(history.clone(), "page", 1_i64);
//! let sort = PathQuery::new(history.clone(), "sort", "new".to_string());
//!
//! sort.write("priceLow".to_string(), &TransitionOptions::default()).await?;
//! page.write(2, &TransitionOptions::default()).await?;
//!
//! assert_eq!(history.current_path(), "/products/shoes/page=2;sort=priceLow");
//! # Ok::<(), StateError>(())
//! # }).unwrap();
//! ```

pub use vitrine_codec as codec;
#[cfg(feature = "conf")]
pub use vitrine_conf as conf;
pub use vitrine_query as query;
pub use vitrine_urls as urls;

pub use vitrine_codec::{CodecError, FieldMap, FieldValue, decode, decode_uri, encode};
#[cfg(feature = "conf")]
pub use vitrine_conf::{SettingsBuilder, SettingsError, StorefrontSettings};
pub use vitrine_query::{Pagination, ProductQuery, ProductSort, QueryKeys};
pub use vitrine_urls::{
	ColorFilter, LinkBuilder, Location, MemoryHistory, Navigator, PaginationLinks, PathQuery,
	PathState, ProductListing, QueryValue, RouteTemplate, StateError, TransitionOptions,
};

/// Commonly used types and traits.
pub mod prelude {
	pub use crate::{
		ColorFilter, FieldMap, FieldValue, LinkBuilder, Location, MemoryHistory, Navigator,
		PaginationLinks, PathQuery, PathState, ProductListing, ProductSort, QueryKeys, QueryValue,
		RouteTemplate, StateError, TransitionOptions, decode, encode,
	};

	#[cfg(feature = "conf")]
	pub use crate::StorefrontSettings;
}
