//! # Vitrine URLs
//!
//! Keeps path-embedded state, the current location and pre-rendered links
//! consistent.
//!
//! A storefront route such as `/products/{params:*}` carries the category and
//! an encoded state segment in its catch-all:
//!
//! ```text
//! /products/shoes/color=blue_yellow;page=2;sort=priceHigh
//!           ^^^^^ ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^
//!           rest  state segment (position 1)
//! ```
//!
//! ## Components
//!
//! - [`RouteTemplate`]: pattern matching and reversing with a catch-all
//! - [`Location`] and [`PathState`]: where the state segment sits
//! - [`Navigator`]: the injected navigation collaborator, with
//!   [`MemoryHistory`] as the in-memory implementation
//! - [`PathQuery`]: a typed field bound to the location
//! - [`LinkBuilder`]: hrefs for hypothetical writes
//! - [`PaginationLinks`], [`ColorFilter`], [`QueryPresence`], [`clear_query`]
//! - [`ProductListing`]: server-side derivation of a listing request
//!
//! Writes and links share [`next_location`], so an href always equals the
//! path a write with the same arguments navigates to.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use vitrine_urls::{MemoryHistory, Navigator, PathQuery, TransitionOptions};
//!
//! # tokio_test::block_on(async {
//! let history = Arc::new(MemoryHistory::new("/products/{params:*}", "/products/shoes/page=3"));
//! let colors = PathQuery::new(history.clone(), "color", Vec::<String>::new());
//!
//! let href = colors.link(&vec!["yellow".into(), "blue".into()], &["page".into()]).unwrap();
//! assert_eq!(href, "/products/shoes/color=blue_yellow");
//!
//! colors
//!     .write(vec!["yellow".into(), "blue".into()], &TransitionOptions::new().remove_key("page"))
//!     .await
//!     .unwrap();
//! assert_eq!(history.current_path(), href);
//! # });
//! ```

pub mod binding;
pub mod error;
pub mod filter;
pub mod link;
pub mod listing;
pub mod location;
pub mod navigation;
pub mod pagination;
pub mod presence;
pub mod template;
pub mod value;

pub use binding::{MutationQueue, PathQuery};
pub use error::{ListingError, NavigationError, StateError, TemplateError};
pub use filter::{ColorFilter, FilterChip};
pub use link::{LinkBuilder, next_location};
pub use listing::ProductListing;
pub use location::{DEFAULT_STATE_POSITION, Location, PathState};
pub use navigation::{MemoryHistory, NavigateOptions, Navigator, TransitionOptions};
pub use pagination::{PageLink, PaginationLinks};
pub use presence::{QueryPresence, clear_query, is_query_exist};
pub use template::RouteTemplate;
pub use value::QueryValue;
