//! # Vitrine Conf
//!
//! Layered settings for the storefront: where the state segment lives in the
//! route, which field keys it uses, and the filter palette.
//!
//! Values are merged from prioritized [`sources`]:
//!
//! 1. built-in defaults (priority 0)
//! 2. a TOML file (priority 50)
//! 3. `VITRINE_` environment variables (priority 100)
//!
//! ```toml
//! route_template = "/products/{params:*}"
//! catch_all = "params"
//! state_position = 1
//! palette = ["blue", "yellow", "indigo", "orange"]
//! page_count = 5
//!
//! [keys]
//! page = "page"
//! sort = "sort"
//! color = "color"
//! ```
//!
//! The merged result is validated so that every key and palette value can be
//! carried by the state segment without escaping.

pub mod settings;
pub mod sources;

pub use settings::{SettingsBuilder, SettingsError, StorefrontSettings};
pub use sources::{ConfigSource, SourceError};
