//! Shared fixtures for the cross-crate storefront tests.

use rstest::fixture;
use vitrine::prelude::*;

/// Settings with every default.
#[fixture]
pub fn settings() -> StorefrontSettings {
	StorefrontSettings::default()
}

/// Derives the listing the server renders for `path`.
pub fn listing(settings: &StorefrontSettings, path: &str) -> ProductListing {
	ProductListing::from_path(
		path,
		&settings.route().unwrap(),
		&settings.path_state(),
		&settings.keys,
	)
	.unwrap()
}
