//! Multi-select filter chips.

use serde::Serialize;
use vitrine_query::toggle_value;

use crate::binding::PathQuery;
use crate::error::StateError;
use crate::link::LinkBuilder;
use crate::navigation::TransitionOptions;

/// One selectable value of a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterChip {
	/// The palette value.
	pub value: String,
	/// Whether the value is currently selected.
	pub selected: bool,
	/// Path reached by toggling the value.
	pub href: String,
}

/// A multi-select filter over a fixed palette.
///
/// Toggling a value also drops `remove_keys`, typically the page key, so a
/// filter change starts again from the first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorFilter {
	palette: Vec<String>,
	remove_keys: Vec<String>,
}

impl ColorFilter {
	/// Creates a filter over `palette`.
	pub fn new<I, S>(palette: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			palette: palette.into_iter().map(Into::into).collect(),
			remove_keys: Vec::new(),
		}
	}

	/// Drops `key` whenever the selection changes.
	pub fn removing(mut self, key: impl Into<String>) -> Self {
		self.remove_keys.push(key.into());
		self
	}

	/// Returns the palette.
	pub fn palette(&self) -> &[String] {
		&self.palette
	}

	/// Returns one chip per palette value.
	pub fn chips(
		&self,
		binding: &PathQuery<Vec<String>>,
		links: &LinkBuilder,
	) -> Result<Vec<FilterChip>, StateError> {
		let selected = binding.read();
		self.palette
			.iter()
			.map(|value| {
				let next = toggle_value(&selected, value);
				Ok(FilterChip {
					value: value.clone(),
					selected: selected.contains(value),
					href: links.link(binding.key(), &next, &self.remove_keys)?,
				})
			})
			.collect()
	}

	/// Toggles `value` and navigates.
	pub async fn toggle(
		&self,
		binding: &PathQuery<Vec<String>>,
		value: &str,
		options: TransitionOptions,
	) -> Result<(), StateError> {
		let next = toggle_value(&binding.read(), value);
		let mut options = options;
		options.remove_keys.extend(self.remove_keys.iter().cloned());
		binding.write(next, &options).await
	}
}
