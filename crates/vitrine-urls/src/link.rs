//! Computing the location a state mutation leads to.
//!
//! [`next_location`] is the single merge-and-encode step behind both
//! [`PathQuery::write`](crate::PathQuery::write) and [`LinkBuilder::link`],
//! so a rendered href is always the path a click would navigate to.

use std::sync::Arc;

use tracing::trace;
use vitrine_codec::{FieldValue, encode, validate_key};

use crate::error::StateError;
use crate::location::{Location, PathState};
use crate::navigation::Navigator;
use crate::value::QueryValue;

/// Returns the path reached by storing `value` under `key`.
///
/// The current state is decoded, `key` is set (an empty value removes it),
/// every key in `remove_keys` is dropped, and the map is re-encoded into the
/// state position of `location`.
///
/// # Errors
///
/// Fails with [`StateError::Format`] if `key` or `value` contains a reserved
/// delimiter, and with [`StateError::Template`] if the path cannot be rebuilt.
pub fn next_location(
	location: &Location,
	state: &PathState,
	key: &str,
	value: FieldValue,
	remove_keys: &[String],
) -> Result<String, StateError> {
	validate_key(key)?;
	value.validate()?;

	let mut fields = location.fields(state);
	fields.insert(key, value);
	fields.remove_all(remove_keys.iter().filter(|k| !k.is_empty()));

	let segment = encode(&fields);
	let path = location.with_segment(state, &segment)?;
	trace!(key, segment = %segment, path = %path, "computed next location");
	Ok(path)
}

/// Builds hrefs for hypothetical state changes without navigating.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vitrine_urls::{LinkBuilder, MemoryHistory};
///
/// let history = Arc::new(MemoryHistory::new(
///     "/products/{params:*}",
///     "/products/shoes/color=blue;page=3",
/// ));
/// let links = LinkBuilder::new(history);
///
/// assert_eq!(
///     links.link("page", &4_i64, &[]).unwrap(),
///     "/products/shoes/color=blue;page=4"
/// );
/// assert_eq!(
///     links.link("color", &vec!["blue".to_string(), "orange".to_string()], &["page".to_string()]).unwrap(),
///     "/products/shoes/color=blue_orange"
/// );
/// ```
#[derive(Clone)]
pub struct LinkBuilder {
	navigator: Arc<dyn Navigator>,
	state: PathState,
}

impl LinkBuilder {
	/// Creates a builder reading the navigator's current location.
	pub fn new(navigator: Arc<dyn Navigator>) -> Self {
		Self {
			navigator,
			state: PathState::default(),
		}
	}

	/// Uses `state` to locate the state segment.
	pub fn with_state(mut self, state: PathState) -> Self {
		self.state = state;
		self
	}

	/// Returns the state placement.
	pub fn state(&self) -> &PathState {
		&self.state
	}

	/// Returns the path reached by storing `value` under `key`.
	pub fn link<T: QueryValue>(
		&self,
		key: &str,
		value: &T,
		remove_keys: &[String],
	) -> Result<String, StateError> {
		let location = Location::current(self.navigator.as_ref())?;
		next_location(&location, &self.state, key, value.to_field(), remove_keys)
	}
}

impl std::fmt::Debug for LinkBuilder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LinkBuilder")
			.field("state", &self.state)
			.finish_non_exhaustive()
	}
}
