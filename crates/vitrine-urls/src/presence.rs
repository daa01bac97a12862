//! Detecting and clearing state.

use std::sync::Arc;

use tracing::debug;
use vitrine_codec::FIELD_DELIMITER;

use crate::error::StateError;
use crate::location::{Location, PathState};
use crate::navigation::{Navigator, TransitionOptions};

/// Checks whether a state segment carries anything worth clearing.
///
/// An absent segment is empty. When `exclude` names a key that appears in the
/// segment, the segment only counts if it holds more fields than that one.
/// This is a textual check, so an excluded key that is a prefix of another
/// key also matches.
///
/// # Examples
///
/// ```
/// use vitrine_urls::is_query_exist;
///
/// assert!(!is_query_exist(None, None));
/// assert!(is_query_exist(Some("color=blue"), Some("page")));
/// assert!(!is_query_exist(Some("page=2"), Some("page")));
/// assert!(is_query_exist(Some("color=blue;page=2"), Some("page")));
/// ```
pub fn is_query_exist(segment: Option<&str>, exclude: Option<&str>) -> bool {
	let Some(segment) = segment else {
		return false;
	};

	match exclude {
		Some(exclude) if !exclude.is_empty() && segment.contains(exclude) => {
			segment.split(FIELD_DELIMITER).count() > 1
		}
		_ => true,
	}
}

/// Evaluates [`is_query_exist`] against the navigator's current location.
#[derive(Clone)]
pub struct QueryPresence {
	navigator: Arc<dyn Navigator>,
	state: PathState,
	exclude: Option<String>,
}

impl QueryPresence {
	/// Creates a check against `navigator`.
	pub fn new(navigator: Arc<dyn Navigator>) -> Self {
		Self {
			navigator,
			state: PathState::default(),
			exclude: None,
		}
	}

	/// Ignores `key` when it is the only field.
	pub fn excluding(mut self, key: impl Into<String>) -> Self {
		self.exclude = Some(key.into());
		self
	}

	/// Uses `state` to locate the state segment.
	pub fn with_state(mut self, state: PathState) -> Self {
		self.state = state;
		self
	}

	/// Returns `true` if the current location carries state.
	///
	/// A route template that does not compile counts as no state.
	pub fn check(&self) -> bool {
		let Ok(location) = Location::current(self.navigator.as_ref()) else {
			return false;
		};
		is_query_exist(location.segment(&self.state), self.exclude.as_deref())
	}
}

impl std::fmt::Debug for QueryPresence {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("QueryPresence")
			.field("state", &self.state)
			.field("exclude", &self.exclude)
			.finish_non_exhaustive()
	}
}

/// Drops the whole state segment, keeping the parts before it.
///
/// Returns `false` without navigating when there is no state.
pub async fn clear_query(
	navigator: &dyn Navigator,
	state: &PathState,
	options: &TransitionOptions,
) -> Result<bool, StateError> {
	let location = Location::current(navigator)?;
	if !is_query_exist(location.segment(state), None) {
		debug!("no path state to clear");
		return Ok(false);
	}

	let path = location.without_segment(state)?;
	navigator.navigate(&path, options.navigate_options()).await?;
	Ok(true)
}
