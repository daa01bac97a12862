//! Per-field state bound to the current location.
//!
//! A [`PathQuery`] owns one typed field. Its value is re-derived from the
//! navigator's location on every change; writing merges the new value into
//! the decoded state and navigates to the re-encoded path. The read side is
//! not touched by a write: it follows once the location change is observed.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{Mutex, MutexGuard, watch};
use tracing::{debug, info, warn};

use crate::error::StateError;
use crate::link::{LinkBuilder, next_location};
use crate::location::{Location, PathState};
use crate::navigation::{Navigator, TransitionOptions};
use crate::value::QueryValue;

/// Serializes writes across bindings.
///
/// Without a queue two writes issued before either completes both start
/// from the same location, and the later navigation drops the earlier change.
/// Bindings sharing a queue hold it from decoding the current state until
/// their navigation completes.
#[derive(Debug, Clone, Default)]
pub struct MutationQueue {
	lock: Arc<Mutex<()>>,
}

impl MutationQueue {
	/// Creates an empty queue.
	pub fn new() -> Self {
		Self::default()
	}

	/// Waits for the turn of the caller.
	pub async fn acquire(&self) -> MutexGuard<'_, ()> {
		self.lock.lock().await
	}
}

/// A typed field stored in the state segment of the current path.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vitrine_urls::{MemoryHistory, PathQuery, TransitionOptions};
///
/// # tokio_test::block_on(async {
/// let history = Arc::new(MemoryHistory::new("/products/{params:*}", "/products/shoes/page=2"));
/// let page = PathQuery::new(history.clone(), "page", 1_i64);
/// assert_eq!(page.read(), 2);
///
/// page.write(3, &TransitionOptions::default()).await.unwrap();
/// assert_eq!(page.read(), 2);
/// assert_eq!(page.sync(), 3);
/// # });
/// ```
pub struct PathQuery<T: QueryValue> {
	navigator: Arc<dyn Navigator>,
	key: String,
	default: T,
	state: PathState,
	current: RwLock<T>,
	queue: Option<MutationQueue>,
}

impl<T: QueryValue> PathQuery<T> {
	/// Binds `key` with `default`, deriving the initial value from the
	/// navigator's current location.
	pub fn new(navigator: Arc<dyn Navigator>, key: impl Into<String>, default: T) -> Self {
		let binding = Self {
			navigator,
			key: key.into(),
			current: RwLock::new(default.clone()),
			default,
			state: PathState::default(),
			queue: None,
		};
		binding.sync();
		binding
	}

	/// Uses `state` to locate the state segment.
	pub fn with_state(mut self, state: PathState) -> Self {
		self.state = state;
		self.sync();
		self
	}

	/// Serializes writes through `queue`.
	pub fn with_queue(mut self, queue: MutationQueue) -> Self {
		self.queue = Some(queue);
		self
	}

	/// Returns the bound key.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Returns the default value.
	pub fn default_value(&self) -> &T {
		&self.default
	}

	/// Returns the state placement.
	pub fn state(&self) -> &PathState {
		&self.state
	}

	/// Returns the value derived at the last location change.
	pub fn read(&self) -> T {
		self.current.read().clone()
	}

	/// Re-derives the value from the navigator's current location.
	pub fn sync(&self) -> T {
		let value = self.derive();
		*self.current.write() = value.clone();
		value
	}

	/// Waits for the next location change published on `receiver` and
	/// re-derives the value.
	///
	/// Returns `None` once the navigator is gone.
	pub async fn changed(&self, receiver: &mut watch::Receiver<String>) -> Option<T> {
		receiver.changed().await.ok()?;
		receiver.borrow_and_update();
		Some(self.sync())
	}

	/// Stores `value` and navigates to the resulting path.
	///
	/// An empty list removes the key. `options.remove_keys` are dropped in the
	/// same step.
	///
	/// # Errors
	///
	/// Fails if the value or key contains a reserved delimiter, the route
	/// template cannot be rebuilt, or the navigator fails.
	pub async fn write(&self, value: T, options: &TransitionOptions) -> Result<(), StateError> {
		let _turn = match &self.queue {
			Some(queue) => Some(queue.acquire().await),
			None => None,
		};

		let location = Location::current(self.navigator.as_ref())?;
		let path = next_location(
			&location,
			&self.state,
			&self.key,
			value.to_field(),
			&options.remove_keys,
		)?;

		info!(key = %self.key, path = %path, "writing path state");
		self.navigator
			.navigate(&path, options.navigate_options())
			.await?;
		Ok(())
	}

	/// Returns the path [`PathQuery::write`] would navigate to.
	pub fn link(&self, value: &T, remove_keys: &[String]) -> Result<String, StateError> {
		self.link_builder().link(&self.key, value, remove_keys)
	}

	/// Returns a link builder sharing this binding's navigator and placement.
	pub fn link_builder(&self) -> LinkBuilder {
		LinkBuilder::new(self.navigator.clone()).with_state(self.state)
	}

	fn derive(&self) -> T {
		let location = match Location::current(self.navigator.as_ref()) {
			Ok(location) => location,
			Err(error) => {
				warn!(key = %self.key, %error, "cannot resolve location, using default");
				return self.default.clone();
			}
		};

		let fields = location.fields(&self.state);
		let Some(field) = fields.get(&self.key) else {
			return self.default.clone();
		};

		T::from_field(field).unwrap_or_else(|| {
			debug!(key = %self.key, value = ?field, "cannot coerce field, using default");
			self.default.clone()
		})
	}
}

impl PathQuery<i64> {
	/// Resets the page to 1 when it lies below 1 or beyond `pages`.
	///
	/// Does nothing when `pages` is not positive. Returns `true` if a reset
	/// was issued.
	pub async fn enforce_page_bound(&self, pages: i64) -> Result<bool, StateError> {
		if pages <= 0 {
			return Ok(false);
		}

		let page = self.read();
		if (1..=pages).contains(&page) {
			return Ok(false);
		}

		debug!(key = %self.key, page, pages, "page out of range, resetting");
		self.write(1, &TransitionOptions::new().scroll(true)).await?;
		Ok(true)
	}
}

impl<T: QueryValue + std::fmt::Debug> std::fmt::Debug for PathQuery<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PathQuery")
			.field("key", &self.key)
			.field("default", &self.default)
			.field("state", &self.state)
			.field("current", &*self.current.read())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::navigation::MemoryHistory;
	use rstest::rstest;

	fn history(path: &str) -> Arc<MemoryHistory> {
		Arc::new(MemoryHistory::new("/products/{params:*}", path))
	}

	#[rstest]
	#[case("/products/shoes/page=4", 4)]
	#[case("/products/shoes/page=abc", 1)]
	#[case("/products/shoes/page=1_2", 1)]
	#[case("/products/shoes/sort=new", 1)]
	#[case("/products/shoes", 1)]
	#[case("/products/", 1)]
	#[case("/elsewhere", 1)]
	fn test_number_read(#[case] path: &str, #[case] expected: i64) {
		let page = PathQuery::new(history(path), "page", 1_i64);
		assert_eq!(page.read(), expected);
	}

	#[rstest]
	#[case("/products/shoes/sort=priceLow", "priceLow")]
	#[case("/products/shoes/sort=new_priceLow", "new")]
	#[case("/products/shoes", "new")]
	fn test_string_read(#[case] path: &str, #[case] expected: &str) {
		let sort = PathQuery::new(history(path), "sort", "new".to_string());
		assert_eq!(sort.read(), expected);
	}

	#[rstest]
	#[case("/products/shoes/color=blue", &["blue"])]
	#[case("/products/shoes/color=yellow_blue", &["yellow", "blue"])]
	#[case("/products/shoes", &[])]
	fn test_list_read(#[case] path: &str, #[case] expected: &[&str]) {
		let colors = PathQuery::new(history(path), "color", Vec::<String>::new());
		assert_eq!(colors.read(), expected);
	}

	#[rstest]
	fn test_custom_position() {
		let history = Arc::new(MemoryHistory::new("/sale/{params:*}", "/sale/page=5"));
		let page = PathQuery::new(history, "page", 1_i64).with_state(PathState::new(0));
		assert_eq!(page.read(), 5);
	}

	#[rstest]
	#[tokio::test]
	async fn test_write_navigates_without_updating_read() {
		// Arrange
		let history = history("/products/shoes/sort=new");
		let page = PathQuery::new(history.clone(), "page", 1_i64);

		// Act
		page.write(2, &TransitionOptions::new().shallow(true)).await.unwrap();

		// Assert
		assert_eq!(history.current_path(), "/products/shoes/page=2;sort=new");
		assert_eq!(page.read(), 1);
		assert_eq!(page.sync(), 2);
		assert!(history.last_options().unwrap().shallow);
	}

	#[rstest]
	#[tokio::test]
	async fn test_write_empty_list_clears_key() {
		let history = history("/products/shoes/color=blue_yellow;sort=new");
		let colors = PathQuery::new(history.clone(), "color", Vec::<String>::new());

		colors.write(Vec::new(), &TransitionOptions::default()).await.unwrap();

		assert_eq!(history.current_path(), "/products/shoes/sort=new");
	}

	#[rstest]
	#[tokio::test]
	async fn test_write_empty_list_applies_remove_keys() {
		let history = history("/products/shoes/color=blue;page=3;sort=new");
		let colors = PathQuery::new(history.clone(), "color", Vec::<String>::new());

		colors
			.write(Vec::new(), &TransitionOptions::new().remove_key("page"))
			.await
			.unwrap();

		assert_eq!(history.current_path(), "/products/shoes/sort=new");
	}

	#[rstest]
	#[tokio::test]
	async fn test_write_rejects_reserved_value() {
		let history = history("/products/shoes");
		let sort = PathQuery::new(history.clone(), "sort", "new".to_string());

		let result = sort
			.write("a;b".to_string(), &TransitionOptions::default())
			.await;

		assert!(matches!(result, Err(StateError::Format(_))));
		assert_eq!(history.len(), 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_changed_follows_navigation() {
		let history = history("/products/shoes");
		let page = PathQuery::new(history.clone(), "page", 1_i64);
		let mut receiver = history.subscribe();

		page.write(3, &TransitionOptions::default()).await.unwrap();

		assert_eq!(page.changed(&mut receiver).await, Some(3));
		assert_eq!(page.read(), 3);
	}

	#[rstest]
	#[case(5, 5, false)]
	#[case(6, 5, true)]
	#[case(6, 0, false)]
	#[case(0, 5, true)]
	#[case(-2, 5, true)]
	#[tokio::test]
	async fn test_enforce_page_bound(
		#[case] current: i64,
		#[case] pages: i64,
		#[case] resets: bool,
	) {
		let history = history(&format!("/products/shoes/page={current}"));
		let page = PathQuery::new(history.clone(), "page", 1_i64);

		let reset = page.enforce_page_bound(pages).await.unwrap();

		assert_eq!(reset, resets);
		if resets {
			assert_eq!(history.current_path(), "/products/shoes/page=1");
			assert!(history.last_options().unwrap().scroll);
		} else {
			assert_eq!(history.len(), 1);
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_enforce_page_bound_saturated_page() {
		let history = history("/products/shoes/page=99999999999999999999;sort=new");
		let page = PathQuery::new(history.clone(), "page", 1_i64);
		assert_eq!(page.read(), i64::MAX);

		assert!(page.enforce_page_bound(5).await.unwrap());

		assert_eq!(history.current_path(), "/products/shoes/page=1;sort=new");
		assert_eq!(page.sync(), 1);
	}

	#[rstest]
	fn test_link_matches_binding_key() {
		let page = PathQuery::new(history("/products/shoes/page=2"), "page", 1_i64);
		assert_eq!(page.link(&3, &[]).unwrap(), "/products/shoes/page=3");
	}
}
