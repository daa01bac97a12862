//! The navigation collaborator and an in-memory implementation.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::NavigationError;

/// Options passed to [`Navigator::navigate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigateOptions {
	/// Update the location without re-running data fetching.
	pub shallow: bool,
	/// Scroll to the top after navigating.
	pub scroll: bool,
}

impl Default for NavigateOptions {
	fn default() -> Self {
		Self {
			shallow: false,
			scroll: true,
		}
	}
}

/// Options of a state mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionOptions {
	/// Update the location without re-running data fetching.
	pub is_shallow: bool,
	/// Scroll to the top after navigating.
	pub is_scroll: bool,
	/// Keys removed from the state together with the mutation.
	pub remove_keys: Vec<String>,
}

impl Default for TransitionOptions {
	fn default() -> Self {
		Self {
			is_shallow: false,
			is_scroll: true,
			remove_keys: Vec::new(),
		}
	}
}

impl TransitionOptions {
	/// Creates default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the shallow flag.
	pub fn shallow(mut self, is_shallow: bool) -> Self {
		self.is_shallow = is_shallow;
		self
	}

	/// Sets the scroll flag.
	pub fn scroll(mut self, is_scroll: bool) -> Self {
		self.is_scroll = is_scroll;
		self
	}

	/// Adds a key to remove.
	pub fn remove_key(mut self, key: impl Into<String>) -> Self {
		self.remove_keys.push(key.into());
		self
	}

	/// Returns the options handed to the navigator.
	pub fn navigate_options(&self) -> NavigateOptions {
		NavigateOptions {
			shallow: self.is_shallow,
			scroll: self.is_scroll,
		}
	}
}

/// Reads and changes the current location.
///
/// Bindings never reach for a global router; every binding is handed the
/// navigator it works against.
#[async_trait]
pub trait Navigator: Send + Sync {
	/// Returns the current path, e.g. `/products/shoes/page=2`.
	fn current_path(&self) -> String;

	/// Returns the route template of the current page, e.g. `/products/{params:*}`.
	fn current_path_template(&self) -> String;

	/// Moves to `path`. Completes once the new location is current.
	async fn navigate(&self, path: &str, options: NavigateOptions) -> Result<(), NavigationError>;
}

#[derive(Debug)]
struct HistoryState {
	entries: Vec<String>,
	last_options: Option<NavigateOptions>,
}

/// An in-memory navigator keeping a stack of visited paths.
///
/// Every completed navigation is published on a watch channel, which is how
/// bindings learn that the location changed.
///
/// # Examples
///
/// ```
/// use vitrine_urls::{MemoryHistory, NavigateOptions, Navigator};
///
/// # tokio_test::block_on(async {
/// let history = MemoryHistory::new("/products/{params:*}", "/products/shoes");
/// history.navigate("/products/shoes/page=2", NavigateOptions::default()).await.unwrap();
///
/// assert_eq!(history.current_path(), "/products/shoes/page=2");
/// assert_eq!(history.back(), Some("/products/shoes".to_string()));
/// # });
/// ```
#[derive(Debug)]
pub struct MemoryHistory {
	template: String,
	state: RwLock<HistoryState>,
	sender: watch::Sender<String>,
	latency: Option<Duration>,
}

impl MemoryHistory {
	/// Creates a history positioned at `initial_path`.
	pub fn new(template: impl Into<String>, initial_path: impl Into<String>) -> Self {
		let initial_path = initial_path.into();
		let (sender, _) = watch::channel(initial_path.clone());
		Self {
			template: template.into(),
			state: RwLock::new(HistoryState {
				entries: vec![initial_path],
				last_options: None,
			}),
			sender,
			latency: None,
		}
	}

	/// Delays every navigation by `latency` before it completes.
	pub fn with_latency(mut self, latency: Duration) -> Self {
		self.latency = Some(latency);
		self
	}

	/// Subscribes to location changes.
	pub fn subscribe(&self) -> watch::Receiver<String> {
		self.sender.subscribe()
	}

	/// Pops the current entry and returns the path moved back to.
	///
	/// Returns `None` on the first entry.
	pub fn back(&self) -> Option<String> {
		let path = {
			let mut state = self.state.write();
			if state.entries.len() <= 1 {
				return None;
			}
			state.entries.pop();
			state.entries.last().cloned()?
		};
		debug!(path = %path, "moved back");
		self.sender.send_replace(path.clone());
		Some(path)
	}

	/// Returns all entries, oldest first.
	pub fn entries(&self) -> Vec<String> {
		self.state.read().entries.clone()
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.state.read().entries.len()
	}

	/// Always `false`: a history holds at least its initial entry.
	pub fn is_empty(&self) -> bool {
		self.state.read().entries.is_empty()
	}

	/// Returns the options of the most recent navigation.
	pub fn last_options(&self) -> Option<NavigateOptions> {
		self.state.read().last_options
	}
}

#[async_trait]
impl Navigator for MemoryHistory {
	fn current_path(&self) -> String {
		self.state.read().entries.last().cloned().unwrap_or_default()
	}

	fn current_path_template(&self) -> String {
		self.template.clone()
	}

	async fn navigate(&self, path: &str, options: NavigateOptions) -> Result<(), NavigationError> {
		if !path.starts_with('/') {
			return Err(NavigationError::InvalidPath(path.to_string()));
		}

		if let Some(latency) = self.latency {
			tokio::time::sleep(latency).await;
		}

		{
			let mut state = self.state.write();
			state.entries.push(path.to_string());
			state.last_options = Some(options);
		}
		info!(path, shallow = options.shallow, scroll = options.scroll, "navigated");
		self.sender.send_replace(path.to_string());
		Ok(())
	}
}
