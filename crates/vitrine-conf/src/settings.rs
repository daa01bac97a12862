//! Storefront settings and their layered builder.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};
use vitrine_codec::{CodecError, validate_key, validate_scalar};
use vitrine_query::QueryKeys;
use vitrine_urls::{PathState, RouteTemplate, TemplateError};

use crate::sources::{ConfigSource, DefaultSource, EnvSource, SourceError, TomlFileSource, merge};

/// Errors raised while building or validating settings.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("failed to load {description}: {source}")]
	Source {
		description: String,
		#[source]
		source: SourceError,
	},

	#[error("invalid settings: {0}")]
	Deserialize(#[from] serde_json::Error),

	#[error("invalid route template: {0}")]
	Template(#[from] TemplateError),

	#[error("route template '{template}' has no catch-all parameter named '{expected}'")]
	CatchAllMismatch { template: String, expected: String },

	#[error("invalid field key or palette value: {0}")]
	Codec(#[from] CodecError),

	#[error("field key '{0}' is used more than once")]
	DuplicateKey(String),

	#[error("page count must not be negative, got {0}")]
	InvalidPageCount(i64),
}

/// Settings of the storefront's path-embedded state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontSettings {
	/// Route of listing pages.
	pub route_template: String,
	/// Name of the route's catch-all parameter.
	pub catch_all: String,
	/// Index of the state segment among the catch-all parts.
	pub state_position: usize,
	/// Field keys of page, sort and colour.
	pub keys: QueryKeys,
	/// Colours offered by the filter.
	pub palette: Vec<String>,
	/// Number of pages the pagination control shows.
	pub page_count: i64,
}

impl Default for StorefrontSettings {
	fn default() -> Self {
		Self {
			route_template: "/products/{params:*}".to_string(),
			catch_all: "params".to_string(),
			state_position: vitrine_urls::DEFAULT_STATE_POSITION,
			keys: QueryKeys::default(),
			palette: ["blue", "yellow", "indigo", "orange"]
				.into_iter()
				.map(str::to_string)
				.collect(),
			page_count: 5,
		}
	}
}

impl StorefrontSettings {
	/// Loads defaults, then `config` (if given), then `VITRINE_` variables.
	///
	/// A `config` path that does not exist is an error.
	pub fn load(config: Option<&Path>) -> Result<Self, SettingsError> {
		let mut builder = SettingsBuilder::new().add_source(storefront_defaults()?);
		if let Some(path) = config {
			builder = builder.add_source(TomlFileSource::new(path).required(true));
		}
		builder.add_source(EnvSource::storefront()).build()
	}

	/// Checks that every key and value can be carried by the state segment.
	///
	/// # Errors
	///
	/// Fails if the route template does not compile or lacks the catch-all,
	/// a key or palette value contains a reserved delimiter, two keys
	/// collide, or the page count is negative.
	pub fn validate(&self) -> Result<(), SettingsError> {
		let template = self.route()?;
		if template.catch_all_name() != Some(self.catch_all.as_str()) {
			return Err(SettingsError::CatchAllMismatch {
				template: self.route_template.clone(),
				expected: self.catch_all.clone(),
			});
		}

		let mut seen = HashSet::new();
		for key in [&self.keys.page, &self.keys.sort, &self.keys.color] {
			validate_key(key)?;
			if !seen.insert(key.as_str()) {
				return Err(SettingsError::DuplicateKey(key.clone()));
			}
		}

		for value in &self.palette {
			validate_scalar(value)?;
		}

		if self.page_count < 0 {
			return Err(SettingsError::InvalidPageCount(self.page_count));
		}
		Ok(())
	}

	/// Compiles the route template.
	pub fn route(&self) -> Result<RouteTemplate, SettingsError> {
		Ok(RouteTemplate::new(&self.route_template)?)
	}

	/// Returns the state placement.
	pub fn path_state(&self) -> PathState {
		PathState::new(self.state_position)
	}
}

/// Builds settings from prioritized sources.
///
/// # Examples
///
/// ```
/// use vitrine_conf::{SettingsBuilder, StorefrontSettings};
/// use vitrine_conf::sources::DefaultSource;
/// use serde_json::json;
///
/// let settings = SettingsBuilder::new()
///     .add_source(DefaultSource::new().with_value("page_count", json!(9)))
///     .build()
///     .unwrap();
///
/// assert_eq!(settings.page_count, 9);
/// assert_eq!(settings.keys, StorefrontSettings::default().keys);
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	/// Create a builder with no sources
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a configuration source
	pub fn add_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Merges all sources, lowest priority first, and validates the result.
	///
	/// Fields no source sets keep their [`Default`] value.
	pub fn build(mut self) -> Result<StorefrontSettings, SettingsError> {
		self.sources.sort_by_key(|source| source.priority());

		let mut merged = Map::new();
		for source in &self.sources {
			let description = source.description();
			let values = source.load().map_err(|source| SettingsError::Source {
				description: description.clone(),
				source,
			})?;
			debug!(source = %description, keys = values.len(), "merged configuration source");
			merge(&mut merged, values);
		}

		let settings: StorefrontSettings = serde_json::from_value(Value::Object(merged))?;
		settings.validate()?;
		info!(
			route = %settings.route_template,
			position = settings.state_position,
			"storefront settings loaded"
		);
		Ok(settings)
	}
}

fn storefront_defaults() -> Result<DefaultSource, SettingsError> {
	DefaultSource::from_serializable(&StorefrontSettings::default()).map_err(|source| {
		SettingsError::Source {
			description: "Default values".to_string(),
			source,
		}
	})
}
