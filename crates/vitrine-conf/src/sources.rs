//! Configuration sources for layered settings
//!
//! Sources are merged in priority order (environment variables > config files
//! > defaults). Each source yields a flat map of top-level keys to JSON values;
//! nested objects are merged key by key.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Prefix of the environment variables read by [`EnvSource::storefront`].
pub const ENV_PREFIX: &str = "VITRINE_";

/// Separator of nested keys in environment variable names (`VITRINE_KEYS__PAGE`).
const NESTED_SEPARATOR: &str = "__";

/// Keys whose environment values are comma-separated lists.
const LIST_KEYS: &[&str] = &["palette"];

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Error type for configuration sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("IO error reading {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Parse error: {0}")]
	Parse(String),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

/// The `VITRINE_` environment variables
///
/// Names are stripped of the prefix and lowercased. `__` nests one level, so
/// `VITRINE_KEYS__PAGE=p` sets `keys.page`. Top-level integers and booleans are
/// parsed; `palette` is split on commas.
///
/// # Examples
///
/// ```
/// use vitrine_conf::sources::EnvSource;
///
/// let config = EnvSource::storefront()
///     .load_from([("VITRINE_PAGE_COUNT".to_string(), "8".to_string())]);
/// assert_eq!(config["page_count"], 8);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl EnvSource {
	/// Create a source reading the `VITRINE_` variables
	pub fn storefront() -> Self {
		Self
	}

	/// Builds the configuration from `vars` instead of the process environment.
	pub fn load_from<I>(&self, vars: I) -> IndexMap<String, Value>
	where
		I: IntoIterator<Item = (String, String)>,
	{
		let mut config = IndexMap::new();

		for (key, value) in vars {
			let Some(clean_key) = key.strip_prefix(ENV_PREFIX) else {
				continue;
			};
			let lower_key = clean_key.to_lowercase();
			if lower_key.is_empty() {
				continue;
			}

			let Some((section, field)) = lower_key.split_once(NESTED_SEPARATOR) else {
				config.insert(lower_key.clone(), parse_value(&lower_key, value));
				continue;
			};

			// Nested values stay strings: they are field keys and template parts.
			let entry = config
				.entry(section.to_string())
				.or_insert_with(|| Value::Object(Map::new()));
			if !entry.is_object() {
				*entry = Value::Object(Map::new());
			}
			if let Value::Object(map) = entry {
				map.insert(field.to_string(), Value::String(value));
			}
		}

		config
	}
}

fn parse_value(key: &str, value: String) -> Value {
	if LIST_KEYS.contains(&key) {
		let list = value
			.split(',')
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.map(|s| Value::String(s.to_string()))
			.collect();
		Value::Array(list)
	} else if let Ok(num) = value.parse::<i64>() {
		Value::Number(num.into())
	} else if let Ok(b) = value.parse::<bool>() {
		Value::Bool(b)
	} else {
		Value::String(value)
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.load_from(std::env::vars()))
	}

	fn priority(&self) -> u8 {
		100 // Highest priority
	}

	fn description(&self) -> String {
		format!("Environment variables (prefix: {})", ENV_PREFIX)
	}
}

/// TOML file configuration source
pub struct TomlFileSource {
	path: PathBuf,
	required: bool,
}

impl TomlFileSource {
	/// Create a TOML source; a missing file yields no values
	///
	/// # Examples
	///
	/// ```
	/// use vitrine_conf::sources::TomlFileSource;
	///
	/// let source = TomlFileSource::new("vitrine.toml");
	/// ```
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: false,
		}
	}

	/// Fail on a missing file instead of yielding no values
	pub fn required(mut self, required: bool) -> Self {
		self.required = required;
		self
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.required && !self.path.exists() {
			debug!(path = %self.path.display(), "optional config file not found");
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
			path: self.path.clone(),
			source,
		})?;
		let toml_value: toml::Value = toml::from_str(&content)?;
		let json_value = serde_json::to_value(toml_value)?;

		into_map(json_value)
	}

	fn priority(&self) -> u8 {
		50 // Medium priority
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// Default values configuration source
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	/// Create an empty default source
	///
	/// # Examples
	///
	/// ```
	/// use vitrine_conf::sources::DefaultSource;
	/// use serde_json::Value;
	///
	/// let source = DefaultSource::new()
	///     .with_value("page_count", Value::Number(5.into()));
	/// ```
	pub fn new() -> Self {
		Self {
			values: IndexMap::new(),
		}
	}

	/// Create a source holding every field of `value`
	pub fn from_serializable<T: serde::Serialize>(value: &T) -> Result<Self, SourceError> {
		Ok(Self {
			values: into_map(serde_json::to_value(value)?)?,
		})
	}

	/// Add a default value for a configuration key
	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}
}

impl Default for DefaultSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0 // Lowest priority
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}

/// Merges `source` into `target`, recursing into objects present in both.
pub(crate) fn merge(target: &mut Map<String, Value>, source: IndexMap<String, Value>) {
	for (key, value) in source {
		match (target.get_mut(&key), value) {
			(Some(Value::Object(existing)), Value::Object(incoming)) => {
				merge(existing, incoming.into_iter().collect());
			}
			(_, value) => {
				target.insert(key, value);
			}
		}
	}
}

fn into_map(value: Value) -> Result<IndexMap<String, Value>, SourceError> {
	match value {
		Value::Object(map) => Ok(map.into_iter().collect()),
		_ => Err(SourceError::Parse("Expected object at root".to_string())),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;
	use std::fs::File;
	use std::io::Write;
	use tempfile::TempDir;

	fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[rstest]
	fn test_env_source_parses_values() {
		let source = EnvSource::storefront();

		let config = source.load_from(vars(&[
			("VITRINE_PAGE_COUNT", "8"),
			("VITRINE_PALETTE", "red, green,,blue"),
			("VITRINE_ROUTE_TEMPLATE", "/shop/{params:*}"),
			("HOME", "/root"),
		]));

		assert_eq!(config.get("page_count"), Some(&json!(8)));
		assert_eq!(config.get("palette"), Some(&json!(["red", "green", "blue"])));
		assert_eq!(config.get("route_template"), Some(&json!("/shop/{params:*}")));
		assert!(!config.contains_key("home"));
	}

	#[rstest]
	fn test_env_source_nests_keys() {
		let source = EnvSource::storefront();

		let config = source.load_from(vars(&[
			("VITRINE_KEYS__PAGE", "p"),
			("VITRINE_KEYS__SORT", "2"),
		]));

		assert_eq!(config.get("keys"), Some(&json!({"page": "p", "sort": "2"})));
	}

	#[rstest]
	#[serial_test::serial]
	fn test_env_source_reads_process_environment() {
		// SAFETY: serialized with the other environment tests.
		unsafe {
			std::env::set_var("VITRINE_TEST_ONLY_FLAG", "true");
		}

		let config = EnvSource::storefront().load().unwrap();

		assert_eq!(config.get("test_only_flag"), Some(&Value::Bool(true)));

		// SAFETY: serialized with the other environment tests.
		unsafe {
			std::env::remove_var("VITRINE_TEST_ONLY_FLAG");
		}
	}

	#[rstest]
	fn test_toml_source() {
		let temp_dir = TempDir::new().unwrap();
		let config_path = temp_dir.path().join("vitrine.toml");

		let mut file = File::create(&config_path).unwrap();
		writeln!(
			file,
			r#"
page_count = 12
palette = ["red", "green"]

[keys]
page = "p"
"#
		)
		.unwrap();

		let config = TomlFileSource::new(&config_path).load().unwrap();

		assert_eq!(config.get("page_count"), Some(&json!(12)));
		assert_eq!(config.get("palette"), Some(&json!(["red", "green"])));
		assert_eq!(config.get("keys"), Some(&json!({"page": "p"})));
	}

	#[rstest]
	fn test_toml_source_missing_file() {
		let temp_dir = TempDir::new().unwrap();
		let missing = temp_dir.path().join("missing.toml");

		assert!(TomlFileSource::new(&missing).load().unwrap().is_empty());
		assert!(matches!(
			TomlFileSource::new(&missing).required(true).load(),
			Err(SourceError::Io { .. })
		));
	}

	#[rstest]
	fn test_merge_is_deep() {
		let mut target = json!({"keys": {"page": "page", "sort": "sort"}, "page_count": 5})
			.as_object()
			.cloned()
			.unwrap();
		let mut source = IndexMap::new();
		source.insert("keys".to_string(), json!({"page": "p"}));
		source.insert("page_count".to_string(), json!(9));

		merge(&mut target, source);

		assert_eq!(
			Value::Object(target),
			json!({"keys": {"page": "p", "sort": "sort"}, "page_count": 9})
		);
	}

	#[rstest]
	fn test_source_priority() {
		assert_eq!(EnvSource::storefront().priority(), 100);
		assert_eq!(TomlFileSource::new("vitrine.toml").priority(), 50);
		assert_eq!(DefaultSource::new().priority(), 0);
	}
}
