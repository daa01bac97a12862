//! Field map: the typed in-memory form of all state carried by a segment.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::error::CodecError;
use crate::{FIELD_DELIMITER, KEY_VALUE_DELIMITER, PATH_SEPARATOR, VALUE_DELIMITER};

/// Reserved characters that may never appear inside a key.
const KEY_RESERVED: [char; 3] = [FIELD_DELIMITER, KEY_VALUE_DELIMITER, PATH_SEPARATOR];

/// Reserved characters that may never appear inside a scalar value.
const SCALAR_RESERVED: [char; 4] = [
	FIELD_DELIMITER,
	KEY_VALUE_DELIMITER,
	VALUE_DELIMITER,
	PATH_SEPARATOR,
];

/// The value stored under a field key.
///
/// Serializes untagged, so a map renders as `{"page": "2", "color": ["blue", "yellow"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
	/// A scalar value.
	Single(String),
	/// An ordered list of scalars.
	Multi(Vec<String>),
}

impl FieldValue {
	/// Returns the scalar, if this is a single value.
	pub fn as_single(&self) -> Option<&str> {
		match self {
			Self::Single(value) => Some(value),
			Self::Multi(_) => None,
		}
	}

	/// Returns the elements, if this is a list.
	pub fn as_multi(&self) -> Option<&[String]> {
		match self {
			Self::Single(_) => None,
			Self::Multi(values) => Some(values),
		}
	}

	/// Returns the value as a list, wrapping a scalar into a singleton.
	pub fn to_list(&self) -> Vec<String> {
		match self {
			Self::Single(value) => vec![value.clone()],
			Self::Multi(values) => values.clone(),
		}
	}

	/// Returns `true` if the value carries no content.
	pub fn is_empty(&self) -> bool {
		match self {
			Self::Single(value) => value.is_empty(),
			Self::Multi(values) => values.iter().all(String::is_empty),
		}
	}

	/// Returns a copy with list elements sorted the way [`crate::encode`] writes them.
	pub fn canonical(&self) -> Self {
		match self {
			Self::Single(value) => Self::Single(value.clone()),
			Self::Multi(values) => {
				let mut sorted = values.clone();
				sorted.sort();
				Self::Multi(sorted)
			}
		}
	}

	/// Checks every scalar against the reserved delimiters.
	pub fn validate(&self) -> Result<(), CodecError> {
		match self {
			Self::Single(value) => validate_scalar(value),
			Self::Multi(values) => values.iter().try_for_each(|v| validate_scalar(v)),
		}
	}

	/// Drops empty content. A list that keeps a single element collapses to a
	/// scalar, since both encode to the same text.
	fn normalized(self) -> Option<Self> {
		match self {
			Self::Single(value) if value.is_empty() => None,
			Self::Single(value) => Some(Self::Single(value)),
			Self::Multi(values) => {
				let mut values: Vec<String> = values.into_iter().filter(|v| !v.is_empty()).collect();
				match values.len() {
					0 => None,
					1 => values.pop().map(Self::Single),
					_ => Some(Self::Multi(values)),
				}
			}
		}
	}
}

impl From<String> for FieldValue {
	fn from(value: String) -> Self {
		Self::Single(value)
	}
}

impl From<&str> for FieldValue {
	fn from(value: &str) -> Self {
		Self::Single(value.to_string())
	}
}

impl From<Vec<String>> for FieldValue {
	fn from(values: Vec<String>) -> Self {
		Self::Multi(values)
	}
}

impl From<Vec<&str>> for FieldValue {
	fn from(values: Vec<&str>) -> Self {
		Self::Multi(values.into_iter().map(str::to_string).collect())
	}
}

impl From<&[String]> for FieldValue {
	fn from(values: &[String]) -> Self {
		Self::Multi(values.to_vec())
	}
}

/// Mapping from field key to value.
///
/// Keys are kept in byte order, which is also the canonical encoding order.
/// A key is only present while its value is non-empty: inserting an empty
/// string or an empty list removes the key instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
	fields: BTreeMap<String, FieldValue>,
}

impl FieldMap {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `value` under `key` and returns the previous value.
	///
	/// Empty strings and empty list elements are dropped; if nothing remains
	/// the key is removed.
	///
	/// # Examples
	///
	/// ```
	/// use vitrine_codec::{FieldMap, FieldValue};
	///
	/// let mut map = FieldMap::new();
	/// map.insert("color", vec!["blue", "yellow"]);
	/// assert!(map.contains_key("color"));
	///
	/// map.insert("color", Vec::<String>::new());
	/// assert!(!map.contains_key("color"));
	/// ```
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
		let key = key.into();
		match value.into().normalized() {
			Some(value) => self.fields.insert(key, value),
			None => self.fields.remove(&key),
		}
	}

	/// Returns the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&FieldValue> {
		self.fields.get(key)
	}

	/// Returns the scalar stored under `key`, if the value is a scalar.
	pub fn get_str(&self, key: &str) -> Option<&str> {
		self.get(key).and_then(FieldValue::as_single)
	}

	/// Removes `key`, returning its value.
	pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
		self.fields.remove(key)
	}

	/// Removes every key in `keys`.
	pub fn remove_all<I, S>(&mut self, keys: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		for key in keys {
			self.fields.remove(key.as_ref());
		}
	}

	/// Returns `true` if `key` is present.
	pub fn contains_key(&self, key: &str) -> bool {
		self.fields.contains_key(key)
	}

	/// Returns the number of fields.
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Returns `true` if no field is set.
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Iterates over fields in canonical key order.
	pub fn iter(&self) -> btree_map::Iter<'_, String, FieldValue> {
		self.fields.iter()
	}

	/// Iterates over keys in canonical order.
	pub fn keys(&self) -> btree_map::Keys<'_, String, FieldValue> {
		self.fields.keys()
	}

	/// Returns a copy with every list sorted.
	///
	/// Two maps are equal after `canonical()` exactly when they encode to the
	/// same segment.
	pub fn canonical(&self) -> Self {
		Self {
			fields: self
				.fields
				.iter()
				.map(|(key, value)| (key.clone(), value.canonical()))
				.collect(),
		}
	}

	/// Checks every key and value against the reserved delimiters.
	pub fn validate(&self) -> Result<(), CodecError> {
		for (key, value) in &self.fields {
			validate_key(key)?;
			value.validate()?;
		}
		Ok(())
	}
}

impl<K, V> FromIterator<(K, V)> for FieldMap
where
	K: Into<String>,
	V: Into<FieldValue>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut map = Self::new();
		for (key, value) in iter {
			map.insert(key, value);
		}
		map
	}
}

impl<K, V> Extend<(K, V)> for FieldMap
where
	K: Into<String>,
	V: Into<FieldValue>,
{
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		for (key, value) in iter {
			self.insert(key, value);
		}
	}
}

impl<'a> IntoIterator for &'a FieldMap {
	type Item = (&'a String, &'a FieldValue);
	type IntoIter = btree_map::Iter<'a, String, FieldValue>;

	fn into_iter(self) -> Self::IntoIter {
		self.fields.iter()
	}
}

impl Serialize for FieldMap {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_map(self.fields.iter())
	}
}

impl<'de> Deserialize<'de> for FieldMap {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let fields = BTreeMap::<String, FieldValue>::deserialize(deserializer)?;
		Ok(fields.into_iter().collect())
	}
}

/// Checks that `key` can be carried by a segment.
///
/// # Errors
///
/// Returns [`CodecError::EmptyKey`] for an empty key and
/// [`CodecError::FormatViolation`] if the key contains `;`, `=` or `/`.
pub fn validate_key(key: &str) -> Result<(), CodecError> {
	if key.is_empty() {
		return Err(CodecError::EmptyKey);
	}
	match key.chars().find(|c| KEY_RESERVED.contains(c)) {
		Some(delimiter) => Err(CodecError::key(key, delimiter)),
		None => Ok(()),
	}
}

/// Checks that `value` can be carried as a single scalar.
///
/// # Errors
///
/// Returns [`CodecError::FormatViolation`] if the value contains `;`, `=`,
/// `_` or `/`.
pub fn validate_scalar(value: &str) -> Result<(), CodecError> {
	match value.chars().find(|c| SCALAR_RESERVED.contains(c)) {
		Some(delimiter) => Err(CodecError::value(value, delimiter)),
		None => Ok(()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_insert_scalar() {
		let mut map = FieldMap::new();
		map.insert("page", "2");
		assert_eq!(map.get_str("page"), Some("2"));
		assert_eq!(map.len(), 1);
	}

	#[rstest]
	fn test_insert_empty_string_removes_key() {
		let mut map = FieldMap::new();
		map.insert("sort", "new");

		let previous = map.insert("sort", "");

		assert_eq!(previous, Some(FieldValue::Single("new".to_string())));
		assert!(!map.contains_key("sort"));
	}

	#[rstest]
	fn test_insert_empty_list_removes_key() {
		let mut map = FieldMap::new();
		map.insert("color", vec!["blue", "yellow"]);
		map.insert("color", vec!["", ""]);
		assert!(map.is_empty());
	}

	#[rstest]
	fn test_insert_single_element_list_collapses() {
		let mut map = FieldMap::new();
		map.insert("color", vec!["blue"]);
		assert_eq!(map.get("color"), Some(&FieldValue::Single("blue".to_string())));
	}

	#[rstest]
	fn test_insert_keeps_list_order() {
		let mut map = FieldMap::new();
		map.insert("color", vec!["yellow", "blue"]);
		assert_eq!(
			map.get("color").and_then(FieldValue::as_multi),
			Some(&["yellow".to_string(), "blue".to_string()][..])
		);
	}

	#[rstest]
	fn test_keys_in_byte_order() {
		let map: FieldMap = [("sort", "new"), ("page", "1"), ("color", "blue")]
			.into_iter()
			.collect();
		let keys: Vec<&String> = map.keys().collect();
		assert_eq!(keys, ["color", "page", "sort"]);
	}

	#[rstest]
	fn test_remove_all() {
		let mut map: FieldMap = [("sort", "new"), ("page", "3"), ("color", "blue")]
			.into_iter()
			.collect();
		map.remove_all(["page", "missing"]);
		assert!(!map.contains_key("page"));
		assert_eq!(map.len(), 2);
	}

	#[rstest]
	fn test_canonical_sorts_lists() {
		let mut left = FieldMap::new();
		left.insert("color", vec!["yellow", "blue"]);
		let mut right = FieldMap::new();
		right.insert("color", vec!["blue", "yellow"]);

		assert_ne!(left, right);
		assert_eq!(left.canonical(), right.canonical());
	}

	#[rstest]
	#[case("page")]
	#[case("price_range")]
	#[case("x")]
	fn test_validate_key_accepts(#[case] key: &str) {
		assert!(validate_key(key).is_ok());
	}

	#[rstest]
	#[case("a;b", ';')]
	#[case("a=b", '=')]
	#[case("a/b", '/')]
	fn test_validate_key_rejects(#[case] key: &str, #[case] delimiter: char) {
		let err = validate_key(key).unwrap_err();
		assert_eq!(err, CodecError::key(key, delimiter));
	}

	#[rstest]
	fn test_validate_key_rejects_empty() {
		assert_eq!(validate_key(""), Err(CodecError::EmptyKey));
	}

	#[rstest]
	#[case("blue_green", '_')]
	#[case("a;b", ';')]
	#[case("x=y", '=')]
	#[case("shoes/red", '/')]
	fn test_validate_scalar_rejects(#[case] value: &str, #[case] delimiter: char) {
		let err = validate_scalar(value).unwrap_err();
		assert_eq!(err, CodecError::value(value, delimiter));
	}

	#[rstest]
	fn test_map_validate_reports_list_element() {
		let mut map = FieldMap::new();
		map.insert("color", vec!["blue", "dark_red"]);
		assert!(matches!(
			map.validate(),
			Err(CodecError::FormatViolation { delimiter: '_', .. })
		));
	}

	#[rstest]
	fn test_serialize_untagged() {
		let mut map = FieldMap::new();
		map.insert("page", "2");
		map.insert("color", vec!["blue", "yellow"]);

		let json = serde_json::to_string(&map).unwrap();

		assert_eq!(json, r#"{"color":["blue","yellow"],"page":"2"}"#);
	}

	#[rstest]
	fn test_deserialize_normalizes() {
		let map: FieldMap = serde_json::from_str(r#"{"page":"","color":["blue"]}"#).unwrap();
		assert!(!map.contains_key("page"));
		assert_eq!(map.get_str("color"), Some("blue"));
	}
}
