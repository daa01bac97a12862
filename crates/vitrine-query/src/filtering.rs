//! Multi-value filter helpers

use vitrine_codec::FieldMap;

/// Reads a multi-valued field as a sorted list.
///
/// An absent key yields an empty list and a scalar yields a singleton. The
/// result is sorted so it can be compared and displayed canonically. Only the
/// decoder splits on `_`; a scalar is never split here.
///
/// # Examples
///
/// ```
/// use vitrine_codec::FieldMap;
/// use vitrine_query::get_multi_value;
///
/// let mut fields = FieldMap::new();
/// fields.insert("color", vec!["yellow", "blue"]);
/// assert_eq!(get_multi_value(&fields, "color"), ["blue", "yellow"]);
/// assert!(get_multi_value(&fields, "size").is_empty());
/// ```
pub fn get_multi_value(fields: &FieldMap, key: &str) -> Vec<String> {
	let mut values = fields.get(key).map(|value| value.to_list()).unwrap_or_default();
	values.sort();
	values
}

/// Adds `value` to `selected`, or removes it if already present.
///
/// The result is sorted. Deselecting the last value returns an empty list,
/// which clears the field when written.
///
/// # Examples
///
/// ```
/// use vitrine_query::toggle_value;
///
/// let selected = vec!["yellow".to_string()];
/// assert_eq!(toggle_value(&selected, "blue"), ["blue", "yellow"]);
/// assert!(toggle_value(&selected, "yellow").is_empty());
/// ```
pub fn toggle_value(selected: &[String], value: &str) -> Vec<String> {
	let mut next: Vec<String> = if selected.iter().any(|v| v == value) {
		selected.iter().filter(|v| *v != value).cloned().collect()
	} else {
		selected
			.iter()
			.cloned()
			.chain(std::iter::once(value.to_string()))
			.collect()
	};
	next.sort();
	next
}
