//! Segment encoding and decoding.

use std::fmt;

use percent_encoding::percent_decode_str;
use tracing::{trace, warn};

use crate::field::{FieldMap, FieldValue};
use crate::{FIELD_DELIMITER, KEY_VALUE_DELIMITER, VALUE_DELIMITER};

/// Characters a URI-level decode leaves escaped, so that an escaped `;` or
/// `=` can never be mistaken for a delimiter after decoding.
const URI_RESERVED: &[u8] = b";/?:@&=+$,#";

/// Decodes a segment into a [`FieldMap`].
///
/// The segment is percent-decoded first (escapes of URI-reserved characters
/// are kept as-is), split on `;`, and each part is split on its **last** `=`.
/// A value containing `_` becomes a list.
///
/// Decoding never fails. `None`, an empty segment, or a segment without any
/// well-formed field all produce an empty map. Parts without `=` are skipped.
///
/// # Examples
///
/// ```
/// use vitrine_codec::{FieldValue, decode};
///
/// let map = decode(Some("color=blue_yellow;page=2"));
/// assert_eq!(map.get_str("page"), Some("2"));
/// assert_eq!(
///     map.get("color"),
///     Some(&FieldValue::Multi(vec!["blue".into(), "yellow".into()]))
/// );
///
/// assert!(decode(None).is_empty());
/// ```
pub fn decode(segment: Option<&str>) -> FieldMap {
	let mut map = FieldMap::new();
	let Some(segment) = segment else {
		return map;
	};

	let decoded = decode_uri(segment);
	for part in decoded.split(FIELD_DELIMITER) {
		if part.is_empty() {
			continue;
		}
		let Some((key, value)) = part.rsplit_once(KEY_VALUE_DELIMITER) else {
			warn!(part, "skipping field without key/value delimiter");
			continue;
		};
		if key.is_empty() {
			warn!(part, "skipping field with empty key");
			continue;
		}

		if value.contains(VALUE_DELIMITER) {
			let values: Vec<String> = value.split(VALUE_DELIMITER).map(str::to_string).collect();
			map.insert(key, values);
		} else {
			map.insert(key, value);
		}
	}

	trace!(segment, fields = map.len(), "decoded segment");
	map
}

/// Encodes a [`FieldMap`] into its canonical segment.
///
/// Fields are written in key order and list elements are sorted, so the
/// output depends only on the set of keys and values. The result is not
/// percent-encoded.
///
/// # Examples
///
/// ```
/// use vitrine_codec::{FieldMap, encode};
///
/// let mut map = FieldMap::new();
/// map.insert("sort", "priceLow");
/// map.insert("color", vec!["yellow", "blue"]);
/// assert_eq!(encode(&map), "color=blue_yellow;sort=priceLow");
///
/// assert_eq!(encode(&FieldMap::new()), "");
/// ```
pub fn encode(map: &FieldMap) -> String {
	let value_delimiter = VALUE_DELIMITER.to_string();
	let parts: Vec<String> = map
		.iter()
		.map(|(key, value)| match value {
			FieldValue::Single(value) => format!("{key}{KEY_VALUE_DELIMITER}{value}"),
			FieldValue::Multi(values) => {
				let mut sorted: Vec<&str> = values.iter().map(String::as_str).collect();
				sorted.sort_unstable();
				format!("{key}{KEY_VALUE_DELIMITER}{}", sorted.join(&value_delimiter))
			}
		})
		.collect();

	parts.join(&FIELD_DELIMITER.to_string())
}

/// Percent-decodes `input` the way a URI-level decode does.
///
/// Escapes whose decoded byte is URI-reserved (`;/?:@&=+$,#`) are left
/// untouched; everything else is decoded, and invalid UTF-8 is replaced
/// lossily. Malformed escapes are kept literally.
///
/// # Examples
///
/// ```
/// use vitrine_codec::decode_uri;
///
/// assert_eq!(decode_uri("navy%20blue"), "navy blue");
/// assert_eq!(decode_uri("a%3Bb"), "a%3Bb");
/// ```
pub fn decode_uri(input: &str) -> String {
	let bytes = input.as_bytes();
	let mut decoded = String::with_capacity(input.len());
	let mut chunk_start = 0;
	let mut i = 0;

	while i + 3 <= bytes.len() {
		if bytes[i] == b'%' && is_reserved_escape(&bytes[i + 1..i + 3]) {
			decoded.push_str(&percent_decode_str(&input[chunk_start..i]).decode_utf8_lossy());
			decoded.push_str(&input[i..i + 3]);
			i += 3;
			chunk_start = i;
		} else {
			i += 1;
		}
	}
	decoded.push_str(&percent_decode_str(&input[chunk_start..]).decode_utf8_lossy());

	decoded
}

fn is_reserved_escape(hex: &[u8]) -> bool {
	if !hex.iter().all(u8::is_ascii_hexdigit) {
		return false;
	}
	std::str::from_utf8(hex)
		.ok()
		.and_then(|digits| u8::from_str_radix(digits, 16).ok())
		.is_some_and(|byte| URI_RESERVED.contains(&byte))
}

impl fmt::Display for FieldMap {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&encode(self))
	}
}
