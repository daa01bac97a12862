//! Error types for the segment codec.

use thiserror::Error;

/// Errors raised when a value cannot be represented in a segment.
///
/// Decoding never fails: malformed URLs resolve to defaults further up.
/// These errors only guard the write side, where a caller tries to store a
/// key or value the grammar cannot carry.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
	/// A key or value contains a reserved delimiter.
	#[error("{field} '{value}' contains reserved delimiter '{delimiter}'")]
	FormatViolation {
		/// What was being validated ("key" or "value").
		field: &'static str,
		/// The offending text.
		value: String,
		/// The reserved character found.
		delimiter: char,
	},
	/// A key is empty.
	#[error("field key must not be empty")]
	EmptyKey,
}

impl CodecError {
	pub(crate) fn key(value: &str, delimiter: char) -> Self {
		Self::FormatViolation {
			field: "key",
			value: value.to_string(),
			delimiter,
		}
	}

	pub(crate) fn value(value: &str, delimiter: char) -> Self {
		Self::FormatViolation {
			field: "value",
			value: value.to_string(),
			delimiter,
		}
	}
}
