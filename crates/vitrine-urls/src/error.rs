//! Error types for routing, navigation and state binding.

use thiserror::Error;
use vitrine_codec::CodecError;

/// Errors raised while compiling or reversing a [`RouteTemplate`](crate::RouteTemplate).
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
	/// The pattern exceeds the maximum length.
	#[error("pattern length {length} exceeds maximum allowed length of {max} bytes")]
	TooLong {
		/// Actual length in bytes.
		length: usize,
		/// Maximum length in bytes.
		max: usize,
	},
	/// The pattern has too many path segments.
	#[error("pattern has {count} path segments, exceeding maximum of {max}")]
	TooManySegments {
		/// Actual segment count.
		count: usize,
		/// Maximum segment count.
		max: usize,
	},
	/// A placeholder is unterminated or unnamed.
	#[error("malformed placeholder in pattern '{0}'")]
	MalformedPlaceholder(String),
	/// More than one catch-all placeholder.
	#[error("pattern '{0}' declares more than one catch-all parameter")]
	MultipleCatchAll(String),
	/// The compiled regex was rejected.
	#[error("failed to compile pattern regex: {0}")]
	InvalidRegex(String),
	/// The template has no catch-all parameter to carry state.
	#[error("pattern '{0}' has no catch-all parameter")]
	NoCatchAll(String),
	/// A parameter needed to reverse the template has no value.
	#[error("missing parameter: {0}")]
	MissingParameter(String),
}

/// Errors reported by a [`Navigator`](crate::Navigator).
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
	/// The target is not an absolute path.
	#[error("invalid navigation target: {0}")]
	InvalidPath(String),
	/// The navigator refused or failed to move.
	#[error("navigation failed: {0}")]
	Failed(String),
}

/// Errors raised by state writes and link building.
///
/// Reading state never fails. Writing fails only for caller mistakes (a key
/// or value the grammar cannot carry, a broken route template) or when the
/// navigator itself fails.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
	/// A key or value contains a reserved delimiter.
	#[error(transparent)]
	Format(#[from] CodecError),
	/// The current route template cannot be compiled or reversed.
	#[error(transparent)]
	Template(#[from] TemplateError),
	/// The navigator failed.
	#[error(transparent)]
	Navigation(#[from] NavigationError),
}

/// Errors raised while deriving a server-side listing.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingError {
	/// The path carries no category.
	#[error("no category in path '{0}'")]
	NotFound(String),
}
