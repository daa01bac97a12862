//! Page number derivation

use serde::{Deserialize, Serialize};
use tracing::debug;
use vitrine_codec::FieldMap;

/// The page a listing request asks for (1-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
	/// Current page number, never below 1
	pub page: u64,
}

impl Default for Pagination {
	fn default() -> Self {
		Self { page: 1 }
	}
}

impl Pagination {
	/// Returns the page clamped to `total_pages`.
	///
	/// A page past the end resolves to the first page, matching what the
	/// pagination control redirects to. `total_pages == 0` means the count is
	/// unknown and leaves the page untouched.
	pub fn clamp_to(self, total_pages: u64) -> Self {
		if total_pages == 0 || self.page <= total_pages {
			self
		} else {
			debug!(page = self.page, total_pages, "page beyond last page, resetting");
			Self::default()
		}
	}

	/// Returns `true` if this is the first page
	pub fn is_first(&self) -> bool {
		self.page.saturating_sub(1) == 0
	}

	/// Returns `true` if no page follows this one
	pub fn is_last(&self, total_pages: u64) -> bool {
		self.page.saturating_add(1) > total_pages
	}
}

/// Reads the page number stored under `key`.
///
/// Absent keys, list values and text without a leading integer yield page 1.
/// Values at or below zero are clamped to 1. There is no upper bound here;
/// see [`Pagination::clamp_to`].
///
/// # Examples
///
/// ```
/// use vitrine_codec::decode;
/// use vitrine_query::get_pagination;
///
/// assert_eq!(get_pagination(&decode(Some("page=7")), "page").page, 7);
/// assert_eq!(get_pagination(&decode(Some("page=0")), "page").page, 1);
/// assert_eq!(get_pagination(&decode(Some("page=abc")), "page").page, 1);
/// ```
pub fn get_pagination(fields: &FieldMap, key: &str) -> Pagination {
	let Some(raw) = fields.get_str(key) else {
		return Pagination::default();
	};

	match parse_int(raw) {
		Some(page) if page > 0 => Pagination { page: page as u64 },
		Some(page) => {
			debug!(key, page, "non-positive page, clamping to 1");
			Pagination::default()
		}
		None => {
			debug!(key, raw, "unparseable page, using 1");
			Pagination::default()
		}
	}
}

/// Parses the leading decimal integer of `text`.
///
/// Leading whitespace and a single sign are accepted and parsing stops at
/// the first non-digit, so `"12abc"` is 12 and `"abc"` is `None`. Values out
/// of range saturate.
///
/// # Examples
///
/// ```
/// use vitrine_query::parse_int;
///
/// assert_eq!(parse_int(" 42"), Some(42));
/// assert_eq!(parse_int("-3px"), Some(-3));
/// assert_eq!(parse_int("px"), None);
/// ```
pub fn parse_int(text: &str) -> Option<i64> {
	let trimmed = text.trim_start();
	let (negative, unsigned) = match trimmed.as_bytes().first() {
		Some(b'-') => (true, &trimmed[1..]),
		Some(b'+') => (false, &trimmed[1..]),
		_ => (false, trimmed),
	};

	let digits_len = unsigned
		.bytes()
		.take_while(u8::is_ascii_digit)
		.count();
	if digits_len == 0 {
		return None;
	}

	let digits = &unsigned[..digits_len];
	let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
	Some(if negative { -magnitude } else { magnitude })
}
