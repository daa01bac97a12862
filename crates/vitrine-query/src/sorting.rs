//! Sort token mapping

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use vitrine_codec::FieldMap;

/// Key the storefront stores its sort token under
pub const DEFAULT_SORT_KEY: &str = "sort";

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
	/// Ascending order
	Asc,
	/// Descending order
	Desc,
}

impl SortDirection {
	fn as_str(&self) -> &'static str {
		match self {
			Self::Asc => "asc",
			Self::Desc => "desc",
		}
	}
}

/// A backend sort expression such as `sortByPrice:desc`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortExpression {
	/// Backend sort field
	pub field: &'static str,
	/// Direction
	pub direction: SortDirection,
}

impl fmt::Display for SortExpression {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.field, self.direction.as_str())
	}
}

/// The sort options offered by the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProductSort {
	/// Newest first
	#[default]
	New,
	/// Cheapest first
	PriceLow,
	/// Most expensive first
	PriceHigh,
}

impl ProductSort {
	/// All options, in display order
	pub const ALL: [Self; 3] = [Self::New, Self::PriceLow, Self::PriceHigh];

	/// Parses a URL token. Unknown tokens yield `None`.
	pub fn from_token(token: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|sort| sort.token() == token)
	}

	/// Returns the token written into the URL
	pub fn token(&self) -> &'static str {
		match self {
			Self::New => "new",
			Self::PriceLow => "priceLow",
			Self::PriceHigh => "priceHigh",
		}
	}

	/// Returns the backend expression this option sorts by
	pub fn expression(&self) -> SortExpression {
		match self {
			Self::New => SortExpression {
				field: "sortByDate",
				direction: SortDirection::Asc,
			},
			Self::PriceLow => SortExpression {
				field: "sortByPrice",
				direction: SortDirection::Asc,
			},
			Self::PriceHigh => SortExpression {
				field: "sortByPrice",
				direction: SortDirection::Desc,
			},
		}
	}
}

/// Maps the sort token under [`DEFAULT_SORT_KEY`] to backend sort expressions.
///
/// # Examples
///
/// ```
/// use vitrine_codec::decode;
/// use vitrine_query::get_products_sort;
///
/// assert_eq!(get_products_sort(&decode(Some("sort=priceHigh"))), ["sortByPrice:desc"]);
/// assert_eq!(get_products_sort(&decode(Some("sort=random"))), ["sortByDate:asc"]);
/// ```
pub fn get_products_sort(fields: &FieldMap) -> Vec<String> {
	get_products_sort_by(fields, DEFAULT_SORT_KEY)
}

/// Maps the sort token under `key` to backend sort expressions.
///
/// Absent, list-valued and unknown tokens fall back to [`ProductSort::New`].
pub fn get_products_sort_by(fields: &FieldMap, key: &str) -> Vec<String> {
	let sort = match fields.get_str(key) {
		Some(token) => ProductSort::from_token(token).unwrap_or_else(|| {
			debug!(key, token, "unknown sort token, using default");
			ProductSort::default()
		}),
		None => ProductSort::default(),
	};

	vec![sort.expression().to_string()]
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use vitrine_codec::decode;

	#[rstest]
	#[case("sort=new", "sortByDate:asc")]
	#[case("sort=priceLow", "sortByPrice:asc")]
	#[case("sort=priceHigh", "sortByPrice:desc")]
	#[case("sort=PRICEHIGH", "sortByDate:asc")]
	#[case("sort=new_priceLow", "sortByDate:asc")]
	#[case("page=2", "sortByDate:asc")]
	fn test_get_products_sort(#[case] segment: &str, #[case] expected: &str) {
		let fields = decode(Some(segment));
		assert_eq!(get_products_sort(&fields), vec![expected.to_string()]);
	}

	#[rstest]
	fn test_get_products_sort_by_custom_key() {
		let fields = decode(Some("order=priceLow"));
		assert_eq!(get_products_sort_by(&fields, "order"), vec!["sortByPrice:asc"]);
	}

	#[rstest]
	fn test_token_roundtrip_for_all_options() {
		for sort in ProductSort::ALL {
			assert_eq!(ProductSort::from_token(sort.token()), Some(sort));
		}
	}

	#[rstest]
	fn test_serde_uses_url_tokens() {
		let json = serde_json::to_string(&ProductSort::PriceHigh).unwrap();
		assert_eq!(json, r#""priceHigh""#);
	}
}
