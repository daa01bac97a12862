//! Coercion between typed state and field values.

use vitrine_codec::FieldValue;
use vitrine_query::parse_int;

/// A type a [`PathQuery`](crate::PathQuery) can bind to.
///
/// Coercion from a field is total: `None` means "use the binding's default".
pub trait QueryValue: Clone + Send + Sync + 'static {
	/// Coerces a stored field. Returns `None` if the field cannot represent `Self`.
	fn from_field(value: &FieldValue) -> Option<Self>;

	/// Converts into the value written to the segment.
	fn to_field(&self) -> FieldValue;
}

/// Numbers read the leading integer of a scalar. Lists fall back to the default.
impl QueryValue for i64 {
	fn from_field(value: &FieldValue) -> Option<Self> {
		value.as_single().and_then(parse_int)
	}

	fn to_field(&self) -> FieldValue {
		FieldValue::Single(self.to_string())
	}
}

/// Strings pass scalars through. Lists fall back to the default.
impl QueryValue for String {
	fn from_field(value: &FieldValue) -> Option<Self> {
		value.as_single().map(str::to_string)
	}

	fn to_field(&self) -> FieldValue {
		FieldValue::Single(self.clone())
	}
}

/// Lists accept both shapes, wrapping a scalar into a singleton.
impl QueryValue for Vec<String> {
	fn from_field(value: &FieldValue) -> Option<Self> {
		Some(value.to_list())
	}

	fn to_field(&self) -> FieldValue {
		FieldValue::Multi(self.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(FieldValue::Single("7".into()), Some(7))]
	#[case(FieldValue::Single("7abc".into()), Some(7))]
	#[case(FieldValue::Single("abc".into()), None)]
	#[case(FieldValue::Multi(vec!["1".into(), "2".into()]), None)]
	fn test_number_coercion(#[case] value: FieldValue, #[case] expected: Option<i64>) {
		assert_eq!(i64::from_field(&value), expected);
	}

	#[rstest]
	fn test_string_coercion() {
		assert_eq!(
			String::from_field(&FieldValue::Single("new".into())),
			Some("new".to_string())
		);
		assert_eq!(
			String::from_field(&FieldValue::Multi(vec!["a".into(), "b".into()])),
			None
		);
	}

	#[rstest]
	fn test_list_coercion() {
		assert_eq!(
			Vec::<String>::from_field(&FieldValue::Single("blue".into())),
			Some(vec!["blue".to_string()])
		);
		assert_eq!(
			Vec::<String>::from_field(&FieldValue::Multi(vec!["yellow".into(), "blue".into()])),
			Some(vec!["yellow".to_string(), "blue".to_string()])
		);
	}

	#[rstest]
	fn test_to_field() {
		assert_eq!(3_i64.to_field(), FieldValue::Single("3".into()));
		assert_eq!(
			vec!["blue".to_string()].to_field(),
			FieldValue::Multi(vec!["blue".into()])
		);
	}
}
