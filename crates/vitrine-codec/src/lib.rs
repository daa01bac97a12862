//! # Vitrine Codec
//!
//! Encodes multi-field, multi-valued storefront state (pagination, sort,
//! multi-select filters) into a single canonical path segment and decodes it
//! back into a [`FieldMap`].
//!
//! ## Segment Grammar
//!
//! ```text
//! segment = field *( ";" field )
//! field   = key "=" value
//! value   = scalar / ( scalar *( "_" scalar ) )
//! ```
//!
//! The reserved characters `;`, `=` and `_` have no escape form. They must not
//! appear inside a scalar, and `;`/`=` must not appear inside a key. Use
//! [`FieldMap::validate`] or [`validate_scalar`] at the boundary where values
//! enter the map.
//!
//! ## Canonical Form
//!
//! [`encode`] orders fields by the full key and sorts list elements, so two
//! maps holding the same keys and values always produce byte-identical
//! segments regardless of insertion order. This makes the resulting URLs safe
//! to pre-render and cache.
//!
//! ## Example
//!
//! ```
//! use vitrine_codec::{FieldMap, FieldValue, decode, encode};
//!
//! let mut map = FieldMap::new();
//! map.insert("page", "2");
//! map.insert("color", vec!["yellow".to_string(), "blue".to_string()]);
//!
//! let segment = encode(&map);
//! assert_eq!(segment, "color=blue_yellow;page=2");
//!
//! let decoded = decode(Some(&segment));
//! assert_eq!(
//!     decoded.get("color"),
//!     Some(&FieldValue::Multi(vec!["blue".to_string(), "yellow".to_string()]))
//! );
//! ```

pub mod codec;
pub mod error;
pub mod field;

pub use codec::{decode, decode_uri, encode};
pub use error::CodecError;
pub use field::{FieldMap, FieldValue, validate_key, validate_scalar};

/// Separates field-parts inside a segment.
pub const FIELD_DELIMITER: char = ';';

/// Separates a key from its value. Decoding splits on the last occurrence.
pub const KEY_VALUE_DELIMITER: char = '=';

/// Separates the elements of a multi-valued field.
pub const VALUE_DELIMITER: char = '_';

/// Separates path parts. A segment must stay a single path part.
pub const PATH_SEPARATOR: char = '/';
