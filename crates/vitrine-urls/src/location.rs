//! Locating the state segment inside a path.

use std::collections::HashMap;

use vitrine_codec::{FieldMap, decode};

use crate::error::TemplateError;
use crate::navigation::Navigator;
use crate::template::RouteTemplate;

/// Catch-all index of the state segment on storefront routes.
///
/// `/products/shoes/page=2` captures `["shoes", "page=2"]`: the category comes
/// first and the state second.
pub const DEFAULT_STATE_POSITION: usize = 1;

/// Where the state segment sits among the catch-all parts.
///
/// Parts before the position are the *rest* (e.g. the category) and are kept
/// verbatim when the state changes. Parts after it are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathState {
	position: usize,
}

impl Default for PathState {
	fn default() -> Self {
		Self::new(DEFAULT_STATE_POSITION)
	}
}

impl PathState {
	/// Places the state segment at catch-all index `position`.
	pub fn new(position: usize) -> Self {
		Self { position }
	}

	/// Returns the catch-all index of the state segment.
	pub fn position(&self) -> usize {
		self.position
	}

	/// Returns the state segment, if present and non-empty.
	pub fn segment<'a>(&self, parts: &'a [String]) -> Option<&'a str> {
		parts
			.get(self.position)
			.map(String::as_str)
			.filter(|segment| !segment.is_empty())
	}

	/// Returns the parts preceding the state segment.
	pub fn rest<'a>(&self, parts: &'a [String]) -> &'a [String] {
		&parts[..self.position.min(parts.len())]
	}

	/// Returns the parts with the state replaced by `segment`.
	///
	/// An empty segment is left out, so clearing every field yields the bare
	/// rest path.
	pub fn rebuild(&self, parts: &[String], segment: &str) -> Vec<String> {
		let mut next = self.rest(parts).to_vec();
		if !segment.is_empty() {
			next.push(segment.to_string());
		}
		next
	}
}

/// A path resolved against its route template.
#[derive(Debug, Clone)]
pub struct Location {
	template: RouteTemplate,
	params: HashMap<String, String>,
	parts: Option<Vec<String>>,
}

impl Location {
	/// Resolves `path` against `template`.
	///
	/// A path the template does not match resolves with no parameters, as if
	/// the catch-all were absent.
	pub fn resolve(template: RouteTemplate, path: &str) -> Self {
		let params = template.matches(path).unwrap_or_default();
		let parts = template.catch_all(path);
		Self {
			template,
			params,
			parts,
		}
	}

	/// Resolves the navigator's current location.
	///
	/// # Errors
	///
	/// Fails if the navigator's route template does not compile.
	pub fn current(navigator: &dyn Navigator) -> Result<Self, TemplateError> {
		let template = RouteTemplate::new(&navigator.current_path_template())?;
		Ok(Self::resolve(template, &navigator.current_path()))
	}

	/// Returns the route template.
	pub fn template(&self) -> &RouteTemplate {
		&self.template
	}

	/// Returns the catch-all parts, or `None` if the catch-all is absent.
	pub fn parts(&self) -> Option<&[String]> {
		self.parts.as_deref()
	}

	/// Returns the raw state segment.
	pub fn segment(&self, state: &PathState) -> Option<&str> {
		self.parts().and_then(|parts| state.segment(parts))
	}

	/// Decodes the state segment. An absent segment yields an empty map.
	pub fn fields(&self, state: &PathState) -> FieldMap {
		decode(self.segment(state))
	}

	/// Builds the path with the catch-all replaced by `parts`.
	///
	/// Other template parameters keep their current values.
	///
	/// # Errors
	///
	/// Fails if the template has no catch-all or another parameter is unknown.
	pub fn with_parts(&self, parts: &[String]) -> Result<String, TemplateError> {
		if self.template.catch_all_name().is_none() {
			return Err(TemplateError::NoCatchAll(self.template.pattern().to_string()));
		}
		self.template.reverse(&self.params, parts)
	}

	/// Builds the path with the state segment replaced by `segment`.
	pub fn with_segment(&self, state: &PathState, segment: &str) -> Result<String, TemplateError> {
		let parts = self.parts().unwrap_or_default();
		self.with_parts(&state.rebuild(parts, segment))
	}

	/// Builds the path with the state segment removed.
	pub fn without_segment(&self, state: &PathState) -> Result<String, TemplateError> {
		self.with_segment(state, "")
	}
}
