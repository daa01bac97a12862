//! Route templates with a catch-all parameter.
//!
//! Patterns use the same placeholder syntax as the server router: `{name}`
//! captures one path segment and `{name:*}` captures the rest of the path.
//! A storefront route such as `/products/{params:*}` carries the category and
//! the encoded state segment in its catch-all.

use std::collections::HashMap;
use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use regex::{Regex, RegexBuilder};

use crate::error::TemplateError;

/// Maximum allowed length for a pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a pattern.
const MAX_PATH_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled pattern regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20;

/// Characters escaped when substituting a value or catch-all part into a path.
///
/// Everything except alphanumerics and the sub-delimiters a browser leaves
/// untouched, so the state delimiters `;`, `=` and `_` survive as-is while
/// `/`, `?` and `#` inside a part are escaped.
const PART_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b';')
	.remove(b',')
	.remove(b':')
	.remove(b'@')
	.remove(b'&')
	.remove(b'=')
	.remove(b'+')
	.remove(b'$')
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'!')
	.remove(b'~')
	.remove(b'*')
	.remove(b'\'')
	.remove(b'(')
	.remove(b')');

/// A compiled route template.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use vitrine_urls::RouteTemplate;
///
/// let template = RouteTemplate::new("/products/{params:*}").unwrap();
/// assert_eq!(
///     template.catch_all("/products/shoes/page=2"),
///     Some(vec!["shoes".to_string(), "page=2".to_string()])
/// );
/// assert_eq!(
///     template
///         .reverse(&HashMap::new(), &["shoes".to_string(), "color=blue_yellow".to_string()])
///         .unwrap(),
///     "/products/shoes/color=blue_yellow"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RouteTemplate {
	pattern: String,
	regex: Regex,
	param_names: Vec<String>,
	catch_all: Option<String>,
}

impl RouteTemplate {
	/// Compiles a pattern.
	///
	/// # Errors
	///
	/// Fails if the pattern is too long, has too many segments, has a
	/// malformed placeholder, declares more than one catch-all, or does not
	/// compile.
	pub fn new(pattern: &str) -> Result<Self, TemplateError> {
		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(TemplateError::TooLong {
				length: pattern.len(),
				max: MAX_PATTERN_LENGTH,
			});
		}

		let count = pattern.split('/').count();
		if count > MAX_PATH_SEGMENTS {
			return Err(TemplateError::TooManySegments {
				count,
				max: MAX_PATH_SEGMENTS,
			});
		}

		let compiled = compile(pattern)?;
		let regex = RegexBuilder::new(&compiled.regex)
			.size_limit(MAX_REGEX_SIZE)
			.build()
			.map_err(|e| TemplateError::InvalidRegex(e.to_string()))?;

		Ok(Self {
			pattern: pattern.to_string(),
			regex,
			param_names: compiled.param_names,
			catch_all: compiled.catch_all,
		})
	}

	/// Returns the original pattern string.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Returns the name of the catch-all parameter, if any.
	pub fn catch_all_name(&self) -> Option<&str> {
		self.catch_all.as_deref()
	}

	/// Matches `path` and returns the percent-decoded parameter values.
	///
	/// Query strings and fragments are ignored. The catch-all value is decoded
	/// as a whole; [`RouteTemplate::catch_all`] yields its parts.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		let caps = self.regex.captures(strip_suffix(path))?;
		Some(
			self.param_names
				.iter()
				.filter_map(|name| {
					caps.name(name).map(|m| {
						let value = percent_decode_str(m.as_str()).decode_utf8_lossy();
						(name.clone(), value.into_owned())
					})
				})
				.collect(),
		)
	}

	/// Returns the non-empty `/`-separated parts captured by the catch-all.
	///
	/// `None` when the path does not match, the template has no catch-all, or
	/// the catch-all captured nothing. The raw capture is split before each
	/// part is percent-decoded, so an escaped `%2F` stays inside its part.
	pub fn catch_all(&self, path: &str) -> Option<Vec<String>> {
		let name = self.catch_all.as_deref()?;
		let caps = self.regex.captures(strip_suffix(path))?;
		split_parts(caps.name(name)?.as_str())
	}

	/// Builds a path from parameter values and the catch-all `parts`.
	///
	/// Every value and part is percent-encoded on its own, `/` included; the
	/// parts are then joined with `/`. A catch-all entry in `params` is ignored.
	///
	/// # Errors
	///
	/// Fails with [`TemplateError::MissingParameter`] if a segment parameter has
	/// no value.
	pub fn reverse(
		&self,
		params: &HashMap<String, String>,
		parts: &[String],
	) -> Result<String, TemplateError> {
		let mut result = self.pattern.clone();
		for name in &self.param_names {
			let (placeholder, encoded) = if self.catch_all.as_deref() == Some(name.as_str()) {
				let joined = parts
					.iter()
					.map(|part| encode_part(part))
					.collect::<Vec<_>>()
					.join("/");
				(format!("{{{}:*}}", name), joined)
			} else {
				let value = params
					.get(name)
					.ok_or_else(|| TemplateError::MissingParameter(name.clone()))?;
				(format!("{{{}}}", name), encode_part(value))
			};
			result = result.replacen(&placeholder, &encoded, 1);
		}
		Ok(result)
	}
}

impl PartialEq for RouteTemplate {
	fn eq(&self, other: &Self) -> bool {
		self.pattern == other.pattern
	}
}

impl Eq for RouteTemplate {}

impl fmt::Display for RouteTemplate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.pattern)
	}
}

/// Splits a raw catch-all capture into its non-empty, decoded parts.
fn split_parts(raw: &str) -> Option<Vec<String>> {
	let parts: Vec<String> = raw
		.split('/')
		.filter(|part| !part.is_empty())
		.map(|part| percent_decode_str(part).decode_utf8_lossy().into_owned())
		.collect();
	if parts.is_empty() { None } else { Some(parts) }
}

fn encode_part(value: &str) -> String {
	utf8_percent_encode(value, PART_ENCODE_SET).to_string()
}

fn strip_suffix(path: &str) -> &str {
	path.split(['?', '#']).next().unwrap_or(path)
}

struct Compiled {
	regex: String,
	param_names: Vec<String>,
	catch_all: Option<String>,
}

fn compile(pattern: &str) -> Result<Compiled, TemplateError> {
	let mut regex = String::from("^");
	let mut param_names = Vec::new();
	let mut catch_all = None;
	let mut chars = pattern.chars();

	while let Some(c) = chars.next() {
		match c {
			'{' => {
				let mut body = String::new();
				let mut closed = false;
				for next in chars.by_ref() {
					if next == '}' {
						closed = true;
						break;
					}
					body.push(next);
				}

				let (name, is_catch_all) = match body.strip_suffix(":*") {
					Some(name) => (name.to_string(), true),
					None => (body, false),
				};
				let valid = !name.is_empty()
					&& name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
				if !closed || !valid {
					return Err(TemplateError::MalformedPlaceholder(pattern.to_string()));
				}

				if is_catch_all {
					if catch_all.is_some() {
						return Err(TemplateError::MultipleCatchAll(pattern.to_string()));
					}
					catch_all = Some(name.clone());
					regex.push_str(&format!("(?P<{}>.*)", name));
				} else {
					regex.push_str(&format!("(?P<{}>[^/]+)", name));
				}
				param_names.push(name);
			}
			_ => regex.push_str(&regex::escape(c.encode_utf8(&mut [0u8; 4]))),
		}
	}

	regex.push('$');
	Ok(Compiled {
		regex,
		param_names,
		catch_all,
	})
}
