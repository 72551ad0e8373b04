use std::fmt;

use thiserror::Error;


/// Length of a canonical identifier (`8-4-4-4-12` hex groups plus hyphens).
pub const IDENTIFIER_LEN: usize = 36;

/// Byte offsets of the hyphens inside a canonical identifier.
const HYPHEN_OFFSETS: [usize; 4] = [8, 13, 18, 23];

/// Errors produced when constructing identifiers or type tags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
	/// The input does not match the `8-4-4-4-12` hex grouping.
	#[error("invalid identifier: {0:?}")]
	InvalidIdentifier(String),
	/// The type tag is empty after trimming.
	#[error("empty type tag")]
	EmptyTypeTag,
}

/// Canonical 36-character record key.
///
/// Always stored in normalized form: braces stripped, surrounding whitespace
/// trimmed, lowercase. Two identifiers compare equal iff their normalized
/// forms are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
	feature = "serde",
	derive(serde::Serialize, serde::Deserialize),
	serde(try_from = "String", into = "String")
)]
pub struct Identifier(String);

impl Identifier {
	/// Normalizes and validates `raw`.
	///
	/// Accepts `{AAAAAAAA-...}` and bare forms in any case. Only one leading
	/// `{` and one trailing `}` are stripped.
	pub fn parse(raw: &str) -> Result<Self, ParseError> {
		let trimmed = raw.trim();
		let trimmed = trimmed.strip_prefix('{').unwrap_or(trimmed);
		let trimmed = trimmed.strip_suffix('}').unwrap_or(trimmed);
		let normalized = trimmed.trim().to_ascii_lowercase();

		if is_canonical(&normalized) {
			Ok(Self(normalized))
		} else {
			Err(ParseError::InvalidIdentifier(raw.to_owned()))
		}
	}

	/// Returns the normalized string form.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

/// Checks the `8-4-4-4-12` lowercase hex grouping.
fn is_canonical(s: &str) -> bool {
	s.len() == IDENTIFIER_LEN
		&& s.bytes().enumerate().all(|(i, b)| {
			if HYPHEN_OFFSETS.contains(&i) {
				b == b'-'
			} else {
				b.is_ascii_digit() || (b'a'..=b'f').contains(&b)
			}
		})
}

impl fmt::Display for Identifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for Identifier {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl TryFrom<String> for Identifier {
	type Error = ParseError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(&value)
	}
}

impl From<Identifier> for String {
	fn from(id: Identifier) -> Self {
		id.0
	}
}

/// Lowercase name of a remote entity type (table).
///
/// No enumeration is enforced; any non-empty token is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
	feature = "serde",
	derive(serde::Serialize, serde::Deserialize),
	serde(try_from = "String", into = "String")
)]
pub struct TypeTag(String);

impl TypeTag {
	/// Trims and lowercases `raw`, rejecting empty input.
	pub fn parse(raw: &str) -> Result<Self, ParseError> {
		let tag = raw.trim();
		if tag.is_empty() {
			return Err(ParseError::EmptyTypeTag);
		}
		Ok(Self(tag.to_lowercase()))
	}

	/// Returns the lowercase string form.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for TypeTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for TypeTag {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl TryFrom<String> for TypeTag {
	type Error = ParseError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(&value)
	}
}

impl From<TypeTag> for String {
	fn from(tag: TypeTag) -> Self {
		tag.0
	}
}
