//! Bound value format: `id:type[;id:type]*`.
//!
//! Parsing never fails. Malformed segments are dropped, so
//! `serialize(parse(x))` canonicalizes rather than round-trips byte-for-byte.

use std::fmt::Write as _;

use crate::entry::{BoundRef, ParsedRef};
use crate::ids::{Identifier, TypeTag};

mod filter;

pub use filter::{ExclusionFilter, exclusion_filter};

/// Separator between `id:type` segments.
pub const SEGMENT_SEPARATOR: char = ';';
/// Separator between the identifier and the type inside a segment.
pub const TYPE_SEPARATOR: char = ':';

/// Decodes a bound value into refs, in input order and without deduplication.
pub fn parse(raw: &str) -> Vec<ParsedRef> {
	raw.split(SEGMENT_SEPARATOR)
		.filter(|segment| !segment.trim().is_empty())
		.filter_map(parse_segment)
		.collect()
}

fn parse_segment(segment: &str) -> Option<ParsedRef> {
	let (id, entity_type) = segment.split_once(TYPE_SEPARATOR)?;
	Some(ParsedRef::new(
		normalize_identifier(id)?,
		TypeTag::parse(entity_type).ok()?,
	))
}

/// Encodes non-pending refs as `id:type` joined by `;`.
pub fn serialize<'a, R, I>(refs: I) -> String
where
	R: BoundRef + 'a,
	I: IntoIterator<Item = &'a R>,
{
	let mut out = String::new();
	for r in refs.into_iter().filter(|r| !r.is_pending()) {
		if !out.is_empty() {
			out.push(SEGMENT_SEPARATOR);
		}
		let _ = write!(out, "{}{TYPE_SEPARATOR}{}", r.id(), r.entity_type());
	}
	out
}

/// Strips braces, lowercases and validates. Returns `None` for anything that
/// is not an `8-4-4-4-12` hex identifier.
pub fn normalize_identifier(raw: &str) -> Option<Identifier> {
	Identifier::parse(raw).ok()
}
