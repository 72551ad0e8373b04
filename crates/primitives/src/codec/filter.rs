use std::fmt::Write as _;

use crate::entry::BoundRef;
use crate::ids::{Identifier, TypeTag};

/// Predicate excluding a finite identifier set, scoped to one entity type.
///
/// Handed to the picker so already-selected records are not offered again.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ExclusionFilter {
	/// Entity type the predicate applies to.
	pub entity_type: TypeTag,
	/// Identifiers to exclude, in selection order.
	pub excluded: Vec<Identifier>,
}

impl ExclusionFilter {
	/// Name of the primary key attribute the predicate is evaluated against.
	pub fn key_attribute(&self) -> String {
		format!("{}id", self.entity_type)
	}

	/// Returns true if `id` is excluded by this filter.
	pub fn excludes(&self, id: &Identifier) -> bool {
		self.excluded.contains(id)
	}

	/// Renders the filter as a fetch-style XML fragment.
	///
	/// Identifiers are grammar-validated, so nothing is escaped.
	pub fn to_xml(&self) -> String {
		let mut xml = format!(
			r#"<filter type="and"><condition attribute="{}" operator="not-in">"#,
			self.key_attribute()
		);
		for id in &self.excluded {
			let _ = write!(xml, "<value>{id}</value>");
		}
		xml.push_str("</condition></filter>");
		xml
	}
}

/// Builds the exclusion predicate for `entity_type` from the non-pending
/// entries of that type. Returns `None` when nothing needs excluding.
pub fn exclusion_filter<'a, R, I>(entity_type: &TypeTag, entries: I) -> Option<ExclusionFilter>
where
	R: BoundRef + 'a,
	I: IntoIterator<Item = &'a R>,
{
	let excluded: Vec<Identifier> = entries
		.into_iter()
		.filter(|e| !e.is_pending() && e.entity_type() == entity_type)
		.map(|e| e.id().clone())
		.collect();

	if excluded.is_empty() {
		return None;
	}
	Some(ExclusionFilter {
		entity_type: entity_type.clone(),
		excluded,
	})
}
