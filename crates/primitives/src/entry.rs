use crate::ids::{Identifier, TypeTag};

/// Display name shown for entries whose record has not been resolved yet.
pub const LOADING_DISPLAY_NAME: &str = "Loading…";

/// Anything that can be written into the bound value.
pub trait BoundRef {
	/// Record identifier.
	fn id(&self) -> &Identifier;
	/// Entity type the record belongs to.
	fn entity_type(&self) -> &TypeTag;
	/// Whether the entry is an unresolved placeholder. Pending refs are never serialized.
	fn is_pending(&self) -> bool {
		false
	}
}

/// An `identifier:type` pair decoded from the bound value.
///
/// Carries no display data; it exists only between parsing and resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedRef {
	/// Normalized identifier.
	pub id: Identifier,
	/// Lowercased entity type.
	pub entity_type: TypeTag,
}

impl ParsedRef {
	/// Creates a ref from already-validated parts.
	pub fn new(id: Identifier, entity_type: TypeTag) -> Self {
		Self { id, entity_type }
	}
}

impl BoundRef for ParsedRef {
	fn id(&self) -> &Identifier {
		&self.id
	}

	fn entity_type(&self) -> &TypeTag {
		&self.entity_type
	}
}

/// One item of the in-memory selection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionEntry {
	/// Normalized identifier.
	pub id: Identifier,
	/// Lowercased entity type.
	pub entity_type: TypeTag,
	/// Resolved display name, or [`LOADING_DISPLAY_NAME`] while pending.
	pub display_name: String,
	/// Icon reference for the entity type, when the store knows one.
	pub icon: Option<String>,
	/// Placeholder awaiting resolution.
	pub pending: bool,
}

impl SelectionEntry {
	/// Creates a resolved entry.
	pub fn resolved(id: Identifier, entity_type: TypeTag, display_name: impl Into<String>) -> Self {
		Self {
			id,
			entity_type,
			display_name: display_name.into(),
			icon: None,
			pending: false,
		}
	}

	/// Creates a placeholder for `r` with the loading display name.
	pub fn placeholder(r: &ParsedRef) -> Self {
		Self {
			id: r.id.clone(),
			entity_type: r.entity_type.clone(),
			display_name: LOADING_DISPLAY_NAME.to_owned(),
			icon: None,
			pending: true,
		}
	}

	/// Attaches an icon reference.
	pub fn with_icon(mut self, icon: Option<String>) -> Self {
		self.icon = icon;
		self
	}

	/// Returns the `identifier:type` pair this entry was built from.
	pub fn to_ref(&self) -> ParsedRef {
		ParsedRef::new(self.id.clone(), self.entity_type.clone())
	}
}

impl BoundRef for SelectionEntry {
	fn id(&self) -> &Identifier {
		&self.id
	}

	fn entity_type(&self) -> &TypeTag {
		&self.entity_type
	}

	fn is_pending(&self) -> bool {
		self.pending
	}
}
