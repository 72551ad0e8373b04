//! Collaborators supplied by the host: the bound field, the record store,
//! the picker dialog, and detail navigation.

use std::collections::BTreeSet;

use async_trait::async_trait;
use refbind_primitives::{ExclusionFilter, Identifier, TypeTag};
use serde::Serialize;
use thiserror::Error;

/// A record returned by the store, keyed by field name.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Field requested when no display field is known for a type.
pub const DEFAULT_DISPLAY_FIELD: &str = "name";

/// Built-in display field table for well-known entity types.
const DISPLAY_FIELDS: &[(&str, &str)] = &[
	("appointment", "subject"),
	("contact", "fullname"),
	("email", "subject"),
	("incident", "title"),
	("lead", "fullname"),
	("phonecall", "subject"),
	("systemuser", "fullname"),
	("task", "subject"),
];

/// Returns the display field for `entity_type`, falling back to [`DEFAULT_DISPLAY_FIELD`].
pub fn default_display_field(entity_type: &TypeTag) -> &'static str {
	DISPLAY_FIELDS
		.iter()
		.find(|(ty, _)| *ty == entity_type.as_str())
		.map_or(DEFAULT_DISPLAY_FIELD, |(_, field)| field)
}

/// Values derived from the selection and handed back to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoundOutput {
	/// Serialized `id:type;…` value of the resolved entries.
	pub value: String,
	/// `;`-joined display names of the resolved entries.
	pub display: String,
	/// Number of resolved entries.
	pub count: usize,
}

/// The host-persisted string the selection is bound to.
pub trait BoundField: Send + Sync {
	/// Reads the live bound value.
	fn current(&self) -> String;

	/// Emits derived outputs after the selection changed.
	fn publish(&self, output: &BoundOutput);
}

/// Failure classes of a point lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
	/// The record does not exist.
	#[error("record not found")]
	NotFound,
	/// The record exists but the caller may not read it.
	#[error("access to record denied")]
	Forbidden,
	/// The store cannot be reached at all.
	#[error("record store unavailable: {0}")]
	Unavailable(String),
	/// Any other lookup failure.
	#[error("lookup failed: {0}")]
	Other(String),
}

impl LookupError {
	/// Returns true for outcomes that mean "record absent or inaccessible".
	///
	/// Not-found and forbidden are treated alike.
	pub fn is_absent(&self) -> bool {
		matches!(self, Self::NotFound | Self::Forbidden)
	}
}

/// Key/value record service.
#[async_trait]
pub trait RecordStore: Send + Sync {
	/// Point lookup of `id` in `entity_type`, returning only `fields`.
	async fn get_by_key(&self, entity_type: &TypeTag, id: &Identifier, fields: &[&str]) -> Result<Record, LookupError>;

	/// Name of the field holding a record's display name.
	fn display_field_name(&self, entity_type: &TypeTag) -> String {
		default_display_field(entity_type).to_owned()
	}

	/// Icon reference for an entity type.
	fn icon_for(&self, _entity_type: &TypeTag) -> Option<String> {
		None
	}
}

/// Options passed to the picker dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickRequest {
	/// Entity types the user may choose from.
	pub types: BTreeSet<TypeTag>,
	/// Whether more than one record may be picked.
	pub multi: bool,
	/// Type preselected in the dialog.
	pub default_type: Option<TypeTag>,
	/// Already-selected records, one predicate per type.
	pub exclude_filters: Vec<ExclusionFilter>,
	/// Hide the recently-used list.
	pub disable_recents: bool,
}

/// A record chosen in the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedRecord {
	/// Record identifier.
	pub id: Identifier,
	/// Record entity type.
	pub entity_type: TypeTag,
	/// Display name as shown in the picker.
	pub name: String,
}

/// Picker outcomes other than a selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickError {
	/// The user closed the dialog. Not an error from the user's perspective.
	#[error("picker cancelled")]
	Cancelled,
	/// The dialog could not be opened or failed.
	#[error("picker failed: {0}")]
	Failed(String),
}

/// Modal record picker.
#[async_trait]
pub trait Picker: Send + Sync {
	/// Opens the picker and waits for the user's choice.
	async fn pick(&self, request: PickRequest) -> Result<Vec<PickedRecord>, PickError>;
}

/// Detail navigation failure. Logged, never surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("navigation failed: {0}")]
pub struct NavigateError(pub String);

/// Opens a record's detail view.
#[async_trait]
pub trait Navigator: Send + Sync {
	/// Opens `id` of `entity_type`, either as a modal or by navigating away.
	async fn open_detail(&self, entity_type: &TypeTag, id: &Identifier, modal: bool) -> Result<(), NavigateError>;
}
