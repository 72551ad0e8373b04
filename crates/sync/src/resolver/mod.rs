//! Identifier to display-name resolution against a [`RecordStore`].
//!
//! Holds no state between calls. Each [`ParsedRef`] becomes one point lookup
//! requesting only the display field of its type.

use std::collections::BTreeMap;

use futures::future::join_all;
use refbind_primitives::{Identifier, ParsedRef, SelectionEntry, TypeTag};
use thiserror::Error;
use tracing::trace;

use crate::host::{LookupError, RecordStore};


/// Display name used when a record has no usable display field value.
pub const UNNAMED_DISPLAY_NAME: &str = "(No name)";

/// Lookup failure that is neither not-found nor forbidden.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
	/// A single lookup failed.
	#[error("lookup of {id} failed: {source}")]
	Lookup {
		/// Identifier being resolved.
		id: Identifier,
		/// Store failure.
		#[source]
		source: LookupError,
	},
	/// The store could not be reached; the whole resolution is abandoned.
	#[error("record store unavailable while resolving {id}: {reason}")]
	StoreUnavailable {
		/// Identifier whose lookup observed the outage.
		id: Identifier,
		/// Store-provided reason.
		reason: String,
	},
}

impl ResolveError {
	/// Identifier the failure is tagged with.
	pub fn id(&self) -> &Identifier {
		match self {
			Self::Lookup { id, .. } | Self::StoreUnavailable { id, .. } => id,
		}
	}
}

/// Partitioned outcome of [`Resolver::resolve_all`], each list in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
	/// Refs that resolved to a record.
	pub resolved: Vec<SelectionEntry>,
	/// Refs whose record is absent or inaccessible.
	pub not_found: Vec<Identifier>,
	/// Refs whose lookup failed for another reason.
	pub failed: Vec<ResolveError>,
}

impl Resolution {
	/// Identifiers that did not resolve, failures included.
	pub fn dropped(&self) -> impl Iterator<Item = &Identifier> {
		self.not_found.iter().chain(self.failed.iter().map(ResolveError::id))
	}
}

/// Borrowing view over a store plus per-type display field overrides.
pub struct Resolver<'a, S: ?Sized> {
	store: &'a S,
	display_fields: Option<&'a BTreeMap<TypeTag, String>>,
}

impl<'a, S: RecordStore + ?Sized> Resolver<'a, S> {
	/// Creates a resolver using the store's own display field table.
	pub fn new(store: &'a S) -> Self {
		Self {
			store,
			display_fields: None,
		}
	}

	/// Overrides the display field for the listed types.
	pub fn with_display_fields(mut self, fields: &'a BTreeMap<TypeTag, String>) -> Self {
		self.display_fields = Some(fields);
		self
	}

	/// Display field requested for `entity_type`.
	pub fn display_field(&self, entity_type: &TypeTag) -> String {
		self.display_fields
			.and_then(|fields| fields.get(entity_type))
			.cloned()
			.unwrap_or_else(|| self.store.display_field_name(entity_type))
	}

	/// Resolves one ref. Absent or forbidden records yield `Ok(None)`.
	pub async fn resolve_one(&self, r: &ParsedRef) -> Result<Option<SelectionEntry>, ResolveError> {
		let field = self.display_field(&r.entity_type);
		match self.store.get_by_key(&r.entity_type, &r.id, &[field.as_str()]).await {
			Ok(record) => {
				let name = record
					.get(&field)
					.and_then(serde_json::Value::as_str)
					.filter(|name| !name.is_empty())
					.unwrap_or(UNNAMED_DISPLAY_NAME);
				let entry = SelectionEntry::resolved(r.id.clone(), r.entity_type.clone(), name)
					.with_icon(self.store.icon_for(&r.entity_type));
				Ok(Some(entry))
			}
			Err(err) if err.is_absent() => {
				trace!(id = %r.id, entity_type = %r.entity_type, reason = %err, "record absent");
				Ok(None)
			}
			Err(LookupError::Unavailable(reason)) => Err(ResolveError::StoreUnavailable { id: r.id.clone(), reason }),
			Err(source) => Err(ResolveError::Lookup { id: r.id.clone(), source }),
		}
	}

	/// Resolves every ref concurrently and partitions the results.
	///
	/// Fails as a whole only when the store reports itself unavailable.
	pub async fn resolve_all(&self, refs: &[ParsedRef]) -> Result<Resolution, ResolveError> {
		let outcomes = join_all(refs.iter().map(|r| self.resolve_one(r))).await;

		let mut resolution = Resolution::default();
		for (r, outcome) in refs.iter().zip(outcomes) {
			match outcome {
				Ok(Some(entry)) => resolution.resolved.push(entry),
				Ok(None) => resolution.not_found.push(r.id.clone()),
				Err(err @ ResolveError::StoreUnavailable { .. }) => return Err(err),
				Err(err) => resolution.failed.push(err),
			}
		}
		Ok(resolution)
	}
}
