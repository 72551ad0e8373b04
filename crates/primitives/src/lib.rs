//! Core types for bound record references: identifiers, entries, selections,
//! and the `id:type[;id:type]*` codec.

/// Bound value parsing, serialization and exclusion filters.
pub mod codec;
/// Parsed refs and selection entries.
pub mod entry;
/// Identifier and entity type tag newtypes.
pub mod ids;
/// Ordered, identifier-unique selection.
pub mod selection;

pub use codec::{ExclusionFilter, exclusion_filter, normalize_identifier, parse, serialize};
pub use entry::{BoundRef, LOADING_DISPLAY_NAME, ParsedRef, SelectionEntry};
pub use ids::{IDENTIFIER_LEN, Identifier, ParseError, TypeTag};
pub use selection::Selection;
