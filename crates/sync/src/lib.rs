//! Bound-value synchronization for record lookup controls.
//!
//! A lookup control persists its selection as one `id:type;…` string owned by
//! the host. This crate keeps a resolved, display-ready [`Selection`] in sync
//! with that string: [`reconciler`] holds the state machine, [`resolver`]
//! turns identifiers into display names, [`session`] drives both against the
//! host collaborators declared in [`host`].
#![warn(missing_docs)]

use std::path::PathBuf;

pub mod bridge;
pub mod config;
pub mod guard;
pub mod host;
pub mod memory;
pub mod reconciler;
pub mod resolver;
pub mod session;
#[doc(hidden)]
pub mod test_helpers;

pub use bridge::{RenderBridge, VersionListener};
pub use config::{ConfigError, LookupConfig};
pub use guard::{NAVIGATION_GUARD_TIMEOUT, NavigationGuard, NavigationPermit};
pub use host::{
	BoundField, BoundOutput, LookupError, NavigateError, Navigator, PickError, PickRequest, PickedRecord, Picker,
	Record, RecordStore,
};
pub use memory::{LogNavigator, MemoryField, MemoryStore, ScriptedPicker};
pub use reconciler::{
	Completion, LOAD_ERROR_MESSAGE, LoadTicket, Observation, Phase, Reconciler, ReconcilerState,
	STILL_LOADING_MESSAGE,
};
pub use refbind_primitives::{Identifier, ParsedRef, Selection, SelectionEntry, TypeTag};
pub use resolver::{Resolution, ResolveError, Resolver, UNNAMED_DISPLAY_NAME};
pub use session::{PICK_ERROR_MESSAGE, Session, SyncStatus};

/// A convenient type alias for `Result` with `E` = [`enum@crate::Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors loading a [`MemoryStore`] fixture.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// A record fixture file could not be read.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},
	/// A record fixture is not valid JSON of the expected shape.
	#[error("invalid record fixture {path}: {error}")]
	Fixture {
		/// Path to the fixture.
		path: PathBuf,
		/// Decoding failure.
		error: serde_json::Error,
	},
}
