//! Command implementations. Each returns the JSON document to print.

use anyhow::{Context, Result};
use refbind_primitives::{Identifier, ParsedRef, TypeTag, exclusion_filter, parse};
use refbind_sync::{
	LogNavigator, LookupConfig, MemoryField, MemoryStore, PickedRecord, Resolver, ScriptedPicker, SelectionEntry,
	Session, SyncStatus,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::cli::SessionArgs;

#[cfg(test)]
mod tests;

/// Session over a JSON fixture with a scripted picker.
pub type CliSession = Session<MemoryField, MemoryStore, ScriptedPicker, LogNavigator>;

/// Final state of a session run.
#[derive(Debug, Serialize)]
pub struct Report {
	/// What the initial sync did.
	pub sync: &'static str,
	/// Serialized bound value.
	pub value: String,
	/// `;`-joined display names.
	pub display: String,
	/// Number of resolved records.
	pub count: usize,
	/// User-visible error message, if any.
	pub error: Option<String>,
	/// Selected records.
	pub entries: Vec<SelectionEntry>,
}

/// Parses a bound value into its refs.
pub fn parse_refs(value: &str) -> Vec<ParsedRef> {
	parse(value)
}

/// Renders the exclusion filter XML for `entity_type`, if any record of that type is bound.
pub fn filter_xml(entity_type: &TypeTag, value: &str) -> Option<String> {
	exclusion_filter(entity_type, &parse(value)).map(|filter| filter.to_xml())
}

/// Resolves the bound value and reports the result.
pub async fn resolve(args: &SessionArgs) -> Result<Report> {
	let (session, status) = open(args).await?;
	Ok(report(&session, status))
}

/// Resolves the bound value, then adds `picks` through the lookup flow.
pub async fn add(args: &SessionArgs, picks: &[ParsedRef]) -> Result<Report> {
	let (session, status) = open(args).await?;

	let resolver = Resolver::new(session.store()).with_display_fields(&session.config().display_fields);
	let mut picked = Vec::with_capacity(picks.len());
	for pick in picks {
		match resolver.resolve_one(pick).await.context("failed to look up picked record")? {
			Some(entry) => picked.push(PickedRecord {
				id: entry.id,
				entity_type: entry.entity_type,
				name: entry.display_name,
			}),
			None => warn!(id = %pick.id, entity_type = %pick.entity_type, "picked record not in fixture, skipping"),
		}
	}
	session.picker().push_response(Ok(picked));

	if session.open_lookup().await.is_none() {
		debug!("lookup left the selection unchanged");
	}
	Ok(report(&session, status))
}

/// Resolves the bound value, then removes `id`.
pub async fn remove(args: &SessionArgs, id: &str) -> Result<Report> {
	let id = Identifier::parse(id).with_context(|| format!("invalid record identifier {id:?}"))?;
	let (session, status) = open(args).await?;
	if session.remove_record(&id).is_none() {
		debug!(%id, "record not selected");
	}
	Ok(report(&session, status))
}

async fn open(args: &SessionArgs) -> Result<(CliSession, SyncStatus)> {
	let store = MemoryStore::load(&args.records).context("failed to load record fixture")?;
	let config = match &args.config {
		Some(path) => LookupConfig::load(path).context("failed to load lookup config")?,
		None => LookupConfig::new(store.entity_types()).multi(None),
	};
	let session = Session::new(
		config,
		MemoryField::new(args.value.as_str()),
		store,
		ScriptedPicker::new(),
		LogNavigator,
	);
	let status = session.sync().await;
	debug!(?status, "initial sync");
	Ok((session, status))
}

fn report(session: &CliSession, status: SyncStatus) -> Report {
	let output = session.output();
	Report {
		sync: match status {
			SyncStatus::Unchanged => "unchanged",
			SyncStatus::Deferred => "deferred",
			SyncStatus::Cleared => "cleared",
			SyncStatus::Committed(_) => "committed",
			SyncStatus::Failed => "failed",
		},
		value: output.value,
		display: output.display,
		count: output.count,
		error: session.error(),
		entries: session.selection().entries().to_vec(),
	}
}
