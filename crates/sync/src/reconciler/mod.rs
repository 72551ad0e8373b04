//! Selection reconciliation state machine.
//!
//! [`Reconciler`] owns the authoritative selection and the last external value
//! it reconciled against. Every transition is synchronous; the asynchronous
//! part (record resolution) happens between [`Reconciler::observe`] handing out
//! a [`LoadTicket`] and [`Reconciler::complete`] receiving its outcome. The
//! completion re-checks the live external value against the ticket, so results
//! computed for an outdated value are never committed.
//!
//! ```text
//! Idle/Error --observe(new, non-empty)--> Loading(new)
//! Loading --complete(stale)--> Loading(newer)
//! Loading --complete(Ok)--> Idle
//! Loading --complete(Err)--> Error
//! Loading --abandon--> Idle (empty, snapshot reset)
//! Error --add/remove--> Idle
//! ```

use refbind_primitives::{Identifier, ParsedRef, Selection, SelectionEntry, codec};
use tracing::{debug, error, warn};

use crate::bridge::RenderBridge;
use crate::host::BoundOutput;
use crate::resolver::{Resolution, ResolveError};

pub(crate) mod invariants;

/// Shown after a load failed as a whole.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading records. Please refresh.";
/// Shown when an add is attempted while records are still loading.
pub const STILL_LOADING_MESSAGE: &str = "Records are still loading.";

/// Coarse reconciliation phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
	/// Selection reflects the snapshot.
	#[default]
	Idle,
	/// Placeholders are shown while a resolution is in flight.
	Loading,
	/// The last load failed; the selection is empty.
	Error,
}

/// Read-only copy of the reconciler's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerState {
	/// Current selection, placeholders included.
	pub selection: Selection,
	/// Last external value reconciled against or written.
	pub snapshot: String,
	/// Current phase.
	pub phase: Phase,
	/// User-visible error message.
	pub error: Option<String>,
	/// Render version.
	pub version: u64,
}

impl ReconcilerState {
	/// Returns true while a resolution is in flight.
	pub fn busy(&self) -> bool {
		self.phase == Phase::Loading
	}
}

/// Work order for one resolution pass.
///
/// Carries the external value it was issued for; [`Reconciler::complete`]
/// compares it against the live value to detect staleness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
	snapshot: String,
	refs: Vec<ParsedRef>,
}

impl LoadTicket {
	/// External value the ticket was issued for.
	pub fn snapshot(&self) -> &str {
		&self.snapshot
	}

	/// Distinct refs to resolve, in parse order.
	pub fn refs(&self) -> &[ParsedRef] {
		&self.refs
	}
}

/// Result of observing the external value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
	/// Value matches the snapshot; nothing to do.
	Unchanged,
	/// A resolution is in flight; its completion re-checks the value.
	Deferred,
	/// Value holds no refs; the selection was cleared.
	Cleared(BoundOutput),
	/// Placeholders are published; resolve the ticket.
	Load(LoadTicket),
}

/// Result of completing a resolution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
	/// Resolved entries were committed.
	Committed(BoundOutput),
	/// The ticket was stale; resolve the newer one instead.
	Restart(LoadTicket),
	/// The ticket was stale and the newer value is empty.
	Cleared(BoundOutput),
	/// The store failed; the reconciler is in [`Phase::Error`].
	Failed,
}

enum Begin {
	Load(LoadTicket),
	Cleared(BoundOutput),
}

/// Owner of the selection state. See the module docs for the transitions.
#[derive(Debug, Default)]
pub struct Reconciler {
	selection: Selection,
	snapshot: String,
	phase: Phase,
	error: Option<String>,
	bridge: RenderBridge,
}

impl Reconciler {
	/// Creates an idle reconciler with an empty selection at version 0.
	pub fn new() -> Self {
		Self::default()
	}

	/// Reacts to the host's current bound value.
	pub fn observe(&mut self, external: &str) -> Observation {
		if self.phase == Phase::Loading {
			debug!(external, "observation deferred to in-flight load");
			return Observation::Deferred;
		}
		if external == self.snapshot {
			return Observation::Unchanged;
		}
		match self.begin(external) {
			Begin::Load(ticket) => Observation::Load(ticket),
			Begin::Cleared(output) => Observation::Cleared(output),
		}
	}

	/// Applies a resolution outcome for `ticket`.
	///
	/// `current_external` must be the host's bound value read after the
	/// resolution settled.
	pub fn complete(
		&mut self,
		ticket: LoadTicket,
		outcome: Result<Resolution, ResolveError>,
		current_external: &str,
	) -> Completion {
		self.phase = Phase::Idle;

		let external_moved = ticket.snapshot != current_external;
		if external_moved || ticket.snapshot != self.snapshot {
			let next = if external_moved {
				current_external.to_owned()
			} else {
				self.snapshot.clone()
			};
			debug!(stale = %ticket.snapshot, next = %next, "discarding stale resolution");
			return match self.begin(&next) {
				Begin::Load(next) => Completion::Restart(next),
				Begin::Cleared(output) => Completion::Cleared(output),
			};
		}

		let resolution = match outcome {
			Ok(resolution) => resolution,
			Err(err) => {
				error!(error = %err, snapshot = %ticket.snapshot, "record resolution failed");
				self.phase = Phase::Error;
				self.selection.clear();
				self.error = Some(LOAD_ERROR_MESSAGE.to_owned());
				self.bridge.bump();
				return Completion::Failed;
			}
		};

		for failure in &resolution.failed {
			warn!(id = %failure.id(), error = %failure, "lookup failed, dropping record");
		}
		let dropped = resolution.dropped().count();
		if dropped > 0 {
			debug!(dropped, "records no longer resolvable");
		}

		self.selection = Selection::new(resolution.resolved);
		self.error = None;
		let output = self.output();
		self.snapshot = output.value.clone();
		let version = self.bridge.bump();
		debug!(version, count = output.count, dropped, "resolution committed");
		Completion::Committed(output)
	}

	/// Drops an in-flight resolution whose driver went away before completing.
	///
	/// Placeholders are removed and the snapshot is reset, so the next
	/// [`Reconciler::observe`] of a non-empty value loads it again. No-op
	/// unless a resolution is in flight.
	pub fn abandon(&mut self) {
		if self.phase != Phase::Loading {
			return;
		}
		self.phase = Phase::Idle;
		self.selection.clear();
		let abandoned = std::mem::take(&mut self.snapshot);
		let version = self.bridge.bump();
		debug!(version, snapshot = %abandoned, "resolution abandoned");
	}

	/// Adds picked records.
	///
	/// In single mode the selection becomes exactly the first entry. In multi
	/// mode unseen entries are appended and the result is truncated to `max`,
	/// oldest first. Returns the new outputs, or `None` when nothing changed.
	pub fn add_records(&mut self, entries: Vec<SelectionEntry>, multi: bool, max: Option<usize>) -> Option<BoundOutput> {
		let mut entries = entries.into_iter().filter(|e| !e.pending).peekable();
		entries.peek()?;

		if self.phase == Phase::Loading {
			self.set_error(STILL_LOADING_MESSAGE);
			return None;
		}

		if multi {
			if !self.precheck_capacity(multi, max) {
				return None;
			}
			for entry in entries {
				self.selection.push(entry);
			}
			self.error = match max {
				Some(max) if self.selection.len() > max => {
					let removed = self.selection.truncate(max);
					Some(too_many_message(removed))
				}
				_ => None,
			};
		} else {
			self.selection = entries.take(1).collect();
			self.error = None;
		}

		Some(self.commit_mutation())
	}

	/// Removes the entry with `id`. Returns `None` if it is not selected.
	pub fn remove_record(&mut self, id: &Identifier) -> Option<BoundOutput> {
		self.selection.remove(id)?;
		self.error = None;

		if self.phase == Phase::Loading {
			// The remaining entries are all placeholders; keep their refs in the
			// written value so an in-flight load does not lose them.
			let refs: Vec<ParsedRef> = self.selection.iter().map(SelectionEntry::to_ref).collect();
			let output = BoundOutput {
				value: codec::serialize(&refs),
				display: self.selection.display_names(),
				count: self.selection.resolved_count(),
			};
			self.snapshot = output.value.clone();
			self.bridge.bump();
			return Some(output);
		}

		Some(self.commit_mutation())
	}

	/// Checks that one more record fits before the picker is opened.
	///
	/// Sets the limit message and returns false once `max` is reached in multi mode.
	pub fn precheck_capacity(&mut self, multi: bool, max: Option<usize>) -> bool {
		match max {
			Some(max) if multi && self.selection.resolved_count() >= max => {
				self.set_error(at_most_message(max));
				false
			}
			_ => true,
		}
	}

	/// Replaces the error message. Bumps only if the message changed.
	pub fn set_error(&mut self, message: impl Into<String>) {
		let message = message.into();
		if self.error.as_deref() != Some(message.as_str()) {
			self.error = Some(message);
			self.bridge.bump();
		}
	}

	/// Clears the error message. Bumps only if one was set.
	pub fn clear_error(&mut self) {
		if self.error.take().is_some() {
			self.bridge.bump();
		}
	}

	/// Outputs derived from the resolved entries.
	pub fn output(&self) -> BoundOutput {
		BoundOutput {
			value: codec::serialize(&self.selection),
			display: self.selection.display_names(),
			count: self.selection.resolved_count(),
		}
	}

	/// Current selection, placeholders included.
	pub fn selection(&self) -> &Selection {
		&self.selection
	}

	/// Last external value reconciled against or written.
	pub fn snapshot(&self) -> &str {
		&self.snapshot
	}

	/// Current phase.
	pub fn phase(&self) -> Phase {
		self.phase
	}

	/// Returns true while a resolution is in flight.
	pub fn is_busy(&self) -> bool {
		self.phase == Phase::Loading
	}

	/// Current user-visible error message.
	pub fn error(&self) -> Option<&str> {
		self.error.as_deref()
	}

	/// Current render version.
	pub fn version(&self) -> u64 {
		self.bridge.current_version()
	}

	/// Copy of the whole state.
	pub fn state(&self) -> ReconcilerState {
		ReconcilerState {
			selection: self.selection.clone(),
			snapshot: self.snapshot.clone(),
			phase: self.phase,
			error: self.error.clone(),
			version: self.version(),
		}
	}

	/// Render bridge used to notify the presentation layer.
	pub fn bridge_mut(&mut self) -> &mut RenderBridge {
		&mut self.bridge
	}

	fn begin(&mut self, value: &str) -> Begin {
		let refs = codec::parse(value);
		self.snapshot = value.to_owned();
		self.error = None;

		if refs.is_empty() {
			self.phase = Phase::Idle;
			self.selection.clear();
			let output = self.output();
			self.snapshot = output.value.clone();
			let version = self.bridge.bump();
			debug!(version, raw = value, "selection cleared");
			return Begin::Cleared(output);
		}

		self.phase = Phase::Loading;
		self.selection = Selection::placeholders(&refs);
		let refs = self.selection.iter().map(SelectionEntry::to_ref).collect();
		let version = self.bridge.bump();
		debug!(version, snapshot = value, pending = self.selection.len(), "placeholders published");
		Begin::Load(LoadTicket {
			snapshot: value.to_owned(),
			refs,
		})
	}

	fn commit_mutation(&mut self) -> BoundOutput {
		self.phase = Phase::Idle;
		let output = self.output();
		self.snapshot = output.value.clone();
		self.bridge.bump();
		output
	}
}

fn noun(count: usize) -> &'static str {
	if count == 1 { "record" } else { "records" }
}

fn too_many_message(removed: usize) -> String {
	format!("Too many records selected. {removed} {} removed.", noun(removed))
}

fn at_most_message(max: usize) -> String {
	format!("You can select at most {max} {}.", noun(max))
}
