//! Lookup control session: drives the reconciler against the host collaborators.
//!
//! # Purpose
//!
//! - Bind one [`crate::reconciler::Reconciler`] to a [`crate::host::BoundField`], a [`crate::host::RecordStore`], a [`crate::host::Picker`] and a [`crate::host::Navigator`].
//! - Run the asynchronous half of reconciliation (record resolution) between the reconciler's synchronous transitions.
//!
//! # Mental model
//!
//! - The host calls [`Session::sync`] whenever it may have changed the bound value. The session observes the live value, resolves the refs the reconciler asks for, then hands the outcome back together with a fresh read of the live value.
//! - User actions ([`Session::open_lookup`], [`Session::remove_record`], [`Session::open_record`]) mutate the reconciler synchronously and publish through the bound field.
//! - The presentation layer subscribes with [`Session::register_listener`] and re-reads [`Session::state`] on each version.
//!
//! # Key types
//!
//! | Type | Meaning | Constraints | Constructed / mutated in |
//! |---|---|---|---|
//! | [`Session`] | Control root owning the reconciler and collaborators | Reconciler lock is never held across `.await` | [`Session::new`] |
//! | [`SyncStatus`] | What one [`Session::sync`] call did | `Committed` carries the published output | [`Session::sync`] |
//! | [`crate::reconciler::LoadTicket`] | One resolution pass | Completed exactly once | [`Session::sync`] |
//! | [`crate::guard::NavigationGuard`] | Debounce for picker and detail navigation | Released on permit drop or timeout | [`Session::open_lookup`], [`Session::open_record`] |
//!
//! # Invariants
//!
//! - Must re-read the live bound value after every resolution before completing it.
//! - Must publish only outputs the reconciler returned (commit, clear, mutation).
//! - Must not hold the reconciler lock across an await point.
//! - Must release the in-flight load when a [`Session::sync`] future is dropped before completing.
//! - Must keep at most one picker or detail navigation open at a time.
//!
//! # Concurrency and ordering
//!
//! - Every method takes `&self`; several may be in flight on one task (for example via `tokio::join!`).
//! - A [`Session::sync`] issued while another is resolving returns [`SyncStatus::Deferred`]; the running one picks up the newer value when it completes.
//! - Version listeners run while the reconciler is locked and must not call back into the session.
//! - Dropping a [`Session::sync`] future mid-resolution (timeout, `select!`) abandons the load: placeholders are cleared and the next sync reloads the live value.
//!
//! # Failure modes and recovery
//!
//! - Store unavailable: selection is emptied with an error message. Recovery: a different bound value triggers a fresh load.
//! - Picker failure: error message, selection unchanged. Recovery: the next successful action clears it.
//! - Navigation failure: logged at `warn`, nothing else changes.

use parking_lot::Mutex;
use refbind_primitives::{Identifier, Selection, SelectionEntry, exclusion_filter};
use tracing::{debug, warn};

use crate::config::LookupConfig;
use crate::guard::NavigationGuard;
use crate::host::{BoundField, BoundOutput, Navigator, PickError, PickRequest, PickedRecord, Picker, RecordStore};
use crate::reconciler::{Completion, Observation, Reconciler, ReconcilerState};
use crate::resolver::{Resolver, UNNAMED_DISPLAY_NAME};

#[cfg(test)]
mod tests;

/// Shown when the picker could not be opened or failed.
pub const PICK_ERROR_MESSAGE: &str = "Error opening lookup.";

/// Result of one [`Session::sync`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
	/// The bound value matches what was last reconciled.
	Unchanged,
	/// A load is already in flight and will pick up the value.
	Deferred,
	/// The bound value holds no refs; an empty output was published.
	Cleared,
	/// Resolved entries were committed and published.
	Committed(BoundOutput),
	/// The store failed; the control shows a load error.
	Failed,
}

/// Releases the reconciler if a [`Session::sync`] future is dropped mid-resolution.
struct LoadGuard<'a> {
	reconciler: &'a Mutex<Reconciler>,
	completed: bool,
}

impl Drop for LoadGuard<'_> {
	fn drop(&mut self) {
		if self.completed {
			return;
		}
		warn!("sync dropped while resolving, abandoning load");
		self.reconciler.lock().abandon();
	}
}

/// One lookup control bound to its host collaborators.
pub struct Session<F, S, P, N> {
	config: LookupConfig,
	reconciler: Mutex<Reconciler>,
	guard: NavigationGuard,
	field: F,
	store: S,
	picker: P,
	navigator: N,
}

impl<F, S, P, N> Session<F, S, P, N>
where
	F: BoundField,
	S: RecordStore,
	P: Picker,
	N: Navigator,
{
	/// Creates an idle session. Call [`Session::sync`] to load the initial value.
	pub fn new(config: LookupConfig, field: F, store: S, picker: P, navigator: N) -> Self {
		Self {
			config,
			reconciler: Mutex::new(Reconciler::new()),
			guard: NavigationGuard::new(),
			field,
			store,
			picker,
			navigator,
		}
	}

	/// Replaces the navigation guard, e.g. to use a different timeout.
	pub fn with_guard(mut self, guard: NavigationGuard) -> Self {
		self.guard = guard;
		self
	}

	/// Reconciles against the live bound value.
	pub async fn sync(&self) -> SyncStatus {
		let current = self.field.current();
		let observation = self.reconciler.lock().observe(&current);
		let mut ticket = match observation {
			Observation::Unchanged => return SyncStatus::Unchanged,
			Observation::Deferred => return SyncStatus::Deferred,
			Observation::Cleared(output) => {
				self.field.publish(&output);
				return SyncStatus::Cleared;
			}
			Observation::Load(ticket) => ticket,
		};

		let mut in_flight = LoadGuard {
			reconciler: &self.reconciler,
			completed: false,
		};
		let resolver = self.resolver();
		loop {
			let outcome = resolver.resolve_all(ticket.refs()).await;
			let live = self.field.current();
			let completion = self.reconciler.lock().complete(ticket, outcome, &live);
			match completion {
				Completion::Restart(next) => {
					debug!(snapshot = %next.snapshot(), "restarting resolution");
					ticket = next;
				}
				Completion::Committed(output) => {
					in_flight.completed = true;
					self.field.publish(&output);
					return SyncStatus::Committed(output);
				}
				Completion::Cleared(output) => {
					in_flight.completed = true;
					self.field.publish(&output);
					return SyncStatus::Cleared;
				}
				Completion::Failed => {
					in_flight.completed = true;
					return SyncStatus::Failed;
				}
			}
		}
	}

	/// Opens the picker and adds the chosen records.
	///
	/// Returns the published output, or `None` when nothing changed.
	pub async fn open_lookup(&self) -> Option<BoundOutput> {
		if self.config.disabled {
			return None;
		}
		let Some(permit) = self.guard.try_acquire() else {
			debug!("navigation already in progress");
			return None;
		};

		let multi = self.config.multi_select;
		let max = self.config.effective_max();
		let selection = {
			let mut reconciler = self.reconciler.lock();
			if !reconciler.precheck_capacity(multi, max) {
				return None;
			}
			reconciler.selection().clone()
		};

		let request = self.pick_request(&selection);
		let picked = self.picker.pick(request).await;
		drop(permit);

		let picked = match picked {
			Ok(picked) => picked,
			Err(PickError::Cancelled) => {
				debug!("picker cancelled");
				return None;
			}
			Err(err) => {
				warn!(error = %err, "picker failed");
				self.reconciler.lock().set_error(PICK_ERROR_MESSAGE);
				return None;
			}
		};

		let entries = picked.into_iter().map(|p| self.picked_entry(p)).collect();
		let output = self.reconciler.lock().add_records(entries, multi, max)?;
		self.field.publish(&output);
		Some(output)
	}

	/// Removes `id` from the selection and publishes the new value.
	pub fn remove_record(&self, id: &Identifier) -> Option<BoundOutput> {
		if self.config.disabled {
			return None;
		}
		let output = self.reconciler.lock().remove_record(id)?;
		self.field.publish(&output);
		Some(output)
	}

	/// Opens the detail view of a selected record. Returns whether navigation happened.
	pub async fn open_record(&self, id: &Identifier) -> bool {
		if !self.config.linking_enabled {
			return false;
		}
		let entity_type = {
			let reconciler = self.reconciler.lock();
			match reconciler.selection().get(id) {
				Some(entry) if !entry.pending => entry.entity_type.clone(),
				_ => return false,
			}
		};
		let Some(_permit) = self.guard.try_acquire() else {
			debug!(%id, "navigation already in progress");
			return false;
		};

		match self.navigator.open_detail(&entity_type, id, self.config.open_modal).await {
			Ok(()) => true,
			Err(err) => {
				warn!(%id, %entity_type, error = %err, "failed to open record");
				false
			}
		}
	}

	/// Registers the single version listener, replacing any previous one.
	pub fn register_listener(&self, listener: impl FnMut(u64) + Send + 'static) {
		self.reconciler.lock().bridge_mut().register_listener(listener);
	}

	/// Copy of the current selection, placeholders included.
	pub fn selection(&self) -> Selection {
		self.reconciler.lock().selection().clone()
	}

	/// Outputs derived from the resolved entries.
	pub fn output(&self) -> BoundOutput {
		self.reconciler.lock().output()
	}

	/// Current user-visible error message.
	pub fn error(&self) -> Option<String> {
		self.reconciler.lock().error().map(str::to_owned)
	}

	/// Current render version.
	pub fn version(&self) -> u64 {
		self.reconciler.lock().version()
	}

	/// Returns true while a resolution is in flight.
	pub fn is_busy(&self) -> bool {
		self.reconciler.lock().is_busy()
	}

	/// Copy of the whole reconciler state.
	pub fn state(&self) -> ReconcilerState {
		self.reconciler.lock().state()
	}

	/// Placeholder text for an empty control.
	pub fn placeholder(&self) -> &str {
		&self.config.placeholder
	}

	/// Control configuration.
	pub fn config(&self) -> &LookupConfig {
		&self.config
	}

	/// Host bound field.
	pub fn field(&self) -> &F {
		&self.field
	}

	/// Record store.
	pub fn store(&self) -> &S {
		&self.store
	}

	/// Picker dialog.
	pub fn picker(&self) -> &P {
		&self.picker
	}

	/// Detail navigator.
	pub fn navigator(&self) -> &N {
		&self.navigator
	}

	fn resolver(&self) -> Resolver<'_, S> {
		Resolver::new(&self.store).with_display_fields(&self.config.display_fields)
	}

	fn pick_request(&self, selection: &Selection) -> PickRequest {
		let exclude_filters = self
			.config
			.entity_types
			.iter()
			.filter_map(|ty| exclusion_filter(ty, selection))
			.collect();
		PickRequest {
			types: self.config.type_set(),
			multi: self.config.multi_select,
			default_type: self.config.default_type.clone(),
			exclude_filters,
			disable_recents: self.config.disable_recents,
		}
	}

	fn picked_entry(&self, picked: PickedRecord) -> SelectionEntry {
		let name = if picked.name.trim().is_empty() {
			UNNAMED_DISPLAY_NAME.to_owned()
		} else {
			picked.name
		};
		let icon = self.store.icon_for(&picked.entity_type);
		SelectionEntry::resolved(picked.id, picked.entity_type, name).with_icon(icon)
	}
}
