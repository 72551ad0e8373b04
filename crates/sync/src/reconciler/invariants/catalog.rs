//! Invariant catalog for [`crate::reconciler::Reconciler`].
#![allow(dead_code)]

/// Must never commit results resolved for a value other than the live one.
///
/// - Enforced in: [`crate::reconciler::Reconciler::complete`]
/// - Tested by: [`crate::reconciler::invariants::test_stale_resolution_restarts_against_newer_value`], [`crate::reconciler::invariants::test_user_write_during_load_makes_resolution_stale`]
/// - Failure symptom: Names of an overwritten value appear layered over the newer selection.
pub(crate) const STALE_RESOLUTION_IS_NEVER_COMMITTED: () = ();

/// Must keep at most one load in flight; observations while busy are coalesced.
///
/// - Enforced in: [`crate::reconciler::Reconciler::observe`]
/// - Tested by: [`crate::reconciler::invariants::test_observe_while_busy_is_deferred`]
/// - Failure symptom: Two resolutions race to commit and the slower one wins.
pub(crate) const SINGLE_LOAD_IN_FLIGHT: () = ();

/// A load whose driver is dropped before completing must release the busy flag.
///
/// - Enforced in: [`crate::reconciler::Reconciler::abandon`], called from the drop guard in [`crate::session::Session::sync`]
/// - Tested by: [`crate::reconciler::invariants::test_abandoned_load_is_released`]
/// - Failure symptom: Every later sync is deferred forever and adds fail with "Records are still loading."
pub(crate) const ABANDONED_LOAD_IS_RELEASED: () = ();

/// Version must rise by exactly one per observable mutation and never fall.
///
/// - Enforced in: [`crate::bridge::RenderBridge::bump`] call sites in [`crate::reconciler::Reconciler`]
/// - Tested by: [`crate::reconciler::invariants::test_version_bumps_once_per_mutation`]
/// - Failure symptom: Presentation layer re-renders twice, or misses a state change.
pub(crate) const VERSION_BUMPS_ONCE_PER_MUTATION: () = ();

/// Serialized output must never contain a pending entry.
///
/// - Enforced in: [`refbind_primitives::codec::serialize`], [`crate::reconciler::Reconciler::output`]
/// - Tested by: [`crate::reconciler::invariants::test_output_never_contains_pending`]
/// - Failure symptom: Unresolved or deleted records are persisted back into the bound value.
pub(crate) const OUTPUT_EXCLUDES_PENDING: () = ();

/// Selection identifiers must stay unique.
///
/// - Enforced in: [`refbind_primitives::Selection::new`], [`refbind_primitives::Selection::push`]
/// - Tested by: [`crate::reconciler::invariants::test_selection_identifiers_stay_unique`]
/// - Failure symptom: The same record shows twice and removal leaves a ghost copy.
pub(crate) const SELECTION_IDENTIFIERS_ARE_UNIQUE: () = ();

/// The reconciler's own writes must not be observed as external changes.
///
/// - Enforced in: [`crate::reconciler::Reconciler::add_records`], [`crate::reconciler::Reconciler::remove_record`], [`crate::reconciler::Reconciler::complete`], [`crate::reconciler::Reconciler::observe`]
/// - Tested by: [`crate::reconciler::invariants::test_own_write_observed_as_unchanged`]
/// - Failure symptom: Every add or remove triggers a full reload with placeholder flicker.
pub(crate) const OWN_WRITES_ARE_NOT_EXTERNAL_CHANGES: () = ();

/// Removing an absent identifier must be a silent no-op.
///
/// - Enforced in: [`crate::reconciler::Reconciler::remove_record`]
/// - Tested by: [`crate::reconciler::invariants::test_remove_is_idempotent`]
/// - Failure symptom: Double clicks on remove bump versions or surface errors.
pub(crate) const REMOVE_IS_IDEMPOTENT: () = ();
