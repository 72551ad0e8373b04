//! Machine-checkable invariant proofs for the reconciler.

use refbind_primitives::{SelectionEntry, codec};

use crate::reconciler::{Completion, LoadTicket, Observation, Reconciler};
use crate::resolver::Resolution;
use crate::test_helpers::{id, ty};

fn entry(digit: char, entity_type: &str, name: &str) -> SelectionEntry {
	SelectionEntry::resolved(id(digit), ty(entity_type), name)
}

fn pair(digit: char, entity_type: &str) -> String {
	format!("{}:{entity_type}", id(digit))
}

fn ticket(observation: Observation) -> LoadTicket {
	match observation {
		Observation::Load(ticket) => ticket,
		other => panic!("expected a load ticket, got {other:?}"),
	}
}

fn resolved(entries: Vec<SelectionEntry>) -> Resolution {
	Resolution {
		resolved: entries,
		..Resolution::default()
	}
}

/// A resolution finishing after the external value moved from A to B is
/// discarded and a load for B is issued; only B's results get committed.
#[cfg_attr(test, test)]
pub(crate) fn test_stale_resolution_restarts_against_newer_value() {
	let mut rec = Reconciler::new();
	let a = pair('1', "contact");
	let b = pair('2', "account");

	let ticket_a = ticket(rec.observe(&a));
	let done = rec.complete(ticket_a, Ok(resolved(vec![entry('1', "contact", "Jane Doe")])), &b);
	let Completion::Restart(ticket_b) = done else {
		panic!("expected restart, got {done:?}");
	};
	assert_eq!(ticket_b.snapshot(), b);
	assert!(rec.is_busy());
	assert!(rec.selection().iter().all(|e| e.pending && e.id == id('2')));

	let done = rec.complete(ticket_b, Ok(resolved(vec![entry('2', "account", "Contoso")])), &b);
	let Completion::Committed(output) = done else {
		panic!("expected commit, got {done:?}");
	};
	assert_eq!(output.display, "Contoso");
	assert_eq!(output.value, b);
	assert!(!rec.selection().contains(&id('1')));
}

/// A user mutation during a load changes the snapshot, which makes the
/// in-flight pass stale even though the host value has not been echoed yet.
#[cfg_attr(test, test)]
pub(crate) fn test_user_write_during_load_makes_resolution_stale() {
	let mut rec = Reconciler::new();
	let raw = format!("{};{}", pair('1', "contact"), pair('2', "account"));
	let in_flight = ticket(rec.observe(&raw));

	rec.remove_record(&id('2')).expect("entry present");
	let done = rec.complete(
		in_flight,
		Ok(resolved(vec![entry('1', "contact", "Jane Doe"), entry('2', "account", "Contoso")])),
		&raw,
	);
	let Completion::Restart(next) = done else {
		panic!("expected restart, got {done:?}");
	};
	assert_eq!(next.snapshot(), pair('1', "contact"));
	assert!(!rec.selection().contains(&id('2')));
}

/// Observations while busy are no-ops; the in-flight completion re-reads the value.
#[cfg_attr(test, test)]
pub(crate) fn test_observe_while_busy_is_deferred() {
	let mut rec = Reconciler::new();
	let _in_flight = ticket(rec.observe(&pair('1', "contact")));
	let before = rec.state();

	assert_eq!(rec.observe(&pair('2', "account")), Observation::Deferred);
	assert_eq!(rec.observe(""), Observation::Deferred);
	assert_eq!(rec.state(), before);
}

/// Every observable transition adds exactly one to the version.
#[cfg_attr(test, test)]
pub(crate) fn test_version_bumps_once_per_mutation() {
	let mut rec = Reconciler::new();
	let mut expected = 0;
	let mut step = |rec: &Reconciler, changed: bool| {
		if changed {
			expected += 1;
		}
		assert_eq!(rec.version(), expected);
	};

	let a = pair('1', "contact");
	let t = ticket(rec.observe(&a));
	step(&rec, true);
	let _ = rec.observe(&a);
	step(&rec, false);
	rec.complete(t, Ok(resolved(vec![entry('1', "contact", "Jane Doe")])), &a);
	step(&rec, true);
	let _ = rec.observe(&a);
	step(&rec, false);
	rec.add_records(vec![entry('2', "account", "Contoso"), entry('3', "lead", "Lead")], true, Some(2));
	step(&rec, true);
	rec.remove_record(&id('2'));
	step(&rec, true);
	rec.remove_record(&id('2'));
	step(&rec, false);
	rec.precheck_capacity(true, Some(1));
	step(&rec, true);
	rec.add_records(Vec::new(), true, None);
	step(&rec, false);
	rec.add_records(vec![entry('4', "lead", "Solo")], false, None);
	step(&rec, true);
	let _ = rec.observe("");
	step(&rec, true);
}

/// Serialized output skips placeholders at every phase.
#[cfg_attr(test, test)]
pub(crate) fn test_output_never_contains_pending() {
	let mut rec = Reconciler::new();
	let _in_flight = ticket(rec.observe(&pair('1', "contact")));
	assert!(rec.selection().has_pending());
	assert_eq!(rec.output().value, "");
	assert_eq!(rec.output().count, 0);
	assert_eq!(codec::serialize(rec.selection()), "");
}

/// Duplicate identifiers collapse at every entry point.
#[cfg_attr(test, test)]
pub(crate) fn test_selection_identifiers_stay_unique() {
	let mut rec = Reconciler::new();
	let dup = format!("{};{}", pair('1', "contact"), pair('1', "contact"));
	let t = ticket(rec.observe(&dup));
	assert_eq!(t.refs().len(), 1);

	rec.complete(
		t,
		Ok(resolved(vec![entry('1', "contact", "Jane Doe"), entry('1', "contact", "Jane Doe")])),
		&dup,
	);
	rec.add_records(vec![entry('1', "contact", "Again")], true, None);

	let ids: Vec<_> = rec.selection().iter().map(|e| e.id.clone()).collect();
	assert_eq!(ids, vec![id('1')]);
}

/// Values written by the reconciler itself read back as unchanged.
#[cfg_attr(test, test)]
pub(crate) fn test_own_write_observed_as_unchanged() {
	let mut rec = Reconciler::new();
	let written = rec
		.add_records(vec![entry('1', "contact", "Jane Doe")], true, None)
		.expect("added");
	assert_eq!(rec.observe(&written.value), Observation::Unchanged);

	let written = rec.remove_record(&id('1')).expect("removed");
	assert_eq!(rec.observe(&written.value), Observation::Unchanged);

	let Observation::Cleared(written) = rec.observe("not-a-guid:account") else {
		panic!("expected cleared");
	};
	assert_eq!(rec.observe(&written.value), Observation::Unchanged);
}

/// Abandoning an in-flight load frees the reconciler to load the same value again.
#[cfg_attr(test, test)]
pub(crate) fn test_abandoned_load_is_released() {
	let mut rec = Reconciler::new();
	let raw = pair('1', "contact");
	ticket(rec.observe(&raw));
	assert_eq!(rec.observe(&raw), Observation::Deferred);

	rec.abandon();
	assert!(!rec.is_busy());
	assert!(rec.add_records(vec![entry('2', "account", "Contoso")], true, None).is_some());
	rec.remove_record(&id('2'));
	ticket(rec.observe(&raw));
}

/// A second removal of the same identifier changes nothing.
#[cfg_attr(test, test)]
pub(crate) fn test_remove_is_idempotent() {
	let mut rec = Reconciler::new();
	rec.add_records(vec![entry('1', "contact", "A"), entry('2', "contact", "B")], true, None);

	assert!(rec.remove_record(&id('1')).is_some());
	let once = rec.state();
	assert!(rec.remove_record(&id('1')).is_none());
	assert_eq!(rec.state(), once);
	assert_eq!(rec.error(), None);
}
