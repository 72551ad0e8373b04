//! Common utilities for session integration tests.

use std::sync::Arc;

use parking_lot::Mutex;
use refbind_sync::test_helpers::{RecordingNavigator, id, ty};
use refbind_sync::{LookupConfig, MemoryField, PickedRecord, RecordStore, ScriptedPicker, Session, TypeTag};

/// Session wired to in-memory fakes around `store`.
pub type TestSession<S> = Session<MemoryField, S, ScriptedPicker, RecordingNavigator>;

/// Builds a session over `store` whose field initially holds `value`.
pub fn session<S: RecordStore>(config: LookupConfig, value: &str, store: S) -> TestSession<S> {
	let _ = tracing_subscriber::fmt::try_init();
	Session::new(
		config,
		MemoryField::new(value),
		store,
		ScriptedPicker::new(),
		RecordingNavigator::new(),
	)
}

/// Config offering `types`, single-select.
pub fn config(types: &[&str]) -> LookupConfig {
	LookupConfig::new(types.iter().map(|t| ty(t)).collect::<Vec<TypeTag>>())
}

/// `id:type` pair for the test identifier built from `digit`.
pub fn pair(digit: char, entity_type: &str) -> String {
	format!("{}:{entity_type}", id(digit))
}

/// Picker result for the test identifier built from `digit`.
pub fn pick(digit: char, entity_type: &str, name: &str) -> PickedRecord {
	PickedRecord {
		id: id(digit),
		entity_type: ty(entity_type),
		name: name.to_owned(),
	}
}

/// Registers a listener collecting every notified version.
pub fn record_versions<S: RecordStore>(session: &TestSession<S>) -> Arc<Mutex<Vec<u64>>> {
	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = Arc::clone(&seen);
	session.register_listener(move |version| sink.lock().push(version));
	seen
}
