//! Fakes for exercising sessions and reconcilers in tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use refbind_primitives::{Identifier, TypeTag};
use tokio::sync::watch;

use crate::host::{LookupError, NavigateError, Navigator, Record, RecordStore};
use crate::memory::MemoryStore;

/// Builds the identifier whose every hex digit is `digit`.
pub fn id(digit: char) -> Identifier {
	let group = |n: usize| std::iter::repeat_n(digit, n).collect::<String>();
	let raw = format!("{}-{}-{}-{}-{}", group(8), group(4), group(4), group(4), group(12));
	Identifier::parse(&raw).unwrap_or_else(|err| panic!("bad test identifier {digit:?}: {err}"))
}

/// Parses a type tag, panicking on empty input.
pub fn ty(name: &str) -> TypeTag {
	TypeTag::parse(name).unwrap_or_else(|err| panic!("bad test type {name:?}: {err}"))
}

/// Store whose lookups wait until the gate is opened.
///
/// Starts closed. Lets a test change the bound value while a resolution is
/// suspended inside the store.
#[derive(Debug)]
pub struct GatedStore {
	inner: MemoryStore,
	gate: watch::Sender<bool>,
	waiting: AtomicUsize,
}

impl GatedStore {
	/// Wraps `inner` behind a closed gate.
	pub fn new(inner: MemoryStore) -> Self {
		Self {
			inner,
			gate: watch::Sender::new(false),
			waiting: AtomicUsize::new(0),
		}
	}

	/// The wrapped store.
	pub fn inner(&self) -> &MemoryStore {
		&self.inner
	}

	/// Lets every current and future lookup proceed.
	pub fn open(&self) {
		self.gate.send_replace(true);
	}

	/// Makes future lookups wait again.
	pub fn close(&self) {
		self.gate.send_replace(false);
	}

	/// Number of lookups that have reached the gate.
	pub fn arrivals(&self) -> usize {
		self.waiting.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl RecordStore for GatedStore {
	async fn get_by_key(&self, entity_type: &TypeTag, id: &Identifier, fields: &[&str]) -> Result<Record, LookupError> {
		self.waiting.fetch_add(1, Ordering::SeqCst);
		let mut rx = self.gate.subscribe();
		let opened = rx.wait_for(|open| *open).await.is_ok();
		if !opened {
			return Err(LookupError::Unavailable("gate dropped".into()));
		}
		self.inner.get_by_key(entity_type, id, fields).await
	}
}

/// Navigator recording every request.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
	opened: Mutex<Vec<(TypeTag, Identifier, bool)>>,
	fail: bool,
}

impl RecordingNavigator {
	/// Creates a navigator that succeeds.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a navigator whose every request fails after being recorded.
	pub fn failing() -> Self {
		Self {
			fail: true,
			..Self::default()
		}
	}

	/// Requests received so far as `(type, id, modal)`.
	pub fn opened(&self) -> Vec<(TypeTag, Identifier, bool)> {
		self.opened.lock().clone()
	}
}

#[async_trait]
impl Navigator for RecordingNavigator {
	async fn open_detail(&self, entity_type: &TypeTag, id: &Identifier, modal: bool) -> Result<(), NavigateError> {
		self.opened.lock().push((entity_type.clone(), id.clone(), modal));
		if self.fail {
			return Err(NavigateError("user cancelled".into()));
		}
		Ok(())
	}
}
