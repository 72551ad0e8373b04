//! In-memory collaborators for scripting and tests.

use std::collections::{BTreeMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use refbind_primitives::{Identifier, TypeTag};

use crate::host::{
	BoundField, BoundOutput, LookupError, NavigateError, Navigator, PickError, PickRequest, PickedRecord, Picker, Record,
	RecordStore,
};

type Table = BTreeMap<Identifier, Record>;

/// Record store backed by nested maps: type → identifier → record.
///
/// Deserializes from `{ "<type>": { "<id>": { "<field>": value } } }`.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(from = "BTreeMap<TypeTag, Table>")]
pub struct MemoryStore {
	tables: RwLock<BTreeMap<TypeTag, Table>>,
	failures: RwLock<BTreeMap<Identifier, LookupError>>,
	lookups: AtomicUsize,
}

impl From<BTreeMap<TypeTag, Table>> for MemoryStore {
	fn from(tables: BTreeMap<TypeTag, Table>) -> Self {
		Self {
			tables: RwLock::new(tables),
			..Self::default()
		}
	}
}

impl MemoryStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a JSON fixture.
	pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
		serde_json::from_str(json)
	}

	/// Reads and parses the JSON fixture at `path`.
	pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
		let path = path.as_ref();
		let json = std::fs::read_to_string(path).map_err(|error| crate::Error::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_json_str(&json).map_err(|error| crate::Error::Fixture {
			path: path.to_path_buf(),
			error,
		})
	}

	/// Inserts a record whose `field` holds `name`.
	pub fn insert(&self, entity_type: &TypeTag, id: &Identifier, field: &str, name: &str) {
		let mut record = Record::new();
		record.insert(field.to_owned(), serde_json::Value::from(name));
		self.tables
			.write()
			.entry(entity_type.clone())
			.or_default()
			.insert(id.clone(), record);
	}

	/// Deletes a record from every table.
	pub fn remove(&self, id: &Identifier) {
		for table in self.tables.write().values_mut() {
			table.remove(id);
		}
	}

	/// Makes every lookup of `id` fail with `error`.
	pub fn fail_with(&self, id: &Identifier, error: LookupError) {
		self.failures.write().insert(id.clone(), error);
	}

	/// Entity types that have a table, in order.
	pub fn entity_types(&self) -> Vec<TypeTag> {
		self.tables.read().keys().cloned().collect()
	}

	/// Number of lookups served so far.
	pub fn lookup_count(&self) -> usize {
		self.lookups.load(Ordering::Relaxed)
	}
}

#[async_trait]
impl RecordStore for MemoryStore {
	async fn get_by_key(&self, entity_type: &TypeTag, id: &Identifier, fields: &[&str]) -> Result<Record, LookupError> {
		self.lookups.fetch_add(1, Ordering::Relaxed);
		if let Some(error) = self.failures.read().get(id) {
			return Err(error.clone());
		}

		let tables = self.tables.read();
		let record = tables
			.get(entity_type)
			.and_then(|table| table.get(id))
			.ok_or(LookupError::NotFound)?;
		Ok(record
			.iter()
			.filter(|(key, _)| fields.contains(&key.as_str()))
			.map(|(key, value)| (key.clone(), value.clone()))
			.collect())
	}
}

/// Bound field holding its value in memory.
///
/// With echo enabled (the default) every published value is written back, as
/// a host persisting the output would.
#[derive(Debug)]
pub struct MemoryField {
	value: Mutex<String>,
	published: Mutex<Vec<BoundOutput>>,
	echo: bool,
}

impl MemoryField {
	/// Creates a field holding `value` that echoes published values.
	pub fn new(value: impl Into<String>) -> Self {
		Self {
			value: Mutex::new(value.into()),
			published: Mutex::default(),
			echo: true,
		}
	}

	/// Disables writing published values back into the field.
	pub fn without_echo(mut self) -> Self {
		self.echo = false;
		self
	}

	/// Overwrites the value, as another component would.
	pub fn set(&self, value: impl Into<String>) {
		*self.value.lock() = value.into();
	}

	/// Every output published so far.
	pub fn published(&self) -> Vec<BoundOutput> {
		self.published.lock().clone()
	}

	/// Most recently published output.
	pub fn last_published(&self) -> Option<BoundOutput> {
		self.published.lock().last().cloned()
	}
}

impl BoundField for MemoryField {
	fn current(&self) -> String {
		self.value.lock().clone()
	}

	fn publish(&self, output: &BoundOutput) {
		if self.echo {
			*self.value.lock() = output.value.clone();
		}
		self.published.lock().push(output.clone());
	}
}

/// Picker replaying queued responses. An empty queue behaves as a cancel.
#[derive(Debug, Default)]
pub struct ScriptedPicker {
	responses: Mutex<VecDeque<Result<Vec<PickedRecord>, PickError>>>,
	requests: Mutex<Vec<PickRequest>>,
}

impl ScriptedPicker {
	/// Creates a picker with no queued responses.
	pub fn new() -> Self {
		Self::default()
	}

	/// Queues a response for the next `pick` call.
	pub fn push_response(&self, response: Result<Vec<PickedRecord>, PickError>) {
		self.responses.lock().push_back(response);
	}

	/// Requests received so far.
	pub fn requests(&self) -> Vec<PickRequest> {
		self.requests.lock().clone()
	}
}

#[async_trait]
impl Picker for ScriptedPicker {
	async fn pick(&self, request: PickRequest) -> Result<Vec<PickedRecord>, PickError> {
		self.requests.lock().push(request);
		self.responses.lock().pop_front().unwrap_or(Err(PickError::Cancelled))
	}
}

/// Navigator that only logs the requested detail view.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

#[async_trait]
impl Navigator for LogNavigator {
	async fn open_detail(&self, entity_type: &TypeTag, id: &Identifier, modal: bool) -> Result<(), NavigateError> {
		tracing::info!(%entity_type, %id, modal, "open record");
		Ok(())
	}
}
