use std::collections::HashSet;

use crate::entry::{ParsedRef, SelectionEntry};
use crate::ids::Identifier;


/// Ordered set of selection entries, unique by identifier.
///
/// Insertion order is display order. Construction drops later duplicates so
/// the first occurrence of an identifier wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct Selection {
	entries: Vec<SelectionEntry>,
}

impl Selection {
	/// Creates a selection, dropping entries whose identifier was already seen.
	pub fn new(entries: impl IntoIterator<Item = SelectionEntry>) -> Self {
		let mut sel = Self { entries: entries.into_iter().collect() };
		sel.normalize();
		sel
	}

	/// Creates one pending placeholder per distinct ref.
	pub fn placeholders(refs: &[ParsedRef]) -> Self {
		Self::new(refs.iter().map(SelectionEntry::placeholder))
	}

	/// Returns all entries in display order.
	pub fn entries(&self) -> &[SelectionEntry] {
		&self.entries
	}

	/// Iterates over all entries in display order.
	pub fn iter(&self) -> impl Iterator<Item = &SelectionEntry> {
		self.entries.iter()
	}

	/// Iterates over resolved (non-pending) entries.
	pub fn resolved(&self) -> impl Iterator<Item = &SelectionEntry> {
		self.entries.iter().filter(|e| !e.pending)
	}

	/// Total entry count, pending included.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true when there are no entries at all.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Number of non-pending entries. This is the count max-selection is enforced against.
	pub fn resolved_count(&self) -> usize {
		self.resolved().count()
	}

	/// Returns true if any entry is still a placeholder.
	pub fn has_pending(&self) -> bool {
		self.entries.iter().any(|e| e.pending)
	}

	/// Looks up an entry by identifier.
	pub fn get(&self, id: &Identifier) -> Option<&SelectionEntry> {
		self.entries.iter().find(|e| &e.id == id)
	}

	/// Returns true if an entry with `id` exists.
	pub fn contains(&self, id: &Identifier) -> bool {
		self.get(id).is_some()
	}

	/// Appends `entry` unless its identifier is already present.
	///
	/// Returns whether the entry was added.
	pub fn push(&mut self, entry: SelectionEntry) -> bool {
		if self.contains(&entry.id) {
			return false;
		}
		self.entries.push(entry);
		true
	}

	/// Removes the entry with `id`, returning it.
	pub fn remove(&mut self, id: &Identifier) -> Option<SelectionEntry> {
		let index = self.entries.iter().position(|e| &e.id == id)?;
		Some(self.entries.remove(index))
	}

	/// Keeps the first `len` entries, returning how many were dropped.
	pub fn truncate(&mut self, len: usize) -> usize {
		let dropped = self.entries.len().saturating_sub(len);
		self.entries.truncate(len);
		dropped
	}

	/// Removes every entry.
	pub fn clear(&mut self) {
		self.entries.clear();
	}

	/// `;`-joined display names of resolved entries.
	pub fn display_names(&self) -> String {
		self.resolved()
			.map(|e| e.display_name.as_str())
			.collect::<Vec<_>>()
			.join(";")
	}

	fn normalize(&mut self) {
		let mut seen = HashSet::with_capacity(self.entries.len());
		self.entries.retain(|e| seen.insert(e.id.clone()));
	}
}

impl<'a> IntoIterator for &'a Selection {
	type Item = &'a SelectionEntry;
	type IntoIter = std::slice::Iter<'a, SelectionEntry>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.iter()
	}
}

impl FromIterator<SelectionEntry> for Selection {
	fn from_iter<T: IntoIterator<Item = SelectionEntry>>(iter: T) -> Self {
		Self::new(iter)
	}
}
