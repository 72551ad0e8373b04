//! Lookup control configuration.
//!
//! A config is written in TOML:
//!
//! ```toml
//! entity_types = ["contact", "account"]
//! multi_select = true
//! max_selection = 5
//! default_type = "contact"
//!
//! [display_fields]
//! account = "accountnumber"
//! ```
//!
//! Decoding is followed by [`LookupConfig::validate`]; both
//! [`LookupConfig::from_toml_str`] and [`LookupConfig::load`] run it.

mod error;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use refbind_primitives::TypeTag;
use serde::Deserialize;

pub use error::ConfigError;

#[cfg(test)]
mod tests;

/// Placeholder shown by an empty control.
pub const DEFAULT_PLACEHOLDER: &str = "Select records";

/// Settings of one lookup control.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LookupConfig {
	/// Entity types the picker may offer.
	pub entity_types: Vec<TypeTag>,
	/// Allows more than one selected record.
	#[serde(default)]
	pub multi_select: bool,
	/// Allows opening a selected record's detail view.
	#[serde(default = "default_true")]
	pub linking_enabled: bool,
	/// Makes the control read-only.
	#[serde(default)]
	pub disabled: bool,
	/// Placeholder text shown when nothing is selected.
	#[serde(default = "default_placeholder")]
	pub placeholder: String,
	/// Upper bound on the selection size in multi-select mode.
	#[serde(default)]
	pub max_selection: Option<usize>,
	/// Type preselected in the picker.
	#[serde(default)]
	pub default_type: Option<TypeTag>,
	/// Hides recently used records in the picker.
	#[serde(default)]
	pub disable_recents: bool,
	/// Opens record details in a modal instead of navigating away.
	#[serde(default)]
	pub open_modal: bool,
	/// Per-type display field overrides.
	#[serde(default)]
	pub display_fields: BTreeMap<TypeTag, String>,
}

fn default_true() -> bool {
	true
}

fn default_placeholder() -> String {
	DEFAULT_PLACEHOLDER.to_owned()
}

impl LookupConfig {
	/// Creates a single-select config for `entity_types` with defaults elsewhere.
	pub fn new(entity_types: impl IntoIterator<Item = TypeTag>) -> Self {
		Self {
			entity_types: entity_types.into_iter().collect(),
			multi_select: false,
			linking_enabled: true,
			disabled: false,
			placeholder: default_placeholder(),
			max_selection: None,
			default_type: None,
			disable_recents: false,
			open_modal: false,
			display_fields: BTreeMap::new(),
		}
	}

	/// Switches to multi-select with an optional upper bound.
	pub fn multi(mut self, max_selection: Option<usize>) -> Self {
		self.multi_select = true;
		self.max_selection = max_selection;
		self
	}

	/// Decodes and validates a TOML document.
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads, decodes and validates the TOML file at `path`.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&input)
	}

	/// Checks cross-field constraints.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.entity_types.is_empty() {
			return Err(ConfigError::Invalid("entity_types must not be empty".into()));
		}
		let mut seen = BTreeSet::new();
		for ty in &self.entity_types {
			if !seen.insert(ty) {
				return Err(ConfigError::Invalid(format!("entity type {ty} listed twice")));
			}
		}
		if self.max_selection == Some(0) {
			return Err(ConfigError::Invalid("max_selection must be at least 1".into()));
		}
		if let Some(default) = &self.default_type
			&& !seen.contains(default)
		{
			return Err(ConfigError::Invalid(format!(
				"default_type {default} is not one of entity_types"
			)));
		}
		if let Some((ty, _)) = self.display_fields.iter().find(|(_, field)| field.trim().is_empty()) {
			return Err(ConfigError::Invalid(format!("display field for {ty} is empty")));
		}
		Ok(())
	}

	/// Selection bound actually enforced: `Some(1)` in single-select mode.
	pub fn effective_max(&self) -> Option<usize> {
		if self.multi_select { self.max_selection } else { Some(1) }
	}

	/// Entity types as a set, for picker requests.
	pub fn type_set(&self) -> BTreeSet<TypeTag> {
		self.entity_types.iter().cloned().collect()
	}
}
