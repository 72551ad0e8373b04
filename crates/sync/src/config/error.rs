//! Error types for lookup configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading a [`LookupConfig`](super::LookupConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error decoding TOML.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Decoded values violate a configuration constraint.
	#[error("invalid configuration: {0}")]
	Invalid(String),
}
