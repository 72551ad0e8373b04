//! Version counter and single listener slot for the presentation layer.

use std::fmt;

/// Callback invoked with the new version after every bump.
pub type VersionListener = Box<dyn FnMut(u64) + Send>;

/// Monotonic version counter with one push callback.
///
/// Single writer (the reconciler), single reader (the presentation layer).
/// Registering a listener replaces the previous one.
#[derive(Default)]
pub struct RenderBridge {
	version: u64,
	listener: Option<VersionListener>,
}

impl RenderBridge {
	/// Creates a bridge at version 0 with no listener.
	pub fn new() -> Self {
		Self::default()
	}

	/// Installs `listener`, replacing any previous one.
	pub fn register_listener(&mut self, listener: impl FnMut(u64) + Send + 'static) {
		self.listener = Some(Box::new(listener));
	}

	/// Removes the active listener.
	pub fn clear_listener(&mut self) {
		self.listener = None;
	}

	/// Returns the current version.
	pub fn current_version(&self) -> u64 {
		self.version
	}

	/// Increments the version by one and notifies the listener.
	pub(crate) fn bump(&mut self) -> u64 {
		self.version += 1;
		if let Some(listener) = self.listener.as_mut() {
			listener(self.version);
		}
		self.version
	}
}

impl fmt::Debug for RenderBridge {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RenderBridge")
			.field("version", &self.version)
			.field("has_listener", &self.listener.is_some())
			.finish()
	}
}
