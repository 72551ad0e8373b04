//! Single-slot re-entrancy guard for picker and detail navigation.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// How long a permit suppresses further navigation if it is never released.
pub const NAVIGATION_GUARD_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
struct Slot {
	generation: u64,
	held_since: Option<Instant>,
}

/// Allows one navigation at a time.
///
/// A held slot is released when its [`NavigationPermit`] drops or when the
/// timeout elapses, whichever comes first. Permits carry the generation they
/// were issued in, so an expired permit dropping late never frees a newer one.
#[derive(Debug, Clone)]
pub struct NavigationGuard {
	slot: Arc<Mutex<Slot>>,
	timeout: Duration,
}

impl Default for NavigationGuard {
	fn default() -> Self {
		Self::with_timeout(NAVIGATION_GUARD_TIMEOUT)
	}
}

impl NavigationGuard {
	/// Creates a guard with [`NAVIGATION_GUARD_TIMEOUT`].
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a guard with a custom timeout.
	pub fn with_timeout(timeout: Duration) -> Self {
		Self {
			slot: Arc::default(),
			timeout,
		}
	}

	/// Claims the slot, or returns `None` while another navigation holds it.
	pub fn try_acquire(&self) -> Option<NavigationPermit> {
		let now = Instant::now();
		let mut slot = self.slot.lock();
		if let Some(since) = slot.held_since
			&& now.duration_since(since) < self.timeout
		{
			return None;
		}
		slot.generation = slot.generation.wrapping_add(1);
		slot.held_since = Some(now);
		Some(NavigationPermit {
			slot: Arc::clone(&self.slot),
			generation: slot.generation,
		})
	}

	/// Returns true while an unexpired permit is outstanding.
	pub fn is_held(&self) -> bool {
		let slot = self.slot.lock();
		slot.held_since.is_some_and(|since| since.elapsed() < self.timeout)
	}
}

/// Proof of holding the navigation slot. Releases it on drop.
#[derive(Debug)]
#[must_use = "dropping the permit releases the navigation slot"]
pub struct NavigationPermit {
	slot: Arc<Mutex<Slot>>,
	generation: u64,
}

impl NavigationPermit {
	/// Generation this permit was issued in.
	pub const fn generation(&self) -> u64 {
		self.generation
	}
}

impl Drop for NavigationPermit {
	fn drop(&mut self) {
		let mut slot = self.slot.lock();
		if slot.generation == self.generation {
			slot.held_since = None;
		}
	}
}
