//! Single-use enforcement for tickets.
//!
//! The core exchange flow bounds a captured ticket only by its TTL. Deployments that want
//! at-most-once redemption attach a [`ReplayGuard`] to the bridge; the guard is consulted after
//! signature verification and before any session is created.

// self
use crate::_prelude::*;

/// Contract for single-use ticket enforcement.
///
/// Implementations must be safe under concurrent redemption of the same nonce: exactly one
/// caller may win.
pub trait ReplayGuard
where
	Self: Send + Sync,
{
	/// Attempts to consume the nonce, returning `true` exactly once per nonce.
	///
	/// `expires_at` is the ticket's own expiry; entries never need to outlive it.
	fn try_consume(&self, jti: &str, expires_at: OffsetDateTime) -> bool;
}

/// In-process replay cache keyed by ticket nonce.
///
/// Suited to single-node deployments; multi-node setups want a shared store behind the same
/// trait.
#[derive(Debug, Default)]
pub struct MemoryReplayCache {
	seen: RwLock<HashMap<String, OffsetDateTime>>,
}
impl MemoryReplayCache {
	/// Creates an empty cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of nonces currently tracked.
	pub fn len(&self) -> usize {
		self.seen.read().len()
	}

	/// Whether the cache currently tracks no nonces.
	pub fn is_empty(&self) -> bool {
		self.seen.read().is_empty()
	}

	fn consume_at(&self, jti: &str, expires_at: OffsetDateTime, now: OffsetDateTime) -> bool {
		let mut seen = self.seen.write();

		// Tickets are short-lived, so eviction on every consume keeps the map bounded by the
		// redemption rate within one TTL window.
		seen.retain(|_, expiry| *expiry > now);

		if seen.contains_key(jti) {
			return false;
		}

		seen.insert(jti.to_owned(), expires_at);

		true
	}
}
impl ReplayGuard for MemoryReplayCache {
	fn try_consume(&self, jti: &str, expires_at: OffsetDateTime) -> bool {
		self.consume_at(jti, expires_at, OffsetDateTime::now_utc())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn first_consume_wins_and_second_loses() {
		let cache = MemoryReplayCache::new();
		let expires_at = OffsetDateTime::now_utc() + Duration::seconds(60);

		assert!(cache.try_consume("jti-1", expires_at));
		assert!(!cache.try_consume("jti-1", expires_at));
		assert!(cache.try_consume("jti-2", expires_at));
	}

	#[test]
	fn expired_entries_are_evicted_on_consume() {
		let cache = MemoryReplayCache::new();
		let t0 = OffsetDateTime::now_utc();

		assert!(cache.consume_at("jti-1", t0 + Duration::seconds(60), t0));
		assert_eq!(cache.len(), 1);
		// Past the first ticket's expiry, its nonce no longer occupies the cache.
		assert!(cache.consume_at("jti-2", t0 + Duration::seconds(120), t0 + Duration::seconds(61)));
		assert_eq!(cache.len(), 1);
	}

	#[test]
	fn eviction_never_resurrects_a_live_nonce() {
		let cache = MemoryReplayCache::new();
		let t0 = OffsetDateTime::now_utc();
		let expires_at = t0 + Duration::seconds(60);

		assert!(cache.consume_at("jti-1", expires_at, t0));
		assert!(!cache.consume_at("jti-1", expires_at, t0 + Duration::seconds(30)));
	}
}
