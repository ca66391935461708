//! Session-store boundary and the built-in in-memory implementation.
//!
//! The host auth framework owns user and session persistence; the bridge only depends on this
//! narrow contract. Implementations are expected to serialize their own writes.

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{DesktopSession, NewSession, UserId, UserRecord},
};

/// Boxed future returned by [`SessionStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Narrow persistence contract the handoff bridge requires from the host framework.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Resolves a raw session token to its session + user pair, if one exists.
	fn find_session<'a>(&'a self, token: &'a str) -> StoreFuture<'a, Option<ResolvedSession>>;

	/// Fetches a user record by identifier.
	fn find_user<'a>(&'a self, id: &'a UserId) -> StoreFuture<'a, Option<UserRecord>>;

	/// Creates a new session record honoring the provided expiry.
	fn create_session(&self, request: NewSession) -> StoreFuture<'_, DesktopSession>;
}

/// Session + user pair resolved from a raw session token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSession {
	/// The matching session record.
	pub session: DesktopSession,
	/// The session's owning user.
	pub user: UserRecord,
}

/// Error type produced by [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
