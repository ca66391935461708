//! User and desktop-session records exchanged with the session store.

// self
use crate::{
	_prelude::*,
	auth::{SessionId, SessionToken, UserId},
};

/// User record resolved through the session store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
	/// Unique user identifier.
	pub id: UserId,
	/// Display name.
	pub name: String,
	/// Primary email address.
	pub email: String,
	/// Optional role label carried through from the host user table.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub role: Option<String>,
}

/// Session record scoped to one desktop process.
///
/// Created at ticket redemption and independent of the browser session that triggered it:
/// revoking one never revokes the other.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopSession {
	/// Unique session identifier.
	pub id: SessionId,
	/// Opaque bearer token backing the session cookie.
	pub token: SessionToken,
	/// Owning user.
	pub user_id: UserId,
	/// User agent of the redeeming request.
	pub user_agent: String,
	/// IP address of the redeeming request.
	pub ip_address: String,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Expiry instant; desktop sessions outlive interactive browser sessions.
	#[serde(with = "time::serde::rfc3339")]
	pub expires_at: OffsetDateTime,
}
impl DesktopSession {
	/// Returns `true` if the session has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}

	/// Returns `true` if the session is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}
}
impl Debug for DesktopSession {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("DesktopSession")
			.field("id", &self.id)
			.field("token", &"<redacted>")
			.field("user_id", &self.user_id)
			.field("user_agent", &self.user_agent)
			.field("ip_address", &self.ip_address)
			.field("created_at", &self.created_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Create-session request handed to the session store.
#[derive(Clone, Debug)]
pub struct NewSession {
	/// Owning user.
	pub user_id: UserId,
	/// User agent attributed to the new session.
	pub user_agent: String,
	/// IP address attributed to the new session.
	pub ip_address: String,
	/// Expiry instant the store must honor.
	pub expires_at: OffsetDateTime,
}
