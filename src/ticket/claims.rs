//! Claim set carried by a signed ticket.

// self
use crate::{_prelude::*, auth::UserId};

/// Claims embedded in a ticket.
///
/// Immutable once issued. The ticket is a bearer capability: whoever holds the unexpired,
/// correctly signed bytes can redeem it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketClaims {
	/// User the ticket authorizes a session for.
	#[serde(rename = "userId")]
	pub user_id: UserId,
	/// Expiry instant, serialized as epoch seconds.
	#[serde(rename = "exp", with = "time::serde::timestamp")]
	pub expires_at: OffsetDateTime,
	/// Unique ticket identifier, usable for replay rejection.
	pub jti: String,
}
impl TicketClaims {
	/// Returns `true` if the claims have expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}
}
