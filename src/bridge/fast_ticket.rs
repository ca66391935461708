//! Direct ticket minting for browsers that already hold a valid session.
//!
//! Lets an authenticated tab link its companion desktop app without another OAuth round trip.

// self
use crate::{
	_prelude::*,
	bridge::Bridge,
	config::IssuanceMode,
	obs::{self, HandoffKind, HandoffOutcome, HandoffSpan},
	store::ResolvedSession,
	ticket::SignedTicket,
};

/// Response body of the fast-ticket endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastTicketGrant {
	/// Freshly minted ticket, valid for the configured ticket TTL.
	pub ticket: SignedTicket,
}

impl Bridge {
	/// Mints a ticket for an already-authenticated browser session.
	///
	/// The session-presence precondition is enforced by the host framework's middleware; this
	/// flow receives its result and refuses with `BadRequest` when it is absent or expired.
	pub fn fast_ticket(&self, session: Option<&ResolvedSession>) -> Result<FastTicketGrant> {
		const KIND: HandoffKind = HandoffKind::FastTicket;

		let _guard = HandoffSpan::new(KIND, "fast_ticket").entered();

		obs::record_handoff_outcome(KIND, HandoffOutcome::Attempt);

		let result = self.fast_ticket_inner(session);

		match &result {
			Ok(_) => obs::record_handoff_outcome(KIND, HandoffOutcome::Success),
			Err(_) => obs::record_handoff_outcome(KIND, HandoffOutcome::Failure),
		}

		result
	}

	fn fast_ticket_inner(&self, session: Option<&ResolvedSession>) -> Result<FastTicketGrant> {
		if self.config.issuance == IssuanceMode::External {
			return Err(Error::bad_request("fast-ticket issuance is disabled in external mode"));
		}

		let resolved =
			session.ok_or_else(|| Error::bad_request("an authenticated session is required"))?;

		if resolved.session.is_expired() {
			return Err(Error::bad_request("the browser session has expired"));
		}

		let ticket = self
			.codec()
			.issue(&resolved.user.id, self.config.ticket_ttl)
			.map_err(|_| Error::unauthorized("Ticket could not be issued."))?;

		Ok(FastTicketGrant { ticket })
	}
}
