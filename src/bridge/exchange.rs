//! Ticket-for-session exchange: the desktop's only way to obtain a session of its own.

// self
use crate::{
	_prelude::*,
	auth::{DesktopSession, NewSession, UserRecord},
	bridge::Bridge,
	cookie::{CookieOptions, CookieWriter, SessionDataPayload},
	obs::{self, HandoffKind, HandoffOutcome, HandoffSpan},
};

/// Generic rejection message; verification detail never reaches clients.
pub const GENERIC_REJECTION: &str = "Invalid or expired ticket.";
/// Rejection message kept distinct for unresolvable users.
pub const USER_NOT_FOUND_REJECTION: &str = "User not found.";

/// Redemption request as received by the exchange endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct ExchangeRequest {
	/// Signed ticket to redeem.
	pub ticket: String,
	/// `User-Agent` header of the redeeming request, when present.
	#[serde(skip)]
	pub user_agent: Option<String>,
	/// Forwarded client address of the redeeming request, when present.
	#[serde(skip)]
	pub ip_address: Option<String>,
}
impl ExchangeRequest {
	/// Creates a request carrying only the ticket.
	pub fn new(ticket: impl Into<String>) -> Self {
		Self { ticket: ticket.into(), user_agent: None, ip_address: None }
	}

	/// Attributes the redeeming request's user agent.
	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());

		self
	}

	/// Attributes the redeeming request's client address.
	pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
		self.ip_address = Some(ip_address.into());

		self
	}
}

/// Response body of a successful exchange.
///
/// Informational only: the cookies written through the [`CookieWriter`] are the actual
/// session-establishment side effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeReceipt {
	/// The freshly created desktop session.
	pub session: DesktopSession,
	/// The session's owning user.
	pub user: UserRecord,
}

impl Bridge {
	/// Redeems a ticket for a new desktop-scoped session, writing its cookies through the
	/// injected [`CookieWriter`].
	///
	/// Order matters: the session is created only after ticket verification succeeds, so a
	/// failed redemption never leaves an orphaned session behind. Every failure is re-raised as
	/// the generic `Unauthorized` category.
	pub async fn exchange_ticket(
		&self,
		request: ExchangeRequest,
		cookies: &mut dyn CookieWriter,
	) -> Result<ExchangeReceipt> {
		const KIND: HandoffKind = HandoffKind::Exchange;

		let span = HandoffSpan::new(KIND, "exchange_ticket");

		obs::record_handoff_outcome(KIND, HandoffOutcome::Attempt);

		let result = span.instrument(self.exchange_inner(request, cookies)).await;

		match &result {
			Ok(_) => obs::record_handoff_outcome(KIND, HandoffOutcome::Success),
			Err(_) => obs::record_handoff_outcome(KIND, HandoffOutcome::Failure),
		}

		result.map_err(|e| match e {
			Error::UserNotFound => Error::unauthorized(USER_NOT_FOUND_REJECTION),
			Error::Unauthorized { message } => Error::Unauthorized { message },
			_ => Error::unauthorized(GENERIC_REJECTION),
		})
	}

	async fn exchange_inner(
		&self,
		request: ExchangeRequest,
		cookies: &mut dyn CookieWriter,
	) -> Result<ExchangeReceipt> {
		let claims = self.codec().redeem(&request.ticket)?;

		if let Some(guard) = self.replay_guard()
			&& !guard.try_consume(&claims.jti, claims.expires_at)
		{
			return Err(Error::unauthorized(GENERIC_REJECTION));
		}

		let user = self
			.store
			.find_user(&claims.user_id)
			.await?
			.ok_or(Error::UserNotFound)?;
		let now = OffsetDateTime::now_utc();
		let session = self
			.store
			.create_session(NewSession {
				user_id: user.id.clone(),
				user_agent: request
					.user_agent
					.unwrap_or_else(|| self.config.default_user_agent.clone()),
				ip_address: request
					.ip_address
					.unwrap_or_else(|| self.config.default_ip_address.clone()),
				expires_at: now + self.config.session_ttl,
			})
			.await?;

		self.write_session_cookies(&session, &user, cookies)?;

		Ok(ExchangeReceipt { session, user })
	}

	/// Manually constructs the response cookies; generic session creation never touches HTTP
	/// headers.
	fn write_session_cookies(
		&self,
		session: &DesktopSession,
		user: &UserRecord,
		cookies: &mut dyn CookieWriter,
	) -> Result<()> {
		let options = CookieOptions::desktop_session(
			self.config.cookie_domain.clone(),
			self.config.session_ttl,
		);

		cookies.set_signed(
			&self.config.cookies.token_cookie.name,
			session.token.expose(),
			&self.config.cookie_secret,
			&options,
		);

		if let Some(slot) = &self.config.cookies.data_cookie {
			let payload = SessionDataPayload::build(
				session.clone(),
				user.clone(),
				&self.config.cookie_secret,
			);

			cookies.set_plain(&slot.name, &payload.encode()?, &options.client_readable());
		}

		Ok(())
	}
}
