//! OAuth-callback interception: observe the framework's pending redirect, swap in a deep link.
//!
//! After the host framework finishes an OAuth callback it has already computed two things: the
//! redirect it intends to send the browser to, and the `Set-Cookie` establishing the browser
//! session. When that redirect carries the desktop-handoff marker, this flow extracts the raw
//! browser token from the pending cookie, resolves the session, mints a ticket, and rewrites the
//! redirect to `{scheme}://auth-callback?ticket={ticket}`. The cookie itself is left untouched
//! and still reaches the browser; only the short-lived ticket ever crosses the process boundary.

// crates.io
use percent_encoding::percent_decode_str;
// self
use crate::{
	_prelude::*,
	bridge::Bridge,
	link,
	obs::{self, HandoffKind, HandoffOutcome, HandoffSpan},
};

const SCHEME_PARAM: &str = "scheme";

/// Narrow view of the framework-owned response state after an OAuth callback.
///
/// The flow only observes and overrides the result of the upstream handler; it never owns the
/// response.
pub trait RedirectContext {
	/// The redirect location the framework intends to send.
	fn pending_redirect(&self) -> Option<String>;

	/// The `Set-Cookie` header the framework already computed for the browser session.
	fn pending_set_cookie(&self) -> Option<String>;

	/// Replaces the redirect target. The pending `Set-Cookie` must remain untouched.
	fn override_redirect(&mut self, url: &str);
}

/// Terminal state of one callback interception.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InterceptOutcome {
	/// The redirect was rewritten to a deep link carrying a fresh ticket.
	Handoff {
		/// Scheme the deep link was composed with.
		scheme: String,
	},
	/// The pending redirect did not request a handoff; the flow was left unmodified.
	NotHandoff,
	/// A handoff was requested but could not be completed; the browser was sent to the plain
	/// web landing page instead. Failing here must never break the underlying browser login.
	Fallback {
		/// Why the handoff degraded.
		reason: FallbackReason,
	},
}

/// Why a requested handoff degraded to the web landing page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackReason {
	/// The framework produced no pending `Set-Cookie` to extract a token from.
	MissingSetCookie,
	/// The pending `Set-Cookie` carried no recognizable session token.
	MalformedSetCookie,
	/// The extracted token resolved to no browser session.
	SessionNotFound,
	/// The session store could not be reached.
	StoreUnavailable,
	/// Ticket issuance failed.
	TicketUnavailable,
}

impl Bridge {
	/// Runs the interception state machine over one completed OAuth callback.
	///
	/// Every failure is non-fatal: the worst outcome is a redirect to the configured landing
	/// page, never an aborted login.
	pub async fn intercept_callback(&self, ctx: &mut dyn RedirectContext) -> InterceptOutcome {
		const KIND: HandoffKind = HandoffKind::Intercept;

		let span = HandoffSpan::new(KIND, "intercept_callback");

		obs::record_handoff_outcome(KIND, HandoffOutcome::Attempt);

		let outcome = span.instrument(self.intercept_inner(ctx)).await;

		match &outcome {
			InterceptOutcome::Handoff { .. } =>
				obs::record_handoff_outcome(KIND, HandoffOutcome::Success),
			InterceptOutcome::NotHandoff =>
				obs::record_handoff_outcome(KIND, HandoffOutcome::Fallback),
			InterceptOutcome::Fallback { .. } =>
				obs::record_handoff_outcome(KIND, HandoffOutcome::Fallback),
		}

		outcome
	}

	async fn intercept_inner(&self, ctx: &mut dyn RedirectContext) -> InterceptOutcome {
		let Some(location) = ctx.pending_redirect() else {
			return InterceptOutcome::NotHandoff;
		};
		let Some(scheme) = self.handoff_scheme(&location) else {
			return InterceptOutcome::NotHandoff;
		};
		let Some(set_cookie) = ctx.pending_set_cookie() else {
			return self.degrade(ctx, FallbackReason::MissingSetCookie);
		};
		let Some(raw_token) =
			extract_session_token(&set_cookie, &self.config.cookies.token_cookie.name)
		else {
			return self.degrade(ctx, FallbackReason::MalformedSetCookie);
		};
		let resolved = match self.store.find_session(&raw_token).await {
			Ok(Some(resolved)) => resolved,
			Ok(None) => return self.degrade(ctx, FallbackReason::SessionNotFound),
			Err(_) => return self.degrade(ctx, FallbackReason::StoreUnavailable),
		};
		let Ok(ticket) = self.codec().issue(&resolved.user.id, self.config.ticket_ttl) else {
			return self.degrade(ctx, FallbackReason::TicketUnavailable);
		};

		ctx.override_redirect(&link::auth_callback_url(&scheme, ticket.as_str()));

		InterceptOutcome::Handoff { scheme }
	}

	/// Returns the deep-link scheme when `location` requests a handoff, `None` otherwise.
	fn handoff_scheme(&self, location: &str) -> Option<String> {
		let base = Url::parse("http://localhost")
			.expect("Static base URL is well-formed; this cannot fail.");
		let url = Url::options().base_url(Some(&base)).parse(location).ok()?;

		if !url.path().ends_with(self.config.handoff_marker.as_str()) {
			return None;
		}

		let scheme = url
			.query_pairs()
			.find(|(key, _)| key == SCHEME_PARAM)
			.map(|(_, value)| value.into_owned())
			.filter(|value| !value.is_empty())
			.unwrap_or_else(|| self.config.default_scheme.clone());

		Some(scheme)
	}

	fn degrade(&self, ctx: &mut dyn RedirectContext, reason: FallbackReason) -> InterceptOutcome {
		ctx.override_redirect(self.config.fallback_redirect.as_str());

		InterceptOutcome::Fallback { reason }
	}
}

/// Pulls the raw session token out of a pending `Set-Cookie` header.
///
/// The framework writes the browser cookie as `{name}={token}.{signature}; attrs…`; the raw
/// token is the percent-decoded value up to its first `.` segment.
fn extract_session_token(set_cookie: &str, cookie_name: &str) -> Option<String> {
	let needle = format!("{cookie_name}=");
	let start = set_cookie.find(&needle)? + needle.len();
	let value = set_cookie[start..].split(';').next()?;
	let decoded = percent_decode_str(value).decode_utf8_lossy();
	let token = decoded.split('.').next()?.trim();

	if token.is_empty() { None } else { Some(token.to_owned()) }
}
