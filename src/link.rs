//! Deep-link URI contract shared by the server-side interceptor and the client gateway.
//!
//! The OS dispatches `{scheme}://auth-callback?ticket={ticket}` to the desktop process. The host
//! component acts as an action discriminator so future actions can ride the same scheme.

// self
use crate::_prelude::*;

/// Action host recognized for ticket redemption.
pub const AUTH_CALLBACK_ACTION: &str = "auth-callback";
/// Query parameter carrying the signed ticket.
pub const TICKET_PARAM: &str = "ticket";

/// Composes the deep link a browser redirect hands to the OS dispatcher.
pub fn auth_callback_url(scheme: &str, ticket: &str) -> String {
	format!("{scheme}://{AUTH_CALLBACK_ACTION}?{TICKET_PARAM}={ticket}")
}

/// A validated, recognized deep link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeepLink {
	/// Ticket redemption request.
	AuthCallback {
		/// Signed ticket extracted from the query string.
		ticket: String,
	},
}
impl DeepLink {
	/// Validates an OS-dispatched URI against the expected custom scheme.
	///
	/// Deep links are unauthenticated-origin input: anything unrecognized is rejected with a
	/// [`DeepLinkRejection`] and must be discarded without side effects.
	pub fn parse(raw: &str, expected_scheme: &str) -> Result<Self, DeepLinkRejection> {
		let url = Url::parse(raw).map_err(|_| DeepLinkRejection::Unparseable)?;

		if !url.scheme().eq_ignore_ascii_case(expected_scheme) {
			return Err(DeepLinkRejection::UnknownProtocol { found: url.scheme().to_owned() });
		}

		// Host case never carries meaning here; tolerate `Auth-Callback` and friends.
		let action = url.host_str().unwrap_or_default().to_ascii_lowercase();

		if action != AUTH_CALLBACK_ACTION {
			return Err(DeepLinkRejection::UnknownAction { action });
		}

		let ticket = url
			.query_pairs()
			.find(|(key, _)| key == TICKET_PARAM)
			.map(|(_, value)| value.into_owned())
			.filter(|value| !value.is_empty())
			.ok_or(DeepLinkRejection::MissingTicket)?;

		Ok(Self::AuthCallback { ticket })
	}
}

/// Why an incoming URI was discarded.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum DeepLinkRejection {
	/// Input was not a parseable URI.
	#[error("Deep link is not a parseable URI.")]
	Unparseable,
	/// URI protocol does not match the expected custom scheme.
	#[error("Deep link protocol `{found}` does not match the expected scheme.")]
	UnknownProtocol {
		/// Scheme found on the URI.
		found: String,
	},
	/// URI host names an action this client does not recognize.
	#[error("Deep link action `{action}` is not recognized.")]
	UnknownAction {
		/// Lower-cased action discriminator.
		action: String,
	},
	/// Recognized action without a `ticket` parameter.
	#[error("Deep link is missing the ticket parameter.")]
	MissingTicket,
}
