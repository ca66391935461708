//! Deployment configuration for the handoff bridge.

// self
use crate::{
	_prelude::*,
	auth::SigningSecret,
	cookie::CookiePolicy,
	error::ConfigError,
	ticket::DEFAULT_TICKET_TTL,
};

/// Desktop sessions outlive interactive browser sessions.
pub const DEFAULT_SESSION_TTL: Duration = Duration::days(31);

const DEFAULT_SCHEME: &str = "bigxu";
const DEFAULT_HANDOFF_MARKER: &str = "/desktop-handoff";
const DEFAULT_COOKIE_DOMAIN: &str = "localhost";
const DEFAULT_USER_AGENT: &str = "Desktop App";
const DEFAULT_IP_ADDRESS: &str = "127.0.0.1";

/// Where tickets may be minted from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IssuanceMode {
	/// First-party deployment: the browser shares an origin with the API, so an
	/// already-authenticated tab may mint tickets directly via the fast-ticket endpoint.
	Internal,
	/// Tickets are only issued through the OAuth callback interception; the fast-ticket
	/// endpoint refuses.
	External,
}

/// Configuration surface for the bridge.
#[derive(Clone, Debug)]
pub struct HandoffConfig {
	/// Secret signing tickets. Defaults to the cookie secret unless overridden.
	pub ticket_secret: SigningSecret,
	/// Main secret signing session cookies and the session-data payload.
	pub cookie_secret: SigningSecret,
	/// Ticket lifetime; short TTLs narrow the URL-leak replay window.
	pub ticket_ttl: Duration,
	/// Desktop session lifetime.
	pub session_ttl: Duration,
	/// Custom URI scheme used when a pending redirect does not name one.
	pub default_scheme: String,
	/// Path marker identifying a pending redirect as a desktop handoff.
	pub handoff_marker: String,
	/// Plain web landing page used when a handoff cannot be completed.
	pub fallback_redirect: Url,
	/// Domain pinned onto the manually constructed cookies.
	pub cookie_domain: String,
	/// Cookie names and base options mirroring the host framework's configuration.
	pub cookies: CookiePolicy,
	/// Ticket issuance mode.
	pub issuance: IssuanceMode,
	/// User agent attributed to redemptions that omit the header.
	pub default_user_agent: String,
	/// IP address attributed to redemptions that omit forwarding headers.
	pub default_ip_address: String,
}
impl HandoffConfig {
	/// Creates a configuration from the main signing secret and the fallback landing page.
	///
	/// The ticket secret defaults to the cookie secret; use
	/// [`HandoffConfig::with_ticket_secret`] to derive or separate them.
	pub fn new(secret: SigningSecret, fallback_redirect: Url) -> Self {
		Self {
			ticket_secret: secret.clone(),
			cookie_secret: secret,
			ticket_ttl: DEFAULT_TICKET_TTL,
			session_ttl: DEFAULT_SESSION_TTL,
			default_scheme: DEFAULT_SCHEME.into(),
			handoff_marker: DEFAULT_HANDOFF_MARKER.into(),
			fallback_redirect,
			cookie_domain: DEFAULT_COOKIE_DOMAIN.into(),
			cookies: CookiePolicy::default(),
			issuance: IssuanceMode::Internal,
			default_user_agent: DEFAULT_USER_AGENT.into(),
			default_ip_address: DEFAULT_IP_ADDRESS.into(),
		}
	}

	/// Sets a ticket-signing secret distinct from the cookie secret.
	pub fn with_ticket_secret(mut self, secret: SigningSecret) -> Self {
		self.ticket_secret = secret;

		self
	}

	/// Overrides the ticket TTL.
	pub fn with_ticket_ttl(mut self, ttl: Duration) -> Self {
		self.ticket_ttl = ttl;

		self
	}

	/// Overrides the desktop session TTL.
	pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
		self.session_ttl = ttl;

		self
	}

	/// Overrides the default custom URI scheme.
	pub fn with_default_scheme(mut self, scheme: impl Into<String>) -> Self {
		self.default_scheme = scheme.into();

		self
	}

	/// Overrides the handoff path marker.
	pub fn with_handoff_marker(mut self, marker: impl Into<String>) -> Self {
		self.handoff_marker = marker.into();

		self
	}

	/// Overrides the cookie domain.
	pub fn with_cookie_domain(mut self, domain: impl Into<String>) -> Self {
		self.cookie_domain = domain.into();

		self
	}

	/// Replaces the cookie policy.
	pub fn with_cookies(mut self, cookies: CookiePolicy) -> Self {
		self.cookies = cookies;

		self
	}

	/// Sets the issuance mode.
	pub fn with_issuance(mut self, issuance: IssuanceMode) -> Self {
		self.issuance = issuance;

		self
	}

	/// Validates invariants that cannot be expressed in the type system.
	pub(crate) fn validate(&self) -> Result<(), ConfigError> {
		if self.default_scheme.is_empty()
			|| !self
				.default_scheme
				.chars()
				.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
		{
			return Err(ConfigError::InvalidScheme { scheme: self.default_scheme.clone() });
		}
		if !self.handoff_marker.starts_with('/') {
			return Err(ConfigError::InvalidMarker { marker: self.handoff_marker.clone() });
		}
		if !self.ticket_ttl.is_positive() {
			return Err(ConfigError::NonPositiveTicketTtl);
		}
		if !self.session_ttl.is_positive() {
			return Err(ConfigError::NonPositiveSessionTtl);
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn config() -> HandoffConfig {
		HandoffConfig::new(
			SigningSecret::new("secret"),
			Url::parse("https://web.example.com/landing")
				.expect("Fallback URL fixture should parse successfully."),
		)
	}

	#[test]
	fn defaults_match_the_handoff_contract() {
		let config = config();

		assert_eq!(config.ticket_ttl, Duration::seconds(60));
		assert_eq!(config.session_ttl, Duration::days(31));
		assert_eq!(config.default_scheme, "bigxu");
		assert_eq!(config.handoff_marker, "/desktop-handoff");
		assert_eq!(config.issuance, IssuanceMode::Internal);
		assert_eq!(config.ticket_secret, config.cookie_secret);
		assert!(config.validate().is_ok());
	}

	#[test]
	fn ticket_secret_can_be_separated() {
		let config = config().with_ticket_secret(SigningSecret::new("ticket-only"));

		assert_ne!(config.ticket_secret, config.cookie_secret);
	}

	#[test]
	fn validation_rejects_bad_values() {
		assert!(matches!(
			config().with_default_scheme("no spaces").validate(),
			Err(ConfigError::InvalidScheme { .. }),
		));
		assert!(matches!(
			config().with_handoff_marker("missing-slash").validate(),
			Err(ConfigError::InvalidMarker { .. }),
		));
		assert!(matches!(
			config().with_ticket_ttl(Duration::ZERO).validate(),
			Err(ConfigError::NonPositiveTicketTtl),
		));
	}
}
