//! Cookie policy, the `CookieWriter` capability, and the signed session-data payload.
//!
//! Generic session creation in the host framework never touches HTTP headers, so the exchange
//! endpoint constructs its cookies by hand. The [`CookieWriter`] seam keeps that logic testable
//! without a real HTTP stack.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
// self
use crate::{
	_prelude::*,
	auth::{DesktopSession, SigningSecret, UserRecord},
};

type HmacSha256 = Hmac<Sha256>;

/// `SameSite` cookie attribute values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SameSite {
	/// Strict same-site enforcement.
	Strict,
	/// Lax same-site enforcement.
	Lax,
	/// Cross-site capable; requires `Secure`.
	None,
}
impl SameSite {
	/// Returns the attribute value as it appears on the wire.
	pub const fn as_str(self) -> &'static str {
		match self {
			SameSite::Strict => "Strict",
			SameSite::Lax => "Lax",
			SameSite::None => "None",
		}
	}
}

/// Attributes applied when rendering a `Set-Cookie` header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookieOptions {
	/// Explicit cookie domain, when pinned.
	pub domain: Option<String>,
	/// Cookie path; defaults to `/`.
	pub path: String,
	/// Relative expiry rendered as `Max-Age`.
	pub max_age: Option<Duration>,
	/// Same-site policy.
	pub same_site: SameSite,
	/// Whether the cookie requires HTTPS.
	pub secure: bool,
	/// Whether the cookie is hidden from client-side scripts.
	pub http_only: bool,
}
impl CookieOptions {
	/// Attributes for the desktop session-token cookie: forced HttpOnly, cross-site capable,
	/// pinned to an explicit domain.
	pub fn desktop_session(domain: impl Into<String>, max_age: Duration) -> Self {
		Self {
			domain: Some(domain.into()),
			path: "/".into(),
			max_age: Some(max_age),
			same_site: SameSite::None,
			secure: true,
			http_only: true,
		}
	}

	/// Same attributes with `HttpOnly` dropped, for the client-readable data cookie.
	pub fn client_readable(self) -> Self {
		Self { http_only: false, ..self }
	}
}
impl Default for CookieOptions {
	fn default() -> Self {
		Self {
			domain: None,
			path: "/".into(),
			max_age: None,
			same_site: SameSite::Lax,
			secure: true,
			http_only: true,
		}
	}
}

/// A named cookie plus the base attributes configured for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookieSlot {
	/// Cookie name, taken from the host framework's cookie configuration.
	pub name: String,
	/// Base attributes; endpoints may override per the handoff contract.
	pub options: CookieOptions,
}
impl CookieSlot {
	/// Creates a slot with default attributes.
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into(), options: CookieOptions::default() }
	}
}

/// Cookie names and base options mirroring the host framework's cookie configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookiePolicy {
	/// Session-token cookie slot.
	pub token_cookie: CookieSlot,
	/// Optional client-readable session-data cookie slot; disabled by default.
	pub data_cookie: Option<CookieSlot>,
}
impl CookiePolicy {
	/// Enables the client-readable session-data cookie under the provided name.
	pub fn with_data_cookie(mut self, name: impl Into<String>) -> Self {
		self.data_cookie = Some(CookieSlot::new(name));

		self
	}
}
impl Default for CookiePolicy {
	fn default() -> Self {
		Self { token_cookie: CookieSlot::new("session_token"), data_cookie: None }
	}
}

/// Capability for attaching cookies to an HTTP response.
pub trait CookieWriter {
	/// Sets a raw cookie.
	fn set_plain(&mut self, name: &str, value: &str, options: &CookieOptions);

	/// Sets a cookie whose value carries a `.{signature}` suffix computed over the value with
	/// the provided secret.
	fn set_signed(
		&mut self,
		name: &str,
		value: &str,
		secret: &SigningSecret,
		options: &CookieOptions,
	);
}

/// [`CookieWriter`] that renders real `Set-Cookie` header values.
#[derive(Clone, Debug, Default)]
pub struct HeaderCookieWriter {
	headers: Vec<String>,
}
impl HeaderCookieWriter {
	/// Returns the rendered `Set-Cookie` header values.
	pub fn headers(&self) -> &[String] {
		&self.headers
	}

	/// Consumes the writer, returning the rendered header values.
	pub fn into_headers(self) -> Vec<String> {
		self.headers
	}
}
impl CookieWriter for HeaderCookieWriter {
	fn set_plain(&mut self, name: &str, value: &str, options: &CookieOptions) {
		self.headers.push(render_set_cookie(name, value, options));
	}

	fn set_signed(
		&mut self,
		name: &str,
		value: &str,
		secret: &SigningSecret,
		options: &CookieOptions,
	) {
		let signed = format!("{value}.{}", sign_value(secret, value));

		self.headers.push(render_set_cookie(name, &signed, options));
	}
}

/// Renders one `Set-Cookie` header value.
pub fn render_set_cookie(name: &str, value: &str, options: &CookieOptions) -> String {
	let mut header = format!("{name}={value}; Path={}", options.path);

	if let Some(domain) = &options.domain {
		header.push_str("; Domain=");
		header.push_str(domain);
	}
	if let Some(max_age) = options.max_age {
		header.push_str("; Max-Age=");
		header.push_str(&max_age.whole_seconds().to_string());
	}

	header.push_str("; SameSite=");
	header.push_str(options.same_site.as_str());

	if options.secure {
		header.push_str("; Secure");
	}
	if options.http_only {
		header.push_str("; HttpOnly");
	}

	header
}

/// Computes the base64url-without-padding HMAC-SHA256 signature over `value`.
pub fn sign_value(secret: &SigningSecret, value: &str) -> String {
	let mut mac = HmacSha256::new_from_slice(secret.expose())
		.expect("HMAC accepts keys of any length; this cannot fail.");

	mac.update(value.as_bytes());

	URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
}

/// Errors produced while encoding or decoding [`SessionDataPayload`].
#[derive(Debug, ThisError)]
pub enum PayloadError {
	/// Payload could not be serialized to JSON.
	#[error("Session-data payload could not be serialized.")]
	Serialization {
		/// Underlying serde failure.
		#[source]
		source: serde_json::Error,
	},
	/// Encoded payload is not valid base64url JSON.
	#[error("Session-data payload is malformed.")]
	Malformed,
}

/// Client-readable session metadata blob carried by the non-HttpOnly data cookie.
///
/// The signature binds the blob to the session token; it must be recomputed any time the token
/// changes, and a mismatch must be treated as tampering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDataPayload {
	/// The desktop session record.
	pub session: DesktopSession,
	/// The owning user.
	pub user: UserRecord,
	/// Last update instant, epoch milliseconds.
	#[serde(rename = "updatedAt")]
	pub updated_at: i64,
	/// Session expiry instant, epoch milliseconds.
	#[serde(rename = "expiresAt")]
	pub expires_at: i64,
	/// base64url HMAC-SHA256 over the session token.
	pub signature: String,
}
impl SessionDataPayload {
	/// Builds a payload for the session, signing its token with `secret`.
	pub fn build(session: DesktopSession, user: UserRecord, secret: &SigningSecret) -> Self {
		let signature = sign_value(secret, session.token.expose());
		let updated_at = to_epoch_millis(session.created_at);
		let expires_at = to_epoch_millis(session.expires_at);

		Self { session, user, updated_at, expires_at, signature }
	}

	/// Encodes the payload as base64url JSON without padding.
	pub fn encode(&self) -> Result<String, PayloadError> {
		let json =
			serde_json::to_vec(self).map_err(|source| PayloadError::Serialization { source })?;

		Ok(URL_SAFE_NO_PAD.encode(json))
	}

	/// Decodes a payload previously produced by [`SessionDataPayload::encode`].
	pub fn decode(raw: &str) -> Result<Self, PayloadError> {
		let bytes = URL_SAFE_NO_PAD.decode(raw).map_err(|_| PayloadError::Malformed)?;

		serde_json::from_slice(&bytes).map_err(|_| PayloadError::Malformed)
	}

	/// Recomputes the HMAC over the embedded session token and compares in constant time.
	pub fn verify(&self, secret: &SigningSecret) -> bool {
		let Ok(expected) = URL_SAFE_NO_PAD.decode(&self.signature) else {
			return false;
		};
		let mut mac = HmacSha256::new_from_slice(secret.expose())
			.expect("HMAC accepts keys of any length; this cannot fail.");

		mac.update(self.session.token.expose().as_bytes());

		mac.verify_slice(&expected).is_ok()
	}
}

fn to_epoch_millis(instant: OffsetDateTime) -> i64 {
	(instant.unix_timestamp_nanos() / 1_000_000) as i64
}
