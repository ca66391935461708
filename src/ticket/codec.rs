//! Signing and verification for compact handoff tickets.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;
// self
use crate::{
	_prelude::*,
	auth::{SigningSecret, UserId},
	ticket::TicketClaims,
};

type HmacSha256 = Hmac<Sha256>;

/// Default ticket lifetime. Short on purpose: deep-link URLs can leak via process lists, logs,
/// and clipboard history, and the TTL is the sole bound on replaying a captured ticket.
pub const DEFAULT_TICKET_TTL: Duration = Duration::seconds(60);

const JWS_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;
const SUPPORTED_ALG: &str = "HS256";

/// Errors produced while verifying a ticket.
#[derive(Debug, ThisError)]
pub enum TicketError {
	/// Token does not have the `header.claims.signature` compact shape.
	#[error("Ticket is malformed.")]
	Malformed,
	/// Header declares an algorithm other than HS256 (including `none`).
	#[error("Ticket algorithm `{alg}` is not supported.")]
	UnsupportedAlgorithm {
		/// Declared algorithm label.
		alg: String,
	},
	/// MAC verification failed.
	#[error("Ticket signature is invalid.")]
	BadSignature,
	/// The `exp` claim is in the past.
	#[error("Ticket has expired.")]
	Expired,
	/// Claims could not be serialized at issuance.
	#[error("Ticket claims could not be serialized.")]
	Serialization {
		/// Underlying serde failure.
		#[source]
		source: serde_json::Error,
	},
	/// Claims payload contained malformed JSON.
	#[error("Ticket claims are malformed.")]
	ClaimsParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Serialized signed ticket in compact JWS form.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedTicket(String);
impl SignedTicket {
	/// Returns the compact serialization.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for SignedTicket {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<SignedTicket> for String {
	fn from(value: SignedTicket) -> Self {
		value.0
	}
}
impl Debug for SignedTicket {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SignedTicket").field(&self.0).finish()
	}
}
impl Display for SignedTicket {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Signs and verifies compact, short-lived authorization tickets.
///
/// Pure function of input and secret; safe for unlimited parallel invocation. The codec does not
/// enforce single-use on its own; attach an [`ext::replay`](crate::ext::replay) guard to the
/// bridge for that.
#[derive(Clone)]
pub struct TicketCodec {
	secret: SigningSecret,
}
impl TicketCodec {
	/// Creates a codec over the provided signing secret.
	pub fn new(secret: SigningSecret) -> Self {
		Self { secret }
	}

	/// Issues a signed ticket for the user, valid for `ttl` from now.
	pub fn issue(&self, user_id: &UserId, ttl: Duration) -> Result<SignedTicket, TicketError> {
		self.issue_at(user_id, ttl, OffsetDateTime::now_utc())
	}

	/// Issues a signed ticket with an explicit issuance instant.
	pub fn issue_at(
		&self,
		user_id: &UserId,
		ttl: Duration,
		now: OffsetDateTime,
	) -> Result<SignedTicket, TicketError> {
		let claims = TicketClaims {
			user_id: user_id.clone(),
			expires_at: now + ttl,
			jti: Uuid::new_v4().to_string(),
		};
		let payload = serde_json::to_vec(&claims)
			.map_err(|source| TicketError::Serialization { source })?;
		let header = URL_SAFE_NO_PAD.encode(JWS_HEADER);
		let payload = URL_SAFE_NO_PAD.encode(payload);
		let signing_input = format!("{header}.{payload}");
		let signature = URL_SAFE_NO_PAD.encode(self.mac(signing_input.as_bytes()));

		Ok(SignedTicket(format!("{signing_input}.{signature}")))
	}

	/// Verifies signature and expiry, returning the embedded claims.
	///
	/// Fails with [`TicketError`] on bad signature, malformed payload, or `exp` in the past.
	/// Signature verification runs in constant time and happens before any claims parsing.
	pub fn redeem(&self, raw: &str) -> Result<TicketClaims, TicketError> {
		self.redeem_at(raw, OffsetDateTime::now_utc())
	}

	/// Verifies a ticket against an explicit instant.
	pub fn redeem_at(&self, raw: &str, now: OffsetDateTime) -> Result<TicketClaims, TicketError> {
		let mut segments = raw.split('.');
		let (Some(header), Some(payload), Some(signature), None) =
			(segments.next(), segments.next(), segments.next(), segments.next())
		else {
			return Err(TicketError::Malformed);
		};
		let header_bytes = URL_SAFE_NO_PAD.decode(header).map_err(|_| TicketError::Malformed)?;
		let header_value: JwsHeader =
			serde_json::from_slice(&header_bytes).map_err(|_| TicketError::Malformed)?;

		if header_value.alg != SUPPORTED_ALG {
			return Err(TicketError::UnsupportedAlgorithm { alg: header_value.alg });
		}

		let signature_bytes =
			URL_SAFE_NO_PAD.decode(signature).map_err(|_| TicketError::Malformed)?;
		let signing_input = format!("{header}.{payload}");
		let mut mac = HmacSha256::new_from_slice(self.secret.expose())
			.expect("HMAC accepts keys of any length; this cannot fail.");

		mac.update(signing_input.as_bytes());
		mac.verify_slice(&signature_bytes).map_err(|_| TicketError::BadSignature)?;

		let payload_bytes = URL_SAFE_NO_PAD.decode(payload).map_err(|_| TicketError::Malformed)?;
		let deserializer = &mut serde_json::Deserializer::from_slice(&payload_bytes);
		let claims: TicketClaims = serde_path_to_error::deserialize(deserializer)
			.map_err(|source| TicketError::ClaimsParse { source })?;

		if claims.is_expired_at(now) {
			return Err(TicketError::Expired);
		}

		Ok(claims)
	}

	fn mac(&self, input: &[u8]) -> Vec<u8> {
		let mut mac = HmacSha256::new_from_slice(self.secret.expose())
			.expect("HMAC accepts keys of any length; this cannot fail.");

		mac.update(input);

		mac.finalize().into_bytes().to_vec()
	}
}
impl Debug for TicketCodec {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TicketCodec").field("secret", &"<redacted>").finish()
	}
}

#[derive(Deserialize)]
struct JwsHeader {
	alg: String,
}
