//! Redacted wrappers keeping sensitive material out of logs.

// self
use crate::_prelude::*;

/// Opaque session token issued by the session store.
///
/// The raw value is the bearer credential for a desktop session; callers must avoid logging it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken(String);
impl SessionToken {
	/// Wraps a raw session token.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for SessionToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for SessionToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SessionToken").field(&"<redacted>").finish()
	}
}
impl Display for SessionToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Server-only secret used for ticket signing and cookie signatures.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(String);
impl SigningSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the secret bytes for MAC computation. Callers must avoid logging them.
	pub fn expose(&self) -> &[u8] {
		self.0.as_bytes()
	}
}
impl Debug for SigningSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SigningSecret").field(&"<redacted>").finish()
	}
}
impl Display for SigningSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
