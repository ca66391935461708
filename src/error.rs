//! Handoff-level error types shared across the bridge, gateway, and stores.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical handoff error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Session-store collaborator failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Ticket signature, claims, or expiry failure.
	///
	/// Endpoint boundaries must convert this into the generic [`Error::Unauthorized`] category
	/// before responding; verification detail never reaches clients.
	#[error(transparent)]
	Ticket(#[from] crate::ticket::TicketError),
	/// Session-data cookie payload failure.
	#[error(transparent)]
	Cookie(#[from] crate::cookie::PayloadError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure while calling the exchange endpoint.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// No browser session matched the extracted token at redirect-rewrite time.
	#[error("Browser session not found.")]
	SessionNotFound,
	/// The ticket's user identifier resolved to no known user.
	#[error("User not found.")]
	UserNotFound,
	/// Request is missing a required body, header, or session precondition.
	#[error("Bad request: {reason}.")]
	BadRequest {
		/// Human-readable description of the missing precondition.
		reason: String,
	},
	/// Generic rejection returned to clients by redemption endpoints.
	#[error("{message}")]
	Unauthorized {
		/// Best-effort human-readable message; never echoes verification internals.
		message: String,
	},
}
impl Error {
	/// Builds the generic rejection used at endpoint boundaries.
	pub fn unauthorized(message: impl Into<String>) -> Self {
		Self::Unauthorized { message: message.into() }
	}

	/// Builds a [`Error::BadRequest`] with the provided reason.
	pub fn bad_request(reason: impl Into<String>) -> Self {
		Self::BadRequest { reason: reason.into() }
	}

	/// Maps the error taxonomy onto the HTTP status contract of the exchange endpoints.
	pub fn http_status(&self) -> u16 {
		match self {
			Self::Ticket(_) | Self::UserNotFound | Self::Unauthorized { .. } => 401,
			Self::BadRequest { .. } => 400,
			Self::SessionNotFound => 401,
			Self::Storage(_) | Self::Cookie(_) | Self::Config(_) | Self::Transport(_) => 500,
		}
	}
}

/// Configuration and validation failures raised by the bridge.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ConfigError {
	/// Custom URI scheme is empty or contains characters the OS dispatcher rejects.
	#[error("Deep-link scheme `{scheme}` is invalid.")]
	InvalidScheme {
		/// Offending scheme value.
		scheme: String,
	},
	/// Handoff marker must be an absolute path segment.
	#[error("Handoff marker `{marker}` must start with `/`.")]
	InvalidMarker {
		/// Offending marker value.
		marker: String,
	},
	/// Ticket TTL must be positive.
	#[error("Ticket TTL must be positive.")]
	NonPositiveTicketTtl,
	/// Desktop session TTL must be positive.
	#[error("Session TTL must be positive.")]
	NonPositiveSessionTtl,
}

/// Transport-level failures (network, decoding) for the client-side exchange call.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the exchange endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Exchange endpoint answered with a status outside the documented contract.
	#[error("Exchange endpoint returned an unexpected status: {status}.")]
	UnexpectedStatus {
		/// HTTP status code received.
		status: u16,
	},
	/// Exchange endpoint responded with malformed JSON.
	#[error("Exchange endpoint returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
