//! Optional observability helpers for handoff flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `desktop_handoff.flow` with the `flow`
//!   (component) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `desktop_handoff_flow_total` counter for every
//!   attempt/success/fallback/failure, labeled by `flow` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Handoff flow kinds observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandoffKind {
	/// OAuth-callback interception and redirect rewriting.
	Intercept,
	/// Ticket-for-session exchange.
	Exchange,
	/// Direct ticket minting from an authenticated browser session.
	FastTicket,
	/// Client-side deep-link handling.
	DeepLink,
}
impl HandoffKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			HandoffKind::Intercept => "intercept",
			HandoffKind::Exchange => "exchange",
			HandoffKind::FastTicket => "fast_ticket",
			HandoffKind::DeepLink => "deep_link",
		}
	}
}
impl Display for HandoffKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandoffOutcome {
	/// Entry to a handoff flow.
	Attempt,
	/// Successful completion.
	Success,
	/// Non-fatal degradation to the plain web flow.
	Fallback,
	/// Failure propagated back to the caller.
	Failure,
}
impl HandoffOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			HandoffOutcome::Attempt => "attempt",
			HandoffOutcome::Success => "success",
			HandoffOutcome::Fallback => "fallback",
			HandoffOutcome::Failure => "failure",
		}
	}
}
impl Display for HandoffOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
