//! Server-side facade coordinating callback interception and ticket redemption.

pub mod exchange;
pub mod fast_ticket;
pub mod intercept;

pub use exchange::*;
pub use fast_ticket::*;
pub use intercept::*;

// self
use crate::{
	_prelude::*,
	config::HandoffConfig,
	ext::ReplayGuard,
	store::SessionStore,
	ticket::TicketCodec,
};

/// Route of the ticket-for-session exchange endpoint.
pub const EXCHANGE_PATH: &str = "/electron/exchange";
/// Route of the fast-ticket endpoint.
pub const FAST_TICKET_PATH: &str = "/electron/fastTicket";

/// Coordinates the browser-to-desktop handoff on the server side.
///
/// The bridge owns the ticket codec, the session-store handle, and the deployment configuration
/// so the individual flows can focus on their own state machines. It holds no cross-request
/// mutable state: every flow executes within one request lifecycle.
#[derive(Clone)]
pub struct Bridge {
	/// Session-store collaborator owned by the host framework.
	pub store: Arc<dyn SessionStore>,
	/// Deployment configuration.
	pub config: HandoffConfig,
	codec: TicketCodec,
	replay_guard: Option<Arc<dyn ReplayGuard>>,
}
impl Bridge {
	/// Creates a bridge over the provided store and configuration.
	pub fn new(store: Arc<dyn SessionStore>, config: HandoffConfig) -> Result<Self> {
		config.validate()?;

		let codec = TicketCodec::new(config.ticket_secret.clone());

		Ok(Self { store, config, codec, replay_guard: None })
	}

	/// Attaches a single-use guard consulted at redemption time.
	///
	/// Without a guard, nothing prevents replaying a captured ticket inside its TTL window; the
	/// TTL is the sole bound.
	pub fn with_replay_guard(mut self, guard: Arc<dyn ReplayGuard>) -> Self {
		self.replay_guard = Some(guard);

		self
	}

	/// Returns the ticket codec backing this bridge.
	pub fn codec(&self) -> &TicketCodec {
		&self.codec
	}

	pub(crate) fn replay_guard(&self) -> Option<&Arc<dyn ReplayGuard>> {
		self.replay_guard.as_ref()
	}
}
impl Debug for Bridge {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Bridge")
			.field("config", &self.config)
			.field("replay_guard_set", &self.replay_guard.is_some())
			.finish()
	}
}
