//! Client-side deep-link gateway: validate OS-dispatched URIs and redeem their tickets.
//!
//! Runs once at client startup and listens for the process lifetime. Deep links are best-effort,
//! unauthenticated-origin input: failures are logged and dropped, never crash the client or
//! corrupt prior session state. The newly set cookies are attached by the client runtime's
//! cookie jar; this layer never touches them.

// self
use crate::{
	_prelude::*,
	bridge::ExchangeReceipt,
	link::{DeepLink, DeepLinkRejection},
	obs::{self, HandoffKind, HandoffOutcome, HandoffSpan},
};

/// Boxed future returned by [`TicketRedeemer::redeem`].
pub type RedeemFuture<'a> = Pin<Box<dyn Future<Output = Result<ExchangeReceipt>> + 'a + Send>>;

/// Client transport that posts a ticket to the exchange endpoint.
pub trait TicketRedeemer
where
	Self: Send + Sync,
{
	/// Redeems the ticket, returning the parsed exchange receipt.
	fn redeem<'a>(&'a self, ticket: &'a str) -> RedeemFuture<'a>;
}

/// Reactive session signal consumed by the client's session store.
pub trait SessionSignal
where
	Self: Send + Sync,
{
	/// Announces that the session may be stale and dependent UI should revalidate.
	fn notify_stale(&self);
}

/// Terminal state of one deep-link dispatch.
#[derive(Debug)]
pub enum DeepLinkOutcome {
	/// Ticket redeemed; the stale signal was emitted.
	Redeemed(Box<ExchangeReceipt>),
	/// Input was discarded before any network call.
	Discarded(DeepLinkRejection),
	/// The exchange endpoint rejected the ticket; prior session state is untouched.
	RedeemFailed(Error),
}

/// Validates incoming deep links and drives ticket redemption.
pub struct DeepLinkGateway {
	scheme: String,
	redeemer: Arc<dyn TicketRedeemer>,
	signal: Arc<dyn SessionSignal>,
}
impl DeepLinkGateway {
	/// Creates a gateway expecting the provided custom scheme.
	pub fn new(
		scheme: impl Into<String>,
		redeemer: Arc<dyn TicketRedeemer>,
		signal: Arc<dyn SessionSignal>,
	) -> Self {
		Self { scheme: scheme.into(), redeemer, signal }
	}

	/// Window-focus handler: the session may have expired while the window was away.
	pub fn handle_focus(&self) {
		self.signal.notify_stale();
	}

	/// Deep-link handler.
	///
	/// Safe under duplicate OS dispatch: a second invocation simply runs independently, and a
	/// duplicate redemption is rejected by whatever single-use enforcement the server carries.
	pub async fn handle_deep_link(&self, raw: &str) -> DeepLinkOutcome {
		const KIND: HandoffKind = HandoffKind::DeepLink;

		let span = HandoffSpan::new(KIND, "handle_deep_link");

		obs::record_handoff_outcome(KIND, HandoffOutcome::Attempt);

		let outcome = span.instrument(self.handle_inner(raw)).await;

		match &outcome {
			DeepLinkOutcome::Redeemed(_) =>
				obs::record_handoff_outcome(KIND, HandoffOutcome::Success),
			DeepLinkOutcome::Discarded(_) =>
				obs::record_handoff_outcome(KIND, HandoffOutcome::Fallback),
			DeepLinkOutcome::RedeemFailed(_) =>
				obs::record_handoff_outcome(KIND, HandoffOutcome::Failure),
		}

		outcome
	}

	async fn handle_inner(&self, raw: &str) -> DeepLinkOutcome {
		let ticket = match DeepLink::parse(raw, &self.scheme) {
			Ok(DeepLink::AuthCallback { ticket }) => ticket,
			Err(rejection) => {
				obs::warn_discarded(HandoffKind::DeepLink, &rejection);

				return DeepLinkOutcome::Discarded(rejection);
			},
		};

		match self.redeemer.redeem(&ticket).await {
			Ok(receipt) => {
				self.signal.notify_stale();

				DeepLinkOutcome::Redeemed(Box::new(receipt))
			},
			Err(e) => {
				obs::warn_discarded(HandoffKind::DeepLink, &e);

				DeepLinkOutcome::RedeemFailed(e)
			},
		}
	}

	/// Registers the focus and deep-link listeners with the host event source.
	///
	/// Returns the subscription bundle; dropping it tears both listeners down, so long-lived
	/// processes can detach cleanly at shutdown.
	pub fn attach(self: &Arc<Self>, source: &dyn EventSource) -> GatewaySubscriptions {
		let focus_gateway = Arc::clone(self);
		let focus = source.subscribe_focus(Box::new(move || focus_gateway.handle_focus()));
		let link_gateway = Arc::clone(self);
		let deep_link = source.subscribe_deep_link(Box::new(move |raw| {
			let gateway = Arc::clone(&link_gateway);

			Box::pin(async move {
				let _ = gateway.handle_deep_link(&raw).await;
			})
		}));

		GatewaySubscriptions { _focus: focus, _deep_link: deep_link }
	}
}
impl Debug for DeepLinkGateway {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("DeepLinkGateway").field("scheme", &self.scheme).finish()
	}
}

/// Synchronous handler invoked on window focus.
pub type FocusHandler = Box<dyn Fn() + Send + Sync>;
/// Fire-and-forget handler invoked with each OS-dispatched URI; the host runtime drives the
/// returned future to completion independently of any later dispatch.
pub type DeepLinkHandler =
	Box<dyn Fn(String) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Host runtime boundary delivering UI events to the gateway.
pub trait EventSource {
	/// Registers a window-focus listener.
	fn subscribe_focus(&self, handler: FocusHandler) -> Subscription;

	/// Registers a deep-link listener.
	fn subscribe_deep_link(&self, handler: DeepLinkHandler) -> Subscription;
}

/// RAII handle for one registered listener; dropping it unregisters.
pub struct Subscription(Option<Box<dyn FnOnce() + Send>>);
impl Subscription {
	/// Wraps the teardown routine that unregisters the listener.
	pub fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
		Self(Some(Box::new(teardown)))
	}
}
impl Drop for Subscription {
	fn drop(&mut self) {
		if let Some(teardown) = self.0.take() {
			teardown();
		}
	}
}
impl Debug for Subscription {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Subscription(..)")
	}
}

/// Bundle of the two process-lifetime listeners registered by [`DeepLinkGateway::attach`].
#[derive(Debug)]
pub struct GatewaySubscriptions {
	_focus: Subscription,
	_deep_link: Subscription,
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;
	use crate::{
		auth::{DesktopSession, SessionId, SessionToken, UserId, UserRecord},
		link::DeepLinkRejection,
	};

	#[derive(Default)]
	struct RecordingSignal(AtomicUsize);
	impl SessionSignal for RecordingSignal {
		fn notify_stale(&self) {
			self.0.fetch_add(1, Ordering::SeqCst);
		}
	}

	struct StubRedeemer {
		calls: AtomicUsize,
		fail: bool,
	}
	impl StubRedeemer {
		fn new(fail: bool) -> Self {
			Self { calls: AtomicUsize::new(0), fail }
		}
	}
	impl TicketRedeemer for StubRedeemer {
		fn redeem<'a>(&'a self, _ticket: &'a str) -> RedeemFuture<'a> {
			self.calls.fetch_add(1, Ordering::SeqCst);

			Box::pin(async move {
				if self.fail {
					Err(Error::unauthorized("Invalid or expired ticket."))
				} else {
					Ok(receipt())
				}
			})
		}
	}

	fn receipt() -> ExchangeReceipt {
		let user_id = UserId::new("u1").expect("User fixture should be valid.");

		ExchangeReceipt {
			session: DesktopSession {
				id: SessionId::new("s-1").expect("Session fixture should be valid."),
				token: SessionToken::new("tok"),
				user_id: user_id.clone(),
				user_agent: "Desktop App".into(),
				ip_address: "127.0.0.1".into(),
				created_at: OffsetDateTime::now_utc(),
				expires_at: OffsetDateTime::now_utc() + Duration::days(31),
			},
			user: UserRecord {
				id: user_id,
				name: "User One".into(),
				email: "u1@example.com".into(),
				role: None,
			},
		}
	}

	fn gateway(redeemer: Arc<StubRedeemer>, signal: Arc<RecordingSignal>) -> DeepLinkGateway {
		DeepLinkGateway::new("bigxu", redeemer, signal)
	}

	#[tokio::test]
	async fn successful_redemption_notifies_the_session_signal() {
		let redeemer = Arc::new(StubRedeemer::new(false));
		let signal = Arc::new(RecordingSignal::default());
		let gateway = gateway(redeemer.clone(), signal.clone());
		let outcome = gateway.handle_deep_link("bigxu://auth-callback?ticket=T").await;

		assert!(matches!(outcome, DeepLinkOutcome::Redeemed(_)));
		assert_eq!(redeemer.calls.load(Ordering::SeqCst), 1);
		assert_eq!(signal.0.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn unknown_actions_never_reach_the_network() {
		let redeemer = Arc::new(StubRedeemer::new(false));
		let signal = Arc::new(RecordingSignal::default());
		let gateway = gateway(redeemer.clone(), signal.clone());
		let outcome = gateway.handle_deep_link("bigxu://settings?x=1").await;

		assert!(matches!(
			outcome,
			DeepLinkOutcome::Discarded(DeepLinkRejection::UnknownAction { .. }),
		));
		assert_eq!(redeemer.calls.load(Ordering::SeqCst), 0);
		assert_eq!(signal.0.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn foreign_protocols_never_reach_the_network() {
		let redeemer = Arc::new(StubRedeemer::new(false));
		let signal = Arc::new(RecordingSignal::default());
		let gateway = gateway(redeemer.clone(), signal.clone());
		let outcome = gateway.handle_deep_link("other-scheme://auth-callback?ticket=T").await;

		assert!(matches!(
			outcome,
			DeepLinkOutcome::Discarded(DeepLinkRejection::UnknownProtocol { .. }),
		));
		assert_eq!(redeemer.calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn failed_redemption_leaves_session_state_untouched() {
		let redeemer = Arc::new(StubRedeemer::new(true));
		let signal = Arc::new(RecordingSignal::default());
		let gateway = gateway(redeemer.clone(), signal.clone());
		let outcome = gateway.handle_deep_link("bigxu://auth-callback?ticket=T").await;

		assert!(matches!(outcome, DeepLinkOutcome::RedeemFailed(_)));
		assert_eq!(signal.0.load(Ordering::SeqCst), 0);
	}

	#[test]
	fn focus_notifies_the_session_signal() {
		let signal = Arc::new(RecordingSignal::default());
		let gateway = gateway(Arc::new(StubRedeemer::new(false)), signal.clone());

		gateway.handle_focus();
		gateway.handle_focus();

		assert_eq!(signal.0.load(Ordering::SeqCst), 2);
	}

	#[test]
	fn dropping_subscriptions_runs_both_teardowns() {
		struct CountingSource(Arc<AtomicUsize>);
		impl EventSource for CountingSource {
			fn subscribe_focus(&self, _handler: FocusHandler) -> Subscription {
				let counter = self.0.clone();

				Subscription::new(move || {
					counter.fetch_add(1, Ordering::SeqCst);
				})
			}

			fn subscribe_deep_link(&self, _handler: DeepLinkHandler) -> Subscription {
				let counter = self.0.clone();

				Subscription::new(move || {
					counter.fetch_add(1, Ordering::SeqCst);
				})
			}
		}

		let teardowns = Arc::new(AtomicUsize::new(0));
		let source = CountingSource(teardowns.clone());
		let gateway = Arc::new(gateway(
			Arc::new(StubRedeemer::new(false)),
			Arc::new(RecordingSignal::default()),
		));
		let subscriptions = gateway.attach(&source);

		assert_eq!(teardowns.load(Ordering::SeqCst), 0);

		drop(subscriptions);

		assert_eq!(teardowns.load(Ordering::SeqCst), 2);
	}
}
