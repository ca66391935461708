#![cfg(feature = "reqwest")]

// std
use std::sync::atomic::{AtomicUsize, Ordering};
// crates.io
use httpmock::prelude::*;
// self
use desktop_handoff::{
	_preludet::*,
	auth::{DesktopSession, SessionId, SessionToken, UserId, UserRecord},
	bridge::ExchangeReceipt,
	gateway::{DeepLinkGateway, DeepLinkOutcome, SessionSignal},
	http::ReqwestExchangeClient,
};

#[derive(Debug, Default)]
struct RecordingSignal(AtomicUsize);
impl RecordingSignal {
	fn notifications(&self) -> usize {
		self.0.load(Ordering::SeqCst)
	}
}
impl SessionSignal for RecordingSignal {
	fn notify_stale(&self) {
		self.0.fetch_add(1, Ordering::SeqCst);
	}
}

fn receipt_json() -> String {
	let user_id = UserId::new("u1").expect("User identifier fixture should be valid.");
	let now = OffsetDateTime::now_utc();
	let receipt = ExchangeReceipt {
		session: DesktopSession {
			id: SessionId::new("desktop-session").expect("Session fixture should be valid."),
			token: SessionToken::new("minted-token"),
			user_id: user_id.clone(),
			user_agent: "Desktop App".into(),
			ip_address: "127.0.0.1".into(),
			created_at: now,
			expires_at: now + Duration::days(31),
		},
		user: UserRecord {
			id: user_id,
			name: "User One".into(),
			email: "u1@example.com".into(),
			role: None,
		},
	};

	serde_json::to_string(&receipt).expect("Receipt fixture should serialize.")
}

fn build_gateway(server: &MockServer) -> (Arc<DeepLinkGateway>, Arc<RecordingSignal>) {
	let base = Url::parse(&server.base_url()).expect("Mock base URL should parse.");
	let redeemer = Arc::new(
		ReqwestExchangeClient::new(base).expect("Exchange client should build successfully."),
	);
	let signal = Arc::new(RecordingSignal::default());
	let gateway = Arc::new(DeepLinkGateway::new("bigxu", redeemer, signal.clone()));

	(gateway, signal)
}

#[tokio::test]
async fn valid_deep_links_redeem_over_http_and_notify_the_session_signal() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/electron/exchange")
				.header("content-type", "application/json")
				.json_body(serde_json::json!({ "ticket": "T-1" }));
			then.status(200).header("content-type", "application/json").body(receipt_json());
		})
		.await;
	let (gateway, signal) = build_gateway(&server);
	let outcome = gateway.handle_deep_link("bigxu://auth-callback?ticket=T-1").await;

	mock.assert_async().await;

	let DeepLinkOutcome::Redeemed(receipt) = outcome else {
		panic!("expected a redeemed outcome, got {outcome:?}");
	};

	assert_eq!(receipt.user.id.as_ref(), "u1");
	assert_eq!(receipt.session.token.expose(), "minted-token");
	assert_eq!(signal.notifications(), 1);
}

#[tokio::test]
async fn invalid_deep_links_are_discarded_before_any_network_call() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/electron/exchange");
			then.status(200).header("content-type", "application/json").body(receipt_json());
		})
		.await;
	let (gateway, signal) = build_gateway(&server);

	for raw in [
		"bigxu://settings?x=1",
		"other-scheme://auth-callback?ticket=T-1",
		"bigxu://auth-callback",
		"not a url at all",
	] {
		let outcome = gateway.handle_deep_link(raw).await;

		assert!(
			matches!(outcome, DeepLinkOutcome::Discarded(_)),
			"input `{raw}` should be discarded",
		);
	}

	assert_eq!(mock.hits_async().await, 0);
	assert_eq!(signal.notifications(), 0);
}

#[tokio::test]
async fn rejected_tickets_surface_the_server_message_without_notifying() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/electron/exchange");
			then.status(401)
				.header("content-type", "application/json")
				.body(r#"{"message":"Invalid or expired ticket."}"#);
		})
		.await;
	let (gateway, signal) = build_gateway(&server);
	let outcome = gateway.handle_deep_link("bigxu://auth-callback?ticket=stale").await;

	mock.assert_async().await;

	let DeepLinkOutcome::RedeemFailed(err) = outcome else {
		panic!("expected a failed outcome, got {outcome:?}");
	};

	assert_eq!(err.to_string(), "Invalid or expired ticket.");
	assert_eq!(signal.notifications(), 0);
}

#[tokio::test]
async fn unexpected_statuses_fail_without_clearing_session_state() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/electron/exchange");
			then.status(502).body("bad gateway");
		})
		.await;
	let (gateway, signal) = build_gateway(&server);
	let outcome = gateway.handle_deep_link("bigxu://auth-callback?ticket=T-1").await;

	let DeepLinkOutcome::RedeemFailed(err) = outcome else {
		panic!("expected a failed outcome, got {outcome:?}");
	};

	assert_eq!(err.to_string(), "Exchange endpoint returned an unexpected status: 502.");
	assert_eq!(signal.notifications(), 0);
}

#[tokio::test]
async fn window_focus_triggers_a_revalidation_signal() {
	let server = MockServer::start_async().await;
	let (gateway, signal) = build_gateway(&server);

	gateway.handle_focus();

	assert_eq!(signal.notifications(), 1);
}
