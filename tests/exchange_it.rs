// self
use desktop_handoff::{
	_preludet::*,
	auth::{SigningSecret, UserId},
	bridge::{ExchangeRequest, GENERIC_REJECTION, USER_NOT_FOUND_REJECTION},
	cookie::{CookiePolicy, HeaderCookieWriter, SessionDataPayload, sign_value},
	ext::MemoryReplayCache,
	ticket::DEFAULT_TICKET_TTL,
};

#[tokio::test]
async fn redeeming_a_fresh_ticket_mints_a_desktop_session() {
	let (bridge, store) = build_memory_bridge(test_config());
	let user_id = seed_user(&store, "u1", "User One");
	let ticket = bridge
		.codec()
		.issue(&user_id, DEFAULT_TICKET_TTL)
		.expect("Ticket issuance should succeed.");
	let mut cookies = HeaderCookieWriter::default();
	let receipt = bridge
		.exchange_ticket(ExchangeRequest::new(ticket.as_str()), &mut cookies)
		.await
		.expect("Fresh ticket should redeem successfully.");

	assert_eq!(receipt.user.id, user_id);
	assert_eq!(receipt.session.user_id, user_id);
	assert_eq!(store.session_count(), 1);

	let remaining = receipt.session.expires_at - OffsetDateTime::now_utc();

	assert!(remaining > Duration::days(31) - Duration::minutes(1));
	assert!(remaining <= Duration::days(31));

	let headers = cookies.headers();

	assert_eq!(headers.len(), 1, "data cookie is disabled by default");

	let header = &headers[0];

	assert!(header.starts_with("session_token="));
	assert!(header.contains("; Domain=localhost"));
	assert!(header.contains("; Max-Age=2678400"));
	assert!(header.contains("; SameSite=None"));
	assert!(header.contains("; Secure"));
	assert!(header.contains("; HttpOnly"));

	let value = header
		.strip_prefix("session_token=")
		.and_then(|rest| rest.split(';').next())
		.expect("Header should carry a cookie value.");
	let (token, signature) =
		value.split_once('.').expect("Signed value should carry a signature suffix.");

	assert_eq!(token, receipt.session.token.expose());
	assert_eq!(signature, sign_value(&SigningSecret::new(TEST_SECRET), token));
}

#[tokio::test]
async fn invalid_tickets_are_rejected_without_creating_sessions() {
	let (bridge, store) = build_memory_bridge(test_config());
	let user_id = seed_user(&store, "u1", "User One");
	let genuine = bridge
		.codec()
		.issue(&user_id, DEFAULT_TICKET_TTL)
		.expect("Ticket issuance should succeed.");
	let mut tampered = String::from(genuine.clone());

	tampered.push('x');

	for raw in ["garbage", "a.b.c", tampered.as_str()] {
		let mut cookies = HeaderCookieWriter::default();
		let err = bridge
			.exchange_ticket(ExchangeRequest::new(raw), &mut cookies)
			.await
			.expect_err("Invalid ticket must be rejected.");

		assert_eq!(err.to_string(), GENERIC_REJECTION);
		assert_eq!(err.http_status(), 401);
		assert!(cookies.headers().is_empty(), "rejections must not write cookies");
	}

	assert_eq!(store.session_count(), 0, "failed redemptions must not leave sessions behind");
}

#[tokio::test]
async fn expired_tickets_are_rejected_with_the_generic_message() {
	let (bridge, store) = build_memory_bridge(test_config());
	let user_id = seed_user(&store, "u1", "User One");
	let stale = bridge
		.codec()
		.issue_at(
			&user_id,
			DEFAULT_TICKET_TTL,
			OffsetDateTime::now_utc() - Duration::minutes(2),
		)
		.expect("Ticket issuance should succeed.");
	let mut cookies = HeaderCookieWriter::default();
	let err = bridge
		.exchange_ticket(ExchangeRequest::new(stale.as_str()), &mut cookies)
		.await
		.expect_err("Expired ticket must be rejected.");

	assert_eq!(err.to_string(), GENERIC_REJECTION);
	assert_eq!(store.session_count(), 0);
}

#[tokio::test]
async fn tickets_for_unknown_users_are_rejected_distinctly() {
	let (bridge, store) = build_memory_bridge(test_config());
	let ghost = UserId::new("ghost").expect("User identifier fixture should be valid.");
	let ticket = bridge
		.codec()
		.issue(&ghost, DEFAULT_TICKET_TTL)
		.expect("Ticket issuance should succeed.");
	let mut cookies = HeaderCookieWriter::default();
	let err = bridge
		.exchange_ticket(ExchangeRequest::new(ticket.as_str()), &mut cookies)
		.await
		.expect_err("Unknown user must be rejected.");

	assert_eq!(err.to_string(), USER_NOT_FOUND_REJECTION);
	assert_eq!(err.http_status(), 401);
	assert_eq!(store.session_count(), 0);
}

#[tokio::test]
async fn replay_guard_rejects_a_second_redemption_of_the_same_ticket() {
	let (bridge, store) = build_memory_bridge(test_config());
	let bridge = bridge.with_replay_guard(Arc::new(MemoryReplayCache::new()));
	let user_id = seed_user(&store, "u1", "User One");
	let ticket = bridge
		.codec()
		.issue(&user_id, DEFAULT_TICKET_TTL)
		.expect("Ticket issuance should succeed.");
	let mut cookies = HeaderCookieWriter::default();

	bridge
		.exchange_ticket(ExchangeRequest::new(ticket.as_str()), &mut cookies)
		.await
		.expect("First redemption should succeed.");

	let err = bridge
		.exchange_ticket(ExchangeRequest::new(ticket.as_str()), &mut cookies)
		.await
		.expect_err("Second redemption must be rejected.");

	assert_eq!(err.to_string(), GENERIC_REJECTION);
	assert_eq!(store.session_count(), 1);
}

#[tokio::test]
async fn data_cookie_is_written_when_the_policy_enables_it() {
	let config = test_config().with_cookies(
		CookiePolicy::default().with_data_cookie("session_data"),
	);
	let (bridge, store) = build_memory_bridge(config);
	let user_id = seed_user(&store, "u1", "User One");
	let ticket = bridge
		.codec()
		.issue(&user_id, DEFAULT_TICKET_TTL)
		.expect("Ticket issuance should succeed.");
	let mut cookies = HeaderCookieWriter::default();
	let receipt = bridge
		.exchange_ticket(ExchangeRequest::new(ticket.as_str()), &mut cookies)
		.await
		.expect("Fresh ticket should redeem successfully.");
	let headers = cookies.headers();

	assert_eq!(headers.len(), 2);

	let data_header = &headers[1];

	assert!(data_header.starts_with("session_data="));
	assert!(!data_header.contains("HttpOnly"), "data cookie must stay client-readable");

	let encoded = data_header
		.strip_prefix("session_data=")
		.and_then(|rest| rest.split(';').next())
		.expect("Header should carry a cookie value.");
	let payload =
		SessionDataPayload::decode(encoded).expect("Data cookie payload should decode.");

	assert!(payload.verify(&SigningSecret::new(TEST_SECRET)));
	assert_eq!(payload.session.token, receipt.session.token);
	assert_eq!(payload.user.id, user_id);
}

#[tokio::test]
async fn request_attribution_flows_into_the_session_record() {
	let (bridge, store) = build_memory_bridge(test_config());
	let user_id = seed_user(&store, "u1", "User One");
	let ticket = bridge
		.codec()
		.issue(&user_id, DEFAULT_TICKET_TTL)
		.expect("Ticket issuance should succeed.");
	let mut cookies = HeaderCookieWriter::default();
	let request = ExchangeRequest::new(ticket.as_str())
		.with_user_agent("Electron/31.0")
		.with_ip_address("203.0.113.7");
	let receipt = bridge
		.exchange_ticket(request, &mut cookies)
		.await
		.expect("Fresh ticket should redeem successfully.");

	assert_eq!(receipt.session.user_agent, "Electron/31.0");
	assert_eq!(receipt.session.ip_address, "203.0.113.7");
}
