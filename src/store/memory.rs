//! Thread-safe in-memory [`SessionStore`] implementation for local development and tests.

// crates.io
use rand::{Rng, distr::Alphanumeric};
use uuid::Uuid;
// self
use crate::{
	_prelude::*,
	auth::{DesktopSession, NewSession, SessionId, SessionToken, UserId, UserRecord},
	store::{ResolvedSession, SessionStore, StoreError, StoreFuture},
};

const SESSION_TOKEN_LEN: usize = 32;

#[derive(Debug, Default)]
struct State {
	users: HashMap<UserId, UserRecord>,
	sessions: HashMap<String, DesktopSession>,
}

/// Thread-safe storage backend that keeps records in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<State>>);
impl MemoryStore {
	/// Inserts or replaces a user record.
	pub fn insert_user(&self, user: UserRecord) {
		self.0.write().users.insert(user.id.clone(), user);
	}

	/// Inserts a pre-built session record keyed by its raw token.
	pub fn insert_session(&self, session: DesktopSession) {
		self.0.write().sessions.insert(session.token.expose().to_owned(), session);
	}

	/// Returns the number of stored sessions.
	pub fn session_count(&self) -> usize {
		self.0.read().sessions.len()
	}

	fn find_session_now(&self, token: &str) -> Option<ResolvedSession> {
		let state = self.0.read();
		let session = state.sessions.get(token)?.clone();
		let user = state.users.get(&session.user_id)?.clone();

		Some(ResolvedSession { session, user })
	}

	fn create_session_now(&self, request: NewSession) -> Result<DesktopSession, StoreError> {
		let mut state = self.0.write();

		if !state.users.contains_key(&request.user_id) {
			return Err(StoreError::Backend {
				message: format!("no user record for `{}`", request.user_id),
			});
		}

		let token = random_token(SESSION_TOKEN_LEN);
		let session = DesktopSession {
			id: SessionId::new(Uuid::new_v4().to_string())
				.expect("UUID session identifiers are always valid."),
			token: SessionToken::new(token.clone()),
			user_id: request.user_id,
			user_agent: request.user_agent,
			ip_address: request.ip_address,
			created_at: OffsetDateTime::now_utc(),
			expires_at: request.expires_at,
		};

		state.sessions.insert(token, session.clone());

		Ok(session)
	}
}
impl SessionStore for MemoryStore {
	fn find_session<'a>(&'a self, token: &'a str) -> StoreFuture<'a, Option<ResolvedSession>> {
		Box::pin(async move { Ok(self.find_session_now(token)) })
	}

	fn find_user<'a>(&'a self, id: &'a UserId) -> StoreFuture<'a, Option<UserRecord>> {
		Box::pin(async move { Ok(self.0.read().users.get(id).cloned()) })
	}

	fn create_session(&self, request: NewSession) -> StoreFuture<'_, DesktopSession> {
		Box::pin(async move { self.create_session_now(request) })
	}
}

fn random_token(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}
