//! Browser-to-desktop session handoff: mint single-use tickets, intercept OAuth callbacks, and
//! redeem desktop-scoped sessions in one crate.
//!
//! The browser finishes an OAuth login holding an HttpOnly cookie the desktop process can never
//! read. The only thing that crosses the process boundary is a short-lived signed ticket carried
//! by an OS-dispatched deep link; the desktop redeems it for a brand-new session of its own.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod bridge;
pub mod config;
pub mod cookie;
pub mod error;
pub mod ext;
pub mod gateway;
#[cfg(feature = "reqwest")] pub mod http;
pub mod link;
pub mod obs;
pub mod store;
pub mod ticket;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience fixtures for integration tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{SigningSecret, UserId, UserRecord},
		bridge::Bridge,
		config::HandoffConfig,
		store::MemoryStore,
	};

	/// Secret used to sign tickets and cookies across the test suites.
	pub const TEST_SECRET: &str = "handoff-test-secret";

	/// Builds a [`HandoffConfig`] with deterministic test defaults.
	pub fn test_config() -> HandoffConfig {
		HandoffConfig::new(
			SigningSecret::new(TEST_SECRET),
			Url::parse("https://web.example.com/landing")
				.expect("Fallback URL fixture should parse successfully."),
		)
	}

	/// Constructs a [`Bridge`] backed by an in-memory session store.
	pub fn build_memory_bridge(config: HandoffConfig) -> (Bridge, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let bridge = Bridge::new(store_backend.clone(), config)
			.expect("Test bridge configuration should be valid.");

		(bridge, store_backend)
	}

	/// Seeds a user record into the provided store and returns its identifier.
	pub fn seed_user(store: &MemoryStore, id: &str, name: &str) -> UserId {
		let user_id = UserId::new(id).expect("User identifier fixture should be valid.");

		store.insert_user(UserRecord {
			id: user_id.clone(),
			name: name.into(),
			email: format!("{id}@example.com"),
			role: None,
		});

		user_id
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use desktop_handoff as _;
#[cfg(test)] use httpmock as _;
