//! Reqwest-backed transport for the client side of the ticket exchange.
//!
//! Other HTTP stacks plug in by implementing [`TicketRedeemer`](crate::gateway::TicketRedeemer)
//! directly; this module is the batteries-included default behind the `reqwest` feature.

// crates.io
use serde_json::Deserializer as JsonDeserializer;
// self
use crate::{
	_prelude::*,
	bridge::{EXCHANGE_PATH, ExchangeReceipt, GENERIC_REJECTION},
	error::TransportError,
	gateway::{RedeemFuture, TicketRedeemer},
};

#[derive(Deserialize)]
struct RejectionBody {
	message: String,
}

#[derive(Serialize)]
struct ExchangeBody<'a> {
	ticket: &'a str,
}

/// [`TicketRedeemer`] implementation posting tickets to the exchange endpoint over reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestExchangeClient {
	client: ReqwestClient,
	exchange_url: Url,
}
impl ReqwestExchangeClient {
	/// Creates a client targeting the exchange endpoint under `base_url`.
	pub fn new(base_url: Url) -> Result<Self> {
		Self::with_client(ReqwestClient::new(), base_url)
	}

	/// Creates a client reusing an existing [`ReqwestClient`] connection pool.
	pub fn with_client(client: ReqwestClient, base_url: Url) -> Result<Self> {
		let exchange_url = base_url
			.join(EXCHANGE_PATH)
			.map_err(|_| Error::bad_request("exchange base URL cannot carry the endpoint path"))?;

		Ok(Self { client, exchange_url })
	}

	/// Resolved URL of the exchange endpoint.
	pub fn exchange_url(&self) -> &Url {
		&self.exchange_url
	}

	async fn post_ticket(&self, ticket: &str) -> Result<ExchangeReceipt> {
		let response = self
			.client
			.post(self.exchange_url.clone())
			.json(&ExchangeBody { ticket })
			.send()
			.await
			.map_err(TransportError::from)?;
		let status = response.status().as_u16();
		let body = response.bytes().await.map_err(TransportError::from)?;

		match status {
			200 => {
				let mut deserializer = JsonDeserializer::from_slice(&body);
				let receipt = serde_path_to_error::deserialize(&mut deserializer)
					.map_err(|source| TransportError::ResponseParse { source })?;

				Ok(receipt)
			},
			401 => {
				// The rejection body is best-effort; a missing message never masks the 401.
				let message = serde_json::from_slice::<RejectionBody>(&body)
					.map(|rejection| rejection.message)
					.unwrap_or_else(|_| GENERIC_REJECTION.into());

				Err(Error::unauthorized(message))
			},
			status => Err(TransportError::UnexpectedStatus { status }.into()),
		}
	}
}
impl TicketRedeemer for ReqwestExchangeClient {
	fn redeem<'a>(&'a self, ticket: &'a str) -> RedeemFuture<'a> {
		Box::pin(self.post_ticket(ticket))
	}
}
