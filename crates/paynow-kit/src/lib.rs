//! # PayNow Kit
//!
//! PayNow Kit is a typed, hash-signed client for the VeriTrans4G PayNow PayPay API.
//!
//! It validates requests locally, signs them with the merchant secret, routes
//! them to the production or test gateway and classifies what comes back.
//! Nothing is retried automatically and no order state is kept between calls.
//!
//! ## Core Components Overview
//!
//! - **[`config`]**: Merchant credentials, environment and endpoint overrides.
//! - **[`params`]**: One request type per operation, with its validation rules.
//! - **[`signing`]**: Canonical parameter rendering and the SHA-256 `authHash`.
//! - **[`response`]**: Shift_JIS decoding and markup / JSON classification.
//! - **[`client`]**: The [`PaypayClient`](client::PaypayClient) and its [`Transport`](client::Transport) seam.
//! - **[`http_transport`]**: A `reqwest` transport with a 30 second timeout (feature `http-transport`).
//!
//! ## Operations
//!
//! | Operation   | Legal when                                  |
//! |-------------|---------------------------------------------|
//! | Authorize   | always; creates the order                   |
//! | ReAuthorize | an earlier deferred-accounting Authorize     |
//! | Capture     | after a successful Authorize                |
//! | Cancel      | after Authorize, before Capture             |
//! | Refund      | after Capture, while a balance remains      |
//! | Terminate   | on a deferred-accounting order              |
//!
//! The gateway enforces this lifecycle; the client only checks field shapes.
//!
//! ## Quick Start
//!
//! ```no_run
//! use paynow_kit::{
//!     client::PaypayClient,
//!     config::ClientConfig,
//!     http_transport::HttpTransport,
//!     params::AuthorizeRequest,
//!     utils::generate_order_id,
//! };
//!
//! # async fn run() -> paynow_kit::errors::Result<()> {
//! let config = ClientConfig::builder()
//!     .merchant_ccid("A100000000000000000000cc")
//!     .secret("merchant-password")
//!     .build();
//! let client = PaypayClient::new(config, HttpTransport::new());
//!
//! let result = client
//!     .authorize(
//!         AuthorizeRequest::builder()
//!             .order_id(generate_order_id("ORD"))
//!             .item_id("ITEM1")
//!             .amount("1000")
//!             .build(),
//!     )
//!     .await?
//!     .error_for_status()?;
//!
//! if let Some(page) = result.payload {
//!     // Forward `page` to the payer's browser as is.
//!     let _ = page;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Transports
//!
//! Any type implementing [`client::Transport`] can carry requests, for
//! instance to go through an outbound proxy or to record traffic in tests:
//!
//! ```
//! use bytes::Bytes;
//! use paynow_kit::{client::Transport, errors::TransportError, signing::SignedEnvelope};
//! use url::Url;
//!
//! struct CannedTransport(Bytes);
//!
//! impl Transport for CannedTransport {
//!     async fn send(&self, _: &Url, _: &SignedEnvelope) -> Result<Bytes, TransportError> {
//!         Ok(self.0.clone())
//!     }
//! }
//! ```

pub mod client {
    pub use paynow_core::client::*;
}

pub mod config {
    pub use paynow_core::config::*;
}

pub mod endpoint {
    pub use paynow_core::endpoint::*;
}

pub mod errors {
    pub use paynow_core::errors::*;
}

pub mod params {
    pub use paynow_core::params::*;
}

pub mod response {
    pub use paynow_core::response::*;
}

pub mod signing {
    pub use paynow_core::signing::*;
}

pub mod types {
    pub use paynow_core::types::*;
}

pub mod utils {
    pub use paynow_core::utils::*;
}

pub mod validation {
    pub use paynow_core::validation::*;
}

#[cfg(feature = "http-transport")]
pub mod http_transport;
