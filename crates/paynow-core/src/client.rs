//! The PayPay client and the transport seam it sends through.

use bytes::Bytes;
use url::Url;

use crate::{
    config::ClientConfig,
    errors::{Result, TransportError},
    params::{
        AuthorizeRequest, CancelRequest, CaptureRequest, OperationParams, OperationRequest,
        ReAuthorizeRequest, RefundRequest, TerminateRequest,
    },
    response::{GatewayResult, classify_response},
    signing::SignedEnvelope,
    types::Operation,
};

/// Sends a signed envelope to an endpoint and returns the raw 200 body.
///
/// Anything other than an HTTP 200 must come back as a [`TransportError`];
/// the body of a 200 is handed to the classifier untouched.
pub trait Transport {
    fn send(
        &self,
        endpoint: &Url,
        envelope: &SignedEnvelope,
    ) -> impl Future<Output = std::result::Result<Bytes, TransportError>> + Send;
}

/// A request that has been validated, signed and routed, but not sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub operation: Operation,
    pub order_id: String,
    pub endpoint: Url,
    pub envelope: SignedEnvelope,
}

/// Client for the six PayPay operations.
///
/// Holds nothing but an immutable [`ClientConfig`] and a transport, so one
/// instance can run unrelated operations concurrently.
#[derive(Debug, Clone)]
pub struct PaypayClient<T> {
    config: ClientConfig,
    transport: T,
}

impl<T: Transport> PaypayClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        PaypayClient { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate, merge defaults, sign and resolve the endpoint. No I/O.
    pub fn prepare<R: OperationRequest>(&self, request: R) -> Result<PreparedRequest> {
        let params = OperationParams::build(request, &self.config)?;
        let envelope = params.sign(self.config.secret())?;
        let endpoint = self
            .config
            .endpoints()
            .resolve(params.operation(), self.config.environment())?;

        Ok(PreparedRequest {
            operation: params.operation(),
            order_id: params.order_id().to_owned(),
            endpoint,
            envelope,
        })
    }

    /// Send an already prepared request and classify the answer.
    pub async fn send(&self, prepared: PreparedRequest) -> Result<GatewayResult> {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Sending {} for order '{}' to {}",
            prepared.operation,
            prepared.order_id,
            prepared.endpoint
        );

        let body = self
            .transport
            .send(&prepared.endpoint, &prepared.envelope)
            .await
            .inspect_err(|_err| {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    "{} for order '{}' failed in transport: {_err}",
                    prepared.operation,
                    prepared.order_id
                );
            })?;

        let result = classify_response(prepared.operation, &prepared.order_id, body)?;

        #[cfg(feature = "tracing")]
        if !result.is_success() {
            tracing::warn!(
                "{} for order '{}' rejected by gateway [{}]: {}",
                result.operation,
                result.order_id,
                result.result_code,
                result.error_message()
            );
        }

        Ok(result)
    }

    /// Prepare and send `request`.
    pub async fn execute<R: OperationRequest>(&self, request: R) -> Result<GatewayResult> {
        let prepared = self.prepare(request)?;
        self.send(prepared).await
    }

    /// Create a new order. On success the result carries the payment page markup.
    pub async fn authorize(&self, request: AuthorizeRequest) -> Result<GatewayResult> {
        self.execute(request).await
    }

    /// Charge an existing deferred-accounting order again.
    pub async fn re_authorize(&self, request: ReAuthorizeRequest) -> Result<GatewayResult> {
        self.execute(request).await
    }

    /// Only legal after a successful Authorize on the same order.
    pub async fn capture(&self, request: CaptureRequest) -> Result<GatewayResult> {
        self.execute(request).await
    }

    /// Only legal before Capture.
    pub async fn cancel(&self, request: CancelRequest) -> Result<GatewayResult> {
        self.execute(request).await
    }

    /// Only legal after Capture; repeatable while a balance remains.
    pub async fn refund(&self, request: RefundRequest) -> Result<GatewayResult> {
        self.execute(request).await
    }

    /// End a deferred-accounting subscription.
    pub async fn terminate(&self, request: TerminateRequest) -> Result<GatewayResult> {
        self.execute(request).await
    }
}
