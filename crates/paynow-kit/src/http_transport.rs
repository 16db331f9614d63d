use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use url::Url;

use crate::{
    client::{PaypayClient, Transport},
    errors::TransportError,
    signing::SignedEnvelope,
};

/// Whole-request timeout applied unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A [`Transport`] that POSTs the signed envelope as JSON over HTTP.
///
/// Any status other than 200 becomes a [`TransportError`] carrying the
/// status code and the raw response body. Timeouts and connection failures
/// become a `NETWORK_ERROR`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    pub client: reqwest::Client,
    pub headers: HeaderMap,
    pub timeout: Duration,
}

/// A [`PaypayClient`] sending over [`HttpTransport`].
pub type HttpPaypayClient = PaypayClient<HttpTransport>;

impl Default for HttpTransport {
    fn default() -> Self {
        HttpTransport::new()
    }
}

impl HttpTransport {
    pub fn new() -> Self {
        HttpTransport::with_client(reqwest::Client::new())
    }

    /// Reuse an existing `reqwest` client, e.g. one configured with a proxy.
    pub fn with_client(client: reqwest::Client) -> Self {
        HttpTransport {
            client,
            headers: HeaderMap::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add a header to every request.
    pub fn header(mut self, key: &HeaderName, value: &HeaderValue) -> Self {
        self.headers.insert(key, value.to_owned());
        self
    }
}

impl Transport for HttpTransport {
    async fn send(
        &self,
        endpoint: &Url,
        envelope: &SignedEnvelope,
    ) -> Result<Bytes, TransportError> {
        let response = self
            .client
            .post(endpoint.clone())
            .headers(self.headers.clone())
            .timeout(self.timeout)
            .json(envelope)
            .send()
            .await
            .map_err(|err| TransportError::network(err.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = status
                .canonical_reason()
                .unwrap_or("Unexpected status")
                .to_owned();
            // The body is diagnostic only; losing it must not hide the status.
            let details = response.bytes().await.ok();

            #[cfg(feature = "tracing")]
            tracing::debug!("Gateway at {endpoint} answered {status}");

            return Err(TransportError::status(status.as_u16(), message, details));
        }

        response
            .bytes()
            .await
            .map_err(|err| TransportError::network(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use http::header::USER_AGENT;

    use super::*;

    #[test]
    fn test_defaults() {
        let transport = HttpTransport::default();
        assert_eq!(transport.timeout, DEFAULT_TIMEOUT);
        assert!(transport.headers.is_empty());
    }

    #[test]
    fn test_builder_style_setters() {
        let transport = HttpTransport::new()
            .timeout(Duration::from_secs(5))
            .header(&USER_AGENT, &HeaderValue::from_static("paynow-kit"));

        assert_eq!(transport.timeout, Duration::from_secs(5));
        assert_eq!(transport.headers.get(USER_AGENT).unwrap(), "paynow-kit");
    }
}
