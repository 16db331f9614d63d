use bon::Builder;

use crate::endpoint::Endpoints;

/// Protocol version sent as `txnVersion` unless overridden.
pub const DEFAULT_TXN_VERSION: &str = "2.0.0";

/// Which gateway the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    Production,
    #[default]
    Test,
}

impl Environment {
    pub fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Value of the `dummyRequest` field: `"1"` everywhere but production.
    pub fn dummy_request_flag(self) -> &'static str {
        match self {
            Environment::Production => "0",
            Environment::Test => "1",
        }
    }
}

/// Client-wide settings, fixed for the lifetime of a client.
///
/// ```
/// use paynow_core::config::{ClientConfig, Environment};
///
/// let config = ClientConfig::builder()
///     .merchant_ccid("A100000000000000000000cc")
///     .secret("merchant-password")
///     .build();
///
/// assert_eq!(config.environment(), Environment::Test);
/// assert_eq!(config.txn_version(), "2.0.0");
/// ```
#[derive(Builder, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Merchant CCID issued by the gateway.
    #[builder(into)]
    merchant_ccid: String,
    /// Merchant password used as the hash secret.
    #[builder(into)]
    secret: String,
    #[builder(default)]
    environment: Environment,
    #[builder(into, default = DEFAULT_TXN_VERSION.to_owned())]
    txn_version: String,
    #[builder(default)]
    endpoints: Endpoints,
}

impl ClientConfig {
    pub fn merchant_ccid(&self) -> &str {
        &self.merchant_ccid
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn txn_version(&self) -> &str {
        &self.txn_version
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("merchant_ccid", &self.merchant_ccid)
            .field("secret", &"<redacted>")
            .field("environment", &self.environment)
            .field("txn_version", &self.txn_version)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}
