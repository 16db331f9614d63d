//! Endpoint resolution per operation and environment.

use url::Url;

use crate::{config::Environment, types::Operation};

pub const PRODUCTION_BASE_URL: &str = "https://api3.veritrans.co.jp/paynow/v2/";
pub const TEST_BASE_URL: &str = "https://api3.veritrans.co.jp/test-paynow/v2/";

/// Service segment appended after the operation name.
pub const SERVICE_PATH: &str = "paypay";

/// Base URLs for the two gateway environments.
///
/// The defaults point at the real gateway; overriding them is mostly useful
/// for staging proxies and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub production: String,
    pub test: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            production: PRODUCTION_BASE_URL.to_owned(),
            test: TEST_BASE_URL.to_owned(),
        }
    }
}

impl Endpoints {
    pub fn base(&self, environment: Environment) -> &str {
        match environment {
            Environment::Production => &self.production,
            Environment::Test => &self.test,
        }
    }

    /// Resolve the full URL for `operation` in `environment`.
    ///
    /// ```
    /// use paynow_core::{config::Environment, endpoint::Endpoints, types::Operation};
    ///
    /// let url = Endpoints::default()
    ///     .resolve(Operation::Capture, Environment::Test)
    ///     .unwrap();
    /// assert_eq!(url.as_str(), "https://api3.veritrans.co.jp/test-paynow/v2/Capture/paypay");
    /// ```
    pub fn resolve(&self, operation: Operation, environment: Environment) -> Result<Url, url::ParseError> {
        let base = self.base(environment);
        // `Url::join` replaces the last segment unless the base ends with '/'.
        let base = if base.ends_with('/') {
            Url::parse(base)?
        } else {
            Url::parse(&format!("{base}/"))?
        };
        base.join(&format!("{}/{}", operation.as_str(), SERVICE_PATH))
    }
}
