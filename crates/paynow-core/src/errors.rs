//! Error types for PayNow core operations.
//!
//! Errors are split by where they happen: [`ValidationError`] and
//! [`SigningError`] are raised locally before any I/O, [`TransportError`]
//! covers the round trip itself, and [`Error::Business`] is what a decoded
//! gateway failure becomes when the caller opts into treating it as an error.

use std::fmt::Display;

use bytes::Bytes;

/// A caller-supplied field failed its shape check.
///
/// Every variant carries the wire name of the offending field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("`{field}` is required")]
    Missing { field: &'static str },

    #[error("`{field}` must be at most {max} characters")]
    TooManyChars { field: &'static str, max: usize },

    #[error("`{field}` must be at most {max} bytes")]
    TooManyBytes { field: &'static str, max: usize },

    #[error("`{field}` must contain only ASCII letters and digits")]
    NotAlphanumeric { field: &'static str },

    #[error("`{field}` must contain only digits")]
    NotNumeric { field: &'static str },

    #[error("`{field}` must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: u64,
        max: u64,
    },

    #[error("`{field}` must start with http:// or https://")]
    InvalidScheme { field: &'static str },

    #[error("`{field}` must be formatted as YYYYMMDDhhmmss")]
    InvalidDatetime { field: &'static str },

    #[error("`{field}` must not be set for deferred accounting")]
    Forbidden { field: &'static str },
}

impl ValidationError {
    /// The wire name of the field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Missing { field }
            | ValidationError::TooManyChars { field, .. }
            | ValidationError::TooManyBytes { field, .. }
            | ValidationError::NotAlphanumeric { field }
            | ValidationError::NotNumeric { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidScheme { field }
            | ValidationError::InvalidDatetime { field }
            | ValidationError::Forbidden { field } => field,
        }
    }
}

/// Parameters could not be turned into a signed envelope.
///
/// These indicate a programming error rather than bad user input.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("Missing operation identity field `{0}`")]
    MissingIdentityField(&'static str),

    #[error("Field `{key}` holds a sequence, which has no canonical signing form")]
    SequenceValue { key: String },

    #[error("Parameters must serialize to a JSON object")]
    NotAnObject,

    #[error("Serde JSON error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

/// Error code attached to a [`TransportError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorCode {
    /// The gateway answered with a status other than 200.
    Status(u16),
    /// No HTTP status was received: connect failure, timeout, broken body.
    Network,
}

impl Display for TransportErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportErrorCode::Status(status) => write!(f, "{status}"),
            TransportErrorCode::Network => write!(f, "NETWORK_ERROR"),
        }
    }
}

/// The request did not complete with an HTTP 200.
///
/// The body of a non-200 answer is kept verbatim in `details` and never parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Transport error [{code}]: {message}")]
pub struct TransportError {
    pub code: TransportErrorCode,
    pub message: String,
    pub details: Option<Bytes>,
}

impl TransportError {
    pub fn network(message: impl Into<String>) -> Self {
        TransportError {
            code: TransportErrorCode::Network,
            message: message.into(),
            details: None,
        }
    }

    pub fn status(status: u16, message: impl Into<String>, details: Option<Bytes>) -> Self {
        TransportError {
            code: TransportErrorCode::Status(status),
            message: message.into(),
            details,
        }
    }
}

/// Error type for PayNow client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Local field validation failed; nothing was sent.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Parameters could not be signed; nothing was sent.
    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    /// The configured base URL could not be joined with the operation path.
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    /// Network failure, timeout or non-200 status.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The gateway recorded a definitive failure for the operation.
    #[error("Gateway rejected the request [{result_code}]: {message}")]
    Business {
        result_code: String,
        message: String,
    },

    /// The body looked like JSON but was not a gateway result envelope.
    #[error("Malformed gateway response: {0}")]
    MalformedResponse(#[source] serde_json::Error),
}

impl Error {
    /// Whether repeating the same call could reasonably succeed.
    ///
    /// Only transport failures qualify: a business failure is already
    /// recorded by the gateway, and local errors will fail the same way.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

/// A specialized `Result` type for PayNow operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_codes_render() {
        let err = TransportError::status(503, "Service Unavailable", None);
        assert_eq!(err.to_string(), "Transport error [503]: Service Unavailable");

        let err = TransportError::network("connection refused");
        assert_eq!(
            err.to_string(),
            "Transport error [NETWORK_ERROR]: connection refused"
        );
    }

    #[test]
    fn test_only_transport_errors_are_retryable() {
        assert!(Error::from(TransportError::network("timed out")).is_retryable());
        assert!(!Error::from(ValidationError::Missing { field: "orderId" }).is_retryable());
        assert!(
            !Error::Business {
                result_code: "N001".to_owned(),
                message: "already captured".to_owned(),
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_validation_error_reports_field() {
        let err = ValidationError::OutOfRange {
            field: "amount",
            min: 1,
            max: 9_999_999,
        };
        assert_eq!(err.field(), "amount");
        assert_eq!(err.to_string(), "`amount` must be between 1 and 9999999");
    }
}
