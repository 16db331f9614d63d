use std::fmt::Display;

/// The six PayPay operations exposed by the PayNow API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create a new order (one-time or deferred accounting).
    Authorize,
    /// Charge an existing deferred-accounting order again.
    ReAuthorize,
    /// Settle an authorized order.
    Capture,
    /// Void an authorized order before capture.
    Cancel,
    /// Return captured funds, partially or fully.
    Refund,
    /// End a deferred-accounting subscription.
    Terminate,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Authorize,
        Operation::ReAuthorize,
        Operation::Capture,
        Operation::Cancel,
        Operation::Refund,
        Operation::Terminate,
    ];

    /// Path segment used by the gateway for this operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Authorize => "Authorize",
            Operation::ReAuthorize => "ReAuthorize",
            Operation::Capture => "Capture",
            Operation::Cancel => "Cancel",
            Operation::Refund => "Refund",
            Operation::Terminate => "Terminate",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
