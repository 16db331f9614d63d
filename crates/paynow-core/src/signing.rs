//! Canonical request signing.
//!
//! The gateway authenticates every request by recomputing a SHA-256 digest
//! over a canonical rendering of `params` followed by the merchant secret,
//! and comparing it with the `authHash` sent alongside. Any divergence in
//! ordering or rendering is an authentication failure, so the rendering here
//! is fixed:
//!
//! 1. Keys are visited in ordinal (byte) order, at every nesting level.
//! 2. `null` and empty-string values are skipped entirely.
//! 3. Nested maps contribute `parent.child=value` fragments, depth first,
//!    before the next top-level key.
//! 4. Scalars contribute `key=value` in their natural string form.
//! 5. Fragments are concatenated with no delimiter and the secret is appended.
//!
//! Values are not percent-encoded.
//!
//! ```
//! use paynow_core::{signing::canonical_string, types::{ParamValue, param_map}};
//!
//! let params = param_map([
//!     ("orderId", ParamValue::from("T1")),
//!     ("amount", ParamValue::from("1000")),
//!     ("itemName", ParamValue::from("")),
//! ]);
//! assert_eq!(canonical_string(&params), "amount=1000orderId=T1");
//! ```

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::{
    errors::SigningError,
    types::{ParamMap, ParamValue},
};

/// Fields every signed request must carry with a non-empty value.
pub const IDENTITY_FIELDS: [&str; 4] = [
    "merchantCcid",
    "orderId",
    "serviceOptionType",
    "txnVersion",
];

/// Render `params` into the string that is hashed, without the secret.
pub fn canonical_string(params: &ParamMap) -> String {
    let mut out = String::new();
    push_fragments(&mut out, None, params);
    out
}

fn push_fragments(out: &mut String, parent: Option<&str>, params: &ParamMap) {
    for (key, value) in params {
        if value.is_omitted() {
            continue;
        }

        let path = match parent {
            Some(parent) => format!("{parent}.{key}"),
            None => key.clone(),
        };

        match value {
            ParamValue::Map(nested) => push_fragments(out, Some(&path), nested),
            scalar => {
                out.push_str(&path);
                out.push('=');
                out.push_str(&scalar.to_string());
            }
        }
    }
}

/// Compute the lowercase hex SHA-256 `authHash` for `params` and `secret`.
pub fn sign(params: &ParamMap, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_string(params).as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// The wire unit: the exact parameters that were hashed, plus their hash.
///
/// Fields are private so an envelope cannot be altered after signing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedEnvelope {
    params: ParamMap,
    auth_hash: String,
}

impl SignedEnvelope {
    /// Sign `params` with `secret`.
    ///
    /// Fails if any of [`IDENTITY_FIELDS`] is absent or empty.
    pub fn sign(params: ParamMap, secret: &str) -> Result<Self, SigningError> {
        for field in IDENTITY_FIELDS {
            match params.get(field) {
                Some(value) if !value.is_omitted() => {}
                _ => return Err(SigningError::MissingIdentityField(field)),
            }
        }

        let auth_hash = sign(&params, secret);
        Ok(SignedEnvelope { params, auth_hash })
    }

    pub fn params(&self) -> &ParamMap {
        &self.params
    }

    pub fn auth_hash(&self) -> &str {
        &self.auth_hash
    }

    /// Check that `auth_hash` matches `params` under `secret`.
    pub fn verify(&self, secret: &str) -> bool {
        sign(&self.params, secret) == self.auth_hash
    }
}
