//! Shape checks for caller-supplied fields.
//!
//! All checks are pure and run before a request is signed, so a failure here
//! never reaches the network.

use crate::errors::ValidationError;

pub const ORDER_ID_MAX_CHARS: usize = 100;
pub const ITEM_ID_MAX_BYTES: usize = 32;
pub const AMOUNT_MIN: u64 = 1;
pub const AMOUNT_MAX: u64 = 9_999_999;
pub const URL_MAX_CHARS: usize = 1024;
pub const PUSH_URL_MAX_CHARS: usize = 256;
pub const ORDER_DESCRIPTION_MAX_CHARS: usize = 255;

/// Validate an `orderId`: 1 to 100 ASCII letters or digits.
///
/// ```
/// use paynow_core::validation::validate_order_id;
///
/// assert!(validate_order_id("ORDER123").is_ok());
/// assert!(validate_order_id("ORDER-123").is_err());
/// ```
pub fn validate_order_id(value: &str) -> Result<(), ValidationError> {
    order_id("orderId", value)
}

/// Validate an `itemId`: present and at most 32 bytes.
pub fn validate_item_id(value: &str) -> Result<(), ValidationError> {
    item_id("itemId", value)
}

/// Validate an `amount`: digits only, in `1..=9999999`.
pub fn validate_amount(value: &str) -> Result<(), ValidationError> {
    amount("amount", value)
}

/// Validate a success / cancel / error URL.
pub fn validate_url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    url(field, value, URL_MAX_CHARS)
}

/// Validate a `pushUrl`, which has a shorter limit than the redirect URLs.
pub fn validate_push_url(value: &str) -> Result<(), ValidationError> {
    url("pushUrl", value, PUSH_URL_MAX_CHARS)
}

/// Validate a `YYYYMMDDhhmmss` timestamp.
pub fn validate_datetime(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.len() != 14 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidDatetime { field });
    }
    Ok(())
}

pub(crate) fn order_id(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Missing { field });
    }
    if value.chars().count() > ORDER_ID_MAX_CHARS {
        return Err(ValidationError::TooManyChars {
            field,
            max: ORDER_ID_MAX_CHARS,
        });
    }
    if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::NotAlphanumeric { field });
    }
    Ok(())
}

pub(crate) fn item_id(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Missing { field });
    }
    if value.len() > ITEM_ID_MAX_BYTES {
        return Err(ValidationError::TooManyBytes {
            field,
            max: ITEM_ID_MAX_BYTES,
        });
    }
    Ok(())
}

pub(crate) fn amount(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Missing { field });
    }
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::NotNumeric { field });
    }

    let out_of_range = ValidationError::OutOfRange {
        field,
        min: AMOUNT_MIN,
        max: AMOUNT_MAX,
    };
    // Digit strings too long for u64 are out of range anyway.
    let parsed = value.parse::<u64>().map_err(|_| out_of_range.clone())?;
    if !(AMOUNT_MIN..=AMOUNT_MAX).contains(&parsed) {
        return Err(out_of_range);
    }
    Ok(())
}

pub(crate) fn max_chars(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooManyChars { field, max });
    }
    Ok(())
}

fn url(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    max_chars(field, value, max)?;
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(ValidationError::InvalidScheme { field });
    }
    Ok(())
}
