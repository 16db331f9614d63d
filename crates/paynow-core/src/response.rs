//! Gateway response classification.
//!
//! The gateway answers HTTP 200 for both outcomes, with one of two bodies:
//!
//! - markup (the PayPay payment page) to hand to the payer's browser as is;
//! - a JSON envelope `{ "payNowIdResponse": {...}, "result": {...} }`.
//!
//! Both arrive in Shift_JIS. [`classify_response`] decodes the body with
//! [`LEGACY_ENCODING`] only to look at its first non-whitespace character:
//! `{` means JSON, anything else means markup. On the markup path the original
//! bytes are kept untouched, since re-encoding them would be lossy.

use bytes::Bytes;
use encoding_rs::Encoding;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    errors::{Error, Result},
    types::Operation,
};

/// Encoding the gateway uses for every response body.
pub static LEGACY_ENCODING: &Encoding = &encoding_rs::SHIFT_JIS_INIT;

/// `mstatus` value reported for a successful operation.
pub const SUCCESS_STATUS: &str = "success";

/// Returned by [`GatewayResult::error_message`] when the gateway gave none.
pub const FALLBACK_ERROR_MESSAGE: &str = "An unknown error occurred";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultStatus {
    Success,
    Failure,
}

/// Shape of a response body, as determined by its leading character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Json,
    Markup,
}

/// Decode `body` with [`LEGACY_ENCODING`] and sniff its leading character.
pub fn sniff_body(body: &[u8]) -> BodyKind {
    let (text, _) = LEGACY_ENCODING.decode_without_bom_handling(body);
    if text.trim_start().starts_with('{') {
        BodyKind::Json
    } else {
        BodyKind::Markup
    }
}

/// The gateway sends `null` for fields it has nothing to say about.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Member-management block of a JSON response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PayNowIdResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub process_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub account: serde_json::Map<String, serde_json::Value>,
}

/// The `result` block of a JSON response.
///
/// Which of the optional fields are present depends on the operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResultDetail {
    #[serde(deserialize_with = "null_as_default")]
    pub service_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub mstatus: String,
    #[serde(deserialize_with = "null_as_default")]
    pub v_result_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub merr_msg: String,
    #[serde(deserialize_with = "null_as_default")]
    pub march_txn: String,
    #[serde(deserialize_with = "null_as_default")]
    pub order_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cust_txn: String,
    #[serde(deserialize_with = "null_as_default")]
    pub txn_version: String,
    /// Authorize: payment page markup.
    pub response_contents: Option<String>,
    /// ReAuthorize.
    pub paypay_order_id: Option<String>,
    pub paypay_paid_datetime: Option<String>,
    pub original_order_id: Option<String>,
    pub center_order_id: Option<String>,
    /// Cancel.
    pub paypay_cancelled_datetime: Option<String>,
    /// Capture and Refund: amount left on the order.
    pub balance: Option<String>,
    pub paypay_captured_datetime: Option<String>,
    pub paypay_refunded_datetime: Option<String>,
    /// Terminate.
    pub paypay_terminated_datetime: Option<String>,
    pub user_key: Option<String>,
}

impl ResultDetail {
    /// The timestamp the gateway records for `operation`, if it has one.
    pub fn operation_timestamp(&self, operation: Operation) -> Option<&str> {
        match operation {
            Operation::Authorize => None,
            Operation::ReAuthorize => self.paypay_paid_datetime.as_deref(),
            Operation::Capture => self.paypay_captured_datetime.as_deref(),
            Operation::Cancel => self.paypay_cancelled_datetime.as_deref(),
            Operation::Refund => self.paypay_refunded_datetime.as_deref(),
            Operation::Terminate => self.paypay_terminated_datetime.as_deref(),
        }
    }
}

/// A decoded JSON response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    #[serde(default)]
    pub pay_now_id_response: Option<PayNowIdResponse>,
    #[serde(deserialize_with = "null_as_default")]
    pub result: ResultDetail,
}

/// Outcome of one operation as reported by the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResult {
    pub operation: Operation,
    pub status: ResultStatus,
    pub result_code: String,
    pub result_message: String,
    pub order_id: String,
    pub operation_timestamp: Option<String>,
    pub balance: Option<String>,
    /// Markup body, byte-identical to what the gateway sent.
    pub payload: Option<Bytes>,
    /// The full decoded record when the body was JSON.
    pub detail: Option<GatewayResponse>,
}

impl GatewayResult {
    pub fn is_success(&self) -> bool {
        self.status == ResultStatus::Success
    }

    /// The gateway's message, or [`FALLBACK_ERROR_MESSAGE`] if it sent none.
    pub fn error_message(&self) -> &str {
        if self.result_message.is_empty() {
            FALLBACK_ERROR_MESSAGE
        } else {
            &self.result_message
        }
    }

    /// Turn a gateway-reported failure into [`Error::Business`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::Business {
                result_code: self.result_code.clone(),
                message: self.error_message().to_owned(),
            })
        }
    }
}

/// Classify a raw 200 response body for `operation` on `order_id`.
///
/// `order_id` is the id that was sent; markup bodies do not echo it back.
pub fn classify_response(
    operation: Operation,
    order_id: &str,
    body: Bytes,
) -> Result<GatewayResult> {
    if sniff_body(&body) == BodyKind::Markup {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "{operation} for order '{order_id}' returned markup ({} bytes)",
            body.len()
        );

        return Ok(GatewayResult {
            operation,
            status: ResultStatus::Success,
            result_code: String::new(),
            result_message: String::new(),
            order_id: order_id.to_owned(),
            operation_timestamp: None,
            balance: None,
            payload: Some(body),
            detail: None,
        });
    }

    let (text, _) = LEGACY_ENCODING.decode_without_bom_handling(&body);
    let response: GatewayResponse =
        serde_json::from_str(&text).map_err(Error::MalformedResponse)?;
    let result = &response.result;

    let status = if result.mstatus == SUCCESS_STATUS {
        ResultStatus::Success
    } else {
        ResultStatus::Failure
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "{operation} for order '{order_id}' returned mstatus='{}' vResultCode='{}'",
        result.mstatus,
        result.v_result_code
    );

    Ok(GatewayResult {
        operation,
        status,
        result_code: result.v_result_code.clone(),
        result_message: result.merr_msg.clone(),
        order_id: if result.order_id.is_empty() {
            order_id.to_owned()
        } else {
            result.order_id.clone()
        },
        operation_timestamp: result.operation_timestamp(operation).map(str::to_owned),
        balance: result.balance.clone(),
        payload: None,
        detail: Some(response),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift_jis(text: &str) -> Bytes {
        let (bytes, _, had_errors) = LEGACY_ENCODING.encode(text);
        assert!(!had_errors);
        Bytes::from(bytes.into_owned())
    }

    #[test]
    fn test_markup_is_forwarded_byte_for_byte() {
        let page = "<html><head><meta charset=\"Shift_JIS\"></head><body>お支払い</body></html>";
        let body = shift_jis(page);
        let original = body.clone();

        let result = classify_response(Operation::Authorize, "T1", body).unwrap();

        assert!(result.is_success());
        assert_eq!(result.order_id, "T1");
        assert_eq!(result.payload.as_deref(), Some(original.as_ref()));
        assert!(result.detail.is_none());
    }

    #[test]
    fn test_json_failure_with_shift_jis_message() {
        let body = shift_jis(
            r#"  {"result":{"mstatus":"failure","vResultCode":"NH18000000000000","merrMsg":"取引IDが重複しています","orderId":"T1"}}"#,
        );

        let result = classify_response(Operation::Authorize, "T1", body).unwrap();

        assert!(!result.is_success());
        assert_eq!(result.status, ResultStatus::Failure);
        assert_eq!(result.result_code, "NH18000000000000");
        assert_eq!(result.error_message(), "取引IDが重複しています");
        assert!(result.payload.is_none());
    }

    #[test]
    fn test_json_success_maps_operation_fields() {
        let body = Bytes::from_static(
            br#"{
                "payNowIdResponse": {"processId": "p1", "status": "success", "message": "", "account": {}},
                "result": {
                    "mstatus": "success",
                    "vResultCode": "N001000000000000",
                    "merrMsg": "",
                    "orderId": "T1",
                    "balance": "600",
                    "paypayRefundedDatetime": "20250101120000"
                }
            }"#,
        );

        let result = classify_response(Operation::Refund, "T1", body).unwrap();

        assert!(result.is_success());
        assert_eq!(result.balance.as_deref(), Some("600"));
        assert_eq!(result.operation_timestamp.as_deref(), Some("20250101120000"));
        assert_eq!(
            result
                .detail
                .as_ref()
                .and_then(|d| d.pay_now_id_response.as_ref())
                .map(|p| p.process_id.as_str()),
            Some("p1")
        );
        assert!(result.error_for_status().is_ok());
    }

    #[test]
    fn test_missing_message_uses_fallback() {
        let body = Bytes::from_static(br#"{"result":{"mstatus":"failure","vResultCode":"X"}}"#);
        let result = classify_response(Operation::Cancel, "T1", body).unwrap();
        assert_eq!(result.error_message(), FALLBACK_ERROR_MESSAGE);

        match result.error_for_status() {
            Err(Error::Business {
                result_code,
                message,
            }) => {
                assert_eq!(result_code, "X");
                assert_eq!(message, FALLBACK_ERROR_MESSAGE);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_null_fields_are_treated_as_absent() {
        let body = Bytes::from_static(
            br#"{"result":{"mstatus":"failure","vResultCode":"NH18","merrMsg":null,"orderId":"T1","balance":null}}"#,
        );
        let result = classify_response(Operation::Capture, "T1", body).unwrap();

        assert_eq!(result.status, ResultStatus::Failure);
        assert_eq!(result.result_code, "NH18");
        assert_eq!(result.error_message(), FALLBACK_ERROR_MESSAGE);
        assert_eq!(result.balance, None);
        assert!(matches!(
            result.error_for_status(),
            Err(Error::Business { result_code, .. }) if result_code == "NH18"
        ));
    }

    #[test]
    fn test_null_member_block_fields_are_tolerated() {
        let body = Bytes::from_static(
            br#"{"payNowIdResponse":{"processId":null,"status":"failure","message":null,"account":null},
                "result":{"mstatus":"failure","vResultCode":null,"merrMsg":"NG","orderId":null}}"#,
        );
        let result = classify_response(Operation::Refund, "T1", body).unwrap();

        assert!(!result.is_success());
        assert_eq!(result.result_code, "");
        assert_eq!(result.error_message(), "NG");
        assert_eq!(result.order_id, "T1");

        let member = result
            .detail
            .and_then(|d| d.pay_now_id_response)
            .unwrap();
        assert!(member.account.is_empty());
        assert_eq!(member.status, "failure");
        assert_eq!(member.process_id, "");
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let body = Bytes::from_static(b"{ not json");
        assert!(matches!(
            classify_response(Operation::Capture, "T1", body),
            Err(Error::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_sniff_ignores_leading_whitespace() {
        assert_eq!(sniff_body(b"\r\n\t {\"result\":{}}"), BodyKind::Json);
        assert_eq!(sniff_body(b"<!DOCTYPE html>"), BodyKind::Markup);
        assert_eq!(sniff_body(b""), BodyKind::Markup);
    }
}
