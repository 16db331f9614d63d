//! Operation-specific request parameters.
//!
//! Each operation has a caller-facing request type built with a `bon`
//! builder. [`OperationParams::build`] validates it and merges it with the
//! fields derived from [`ClientConfig`], which callers cannot override because
//! the request types do not carry them.
//!
//! ```
//! use paynow_core::{
//!     config::ClientConfig,
//!     params::{AuthorizeRequest, OperationParams},
//! };
//!
//! let config = ClientConfig::builder().merchant_ccid("M1").secret("S1").build();
//! let request = AuthorizeRequest::builder()
//!     .order_id("T1")
//!     .item_id("I1")
//!     .amount("1000")
//!     .build();
//!
//! let params = OperationParams::build(request, &config).unwrap();
//! let envelope = params.sign(config.secret()).unwrap();
//! assert_eq!(envelope.auth_hash().len(), 64);
//! ```

use bon::Builder;
use serde::{Serialize, Serializer};

use crate::{
    config::ClientConfig,
    errors::{SigningError, ValidationError},
    signing::SignedEnvelope,
    types::{Operation, ParamMap, params_from_json},
    validation,
};

/// Value of `serviceOptionType` for every PayPay request.
pub const SERVICE_OPTION_TYPE: &str = "online";

/// How an authorized order is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum AccountingType {
    /// Charge the given amount now. `amount` is required.
    #[default]
    #[serde(rename = "0")]
    OneTime,
    /// Register for later charges via ReAuthorize. `amount` is forbidden.
    #[serde(rename = "1")]
    Deferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TransitionType {
    /// The payer arrives from the PayPay app.
    #[serde(rename = "1")]
    App,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ExtendParameterType {
    #[default]
    #[serde(rename = "0")]
    Disabled,
    #[serde(rename = "1")]
    Enabled,
}

/// A caller-facing request for one operation.
pub trait OperationRequest: Serialize + Sized {
    const OPERATION: Operation;

    fn order_id(&self) -> &str;

    /// Check every caller-supplied field. Runs before anything is signed.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Member-management parameters, sent as `payNowIdParam`.
    fn pay_now_id_param(&self) -> Option<&ParamMap>;

    fn wrap(params: Params<Self>) -> OperationParams;
}

/// Fields derived from the client configuration, shared by every operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseFields {
    service_option_type: &'static str,
    pay_now_id_param: ParamMap,
    txn_version: String,
    dummy_request: &'static str,
    merchant_ccid: String,
}

impl BaseFields {
    pub fn from_config(config: &ClientConfig, pay_now_id_param: Option<ParamMap>) -> Self {
        BaseFields {
            service_option_type: SERVICE_OPTION_TYPE,
            pay_now_id_param: pay_now_id_param.unwrap_or_default(),
            txn_version: config.txn_version().to_owned(),
            dummy_request: config.environment().dummy_request_flag(),
            merchant_ccid: config.merchant_ccid().to_owned(),
        }
    }

    pub fn merchant_ccid(&self) -> &str {
        &self.merchant_ccid
    }

    pub fn txn_version(&self) -> &str {
        &self.txn_version
    }

    pub fn dummy_request(&self) -> &str {
        self.dummy_request
    }
}

/// A validated request merged with its [`BaseFields`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Params<R> {
    #[serde(flatten)]
    request: R,
    #[serde(flatten)]
    base: BaseFields,
}

impl<R> Params<R> {
    pub fn request(&self) -> &R {
        &self.request
    }

    pub fn base(&self) -> &BaseFields {
        &self.base
    }
}

/// Parameters for one of the six operations, ready to be signed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OperationParams {
    Authorize(Params<AuthorizeRequest>),
    ReAuthorize(Params<ReAuthorizeRequest>),
    Capture(Params<CaptureRequest>),
    Cancel(Params<CancelRequest>),
    Refund(Params<RefundRequest>),
    Terminate(Params<TerminateRequest>),
}

impl OperationParams {
    /// Validate `request` and merge it with the defaults from `config`.
    pub fn build<R: OperationRequest>(
        request: R,
        config: &ClientConfig,
    ) -> Result<Self, ValidationError> {
        request.validate()?;
        let base = BaseFields::from_config(config, request.pay_now_id_param().cloned());
        Ok(R::wrap(Params { request, base }))
    }

    pub fn operation(&self) -> Operation {
        match self {
            OperationParams::Authorize(_) => Operation::Authorize,
            OperationParams::ReAuthorize(_) => Operation::ReAuthorize,
            OperationParams::Capture(_) => Operation::Capture,
            OperationParams::Cancel(_) => Operation::Cancel,
            OperationParams::Refund(_) => Operation::Refund,
            OperationParams::Terminate(_) => Operation::Terminate,
        }
    }

    pub fn order_id(&self) -> &str {
        match self {
            OperationParams::Authorize(p) => p.request.order_id(),
            OperationParams::ReAuthorize(p) => p.request.order_id(),
            OperationParams::Capture(p) => p.request.order_id(),
            OperationParams::Cancel(p) => p.request.order_id(),
            OperationParams::Refund(p) => p.request.order_id(),
            OperationParams::Terminate(p) => p.request.order_id(),
        }
    }

    /// Flatten into the generic structure the signer works on.
    pub fn to_param_map(&self) -> Result<ParamMap, SigningError> {
        params_from_json(serde_json::to_value(self)?)
    }

    pub fn sign(&self, secret: &str) -> Result<SignedEnvelope, SigningError> {
        SignedEnvelope::sign(self.to_param_map()?, secret)
    }
}

fn serialize_flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "true" } else { "false" })
}

fn serialize_optional_flag<S: Serializer>(
    value: &Option<bool>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(value) => serialize_flag(value, serializer),
        None => serializer.serialize_none(),
    }
}

/// Run `check` on a present, non-empty optional field.
fn check_optional(
    value: &Option<String>,
    check: impl FnOnce(&str) -> Result<(), ValidationError>,
) -> Result<(), ValidationError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => check(v),
        _ => Ok(()),
    }
}

fn check_redirect_urls(
    success_url: &Option<String>,
    cancel_url: &Option<String>,
    error_url: &Option<String>,
    push_url: &Option<String>,
) -> Result<(), ValidationError> {
    check_optional(success_url, |v| validation::validate_url("successUrl", v))?;
    check_optional(cancel_url, |v| validation::validate_url("cancelUrl", v))?;
    check_optional(error_url, |v| validation::validate_url("errorUrl", v))?;
    check_optional(push_url, validation::validate_push_url)
}

/// Authorize: create a new order.
#[derive(Builder, Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeRequest {
    #[builder(into)]
    pub order_id: String,
    #[builder(default)]
    pub accounting_type: AccountingType,
    /// Required for [`AccountingType::OneTime`], forbidden for [`AccountingType::Deferred`].
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[builder(into)]
    pub item_id: String,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_url: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_type: Option<TransitionType>,
    #[builder(default)]
    pub extend_parameter_type: ExtendParameterType,
    #[serde(skip)]
    pub pay_now_id_param: Option<ParamMap>,
}

impl OperationRequest for AuthorizeRequest {
    const OPERATION: Operation = Operation::Authorize;

    fn order_id(&self) -> &str {
        &self.order_id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_order_id(&self.order_id)?;
        validation::validate_item_id(&self.item_id)?;

        let amount = self.amount.as_deref().filter(|a| !a.is_empty());
        match (self.accounting_type, amount) {
            (AccountingType::OneTime, Some(amount)) => validation::validate_amount(amount)?,
            (AccountingType::OneTime, None) => {
                return Err(ValidationError::Missing { field: "amount" });
            }
            (AccountingType::Deferred, Some(_)) => {
                return Err(ValidationError::Forbidden { field: "amount" });
            }
            (AccountingType::Deferred, None) => {}
        }

        check_redirect_urls(
            &self.success_url,
            &self.cancel_url,
            &self.error_url,
            &self.push_url,
        )
    }

    fn pay_now_id_param(&self) -> Option<&ParamMap> {
        self.pay_now_id_param.as_ref()
    }

    fn wrap(params: Params<Self>) -> OperationParams {
        OperationParams::Authorize(params)
    }
}

/// ReAuthorize: charge an existing deferred-accounting order.
#[derive(Builder, Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReAuthorizeRequest {
    /// New order id for this charge.
    #[builder(into)]
    pub order_id: String,
    /// Order id of the original deferred-accounting Authorize.
    #[builder(into)]
    pub original_order_id: String,
    #[builder(into)]
    pub amount: String,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    /// Keep a payment request open when the payer's balance is insufficient.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_flag"
    )]
    pub nsf_recovery_flag: Option<bool>,
    /// Deadline for the recovery request, `YYYYMMDDhhmmss`.
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nsf_recovery_expired_datetime: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_url: Option<String>,
    #[serde(skip)]
    pub pay_now_id_param: Option<ParamMap>,
}

impl OperationRequest for ReAuthorizeRequest {
    const OPERATION: Operation = Operation::ReAuthorize;

    fn order_id(&self) -> &str {
        &self.order_id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_order_id(&self.order_id)?;
        validation::order_id("originalOrderId", &self.original_order_id)?;
        validation::validate_amount(&self.amount)?;
        check_optional(&self.item_id, validation::validate_item_id)?;
        check_optional(&self.nsf_recovery_expired_datetime, |v| {
            validation::validate_datetime("nsfRecoveryExpiredDatetime", v)
        })?;
        check_optional(&self.push_url, validation::validate_push_url)
    }

    fn pay_now_id_param(&self) -> Option<&ParamMap> {
        self.pay_now_id_param.as_ref()
    }

    fn wrap(params: Params<Self>) -> OperationParams {
        OperationParams::ReAuthorize(params)
    }
}

/// Capture: settle an authorized order.
#[derive(Builder, Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureRequest {
    #[builder(into)]
    pub order_id: String,
    /// Defaults to the full authorized amount when omitted.
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_description: Option<String>,
    #[serde(skip)]
    pub pay_now_id_param: Option<ParamMap>,
}

impl OperationRequest for CaptureRequest {
    const OPERATION: Operation = Operation::Capture;

    fn order_id(&self) -> &str {
        &self.order_id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_order_id(&self.order_id)?;
        check_optional(&self.amount, validation::validate_amount)?;
        check_optional(&self.order_description, |v| {
            validation::max_chars(
                "orderDescription",
                v,
                validation::ORDER_DESCRIPTION_MAX_CHARS,
            )
        })
    }

    fn pay_now_id_param(&self) -> Option<&ParamMap> {
        self.pay_now_id_param.as_ref()
    }

    fn wrap(params: Params<Self>) -> OperationParams {
        OperationParams::Capture(params)
    }
}

/// Cancel: void an order before capture.
#[derive(Builder, Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    #[builder(into)]
    pub order_id: String,
    #[serde(skip)]
    pub pay_now_id_param: Option<ParamMap>,
}

impl OperationRequest for CancelRequest {
    const OPERATION: Operation = Operation::Cancel;

    fn order_id(&self) -> &str {
        &self.order_id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_order_id(&self.order_id)
    }

    fn pay_now_id_param(&self) -> Option<&ParamMap> {
        self.pay_now_id_param.as_ref()
    }

    fn wrap(params: Params<Self>) -> OperationParams {
        OperationParams::Cancel(params)
    }
}

/// Refund: return captured funds. Repeatable while a balance remains.
#[derive(Builder, Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    #[builder(into)]
    pub order_id: String,
    /// Defaults to the full captured amount when omitted.
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip)]
    pub pay_now_id_param: Option<ParamMap>,
}

impl OperationRequest for RefundRequest {
    const OPERATION: Operation = Operation::Refund;

    fn order_id(&self) -> &str {
        &self.order_id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_order_id(&self.order_id)?;
        check_optional(&self.amount, validation::validate_amount)
    }

    fn pay_now_id_param(&self) -> Option<&ParamMap> {
        self.pay_now_id_param.as_ref()
    }

    fn wrap(params: Params<Self>) -> OperationParams {
        OperationParams::Refund(params)
    }
}

/// Terminate: end a deferred-accounting subscription.
#[derive(Builder, Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminateRequest {
    #[builder(into)]
    pub order_id: String,
    /// Terminate without waiting for the payer's confirmation.
    #[builder(default)]
    #[serde(serialize_with = "serialize_flag")]
    pub force: bool,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_url: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_url: Option<String>,
    #[serde(skip)]
    pub pay_now_id_param: Option<ParamMap>,
}

impl OperationRequest for TerminateRequest {
    const OPERATION: Operation = Operation::Terminate;

    fn order_id(&self) -> &str {
        &self.order_id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_order_id(&self.order_id)?;
        check_redirect_urls(
            &self.success_url,
            &self.cancel_url,
            &self.error_url,
            &self.push_url,
        )
    }

    fn pay_now_id_param(&self) -> Option<&ParamMap> {
        self.pay_now_id_param.as_ref()
    }

    fn wrap(params: Params<Self>) -> OperationParams {
        OperationParams::Terminate(params)
    }
}
