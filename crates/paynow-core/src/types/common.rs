//! The generic key/value structure that request parameters are signed over.

use std::{collections::BTreeMap, fmt::Display};

use serde::Serialize;

use crate::errors::SigningError;

/// A parameter map ordered by the ordinal (byte) order of its keys.
///
/// `BTreeMap<String, _>` iterates in exactly the order the gateway sorts
/// keys in when it recomputes the hash.
pub type ParamMap = BTreeMap<String, ParamValue>;

/// A single parameter value.
///
/// Sequences are deliberately not representable. See
/// [`SigningError::SequenceValue`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    String(String),
    Number(serde_json::Number),
    Bool(bool),
    Map(ParamMap),
}

impl ParamValue {
    /// Whether this value is left out of the signing string.
    pub fn is_omitted(&self) -> bool {
        match self {
            ParamValue::Null => true,
            ParamValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ParamMap> {
        match self {
            ParamValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

/// Largest magnitude below which every integral `f64` is exact.
const MAX_SAFE_FLOAT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Natural string form of scalars. Maps render as nothing.
///
/// Integral floats drop their fraction (`1.0` renders as `1`), matching how
/// the gateway stringifies numbers when it recomputes the hash.
impl Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Null | ParamValue::Map(_) => Ok(()),
            ParamValue::String(s) => write!(f, "{s}"),
            ParamValue::Number(n) => match n.as_f64() {
                Some(x) if n.is_f64() && x.fract() == 0.0 && x.abs() < MAX_SAFE_FLOAT_INTEGER => {
                    write!(f, "{}", x as i64)
                }
                _ => write!(f, "{n}"),
            },
            ParamValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Number(value.into())
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        ParamValue::Number(value.into())
    }
}

impl From<ParamMap> for ParamValue {
    fn from(value: ParamMap) -> Self {
        ParamValue::Map(value)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

/// Build a [`ParamMap`] from `(key, value)` pairs.
///
/// ```
/// use paynow_core::types::{ParamValue, param_map};
///
/// let params = param_map([("orderId", ParamValue::from("T1")), ("amount", 1000u64.into())]);
/// assert_eq!(params.keys().collect::<Vec<_>>(), ["amount", "orderId"]);
/// ```
pub fn param_map<K, I>(pairs: I) -> ParamMap
where
    K: Into<String>,
    I: IntoIterator<Item = (K, ParamValue)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// Convert a JSON object into a [`ParamMap`].
///
/// Fails on anything but an object, and on any array at any depth.
pub fn params_from_json(value: serde_json::Value) -> Result<ParamMap, SigningError> {
    match value {
        serde_json::Value::Object(object) => object_to_map(object, None),
        _ => Err(SigningError::NotAnObject),
    }
}

fn object_to_map(
    object: serde_json::Map<String, serde_json::Value>,
    parent: Option<&str>,
) -> Result<ParamMap, SigningError> {
    object
        .into_iter()
        .map(|(key, value)| {
            let path = match parent {
                Some(parent) => format!("{parent}.{key}"),
                None => key.clone(),
            };
            json_to_value(value, &path).map(|v| (key, v))
        })
        .collect()
}

fn json_to_value(value: serde_json::Value, path: &str) -> Result<ParamValue, SigningError> {
    use serde_json::Value;

    Ok(match value {
        Value::Null => ParamValue::Null,
        Value::Bool(b) => ParamValue::Bool(b),
        Value::Number(n) => ParamValue::Number(n),
        Value::String(s) => ParamValue::String(s),
        Value::Object(object) => ParamValue::Map(object_to_map(object, Some(path))?),
        Value::Array(_) => {
            return Err(SigningError::SequenceValue {
                key: path.to_owned(),
            });
        }
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_json_object_converts_with_nesting() {
        let params = params_from_json(json!({
            "orderId": "T1",
            "amount": 1000,
            "force": true,
            "payNowIdParam": { "accountParam": { "accountId": "A1" } },
        }))
        .unwrap();

        assert_eq!(params["orderId"], ParamValue::from("T1"));
        assert_eq!(params["amount"], ParamValue::from(1000u64));
        assert_eq!(params["force"], ParamValue::Bool(true));
        let nested = params["payNowIdParam"].as_map().unwrap();
        assert_eq!(
            nested["accountParam"].as_map().unwrap()["accountId"].as_str(),
            Some("A1")
        );
    }

    #[test]
    fn test_integral_floats_render_without_fraction() {
        let params = params_from_json(json!({ "a": 1.0, "b": 1.5, "c": 100, "d": -2.0 })).unwrap();
        let rendered: Vec<String> = params.values().map(ToString::to_string).collect();
        assert_eq!(rendered, ["1", "1.5", "100", "-2"]);
    }

    #[test]
    fn test_sequences_are_rejected_with_their_path() {
        let err = params_from_json(json!({
            "payNowIdParam": { "tags": ["a", "b"] },
        }))
        .unwrap_err();

        match err {
            SigningError::SequenceValue { key } => assert_eq!(key, "payNowIdParam.tags"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(matches!(
            params_from_json(json!("orderId=T1")),
            Err(SigningError::NotAnObject)
        ));
    }

    #[test]
    fn test_serializes_as_plain_json() {
        let params = param_map([
            ("orderId", ParamValue::from("T1")),
            ("payNowIdParam", ParamValue::Map(ParamMap::new())),
            ("itemName", ParamValue::Null),
        ]);

        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({ "itemName": null, "orderId": "T1", "payNowIdParam": {} })
        );
    }
}
