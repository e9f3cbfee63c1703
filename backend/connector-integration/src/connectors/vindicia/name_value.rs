//! Name/value pairs attached to Vindicia objects.
//!
//! Every value is sent as text, with one exception: the payment method `active` flag keeps
//! its boolean type.

use common_utils::CustomResult;
use domain_types::errors::ConnectorError;
use error_stack::report;
use hyperswitch_masking::Secret;
use serde::Serialize;
use serde_json::{Map, Value};

/// The only parameter whose boolean value is not turned into text.
pub const PAYMENT_METHOD_ACTIVE: &str = "vin_PaymentMethod_active";

/// A value as handed over by the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    Absent,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl<T: Into<Self>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

/// A value as it is sent to the connector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NormalizedValue {
    Text(String),
    Bool(bool),
}

impl NormalizedValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    fn xsi_type(&self) -> &'static str {
        match self {
            Self::Text(_) => "xsd:string",
            Self::Bool(_) => "xsd:boolean",
        }
    }

    fn to_xml_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Bool(value) => value.to_string(),
        }
    }
}

/// Applies the conversion rules to the value of the parameter `name`.
pub fn normalize(name: &str, value: RawValue) -> NormalizedValue {
    match value {
        RawValue::Absent => NormalizedValue::Text("null".to_string()),
        RawValue::Int(number) => NormalizedValue::Text(number.to_string()),
        RawValue::Float(number) => NormalizedValue::Text(number.to_string()),
        RawValue::Bool(flag) if name == PAYMENT_METHOD_ACTIVE => NormalizedValue::Bool(flag),
        RawValue::Bool(flag) => NormalizedValue::Text(flag.to_string()),
        RawValue::Text(text) => NormalizedValue::Text(text),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameValue {
    name: String,
    value: NormalizedValue,
}

impl NameValue {
    pub fn new(name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        let name = name.into();
        let value = normalize(&name, value.into());
        Self { name, value }
    }

    /// Builds a pair from untyped data.
    ///
    /// The name must be a string and the value a scalar or null.
    pub fn try_from_json(name: &Value, value: &Value) -> CustomResult<Self, ConnectorError> {
        let Value::String(name) = name else {
            return Err(report!(ConnectorError::InvalidArgument {
                message: format!(
                    "Parameter name must be type string, not {}",
                    json_type_name(name)
                ),
            }));
        };

        let raw_value = match value {
            Value::Null => RawValue::Absent,
            Value::Bool(flag) => RawValue::Bool(*flag),
            Value::Number(number) => match (number.as_i64(), number.as_u64(), number.as_f64()) {
                (Some(int), _, _) => RawValue::Int(int),
                // beyond the i64 range, still an integer
                (None, Some(unsigned), _) => RawValue::Text(unsigned.to_string()),
                (None, None, Some(float)) => RawValue::Float(float),
                (None, None, None) => RawValue::Text(number.to_string()),
            },
            Value::String(text) => RawValue::Text(text.clone()),
            Value::Array(_) | Value::Object(_) => {
                return Err(report!(ConnectorError::InvalidArgument {
                    message: format!(
                        "Invalid type {} for parameter value",
                        json_type_name(value)
                    ),
                }))
            }
        };

        Ok(Self::new(name.clone(), raw_value))
    }

    /// Turns an attribute map into pairs, in the iteration order of the map.
    pub fn from_attributes(
        attributes: &Map<String, Value>,
    ) -> CustomResult<Vec<Self>, ConnectorError> {
        attributes
            .iter()
            .map(|(name, value)| Self::try_from_json(&Value::String(name.clone()), value))
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &NormalizedValue {
        &self.value
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) if number.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `vin:NameValue` element.
#[derive(Debug, Serialize)]
pub struct SoapNameValue {
    #[serde(rename = "@xsi:type")]
    xsi_type: &'static str,
    name: String,
    value: SoapTypedValue,
}

#[derive(Debug, Serialize)]
pub struct SoapTypedValue {
    #[serde(rename = "@xsi:type")]
    xsi_type: &'static str,
    #[serde(rename = "$text")]
    value: SoapText,
}

/// Text content of a value; sensitive text is masked in the logged form of a request.
#[derive(Debug)]
enum SoapText {
    Plain(String),
    Sensitive(Secret<String>),
}

impl Serialize for SoapText {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Plain(text) => text.serialize(serializer),
            Self::Sensitive(secret) => secret.serialize(serializer),
        }
    }
}

impl SoapNameValue {
    /// A text pair whose value must not show up in logs.
    pub fn sensitive(name: impl Into<String>, value: Secret<String>) -> Self {
        Self {
            xsi_type: "vin:NameValue",
            name: name.into(),
            value: SoapTypedValue {
                xsi_type: "xsd:string",
                value: SoapText::Sensitive(value),
            },
        }
    }
}

impl From<&NameValue> for SoapNameValue {
    fn from(pair: &NameValue) -> Self {
        Self {
            xsi_type: "vin:NameValue",
            name: pair.name.clone(),
            value: SoapTypedValue {
                xsi_type: pair.value.xsi_type(),
                value: SoapText::Plain(pair.value.to_xml_text()),
            },
        }
    }
}
