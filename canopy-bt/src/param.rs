#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("node `{node}` has no parameter `{param}`")]
    Unknown { node: &'static str, param: String },

    #[error("parameter `{param}` expects {expected}, got {found}")]
    Type {
        param: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("parameter `{param}` is invalid: {reason}")]
    Invalid { param: String, reason: String },
}

impl ParamError {
    pub fn unknown(node: &'static str, param: &str) -> Self {
        ParamError::Unknown {
            node,
            param: param.to_owned(),
        }
    }

    pub fn invalid(param: &str, reason: impl Into<String>) -> Self {
        ParamError::Invalid {
            param: param.to_owned(),
            reason: reason.into(),
        }
    }
}

/// A node parameter as it appears in a tree description.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    pub fn kind(&self) -> &'static str {
        match self {
            ParamValue::Bool(_) => "bool",
            ParamValue::Int(_) => "int",
            ParamValue::Float(_) => "float",
            ParamValue::Text(_) => "text",
        }
    }

    pub fn as_bool(&self, param: &str) -> Result<bool, ParamError> {
        match self {
            ParamValue::Bool(b) => Ok(*b),
            other => Err(other.mismatch(param, "bool")),
        }
    }

    pub fn as_int(&self, param: &str) -> Result<i64, ParamError> {
        match self {
            ParamValue::Int(i) => Ok(*i),
            other => Err(other.mismatch(param, "int")),
        }
    }

    /// Integers are accepted where a float is expected.
    pub fn as_float(&self, param: &str) -> Result<f64, ParamError> {
        match self {
            ParamValue::Float(f) => Ok(*f),
            ParamValue::Int(i) => Ok(*i as f64),
            other => Err(other.mismatch(param, "float")),
        }
    }

    pub fn as_text(&self, param: &str) -> Result<&str, ParamError> {
        match self {
            ParamValue::Text(s) => Ok(s),
            other => Err(other.mismatch(param, "text")),
        }
    }

    /// Non-negative integer that fits in `u32`.
    pub fn as_count(&self, param: &str) -> Result<u32, ParamError> {
        let value = self.as_int(param)?;
        u32::try_from(value)
            .map_err(|_| ParamError::invalid(param, format!("{value} is not a valid count")))
    }

    fn mismatch(&self, param: &str, expected: &'static str) -> ParamError {
        ParamError::Type {
            param: param.to_owned(),
            expected,
            found: self.kind(),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        ParamValue::Float(value.into())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}
