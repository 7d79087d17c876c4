//! Errors from typed reads on dynamic records

use std::fmt;

use serde_json::Value;

/// Shape of a JSON value, as named in [`FieldError`] messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonKind {
    Null,
    Bool,
    /// A number that fits in `i64`.
    Integer,
    /// A number above `i64::MAX`.
    UnsignedInteger,
    Float,
    String,
    Array,
    Object,
}

impl JsonKind {
    /// Returns the kind of a value. Numbers report the narrowest kind that holds them.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(n) if n.is_i64() => Self::Integer,
            Value::Number(n) if n.is_u64() => Self::UnsignedInteger,
            Value::Number(_) => Self::Float,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Integer => "integer",
            Self::UnsignedInteger => "unsigned integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        })
    }
}

/// A typed getter on [`Record`](crate::model::Record) could not produce a value.
///
/// `key` is the name the caller asked for. Items of an array are named `key[index]`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("record has no `{key}` key")]
    Missing { key: String },

    #[error("`{key}` holds {actual}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: JsonKind,
        actual: JsonKind,
    },
}

impl FieldError {
    pub(crate) fn missing(key: impl Into<String>) -> Self {
        Self::Missing { key: key.into() }
    }

    pub(crate) fn mismatch(key: impl Into<String>, expected: JsonKind, found: &Value) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected,
            actual: JsonKind::of(found),
        }
    }

    /// Returns the key the getter was asked for.
    pub fn key(&self) -> &str {
        match self {
            Self::Missing { key } | Self::TypeMismatch { key, .. } => key,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_numbers_report_narrowest_kind() {
        assert_eq!(JsonKind::of(&json!(-3)), JsonKind::Integer);
        assert_eq!(JsonKind::of(&json!(u64::MAX)), JsonKind::UnsignedInteger);
        assert_eq!(JsonKind::of(&json!(0.5)), JsonKind::Float);
    }

    #[test]
    fn test_messages_name_the_key() {
        let error = FieldError::mismatch("exp_level", JsonKind::Integer, &json!("13"));
        assert_eq!(error.to_string(), "`exp_level` holds string, expected integer");
        assert_eq!(error.key(), "exp_level");
        assert_eq!(FieldError::missing("clan").to_string(), "record has no `clan` key");
    }
}
