//! Field-level validation error shared by review and recipe records.

use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why a field value was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationReason {
    /// Field is required but absent.
    Missing,
    /// Text is empty after trimming.
    Empty,
    /// Number is outside the accepted range.
    OutOfRange,
    /// Rating is not a multiple of the rating step.
    NotHalfStep,
    /// Number is NaN or infinite.
    NotFinite,
    /// Value has the wrong shape (type mismatch, unparsable date, ...).
    Malformed(String),
}

/// Rejection of one record, naming the offending field.
///
/// `field` uses the external (camelCase) field name, or `record` when the
/// whole value could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: ValidationReason) -> Self {
        Self { field, reason }
    }

    pub(crate) fn malformed(field: &'static str, message: impl Into<String>) -> Self {
        Self::new(field, ValidationReason::Malformed(message.into()))
    }
}

impl Display for ValidationReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "is required"),
            Self::Empty => write!(f, "must not be empty"),
            Self::OutOfRange => write!(f, "is out of range"),
            Self::NotHalfStep => write!(f, "must be a multiple of 0.5"),
            Self::NotFinite => write!(f, "must be a finite number"),
            Self::Malformed(message) => write!(f, "is malformed: {message}"),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "`{}` {}", self.field, self.reason)
    }
}

impl Error for ValidationError {}

/// Short name of a JSON value's type, for malformed-shape messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decodes an import `id`: text (trimmed) or an integer, `None` when absent.
pub(crate) fn import_id(value: Option<Value>) -> Result<Option<String>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.trim().to_string())),
        Some(Value::Number(number)) if number.is_u64() || number.is_i64() => {
            Ok(Some(number.to_string()))
        }
        Some(other) => Err(ValidationError::malformed(
            "id",
            format!("expected string or integer, got {}", json_kind(&other)),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{import_id, ValidationReason};
    use serde_json::json;

    #[test]
    fn import_id_accepts_text_and_integers_only() {
        assert_eq!(import_id(None).unwrap(), None);
        assert_eq!(import_id(Some(json!(null))).unwrap(), None);
        assert_eq!(import_id(Some(json!(" 7 "))).unwrap(), Some("7".to_string()));
        assert_eq!(import_id(Some(json!(-12))).unwrap(), Some("-12".to_string()));

        let float = import_id(Some(json!(1.5))).unwrap_err();
        assert_eq!(float.field, "id");
        assert!(matches!(float.reason, ValidationReason::Malformed(_)));
    }
}
