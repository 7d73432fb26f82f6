//! Field bags and helpers for document-store records.
//!
//! Stored records are schemaless maps of field name to JSON value. The
//! typed models in this crate convert to and from these bags; the helpers
//! here keep that conversion consistent across record types.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// The field set of a stored document, keyed by field name.
pub type Fields = Map<String, Value>;

/// Errors that can occur when converting a stored record.
#[derive(thiserror::Error, Debug, Clone)]
pub enum FieldError {
    /// A required field is absent.
    #[error("missing required field `{name}`")]
    Missing {
        /// Name of the absent field.
        name: &'static str,
    },
    /// A field is present but does not hold a usable value.
    #[error("field `{name}` is invalid: {reason}")]
    Invalid {
        /// Name of the offending field.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },
    /// The record body could not be decoded at all.
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Remove fields that carry no information.
///
/// `Null` values and empty strings are dropped before a record is written,
/// so stored documents never accumulate blank fields. `false`, `0`, and
/// empty arrays are kept.
pub fn prune_fields(fields: &mut Fields) {
    fields.retain(|_, value| match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    });
}

/// Serialize a record into a field bag.
pub(crate) fn to_field_map<T: Serialize>(record: &T) -> Result<Fields, FieldError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(FieldError::Malformed(
            "record did not serialize to an object".to_owned(),
        )),
        Err(e) => Err(FieldError::Malformed(e.to_string())),
    }
}

/// Deserialize a record from a field bag.
pub(crate) fn from_field_map<T: DeserializeOwned>(fields: &Fields) -> Result<T, FieldError> {
    serde_json::from_value(Value::Object(fields.clone()))
        .map_err(|e| FieldError::Malformed(e.to_string()))
}

/// Treat an empty or missing string as absent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
