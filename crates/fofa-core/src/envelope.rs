//! The `{error, errmsg, ...payload}` wrapper every endpoint responds with.

use crate::decode::decode_page;
use crate::{FieldList, FofaError, Page, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A successful response envelope.
///
/// Constructing one already rejects `error: true` bodies, so holding an
/// `Envelope` means the payload is meant to be read.
#[derive(Debug, Clone)]
pub struct Envelope {
    payload: Map<String, Value>,
}

impl Envelope {
    /// Parse a raw response body
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body).map_err(|e| FofaError::Protocol {
            status: None,
            message: format!("response body is not JSON: {e}"),
        })?;
        Self::from_value(value)
    }

    /// Unwrap a decoded JSON body.
    ///
    /// A missing `error` flag counts as success; `info/my` omits it.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut payload) = value else {
            return Err(FofaError::Protocol {
                status: None,
                message: format!("expected a JSON object envelope, got {}", kind_of(&value)),
            });
        };

        let failed = payload.get("error").and_then(Value::as_bool).unwrap_or(false);
        if failed {
            let errmsg = payload
                .remove("errmsg")
                .and_then(|m| m.as_str().map(String::from))
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(FofaError::from_errmsg(&errmsg));
        }

        payload.remove("error");
        Ok(Self { payload })
    }

    /// Borrow the payload fields
    #[must_use]
    pub const fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Deserialize the payload into a typed response
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T> {
        serde_json::from_value(Value::Object(self.payload)).map_err(|e| FofaError::Protocol {
            status: None,
            message: format!("unexpected payload: {e}"),
        })
    }

    /// Decode a search page for the given field list
    pub fn into_page(self, fields: &FieldList) -> Result<Page> {
        decode_page(self.payload, fields)
    }
}

/// JSON type name for error messages
pub(crate) const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
