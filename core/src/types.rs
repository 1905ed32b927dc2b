//! Wire-level DTOs shared by every resource.
//!
//! # Design
//! The backend wraps every answer in the same `{ status, msg, result }`
//! message. Only `result` and `msg` matter to the client. `status` mirrors
//! the HTTP code and is not modelled at all, so whatever shape it takes never
//! fails the decode. Request payloads are either a JSON value or a multipart
//! form, never both.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ApiError;
use crate::http::MultipartForm;

/// Response envelope returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    /// Only string messages are kept; any other shape reads as absent.
    #[serde(default, deserialize_with = "text_only", skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    pub result: Option<T>,
}

fn text_only<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(text)) => Ok(Some(text)),
        _ => Ok(None),
    }
}

/// Request payload for `create` and `update`.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

impl Payload {
    /// Encode any serializable value as a JSON payload.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ApiError> {
        serde_json::to_value(value)
            .map(Payload::Json)
            .map_err(|e| ApiError::Serialization(e.to_string()))
    }
}

/// An empty JSON object, matching the `data = {}` default of mutating calls.
impl Default for Payload {
    fn default() -> Self {
        Payload::Json(serde_json::Value::Object(serde_json::Map::new()))
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Payload::Json(value)
    }
}

impl From<MultipartForm> for Payload {
    fn from(form: MultipartForm) -> Self {
        Payload::Multipart(form)
    }
}
