//! Payload encoding.

use serde::Serialize;
use serde_json::Value;

use crate::{FluentHttpError, Result};

/// How an outgoing payload is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyFormat {
    /// `application/json`.
    #[default]
    Json,
    /// `application/x-www-form-urlencoded`.
    Form,
    /// `multipart/form-data`; the transport supplies the boundary.
    Multipart,
}

impl BodyFormat {
    /// The content type the builder sets for this format, if any.
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Json => Some("application/json"),
            Self::Form => Some("application/x-www-form-urlencoded"),
            Self::Multipart => None,
        }
    }
}

/// A serialized payload awaiting encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload(Value);

impl Payload {
    /// Serialize any value into a payload.
    pub fn new<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Self)
            .map_err(|e| FluentHttpError::Encode(e.to_string()))
    }

    /// The underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Own entries of the payload, in order, with values stringified.
    ///
    /// Accepts an object or a sequence of `[key, value]` pairs. Pairs may
    /// repeat a key; objects cannot.
    pub fn entries(&self) -> Result<Vec<(String, String)>> {
        match &self.0 {
            Value::Object(map) => Ok(map
                .iter()
                .map(|(k, v)| (k.clone(), stringify(v)))
                .collect()),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Array(pair) if pair.len() == 2 => {
                        Ok((stringify(&pair[0]), stringify(&pair[1])))
                    }
                    other => Err(FluentHttpError::Encode(format!(
                        "expected a [key, value] pair, found {}",
                        other
                    ))),
                })
                .collect(),
            other => Err(FluentHttpError::Encode(format!(
                "expected an object or key/value pairs, found {}",
                other
            ))),
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Stringify a JSON value the way a query string or form field expects.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// An encoded request body.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EncodedBody {
    /// No body.
    #[default]
    Empty,
    /// JSON document; the transport serializes it.
    Json(Value),
    /// Form fields, keys unique.
    Form(Vec<(String, String)>),
    /// Multipart text parts, keys may repeat.
    Multipart(Vec<(String, String)>),
}

impl EncodedBody {
    /// Encode a payload for the given format.
    pub fn encode(format: BodyFormat, payload: &Payload) -> Result<Self> {
        match format {
            BodyFormat::Json => Ok(Self::Json(payload.as_value().clone())),
            BodyFormat::Form => Ok(Self::Form(encode_form(payload.entries()?))),
            BodyFormat::Multipart => Ok(Self::Multipart(payload.entries()?)),
        }
    }

    /// Check if there is no body.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Later duplicates overwrite the value at the first occurrence's position.
fn encode_form(entries: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut fields: Vec<(String, String)> = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        match fields.iter_mut().find(|(k, _)| *k == key) {
            Some(field) => field.1 = value,
            None => fields.push((key, value)),
        }
    }
    fields
}
