//! Decoded page-method responses.

use serde_json::{Map, Value};

/// A loosely typed record as returned by the portal (match, player, event...).
pub type Record = Map<String, Value>;

/// The value carried inside a page-method response, after unwrapping.
///
/// The portal decides per endpoint, and sometimes per call, whether it sends
/// an object, an array, a plain string or nothing at all.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Object(Record),
    List(Vec<Value>),
    Text(String),
    /// `null` or an empty response body.
    Empty,
    /// A bare number or boolean.
    Scalar(Value),
}

impl Payload {
    /// Decodes an ASP.NET page-method response body.
    ///
    /// Bodies are normally wrapped as `{"d": <value>}`. A string value is
    /// itself JSON and is parsed a second time; when that fails the raw
    /// string is kept. Bodies without a `"d"` key are returned whole.
    pub fn from_envelope(body: Value) -> Self {
        match body {
            Value::Object(mut map) if map.contains_key("d") => match map.remove("d") {
                Some(Value::String(raw)) => match serde_json::from_str::<Value>(&raw) {
                    Ok(inner) => Payload::from(inner),
                    Err(_) => {
                        tracing::debug!("Response 'd' value is not JSON, keeping it as text");
                        Payload::Text(raw)
                    }
                },
                Some(inner) => Payload::from(inner),
                None => Payload::Empty,
            },
            other => {
                tracing::debug!("Response has no 'd' key, using the full body");
                Payload::from(other)
            }
        }
    }

    /// Name of the variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Payload::Object(_) => "object",
            Payload::List(_) => "list",
            Payload::Text(_) => "text",
            Payload::Empty => "empty",
            Payload::Scalar(_) => "scalar",
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Payload::Object(map) => Value::Object(map),
            Payload::List(items) => Value::Array(items),
            Payload::Text(text) => Value::String(text),
            Payload::Empty => Value::Null,
            Payload::Scalar(value) => value,
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Payload::Object(map),
            Value::Array(items) => Payload::List(items),
            Value::String(text) => Payload::Text(text),
            Value::Null => Payload::Empty,
            scalar => Payload::Scalar(scalar),
        }
    }
}

/// The response shape an endpoint is expected to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Object,
    List,
    ObjectOrList,
    /// Write endpoints that answer with nothing or a status object.
    Acknowledgement,
}

impl Shape {
    pub fn accepts(&self, payload: &Payload) -> bool {
        match self {
            Shape::Object => matches!(payload, Payload::Object(_)),
            Shape::List => matches!(payload, Payload::List(_)),
            Shape::ObjectOrList => matches!(payload, Payload::Object(_) | Payload::List(_)),
            Shape::Acknowledgement => !matches!(payload, Payload::List(_)),
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Shape::Object => "object",
                Shape::List => "list",
                Shape::ObjectOrList => "object or list",
                Shape::Acknowledgement => "acknowledgement",
            }
        )
    }
}
