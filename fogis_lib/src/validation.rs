//! Input checks applied before any request leaves the client.

use chrono::NaiveDate;
use fogis_api::Record;
use serde_json::Value;

use crate::error::FogisError;

/// Identifier given either as a number or as a numeric string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdInput {
    Int(i64),
    Text(String),
}

impl IdInput {
    /// Resolves to the integer the portal expects. `field` names the
    /// identifier in the error message.
    pub fn resolve(&self, field: &str) -> Result<i64, FogisError> {
        match self {
            IdInput::Int(n) => Ok(*n),
            IdInput::Text(s) => parse_integer(field, s),
        }
    }
}

impl From<i64> for IdInput {
    fn from(n: i64) -> Self {
        IdInput::Int(n)
    }
}

impl From<i32> for IdInput {
    fn from(n: i32) -> Self {
        IdInput::Int(n.into())
    }
}

impl From<u32> for IdInput {
    fn from(n: u32) -> Self {
        IdInput::Int(n.into())
    }
}

impl From<&str> for IdInput {
    fn from(s: &str) -> Self {
        IdInput::Text(s.to_string())
    }
}

impl From<String> for IdInput {
    fn from(s: String) -> Self {
        IdInput::Text(s)
    }
}

impl From<&String> for IdInput {
    fn from(s: &String) -> Self {
        IdInput::Text(s.clone())
    }
}

fn parse_integer(field: &str, input: &str) -> Result<i64, FogisError> {
    input.trim().parse::<i64>().map_err(|_| {
        FogisError::InvalidInput(format!(
            "{} must be an integer or numeric string, got '{}'",
            field, input
        ))
    })
}

/// Fails with the first field of `required` missing from `data`.
/// `what` names the record kind in the message, e.g. "event".
pub fn require_fields(data: &Record, required: &[&str], what: &str) -> Result<(), FogisError> {
    for field in required {
        if !data.contains_key(*field) {
            tracing::error!("Missing required field '{}' in {} data", field, what);
            return Err(FogisError::InvalidInput(format!(
                "missing required field '{}' in {} data",
                field, what
            )));
        }
    }
    Ok(())
}

/// Converts the listed fields to JSON integers in place.
///
/// Numeric strings are parsed, integers are kept, absent or null fields are
/// left alone. Anything else is rejected.
pub fn coerce_integer_fields(data: &mut Record, fields: &[&str]) -> Result<(), FogisError> {
    for field in fields {
        let Some(value) = data.get_mut(*field) else {
            continue;
        };
        match value {
            Value::Null => {}
            Value::Number(n) if n.is_i64() || n.is_u64() => {}
            Value::String(s) => {
                let parsed = parse_integer(field, s)?;
                *value = Value::from(parsed);
            }
            other => {
                return Err(FogisError::InvalidInput(format!(
                    "{} must be an integer, got {}",
                    field, other
                )));
            }
        }
    }
    Ok(())
}

/// Validate a YYYY-MM-DD date string.
pub fn validate_date(input: &str) -> Result<NaiveDate, FogisError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        FogisError::InvalidInput(format!(
            "invalid date '{}'. Expected format: YYYY-MM-DD (e.g., 2026-04-12)",
            trimmed
        ))
    })
}

/// Validate the portal's date type: 0 relative, 1 fixed.
pub fn validate_date_type(input: &str) -> Result<i64, FogisError> {
    match input.trim() {
        "0" => Ok(0),
        "1" => Ok(1),
        other => Err(FogisError::InvalidInput(format!(
            "invalid date type '{}'. Valid values: 0, 1",
            other
        ))),
    }
}
