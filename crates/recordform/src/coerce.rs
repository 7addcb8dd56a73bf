//! Per-type coercion
//!
//! Turns one raw payload value into the declared field type or a
//! [`FieldError`]. Type failures read `Invalid value for <type>: <reason>`;
//! selection membership failures carry their own message.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::SchemaConfig;
use crate::errors::FieldError;
use crate::fields::{FieldSpec, FieldType};
use crate::types::Value;

/// Coerce one raw payload value according to `spec`
///
/// `null` is an ordinary input here and fails every type.
pub fn coerce(spec: &FieldSpec, value: &Value, config: &SchemaConfig) -> Result<Value, FieldError> {
    let type_name = spec.field_type.as_str();
    let mismatch = |reason: String| FieldError::type_mismatch(type_name, reason);

    match spec.field_type {
        FieldType::Char | FieldType::Text => coerce_string(value).map_err(mismatch),
        FieldType::Integer => coerce_integer(value).map_err(mismatch),
        FieldType::Float => coerce_float(value).map_err(mismatch),
        FieldType::Boolean => match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::Null => Err(mismatch("Expected boolean, got null".to_string())),
            _ => Err(mismatch("Expected boolean".to_string())),
        },
        FieldType::Date => coerce_date(value, &config.date_format).map_err(mismatch),
        FieldType::DateTime => coerce_datetime(value, config).map_err(mismatch),
        FieldType::Selection => coerce_selection(value, spec.allowed(), type_name),
        FieldType::List => match value {
            Value::List(_) => Ok(value.clone()),
            Value::Null => Err(mismatch("Expected list (ex. [1, 2, 3]), got null.".to_string())),
            _ => Err(mismatch("Expected list (ex. [1, 2, 3]).".to_string())),
        },
        FieldType::Dict => match value {
            Value::Object(_) => Ok(value.clone()),
            Value::Null => Err(mismatch("Expected dict (JSON object), got null.".to_string())),
            _ => Err(mismatch("Expected dict (JSON object).".to_string())),
        },
    }
}

// ============================================================================
// Scalars
// ============================================================================

fn coerce_string(value: &Value) -> Result<Value, String> {
    match value {
        Value::String(s) => Ok(Value::String(s.clone())),
        Value::Int(_) | Value::Float(_) => Err("Expected string, got number".to_string()),
        other => Err(format!("Expected string, got {}", other.type_name())),
    }
}

fn coerce_integer(value: &Value) -> Result<Value, String> {
    const EXPECTED: &str = "Expected integer";

    match value {
        Value::Int(i) => Ok(Value::Int(*i)),
        Value::Float(f) => integral(*f).map(Value::Int).ok_or_else(|| EXPECTED.to_string()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Ok(Value::Int(i));
            }
            s.parse::<f64>()
                .ok()
                .and_then(integral)
                .map(Value::Int)
                .ok_or_else(|| EXPECTED.to_string())
        }
        Value::Null => Err(format!("{}, got null", EXPECTED)),
        _ => Err(EXPECTED.to_string()),
    }
}

/// `f` as i64 when it has no fractional part and fits
fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn coerce_float(value: &Value) -> Result<Value, String> {
    const EXPECTED: &str = "Expected float or integer";

    match value {
        Value::Float(f) => Ok(Value::Float(*f)),
        Value::Int(i) => Ok(Value::Float(*i as f64)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::Float)
            .ok_or_else(|| EXPECTED.to_string()),
        Value::Null => Err(format!("{}, got null", EXPECTED)),
        _ => Err(EXPECTED.to_string()),
    }
}

// ============================================================================
// Dates
// ============================================================================

fn coerce_date(value: &Value, format: &str) -> Result<Value, String> {
    match value {
        Value::Date(d) => Ok(Value::Date(*d)),
        Value::String(s) => NaiveDate::parse_from_str(s, format)
            .map(Value::Date)
            .map_err(|_| format!("time data '{}' does not match format '{}'", s, format)),
        Value::Null => Err(format!("Expected date string ({}), got null", format)),
        _ => Err(format!("Expected date string ({})", format)),
    }
}

fn coerce_datetime(value: &Value, config: &SchemaConfig) -> Result<Value, String> {
    let format = &config.datetime_format;
    match value {
        Value::DateTime(dt) => Ok(Value::DateTime(*dt)),
        Value::Date(d) => Ok(Value::DateTime(d.and_time(NaiveTime::MIN))),
        Value::String(s) => NaiveDateTime::parse_from_str(s, format)
            .or_else(|_| {
                // Date-only input is accepted as midnight
                NaiveDate::parse_from_str(s, &config.date_format)
                    .map(|d| d.and_time(NaiveTime::MIN))
            })
            .map(Value::DateTime)
            .map_err(|_| {
                format!(
                    "Invalid datetime format. Expected '{}' or '{}'",
                    format, config.date_format
                )
            }),
        Value::Null => Err(format!("Expected datetime string ({}), got null", format)),
        _ => Err(format!("Expected datetime string ({})", format)),
    }
}

// ============================================================================
// Selection
// ============================================================================

fn coerce_selection(value: &Value, choices: &[String], type_name: &str) -> Result<Value, FieldError> {
    let s = match value {
        Value::String(s) => s,
        Value::Null => {
            return Err(FieldError::type_mismatch(
                type_name,
                "Expected string for selection field, got null.",
            ))
        }
        _ => {
            return Err(FieldError::type_mismatch(
                type_name,
                "Expected string for selection field.",
            ))
        }
    };
    if choices.iter().any(|c| c == s) {
        Ok(Value::String(s.clone()))
    } else {
        Err(FieldError::selection(s, choices))
    }
}
