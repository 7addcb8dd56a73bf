//! Schema-level configuration
//!
//! Holds the date and datetime templates a schema parses input with and
//! formats output with. Templates use chrono's strftime syntax.

use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use tracing::warn;

use crate::errors::{SchemaError, SchemaResult};
use crate::types::Value;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// Schema Config
// ============================================================================

/// Date/datetime templates for one schema
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Template for `date` fields, e.g. `%Y-%m-%d`
    pub date_format: String,

    /// Template for `datetime` fields, e.g. `%Y-%m-%d %H:%M:%S`
    pub datetime_format: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
        }
    }
}

impl SchemaConfig {
    /// Create a config with the default templates
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the date template
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Set the datetime template
    pub fn datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_format = format.into();
        self
    }

    /// Check that both templates render against a sample timestamp
    ///
    /// Templates chrono cannot render (unknown specifiers, timezone fields on
    /// a naive timestamp) are rejected here so that output formatting never
    /// fails later.
    pub fn check(&self) -> SchemaResult<()> {
        render_sample(&self.date_format).map_err(|reason| SchemaError::InvalidDateFormat {
            format: self.date_format.clone(),
            reason,
        })?;
        render_sample(&self.datetime_format).map_err(|reason| {
            SchemaError::InvalidDatetimeFormat {
                format: self.datetime_format.clone(),
                reason,
            }
        })?;
        Ok(())
    }

    /// Format a date with the configured date template
    ///
    /// A template that does not render (one [`SchemaConfig::check`] would
    /// reject) falls back to [`DEFAULT_DATE_FORMAT`] and logs a warning.
    pub fn format_date(&self, date: NaiveDate) -> String {
        render(&date.and_time(NaiveTime::MIN), &self.date_format).unwrap_or_else(|| {
            warn!(format = %self.date_format, "date template failed to render, using default");
            date.format(DEFAULT_DATE_FORMAT).to_string()
        })
    }

    /// Format a datetime with the configured datetime template, falling back
    /// to [`DEFAULT_DATETIME_FORMAT`] like [`SchemaConfig::format_date`]
    pub fn format_datetime(&self, datetime: NaiveDateTime) -> String {
        render(&datetime, &self.datetime_format).unwrap_or_else(|| {
            warn!(format = %self.datetime_format, "datetime template failed to render, using default");
            datetime.format(DEFAULT_DATETIME_FORMAT).to_string()
        })
    }

    /// Output pass: render dates and datetimes as strings, recursing into
    /// lists and dicts. Everything else passes through unchanged.
    pub fn format_value(&self, value: &Value) -> Value {
        match value {
            Value::Date(d) => Value::String(self.format_date(*d)),
            Value::DateTime(dt) => Value::String(self.format_datetime(*dt)),
            Value::List(items) => Value::List(items.iter().map(|v| self.format_value(v)).collect()),
            Value::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), self.format_value(v)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

fn render(datetime: &NaiveDateTime, format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", datetime.format(format)).ok()?;
    Some(out)
}

fn render_sample(format: &str) -> Result<(), String> {
    let sample = NaiveDate::from_ymd_opt(2025, 10, 28)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .ok_or_else(|| "sample timestamp out of range".to_string())?;
    if format.is_empty() {
        return Err("template is empty".to_string());
    }
    render(&sample, format)
        .map(|_| ())
        .ok_or_else(|| "expected a valid strftime pattern, e.g. '%Y-%m-%d'".to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SchemaConfig::default();
        assert_eq!(config.date_format, "%Y-%m-%d");
        assert_eq!(config.datetime_format, "%Y-%m-%d %H:%M:%S");
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = SchemaConfig::new()
            .date_format("%d-%m-%Y")
            .datetime_format("%d-%m-%Y %H:%M");

        assert_eq!(config.date_format, "%d-%m-%Y");
        assert_eq!(config.datetime_format, "%d-%m-%Y %H:%M");
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_check_rejects_bad_templates() {
        let err = SchemaConfig::new().date_format("%Q").check().unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDateFormat { .. }));

        let err = SchemaConfig::new().datetime_format("%Y %z").check().unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDatetimeFormat { .. }));

        let err = SchemaConfig::new().date_format("").check().unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDateFormat { .. }));
    }

    #[test]
    fn test_format_value_recurses() {
        let config = SchemaConfig::new().date_format("%d/%m/%Y");
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let value = Value::Object(vec![
            ("due".to_string(), Value::Date(date)),
            ("tags".to_string(), Value::List(vec![Value::Date(date), Value::Int(1)])),
        ]);

        assert_eq!(
            config.format_value(&value),
            Value::Object(vec![
                ("due".to_string(), Value::String("31/01/2024".to_string())),
                (
                    "tags".to_string(),
                    Value::List(vec![Value::String("31/01/2024".to_string()), Value::Int(1)])
                ),
            ])
        );
    }

    #[test]
    fn test_format_datetime() {
        let config = SchemaConfig::new().datetime_format("%d-%m-%Y %H:%M:%S");
        let dt = NaiveDate::from_ymd_opt(2010, 7, 16)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        assert_eq!(config.format_datetime(dt), "16-07-2010 09:05:00");
    }

    #[test]
    fn test_unrenderable_template_falls_back_to_default() {
        let config = SchemaConfig::new().date_format("%Q").datetime_format("%Y %z");
        assert!(config.check().is_err());

        let dt = NaiveDate::from_ymd_opt(2010, 7, 16)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        assert_eq!(config.format_date(dt.date()), "2010-07-16");
        assert_eq!(config.format_datetime(dt), "2010-07-16 09:05:00");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: SchemaConfig = serde_json::from_str(r#"{"date_format": "%Y/%m/%d"}"#).unwrap();
        assert_eq!(config.date_format, "%Y/%m/%d");
        assert_eq!(config.datetime_format, DEFAULT_DATETIME_FORMAT);
    }
}
