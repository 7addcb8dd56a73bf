//! Error types
//!
//! Two families live here. [`SchemaError`] is a declaration defect and fails
//! fast when a schema is built. [`FieldError`] is a per-field validation
//! outcome; it is collected into [`FieldErrors`] and never returned as `Err`
//! from the validation pass itself.

use std::fmt;

use serde::ser::{Serialize, Serializer};
use thiserror::Error;

use crate::types::FieldMap;

// ============================================================================
// Schema Definition Errors
// ============================================================================

/// Result type for schema definition
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Configuration defects detected while defining a schema
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Invalid field type '{0}'. Must be one of: char, text, integer, float, boolean, date, datetime, selection, list, dict")]
    UnknownFieldType(String),

    #[error("Field '{0}': `selection` must be provided as a non-empty list when type='selection'")]
    EmptySelection(String),

    #[error("Field '{field}': `selection` parameter is not valid for type `{field_type}`")]
    SelectionNotAllowed { field: String, field_type: String },

    #[error("Field '{field}': duplicate selection value '{choice}'")]
    DuplicateChoice { field: String, choice: String },

    #[error("Field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("Validator registered for undeclared field '{0}'")]
    UnknownValidatorField(String),

    #[error("Field '{0}' has more than one validator")]
    DuplicateValidator(String),

    #[error("Invalid date_format '{format}': {reason}")]
    InvalidDateFormat { format: String, reason: String },

    #[error("Invalid datetime_format '{format}': {reason}")]
    InvalidDatetimeFormat { format: String, reason: String },

    #[error("Invalid serializer mode '{0}'. Must be one of: create, write")]
    InvalidMode(String),

    #[error("HTTP method '{0}' does not map to a serializer mode")]
    UnsupportedMethod(String),
}

// ============================================================================
// Error Kind Classification
// ============================================================================

/// Classification of per-field validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Required field absent in create mode
    MissingRequired,
    /// Value does not coerce to the declared type
    TypeMismatch,
    /// Value not among the declared choices
    SelectionViolation,
    /// Registered field validator rejected the coerced value
    CustomValidationFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequired => write!(f, "missing"),
            Self::TypeMismatch => write!(f, "type_error"),
            Self::SelectionViolation => write!(f, "selection_error"),
            Self::CustomValidationFailure => write!(f, "custom_error"),
        }
    }
}

// ============================================================================
// Single Field Error
// ============================================================================

pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// One field's validation failure
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub kind: ErrorKind,
    /// Human-readable message, reported verbatim to API callers
    pub message: String,
}

impl FieldError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn missing() -> Self {
        Self::new(ErrorKind::MissingRequired, REQUIRED_MESSAGE)
    }

    /// `Invalid value for <type>: <reason>`
    pub fn type_mismatch(type_name: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("Invalid value for {}: {}", type_name, reason),
        )
    }

    /// `Invalid selection value '<v>'. Must be one of: (<a>, <b>)`
    pub fn selection(value: &str, choices: &[String]) -> Self {
        Self::new(
            ErrorKind::SelectionViolation,
            format!(
                "Invalid selection value '{}'. Must be one of: ({})",
                value,
                choices.join(", ")
            ),
        )
    }

    pub fn custom(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CustomValidationFailure, message)
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.message)
    }
}

// ============================================================================
// Field Errors Collection
// ============================================================================

/// Per-field error report, one entry per failing field
///
/// The first error recorded for a field wins; later ones are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    errors: FieldMap<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error unless the field already has one
    pub fn add(&mut self, field: &str, error: FieldError) {
        if !self.errors.contains_key(field) {
            self.errors.insert(field, error);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.errors.get(field)
    }

    /// Message for a field, if it failed
    pub fn message(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.errors.iter()
    }

    /// Field name -> message, in declaration order
    pub fn messages(&self) -> FieldMap<String> {
        self.errors
            .iter()
            .map(|(k, e)| (k, e.message.clone()))
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.errors
                .iter()
                .map(|(k, e)| (k.to_string(), serde_json::Value::String(e.message.clone())))
                .collect(),
        )
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.errors.len())
    }
}

impl std::error::Error for FieldErrors {}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.errors.serialize(serializer)
    }
}
