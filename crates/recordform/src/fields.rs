//! Field declarations
//!
//! A [`FieldSpec`] describes one named payload field: its declared type,
//! whether it is required, its create-mode default, and the allowed choices
//! of a selection field. Specs are plain configuration; coercion lives in
//! [`crate::coerce`].

use std::fmt;
use std::str::FromStr;

use crate::errors::{SchemaError, SchemaResult};
use crate::types::Value;

// ============================================================================
// Field Type
// ============================================================================

/// Declared type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Short string
    Char,
    /// Long string
    Text,
    Integer,
    Float,
    Boolean,
    /// Parsed with the schema's date format
    Date,
    /// Parsed with the schema's datetime format
    DateTime,
    /// One of a fixed set of string choices
    Selection,
    List,
    Dict,
}

impl FieldType {
    /// Every field type, in registry order
    pub const ALL: [FieldType; 10] = [
        Self::Char,
        Self::Text,
        Self::Integer,
        Self::Float,
        Self::Boolean,
        Self::Date,
        Self::DateTime,
        Self::Selection,
        Self::List,
        Self::Dict,
    ];

    /// Name used in declarations and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Selection => "selection",
            Self::List => "list",
            Self::Dict => "dict",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownFieldType(s.to_string()))
    }
}

// ============================================================================
// Field Spec
// ============================================================================

/// Declaration of one named field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Payload key
    pub name: String,
    pub field_type: FieldType,
    /// Required in create mode; ignored in write mode
    pub required: bool,
    /// Stored verbatim in create mode when the key is absent
    pub default: Option<Value>,
    /// Allowed values, in declaration order (selection fields only)
    pub selection: Option<Vec<String>>,
}

impl FieldSpec {
    /// Create a new optional field without default
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            default: None,
            selection: None,
        }
    }

    pub fn char(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Char)
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Float)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Date)
    }

    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::DateTime)
    }

    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::List)
    }

    pub fn dict(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Dict)
    }

    /// Create a selection field with its allowed values
    pub fn selection<I, S>(name: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, FieldType::Selection).choices(choices)
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the create-mode default
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Set the allowed values
    ///
    /// Only valid on selection fields; [`FieldSpec::check`] rejects it elsewhere.
    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    /// Allowed values of a selection field (empty for other types)
    pub fn allowed(&self) -> &[String] {
        self.selection.as_deref().unwrap_or(&[])
    }

    /// Check the declaration itself
    pub fn check(&self) -> SchemaResult<()> {
        match (&self.field_type, &self.selection) {
            (FieldType::Selection, None) => Err(SchemaError::EmptySelection(self.name.clone())),
            (FieldType::Selection, Some(choices)) => {
                if choices.is_empty() {
                    return Err(SchemaError::EmptySelection(self.name.clone()));
                }
                for (i, choice) in choices.iter().enumerate() {
                    if choices[..i].contains(choice) {
                        return Err(SchemaError::DuplicateChoice {
                            field: self.name.clone(),
                            choice: choice.clone(),
                        });
                    }
                }
                Ok(())
            }
            (other, Some(_)) => Err(SchemaError::SelectionNotAllowed {
                field: self.name.clone(),
                field_type: other.to_string(),
            }),
            (_, None) => Ok(()),
        }
    }
}
