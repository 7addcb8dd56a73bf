//! Per-field custom validators
//!
//! A schema may register at most one validator per declared field. The
//! validator runs only after built-in coercion succeeded, receives the coerced
//! value, and returns either the value to store (possibly transformed) or a
//! [`ValidatorError`] whose message becomes the field's error verbatim.
//!
//! # Example
//!
//! ```rust
//! use recordform::{FnFieldValidator, FieldValidator, Value, ValidatorError};
//!
//! let no_a = FnFieldValidator::new("name", |value: Value| {
//!     if value.as_str().map_or(false, |s| s.starts_with('a')) {
//!         return Err(ValidatorError::new("Name cannot start with an 'a'"));
//!     }
//!     Ok(value)
//! });
//!
//! assert!(no_a.validate(Value::from("avatar")).is_err());
//! assert_eq!(no_a.validate(Value::from("Widget")), Ok(Value::from("Widget")));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::types::Value;

// ============================================================================
// Validator Error
// ============================================================================

/// Rejection raised by a custom validator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidatorError {
    pub message: String,
}

impl ValidatorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Field Validator Trait
// ============================================================================

/// Trait for field-level validators
pub trait FieldValidator: Send + Sync {
    /// Name of the field this validator applies to
    fn field_name(&self) -> &str;

    /// Validate and optionally transform the coerced value
    fn validate(&self, value: Value) -> Result<Value, ValidatorError>;
}

/// Type alias for a shared field validator
pub type BoxedFieldValidator = Arc<dyn FieldValidator>;

// ============================================================================
// Function-based Validators
// ============================================================================

/// Field validator backed by a closure
pub struct FnFieldValidator<F>
where
    F: Fn(Value) -> Result<Value, ValidatorError> + Send + Sync,
{
    field_name: String,
    validate_fn: F,
}

impl<F> FnFieldValidator<F>
where
    F: Fn(Value) -> Result<Value, ValidatorError> + Send + Sync,
{
    pub fn new(field_name: impl Into<String>, validate_fn: F) -> Self {
        Self {
            field_name: field_name.into(),
            validate_fn,
        }
    }
}

impl<F> FieldValidator for FnFieldValidator<F>
where
    F: Fn(Value) -> Result<Value, ValidatorError> + Send + Sync,
{
    fn field_name(&self) -> &str {
        &self.field_name
    }

    fn validate(&self, value: Value) -> Result<Value, ValidatorError> {
        (self.validate_fn)(value)
    }
}

// ============================================================================
// Validator Registry
// ============================================================================

/// Field name -> validator lookup
#[derive(Default, Clone)]
pub struct ValidatorRegistry {
    validators: HashMap<String, BoxedFieldValidator>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a validator, returning the one it displaced for the same field
    pub fn register(
        &mut self,
        validator: impl FieldValidator + 'static,
    ) -> Option<BoxedFieldValidator> {
        self.register_shared(Arc::new(validator))
    }

    pub fn register_shared(&mut self, validator: BoxedFieldValidator) -> Option<BoxedFieldValidator> {
        self.validators
            .insert(validator.field_name().to_string(), validator)
    }

    pub fn get(&self, field_name: &str) -> Option<&BoxedFieldValidator> {
        self.validators.get(field_name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.validators.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Run the field's validator, or pass the value through when none is registered
    pub fn run(&self, field_name: &str, value: Value) -> Result<Value, ValidatorError> {
        match self.validators.get(field_name) {
            Some(validator) => validator.validate(value),
            None => Ok(value),
        }
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.validators.keys().collect();
        names.sort();
        f.debug_struct("ValidatorRegistry")
            .field("fields", &names)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
