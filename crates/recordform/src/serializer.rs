//! Validation engine
//!
//! A [`Serializer`] binds one payload and one [`Mode`] to a [`Schema`] and
//! runs the validation pass over the declared fields, in declaration order:
//!
//! 1. presence check, branched on mode (create enforces `required` and
//!    applies defaults; write skips absent fields),
//! 2. type coercion,
//! 3. the field's custom validator, if one is registered,
//! 4. accumulation into cleaned data or the error report.
//!
//! A field's failure never stops the pass. The outcome is computed once and
//! cached for the lifetime of the serializer.

use once_cell::unsync::OnceCell;
use tracing::{debug, trace};

use crate::coerce::coerce;
use crate::errors::{FieldError, FieldErrors};
use crate::fields::FieldSpec;
use crate::schema::{Mode, Schema};
use crate::types::{FieldMap, Payload, Value};

/// Where a bound serializer stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationState {
    /// Validation has not run yet
    Pending,
    Valid,
    Invalid,
}

#[derive(Debug)]
struct Outcome {
    cleaned: FieldMap<Value>,
    errors: FieldErrors,
}

/// One validation run: a schema, a borrowed payload and a mode
#[derive(Debug)]
pub struct Serializer<'a> {
    schema: &'a Schema,
    payload: &'a Payload,
    mode: Mode,
    outcome: OnceCell<Outcome>,
}

impl<'a> Serializer<'a> {
    pub fn new(schema: &'a Schema, payload: &'a Payload, mode: Mode) -> Self {
        Self {
            schema,
            payload,
            mode,
            outcome: OnceCell::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// Run validation (first call only) and report validity
    pub fn validate(&self) -> bool {
        self.outcome().errors.is_empty()
    }

    pub fn state(&self) -> ValidationState {
        match self.outcome.get() {
            None => ValidationState::Pending,
            Some(outcome) if outcome.errors.is_empty() => ValidationState::Valid,
            Some(_) => ValidationState::Invalid,
        }
    }

    /// Coerced values, in declaration order
    ///
    /// Validates first if needed. On an invalid payload this holds only the
    /// fields that passed.
    pub fn cleaned_data(&self) -> &FieldMap<Value> {
        &self.outcome().cleaned
    }

    /// Per-field errors, in declaration order
    pub fn errors(&self) -> &FieldErrors {
        &self.outcome().errors
    }

    /// Cleaned data formatted for transport (dates rendered with the schema's
    /// templates)
    pub fn data(&self) -> serde_json::Value {
        self.schema.represent(self.cleaned_data())
    }

    /// Consume into cleaned data or the error report
    pub fn into_result(self) -> Result<FieldMap<Value>, FieldErrors> {
        self.outcome();
        match self.outcome.into_inner() {
            Some(outcome) if outcome.errors.is_empty() => Ok(outcome.cleaned),
            Some(outcome) => Err(outcome.errors),
            None => Err(FieldErrors::new()),
        }
    }

    fn outcome(&self) -> &Outcome {
        self.outcome.get_or_init(|| self.run())
    }

    fn run(&self) -> Outcome {
        debug!(
            schema = %self.schema.name(),
            mode = %self.mode,
            fields = self.schema.fields().len(),
            "validating payload"
        );

        let mut cleaned = FieldMap::new();
        let mut errors = FieldErrors::new();

        for spec in self.schema.fields() {
            let name = spec.name.as_str();
            match self.clean_field(spec) {
                Some(Ok(value)) => cleaned.insert(name, value),
                Some(Err(error)) => {
                    trace!(field = name, kind = %error.kind, "field rejected: {}", error);
                    errors.add(name, error);
                }
                None => {}
            }
        }

        debug!(
            schema = %self.schema.name(),
            valid = errors.is_empty(),
            errors = errors.len(),
            "validation finished"
        );

        Outcome { cleaned, errors }
    }

    /// `None` when the field contributes nothing to either mapping
    fn clean_field(&self, spec: &FieldSpec) -> Option<Result<Value, FieldError>> {
        let Some(raw) = self.payload.get(&spec.name) else {
            return match self.mode {
                Mode::Write => None,
                Mode::Create if spec.required => Some(Err(FieldError::missing())),
                Mode::Create => spec.default.clone().map(Ok),
            };
        };

        let value = match coerce(spec, &Value::from(raw), self.schema.config()) {
            Ok(value) => value,
            Err(error) => return Some(Err(error)),
        };

        Some(
            self.schema
                .validators()
                .run(&spec.name, value)
                .map_err(|e| FieldError::custom(e.message)),
        )
    }
}
