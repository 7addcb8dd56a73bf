//! Schema definition
//!
//! A [`Schema`] is the static half of validation: an ordered list of field
//! declarations, the date/datetime templates, and the per-field validator
//! registry. It is immutable once built and safe to share across threads;
//! every request binds its own [`Serializer`] to it.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::config::SchemaConfig;
use crate::errors::{SchemaError, SchemaResult};
use crate::fields::FieldSpec;
use crate::serializer::Serializer;
use crate::types::{FieldMap, Payload, Value};
use crate::validators::{FieldValidator, FnFieldValidator, ValidatorError, ValidatorRegistry};

// ============================================================================
// Mode
// ============================================================================

/// Validation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Full validation: required fields enforced, defaults applied
    Create,
    /// Partial update: only supplied fields are validated
    Write,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Write => "write",
        }
    }

    /// POST creates; PUT and PATCH write
    pub fn from_http_method(method: &str) -> SchemaResult<Self> {
        match method.to_ascii_uppercase().as_str() {
            "POST" => Ok(Self::Create),
            "PUT" | "PATCH" => Ok(Self::Write),
            _ => Err(SchemaError::UnsupportedMethod(method.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "write" => Ok(Self::Write),
            other => Err(SchemaError::InvalidMode(other.to_string())),
        }
    }
}

// ============================================================================
// Schema
// ============================================================================

/// Ordered field declarations plus format configuration and validators
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    fields: Vec<FieldSpec>,
    config: SchemaConfig,
    validators: ValidatorRegistry,
}

impl Schema {
    /// Start declaring a schema
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields, in declaration order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    pub fn validators(&self) -> &ValidatorRegistry {
        &self.validators
    }

    /// Bind a payload for one validation run
    pub fn bind<'a>(&'a self, payload: &'a Payload, mode: Mode) -> Serializer<'a> {
        Serializer::new(self, payload, mode)
    }

    /// Render stored values for transport, formatting dates with this
    /// schema's templates
    pub fn to_representation<'v, I>(&self, values: I) -> serde_json::Map<String, serde_json::Value>
    where
        I: IntoIterator<Item = (&'v str, &'v Value)>,
    {
        values
            .into_iter()
            .map(|(k, v)| (k.to_string(), self.config.format_value(v).into()))
            .collect()
    }

    /// [`Schema::to_representation`] over a whole field map
    pub fn represent(&self, data: &FieldMap<Value>) -> serde_json::Value {
        serde_json::Value::Object(self.to_representation(data.iter()))
    }
}

// ============================================================================
// Schema Builder
// ============================================================================

/// Builder for [`Schema`]
///
/// All declaration checks run in [`SchemaBuilder::build`], so a defective
/// schema never reaches request handling.
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldSpec>,
    config: SchemaConfig,
    validators: ValidatorRegistry,
    /// Fields that were given a second validator
    duplicate_validators: Vec<String>,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            config: SchemaConfig::default(),
            validators: ValidatorRegistry::new(),
            duplicate_validators: Vec::new(),
        }
    }

    /// Declare the next field
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn fields(mut self, specs: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.fields.extend(specs);
        self
    }

    pub fn config(mut self, config: SchemaConfig) -> Self {
        self.config = config;
        self
    }

    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.config = self.config.date_format(format);
        self
    }

    pub fn datetime_format(mut self, format: impl Into<String>) -> Self {
        self.config = self.config.datetime_format(format);
        self
    }

    /// Register a closure validator for `field`
    pub fn validator<F>(self, field: impl Into<String>, validate_fn: F) -> Self
    where
        F: Fn(Value) -> Result<Value, ValidatorError> + Send + Sync + 'static,
    {
        self.field_validator(FnFieldValidator::new(field, validate_fn))
    }

    /// Register a validator object
    ///
    /// A field takes at most one validator; a second one fails
    /// [`SchemaBuilder::build`].
    pub fn field_validator(mut self, validator: impl FieldValidator + 'static) -> Self {
        if let Some(displaced) = self.validators.register(validator) {
            self.duplicate_validators.push(displaced.field_name().to_string());
        }
        self
    }

    pub fn build(self) -> SchemaResult<Schema> {
        self.config.check()?;

        for (i, spec) in self.fields.iter().enumerate() {
            spec.check()?;
            if self.fields[..i].iter().any(|f| f.name == spec.name) {
                return Err(SchemaError::DuplicateField(spec.name.clone()));
            }
        }

        if let Some(field) = self.duplicate_validators.into_iter().next() {
            return Err(SchemaError::DuplicateValidator(field));
        }

        let mut hooked: Vec<&str> = self.validators.field_names().collect();
        hooked.sort_unstable();
        if let Some(unknown) = hooked
            .into_iter()
            .find(|name| !self.fields.iter().any(|f| f.name == *name))
        {
            return Err(SchemaError::UnknownValidatorField(unknown.to_string()));
        }

        debug!(
            schema = %self.name,
            fields = self.fields.len(),
            validators = self.validators.len(),
            "schema built"
        );

        Ok(Schema {
            name: self.name,
            fields: self.fields,
            config: self.config,
            validators: self.validators,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("create".parse::<Mode>(), Ok(Mode::Create));
        assert_eq!("write".parse::<Mode>(), Ok(Mode::Write));
        assert_eq!(
            "update".parse::<Mode>(),
            Err(SchemaError::InvalidMode("update".to_string()))
        );
        assert_eq!(Mode::Write.to_string(), "write");
    }

    #[test]
    fn test_mode_from_http_method() {
        assert_eq!(Mode::from_http_method("POST"), Ok(Mode::Create));
        assert_eq!(Mode::from_http_method("put"), Ok(Mode::Write));
        assert_eq!(Mode::from_http_method("PATCH"), Ok(Mode::Write));
        assert!(matches!(
            Mode::from_http_method("DELETE"),
            Err(SchemaError::UnsupportedMethod(_))
        ));
    }

    #[test]
    fn test_build_keeps_declaration_order() {
        let schema = Schema::builder("product")
            .field(FieldSpec::char("name").required())
            .field(FieldSpec::float("price"))
            .field(FieldSpec::integer("quantity").default_value(0i64))
            .build()
            .unwrap();

        let names: Vec<_> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "price", "quantity"]);
        assert_eq!(schema.name(), "product");
        assert!(schema.field("price").is_some());
        assert!(schema.field("missing").is_none());
    }

    #[test]
    fn test_build_rejects_duplicate_fields() {
        let err = Schema::builder("dup")
            .field(FieldSpec::char("name"))
            .field(FieldSpec::text("name"))
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateField("name".to_string()));
    }

    #[test]
    fn test_build_rejects_empty_selection() {
        let err = Schema::builder("movie")
            .field(FieldSpec::selection("genre", Vec::<&str>::new()))
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::EmptySelection("genre".to_string()));
    }

    #[test]
    fn test_build_rejects_validator_for_undeclared_field() {
        let err = Schema::builder("movie")
            .field(FieldSpec::char("title"))
            .validator("name", Ok)
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::UnknownValidatorField("name".to_string()));
    }

    #[test]
    fn test_build_rejects_second_validator_for_field() {
        let err = Schema::builder("movie")
            .field(FieldSpec::char("name"))
            .field(FieldSpec::char("title"))
            .validator("title", Ok)
            .validator("name", Ok)
            .validator("name", |_: Value| Err(ValidatorError::new("rejected")))
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateValidator("name".to_string()));
        assert_eq!(err.to_string(), "Field 'name' has more than one validator");
    }

    #[test]
    fn test_build_rejects_bad_format() {
        let err = Schema::builder("movie")
            .date_format("%Q")
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDateFormat { .. }));
    }

    #[test]
    fn test_represent_formats_dates() {
        let schema = Schema::builder("movie")
            .date_format("%d-%m-%Y")
            .field(FieldSpec::date("release_date"))
            .build()
            .unwrap();

        let mut data = FieldMap::new();
        data.insert("release_date", Value::Date(NaiveDate::from_ymd_opt(2010, 7, 16).unwrap()));
        data.insert("rating", Value::Float(8.8));

        assert_eq!(
            schema.represent(&data),
            serde_json::json!({"release_date": "16-07-2010", "rating": 8.8})
        );
    }

    #[test]
    fn test_schema_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Schema>();
    }
}
