//! recordform
//!
//! Declarative field validation and serialization for record-mutation
//! endpoints. A [`Schema`] declares named, typed fields; binding a decoded
//! JSON payload to it in [`Mode::Create`] or [`Mode::Write`] yields either
//! cleaned, type-coerced data ready for the record store or a per-field error
//! report. The crate never touches the store itself.
//!
//! # Field types
//!
//! `char`, `text`, `integer`, `float`, `boolean`, `date`, `datetime`,
//! `selection`, `list` and `dict`. Dates are parsed and rendered with the
//! schema's [`SchemaConfig`] templates.
//!
//! # Example
//!
//! ```rust
//! use recordform::{FieldSpec, Mode, Schema, Value, ValidatorError};
//! use serde_json::json;
//!
//! let schema = Schema::builder("product")
//!     .field(FieldSpec::char("name").required())
//!     .field(FieldSpec::float("price").required())
//!     .field(FieldSpec::integer("quantity").default_value(0i64))
//!     .validator("name", |value: Value| {
//!         if value.as_str().map_or(false, |s| s.starts_with('a')) {
//!             return Err(ValidatorError::new("Name cannot start with an 'a'"));
//!         }
//!         Ok(value)
//!     })
//!     .build()
//!     .unwrap();
//!
//! let payload = json!({"name": "Widget", "price": "19.99"});
//! let payload = payload.as_object().unwrap();
//!
//! let serializer = schema.bind(payload, Mode::Create);
//! assert!(serializer.validate());
//! assert_eq!(serializer.cleaned_data().get("quantity"), Some(&Value::Int(0)));
//! ```

// Public modules
pub mod coerce;
pub mod config;
pub mod errors;
pub mod fields;
pub mod response;
pub mod schema;
pub mod serializer;
pub mod types;
pub mod validators;

// Re-export commonly used types
pub use config::{SchemaConfig, DEFAULT_DATETIME_FORMAT, DEFAULT_DATE_FORMAT};
pub use errors::{
    ErrorKind, FieldError, FieldErrors, SchemaError, SchemaResult, REQUIRED_MESSAGE,
};
pub use fields::{FieldSpec, FieldType};
pub use response::{ApiResponse, ResponseStatus};
pub use schema::{Mode, Schema, SchemaBuilder};
pub use serializer::{Serializer, ValidationState};
pub use types::{FieldMap, Payload, Value};
pub use validators::{
    BoxedFieldValidator, FieldValidator, FnFieldValidator, ValidatorError, ValidatorRegistry,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
