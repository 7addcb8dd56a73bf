//! API Response Example
//!
//! This example plays the controller role: it picks the mode from the HTTP
//! method, validates the body with a shared schema carrying a custom
//! validator, and prints the response envelope.
//!
//! Run with:
//! ```bash
//! cargo run -p recordform --example api_response
//! ```

use once_cell::sync::Lazy;
use recordform::{ApiResponse, FieldSpec, Mode, Schema, SchemaError, Value, ValidatorError};
use serde_json::json;
use tracing_subscriber::EnvFilter;

static MOVIE: Lazy<Result<Schema, SchemaError>> = Lazy::new(|| {
    Schema::builder("movie")
        .date_format("%Y/%m/%d")
        .field(FieldSpec::char("name").required())
        .field(FieldSpec::selection("genre", ["action", "drama"]))
        .field(FieldSpec::date("release_date"))
        .field(FieldSpec::float("rating"))
        .validator("name", |value: Value| {
            if value.as_str().map_or(false, |s| s.starts_with('a')) {
                return Err(ValidatorError::new("Name cannot start with an 'a'"));
            }
            Ok(value)
        })
        .build()
});

fn handle(method: &str, body: serde_json::Value) -> ApiResponse {
    let schema = match MOVIE.as_ref() {
        Ok(schema) => schema,
        Err(e) => return ApiResponse::error(e.to_string(), 500),
    };
    let mode = match Mode::from_http_method(method) {
        Ok(mode) => mode,
        Err(e) => return ApiResponse::error(e.to_string(), 405),
    };
    let Some(payload) = body.as_object() else {
        return ApiResponse::error("Request body must be a JSON object", 400);
    };

    let serializer = schema.bind(payload, mode);
    match mode {
        Mode::Create if serializer.validate() => {
            ApiResponse::created(serializer.data()).with_message("Movie created")
        }
        _ => ApiResponse::from_serializer(&serializer),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("API Response Example");
    println!("====================\n");

    let requests: Vec<(&str, serde_json::Value)> = vec![
        ("POST", json!({"name": "Inception", "genre": "action", "release_date": "2010/07/16"})),
        ("POST", json!({"name": "avatar", "genre": "scifi"})),
        ("PATCH", json!({"rating": "8.8"})),
        ("DELETE", json!({})),
        ("PUT", json!(["not", "an", "object"])),
    ];

    for (method, body) in requests {
        let response = handle(method, body);
        println!("{} -> {} {}", method, response.http_status, response.to_json());
    }

    // Not-found is decided by the record store, outside the serializer
    let missing = ApiResponse::not_found("Movie 42 not found");
    println!("GET  -> {} {}", missing.http_status, missing.to_json());
}
