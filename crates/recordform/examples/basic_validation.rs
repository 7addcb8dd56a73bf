//! Basic Validation Example
//!
//! This example validates a few payloads against a product schema in both
//! modes and prints the outcome.
//!
//! Run with:
//! ```bash
//! RUST_LOG=recordform=trace cargo run -p recordform --example basic_validation
//! ```

use recordform::{FieldSpec, Mode, Schema, SchemaResult, Serializer};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn product_schema() -> SchemaResult<Schema> {
    Schema::builder("product")
        .field(FieldSpec::char("name").required())
        .field(FieldSpec::float("price").required())
        .field(FieldSpec::integer("quantity").default_value(0i64))
        .field(FieldSpec::selection("category", ["tools", "toys", "food"]))
        .field(FieldSpec::date("available_from"))
        .build()
}

fn report(label: &str, serializer: &Serializer<'_>) {
    println!("{} ({} mode)", label, serializer.mode());
    if serializer.validate() {
        println!("  valid: {}", serializer.data());
    } else {
        for (field, error) in serializer.errors().iter() {
            println!("  {} [{}]: {}", field, error.kind, error);
        }
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let schema = product_schema()?;

    println!("Basic Validation Example");
    println!("========================\n");

    let body = json!({"name": "Widget", "price": "19.99", "available_from": "2025-01-15"});
    let payload = body.as_object().cloned().unwrap_or_default();
    report("1. Complete create payload", &schema.bind(&payload, Mode::Create));

    let body = json!({"price": 4});
    let payload = body.as_object().cloned().unwrap_or_default();
    report("2. Missing required field", &schema.bind(&payload, Mode::Create));
    report("3. Same payload as a partial update", &schema.bind(&payload, Mode::Write));

    let body = json!({"name": 12, "price": "cheap", "quantity": 2.5, "category": "cars"});
    let payload = body.as_object().cloned().unwrap_or_default();
    report("4. Every field wrong", &schema.bind(&payload, Mode::Write));

    Ok(())
}
