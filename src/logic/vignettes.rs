//! Vignette validation and import.
//!
//! Documents are validated against the bundled structural schema before
//! anything touches the store; validation is a hard precondition, not a
//! rollback.

use log::info;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::NewVignette;
use crate::store::Store;

static VIGNETTE_SCHEMA: &str = include_str!("../../schemas/vignette.json");

/// Validate a vignette document against the bundled schema. The error
/// message aggregates every schema violation.
pub fn validate_vignette(document: &Value) -> Result<()> {
    let schema: Value =
        serde_json::from_str(VIGNETTE_SCHEMA).expect("bundled vignette schema is valid JSON");
    let compiled = jsonschema::JSONSchema::compile(&schema)
        .expect("bundled vignette schema compiles");

    if let Err(errors) = compiled.validate(document) {
        let message = errors
            .map(|error| error.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(Error::Validation(message));
    }
    Ok(())
}

/// Validate, resolve the document's `bucket_slug`, and persist the
/// serialized body. Nothing is written when validation or bucket
/// resolution fails.
pub async fn import_vignette<S: Store>(store: &S, document: &Value) -> Result<i64> {
    validate_vignette(document)?;

    // The schema guarantees presence; decode defensively all the same.
    let bucket_slug = document
        .get("bucket_slug")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Validation("'bucket_slug' is a required property".to_string()))?;

    let bucket = store
        .get_bucket_by_slug(bucket_slug)
        .await?
        .ok_or_else(|| Error::Validation(format!("bucket not found: {}", bucket_slug)))?;

    let id = store
        .create_vignette(NewVignette {
            bucket_id: bucket.id,
            json: serde_json::to_string(document)?,
        })
        .await?;
    info!("Got vignette ID: {}", id);
    Ok(id)
}
