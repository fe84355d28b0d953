// crates/conformance-store-mongo/src/convert.rs
// ============================================================================
// Module: BSON Projection
// Description: Converts stored BSON documents into JSON record fields.
// Purpose: Make stored values comparable with API response values.
// Dependencies: mongodb (bson), serde_json
// ============================================================================

//! ## Overview
//! `ObjectId` values become their hex strings and dates become RFC 3339
//! strings, matching how the service serializes them over GraphQL. Every
//! other value uses relaxed extended JSON.

// ============================================================================
// SECTION: Imports
// ============================================================================

use mongodb::bson::Bson;
use mongodb::bson::Document;
use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Conversion
// ============================================================================

/// Projects a document into top-level record fields.
#[must_use]
pub fn document_to_fields(document: Document) -> Map<String, Value> {
    document.into_iter().map(|(key, value)| (key, bson_to_json(value))).collect()
}

/// Converts one BSON value to JSON.
#[must_use]
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(date) => date
            .try_to_rfc3339_string()
            .map_or_else(|_| Value::from(date.timestamp_millis()), Value::String),
        Bson::Document(document) => Value::Object(document_to_fields(document)),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::Int32(number) => Value::from(number),
        Bson::Int64(number) => Value::from(number),
        other => other.into_relaxed_extjson(),
    }
}
