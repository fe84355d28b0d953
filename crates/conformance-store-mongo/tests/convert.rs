// crates/conformance-store-mongo/tests/convert.rs
// ============================================================================
// Module: BSON Projection Tests
// Description: Stored documents project into API-comparable JSON.
// ============================================================================
//! ## Overview
//! Verifies identifier, date, nested, and numeric projections.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::missing_docs_in_private_items,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use conformance_store_mongo::bson_to_json;
use conformance_store_mongo::document_to_fields;
use mongodb::bson::Bson;
use mongodb::bson::DateTime;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use proptest::prelude::*;
use serde_json::json;

#[test]
fn model_document_projects_to_plain_json() {
    let oid = ObjectId::parse_str("65a1b2c3d4e5f60718293a4b").unwrap();
    let document = doc! {
        "_id": oid,
        "name": "credit model",
        "status": "Valid",
        "size": 12_i64,
        "tags": ["a", "b"],
        "meta": { "owner": oid, "version": 2_i32 },
        "description": Bson::Null,
    };
    let fields = document_to_fields(document);

    assert_eq!(fields["_id"], json!("65a1b2c3d4e5f60718293a4b"));
    assert_eq!(fields["name"], json!("credit model"));
    assert_eq!(fields["size"], json!(12));
    assert_eq!(fields["tags"], json!(["a", "b"]));
    assert_eq!(fields["meta"], json!({ "owner": "65a1b2c3d4e5f60718293a4b", "version": 2 }));
    assert_eq!(fields["description"], json!(null));
}

#[test]
fn dates_render_as_rfc3339() {
    let date = DateTime::from_millis(0);
    assert_eq!(bson_to_json(Bson::DateTime(date)), json!("1970-01-01T00:00:00Z"));
}

proptest! {
    #[test]
    fn strings_and_integers_are_preserved(text in ".{0,32}", number in any::<i64>()) {
        prop_assert_eq!(bson_to_json(Bson::String(text.clone())), json!(text));
        prop_assert_eq!(bson_to_json(Bson::Int64(number)), json!(number));
    }
}
