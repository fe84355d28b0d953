// crates/conformance-http/src/multipart.rs
// ============================================================================
// Module: Multipart Bodies
// Description: Streams fixture files into multipart/form-data bodies.
// Purpose: Upload models, datasets, and plugins without buffering files.
// Dependencies: conformance-core, reqwest, tokio, tokio-util
// ============================================================================

//! ## Overview
//! Each [`FilePart`] becomes one file part named after its form field, with
//! the file name taken from the path. A request with no parts still sends a
//! well-formed, empty multipart body.

// ============================================================================
// SECTION: Imports
// ============================================================================

use conformance_core::FilePart;
use conformance_core::TransportError;
use reqwest::Body;
use reqwest::multipart::Form;
use reqwest::multipart::Part;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

// ============================================================================
// SECTION: Form Construction
// ============================================================================

/// Builds a multipart form whose file parts stream from disk.
///
/// # Errors
///
/// Returns [`TransportError::Fixture`] when a file cannot be opened.
pub async fn build_form(parts: &[FilePart]) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for part in parts {
        form = form.part(part.field.clone(), file_part(part).await?);
    }
    Ok(form)
}

/// Opens one fixture file as a streamed part.
async fn file_part(part: &FilePart) -> Result<Part, TransportError> {
    let fixture_error = |err: std::io::Error| TransportError::Fixture {
        path: part.path.display().to_string(),
        message: err.to_string(),
    };
    let file = File::open(&part.path).await.map_err(fixture_error)?;
    let len = file.metadata().await.map_err(fixture_error)?.len();
    let file_name = part.path.file_name().map_or_else(
        || part.path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    );
    Part::stream_with_length(Body::wrap_stream(ReaderStream::new(file)), len)
        .file_name(file_name)
        .mime_str("application/octet-stream")
        .map_err(|err| TransportError::InvalidRequest(err.to_string()))
}
