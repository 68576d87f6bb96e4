use axum::body::Body;
use axum::http::{header, response::Builder, StatusCode};
use axum::response::Response;
use nscdn_blob::ByteStream;
use nscdn_core::range::unsatisfied_content_range;
use nscdn_core::{FileRecord, ServedRange};

use crate::GatewayError;

const JSON: &str = "application/json";

fn with_cors(builder: Builder) -> Builder {
    builder
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .header(header::ACCESS_CONTROL_ALLOW_METHODS, "*")
        .header(header::ACCESS_CONTROL_ALLOW_HEADERS, "*")
}

/// Empty-bodied non-GET: permissive CORS, nothing else
pub fn preflight() -> Result<Response, GatewayError> {
    Ok(with_cors(Response::builder().status(StatusCode::OK)).body(Body::empty())?)
}

/// Record created by an upload
pub fn uploaded(record: &FileRecord) -> Result<Response, GatewayError> {
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, JSON)
        .body(Body::from(serde_json::to_vec(record)?))?)
}

/// `?info`: the record, no content
pub fn info(record: &FileRecord) -> Result<Response, GatewayError> {
    Ok(with_cors(Response::builder().status(StatusCode::OK))
        .header(header::CONTENT_TYPE, JSON)
        .body(Body::from(serde_json::to_vec(record)?))?)
}

pub fn full(record: &FileRecord, content: ByteStream) -> Result<Response, GatewayError> {
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, record.content_type.as_str())
        .header(header::CONTENT_LENGTH, record.size)
        .header(header::ACCEPT_RANGES, "bytes")
        .body(Body::from_stream(content))?)
}

/// 206 for `range` of `record`.
///
/// With `declared_length` the `Content-Length` is the whole object's size, as
/// older clients of this service expect, instead of the length served.
pub fn partial(
    record: &FileRecord,
    range: ServedRange,
    content: ByteStream,
    declared_length: bool,
) -> Result<Response, GatewayError> {
    let length = if declared_length { record.size } else { range.len() };

    Ok(Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, record.content_type.as_str())
        .header(header::CONTENT_RANGE, range.content_range())
        .header(header::CONTENT_LENGTH, length)
        .header(header::ACCEPT_RANGES, "bytes")
        .body(Body::from_stream(content))?)
}

/// 206 for an empty object: there is no byte to name in `Content-Range`
pub fn empty_partial(record: &FileRecord) -> Result<Response, GatewayError> {
    Ok(Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, record.content_type.as_str())
        .header(header::CONTENT_RANGE, unsatisfied_content_range(record.size))
        .header(header::CONTENT_LENGTH, 0)
        .body(Body::empty())?)
}

/// Unknown name with no legacy origin to ask
pub fn not_found(name: &str) -> Result<Response, GatewayError> {
    Ok(Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(format!("Not found: {name}")))?)
}
