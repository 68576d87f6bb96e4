use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::request::Parts;
use axum::response::Response;
use futures::TryStreamExt;
use nscdn_blob::{ByteRange, ByteStream, StoredBlob};
use nscdn_core::{classify, Exchange, NewUpload, ReadRequest, Resolution};
use tracing::{debug, info, instrument};

use crate::{respond, GatewayError, GatewayParams, GatewayState};

/// The single handler behind every method and path.
///
/// The body is always drained into the content store first; its length and
/// hash decide between upload, read and CORS preflight.
#[instrument(skip_all, fields(method = %request.method(), path = %request.uri().path()))]
pub async fn handle(
    State(state): State<GatewayState>,
    request: Request,
) -> Result<Response, GatewayError> {
    let (parts, body) = request.into_parts();

    let observed = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&observed);
    let stream: ByteStream = Box::pin(
        body.into_data_stream()
            .map_err(std::io::Error::other)
            .inspect_ok(move |chunk| {
                counter.fetch_add(chunk.len() as u64, Ordering::Relaxed);
            }),
    );

    let stored = state.blobs.store(stream).await?;
    let length = observed.load(Ordering::Relaxed);
    let params = GatewayParams::from_parts(&parts);

    match classify(params.is_get(), length, &stored.hash) {
        Exchange::Preflight => respond::preflight(),
        Exchange::Read => read(&state, &parts, &params).await,
        Exchange::Upload => upload(&state, params, stored, length).await,
    }
}

async fn upload(
    state: &GatewayState,
    params: GatewayParams,
    stored: StoredBlob,
    length: u64,
) -> Result<Response, GatewayError> {
    let mut upload = NewUpload::new(params.name, stored.hash, length);
    upload.content_type = params.content_type;

    let record = state.files.create(upload).await?;
    respond::uploaded(&record)
}

async fn read(
    state: &GatewayState,
    parts: &Parts,
    params: &GatewayParams,
) -> Result<Response, GatewayError> {
    let request = ReadRequest::new(&params.name)
        .with_info(params.info)
        .with_range(params.range.as_deref());

    match state.files.resolve(&request).await? {
        Resolution::Fallback => {
            info!(name = %params.name, "unknown name, asking legacy origin");
            match state.legacy.resolve(&params.name, &parts.headers).await? {
                Some(response) => Ok(response),
                None => respond::not_found(&params.name),
            }
        }
        Resolution::Info(record) => respond::info(&record),
        Resolution::Full(record) => {
            let content = state.blobs.read(&record.hash, None).await?;
            respond::full(&record, content)
        }
        Resolution::Partial {
            record,
            range: Some(range),
        } => {
            debug!(range = %range.content_range(), "serving partial content");
            let content = state
                .blobs
                .read(&record.hash, Some(ByteRange::inclusive(range.first, range.last)))
                .await?;
            respond::partial(&record, range, content, state.declared_range_length)
        }
        Resolution::Partial { record, range: None } => respond::empty_partial(&record),
    }
}
