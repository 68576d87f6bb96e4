use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::error;

/// Uniform failure boundary: whatever went wrong becomes a 500 whose
/// plain-text body is the error's display string.
#[derive(Debug)]
pub struct GatewayError(pub anyhow::Error);

impl<E> From<E> for GatewayError
where
    E: Into<anyhow::Error>,
{
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            self.0.to_string(),
        )
            .into_response()
    }
}
