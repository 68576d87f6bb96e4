//! Fallback for names this gateway has never seen.
//!
//! Before local storage existed every file was served by a previous CDN. Reads
//! that miss the local table are relayed there untouched.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName};
use axum::response::Response;
use tracing::{debug, instrument, warn};

/// Something that can answer a read for `name` when the local table can't
#[async_trait]
pub trait LegacyOrigin: Send + Sync {
    /// Relay a read. `Ok(None)` means there is nothing to fall back to.
    async fn resolve(&self, name: &str, headers: &HeaderMap) -> anyhow::Result<Option<Response>>;
}

/// No fallback: unknown names are simply not found
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLegacyOrigin;

#[async_trait]
impl LegacyOrigin for NoLegacyOrigin {
    async fn resolve(&self, _name: &str, _headers: &HeaderMap) -> anyhow::Result<Option<Response>> {
        Ok(None)
    }
}

/// Transparent reverse proxy to `{base}/{name}`
#[derive(Debug, Clone)]
pub struct HttpLegacyOrigin {
    client: reqwest::Client,
    base: String,
}

impl HttpLegacyOrigin {
    pub fn new<S: Into<String>>(base: S) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self::with_client(client, base))
    }

    pub fn with_client<S: Into<String>>(client: reqwest::Client, base: S) -> Self {
        let base = base.into();
        Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.base, name)
    }
}

/// Connection-scoped headers that must not be copied between hops
fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection" | "keep-alive" | "transfer-encoding" | "upgrade" | "te" | "trailer"
            | "proxy-connection"
    )
}

#[async_trait]
impl LegacyOrigin for HttpLegacyOrigin {
    #[instrument(skip(self, headers), fields(origin = %self.base))]
    async fn resolve(&self, name: &str, headers: &HeaderMap) -> anyhow::Result<Option<Response>> {
        let mut forwarded = HeaderMap::with_capacity(headers.len());
        for (key, value) in headers {
            if *key != header::HOST && !is_hop_by_hop(key) {
                forwarded.append(key.clone(), value.clone());
            }
        }

        let upstream = match self.client.get(self.url_for(name)).headers(forwarded).send().await {
            Ok(upstream) => upstream,
            Err(e) => {
                warn!(error = %e, "legacy origin unreachable");
                return Err(e.into());
            }
        };

        let status = upstream.status();
        debug!(%status, "legacy origin answered");

        let mut response = Response::builder().status(status);
        for (key, value) in upstream.headers() {
            if !is_hop_by_hop(key) {
                response = response.header(key, value);
            }
        }

        Ok(Some(response.body(Body::from_stream(upstream.bytes_stream()))?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_is_normalized() {
        let origin = HttpLegacyOrigin::new("https://cdn.example/").unwrap();
        assert_eq!(origin.base(), "https://cdn.example");
        assert_eq!(origin.url_for("a/b.png"), "https://cdn.example/a/b.png");
    }

    #[test]
    fn hop_by_hop_headers_are_recognized() {
        assert!(is_hop_by_hop(&header::CONNECTION));
        assert!(is_hop_by_hop(&header::TRANSFER_ENCODING));
        assert!(!is_hop_by_hop(&header::CONTENT_LENGTH));
        assert!(!is_hop_by_hop(&header::ETAG));
    }

    #[tokio::test]
    async fn no_origin_never_answers() {
        let answer = NoLegacyOrigin.resolve("x", &HeaderMap::new()).await.unwrap();
        assert!(answer.is_none());
    }
}
