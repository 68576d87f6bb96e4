use std::collections::HashMap;

use axum::extract::Query;
use axum::http::{header, request::Parts, Method};

/// The parts of an exchange the core cares about, lifted out of the request head
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayParams {
    pub method: Method,
    /// Request path without its leading `/`, exactly as sent (still percent-encoded)
    pub name: String,
    pub info: bool,
    pub range: Option<String>,
    pub content_type: Option<String>,
}

impl GatewayParams {
    pub fn from_parts(parts: &Parts) -> Self {
        let path = parts.uri.path();
        let name = path.strip_prefix('/').unwrap_or(path).to_string();

        let info = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map(|Query(query)| query.contains_key("info"))
            .unwrap_or(false);

        Self {
            method: parts.method.clone(),
            name,
            info,
            range: header_text(parts, header::RANGE),
            content_type: header_text(parts, header::CONTENT_TYPE),
        }
    }

    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }
}

fn header_text(parts: &Parts, name: header::HeaderName) -> Option<String> {
    parts
        .headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn params(req: Request<()>) -> GatewayParams {
        let (parts, _) = req.into_parts();
        GatewayParams::from_parts(&parts)
    }

    #[test]
    fn strips_only_the_leading_slash() {
        let p = params(Request::get("/dir/my%20file.txt").body(()).unwrap());
        assert_eq!(p.name, "dir/my%20file.txt");
        assert!(p.is_get());
        assert!(!p.info);
    }

    #[test]
    fn info_flag_with_or_without_value() {
        assert!(params(Request::get("/a?info").body(()).unwrap()).info);
        assert!(params(Request::get("/a?x=1&info=0").body(()).unwrap()).info);
        assert!(!params(Request::get("/a?information").body(()).unwrap()).info);
    }

    #[test]
    fn lifts_range_and_content_type() {
        let p = params(
            Request::put("/a")
                .header("range", "bytes=1-2")
                .header("content-type", "image/png")
                .body(())
                .unwrap(),
        );
        assert_eq!(p.range.as_deref(), Some("bytes=1-2"));
        assert_eq!(p.content_type.as_deref(), Some("image/png"));
        assert!(!p.is_get());
    }
}
