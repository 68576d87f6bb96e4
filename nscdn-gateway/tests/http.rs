use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use nscdn_core::{CdnConfig, StoreKind};
use nscdn_gateway::{build, load_config};
use tower::ServiceExt;

fn config(pairs: &[(&str, &str)]) -> CdnConfig {
    let mut config = CdnConfig::new();
    for (key, value) in pairs {
        config.set(*key, *value);
    }
    config
}

async fn body_text(res: axum::response::Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[test]
fn first_argument_overrides_port() {
    let config = load_config(vec!["9123".to_string(), "ignored".to_string()]);
    assert_eq!(config.get("http.port"), Some("9123"));
}

#[tokio::test]
async fn memory_store_round_trip() {
    let (settings, app) = build(&config(&[("store.kind", "memory"), ("legacy.origin", "")]))
        .await
        .unwrap();
    assert_eq!(settings.store, StoreKind::Memory);
    assert!(settings.legacy_origin.is_none());

    let res = app
        .router
        .clone()
        .oneshot(Request::put("/note.txt").body(Body::from("remember me")).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);

    let res = app
        .router
        .oneshot(Request::get("/note.txt").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(body_text(res).await, "remember me");
}

#[tokio::test]
async fn fs_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().to_str().unwrap();
    let cfg = config(&[("data.dir", data_dir), ("legacy.origin", "")]);

    let (_, app) = build(&cfg).await.unwrap();
    let res = app
        .router
        .oneshot(Request::post("/kept.bin").body(Body::from("persisted")).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);

    let (settings, app) = build(&cfg).await.unwrap();
    assert!(settings.table_path().exists());

    let res = app
        .router
        .clone()
        .oneshot(Request::get("/kept.bin").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_text(res).await, "persisted");

    let res = app
        .router
        .oneshot(Request::post("/next.bin").body(Body::from("later")).unwrap())
        .await
        .unwrap();
    let body = body_text(res).await;
    assert!(body.contains("\"id\":2"), "{body}");
}

#[tokio::test]
async fn bad_port_fails_to_build() {
    let result = build(&config(&[("http.port", "not-a-port"), ("store.kind", "memory")])).await;
    assert!(result.is_err());
}
