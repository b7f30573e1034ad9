mod common;

use std::sync::Arc;

use hyper::{header, Method, StatusCode, Version};

use asset_worker::config::Config;
use asset_worker::worker::{fetch, Context, Env, Error, ASSETS_BINDING};
use common::{body_bytes, request, Recorder};

fn env_with(recorder: &Arc<Recorder>) -> Env {
    Env::new().with_binding(ASSETS_BINDING, Arc::clone(recorder) as _)
}

#[tokio::test]
async fn delegates_exactly_once_with_the_original_request() {
    let recorder = Recorder::responding(200, "hello");
    let env = env_with(&recorder);
    let ctx = Context::new();

    let mut req = request(
        Method::POST,
        "/api/items?page=2&sort=desc",
        &[
            ("content-type", "application/json"),
            ("x-custom", "one"),
            ("cookie", "session=abc"),
        ],
        b"{\"name\":\"widget\"}",
    );
    *req.version_mut() = Version::HTTP_10;
    req.headers_mut()
        .append("x-custom", header::HeaderValue::from_static("two"));
    let expected_headers = req.headers().clone();

    fetch(req, &env, &ctx).await.unwrap();

    let seen = recorder.seen();
    assert_eq!(seen.len(), 1);
    let seen = &seen[0];
    assert_eq!(seen.method, Method::POST);
    assert_eq!(seen.uri, "/api/items?page=2&sort=desc");
    assert_eq!(seen.version, Version::HTTP_10);
    assert_eq!(seen.headers, expected_headers);
    assert_eq!(
        seen.headers.get_all("x-custom").iter().collect::<Vec<_>>(),
        vec!["one", "two"]
    );
    assert_eq!(seen.body, "{\"name\":\"widget\"}");
}

#[tokio::test]
async fn returns_the_binding_response_unchanged() {
    for status in [200, 204, 301, 304, 404, 416, 500, 503] {
        let recorder = Recorder::responding(status, "from the binding");
        let env = env_with(&recorder);

        let response = fetch(common::get("/index.html"), &env, &Context::new())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::from_u16(status).unwrap());
        assert_eq!(response.headers()["x-from-binding"], "yes");
        assert_eq!(response.headers().len(), 1);
        assert_eq!(body_bytes(response).await, "from the binding");
        assert_eq!(recorder.seen().len(), 1);
    }
}

#[tokio::test]
async fn binding_errors_propagate_unchanged() {
    let recorder = Recorder::failing("upstream exploded");
    let env = env_with(&recorder);

    match fetch(common::get("/"), &env, &Context::new()).await {
        Err(Error::Fetch(message)) => assert_eq!(message, "upstream exploded"),
        other => panic!("expected Fetch error, got {:?}", other.map(|r| r.status())),
    }
    assert_eq!(recorder.seen().len(), 1);
}

#[tokio::test]
async fn missing_assets_binding_is_an_error() {
    let recorder = Recorder::responding(200, "unused");
    let env = Env::new().with_binding("OTHER", Arc::clone(&recorder) as _);

    match fetch(common::get("/"), &env, &Context::new()).await {
        Err(Error::BindingNotFound(name)) => assert_eq!(name, "ASSETS"),
        other => panic!("expected BindingNotFound, got {:?}", other.map(|r| r.status())),
    }
    assert!(recorder.seen().is_empty());
}

#[tokio::test]
async fn forwarding_registers_no_background_work() {
    let recorder = Recorder::responding(200, "ok");
    let env = env_with(&recorder);
    let ctx = Context::new();

    fetch(common::get("/"), &env, &ctx).await.unwrap();
    assert_eq!(ctx.pending(), 0);
}

#[tokio::test]
async fn forwards_through_a_renamed_assets_binding() {
    let recorder = Recorder::responding(200, "renamed");
    let env = Env::new().with_assets("STATIC", Arc::clone(&recorder) as _);

    let response = fetch(common::get("/"), &env, &Context::new()).await.unwrap();
    assert_eq!(body_bytes(response).await, "renamed");
    assert_eq!(recorder.seen().len(), 1);
}

#[tokio::test]
async fn configured_binding_name_is_honoured() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();

    let mut config = Config::load_from("definitely/not/here/config").unwrap();
    config.assets.binding = "STATIC".to_string();
    config.assets.directory = dir.path().to_str().unwrap().to_string();
    let env = asset_worker::build_env(&config).unwrap();

    let response = fetch(common::get("/"), &env, &Context::new()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, "<h1>home</h1>");
}
