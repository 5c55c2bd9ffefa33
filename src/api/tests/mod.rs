use super::*;
use crate::downloader::test_helpers::{
    MockExtractor, create_test_downloader, create_test_downloader_with,
};
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;


/// Router + downloader + temp download dir backed by the default
/// (successful) mock engine.
async fn test_app() -> (Router, Arc<MediaDownloader>, tempfile::TempDir) {
    let (downloader, temp_dir) = create_test_downloader().await;
    let downloader = Arc::new(downloader);
    let config = downloader.get_config();
    (create_router(downloader.clone(), config), downloader, temp_dir)
}

/// Same as [`test_app`] but with a scripted mock engine.
async fn test_app_with(mock: MockExtractor) -> (Router, Arc<MediaDownloader>, tempfile::TempDir) {
    let (downloader, temp_dir) = create_test_downloader_with(mock).await;
    let downloader = Arc::new(downloader);
    let config = downloader.get_config();
    (create_router(downloader.clone(), config), downloader, temp_dir)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Poll the registry until the given job has an artifact, or panic after a
/// few seconds.
async fn wait_for_artifact(downloader: &MediaDownloader, id: crate::types::JobId) -> String {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(filename) = downloader.registry().get_artifact(id) {
            return filename;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "job {id} did not complete in time"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn cors_headers_are_present_when_enabled() {
    let (app, _downloader, _temp) = test_app().await;

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn cors_layer_is_absent_when_disabled() {
    let (downloader, _temp) = create_test_downloader().await;
    let downloader = Arc::new(downloader);
    let mut config = (*downloader.get_config()).clone();
    config.server.api.cors_enabled = false;
    let app = create_router(downloader, Arc::new(config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin"),
        "no CORS header should be set when CORS is disabled"
    );
}

#[tokio::test]
async fn api_server_binds_and_serves() {
    let (downloader, _temp) = create_test_downloader().await;
    let downloader = Arc::new(downloader);

    // Port 0 = OS assigns a free port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = (*downloader.get_config()).clone();
    config.server.api.bind_address = addr;
    let config = Arc::new(config);

    let app = create_router(downloader, config);
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    let stream = tokio::net::TcpStream::connect(addr).await;
    assert!(stream.is_ok(), "server should accept TCP connections");

    server_handle.abort();
}
