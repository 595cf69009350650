//! Route tests for the HTTP API.
//!
//! Tests the router end to end with `tower::ServiceExt::oneshot`:
//! - Download dispatch and command listing
//! - Log retrieval and SSE streams
//! - File listing, download, deletion and audio extraction
//! - Static UI fallback

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use dh_core::files::FileStore;
use dh_core::jobs::Dispatcher;
use dh_core::registry::{CommandId, CommandRegistry};
use dh_core::runner::RunnerOptions;
use dh_protocol::config_models::ToolsConfig;
use dh_server::build_router;
use dh_server::state::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio_stream::StreamExt;
use tower::ServiceExt;

// ============================================================================
// Helper Functions
// ============================================================================

struct TestApp {
    state: AppState,
    downloads: TempDir,
    ui: TempDir,
}

impl TestApp {
    fn router(&self) -> Router {
        build_router(self.state.clone(), self.ui.path())
    }
}

/// `echo` stands in for the download tool, so its output is its arguments.
fn test_tools() -> ToolsConfig {
    ToolsConfig {
        yt_dlp: "echo".to_string(),
        yt_dlp_format: "worst".to_string(),
        ffmpeg: "true".to_string(),
    }
}

fn create_test_app(tools: ToolsConfig) -> TestApp {
    let downloads = tempfile::tempdir().expect("Failed to create temp dir");
    let ui = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(ui.path().join("index.html"), "<html>dlhub</html>").unwrap();
    std::fs::write(ui.path().join("app.js"), "console.log(1)").unwrap();

    let dispatcher = Dispatcher::new(
        Arc::new(CommandRegistry::new()),
        FileStore::new(downloads.path()),
        tools,
        RunnerOptions::default(),
    );

    TestApp {
        state: AppState::new(dispatcher),
        downloads,
        ui,
    }
}

async fn send_request(
    app: Router,
    method: &str,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, String) {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(body_json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body_json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.expect("Failed to send request");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");

    (status, String::from_utf8(body.to_vec()).expect("Invalid UTF-8"))
}

async fn wait_until_finished(app: &TestApp, id: &str) {
    let id: CommandId = id.parse().expect("valid command id");
    let registry = Arc::clone(app.state.registry());
    tokio::time::timeout(Duration::from_secs(10), async move {
        while !registry.lookup(id).unwrap().status.is_terminal() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("command did not finish in time");
}

async fn start_download(app: &TestApp, url: &str) -> String {
    let (status, body) =
        send_request(app.router(), "POST", "/api/yt-dlp", Some(json!({ "url": url }))).await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);

    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["status"], "ok");
    response["id"].as_str().unwrap().to_string()
}

// ============================================================================
// Download and Command Tests
// ============================================================================

#[tokio::test]
async fn test_commands_empty_initially() {
    let app = create_test_app(test_tools());
    let (status, body) = send_request(app.router(), "GET", "/api/commands", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({ "commands": [] }));
}

#[tokio::test]
async fn test_download_is_tracked_with_logs() {
    let app = create_test_app(test_tools());
    let id = start_download(&app, "https://example.com/v").await;
    assert_eq!(id, "cmd-1");
    wait_until_finished(&app, &id).await;

    let (status, body) = send_request(app.router(), "GET", "/api/commands", None).await;
    assert_eq!(status, StatusCode::OK);
    let list: Value = serde_json::from_str(&body).unwrap();
    let command = &list["commands"][0];
    assert_eq!(command["id"], "cmd-1");
    assert_eq!(command["url"], "https://example.com/v");
    assert_eq!(command["status"], "completed");
    assert_eq!(command["exit_code"], 0);

    let (status, body) =
        send_request(app.router(), "GET", "/api/commands/cmd-1/logs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({ "id": "cmd-1", "logs": ["-f worst -- https://example.com/v"] })
    );
}

#[tokio::test]
async fn test_download_rejects_malformed_body() {
    let app = create_test_app(test_tools());
    let request = Request::builder()
        .method("POST")
        .uri("/api/yt-dlp")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_download_rejects_empty_url() {
    let app = create_test_app(test_tools());
    let (status, body) =
        send_request(app.router(), "POST", "/api/yt-dlp", Some(json!({ "url": "" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("\"error\""));
}

#[tokio::test]
async fn test_download_launch_failure_is_internal_error() {
    let tools = ToolsConfig {
        yt_dlp: "/nonexistent/dlhub/yt-dlp".to_string(),
        ..test_tools()
    };
    let app = create_test_app(tools);
    let (status, body) = send_request(
        app.router(),
        "POST",
        "/api/yt-dlp",
        Some(json!({ "url": "https://example.com/v" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("/nonexistent/dlhub/yt-dlp"));
    assert!(app.state.registry().is_empty());
}

#[tokio::test]
async fn test_logs_of_unknown_command() {
    let app = create_test_app(test_tools());

    for path in ["/api/commands/cmd-9/logs", "/api/commands/cmd-9/logs/stream"] {
        let (status, body) = send_request(app.router(), "GET", path, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            serde_json::from_str::<Value>(&body).unwrap(),
            json!({ "error": "Command cmd-9 not found" })
        );
    }
}

// ============================================================================
// SSE Tests
// ============================================================================

#[tokio::test]
async fn test_log_stream_replays_and_ends_with_done() {
    let app = create_test_app(test_tools());
    let id = start_download(&app, "https://example.com/v").await;
    wait_until_finished(&app, &id).await;

    let path = format!("/api/commands/{}/logs/stream", id);
    let response = app
        .router()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();

    let line = text
        .find("data: {\"line\":\"-f worst -- https://example.com/v\"}")
        .expect("log line event");
    let done = text.find("event: done\ndata: {}").expect("done event");
    assert!(line < done);
}

#[tokio::test]
async fn test_command_stream_starts_with_current_state() {
    let app = create_test_app(test_tools());
    let id = start_download(&app, "https://example.com/v").await;
    wait_until_finished(&app, &id).await;

    let response = app
        .router()
        .oneshot(
            Request::builder()
                .uri("/api/commands/stream")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut frames = response.into_body().into_data_stream();
    let first = tokio::time::timeout(Duration::from_secs(5), frames.next())
        .await
        .expect("first event in time")
        .expect("stream open")
        .expect("frame");
    let text = String::from_utf8(first.to_vec()).unwrap();

    assert!(text.starts_with("data: "));
    assert!(text.contains("\"id\":\"cmd-1\""));
    assert!(text.contains("\"status\":\"completed\""));
    assert_eq!(app.state.registry().subscriber_count(), 1);

    drop(frames);
    assert_eq!(app.state.registry().subscriber_count(), 0);
}

// ============================================================================
// File Tests
// ============================================================================

#[tokio::test]
async fn test_list_download_and_delete_file() {
    let app = create_test_app(test_tools());
    std::fs::write(app.downloads.path().join("clip.mp4"), "0123456789").unwrap();

    let (status, body) = send_request(app.router(), "GET", "/api/files", None).await;
    assert_eq!(status, StatusCode::OK);
    let list: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(list["files"][0]["name"], "clip.mp4");
    assert_eq!(list["files"][0]["size"], 10);
    assert!(list["files"][0]["mod_time"].is_string());

    let (status, body) = send_request(app.router(), "GET", "/api/files/clip.mp4", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "0123456789");

    let (status, body) = send_request(app.router(), "DELETE", "/api/files/clip.mp4", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({ "message": "File deleted successfully" })
    );
    assert!(!app.downloads.path().join("clip.mp4").exists());

    let (status, _) = send_request(app.router(), "DELETE", "/api/files/clip.mp4", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_file_download_supports_ranges() {
    let app = create_test_app(test_tools());
    std::fs::write(app.downloads.path().join("clip.mp4"), "0123456789").unwrap();

    let request = Request::builder()
        .uri("/api/files/clip.mp4")
        .header(header::RANGE, "bytes=2-5")
        .body(Body::empty())
        .unwrap();
    let response = app.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"2345");
}

#[tokio::test]
async fn test_file_paths_cannot_escape_download_directory() {
    let app = create_test_app(test_tools());
    let (status, body) =
        send_request(app.router(), "GET", "/api/files/..%2Fsecret.txt", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({ "error": "Invalid filename" })
    );
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let app = create_test_app(test_tools());
    let (status, body) = send_request(app.router(), "GET", "/api/files/absent.mp4", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("File not found"));
}

#[tokio::test]
async fn test_extract_audio_existing_target() {
    let app = create_test_app(test_tools());
    std::fs::write(app.downloads.path().join("clip.mp4"), "v").unwrap();
    std::fs::write(app.downloads.path().join("clip.mp3"), "abc").unwrap();

    let (status, body) = send_request(
        app.router(),
        "POST",
        "/api/files/clip.mp4/extract-audio",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({
            "status": "exists",
            "message": "MP3 file already exists",
            "filename": "clip.mp3",
            "size": 3,
            "download_url": "/api/files/clip.mp3"
        })
    );
}

#[tokio::test]
async fn test_extract_audio_starts_command() {
    let app = create_test_app(test_tools());
    std::fs::write(app.downloads.path().join("clip.mp4"), "v").unwrap();

    let (status, body) = send_request(
        app.router(),
        "POST",
        "/api/files/clip.mp4/extract-audio",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["status"], "ok");
    assert_eq!(response["id"], "cmd-1");

    let entry = app.state.registry().lookup(CommandId(1)).unwrap();
    assert_eq!(entry.label, "Extract audio: clip.mp4");
}

#[tokio::test]
async fn test_extract_audio_missing_source() {
    let app = create_test_app(test_tools());
    let (status, _) = send_request(
        app.router(),
        "POST",
        "/api/files/absent.mp4/extract-audio",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Fallback Tests
// ============================================================================

#[tokio::test]
async fn test_unknown_api_path_is_json_404() {
    let app = create_test_app(test_tools());
    let (status, body) = send_request(app.router(), "GET", "/api/unknown", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({ "error": "Not found" })
    );
}

#[tokio::test]
async fn test_static_assets_and_spa_fallback() {
    let app = create_test_app(test_tools());

    let (status, body) = send_request(app.router(), "GET", "/app.js", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "console.log(1)");

    let (status, body) = send_request(app.router(), "GET", "/downloads/recent", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<html>dlhub</html>");
}
