mod common;

use common::*;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use viewer_automation::services::ViewerAutomationService;
use viewer_automation::storage::MemoryBlobStore;
use viewer_automation::transport::HttpMethod;
use viewer_automation::web::{create_app, AppState};

struct TestServer {
    base: String,
    transport: Arc<ScriptedTransport>,
    http: reqwest::Client,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }
}

async fn spawn_server() -> TestServer {
    let transport = Arc::new(ScriptedTransport::new());
    let store = Arc::new(MemoryBlobStore::new(BUCKET));
    let service = ViewerAutomationService::new(Arc::new(test_config()), transport.clone(), store);
    let app = create_app(AppState::new(Arc::new(service)), Duration::from_secs(30));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base: format!("http://{addr}"),
        transport,
        http: reqwest::Client::new(),
    }
}

#[tokio::test]
async fn test_health_lists_activities() {
    let server = spawn_server().await;

    let response = server.http.get(server.url("/health")).send().await.unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(
        body["activities"],
        json!(["MyPublishActivity3d", "MyPublishActivity2d"])
    );
}

#[tokio::test]
async fn test_upload_location_accepts_legacy_field_name() {
    let server = spawn_server().await;

    let response = server
        .http
        .post(server.url("/v1/upload-location"))
        .json(&json!({ "dwgname": "floor%20plan.dwg" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    let url = body["Result"].as_str().unwrap();
    assert!(url.starts_with("https://viewer-bucket.s3.amazonaws.com/drawings/"));
    assert!(url.contains("/floor%20plan.dwg?"));
}

#[tokio::test]
async fn test_upload_location_without_body_uses_default_name() {
    let server = spawn_server().await;

    let response = server
        .http
        .post(server.url("/v1/upload-location"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert!(body["Result"].as_str().unwrap().contains("/input.dwg?"));
}

#[tokio::test]
async fn test_submit_with_unknown_activity_is_bad_request() {
    let server = spawn_server().await;

    let response = server
        .http
        .post(server.url("/v1/workitems"))
        .json(&json!({
            "activityName": "Nope",
            "drawingLocation": "https://viewer-bucket.s3.amazonaws.com/drawings/x/a.dwg?sig=1"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "InvalidInput");
    assert!(body["error"].as_str().unwrap().contains("invalid activity name"));
    assert_eq!(server.transport.call_count(), 0);
}

#[tokio::test]
async fn test_submit_returns_work_item_id() {
    let server = spawn_server().await;
    script_token(&server.transport);
    script_provisioned(&server.transport, &test_config());
    server.transport.respond_json(
        HttpMethod::Post,
        &workitem_endpoint(),
        201,
        json!({ "Id": "wi-99" }),
    );

    let response = server
        .http
        .post(server.url("/v1/workitems"))
        .json(&json!({
            "activityname": "MyPublishActivity3d",
            "dwglocation": "https://viewer-bucket.s3.amazonaws.com/drawings/x/a.dwg?sig=1"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "Result": "wi-99" }));
}

#[tokio::test]
async fn test_status_route_reports_outcome() {
    let server = spawn_server().await;
    script_token(&server.transport);
    server.transport.respond_json(
        HttpMethod::Get,
        &point(&workitem_endpoint(), "wi 1"),
        200,
        work_item_record("Succeeded"),
    );

    let response = server
        .http
        .get(server.url("/v1/workitems/wi%201/status"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["StatusText"], "Succeeded");
    assert_eq!(body["Result"]["Output"], "https://x/out.zip");
    assert_eq!(body["Result"]["Report"], "https://x/report.txt");
}

#[tokio::test]
async fn test_status_route_pending_has_null_result() {
    let server = spawn_server().await;
    script_token(&server.transport);
    server.transport.respond_json(
        HttpMethod::Get,
        &point(&workitem_endpoint(), "wi-2"),
        200,
        work_item_record("Pending"),
    );

    let response = server
        .http
        .get(server.url("/v1/workitems/wi-2/status"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "StatusText": "Pending", "Result": null }));
}

#[tokio::test]
async fn test_status_route_maps_remote_failure_to_bad_gateway() {
    let server = spawn_server().await;
    script_token(&server.transport);
    server.transport.respond(
        HttpMethod::Get,
        &point(&workitem_endpoint(), "gone"),
        404,
        "WorkItem not found",
    );

    let response = server
        .http
        .get(server.url("/v1/workitems/gone/status"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "WorkItem not found");
    assert_eq!(body["kind"], "UpstreamError");
    assert_eq!(body["Result"], "Error message");
}

#[tokio::test]
async fn test_results_route_returns_viewer_locations() {
    let server = spawn_server().await;
    let output = "https://results.example.com/wi-1/out.zip";
    server.transport.respond(
        HttpMethod::Get,
        output,
        200,
        zip_archive(&[
            ("output/1/result.f2d", b"f2d".as_slice()),
            ("xdata.json", b"{}".as_slice()),
        ]),
    );

    let response = server
        .http
        .post(server.url("/v1/results"))
        .json(&json!({ "outputURL": output }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert!(body["Result"]
        .as_str()
        .unwrap()
        .ends_with("/output/1/result.f2d"));
    assert!(body["CustomData"].as_str().unwrap().ends_with("/xdata.json"));
}

#[tokio::test]
async fn test_results_route_without_url_is_bad_request() {
    let server = spawn_server().await;

    let response = server
        .http
        .post(server.url("/v1/results"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "InvalidInput");
    assert_eq!(body["Result"], "Error message");
}
