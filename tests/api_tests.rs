//! HTTP integration tests
//! Drives the router in-process with `tower::ServiceExt::oneshot`.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use royalbit_profitview::api::handlers::ApiResponse;
use royalbit_profitview::api::{build_router, ApiConfig, AppState};
use royalbit_profitview::chart::ChartOptions;
use royalbit_profitview::storage::UploadStore;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "profitview-test-boundary";

fn test_app(dir: &TempDir) -> Router {
    let state = AppState {
        version: "test".to_string(),
        uploads: UploadStore::new(dir.path().join("uploads")),
        chart: ChartOptions {
            width: 320,
            height: 240,
        },
    };
    build_router(Arc::new(state))
}

fn multipart_request(uri: &str, field: &str, filename: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n--{b}--\r\n",
        b = BOUNDARY,
    );
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

// ═══════════════════════════════════════════════════════════════════════════
// CONFIG TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_config_default() {
    let config = ApiConfig::default();
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8080);
    assert_eq!(config.upload_dir, PathBuf::from("uploads"));
}

#[test]
fn test_config_custom() {
    let config = ApiConfig {
        host: "0.0.0.0".to_string(),
        port: 3000,
        upload_dir: PathBuf::from("/var/lib/profitview"),
        chart: ChartOptions {
            width: 1200,
            height: 600,
        },
    };
    let state = AppState::from_config(&config);
    assert_eq!(state.chart.width, 1200);
    assert_eq!(state.uploads.dir(), PathBuf::from("/var/lib/profitview"));
}

#[test]
fn test_api_response_unique_ids() {
    let r1: ApiResponse<i32> = ApiResponse::ok(1);
    let r2: ApiResponse<i32> = ApiResponse::ok(2);
    assert_ne!(r1.request_id, r2.request_id);
}

// ═══════════════════════════════════════════════════════════════════════════
// HTML PAGE
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_get_index_shows_form() {
    let dir = TempDir::new().unwrap();
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let (status, html) = send(test_app(&dir), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"<input type="file" name="file""#));
    assert!(!html.contains("Total Revenue"));
}

#[tokio::test]
async fn test_post_valid_csv_renders_summary() {
    let dir = TempDir::new().unwrap();
    let request = multipart_request("/", "file", "sales.csv", "revenue,cost\n100,40\n200,150");

    let (status, html) = send(test_app(&dir), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<tr><th>Total Revenue</th><td>300</td></tr>"));
    assert!(html.contains("<tr><th>Total Profit</th><td>110</td></tr>"));
    assert!(html.contains("36.67%"));
    assert!(html.contains("src=\"data:image/png;base64,"));
    assert!(html.contains("<td>2024-01-02</td>"));
}

#[tokio::test]
async fn test_post_valid_csv_embeds_decodable_chart() {
    use base64::Engine as _;

    let dir = TempDir::new().unwrap();
    let request = multipart_request("/", "file", "sales.csv", "revenue,cost\n100,40\n200,150");

    let (_, html) = send(test_app(&dir), request).await;

    assert!(!html.contains("Error processing file"));
    let start = html.find("data:image/png;base64,").unwrap() + "data:image/png;base64,".len();
    let end = start + html[start..].find('"').unwrap();
    let png = base64::engine::general_purpose::STANDARD
        .decode(&html[start..end])
        .unwrap();
    let frame = image::load_from_memory(&png).unwrap().to_rgb8();
    assert_eq!(frame.dimensions(), (320, 240));
}

#[tokio::test]
async fn test_post_blank_cell_still_renders_summary() {
    let dir = TempDir::new().unwrap();
    let request = multipart_request("/", "file", "gaps.csv", "revenue,cost\n100,40\n200,");

    let (status, html) = send(test_app(&dir), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!html.contains("Error processing file"));
    assert!(html.contains("<tr><th>Total Revenue</th><td>300</td></tr>"));
    assert!(html.contains("<tr><th>Total Cost</th><td>40</td></tr>"));
    assert!(html.contains("20.00%"));
}

#[tokio::test]
async fn test_post_stores_upload() {
    let dir = TempDir::new().unwrap();
    let request = multipart_request("/", "file", "stored.csv", "revenue,cost\n1,1");

    send(test_app(&dir), request).await;

    let stored = dir.path().join("uploads").join("stored.csv");
    assert_eq!(std::fs::read_to_string(stored).unwrap(), "revenue,cost\n1,1");
}

#[tokio::test]
async fn test_post_strips_directories_from_filename() {
    let dir = TempDir::new().unwrap();
    let request = multipart_request("/", "file", "../../escape.csv", "revenue,cost\n1,1");

    let (status, _) = send(test_app(&dir), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(dir.path().join("uploads").join("escape.csv").exists());
    assert!(!dir.path().join("escape.csv").exists());
}

#[tokio::test]
async fn test_post_missing_columns_shows_schema_error() {
    let dir = TempDir::new().unwrap();
    let request = multipart_request("/", "file", "bad.csv", "amount,price\n1,2");

    let (status, html) = send(test_app(&dir), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(
        "CSV must contain &#39;Revenue&#39; and &#39;Cost&#39; columns (case-insensitive)."
    ));
    assert!(!html.contains("Total Revenue"));
}

#[tokio::test]
async fn test_post_malformed_csv_shows_processing_error() {
    let dir = TempDir::new().unwrap();
    let request = multipart_request("/", "file", "bad.csv", "revenue,cost\nabc,2");

    let (status, html) = send(test_app(&dir), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Error processing file: Invalid number on line 2"));
}

#[tokio::test]
async fn test_post_empty_filename_stays_on_form() {
    let dir = TempDir::new().unwrap();
    let request = multipart_request("/", "file", "", "");

    let (status, html) = send(test_app(&dir), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!html.contains("class=\"error\""));
    assert!(!html.contains("Total Revenue"));
}

#[tokio::test]
async fn test_post_without_file_field_stays_on_form() {
    let dir = TempDir::new().unwrap();
    let request = multipart_request("/", "attachment", "sales.csv", "revenue,cost\n1,1");

    let (status, html) = send(test_app(&dir), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!html.contains("class=\"error\""));
    assert!(!dir.path().join("uploads").join("sales.csv").exists());
}

// ═══════════════════════════════════════════════════════════════════════════
// JSON ENDPOINTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_summary_endpoint_success() {
    let dir = TempDir::new().unwrap();
    let request = multipart_request(
        "/api/v1/summary",
        "file",
        "sales.csv",
        "revenue,cost\n100,40\n200,150",
    );

    let (status, body) = send(test_app(&dir), request).await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["revenue"], 300.0);
    assert_eq!(json["data"]["cost"], 190.0);
    assert_eq!(json["data"]["profit"], 110.0);
    assert_eq!(json["data"]["margin"], 36.67);
    assert_eq!(json["data"]["data"][1]["Date"], "2024-01-02");
    assert!(json["data"]["plot_url"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn test_summary_endpoint_schema_error() {
    let dir = TempDir::new().unwrap();
    let request = multipart_request("/api/v1/summary", "file", "x.csv", "date\n2024-01-01");

    let (status, body) = send(test_app(&dir), request).await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], false);
    assert_eq!(json["error_kind"], "schema");
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn test_summary_endpoint_without_file() {
    let dir = TempDir::new().unwrap();
    let request = multipart_request("/api/v1/summary", "other", "x.csv", "revenue,cost");

    let (_, body) = send(test_app(&dir), request).await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();

    assert_eq!(json["success"], false);
    assert_eq!(json["error_kind"], "processing");
}

#[tokio::test]
async fn test_health_endpoint() {
    let dir = TempDir::new().unwrap();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, body) = send(test_app(&dir), request).await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "healthy");
}

#[tokio::test]
async fn test_version_endpoint() {
    let dir = TempDir::new().unwrap();
    let request = Request::builder().uri("/version").body(Body::empty()).unwrap();

    let (_, body) = send(test_app(&dir), request).await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();

    assert_eq!(json["data"]["version"], "test");
    assert!(json["data"]["upload_dir"]
        .as_str()
        .unwrap()
        .ends_with("uploads"));
}
