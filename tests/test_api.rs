//! Integration tests for the HTTP API endpoints.
//!
//! Uses axum's oneshot pattern (via tower::ServiceExt), no TCP binding needed.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

use panve::catalog::Catalog;
use panve::server::create_router;

fn app() -> axum::Router {
    create_router(Arc::new(Catalog::standard()))
}

async fn body_bytes(body: Body) -> Vec<u8> {
    body.collect().await.unwrap().to_bytes().to_vec()
}

/// Parse response body as JSON.
async fn body_json(body: Body) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(body).await).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn sample_request() -> serde_json::Value {
    json!({
        "name": "Ana",
        "date": "01/05/2024",
        "responses": {
            "sectionA": { "A.1": { "cat:beh": "mastered" } },
            "sectionC": { "C.1": { "Nível III:c:b1": "emergent", "Nível IV:c:b2": "mastered" } }
        }
    })
}

fn find_cell<'a>(
    cells: &'a [serde_json::Value],
    column: &str,
    level: u64,
) -> &'a serde_json::Value {
    cells
        .iter()
        .find(|c| c["column"] == column && c["level"] == level)
        .unwrap()
}

// ── GET ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_200() {
    let resp = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp.into_body()).await;
    assert_eq!(json["status"], "OK");
}

#[tokio::test]
async fn catalog_lists_columns_and_questions() {
    let resp = app()
        .oneshot(Request::get("/catalog").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp.into_body()).await;
    assert_eq!(json["levels"].as_array().unwrap().len(), 7);
    assert_eq!(json["columns"].as_array().unwrap().len(), 24);
    assert_eq!(json["questions"].as_array().unwrap().len(), 24);
    assert_eq!(json["columns"][0]["id"], "A1");
}

// ── POST /matrix ─────────────────────────────────────────────────────

#[tokio::test]
async fn matrix_resolves_cells() {
    let resp = app()
        .oneshot(post_json("/matrix", sample_request()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp.into_body()).await;
    let cells = json["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 92);
    assert_eq!(find_cell(cells, "A1", 1)["status"], "mastered");
    assert_eq!(find_cell(cells, "C1", 3)["status"], "emergent");
    assert_eq!(find_cell(cells, "C1", 4)["status"], "mastered");
    assert_eq!(find_cell(cells, "C1", 5)["status"], "not-used");
    assert_eq!(json["dominance"]["a"], false);
}

#[tokio::test]
async fn matrix_with_malformed_responses_is_empty() {
    let resp = app()
        .oneshot(post_json("/matrix", json!({ "responses": "oops" })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp.into_body()).await;
    let cells = json["cells"].as_array().unwrap();
    assert!(cells.iter().all(|c| c["status"] == "not-used"));
}

#[tokio::test]
async fn matrix_svg_has_svg_content_type() {
    let resp = app()
        .oneshot(post_json("/matrix.svg", sample_request()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "image/svg+xml");
    let body = String::from_utf8(body_bytes(resp.into_body()).await).unwrap();
    assert!(body.starts_with("<svg"));
    assert!(body.contains("Paciente: Ana"));
}

// ── POST /series ─────────────────────────────────────────────────────

#[tokio::test]
async fn series_defaults_to_evaluated() {
    let resp = app()
        .oneshot(post_json("/series", sample_request()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp.into_body()).await;
    assert_eq!(json["policy"], "evaluated");
    assert_eq!(json["labels"].as_array().unwrap().len(), 24);
    assert_eq!(json["labels"][0], "A.1");
    assert_eq!(json["datasets"].as_array().unwrap().len(), 3);

    let c1 = json["entries"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["question_id"] == "C.1")
        .unwrap();
    assert_eq!(c1["mastered"], 50.0);
    assert_eq!(c1["emergent"], 50.0);
    assert_eq!(c1["not_used"], 0.0);
}

#[tokio::test]
async fn series_possible_policy() {
    let resp = app()
        .oneshot(post_json("/series?policy=possible", sample_request()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp.into_body()).await;
    assert_eq!(json["policy"], "possible");
    let a1 = &json["entries"][0];
    assert_eq!(a1["denominator"], 5);
    assert_eq!(a1["mastered"], 20.0);
}

#[tokio::test]
async fn series_rejects_unknown_policy() {
    let resp = app()
        .oneshot(post_json("/series?policy=median", sample_request()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("policy"));
}

#[tokio::test]
async fn series_svg_renders_chart() {
    let resp = app()
        .oneshot(post_json("/series.svg", json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(body_bytes(resp.into_body()).await).unwrap();
    assert!(body.contains(">C.17</text>"));
}
