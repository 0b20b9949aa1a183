//! Integration tests for the Pagesmith Web API.
//!
//! These tests require the `web` feature to be enabled:
//! ```bash
//! cargo test --features web web_api
//! ```

#![cfg(feature = "web")]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use pagesmith::config::Config;
use pagesmith::matcher::KeywordTable;
use pagesmith::models::Template;
use pagesmith::services::TemplateSource;
use pagesmith::web::{create_router, AppState};

mod fixtures;
use fixtures::{layout_with_unknown_kind, sample_layout, TEST_OWNER};

/// Template source whose every lookup fails.
struct FailingSource;

impl TemplateSource for FailingSource {
    fn list(&self) -> anyhow::Result<Vec<Template>> {
        anyhow::bail!("catalog offline")
    }

    fn get(&self, _id: i64) -> anyhow::Result<Option<Template>> {
        anyhow::bail!("catalog offline")
    }

    fn fetch_by_ids(&self, _ids: &[i64]) -> anyhow::Result<Vec<Template>> {
        anyhow::bail!("catalog offline")
    }
}

/// Creates a test AppState with a temporary data directory.
fn create_test_state() -> (AppState, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let state = AppState::new(Config::new(), temp_dir.path().to_path_buf())
        .expect("Failed to create app state");
    (state, temp_dir)
}

fn create_test_app() -> (Router, AppState, TempDir) {
    let (state, temp_dir) = create_test_state();
    (create_router(state.clone()), state, temp_dir)
}

/// Sends a request and returns the status plus the body parsed as JSON.
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("X-User-Id", user);
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

async fn get_json(app: &Router, uri: &str, user: Option<&str>) -> (StatusCode, Value) {
    send(app, "GET", uri, user, None).await
}

async fn match_query(app: &Router, body: Value) -> (StatusCode, Value) {
    send(app, "POST", "/api/templates/match", None, Some(body)).await
}

fn template_ids(json: &Value) -> Vec<i64> {
    json["templates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect()
}

// ============================================================================
// Health & Templates
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let (app, _state, _temp_dir) = create_test_app();
    let (status, json) = get_json(&app, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_list_templates() {
    let (app, _state, _temp_dir) = create_test_app();
    let (status, json) = get_json(&app, "/api/templates", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["total"], 13);
    assert!(json["templates"][0].get("layout").is_none());
}

#[tokio::test]
async fn test_list_templates_by_category() {
    let (app, _state, _temp_dir) = create_test_app();
    // 博客
    let (status, json) = get_json(&app, "/api/templates?category=%E5%8D%9A%E5%AE%A2", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(template_ids(&json), vec![6, 9]);
    assert_eq!(json["total"], 2);
}

#[tokio::test]
async fn test_get_template() {
    let (app, _state, _temp_dir) = create_test_app();

    let (status, json) = get_json(&app, "/api/templates/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["template"]["id"], 2);
    assert_eq!(json["template"]["category"], "电商");
    assert!(!json["template"]["layout"]["boxes"]
        .as_array()
        .unwrap()
        .is_empty());

    let (status, json) = get_json(&app, "/api/templates/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);

    let (status, _) = get_json(&app, "/api/templates/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Template Match
// ============================================================================

#[tokio::test]
async fn test_match_two_categories() {
    let (app, _state, _temp_dir) = create_test_app();
    let (status, json) = match_query(&app, json!({ "query": "电商 博客" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(template_ids(&json), vec![2, 4, 7, 6, 9]);
    assert_eq!(json["matchedCategories"], json!(["电商", "博客"]));
    assert_eq!(json["matchType"], "keyword");
    assert_eq!(json["message"], "找到 5 个相关模板");
    assert!(json["templates"][0].get("layout").is_none());
}

#[tokio::test]
async fn test_match_full_width_separators() {
    let (app, _state, _temp_dir) = create_test_app();
    let (status, json) = match_query(&app, json!({ "query": "博客，作品集" })).await;

    // 作品集 scores exact (3) plus partial via 作品 (2)
    assert_eq!(status, StatusCode::OK);
    assert_eq!(template_ids(&json), vec![5, 8, 6, 9]);
    assert_eq!(json["matchedCategories"], json!(["博客", "作品集"]));
}

#[tokio::test]
async fn test_match_empty_query_is_no_match() {
    let (app, _state, _temp_dir) = create_test_app();

    for query in ["", "   ", " ，、；; "] {
        let (status, json) = match_query(&app, json!({ "query": query })).await;

        assert_eq!(status, StatusCode::OK, "query {query:?}");
        assert_eq!(json["success"], true);
        assert_eq!(json["templates"], json!([]));
        assert_eq!(json["message"], "抱歉，暂无相关模板");
        assert!(json.get("matchType").is_none());
    }
}

#[tokio::test]
async fn test_match_unrelated_query() {
    let (app, _state, _temp_dir) = create_test_app();
    let (status, json) = match_query(&app, json!({ "query": "quantum physics" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["templates"], json!([]));
    assert_eq!(json["message"], "抱歉，暂无相关模板");
}

#[tokio::test]
async fn test_match_rejects_bad_bodies() {
    let (app, _state, _temp_dir) = create_test_app();

    let (status, json) = match_query(&app, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);

    let (status, _) = match_query(&app, json!({ "query": 42 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method("POST")
        .uri("/api/templates/match")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_match_source_failure_is_generic_500() {
    let temp_dir = TempDir::new().unwrap();
    let state = AppState::with_template_source(
        &Config::new(),
        temp_dir.path().to_path_buf(),
        KeywordTable::builtin().unwrap(),
        Arc::new(FailingSource),
    );
    let app = create_router(state);

    let (status, json) = match_query(&app, json!({ "query": "电商" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Internal server error");
    assert!(!json.to_string().contains("catalog offline"));

    // A query that matches nothing never touches the source
    let (status, _) = match_query(&app, json!({ "query": "" })).await;
    assert_eq!(status, StatusCode::OK);
}

// ============================================================================
// Layouts
// ============================================================================

#[tokio::test]
async fn test_layouts_require_caller() {
    let (app, _state, _temp_dir) = create_test_app();

    let (status, json) = get_json(&app, "/api/layouts", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["success"], false);

    let (status, _) = get_json(&app, "/api/layouts", Some("   ")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "POST", "/api/templates/1/use", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_layout_crud() {
    let (app, _state, _temp_dir) = create_test_app();
    let user = Some(TEST_OWNER);

    let (status, json) = get_json(&app, "/api/layouts", user).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 0);

    let (status, json) = send(
        &app,
        "POST",
        "/api/layouts",
        user,
        Some(json!({
            "name": "Landing",
            "boxes": [{ "x": 0, "y": 0, "components": [{ "type": "button", "props": { "text": "Go" } }] }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = json["layout"]["id"].as_str().unwrap().to_string();
    assert_eq!(json["layout"]["owner"], TEST_OWNER);

    let (status, json) = get_json(&app, &format!("/api/layouts/{id}"), user).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["layout"]["name"], "Landing");
    assert_eq!(json["layout"]["boxes"][0]["components"][0]["type"], "button");

    let (status, json) = send(
        &app,
        "PUT",
        &format!("/api/layouts/{id}"),
        user,
        Some(json!({ "name": "Landing v2", "description": "Updated" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["layout"]["name"], "Landing v2");
    assert_eq!(json["layout"]["description"], "Updated");
    assert_eq!(
        json["layout"]["boxes"].as_array().unwrap().len(),
        1,
        "boxes are kept when omitted"
    );

    let (status, json) = get_json(&app, "/api/layouts", user).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 1);
    assert_eq!(json["layouts"][0]["componentCount"], 1);

    let (status, _) = send(&app, "DELETE", &format!("/api/layouts/{id}"), user, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = get_json(&app, &format!("/api/layouts/{id}"), user).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_layout_of_another_user_is_not_found() {
    let (app, state, _temp_dir) = create_test_app();
    let layout = sample_layout("owner-a", "Private");
    state.layouts().save(&layout).unwrap();

    let uri = format!("/api/layouts/{}", layout.id);
    let (status, _) = get_json(&app, &uri, Some("owner-b")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &uri, Some("owner-b"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_json(&app, &format!("{uri}/export"), Some("owner-b")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = get_json(&app, "/api/layouts", Some("owner-b")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 0);

    let (status, _) = get_json(&app, &uri, Some("owner-a")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_layout_id_must_be_uuid() {
    let (app, _state, _temp_dir) = create_test_app();
    let (status, json) = get_json(&app, "/api/layouts/not-a-uuid", Some(TEST_OWNER)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_create_layout_validation() {
    let (app, _state, _temp_dir) = create_test_app();

    let (status, json) = send(
        &app,
        "POST",
        "/api/layouts",
        Some(TEST_OWNER),
        Some(json!({ "name": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid layout");

    let (status, _) = send(
        &app,
        "POST",
        "/api/layouts",
        Some(TEST_OWNER),
        Some(json!({ "description": "no name" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/layouts",
        Some(TEST_OWNER),
        Some(json!({ "name": "Wide", "boxes": [{ "width": 150 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_use_template_creates_owned_layout() {
    let (app, _state, _temp_dir) = create_test_app();

    let (_, template) = get_json(&app, "/api/templates/13", None).await;
    let (status, json) = send(&app, "POST", "/api/templates/13/use", Some(TEST_OWNER), None).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["layout"]["owner"], TEST_OWNER);
    assert_eq!(json["layout"]["name"], template["template"]["name"]);
    assert_eq!(json["layout"]["boxes"], template["template"]["layout"]["boxes"]);

    let (_, list) = get_json(&app, "/api/layouts", Some(TEST_OWNER)).await;
    assert_eq!(list["total"], 1);

    let (status, _) = send(&app, "POST", "/api/templates/999/use", Some(TEST_OWNER), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Export
// ============================================================================

async fn export(app: &Router, id: &str, user: &str) -> (StatusCode, String, String, String) {
    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/layouts/{id}/export"))
        .header("X-User-Id", user)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let header_value = |name: header::HeaderName| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    let content_type = header_value(header::CONTENT_TYPE);
    let disposition = header_value(header::CONTENT_DISPOSITION);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    (
        status,
        content_type,
        disposition,
        String::from_utf8(bytes.to_vec()).unwrap(),
    )
}

#[tokio::test]
async fn test_export_layout_source() {
    let (app, state, _temp_dir) = create_test_app();
    let layout = sample_layout(TEST_OWNER, "My Résumé #1");
    state.layouts().save(&layout).unwrap();

    let (status, content_type, disposition, source) = export(&app, &layout.id, TEST_OWNER).await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/javascript"));
    assert_eq!(disposition, "attachment; filename=\"MyRsum1.jsx\"");
    assert!(source.starts_with("import React from 'react';\n"));
    assert!(source.contains("import { DatePicker } from 'antd';"));
    assert!(source.contains("const MyRsum1 = () => {"));
    assert!(source.contains("gridTemplateColumns: 'repeat(2, 1fr)'"));
    assert!(source.ends_with("export default MyRsum1;\n"));
}

#[tokio::test]
async fn test_export_unknown_component_placeholder() {
    let (app, state, _temp_dir) = create_test_app();
    let layout = layout_with_unknown_kind(TEST_OWNER);
    state.layouts().save(&layout).unwrap();

    let (status, _, _, source) = export(&app, &layout.id, TEST_OWNER).await;

    assert_eq!(status, StatusCode::OK);
    assert!(source.contains("{/* Unknown component type: carousel */}"));
    assert!(source.contains(r#"<Card title={"Still here"}>"#));
}
