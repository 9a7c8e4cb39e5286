#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Router tests that never reach the database.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};

use common::{ADMIN_TOKEN, body_json, body_string, offline_app};

#[tokio::test]
async fn home_payload_is_served() {
    let app = offline_app(None);
    let response = app.get("/api/home").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["company"], "VirtuSys Global");
    assert_eq!(body["services"].as_array().unwrap().len(), 3);
    assert!(body["contact"]["email"].is_string());
}

#[tokio::test]
async fn admin_api_disabled_without_token() {
    let app = offline_app(None);
    let response = app
        .request(
            Request::get("/admin/api/block-types")
                .header(header::AUTHORIZATION, "Bearer anything")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn admin_api_rejects_missing_or_wrong_token() {
    let app = offline_app(Some(ADMIN_TOKEN));

    let response = app.get("/admin/api/block-types").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");

    let response = app
        .request(
            Request::get("/admin/api/pages")
                .header(header::AUTHORIZATION, "Bearer wrong-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn block_types_listed_in_editor_order() {
    let app = offline_app(Some(ADMIN_TOKEN));
    let (status, body) = app
        .admin(axum::http::Method::GET, "/admin/api/block-types", None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["type_name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        ["hero", "services_overview", "testimonial_section", "stats", "cta"]
    );
}

#[tokio::test]
async fn block_validation_reports_field_errors() {
    let app = offline_app(Some(ADMIN_TOKEN));

    let (status, body) = app
        .admin(
            axum::http::Method::POST,
            "/admin/api/block-types/cta/validate",
            Some(&serde_json::json!({ "text": "Talk to us", "button_text": "Go", "style": "neon" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    virtusys_test_utils::assert::has_field_error(&body, "button_link");
    virtusys_test_utils::assert::has_field_error(&body, "style");

    let (status, body) = app
        .admin(
            axum::http::Method::POST,
            "/admin/api/block-types/hero/validate",
            Some(&serde_json::json!({ "headline": "Welcome" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "hero");
    assert_eq!(body["value"]["alignment"], "center");

    let (status, _) = app
        .admin(
            axum::http::Method::POST,
            "/admin/api/block-types/carousel/validate",
            Some(&serde_json::json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reorder_with_malformed_ids_reports_field_errors() {
    let app = offline_app(Some(ADMIN_TOKEN));
    let url = format!("/admin/api/pages/{}/hero-slides/order", uuid::Uuid::now_v7());

    let (status, body) = app
        .admin(
            axum::http::Method::PUT,
            &url,
            Some(&serde_json::json!({ "order": ["42", uuid::Uuid::now_v7().to_string()] })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation failed");
    virtusys_test_utils::assert::has_field_error(&body, "order.0");

    let (status, body) = app
        .admin(axum::http::Method::PUT, &url, Some(&serde_json::json!({})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    virtusys_test_utils::assert::has_field_error(&body, "order");
}

#[tokio::test]
async fn panel_layouts_by_model() {
    let app = offline_app(Some(ADMIN_TOKEN));

    let (status, body) = app
        .admin(axum::http::Method::GET, "/admin/api/panels/site_settings", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "site_settings");

    let (status, _) = app
        .admin(axum::http::Method::GET, "/admin/api/panels/user", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pages_api_rejects_unknown_type_and_fields() {
    let app = offline_app(None);

    let response = app.get("/api/v2/pages/?type=blog.BlogPage").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.get("/api/v2/pages/?type=home.HomePage&fields=title,secret").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(response).await.contains("secret"));
}

#[tokio::test]
async fn static_files_served_with_mime_type() {
    let app = offline_app(None);

    let response = app.get("/static/css/site.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");

    let response = app.get("/static/../Cargo.toml").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_unreachable_database() {
    let app = offline_app(None);
    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(response).await;
    assert_eq!(body["postgres"], false);
}
