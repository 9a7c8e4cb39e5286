#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Site routing and settings tests against a real database.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use common::{TestApp, body_string, run_test};
use virtusys_kernel::error::AppError;
use virtusys_kernel::models::{Site, SiteInput, SiteSettings};
use virtusys_test_utils::{assert, site_input, test_page};

#[test]
fn site_hostname_and_port_are_unique() {
    run_test(async {
        let db = require_db!();
        let app = TestApp::with_db(db);

        let input = site_input("Primary");
        let (status, site) = app
            .admin(Method::POST, "/admin/api/sites", Some(&input))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{site}");
        assert_eq!(site["port"], 80);

        let (status, body) = app
            .admin(Method::POST, "/admin/api/sites", Some(&input))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert::has_field_error(&body, "hostname");

        let mut other_port = input.clone();
        other_port["port"] = json!(8080);
        let (status, _) = app
            .admin(Method::POST, "/admin/api/sites", Some(&other_port))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = app
            .admin(
                Method::POST,
                "/admin/api/sites",
                Some(&json!({ "hostname": "https://bad.test/path", "port": 70000 })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert::has_field_error(&body, "hostname");
        assert::has_field_error(&body, "port");
    });
}

#[test]
fn host_resolution_prefers_exact_port() {
    run_test(async {
        let db = require_db!();
        let app = TestApp::with_db(db.clone());

        let input = site_input("Port 80");
        let hostname = input["hostname"].as_str().unwrap().to_string();
        let (_, on_80) = app.admin(Method::POST, "/admin/api/sites", Some(&input)).await;

        let mut alt = input.clone();
        alt["port"] = json!(8443);
        alt["site_name"] = json!("Port 8443");
        let (_, on_8443) = app.admin(Method::POST, "/admin/api/sites", Some(&alt)).await;

        let site = Site::find_for_host(&db, Some(&format!("{hostname}:8443")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(json!(site.id), on_8443["id"]);

        let site = Site::find_for_host(&db, Some(&hostname)).await.unwrap().unwrap();
        assert_eq!(json!(site.id), on_80["id"]);

        // Unmatched port still resolves by hostname.
        let site = Site::find_for_host(&db, Some(&format!("{}:9999", hostname.to_uppercase())))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(site.hostname, hostname);

        // Unknown hosts fall back to whichever site is the default, if any.
        if let Some(site) = Site::find_for_host(&db, Some("nowhere.invalid")).await.unwrap() {
            assert!(site.is_default_site);
        }
    });
}

#[test]
fn root_page_served_for_matching_host() {
    run_test(async {
        let db = require_db!();
        let app = TestApp::with_db(db);

        let page = test_page("Host Root").with_tagline("Served at slash");
        let (_, page_body) = app
            .admin(Method::POST, "/admin/api/pages", Some(&page.to_json()))
            .await;

        let mut input = site_input("Rooted");
        input["root_page"] = page_body["id"].clone();
        let hostname = input["hostname"].as_str().unwrap().to_string();
        let (status, site) = app.admin(Method::POST, "/admin/api/sites", Some(&input)).await;
        assert_eq!(status, StatusCode::CREATED, "{site}");
        assert_eq!(site["root_page_id"], page_body["id"]);

        let settings_url = format!("/admin/api/sites/{}/settings", site["id"].as_str().unwrap());
        app.admin(
            Method::PUT,
            &settings_url,
            Some(&json!({ "company_phone": "+1 555 0100", "linkedin_url": "linkedin.com/company/virtusys" })),
        )
        .await;

        let response = app.get_with_host("/", &hostname).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert::contains(&html, "Host Root");
        assert::contains(&html, "Served at slash");
        assert::contains(&html, "Rooted");
        assert::contains(&html, "+1 555 0100");
        assert::contains(&html, "social-linkedin");

        let mut bad_root = site_input("Dangling");
        bad_root["root_page"] = json!(uuid::Uuid::now_v7());
        let (status, body) = app
            .admin(Method::POST, "/admin/api/sites", Some(&bad_root))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert::has_field_error(&body, "root_page");
    });
}

#[test]
fn settings_row_created_once_per_site() {
    run_test(async {
        let db = require_db!();
        let app = TestApp::with_db(db.clone());

        let (_, site) = app
            .admin(Method::POST, "/admin/api/sites", Some(&site_input("Settings")))
            .await;
        let site_id: uuid::Uuid = serde_json::from_value(site["id"].clone()).unwrap();

        let first = SiteSettings::for_site(&db, site_id).await.unwrap();
        let second = SiteSettings::for_site(&db, site_id).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.company_email, "");
        assert!(first.social_links().is_empty());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM site_settings WHERE site_id = $1")
            .bind(site_id)
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(count, 1);

        let url = format!("/admin/api/sites/{site_id}/settings");
        let (status, body) = app
            .admin(Method::PUT, &url, Some(&json!({ "company_email": "not-an-email" })))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert::has_field_error(&body, "company_email");

        let (status, body) = app
            .admin(
                Method::PUT,
                &url,
                Some(&json!({
                    "company_email": "hello@virtusys.example",
                    "twitter_url": "twitter.com/virtusys",
                    "theme_color": "#112233",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["settings"]["company_email"], "hello@virtusys.example");
        assert_eq!(body["social_links"][0]["network"], "twitter");
        assert_eq!(body["social_links"][0]["url"], "http://twitter.com/virtusys");

        let (status, _) = app
            .admin(
                Method::GET,
                &format!("/admin/api/sites/{}/settings", uuid::Uuid::now_v7()),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    });
}

#[test]
fn host_conflict_at_write_time_is_a_field_error() {
    run_test(async {
        let db = require_db!();
        let app = TestApp::with_db(db.clone());

        let input = site_input("Racer");
        let (status, _) = app
            .admin(Method::POST, "/admin/api/sites", Some(&input))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        // Skips the pre-check, as the losing side of a concurrent save does.
        let clash = SiteInput::clean(&input).unwrap();
        let error = Site::create(&db, &clash).await.unwrap_err();
        match AppError::from(error) {
            AppError::Validation(errors) => assert!(errors.contains("hostname"), "{errors:?}"),
            other => panic!("expected a hostname field error, got {other:?}"),
        }
    });
}

#[test]
fn update_of_missing_site_is_not_found() {
    run_test(async {
        let db = require_db!();
        let app = TestApp::with_db(db);

        let input = site_input("Existing");
        let (status, _) = app
            .admin(Method::POST, "/admin/api/sites", Some(&input))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let url = format!("/admin/api/sites/{}", Uuid::now_v7());
        let (status, _) = app.admin(Method::PUT, &url, Some(&input)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    });
}
