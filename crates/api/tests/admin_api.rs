//! Integration tests for the administrative catalog endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, TestApp};
use serde_json::json;

// ---------------------------------------------------------------------------
// Applications
// ---------------------------------------------------------------------------

#[tokio::test]
async fn application_crud() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/api/v1/applications",
            json!({"name": "  driver-app ", "description": "Fleet driver client"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await["data"].clone();
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["name"], "driver-app");

    let response = app
        .put_json(
            &format!("/api/v1/applications/{id}"),
            json!({"name": "driver-app-v2"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["name"], "driver-app-v2");
    assert_eq!(updated["description"], "Fleet driver client");

    let list = body_json(app.get("/api/v1/applications").await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);

    let response = app.delete(&format!("/api/v1/applications/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.get(&format!("/api/v1/applications/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = app.delete(&format!("/api/v1/applications/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_application_name_is_rejected() {
    let app = TestApp::new();
    let response = app
        .post_json("/api/v1/applications", json!({"name": "   "}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn deleting_application_removes_its_catalog() {
    let app = TestApp::new();
    let app_id = app.create_application("driver-app").await;
    let condition = app.create_condition(app_id, json!({"countries": ["US"]})).await;
    let release = app.create_release(app_id, "3", &[condition]).await;

    app.delete(&format!("/api/v1/applications/{app_id}")).await;

    let response = app
        .get(&format!("/api/v1/applications/{app_id}/releases/{release}"))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = app
        .get(&format!("/api/v1/applications/{app_id}/conditions/{condition}"))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn condition_rules_are_normalized() {
    let app = TestApp::new();
    let app_id = app.create_application("driver-app").await;

    let response = app
        .post_json(
            &format!("/api/v1/applications/{app_id}/conditions"),
            json!({
                "name": "north america",
                "rules": {"countries": [" us", "CA", "", "ca"], "driverIds": [" d1 "]}
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let condition = body_json(response).await["data"].clone();
    assert_eq!(condition["rules"]["countries"], json!(["CA", "US"]));
    assert_eq!(condition["rules"]["driverIds"], json!(["d1"]));
    assert_eq!(condition["rules"]["companyIds"], json!([]));

    let id = condition["id"].as_i64().unwrap();
    let response = app
        .put_json(
            &format!("/api/v1/applications/{app_id}/conditions/{id}"),
            json!({"rules": {"companyIds": [4]}}),
        )
        .await;
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["name"], "north america");
    assert_eq!(updated["rules"]["countries"], json!([]));
    assert_eq!(updated["rules"]["companyIds"], json!([4]));
}

#[tokio::test]
async fn numeric_driver_ids_are_accepted_in_rules() {
    let app = TestApp::new();
    let app_id = app.create_application("driver-app").await;
    let response = app
        .post_json(
            &format!("/api/v1/applications/{app_id}/conditions"),
            json!({"name": "drivers", "rules": {"driverIds": [42, "d7"]}}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["rules"]["driverIds"], json!(["42", "d7"]));
}

#[tokio::test]
async fn conditions_are_scoped_to_their_application() {
    let app = TestApp::new();
    let first = app.create_application("first").await;
    let second = app.create_application("second").await;
    let condition = app.create_condition(first, json!({})).await;

    let response = app
        .get(&format!("/api/v1/applications/{second}/conditions/{condition}"))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let list = body_json(
        app.get(&format!("/api/v1/applications/{second}/conditions"))
            .await,
    )
    .await;
    assert!(list["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn deleting_condition_detaches_it_from_releases() {
    let app = TestApp::new();
    let app_id = app.create_application("driver-app").await;
    let germany = app.create_condition(app_id, json!({"countries": ["DE"]})).await;
    let release = app.create_release(app_id, "5", &[germany]).await;

    let response = app
        .delete(&format!("/api/v1/applications/{app_id}/conditions/{germany}"))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(
        app.get(&format!("/api/v1/applications/{app_id}/releases/{release}"))
            .await,
    )
    .await;
    assert_eq!(json["data"]["condition_ids"], json!([]));
}

// ---------------------------------------------------------------------------
// Releases
// ---------------------------------------------------------------------------

#[tokio::test]
async fn release_crud_and_status_filter() {
    let app = TestApp::new();
    let app_id = app.create_application("driver-app").await;
    let base = format!("/api/v1/applications/{app_id}/releases");

    let response = app
        .post_json(
            &base,
            json!({"version_name": "1.0.0", "version_code": 10, "condition_ids": []}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await["data"].clone();
    assert_eq!(created["version_code"], "10");
    assert_eq!(created["status"], "active");
    let first = created["id"].as_i64().unwrap();
    let second = app.create_release(app_id, "11", &[]).await;

    let response = app
        .put_json(&format!("{base}/{first}"), json!({"status": "paused"}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "paused");

    let all = body_json(app.get(&base).await).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 2);

    let active = body_json(app.get(&format!("{base}?status=active")).await).await;
    let active = active["data"].as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["id"], second);

    let response = app.delete(&format!("{base}/{second}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = app.get(&format!("{base}/{second}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_status_filter_is_a_validation_error() {
    let app = TestApp::new();
    let app_id = app.create_application("driver-app").await;
    let response = app
        .get(&format!("/api/v1/applications/{app_id}/releases?status=retired"))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn non_numeric_version_code_is_rejected() {
    let app = TestApp::new();
    let app_id = app.create_application("driver-app").await;
    let response = app
        .post_json(
            &format!("/api/v1/applications/{app_id}/releases"),
            json!({"version_name": "1.0.0", "version_code": "1.0"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn release_rejects_conditions_from_elsewhere() {
    let app = TestApp::new();
    let app_id = app.create_application("driver-app").await;
    let other = app.create_application("other").await;
    let foreign = app.create_condition(other, json!({})).await;

    let response = app
        .post_json(
            &format!("/api/v1/applications/{app_id}/releases"),
            json!({"version_name": "1.0.0", "version_code": "1", "condition_ids": [foreign]}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = app
        .post_json(
            &format!("/api/v1/applications/{app_id}/releases"),
            json!({"version_name": "1.0.0", "version_code": "1", "condition_ids": [999]}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn mistyped_release_body_uses_error_envelope() {
    let app = TestApp::new();
    let app_id = app.create_application("driver-app").await;
    let response = app
        .post_json(
            &format!("/api/v1/applications/{app_id}/releases"),
            json!({"version_name": "1.0.0", "version_code": "1", "condition_ids": "x"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[axum::http::header::CONTENT_TYPE],
        "application/json"
    );
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("condition_ids"));
}

#[tokio::test]
async fn malformed_admin_bodies_are_bad_requests() {
    let app = TestApp::new();
    let app_id = app.create_application("driver-app").await;

    let response = app.post_raw("/api/v1/applications", "{\"name\": ").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let response = app
        .put_json(
            &format!("/api/v1/applications/{app_id}/conditions/1"),
            json!({"rules": {"companyIds": "many"}}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let response = app
        .post_json(
            &format!("/api/v1/applications/{app_id}/releases/latest"),
            json!(["not", "an", "object"]),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn release_for_unknown_application_is_404() {
    let app = TestApp::new();
    let response = app
        .post_json(
            "/api/v1/applications/77/releases",
            json!({"version_name": "1.0.0", "version_code": "1"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Evaluation endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn latest_release_for_context() {
    let app = TestApp::new();
    let app_id = app.create_application("driver-app").await;
    let us = app.create_condition(app_id, json!({"countries": ["US"]})).await;
    let open = app.create_release(app_id, "5", &[]).await;
    let us_only = app.create_release(app_id, "20", &[us]).await;
    let url = format!("/api/v1/applications/{app_id}/releases/latest");

    let json = body_json(app.post_json(&url, json!({"country": "us"})).await).await;
    assert_eq!(json["data"]["id"], us_only);

    let json = body_json(app.post_json(&url, json!({"country": "DE"})).await).await;
    assert_eq!(json["data"]["id"], open);

    // An absent dimension cannot satisfy a restriction on it.
    let json = body_json(app.post_json(&url, json!({})).await).await;
    assert_eq!(json["data"]["id"], open);
}

#[tokio::test]
async fn latest_is_null_when_nothing_qualifies() {
    let app = TestApp::new();
    let app_id = app.create_application("driver-app").await;
    let json = body_json(
        app.post_json(
            &format!("/api/v1/applications/{app_id}/releases/latest"),
            json!({"companyId": 3}),
        )
        .await,
    )
    .await;
    assert!(json["data"].is_null());
}

#[tokio::test]
async fn latest_rejects_malformed_context() {
    let app = TestApp::new();
    let app_id = app.create_application("driver-app").await;
    let response = app
        .post_json(
            &format!("/api/v1/applications/{app_id}/releases/latest"),
            json!({"companyId": "acme"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["details"][0]["field"], "companyId");
}

#[tokio::test]
async fn specific_release_availability() {
    let app = TestApp::new();
    let app_id = app.create_application("driver-app").await;
    let fleet = app
        .create_condition(app_id, json!({"vehicleIds": ["v1"]}))
        .await;
    let release = app.create_release(app_id, "9", &[fleet]).await;
    let url = format!("/api/v1/applications/{app_id}/releases/{release}/availability");

    let json = body_json(app.post_json(&url, json!({"vehicleId": "v1"})).await).await;
    assert_eq!(json["data"], json!({"release_id": release, "available": true}));

    let json = body_json(app.post_json(&url, json!({"vehicleId": "v2"})).await).await;
    assert_eq!(json["data"]["available"], false);

    app.put_json(
        &format!("/api/v1/applications/{app_id}/releases/{release}"),
        json!({"status": "archived"}),
    )
    .await;
    let response = app.post_json(&url, json!({"vehicleId": "v1"})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Activity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn activity_limit_is_clamped() {
    let app = TestApp::new();
    let response = app.get("/api/v1/activity?limit=0&offset=-5").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"]
        .as_array()
        .unwrap()
        .is_empty());
}
