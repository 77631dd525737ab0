//! Integration tests for admin grid-feature endpoints.

mod common;

use axum::http::StatusCode;
use common::{assert_json, delete, get, patch_json, post_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn create_and_fetch_feature(pool: PgPool) {
    let app = common::build_test_app(pool);

    let created = assert_json(
        post_json(
            app.clone(),
            "/api/v1/grid",
            json!({
                "title": "Quick Recharge",
                "type": "grid",
                "order": 2,
                "userType": "POST_PAID",
                "config": { "columns": 3, "gridItems": [] },
            }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let data = &created["data"];
    assert_eq!(data["title"], "Quick Recharge");
    assert_eq!(data["type"], "grid");
    assert_eq!(data["order"], 2);
    assert_eq!(data["userType"], "POST_PAID");
    assert_eq!(data["isActive"], true);

    let id = data["id"].as_i64().unwrap();
    let fetched = assert_json(
        get(app, &format!("/api/v1/grid/{id}")).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(fetched["data"]["id"], id);
    assert_eq!(fetched["data"]["carousel"], json!(null));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_type_and_bad_config_are_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = assert_json(
        post_json(
            app.clone(),
            "/api/v1/grid",
            json!({ "title": "X", "type": "hologram" }),
        )
        .await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let body = assert_json(
        post_json(
            app,
            "/api/v1/grid",
            json!({ "title": "X", "type": "grid", "config": { "gridItems": "nope" } }),
        )
        .await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn legacy_all_body_lands_as_pre_paid(pool: PgPool) {
    let app = common::build_test_app(pool);

    let created = assert_json(
        post_json(
            app,
            "/api/v1/grid",
            json!({ "title": "Legacy", "type": "banner", "userType": "ALL" }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(created["data"]["userType"], "PRE_PAID");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_filters_by_segment_and_visibility(pool: PgPool) {
    let app = common::build_test_app(pool);

    for (title, user_type) in [("Pre", "PRE_PAID"), ("Post", "POST_PAID")] {
        post_json(
            app.clone(),
            "/api/v1/grid",
            json!({ "title": title, "type": "html", "userType": user_type }),
        )
        .await;
    }
    // Deactivate one through PATCH.
    let listed = assert_json(get(app.clone(), "/api/v1/grid").await, StatusCode::OK).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 2);
    let first_id = listed["data"][0]["id"].as_i64().unwrap();
    patch_json(
        app.clone(),
        &format!("/api/v1/grid/{first_id}"),
        json!({ "isActive": false }),
    )
    .await;

    let active = assert_json(get(app.clone(), "/api/v1/grid").await, StatusCode::OK).await;
    assert_eq!(active["data"].as_array().unwrap().len(), 1);

    let admin = assert_json(
        get(app.clone(), "/api/v1/grid?includeInactive=true").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(admin["data"].as_array().unwrap().len(), 2);

    let post_only = assert_json(
        get(app, "/api/v1/grid?userType=POST_PAID&includeInactive=true").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(post_only["data"].as_array().unwrap().len(), 1);
    assert_eq!(post_only["data"][0]["title"], "Post");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn patch_validates_against_effective_type(pool: PgPool) {
    let app = common::build_test_app(pool);

    let created = assert_json(
        post_json(
            app.clone(),
            "/api/v1/grid",
            json!({ "title": "Banner", "type": "banner" }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    // Config matching the stored type passes.
    let updated = assert_json(
        patch_json(
            app.clone(),
            &format!("/api/v1/grid/{id}"),
            json!({ "config": { "images": ["/uploads/a.png"] } }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(updated["data"]["config"]["images"][0], "/uploads/a.png");

    // Config matching a simultaneously supplied new type passes too.
    assert_json(
        patch_json(
            app.clone(),
            &format!("/api/v1/grid/{id}"),
            json!({ "type": "html", "config": { "htmlContent": "<p>hi</p>" } }),
        )
        .await,
        StatusCode::OK,
    )
    .await;

    // Wrong shape for the effective type is a 400.
    assert_json(
        patch_json(
            app,
            &format!("/api/v1/grid/{id}"),
            json!({ "config": { "htmlContent": 42 } }),
        )
        .await,
        StatusCode::BAD_REQUEST,
    )
    .await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_and_missing_ids_return_expected_statuses(pool: PgPool) {
    let app = common::build_test_app(pool);

    let created = assert_json(
        post_json(
            app.clone(),
            "/api/v1/grid",
            json!({ "title": "Doomed", "type": "html" }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = delete(app.clone(), &format!("/api/v1/grid/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_json(
        delete(app.clone(), &format!("/api/v1/grid/{id}")).await,
        StatusCode::NOT_FOUND,
    )
    .await;
    assert_json(get(app, "/api/v1/grid/999999").await, StatusCode::NOT_FOUND).await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn with_carousel_creates_and_returns_the_aggregate(pool: PgPool) {
    let app = common::build_test_app(pool);

    let created = assert_json(
        post_json(
            app.clone(),
            "/api/v1/grid/with-carousel",
            json!({
                "title": "Hot Offers",
                "userType": "PRE_PAID",
                "carousel": {
                    "name": "Hot Offers",
                    "interval": 4000,
                    "cards": [
                        { "title": "10GB Pack", "price": 499.0, "ctaText": "Buy" },
                        { "title": "Night Owl" },
                    ],
                },
            }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let data = &created["data"];
    assert_eq!(data["type"], "carousel");
    assert_eq!(data["carousel"]["interval"], 4000);
    let cards = data["carousel"]["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0]["order"], 0);
    assert_eq!(cards[1]["order"], 1);

    // The list view attaches the carousel too.
    let listed = assert_json(get(app, "/api/v1/grid").await, StatusCode::OK).await;
    assert_eq!(
        listed["data"][0]["carousel"]["cards"].as_array().unwrap().len(),
        2
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reorder_applies_batch_and_rejects_unknown_ids(pool: PgPool) {
    let app = common::build_test_app(pool);

    let mut ids = Vec::new();
    for title in ["a", "b"] {
        let created = assert_json(
            post_json(
                app.clone(),
                "/api/v1/grid",
                json!({ "title": title, "type": "html" }),
            )
            .await,
            StatusCode::CREATED,
        )
        .await;
        ids.push(created["data"]["id"].as_i64().unwrap());
    }

    let body = assert_json(
        post_json(
            app.clone(),
            "/api/v1/grid/reorder",
            json!([
                { "id": ids[0], "order": 1 },
                { "id": ids[1], "order": 0 },
            ]),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["data"]["updated"], 2);

    let listed = assert_json(get(app.clone(), "/api/v1/grid").await, StatusCode::OK).await;
    assert_eq!(listed["data"][0]["title"], "b");

    assert_json(
        post_json(
            app,
            "/api/v1/grid/reorder",
            json!([{ "id": 999999, "order": 0 }]),
        )
        .await,
        StatusCode::NOT_FOUND,
    )
    .await;
}
