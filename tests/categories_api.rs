mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use common::{
    app_with, create_book, create_category, memory_app, send, send_raw, FailingStore,
};

#[tokio::test]
async fn create_then_get_returns_same_category() {
    let app = memory_app();
    let created = create_category(&app, "Science Fiction").await;

    assert_eq!(created["name"], "Science Fiction");
    assert_eq!(created["description"], json!(null));

    let uri = format!("/categories/{}", created["id"].as_str().unwrap());
    let (status, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn list_is_empty_array_initially() {
    let app = memory_app();
    let (status, body) = send(&app, "GET", "/categories", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn list_returns_categories_in_creation_order() {
    let app = memory_app();
    create_category(&app, "History").await;
    create_category(&app, "Poetry").await;

    let (_, body) = send(&app, "GET", "/categories", None).await;
    let names: Vec<_> = body.as_array().unwrap().iter().map(|c| c["name"].clone()).collect();
    assert_eq!(names, vec![json!("History"), json!("Poetry")]);
}

#[tokio::test]
async fn create_rejects_missing_or_blank_name() {
    let app = memory_app();

    for payload in [json!({}), json!({ "name": "   " }), json!({ "name": null })] {
        let (status, body) = send(&app, "POST", "/categories", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "validation_error");
        assert_eq!(body["error"]["fields"][0]["field"], "name");
    }

    let (_, listed) = send(&app, "GET", "/categories", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn create_rejects_name_over_one_hundred_chars() {
    let app = memory_app();
    let too_long = json!({ "name": "x".repeat(101) });
    let (status, _) = send(&app, "POST", "/categories", Some(too_long)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let at_limit = json!({ "name": "x".repeat(100) });
    let (status, _) = send(&app, "POST", "/categories", Some(at_limit)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn malformed_json_body_is_bad_request() {
    let app = memory_app();
    let request = axum::http::Request::post("/categories")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"name\":"))
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let app = memory_app();
    let created = create_category(&app, "Sci-Fi").await;
    let uri = format!("/categories/{}", created["id"].as_str().unwrap());

    let payload = json!({ "description": "Futures" });
    let (status, updated) = send(&app, "PUT", &uri, Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Sci-Fi");
    assert_eq!(updated["description"], "Futures");

    let (_, cleared) = send(&app, "PUT", &uri, Some(json!({ "description": null }))).await;
    assert_eq!(cleared["description"], json!(null));

    let (_, unchanged) = send(&app, "PUT", &uri, Some(json!({}))).await;
    assert_eq!(unchanged, cleared);
}

#[tokio::test]
async fn bodiless_update_leaves_category_unchanged() {
    let app = memory_app();
    let created = create_category(&app, "Biography").await;
    let uri = format!("/categories/{}", created["id"].as_str().unwrap());

    let request = axum::http::Request::put(&uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, updated) = send_raw(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated, created);
}

#[tokio::test]
async fn update_missing_category_is_not_found() {
    let app = memory_app();
    let uri = format!("/categories/{}", uuid::Uuid::now_v7());
    let (status, body) = send(&app, "PUT", &uri, Some(json!({ "name": "Anything" }))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn delete_clears_category_on_books() {
    let app = memory_app();
    let category = create_category(&app, "Fantasy").await;
    let category_id = category["id"].as_str().unwrap();
    let book = create_book(
        &app,
        json!({ "title": "The Hobbit", "author": "J.R.R. Tolkien", "categoryId": category_id }),
    )
    .await;

    let (status, body) = send(&app, "DELETE", &format!("/categories/{category_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Category deleted" }));

    let (status, _) = send(&app, "GET", &format!("/categories/{category_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/books/{}", book["id"].as_str().unwrap());
    let (status, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "The Hobbit");
    assert_eq!(fetched["categoryId"], json!(null));
    assert_eq!(fetched["category"], json!(null));
}

#[tokio::test]
async fn delete_unknown_or_malformed_id() {
    let app = memory_app();

    let uri = format!("/categories/{}", uuid::Uuid::now_v7());
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "DELETE", "/categories/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn store_failure_is_generic_internal_error() {
    let store = Arc::new(FailingStore::default());
    let app = app_with(store.clone());

    let (status, body) = send(&app, "GET", "/categories", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "internal_error");
    assert!(!body.to_string().contains("10.0.0.5"));
    assert_eq!(store.calls(), 1);
}
