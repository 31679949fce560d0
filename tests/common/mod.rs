#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use bookshelf::modules::books::models::{Book, BookChanges, NewBook};
use bookshelf::modules::books::search::SearchTerm;
use bookshelf::modules::categories::models::{Category, CategoryChanges, NewCategory};
use bookshelf::store::{BookRow, CatalogStore, MemoryCatalogStore, StoreError, StoreResult};
use bookshelf::SharedStore;
use bookshelf_kernel::settings::Settings;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub fn app_with(store: SharedStore) -> Router {
    bookshelf::build_app(store, &Settings::default()).unwrap()
}

pub fn memory_app() -> Router {
    app_with(Arc::new(MemoryCatalogStore::new()))
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    send_raw(app, request).await
}

/// Send a raw request and decode the JSON body.
pub async fn send_raw(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, json)
}

pub async fn create_category(app: &Router, name: &str) -> Value {
    let payload = serde_json::json!({ "name": name });
    let (status, body) = send(app, "POST", "/categories", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

pub async fn create_book(app: &Router, payload: Value) -> Value {
    let (status, body) = send(app, "POST", "/books", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

/// Store whose every operation fails, counting how often it was reached.
#[derive(Default)]
pub struct FailingStore {
    calls: AtomicUsize,
}

impl FailingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> StoreResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Constraint("connection refused by 10.0.0.5:5432".to_string()))
    }
}

#[async_trait]
impl CatalogStore for FailingStore {
    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        self.fail()
    }

    async fn find_category(&self, _id: Uuid) -> StoreResult<Option<Category>> {
        self.fail()
    }

    async fn category_exists(&self, _id: Uuid) -> StoreResult<bool> {
        self.fail()
    }

    async fn insert_category(&self, _category: NewCategory) -> StoreResult<Category> {
        self.fail()
    }

    async fn update_category(
        &self,
        _id: Uuid,
        _changes: CategoryChanges,
    ) -> StoreResult<Option<Category>> {
        self.fail()
    }

    async fn delete_category(&self, _id: Uuid) -> StoreResult<Option<Category>> {
        self.fail()
    }

    async fn list_books(&self) -> StoreResult<Vec<BookRow>> {
        self.fail()
    }

    async fn search_books(&self, _term: &SearchTerm) -> StoreResult<Vec<BookRow>> {
        self.fail()
    }

    async fn find_book(&self, _id: Uuid) -> StoreResult<Option<BookRow>> {
        self.fail()
    }

    async fn insert_book(&self, _book: NewBook) -> StoreResult<Book> {
        self.fail()
    }

    async fn update_book(&self, _id: Uuid, _changes: BookChanges) -> StoreResult<Option<Book>> {
        self.fail()
    }

    async fn delete_book(&self, _id: Uuid) -> StoreResult<Option<Book>> {
        self.fail()
    }
}
