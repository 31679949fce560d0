//! Catalog persistence port.
//!
//! Handlers talk to an injected [`CatalogStore`] trait object; the
//! PostgreSQL adapter serves production and the in-memory adapter serves
//! `memory://` deployments and the HTTP test suite.

use std::sync::Arc;

use async_trait::async_trait;
use bookshelf_http::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::modules::books::models::{Book, BookChanges, NewBook};
use crate::modules::books::search::SearchTerm;
use crate::modules::categories::models::{Category, CategoryChanges, NewCategory};

pub mod memory;
pub mod postgres;
pub mod rows;

pub use memory::MemoryCatalogStore;
pub use postgres::PgCatalogStore;
pub use rows::{BookRow, JoinedBookRow, SearchHitRow};

/// Store handle shared by every module router.
pub type SharedStore = Arc<dyn CatalogStore>;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures surfaced by a store adapter. All of them are terminal for the
/// request that triggered them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("constraint violated: {0}")]
    Constraint(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

/// Operations the catalog modules need from persistence.
///
/// Update and delete return `None` when no row has the given id.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_categories(&self) -> StoreResult<Vec<Category>>;

    async fn find_category(&self, id: Uuid) -> StoreResult<Option<Category>>;

    async fn category_exists(&self, id: Uuid) -> StoreResult<bool>;

    async fn insert_category(&self, category: NewCategory) -> StoreResult<Category>;

    async fn update_category(
        &self,
        id: Uuid,
        changes: CategoryChanges,
    ) -> StoreResult<Option<Category>>;

    /// Books referencing the category keep existing with their reference cleared.
    async fn delete_category(&self, id: Uuid) -> StoreResult<Option<Category>>;

    /// Every book joined with its category, in insertion order.
    async fn list_books(&self) -> StoreResult<Vec<BookRow>>;

    /// Books matching `term`, most relevant first.
    async fn search_books(&self, term: &SearchTerm) -> StoreResult<Vec<BookRow>>;

    async fn find_book(&self, id: Uuid) -> StoreResult<Option<BookRow>>;

    async fn insert_book(&self, book: NewBook) -> StoreResult<Book>;

    async fn update_book(&self, id: Uuid, changes: BookChanges) -> StoreResult<Option<Book>>;

    async fn delete_book(&self, id: Uuid) -> StoreResult<Option<Book>>;
}
