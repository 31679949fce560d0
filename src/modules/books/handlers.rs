use axum::{extract::State, http::StatusCode, Json};
use bookshelf_http::{ApiJson, ApiQuery, AppError, OptionalJson, PathId};
use uuid::Uuid;

use super::models::{BookPayload, BookWithCategory, DeletedBook};
use super::search::{BookListing, ListBooksParams};
use crate::modules::categories::ensure_category_exists;
use crate::store::{CatalogStore, SharedStore};

fn book_not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Book '{}' not found", id))
}

/// Re-read a book through the joined query for the response body.
async fn composed(store: &dyn CatalogStore, id: Uuid) -> Result<BookWithCategory, AppError> {
    store
        .find_book(id)
        .await?
        .map(BookWithCategory::from)
        .ok_or_else(|| book_not_found(id))
}

/// GET /books, or ranked search with `?q=`
pub async fn list_books(
    State(store): State<SharedStore>,
    ApiQuery(params): ApiQuery<ListBooksParams>,
) -> Result<Json<Vec<BookWithCategory>>, AppError> {
    let listing = BookListing::from_query(params.q.as_deref())?;
    let books = listing.fetch(store.as_ref()).await?;
    Ok(Json(books))
}

/// GET /books/{id}
pub async fn get_book(
    State(store): State<SharedStore>,
    PathId(id): PathId,
) -> Result<Json<BookWithCategory>, AppError> {
    composed(store.as_ref(), id).await.map(Json)
}

/// POST /books
pub async fn create_book(
    State(store): State<SharedStore>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> Result<(StatusCode, Json<BookWithCategory>), AppError> {
    let new_book = payload.into_new()?;
    if let Some(category_id) = new_book.category_id {
        ensure_category_exists(store.as_ref(), category_id).await?;
    }

    let book = store.insert_book(new_book).await?;
    tracing::info!(book_id = %book.id, "book created");

    let created = composed(store.as_ref(), book.id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /books/{id}
pub async fn update_book(
    State(store): State<SharedStore>,
    PathId(id): PathId,
    OptionalJson(payload): OptionalJson<BookPayload>,
) -> Result<Json<BookWithCategory>, AppError> {
    let changes = payload.into_changes()?;
    if let Some(category_id) = changes.target_category() {
        ensure_category_exists(store.as_ref(), category_id).await?;
    }

    let book = store
        .update_book(id, changes)
        .await?
        .ok_or_else(|| book_not_found(id))?;
    tracing::info!(book_id = %book.id, "book updated");

    composed(store.as_ref(), book.id).await.map(Json)
}

/// DELETE /books/{id}
pub async fn delete_book(
    State(store): State<SharedStore>,
    PathId(id): PathId,
) -> Result<Json<DeletedBook>, AppError> {
    let book = store
        .delete_book(id)
        .await?
        .ok_or_else(|| book_not_found(id))?;
    tracing::info!(book_id = %book.id, "book deleted");

    Ok(Json(DeletedBook {
        message: "Book deleted",
        book,
    }))
}
