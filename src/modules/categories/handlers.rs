use axum::{extract::State, http::StatusCode, Json};
use bookshelf_http::{ApiJson, AppError, OptionalJson, PathId};
use serde::Serialize;
use uuid::Uuid;

use super::models::{Category, CategoryPayload};
use crate::store::SharedStore;

/// Response body of `DELETE /categories/{id}`.
#[derive(Debug, Serialize)]
pub struct DeletedCategory {
    pub message: &'static str,
}

pub(crate) fn category_not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Category '{}' not found", id))
}

/// GET /categories
pub async fn list_categories(
    State(store): State<SharedStore>,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = store.list_categories().await?;
    Ok(Json(categories))
}

/// GET /categories/{id}
pub async fn get_category(
    State(store): State<SharedStore>,
    PathId(id): PathId,
) -> Result<Json<Category>, AppError> {
    let category = store
        .find_category(id)
        .await?
        .ok_or_else(|| category_not_found(id))?;
    Ok(Json(category))
}

/// POST /categories
pub async fn create_category(
    State(store): State<SharedStore>,
    ApiJson(payload): ApiJson<CategoryPayload>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let new_category = payload.into_new()?;
    let category = store.insert_category(new_category).await?;
    tracing::info!(category_id = %category.id, "category created");

    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /categories/{id}
pub async fn update_category(
    State(store): State<SharedStore>,
    PathId(id): PathId,
    OptionalJson(payload): OptionalJson<CategoryPayload>,
) -> Result<Json<Category>, AppError> {
    let changes = payload.into_changes()?;
    let category = store
        .update_category(id, changes)
        .await?
        .ok_or_else(|| category_not_found(id))?;
    tracing::info!(category_id = %category.id, "category updated");

    Ok(Json(category))
}

/// DELETE /categories/{id}
pub async fn delete_category(
    State(store): State<SharedStore>,
    PathId(id): PathId,
) -> Result<Json<DeletedCategory>, AppError> {
    let category = store
        .delete_category(id)
        .await?
        .ok_or_else(|| category_not_found(id))?;
    tracing::info!(category_id = %category.id, "category deleted");

    Ok(Json(DeletedCategory {
        message: "Category deleted",
    }))
}
