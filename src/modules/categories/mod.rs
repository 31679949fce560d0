pub mod handlers;
pub mod models;

use async_trait::async_trait;
use axum::{routing::get, Router};
use bookshelf_http::AppError;
use bookshelf_kernel::{InitCtx, Migration, Module};
use serde_json::json;
use uuid::Uuid;

use crate::store::{CatalogStore, SharedStore};

/// Fail with 404 unless the category exists. Used before a book write that
/// points at `id`; the check and the write are not atomic.
pub async fn ensure_category_exists(store: &dyn CatalogStore, id: Uuid) -> Result<(), AppError> {
    if store.category_exists(id).await? {
        Ok(())
    } else {
        Err(handlers::category_not_found(id))
    }
}

/// Categories module
pub struct CategoriesModule {
    store: SharedStore,
}

impl CategoriesModule {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for CategoriesModule {
    fn name(&self) -> &'static str {
        "categories"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "categories module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route(
                "/",
                get(handlers::list_categories).post(handlers::create_category),
            )
            .route(
                "/{id}",
                get(handlers::get_category)
                    .put(handlers::update_category)
                    .delete(handlers::delete_category),
            )
            .with_state(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let category_body = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Category" }
                    }
                }
            })
        };
        let category_input = |schema: &str| {
            json!({
                "required": true,
                "content": {
                    "application/json": {
                        "schema": { "$ref": format!("#/components/schemas/{}", schema) }
                    }
                }
            })
        };
        let id_param = json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "string", "format": "uuid" }
        });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List categories",
                        "tags": ["Categories"],
                        "responses": {
                            "200": {
                                "description": "All categories",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Category" }
                                        }
                                    }
                                }
                            },
                            "500": error("Internal server error")
                        }
                    },
                    "post": {
                        "summary": "Create a category",
                        "tags": ["Categories"],
                        "requestBody": category_input("CategoryInput"),
                        "responses": {
                            "201": category_body("Created category"),
                            "400": error("Validation error"),
                            "500": error("Internal server error")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a category",
                        "tags": ["Categories"],
                        "parameters": [id_param.clone()],
                        "responses": {
                            "200": category_body("Category"),
                            "400": error("Malformed id"),
                            "404": error("Category not found"),
                            "500": error("Internal server error")
                        }
                    },
                    "put": {
                        "summary": "Update some fields of a category",
                        "tags": ["Categories"],
                        "parameters": [id_param.clone()],
                        "requestBody": category_input("CategoryUpdate"),
                        "responses": {
                            "200": category_body("Updated category"),
                            "400": error("Validation error"),
                            "404": error("Category not found"),
                            "500": error("Internal server error")
                        }
                    },
                    "delete": {
                        "summary": "Delete a category; its books keep existing without a category",
                        "tags": ["Categories"],
                        "parameters": [id_param],
                        "responses": {
                            "200": {
                                "description": "Deletion confirmation",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": { "message": { "type": "string" } },
                                            "required": ["message"]
                                        }
                                    }
                                }
                            },
                            "400": error("Malformed id"),
                            "404": error("Category not found"),
                            "500": error("Internal server error")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Category": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "format": "uuid" },
                            "name": { "type": "string", "maxLength": models::MAX_NAME_CHARS },
                            "description": { "type": ["string", "null"] }
                        },
                        "required": ["id", "name", "description"]
                    },
                    "CategoryInput": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string", "minLength": 1, "maxLength": models::MAX_NAME_CHARS },
                            "description": { "type": ["string", "null"] }
                        },
                        "required": ["name"]
                    },
                    "CategoryUpdate": {
                        "type": "object",
                        "description": "Absent fields are left unchanged; null clears description",
                        "properties": {
                            "name": { "type": "string", "minLength": 1, "maxLength": models::MAX_NAME_CHARS },
                            "description": { "type": ["string", "null"] }
                        }
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "0001_create_categories",
            up: r#"
                CREATE TABLE IF NOT EXISTS categories (
                    id UUID PRIMARY KEY,
                    name VARCHAR(100) NOT NULL,
                    description TEXT
                );
                "#,
        }]
    }
}

/// Create a new instance of the categories module
pub fn create_module(store: SharedStore) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(CategoriesModule::new(store))
}
