pub mod compose;
pub mod handlers;
pub mod models;
pub mod search;

use async_trait::async_trait;
use axum::{routing::get, Router};
use bookshelf_kernel::{InitCtx, Migration, Module};
use serde_json::json;

use crate::store::SharedStore;

/// Books module: CRUD plus full-text search over the catalog
pub struct BooksModule {
    store: SharedStore,
}

impl BooksModule {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(handlers::list_books).post(handlers::create_book))
            .route(
                "/{id}",
                get(handlers::get_book)
                    .put(handlers::update_book)
                    .delete(handlers::delete_book),
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
        let book_body = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/BookWithCategory" }
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
                        "summary": "List books, or search them with q",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "q",
                            "in": "query",
                            "required": false,
                            "description": "Full-text search across title, author and description; results ordered by relevance",
                            "schema": { "type": "string", "maxLength": search::MAX_QUERY_CHARS }
                        }],
                        "responses": {
                            "200": {
                                "description": "Books with their categories",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/BookWithCategory" }
                                        }
                                    }
                                }
                            },
                            "400": error("Search query too long"),
                            "500": error("Internal server error")
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookInput" }
                                }
                            }
                        },
                        "responses": {
                            "201": book_body("Created book"),
                            "400": error("Validation error"),
                            "404": error("Referenced category not found"),
                            "500": error("Internal server error")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "responses": {
                            "200": book_body("Book with its category"),
                            "400": error("Malformed id"),
                            "404": error("Book not found"),
                            "500": error("Internal server error")
                        }
                    },
                    "put": {
                        "summary": "Update some fields of a book",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookUpdate" }
                                }
                            }
                        },
                        "responses": {
                            "200": book_body("Updated book"),
                            "400": error("Validation error"),
                            "404": error("Book or referenced category not found"),
                            "500": error("Internal server error")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "responses": {
                            "200": {
                                "description": "Deleted book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/DeletedBook" }
                                    }
                                }
                            },
                            "400": error("Malformed id"),
                            "404": error("Book not found"),
                            "500": error("Internal server error")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "format": "uuid" },
                            "title": { "type": "string", "maxLength": models::MAX_TITLE_CHARS },
                            "author": { "type": "string" },
                            "description": { "type": ["string", "null"] },
                            "categoryId": { "type": ["string", "null"], "format": "uuid" }
                        },
                        "required": ["id", "title", "author", "description", "categoryId"]
                    },
                    "BookWithCategory": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "format": "uuid" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "description": { "type": ["string", "null"] },
                            "categoryId": { "type": ["string", "null"], "format": "uuid" },
                            "category": {
                                "oneOf": [
                                    { "$ref": "#/components/schemas/Category" },
                                    { "type": "null" }
                                ]
                            }
                        },
                        "required": ["id", "title", "author", "description", "categoryId", "category"]
                    },
                    "BookInput": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string", "minLength": 1, "maxLength": models::MAX_TITLE_CHARS },
                            "author": { "type": "string", "minLength": 1 },
                            "description": { "type": ["string", "null"] },
                            "categoryId": { "type": ["string", "null"], "format": "uuid" }
                        },
                        "required": ["title", "author"]
                    },
                    "BookUpdate": {
                        "type": "object",
                        "description": "Absent fields are left unchanged; null clears description or categoryId",
                        "properties": {
                            "title": { "type": "string", "minLength": 1, "maxLength": models::MAX_TITLE_CHARS },
                            "author": { "type": "string", "minLength": 1 },
                            "description": { "type": ["string", "null"] },
                            "categoryId": { "type": ["string", "null"], "format": "uuid" }
                        }
                    },
                    "DeletedBook": {
                        "type": "object",
                        "properties": {
                            "message": { "type": "string" },
                            "book": { "$ref": "#/components/schemas/Book" }
                        },
                        "required": ["message", "book"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "0002_create_books",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id UUID PRIMARY KEY,
                    title VARCHAR(255) NOT NULL,
                    author TEXT NOT NULL,
                    description TEXT,
                    category_id UUID REFERENCES categories(id) ON DELETE SET NULL
                );
                CREATE INDEX IF NOT EXISTS idx_books_title ON books (title);
                CREATE INDEX IF NOT EXISTS idx_books_author ON books (author);
                CREATE INDEX IF NOT EXISTS idx_books_fulltext ON books USING gin (
                    to_tsvector('english', title || ' ' || author || ' ' || coalesce(description, ''))
                );
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(store: SharedStore) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(store))
}
