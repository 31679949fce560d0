//! PostgreSQL adapter for [`CatalogStore`].

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{BookRow, CatalogStore, JoinedBookRow, SearchHitRow, StoreResult};
use crate::modules::books::models::{Book, BookChanges, NewBook};
use crate::modules::books::search::SearchTerm;
use crate::modules::categories::models::{Category, CategoryChanges, NewCategory};

macro_rules! joined_books {
    () => {
        r#"
        SELECT
            b.id AS book_id,
            b.title AS book_title,
            b.author AS book_author,
            b.description AS book_description,
            b.category_id AS book_category_id,
            c.id AS category_id,
            c.name AS category_name,
            c.description AS category_description
        FROM books b
        LEFT JOIN categories c ON c.id = b.category_id
        "#
    };
}

const LIST_BOOKS: &str = concat!(joined_books!(), "ORDER BY b.id");
const FIND_BOOK: &str = concat!(joined_books!(), "WHERE b.id = $1");

// The document expression must stay identical to `idx_books_fulltext`.
const SEARCH_BOOKS: &str = r#"
    SELECT
        b.id,
        b.title,
        b.author,
        b.description,
        b.category_id,
        c.id AS cat_id,
        c.name AS cat_name,
        c.description AS cat_description,
        ts_rank(
            to_tsvector('english', b.title || ' ' || b.author || ' ' || coalesce(b.description, '')),
            query
        ) AS rank
    FROM books b
    CROSS JOIN plainto_tsquery('english', $1) AS query
    LEFT JOIN categories c ON c.id = b.category_id
    WHERE to_tsvector('english', b.title || ' ' || b.author || ' ' || coalesce(b.description, '')) @@ query
    ORDER BY rank DESC, b.id ASC
"#;

const BOOK_RETURNING: &str = " RETURNING id, title, author, description, category_id";
const CATEGORY_RETURNING: &str = " RETURNING id, name, description";

/// Catalog store backed by a sqlx connection pool.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_plain_book(&self, id: Uuid) -> StoreResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, description, category_id FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn find_category(&self, id: Uuid) -> StoreResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn category_exists(&self, id: Uuid) -> StoreResult<bool> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }

    async fn insert_category(&self, category: NewCategory) -> StoreResult<Category> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, description
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(category.name)
        .bind(category.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    async fn update_category(
        &self,
        id: Uuid,
        changes: CategoryChanges,
    ) -> StoreResult<Option<Category>> {
        if changes.is_empty() {
            return self.find_category(id).await;
        }

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE categories SET ");
        {
            let mut assignments = builder.separated(", ");
            if let Some(name) = changes.name {
                assignments.push("name = ").push_bind_unseparated(name);
            }
            if let Some(description) = changes.description.into_change() {
                assignments
                    .push("description = ")
                    .push_bind_unseparated(description);
            }
        }
        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(CATEGORY_RETURNING);

        let category = builder
            .build_query_as::<Category>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    async fn delete_category(&self, id: Uuid) -> StoreResult<Option<Category>> {
        // `books.category_id` is declared ON DELETE SET NULL.
        let category = sqlx::query_as::<_, Category>(
            "DELETE FROM categories WHERE id = $1 RETURNING id, name, description",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn list_books(&self) -> StoreResult<Vec<BookRow>> {
        let rows = sqlx::query_as::<_, JoinedBookRow>(LIST_BOOKS)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(BookRow::Joined).collect())
    }

    async fn search_books(&self, term: &SearchTerm) -> StoreResult<Vec<BookRow>> {
        let rows = sqlx::query_as::<_, SearchHitRow>(SEARCH_BOOKS)
            .bind(term.as_str())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(BookRow::Ranked).collect())
    }

    async fn find_book(&self, id: Uuid) -> StoreResult<Option<BookRow>> {
        let row = sqlx::query_as::<_, JoinedBookRow>(FIND_BOOK)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(BookRow::Joined))
    }

    async fn insert_book(&self, book: NewBook) -> StoreResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (id, title, author, description, category_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, author, description, category_id
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(book.title)
        .bind(book.author)
        .bind(book.description)
        .bind(book.category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(book)
    }

    async fn update_book(&self, id: Uuid, changes: BookChanges) -> StoreResult<Option<Book>> {
        if changes.is_empty() {
            return self.find_plain_book(id).await;
        }

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE books SET ");
        {
            let mut assignments = builder.separated(", ");
            if let Some(title) = changes.title {
                assignments.push("title = ").push_bind_unseparated(title);
            }
            if let Some(author) = changes.author {
                assignments.push("author = ").push_bind_unseparated(author);
            }
            if let Some(description) = changes.description.into_change() {
                assignments
                    .push("description = ")
                    .push_bind_unseparated(description);
            }
            if let Some(category_id) = changes.category_id.into_change() {
                assignments
                    .push("category_id = ")
                    .push_bind_unseparated(category_id);
            }
        }
        builder.push(" WHERE id = ").push_bind(id).push(BOOK_RETURNING);

        let book = builder
            .build_query_as::<Book>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    async fn delete_book(&self, id: Uuid) -> StoreResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "DELETE FROM books WHERE id = $1 RETURNING id, title, author, description, category_id",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }
}
