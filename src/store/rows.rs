//! Row shapes produced by the two book query paths.
//!
//! The plain listing and single-book lookups return [`JoinedBookRow`]
//! (a left join with `book_` / `category_` prefixed columns); full-text
//! search returns [`SearchHitRow`] (flattened book columns, `cat_` aliases
//! and a rank). Both are folded into `BookWithCategory` by one mapping.

use uuid::Uuid;

use crate::modules::books::models::Book;
use crate::modules::categories::models::Category;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct JoinedBookRow {
    pub book_id: Uuid,
    pub book_title: String,
    pub book_author: String,
    pub book_description: Option<String>,
    pub book_category_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub category_description: Option<String>,
}

impl JoinedBookRow {
    pub fn new(book: &Book, category: Option<&Category>) -> Self {
        Self {
            book_id: book.id,
            book_title: book.title.clone(),
            book_author: book.author.clone(),
            book_description: book.description.clone(),
            book_category_id: book.category_id,
            category_id: category.map(|c| c.id),
            category_name: category.map(|c| c.name.clone()),
            category_description: category.and_then(|c| c.description.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct SearchHitRow {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub cat_id: Option<Uuid>,
    pub cat_name: Option<String>,
    pub cat_description: Option<String>,
    pub rank: f32,
}

impl SearchHitRow {
    pub fn new(book: &Book, category: Option<&Category>, rank: f32) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            description: book.description.clone(),
            category_id: book.category_id,
            cat_id: category.map(|c| c.id),
            cat_name: category.map(|c| c.name.clone()),
            cat_description: category.and_then(|c| c.description.clone()),
            rank,
        }
    }
}

/// One book result, tagged by the query path that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum BookRow {
    Joined(JoinedBookRow),
    Ranked(SearchHitRow),
}
