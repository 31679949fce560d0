//! Folding either book row shape into [`BookWithCategory`].

use uuid::Uuid;

use super::models::BookWithCategory;
use crate::modules::categories::models::Category;
use crate::store::{BookRow, JoinedBookRow, SearchHitRow};

/// A left join yields all-null category columns for an unset reference;
/// that is `None`, never a category with empty fields.
fn category(
    id: Option<Uuid>,
    name: Option<String>,
    description: Option<String>,
) -> Option<Category> {
    match (id, name) {
        (Some(id), Some(name)) => Some(Category {
            id,
            name,
            description,
        }),
        _ => None,
    }
}

impl From<JoinedBookRow> for BookWithCategory {
    fn from(row: JoinedBookRow) -> Self {
        Self {
            id: row.book_id,
            title: row.book_title,
            author: row.book_author,
            description: row.book_description,
            category_id: row.book_category_id,
            category: category(row.category_id, row.category_name, row.category_description),
        }
    }
}

impl From<SearchHitRow> for BookWithCategory {
    fn from(row: SearchHitRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            author: row.author,
            description: row.description,
            category_id: row.category_id,
            category: category(row.cat_id, row.cat_name, row.cat_description),
        }
    }
}

impl From<BookRow> for BookWithCategory {
    fn from(row: BookRow) -> Self {
        match row {
            BookRow::Joined(row) => row.into(),
            BookRow::Ranked(row) => row.into(),
        }
    }
}
