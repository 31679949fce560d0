//! In-process adapter for [`CatalogStore`], selected with `memory://`.
//!
//! Mirrors the PostgreSQL schema's behaviour: referential checks on book
//! writes, set-null when a category is deleted, insertion-ordered listing.
//! Search requires every query term to occur in the title, author or
//! description and ranks by total term occurrences; there is no stemming
//! or stop-word removal.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BookRow, CatalogStore, JoinedBookRow, SearchHitRow, StoreError, StoreResult};
use crate::modules::books::models::{Book, BookChanges, NewBook};
use crate::modules::books::search::SearchTerm;
use crate::modules::categories::models::{Category, CategoryChanges, NewCategory};

#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    tables: RwLock<Tables>,
}

// UUIDv7 keys keep both maps in insertion order.
#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<Uuid, Category>,
    books: BTreeMap<Uuid, Book>,
}

impl Tables {
    fn category_of(&self, book: &Book) -> Option<&Category> {
        book.category_id.and_then(|id| self.categories.get(&id))
    }

    fn check_reference(&self, category_id: Option<Uuid>) -> StoreResult<()> {
        match category_id {
            Some(id) if !self.categories.contains_key(&id) => Err(StoreError::Constraint(
                format!("books.category_id references missing category {}", id),
            )),
            _ => Ok(()),
        }
    }
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

/// Occurrences of the query terms in the book, or `None` unless every term matches.
fn relevance(book: &Book, terms: &[String]) -> Option<f32> {
    if terms.is_empty() {
        return None;
    }

    let document: Vec<String> = tokens(&book.title)
        .chain(tokens(&book.author))
        .chain(tokens(book.description.as_deref().unwrap_or_default()))
        .collect();

    let mut hits = 0usize;
    for term in terms {
        let count = document.iter().filter(|token| *token == term).count();
        if count == 0 {
            return None;
        }
        hits += count;
    }

    Some(hits as f32)
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().cloned().collect())
    }

    async fn find_category(&self, id: Uuid) -> StoreResult<Option<Category>> {
        let tables = self.tables.read().await;
        Ok(tables.categories.get(&id).cloned())
    }

    async fn category_exists(&self, id: Uuid) -> StoreResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.categories.contains_key(&id))
    }

    async fn insert_category(&self, category: NewCategory) -> StoreResult<Category> {
        let mut tables = self.tables.write().await;
        let category = Category {
            id: Uuid::now_v7(),
            name: category.name,
            description: category.description,
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: Uuid,
        changes: CategoryChanges,
    ) -> StoreResult<Option<Category>> {
        let mut tables = self.tables.write().await;
        let Some(category) = tables.categories.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(category);
        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, id: Uuid) -> StoreResult<Option<Category>> {
        let mut tables = self.tables.write().await;
        let Some(category) = tables.categories.remove(&id) else {
            return Ok(None);
        };

        for book in tables.books.values_mut() {
            if book.category_id == Some(id) {
                book.category_id = None;
            }
        }

        Ok(Some(category))
    }

    async fn list_books(&self) -> StoreResult<Vec<BookRow>> {
        let tables = self.tables.read().await;
        let rows = tables
            .books
            .values()
            .map(|book| BookRow::Joined(JoinedBookRow::new(book, tables.category_of(book))))
            .collect();
        Ok(rows)
    }

    async fn search_books(&self, term: &SearchTerm) -> StoreResult<Vec<BookRow>> {
        let terms: Vec<String> = tokens(term.as_str()).collect();
        let tables = self.tables.read().await;

        let mut hits: Vec<SearchHitRow> = tables
            .books
            .values()
            .filter_map(|book| {
                relevance(book, &terms)
                    .map(|rank| SearchHitRow::new(book, tables.category_of(book), rank))
            })
            .collect();

        hits.sort_by(|a, b| b.rank.total_cmp(&a.rank).then_with(|| a.id.cmp(&b.id)));

        Ok(hits.into_iter().map(BookRow::Ranked).collect())
    }

    async fn find_book(&self, id: Uuid) -> StoreResult<Option<BookRow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .books
            .get(&id)
            .map(|book| BookRow::Joined(JoinedBookRow::new(book, tables.category_of(book)))))
    }

    async fn insert_book(&self, book: NewBook) -> StoreResult<Book> {
        let mut tables = self.tables.write().await;
        tables.check_reference(book.category_id)?;

        let book = Book {
            id: Uuid::now_v7(),
            title: book.title,
            author: book.author,
            description: book.description,
            category_id: book.category_id,
        };
        tables.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update_book(&self, id: Uuid, changes: BookChanges) -> StoreResult<Option<Book>> {
        let mut tables = self.tables.write().await;
        tables.check_reference(changes.target_category())?;

        let Some(book) = tables.books.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(book);
        Ok(Some(book.clone()))
    }

    async fn delete_book(&self, id: Uuid) -> StoreResult<Option<Book>> {
        let mut tables = self.tables.write().await;
        Ok(tables.books.remove(&id))
    }
}
