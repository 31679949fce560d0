//! Choosing between the plain listing and full-text search for `GET /books`.

use serde::Deserialize;

use super::models::BookWithCategory;
use crate::store::{CatalogStore, StoreError};
use crate::validation::ValidationErrors;

/// Longest accepted `q`, in characters.
pub const MAX_QUERY_CHARS: usize = 100;

/// Query string of `GET /books`.
#[derive(Debug, Default, Deserialize)]
pub struct ListBooksParams {
    pub q: Option<String>,
}

/// A trimmed, non-empty, length-checked search string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookListing {
    /// Every book, in insertion order.
    All,
    /// Ranked full-text matches, most relevant first.
    Search(SearchTerm),
}

impl BookListing {
    /// Over-long queries are rejected; blank ones fall back to the full listing.
    pub fn from_query(q: Option<&str>) -> Result<Self, ValidationErrors> {
        let Some(raw) = q else {
            return Ok(Self::All);
        };

        if raw.chars().count() > MAX_QUERY_CHARS {
            return Err(ValidationErrors::single(
                "q",
                format!(
                    "q exceeds maximum length of {} characters",
                    MAX_QUERY_CHARS
                ),
            ));
        }

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Ok(Self::All)
        } else {
            Ok(Self::Search(SearchTerm(trimmed.to_string())))
        }
    }

    pub async fn fetch(
        &self,
        store: &dyn CatalogStore,
    ) -> Result<Vec<BookWithCategory>, StoreError> {
        let rows = match self {
            Self::All => store.list_books().await?,
            Self::Search(term) => store.search_books(term).await?,
        };

        Ok(rows.into_iter().map(BookWithCategory::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_query_lists_everything() {
        assert_eq!(BookListing::from_query(None).unwrap(), BookListing::All);
    }

    #[test]
    fn blank_query_lists_everything() {
        assert_eq!(BookListing::from_query(Some("   ")).unwrap(), BookListing::All);
    }

    #[test]
    fn query_is_trimmed() {
        match BookListing::from_query(Some("  dune ")).unwrap() {
            BookListing::Search(term) => assert_eq!(term.as_str(), "dune"),
            BookListing::All => panic!("expected search"),
        }
    }

    #[test]
    fn query_at_limit_is_accepted() {
        let q = "a".repeat(MAX_QUERY_CHARS);
        assert!(BookListing::from_query(Some(&q)).is_ok());
    }

    #[test]
    fn query_over_limit_is_rejected() {
        let q = "a".repeat(MAX_QUERY_CHARS + 1);
        let errors = BookListing::from_query(Some(&q)).unwrap_err();
        assert_eq!(errors.fields()[0].field, "q");
    }
}
