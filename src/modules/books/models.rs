use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::categories::models::Category;
use crate::utils::Patch;
use crate::validation::{self, ValidationErrors};

/// Maximum title length, matching the `title` column width.
pub const MAX_TITLE_CHARS: usize = 255;

/// A book row as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
}

/// Read-only composition of a book and its resolved category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookWithCategory {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub category: Option<Category>,
}

/// Response body of `DELETE /books/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct DeletedBook {
    pub message: &'static str,
    pub book: Book,
}

/// Validated input for creating a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
}

/// Validated partial update. Absent fields leave the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Patch<String>,
    pub category_id: Patch<Uuid>,
}

impl BookChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.description.is_absent()
            && self.category_id.is_absent()
    }

    /// The category this update will point at, if it sets one.
    pub fn target_category(&self) -> Option<Uuid> {
        match self.category_id {
            Patch::Value(id) => Some(id),
            Patch::Absent | Patch::Null => None,
        }
    }

    pub fn apply_to(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(description) = self.description.into_change() {
            book.description = description;
        }
        if let Some(category_id) = self.category_id.into_change() {
            book.category_id = category_id;
        }
    }
}

/// Raw request body for `POST` and `PUT /books`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub author: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub category_id: Patch<String>,
}

impl BookPayload {
    pub fn into_new(self) -> Result<NewBook, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let title = errors.collect(validation::required_text(
            "title",
            self.title,
            Some(MAX_TITLE_CHARS),
        ));
        let author = errors.collect(validation::required_text("author", self.author, None));
        let category_id = errors.collect(validation::uuid_ref("categoryId", self.category_id));

        match (title, author, category_id) {
            (Some(title), Some(author), Some(category_id)) => errors.finish(NewBook {
                title,
                author,
                description: self.description.into_option(),
                category_id: category_id.into_option(),
            }),
            _ => Err(errors),
        }
    }

    pub fn into_changes(self) -> Result<BookChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let title = errors.collect(validation::replacement_text(
            "title",
            self.title,
            Some(MAX_TITLE_CHARS),
        ));
        let author = errors.collect(validation::replacement_text("author", self.author, None));
        let category_id = errors.collect(validation::uuid_ref("categoryId", self.category_id));

        match (title, author, category_id) {
            (Some(title), Some(author), Some(category_id)) => errors.finish(BookChanges {
                title,
                author,
                description: self.description,
                category_id,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> BookPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn create_reports_every_missing_field() {
        let errors = payload("{}").into_new().unwrap_err();
        let fields: Vec<_> = errors.fields().iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "author"]);
    }

    #[test]
    fn create_rejects_malformed_category_id() {
        let errors = payload(r#"{"title": "Dune", "author": "Frank Herbert", "categoryId": "12"}"#)
            .into_new()
            .unwrap_err();
        assert_eq!(errors.fields()[0].field, "categoryId");
    }

    #[test]
    fn create_with_null_category_has_none() {
        let new = payload(r#"{"title": "Dune", "author": "Frank Herbert", "categoryId": null}"#)
            .into_new()
            .unwrap();
        assert_eq!(new.category_id, None);
        assert_eq!(new.description, None);
    }

    #[test]
    fn update_distinguishes_absent_and_null_category() {
        let absent = payload(r#"{"title": "Dune Messiah"}"#).into_changes().unwrap();
        assert_eq!(absent.category_id, Patch::Absent);

        let cleared = payload(r#"{"categoryId": null}"#).into_changes().unwrap();
        assert_eq!(cleared.category_id, Patch::Null);
        assert!(!cleared.is_empty());
    }

    #[test]
    fn applying_changes_preserves_absent_fields() {
        let category_id = Uuid::now_v7();
        let mut book = Book {
            id: Uuid::now_v7(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            description: Some("Spice".to_string()),
            category_id: Some(category_id),
        };

        payload(r#"{"author": "F. Herbert"}"#)
            .into_changes()
            .unwrap()
            .apply_to(&mut book);

        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "F. Herbert");
        assert_eq!(book.description.as_deref(), Some("Spice"));
        assert_eq!(book.category_id, Some(category_id));
    }

    #[test]
    fn book_serializes_camel_case() {
        let book = Book {
            id: Uuid::now_v7(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            description: None,
            category_id: None,
        };
        let json = serde_json::to_value(&book).unwrap();
        assert!(json.get("categoryId").is_some());
        assert!(json["description"].is_null());
    }
}
