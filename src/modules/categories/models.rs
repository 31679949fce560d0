use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::Patch;
use crate::validation::{self, ValidationErrors};

/// Maximum category name length, matching the `name` column width.
pub const MAX_NAME_CHARS: usize = 100;

/// A category as stored and as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// Validated input for creating a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

/// Validated partial update. `None` / `Patch::Absent` leave a column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub description: Patch<String>,
}

impl CategoryChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_absent()
    }

    /// Apply the changes to a stored category.
    pub fn apply_to(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(description) = self.description.into_change() {
            category.description = description;
        }
    }
}

/// Raw request body for `POST` and `PUT /categories`.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryPayload {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
}

impl CategoryPayload {
    pub fn into_new(self) -> Result<NewCategory, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = errors.collect(validation::required_text(
            "name",
            self.name,
            Some(MAX_NAME_CHARS),
        ));

        match name {
            Some(name) => errors.finish(NewCategory {
                name,
                description: self.description.into_option(),
            }),
            None => Err(errors),
        }
    }

    pub fn into_changes(self) -> Result<CategoryChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = errors
            .collect(validation::replacement_text(
                "name",
                self.name,
                Some(MAX_NAME_CHARS),
            ))
            .flatten();

        errors.finish(CategoryChanges {
            name,
            description: self.description,
        })
    }
}
