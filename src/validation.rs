//! Field-level payload validation shared by the catalog modules.

use bookshelf_http::{AppError, FieldError};
use uuid::Uuid;

use crate::utils::Patch;

/// Accumulates field errors so a payload reports every problem at once.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.fields.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    /// Record the error of `result` if any and hand back its value.
    pub fn collect<T>(&mut self, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.fields.push(err);
                None
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::validation(errors.fields, "Request validation failed")
    }
}

/// Check a present string: it must contain a non-whitespace character and
/// stay within `max_chars` when bounded.
pub fn text(field: &str, value: String, max_chars: Option<usize>) -> Result<String, FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::new(field, format!("{} cannot be empty", field)));
    }
    if let Some(max) = max_chars {
        if value.chars().count() > max {
            return Err(FieldError::new(
                field,
                format!("{} exceeds maximum length of {} characters", field, max),
            ));
        }
    }
    Ok(value)
}

/// A field mandatory on create.
pub fn required_text(
    field: &str,
    value: Patch<String>,
    max_chars: Option<usize>,
) -> Result<String, FieldError> {
    match value {
        Patch::Value(value) => text(field, value, max_chars),
        Patch::Absent | Patch::Null => {
            Err(FieldError::new(field, format!("{} is required", field)))
        }
    }
}

/// A non-nullable field on update: may be left out, may not be cleared.
pub fn replacement_text(
    field: &str,
    value: Patch<String>,
    max_chars: Option<usize>,
) -> Result<Option<String>, FieldError> {
    match value {
        Patch::Absent => Ok(None),
        Patch::Null => Err(FieldError::new(field, format!("{} cannot be null", field))),
        Patch::Value(value) => text(field, value, max_chars).map(Some),
    }
}

/// Parse a present identifier; absence and null pass through untouched.
pub fn uuid_ref(field: &str, value: Patch<String>) -> Result<Patch<Uuid>, FieldError> {
    match value {
        Patch::Absent => Ok(Patch::Absent),
        Patch::Null => Ok(Patch::Null),
        Patch::Value(raw) => bookshelf_http::parse_uuid(&raw)
            .map(Patch::Value)
            .ok_or_else(|| FieldError::new(field, format!("{} must be a valid UUID", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected() {
        let err = text("title", "   ".to_string(), None).unwrap_err();
        assert_eq!(err.message, "title cannot be empty");
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let value = "é".repeat(100);
        assert!(text("name", value.clone(), Some(100)).is_ok());
        assert!(text("name", format!("{value}é"), Some(100)).is_err());
    }

    #[test]
    fn required_text_rejects_null_and_absent() {
        assert!(required_text("author", Patch::Absent, None).is_err());
        assert!(required_text("author", Patch::Null, None).is_err());
    }

    #[test]
    fn replacement_text_allows_absence_only() {
        assert_eq!(replacement_text("title", Patch::Absent, None).unwrap(), None);
        assert!(replacement_text("title", Patch::Null, None).is_err());
    }

    #[test]
    fn uuid_ref_keeps_tri_state() {
        let id = Uuid::now_v7();
        assert_eq!(uuid_ref("categoryId", Patch::Null).unwrap(), Patch::Null);
        assert_eq!(
            uuid_ref("categoryId", Patch::Value(id.to_string())).unwrap(),
            Patch::Value(id)
        );
        assert!(uuid_ref("categoryId", Patch::Value("7".to_string())).is_err());
        assert!(uuid_ref("categoryId", Patch::Value(id.simple().to_string())).is_err());
    }

    #[test]
    fn errors_accumulate() {
        let mut errors = ValidationErrors::new();
        errors.collect(required_text("title", Patch::Absent, None));
        errors.collect(required_text("author", Patch::Null, None));
        assert_eq!(errors.fields().len(), 2);
        assert!(errors.finish(()).is_err());
    }
}
