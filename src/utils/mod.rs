//! Helpers shared by the request payload types.

use serde::{Deserialize, Deserializer};

/// Tri-state field for partial updates.
///
/// Distinguishes a key that was left out of the payload (`Absent`, keep the
/// stored value) from one explicitly set to `null` (`Null`, clear it).
/// Fields must be annotated with `#[serde(default)]` so a missing key
/// deserializes to `Absent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// `None` when absent, `Some(None)` when cleared, `Some(Some(v))` when set.
    pub fn into_change(self) -> Option<Option<T>> {
        match self {
            Patch::Absent => None,
            Patch::Null => Some(None),
            Patch::Value(value) => Some(Some(value)),
        }
    }

    /// Collapse into a plain optional, treating absent like null.
    pub fn into_option(self) -> Option<T> {
        self.into_change().flatten()
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Payload {
        #[serde(default)]
        note: Patch<String>,
    }

    fn parse(json: &str) -> Patch<String> {
        serde_json::from_str::<Payload>(json).unwrap().note
    }

    #[test]
    fn missing_key_is_absent() {
        assert_eq!(parse("{}"), Patch::Absent);
    }

    #[test]
    fn explicit_null_is_null() {
        assert_eq!(parse(r#"{"note": null}"#), Patch::Null);
    }

    #[test]
    fn value_is_kept() {
        assert_eq!(parse(r#"{"note": "hi"}"#), Patch::Value("hi".to_string()));
    }

    #[test]
    fn change_distinguishes_absent_from_cleared() {
        assert_eq!(Patch::<u8>::Absent.into_change(), None);
        assert_eq!(Patch::<u8>::Null.into_change(), Some(None));
        assert_eq!(Patch::Value(3u8).into_change(), Some(Some(3)));
    }
}
