//! Parsing of loose game-client snapshots into [`GameState`] records.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ValidationError;
use crate::types::{GameState, JsonObject};

/// The client's "no hero selected" placeholder: exactly `{"id": 0}`.
fn is_vacant_hero(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| obj.len() == 1 && obj.get("id").and_then(Value::as_u64) == Some(0))
}

impl GameState {
    /// Validates one raw snapshot.
    ///
    /// Each known section is checked independently so a failure names
    /// the section it came from; unknown top-level keys are dropped. A
    /// `hero` section of exactly `{"id": 0}` is the client's convention
    /// for "no hero controlled" and becomes an absent section before
    /// validation runs.
    pub fn from_snapshot(snapshot: Value) -> Result<Self, ValidationError> {
        let Value::Object(mut sections) = snapshot else {
            return Err(ValidationError::NotAnObject);
        };

        if sections.get("hero").is_some_and(is_vacant_hero) {
            sections.insert("hero".into(), Value::Null);
        }

        Ok(Self {
            provider: section(&mut sections, "provider")?,
            map: section(&mut sections, "map")?,
            player: section(&mut sections, "player")?,
            hero: section(&mut sections, "hero")?,
            abilities: section(&mut sections, "abilities")?,
            items: section(&mut sections, "items")?,
            auth: section(&mut sections, "auth")?,
        })
    }
}

/// Parses one named section, treating a missing or null entry as absent.
fn section<T: DeserializeOwned>(
    sections: &mut JsonObject,
    name: &'static str,
) -> Result<Option<T>, ValidationError> {
    match sections.remove(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| ValidationError::Section {
                section: name,
                source,
            }),
    }
}
