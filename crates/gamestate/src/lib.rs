//! Snapshot schema for Dota 2 Game State Integration.
//!
//! The game client POSTs loosely-structured JSON snapshots; this crate
//! turns them into strongly-typed [`GameState`] records, absorbing the
//! client's quirks (hero-absence placeholder, engine name prefixes, the
//! `break` keyword field) at the deserialization boundary. Records are
//! request-scoped values with no identity or caching.

mod snapshot;
mod types;

pub use types::{GameState, Hero, JsonObject, MapState, Player, Provider};

/// Errors produced when validating a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("snapshot body is not a JSON object")]
    NotAnObject,

    #[error("invalid `{section}` section: {source}")]
    Section {
        section: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ValidationError {
    /// Name of the section that failed validation, if any.
    pub fn section(&self) -> Option<&'static str> {
        match self {
            ValidationError::NotAnObject => None,
            ValidationError::Section { section, .. } => Some(section),
        }
    }
}
