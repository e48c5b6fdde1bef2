//! Types for the Pokémon catalog.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stored catalog entry (one Pokémon).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Store-assigned identifier. Never reused.
    pub id: i64,
    /// Display name (2-50 characters).
    pub name: String,
    /// URL-safe unique key (`[a-z0-9-]+`).
    pub slug: String,
    /// Type tags, in insertion order (e.g. "fire", "flying").
    pub types: Vec<String>,
    /// Free-text category (e.g. "Mouse Pokémon").
    pub category: String,
    /// Free-text abilities; several abilities are comma separated by convention.
    pub abilities: String,
    /// Known weaknesses. `None` means never recorded.
    #[serde(default, alias = "weekness", skip_serializing_if = "Option::is_none")]
    pub weakness: Option<Vec<String>>,
    /// Description (10-500 characters).
    pub description: String,
    /// Sprite image URL.
    pub sprite: String,
}

impl CatalogEntry {
    /// Attach a store-assigned id to a new entry.
    pub fn from_new(id: i64, entry: NewEntry) -> Self {
        Self {
            id,
            name: entry.name,
            slug: entry.slug,
            types: entry.types,
            category: entry.category,
            abilities: entry.abilities,
            weakness: entry.weakness,
            description: entry.description,
            sprite: entry.sprite,
        }
    }
}

/// A catalog entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub types: Vec<String>,
    pub category: String,
    pub abilities: String,
    #[serde(default, alias = "weekness", skip_serializing_if = "Option::is_none")]
    pub weakness: Option<Vec<String>>,
    pub description: String,
    pub sprite: String,
}

/// Raw form submission: lists are comma separated and the slug is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryDraft {
    pub name: String,
    /// Overrides the slug derived from `name` when non-blank.
    #[serde(default)]
    pub slug: Option<String>,
    /// Comma separated type tags.
    #[serde(default)]
    pub types: String,
    pub category: String,
    pub abilities: String,
    /// Comma separated weaknesses.
    #[serde(default, alias = "weekness")]
    pub weakness: String,
    pub description: String,
    pub sprite: String,
}

impl EntryDraft {
    /// Normalize the draft into a `NewEntry`.
    ///
    /// Lists are split on commas with items trimmed and blanks dropped. A
    /// missing or blank slug is derived from the name. No validation happens
    /// here; `QueryService::create` validates the result.
    pub fn into_new_entry(self) -> NewEntry {
        let slug = match self.slug {
            Some(slug) if !slug.trim().is_empty() => slug,
            _ => super::derive_slug(&self.name),
        };

        NewEntry {
            slug,
            types: super::split_list(&self.types),
            weakness: Some(super::split_list(&self.weakness)),
            name: self.name,
            category: self.category,
            abilities: self.abilities,
            description: self.description,
            sprite: self.sprite,
        }
    }
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed input caught before reaching storage, or a stored row that
    /// could not be parsed.
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// The store rejected a write because of a uniqueness constraint.
    #[error("Conflict: {message}")]
    Conflict {
        field: Option<String>,
        message: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    /// Store unavailable or failing. Callers may retry.
    #[error("Database error: {0}")]
    Database(String),
}

impl CatalogError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Conflict { .. } => "conflict",
            Self::NotFound(_) => "not_found",
            Self::Database(_) => "unavailable",
        }
    }

    /// The field the error is attributable to, when known.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            Self::Conflict { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}
