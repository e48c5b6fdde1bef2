//! Testing utilities: an in-memory store and entry fixtures.
//!
//! # Example
//!
//! ```rust,ignore
//! use pokedex_core::testing::{fixtures, InMemoryCatalogStore};
//!
//! let store = InMemoryCatalogStore::with_entries([fixtures::pikachu(), fixtures::charmander()]);
//! let service = QueryService::new(Arc::new(store), QueryCache::default());
//! ```

mod mock_store;

pub use mock_store::InMemoryCatalogStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{derive_slug, EntryDraft, NewEntry};

    /// Create a valid entry with reasonable defaults. The slug is derived from `name`.
    pub fn new_entry(name: &str, types: &[&str]) -> NewEntry {
        let slug = derive_slug(name);
        NewEntry {
            name: name.to_string(),
            sprite: format!("https://img.example.com/sprites/{}.png", slug),
            slug,
            types: types.iter().map(|t| t.to_string()).collect(),
            category: "Test Pokémon".to_string(),
            abilities: "Overgrow".to_string(),
            weakness: Some(vec!["bug".to_string()]),
            description: format!("{} is a Pokémon used in tests.", name),
        }
    }

    pub fn pikachu() -> NewEntry {
        NewEntry {
            category: "Mouse Pokémon".to_string(),
            abilities: "Static".to_string(),
            weakness: Some(vec!["ground".to_string()]),
            description: "It stores electricity in the electric sacs on its cheeks.".to_string(),
            ..new_entry("Pikachu", &["electric"])
        }
    }

    pub fn charmander() -> NewEntry {
        NewEntry {
            category: "Lizard Pokémon".to_string(),
            abilities: "Blaze".to_string(),
            weakness: Some(vec![
                "water".to_string(),
                "ground".to_string(),
                "rock".to_string(),
            ]),
            description: "The flame on its tail shows the strength of its life force."
                .to_string(),
            ..new_entry("Charmander", &["fire"])
        }
    }

    /// A form submission as the create page would send it.
    pub fn draft(name: &str, types: &str) -> EntryDraft {
        EntryDraft {
            name: name.to_string(),
            slug: None,
            types: types.to_string(),
            category: "Test Pokémon".to_string(),
            abilities: "Overgrow, Chlorophyll".to_string(),
            weakness: "fire, ice".to_string(),
            description: format!("{} was submitted through the form.", name),
            sprite: "https://img.example.com/sprites/draft.png".to_string(),
        }
    }
}
