// Pokedeck - Core Library
// Exposes all modules for use in the API server, the relay CLI, and tests

pub mod api;            // HTTP routes + shared-secret gate
pub mod blocks;         // Block Kit payloads for the chat relay
pub mod catalog;        // Catalog Cache - known names for suggestions
pub mod config;         // Environment configuration
pub mod deck;           // Deck Store - bounded ordered set
pub mod error;          // Error taxonomy
pub mod lookup;         // Entity Lookup - upstream resolve + suggestion on miss
pub mod matcher;        // Approximate Matcher
pub mod pokeapi;        // Outbound PokeAPI client
pub mod relay;          // Chat relay client over the HTTP API

// Re-export commonly used types
pub use api::{build_router, AppState};
pub use catalog::{CatalogCache, CatalogState};
pub use config::Config;
pub use deck::{DeckError, DeckStore, DECK_CAPACITY};
pub use error::{ServiceError, UpstreamError};
pub use lookup::{EntityLookup, LookupOutcome, SuggestionOutcome};
pub use matcher::suggest;
pub use pokeapi::{EntityRecord, PokeApiClient, PokedexSource};
pub use relay::{parse_command, Command, Relay, RelayMessage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
