// ⚠️ Error Taxonomy - every failure the API surface can report
// Recovered at the router boundary, never fatal to the listener

use thiserror::Error;

// ============================================================================
// UPSTREAM ERRORS (external catalog/detail service)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpstreamError {
    /// The upstream answered 404: the entity does not exist
    #[error("entity not found upstream")]
    NotFound,

    /// Network failure, timeout, non-404 status or undecodable body
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
}

impl UpstreamError {
    /// Only genuine misses are eligible for "did you mean" suggestions
    pub fn is_not_found(&self) -> bool {
        matches!(self, UpstreamError::NotFound)
    }
}

// ============================================================================
// SERVICE ERRORS (surfaced to callers as JSON)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    #[error("Unauthorized")]
    Unauthorized,

    /// Missing required field; message is the user-facing text
    #[error("{0}")]
    InvalidInput(String),

    #[error("Pokémon \"{queried}\" not found")]
    NotFoundUpstream { queried: String },

    #[error("Pokémon \"{queried}\" not found")]
    UpstreamUnavailable { queried: String },

    #[error("Deck is full. Maximum {capacity} Pokémon allowed.")]
    DeckFull { capacity: usize },

    /// `name` is the value as the caller sent it
    #[error("Pokémon '{name}' is already in your deck.")]
    DeckDuplicate { name: String },
}

impl ServiceError {
    /// Stable machine-readable classification
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Unauthorized => "unauthorized",
            ServiceError::InvalidInput(_) => "invalid_input",
            ServiceError::NotFoundUpstream { .. } => "not_found",
            ServiceError::UpstreamUnavailable { .. } => "upstream_unavailable",
            ServiceError::DeckFull { .. } => "deck_full",
            ServiceError::DeckDuplicate { .. } => "deck_duplicate",
        }
    }

    /// HTTP status code for this error
    ///
    /// Upstream failures report 404 like genuine misses; the relay only
    /// distinguishes them by the absence of a suggestion.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Unauthorized => 401,
            ServiceError::InvalidInput(_) => 400,
            ServiceError::NotFoundUpstream { .. } => 404,
            ServiceError::UpstreamUnavailable { .. } => 404,
            ServiceError::DeckFull { .. } => 400,
            ServiceError::DeckDuplicate { .. } => 400,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
