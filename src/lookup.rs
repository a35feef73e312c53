// 🔎 Entity Lookup - resolve a name upstream, suggest on a genuine miss
// Transient upstream failures never trigger a suggestion

use crate::catalog::CatalogCache;
use crate::error::{ServiceError, UpstreamError};
use crate::matcher;
use crate::pokeapi::{EntityRecord, PokedexSource};
use serde::Serialize;
use std::sync::Arc;

// ============================================================================
// OUTCOMES
// ============================================================================

/// Produced when a lookup misses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionOutcome {
    pub queried: String,

    /// Closest catalog name, if any cleared the matcher threshold
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(EntityRecord),
    NotFound {
        /// `NotFoundUpstream` or `UpstreamUnavailable`
        error: ServiceError,
        suggestion: SuggestionOutcome,
    },
}

impl LookupOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, LookupOutcome::Found(_))
    }
}

// ============================================================================
// ENTITY LOOKUP
// ============================================================================

#[derive(Clone)]
pub struct EntityLookup {
    source: Arc<dyn PokedexSource>,
    catalog: Arc<CatalogCache>,
}

impl EntityLookup {
    pub fn new(source: Arc<dyn PokedexSource>, catalog: Arc<CatalogCache>) -> Self {
        EntityLookup { source, catalog }
    }

    pub fn catalog(&self) -> &Arc<CatalogCache> {
        &self.catalog
    }

    /// Look up `name` (lowercased). Empty input is rejected before any
    /// outbound call.
    pub async fn find(&self, name: &str) -> Result<LookupOutcome, ServiceError> {
        let normalized = name.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ServiceError::InvalidInput(
                "Missing \"name\" query parameter".to_string(),
            ));
        }

        match self.source.fetch_entity(&normalized).await {
            Ok(record) => Ok(LookupOutcome::Found(record)),
            Err(UpstreamError::NotFound) => {
                let catalog = self.catalog.snapshot();
                let suggestion = matcher::suggest(&normalized, &catalog);
                tracing::info!(
                    queried = %normalized,
                    suggestion = suggestion.as_deref().unwrap_or("-"),
                    "lookup miss"
                );

                Ok(LookupOutcome::NotFound {
                    error: ServiceError::NotFoundUpstream {
                        queried: normalized.clone(),
                    },
                    suggestion: SuggestionOutcome {
                        queried: normalized,
                        suggestion,
                    },
                })
            }
            Err(UpstreamError::Unavailable(reason)) => {
                tracing::warn!(queried = %normalized, %reason, "detail endpoint unavailable");

                Ok(LookupOutcome::NotFound {
                    error: ServiceError::UpstreamUnavailable {
                        queried: normalized.clone(),
                    },
                    suggestion: SuggestionOutcome {
                        queried: normalized,
                        suggestion: None,
                    },
                })
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Knows a fixed set of names; anything else is a 404, "offline" is a 5xx
    struct FakeSource {
        known: Vec<&'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PokedexSource for FakeSource {
        async fn fetch_names(&self, _limit: usize) -> Result<Vec<String>, UpstreamError> {
            Ok(self.known.iter().map(|n| n.to_string()).collect())
        }

        async fn fetch_entity(&self, name: &str) -> Result<EntityRecord, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if name == "offline" {
                return Err(UpstreamError::Unavailable("status 503".into()));
            }
            if self.known.iter().any(|k| *k == name) {
                Ok(EntityRecord {
                    name: name.to_string(),
                    image: Some(format!("https://img/{}.png", name)),
                })
            } else {
                Err(UpstreamError::NotFound)
            }
        }
    }

    fn lookup_with(catalog: Vec<&str>) -> (EntityLookup, Arc<FakeSource>) {
        let source = Arc::new(FakeSource {
            known: vec!["pikachu", "raichu", "bulbasaur"],
            calls: AtomicUsize::new(0),
        });
        let catalog = CatalogCache::with_names(catalog.into_iter().map(String::from).collect());
        (
            EntityLookup::new(source.clone(), Arc::new(catalog)),
            source,
        )
    }

    #[tokio::test]
    async fn test_found_normalizes_name() {
        let (lookup, _) = lookup_with(vec![]);
        let outcome = lookup.find("PikaChu").await.unwrap();

        assert_eq!(
            outcome,
            LookupOutcome::Found(EntityRecord {
                name: "pikachu".to_string(),
                image: Some("https://img/pikachu.png".to_string()),
            })
        );
    }

    #[tokio::test]
    async fn test_miss_with_suggestion() {
        let (lookup, _) = lookup_with(vec!["pikachu", "raichu", "bulbasaur"]);

        match lookup.find("pikuchu").await.unwrap() {
            LookupOutcome::NotFound { error, suggestion } => {
                assert_eq!(error.kind(), "not_found");
                assert_eq!(suggestion.queried, "pikuchu");
                assert_eq!(suggestion.suggestion, Some("pikachu".to_string()));
            }
            other => panic!("expected miss, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_miss_with_empty_catalog_has_no_suggestion() {
        let (lookup, _) = lookup_with(vec![]);

        match lookup.find("pikuchu").await.unwrap() {
            LookupOutcome::NotFound { suggestion, .. } => assert_eq!(suggestion.suggestion, None),
            other => panic!("expected miss, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_miss_far_from_catalog_has_no_suggestion() {
        let (lookup, _) = lookup_with(vec!["pikachu", "raichu", "bulbasaur"]);

        match lookup.find("nonexistent-entity-xyz").await.unwrap() {
            LookupOutcome::NotFound { suggestion, .. } => assert_eq!(suggestion.suggestion, None),
            other => panic!("expected miss, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unavailable_skips_suggestion() {
        // Catalog holds near-matches, none may be offered
        let (lookup, _) = lookup_with(vec!["offline-mon", "offlin"]);

        match lookup.find("offline").await.unwrap() {
            LookupOutcome::NotFound { error, suggestion } => {
                assert_eq!(error.kind(), "upstream_unavailable");
                assert_eq!(suggestion.suggestion, None);
            }
            other => panic!("expected miss, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_name_rejected_without_outbound_call() {
        let (lookup, source) = lookup_with(vec!["pikachu"]);

        let err = lookup.find("   ").await.unwrap_err();

        assert_eq!(err.kind(), "invalid_input");
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }
}
