// 📚 Catalog Cache - process-lifetime snapshot of every known name
// Loaded once before serving; a failed load degrades to an empty catalog

use crate::pokeapi::PokedexSource;
use serde::Serialize;
use std::sync::{Arc, RwLock};

/// Hard cap on names requested from the catalog endpoint
pub const DEFAULT_CATALOG_LIMIT: usize = 2000;

// ============================================================================
// LIFECYCLE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogState {
    /// `initialize` has not run yet
    Unloaded,

    /// Names available for suggestions, with their count
    Loaded(usize),

    /// Catalog endpoint failed; snapshot is empty
    LoadFailed,
}

impl CatalogState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogState::Unloaded => "unloaded",
            CatalogState::Loaded(_) => "loaded",
            CatalogState::LoadFailed => "load_failed",
        }
    }
}

struct Inner {
    state: CatalogState,
    names: Arc<Vec<String>>,
}

// ============================================================================
// CATALOG CACHE
// ============================================================================

pub struct CatalogCache {
    inner: RwLock<Inner>,
    limit: usize,
}

impl CatalogCache {
    /// Create an unloaded cache that will request at most `limit` names
    pub fn new(limit: usize) -> Self {
        CatalogCache {
            inner: RwLock::new(Inner {
                state: CatalogState::Unloaded,
                names: Arc::new(Vec::new()),
            }),
            limit,
        }
    }

    /// Create a cache already loaded with `names`
    pub fn with_names(names: Vec<String>) -> Self {
        let cache = CatalogCache::new(DEFAULT_CATALOG_LIMIT.max(names.len()));
        cache.replace(names);
        cache
    }

    /// Fetch the catalog once. Failure leaves an empty snapshot instead of
    /// blocking startup. No retry.
    pub async fn initialize(&self, source: &dyn PokedexSource) -> CatalogState {
        match source.fetch_names(self.limit).await {
            Ok(names) => {
                tracing::info!(count = names.len(), "catalog loaded");
                self.replace(names);
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch catalog, suggestions disabled");
                self.set(CatalogState::LoadFailed, Vec::new());
            }
        }
        self.state()
    }

    /// Swap in a new name list wholesale
    pub fn replace(&self, names: Vec<String>) {
        let names: Vec<String> = names
            .into_iter()
            .take(self.limit)
            .map(|n| n.to_lowercase())
            .collect();
        let count = names.len();
        self.set(CatalogState::Loaded(count), names);
    }

    fn set(&self, state: CatalogState, names: Vec<String>) {
        let mut inner = self.inner.write().unwrap_or_else(|p| p.into_inner());
        inner.state = state;
        inner.names = Arc::new(names);
    }

    /// Shared read-only view of the current names
    pub fn snapshot(&self) -> Arc<Vec<String>> {
        let inner = self.inner.read().unwrap_or_else(|p| p.into_inner());
        Arc::clone(&inner.names)
    }

    pub fn state(&self) -> CatalogState {
        self.inner.read().unwrap_or_else(|p| p.into_inner()).state
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_LIMIT)
    }
}

// ============================================================================
// TESTS
// ============================================================================
