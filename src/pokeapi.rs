// 🌐 PokeAPI Client - outbound calls to the external catalog and detail endpoints
// One request per call, no retries; timeouts come from the reqwest client

use crate::error::UpstreamError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

// ============================================================================
// RECORDS
// ============================================================================

/// Canonical name plus image reference for one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub name: String,

    /// Front sprite URL; many alternate forms have none
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogPage {
    #[serde(default)]
    results: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PokemonDetail {
    name: String,
    #[serde(default)]
    sprites: Option<Sprites>,
}

#[derive(Debug, Deserialize)]
struct Sprites {
    #[serde(default)]
    front_default: Option<String>,
}

impl From<PokemonDetail> for EntityRecord {
    fn from(detail: PokemonDetail) -> Self {
        EntityRecord {
            name: detail.name,
            image: detail.sprites.and_then(|s| s.front_default),
        }
    }
}

// ============================================================================
// SOURCE SEAM
// ============================================================================

/// Anything that can list known names and resolve one name to a record
#[async_trait]
pub trait PokedexSource: Send + Sync {
    /// Fetch up to `limit` known names, in catalog order
    async fn fetch_names(&self, limit: usize) -> Result<Vec<String>, UpstreamError>;

    /// Fetch the detail record for an already-normalized name
    async fn fetch_entity(&self, name: &str) -> Result<EntityRecord, UpstreamError>;
}

// ============================================================================
// REQWEST IMPLEMENTATION
// ============================================================================

pub struct PokeApiClient {
    http: Client,
    base_url: String,
}

impl PokeApiClient {
    /// Create a client against `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(PokeApiClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, UpstreamError> {
        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| UpstreamError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(UpstreamError::NotFound);
        }
        if !status.is_success() {
            return Err(UpstreamError::Unavailable(format!("status {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| UpstreamError::Unavailable(format!("bad body: {}", e)))
    }
}

#[async_trait]
impl PokedexSource for PokeApiClient {
    async fn fetch_names(&self, limit: usize) -> Result<Vec<String>, UpstreamError> {
        let url = format!("{}/pokemon?limit={}", self.base_url, limit);
        let page: CatalogPage = self.get_json(&url).await?;

        Ok(page
            .results
            .into_iter()
            .take(limit)
            .map(|entry| entry.name)
            .collect())
    }

    async fn fetch_entity(&self, name: &str) -> Result<EntityRecord, UpstreamError> {
        let url = format!("{}/pokemon/{}", self.base_url, urlencoding::encode(name));
        let detail: PokemonDetail = self.get_json(&url).await?;
        Ok(detail.into())
    }
}

// ============================================================================
// TESTS
// ============================================================================
