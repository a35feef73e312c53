// ⚙️ Configuration - environment variables, optionally seeded from .env

use crate::catalog::DEFAULT_CATALOG_LIMIT;
use crate::pokeapi::DEFAULT_BASE_URL;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::time::Duration;

pub const API_KEY_HEADER: &str = "x-api-key";

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret expected in the `x-api-key` header
    pub api_key: String,

    /// Listen address, e.g. 0.0.0.0
    pub bind_addr: String,

    pub port: u16,

    /// PokeAPI root, without trailing slash
    pub pokeapi_base_url: String,

    /// Hard cap on names fetched for suggestions
    pub catalog_limit: usize,

    /// Outbound request timeout
    pub http_timeout: Duration,
}

impl Config {
    /// Load from the process environment, reading `.env` first if present
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Load from an explicit variable map
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let api_key = vars
            .get("MY_API_KEY")
            .filter(|v| !v.is_empty())
            .cloned()
            .context("MY_API_KEY environment variable not set")?;

        let port = parse_or(vars, "PORT", DEFAULT_PORT)?;
        let catalog_limit = parse_or(vars, "CATALOG_LIMIT", DEFAULT_CATALOG_LIMIT)?;
        let timeout_secs = parse_or(vars, "HTTP_TIMEOUT_SECS", 10u64)?;

        Ok(Config {
            api_key,
            bind_addr: vars
                .get("BIND_ADDR")
                .cloned()
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            pokeapi_base_url: vars
                .get("POKEAPI_BASE_URL")
                .cloned()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            catalog_limit,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

/// Base URL for the relay CLI: `POKEDECK_URL`, else localhost on `PORT`
pub fn relay_url(vars: &HashMap<String, String>) -> Result<String> {
    if let Some(url) = vars.get("POKEDECK_URL").filter(|v| !v.trim().is_empty()) {
        return Ok(url.trim().to_string());
    }

    let port = parse_or(vars, "PORT", DEFAULT_PORT)?;
    Ok(format!("http://localhost:{}", port))
}

fn parse_or<T>(vars: &HashMap<String, String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match vars.get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

// ============================================================================
// TESTS
// ============================================================================
