// Pokedeck - API Server
// Loads the catalog once, then serves the lookup and deck routes

use anyhow::{Context, Result};
use pokedeck::{build_router, AppState, CatalogCache, CatalogState, Config, PokeApiClient};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pokedeck=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!(version = pokedeck::VERSION, upstream = %config.pokeapi_base_url, "starting pokedeck server");

    let client = Arc::new(PokeApiClient::new(
        config.pokeapi_base_url.clone(),
        config.http_timeout,
    )?);

    // Catalog must be settled before the first request is accepted
    let catalog = Arc::new(CatalogCache::new(config.catalog_limit));
    if catalog.initialize(client.as_ref()).await == CatalogState::LoadFailed {
        tracing::warn!("serving without suggestions");
    }

    let state = AppState::from_parts(config.api_key.clone(), client, catalog);
    let app = build_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .await
        .context("Server terminated")?;

    Ok(())
}
