// 🔌 API Surface - HTTP routes behind the shared-secret gate
// Every failure becomes a JSON {error} body; nothing here can take the listener down

use crate::blocks::{suggestion_blocks, Block};
use crate::catalog::CatalogCache;
use crate::config::API_KEY_HEADER;
use crate::deck::DeckStore;
use crate::error::ServiceError;
use crate::lookup::{EntityLookup, LookupOutcome};
use crate::pokeapi::PokedexSource;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, Request, State,
    },
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    pub lookup: EntityLookup,
    pub deck: Arc<DeckStore>,
}

impl AppState {
    pub fn new(api_key: impl Into<String>, lookup: EntityLookup, deck: Arc<DeckStore>) -> Self {
        AppState {
            api_key: Arc::from(api_key.into()),
            lookup,
            deck,
        }
    }

    /// Wire a fresh empty deck around `source` and `catalog`
    pub fn from_parts(
        api_key: impl Into<String>,
        source: Arc<dyn PokedexSource>,
        catalog: Arc<CatalogCache>,
    ) -> Self {
        Self::new(
            api_key,
            EntityLookup::new(source, catalog),
            Arc::new(DeckStore::new()),
        )
    }
}

// ============================================================================
// REQUEST / RESPONSE BODIES
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddRequest {
    name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// 404 body; suggestion and blocks only appear together
#[derive(Debug, Serialize, Deserialize)]
pub struct NotFoundBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub blocks: Option<Vec<Block>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LookupResponse {
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeckResponse {
    pub list: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddResponse {
    pub message: String,
    pub list: Vec<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    catalog: &'static str,
    catalog_size: usize,
    deck_size: usize,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(err: ServiceError) -> ApiError {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

// ============================================================================
// AUTH GATE
// ============================================================================

/// Reject before any extractor touches the body
async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(API_KEY_HEADER)
        .is_some_and(|key| key.as_bytes() == state.api_key.as_bytes());

    if !authorized {
        tracing::warn!(path = %request.uri().path(), "rejected request without valid api key");
        return api_error(ServiceError::Unauthorized).into_response();
    }

    next.run(request).await
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /pokemon?name=X - look up one entity
async fn get_pokemon(
    State(state): State<AppState>,
    query: Result<Query<NameQuery>, QueryRejection>,
) -> Response {
    // An undecodable query string counts as a missing name
    let name = query
        .ok()
        .and_then(|Query(q)| q.name)
        .unwrap_or_default();

    match state.lookup.find(&name).await {
        Ok(LookupOutcome::Found(record)) => (
            StatusCode::OK,
            Json(LookupResponse {
                name: record.name,
                image: record.image,
            }),
        )
            .into_response(),
        Ok(LookupOutcome::NotFound { error, suggestion }) => {
            let body = match suggestion.suggestion {
                Some(suggested) => NotFoundBody {
                    error: format!("Pokémon \"{}\" not found.", suggestion.queried),
                    blocks: Some(suggestion_blocks(&suggestion.queried, &suggested)),
                    suggestion: Some(suggested),
                },
                None => NotFoundBody {
                    error: error.to_string(),
                    suggestion: None,
                    blocks: None,
                },
            };
            (StatusCode::NOT_FOUND, Json(body)).into_response()
        }
        Err(err) => api_error(err).into_response(),
    }
}

/// GET /pokemon/deck - current deck
async fn get_deck(State(state): State<AppState>) -> Json<DeckResponse> {
    Json(DeckResponse {
        list: state.deck.list(),
    })
}

/// POST /pokemon {name} - add to the deck
async fn add_to_deck(
    State(state): State<AppState>,
    body: Result<Json<AddRequest>, JsonRejection>,
) -> Result<Json<AddResponse>, ApiError> {
    let raw = body
        .ok()
        .and_then(|Json(req)| req.name)
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| {
            api_error(ServiceError::InvalidInput(
                "Missing \"name\" in request body".to_string(),
            ))
        })?;

    let list = state
        .deck
        .append(&raw)
        .map_err(|e| api_error(e.into()))?;

    let added = raw.trim().to_lowercase();
    tracing::info!(name = %added, size = list.len(), "added to deck");

    Ok(Json(AddResponse {
        message: format!("Pokémon '{}' added.", added),
        list,
    }))
}

/// GET /health - liveness, no auth
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let catalog = state.lookup.catalog();
    Json(HealthResponse {
        status: "ok",
        catalog: catalog.state().as_str(),
        catalog_size: catalog.len(),
        deck_size: state.deck.len(),
    })
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/pokemon", get(get_pokemon).post(add_to_deck))
        .route("/pokemon/deck", get(get_deck))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    let public = Router::new().route("/health", get(health_check));

    public
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
