// 💬 Chat Relay - slash-command and button handling on top of the HTTP API
// Talks to the service only over HTTP; never touches the deck directly

use crate::api::{AddResponse, DeckResponse, ErrorBody, LookupResponse, NotFoundBody};
use crate::blocks::{
    deck_blocks, display_name, found_blocks, Block, ACTION_ADD, ACTION_SUGGESTED_NO,
    ACTION_SUGGESTED_YES,
};
use crate::config::API_KEY_HEADER;
use futures::future::join_all;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

pub const USAGE: &str = "Command error: use `/jerry search <pokemon name>` to search for a Pokémon or `/jerry deck` to view your current deck.";

// ============================================================================
// COMMANDS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search(String),
    Deck,
    Add(String),
    Unknown,
}

/// Parse slash-command text such as `search mr mime` or `deck`
pub fn parse_command(text: &str) -> Command {
    let mut words = text.split_whitespace();
    let verb = words.next().unwrap_or("");
    let rest = words.collect::<Vec<_>>().join(" ");

    match verb {
        "search" => Command::Search(rest),
        "deck" => Command::Deck,
        "add" if !rest.is_empty() => Command::Add(rest),
        _ => Command::Unknown,
    }
}

// ============================================================================
// MESSAGES
// ============================================================================

/// What gets posted back to the channel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelayMessage {
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
}

impl RelayMessage {
    pub fn text(text: impl Into<String>) -> Self {
        RelayMessage {
            text: text.into(),
            blocks: Vec::new(),
        }
    }
}

fn found_message(found: &LookupResponse) -> RelayMessage {
    RelayMessage {
        text: format!("Pokémon found: {}", display_name(&found.name)),
        blocks: found_blocks(&found.name, found.image.as_deref()),
    }
}

fn joined_display_names(list: &[String]) -> String {
    list.iter()
        .map(|n| display_name(n))
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// RELAY CLIENT
// ============================================================================

pub struct Relay {
    http: Client,
    base_url: String,
    api_key: String,
}

impl Relay {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Relay {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Answer a slash command
    pub async fn handle_command(&self, text: &str) -> RelayMessage {
        match parse_command(text) {
            Command::Search(name) => self.search(&name).await,
            Command::Deck => self.show_deck().await,
            Command::Add(name) => self.add(&name).await,
            Command::Unknown => RelayMessage::text(USAGE),
        }
    }

    /// Answer a button press
    pub async fn handle_action(&self, action_id: &str, value: &str) -> RelayMessage {
        match action_id {
            ACTION_ADD => self.add(value).await,
            ACTION_SUGGESTED_YES => match self.lookup(value).await {
                Ok(Ok(found)) => found_message(&found),
                _ => RelayMessage::text("Error fetching suggested Pokémon."),
            },
            ACTION_SUGGESTED_NO => RelayMessage::text("No Pokémon selected."),
            other => {
                tracing::warn!(action_id = other, "unknown relay action");
                RelayMessage::text(format!("Unknown action: {}", other))
            }
        }
    }

    async fn search(&self, name: &str) -> RelayMessage {
        match self.lookup(name).await {
            Ok(Ok(found)) => found_message(&found),
            Ok(Err(miss)) => match miss.blocks {
                Some(blocks) => RelayMessage {
                    text: miss.error,
                    blocks,
                },
                None => RelayMessage::text(miss.error),
            },
            Err(e) => {
                tracing::warn!(error = %e, "search failed");
                RelayMessage::text("Error fetching Pokémon data.")
            }
        }
    }

    async fn show_deck(&self) -> RelayMessage {
        let list = match self.deck().await {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(error = %e, "deck fetch failed");
                return RelayMessage::text("Error fetching your deck.");
            }
        };

        if list.is_empty() {
            return RelayMessage::text("Your deck is empty.");
        }

        // Image lookups fan out; join_all keeps deck order
        let images = join_all(list.iter().map(|name| async move {
            match self.lookup(name).await {
                Ok(Ok(found)) => found.image,
                _ => None,
            }
        }))
        .await;
        let entries: Vec<(String, Option<String>)> = list.iter().cloned().zip(images).collect();

        RelayMessage {
            text: format!("Your current deck: {}", joined_display_names(&list)),
            blocks: deck_blocks(&entries),
        }
    }

    async fn add(&self, name: &str) -> RelayMessage {
        let name = name.to_lowercase();
        let result = self
            .http
            .post(format!("{}/pokemon", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await;

        let response = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "add request failed");
                return RelayMessage::text("Cannot add to deck.");
            }
        };

        if response.status().is_success() {
            return match response.json::<AddResponse>().await {
                Ok(added) => RelayMessage::text(format!(
                    "Pokémon '{}' added to your deck!\nCurrent deck: {}",
                    display_name(&name),
                    joined_display_names(&added.list)
                )),
                Err(_) => RelayMessage::text("Cannot add to deck."),
            };
        }

        match response.json::<ErrorBody>().await {
            Ok(body) => RelayMessage::text(body.error),
            Err(_) => RelayMessage::text("Cannot add to deck."),
        }
    }

    /// Outer error: transport or unexpected status. Inner error: a 404 body.
    async fn lookup(&self, name: &str) -> anyhow::Result<Result<LookupResponse, NotFoundBody>> {
        let response = self
            .http
            .get(format!(
                "{}/pokemon?name={}",
                self.base_url,
                urlencoding::encode(name)
            ))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(Ok(response.json().await?)),
            StatusCode::NOT_FOUND => Ok(Err(response.json().await?)),
            status => anyhow::bail!("lookup returned {}", status),
        }
    }

    async fn deck(&self) -> anyhow::Result<Vec<String>> {
        let response = self
            .http
            .get(format!("{}/pokemon/deck", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?
            .error_for_status()?;

        let deck: DeckResponse = response.json().await?;
        Ok(deck.list)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{build_router, AppState};
    use crate::blocks::suggestion_blocks;
    use crate::catalog::CatalogCache;
    use crate::error::UpstreamError;
    use crate::pokeapi::{EntityRecord, PokedexSource};
    use async_trait::async_trait;
    use std::sync::Arc;

    const KEY: &str = "relay-secret";

    /// Pikachu and Bulbasaur have sprites, Missingno does not
    struct FakeDex;

    #[async_trait]
    impl PokedexSource for FakeDex {
        async fn fetch_names(&self, _limit: usize) -> Result<Vec<String>, UpstreamError> {
            Ok(vec!["pikachu".into(), "bulbasaur".into(), "missingno".into()])
        }

        async fn fetch_entity(&self, name: &str) -> Result<EntityRecord, UpstreamError> {
            match name {
                "pikachu" | "bulbasaur" => Ok(EntityRecord {
                    name: name.to_string(),
                    image: Some(format!("https://sprites.test/{}.png", name)),
                }),
                "missingno" => Ok(EntityRecord {
                    name: name.to_string(),
                    image: None,
                }),
                _ => Err(UpstreamError::NotFound),
            }
        }
    }

    /// Serve the real router on an ephemeral port and point a relay at it
    async fn live_relay() -> Relay {
        let source = Arc::new(FakeDex);
        let catalog = Arc::new(CatalogCache::default());
        catalog.initialize(source.as_ref()).await;
        let app = build_router(AppState::from_parts(KEY, source, catalog));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Relay::new(format!("http://{}", addr), KEY).unwrap()
    }

    #[test]
    fn test_parse_search_joins_words() {
        assert_eq!(
            parse_command("  search   mr   mime "),
            Command::Search("mr mime".to_string())
        );
    }

    #[test]
    fn test_parse_deck_and_add() {
        assert_eq!(parse_command("deck"), Command::Deck);
        assert_eq!(parse_command("add Eevee"), Command::Add("Eevee".to_string()));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse_command(""), Command::Unknown);
        assert_eq!(parse_command("catch pikachu"), Command::Unknown);
        assert_eq!(parse_command("add"), Command::Unknown);
    }

    #[test]
    fn test_found_message() {
        let message = found_message(&LookupResponse {
            name: "eevee".to_string(),
            image: None,
        });
        assert_eq!(message.text, "Pokémon found: Eevee");
        assert_eq!(message.blocks.len(), 2);
    }

    #[test]
    fn test_joined_display_names() {
        let list = vec!["bulbasaur".to_string(), "mew".to_string()];
        assert_eq!(joined_display_names(&list), "Bulbasaur, Mew");
    }

    #[tokio::test]
    async fn test_unknown_command_needs_no_server() {
        let relay = Relay::new("http://127.0.0.1:9", "k").unwrap();
        assert_eq!(relay.handle_command("help").await, RelayMessage::text(USAGE));
        assert_eq!(
            relay.handle_action(ACTION_SUGGESTED_NO, "pikuchu").await.text,
            "No Pokémon selected."
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_falls_back() {
        let relay = Relay::new("http://127.0.0.1:9", "k").unwrap();
        assert_eq!(
            relay.handle_command("search pikachu").await.text,
            "Error fetching Pokémon data."
        );
        assert_eq!(relay.handle_command("deck").await.text, "Error fetching your deck.");
        assert_eq!(relay.handle_command("add pikachu").await.text, "Cannot add to deck.");
    }

    #[tokio::test]
    async fn test_search_found_renders_card() {
        let relay = live_relay().await;

        let message = relay.handle_command("search Pikachu").await;

        assert_eq!(message.text, "Pokémon found: Pikachu");
        assert_eq!(
            message.blocks,
            found_blocks("pikachu", Some("https://sprites.test/pikachu.png"))
        );
    }

    #[tokio::test]
    async fn test_search_miss_passes_suggestion_blocks_through() {
        let relay = live_relay().await;

        let message = relay.handle_command("search pikuchu").await;

        assert_eq!(message.text, "Pokémon \"pikuchu\" not found.");
        assert_eq!(message.blocks, suggestion_blocks("pikuchu", "pikachu"));
    }

    #[tokio::test]
    async fn test_search_far_miss_is_plain_text() {
        let relay = live_relay().await;

        let message = relay.handle_command("search zzzzzzzzzzzzzzzzzzzz").await;

        assert_eq!(message.text, "Pokémon \"zzzzzzzzzzzzzzzzzzzz\" not found");
        assert!(message.blocks.is_empty());
    }

    #[tokio::test]
    async fn test_suggested_yes_looks_up_again() {
        let relay = live_relay().await;

        let message = relay.handle_action(ACTION_SUGGESTED_YES, "pikachu").await;

        assert_eq!(message.text, "Pokémon found: Pikachu");
        assert_eq!(message.blocks.len(), 3);
    }

    #[tokio::test]
    async fn test_add_then_show_deck() {
        let relay = live_relay().await;

        assert_eq!(relay.handle_command("deck").await, RelayMessage::text("Your deck is empty."));

        relay.handle_action(ACTION_ADD, "pikachu").await;
        let added = relay.handle_command("add Missingno").await;
        assert_eq!(
            added.text,
            "Pokémon 'Missingno' added to your deck!\nCurrent deck: Pikachu, Missingno"
        );

        let deck = relay.handle_command("deck").await;
        assert_eq!(deck.text, "Your current deck: Pikachu, Missingno");
        assert_eq!(
            deck.blocks,
            deck_blocks(&[
                (
                    "pikachu".to_string(),
                    Some("https://sprites.test/pikachu.png".to_string())
                ),
                ("missingno".to_string(), None),
            ])
        );
    }

    #[tokio::test]
    async fn test_add_duplicate_surfaces_server_message() {
        let relay = live_relay().await;

        relay.handle_command("add bulbasaur").await;
        let message = relay.handle_action(ACTION_ADD, "Bulbasaur").await;

        assert_eq!(message.text, "Pokémon 'bulbasaur' is already in your deck.");
    }
}
