// 🧱 Block Kit payloads - interactive message blocks for the chat relay
// Serialized shapes match the chat platform's section/image/actions blocks

use serde::{Deserialize, Serialize};

/// Button action ids understood by the relay
pub const ACTION_ADD: &str = "add_pokemon";
pub const ACTION_SUGGESTED_YES: &str = "suggested_pokemon_yes";
pub const ACTION_SUGGESTED_NO: &str = "suggested_pokemon_no";

// ============================================================================
// BLOCK TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Text {
    Mrkdwn { text: String },
    PlainText { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageElement {
    #[serde(rename = "type")]
    pub kind: String,
    pub image_url: String,
    pub alt_text: String,
}

impl ImageElement {
    fn new(url: &str, alt: &str) -> Self {
        ImageElement {
            kind: "image".to_string(),
            image_url: url.to_string(),
            alt_text: alt.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Text,
    pub action_id: String,
    pub value: String,
}

impl Button {
    pub fn new(label: &str, action_id: &str, value: &str) -> Self {
        Button {
            kind: "button".to_string(),
            text: Text::PlainText {
                text: label.to_string(),
            },
            action_id: action_id.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section {
        text: Text,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        accessory: Option<ImageElement>,
    },
    Image {
        image_url: String,
        alt_text: String,
    },
    Actions {
        elements: Vec<Button>,
    },
}

impl Block {
    pub fn markdown(text: impl Into<String>) -> Self {
        Block::Section {
            text: Text::Mrkdwn { text: text.into() },
            accessory: None,
        }
    }
}

// ============================================================================
// BUILDERS
// ============================================================================

/// "pikachu" → "Pikachu"
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "Did you mean" prompt with Yes/No buttons
pub fn suggestion_blocks(queried: &str, suggestion: &str) -> Vec<Block> {
    vec![
        Block::markdown(format!(
            "Pokémon \"{}\" not found. Did you mean *{}*?",
            queried, suggestion
        )),
        Block::Actions {
            elements: vec![
                Button::new("Yes", ACTION_SUGGESTED_YES, suggestion),
                Button::new("No", ACTION_SUGGESTED_NO, queried),
            ],
        },
    ]
}

/// Card for a found entity, with an "Add to Deck" button
pub fn found_blocks(name: &str, image: Option<&str>) -> Vec<Block> {
    let mut blocks = vec![Block::markdown(format!(
        "Pokémon found: *{}*",
        display_name(name)
    ))];

    if let Some(url) = image {
        blocks.push(Block::Image {
            image_url: url.to_string(),
            alt_text: name.to_string(),
        });
    }

    blocks.push(Block::Actions {
        elements: vec![Button::new("Add to Deck", ACTION_ADD, name)],
    });

    blocks
}

/// One section per deck entry, with a small icon when an image is known
pub fn deck_blocks(entries: &[(String, Option<String>)]) -> Vec<Block> {
    entries
        .iter()
        .map(|(name, image)| Block::Section {
            text: Text::Mrkdwn {
                text: format!("*{}*", display_name(name)),
            },
            accessory: image.as_deref().map(|url| ImageElement::new(url, name)),
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("pikachu"), "Pikachu");
        assert_eq!(display_name(""), "");
        assert_eq!(display_name("mr-mime"), "Mr-mime");
    }

    #[test]
    fn test_suggestion_blocks_shape() {
        let blocks = serde_json::to_value(suggestion_blocks("pikuchu", "pikachu")).unwrap();

        assert_eq!(
            blocks,
            json!([
                {
                    "type": "section",
                    "text": {
                        "type": "mrkdwn",
                        "text": "Pokémon \"pikuchu\" not found. Did you mean *pikachu*?"
                    }
                },
                {
                    "type": "actions",
                    "elements": [
                        {
                            "type": "button",
                            "text": { "type": "plain_text", "text": "Yes" },
                            "action_id": "suggested_pokemon_yes",
                            "value": "pikachu"
                        },
                        {
                            "type": "button",
                            "text": { "type": "plain_text", "text": "No" },
                            "action_id": "suggested_pokemon_no",
                            "value": "pikuchu"
                        }
                    ]
                }
            ])
        );
    }

    #[test]
    fn test_found_blocks_with_and_without_image() {
        let with_image = found_blocks("pikachu", Some("https://img/25.png"));
        assert_eq!(with_image.len(), 3);
        assert!(matches!(with_image[1], Block::Image { .. }));

        let without_image = found_blocks("pikachu", None);
        assert_eq!(without_image.len(), 2);
        match &without_image[1] {
            Block::Actions { elements } => {
                assert_eq!(elements[0].action_id, ACTION_ADD);
                assert_eq!(elements[0].value, "pikachu");
            }
            other => panic!("expected actions block, got {:?}", other),
        }
    }

    #[test]
    fn test_deck_blocks_accessory() {
        let entries = vec![
            ("mew".to_string(), Some("https://img/151.png".to_string())),
            ("missingno".to_string(), None),
        ];
        let value = serde_json::to_value(deck_blocks(&entries)).unwrap();

        assert_eq!(value[0]["text"]["text"], "*Mew*");
        assert_eq!(value[0]["accessory"]["image_url"], "https://img/151.png");
        assert!(value[1].get("accessory").is_none());
    }

    #[test]
    fn test_blocks_deserialize_from_api_body() {
        let raw = serde_json::to_string(&suggestion_blocks("a", "b")).unwrap();
        let parsed: Vec<Block> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, suggestion_blocks("a", "b"));
    }
}
