use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config field `{0}` must not be empty")]
    Empty(&'static str),

    #[error("card class `{0}` must be a single non-empty token")]
    InvalidClass(String),

    #[error("element id `{0}` is used for more than one element")]
    DuplicateId(String),
}

/// How a single message card is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardStyle {
    pub tag: String,
    pub classes: Vec<String>,
    /// Attribute that carries the card's position in the list.
    pub index_attribute: String,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            tag: "div".to_string(),
            classes: ["text-bg-primary", "p-3", "mb-3", "rounded", "w-75"]
                .into_iter()
                .map(String::from)
                .collect(),
            index_attribute: "data-message".to_string(),
        }
    }
}

/// Element ids the page must provide, plus card styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_id: String,
    pub button_id: String,
    pub output_id: String,
    /// Event on the trigger element that submits the input.
    pub submit_event: String,
    pub card: CardStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_id: "input".to_string(),
            button_id: "button".to_string(),
            output_id: "messages".to_string(),
            submit_event: "click".to_string(),
            card: CardStyle::default(),
        }
    }
}

impl Config {
    /// Parse a config, filling missing fields with defaults, and validate it.
    pub fn from_json(json: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("input_id", &self.input_id),
            ("button_id", &self.button_id),
            ("output_id", &self.output_id),
            ("submit_event", &self.submit_event),
            ("card.tag", &self.card.tag),
            ("card.index_attribute", &self.card.index_attribute),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(field));
            }
        }

        if let Some(bad) = self
            .card
            .classes
            .iter()
            .find(|c| c.is_empty() || c.chars().any(char::is_whitespace))
        {
            return Err(ConfigError::InvalidClass(bad.clone()));
        }

        let ids = [&self.input_id, &self.button_id, &self.output_id];
        for (i, id) in ids.iter().enumerate() {
            if ids[i + 1..].contains(id) {
                return Err(ConfigError::DuplicateId(id.to_string()));
            }
        }
        Ok(())
    }
}
