//! Connection settings for an Insights server

use crate::types::SourceId;
use serde::{Deserialize, Deserializer, Serialize};

/// Indicates how to connect and authenticate to an Insights server.
///
/// All three fields are required; there are no defaults.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the server API (e.g., "https://example.elimity.com/api")
    #[serde(alias = "baseUrl")]
    pub base_url: String,
    /// Identifier of the custom source to import into
    #[serde(alias = "sourceId")]
    pub source_id: SourceId,
    /// Token of the custom source
    #[serde(alias = "sourceToken", deserialize_with = "token_text")]
    pub source_token: String,
}

impl Config {
    pub fn new(base_url: impl Into<String>, source_id: u64, source_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            source_id: SourceId::new(source_id),
            source_token: source_token.into(),
        }
    }
}

/// Tokens are text, but configuration formats may type an all-digit token as a number
fn token_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Token {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(match Token::deserialize(deserializer)? {
        Token::Text(text) => text,
        Token::Unsigned(n) => n.to_string(),
        Token::Signed(n) => n.to_string(),
    })
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("source_id", &self.source_id)
            .field("source_token", &"<redacted>")
            .finish()
    }
}
