//! Provider configuration types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Result, SkaldError};

/// Immutable per-request snapshot of the active provider settings.
///
/// Owned by configuration, read-only to the pipeline. The provider id is
/// kept as a raw string so an unrecognized value surfaces as
/// [`SkaldError::UnknownProvider`] at dispatch time rather than at load
/// time — hosts may edit their config while the engine is running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key: String::new(),
            max_tokens: 1000,
            temperature: 0.7,
            timeout_ms: 30_000,
        }
    }
}

impl ProviderConfig {
    /// Resolve the provider id to a known kind.
    pub fn kind(&self) -> Result<ProviderKind> {
        self.provider.parse()
    }
}

/// The fixed set of supported text-generation services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Ollama,
}

impl FromStr for ProviderKind {
    type Err = SkaldError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "ollama" => Ok(ProviderKind::Ollama),
            other => Err(SkaldError::UnknownProvider(other.to_string())),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Ollama => "ollama",
        };
        f.write_str(name)
    }
}
