//! Configuration access.
//!
//! The pipeline reads tunables through the [`ConfigReader`] trait so hosts
//! can bridge whatever configuration store they own. [`TomlConfig`] is the
//! bundled implementation for standalone use (the CLI, tests), resolving
//! dotted keys like `performance.debounce_ms` against a TOML document.
//!
//! [`Settings`] is an immutable snapshot of every tunable, taken once per
//! reconfiguration; the pipeline never reads keys mid-request.

use std::fs;
use std::path::Path;

use crate::cache::{CacheConfig, DEFAULT_TTL_MS};
use crate::engine::EngineConfig;
use crate::types::ProviderConfig;
use crate::{Result, SkaldError};

/// Dotted-key configuration lookup with defaults.
pub trait ConfigReader {
    fn get_str(&self, key: &str, default: &str) -> String;
    fn get_u64(&self, key: &str, default: u64) -> u64;
    fn get_f32(&self, key: &str, default: f32) -> f32;
    fn get_bool(&self, key: &str, default: bool) -> bool;
}

/// [`ConfigReader`] backed by a parsed TOML document.
#[derive(Debug, Clone)]
pub struct TomlConfig {
    root: toml::Value,
}

impl TomlConfig {
    pub fn from_str(text: &str) -> Result<Self> {
        let root = text
            .parse::<toml::Value>()
            .map_err(|e| SkaldError::Configuration(e.to_string()))?;
        Ok(Self { root })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            SkaldError::Configuration(format!("{}: {e}", path.display()))
        })?;
        Self::from_str(&text)
    }

    fn lookup(&self, key: &str) -> Option<&toml::Value> {
        key.split('.')
            .try_fold(&self.root, |value, segment| value.get(segment))
    }
}

impl ConfigReader for TomlConfig {
    fn get_str(&self, key: &str, default: &str) -> String {
        self.lookup(key)
            .and_then(toml::Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    fn get_u64(&self, key: &str, default: u64) -> u64 {
        self.lookup(key)
            .and_then(toml::Value::as_integer)
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(default)
    }

    fn get_f32(&self, key: &str, default: f32) -> f32 {
        match self.lookup(key) {
            Some(toml::Value::Float(f)) => *f as f32,
            Some(toml::Value::Integer(i)) => *i as f32,
            _ => default,
        }
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.lookup(key)
            .and_then(toml::Value::as_bool)
            .unwrap_or(default)
    }
}

/// Snapshot of all tunables.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub provider: ProviderConfig,
    pub cache: CacheConfig,
    pub engine: EngineConfig,
}

impl Settings {
    /// Read every tunable once, applying documented defaults for absent
    /// keys.
    pub fn from_reader(reader: &dyn ConfigReader) -> Self {
        let provider = ProviderConfig {
            provider: reader.get_str("provider", "openai"),
            endpoint: reader.get_str("endpoint", "https://api.openai.com/v1"),
            model: reader.get_str("model", "gpt-3.5-turbo"),
            api_key: reader.get_str("api_key", ""),
            max_tokens: reader.get_u64("max_tokens", 1000) as u32,
            temperature: reader.get_f32("temperature", 0.7),
            timeout_ms: reader.get_u64("performance.timeout_ms", 30_000),
        };
        let cache = CacheConfig {
            max_entries: reader.get_u64("performance.cache_max_size", 100) as usize,
            ttl_ms: DEFAULT_TTL_MS,
            enabled: reader.get_bool("performance.cache_enabled", true),
        };
        let engine = EngineConfig {
            enabled: reader.get_bool("enabled", true),
            trigger_pattern: reader.get_str("clipboard.trigger_pattern", "cb"),
            trigger_max_length: reader.get_u64("clipboard.max_length", 1000) as usize,
            max_input_chars: reader.get_u64("performance.max_input_chars", 100) as usize,
            debounce_ms: reader.get_u64("performance.debounce_ms", 300),
            history_limit: 5,
        };
        Self {
            provider,
            cache,
            engine,
        }
    }
}
