//! Tests for configuration loading — TOML reader and [`Settings`]
//! snapshots.

use std::io::Write;

use skald::config::{ConfigReader, Settings, TomlConfig};
use skald::SkaldError;

const SAMPLE: &str = r#"
provider = "anthropic"
endpoint = "https://api.anthropic.com"
model = "claude-3-haiku"
api_key = "sk-ant-test"
max_tokens = 512
temperature = 0.2

[performance]
timeout_ms = 8000
cache_max_size = 50
cache_enabled = false
debounce_ms = 500
max_input_chars = 80

[clipboard]
trigger_pattern = "zz"
max_length = 200
"#;

#[test]
fn settings_snapshot_reads_every_tunable() {
    let config = TomlConfig::from_str(SAMPLE).unwrap();
    let settings = Settings::from_reader(&config);

    assert_eq!(settings.provider.provider, "anthropic");
    assert_eq!(settings.provider.model, "claude-3-haiku");
    assert_eq!(settings.provider.api_key, "sk-ant-test");
    assert_eq!(settings.provider.max_tokens, 512);
    assert_eq!(settings.provider.temperature, 0.2);
    assert_eq!(settings.provider.timeout_ms, 8_000);

    assert_eq!(settings.cache.max_entries, 50);
    assert!(!settings.cache.enabled);

    assert_eq!(settings.engine.trigger_pattern, "zz");
    assert_eq!(settings.engine.trigger_max_length, 200);
    assert_eq!(settings.engine.max_input_chars, 80);
    assert_eq!(settings.engine.debounce_ms, 500);
    assert_eq!(settings.engine.history_limit, 5);
}

#[test]
fn empty_document_yields_documented_defaults() {
    let config = TomlConfig::from_str("").unwrap();
    let settings = Settings::from_reader(&config);

    assert_eq!(settings.provider.provider, "openai");
    assert_eq!(settings.provider.model, "gpt-3.5-turbo");
    assert_eq!(settings.provider.timeout_ms, 30_000);
    assert_eq!(settings.cache.max_entries, 100);
    assert!(settings.cache.enabled);
    assert_eq!(settings.engine.trigger_pattern, "cb");
    assert_eq!(settings.engine.debounce_ms, 300);
    assert_eq!(settings.engine.max_input_chars, 100);
    assert!(settings.engine.enabled);
}

#[test]
fn settings_load_from_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();

    let config = TomlConfig::from_path(file.path()).unwrap();
    assert_eq!(config.get_str("clipboard.trigger_pattern", "cb"), "zz");
}

#[test]
fn missing_file_is_a_configuration_error() {
    let err = TomlConfig::from_path(std::path::Path::new("/nonexistent/skald.toml")).unwrap_err();
    assert!(matches!(err, SkaldError::Configuration(_)));
}
