//! Input context types captured from the host composition stream.

use serde::{Deserialize, Serialize};

/// Coarse input mode derived from the active schema id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    Zh,
    En,
}

impl InputMode {
    /// Derive the mode from a schema identifier by substring matching.
    ///
    /// Defaults to [`InputMode::Zh`] when the id is ambiguous.
    pub fn from_schema(schema_id: &str) -> Self {
        let id = schema_id.to_ascii_lowercase();
        let latin = id.contains("english")
            || id.contains("ascii")
            || id.contains("latin")
            || id.split('_').any(|segment| segment == "en");
        if latin { InputMode::En } else { InputMode::Zh }
    }
}

impl Default for InputMode {
    fn default() -> Self {
        InputMode::Zh
    }
}

/// A composition-update event delivered by the host.
#[derive(Debug, Clone, Default)]
pub struct CompositionUpdate {
    /// Characters appended since the previous update.
    pub inserted: String,
    pub cursor_position: usize,
    pub selection_start: usize,
    pub selection_end: usize,
    pub surrounding_text: Option<String>,
}

/// Immutable snapshot of a committed composition.
///
/// Created on each committed input event and appended to the engine's
/// bounded rolling history; never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    pub composed_text: String,
    pub cursor_position: usize,
    pub selection_start: usize,
    pub selection_end: usize,
    pub input_mode: InputMode,
    pub surrounding_text: Option<String>,
    pub schema: String,
    pub timestamp_ms: u64,
    /// Recent committed texts, oldest first, at most five entries.
    pub recent: Vec<String>,
}
