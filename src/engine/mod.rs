//! Context tracker and trigger detector.
//!
//! Consumes the host's composition/commit events, maintains the live
//! buffer and a bounded rolling history of committed contexts, detects
//! the configured trigger pattern, and gates suggestion requests by
//! length and debounce policy. The engine decides *whether and when* to
//! call the assist client; it never performs network work itself.

use std::collections::VecDeque;
use std::rc::Rc;

use tracing::debug;

use crate::telemetry;
use crate::transport::Clock;
use crate::types::{CompositionUpdate, InputMode, RequestContext};

/// Engine tunables, read from `clipboard.*` and `performance.*` keys.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Master toggle; when false every gate decision is `disabled`.
    pub enabled: bool,
    /// Literal substring that arms the trigger when the live buffer ends
    /// with it.
    pub trigger_pattern: String,
    /// Cap on the buffer snapshot carried by a trigger event.
    pub trigger_max_length: usize,
    /// Upper length gate for suggestion eligibility.
    pub max_input_chars: usize,
    /// Minimum elapsed time between two accepted triggers.
    pub debounce_ms: u64,
    /// Rolling history capacity.
    pub history_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            trigger_pattern: "cb".to_string(),
            trigger_max_length: 1000,
            max_input_chars: 100,
            debounce_ms: 300,
            history_limit: 5,
        }
    }
}

/// Composition lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionState {
    Idle,
    Composing,
    TriggerArmed,
}

/// Why a gate decision came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    Disabled,
    Empty,
    TooShort,
    TooLong,
    Ready,
}

impl TriggerReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerReason::Disabled => "disabled",
            TriggerReason::Empty => "empty",
            TriggerReason::TooShort => "too_short",
            TriggerReason::TooLong => "too_long",
            TriggerReason::Ready => "ready",
        }
    }
}

/// Emitted when the live buffer arms the trigger pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEvent {
    pub pattern: String,
    pub buffer: String,
}

pub struct SuggestionEngine {
    config: EngineConfig,
    clock: Rc<dyn Clock>,
    state: CompositionState,
    buffer: String,
    cursor_position: usize,
    selection_start: usize,
    selection_end: usize,
    surrounding_text: Option<String>,
    schema: String,
    input_mode: InputMode,
    history: VecDeque<RequestContext>,
    last_accepted_ms: Option<u64>,
}

impl SuggestionEngine {
    pub fn new(config: EngineConfig, clock: Rc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            state: CompositionState::Idle,
            buffer: String::new(),
            cursor_position: 0,
            selection_start: 0,
            selection_end: 0,
            surrounding_text: None,
            schema: String::new(),
            input_mode: InputMode::default(),
            history: VecDeque::new(),
            last_accepted_ms: None,
        }
    }

    pub fn state(&self) -> CompositionState {
        self.state
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    /// Committed contexts, oldest first.
    pub fn recent_contexts(&self) -> impl Iterator<Item = &RequestContext> {
        self.history.iter()
    }

    pub fn on_composition_start(&mut self) {
        self.buffer.clear();
        self.state = CompositionState::Composing;
    }

    /// Append incoming characters and evaluate the trigger pattern.
    ///
    /// Arming happens when the buffer's suffix equals the pattern. Any
    /// character appended while armed cancels the trigger outright — the
    /// state returns to `Composing` and the pending event is withdrawn,
    /// not merely re-timed.
    pub fn on_composition_update(&mut self, update: &CompositionUpdate) -> Option<TriggerEvent> {
        if self.state == CompositionState::Idle {
            self.state = CompositionState::Composing;
        }
        self.cursor_position = update.cursor_position;
        self.selection_start = update.selection_start;
        self.selection_end = update.selection_end;
        if update.surrounding_text.is_some() {
            self.surrounding_text = update.surrounding_text.clone();
        }

        let pattern = self.config.trigger_pattern.clone();
        let mut fired = None;
        for ch in update.inserted.chars() {
            if self.state == CompositionState::TriggerArmed {
                self.state = CompositionState::Composing;
                fired = None;
                self.buffer.push(ch);
                continue;
            }
            self.buffer.push(ch);
            if !pattern.is_empty() && self.buffer.ends_with(&pattern) {
                self.state = CompositionState::TriggerArmed;
                fired = Some(TriggerEvent {
                    pattern: pattern.clone(),
                    buffer: tail_chars(&self.buffer, self.config.trigger_max_length),
                });
            }
        }

        if fired.is_some() {
            metrics::counter!(telemetry::TRIGGERS_TOTAL).increment(1);
            debug!(buffer = %self.buffer, "trigger pattern armed");
        }
        fired
    }

    /// Snapshot the live buffer, append it to the rolling history, and
    /// reset to idle. Returns the context for the text to commit.
    pub fn on_composition_end(&mut self) -> RequestContext {
        let text = std::mem::take(&mut self.buffer);
        self.finish_composition(text)
    }

    /// A commit delivered by the host with explicit text.
    pub fn on_commit(&mut self, text: &str) -> RequestContext {
        self.buffer.clear();
        self.finish_composition(text.to_string())
    }

    pub fn on_schema_change(&mut self, schema_id: &str) {
        self.schema = schema_id.to_string();
        self.input_mode = InputMode::from_schema(schema_id);
    }

    fn finish_composition(&mut self, composed_text: String) -> RequestContext {
        let context = RequestContext {
            composed_text,
            cursor_position: self.cursor_position,
            selection_start: self.selection_start,
            selection_end: self.selection_end,
            input_mode: self.input_mode,
            surrounding_text: self.surrounding_text.take(),
            schema: self.schema.clone(),
            timestamp_ms: self.clock.now_ms(),
            recent: self
                .history
                .iter()
                .map(|ctx| ctx.composed_text.clone())
                .collect(),
        };
        self.history.push_back(context.clone());
        while self.history.len() > self.config.history_limit {
            self.history.pop_front();
        }
        self.state = CompositionState::Idle;
        context
    }

    /// Length/feature gate. Fails closed when the feature is disabled.
    ///
    /// Lengths are counted in characters, not bytes, so CJK text gates the
    /// same as ASCII.
    pub fn should_trigger_ai(&self, context: &RequestContext) -> (bool, TriggerReason) {
        if !self.config.enabled {
            return (false, TriggerReason::Disabled);
        }
        let text = &context.composed_text;
        if text.trim().is_empty() {
            return (false, TriggerReason::Empty);
        }
        let chars = text.chars().count();
        if chars <= 10 {
            return (false, TriggerReason::TooShort);
        }
        if chars > self.config.max_input_chars {
            return (false, TriggerReason::TooLong);
        }
        (true, TriggerReason::Ready)
    }

    /// Debounce gate, separate from [`Self::should_trigger_ai`]. Returns true
    /// and records the acceptance when enough time has elapsed since the
    /// previous accepted trigger.
    pub fn try_accept_trigger(&mut self) -> bool {
        let now = self.clock.now_ms();
        if let Some(last) = self.last_accepted_ms
            && now.saturating_sub(last) < self.config.debounce_ms
        {
            debug!(now, last, "trigger suppressed by debounce");
            return false;
        }
        self.last_accepted_ms = Some(now);
        true
    }
}

/// Last `limit` characters of `text`, on char boundaries.
fn tail_chars(text: &str, limit: usize) -> String {
    let count = text.chars().count();
    if count <= limit {
        return text.to_string();
    }
    text.chars().skip(count - limit).collect()
}
