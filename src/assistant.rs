//! Facade wiring the suggestion engine to the assist client.
//!
//! Hosts that don't need to own the two halves separately can construct an
//! [`Assistant`] from [`Settings`] and feed it composition events; it runs
//! the eligibility and debounce gates before any dispatch.

use std::rc::Rc;

use tracing::debug;

use crate::client::AssistClient;
use crate::config::Settings;
use crate::engine::{SuggestionEngine, TriggerEvent, TriggerReason};
use crate::transport::{Clock, Transport};
use crate::types::{CompositionUpdate, ProviderConfig, RequestContext};
use crate::Result;

/// Why [`Assistant::request_suggestion`] did not dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    /// Failed the eligibility gate.
    Gate(TriggerReason),
    /// Eligible, but inside the debounce window.
    Debounced,
}

pub struct Assistant {
    engine: SuggestionEngine,
    client: AssistClient,
    provider: ProviderConfig,
}

impl Assistant {
    pub fn new(settings: &Settings, transport: Rc<dyn Transport>, clock: Rc<dyn Clock>) -> Self {
        Self {
            engine: SuggestionEngine::new(settings.engine.clone(), clock.clone()),
            client: AssistClient::new(transport, clock, &settings.cache),
            provider: settings.provider.clone(),
        }
    }

    pub fn engine(&mut self) -> &mut SuggestionEngine {
        &mut self.engine
    }

    pub fn client(&self) -> &AssistClient {
        &self.client
    }

    pub fn on_composition_start(&mut self) {
        self.engine.on_composition_start();
    }

    pub fn on_composition_update(&mut self, update: &CompositionUpdate) -> Option<TriggerEvent> {
        self.engine.on_composition_update(update)
    }

    pub fn on_composition_end(&mut self) -> RequestContext {
        self.engine.on_composition_end()
    }

    pub fn on_commit(&mut self, text: &str) -> RequestContext {
        self.engine.on_commit(text)
    }

    pub fn on_schema_change(&mut self, schema_id: &str) {
        self.engine.on_schema_change(schema_id);
    }

    pub fn clear_cache(&self) {
        self.client.clear_cache();
    }

    /// Run both gates, then dispatch through the cache/staleness pair.
    ///
    /// Returns the gate reason when the request was suppressed; the
    /// callback fires only for a dispatched (or cached) request.
    pub fn request_suggestion(
        &mut self,
        context: &RequestContext,
        system_prompt: &str,
        on_result: impl FnOnce(Result<String>),
    ) -> std::result::Result<(), Suppression> {
        let (eligible, reason) = self.engine.should_trigger_ai(context);
        if !eligible {
            debug!(reason = reason.as_str(), "suggestion suppressed");
            return Err(Suppression::Gate(reason));
        }
        if !self.engine.try_accept_trigger() {
            return Err(Suppression::Debounced);
        }
        self.client.chat(
            &self.provider,
            system_prompt,
            &context.composed_text,
            on_result,
        );
        Ok(())
    }
}
