//! Assist client: response cache plus staleness guard around the
//! dispatcher.
//!
//! One logical in-flight request is tracked per client instance. Requests
//! are not cancellable once sent, so ordering is enforced post hoc: each
//! dispatch captures the value of a monotonically increasing counter, and
//! a completion is delivered iff its captured value still equals the
//! counter. Issuing request N+1 before request N completes therefore
//! guarantees N's callback never fires — last-dispatched-wins.
//!
//! The client is single-owner, single-threaded state (`Rc`, `Cell`,
//! `RefCell`): the host delivers events one at a time and the pipeline
//! runs to completion between them. Re-entrant `chat` calls from within a
//! transport (the host processing queued events during the blocking
//! window) are supported; no borrow is held across the dispatch.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

use crate::cache::{CacheConfig, ResponseCache, cache_key};
use crate::providers;
use crate::transport::{Clock, Transport};
use crate::types::ProviderConfig;
use crate::{Result, telemetry};

pub struct AssistClient {
    transport: Rc<dyn Transport>,
    clock: Rc<dyn Clock>,
    cache: RefCell<ResponseCache>,
    cache_enabled: bool,
    seq: Cell<u64>,
}

impl AssistClient {
    pub fn new(transport: Rc<dyn Transport>, clock: Rc<dyn Clock>, config: &CacheConfig) -> Self {
        Self {
            transport,
            clock,
            cache: RefCell::new(ResponseCache::new(config)),
            cache_enabled: config.enabled,
            seq: Cell::new(0),
        }
    }

    /// Request a completion, answering from cache when possible.
    ///
    /// The callback fires exactly once for a cache hit (synchronously) and
    /// at most once otherwise: a response superseded by a newer request is
    /// dropped silently, with no callback and no cache write.
    pub fn chat(
        &self,
        config: &ProviderConfig,
        system_prompt: &str,
        user_prompt: &str,
        on_result: impl FnOnce(Result<String>),
    ) {
        let key = cache_key(&config.provider, &config.endpoint, &config.model, user_prompt);

        if self.cache_enabled {
            let cached = self.cache.borrow_mut().get(&key, self.clock.now_ms());
            if let Some(response) = cached {
                debug!(key, "served from cache");
                on_result(Ok(response));
                return;
            }
        }

        // Issuing this request invalidates any earlier in-flight token.
        let token = self.seq.get() + 1;
        self.seq.set(token);

        let outcome = providers::dispatch(
            self.transport.as_ref(),
            config,
            system_prompt,
            user_prompt,
            config.timeout_ms,
        );

        if token != self.seq.get() {
            // A newer request was issued while this one was in flight.
            metrics::counter!(telemetry::STALE_DROPS_TOTAL).increment(1);
            debug!(token, current = self.seq.get(), "dropping stale response");
            return;
        }

        match outcome {
            Ok(response) => {
                if self.cache_enabled {
                    self.cache
                        .borrow_mut()
                        .insert(key, response.clone(), self.clock.now_ms());
                }
                on_result(Ok(response));
            }
            Err(err) => on_result(Err(err)),
        }
    }

    /// Empty the cache unconditionally. In-flight tokens are unaffected.
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }
}
