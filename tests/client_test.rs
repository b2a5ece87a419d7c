//! Tests for [`AssistClient`] — cache behaviour and the staleness guard.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use skald::cache::{CacheConfig, DEFAULT_TTL_MS};
use skald::client::AssistClient;
use skald::transport::{Clock, Header, Transport};
use skald::{ProviderConfig, SkaldError};

/// Test clock advanced explicitly by the test body.
#[derive(Default)]
struct FakeClock {
    now: Cell<u64>,
}

impl FakeClock {
    fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Transport that answers every POST with a canned ollama response and
/// counts invocations.
struct CountingTransport {
    calls: Cell<usize>,
    response: RefCell<String>,
}

impl CountingTransport {
    fn new(text: &str) -> Self {
        Self {
            calls: Cell::new(0),
            response: RefCell::new(format!(r#"{{"response":"{text}"}}"#)),
        }
    }
}

impl Transport for CountingTransport {
    fn post(&self, _url: &str, _body: &str, _headers: &[Header], _timeout_ms: u64) -> Option<String> {
        self.calls.set(self.calls.get() + 1);
        Some(self.response.borrow().clone())
    }

    fn get(&self, _url: &str, _headers: &[Header], _timeout_ms: u64) -> Option<String> {
        None
    }
}

fn ollama_config() -> ProviderConfig {
    ProviderConfig {
        provider: "ollama".to_string(),
        endpoint: "localhost:11434".to_string(),
        model: "llama3".to_string(),
        api_key: String::new(),
        max_tokens: 64,
        temperature: 0.3,
        timeout_ms: 5_000,
    }
}

fn collect(outcomes: &Rc<RefCell<Vec<Result<String, String>>>>) -> impl FnOnce(skald::Result<String>) {
    let outcomes = outcomes.clone();
    move |result| {
        outcomes
            .borrow_mut()
            .push(result.map_err(|e| e.to_string()));
    }
}

// =========================================================================
// Cache correctness
// =========================================================================

#[test]
fn repeated_prompt_is_served_from_cache() {
    let transport = Rc::new(CountingTransport::new("answer"));
    let clock = Rc::new(FakeClock::default());
    let client = AssistClient::new(transport.clone(), clock, &CacheConfig::default());

    let outcomes = Rc::new(RefCell::new(Vec::new()));
    client.chat(&ollama_config(), "", "same prompt", collect(&outcomes));
    client.chat(&ollama_config(), "", "same prompt", collect(&outcomes));

    assert_eq!(transport.calls.get(), 1);
    let outcomes = outcomes.borrow();
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0], Ok("answer".to_string()));
    assert_eq!(outcomes[1], outcomes[0]);
}

#[test]
fn different_prompts_miss() {
    let transport = Rc::new(CountingTransport::new("answer"));
    let clock = Rc::new(FakeClock::default());
    let client = AssistClient::new(transport.clone(), clock, &CacheConfig::default());

    client.chat(&ollama_config(), "", "prompt one", |_| {});
    client.chat(&ollama_config(), "", "prompt two", |_| {});

    assert_eq!(transport.calls.get(), 2);
}

#[test]
fn ttl_expiry_triggers_a_fresh_dispatch() {
    let transport = Rc::new(CountingTransport::new("answer"));
    let clock = Rc::new(FakeClock::default());
    let client = AssistClient::new(transport.clone(), clock.clone(), &CacheConfig::default());

    clock.set(1_000);
    client.chat(&ollama_config(), "", "prompt", |_| {});
    assert_eq!(transport.calls.get(), 1);

    // Just inside the window: still cached.
    clock.set(1_000 + DEFAULT_TTL_MS - 1);
    client.chat(&ollama_config(), "", "prompt", |_| {});
    assert_eq!(transport.calls.get(), 1);

    // At the window boundary: fresh dispatch.
    clock.set(1_000 + DEFAULT_TTL_MS);
    client.chat(&ollama_config(), "", "prompt", |_| {});
    assert_eq!(transport.calls.get(), 2);
}

#[test]
fn capacity_eviction_drops_the_oldest_created_entry() {
    let transport = Rc::new(CountingTransport::new("answer"));
    let clock = Rc::new(FakeClock::default());
    let config = CacheConfig {
        max_entries: 2,
        ..CacheConfig::default()
    };
    let client = AssistClient::new(transport.clone(), clock.clone(), &config);

    clock.set(0);
    client.chat(&ollama_config(), "", "first", |_| {});
    clock.set(10);
    client.chat(&ollama_config(), "", "second", |_| {});
    clock.set(20);
    client.chat(&ollama_config(), "", "third", |_| {});
    assert_eq!(transport.calls.get(), 3);

    // "first" was evicted; the others still hit.
    client.chat(&ollama_config(), "", "second", |_| {});
    client.chat(&ollama_config(), "", "third", |_| {});
    assert_eq!(transport.calls.get(), 3);
    client.chat(&ollama_config(), "", "first", |_| {});
    assert_eq!(transport.calls.get(), 4);
}

#[test]
fn disabled_cache_always_dispatches() {
    let transport = Rc::new(CountingTransport::new("answer"));
    let clock = Rc::new(FakeClock::default());
    let config = CacheConfig {
        enabled: false,
        ..CacheConfig::default()
    };
    let client = AssistClient::new(transport.clone(), clock, &config);

    client.chat(&ollama_config(), "", "prompt", |_| {});
    client.chat(&ollama_config(), "", "prompt", |_| {});
    assert_eq!(transport.calls.get(), 2);
}

#[test]
fn clear_cache_forces_redispatch() {
    let transport = Rc::new(CountingTransport::new("answer"));
    let clock = Rc::new(FakeClock::default());
    let client = AssistClient::new(transport.clone(), clock, &CacheConfig::default());

    client.chat(&ollama_config(), "", "prompt", |_| {});
    client.clear_cache();
    client.chat(&ollama_config(), "", "prompt", |_| {});
    assert_eq!(transport.calls.get(), 2);
}

#[test]
fn failures_invoke_the_callback_and_are_not_cached() {
    struct FailingTransport;
    impl Transport for FailingTransport {
        fn post(&self, _: &str, _: &str, _: &[Header], _: u64) -> Option<String> {
            None
        }
        fn get(&self, _: &str, _: &[Header], _: u64) -> Option<String> {
            None
        }
    }

    let clock = Rc::new(FakeClock::default());
    let client = AssistClient::new(Rc::new(FailingTransport), clock, &CacheConfig::default());

    let failures = Cell::new(0);
    client.chat(&ollama_config(), "", "prompt", |outcome| {
        assert!(matches!(outcome, Err(SkaldError::Transport(_))));
        failures.set(failures.get() + 1);
    });
    client.chat(&ollama_config(), "", "prompt", |outcome| {
        assert!(outcome.is_err());
        failures.set(failures.get() + 1);
    });
    // Second call dispatched again — nothing was cached.
    assert_eq!(failures.get(), 2);
}

// =========================================================================
// Staleness guard
// =========================================================================

/// Transport whose first POST issues a second request before "its own"
/// response arrives, simulating the host processing queued events during
/// the blocking window.
struct SupersedingTransport {
    client: RefCell<Option<Rc<AssistClient>>>,
    nested_issued: Cell<bool>,
    b_results: Rc<RefCell<Vec<String>>>,
}

impl Transport for SupersedingTransport {
    fn post(&self, _url: &str, body: &str, _headers: &[Header], _timeout_ms: u64) -> Option<String> {
        if !self.nested_issued.get() && body.contains("prompt a") {
            self.nested_issued.set(true);
            let client = self.client.borrow().clone().expect("client wired");
            let results = self.b_results.clone();
            client.chat(&ollama_config(), "", "prompt b", move |outcome| {
                results.borrow_mut().push(outcome.unwrap());
            });
            // Request A's response arrives only after B completed.
            Some(r#"{"response":"answer a"}"#.to_string())
        } else {
            Some(r#"{"response":"answer b"}"#.to_string())
        }
    }

    fn get(&self, _url: &str, _headers: &[Header], _timeout_ms: u64) -> Option<String> {
        None
    }
}

#[test]
fn superseded_response_is_never_delivered() {
    let b_results = Rc::new(RefCell::new(Vec::new()));
    let transport = Rc::new(SupersedingTransport {
        client: RefCell::new(None),
        nested_issued: Cell::new(false),
        b_results: b_results.clone(),
    });
    let clock = Rc::new(FakeClock::default());
    let client = Rc::new(AssistClient::new(
        transport.clone(),
        clock,
        &CacheConfig::default(),
    ));
    *transport.client.borrow_mut() = Some(client.clone());

    let a_fired = Cell::new(false);
    client.chat(&ollama_config(), "", "prompt a", |_| {
        a_fired.set(true);
    });

    // A was superseded by B mid-flight: its callback never fires.
    assert!(!a_fired.get());
    // B's callback fired exactly once, with B's result.
    assert_eq!(*b_results.borrow(), vec!["answer b".to_string()]);

    // A's response was not cached either: a repeat of "prompt a" misses
    // and gets a fresh (post-supersession) answer.
    let repeat = Rc::new(RefCell::new(Vec::new()));
    let repeat_sink = repeat.clone();
    client.chat(&ollama_config(), "", "prompt a", move |outcome| {
        repeat_sink.borrow_mut().push(outcome.unwrap());
    });
    assert_eq!(*repeat.borrow(), vec!["answer b".to_string()]);
}
