//! Skald - inline AI suggestion pipeline for input method engines
//!
//! As a user types, the pipeline decides when to ask a remote or local
//! language model for a correction/translation/expansion, without stalling
//! the input stream and without ever delivering a response for a
//! superseded keystroke sequence. Requests are not cancellable once sent;
//! ordering is enforced by a staleness guard that silently drops any
//! response whose originating request has been superseded.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::rc::Rc;
//!
//! use skald::config::{Settings, TomlConfig};
//! use skald::transport::{HttpTransport, SystemClock};
//! use skald::{Assistant, CompositionUpdate};
//!
//! fn main() -> skald::Result<()> {
//!     let config = TomlConfig::from_str("api_key = \"sk-...\"")?;
//!     let settings = Settings::from_reader(&config);
//!     let mut assistant = Assistant::new(
//!         &settings,
//!         Rc::new(HttpTransport::new()),
//!         Rc::new(SystemClock),
//!     );
//!
//!     assistant.on_composition_start();
//!     assistant.on_composition_update(&CompositionUpdate {
//!         inserted: "they is going to school".to_string(),
//!         ..Default::default()
//!     });
//!     let context = assistant.on_composition_end();
//!     let _ = assistant.request_suggestion(&context, "", |outcome| {
//!         if let Ok(suggestion) = outcome {
//!             println!("{suggestion}");
//!         }
//!     });
//!     Ok(())
//! }
//! ```

mod assistant;
pub mod cache;
pub mod client;
pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod providers;
pub mod telemetry;
pub mod transport;
pub mod types;

// Re-export main types at crate root
pub use assistant::{Assistant, Suppression};
pub use client::AssistClient;
pub use engine::{
    CompositionState, EngineConfig, SuggestionEngine, TriggerEvent, TriggerReason,
};
pub use error::{Result, SkaldError};
pub use types::{CompositionUpdate, InputMode, ProviderConfig, ProviderKind, RequestContext};
