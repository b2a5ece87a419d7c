//! Core data types shared across the pipeline.

mod context;
mod provider;

pub use context::{CompositionUpdate, InputMode, RequestContext};
pub use provider::{ProviderConfig, ProviderKind};
