//! # advisor-core
//!
//! Provider-agnostic text-generation abstraction for the readiness advisor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Advice Engine                          │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │   Prompt    │  │  generate() │  │   LlmProvider       │  │
//! │  │  Templates  │──│  (timeout)  │──│   (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping between Gemini, OpenAI or the
//! offline mock without changing advice logic.

pub mod error;
pub mod message;
pub mod provider;

pub use error::{AgentError, Result};
pub use message::{Message, Role};
pub use provider::{
    Completion, Generation, GenerationOptions, LlmProvider, ProviderChain, ProviderInfo,
    ProviderStrategy, generate,
};
