//! LLM provider abstraction layer for agent-rs
//!
//! This crate provides provider-agnostic abstractions for interacting with
//! Large Language Models (LLMs). It includes:
//!
//! - Message types for LLM communication
//! - Completion request/response types, including structured (schema-constrained) output
//! - Built-in tools (search grounding) and the citation chunks they produce
//! - JSON schema builders and a validator for decoded responses
//! - Provider trait for LLM implementations
//! - Concrete provider implementations (behind feature flags)

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod schema;
pub mod tools;

// Re-export main types
pub use completion::{
    CompletionRequest, CompletionResponse, ResponseFormat, StopReason, TokenUsage,
};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;
pub use schema::SchemaViolation;
pub use tools::{GroundingChunk, Tool};

// Provider implementations (feature-gated)
#[cfg(feature = "gemini")]
pub mod providers;
