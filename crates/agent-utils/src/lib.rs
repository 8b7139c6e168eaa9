//! Shared utilities for agent-rs
//!
//! This crate provides common functionality used across the agent-rs workspace,
//! including logging setup, configuration management, and utility functions.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigError, optional_env};
pub use logging::{LogFormat, init_tracing_with};
