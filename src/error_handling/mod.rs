//! Error handling.
//!
//! This module provides:
//! - Error type definitions for every failure the pipeline can see
//! - Categorization of `reqwest` errors into fetch error kinds
//!
//! Failures are localized: an invalid target stops analysis before it starts,
//! a fetch failure makes categories unavailable, and a rule evaluation failure
//! only removes that rule from the score.

mod categorization;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, error_chain_message};
pub use types::{
    CategoryError, ConfigError, FetchError, FetchErrorKind, InitializationError,
    RuleEvaluationError, TargetError,
};
