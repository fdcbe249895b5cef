//! Utility functions shared across modules.
//!
//! This module provides:
//! - CSS selector parsing utilities
//! - Text normalization helpers used when reporting extracted markup

mod selector;
mod text;

pub use selector::parse_selector_with_fallback;
pub use text::{collapse_whitespace, preview};
