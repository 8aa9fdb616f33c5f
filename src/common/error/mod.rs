//! Unified error types.
//!
//! This module provides the single error type returned by every fallible
//! operation of the archive builder.

// Submodule declarations
pub mod types;

// Re-exports
pub use types::{Error, Result};
