//! jackc_core: Core utilities for the jackc compiler.
//!
//! Provides source position types shared by every stage of the pipeline.

pub mod text;

// Re-export commonly used types
pub use text::{LineAndColumn, LineMap, TextPos, TextRange};
