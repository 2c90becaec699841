//! Stage prompt templates for the extraction pipeline
//!
//! One template per pipeline stage, embedded at build time with an optional
//! on-disk override directory for prompt iteration without rebuilds.

pub mod embedded;
mod loader;

pub use loader::{PromptContext, PromptLoader, PromptStage};
