//! Utility functions and helpers for the inpainting workflow.
//!
//! # Submodules
//!
//! - `logging`: Tracing initialization and API-key redaction.

pub mod logging;
