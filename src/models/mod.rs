//! Data models for the Gemini `generateContent` API.
//!
//! This module contains:
//! - Request/response bodies exchanged with the Generative Language API (`gemini`)
//! - The logical model selector table (`mapping`)

pub mod gemini;
pub mod mapping;

pub use gemini::{
    ApiErrorBody, Candidate, Content, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, InlineData, Part,
};
pub use mapping::{map_model, resolve_model};
