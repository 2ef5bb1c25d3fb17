// Gemini API client module

mod client;
pub mod inpaint;

pub use client::GeminiClient;
pub use inpaint::{build_instruction, build_request, GenerationOutcome, InpaintParams};
