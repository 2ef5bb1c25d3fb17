// nanobanana - mask-guided inpainting workflow backed by Gemini image generation

pub mod canvas;
pub mod cli;
pub mod config;
pub mod error;
pub mod gemini;
pub mod models;
pub mod ui;
pub mod utils;
pub mod workflow;
