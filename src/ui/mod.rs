//! egui panels for the inpainting workflow.
//!
//! Both panels hold a [`WorkflowContext`](crate::workflow::WorkflowContext)
//! handle and decide their own visibility from it, so a host can call both
//! `show` methods every frame and at most one draws anything.

pub mod prompt_bar;
pub mod review_bar;

pub use prompt_bar::PromptBar;
pub use review_bar::ReviewBar;
