//! The inpainting workflow record, its shared handle, and the host driver.
//!
//! # Submodules
//!
//! - `state`: the record, its phase union and pure transitions.
//! - `context`: shared handle with a reducer-style setter and change feed.
//! - `host`: reacts to `generating` and `committing`.

pub mod context;
pub mod host;
pub mod state;

pub use context::WorkflowContext;
pub use host::WorkflowHost;
pub use state::{
    ElementId, ImageCount, Mode, ModelChoice, Phase, Review, Status, Tool, Variation,
    WorkflowState,
};
