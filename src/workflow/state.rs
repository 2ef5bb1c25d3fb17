//! The shared inpainting workflow record and its transitions.
//!
//! Every mutator takes `&self` and returns the next record, so the context
//! can apply them as reducers. A trigger that is not valid in the current
//! phase returns an unchanged clone instead of an error: the panels disable
//! those controls, and a stray event must not disturb the record.

use crate::config::WorkflowConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to an element of the host canvas. Opaque to this crate.
pub type ElementId = String;

/// Active drawing tool of the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Selection,
    Rectangle,
    Freedraw,
    Eraser,
    Text,
    Hand,
}

/// Edit semantics requested for the masked area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Replace,
    Erase,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Replace, Mode::Erase];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Replace => "replace",
            Mode::Erase => "erase",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Replace => "Replace",
            Mode::Erase => "Erase",
        }
    }

    /// Hint text for the prompt field.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Mode::Replace => "Describe what to generate...",
            Mode::Erase => "Describe what to erase...",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(Mode::Replace),
            "erase" => Ok(Mode::Erase),
            other => Err(format!("unknown mode: {other} (expected replace or erase)")),
        }
    }
}

/// Logical model selector shown in the settings menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelChoice {
    #[default]
    Auto,
    Pro,
    Flash,
}

impl ModelChoice {
    pub const ALL: [ModelChoice; 3] = [ModelChoice::Auto, ModelChoice::Pro, ModelChoice::Flash];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelChoice::Auto => "auto",
            ModelChoice::Pro => "pro",
            ModelChoice::Flash => "flash",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModelChoice::Auto => "Auto",
            ModelChoice::Pro => "Pro",
            ModelChoice::Flash => "Flash",
        }
    }
}

impl std::str::FromStr for ModelChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(ModelChoice::Auto),
            "pro" => Ok(ModelChoice::Pro),
            "flash" => Ok(ModelChoice::Flash),
            other => Err(format!("unknown model: {other} (expected auto, pro or flash)")),
        }
    }
}

/// Number of variations to request, always within [`ImageCount::MIN`, `ImageCount::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ImageCount(u8);

impl ImageCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    /// Clamps `n` into range.
    pub fn new(n: u8) -> Self {
        Self(n.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Moves by `delta`, saturating at the bounds.
    pub fn offset(self, delta: i32) -> Self {
        let next = (i32::from(self.0) + delta).clamp(i32::from(Self::MIN), i32::from(Self::MAX));
        Self(next as u8)
    }

    pub fn increment(self) -> Self {
        self.offset(1)
    }

    pub fn decrement(self) -> Self {
        self.offset(-1)
    }

    pub fn can_increment(self) -> bool {
        self.0 < Self::MAX
    }

    pub fn can_decrement(self) -> bool {
        self.0 > Self::MIN
    }
}

impl Default for ImageCount {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl fmt::Display for ImageCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One generated candidate image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variation {
    pub id: String,
    /// Self-contained `data:{mime};base64,{payload}` URL.
    #[serde(rename = "dataURL")]
    pub data_url: String,
}

/// Flat view of the workflow phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Idle,
    Generating,
    Reviewing,
    Committing,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Idle => "idle",
            Status::Generating => "generating",
            Status::Reviewing => "reviewing",
            Status::Committing => "committing",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variations under review plus the current pick.
///
/// `selected` is 0 for the original, `n` for `variations[n - 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    variations: Vec<Variation>,
    selected: usize,
}

impl Review {
    pub fn new(variations: Vec<Variation>) -> Self {
        Self {
            variations,
            selected: 0,
        }
    }

    pub fn variations(&self) -> &[Variation] {
        &self.variations
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Number of selectable entries, original included.
    pub fn choices(&self) -> usize {
        self.variations.len() + 1
    }

    /// `None` while the original is selected.
    pub fn selected_variation(&self) -> Option<&Variation> {
        self.selected
            .checked_sub(1)
            .and_then(|i| self.variations.get(i))
    }

    fn select(&self, index: usize) -> Option<Self> {
        (index < self.choices()).then(|| Self {
            variations: self.variations.clone(),
            selected: index,
        })
    }
}

/// Workflow phase. Variations only exist while reviewing or committing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Generating,
    Reviewing(Review),
    Committing(Review),
}

impl Phase {
    pub fn status(&self) -> Status {
        match self {
            Phase::Idle => Status::Idle,
            Phase::Generating => Status::Generating,
            Phase::Reviewing(_) => Status::Reviewing,
            Phase::Committing(_) => Status::Committing,
        }
    }

    pub fn review(&self) -> Option<&Review> {
        match self {
            Phase::Reviewing(review) | Phase::Committing(review) => Some(review),
            Phase::Idle | Phase::Generating => None,
        }
    }
}

/// The shared record both panels read and the host reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkflowState {
    phase: Phase,
    pub mode: Mode,
    pub prompt: String,
    pub model: ModelChoice,
    pub image_count: ImageCount,
    pub mask_element_ids: Vec<ElementId>,
    pub preview_element_id: Option<ElementId>,
}

impl WorkflowState {
    pub fn new(config: &WorkflowConfig) -> Self {
        Self {
            mode: config.default_mode,
            model: config.default_model,
            image_count: config.image_count(),
            ..Self::default()
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn status(&self) -> Status {
        self.phase.status()
    }

    pub fn is_generating(&self) -> bool {
        self.status() == Status::Generating
    }

    /// Empty unless reviewing or committing.
    pub fn variations(&self) -> &[Variation] {
        self.phase.review().map(Review::variations).unwrap_or(&[])
    }

    pub fn selected_variation_index(&self) -> usize {
        self.phase.review().map(Review::selected).unwrap_or(0)
    }

    pub fn selected_variation(&self) -> Option<&Variation> {
        self.phase.review().and_then(Review::selected_variation)
    }

    pub fn has_prompt(&self) -> bool {
        !self.prompt.trim().is_empty()
    }

    /// Whether the Generate action would do anything right now.
    pub fn can_generate(&self) -> bool {
        self.status() == Status::Idle && self.has_prompt()
    }

    pub fn with_mode(&self, mode: Mode) -> Self {
        Self {
            mode,
            ..self.clone()
        }
    }

    pub fn with_prompt(&self, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..self.clone()
        }
    }

    pub fn with_model(&self, model: ModelChoice) -> Self {
        Self {
            model,
            ..self.clone()
        }
    }

    pub fn with_image_count(&self, image_count: ImageCount) -> Self {
        Self {
            image_count,
            ..self.clone()
        }
    }

    pub fn adjust_image_count(&self, delta: i32) -> Self {
        self.with_image_count(self.image_count.offset(delta))
    }

    pub fn with_mask_elements(&self, ids: Vec<ElementId>) -> Self {
        Self {
            mask_element_ids: ids,
            ..self.clone()
        }
    }

    pub fn with_preview_element(&self, id: Option<ElementId>) -> Self {
        Self {
            preview_element_id: id,
            ..self.clone()
        }
    }

    /// Idle → Generating. No-op on a blank prompt or outside idle.
    pub fn start_generation(&self) -> Self {
        if !self.can_generate() {
            return self.clone();
        }
        Self {
            phase: Phase::Generating,
            ..self.clone()
        }
    }

    /// Generating → Reviewing with the original selected.
    pub fn receive_variations(&self, variations: Vec<Variation>) -> Self {
        match self.phase {
            Phase::Generating => Self {
                phase: Phase::Reviewing(Review::new(variations)),
                ..self.clone()
            },
            _ => self.clone(),
        }
    }

    /// Generating → Idle. Prompt and mask references survive so the user
    /// can retry without redrawing.
    pub fn generation_failed(&self) -> Self {
        match self.phase {
            Phase::Generating => Self {
                phase: Phase::Idle,
                ..self.clone()
            },
            _ => self.clone(),
        }
    }

    /// Picks entry `index` (0 = original) while reviewing.
    pub fn select_variation(&self, index: usize) -> Self {
        match &self.phase {
            Phase::Reviewing(review) => match review.select(index) {
                Some(review) => Self {
                    phase: Phase::Reviewing(review),
                    ..self.clone()
                },
                None => self.clone(),
            },
            _ => self.clone(),
        }
    }

    /// Reviewing → Committing, keeping the current pick.
    pub fn save(&self) -> Self {
        match &self.phase {
            Phase::Reviewing(review) => Self {
                phase: Phase::Committing(review.clone()),
                ..self.clone()
            },
            _ => self.clone(),
        }
    }

    /// Committing → Idle once the host has applied the pick.
    pub fn finish_commit(&self) -> Self {
        match self.phase {
            Phase::Committing(_) => self.cleared(),
            _ => self.clone(),
        }
    }

    /// Any → Idle, dropping every transient part of the workflow.
    pub fn discard(&self) -> Self {
        self.cleared()
    }

    // Mode, model and image count are user preferences and persist.
    fn cleared(&self) -> Self {
        Self {
            phase: Phase::Idle,
            prompt: String::new(),
            mask_element_ids: Vec::new(),
            preview_element_id: None,
            ..self.clone()
        }
    }
}
