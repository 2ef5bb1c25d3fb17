// Prompt bar: mode, prompt text, generation settings and the Generate action

use crate::workflow::{ImageCount, Mode, ModelChoice, Status, Tool, WorkflowContext, WorkflowState};
use egui::{Button, Key, RichText, TextEdit, Ui};

const PROMPT_WIDTH: f32 = 280.0;

/// Panel shown while the freehand tool is active and nothing is under review.
///
/// It never talks to the network: Generate only flips the record to
/// `generating`, and the host takes it from there.
pub struct PromptBar {
    ctx: WorkflowContext,
}

impl PromptBar {
    pub fn new(ctx: WorkflowContext) -> Self {
        Self { ctx }
    }

    pub fn is_visible(state: &WorkflowState, tool: Tool) -> bool {
        tool == Tool::Freedraw && state.status() != Status::Reviewing
    }

    pub fn set_mode(&self, mode: Mode) {
        self.ctx.update(|s| s.with_mode(mode));
    }

    pub fn set_prompt(&self, prompt: impl Into<String>) {
        let prompt = prompt.into();
        self.ctx.update(move |s| s.with_prompt(prompt));
    }

    pub fn set_model(&self, model: ModelChoice) {
        self.ctx.update(|s| s.with_model(model));
    }

    /// Stepper: moves the image count by `delta`, saturating at [1, 4].
    pub fn change_image_count(&self, delta: i32) {
        self.ctx.update(|s| s.adjust_image_count(delta));
    }

    /// No-op on a blank prompt or while a batch is running.
    pub fn generate(&self) {
        self.ctx.update(WorkflowState::start_generation);
    }

    /// Enter in the prompt field.
    pub fn submit(&self) {
        let state = self.ctx.snapshot();
        if !state.is_generating() && state.has_prompt() {
            self.generate();
        }
    }

    pub fn show(&mut self, ui: &mut Ui, tool: Tool) {
        let state = self.ctx.snapshot();
        if !Self::is_visible(&state, tool) {
            return;
        }
        let generating = state.is_generating();

        ui.horizontal(|ui| {
            for mode in Mode::ALL {
                if ui
                    .selectable_label(state.mode == mode, mode.label())
                    .on_hover_text(format!("{} mode", mode.label()))
                    .clicked()
                {
                    self.set_mode(mode);
                }
            }

            ui.separator();

            let mut prompt = state.prompt.clone();
            let resp = ui.add_enabled(
                !generating,
                TextEdit::singleline(&mut prompt)
                    .hint_text(state.mode.placeholder())
                    .desired_width(PROMPT_WIDTH),
            );
            if resp.changed() {
                self.set_prompt(prompt.clone());
            }
            if resp.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                self.submit();
            }

            ui.menu_button("⋯", |ui| self.settings_menu(ui, &state))
                .response
                .on_hover_text("Generation settings");

            ui.separator();

            let label = if generating { "Generating..." } else { "Generate" };
            let enabled = !generating && !prompt.trim().is_empty();
            if ui
                .add_enabled(enabled, Button::new(RichText::new(label).strong()))
                .clicked()
            {
                self.generate();
            }
            if generating {
                ui.spinner();
            }
        });
    }

    fn settings_menu(&self, ui: &mut Ui, state: &WorkflowState) {
        let count = state.image_count;

        ui.horizontal(|ui| {
            ui.label("Images");
            if ui
                .add_enabled(count.can_decrement(), Button::new("−").small())
                .on_hover_text("Decrease image count")
                .clicked()
            {
                self.change_image_count(-1);
            }
            ui.label(RichText::new(count.to_string()).monospace());
            if ui
                .add_enabled(count.can_increment(), Button::new("+").small())
                .on_hover_text("Increase image count")
                .clicked()
            {
                self.change_image_count(1);
            }
        });
        ui.label(
            RichText::new(format!("{}–{} per generation", ImageCount::MIN, ImageCount::MAX))
                .small()
                .weak(),
        );

        ui.separator();

        ui.label("Model");
        let mut model = state.model;
        for choice in ModelChoice::ALL {
            ui.radio_value(&mut model, choice, choice.label());
        }
        if model != state.model {
            self.set_model(model);
        }
    }
}
