// Review bar: pick between the original and the generated variations

use crate::canvas::decode_variation;
use crate::workflow::{Status, Variation, WorkflowContext, WorkflowState};
use egui::{Button, ColorImage, TextureHandle, TextureOptions, Ui};
use std::collections::HashMap;
use tracing::warn;

const THUMBNAIL_SIZE: u32 = 48;

/// Panel shown only while the workflow is reviewing.
pub struct ReviewBar {
    ctx: WorkflowContext,
    // (position, id) → texture; ids alone can repeat within one batch.
    // `None` remembers a variation that failed to decode.
    thumbnails: HashMap<(usize, String), Option<TextureHandle>>,
}

impl ReviewBar {
    pub fn new(ctx: WorkflowContext) -> Self {
        Self {
            ctx,
            thumbnails: HashMap::new(),
        }
    }

    pub fn is_visible(state: &WorkflowState) -> bool {
        state.status() == Status::Reviewing
    }

    /// 0 selects the original, `n` selects variation `n - 1`.
    pub fn select(&self, index: usize) {
        self.ctx.update(|s| s.select_variation(index));
    }

    /// Hands the current pick to the host for committing.
    pub fn save(&self) {
        self.ctx.update(WorkflowState::save);
    }

    /// Rolls the whole workflow back to idle.
    pub fn discard(&mut self) {
        self.ctx.update(WorkflowState::discard);
        self.thumbnails.clear();
    }

    pub fn show(&mut self, ui: &mut Ui) {
        let state = self.ctx.snapshot();
        if !Self::is_visible(&state) {
            if !self.thumbnails.is_empty() {
                self.thumbnails.clear();
            }
            return;
        }
        let selected = state.selected_variation_index();

        ui.horizontal(|ui| {
            if ui
                .selectable_label(selected == 0, "Original")
                .on_hover_text("Original")
                .clicked()
            {
                self.select(0);
            }

            for (i, variation) in state.variations().iter().enumerate() {
                let index = i + 1;
                let title = format!("Variation {}", index);
                let clicked = match self.thumbnail(ui, i, variation) {
                    Some(texture) => {
                        let sized = egui::load::SizedTexture::from_handle(&texture);
                        let image = egui::Image::from_texture(sized)
                            .fit_to_exact_size(egui::vec2(THUMBNAIL_SIZE as f32, THUMBNAIL_SIZE as f32));
                        ui.add(egui::ImageButton::new(image).selected(selected == index))
                            .on_hover_text(title.as_str())
                            .clicked()
                    }
                    None => ui
                        .selectable_label(selected == index, title.as_str())
                        .on_hover_text("Preview unavailable")
                        .clicked(),
                };
                if clicked {
                    self.select(index);
                }
            }

            // Reserved: needs the host to append to an existing review.
            ui.add_enabled(false, Button::new("+"))
                .on_disabled_hover_text("Generate more variations");

            ui.separator();

            if ui.button("Save").clicked() {
                self.save();
            }
            if ui.button("🗑").on_hover_text("Discard changes").clicked() {
                self.discard();
            }
        });
    }

    fn thumbnail(&mut self, ui: &Ui, position: usize, variation: &Variation) -> Option<TextureHandle> {
        self.thumbnails
            .entry((position, variation.id.clone()))
            .or_insert_with(|| match decode_variation(variation) {
                Ok(image) => {
                    let thumb = image::imageops::thumbnail(&image, THUMBNAIL_SIZE, THUMBNAIL_SIZE);
                    let color_image = ColorImage::from_rgba_unmultiplied(
                        [thumb.width() as usize, thumb.height() as usize],
                        thumb.as_raw(),
                    );
                    Some(ui.ctx().load_texture(
                        format!("nanobanana_variation_{}_{}", position, variation.id),
                        color_image,
                        TextureOptions::LINEAR,
                    ))
                }
                Err(e) => {
                    warn!("Cannot preview {}: {}", variation.id, e);
                    None
                }
            })
            .clone()
    }
}
