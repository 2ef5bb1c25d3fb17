// Host-side driver: performs the work the panels only request

use super::context::WorkflowContext;
use super::state::{Status, WorkflowState};
use crate::canvas::{canvas_to_base64, decode_variation, CanvasSurface};
use crate::error::Result;
use crate::gemini::{GeminiClient, GenerationOutcome, InpaintParams};
use std::future::Future;
use tracing::{error, info, warn};

/// Watches the workflow record and carries out the two transitions the
/// panels cannot: running generation once `generating` is set, and applying
/// the pick once `committing` is set.
pub struct WorkflowHost<C> {
    client: GeminiClient,
    context: WorkflowContext,
    canvas: C,
    last_outcome: Option<GenerationOutcome>,
}

impl<C: CanvasSurface> WorkflowHost<C> {
    pub fn new(client: GeminiClient, context: WorkflowContext, canvas: C) -> Self {
        Self {
            client,
            context,
            canvas,
            last_outcome: None,
        }
    }

    pub fn context(&self) -> &WorkflowContext {
        &self.context
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    /// Result of the most recent generation batch.
    pub fn last_outcome(&self) -> Option<&GenerationOutcome> {
        self.last_outcome.as_ref()
    }

    /// Error of the most recent batch, for display next to the prompt.
    pub fn last_error(&self) -> Option<&str> {
        self.last_outcome.as_ref().and_then(|o| o.error.as_deref())
    }

    /// Handle whatever the current status asks for. Returns the status that
    /// was acted on, if any.
    pub async fn step(&mut self) -> Option<Status> {
        match self.context.status() {
            Status::Generating => {
                self.handle_generating().await;
                Some(Status::Generating)
            }
            Status::Committing => {
                // A failed apply is logged and discarded inside.
                let _ = self.handle_committing();
                Some(Status::Committing)
            }
            Status::Idle | Status::Reviewing => None,
        }
    }

    /// Step on every change of the record until `shutdown` resolves.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut changes = self.context.subscribe();
        tokio::pin!(shutdown);

        loop {
            // Mark seen before stepping: updates made while the step runs
            // must still wake the next iteration.
            changes.borrow_and_update();
            self.step().await;

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Workflow host stopping");
                    break;
                }
                changed = changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
    }

    /// Export base and mask, run the batch, and move to reviewing.
    ///
    /// A failed batch that still produced variations is reviewed like a
    /// successful one; its error stays available through [`Self::last_error`].
    pub async fn handle_generating(&mut self) {
        let state = self.context.snapshot();
        if !state.is_generating() {
            return;
        }

        let outcome = match self.build_params(&state) {
            Ok(params) => self.client.generate_inpainted_images(&params).await,
            Err(e) => {
                error!("Failed to export canvas for inpainting: {}", e);
                GenerationOutcome::failed(Vec::new(), e.to_string())
            }
        };

        if let Some(err) = &outcome.error {
            warn!("Generation finished with error: {}", err);
        }

        if outcome.success || !outcome.variations.is_empty() {
            let variations = outcome.variations.clone();
            self.context.update(move |s| s.receive_variations(variations));
        } else {
            self.context.update(WorkflowState::generation_failed);
        }

        self.last_outcome = Some(outcome);
    }

    /// Apply the selected variation (or keep the original), remove the mask
    /// strokes and return to idle.
    ///
    /// An undecodable pick discards the review instead; the error is then
    /// returned so a caller can tell the canvas was left unchanged.
    pub fn handle_committing(&mut self) -> Result<()> {
        let state = self.context.snapshot();
        if state.status() != Status::Committing {
            return Ok(());
        }

        let applied = match state.selected_variation() {
            Some(variation) => decode_variation(variation)
                .and_then(|image| self.canvas.apply_image(image))
                .map(|_| {
                    info!("Committed {}", variation.id);
                }),
            None => {
                info!("Committed original, canvas unchanged");
                Ok(())
            }
        };

        self.canvas.remove_elements(&state.mask_element_ids);
        if let Some(preview) = &state.preview_element_id {
            self.canvas.remove_elements(std::slice::from_ref(preview));
        }

        match applied {
            Ok(()) => {
                self.context.update(WorkflowState::finish_commit);
                Ok(())
            }
            Err(e) => {
                error!("Failed to apply selected variation: {}", e);
                self.context.update(WorkflowState::discard);
                Err(e)
            }
        }
    }

    fn build_params(&self, state: &WorkflowState) -> Result<InpaintParams> {
        let base = self.canvas.export_base()?;
        let mask = self.canvas.export_mask(&state.mask_element_ids)?;

        Ok(InpaintParams {
            model: state.model,
            prompt: state.prompt.clone(),
            mode: state.mode,
            base_image: canvas_to_base64(&base)?,
            mask_image: canvas_to_base64(&mask)?,
            count: u32::from(state.image_count.get()),
        })
    }
}
