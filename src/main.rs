// nanobanana - headless host for the Gemini inpainting workflow

use anyhow::{bail, Context, Result};
use clap::Parser;
use nanobanana::canvas::{decode_variation, RasterCanvas};
use nanobanana::cli::Args;
use nanobanana::config::AppConfig;
use nanobanana::gemini::GeminiClient;
use nanobanana::utils::logging;
use nanobanana::workflow::{ImageCount, Status, WorkflowContext, WorkflowHost, WorkflowState};
use std::path::Path;
use tracing::{info, warn};

const MASK_ELEMENT_ID: &str = "mask-stroke-1";

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let config = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    if args.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting nanobanana v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Build the canvas from the input images
    let (Some(base_path), Some(mask_path)) = (&args.base, &args.mask) else {
        bail!("--base and --mask are required");
    };
    let canvas = load_canvas(base_path, mask_path)?;

    // Phase 4: Seed the shared record the way the prompt bar would
    let mut client = GeminiClient::new(&config.gemini)?;
    if let Some(key) = &args.api_key {
        client = client.with_api_key(key.clone());
    }

    let mut state = WorkflowState::new(&config.workflow)
        .with_prompt(args.prompt.clone())
        .with_mask_elements(vec![MASK_ELEMENT_ID.to_string()]);
    if let Some(mode) = args.mode {
        state = state.with_mode(mode);
    }
    if let Some(model) = args.model {
        state = state.with_model(model);
    }
    if let Some(count) = args.count {
        state = state.with_image_count(ImageCount::new(count));
    }

    let context = WorkflowContext::new(state);
    if !context.update(WorkflowState::start_generation) {
        bail!("Nothing to generate: the prompt is empty");
    }

    // Phase 5: Generate and write every variation
    let mut host = WorkflowHost::new(client, context.clone(), canvas);
    host.step().await;

    if context.status() != Status::Reviewing {
        bail!(
            "Generation failed: {}",
            host.last_error().unwrap_or("unknown error")
        );
    }
    if let Some(err) = host.last_error() {
        warn!("Batch stopped early, reviewing partial results: {}", err);
    }

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    let snapshot = context.snapshot();
    for (i, variation) in snapshot.variations().iter().enumerate() {
        let path = args.out_dir.join(format!("variation-{}.png", i + 1));
        decode_variation(variation)?
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Wrote {}", path.display());
    }

    // Phase 6: Commit the chosen entry, or discard
    match args.select {
        Some(index) => {
            context.update(|s| s.select_variation(index));
            if context.snapshot().selected_variation_index() != index {
                warn!("No entry {}, committing the original", index);
            }
            context.update(WorkflowState::save);
            host.handle_committing()
                .context("Selected variation was not applied, review discarded")?;

            let path = args.out_dir.join("committed.png");
            host.canvas()
                .image()
                .save(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => {
            context.update(WorkflowState::discard);
            info!("No selection given, discarded the review");
        }
    }

    Ok(())
}

/// Base image plus the mask as a single stroke (nonzero luma = masked).
fn load_canvas(base_path: &Path, mask_path: &Path) -> Result<RasterCanvas> {
    let base = image::open(base_path)
        .with_context(|| format!("reading {}", base_path.display()))?
        .into_rgba8();
    let mask = image::open(mask_path)
        .with_context(|| format!("reading {}", mask_path.display()))?
        .into_luma8();

    let mut canvas = RasterCanvas::new(base);
    let (w, h) = canvas.image().dimensions();
    let mask = if mask.dimensions() == (w, h) {
        mask
    } else {
        warn!("Mask is {:?}, resizing to {:?}", mask.dimensions(), (w, h));
        image::imageops::resize(&mask, w, h, image::imageops::FilterType::Nearest)
    };
    canvas.add_stroke(MASK_ELEMENT_ID, mask)?;
    Ok(canvas)
}
