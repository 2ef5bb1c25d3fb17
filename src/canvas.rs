//! Raster side of the workflow: payload conversion and the canvas seam.
//!
//! The request function wants bare base64 PNG payloads and hands back
//! data URLs; this module converts in both directions and defines the
//! operations the host needs from a canvas.

use crate::error::{NanoBananaError, Result};
use crate::workflow::{ElementId, Variation};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::imageops::FilterType;
use image::{GrayImage, ImageOutputFormat, Rgba, RgbaImage};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::io::Cursor;
use tracing::{debug, warn};

static PNG_DATA_URL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:image/png;base64,").expect("static pattern"));

/// PNG-encode `image` as a `data:image/png;base64,` URL.
pub fn to_data_url(image: &RgbaImage) -> Result<String> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(bytes)))
}

/// Request payload for `image`: base64 PNG without the data-URL prefix.
pub fn canvas_to_base64(image: &RgbaImage) -> Result<String> {
    let data_url = to_data_url(image)?;
    Ok(strip_png_prefix(&data_url).to_string())
}

/// Removes a leading `data:image/png;base64,`; other input is returned as is.
pub fn strip_png_prefix(data_url: &str) -> &str {
    match PNG_DATA_URL_PREFIX.find(data_url) {
        Some(prefix) => &data_url[prefix.end()..],
        None => data_url,
    }
}

/// Splits `data:{mime};base64,{payload}` into the MIME type and decoded bytes.
pub fn decode_data_url(data_url: &str) -> Result<(String, Vec<u8>)> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| NanoBananaError::InvalidDataUrl("missing data: scheme".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| NanoBananaError::InvalidDataUrl("missing payload separator".to_string()))?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| NanoBananaError::InvalidDataUrl(format!("not base64 encoded: {}", meta)))?;

    let bytes = BASE64
        .decode(payload)
        .map_err(|e| NanoBananaError::Decode(format!("Invalid base64 image data: {}", e)))?;
    Ok((mime.to_string(), bytes))
}

/// Decodes a variation's data URL into pixels.
pub fn decode_variation(variation: &Variation) -> Result<RgbaImage> {
    let (mime, bytes) = decode_data_url(&variation.data_url)?;
    if !mime.starts_with("image/") {
        return Err(NanoBananaError::InvalidDataUrl(format!("not an image: {}", mime)));
    }
    Ok(image::load_from_memory(&bytes)?.into_rgba8())
}

/// What the host needs from the drawing surface.
pub trait CanvasSurface {
    /// Current canvas content, without mask strokes.
    fn export_base(&self) -> Result<RgbaImage>;

    /// Mask the size of the base: white where any of `elements` covers,
    /// black elsewhere.
    fn export_mask(&self, elements: &[ElementId]) -> Result<RgbaImage>;

    /// Replace the canvas content with `image`.
    fn apply_image(&mut self, image: RgbaImage) -> Result<()>;

    /// Drop the given elements (mask strokes, previews). Unknown ids are ignored.
    fn remove_elements(&mut self, elements: &[ElementId]);
}

/// In-memory canvas: one raster plus freehand mask strokes keyed by element id.
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    image: RgbaImage,
    strokes: BTreeMap<ElementId, GrayImage>,
}

impl RasterCanvas {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image,
            strokes: BTreeMap::new(),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn stroke_ids(&self) -> impl Iterator<Item = &ElementId> {
        self.strokes.keys()
    }

    /// Adds a stroke; nonzero pixels of `coverage` belong to it.
    pub fn add_stroke(&mut self, id: impl Into<ElementId>, coverage: GrayImage) -> Result<()> {
        if coverage.dimensions() != self.image.dimensions() {
            return Err(NanoBananaError::Canvas(format!(
                "stroke is {:?}, canvas is {:?}",
                coverage.dimensions(),
                self.image.dimensions()
            )));
        }
        self.strokes.insert(id.into(), coverage);
        Ok(())
    }
}

impl CanvasSurface for RasterCanvas {
    fn export_base(&self) -> Result<RgbaImage> {
        Ok(self.image.clone())
    }

    fn export_mask(&self, elements: &[ElementId]) -> Result<RgbaImage> {
        let (w, h) = self.image.dimensions();
        let mut mask = RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 255]));

        for id in elements {
            let Some(stroke) = self.strokes.get(id) else {
                warn!("Mask element {} is not on the canvas", id);
                continue;
            };
            for (x, y, coverage) in stroke.enumerate_pixels() {
                if coverage.0[0] > 0 {
                    mask.put_pixel(x, y, Rgba([255, 255, 255, 255]));
                }
            }
        }

        Ok(mask)
    }

    fn apply_image(&mut self, image: RgbaImage) -> Result<()> {
        let (w, h) = self.image.dimensions();
        self.image = if image.dimensions() == (w, h) {
            image
        } else {
            debug!(
                "Resizing generated image from {:?} to {:?}",
                image.dimensions(),
                (w, h)
            );
            image::imageops::resize(&image, w, h, FilterType::Lanczos3)
        };
        Ok(())
    }

    fn remove_elements(&mut self, elements: &[ElementId]) {
        for id in elements {
            self.strokes.remove(id);
        }
    }
}
