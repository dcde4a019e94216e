//! Flattening the annotation layers to an ink-only image and PNG encoding.
//! The base photo is never included; the output is the markup alone on a
//! transparent background, sized by the export density.

use std::io::Cursor;

use ab_glyph::FontArc;
use image::{DynamicImage, ImageFormat, RgbaImage};
use thiserror::Error;
use tracing::info;

use crate::editor::model::DrawingModel;
use crate::render::compose_annotations;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode markup image: {0}")]
    Encode(#[from] image::ImageError),
    #[error("canvas has zero area, nothing to export")]
    EmptyCanvas,
}

/// Rasterizes every committed stroke and shape at `pixels_per_unit`.
/// Eraser strokes have already carved the ink layer; shapes sit on top
/// untouched by them.
pub fn flatten(
    model: &DrawingModel,
    canvas_width: f32,
    canvas_height: f32,
    pixels_per_unit: f32,
    font: Option<&FontArc>,
) -> Result<RgbaImage, ExportError> {
    let scale = pixels_per_unit.max(0.1);
    let width_px = (canvas_width * scale).round() as u32;
    let height_px = (canvas_height * scale).round() as u32;
    if width_px == 0 || height_px == 0 {
        return Err(ExportError::EmptyCanvas);
    }
    Ok(compose_annotations(
        model, None, width_px, height_px, scale, font,
    ))
}

/// PNG-encodes a flattened markup image.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image.clone()).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    info!(bytes = bytes.len(), width = image.width(), height = image.height(), "markup encoded");
    Ok(bytes)
}
