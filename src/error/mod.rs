//! Top-level error type aggregating the per-module failures.

use thiserror::Error;

use crate::editor::tools::ToolError;
use crate::editor::SinkError;
use crate::export::ExportError;
use crate::sticker::StickerError;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("failed to decode base image: {0}")]
    ImageDecode(#[from] image::ImageError),
    #[error("base image has zero width or height")]
    EmptyBaseImage,
    #[error("failed to load font: {0}")]
    FontLoad(#[from] ab_glyph::InvalidFont),
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error(transparent)]
    Sticker(#[from] StickerError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}
