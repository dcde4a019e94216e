//! Destructive raster pipelines: lasso cutout extraction and rectangular
//! crop. Both map logical-space geometry onto the base image's pixel grid.

mod crop;
mod cutout;

pub use crop::{apply_crop, CropExtraction};
pub use cutout::{extract_sticker, CutoutExtraction};
