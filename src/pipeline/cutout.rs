use image::RgbaImage;
use tracing::debug;

use crate::editor::tools::{CutoutPath, CUTOUT_MIN_SIZE};
use crate::geometry::{point_in_path, CanvasPoint, CanvasRect};

/// A sticker clipped out of the base image, plus where it was clipped from
/// so it can be placed back at the same spot.
#[derive(Debug, Clone)]
pub struct CutoutExtraction {
    pub bitmap: RgbaImage,
    pub placement: CanvasRect,
}

/// Clips the closed lasso path out of the base image. Pixels outside the
/// path become fully transparent. Returns `None` when the part of the path
/// that lies on the canvas is below the sticker minimum.
pub fn extract_sticker(
    path: &CutoutPath,
    base: &RgbaImage,
    canvas_width: f32,
    canvas_height: f32,
) -> Option<CutoutExtraction> {
    let bounds = path
        .bounds()?
        .intersect(&CanvasRect::new(0.0, 0.0, canvas_width, canvas_height))?;
    // The minimum applies to the on-canvas region, not the raw path box.
    if bounds.width < CUTOUT_MIN_SIZE || bounds.height < CUTOUT_MIN_SIZE {
        debug!("cutout below minimum size, no sticker produced");
        return None;
    }

    let scale_x = base.width() as f32 / canvas_width;
    let scale_y = base.height() as f32 / canvas_height;
    let x0 = (bounds.x * scale_x).floor().max(0.0) as u32;
    let y0 = (bounds.y * scale_y).floor().max(0.0) as u32;
    let x1 = (((bounds.x + bounds.width) * scale_x).ceil() as u32).min(base.width());
    let y1 = (((bounds.y + bounds.height) * scale_y).ceil() as u32).min(base.height());
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    let mut bitmap = RgbaImage::new(x1 - x0, y1 - y0);
    for py in y0..y1 {
        for px in x0..x1 {
            let sample = CanvasPoint::new(
                (px as f32 + 0.5) / scale_x,
                (py as f32 + 0.5) / scale_y,
            );
            if point_in_path(sample, path.points()) {
                bitmap.put_pixel(px - x0, py - y0, *base.get_pixel(px, py));
            }
        }
    }
    debug!(
        width = bitmap.width(),
        height = bitmap.height(),
        "sticker extracted from cutout path"
    );
    Some(CutoutExtraction {
        bitmap,
        placement: bounds,
    })
}
