use crate::geometry::{CanvasPoint, CanvasRect};

/// Minimum edge for a drag to count as an intentional shape, crop or
/// selection rather than an accidental tap.
pub const MIN_DRAG_SIZE: f32 = 5.0;

/// A pending crop rectangle in logical space. Survives pointer-up and stays
/// until the user confirms or cancels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropArea {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropArea {
    /// Builds the area from a drag, clamped to the canvas. Degenerate drags
    /// yield `None` and are silently discarded upstream.
    pub fn from_drag(
        start: CanvasPoint,
        end: CanvasPoint,
        canvas_width: f32,
        canvas_height: f32,
    ) -> Option<Self> {
        let canvas = CanvasRect::new(0.0, 0.0, canvas_width, canvas_height);
        let dragged = CanvasRect::from_corners(start, end);
        let bounded = dragged.intersect(&canvas)?;
        if bounded.width < MIN_DRAG_SIZE || bounded.height < MIN_DRAG_SIZE {
            return None;
        }
        Some(Self {
            x: bounded.x,
            y: bounded.y,
            width: bounded.width,
            height: bounded.height,
        })
    }

    pub const fn rect(&self) -> CanvasRect {
        CanvasRect::new(self.x, self.y, self.width, self.height)
    }
}
