//! Read-only views of in-progress tool state, mostly for the renderer.

use crate::geometry::CanvasRect;

use super::brush::ActiveStroke;
use super::crop::CropArea;
use super::cutout::CutoutPath;
use super::{ToolController, ToolKind};

impl ToolController {
    pub const fn selected_shape(&self) -> Option<u64> {
        self.selected
    }

    pub const fn crop_area(&self) -> Option<CropArea> {
        self.crop
    }

    pub fn active_stroke(&self) -> Option<&ActiveStroke> {
        self.active_stroke.as_ref()
    }

    pub fn stroke_in_progress(&self) -> bool {
        self.active_stroke.is_some()
    }

    pub fn cutout_preview(&self) -> Option<&CutoutPath> {
        self.cutout.as_ref()
    }

    /// The live rubber-band rectangle while a rectangle, circle or crop drag
    /// is underway.
    pub fn drag_preview(&self) -> Option<CanvasRect> {
        if !matches!(
            self.active,
            ToolKind::Rectangle | ToolKind::Circle | ToolKind::Crop
        ) {
            return None;
        }
        let anchor = self.drag_anchor?;
        let current = self.last_point?;
        Some(CanvasRect::from_corners(anchor, current))
    }
}
