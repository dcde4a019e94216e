mod brush;
mod crop;
mod cutout;
mod operations;
mod query;
mod selection;
mod shape;

pub use brush::{
    ActiveStroke, BrushOptions, BrushTexture, CompositeMode, Stroke, MAX_BRUSH_WIDTH,
    MIN_BRUSH_WIDTH,
};
pub use crop::{CropArea, MIN_DRAG_SIZE};
pub use cutout::{CutoutPath, CUTOUT_MIN_SIZE};
pub use selection::{handle_positions, SelectionHandle, ROTATE_HANDLE_OFFSET};
pub(crate) use selection::translate_clamped;
pub use shape::{ShapeElement, ShapeKind, ShapeStyle, ShapeTransform};

use thiserror::Error;

use crate::geometry::{CanvasPoint, CanvasVec, Color};

/// The active tool mode. Exactly one mode is armed at a time; transitions
/// are explicit toolbar selections except the two automatic returns
/// (cutout completion → `Select`, crop confirmation → `Draw`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Draw,
    Erase,
    Pan,
    Rectangle,
    Circle,
    Select,
    Crop,
    Cutout,
}

impl ToolKind {
    pub const ALL: [ToolKind; 8] = [
        Self::Draw,
        Self::Erase,
        Self::Pan,
        Self::Rectangle,
        Self::Circle,
        Self::Select,
        Self::Crop,
        Self::Cutout,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Draw => "Draw",
            Self::Erase => "Erase",
            Self::Pan => "Pan",
            Self::Rectangle => "Rectangle",
            Self::Circle => "Circle",
            Self::Select => "Select",
            Self::Crop => "Crop",
            Self::Cutout => "Cutout",
        }
    }

    /// Which option controls a toolbar shows for this mode.
    pub const fn shows_brush_options(self) -> bool {
        matches!(self, Self::Draw | Self::Erase)
    }

    pub const fn shows_shape_style(self) -> bool {
        matches!(self, Self::Rectangle | Self::Circle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("shape #{0} not found")]
    ShapeNotFound(u64),
    #[error("shape #{0} is not a text shape")]
    NotATextShape(u64),
    #[error("sticker #{0} not found")]
    StickerNotFound(u64),
}

/// One pointer position in both coordinate systems. Tools store logical
/// points; panning works on the raw screen position so the feedback loop
/// through the transform never distorts the drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub logical: CanvasPoint,
    pub screen: CanvasPoint,
}

/// What a pointer phase did, for the session to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    None,
    PanBy(CanvasVec),
    StrokeCommitted(u64),
    ShapeAdded(u64),
    SelectionChanged(Option<u64>),
    CropDefined(CropArea),
    CutoutComplete(CutoutPath),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SelectDrag {
    Move { last: CanvasPoint },
    Scale { handle: SelectionHandle },
    Rotate { last: CanvasPoint },
}

/// Per-mode pointer behavior plus the sticky tool options. The single
/// active-mode register is what keeps two destructive operations from ever
/// overlapping.
#[derive(Debug, Clone)]
pub struct ToolController {
    active: ToolKind,
    brush: BrushOptions,
    shape_style: ShapeStyle,
    text_size: f32,
    active_stroke: Option<ActiveStroke>,
    drag_anchor: Option<CanvasPoint>,
    last_point: Option<CanvasPoint>,
    cutout: Option<CutoutPath>,
    crop: Option<CropArea>,
    selected: Option<u64>,
    drag: Option<SelectDrag>,
    pan_last: Option<CanvasPoint>,
}

impl Default for ToolController {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolController {
    pub fn new() -> Self {
        Self {
            active: ToolKind::Draw,
            brush: BrushOptions::default(),
            shape_style: ShapeStyle::default(),
            text_size: 18.0,
            active_stroke: None,
            drag_anchor: None,
            last_point: None,
            cutout: None,
            crop: None,
            selected: None,
            drag: None,
            pan_last: None,
        }
    }

    /// Arms a tool mode, dropping any transient gesture state. A pending
    /// crop area is treated as cancelled when the user moves off the crop
    /// tool without confirming.
    pub fn set_active(&mut self, tool: ToolKind) {
        if self.active == ToolKind::Crop && tool != ToolKind::Crop && self.crop.is_some() {
            tracing::debug!("leaving crop tool discards the pending crop area");
            self.crop = None;
        }
        self.active = tool;
        self.active_stroke = None;
        self.drag_anchor = None;
        self.last_point = None;
        self.cutout = None;
        self.drag = None;
        self.pan_last = None;
        if tool != ToolKind::Select {
            self.selected = None;
        }
    }

    pub const fn active(&self) -> ToolKind {
        self.active
    }

    pub const fn brush_options(&self) -> BrushOptions {
        self.brush
    }

    pub const fn shape_style(&self) -> ShapeStyle {
        self.shape_style
    }

    pub const fn text_size(&self) -> f32 {
        self.text_size
    }

    pub fn set_brush_color(&mut self, color: Color) {
        self.brush.set_color(color);
    }

    pub fn set_brush_width(&mut self, width: f32) {
        self.brush.set_width(width);
    }

    pub fn set_brush_texture(&mut self, texture: BrushTexture) {
        self.brush.set_texture(texture);
    }

    pub fn set_shape_fill(&mut self, fill: Option<Color>) {
        self.shape_style.set_fill(fill);
    }

    pub fn set_text_size(&mut self, size: f32) {
        self.text_size = size.clamp(4.0, 200.0);
    }

    /// One call updates the stroke color everywhere it is sticky: the brush
    /// and the shape outline.
    pub fn set_shared_stroke_color(&mut self, color: Color) {
        self.brush.set_color(color);
        self.shape_style.set_stroke_color(color);
    }

    pub fn set_shared_stroke_width(&mut self, width: f32) {
        self.brush.set_width(width);
        self.shape_style.set_stroke_width(width);
    }

    pub(crate) fn set_selected(&mut self, selected: Option<u64>) {
        self.selected = selected;
    }

    pub(crate) fn clear_crop(&mut self) {
        self.crop = None;
    }

    pub(crate) fn take_crop(&mut self) -> Option<CropArea> {
        self.crop.take()
    }
}
