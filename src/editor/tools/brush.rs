use crate::geometry::{path_bounds, CanvasPoint, CanvasRect, Color};

/// Ink texture applied when a stroke is rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushTexture {
    Solid,
    Soft,
    Spray,
    Marker,
    Pencil,
}

impl BrushTexture {
    pub const ALL: [BrushTexture; 5] = [
        Self::Solid,
        Self::Soft,
        Self::Spray,
        Self::Marker,
        Self::Pencil,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Solid => "Solid",
            Self::Soft => "Soft",
            Self::Spray => "Spray",
            Self::Marker => "Marker",
            Self::Pencil => "Pencil",
        }
    }
}

/// How a stroke combines with the ink beneath it in the same pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeMode {
    DrawOver,
    Subtract,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushOptions {
    pub color: Color,
    pub width: f32,
    pub texture: BrushTexture,
}

impl Default for BrushOptions {
    fn default() -> Self {
        Self {
            color: Color::opaque(0, 0, 0),
            width: 4.0,
            texture: BrushTexture::Solid,
        }
    }
}

impl BrushOptions {
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width.clamp(MIN_BRUSH_WIDTH, MAX_BRUSH_WIDTH);
    }

    pub fn set_texture(&mut self, texture: BrushTexture) {
        self.texture = texture;
    }
}

pub const MIN_BRUSH_WIDTH: f32 = 0.5;
pub const MAX_BRUSH_WIDTH: f32 = 200.0;

/// A committed free-hand stroke. Immutable once built; edits happen only by
/// undo/redo at stroke granularity. Width is logical-space, independent of
/// the zoom it was drawn at.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    id: u64,
    points: Vec<CanvasPoint>,
    color: Color,
    width: f32,
    texture: BrushTexture,
    eraser: bool,
}

impl Stroke {
    pub const fn id(&self) -> u64 {
        self.id
    }

    pub fn points(&self) -> &[CanvasPoint] {
        &self.points
    }

    pub const fn color(&self) -> Color {
        self.color
    }

    pub const fn width(&self) -> f32 {
        self.width
    }

    pub const fn texture(&self) -> BrushTexture {
        self.texture
    }

    pub const fn is_eraser(&self) -> bool {
        self.eraser
    }

    pub const fn composite(&self) -> CompositeMode {
        if self.eraser {
            CompositeMode::Subtract
        } else {
            CompositeMode::DrawOver
        }
    }

    pub fn bounds(&self) -> Option<CanvasRect> {
        path_bounds(&self.points).map(|rect| rect.expanded(self.width * 0.5))
    }
}

/// The single mutable in-progress stroke, open between pointer-down and
/// pointer-up. Committing turns it into an immutable [`Stroke`].
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveStroke {
    points: Vec<CanvasPoint>,
    color: Color,
    width: f32,
    texture: BrushTexture,
    eraser: bool,
}

impl ActiveStroke {
    pub fn begin(first: CanvasPoint, options: BrushOptions, eraser: bool) -> Self {
        Self {
            points: vec![first],
            color: options.color,
            width: options.width,
            texture: options.texture,
            eraser,
        }
    }

    pub fn append(&mut self, point: CanvasPoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[CanvasPoint] {
        &self.points
    }

    pub const fn color(&self) -> Color {
        self.color
    }

    pub const fn width(&self) -> f32 {
        self.width
    }

    pub const fn texture(&self) -> BrushTexture {
        self.texture
    }

    pub const fn is_eraser(&self) -> bool {
        self.eraser
    }

    pub(crate) fn commit(self, id: u64) -> Stroke {
        Stroke {
            id,
            points: self.points,
            color: self.color,
            width: self.width,
            texture: self.texture,
            eraser: self.eraser,
        }
    }
}
