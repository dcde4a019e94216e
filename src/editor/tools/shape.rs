use std::sync::Arc;

use image::RgbaImage;

use crate::geometry::{CanvasPoint, CanvasRect, CanvasVec, Color};

/// Affine transform applied about a shape's center. Identity by default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeTransform {
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Default for ShapeTransform {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl ShapeTransform {
    pub fn is_identity(&self) -> bool {
        self.rotation == 0.0 && self.scale_x == 1.0 && self.scale_y == 1.0
    }

    /// Maps a point from shape-local space (origin at the shape center) into
    /// canvas space around `center`.
    pub fn apply(&self, local: CanvasVec, center: CanvasPoint) -> CanvasPoint {
        let scaled_x = local.x * self.scale_x;
        let scaled_y = local.y * self.scale_y;
        let (sin, cos) = self.rotation.sin_cos();
        CanvasPoint::new(
            center.x + scaled_x * cos - scaled_y * sin,
            center.y + scaled_x * sin + scaled_y * cos,
        )
    }

    /// Inverse of [`apply`]: canvas point back into shape-local space.
    pub fn unapply(&self, point: CanvasPoint, center: CanvasPoint) -> CanvasVec {
        let dx = point.x - center.x;
        let dy = point.y - center.y;
        let (sin, cos) = self.rotation.sin_cos();
        let unrotated_x = dx * cos + dy * sin;
        let unrotated_y = -dx * sin + dy * cos;
        let sx = if self.scale_x.abs() <= f32::EPSILON {
            f32::EPSILON
        } else {
            self.scale_x
        };
        let sy = if self.scale_y.abs() <= f32::EPSILON {
            f32::EPSILON
        } else {
            self.scale_y
        };
        CanvasVec::new(unrotated_x / sx, unrotated_y / sy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub fill: Option<Color>,
    pub stroke_color: Color,
    pub stroke_width: f32,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke_color: Color::opaque(0, 0, 0),
            stroke_width: 3.0,
        }
    }
}

impl ShapeStyle {
    pub fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        self.stroke_width = width.clamp(0.5, 64.0);
    }

    pub fn set_fill(&mut self, fill: Option<Color>) {
        self.fill = fill;
    }
}

/// Type-specific geometry. A placed image always carries its bitmap; an
/// image shape without pixels is unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Rectangle {
        width: f32,
        height: f32,
    },
    Circle {
        radius: f32,
    },
    Text {
        content: String,
        size: f32,
    },
    Image {
        bitmap: Arc<RgbaImage>,
        width: f32,
        height: f32,
    },
}

impl ShapeKind {
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Rectangle { .. } => "rectangle",
            Self::Circle { .. } => "circle",
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
        }
    }

    /// Untransformed extents around the shape's local origin.
    pub fn local_size(&self) -> (f32, f32) {
        match self {
            Self::Rectangle { width, height } => (*width, *height),
            Self::Circle { radius } => (radius * 2.0, radius * 2.0),
            Self::Text { content, size } => text_extents(content, *size),
            Self::Image { width, height, .. } => (*width, *height),
        }
    }
}

/// Approximate text extents used for bounds and hit testing; rasterization
/// measures precisely with real font metrics.
pub(crate) fn text_extents(content: &str, size: f32) -> (f32, f32) {
    let size = size.max(1.0);
    let longest = content
        .split('\n')
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    let lines = content.split('\n').count().max(1);
    (
        (longest as f32 * size * 0.6).max(size * 0.5),
        lines as f32 * size * 1.3,
    )
}

/// A vector or placed-bitmap object. `x`/`y` is the top-left of the
/// untransformed extents; the transform pivots about the center.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeElement {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub kind: ShapeKind,
    pub style: ShapeStyle,
    pub transform: ShapeTransform,
}

impl ShapeElement {
    pub fn new(id: u64, x: f32, y: f32, kind: ShapeKind, style: ShapeStyle) -> Self {
        Self {
            id,
            x,
            y,
            kind,
            style,
            transform: ShapeTransform::default(),
        }
    }

    pub fn center(&self) -> CanvasPoint {
        let (width, height) = self.kind.local_size();
        CanvasPoint::new(self.x + width * 0.5, self.y + height * 0.5)
    }

    /// The four untransformed corners mapped through the transform.
    pub fn corners(&self) -> [CanvasPoint; 4] {
        let (width, height) = self.kind.local_size();
        let half_w = width * 0.5;
        let half_h = height * 0.5;
        let center = self.center();
        [
            self.transform.apply(CanvasVec::new(-half_w, -half_h), center),
            self.transform.apply(CanvasVec::new(half_w, -half_h), center),
            self.transform.apply(CanvasVec::new(half_w, half_h), center),
            self.transform.apply(CanvasVec::new(-half_w, half_h), center),
        ]
    }

    /// Axis-aligned bounds of the transformed shape, padded by the stroke.
    pub fn bounds(&self) -> CanvasRect {
        let corners = self.corners();
        let mut min_x = corners[0].x;
        let mut max_x = corners[0].x;
        let mut min_y = corners[0].y;
        let mut max_y = corners[0].y;
        for corner in &corners[1..] {
            min_x = min_x.min(corner.x);
            max_x = max_x.max(corner.x);
            min_y = min_y.min(corner.y);
            max_y = max_y.max(corner.y);
        }
        CanvasRect::new(min_x, min_y, max_x - min_x, max_y - min_y)
            .expanded(self.style.stroke_width * 0.5)
    }

    pub fn hit_test(&self, point: CanvasPoint) -> bool {
        let local = self.transform.unapply(point, self.center());
        let (width, height) = self.kind.local_size();
        let slop = self.style.stroke_width * 0.5 + 2.0;
        match &self.kind {
            ShapeKind::Circle { radius } => {
                CanvasVec::new(local.x, local.y).length() <= radius + slop
            }
            _ => {
                local.x.abs() <= width * 0.5 + slop && local.y.abs() <= height * 0.5 + slop
            }
        }
    }

    pub fn translate(&mut self, delta: CanvasVec) {
        self.x += delta.x;
        self.y += delta.y;
    }

    pub fn rotate_by(&mut self, radians: f32) {
        self.transform.rotation += radians;
    }

    pub fn scale_by(&mut self, factor_x: f32, factor_y: f32) {
        self.transform.scale_x = (self.transform.scale_x * factor_x).clamp(0.05, 40.0);
        self.transform.scale_y = (self.transform.scale_y * factor_y).clamp(0.05, 40.0);
    }
}
