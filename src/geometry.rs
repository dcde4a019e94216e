//! Shared geometric and color primitives used across viewport, tool and
//! pipeline modules. All canvas coordinates are logical-space `f32`.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasPoint {
    pub x: f32,
    pub y: f32,
}

impl CanvasPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Self) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasVec {
    pub x: f32,
    pub y: f32,
}

impl CanvasVec {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl std::ops::Sub for CanvasPoint {
    type Output = CanvasVec;

    fn sub(self, rhs: Self) -> CanvasVec {
        CanvasVec::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add<CanvasVec> for CanvasPoint {
    type Output = CanvasPoint;

    fn add(self, rhs: CanvasVec) -> CanvasPoint {
        CanvasPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub<CanvasVec> for CanvasPoint {
    type Output = CanvasPoint;

    fn sub(self, rhs: CanvasVec) -> CanvasPoint {
        CanvasPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add for CanvasVec {
    type Output = CanvasVec;

    fn add(self, rhs: Self) -> CanvasVec {
        CanvasVec::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for CanvasVec {
    type Output = CanvasVec;

    fn sub(self, rhs: Self) -> CanvasVec {
        CanvasVec::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for CanvasVec {
    type Output = CanvasVec;

    fn mul(self, rhs: f32) -> CanvasVec {
        CanvasVec::new(self.x * rhs, self.y * rhs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CanvasRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalized rectangle spanning two drag corners, in any drag direction.
    pub fn from_corners(a: CanvasPoint, b: CanvasPoint) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    pub fn contains(&self, point: CanvasPoint) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn center(&self) -> CanvasPoint {
        CanvasPoint::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn expanded(&self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            (self.width + margin * 2.0).max(0.0),
            (self.height + margin * 2.0).max(0.0),
        )
    }

    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (self.x + self.width).min(other.x + other.width);
        let bottom = (self.y + self.height).min(other.y + other.height);
        if right <= left || bottom <= top {
            return None;
        }
        Some(Self::new(left, top, right - left, bottom - top))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn rgba(self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }
}

/// Axis-aligned bounding box of a point run. `None` for an empty run.
pub fn path_bounds(points: &[CanvasPoint]) -> Option<CanvasRect> {
    let first = points.first()?;
    let mut min_x = first.x;
    let mut max_x = first.x;
    let mut min_y = first.y;
    let mut max_y = first.y;
    for point in &points[1..] {
        min_x = min_x.min(point.x);
        max_x = max_x.max(point.x);
        min_y = min_y.min(point.y);
        max_y = max_y.max(point.y);
    }
    Some(CanvasRect::new(min_x, min_y, max_x - min_x, max_y - min_y))
}

/// Even-odd test against the implicitly closed polygon through `path`.
pub fn point_in_path(point: CanvasPoint, path: &[CanvasPoint]) -> bool {
    if path.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = path.len() - 1;
    for i in 0..path.len() {
        let a = path[i];
        let b = path[j];
        let crosses = (a.y > point.y) != (b.y > point.y);
        if crosses {
            let intersect_x = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if point.x < intersect_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Distance from a point to the segment `a..b`, used for stroke hit testing.
pub fn distance_to_segment(point: CanvasPoint, a: CanvasPoint, b: CanvasPoint) -> f32 {
    let segment = b - a;
    let to_point = point - a;
    let len_sq = segment.x * segment.x + segment.y * segment.y;
    if len_sq <= f32::EPSILON {
        return to_point.length();
    }
    let t = ((to_point.x * segment.x + to_point.y * segment.y) / len_sq).clamp(0.0, 1.0);
    let projection = a + segment * t;
    (point - projection).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_from_corners_normalizes_any_drag_direction() {
        let rect =
            CanvasRect::from_corners(CanvasPoint::new(30.0, 40.0), CanvasPoint::new(12.0, 8.0));
        assert_eq!(rect, CanvasRect::new(12.0, 8.0, 18.0, 32.0));
    }

    #[test]
    fn path_bounds_covers_all_points() {
        let bounds = path_bounds(&[
            CanvasPoint::new(5.0, 9.0),
            CanvasPoint::new(-2.0, 3.0),
            CanvasPoint::new(7.0, 4.0),
        ])
        .expect("non-empty path should have bounds");
        assert_eq!(bounds, CanvasRect::new(-2.0, 3.0, 9.0, 6.0));
        assert!(path_bounds(&[]).is_none());
    }

    #[test]
    fn point_in_path_handles_square_and_concave_paths() {
        let square = [
            CanvasPoint::new(0.0, 0.0),
            CanvasPoint::new(10.0, 0.0),
            CanvasPoint::new(10.0, 10.0),
            CanvasPoint::new(0.0, 10.0),
        ];
        assert!(point_in_path(CanvasPoint::new(5.0, 5.0), &square));
        assert!(!point_in_path(CanvasPoint::new(15.0, 5.0), &square));

        // L-shape: the notch at the upper right is outside.
        let concave = [
            CanvasPoint::new(0.0, 0.0),
            CanvasPoint::new(4.0, 0.0),
            CanvasPoint::new(4.0, 6.0),
            CanvasPoint::new(8.0, 6.0),
            CanvasPoint::new(8.0, 10.0),
            CanvasPoint::new(0.0, 10.0),
        ];
        assert!(point_in_path(CanvasPoint::new(2.0, 5.0), &concave));
        assert!(point_in_path(CanvasPoint::new(6.0, 8.0), &concave));
        assert!(!point_in_path(CanvasPoint::new(6.0, 2.0), &concave));
    }

    #[test]
    fn point_in_path_rejects_degenerate_paths() {
        let line = [CanvasPoint::new(0.0, 0.0), CanvasPoint::new(10.0, 10.0)];
        assert!(!point_in_path(CanvasPoint::new(5.0, 5.0), &line));
    }

    #[test]
    fn distance_to_segment_projects_and_clamps() {
        let a = CanvasPoint::new(0.0, 0.0);
        let b = CanvasPoint::new(10.0, 0.0);
        assert!((distance_to_segment(CanvasPoint::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-6);
        assert!((distance_to_segment(CanvasPoint::new(-4.0, 0.0), a, b) - 4.0).abs() < 1e-6);
        assert!((distance_to_segment(CanvasPoint::new(2.0, 0.0), a, a) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn rect_intersect_returns_overlap_or_none() {
        let a = CanvasRect::new(0.0, 0.0, 10.0, 10.0);
        let b = CanvasRect::new(6.0, 4.0, 10.0, 10.0);
        assert_eq!(a.intersect(&b), Some(CanvasRect::new(6.0, 4.0, 4.0, 6.0)));
        let apart = CanvasRect::new(20.0, 20.0, 5.0, 5.0);
        assert!(a.intersect(&apart).is_none());
    }
}
