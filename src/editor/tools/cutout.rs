use crate::geometry::{path_bounds, CanvasPoint, CanvasRect};

/// Minimum bounding-box edge for a cutout path to produce a sticker.
pub const CUTOUT_MIN_SIZE: f32 = 10.0;

/// The transient closed polyline drawn in cutout mode. Every intermediate
/// pointer position is kept verbatim; the clip step closes the path
/// implicitly, so no resampling or simplification happens here.
#[derive(Debug, Clone, PartialEq)]
pub struct CutoutPath {
    points: Vec<CanvasPoint>,
}

impl CutoutPath {
    pub fn begin(first: CanvasPoint) -> Self {
        Self {
            points: vec![first],
        }
    }

    pub fn append(&mut self, point: CanvasPoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[CanvasPoint] {
        &self.points
    }

    pub fn bounds(&self) -> Option<CanvasRect> {
        path_bounds(&self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_keeps_every_appended_point_in_order() {
        let mut path = CutoutPath::begin(CanvasPoint::new(1.0, 2.0));
        path.append(CanvasPoint::new(3.0, 4.0));
        path.append(CanvasPoint::new(3.0, 4.0));
        assert_eq!(path.points().len(), 3);
        assert_eq!(path.points()[0], CanvasPoint::new(1.0, 2.0));
    }
}
