//! Zoom/pan state and the screen ↔ logical coordinate transform.
//!
//! Every pointer coordinate consumed by a tool must pass through
//! [`Viewport::screen_to_logical`] before being stored or compared; points
//! already in logical space are never re-projected.

use crate::geometry::{CanvasPoint, CanvasVec};

pub const MAX_ZOOM: f32 = 5.0;
/// Pinch zoom gain per pixel of finger-distance change.
pub const PINCH_ZOOM_RATE: f32 = 0.01;
/// Multiplicative step per wheel notch, smaller than pinch for smoothness.
pub const WHEEL_ZOOM_STEP: f32 = 1.08;

/// Canvas size fitted into a container, preserving the source aspect ratio.
pub fn fit_canvas(
    image_width: u32,
    image_height: u32,
    container_width: f32,
    container_height: f32,
) -> (f32, f32) {
    let image_width = image_width.max(1) as f32;
    let image_height = image_height.max(1) as f32;
    let scale = (container_width / image_width)
        .min(container_height / image_height)
        .max(f32::MIN_POSITIVE);
    (image_width * scale, image_height * scale)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom: f32,
    pan: CanvasVec,
    canvas_width: f32,
    canvas_height: f32,
    min_zoom: f32,
}

impl Viewport {
    /// Derives the zoom floor once at load so the canvas can never be zoomed
    /// out smaller than the container it was fitted into.
    pub fn new(
        canvas_width: f32,
        canvas_height: f32,
        container_width: f32,
        container_height: f32,
    ) -> Self {
        let min_zoom = (container_width / canvas_width.max(1.0))
            .min(container_height / canvas_height.max(1.0))
            .min(1.0)
            .max(0.05);
        Self {
            zoom: 1.0,
            pan: CanvasVec::ZERO,
            canvas_width,
            canvas_height,
            min_zoom,
        }
    }

    pub const fn zoom(&self) -> f32 {
        self.zoom
    }

    pub const fn pan(&self) -> CanvasVec {
        self.pan
    }

    pub const fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    pub const fn canvas_size(&self) -> (f32, f32) {
        (self.canvas_width, self.canvas_height)
    }

    fn center(&self) -> CanvasPoint {
        CanvasPoint::new(self.canvas_width * 0.5, self.canvas_height * 0.5)
    }

    pub fn screen_to_logical(&self, point: CanvasPoint) -> CanvasPoint {
        let center = self.center();
        let shifted = point - self.pan;
        CanvasPoint::new(
            (shifted.x - center.x) / self.zoom + center.x,
            (shifted.y - center.y) / self.zoom + center.y,
        )
    }

    pub fn logical_to_screen(&self, point: CanvasPoint) -> CanvasPoint {
        let center = self.center();
        CanvasPoint::new(
            (point.x - center.x) * self.zoom + center.x,
            (point.y - center.y) * self.zoom + center.y,
        ) + self.pan
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(self.min_zoom, MAX_ZOOM);
    }

    pub fn pan_by(&mut self, delta: CanvasVec) {
        self.pan = self.pan + delta;
    }

    /// Double-tap-to-fit: identity zoom, origin pan.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan = CanvasVec::ZERO;
    }

    /// Rescales around a screen anchor so the logical point under the anchor
    /// stays visually fixed.
    pub fn zoom_about(&mut self, anchor: CanvasPoint, new_zoom: f32) {
        let pinned = self.screen_to_logical(anchor);
        self.set_zoom(new_zoom);
        let reprojected = self.logical_to_screen(pinned);
        self.pan = self.pan + (anchor - reprojected);
    }

    /// One frame of a two-finger pinch: zoom from the finger-distance delta
    /// anchored at the midpoint, then follow the midpoint's own travel.
    pub fn apply_pinch(
        &mut self,
        previous_distance: f32,
        distance: f32,
        previous_midpoint: CanvasPoint,
        midpoint: CanvasPoint,
    ) {
        let delta = 1.0 + (distance - previous_distance) * PINCH_ZOOM_RATE;
        self.zoom_about(midpoint, self.zoom * delta);
        self.pan = self.pan + (midpoint - previous_midpoint);
    }

    /// Wheel zoom anchored at the pointer, `notches` positive for zoom-in.
    pub fn apply_wheel(&mut self, anchor: CanvasPoint, notches: f32) {
        let factor = WHEEL_ZOOM_STEP.powf(notches);
        self.zoom_about(anchor, self.zoom * factor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn points_close(a: CanvasPoint, b: CanvasPoint) -> bool {
        close(a.x, b.x) && close(a.y, b.y)
    }

    #[test]
    fn fit_canvas_preserves_aspect_ratio() {
        let (w, h) = fit_canvas(400, 300, 800.0, 800.0);
        assert!(close(w, 800.0));
        assert!(close(h, 600.0));

        let (w, h) = fit_canvas(300, 400, 800.0, 400.0);
        assert!(close(w, 300.0));
        assert!(close(h, 400.0));
    }

    #[test]
    fn transform_round_trips_within_tolerance() {
        let mut viewport = Viewport::new(400.0, 300.0, 400.0, 300.0);
        viewport.set_zoom(2.5);
        viewport.pan_by(CanvasVec::new(37.0, -12.5));

        for point in [
            CanvasPoint::new(0.0, 0.0),
            CanvasPoint::new(123.4, 56.7),
            CanvasPoint::new(400.0, 300.0),
            CanvasPoint::new(-40.0, 512.0),
        ] {
            let round = viewport.logical_to_screen(viewport.screen_to_logical(point));
            assert!(
                points_close(round, point),
                "round trip drifted: {point:?} -> {round:?}"
            );
            let inverse = viewport.screen_to_logical(viewport.logical_to_screen(point));
            assert!(points_close(inverse, point));
        }
    }

    #[test]
    fn zoom_clamps_to_computed_floor_and_fixed_ceiling() {
        let mut viewport = Viewport::new(400.0, 300.0, 400.0, 300.0);
        viewport.set_zoom(80.0);
        assert!(close(viewport.zoom(), MAX_ZOOM));
        viewport.set_zoom(0.0001);
        assert!(close(viewport.zoom(), viewport.min_zoom()));
        assert!(viewport.min_zoom() <= 1.0);
    }

    #[test]
    fn zoom_about_keeps_the_anchored_point_stationary() {
        let mut viewport = Viewport::new(400.0, 300.0, 400.0, 300.0);
        let anchor = CanvasPoint::new(290.0, 80.0);
        let pinned = viewport.screen_to_logical(anchor);

        viewport.zoom_about(anchor, 3.0);
        assert!(points_close(viewport.logical_to_screen(pinned), anchor));
    }

    #[test]
    fn pinch_from_100_to_200_at_center_doubles_zoom() {
        let mut viewport = Viewport::new(400.0, 300.0, 400.0, 300.0);
        let center = CanvasPoint::new(200.0, 150.0);
        let logical_center = viewport.screen_to_logical(center);

        viewport.apply_pinch(100.0, 200.0, center, center);
        assert!(close(viewport.zoom(), 2.0));
        assert!(points_close(
            viewport.logical_to_screen(logical_center),
            center
        ));
    }

    #[test]
    fn pinch_midpoint_travel_pans_the_view() {
        let mut viewport = Viewport::new(400.0, 300.0, 400.0, 300.0);
        let from = CanvasPoint::new(200.0, 150.0);
        let to = CanvasPoint::new(230.0, 140.0);
        viewport.apply_pinch(120.0, 120.0, from, to);
        assert!(close(viewport.pan().x, 30.0));
        assert!(close(viewport.pan().y, -10.0));
        assert!(close(viewport.zoom(), 1.0));
    }

    #[test]
    fn reset_restores_identity_after_gestures() {
        let mut viewport = Viewport::new(400.0, 300.0, 400.0, 300.0);
        viewport.apply_wheel(CanvasPoint::new(10.0, 10.0), 4.0);
        viewport.pan_by(CanvasVec::new(-25.0, 60.0));
        assert!(viewport.zoom() > 1.0);

        viewport.reset();
        assert!(close(viewport.zoom(), 1.0));
        assert_eq!(viewport.pan(), CanvasVec::ZERO);
    }

    #[test]
    fn wheel_zoom_anchors_at_the_pointer() {
        let mut viewport = Viewport::new(400.0, 300.0, 400.0, 300.0);
        let anchor = CanvasPoint::new(50.0, 260.0);
        let pinned = viewport.screen_to_logical(anchor);
        viewport.apply_wheel(anchor, 3.0);
        assert!(viewport.zoom() > 1.0);
        assert!(points_close(viewport.logical_to_screen(pinned), anchor));
    }
}
