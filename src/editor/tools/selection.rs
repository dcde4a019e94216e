use crate::geometry::{CanvasPoint, CanvasVec};

use super::shape::ShapeElement;

/// Distance from the transformed top edge midpoint to the rotate knob,
/// in logical units.
pub const ROTATE_HANDLE_OFFSET: f32 = 24.0;

/// Grab points drawn around the selected shape. The four corners scale,
/// the detached knob above the top edge rotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionHandle {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    Rotate,
}

/// Canvas-space positions of all five handles for the given shape.
pub fn handle_positions(shape: &ShapeElement) -> [(SelectionHandle, CanvasPoint); 5] {
    let corners = shape.corners();
    let top_mid = corners[0].midpoint(corners[1]);
    let (sin, cos) = shape.transform.rotation.sin_cos();
    let rotate_knob = CanvasPoint::new(
        top_mid.x + sin * ROTATE_HANDLE_OFFSET,
        top_mid.y - cos * ROTATE_HANDLE_OFFSET,
    );
    [
        (SelectionHandle::TopLeft, corners[0]),
        (SelectionHandle::TopRight, corners[1]),
        (SelectionHandle::BottomRight, corners[2]),
        (SelectionHandle::BottomLeft, corners[3]),
        (SelectionHandle::Rotate, rotate_knob),
    ]
}

/// The handle under `point`, if any. Handles win over the shape body, so
/// this runs before the body hit test.
pub(crate) fn handle_at(
    shape: &ShapeElement,
    point: CanvasPoint,
    radius: f32,
) -> Option<SelectionHandle> {
    handle_positions(shape)
        .into_iter()
        .find(|(_, position)| position.distance_to(point) <= radius)
        .map(|(handle, _)| handle)
}

/// Rest position of a corner handle in shape-local space.
fn corner_local(shape: &ShapeElement, handle: SelectionHandle) -> Option<CanvasVec> {
    let (width, height) = shape.kind.local_size();
    let half_w = width * 0.5;
    let half_h = height * 0.5;
    match handle {
        SelectionHandle::TopLeft => Some(CanvasVec::new(-half_w, -half_h)),
        SelectionHandle::TopRight => Some(CanvasVec::new(half_w, -half_h)),
        SelectionHandle::BottomRight => Some(CanvasVec::new(half_w, half_h)),
        SelectionHandle::BottomLeft => Some(CanvasVec::new(-half_w, half_h)),
        SelectionHandle::Rotate => None,
    }
}

/// Scales the shape so the dragged corner tracks the pointer. The update is
/// incremental per pointer-move; mirroring through the center is clamped
/// away rather than flipping the shape.
pub(crate) fn apply_scale_drag(shape: &mut ShapeElement, handle: SelectionHandle, point: CanvasPoint) {
    let Some(rest) = corner_local(shape, handle) else {
        return;
    };
    if rest.x.abs() <= f32::EPSILON || rest.y.abs() <= f32::EPSILON {
        return;
    }
    let local = shape.transform.unapply(point, shape.center());
    let factor_x = (local.x / rest.x).max(0.05);
    let factor_y = (local.y / rest.y).max(0.05);
    shape.scale_by(factor_x, factor_y);
}

/// Rotates the shape by the angle swept about its center since the last
/// pointer position.
pub(crate) fn apply_rotate_drag(shape: &mut ShapeElement, last: CanvasPoint, point: CanvasPoint) {
    let center = shape.center();
    let before = (last.y - center.y).atan2(last.x - center.x);
    let after = (point.y - center.y).atan2(point.x - center.x);
    let delta = after - before;
    if delta.is_finite() {
        shape.rotate_by(delta);
    }
}

/// Moves the shape, keeping its center inside the canvas so a drag can
/// never strand it out of reach.
pub(crate) fn translate_clamped(
    shape: &mut ShapeElement,
    delta: CanvasVec,
    canvas_width: f32,
    canvas_height: f32,
) {
    shape.translate(delta);
    let center = shape.center();
    let clamped_x = center.x.clamp(0.0, canvas_width);
    let clamped_y = center.y.clamp(0.0, canvas_height);
    shape.translate(CanvasVec::new(clamped_x - center.x, clamped_y - center.y));
}
