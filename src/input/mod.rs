//! Raw pointer events delivered by the host shell and the gesture actions
//! they classify into. Positions are screen-space; the session converts to
//! logical space before any tool sees them.

mod gesture;

pub use gesture::{GestureClassifier, DOUBLE_TAP_WINDOW_MS, TAP_SLOP_PX};

use crate::geometry::CanvasPoint;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down {
        pointer: u64,
        position: CanvasPoint,
        time_ms: u64,
    },
    Move {
        pointer: u64,
        position: CanvasPoint,
        time_ms: u64,
    },
    Up {
        pointer: u64,
        position: CanvasPoint,
        time_ms: u64,
    },
    Wheel {
        position: CanvasPoint,
        notches: f32,
    },
}

/// Classified gesture output, consumed in order by the editor session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureAction {
    ToolDown(CanvasPoint),
    ToolMove(CanvasPoint),
    ToolUp(CanvasPoint),
    Pinch {
        previous_distance: f32,
        distance: f32,
        previous_midpoint: CanvasPoint,
        midpoint: CanvasPoint,
    },
    DoubleTap,
    Wheel {
        position: CanvasPoint,
        notches: f32,
    },
}
