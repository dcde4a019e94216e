//! Disambiguates single-pointer tool input from two-pointer pinch and
//! double-tap, as an explicit state machine over
//! {idle, single-active, dual-active, awaiting-second-tap}.

use crate::geometry::CanvasPoint;
use crate::input::{GestureAction, PointerEvent};

pub const DOUBLE_TAP_WINDOW_MS: u64 = 300;
pub const TAP_SLOP_PX: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum GesturePhase {
    Idle,
    AwaitingSecondTap {
        deadline_ms: u64,
    },
    SingleActive {
        pointer: u64,
        pressed_at_ms: u64,
        origin: CanvasPoint,
        moved: bool,
        /// Set for the pointer consumed by a double-tap or left over from a
        /// pinch; its events are withheld from the active tool.
        suppressed: bool,
    },
    DualActive {
        first: u64,
        second: u64,
        first_position: CanvasPoint,
        second_position: CanvasPoint,
    },
}

#[derive(Debug)]
pub struct GestureClassifier {
    phase: GesturePhase,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self {
            phase: GesturePhase::Idle,
        }
    }

    /// Feeds one raw event through the state machine. `mid_stroke` reports
    /// whether a free-hand stroke or lasso path is currently open; while it
    /// is, a second pointer is ignored entirely instead of starting a pinch.
    pub fn classify(&mut self, event: PointerEvent, mid_stroke: bool) -> Vec<GestureAction> {
        match event {
            PointerEvent::Down {
                pointer,
                position,
                time_ms,
            } => self.on_down(pointer, position, time_ms, mid_stroke),
            PointerEvent::Move {
                pointer, position, ..
            } => self.on_move(pointer, position),
            PointerEvent::Up {
                pointer,
                position,
                time_ms,
            } => self.on_up(pointer, position, time_ms),
            PointerEvent::Wheel { position, notches } => {
                vec![GestureAction::Wheel { position, notches }]
            }
        }
    }

    fn on_down(
        &mut self,
        pointer: u64,
        position: CanvasPoint,
        time_ms: u64,
        mid_stroke: bool,
    ) -> Vec<GestureAction> {
        match self.phase {
            GesturePhase::Idle => {
                self.phase = GesturePhase::SingleActive {
                    pointer,
                    pressed_at_ms: time_ms,
                    origin: position,
                    moved: false,
                    suppressed: false,
                };
                vec![GestureAction::ToolDown(position)]
            }
            GesturePhase::AwaitingSecondTap { deadline_ms } => {
                if time_ms <= deadline_ms {
                    // The second tap is consumed by the zoom reset and never
                    // reaches the active tool.
                    self.phase = GesturePhase::SingleActive {
                        pointer,
                        pressed_at_ms: time_ms,
                        origin: position,
                        moved: false,
                        suppressed: true,
                    };
                    vec![GestureAction::DoubleTap]
                } else {
                    self.phase = GesturePhase::SingleActive {
                        pointer,
                        pressed_at_ms: time_ms,
                        origin: position,
                        moved: false,
                        suppressed: false,
                    };
                    vec![GestureAction::ToolDown(position)]
                }
            }
            GesturePhase::SingleActive {
                pointer: active,
                origin,
                suppressed,
                ..
            } => {
                if pointer == active || mid_stroke {
                    // Repeated down for the active pointer, or a second
                    // finger landing mid-stroke: silently ignored.
                    return Vec::new();
                }
                let mut actions = Vec::new();
                if !suppressed {
                    actions.push(GestureAction::ToolUp(origin));
                }
                self.phase = GesturePhase::DualActive {
                    first: active,
                    second: pointer,
                    first_position: origin,
                    second_position: position,
                };
                actions
            }
            GesturePhase::DualActive { .. } => Vec::new(),
        }
    }

    fn on_move(&mut self, pointer: u64, position: CanvasPoint) -> Vec<GestureAction> {
        match &mut self.phase {
            GesturePhase::SingleActive {
                pointer: active,
                origin,
                moved,
                suppressed,
                ..
            } => {
                if pointer != *active {
                    return Vec::new();
                }
                if origin.distance_to(position) > TAP_SLOP_PX {
                    *moved = true;
                }
                if *suppressed {
                    Vec::new()
                } else {
                    vec![GestureAction::ToolMove(position)]
                }
            }
            GesturePhase::DualActive {
                first,
                second,
                first_position,
                second_position,
            } => {
                let previous_distance = first_position.distance_to(*second_position);
                let previous_midpoint = first_position.midpoint(*second_position);
                if pointer == *first {
                    *first_position = position;
                } else if pointer == *second {
                    *second_position = position;
                } else {
                    return Vec::new();
                }
                let distance = first_position.distance_to(*second_position);
                let midpoint = first_position.midpoint(*second_position);
                vec![GestureAction::Pinch {
                    previous_distance,
                    distance,
                    previous_midpoint,
                    midpoint,
                }]
            }
            _ => Vec::new(),
        }
    }

    fn on_up(&mut self, pointer: u64, position: CanvasPoint, time_ms: u64) -> Vec<GestureAction> {
        match self.phase {
            GesturePhase::SingleActive {
                pointer: active,
                pressed_at_ms,
                moved,
                suppressed,
                ..
            } => {
                if pointer != active {
                    return Vec::new();
                }
                let tapped = !moved
                    && time_ms.saturating_sub(pressed_at_ms) <= DOUBLE_TAP_WINDOW_MS
                    && !suppressed;
                self.phase = if tapped {
                    GesturePhase::AwaitingSecondTap {
                        deadline_ms: time_ms + DOUBLE_TAP_WINDOW_MS,
                    }
                } else {
                    GesturePhase::Idle
                };
                if suppressed {
                    Vec::new()
                } else {
                    vec![GestureAction::ToolUp(position)]
                }
            }
            GesturePhase::DualActive {
                first,
                second,
                first_position,
                second_position,
            } => {
                let remaining = if pointer == first {
                    Some((second, second_position))
                } else if pointer == second {
                    Some((first, first_position))
                } else {
                    None
                };
                if let Some((pointer, origin)) = remaining {
                    // The finger left over from a pinch keeps panning state
                    // out of the tools until it lifts.
                    self.phase = GesturePhase::SingleActive {
                        pointer,
                        pressed_at_ms: time_ms,
                        origin,
                        moved: true,
                        suppressed: true,
                    };
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(pointer: u64, x: f32, y: f32, time_ms: u64) -> PointerEvent {
        PointerEvent::Down {
            pointer,
            position: CanvasPoint::new(x, y),
            time_ms,
        }
    }

    fn moved(pointer: u64, x: f32, y: f32, time_ms: u64) -> PointerEvent {
        PointerEvent::Move {
            pointer,
            position: CanvasPoint::new(x, y),
            time_ms,
        }
    }

    fn up(pointer: u64, x: f32, y: f32, time_ms: u64) -> PointerEvent {
        PointerEvent::Up {
            pointer,
            position: CanvasPoint::new(x, y),
            time_ms,
        }
    }

    #[test]
    fn single_pointer_drag_routes_down_move_up_to_the_tool() {
        let mut classifier = GestureClassifier::new();
        assert_eq!(
            classifier.classify(down(1, 10.0, 10.0, 0), false),
            vec![GestureAction::ToolDown(CanvasPoint::new(10.0, 10.0))]
        );
        assert_eq!(
            classifier.classify(moved(1, 40.0, 10.0, 16), false),
            vec![GestureAction::ToolMove(CanvasPoint::new(40.0, 10.0))]
        );
        assert_eq!(
            classifier.classify(up(1, 40.0, 10.0, 600), false),
            vec![GestureAction::ToolUp(CanvasPoint::new(40.0, 10.0))]
        );
    }

    #[test]
    fn second_pointer_promotes_to_pinch_and_reports_distances() {
        let mut classifier = GestureClassifier::new();
        classifier.classify(down(1, 100.0, 100.0, 0), false);
        let promoted = classifier.classify(down(2, 200.0, 100.0, 10), false);
        assert_eq!(
            promoted,
            vec![GestureAction::ToolUp(CanvasPoint::new(100.0, 100.0))]
        );

        let actions = classifier.classify(moved(2, 300.0, 100.0, 26), false);
        match actions.as_slice() {
            [GestureAction::Pinch {
                previous_distance,
                distance,
                previous_midpoint,
                midpoint,
            }] => {
                assert!((previous_distance - 100.0).abs() < 1e-3);
                assert!((distance - 200.0).abs() < 1e-3);
                assert!((previous_midpoint.x - 150.0).abs() < 1e-3);
                assert!((midpoint.x - 200.0).abs() < 1e-3);
            }
            other => panic!("expected a pinch action, got {other:?}"),
        }
    }

    #[test]
    fn second_pointer_is_ignored_while_a_stroke_is_open() {
        let mut classifier = GestureClassifier::new();
        classifier.classify(down(1, 10.0, 10.0, 0), false);
        assert!(classifier.classify(down(2, 90.0, 90.0, 5), true).is_empty());
        // The original pointer keeps feeding the tool.
        assert_eq!(
            classifier.classify(moved(1, 20.0, 20.0, 10), true),
            vec![GestureAction::ToolMove(CanvasPoint::new(20.0, 20.0))]
        );
    }

    #[test]
    fn quick_tap_pair_emits_double_tap_and_swallows_the_second_tap() {
        let mut classifier = GestureClassifier::new();
        classifier.classify(down(1, 50.0, 50.0, 0), false);
        classifier.classify(up(1, 51.0, 50.0, 80), false);
        assert_eq!(
            classifier.classify(down(1, 50.0, 50.0, 200), false),
            vec![GestureAction::DoubleTap]
        );
        assert!(classifier
            .classify(moved(1, 52.0, 50.0, 210), false)
            .is_empty());
        assert!(classifier.classify(up(1, 52.0, 50.0, 260), false).is_empty());
    }

    #[test]
    fn slow_second_tap_is_ordinary_tool_input() {
        let mut classifier = GestureClassifier::new();
        classifier.classify(down(1, 50.0, 50.0, 0), false);
        classifier.classify(up(1, 50.0, 50.0, 90), false);
        assert_eq!(
            classifier.classify(down(1, 50.0, 50.0, 1000), false),
            vec![GestureAction::ToolDown(CanvasPoint::new(50.0, 50.0))]
        );
    }

    #[test]
    fn dragged_release_does_not_arm_double_tap() {
        let mut classifier = GestureClassifier::new();
        classifier.classify(down(1, 10.0, 10.0, 0), false);
        classifier.classify(moved(1, 80.0, 10.0, 20), false);
        classifier.classify(up(1, 80.0, 10.0, 60), false);
        assert_eq!(
            classifier.classify(down(1, 80.0, 10.0, 90), false),
            vec![GestureAction::ToolDown(CanvasPoint::new(80.0, 10.0))]
        );
    }

    #[test]
    fn pointer_surviving_a_pinch_stays_suppressed_until_lift() {
        let mut classifier = GestureClassifier::new();
        classifier.classify(down(1, 100.0, 100.0, 0), false);
        classifier.classify(down(2, 200.0, 100.0, 10), false);
        assert!(classifier.classify(up(1, 100.0, 100.0, 40), false).is_empty());
        assert!(classifier
            .classify(moved(2, 220.0, 110.0, 50), false)
            .is_empty());
        assert!(classifier.classify(up(2, 220.0, 110.0, 70), false).is_empty());
        // Fully idle again.
        assert_eq!(
            classifier.classify(down(3, 5.0, 5.0, 1000), false),
            vec![GestureAction::ToolDown(CanvasPoint::new(5.0, 5.0))]
        );
    }

    #[test]
    fn wheel_events_pass_through_in_any_phase() {
        let mut classifier = GestureClassifier::new();
        let wheel = PointerEvent::Wheel {
            position: CanvasPoint::new(12.0, 34.0),
            notches: -2.0,
        };
        assert_eq!(
            classifier.classify(wheel, false),
            vec![GestureAction::Wheel {
                position: CanvasPoint::new(12.0, 34.0),
                notches: -2.0
            }]
        );
    }
}
