//! Pointer phase handling for each tool mode.

use tracing::debug;

use crate::editor::model::DrawingModel;
use crate::geometry::CanvasRect;

use super::brush::ActiveStroke;
use super::crop::{CropArea, MIN_DRAG_SIZE};
use super::cutout::CutoutPath;
use super::selection::{apply_rotate_drag, apply_scale_drag, handle_at, translate_clamped};
use super::shape::ShapeKind;
use super::{PointerSample, SelectDrag, ToolController, ToolKind, ToolOutcome};

impl ToolController {
    /// Handles the press phase. `handle_radius` is the grab tolerance for
    /// selection handles, already converted to logical units by the caller.
    pub fn pointer_down(
        &mut self,
        sample: PointerSample,
        model: &mut DrawingModel,
        handle_radius: f32,
    ) -> ToolOutcome {
        match self.active {
            ToolKind::Draw | ToolKind::Erase => {
                let eraser = self.active == ToolKind::Erase;
                self.active_stroke = Some(ActiveStroke::begin(sample.logical, self.brush, eraser));
                ToolOutcome::None
            }
            ToolKind::Rectangle | ToolKind::Circle | ToolKind::Crop => {
                self.drag_anchor = Some(sample.logical);
                self.last_point = Some(sample.logical);
                ToolOutcome::None
            }
            ToolKind::Cutout => {
                self.cutout = Some(CutoutPath::begin(sample.logical));
                ToolOutcome::None
            }
            ToolKind::Pan => {
                self.pan_last = Some(sample.screen);
                ToolOutcome::None
            }
            ToolKind::Select => self.select_down(sample, model, handle_radius),
        }
    }

    fn select_down(
        &mut self,
        sample: PointerSample,
        model: &mut DrawingModel,
        handle_radius: f32,
    ) -> ToolOutcome {
        if let Some(shape) = self.selected.and_then(|id| model.shape(id)) {
            if let Some(handle) = handle_at(shape, sample.logical, handle_radius) {
                self.drag = Some(match handle {
                    super::SelectionHandle::Rotate => SelectDrag::Rotate {
                        last: sample.logical,
                    },
                    corner => SelectDrag::Scale { handle: corner },
                });
                return ToolOutcome::None;
            }
        }
        let hit = model
            .shapes()
            .iter()
            .rev()
            .find(|shape| shape.hit_test(sample.logical))
            .map(|shape| shape.id);
        match hit {
            Some(id) => {
                let changed = self.selected != Some(id);
                self.selected = Some(id);
                self.drag = Some(SelectDrag::Move {
                    last: sample.logical,
                });
                if changed {
                    ToolOutcome::SelectionChanged(Some(id))
                } else {
                    ToolOutcome::None
                }
            }
            None => {
                self.drag = None;
                if self.selected.take().is_some() {
                    ToolOutcome::SelectionChanged(None)
                } else {
                    ToolOutcome::None
                }
            }
        }
    }

    pub fn pointer_move(
        &mut self,
        sample: PointerSample,
        model: &mut DrawingModel,
        canvas_width: f32,
        canvas_height: f32,
    ) -> ToolOutcome {
        match self.active {
            ToolKind::Draw | ToolKind::Erase => {
                if let Some(stroke) = self.active_stroke.as_mut() {
                    stroke.append(sample.logical);
                }
                ToolOutcome::None
            }
            ToolKind::Rectangle | ToolKind::Circle | ToolKind::Crop => {
                if self.drag_anchor.is_some() {
                    self.last_point = Some(sample.logical);
                }
                ToolOutcome::None
            }
            ToolKind::Cutout => {
                if let Some(path) = self.cutout.as_mut() {
                    path.append(sample.logical);
                }
                ToolOutcome::None
            }
            ToolKind::Pan => match self.pan_last.replace(sample.screen) {
                Some(last) => ToolOutcome::PanBy(sample.screen - last),
                None => ToolOutcome::None,
            },
            ToolKind::Select => {
                self.select_move(sample, model, canvas_width, canvas_height);
                ToolOutcome::None
            }
        }
    }

    fn select_move(
        &mut self,
        sample: PointerSample,
        model: &mut DrawingModel,
        canvas_width: f32,
        canvas_height: f32,
    ) {
        let Some(id) = self.selected else { return };
        let Some(shape) = model.shape_mut(id) else {
            return;
        };
        match self.drag.as_mut() {
            Some(SelectDrag::Move { last }) => {
                translate_clamped(shape, sample.logical - *last, canvas_width, canvas_height);
                *last = sample.logical;
            }
            Some(SelectDrag::Scale { handle }) => {
                apply_scale_drag(shape, *handle, sample.logical);
            }
            Some(SelectDrag::Rotate { last }) => {
                apply_rotate_drag(shape, *last, sample.logical);
                *last = sample.logical;
            }
            None => {}
        }
    }

    pub fn pointer_up(
        &mut self,
        sample: PointerSample,
        model: &mut DrawingModel,
        canvas_width: f32,
        canvas_height: f32,
    ) -> ToolOutcome {
        match self.active {
            ToolKind::Draw | ToolKind::Erase => match self.active_stroke.take() {
                Some(mut stroke) => {
                    if stroke.points().last() != Some(&sample.logical) {
                        stroke.append(sample.logical);
                    }
                    ToolOutcome::StrokeCommitted(model.add_stroke(stroke))
                }
                None => ToolOutcome::None,
            },
            ToolKind::Rectangle => self.finish_shape_drag(sample, model, false),
            ToolKind::Circle => self.finish_shape_drag(sample, model, true),
            ToolKind::Crop => {
                self.last_point = None;
                match self.drag_anchor.take() {
                    Some(anchor) => {
                        match CropArea::from_drag(
                            anchor,
                            sample.logical,
                            canvas_width,
                            canvas_height,
                        ) {
                            Some(area) => {
                                self.crop = Some(area);
                                ToolOutcome::CropDefined(area)
                            }
                            None => {
                                debug!("crop drag below minimum size, discarded");
                                ToolOutcome::None
                            }
                        }
                    }
                    None => ToolOutcome::None,
                }
            }
            ToolKind::Cutout => match self.cutout.take() {
                Some(mut path) => {
                    path.append(sample.logical);
                    ToolOutcome::CutoutComplete(path)
                }
                None => ToolOutcome::None,
            },
            ToolKind::Pan => {
                self.pan_last = None;
                ToolOutcome::None
            }
            ToolKind::Select => {
                self.drag = None;
                ToolOutcome::None
            }
        }
    }

    fn finish_shape_drag(
        &mut self,
        sample: PointerSample,
        model: &mut DrawingModel,
        circle: bool,
    ) -> ToolOutcome {
        self.last_point = None;
        let Some(anchor) = self.drag_anchor.take() else {
            return ToolOutcome::None;
        };
        let rect = CanvasRect::from_corners(anchor, sample.logical);
        if rect.width < MIN_DRAG_SIZE || rect.height < MIN_DRAG_SIZE {
            debug!("shape drag below minimum size, discarded");
            return ToolOutcome::None;
        }
        let (x, y, kind) = if circle {
            let radius = rect.width.min(rect.height) * 0.5;
            let center = rect.center();
            (
                center.x - radius,
                center.y - radius,
                ShapeKind::Circle { radius },
            )
        } else {
            (
                rect.x,
                rect.y,
                ShapeKind::Rectangle {
                    width: rect.width,
                    height: rect.height,
                },
            )
        };
        ToolOutcome::ShapeAdded(model.add_shape(x, y, kind, self.shape_style))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CanvasPoint;

    fn at(x: f32, y: f32) -> PointerSample {
        PointerSample {
            logical: CanvasPoint::new(x, y),
            screen: CanvasPoint::new(x, y),
        }
    }

    fn drag(
        tools: &mut ToolController,
        model: &mut DrawingModel,
        from: (f32, f32),
        to: (f32, f32),
    ) -> ToolOutcome {
        tools.pointer_down(at(from.0, from.1), model, 6.0);
        tools.pointer_move(at(to.0, to.1), model, 400.0, 300.0);
        tools.pointer_up(at(to.0, to.1), model, 400.0, 300.0)
    }

    #[test]
    fn draw_drag_commits_one_stroke_with_all_points() {
        let mut tools = ToolController::new();
        let mut model = DrawingModel::new();
        let outcome = drag(&mut tools, &mut model, (10.0, 10.0), (30.0, 20.0));
        assert!(matches!(outcome, ToolOutcome::StrokeCommitted(_)));
        assert_eq!(model.strokes().len(), 1);
        assert_eq!(model.strokes()[0].points().len(), 2);
        assert!(!model.strokes()[0].is_eraser());
    }

    #[test]
    fn erase_mode_commits_subtractive_strokes() {
        let mut tools = ToolController::new();
        let mut model = DrawingModel::new();
        tools.set_active(ToolKind::Erase);
        drag(&mut tools, &mut model, (0.0, 0.0), (10.0, 0.0));
        assert!(model.strokes()[0].is_eraser());
    }

    #[test]
    fn rectangle_drag_adds_a_shape_with_normalized_bounds() {
        let mut tools = ToolController::new();
        let mut model = DrawingModel::new();
        tools.set_active(ToolKind::Rectangle);
        let outcome = drag(&mut tools, &mut model, (50.0, 40.0), (10.0, 10.0));
        let ToolOutcome::ShapeAdded(id) = outcome else {
            panic!("expected a shape, got {outcome:?}");
        };
        let shape = model.shape(id).expect("shape should exist");
        assert_eq!(shape.x, 10.0);
        assert_eq!(shape.y, 10.0);
        assert!(matches!(
            shape.kind,
            ShapeKind::Rectangle {
                width,
                height
            } if width == 40.0 && height == 30.0
        ));
    }

    #[test]
    fn tiny_shape_drag_is_discarded_as_a_tap() {
        let mut tools = ToolController::new();
        let mut model = DrawingModel::new();
        tools.set_active(ToolKind::Rectangle);
        let outcome = drag(&mut tools, &mut model, (10.0, 10.0), (12.0, 13.0));
        assert_eq!(outcome, ToolOutcome::None);
        assert!(model.shapes().is_empty());
    }

    #[test]
    fn circle_drag_inscribes_in_the_drag_bounds() {
        let mut tools = ToolController::new();
        let mut model = DrawingModel::new();
        tools.set_active(ToolKind::Circle);
        let ToolOutcome::ShapeAdded(id) =
            drag(&mut tools, &mut model, (0.0, 0.0), (40.0, 20.0))
        else {
            panic!("expected a circle");
        };
        let shape = model.shape(id).expect("shape should exist");
        assert!(matches!(shape.kind, ShapeKind::Circle { radius } if radius == 10.0));
        assert_eq!(shape.center(), CanvasPoint::new(20.0, 10.0));
    }

    #[test]
    fn select_picks_the_topmost_shape_and_empty_click_clears() {
        let mut tools = ToolController::new();
        let mut model = DrawingModel::new();
        tools.set_active(ToolKind::Rectangle);
        drag(&mut tools, &mut model, (10.0, 10.0), (60.0, 60.0));
        let ToolOutcome::ShapeAdded(top) = drag(&mut tools, &mut model, (30.0, 30.0), (80.0, 80.0))
        else {
            panic!("expected a shape");
        };

        tools.set_active(ToolKind::Select);
        let outcome = tools.pointer_down(at(40.0, 40.0), &mut model, 6.0);
        assert_eq!(outcome, ToolOutcome::SelectionChanged(Some(top)));
        tools.pointer_up(at(40.0, 40.0), &mut model, 400.0, 300.0);

        let outcome = tools.pointer_down(at(300.0, 200.0), &mut model, 6.0);
        assert_eq!(outcome, ToolOutcome::SelectionChanged(None));
    }

    #[test]
    fn select_drag_moves_the_shape_without_touching_history() {
        let mut tools = ToolController::new();
        let mut model = DrawingModel::new();
        tools.set_active(ToolKind::Rectangle);
        let ToolOutcome::ShapeAdded(id) = drag(&mut tools, &mut model, (10.0, 10.0), (30.0, 30.0))
        else {
            panic!("expected a shape");
        };

        tools.set_active(ToolKind::Select);
        tools.pointer_down(at(20.0, 20.0), &mut model, 6.0);
        tools.pointer_move(at(50.0, 25.0), &mut model, 400.0, 300.0);
        tools.pointer_up(at(50.0, 25.0), &mut model, 400.0, 300.0);

        let shape = model.shape(id).expect("shape should exist");
        assert!((shape.x - 40.0).abs() < 1e-4);
        assert!((shape.y - 15.0).abs() < 1e-4);
        // Position drags are not creations, so undo still removes the shape itself.
        assert!(model.undo());
        assert!(model.shapes().is_empty());
    }

    #[test]
    fn crop_drag_defines_a_persistent_pending_area() {
        let mut tools = ToolController::new();
        let mut model = DrawingModel::new();
        tools.set_active(ToolKind::Crop);
        let outcome = drag(&mut tools, &mut model, (20.0, 20.0), (120.0, 90.0));
        assert!(matches!(outcome, ToolOutcome::CropDefined(_)));
        let area = tools.crop_area().expect("crop should be pending");
        assert_eq!(area.width, 100.0);
        assert_eq!(area.height, 70.0);
    }

    #[test]
    fn cutout_drag_reports_the_full_path_on_release() {
        let mut tools = ToolController::new();
        let mut model = DrawingModel::new();
        tools.set_active(ToolKind::Cutout);
        tools.pointer_down(at(0.0, 0.0), &mut model, 6.0);
        tools.pointer_move(at(20.0, 0.0), &mut model, 400.0, 300.0);
        tools.pointer_move(at(20.0, 20.0), &mut model, 400.0, 300.0);
        let outcome = tools.pointer_up(at(0.0, 20.0), &mut model, 400.0, 300.0);
        let ToolOutcome::CutoutComplete(path) = outcome else {
            panic!("expected a cutout path");
        };
        assert_eq!(path.points().len(), 4);
    }

    #[test]
    fn pan_reports_screen_space_deltas() {
        let mut tools = ToolController::new();
        let mut model = DrawingModel::new();
        tools.set_active(ToolKind::Pan);
        tools.pointer_down(at(100.0, 100.0), &mut model, 6.0);
        let outcome = tools.pointer_move(at(110.0, 95.0), &mut model, 400.0, 300.0);
        let ToolOutcome::PanBy(delta) = outcome else {
            panic!("expected a pan delta");
        };
        assert_eq!(delta.x, 10.0);
        assert_eq!(delta.y, -5.0);
    }
}
