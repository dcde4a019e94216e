//! The drawing model: committed strokes, shape elements, and the paired
//! undo/redo stacks that cover element creation.

use tracing::debug;

use super::tools::{ActiveStroke, ShapeElement, ShapeKind, ShapeStyle, Stroke};

/// Everything drawn on top of the base image. Strokes and shapes live in
/// separate layers; z-order within each layer is insertion order. Undo and
/// redo operate per layer, with shapes taking precedence when both layers
/// have history.
#[derive(Debug, Clone, Default)]
pub struct DrawingModel {
    strokes: Vec<Stroke>,
    shapes: Vec<ShapeElement>,
    undone_strokes: Vec<Stroke>,
    undone_shapes: Vec<ShapeElement>,
    next_id: u64,
}

impl DrawingModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Commits an in-progress stroke. Any new element invalidates both redo
    /// buffers, not just the stroke one.
    pub fn add_stroke(&mut self, active: ActiveStroke) -> u64 {
        let id = self.allocate_id();
        self.strokes.push(active.commit(id));
        self.undone_strokes.clear();
        self.undone_shapes.clear();
        debug!(stroke = id, points = self.strokes.last().map(|s| s.points().len()).unwrap_or(0), "stroke committed");
        id
    }

    pub fn add_shape(&mut self, x: f32, y: f32, kind: ShapeKind, style: ShapeStyle) -> u64 {
        let id = self.allocate_id();
        self.shapes.push(ShapeElement::new(id, x, y, kind, style));
        self.undone_strokes.clear();
        self.undone_shapes.clear();
        debug!(shape = id, kind = self.shapes.last().map(|s| s.kind.kind_label()).unwrap_or(""), "shape added");
        id
    }

    /// Deletes a shape outright. Deletion is not tracked by the creation
    /// stacks, so it also drops any redo history.
    pub fn remove_shape(&mut self, id: u64) -> Option<ShapeElement> {
        let index = self.shapes.iter().position(|shape| shape.id == id)?;
        self.undone_strokes.clear();
        self.undone_shapes.clear();
        Some(self.shapes.remove(index))
    }

    pub fn shape(&self, id: u64) -> Option<&ShapeElement> {
        self.shapes.iter().find(|shape| shape.id == id)
    }

    pub fn shape_mut(&mut self, id: u64) -> Option<&mut ShapeElement> {
        self.shapes.iter_mut().find(|shape| shape.id == id)
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn shapes(&self) -> &[ShapeElement] {
        &self.shapes
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.shapes.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.strokes.is_empty() || !self.shapes.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone_strokes.is_empty() || !self.undone_shapes.is_empty()
    }

    /// Removes the most recent element, shapes first when both layers have
    /// history. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if let Some(shape) = self.shapes.pop() {
            self.undone_shapes.push(shape);
            true
        } else if let Some(stroke) = self.strokes.pop() {
            self.undone_strokes.push(stroke);
            true
        } else {
            false
        }
    }

    /// Restores the most recently undone element, mirroring [`undo`]'s
    /// shape preference.
    pub fn redo(&mut self) -> bool {
        if let Some(shape) = self.undone_shapes.pop() {
            self.shapes.push(shape);
            true
        } else if let Some(stroke) = self.undone_strokes.pop() {
            self.strokes.push(stroke);
            true
        } else {
            false
        }
    }

    /// Drops everything, history included. Used when a crop rebases the
    /// canvas and old coordinates stop meaning anything.
    pub fn clear_all(&mut self) {
        self.strokes.clear();
        self.shapes.clear();
        self.undone_strokes.clear();
        self.undone_shapes.clear();
    }
}
