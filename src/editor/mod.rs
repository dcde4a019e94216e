//! The editor session: owns the base photo, viewport, gesture classifier,
//! tool controller, drawing model and sticker library, and routes events
//! between them.

pub mod model;
pub mod tools;

use std::sync::Arc;

use ab_glyph::FontArc;
use image::RgbaImage;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::MarkupConfig;
use crate::error::EditorError;
use crate::export;
use crate::geometry::{CanvasPoint, CanvasVec, Color};
use crate::input::{GestureAction, GestureClassifier, PointerEvent};
use crate::pipeline;
use crate::render::{render_frame, Scene};
use crate::sticker::StickerLibrary;
use crate::viewport::{fit_canvas, Viewport};

use model::DrawingModel;
use tools::{
    translate_clamped, BrushTexture, CutoutPath, PointerSample, ShapeKind, ToolController,
    ToolError, ToolKind, ToolOutcome,
};

/// Screen-space grab tolerance for selection handles, in pixels.
const HANDLE_GRAB_PX: f32 = 8.0;

/// Receives the finished markup PNG. The host decides where it goes: an
/// upload queue, a file, a message attachment.
pub trait AnnotationSink {
    fn deliver_markup(&self, png: &[u8]) -> Result<(), SinkError>;
}

#[derive(Debug, Error)]
#[error("failed to deliver markup: {0}")]
pub struct SinkError(pub String);

pub struct EditorSession {
    base: RgbaImage,
    canvas_width: f32,
    canvas_height: f32,
    container_width: f32,
    container_height: f32,
    viewport: Viewport,
    gestures: GestureClassifier,
    tools: ToolController,
    model: DrawingModel,
    stickers: StickerLibrary,
    drawing_visible: bool,
    font: Option<FontArc>,
    export_density: f32,
}

impl EditorSession {
    /// Opens a session over a decoded photo, fitted into the container.
    pub fn open(
        base: RgbaImage,
        container_width: f32,
        container_height: f32,
        config: &MarkupConfig,
    ) -> Result<Self, EditorError> {
        if base.width() == 0 || base.height() == 0 {
            return Err(EditorError::EmptyBaseImage);
        }
        let (canvas_width, canvas_height) =
            fit_canvas(base.width(), base.height(), container_width, container_height);
        let mut tools = ToolController::new();
        if let Some(color) = config.brush_color() {
            tools.set_shared_stroke_color(color);
        }
        if let Some(width) = config.brush_width() {
            tools.set_brush_width(width);
        }
        if let Some(texture) = config.brush_texture() {
            tools.set_brush_texture(texture);
        }
        info!(
            base_width = base.width(),
            base_height = base.height(),
            canvas_width,
            canvas_height,
            "editor session opened"
        );
        Ok(Self {
            base,
            canvas_width,
            canvas_height,
            container_width,
            container_height,
            viewport: Viewport::new(canvas_width, canvas_height, container_width, container_height),
            gestures: GestureClassifier::new(),
            tools,
            model: DrawingModel::new(),
            stickers: StickerLibrary::new(),
            drawing_visible: true,
            font: None,
            export_density: config.export_pixels_per_unit(),
        })
    }

    /// Opens a session from encoded image bytes (PNG, JPEG, ...).
    pub fn open_encoded(
        bytes: &[u8],
        container_width: f32,
        container_height: f32,
        config: &MarkupConfig,
    ) -> Result<Self, EditorError> {
        let base = image::load_from_memory(bytes)?.to_rgba8();
        Self::open(base, container_width, container_height, config)
    }

    /// Feeds one raw pointer event through gesture classification and the
    /// active tool.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        // An open lasso path is as pinch-exclusive as an open stroke.
        let mid_stroke =
            self.tools.stroke_in_progress() || self.tools.cutout_preview().is_some();
        let actions = self.gestures.classify(event, mid_stroke);
        for action in actions {
            self.apply_gesture(action);
        }
    }

    fn apply_gesture(&mut self, action: GestureAction) {
        match action {
            GestureAction::ToolDown(screen) => {
                let radius = HANDLE_GRAB_PX / self.viewport.zoom();
                let sample = self.sample(screen);
                let outcome = self.tools.pointer_down(sample, &mut self.model, radius);
                self.apply_outcome(outcome);
            }
            GestureAction::ToolMove(screen) => {
                let sample = self.sample(screen);
                let outcome = self.tools.pointer_move(
                    sample,
                    &mut self.model,
                    self.canvas_width,
                    self.canvas_height,
                );
                self.apply_outcome(outcome);
            }
            GestureAction::ToolUp(screen) => {
                let sample = self.sample(screen);
                let outcome = self.tools.pointer_up(
                    sample,
                    &mut self.model,
                    self.canvas_width,
                    self.canvas_height,
                );
                self.apply_outcome(outcome);
            }
            GestureAction::Pinch {
                previous_distance,
                distance,
                previous_midpoint,
                midpoint,
            } => {
                self.viewport
                    .apply_pinch(previous_distance, distance, previous_midpoint, midpoint);
            }
            GestureAction::DoubleTap => {
                debug!("double tap, viewport reset");
                self.viewport.reset();
            }
            GestureAction::Wheel { position, notches } => {
                self.viewport.apply_wheel(position, notches);
            }
        }
    }

    fn sample(&self, screen: CanvasPoint) -> PointerSample {
        PointerSample {
            logical: self.viewport.screen_to_logical(screen),
            screen,
        }
    }

    fn apply_outcome(&mut self, outcome: ToolOutcome) {
        match outcome {
            ToolOutcome::PanBy(delta) => self.viewport.pan_by(delta),
            ToolOutcome::CutoutComplete(path) => self.finish_cutout(path),
            _ => {}
        }
    }

    /// Clips the cutout into a sticker, places it back on the canvas as a
    /// selectable image shape, and arms the select tool on it. Undersized
    /// paths fall back to the draw tool.
    fn finish_cutout(&mut self, path: CutoutPath) {
        let extraction = match pipeline::extract_sticker(
            &path,
            &self.base,
            self.canvas_width,
            self.canvas_height,
        ) {
            Some(extraction) => extraction,
            None => {
                self.tools.set_active(ToolKind::Draw);
                return;
            }
        };
        let placement = extraction.placement;
        let sticker_id = match self.stickers.add_bitmap(extraction.bitmap) {
            Ok(id) => id,
            Err(_) => {
                self.tools.set_active(ToolKind::Draw);
                return;
            }
        };
        let Some(bitmap) = self
            .stickers
            .get(sticker_id)
            .map(|sticker| Arc::clone(&sticker.bitmap))
        else {
            self.tools.set_active(ToolKind::Draw);
            return;
        };
        let shape_id = self.model.add_shape(
            placement.x,
            placement.y,
            ShapeKind::Image {
                bitmap,
                width: placement.width,
                height: placement.height,
            },
            self.tools.shape_style(),
        );
        self.tools.set_active(ToolKind::Select);
        self.tools.set_selected(Some(shape_id));
        info!(sticker = sticker_id, shape = shape_id, "cutout placed as sticker");
    }

    /// Applies the pending crop: the base image is replaced by the cropped
    /// region, the crop rectangle's dimensions become the new canvas
    /// dimensions, and all annotations are discarded. Returns false when no
    /// valid crop is pending.
    pub fn confirm_crop(&mut self) -> bool {
        let Some(area) = self.tools.take_crop() else {
            return false;
        };
        let Some(extraction) =
            pipeline::apply_crop(area, &self.base, self.canvas_width, self.canvas_height)
        else {
            self.tools.set_active(ToolKind::Draw);
            return false;
        };
        self.base = extraction.image;
        self.canvas_width = extraction.canvas_width;
        self.canvas_height = extraction.canvas_height;
        self.viewport = Viewport::new(
            self.canvas_width,
            self.canvas_height,
            self.container_width,
            self.container_height,
        );
        self.model.clear_all();
        self.tools.set_active(ToolKind::Draw);
        true
    }

    pub fn cancel_crop(&mut self) {
        self.tools.clear_crop();
        self.tools.set_active(ToolKind::Draw);
    }

    pub fn select_tool(&mut self, tool: ToolKind) {
        self.tools.set_active(tool);
    }

    pub fn undo(&mut self) -> bool {
        self.model.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.model.redo()
    }

    pub fn clear_all(&mut self) {
        self.model.clear_all();
    }

    pub fn set_brush_color(&mut self, color: Color) {
        self.tools.set_shared_stroke_color(color);
    }

    pub fn set_brush_width(&mut self, width: f32) {
        self.tools.set_shared_stroke_width(width);
    }

    pub fn set_brush_texture(&mut self, texture: BrushTexture) {
        self.tools.set_brush_texture(texture);
    }

    pub fn set_shape_fill(&mut self, fill: Option<Color>) {
        self.tools.set_shape_fill(fill);
    }

    /// Adds a sticker to the library from encoded image bytes.
    pub fn import_sticker(&mut self, bytes: &[u8]) -> Result<u64, EditorError> {
        Ok(self.stickers.add_encoded(bytes)?)
    }

    pub fn remove_sticker(&mut self, id: u64) -> bool {
        self.stickers.remove(id)
    }

    /// Places a library sticker centered at a logical point and selects it.
    pub fn place_sticker(&mut self, id: u64, at: CanvasPoint) -> Result<u64, EditorError> {
        let sticker = self
            .stickers
            .get(id)
            .ok_or(ToolError::StickerNotFound(id))?;
        let bitmap = Arc::clone(&sticker.bitmap);
        // Raster pixels back to logical units via the base image density.
        let density = self.base.width() as f32 / self.canvas_width;
        let mut width = bitmap.width() as f32 / density;
        let mut height = bitmap.height() as f32 / density;
        let max_edge = self.canvas_width.min(self.canvas_height);
        if width.max(height) > max_edge {
            let shrink = max_edge / width.max(height);
            width *= shrink;
            height *= shrink;
        }
        let shape_id = self.model.add_shape(
            at.x - width * 0.5,
            at.y - height * 0.5,
            ShapeKind::Image {
                bitmap,
                width,
                height,
            },
            self.tools.shape_style(),
        );
        self.tools.set_active(ToolKind::Select);
        self.tools.set_selected(Some(shape_id));
        Ok(shape_id)
    }

    /// Adds a text shape centered at a logical point and selects it.
    pub fn add_text(&mut self, content: String, at: CanvasPoint) -> u64 {
        let size = self.tools.text_size();
        let kind = ShapeKind::Text { content, size };
        let (width, height) = kind.local_size();
        let shape_id = self.model.add_shape(
            at.x - width * 0.5,
            at.y - height * 0.5,
            kind,
            self.tools.shape_style(),
        );
        self.tools.set_active(ToolKind::Select);
        self.tools.set_selected(Some(shape_id));
        shape_id
    }

    /// Replaces the content of an existing text shape.
    pub fn set_text(&mut self, id: u64, content: String) -> Result<(), EditorError> {
        let shape = self
            .model
            .shape_mut(id)
            .ok_or(ToolError::ShapeNotFound(id))?;
        match &mut shape.kind {
            ShapeKind::Text { content: existing, .. } => {
                *existing = content;
                Ok(())
            }
            _ => Err(ToolError::NotATextShape(id).into()),
        }
    }

    /// Removes the selected shape. Not undoable; drops redo history.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.tools.selected_shape() else {
            return false;
        };
        self.tools.set_selected(None);
        self.model.remove_shape(id).is_some()
    }

    /// Moves the selected shape by a logical delta, kept on canvas.
    pub fn nudge_selected(&mut self, delta: CanvasVec) -> bool {
        let Some(id) = self.tools.selected_shape() else {
            return false;
        };
        let Some(shape) = self.model.shape_mut(id) else {
            return false;
        };
        translate_clamped(shape, delta, self.canvas_width, self.canvas_height);
        true
    }

    pub fn set_drawing_visible(&mut self, visible: bool) {
        self.drawing_visible = visible;
    }

    pub const fn drawing_visible(&self) -> bool {
        self.drawing_visible
    }

    /// Loads the font used to rasterize text shapes.
    pub fn set_font_bytes(&mut self, bytes: Vec<u8>) -> Result<(), EditorError> {
        self.font = Some(FontArc::try_from_vec(bytes)?);
        Ok(())
    }

    /// Renders one frame at the container size.
    pub fn render(&self) -> RgbaImage {
        let scene = Scene {
            base: &self.base,
            model: &self.model,
            tools: &self.tools,
            viewport: &self.viewport,
            font: self.font.as_ref(),
            drawing_visible: self.drawing_visible,
        };
        render_frame(
            &scene,
            self.container_width.round() as u32,
            self.container_height.round() as u32,
        )
    }

    /// Flattens the markup to an ink-only PNG and hands it to the sink.
    pub fn save(&self, sink: &dyn AnnotationSink) -> Result<(), EditorError> {
        let flattened = export::flatten(
            &self.model,
            self.canvas_width,
            self.canvas_height,
            self.export_density,
            self.font.as_ref(),
        )?;
        let png = export::encode_png(&flattened)?;
        sink.deliver_markup(&png)?;
        Ok(())
    }

    pub fn model(&self) -> &DrawingModel {
        &self.model
    }

    pub fn tools(&self) -> &ToolController {
        &self.tools
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn stickers(&self) -> &StickerLibrary {
        &self.stickers
    }

    pub const fn canvas_size(&self) -> (f32, f32) {
        (self.canvas_width, self.canvas_height)
    }

    pub fn base_image(&self) -> &RgbaImage {
        &self.base
    }
}
