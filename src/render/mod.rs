//! Frame composition: base image, ink and shape layers in logical space,
//! sampled through the viewport, with tool overlays on top in screen space.

mod brush;
mod shapes;

use brush::{blend_over, erase_stroke, stamp_stroke};
use shapes::paint_shape;

use ab_glyph::FontArc;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::editor::model::DrawingModel;
use crate::editor::tools::{handle_positions, ActiveStroke, ToolController};
use crate::geometry::{CanvasPoint, Color};
use crate::viewport::Viewport;

/// Accent used for selection handles and tool outlines.
const OVERLAY_COLOR: Color = Color {
    r: 0,
    g: 122,
    b: 255,
    a: 255,
};
const HANDLE_HALF_PX: i32 = 4;

/// Borrowed view of everything one frame needs.
pub struct Scene<'a> {
    pub base: &'a RgbaImage,
    pub model: &'a DrawingModel,
    pub tools: &'a ToolController,
    pub viewport: &'a Viewport,
    pub font: Option<&'a FontArc>,
    pub drawing_visible: bool,
}

/// Rasterizes strokes and shapes onto a transparent layer. Eraser strokes
/// subtract from ink committed before them and never touch shapes, which
/// are painted after the whole stroke list is resolved.
pub(crate) fn compose_annotations(
    model: &DrawingModel,
    active: Option<&ActiveStroke>,
    width_px: u32,
    height_px: u32,
    scale: f32,
    font: Option<&FontArc>,
) -> RgbaImage {
    let mut ink = RgbaImage::new(width_px, height_px);
    for stroke in model.strokes() {
        if stroke.is_eraser() {
            erase_stroke(&mut ink, stroke.points(), stroke.width(), scale);
        } else {
            let mut scratch = RgbaImage::new(width_px, height_px);
            stamp_stroke(
                &mut scratch,
                stroke.points(),
                stroke.color(),
                stroke.width(),
                stroke.texture(),
                stroke.id(),
                scale,
            );
            blend_over(&mut ink, &scratch);
        }
    }
    if let Some(active) = active {
        if active.is_eraser() {
            erase_stroke(&mut ink, active.points(), active.width(), scale);
        } else {
            let mut scratch = RgbaImage::new(width_px, height_px);
            stamp_stroke(
                &mut scratch,
                active.points(),
                active.color(),
                active.width(),
                active.texture(),
                u64::MAX,
                scale,
            );
            blend_over(&mut ink, &scratch);
        }
    }

    let mut layer = ink;
    for shape in model.shapes() {
        paint_shape(&mut layer, shape, scale, font);
    }
    layer
}

/// Renders one full frame at the container's pixel size.
pub fn render_frame(scene: &Scene<'_>, container_width: u32, container_height: u32) -> RgbaImage {
    let (canvas_width, canvas_height) = scene.viewport.canvas_size();
    let canvas_px_w = (canvas_width.round() as u32).max(1);
    let canvas_px_h = (canvas_height.round() as u32).max(1);

    // Logical-space composite at one pixel per logical unit.
    let mut canvas = if scene.base.dimensions() == (canvas_px_w, canvas_px_h) {
        scene.base.clone()
    } else {
        imageops::resize(scene.base, canvas_px_w, canvas_px_h, FilterType::Triangle)
    };
    if scene.drawing_visible {
        let annotations = compose_annotations(
            scene.model,
            scene.tools.active_stroke(),
            canvas_px_w,
            canvas_px_h,
            1.0,
            scene.font,
        );
        blend_over(&mut canvas, &annotations);
    }

    // Screen pass through the viewport transform, nearest sampling.
    let mut frame = RgbaImage::new(container_width.max(1), container_height.max(1));
    for py in 0..frame.height() {
        for px in 0..frame.width() {
            let logical = scene
                .viewport
                .screen_to_logical(CanvasPoint::new(px as f32 + 0.5, py as f32 + 0.5));
            if logical.x < 0.0
                || logical.y < 0.0
                || logical.x >= canvas_width
                || logical.y >= canvas_height
            {
                continue;
            }
            let sx = (logical.x.floor() as u32).min(canvas_px_w - 1);
            let sy = (logical.y.floor() as u32).min(canvas_px_h - 1);
            frame.put_pixel(px, py, *canvas.get_pixel(sx, sy));
        }
    }

    draw_overlays(&mut frame, scene);
    frame
}

fn draw_overlays(frame: &mut RgbaImage, scene: &Scene<'_>) {
    let viewport = scene.viewport;

    if let Some(preview) = scene.tools.drag_preview() {
        let a = viewport.logical_to_screen(CanvasPoint::new(preview.x, preview.y));
        let b = viewport.logical_to_screen(CanvasPoint::new(
            preview.x + preview.width,
            preview.y + preview.height,
        ));
        draw_rect_outline(frame, a, b, OVERLAY_COLOR);
    }

    if let Some(area) = scene.tools.crop_area() {
        let a = viewport.logical_to_screen(CanvasPoint::new(area.x, area.y));
        let b = viewport.logical_to_screen(CanvasPoint::new(
            area.x + area.width,
            area.y + area.height,
        ));
        draw_rect_outline(frame, a, b, OVERLAY_COLOR);
    }

    if let Some(path) = scene.tools.cutout_preview() {
        let points = path.points();
        for pair in points.windows(2) {
            draw_line(
                frame,
                viewport.logical_to_screen(pair[0]),
                viewport.logical_to_screen(pair[1]),
                OVERLAY_COLOR,
            );
        }
    }

    if let Some(shape) = scene
        .tools
        .selected_shape()
        .and_then(|id| scene.model.shape(id))
    {
        let corners = shape.corners().map(|corner| viewport.logical_to_screen(corner));
        for index in 0..4 {
            draw_line(frame, corners[index], corners[(index + 1) % 4], OVERLAY_COLOR);
        }
        for (_, position) in handle_positions(shape) {
            draw_handle(frame, viewport.logical_to_screen(position), OVERLAY_COLOR);
        }
    }
}

fn put_overlay_pixel(frame: &mut RgbaImage, x: i32, y: i32, color: Color) {
    if x < 0 || y < 0 || x >= frame.width() as i32 || y >= frame.height() as i32 {
        return;
    }
    frame.put_pixel(x as u32, y as u32, Rgba([color.r, color.g, color.b, color.a]));
}

fn draw_line(frame: &mut RgbaImage, from: CanvasPoint, to: CanvasPoint, color: Color) {
    let steps = from.distance_to(to).ceil().max(1.0) as i32;
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        let x = from.x + (to.x - from.x) * t;
        let y = from.y + (to.y - from.y) * t;
        put_overlay_pixel(frame, x.round() as i32, y.round() as i32, color);
    }
}

fn draw_rect_outline(frame: &mut RgbaImage, a: CanvasPoint, b: CanvasPoint, color: Color) {
    let top_right = CanvasPoint::new(b.x, a.y);
    let bottom_left = CanvasPoint::new(a.x, b.y);
    draw_line(frame, a, top_right, color);
    draw_line(frame, top_right, b, color);
    draw_line(frame, b, bottom_left, color);
    draw_line(frame, bottom_left, a, color);
}

fn draw_handle(frame: &mut RgbaImage, center: CanvasPoint, color: Color) {
    let cx = center.x.round() as i32;
    let cy = center.y.round() as i32;
    for dy in -HANDLE_HALF_PX..=HANDLE_HALF_PX {
        for dx in -HANDLE_HALF_PX..=HANDLE_HALF_PX {
            put_overlay_pixel(frame, cx + dx, cy + dy, color);
        }
    }
}
