//! Painting of vector shapes, text and placed bitmaps by inverse-transform
//! sampling.

use ab_glyph::{point, Font, FontArc, ScaleFont};
use image::{Rgba, RgbaImage};

use crate::editor::tools::{ShapeElement, ShapeKind};
use crate::geometry::{CanvasPoint, Color};

fn blend_pixel(pixel: &mut Rgba<u8>, color: Color, coverage: f32) {
    let src_a = (color.a as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }
    let dst_a = pixel.0[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    let src = [color.r as f32, color.g as f32, color.b as f32];
    for channel in 0..3 {
        let dst_c = pixel.0[channel] as f32;
        pixel.0[channel] =
            ((src[channel] * src_a + dst_c * dst_a * (1.0 - src_a)) / out_a).round() as u8;
    }
    pixel.0[3] = (out_a * 255.0).round() as u8;
}

/// Paints one shape onto the layer. `scale` is raster pixels per logical
/// unit. Text needs a font; without one only the outline box is drawn.
pub(crate) fn paint_shape(
    layer: &mut RgbaImage,
    shape: &ShapeElement,
    scale: f32,
    font: Option<&FontArc>,
) {
    let bounds = shape.bounds();
    let (layer_w, layer_h) = layer.dimensions();
    let x0 = ((bounds.x * scale).floor().max(0.0) as u32).min(layer_w);
    let y0 = ((bounds.y * scale).floor().max(0.0) as u32).min(layer_h);
    let x1 = (((bounds.x + bounds.width) * scale).ceil().max(0.0) as u32).min(layer_w);
    let y1 = (((bounds.y + bounds.height) * scale).ceil().max(0.0) as u32).min(layer_h);
    if x1 <= x0 || y1 <= y0 {
        return;
    }

    let center = shape.center();
    let (width, height) = shape.kind.local_size();
    let half_w = width * 0.5;
    let half_h = height * 0.5;
    let avg_scale = ((shape.transform.scale_x.abs() + shape.transform.scale_y.abs()) * 0.5)
        .max(f32::EPSILON);
    let half_stroke = (shape.style.stroke_width * 0.5 / avg_scale).max(0.0);

    // Content buffers for sampled kinds, prepared once per shape.
    let text_buffer = match &shape.kind {
        ShapeKind::Text { content, size } => font.map(|font| {
            rasterize_text(content, size * scale * avg_scale, shape.style.stroke_color, font)
        }),
        _ => None,
    };

    for py in y0..y1 {
        for px in x0..x1 {
            let sample = CanvasPoint::new((px as f32 + 0.5) / scale, (py as f32 + 0.5) / scale);
            let local = shape.transform.unapply(sample, center);
            let pixel = layer.get_pixel_mut(px, py);
            match &shape.kind {
                ShapeKind::Rectangle { .. } => {
                    let signed = (local.x.abs() - half_w).max(local.y.abs() - half_h);
                    if signed.abs() <= half_stroke {
                        blend_pixel(pixel, shape.style.stroke_color, 1.0);
                    } else if signed < 0.0 {
                        if let Some(fill) = shape.style.fill {
                            blend_pixel(pixel, fill, 1.0);
                        }
                    }
                }
                ShapeKind::Circle { radius } => {
                    let signed = (local.x * local.x + local.y * local.y).sqrt() - radius;
                    if signed.abs() <= half_stroke {
                        blend_pixel(pixel, shape.style.stroke_color, 1.0);
                    } else if signed < 0.0 {
                        if let Some(fill) = shape.style.fill {
                            blend_pixel(pixel, fill, 1.0);
                        }
                    }
                }
                ShapeKind::Text { .. } => match &text_buffer {
                    Some(buffer) => {
                        sample_buffer(pixel, buffer, local.x, local.y, half_w, half_h);
                    }
                    None => {
                        // No font loaded; show where the text sits.
                        let signed = (local.x.abs() - half_w).max(local.y.abs() - half_h);
                        if signed.abs() <= 0.75 {
                            blend_pixel(pixel, shape.style.stroke_color, 1.0);
                        }
                    }
                },
                ShapeKind::Image { bitmap, .. } => {
                    if local.x.abs() <= half_w && local.y.abs() <= half_h {
                        let u = ((local.x + half_w) / width * bitmap.width() as f32)
                            .clamp(0.0, bitmap.width() as f32 - 1.0)
                            as u32;
                        let v = ((local.y + half_h) / height * bitmap.height() as f32)
                            .clamp(0.0, bitmap.height() as f32 - 1.0)
                            as u32;
                        let source = bitmap.get_pixel(u, v);
                        blend_pixel(
                            pixel,
                            Color::new(source.0[0], source.0[1], source.0[2], source.0[3]),
                            1.0,
                        );
                    }
                }
            }
        }
    }
}

fn sample_buffer(
    pixel: &mut Rgba<u8>,
    buffer: &RgbaImage,
    local_x: f32,
    local_y: f32,
    half_w: f32,
    half_h: f32,
) {
    if local_x.abs() > half_w || local_y.abs() > half_h {
        return;
    }
    let u = ((local_x + half_w) / (half_w * 2.0) * buffer.width() as f32)
        .clamp(0.0, buffer.width() as f32 - 1.0) as u32;
    let v = ((local_y + half_h) / (half_h * 2.0) * buffer.height() as f32)
        .clamp(0.0, buffer.height() as f32 - 1.0) as u32;
    let source = buffer.get_pixel(u, v);
    blend_pixel(
        pixel,
        Color::new(source.0[0], source.0[1], source.0[2], source.0[3]),
        1.0,
    );
}

/// Rasterizes multi-line text into a tight buffer at the given pixel size.
pub(crate) fn rasterize_text(content: &str, size_px: f32, color: Color, font: &FontArc) -> RgbaImage {
    let size_px = size_px.max(1.0);
    let scaled = font.as_scaled(size_px);
    let line_height = size_px * 1.3;

    let measure = |line: &str| -> f32 {
        line.chars()
            .map(|ch| scaled.h_advance(font.glyph_id(ch)))
            .sum()
    };
    let lines: Vec<&str> = content.split('\n').collect();
    let width = lines
        .iter()
        .map(|line| measure(line))
        .fold(1.0_f32, f32::max)
        .ceil() as u32;
    let height = ((lines.len().max(1) as f32 * line_height).ceil() as u32).max(1);
    let mut buffer = RgbaImage::new(width.max(1), height);

    for (index, line) in lines.iter().enumerate() {
        let baseline = index as f32 * line_height + scaled.ascent();
        let mut caret = 0.0_f32;
        for ch in line.chars() {
            let glyph_id = font.glyph_id(ch);
            let glyph = glyph_id.with_scale_and_position(size_px, point(caret, baseline));
            caret += scaled.h_advance(glyph_id);
            if let Some(outlined) = font.outline_glyph(glyph) {
                let glyph_bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let px = gx as i32 + glyph_bounds.min.x as i32;
                    let py = gy as i32 + glyph_bounds.min.y as i32;
                    if px < 0 || py < 0 || px >= buffer.width() as i32 || py >= buffer.height() as i32
                    {
                        return;
                    }
                    let pixel = buffer.get_pixel_mut(px as u32, py as u32);
                    let alpha = (coverage * color.a as f32) as u8;
                    if alpha >= pixel.0[3] {
                        *pixel = Rgba([color.r, color.g, color.b, alpha]);
                    }
                });
            }
        }
    }
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::tools::{ShapeStyle, ShapeTransform};

    fn style(fill: Option<Color>) -> ShapeStyle {
        ShapeStyle {
            fill,
            stroke_color: Color::opaque(255, 0, 0),
            stroke_width: 2.0,
        }
    }

    #[test]
    fn rectangle_outline_paints_the_border_and_respects_no_fill() {
        let mut layer = RgbaImage::new(100, 100);
        let shape = ShapeElement::new(
            1,
            20.0,
            20.0,
            ShapeKind::Rectangle {
                width: 40.0,
                height: 40.0,
            },
            style(None),
        );
        paint_shape(&mut layer, &shape, 1.0, None);
        assert!(layer.get_pixel(20, 40).0[3] > 0);
        assert_eq!(layer.get_pixel(40, 40).0[3], 0);
    }

    #[test]
    fn filled_circle_covers_its_center() {
        let mut layer = RgbaImage::new(100, 100);
        let shape = ShapeElement::new(
            1,
            30.0,
            30.0,
            ShapeKind::Circle { radius: 20.0 },
            style(Some(Color::opaque(0, 0, 255))),
        );
        paint_shape(&mut layer, &shape, 1.0, None);
        let center = layer.get_pixel(50, 50);
        assert_eq!(center.0, [0, 0, 255, 255]);
        assert_eq!(layer.get_pixel(5, 5).0[3], 0);
    }

    #[test]
    fn rotated_rectangle_paints_along_the_rotated_border() {
        let mut layer = RgbaImage::new(100, 100);
        let mut shape = ShapeElement::new(
            1,
            30.0,
            45.0,
            ShapeKind::Rectangle {
                width: 40.0,
                height: 10.0,
            },
            style(Some(Color::opaque(0, 255, 0))),
        );
        shape.transform = ShapeTransform {
            rotation: std::f32::consts::FRAC_PI_2,
            scale_x: 1.0,
            scale_y: 1.0,
        };
        paint_shape(&mut layer, &shape, 1.0, None);
        // The bar is now vertical through the center (50, 50).
        assert!(layer.get_pixel(50, 35).0[3] > 0);
        assert_eq!(layer.get_pixel(35, 50).0[3], 0);
    }

    #[test]
    fn image_shape_samples_the_bitmap() {
        let mut bitmap = RgbaImage::new(2, 2);
        bitmap.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        bitmap.put_pixel(1, 1, Rgba([0, 0, 255, 255]));
        let mut layer = RgbaImage::new(40, 40);
        let shape = ShapeElement::new(
            1,
            10.0,
            10.0,
            ShapeKind::Image {
                bitmap: std::sync::Arc::new(bitmap),
                width: 20.0,
                height: 20.0,
            },
            style(None),
        );
        paint_shape(&mut layer, &shape, 1.0, None);
        assert_eq!(layer.get_pixel(12, 12).0, [255, 0, 0, 255]);
        assert_eq!(layer.get_pixel(27, 27).0, [0, 0, 255, 255]);
    }

    #[test]
    fn text_without_a_font_falls_back_to_an_outline_box() {
        let mut layer = RgbaImage::new(100, 100);
        let shape = ShapeElement::new(
            1,
            10.0,
            10.0,
            ShapeKind::Text {
                content: "note".to_string(),
                size: 16.0,
            },
            style(None),
        );
        paint_shape(&mut layer, &shape, 1.0, None);
        let painted = layer.pixels().filter(|p| p.0[3] > 0).count();
        assert!(painted > 0);
    }
}
