//! CPU stamping of free-hand strokes onto a raster layer.

use image::{Rgba, RgbaImage};

use crate::editor::tools::BrushTexture;
use crate::geometry::{CanvasPoint, Color};

/// Deterministic per-pixel noise in `[0, 1)`. Seeded per stroke so spray
/// and pencil grain stay stable frame to frame.
fn hash01(x: i32, y: i32, seed: u64) -> f32 {
    let mixed = (x as i64 as u64)
        .wrapping_mul(1619)
        .wrapping_add((y as i64 as u64).wrapping_mul(3929))
        .wrapping_add(seed.wrapping_mul(7919));
    let folded = (mixed ^ (mixed >> 13)).wrapping_mul(0x2545_F491_4F6C_DD1D);
    ((folded >> 40) & 0xFFFF) as f32 / 65536.0
}

fn smoothstep(edge0: f32, edge1: f32, value: f32) -> f32 {
    let t = ((value - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Coverage of one stamp at offset (`dx`, `dy`) from the stamp center, for
/// a brush of pixel radius `radius`.
fn stamp_coverage(texture: BrushTexture, dx: f32, dy: f32, radius: f32, px: i32, py: i32, seed: u64) -> f32 {
    let distance = (dx * dx + dy * dy).sqrt();
    match texture {
        BrushTexture::Solid => smoothstep(radius, radius - 1.0, distance),
        BrushTexture::Soft => smoothstep(radius, 0.0, distance) * 0.75,
        BrushTexture::Spray => {
            if distance <= radius && hash01(px, py, seed) < 0.14 {
                0.9
            } else {
                0.0
            }
        }
        BrushTexture::Marker => {
            if dx.abs() <= radius && dy.abs() <= radius {
                0.35
            } else {
                0.0
            }
        }
        BrushTexture::Pencil => {
            if distance <= radius && hash01(px, py, seed) < 0.55 {
                0.8
            } else {
                0.0
            }
        }
    }
}

fn for_each_stamp(points: &[CanvasPoint], scale: f32, spacing: f32, mut visit: impl FnMut(f32, f32)) {
    let mut previous: Option<(f32, f32)> = None;
    let mut leftover = 0.0;
    for point in points {
        let x = point.x * scale;
        let y = point.y * scale;
        match previous {
            None => {
                visit(x, y);
                previous = Some((x, y));
            }
            Some((px, py)) => {
                let dx = x - px;
                let dy = y - py;
                let length = (dx * dx + dy * dy).sqrt();
                if length <= f32::EPSILON {
                    continue;
                }
                let mut travelled = spacing - leftover;
                while travelled <= length {
                    let t = travelled / length;
                    visit(px + dx * t, py + dy * t);
                    travelled += spacing;
                }
                leftover = length - (travelled - spacing);
                previous = Some((x, y));
            }
        }
    }
}

/// Stamps a stroke into `scratch`, which must start fully transparent.
/// Overlapping stamps take the maximum coverage instead of accumulating,
/// so a stroke crossing itself stays a single flat layer of ink.
pub(crate) fn stamp_stroke(
    scratch: &mut RgbaImage,
    points: &[CanvasPoint],
    color: Color,
    width: f32,
    texture: BrushTexture,
    seed: u64,
    scale: f32,
) {
    let radius = (width * scale * 0.5).max(0.5);
    let spacing = (radius * 0.5).max(1.0);
    let (layer_w, layer_h) = scratch.dimensions();

    for_each_stamp(points, scale, spacing, |cx, cy| {
        let reach = radius.ceil() as i32 + 1;
        let center_x = cx.round() as i32;
        let center_y = cy.round() as i32;
        for py in (center_y - reach).max(0)..(center_y + reach + 1).min(layer_h as i32) {
            for px in (center_x - reach).max(0)..(center_x + reach + 1).min(layer_w as i32) {
                let coverage = stamp_coverage(
                    texture,
                    px as f32 - cx,
                    py as f32 - cy,
                    radius,
                    px,
                    py,
                    seed,
                );
                if coverage <= 0.0 {
                    continue;
                }
                let alpha = (coverage * color.a as f32) as u8;
                let pixel = scratch.get_pixel_mut(px as u32, py as u32);
                if alpha >= pixel.0[3] {
                    *pixel = Rgba([color.r, color.g, color.b, alpha]);
                }
            }
        }
    });
}

/// Clears ink alpha along an eraser stroke. Hard-edged with a one pixel
/// feather; only the given layer is touched.
pub(crate) fn erase_stroke(ink: &mut RgbaImage, points: &[CanvasPoint], width: f32, scale: f32) {
    let radius = (width * scale * 0.5).max(0.5);
    let spacing = (radius * 0.5).max(1.0);
    let (layer_w, layer_h) = ink.dimensions();

    for_each_stamp(points, scale, spacing, |cx, cy| {
        let reach = radius.ceil() as i32 + 1;
        let center_x = cx.round() as i32;
        let center_y = cy.round() as i32;
        for py in (center_y - reach).max(0)..(center_y + reach + 1).min(layer_h as i32) {
            for px in (center_x - reach).max(0)..(center_x + reach + 1).min(layer_w as i32) {
                let dx = px as f32 - cx;
                let dy = py as f32 - cy;
                let coverage = smoothstep(radius, radius - 1.0, (dx * dx + dy * dy).sqrt());
                if coverage <= 0.0 {
                    continue;
                }
                let pixel = ink.get_pixel_mut(px as u32, py as u32);
                let kept = (pixel.0[3] as f32 * (1.0 - coverage)) as u8;
                pixel.0[3] = kept.min(pixel.0[3]);
            }
        }
    });
}

/// Standard source-over compositing of `src` onto `dst`, same dimensions.
pub(crate) fn blend_over(dst: &mut RgbaImage, src: &RgbaImage) {
    debug_assert_eq!(dst.dimensions(), src.dimensions());
    for (dst_pixel, src_pixel) in dst.pixels_mut().zip(src.pixels()) {
        let src_a = src_pixel.0[3] as f32 / 255.0;
        if src_a <= 0.0 {
            continue;
        }
        let dst_a = dst_pixel.0[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            continue;
        }
        for channel in 0..3 {
            let src_c = src_pixel.0[channel] as f32;
            let dst_c = dst_pixel.0[channel] as f32;
            dst_pixel.0[channel] =
                ((src_c * src_a + dst_c * dst_a * (1.0 - src_a)) / out_a).round() as u8;
        }
        dst_pixel.0[3] = (out_a * 255.0).round() as u8;
    }
}
