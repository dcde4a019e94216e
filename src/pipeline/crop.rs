use image::imageops;
use image::RgbaImage;
use tracing::info;

use crate::editor::tools::CropArea;

/// The rebased canvas produced by confirming a crop. The cropped region
/// becomes the whole canvas; pixel density of the base image is preserved.
#[derive(Debug, Clone)]
pub struct CropExtraction {
    pub image: RgbaImage,
    pub canvas_width: f32,
    pub canvas_height: f32,
}

/// Cuts the confirmed area out of the base image. Returns `None` when the
/// area maps to an empty pixel region.
pub fn apply_crop(
    area: CropArea,
    base: &RgbaImage,
    canvas_width: f32,
    canvas_height: f32,
) -> Option<CropExtraction> {
    let scale_x = base.width() as f32 / canvas_width;
    let scale_y = base.height() as f32 / canvas_height;
    let x0 = ((area.x * scale_x).round().max(0.0) as u32).min(base.width());
    let y0 = ((area.y * scale_y).round().max(0.0) as u32).min(base.height());
    let x1 = (((area.x + area.width) * scale_x).round() as u32).min(base.width());
    let y1 = (((area.y + area.height) * scale_y).round() as u32).min(base.height());
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    let image = imageops::crop_imm(base, x0, y0, x1 - x0, y1 - y0).to_image();
    info!(
        width = image.width(),
        height = image.height(),
        "crop applied, canvas rebased"
    );
    Some(CropExtraction {
        image,
        canvas_width: area.width,
        canvas_height: area.height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn crop_keeps_only_the_selected_region() {
        let mut base = RgbaImage::from_pixel(400, 300, Rgba([0, 0, 0, 255]));
        base.put_pixel(100, 100, Rgba([255, 0, 0, 255]));

        let area = CropArea {
            x: 90.0,
            y: 90.0,
            width: 60.0,
            height: 40.0,
        };
        let extraction =
            apply_crop(area, &base, 400.0, 300.0).expect("crop should produce an image");
        assert_eq!(extraction.image.width(), 60);
        assert_eq!(extraction.image.height(), 40);
        assert_eq!(extraction.canvas_width, 60.0);
        assert_eq!(extraction.canvas_height, 40.0);
        assert_eq!(extraction.image.get_pixel(10, 10).0, [255, 0, 0, 255]);
    }

    #[test]
    fn crop_scales_with_base_pixel_density() {
        let base = RgbaImage::from_pixel(800, 600, Rgba([9, 9, 9, 255]));
        let area = CropArea {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 50.0,
        };
        let extraction =
            apply_crop(area, &base, 400.0, 300.0).expect("crop should produce an image");
        // 2x density base keeps 2x pixels for the same logical area.
        assert_eq!(extraction.image.width(), 200);
        assert_eq!(extraction.image.height(), 100);
        assert_eq!(extraction.canvas_width, 100.0);
    }

    #[test]
    fn empty_pixel_region_yields_none() {
        let base = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let area = CropArea {
            x: 9.9,
            y: 9.9,
            width: 0.05,
            height: 0.05,
        };
        assert!(apply_crop(area, &base, 10.0, 10.0).is_none());
    }
}
