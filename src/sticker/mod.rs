//! Reusable sticker bitmaps produced by the cutout pipeline or imported
//! from encoded images.

use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::RgbaImage;
use thiserror::Error;
use tracing::info;

/// Longest edge of a generated thumbnail, in pixels.
pub const THUMBNAIL_EDGE: u32 = 96;

#[derive(Debug, Error)]
pub enum StickerError {
    #[error("failed to decode sticker image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("sticker image has zero size")]
    EmptyImage,
}

/// One library entry. The full bitmap is shared, so placing a sticker on
/// the canvas never copies pixels.
#[derive(Debug, Clone)]
pub struct Sticker {
    pub id: u64,
    pub bitmap: Arc<RgbaImage>,
    pub thumbnail: RgbaImage,
}

#[derive(Debug, Clone, Default)]
pub struct StickerLibrary {
    stickers: Vec<Sticker>,
    next_id: u64,
}

impl StickerLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a ready bitmap, typically a cutout extraction.
    pub fn add_bitmap(&mut self, bitmap: RgbaImage) -> Result<u64, StickerError> {
        if bitmap.width() == 0 || bitmap.height() == 0 {
            return Err(StickerError::EmptyImage);
        }
        self.next_id += 1;
        let id = self.next_id;
        let thumbnail = make_thumbnail(&bitmap);
        info!(sticker = id, width = bitmap.width(), height = bitmap.height(), "sticker added");
        self.stickers.push(Sticker {
            id,
            bitmap: Arc::new(bitmap),
            thumbnail,
        });
        Ok(id)
    }

    /// Decodes an encoded image (PNG, JPEG, ...) into a new sticker.
    pub fn add_encoded(&mut self, bytes: &[u8]) -> Result<u64, StickerError> {
        let decoded = image::load_from_memory(bytes)?.to_rgba8();
        self.add_bitmap(decoded)
    }

    pub fn get(&self, id: u64) -> Option<&Sticker> {
        self.stickers.iter().find(|sticker| sticker.id == id)
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.stickers.len();
        self.stickers.retain(|sticker| sticker.id != id);
        self.stickers.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sticker> {
        self.stickers.iter()
    }

    pub fn len(&self) -> usize {
        self.stickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }
}

fn make_thumbnail(bitmap: &RgbaImage) -> RgbaImage {
    let (width, height) = bitmap.dimensions();
    if width <= THUMBNAIL_EDGE && height <= THUMBNAIL_EDGE {
        return bitmap.clone();
    }
    let scale = THUMBNAIL_EDGE as f32 / width.max(height) as f32;
    let thumb_w = ((width as f32 * scale).round() as u32).max(1);
    let thumb_h = ((height as f32 * scale).round() as u32).max(1);
    imageops::resize(bitmap, thumb_w, thumb_h, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_bitmap_assigns_increasing_ids_and_keeps_pixels_shared() {
        let mut library = StickerLibrary::new();
        let a = library
            .add_bitmap(RgbaImage::new(10, 10))
            .expect("sticker should be accepted");
        let b = library
            .add_bitmap(RgbaImage::new(12, 8))
            .expect("sticker should be accepted");
        assert!(b > a);

        let sticker = library.get(a).expect("sticker should exist");
        let placed = Arc::clone(&sticker.bitmap);
        assert_eq!(placed.width(), 10);
        assert_eq!(library.len(), 2);
    }

    #[test]
    fn zero_sized_bitmaps_are_rejected() {
        let mut library = StickerLibrary::new();
        assert!(matches!(
            library.add_bitmap(RgbaImage::new(0, 5)),
            Err(StickerError::EmptyImage)
        ));
    }

    #[test]
    fn large_stickers_get_scaled_thumbnails() {
        let mut library = StickerLibrary::new();
        let id = library
            .add_bitmap(RgbaImage::new(480, 240))
            .expect("sticker should be accepted");
        let sticker = library.get(id).expect("sticker should exist");
        assert_eq!(sticker.thumbnail.width(), THUMBNAIL_EDGE);
        assert_eq!(sticker.thumbnail.height(), THUMBNAIL_EDGE / 2);
    }

    #[test]
    fn remove_drops_the_entry() {
        let mut library = StickerLibrary::new();
        let id = library
            .add_bitmap(RgbaImage::new(4, 4))
            .expect("sticker should be accepted");
        assert!(library.remove(id));
        assert!(!library.remove(id));
        assert!(library.is_empty());
    }
}
