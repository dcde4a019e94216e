//! User configuration, loaded from `$XDG_CONFIG_HOME/photomark/config.json`.
//! Missing or malformed files fall back to defaults with a warning instead
//! of failing the session.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::editor::tools::BrushTexture;
use crate::geometry::Color;

pub const CONFIG_DIR: &str = "photomark";
pub const CONFIG_FILE: &str = "config.json";

const DEFAULT_EXPORT_DENSITY: f32 = 2.0;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Initial brush color as `[r, g, b]`.
    brush_color: Option<[u8; 3]>,
    brush_width: Option<f32>,
    /// One of `solid`, `soft`, `spray`, `marker`, `pencil`.
    brush_texture: Option<String>,
    /// Raster pixels per logical canvas unit when flattening for upload.
    export_pixels_per_unit: Option<f32>,
}

impl MarkupConfig {
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            debug!("no config directory resolved, using defaults");
            return Self::default();
        };
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(error) => {
                debug!(path = %path.display(), %error, "config not read, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(error) => {
                warn!(path = %path.display(), %error, "config malformed, using defaults");
                Self::default()
            }
        }
    }

    pub fn brush_color(&self) -> Option<Color> {
        self.brush_color.map(|[r, g, b]| Color::opaque(r, g, b))
    }

    pub fn brush_width(&self) -> Option<f32> {
        self.brush_width
    }

    pub fn brush_texture(&self) -> Option<BrushTexture> {
        let name = self.brush_texture.as_deref()?;
        match name.to_ascii_lowercase().as_str() {
            "solid" => Some(BrushTexture::Solid),
            "soft" => Some(BrushTexture::Soft),
            "spray" => Some(BrushTexture::Spray),
            "marker" => Some(BrushTexture::Marker),
            "pencil" => Some(BrushTexture::Pencil),
            other => {
                warn!(texture = other, "unknown brush texture in config, ignoring");
                None
            }
        }
    }

    pub fn export_pixels_per_unit(&self) -> f32 {
        self.export_pixels_per_unit
            .filter(|density| *density > 0.0)
            .unwrap_or(DEFAULT_EXPORT_DENSITY)
    }
}

fn config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join(CONFIG_DIR).join(CONFIG_FILE))
}
