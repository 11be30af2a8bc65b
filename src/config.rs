//! Options loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable option files.
//! Every field has a default, so a file only needs the values it changes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::gesture::SpringConfig;
use crate::glyph::DEFAULT_CHARSET;
use crate::text_texture::FontSpec;

/// Top-level options for the whole front-end
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub glyph: GlyphOptions,
    pub scene: SceneOptions,
    pub gesture: GestureOptions,
    /// How long the splash screen stays up before the effect starts
    pub splash_ms: u64,
    /// Static image shown when the effect cannot run
    pub fallback_image: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            glyph: GlyphOptions::default(),
            scene: SceneOptions::default(),
            gesture: GestureOptions::default(),
            splash_ms: 2000,
            fallback_image: None,
        }
    }
}

/// Glyph grid (text surface) options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlyphOptions {
    pub font_size: f32,
    pub font_family: String,
    pub charset: String,
    pub invert: bool,
}

impl Default for GlyphOptions {
    fn default() -> Self {
        Self {
            font_size: 8.0,
            font_family: "'Courier New', monospace".to_string(),
            charset: DEFAULT_CHARSET.to_string(),
            invert: true,
        }
    }
}

/// Scene options: the text plane and its shading
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneOptions {
    pub text: String,
    pub text_font_size: f32,
    pub text_font_family: String,
    pub text_weight: u16,
    pub text_color: String,
    /// Plane height in world units; width follows the text texture's aspect
    pub plane_base_height: f32,
    pub enable_waves: bool,
    /// Device pixel ratio applied to pointer samples
    pub pixel_ratio: f32,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            text: "Hello World!".to_string(),
            text_font_size: 200.0,
            text_font_family: "IBM Plex Mono".to_string(),
            text_weight: 600,
            text_color: "#fdf9f3".to_string(),
            plane_base_height: 8.0,
            enable_waves: true,
            pixel_ratio: 1.0,
        }
    }
}

impl SceneOptions {
    /// Font the text texture is drawn with
    pub fn font(&self) -> FontSpec {
        FontSpec::new(self.text_font_size, self.text_font_family.clone(), self.text_weight)
    }
}

/// Gesture surface ("card") options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureOptions {
    pub animation_config: SpringConfig,
    pub hover_scale: f32,
    pub offset_x: f32,
    /// Card width in pixels
    pub card_width: f32,
    pub rotation_factor: f32,
    /// Perspective distance in pixels
    pub perspective: f32,
    /// Pinch distance (px) per unit of zoom
    pub zoom_sensitivity: f32,
    pub wheel_config: SpringConfig,
    pub enable_tilt: bool,
    pub enable_zoom: bool,
    pub enable_drag: bool,
}

impl Default for GestureOptions {
    fn default() -> Self {
        Self {
            animation_config: SpringConfig::new(5.0, 350.0, 40.0),
            hover_scale: 1.1,
            offset_x: 20.0,
            card_width: 200.0,
            rotation_factor: 20.0,
            perspective: 300.0,
            zoom_sensitivity: 200.0,
            wheel_config: SpringConfig::new(1.0, 200.0, 30.0),
            enable_tilt: true,
            enable_zoom: true,
            enable_drag: true,
        }
    }
}

impl Options {
    /// Load options from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Parse options from a RON string
    pub fn from_ron(s: &str) -> Result<Self> {
        Ok(ron::from_str(s)?)
    }

    /// Save options to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .indentor("  ".to_string());

        let contents = ron::ser::to_string_pretty(self, config)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
