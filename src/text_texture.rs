//! Text texture generator
//!
//! Rasterizes a string into a tightly fitted, transparent texture that the
//! scene maps onto its plane. Glyphs come from the public-domain 8x8 bitmap
//! font, scaled to the requested pixel size with nearest sampling.

use font8x8::legacy::BASIC_LEGACY;
use tracing::debug;

use crate::rasterizer::{Color, Texture};

/// Glyph cell edge in font units
const CELL: usize = 8;
/// Baseline sits below this many rows; the last row holds descenders
const BASELINE_ROW: usize = 7;
/// Total padding added to each dimension
pub const PADDING: usize = 20;
/// Left inset and top inset of the drawn text
pub const INSET: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub size_px: f32,
    pub family: String,
    /// CSS weight; 600 and above is drawn bold
    pub weight: u16,
}

impl FontSpec {
    pub fn new(size_px: f32, family: impl Into<String>, weight: u16) -> Self {
        Self {
            size_px,
            family: family.into(),
            weight,
        }
    }

    /// CSS font shorthand, e.g. `600 200px IBM Plex Mono`
    pub fn css(&self) -> String {
        format!("{} {}px {}", self.weight, self.size_px, self.family)
    }

    fn scale(&self) -> f32 {
        if self.size_px.is_finite() && self.size_px > 0.0 {
            self.size_px / CELL as f32
        } else {
            0.0
        }
    }

    fn is_bold(&self) -> bool {
        self.weight >= 600
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(200.0, "IBM Plex Mono", 600)
    }
}

/// Advance width plus ink-bound ascent and descent, in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
}

fn glyph_rows(c: char, bold: bool) -> [u8; 8] {
    let index = c as usize;
    let rows = if index < BASIC_LEGACY.len() {
        BASIC_LEGACY[index]
    } else {
        BASIC_LEGACY[b'?' as usize]
    };
    if bold {
        // Bit 0 is the leftmost pixel, so shifting left smears one column right
        rows.map(|r| r | (r << 1))
    } else {
        rows
    }
}

pub fn measure_text(text: &str, font: &FontSpec) -> TextMetrics {
    let scale = font.scale();
    let mut top = usize::MAX;
    let mut bottom = 0;
    let mut count = 0;

    for c in text.chars() {
        count += 1;
        for (row, bits) in glyph_rows(c, font.is_bold()).iter().enumerate() {
            if *bits != 0 {
                top = top.min(row);
                bottom = bottom.max(row);
            }
        }
    }

    let width = (count * CELL) as f32 * scale;
    if top == usize::MAX {
        return TextMetrics { width, ascent: 0.0, descent: 0.0 };
    }

    TextMetrics {
        width,
        ascent: (BASELINE_ROW as f32 - top as f32) * scale,
        descent: (bottom as f32 + 1.0 - BASELINE_ROW as f32) * scale,
    }
}

/// Texture size for `text`: advance and ink height, each plus `PADDING`
pub fn measure(text: &str, font: &FontSpec) -> (usize, usize) {
    let m = measure_text(text, font);
    (
        m.width.ceil() as usize + PADDING,
        (m.ascent + m.descent).ceil().max(0.0) as usize + PADDING,
    )
}

/// Draw `text` left-inset by 10px with its baseline at `10 + ascent`
pub fn render(text: &str, font: &FontSpec, color: Color) -> Texture {
    let (width, height) = measure(text, font);
    let metrics = measure_text(text, font);
    let scale = font.scale();
    let mut texture = Texture::transparent(width, height);
    texture.name = text.to_string();

    let baseline = INSET + metrics.ascent;
    let cell_top = baseline - BASELINE_ROW as f32 * scale;

    for (i, c) in text.chars().enumerate() {
        let cell_left = INSET + (i * CELL) as f32 * scale;
        for (row, bits) in glyph_rows(c, font.is_bold()).iter().enumerate() {
            for col in 0..CELL {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let x0 = (cell_left + col as f32 * scale).round() as i64;
                let x1 = (cell_left + (col + 1) as f32 * scale).round() as i64;
                let y0 = (cell_top + row as f32 * scale).round() as i64;
                let y1 = (cell_top + (row + 1) as f32 * scale).round() as i64;
                for y in y0.max(0)..y1 {
                    for x in x0.max(0)..x1 {
                        texture.set_pixel(x as usize, y as usize, color);
                    }
                }
            }
        }
    }

    texture
}

/// Cached text texture, regenerated whenever text, font or color change
#[derive(Debug, Clone)]
pub struct TextTexture {
    text: String,
    font: FontSpec,
    color: Color,
    texture: Texture,
}

impl TextTexture {
    pub fn new(text: impl Into<String>, font: FontSpec, color: Color) -> Self {
        let text = text.into();
        let texture = render(&text, &font, color);
        Self { text, font, color, texture }
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.regenerate();
        }
    }

    pub fn set_font(&mut self, font: FontSpec) {
        if font != self.font {
            self.font = font;
            self.regenerate();
        }
    }

    pub fn set_color(&mut self, color: Color) {
        if color != self.color {
            self.color = color;
            self.regenerate();
        }
    }

    fn regenerate(&mut self) {
        self.texture = render(&self.text, &self.font, self.color);
        debug!(
            text = %self.text,
            font = %self.font.css(),
            width = self.texture.width,
            height = self.texture.height,
            "text texture regenerated"
        );
    }
}
