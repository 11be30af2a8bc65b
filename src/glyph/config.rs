//! Glyph grid configuration

use crate::config::GlyphOptions;
use crate::error::{Error, Result};

/// Sparse-to-dense glyph ramp
pub const DEFAULT_CHARSET: &str =
    " .'`^\",:;Il!i~+_-?][}{1)(|/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// Immutable after construction; shared read-only by the mapper and
/// the text surface that displays its output.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphGridConfig {
    font_size_px: f32,
    font_family: String,
    charset: Vec<char>,
    invert: bool,
}

impl GlyphGridConfig {
    /// Fails with `DegenerateCharset` when the ramp has fewer than two
    /// glyphs or repeats one (each glyph is its own luminance bucket).
    pub fn new(font_size_px: f32, font_family: impl Into<String>, charset: &str, invert: bool) -> Result<Self> {
        let chars: Vec<char> = charset.chars().collect();
        if chars.len() < 2 {
            return Err(Error::DegenerateCharset(format!(
                "need at least 2 glyphs, got {}",
                chars.len()
            )));
        }

        for (i, c) in chars.iter().enumerate() {
            if chars[..i].contains(c) {
                return Err(Error::DegenerateCharset(format!("glyph {:?} appears more than once", c)));
            }
        }

        Ok(Self {
            font_size_px,
            font_family: font_family.into(),
            charset: chars,
            invert,
        })
    }

    pub fn from_options(opts: &GlyphOptions) -> Result<Self> {
        Self::new(opts.font_size, opts.font_family.clone(), &opts.charset, opts.invert)
    }

    pub fn font_size_px(&self) -> f32 {
        self.font_size_px
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn charset(&self) -> &[char] {
        &self.charset
    }

    pub fn invert(&self) -> bool {
        self.invert
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_charset_is_valid() {
        let cfg = GlyphGridConfig::new(12.0, "monospace", DEFAULT_CHARSET, false).unwrap();
        assert_eq!(cfg.charset().len(), 67);
        assert_eq!(cfg.charset()[0], ' ');
    }

    #[test]
    fn short_charset_fails_fast() {
        assert!(matches!(
            GlyphGridConfig::new(12.0, "monospace", "#", false),
            Err(Error::DegenerateCharset(_))
        ));
        assert!(matches!(
            GlyphGridConfig::new(12.0, "monospace", "", false),
            Err(Error::DegenerateCharset(_))
        ));
    }

    #[test]
    fn duplicate_glyphs_are_rejected() {
        assert!(matches!(
            GlyphGridConfig::new(12.0, "monospace", " .:.#", false),
            Err(Error::DegenerateCharset(_))
        ));
    }
}
