//! Luminance-to-glyph mapping

use std::rc::Rc;

use super::config::GlyphGridConfig;
use crate::error::{Error, Result};

/// Perceptual grayscale in 0..=1 (luminosity weights, not the average)
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    (0.30 * r as f32 + 0.59 * g as f32 + 0.11 * b as f32) / 255.0
}

/// Converts RGBA pixel buffers into glyph grids.
/// A pure function of the buffer and the config.
#[derive(Debug, Clone)]
pub struct GlyphMapper {
    config: Rc<GlyphGridConfig>,
}

impl GlyphMapper {
    pub fn new(config: Rc<GlyphGridConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Rc<GlyphGridConfig> {
        &self.config
    }

    /// Charset index for a grayscale value, clamped to the ramp
    pub fn glyph_index(&self, gray: f32) -> usize {
        let last = self.config.charset().len() - 1;
        let idx = ((1.0 - gray) * last as f32).floor().clamp(0.0, last as f32) as usize;
        if self.config.invert() {
            last - idx
        } else {
            idx
        }
    }

    /// Glyph for one RGBA pixel; fully transparent pixels are a space
    pub fn glyph_for(&self, rgba: [u8; 4]) -> char {
        let [r, g, b, a] = rgba;
        if a == 0 {
            return ' ';
        }
        self.config.charset()[self.glyph_index(luminance(r, g, b))]
    }

    /// Map a `width x height` RGBA buffer to text, one newline-terminated
    /// line per pixel row.
    pub fn asciify(&self, pixels: &[u8], width: usize, height: usize) -> Result<String> {
        let mut out = String::new();
        self.asciify_into(pixels, width, height, &mut out)?;
        Ok(out)
    }

    /// Same as `asciify`, reusing `out`'s allocation
    pub fn asciify_into(&self, pixels: &[u8], width: usize, height: usize, out: &mut String) -> Result<()> {
        let expected_len = width.checked_mul(height).and_then(|n| n.checked_mul(4));
        if expected_len != Some(pixels.len()) {
            return Err(Error::ResizeRace {
                expected: (width, height),
                actual: pixels.len(),
            });
        }

        out.clear();
        out.reserve((width + 1) * height);

        for row in pixels.chunks_exact(width.max(1) * 4).take(height) {
            for px in row.chunks_exact(4) {
                out.push(self.glyph_for([px[0], px[1], px[2], px[3]]));
            }
            out.push('\n');
        }

        // chunks_exact yields nothing for zero-width rows
        if width == 0 {
            for _ in 0..height {
                out.push('\n');
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::DEFAULT_CHARSET;
    use proptest::prelude::*;

    fn mapper(invert: bool) -> GlyphMapper {
        GlyphMapper::new(Rc::new(
            GlyphGridConfig::new(12.0, "monospace", DEFAULT_CHARSET, invert).unwrap(),
        ))
    }

    fn solid(width: usize, height: usize, rgba: [u8; 4]) -> Vec<u8> {
        rgba.iter().copied().cycle().take(width * height * 4).collect()
    }

    #[test]
    fn mid_gray_buffer_is_uniform_mid_ramp() {
        let out = mapper(false).asciify(&solid(100, 50, [128, 128, 128, 255]), 100, 50).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 50);
        assert!(out.ends_with('\n'));
        for line in lines {
            assert_eq!(line.chars().count(), 100);
            assert!(line.chars().all(|c| c == 'n'));
        }
        assert!(!out.contains(' '));
    }

    #[test]
    fn transparent_buffer_is_all_spaces() {
        let out = mapper(false).asciify(&solid(10, 10, [200, 40, 90, 0]), 10, 10).unwrap();
        assert_eq!(out, format!("{}\n", " ".repeat(10)).repeat(10));
    }

    #[test]
    fn extremes_map_to_ramp_ends() {
        let m = mapper(false);
        assert_eq!(m.glyph_for([255, 255, 255, 255]), ' ');
        assert_eq!(m.glyph_for([0, 0, 0, 255]), '$');

        let inv = mapper(true);
        assert_eq!(inv.glyph_for([255, 255, 255, 255]), '$');
        assert_eq!(inv.glyph_for([0, 0, 0, 255]), ' ');
    }

    #[test]
    fn luminosity_weights_favor_green() {
        assert!(luminance(0, 255, 0) > luminance(255, 0, 0));
        assert!(luminance(255, 0, 0) > luminance(0, 0, 255));
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        let err = mapper(false).asciify(&[0u8; 12], 2, 2).unwrap_err();
        assert!(matches!(err, Error::ResizeRace { expected: (2, 2), actual: 12 }));
    }

    #[test]
    fn overflowing_dimensions_are_a_mismatch() {
        let err = mapper(false).asciify(&[0u8; 16], usize::MAX, 2).unwrap_err();
        assert!(matches!(err, Error::ResizeRace { expected: (usize::MAX, 2), actual: 16 }));
    }

    #[test]
    fn empty_grid_is_empty_string() {
        assert_eq!(mapper(false).asciify(&[], 0, 0).unwrap(), "");
    }

    proptest! {
        #[test]
        fn output_stays_within_charset(
            (w, h, pixels) in (1usize..12, 1usize..12).prop_flat_map(|(w, h)| {
                (Just(w), Just(h), prop::collection::vec(any::<u8>(), w * h * 4))
            }),
            invert in any::<bool>(),
        ) {
            let m = mapper(invert);
            let out = m.asciify(&pixels, w, h).unwrap();
            prop_assert_eq!(out.lines().count(), h);
            for (line, row) in out.lines().zip(pixels.chunks_exact(w * 4)) {
                for (c, px) in line.chars().zip(row.chunks_exact(4)) {
                    if px[3] == 0 {
                        prop_assert_eq!(c, ' ');
                    } else {
                        prop_assert!(DEFAULT_CHARSET.contains(c));
                    }
                }
            }
            // Deterministic: same input, same string
            prop_assert_eq!(out, m.asciify(&pixels, w, h).unwrap());
        }

        #[test]
        fn brighter_never_moves_toward_denser_glyph(a in any::<u8>(), b in any::<u8>()) {
            let m = mapper(false);
            let (lo, hi) = (a.min(b), a.max(b));
            let idx_lo = m.glyph_index(luminance(lo, lo, lo));
            let idx_hi = m.glyph_index(luminance(hi, hi, hi));
            prop_assert!(idx_hi <= idx_lo);
        }
    }
}
