//! Grid geometry derived from the container size and glyph metrics

use crate::error::{Error, Result};
use crate::rasterizer::Vec2;

/// Measures the glyph cell of the text surface
pub trait GlyphMetrics {
    /// Advance width of one monospace cell at `font_size` px
    fn cell_width(&self, font_size: f32, font_family: &str) -> f32;
}

/// Fixed advance-to-size ratio; Courier New advances 0.6 em
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMetrics {
    pub advance_ratio: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self { advance_ratio: 0.6 }
    }
}

impl GlyphMetrics for MonospaceMetrics {
    fn cell_width(&self, font_size: f32, _font_family: &str) -> f32 {
        font_size * self.advance_ratio
    }
}

/// Glyph cell size in pixels (width from metrics, height = font size, 1em line height)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSize {
    pub width: f32,
    pub height: f32,
}

impl CellSize {
    /// Fails with `UnsupportedContext` when the metrics cannot size a cell
    pub fn measure(metrics: &dyn GlyphMetrics, font_size: f32, font_family: &str) -> Result<Self> {
        let width = metrics.cell_width(font_size, font_family);
        if !(width.is_finite() && width > 0.0 && font_size.is_finite() && font_size > 0.0) {
            return Err(Error::UnsupportedContext(format!(
                "cannot measure glyph cell for {}px {}",
                font_size, font_family
            )));
        }
        Ok(Self { width, height: font_size })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width_px: f32,
    pub height_px: f32,
    pub columns: usize,
    pub rows: usize,
    pub center: Vec2,
}

impl Viewport {
    /// Columns and rows are floor divisions by the cell size, at least 1
    /// each when the container has any area, 0 otherwise.
    pub fn derive(width_px: f32, height_px: f32, cell: CellSize) -> Self {
        let width_px = if width_px.is_finite() { width_px.max(0.0) } else { 0.0 };
        let height_px = if height_px.is_finite() { height_px.max(0.0) } else { 0.0 };

        let (columns, rows) = if width_px > 0.0 && height_px > 0.0 {
            (
                ((width_px / cell.width).floor() as usize).max(1),
                ((height_px / cell.height).floor() as usize).max(1),
            )
        } else {
            (0, 0)
        };

        Self {
            width_px,
            height_px,
            columns,
            rows,
            center: Vec2::new(width_px / 2.0, height_px / 2.0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns == 0 || self.rows == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell() -> CellSize {
        CellSize::measure(&MonospaceMetrics::default(), 10.0, "monospace").unwrap()
    }

    #[test]
    fn grid_is_floor_division() {
        let vp = Viewport::derive(605.0, 199.0, cell());
        assert_eq!(vp.columns, 100);
        assert_eq!(vp.rows, 19);
        assert_eq!(vp.center, Vec2::new(302.5, 99.5));
    }

    #[test]
    fn tiny_container_still_has_one_cell() {
        let vp = Viewport::derive(2.0, 3.0, cell());
        assert_eq!((vp.columns, vp.rows), (1, 1));
    }

    #[test]
    fn zero_sized_container_is_empty() {
        let vp = Viewport::derive(0.0, 300.0, cell());
        assert_eq!((vp.columns, vp.rows), (0, 0));
        assert!(vp.is_empty());
        assert!(Viewport::derive(f32::NAN, 10.0, cell()).is_empty());
    }

    #[test]
    fn unusable_metrics_are_unsupported() {
        let zero = MonospaceMetrics { advance_ratio: 0.0 };
        assert!(matches!(
            CellSize::measure(&zero, 10.0, "monospace"),
            Err(Error::UnsupportedContext(_))
        ));
    }
}
