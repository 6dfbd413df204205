//! Supersampled single-line text rasterization.
//!
//! The card canvas is too low-resolution for sub-pixel font placement, so
//! text is rasterized into a standalone bitmap at [`SUPERSAMPLE`]x the final
//! size and down-scaled by the compositor when blitted. The outlined style
//! draws the string twice: once in the fill color at the origin and once in
//! black shifted [`SUPERSAMPLE`] internal units (one final-resolution pixel)
//! to the right, which reads as a drop outline after the down-scale.

use crate::foundation::error::{CardpressError, CardpressResult};
use crate::raster::surface::Surface;

/// Internal-to-final resolution factor for text bitmaps.
///
/// Callers divide bitmap extents by this factor when computing placement
/// size on the canvas.
pub const SUPERSAMPLE: u32 = 8;

/// Final-resolution point size for title and illustrator text.
pub const BODY_FONT_PX: f32 = 15.75;

/// Final-resolution point size for the serial id.
pub const SERIAL_FONT_PX: f32 = 11.75;

/// Horizontal pad and outline offset, in internal units.
const OUTLINE_OFFSET: u32 = 8;

/// Fill color plus outline flag for one rasterization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextStyle {
    /// Straight-alpha fill color.
    pub color: [u8; 4],
    /// Draw the black offset copy and reserve the horizontal pad.
    pub outlined: bool,
}

impl TextStyle {
    /// White fill with the black drop outline (most frame variants).
    pub fn outlined_white() -> Self {
        Self {
            color: [255, 255, 255, 255],
            outlined: true,
        }
    }

    /// White fill, no outline (legend frame).
    pub fn plain_white() -> Self {
        Self {
            color: [255, 255, 255, 255],
            outlined: false,
        }
    }

    /// Black fill, no outline (serial id).
    pub fn plain_black() -> Self {
        Self {
            color: [0, 0, 0, 255],
            outlined: false,
        }
    }
}

/// Source of supersampled glyph bitmaps.
///
/// The compositor only needs "text in, bitmap out"; keeping that seam a
/// trait lets tests substitute deterministic bitmaps for real font output.
pub trait GlyphSource: Sync {
    /// Render `text` at `size_px` (final resolution) into a bitmap at
    /// [`SUPERSAMPLE`]x internal resolution.
    fn rasterize(&self, text: &str, size_px: f32, style: TextStyle) -> Surface;
}

/// Rasterizes single lines of text into supersampled glyph bitmaps.
///
/// Layout is typographic: glyphs advance by their nominal advance width
/// with no extra inter-glyph spacing, no kerning, no wrapping.
pub struct TextRasterizer {
    font: fontdue::Font,
}

impl TextRasterizer {
    /// Parse font bytes (TTF/OTF).
    pub fn from_bytes(bytes: &[u8]) -> CardpressResult<Self> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| CardpressError::asset(format!("parse font: {e}")))?;
        Ok(Self { font })
    }

    /// See [`GlyphSource::rasterize`]. The returned surface's extents are
    /// internal units; divide by [`SUPERSAMPLE`] for the placement size.
    fn rasterize_line(&self, text: &str, size_px: f32, style: TextStyle) -> Surface {
        let internal_px = size_px * SUPERSAMPLE as f32;
        let measure = self.measure(text, internal_px);

        let pad = if style.outlined { OUTLINE_OFFSET } else { 0 };
        let width = (measure.width.ceil() as u32).saturating_add(pad);
        let height = (measure.ascent + measure.descent).max(0) as u32;
        let mut out = Surface::new(width, height);

        self.draw_line(&mut out, text, internal_px, style.color, 0, measure.ascent);
        if style.outlined {
            self.draw_line(
                &mut out,
                text,
                internal_px,
                [0, 0, 0, 255],
                OUTLINE_OFFSET as i32,
                measure.ascent,
            );
        }
        out
    }

    /// Ink extent of `text` at an internal pixel size.
    fn measure(&self, text: &str, px: f32) -> LineMeasure {
        let mut width = 0.0f32;
        let mut ascent = 0i32;
        let mut descent = 0i32;
        for ch in text.chars() {
            let metrics = self.font.metrics(ch, px);
            ascent = ascent.max(metrics.height as i32 + metrics.ymin);
            descent = descent.max(-metrics.ymin);
            width += metrics.advance_width;
        }
        LineMeasure {
            width,
            ascent,
            descent,
        }
    }

    /// Blend one pass of glyph coverage into `out`.
    fn draw_line(
        &self,
        out: &mut Surface,
        text: &str,
        px: f32,
        color: [u8; 4],
        x_offset: i32,
        ascent: i32,
    ) {
        let mut cursor = x_offset as f32;
        for ch in text.chars() {
            let (metrics, coverage) = self.font.rasterize(ch, px);
            let glyph_x = cursor.round() as i32 + metrics.xmin;
            let glyph_y = ascent - (metrics.height as i32 + metrics.ymin);

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let c = coverage[gy * metrics.width + gx];
                    if c == 0 {
                        continue;
                    }
                    let dx = glyph_x + gx as i32;
                    let dy = glyph_y + gy as i32;
                    if dx < 0 || dy < 0 {
                        continue;
                    }
                    out.blend_pixel(dx as u32, dy as u32, premul_coverage(color, c));
                }
            }
            cursor += metrics.advance_width;
        }
    }
}

impl GlyphSource for TextRasterizer {
    fn rasterize(&self, text: &str, size_px: f32, style: TextStyle) -> Surface {
        self.rasterize_line(text, size_px, style)
    }
}

/// Premultiplied pixel for a straight color under glyph coverage `c`.
fn premul_coverage(color: [u8; 4], c: u8) -> [u8; 4] {
    let a = (u16::from(color[3]) * u16::from(c) + 127) / 255;
    let mul = |v: u8| (((u16::from(v) * a) + 127) / 255) as u8;
    [mul(color[0]), mul(color[1]), mul(color[2]), a as u8]
}

struct LineMeasure {
    width: f32,
    ascent: i32,
    descent: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Locate any TTF/OTF on the host so text tests can run without a
    /// bundled font. Returns `None` (test becomes a no-op) on bare systems.
    fn system_rasterizer() -> Option<TextRasterizer> {
        let roots = [
            "/usr/share/fonts",
            "/usr/local/share/fonts",
            "/System/Library/Fonts",
            "C:\\Windows\\Fonts",
        ];
        for root in roots {
            if let Some(r) = find_font_in(std::path::Path::new(root)) {
                return Some(r);
            }
        }
        None
    }

    fn find_font_in(dir: &std::path::Path) -> Option<TextRasterizer> {
        let rd = std::fs::read_dir(dir).ok()?;
        for entry in rd.flatten() {
            let path = entry.path();
            if path.is_dir() {
                if let Some(found) = find_font_in(&path) {
                    return Some(found);
                }
                continue;
            }
            let ext = path
                .extension()
                .and_then(|s| s.to_str())
                .map(|s| s.to_ascii_lowercase());
            if !matches!(ext.as_deref(), Some("ttf") | Some("otf")) {
                continue;
            }
            if let Ok(bytes) = std::fs::read(&path) {
                if let Ok(r) = TextRasterizer::from_bytes(&bytes) {
                    return Some(r);
                }
            }
        }
        None
    }

    #[test]
    fn premul_coverage_full_is_color() {
        assert_eq!(
            premul_coverage([255, 255, 255, 255], 255),
            [255, 255, 255, 255]
        );
        assert_eq!(premul_coverage([0, 0, 0, 255], 255), [0, 0, 0, 255]);
    }

    #[test]
    fn premul_coverage_zero_is_transparent() {
        assert_eq!(premul_coverage([255, 255, 255, 255], 0), [0, 0, 0, 0]);
    }

    #[test]
    fn from_bytes_rejects_garbage() {
        assert!(TextRasterizer::from_bytes(&[0u8; 16]).is_err());
    }

    #[test]
    fn empty_text_yields_minimal_bitmap() {
        let Some(r) = system_rasterizer() else { return };
        let bmp = r.rasterize("", BODY_FONT_PX, TextStyle::plain_white());
        assert_eq!((bmp.width(), bmp.height()), (1, 1));
    }

    #[test]
    fn outlined_adds_exactly_the_pad() {
        let Some(r) = system_rasterizer() else { return };
        let plain = r.rasterize("Alice", BODY_FONT_PX, TextStyle::plain_white());
        let outlined = r.rasterize("Alice", BODY_FONT_PX, TextStyle::outlined_white());
        assert_eq!(outlined.width(), plain.width() + SUPERSAMPLE);
        assert_eq!(outlined.height(), plain.height());
    }

    #[test]
    fn rasterized_text_has_ink() {
        let Some(r) = system_rasterizer() else { return };
        let bmp = r.rasterize("X", BODY_FONT_PX, TextStyle::plain_white());
        let has_ink = bmp.data().chunks_exact(4).any(|px| px[3] > 0);
        assert!(has_ink, "glyph bitmap should contain visible pixels");
    }

    #[test]
    fn longer_text_is_wider() {
        let Some(r) = system_rasterizer() else { return };
        let short = r.rasterize("AB", BODY_FONT_PX, TextStyle::plain_white());
        let long = r.rasterize("ABABAB", BODY_FONT_PX, TextStyle::plain_white());
        assert!(long.width() > short.width());
    }

    #[test]
    fn serial_size_is_smaller_than_body() {
        let Some(r) = system_rasterizer() else { return };
        let body = r.rasterize("SV07", BODY_FONT_PX, TextStyle::plain_white());
        let serial = r.rasterize("SV07", SERIAL_FONT_PX, TextStyle::plain_black());
        assert!(serial.width() < body.width());
    }
}
