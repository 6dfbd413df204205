use crate::foundation::error::{CardpressError, CardpressResult};

/// Premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over blend of premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

/// Owned premultiplied RGBA8 pixel buffer, row-major, tightly packed.
///
/// All compositing in Cardpress happens on `Surface` values; straight-alpha
/// data exists only at the `image` crate boundary (decode on load, encode on
/// save).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Transparent surface of the given size.
    ///
    /// Zero dimensions are clamped to 1 so downstream blits never divide by
    /// an empty extent.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize) * 4],
        }
    }

    /// Build a surface from straight-alpha RGBA8 bytes, premultiplying.
    pub fn from_straight_rgba8(width: u32, height: u32, mut rgba: Vec<u8>) -> CardpressResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| CardpressError::validation("surface dimensions overflow"))?;
        if rgba.len() != expected || width == 0 || height == 0 {
            return Err(CardpressError::validation(format!(
                "straight rgba buffer of {} bytes does not match {width}x{height}",
                rgba.len()
            )));
        }
        premultiply_rgba8_in_place(&mut rgba);
        Ok(Self {
            width,
            height,
            data: rgba,
        })
    }

    /// Decode encoded image bytes (PNG etc.) into a premultiplied surface.
    pub fn decode(bytes: &[u8]) -> CardpressResult<Self> {
        use anyhow::Context as _;
        let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_straight_rgba8(width, height, rgba.into_raw())
    }

    /// Export as a straight-alpha `image` buffer for encoding.
    pub fn to_straight_image(&self) -> image::RgbaImage {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = px[3] as u32;
            if a == 0 || a == 255 {
                continue;
            }
            for c in px.iter_mut().take(3) {
                *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        // Dimensions match the data length by construction.
        image::RgbaImage::from_raw(self.width, self.height, out)
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw premultiplied bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at `(x, y)`; out-of-bounds reads are transparent.
    pub fn pixel(&self, x: i64, y: i64) -> PremulRgba8 {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return [0, 0, 0, 0];
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Source-over blend `src` onto the pixel at `(x, y)`.
    pub fn blend_pixel(&mut self, x: u32, y: u32, src: PremulRgba8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let dst = [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ];
        let out = over(dst, src);
        self.data[idx..idx + 4].copy_from_slice(&out);
    }

    /// Fill the whole surface from `src`, reading `src` starting at
    /// `(src_x, src_y)` with no scaling. Source reads outside `src` are
    /// transparent.
    pub fn blit_cropped(&mut self, src: &Surface, src_x: i32, src_y: i32) {
        for y in 0..self.height {
            for x in 0..self.width {
                let px = src.pixel(i64::from(src_x) + i64::from(x), i64::from(src_y) + i64::from(y));
                self.blend_pixel(x, y, px);
            }
        }
    }

    /// Draw all of `src` into the destination rectangle
    /// `(x, y, w, h)` (canvas space, fractional extents allowed), scaling
    /// with bilinear filtering and source-over blending.
    ///
    /// This is the one primitive behind badge/border placement and the
    /// 1/8 down-scale of supersampled text layers.
    pub fn blit_scaled(&mut self, src: &Surface, x: f32, y: f32, w: f32, h: f32) {
        if !(w > 0.0) || !(h > 0.0) {
            return;
        }

        let x0 = x.floor() as i64;
        let y0 = y.floor() as i64;
        let x1 = (x + w).ceil() as i64;
        let y1 = (y + h).ceil() as i64;

        let sw = src.width as f32;
        let sh = src.height as f32;

        for dy in y0..y1 {
            if dy < 0 || dy >= i64::from(self.height) {
                continue;
            }
            let cy = dy as f32 + 0.5;
            if cy < y || cy >= y + h {
                continue;
            }
            let sy = (cy - y) / h * sh - 0.5;
            for dx in x0..x1 {
                if dx < 0 || dx >= i64::from(self.width) {
                    continue;
                }
                let cx = dx as f32 + 0.5;
                if cx < x || cx >= x + w {
                    continue;
                }
                let sx = (cx - x) / w * sw - 0.5;
                let px = sample_bilinear(src, sx, sy);
                self.blend_pixel(dx as u32, dy as u32, px);
            }
        }
    }
}

/// Bilinear sample at fractional source coordinates, edges clamped.
fn sample_bilinear(src: &Surface, sx: f32, sy: f32) -> PremulRgba8 {
    let fx = sx.floor();
    let fy = sy.floor();
    let tx = sx - fx;
    let ty = sy - fy;

    let x0 = fx as i64;
    let y0 = fy as i64;
    let clamp_x = |v: i64| v.clamp(0, i64::from(src.width) - 1);
    let clamp_y = |v: i64| v.clamp(0, i64::from(src.height) - 1);

    let p00 = src.pixel(clamp_x(x0), clamp_y(y0));
    let p10 = src.pixel(clamp_x(x0 + 1), clamp_y(y0));
    let p01 = src.pixel(clamp_x(x0), clamp_y(y0 + 1));
    let p11 = src.pixel(clamp_x(x0 + 1), clamp_y(y0 + 1));

    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = f32::from(p00[i]) * (1.0 - tx) + f32::from(p10[i]) * tx;
        let bot = f32::from(p01[i]) * (1.0 - tx) + f32::from(p11[i]) * tx;
        out[i] = (top * (1.0 - ty) + bot * ty).round().clamp(0.0, 255.0) as u8;
    }
    out
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, px: PremulRgba8) -> Surface {
        let mut s = Surface::new(width, height);
        for y in 0..height {
            for x in 0..width {
                s.blend_pixel(x, y, px);
            }
        }
        s
    }

    #[test]
    fn over_src_alpha_0_is_noop() {
        let dst = [10, 20, 30, 40];
        assert_eq!(over(dst, [255, 255, 255, 0]), dst);
    }

    #[test]
    fn over_src_opaque_replaces_dst() {
        let src = [255, 0, 0, 255];
        assert_eq!(over([0, 0, 0, 255], src), src);
    }

    #[test]
    fn over_dst_transparent_returns_src() {
        let src = [100, 110, 120, 200];
        assert_eq!(over([0, 0, 0, 0], src), src);
    }

    #[test]
    fn new_clamps_zero_dimensions() {
        let s = Surface::new(0, 0);
        assert_eq!((s.width(), s.height()), (1, 1));
    }

    #[test]
    fn from_straight_rejects_mismatched_buffer() {
        assert!(Surface::from_straight_rgba8(2, 2, vec![0u8; 15]).is_err());
    }

    #[test]
    fn straight_roundtrip_preserves_opaque_pixels() {
        let s = Surface::from_straight_rgba8(1, 1, vec![12, 34, 56, 255]).unwrap();
        let img = s.to_straight_image();
        assert_eq!(img.get_pixel(0, 0).0, [12, 34, 56, 255]);
    }

    #[test]
    fn premultiply_zero_alpha_clears_color() {
        let s = Surface::from_straight_rgba8(1, 1, vec![200, 200, 200, 0]).unwrap();
        assert_eq!(s.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn blit_cropped_reads_offset_region() {
        let mut src = Surface::new(4, 4);
        src.blend_pixel(2, 3, [0, 255, 0, 255]);
        let mut dst = Surface::new(2, 2);
        dst.blit_cropped(&src, 1, 2);
        assert_eq!(dst.pixel(1, 1), [0, 255, 0, 255]);
        assert_eq!(dst.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn blit_cropped_out_of_range_source_is_transparent() {
        let src = solid(2, 2, [255, 255, 255, 255]);
        let mut dst = Surface::new(3, 3);
        dst.blit_cropped(&src, 1, 1);
        // Only the overlapping 1x1 corner lands.
        assert_eq!(dst.pixel(0, 0), [255, 255, 255, 255]);
        assert_eq!(dst.pixel(2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn blit_scaled_identity_copies_exactly() {
        let mut src = Surface::new(3, 3);
        src.blend_pixel(1, 1, [9, 18, 27, 255]);
        let mut dst = Surface::new(3, 3);
        dst.blit_scaled(&src, 0.0, 0.0, 3.0, 3.0);
        assert_eq!(dst.pixel(1, 1), [9, 18, 27, 255]);
        assert_eq!(dst.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn blit_scaled_covers_destination_rect_only() {
        let src = solid(8, 8, [255, 255, 255, 255]);
        let mut dst = Surface::new(10, 10);
        dst.blit_scaled(&src, 2.0, 2.0, 4.0, 4.0);
        assert_eq!(dst.pixel(1, 1), [0, 0, 0, 0]);
        assert_eq!(dst.pixel(3, 3), [255, 255, 255, 255]);
        assert_eq!(dst.pixel(5, 5), [255, 255, 255, 255]);
        assert_eq!(dst.pixel(6, 6), [0, 0, 0, 0]);
    }

    #[test]
    fn blit_scaled_downscale_averages_coverage() {
        // 8x8 opaque white squashed into 1x1 stays opaque white.
        let src = solid(8, 8, [255, 255, 255, 255]);
        let mut dst = Surface::new(1, 1);
        dst.blit_scaled(&src, 0.0, 0.0, 1.0, 1.0);
        assert_eq!(dst.pixel(0, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn blit_scaled_zero_extent_is_noop() {
        let src = solid(4, 4, [255, 0, 0, 255]);
        let mut dst = Surface::new(4, 4);
        dst.blit_scaled(&src, 0.0, 0.0, 0.0, 4.0);
        assert_eq!(dst, Surface::new(4, 4));
    }
}
