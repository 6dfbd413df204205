//! Per-card compositing.
//!
//! One card renders as a fixed stack on a 656x994 canvas:
//! base illustration (cropped) -> badge -> frame border -> illustrator
//! text -> title text -> serial id. Which layers exist and how text is
//! treated comes from the frame-variant table in [`crate::render::variant`].

use crate::assets::store::{AssetStore, LayerKind};
use crate::catalog::model::Card;
use crate::catalog::volume::Volume;
use crate::foundation::error::RenderError;
use crate::raster::surface::Surface;
use crate::raster::text::{GlyphSource, TextStyle, BODY_FONT_PX, SERIAL_FONT_PX, SUPERSAMPLE};
use crate::render::variant::{variant_plan, Badge, Border, TextTreatment, TitleBand};

/// Final image width.
pub const CANVAS_WIDTH: u32 = 656;
/// Final image height.
pub const CANVAS_HEIGHT: u32 = 994;

/// Crop offset into the raw base illustration.
const RAW_OFFSET_X: i32 = 12;
const RAW_OFFSET_Y: i32 = 40;

/// Title banner rect `(x, y, w, h)`.
const TITLE_BAND: (f32, f32, f32, f32) = (14.0, 833.0, 630.0, 148.0);
/// Toho title banner rect, three pixels higher.
const TITLE_BAND_TOHO: (f32, f32, f32, f32) = (14.0, 830.0, 630.0, 148.0);
/// Illustrator-credit box rect.
const ILLUST_BOX: (f32, f32, f32, f32) = (14.0, 901.0, 316.0, 72.0);

/// Left anchor of the illustrator credit line.
const ILLUST_TEXT_X: u32 = 27;
/// Baseline-top y of both text lines.
const TEXT_Y: f32 = 938.0;
/// Serial id anchor.
const SERIAL_X: f32 = 17.0;
const SERIAL_Y: f32 = 969.0;

/// Batch-wide rendering configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderOptions {
    /// Right-align titles narrower than the text column (and widen the
    /// column from 264 to 275).
    pub title_align_right: bool,
    /// Draw the serial id (suppressed regardless for volume kinds >= 2).
    pub print_serial: bool,
}

impl RenderOptions {
    /// Maximum text column width at final resolution.
    pub fn max_text_width(&self) -> u32 {
        if self.title_align_right {
            275
        } else {
            264
        }
    }

    /// Left anchor of the title column.
    pub fn title_text_x(&self) -> u32 {
        CANVAS_WIDTH - ILLUST_TEXT_X - self.max_text_width()
    }
}

/// Compute where a supersampled text bitmap lands on the canvas.
///
/// `raw_w`/`raw_h` are internal (8x) bitmap extents. Returns
/// `(x, width, height)` at final resolution:
///
/// - wider than the column: width is exactly `max_width` (the text is
///   horizontally compressed, never wrapped or truncated) and any
///   right-alignment shift is suppressed;
/// - otherwise width is `raw_w / 8`, shifted right so the right edge meets
///   `anchor_x + max_width` when `align_right` is set.
///
/// Height is always `raw_h / 8`, independent of width compression.
pub fn text_placement(
    raw_w: u32,
    raw_h: u32,
    anchor_x: u32,
    max_width: u32,
    align_right: bool,
) -> (f32, f32, f32) {
    let scale = SUPERSAMPLE as f32;
    let height = raw_h as f32 / scale;
    if raw_w > max_width * SUPERSAMPLE {
        return (anchor_x as f32, max_width as f32, height);
    }
    let width = raw_w as f32 / scale;
    let x = if align_right {
        anchor_x as f32 + max_width as f32 - width
    } else {
        anchor_x as f32
    };
    (x, width, height)
}

/// Badge art for a plan entry, resolving rarity-dependent choices.
fn badge_layer(badge: Badge, rarity: u8) -> LayerKind {
    match badge {
        Badge::TitleByRarity => {
            if rarity > 3 {
                LayerKind::TitleGold
            } else {
                LayerKind::TitleSilver
            }
        }
        Badge::TitleToho => LayerKind::TitleToho,
        Badge::TitleGold => LayerKind::TitleGold,
        Badge::Illust => LayerKind::Illust,
    }
}

/// Border art for a plan entry, resolving rarity-dependent choices.
fn border_layer(border: Border, rarity: u8) -> LayerKind {
    match border {
        Border::ByRarity => {
            if rarity > 3 {
                LayerKind::FrameGold
            } else {
                LayerKind::FrameSilver
            }
        }
        Border::Toho => LayerKind::FrameToho,
        Border::Gold => LayerKind::FrameGold,
        Border::Legend => LayerKind::FrameLegend,
        Border::White => LayerKind::FrameWhite,
        Border::Silver => LayerKind::FrameSilver,
    }
}

fn treatment_style(treatment: TextTreatment) -> TextStyle {
    match treatment {
        TextTreatment::Outlined => TextStyle::outlined_white(),
        TextTreatment::Plain => TextStyle::plain_white(),
    }
}

fn band_rect(band: TitleBand) -> (f32, f32, f32, f32) {
    match band {
        TitleBand::Standard => TITLE_BAND,
        TitleBand::Toho => TITLE_BAND_TOHO,
    }
}

/// Composite one card into a finished canvas.
///
/// `volume` must be the fully aggregated series record for `card.volume`.
/// Fails (returning no image at all) when the base texture is absent or the
/// frame code is not in the variant table; both are per-card conditions the
/// batch driver reports and skips.
pub fn render_card(
    card: &Card,
    volume: &Volume,
    assets: &AssetStore,
    glyphs: &dyn GlyphSource,
    opts: &RenderOptions,
) -> Result<Surface, RenderError> {
    let base = assets
        .texture(&card.texture)
        .ok_or_else(|| RenderError::MissingTexture {
            key: card.texture.clone(),
        })?;
    let plan = variant_plan(card.frame).ok_or(RenderError::UnknownFrame { frame: card.frame })?;

    let mut canvas = Surface::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    canvas.blit_cropped(base, RAW_OFFSET_X, RAW_OFFSET_Y);

    if let Some(badge) = plan.badge {
        // Title variants park the badge in the title band, credit-only
        // variants in the illustrator box.
        let (x, y, w, h) = match plan.title {
            Some((_, band)) => band_rect(band),
            None => ILLUST_BOX,
        };
        canvas.blit_scaled(assets.layer(badge_layer(badge, card.rarity)), x, y, w, h);
    }

    if let Some(border) = plan.border {
        canvas.blit_scaled(
            assets.layer(border_layer(border, card.rarity)),
            0.0,
            0.0,
            CANVAS_WIDTH as f32,
            CANVAS_HEIGHT as f32,
        );
    }

    if let Some(treatment) = plan.illustrator {
        let bmp = glyphs.rasterize(&card.illustrator, BODY_FONT_PX, treatment_style(treatment));
        let (x, w, h) = text_placement(
            bmp.width(),
            bmp.height(),
            ILLUST_TEXT_X,
            opts.max_text_width(),
            false,
        );
        canvas.blit_scaled(&bmp, x, TEXT_Y, w, h);
    }

    if let Some((treatment, _)) = plan.title {
        let bmp = glyphs.rasterize(&card.title, BODY_FONT_PX, treatment_style(treatment));
        let (x, w, h) = text_placement(
            bmp.width(),
            bmp.height(),
            opts.title_text_x(),
            opts.max_text_width(),
            opts.title_align_right,
        );
        canvas.blit_scaled(&bmp, x, TEXT_Y, w, h);
    }

    if opts.print_serial && volume.kind < 2 {
        let id = card.serial_id(volume);
        let bmp = glyphs.rasterize(&id, SERIAL_FONT_PX, TextStyle::plain_black());
        let scale = SUPERSAMPLE as f32;
        canvas.blit_scaled(
            &bmp,
            SERIAL_X,
            SERIAL_Y,
            bmp.width() as f32 / scale,
            bmp.height() as f32 / scale,
        );
    }

    Ok(canvas)
}
