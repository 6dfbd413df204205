//! Cardpress is a batch trading-card compositor.
//!
//! It turns a card catalog into finished card images by layering a base
//! illustration, a frame border, informational badges, and supersampled
//! rasterized text (title, illustrator credit, serial id) selected by each
//! card's frame-variant code.
//!
//! # Pipeline overview
//!
//! 1. **Register**: walk the catalog once, building the [`VolumeRegistry`]
//!    (per-series max-id aggregation). Serial ids are only well-defined
//!    after this phase completes.
//! 2. **Plan**: each card's frame code selects a [`VariantPlan`] from a
//!    data-driven rule table; codes outside the table fail that card only.
//! 3. **Composite**: crop the base illustration onto a fixed 656x994
//!    canvas, then badge, border, text layers in order. Text is rasterized
//!    at 8x internal resolution and down-scaled on placement.
//! 4. **Write** (CLI): encode each finished surface as `{catalog_id}.png`.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Premultiplied RGBA8** end-to-end: surfaces hold premultiplied
//!   pixels; straight alpha exists only at the `image` crate boundary.
//! - **No IO at render time**: layers and textures are front-loaded into an
//!   [`AssetStore`] before the render phase starts.
//! - **Per-card failures are values**: a missing texture or unknown frame
//!   code produces a [`RenderError`] outcome, never a batch abort.
#![forbid(unsafe_code)]

mod assets;
mod catalog;
mod foundation;
mod raster;
mod render;

pub use assets::store::{AssetStore, LayerKind, LayerSet};
pub use catalog::model::{Card, CatalogEntry};
pub use catalog::subst::substitute;
pub use catalog::volume::{Volume, VolumeKey, VolumeRegistry};
pub use foundation::error::{CardpressError, CardpressResult, RenderError};
pub use raster::surface::Surface;
pub use raster::text::{
    GlyphSource, TextRasterizer, TextStyle, BODY_FONT_PX, SERIAL_FONT_PX, SUPERSAMPLE,
};
pub use render::compositor::{
    render_card, text_placement, RenderOptions, CANVAS_HEIGHT, CANVAS_WIDTH,
};
pub use render::pipeline::{Batch, RenderOutcome, RenderStats};
pub use render::variant::{variant_plan, Badge, Border, TextTreatment, TitleBand, VariantPlan};
