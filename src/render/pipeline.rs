//! Two-phase batch driver.
//!
//! Phase 1 ([`Batch::from_catalog`]) walks the catalog once, applying
//! character substitution and folding every card into the volume registry.
//! Phase 2 ([`Batch::render`]) renders all cards in parallel. The split is
//! load-bearing: serial ids read the series-wide maximum id, which is only
//! final once the whole catalog has been observed.

use rayon::prelude::*;

use crate::assets::store::AssetStore;
use crate::catalog::model::{Card, CatalogEntry};
use crate::catalog::subst::substitute;
use crate::catalog::volume::VolumeRegistry;
use crate::foundation::error::{CardpressError, CardpressResult, RenderError};
use crate::raster::surface::Surface;
use crate::raster::text::GlyphSource;
use crate::render::compositor::{render_card, RenderOptions};

/// Result of rendering one card.
#[derive(Debug)]
pub struct RenderOutcome {
    /// Catalog id; names the output image.
    pub catalog_id: u32,
    /// Texture key, kept for diagnostic reporting on failure.
    pub texture: String,
    /// Finished image, or the per-card failure reason.
    pub result: Result<Surface, RenderError>,
}

/// Aggregate tallies for one batch run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Cards in the batch.
    pub total: u64,
    /// Cards that produced an image.
    pub rendered: u64,
    /// Cards that failed (missing texture or unknown frame).
    pub failed: u64,
}

/// A registered catalog, ready to render.
#[derive(Debug)]
pub struct Batch {
    cards: Vec<(u32, Card)>,
    volumes: VolumeRegistry,
}

impl Batch {
    /// Phase 1: build cards and the volume registry from catalog entries.
    ///
    /// Registration is sequential; the per-key max-merge is trivially cheap
    /// at catalog scale and a sequential pass keeps the registry lock-free.
    pub fn from_catalog(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut volumes = VolumeRegistry::new();
        let mut cards = Vec::new();
        for entry in entries {
            let key = volumes.observe(entry.volume_type, entry.volume, entry.volume_id);
            cards.push((
                entry.id,
                Card {
                    version: entry.version,
                    volume: key,
                    volume_id: entry.volume_id,
                    rarity: entry.rarity,
                    texture: entry.texture,
                    title: substitute(&entry.title),
                    illustrator: substitute(&entry.illustrator),
                    copyright: entry.copyright,
                    year: entry.year,
                    frame: entry.frame,
                    bright: entry.bright,
                },
            ));
        }
        tracing::debug!(
            cards = cards.len(),
            volumes = volumes.len(),
            "catalog registered"
        );
        Self { cards, volumes }
    }

    /// Cards in catalog order, with their catalog ids.
    pub fn cards(&self) -> impl Iterator<Item = &(u32, Card)> + '_ {
        self.cards.iter()
    }

    /// Texture keys the batch references, for asset front-loading.
    pub fn texture_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.cards.iter().map(|(_, c)| c.texture.as_str())
    }

    /// The volume registry built during registration.
    pub fn volumes(&self) -> &VolumeRegistry {
        &self.volumes
    }

    /// Number of cards in the batch.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// True when the catalog was empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Phase 2: render every card.
    ///
    /// Per-card renders are independent pure functions of frozen inputs, so
    /// they run on the rayon pool; each worker owns its output surface.
    /// Outcomes come back in catalog order. Per-card failures live inside
    /// the outcomes; `Err` here means a broken pipeline invariant.
    #[tracing::instrument(skip_all, fields(cards = self.cards.len()))]
    pub fn render(
        &self,
        assets: &AssetStore,
        glyphs: &dyn GlyphSource,
        opts: &RenderOptions,
    ) -> CardpressResult<(Vec<RenderOutcome>, RenderStats)> {
        let outcomes = self
            .cards
            .par_iter()
            .map(|(catalog_id, card)| -> CardpressResult<RenderOutcome> {
                let volume = self.volumes.get(card.volume).ok_or_else(|| {
                    CardpressError::pipeline(format!(
                        "card {catalog_id} references an unregistered volume"
                    ))
                })?;
                let result = render_card(card, volume, assets, glyphs, opts);
                if let Err(e) = &result {
                    tracing::debug!(catalog_id, error = %e, "card failed to render");
                }
                Ok(RenderOutcome {
                    catalog_id: *catalog_id,
                    texture: card.texture.clone(),
                    result,
                })
            })
            .collect::<CardpressResult<Vec<_>>>()?;

        let mut stats = RenderStats {
            total: outcomes.len() as u64,
            ..RenderStats::default()
        };
        for outcome in &outcomes {
            match &outcome.result {
                Ok(_) => stats.rendered += 1,
                Err(_) => stats.failed += 1,
            }
        }
        tracing::info!(
            total = stats.total,
            rendered = stats.rendered,
            failed = stats.failed,
            "batch render complete"
        );
        Ok((outcomes, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::store::LayerSet;
    use crate::raster::text::TextStyle;
    use crate::render::compositor::{CANVAS_HEIGHT, CANVAS_WIDTH};

    struct StubGlyphs;

    impl GlyphSource for StubGlyphs {
        fn rasterize(&self, text: &str, _size_px: f32, _style: TextStyle) -> Surface {
            Surface::new((text.chars().count() as u32 * 64).max(1), 160)
        }
    }

    fn entry(id: u32, volume_id: u8, frame: i32, texture: &str) -> CatalogEntry {
        CatalogEntry {
            id,
            version: 7,
            volume_type: 0,
            volume: 12,
            volume_id,
            rarity: 1,
            texture: texture.to_string(),
            title: "T\u{8E94}".to_string(),
            illustrator: "I".to_string(),
            copyright: 0,
            year: 2010,
            frame,
            bright: 0,
        }
    }

    fn store(keys: &[&str]) -> AssetStore {
        let mut store = AssetStore::new(LayerSet::uniform(Surface::new(
            CANVAS_WIDTH,
            CANVAS_HEIGHT,
        )));
        for key in keys {
            store.insert_texture(*key, Surface::new(680, 1074));
        }
        store
    }

    #[test]
    fn registration_substitutes_text_and_aggregates_volumes() {
        let batch = Batch::from_catalog([entry(1, 3, 1, "a"), entry(2, 9, 1, "b")]);
        assert_eq!(batch.len(), 2);
        let (_, card) = batch.cards().next().unwrap();
        assert_eq!(card.title, "T★");
        let volume = batch.volumes().get(card.volume).unwrap();
        assert_eq!(volume.max_id, 9);
    }

    #[test]
    fn serial_ids_use_the_batch_wide_maximum() {
        // The card registered first still formats against the final max.
        let batch = Batch::from_catalog([entry(1, 4, 1, "a"), entry(2, 99, 1, "b")]);
        let (_, first) = batch.cards().next().unwrap();
        let volume = batch.volumes().get(first.volume).unwrap();
        assert_eq!(first.serial_id(volume), "SV07-N012-004/099");
    }

    #[test]
    fn render_tallies_successes_and_failures() {
        let batch = Batch::from_catalog([
            entry(1, 1, 1, "ok"),
            entry(2, 2, 99, "ok"),
            entry(3, 3, 1, "gone"),
        ]);
        let store = store(&["ok"]);
        let (outcomes, stats) = batch
            .render(&store, &StubGlyphs, &RenderOptions::default())
            .unwrap();

        assert_eq!(stats.total, 3);
        assert_eq!(stats.rendered, 1);
        assert_eq!(stats.failed, 2);

        assert_eq!(outcomes[0].catalog_id, 1);
        assert!(outcomes[0].result.is_ok());
        assert_eq!(
            outcomes[1].result,
            Err(RenderError::UnknownFrame { frame: 99 })
        );
        assert_eq!(
            outcomes[2].result,
            Err(RenderError::MissingTexture {
                key: "gone".to_string()
            })
        );
        assert_eq!(outcomes[2].texture, "gone");
    }

    #[test]
    fn outcomes_preserve_catalog_order() {
        let entries: Vec<_> = (0..40).map(|i| entry(i, (i % 7) as u8, 4, "t")).collect();
        let batch = Batch::from_catalog(entries);
        let store = store(&["t"]);
        let (outcomes, stats) = batch
            .render(&store, &StubGlyphs, &RenderOptions::default())
            .unwrap();
        assert_eq!(stats.rendered, 40);
        let ids: Vec<_> = outcomes.iter().map(|o| o.catalog_id).collect();
        assert_eq!(ids, (0..40).collect::<Vec<_>>());
    }

    #[test]
    fn empty_catalog_is_an_empty_batch() {
        let batch = Batch::from_catalog(Vec::<CatalogEntry>::new());
        assert!(batch.is_empty());
        let store = store(&[]);
        let (outcomes, stats) = batch
            .render(&store, &StubGlyphs, &RenderOptions::default())
            .unwrap();
        assert!(outcomes.is_empty());
        assert_eq!(stats, RenderStats::default());
    }
}
