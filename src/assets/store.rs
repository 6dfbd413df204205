use std::collections::HashMap;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{CardpressError, CardpressResult};
use crate::raster::surface::Surface;

/// The fixed set of frame/badge layers every batch needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Gold frame border.
    FrameGold,
    /// Silver frame border.
    FrameSilver,
    /// Toho frame border.
    FrameToho,
    /// Legend frame border.
    FrameLegend,
    /// White frame border.
    FrameWhite,
    /// Gold title banner.
    TitleGold,
    /// Silver title banner.
    TitleSilver,
    /// Toho title banner.
    TitleToho,
    /// Illustrator-credit box.
    Illust,
}

impl LayerKind {
    /// All nine layers, in load order.
    pub const ALL: [LayerKind; 9] = [
        LayerKind::FrameGold,
        LayerKind::FrameSilver,
        LayerKind::FrameToho,
        LayerKind::FrameLegend,
        LayerKind::FrameWhite,
        LayerKind::TitleGold,
        LayerKind::TitleSilver,
        LayerKind::TitleToho,
        LayerKind::Illust,
    ];

    /// On-disk file name under the frames directory.
    pub fn file_name(self) -> &'static str {
        match self {
            LayerKind::FrameGold => "frame_gold.png",
            LayerKind::FrameSilver => "frame_silver.png",
            LayerKind::FrameToho => "frame_toho.png",
            LayerKind::FrameLegend => "frame_legend.png",
            LayerKind::FrameWhite => "frame_white.png",
            LayerKind::TitleGold => "title_gold.png",
            LayerKind::TitleSilver => "title_silver.png",
            LayerKind::TitleToho => "title_toho.png",
            LayerKind::Illust => "illust.png",
        }
    }
}

/// The nine mandatory frame/badge surfaces.
///
/// Holding them as fields rather than a map makes "every layer is present"
/// a construction-time fact; render code can borrow any layer infallibly.
#[derive(Clone, Debug)]
pub struct LayerSet {
    frame_gold: Surface,
    frame_silver: Surface,
    frame_toho: Surface,
    frame_legend: Surface,
    frame_white: Surface,
    title_gold: Surface,
    title_silver: Surface,
    title_toho: Surface,
    illust: Surface,
}

impl LayerSet {
    /// Build from a `kind -> surface` collection; every kind in
    /// [`LayerKind::ALL`] must be present.
    pub fn from_map(
        layers: impl IntoIterator<Item = (LayerKind, Surface)>,
    ) -> CardpressResult<Self> {
        let mut map: HashMap<LayerKind, Surface> = layers.into_iter().collect();
        let mut take = |kind: LayerKind| {
            map.remove(&kind)
                .ok_or_else(|| CardpressError::asset(format!("frame layer {kind:?} is missing")))
        };
        Ok(Self {
            frame_gold: take(LayerKind::FrameGold)?,
            frame_silver: take(LayerKind::FrameSilver)?,
            frame_toho: take(LayerKind::FrameToho)?,
            frame_legend: take(LayerKind::FrameLegend)?,
            frame_white: take(LayerKind::FrameWhite)?,
            title_gold: take(LayerKind::TitleGold)?,
            title_silver: take(LayerKind::TitleSilver)?,
            title_toho: take(LayerKind::TitleToho)?,
            illust: take(LayerKind::Illust)?,
        })
    }

    /// The same surface in every slot. Test/preview convenience.
    pub fn uniform(surface: Surface) -> Self {
        let s = || surface.clone();
        Self {
            frame_gold: s(),
            frame_silver: s(),
            frame_toho: s(),
            frame_legend: s(),
            frame_white: s(),
            title_gold: s(),
            title_silver: s(),
            title_toho: s(),
            illust: surface,
        }
    }

    /// Borrow one layer.
    pub fn get(&self, kind: LayerKind) -> &Surface {
        match kind {
            LayerKind::FrameGold => &self.frame_gold,
            LayerKind::FrameSilver => &self.frame_silver,
            LayerKind::FrameToho => &self.frame_toho,
            LayerKind::FrameLegend => &self.frame_legend,
            LayerKind::FrameWhite => &self.frame_white,
            LayerKind::TitleGold => &self.title_gold,
            LayerKind::TitleSilver => &self.title_silver,
            LayerKind::TitleToho => &self.title_toho,
            LayerKind::Illust => &self.illust,
        }
    }
}

/// Immutable store of decoded layers and per-card textures.
///
/// All IO happens here, before rendering starts; the render phase only ever
/// borrows surfaces. Frame layers are mandatory (a batch cannot run without
/// them), per-card textures are optional (a missing one fails that card at
/// render time).
#[derive(Debug)]
pub struct AssetStore {
    layers: LayerSet,
    textures: HashMap<String, Surface>,
}

impl AssetStore {
    /// Build a store from already-decoded layers.
    pub fn new(layers: LayerSet) -> Self {
        Self {
            layers,
            textures: HashMap::new(),
        }
    }

    /// Load the nine frame layers from `frames_dir`.
    pub fn load_layers(frames_dir: &Path) -> CardpressResult<Self> {
        let mut layers = Vec::new();
        for kind in LayerKind::ALL {
            let path = frames_dir.join(kind.file_name());
            let bytes = std::fs::read(&path)
                .with_context(|| format!("read frame layer '{}'", path.display()))?;
            layers.push((kind, Surface::decode(&bytes)?));
        }
        Ok(Self::new(LayerSet::from_map(layers)?))
    }

    /// Register a decoded base-illustration texture under `key`.
    pub fn insert_texture(&mut self, key: impl Into<String>, surface: Surface) {
        self.textures.insert(key.into(), surface);
    }

    /// Load `{key}.png` from `textures_dir` for every key in `keys`.
    ///
    /// Keys whose file is absent or undecodable are left out of the store;
    /// the corresponding cards fail individually at render time.
    pub fn load_textures<'a>(
        &mut self,
        textures_dir: &Path,
        keys: impl IntoIterator<Item = &'a str>,
    ) {
        for key in keys {
            if self.textures.contains_key(key) {
                continue;
            }
            let path = textures_dir.join(format!("{key}.png"));
            let Ok(bytes) = std::fs::read(&path) else {
                tracing::debug!(texture = key, path = %path.display(), "texture file not found");
                continue;
            };
            match Surface::decode(&bytes) {
                Ok(surface) => {
                    self.textures.insert(key.to_string(), surface);
                }
                Err(e) => {
                    tracing::warn!(texture = key, error = %e, "texture failed to decode");
                }
            }
        }
    }

    /// Borrow a mandatory frame layer.
    pub fn layer(&self, kind: LayerKind) -> &Surface {
        self.layers.get(kind)
    }

    /// Borrow the base illustration for `key`, if it was loaded.
    pub fn texture(&self, key: &str) -> Option<&Surface> {
        self.textures.get(key)
    }

    /// Number of loaded textures.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_layers() -> impl Iterator<Item = (LayerKind, Surface)> {
        LayerKind::ALL
            .into_iter()
            .map(|kind| (kind, Surface::new(4, 4)))
    }

    #[test]
    fn from_map_requires_the_full_set() {
        assert!(LayerSet::from_map(full_layers()).is_ok());
        let partial = full_layers().skip(1);
        let err = LayerSet::from_map(partial).unwrap_err();
        assert!(err.to_string().contains("FrameGold"));
    }

    #[test]
    fn textures_are_optional_until_rendered() {
        let mut store = AssetStore::new(LayerSet::uniform(Surface::new(4, 4)));
        assert!(store.texture("c001").is_none());
        store.insert_texture("c001", Surface::new(2, 2));
        assert!(store.texture("c001").is_some());
        assert_eq!(store.texture_count(), 1);
    }

    #[test]
    fn layer_lookup_returns_every_kind() {
        let store = AssetStore::new(LayerSet::uniform(Surface::new(4, 4)));
        for kind in LayerKind::ALL {
            assert_eq!(store.layer(kind).width(), 4);
        }
    }

    #[test]
    fn file_names_are_distinct() {
        let mut names: Vec<_> = LayerKind::ALL.iter().map(|k| k.file_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), LayerKind::ALL.len());
    }
}
