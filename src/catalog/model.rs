use serde::{Deserialize, Serialize};

use crate::catalog::volume::{Volume, VolumeKey};

/// One renderable card.
///
/// Constructed once per catalog entry during the registration phase and
/// immutable thereafter. The referenced series record may still change
/// while registration is running, so [`Card::serial_id`] must not be called
/// until the whole catalog has been observed by the registry.
#[derive(Clone, Debug)]
pub struct Card {
    /// Set version printed in the serial id.
    pub version: u8,
    /// Key of the series this card belongs to.
    pub volume: VolumeKey,
    /// This card's position within its series.
    pub volume_id: u8,
    /// Rarity; values above 3 select gold badge/border art.
    pub rarity: u8,
    /// Base illustration asset key.
    pub texture: String,
    /// Card title, post character-substitution.
    pub title: String,
    /// Illustrator credit, post character-substitution.
    pub illustrator: String,
    /// Copyright line selector.
    pub copyright: u8,
    /// Release year.
    pub year: u16,
    /// Frame-variant code; dispatch key for the compositor rule table.
    /// Widened to `i32` so out-of-range codes are representable and rejected
    /// by the table rather than at parse time.
    pub frame: i32,
    /// Brightness adjustment. Parsed and stored but not consumed by
    /// compositing.
    pub bright: i16,
}

impl Card {
    /// Format the serial id, e.g. `SV07-N012-004/099`.
    ///
    /// `volume` must be the (fully aggregated) record for `self.volume`;
    /// the denominator is the series-wide maximum id.
    pub fn serial_id(&self, volume: &Volume) -> String {
        format!(
            "SV{:02}-{}{:03}-{:03}/{:03}",
            self.version,
            volume.kind_char(),
            volume.index,
            self.volume_id,
            volume.max_id
        )
    }
}

/// Wire record for one catalog entry, as handed over by the external
/// catalog loader. Text fields are raw (pre-substitution).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Catalog id; names the output image.
    pub id: u32,
    /// Set version.
    pub version: u8,
    /// Series kind.
    pub volume_type: u8,
    /// Series number within the kind.
    pub volume: u8,
    /// Position within the series.
    pub volume_id: u8,
    /// Rarity.
    pub rarity: u8,
    /// Base illustration asset key.
    pub texture: String,
    /// Raw title text.
    pub title: String,
    /// Raw illustrator credit.
    pub illustrator: String,
    /// Copyright line selector.
    pub copyright: u8,
    /// Release year.
    pub year: u16,
    /// Frame-variant code.
    pub frame: i32,
    /// Brightness adjustment (inert).
    #[serde(default)]
    pub bright: i16,
}
