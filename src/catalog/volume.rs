use std::collections::HashMap;

/// Identity of a card series: `(kind, index)`.
///
/// Cards hold this `Copy` key; the [`VolumeRegistry`] owns the actual
/// [`Volume`] records, so a max-id update made while registering one card is
/// visible to every sibling holding the same key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VolumeKey {
    /// Series kind (0 = normal, 1 = special, others reserved).
    pub kind: u8,
    /// Series number within the kind.
    pub index: u8,
}

/// One card series and the highest member id observed in it so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Volume {
    /// Series kind.
    pub kind: u8,
    /// Series number within the kind.
    pub index: u8,
    /// Maximum member id registered under this key. Never decreases.
    pub max_id: u8,
}

impl Volume {
    /// Serial-id type letter: `N` for kind 0, `S` for kind 1, `?` otherwise.
    pub fn kind_char(&self) -> char {
        match self.kind {
            0 => 'N',
            1 => 'S',
            _ => '?',
        }
    }
}

/// Deduplicating registry of [`Volume`] records, keyed by `(kind, index)`.
///
/// The registry must be fully populated (one pass over the whole catalog)
/// before any serial id is formatted, because the id's denominator is the
/// series-wide maximum. There is no removal; the registry lives for the
/// duration of the batch.
#[derive(Debug, Default)]
pub struct VolumeRegistry {
    volumes: HashMap<VolumeKey, Volume>,
}

impl VolumeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one sighting of member `id` in series `(kind, index)`.
    ///
    /// Creates the volume on first sighting, otherwise folds `id` into the
    /// existing record with a max-merge. Returns the key the card should
    /// hold.
    pub fn observe(&mut self, kind: u8, index: u8, id: u8) -> VolumeKey {
        let key = VolumeKey { kind, index };
        self.volumes
            .entry(key)
            .and_modify(|v| v.max_id = v.max_id.max(id))
            .or_insert(Volume {
                kind,
                index,
                max_id: id,
            });
        key
    }

    /// Look up the volume for `key`, if it was ever observed.
    pub fn get(&self, key: VolumeKey) -> Option<&Volume> {
        self.volumes.get(&key)
    }

    /// Number of distinct series observed.
    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    /// True if nothing has been observed yet.
    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }
}
