//! In-memory record of section updates the server has confirmed.
//!
//! A [`Fingerprint`] identifies one section update by its content. If the
//! same fingerprint was delivered before, sending it again cannot change the
//! server's state, so the client skips the request. Evicting an entry only
//! costs one redundant delivery.

use lru::LruCache;
use overlay_sync_config::{OverlayConfig, Section, SectionFields};
use std::num::NonZeroUsize;

/// Content key of a single-section update: the section plus its field/value
/// pairs in key order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    section: Section,
    fields: Vec<(String, String)>,
}

impl Fingerprint {
    pub fn new(section: Section, fields: &SectionFields) -> Self {
        // BTreeMap iteration is already sorted by key.
        Self {
            section,
            fields: fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

/// Applied fingerprints plus the reserved slot for the last fetched full
/// configuration.
pub(crate) struct FingerprintCache {
    applied: LruCache<Fingerprint, ()>,
    full_config: Option<OverlayConfig>,
}

impl FingerprintCache {
    pub(crate) fn new(capacity: NonZeroUsize) -> Self {
        Self {
            applied: LruCache::new(capacity),
            full_config: None,
        }
    }

    /// True if `fingerprint` was delivered successfully. Refreshes its recency.
    pub(crate) fn contains(&mut self, fingerprint: &Fingerprint) -> bool {
        self.applied.get(fingerprint).is_some()
    }

    pub(crate) fn mark_applied(&mut self, fingerprint: Fingerprint) {
        self.applied.put(fingerprint, ());
    }

    pub(crate) fn full_config(&self) -> Option<&OverlayConfig> {
        self.full_config.as_ref()
    }

    pub(crate) fn store_full_config(&mut self, config: OverlayConfig) {
        self.full_config = Some(config);
    }

    pub(crate) fn clear(&mut self) {
        self.applied.clear();
        self.full_config = None;
    }

    pub(crate) fn len(&self) -> usize {
        self.applied.len()
    }
}
