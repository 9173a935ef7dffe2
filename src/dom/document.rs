//! The decoded document
//!
//! A [`Document`] owns every pool. It is built once by
//! [`crate::factory::DocumentFactory`] and is read-only afterwards; records
//! reach other records by passing `&Document` to their query methods.

use std::sync::Arc;

use super::details::GFrameHold;
use super::header::Header;
use super::iteration::{check_layer_index, EntryInfo};
use super::pool::{DetailsPool, EntryPool, ObjectPool, OptionsPool, OthersPool, PoolCategory, TextsPool};
use super::{Cmper, LayerIndex};
use crate::config::{DecodeConfig, ScopeFallback};
use crate::error::{IntegrityError, Result};
use crate::factory::populator::report_integrity;

#[derive(Debug)]
pub struct Document {
    pub(crate) header: Option<Header>,
    pub(crate) options: OptionsPool,
    pub(crate) others: OthersPool,
    pub(crate) details: DetailsPool,
    pub(crate) texts: TextsPool,
    pub(crate) entries: EntryPool,
    config: DecodeConfig,
}

impl Document {
    pub(crate) fn new(config: DecodeConfig, fallback: Arc<dyn ScopeFallback>) -> Self {
        Self {
            header: None,
            options: OptionsPool(ObjectPool::new(Arc::clone(&fallback))),
            others: OthersPool(ObjectPool::new(Arc::clone(&fallback))),
            details: DetailsPool(ObjectPool::new(Arc::clone(&fallback))),
            texts: TextsPool(ObjectPool::new(fallback)),
            entries: EntryPool::default(),
            config,
        }
    }

    /// A document with no records, using the config's own fallback policy.
    pub(crate) fn empty(config: &DecodeConfig) -> Self {
        Self::new(config.clone(), Arc::new(config.scope_fallback))
    }

    /// `None` when the file has no `<header>` section.
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn options(&self) -> &OptionsPool {
        &self.options
    }

    pub fn others(&self) -> &OthersPool {
        &self.others
    }

    pub fn details(&self) -> &DetailsPool {
        &self.details
    }

    pub fn texts(&self) -> &TextsPool {
        &self.texts
    }

    pub fn entries(&self) -> &EntryPool {
        &self.entries
    }

    /// Pool of a category selected by marker type, e.g.
    /// `document.pool::<pool::Others>()`.
    pub fn pool<C: PoolCategory>(&self) -> &C::Pool {
        C::pool(self)
    }

    /// The configuration the document was decoded with.
    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Apply this document's integrity policy to a check result.
    pub(crate) fn report_integrity(&self, result: std::result::Result<(), IntegrityError>) -> Result<()> {
        report_integrity(self.config.integrity_policy, result)
    }

    /// Walk one layer of a staff and measure. A location with no frame data
    /// yields nothing and returns `Ok(true)`.
    pub fn iterate_entries<F>(
        &self,
        part_id: Cmper,
        staff: Cmper,
        measure: Cmper,
        layer_index: LayerIndex,
        iterator: F,
    ) -> Result<bool>
    where
        F: FnMut(&EntryInfo) -> bool,
    {
        check_layer_index(layer_index)?;
        match self.details.get::<GFrameHold>(part_id, staff, measure) {
            Some(gfhold) => gfhold.iterate_entries(self, layer_index, iterator),
            None => {
                log::debug!("no frame data for staff {} measure {}", staff, measure);
                Ok(true)
            }
        }
    }

    /// Walk all four layers of a staff and measure in order. Returns
    /// `Ok(false)` as soon as the callback stops any layer.
    pub fn iterate_all_layers<F>(&self, part_id: Cmper, staff: Cmper, measure: Cmper, iterator: F) -> Result<bool>
    where
        F: FnMut(&EntryInfo) -> bool,
    {
        match self.details.get::<GFrameHold>(part_id, staff, measure) {
            Some(gfhold) => gfhold.iterate_all_layers(self, iterator),
            None => {
                log::debug!("no frame data for staff {} measure {}", staff, measure);
                Ok(true)
            }
        }
    }

    pub(crate) fn summary(&self) -> String {
        format!(
            "{} options, {} others, {} details, {} entries, {} texts",
            self.options.len(),
            self.others.len(),
            self.details.len(),
            self.entries.len(),
            self.texts.len()
        )
    }
}
