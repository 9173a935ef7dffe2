//! Keyed record pools
//!
//! Every record of the options, others, details and texts categories lives in
//! an [`ObjectPool`] under an [`ObjectKey`]. The key orders by tag name, scope,
//! then the numeric ids, so all incidents of one record sit next to each other
//! and array lookups are range scans.
//!
//! Records are stored type-erased and downcast on the way out: asking for a
//! key that holds a different type returns nothing.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::base::{DetailsBase, EntryDetailsBase, OptionsBase, OthersBase, TextsBase};
use super::{Cmper, Document, Entry, EntryNumber, Inci, PooledRecord, SCORE_PARTID};
use crate::config::ScopeFallback;
use crate::error::{MusxError, Result};

/// A record as stored in a pool.
pub type SharedObject = Arc<dyn Any + Send + Sync>;

// ============================================================================
// OBJECT KEY
// ============================================================================

/// Identity of a pooled record. `None` in a numeric field means the category
/// does not use it, and acts as a wildcard in array lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectKey {
    pub node_id: &'static str,
    pub part_id: Cmper,
    pub cmper1: Option<i32>,
    pub cmper2: Option<i32>,
    pub inci: Option<Inci>,
}

impl ObjectKey {
    pub fn new(
        node_id: &'static str,
        part_id: Cmper,
        cmper1: Option<i32>,
        cmper2: Option<i32>,
        inci: Option<Inci>,
    ) -> Self {
        Self { node_id, part_id, cmper1, cmper2, inci }
    }

    fn with_part(mut self, part_id: Cmper) -> Self {
        self.part_id = part_id;
        self
    }

    /// Last key that shares this key's leading `Some` fields.
    fn upper_bound(&self) -> ObjectKey {
        let mut upper = *self;
        if upper.cmper1.is_none() {
            upper.cmper1 = Some(i32::MAX);
            upper.cmper2 = Some(i32::MAX);
            upper.inci = Some(Inci::MAX);
        } else if upper.cmper2.is_none() {
            upper.cmper2 = Some(i32::MAX);
            upper.inci = Some(Inci::MAX);
        } else if upper.inci.is_none() {
            upper.inci = Some(Inci::MAX);
        }
        upper
    }
}

// ============================================================================
// OBJECT POOL
// ============================================================================

/// Type-erased store shared by the four keyed categories.
#[derive(Debug)]
pub struct ObjectPool {
    objects: BTreeMap<ObjectKey, SharedObject>,
    fallback: Arc<dyn ScopeFallback>,
}

impl ObjectPool {
    pub(crate) fn new(fallback: Arc<dyn ScopeFallback>) -> Self {
        Self {
            objects: BTreeMap::new(),
            fallback,
        }
    }

    /// Insert during decode. A key may only be used once.
    pub(crate) fn add(&mut self, key: ObjectKey, object: SharedObject) -> Result<()> {
        if self.objects.contains_key(&key) {
            return Err(MusxError::decode(format!("duplicate record {:?}", key)));
        }
        self.objects.insert(key, object);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn get_exact<T: Any + Send + Sync>(&self, key: &ObjectKey) -> Option<Arc<T>> {
        let object = self.objects.get(key)?.clone();
        object.downcast::<T>().ok()
    }

    fn range_exact<T: Any + Send + Sync>(&self, key: &ObjectKey) -> Vec<Arc<T>> {
        self.objects
            .range(*key..=key.upper_bound())
            .filter_map(|(_, object)| object.clone().downcast::<T>().ok())
            .collect()
    }

    /// Point lookup, trying each scope the fallback policy names.
    pub fn get<T: Any + Send + Sync>(&self, key: ObjectKey) -> Option<Arc<T>> {
        self.fallback
            .lookup_order(key.part_id)
            .into_iter()
            .find_map(|part| self.get_exact(&key.with_part(part)))
    }

    /// Range lookup over the key's wildcard fields, from the first scope
    /// that has any match. Ordered by key, so incidents come out ascending.
    pub fn get_array<T: Any + Send + Sync>(&self, key: ObjectKey) -> Vec<Arc<T>> {
        for part in self.fallback.lookup_order(key.part_id) {
            let found = self.range_exact(&key.with_part(part));
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }

    /// Every record stored under `node_id`, across all scopes.
    pub fn all<T: Any + Send + Sync>(&self, node_id: &'static str) -> Vec<Arc<T>> {
        let lower = ObjectKey::new(node_id, 0, None, None, None);
        let upper = ObjectKey::new(node_id, Cmper::MAX, None, None, None).upper_bound();
        self.objects
            .range(lower..=upper)
            .filter_map(|(_, object)| object.clone().downcast::<T>().ok())
            .collect()
    }

    /// Mutable access for deferred resolvers. Exact scope only, and fails
    /// with a logic error if a reference to the record has escaped.
    pub(crate) fn get_mut<T: Any + Send + Sync>(&mut self, key: &ObjectKey) -> Result<Option<&mut T>> {
        let object = match self.objects.get_mut(key) {
            Some(object) => object,
            None => return Ok(None),
        };
        let object = Arc::get_mut(object).ok_or_else(|| {
            MusxError::logic(format!("record {:?} is still shared during resolution", key))
        })?;
        Ok(object.downcast_mut::<T>())
    }
}

fn key_of<T: PooledRecord>(part_id: Cmper, cmper1: Option<i32>, cmper2: Option<i32>, inci: Option<Inci>) -> ObjectKey {
    ObjectKey::new(T::XML_NODE_NAME, part_id, cmper1, cmper2, inci)
}

// ============================================================================
// CATEGORY POOLS
// ============================================================================

/// Score and part options. One record per type and scope.
#[derive(Debug)]
pub struct OptionsPool(pub(crate) ObjectPool);

impl OptionsPool {
    /// The score's record of type `T`.
    pub fn get<T: PooledRecord<Identity = OptionsBase>>(&self) -> Option<Arc<T>> {
        self.get_for_part(SCORE_PARTID)
    }

    pub fn get_for_part<T: PooledRecord<Identity = OptionsBase>>(&self, part_id: Cmper) -> Option<Arc<T>> {
        self.0.get(key_of::<T>(part_id, None, None, None))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Records keyed by `cmper` and incident.
#[derive(Debug)]
pub struct OthersPool(pub(crate) ObjectPool);

impl OthersPool {
    /// Incident 0 of `cmper`.
    pub fn get<T: PooledRecord<Identity = OthersBase>>(&self, part_id: Cmper, cmper: Cmper) -> Option<Arc<T>> {
        self.get_inci(part_id, cmper, 0)
    }

    pub fn get_inci<T: PooledRecord<Identity = OthersBase>>(
        &self,
        part_id: Cmper,
        cmper: Cmper,
        inci: Inci,
    ) -> Option<Arc<T>> {
        self.0.get(key_of::<T>(part_id, Some(i32::from(cmper)), None, Some(inci)))
    }

    /// All incidents of `cmper`, by ascending incident.
    pub fn get_array<T: PooledRecord<Identity = OthersBase>>(&self, part_id: Cmper, cmper: Cmper) -> Vec<Arc<T>> {
        self.0.get_array(key_of::<T>(part_id, Some(i32::from(cmper)), None, None))
    }

    /// Every record of type `T` in the scope, by cmper then incident.
    pub fn get_all<T: PooledRecord<Identity = OthersBase>>(&self, part_id: Cmper) -> Vec<Arc<T>> {
        self.0.get_array(key_of::<T>(part_id, None, None, None))
    }

    /// Every record of type `T` in every scope.
    pub fn all<T: PooledRecord<Identity = OthersBase>>(&self) -> Vec<Arc<T>> {
        self.0.all(T::XML_NODE_NAME)
    }

    pub(crate) fn get_mut<T: PooledRecord<Identity = OthersBase>>(
        &mut self,
        part_id: Cmper,
        cmper: Cmper,
        inci: Inci,
    ) -> Result<Option<&mut T>> {
        self.0.get_mut(&key_of::<T>(part_id, Some(i32::from(cmper)), None, Some(inci)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Records keyed by two cmpers, or by entry number, plus incident.
#[derive(Debug)]
pub struct DetailsPool(pub(crate) ObjectPool);

impl DetailsPool {
    /// Incident 0 of `[cmper1, cmper2]`.
    pub fn get<T: PooledRecord<Identity = DetailsBase>>(
        &self,
        part_id: Cmper,
        cmper1: Cmper,
        cmper2: Cmper,
    ) -> Option<Arc<T>> {
        self.get_inci(part_id, cmper1, cmper2, 0)
    }

    pub fn get_inci<T: PooledRecord<Identity = DetailsBase>>(
        &self,
        part_id: Cmper,
        cmper1: Cmper,
        cmper2: Cmper,
        inci: Inci,
    ) -> Option<Arc<T>> {
        self.0.get(key_of::<T>(
            part_id,
            Some(i32::from(cmper1)),
            Some(i32::from(cmper2)),
            Some(inci),
        ))
    }

    /// All incidents of `[cmper1, cmper2]`, by ascending incident.
    pub fn get_array<T: PooledRecord<Identity = DetailsBase>>(
        &self,
        part_id: Cmper,
        cmper1: Cmper,
        cmper2: Cmper,
    ) -> Vec<Arc<T>> {
        self.0
            .get_array(key_of::<T>(part_id, Some(i32::from(cmper1)), Some(i32::from(cmper2)), None))
    }

    pub fn get_for_entry<T: PooledRecord<Identity = EntryDetailsBase>>(
        &self,
        part_id: Cmper,
        entnum: EntryNumber,
        inci: Inci,
    ) -> Option<Arc<T>> {
        self.0.get(key_of::<T>(part_id, Some(entnum), None, Some(inci)))
    }

    /// All incidents attached to an entry, by ascending incident.
    pub fn get_array_for_entry<T: PooledRecord<Identity = EntryDetailsBase>>(
        &self,
        part_id: Cmper,
        entnum: EntryNumber,
    ) -> Vec<Arc<T>> {
        self.0.get_array(key_of::<T>(part_id, Some(entnum), None, None))
    }

    /// Every record of type `T` in every scope.
    pub fn all<T: PooledRecord>(&self) -> Vec<Arc<T>> {
        self.0.all(T::XML_NODE_NAME)
    }

    pub(crate) fn get_mut<T: PooledRecord<Identity = DetailsBase>>(
        &mut self,
        part_id: Cmper,
        cmper1: Cmper,
        cmper2: Cmper,
        inci: Inci,
    ) -> Result<Option<&mut T>> {
        self.0.get_mut(&key_of::<T>(
            part_id,
            Some(i32::from(cmper1)),
            Some(i32::from(cmper2)),
            Some(inci),
        ))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Enigma strings keyed by text number.
#[derive(Debug)]
pub struct TextsPool(pub(crate) ObjectPool);

impl TextsPool {
    pub fn get<T: PooledRecord<Identity = TextsBase>>(&self, text_number: Cmper) -> Option<Arc<T>> {
        self.0.get(key_of::<T>(SCORE_PARTID, Some(i32::from(text_number)), None, None))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Entries by entry number. Entries are global: they have no scope.
#[derive(Debug, Default)]
pub struct EntryPool {
    entries: BTreeMap<EntryNumber, Arc<Entry>>,
}

impl EntryPool {
    pub(crate) fn add(&mut self, entry: Entry) -> Result<()> {
        let entnum = entry.entnum();
        if self.entries.contains_key(&entnum) {
            return Err(MusxError::decode(format!("duplicate entry number {}", entnum)));
        }
        self.entries.insert(entnum, Arc::new(entry));
        Ok(())
    }

    pub fn get(&self, entnum: EntryNumber) -> Option<Arc<Entry>> {
        self.entries.get(&entnum).cloned()
    }

    /// Entries in ascending entry-number order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Entry>> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// CATEGORY MARKERS
// ============================================================================

/// Selects a pool through [`Document::pool`].
pub trait PoolCategory {
    type Pool;

    fn pool(document: &Document) -> &Self::Pool;
}

pub struct Options;
pub struct Others;
pub struct Details;
pub struct Texts;
pub struct Entries;

impl PoolCategory for Options {
    type Pool = OptionsPool;

    fn pool(document: &Document) -> &OptionsPool {
        document.options()
    }
}

impl PoolCategory for Others {
    type Pool = OthersPool;

    fn pool(document: &Document) -> &OthersPool {
        document.others()
    }
}

impl PoolCategory for Details {
    type Pool = DetailsPool;

    fn pool(document: &Document) -> &DetailsPool {
        document.details()
    }
}

impl PoolCategory for Texts {
    type Pool = TextsPool;

    fn pool(document: &Document) -> &TextsPool {
        document.texts()
    }
}

impl PoolCategory for Entries {
    type Pool = EntryPool;

    fn pool(document: &Document) -> &EntryPool {
        document.entries()
    }
}
