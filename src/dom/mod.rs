//! Typed document model
//!
//! A decoded file is a [`Document`] owning one pool per record category.
//! Records refer to each other by numeric id only and are looked up through
//! the document when needed, so there are no ownership cycles.
//!
//! - [`options`]: score-wide singletons (fonts, clefs)
//! - [`others`]: records keyed by `cmper` and `inci`
//! - [`details`]: records keyed by two cmpers (or an entry number) and `inci`
//! - [`entries`]: notes and rests, linked by entry number
//! - [`texts`]: raw Enigma strings keyed by text number

use std::any::Any;
use std::fmt;

use crate::error::IntegrityError;

pub mod base;
pub mod details;
pub mod document;
pub mod entries;
pub mod header;
pub mod iteration;
pub mod options;
pub mod others;
pub mod pool;
pub mod texts;

pub use base::{DetailsBase, EntryDetailsBase, FontInfo, OptionsBase, OthersBase, TextsBase};
pub use document::Document;
pub use entries::{Entry, Note, NoteType};
pub use header::Header;
pub use iteration::EntryInfo;
pub use pool::{DetailsPool, EntryPool, ObjectKey, OptionsPool, OthersPool, TextsPool};

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Primary record id
pub type Cmper = u16;
/// Incident number: distinguishes records sharing a cmper
pub type Inci = i16;
pub type EntryNumber = i32;
/// Duration unit: 1024 per quarter note
pub type Edu = i32;
/// Vertical/horizontal page unit: 288 per inch
pub type Evpu = i32;
/// 1/64 of an Evpu
pub type Efix = i32;
pub type NoteNumber = u16;
pub type ClefIndex = u16;
pub type LayerIndex = usize;

/// Scope value of the full score
pub const SCORE_PARTID: Cmper = 0;
/// System id of the settings that apply when no staff system overrides them
pub const BASE_SYSTEM_ID: Cmper = 0;
/// Layers per staff and measure
pub const MAX_LAYERS: usize = 4;
pub const EDU_PER_WHOLE_NOTE: Edu = 4096;

/// How a part-scoped record relates to its score counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShareMode {
    /// Shared with the score in full (no `shared` attribute)
    #[default]
    All,
    /// Some fields are shared (`shared="true"`)
    Partial,
    /// Stands alone (`shared="false"`)
    None,
}

// ============================================================================
// RECORD TRAITS
// ============================================================================

/// Every decoded record type.
///
/// `XML_NODE_NAME` is the tag the type is registered under. Registries
/// refuse to start with two types claiming the same tag.
pub trait Record: Any + Send + Sync + fmt::Debug {
    const XML_NODE_NAME: &'static str;

    /// Structural checks run once, right after the record is populated.
    fn integrity_check(&self) -> Result<(), IntegrityError> {
        Ok(())
    }
}

/// Identity fields shared by all records of one pool category.
pub trait RecordIdentity: Clone + fmt::Debug + Send + Sync + 'static {
    fn object_key(&self, node_id: &'static str) -> ObjectKey;

    fn part_id(&self) -> Cmper;

    fn share_mode(&self) -> ShareMode;

    /// Printable key used in diagnostics
    fn describe(&self) -> String;

    /// Checks common to every record of the category. Always run before the
    /// record type's own [`Record::integrity_check`].
    fn integrity_check(&self, _type_name: &'static str) -> Result<(), IntegrityError> {
        Ok(())
    }
}

/// A record stored in one of the four keyed pools.
pub trait PooledRecord: Record {
    type Identity: RecordIdentity;

    fn from_identity(identity: Self::Identity) -> Self;

    fn identity(&self) -> &Self::Identity;

    fn part_id(&self) -> Cmper {
        self.identity().part_id()
    }

    fn share_mode(&self) -> ShareMode {
        self.identity().share_mode()
    }
}

/// Implements [`PooledRecord`] for a struct with a `base` identity field.
macro_rules! pooled_record {
    ($t:ty, $identity:ty) => {
        impl $crate::dom::PooledRecord for $t {
            type Identity = $identity;

            fn from_identity(identity: $identity) -> Self {
                Self {
                    base: identity,
                    ..Default::default()
                }
            }

            fn identity(&self) -> &$identity {
                &self.base
            }
        }
    };
}

pub(crate) use pooled_record;

/// Validate identity then record, in that order.
pub fn check_record<T: PooledRecord>(record: &T) -> Result<(), IntegrityError> {
    record.identity().integrity_check(T::XML_NODE_NAME)?;
    record.integrity_check()
}
