//! Type registries
//!
//! One static table per record category, mapping a wire tag name to the
//! function that builds, populates and checks a record of that type. A tag
//! with no entry is skipped by the factory.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use super::populator::{FieldPopulator, PopulateContext};
use crate::dom::details::{GFrameHold, StaffGroup, TupletDef};
use crate::dom::options::{ClefOptions, FontOptions};
use crate::dom::others::{
    FontDefinition, Frame, InstrumentUsed, LayerAttributes, MarkingCategory, MarkingCategoryName, MultiStaffGroupId,
    MultiStaffInstrumentGroup, PartDefinition, PartGlobals, Staff, TextBlock, TextExpressionDef,
    TextExpressionEnclosure, TextRepeatEnclosure,
};
use crate::dom::pool::{ObjectKey, SharedObject};
use crate::dom::texts::{BlockText, ExpressionText};
use crate::dom::{check_record, DetailsBase, EntryDetailsBase, OptionsBase, OthersBase, PooledRecord, RecordIdentity, TextsBase};
use crate::error::Result;
use crate::xml::XmlElement;

/// Builds one record from its identity and element, ready for its pool.
pub type CreateFn<I> = fn(I, &dyn XmlElement, &mut PopulateContext<'_>) -> Result<(ObjectKey, SharedObject)>;

/// Populate, queue resolvers, then check. The check result goes through
/// the integrity policy, so a lenient decode still stores the record.
fn create_record<T>(identity: T::Identity, element: &dyn XmlElement, ctx: &mut PopulateContext<'_>) -> Result<(ObjectKey, SharedObject)>
where
    T: PooledRecord + FieldPopulator,
{
    let mut instance = T::from_identity(identity);
    instance.populate(element, ctx)?;
    ctx.register_resolvers::<T>();
    ctx.report_integrity(check_record(&instance))?;
    let key = instance.identity().object_key(T::XML_NODE_NAME);
    Ok((key, Arc::new(instance)))
}

fn entry<T>() -> (&'static str, CreateFn<T::Identity>)
where
    T: PooledRecord + FieldPopulator,
{
    (T::XML_NODE_NAME, create_record::<T> as CreateFn<T::Identity>)
}

/// Tag name to constructor table for one identity type.
pub struct TypeRegistry<I> {
    creators: HashMap<&'static str, CreateFn<I>>,
}

impl<I: RecordIdentity> TypeRegistry<I> {
    /// Panics if two types claim the same tag.
    fn new(entries: Vec<(&'static str, CreateFn<I>)>) -> Self {
        let mut creators = HashMap::with_capacity(entries.len());
        for (name, create) in entries {
            assert!(
                creators.insert(name, create).is_none(),
                "duplicate registration for <{}>",
                name
            );
        }
        Self { creators }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.creators.contains_key(name)
    }

    pub fn creator(&self, name: &str) -> Option<CreateFn<I>> {
        self.creators.get(name).copied()
    }

    /// Registered tag names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.creators.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.creators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creators.is_empty()
    }
}

// ============================================================================
// CATEGORY REGISTRIES
// ============================================================================

pub static OPTIONS: Lazy<TypeRegistry<OptionsBase>> =
    Lazy::new(|| TypeRegistry::new(vec![entry::<ClefOptions>(), entry::<FontOptions>()]));

pub static OTHERS: Lazy<TypeRegistry<OthersBase>> = Lazy::new(|| {
    TypeRegistry::new(vec![
        entry::<FontDefinition>(),
        entry::<Frame>(),
        entry::<InstrumentUsed>(),
        entry::<LayerAttributes>(),
        entry::<MarkingCategory>(),
        entry::<MarkingCategoryName>(),
        entry::<MultiStaffGroupId>(),
        entry::<MultiStaffInstrumentGroup>(),
        entry::<PartDefinition>(),
        entry::<PartGlobals>(),
        entry::<Staff>(),
        entry::<TextBlock>(),
        entry::<TextExpressionDef>(),
        entry::<TextExpressionEnclosure>(),
        entry::<TextRepeatEnclosure>(),
    ])
});

pub static DETAILS: Lazy<TypeRegistry<DetailsBase>> =
    Lazy::new(|| TypeRegistry::new(vec![entry::<GFrameHold>(), entry::<StaffGroup>()]));

/// Details keyed by entry number rather than two cmpers.
pub static ENTRY_DETAILS: Lazy<TypeRegistry<EntryDetailsBase>> =
    Lazy::new(|| TypeRegistry::new(vec![entry::<TupletDef>()]));

pub static TEXTS: Lazy<TypeRegistry<TextsBase>> =
    Lazy::new(|| TypeRegistry::new(vec![entry::<BlockText>(), entry::<ExpressionText>()]));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registries_build() {
        assert_eq!(OPTIONS.names(), vec!["clefOptions", "fontOptions"]);
        assert_eq!(OTHERS.len(), 15);
        assert!(OTHERS.contains("frameSpec"));
        assert!(DETAILS.contains("gfhold"));
        assert!(ENTRY_DETAILS.contains("tupletDef"));
        assert!(!DETAILS.contains("tupletDef"));
        assert!(TEXTS.contains("blockText"));
        assert!(OTHERS.creator("notARecord").is_none());
    }

    #[test]
    #[should_panic(expected = "duplicate registration")]
    fn test_duplicate_tag_panics() {
        TypeRegistry::new(vec![entry::<Frame>(), entry::<Frame>()]);
    }
}
