//! Document construction
//!
//! [`DocumentFactory`] walks the sections under the `<finale>` root, builds
//! every registered record into its pool, then runs the deferred resolvers
//! that complete cross-record links.
//!
//! - [`populator`]: per-type field tables and the populate context
//! - [`enums`]: string and integer-code enum translation
//! - [`linker`]: deferred resolver queue
//! - [`registry`]: tag name to record constructor tables

use std::path::Path;
use std::sync::Arc;

use crate::config::{DecodeConfig, ScopeFallback};
use crate::dom::pool::ObjectPool;
use crate::dom::{
    Cmper, DetailsBase, Document, Entry, EntryDetailsBase, Header, Inci, OptionsBase, OthersBase, Record,
    RecordIdentity, ShareMode, TextsBase, SCORE_PARTID,
};
use crate::error::{MusxError, Result};
use crate::xml::{RoxmlBackend, XmlBackend, XmlElement};

pub mod enums;
pub mod linker;
pub mod populator;
pub mod registry;

use linker::ElementLinker;
use populator::{FieldPopulator, PopulateContext};
use registry::TypeRegistry;

/// Builds [`Document`]s from EnigmaXML.
#[derive(Debug, Clone)]
pub struct DocumentFactory {
    config: DecodeConfig,
    fallback: Arc<dyn ScopeFallback>,
}

impl Default for DocumentFactory {
    fn default() -> Self {
        Self::new(DecodeConfig::default())
    }
}

impl DocumentFactory {
    /// A factory using the config's own scope fallback policy.
    pub fn new(config: DecodeConfig) -> Self {
        let fallback = Arc::new(config.scope_fallback);
        Self { config, fallback }
    }

    /// Replace the scope fallback rule used by the documents this factory
    /// builds.
    pub fn with_scope_fallback(mut self, fallback: impl ScopeFallback + 'static) -> Self {
        self.fallback = Arc::new(fallback);
        self
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Decode with the default (roxmltree) backend.
    pub fn decode(&self, xml: &str) -> Result<Document> {
        self.decode_with::<RoxmlBackend>(xml)
    }

    pub fn decode_with<B: XmlBackend>(&self, xml: &str) -> Result<Document> {
        B::with_root(xml, |root| self.decode_root(root))
    }

    /// Decode from an already parsed root element.
    pub fn decode_root(&self, root: &dyn XmlElement) -> Result<Document> {
        if root.tag_name() != "finale" {
            return Err(MusxError::decode(format!(
                "root element is <{}>, expected <finale>",
                root.tag_name()
            )));
        }

        let mut document = Document::new(self.config.clone(), Arc::clone(&self.fallback));
        let mut linker = ElementLinker::new();
        {
            let mut ctx = PopulateContext::new(&self.config, &mut linker);
            for section in root.child_elements() {
                match section.tag_name() {
                    "header" => document.header = Some(decode_header(&*section, &mut ctx)?),
                    "options" => decode_options(&*section, &mut document, &mut ctx)?,
                    "others" => decode_others(&*section, &mut document, &mut ctx)?,
                    "details" => decode_details(&*section, &mut document, &mut ctx)?,
                    "entries" => decode_entries(&*section, &mut document, &mut ctx)?,
                    "texts" => decode_texts(&*section, &mut document, &mut ctx)?,
                    other => log::debug!("skipping unknown section <{}>", other),
                }
            }
        }

        linker.resolve_all(&mut document)?;
        log::info!("decoded document: {}", document.summary());
        Ok(document)
    }

    // ========================================================================
    // CONVENIENCE CONSTRUCTORS
    // ========================================================================

    /// Decode with the default configuration and backend.
    pub fn create(xml: &str) -> Result<Document> {
        Self::default().decode(xml)
    }

    pub fn create_with_config(xml: &str, config: &DecodeConfig) -> Result<Document> {
        Self::new(config.clone()).decode(xml)
    }

    pub fn create_with<B: XmlBackend>(xml: &str, config: &DecodeConfig) -> Result<Document> {
        Self::new(config.clone()).decode_with::<B>(xml)
    }

    /// Read a UTF-8 EnigmaXML file and decode it.
    pub fn create_from_file(path: impl AsRef<Path>, config: &DecodeConfig) -> Result<Document> {
        let xml = std::fs::read_to_string(path.as_ref())?;
        Self::create_with_config(&xml, config)
    }

    pub fn from_root(root: &dyn XmlElement, config: &DecodeConfig) -> Result<Document> {
        Self::new(config.clone()).decode_root(root)
    }
}

// ============================================================================
// IDENTITY ATTRIBUTES
// ============================================================================

/// Scope from `part`, sharing from `shared`.
fn scope_of(element: &dyn XmlElement) -> Result<(Cmper, ShareMode)> {
    let part_id = element.attribute_as::<Cmper>("part")?.unwrap_or(SCORE_PARTID);
    let share_mode = match element.attribute_as::<bool>("shared")? {
        None => ShareMode::All,
        Some(true) => ShareMode::Partial,
        Some(false) => ShareMode::None,
    };
    Ok((part_id, share_mode))
}

fn inci_of(element: &dyn XmlElement) -> Result<Inci> {
    Ok(element.attribute_as::<Inci>("inci")?.unwrap_or(0))
}

fn options_identity(element: &dyn XmlElement) -> Result<OptionsBase> {
    let (part_id, share_mode) = scope_of(element)?;
    Ok(OptionsBase::new(part_id, share_mode))
}

fn others_identity(element: &dyn XmlElement) -> Result<OthersBase> {
    let (part_id, share_mode) = scope_of(element)?;
    let cmper = element.required_attribute("cmper")?;
    Ok(OthersBase::new(part_id, share_mode, cmper, inci_of(element)?))
}

fn details_identity(element: &dyn XmlElement) -> Result<DetailsBase> {
    let (part_id, share_mode) = scope_of(element)?;
    let cmper1 = element.required_attribute("cmper1")?;
    let cmper2 = element.required_attribute("cmper2")?;
    Ok(DetailsBase::new(part_id, share_mode, cmper1, cmper2, inci_of(element)?))
}

fn entry_details_identity(element: &dyn XmlElement) -> Result<EntryDetailsBase> {
    let (part_id, share_mode) = scope_of(element)?;
    let entnum = element.required_attribute("entnum")?;
    Ok(EntryDetailsBase::new(part_id, share_mode, entnum, inci_of(element)?))
}

fn texts_identity(element: &dyn XmlElement) -> Result<TextsBase> {
    let (part_id, share_mode) = scope_of(element)?;
    let text_number = element.required_attribute("number")?;
    Ok(TextsBase::new(part_id, share_mode, text_number, element.text()))
}

// ============================================================================
// SECTIONS
// ============================================================================

fn decode_header(section: &dyn XmlElement, ctx: &mut PopulateContext<'_>) -> Result<Header> {
    let data = section
        .first_child("headerData")
        .ok_or_else(|| MusxError::decode("<header> has no <headerData>"))?;
    let mut header = Header::default();
    header.populate(&*data, ctx)?;
    Ok(header)
}

/// Build one record through `registry` and store it. Unregistered tags are
/// skipped before their identity is read.
fn add_record<I: RecordIdentity>(
    registry: &TypeRegistry<I>,
    identity: fn(&dyn XmlElement) -> Result<I>,
    element: &dyn XmlElement,
    pool: &mut ObjectPool,
    ctx: &mut PopulateContext<'_>,
) -> Result<()> {
    let create = match registry.creator(element.tag_name()) {
        Some(create) => create,
        None => {
            log::debug!("skipping unregistered record <{}>", element.tag_name());
            return Ok(());
        }
    };
    let (key, object) = create(identity(element)?, element, ctx)?;
    pool.add(key, object)
}

fn decode_options(section: &dyn XmlElement, document: &mut Document, ctx: &mut PopulateContext<'_>) -> Result<()> {
    for element in section.child_elements() {
        add_record(&registry::OPTIONS, options_identity, &*element, &mut document.options.0, ctx)?;
    }
    Ok(())
}

fn decode_others(section: &dyn XmlElement, document: &mut Document, ctx: &mut PopulateContext<'_>) -> Result<()> {
    for element in section.child_elements() {
        add_record(&registry::OTHERS, others_identity, &*element, &mut document.others.0, ctx)?;
    }
    Ok(())
}

/// Entry-keyed and cmper-keyed details share the section and the pool.
fn decode_details(section: &dyn XmlElement, document: &mut Document, ctx: &mut PopulateContext<'_>) -> Result<()> {
    for element in section.child_elements() {
        if registry::ENTRY_DETAILS.contains(element.tag_name()) {
            add_record(
                &registry::ENTRY_DETAILS,
                entry_details_identity,
                &*element,
                &mut document.details.0,
                ctx,
            )?;
        } else {
            add_record(&registry::DETAILS, details_identity, &*element, &mut document.details.0, ctx)?;
        }
    }
    Ok(())
}

fn decode_entries(section: &dyn XmlElement, document: &mut Document, ctx: &mut PopulateContext<'_>) -> Result<()> {
    for element in section.child_elements() {
        if element.tag_name() != Entry::XML_NODE_NAME {
            log::debug!("skipping unregistered record <{}>", element.tag_name());
            continue;
        }
        let mut entry = Entry::new(
            element.required_attribute("entnum")?,
            element.attribute_as("prev")?.unwrap_or(0),
            element.attribute_as("next")?.unwrap_or(0),
        );
        entry.populate(&*element, ctx)?;
        ctx.report_integrity(entry.integrity_check())?;
        document.entries.add(entry)?;
    }
    Ok(())
}

fn decode_texts(section: &dyn XmlElement, document: &mut Document, ctx: &mut PopulateContext<'_>) -> Result<()> {
    for element in section.child_elements() {
        add_record(&registry::TEXTS, texts_identity, &*element, &mut document.texts.0, ctx)?;
    }
    Ok(())
}
