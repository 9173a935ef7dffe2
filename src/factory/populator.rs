//! Field population
//!
//! Each record type lists its XML child fields in a static table of
//! `(name, setter)` pairs. Populating an instance walks the element's
//! children and calls the setter registered for each name. Fields that are
//! absent keep their `Default` value.

use std::collections::HashMap;
use std::hash::Hash;

use super::enums::{self, XmlCodeEnum, XmlEnum};
use super::linker::ElementLinker;
use crate::config::{DecodeConfig, IntegrityPolicy};
use crate::dom::Document;
use crate::error::{IntegrityError, MusxError, Result};
use crate::xml::XmlElement;

/// Stores one child field into an instance.
pub type FieldSetter<T> = fn(&dyn XmlElement, &mut T, &mut PopulateContext<'_>) -> Result<()>;

/// Field table of a populatable type.
pub type FieldTable<T> = &'static [(&'static str, FieldSetter<T>)];

/// Document-wide fixup run after every record exists.
pub type ResolverFn = fn(&mut Document) -> Result<()>;

/// A type that can be filled from an XML element.
pub trait FieldPopulator: Sized + 'static {
    const XML_MAPPING: FieldTable<Self>;

    /// Resolvers registered once per document, under the given keys, when
    /// the first instance of the type is decoded.
    const RESOLVERS: &'static [(&'static str, ResolverFn)] = &[];

    /// Whether an unknown child may be reported as an error. Types whose
    /// XML routinely carries fields we do not model return false.
    fn require_all_fields(&self) -> bool {
        true
    }

    fn populate(&mut self, element: &dyn XmlElement, ctx: &mut PopulateContext<'_>) -> Result<()> {
        populate_fields(self, element, ctx)
    }
}

/// Walk the children of `element` and apply `T`'s field table.
pub fn populate_fields<T: FieldPopulator>(
    instance: &mut T,
    element: &dyn XmlElement,
    ctx: &mut PopulateContext<'_>,
) -> Result<()> {
    for child in element.child_elements() {
        let name = child.tag_name();
        match T::XML_MAPPING.iter().find(|(field, _)| *field == name) {
            Some((_, setter)) => setter(&*child, instance, ctx)?,
            None if ctx.config.strict_unknown_fields && instance.require_all_fields() => {
                return Err(MusxError::decode(format!(
                    "xml element <{}> has child <{}> which is not in the element list",
                    element.tag_name(),
                    name
                )));
            }
            None => log::debug!(
                "xml element <{}> has child <{}> which is not in the element list; skipped",
                element.tag_name(),
                name
            ),
        }
    }
    Ok(())
}

// ============================================================================
// POPULATE CONTEXT
// ============================================================================

/// Decode state handed to every field setter.
pub struct PopulateContext<'c> {
    config: &'c DecodeConfig,
    linker: &'c mut ElementLinker,
}

impl<'c> PopulateContext<'c> {
    pub fn new(config: &'c DecodeConfig, linker: &'c mut ElementLinker) -> Self {
        Self { config, linker }
    }

    pub fn config(&self) -> &DecodeConfig {
        self.config
    }

    pub fn linker(&mut self) -> &mut ElementLinker {
        self.linker
    }

    /// Queue `T`'s resolvers. Duplicate keys collapse to one run.
    pub fn register_resolvers<T: FieldPopulator>(&mut self) {
        for (key, resolver) in T::RESOLVERS {
            self.linker.add_resolver(*resolver, Some(*key));
        }
    }

    /// Apply the integrity policy to a check result.
    pub fn report_integrity(&self, result: std::result::Result<(), IntegrityError>) -> Result<()> {
        report_integrity(self.config.integrity_policy, result)
    }

    /// Translate the element text through a string enum table.
    pub fn enum_into<E: XmlEnum>(&self, element: &dyn XmlElement, target: &mut E) -> Result<()> {
        *target = enums::to_enum(element.text_trimmed(), self.config.enum_policy)?;
        Ok(())
    }

    /// Translate the element text through an integer code enum table.
    pub fn code_enum_into<E: XmlCodeEnum>(&self, element: &dyn XmlElement, target: &mut E) -> Result<()> {
        let code: i32 = element.text_as()?;
        *target = enums::code_to_enum(code, self.config.enum_policy)?;
        Ok(())
    }

    /// Build a fresh embedded value from `element`.
    pub fn populated<T: FieldPopulator + Default>(&mut self, element: &dyn XmlElement) -> Result<T> {
        let mut value = T::default();
        value.populate(element, self)?;
        Ok(value)
    }

    /// Embedded keyed sub-record: the `type` attribute picks the map key.
    /// A missing or unknown type fails regardless of the enum policy.
    pub fn keyed_into<K, V>(&mut self, element: &dyn XmlElement, map: &mut HashMap<K, V>) -> Result<()>
    where
        K: XmlEnum + Eq + Hash,
        V: FieldPopulator + Default,
    {
        let type_name = element.attribute("type").ok_or_else(|| {
            MusxError::decode(format!("<{}> is missing its \"type\" attribute", element.tag_name()))
        })?;
        let key = K::from_xml(type_name).ok_or_else(|| {
            MusxError::decode(format!(
                "<{}> has unknown type \"{}\" for {}",
                element.tag_name(),
                type_name,
                std::any::type_name::<K>()
            ))
        })?;
        let value = self.populated(element)?;
        map.insert(key, value);
        Ok(())
    }

    /// Repeated child carrying an `index` attribute. Indices must arrive
    /// in order starting at 0.
    pub fn indexed_into<V: FieldPopulator + Default>(&mut self, element: &dyn XmlElement, list: &mut Vec<V>) -> Result<()> {
        let index: usize = element.required_attribute("index")?;
        if index != list.len() {
            return Err(MusxError::decode(format!(
                "<{}> has index {} but {} was expected",
                element.tag_name(),
                index,
                list.len()
            )));
        }
        let value = self.populated(element)?;
        list.push(value);
        Ok(())
    }
}

/// Strict policy turns a failed check into an error; lenient logs it.
pub fn report_integrity(policy: IntegrityPolicy, result: std::result::Result<(), IntegrityError>) -> Result<()> {
    match (result, policy) {
        (Ok(()), _) => Ok(()),
        (Err(err), IntegrityPolicy::Strict) => Err(err.into()),
        (Err(err), IntegrityPolicy::Lenient) => {
            log::warn!("integrity check failed: {}", err);
            Ok(())
        }
    }
}
