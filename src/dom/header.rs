//! File header: byte order, text encoding and creation/modification stamps.

use crate::error::{MusxError, Result};
use crate::factory::populator::{FieldPopulator, FieldTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WordOrder {
    #[default]
    LittleEndian,
    BigEndian,
}

impl WordOrder {
    /// Byte order is required to read the file at all, so an unknown value
    /// is always an error.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "lo-endian" => Ok(WordOrder::LittleEndian),
            "hi-endian" => Ok(WordOrder::BigEndian),
            other => Err(MusxError::decode(format!("invalid word order value: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    Mac,
    Windows,
    #[default]
    Other,
}

impl TextEncoding {
    pub fn parse(value: &str) -> Self {
        match value {
            "Mac" => TextEncoding::Mac,
            "Windows" => TextEncoding::Windows,
            _ => TextEncoding::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    Mac,
    Windows,
    #[default]
    Other,
}

impl Platform {
    pub fn parse(value: &str) -> Self {
        match value {
            "MAC" => Platform::Mac,
            "WIN" => Platform::Windows,
            _ => Platform::Other,
        }
    }
}

/// Version stamp of the writing application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinaleVersion {
    pub major: i32,
    pub minor: i32,
    pub maint: Option<i32>,
    pub dev_status: String,
    pub build: Option<i32>,
}

/// When and by what a file was created or last modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInfo {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub modified_by: String,
    pub enigma_version: FinaleVersion,
    pub application: String,
    pub platform: Platform,
    pub app_version: FinaleVersion,
    pub file_version: FinaleVersion,
    pub app_region: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub word_order: WordOrder,
    pub text_encoding: TextEncoding,
    pub created: FileInfo,
    pub modified: FileInfo,
}

impl FieldPopulator for FinaleVersion {
    const XML_MAPPING: FieldTable<Self> = &[
        ("major", |e, i, _| e.text_into(&mut i.major)),
        ("minor", |e, i, _| e.text_into(&mut i.minor)),
        ("maint", |e, i, _| {
            i.maint = Some(e.text_as()?);
            Ok(())
        }),
        ("devStatus", |e, i, _| e.text_into(&mut i.dev_status)),
        ("build", |e, i, _| {
            i.build = Some(e.text_as()?);
            Ok(())
        }),
    ];
}

impl FieldPopulator for FileInfo {
    const XML_MAPPING: FieldTable<Self> = &[
        ("year", |e, i, _| e.text_into(&mut i.year)),
        ("month", |e, i, _| e.text_into(&mut i.month)),
        ("day", |e, i, _| e.text_into(&mut i.day)),
        ("modifiedBy", |e, i, _| e.text_into(&mut i.modified_by)),
        ("enigmaVersion", |e, i, c| c.populated(e).map(|v| i.enigma_version = v)),
        ("application", |e, i, _| e.text_into(&mut i.application)),
        ("platform", |e, i, _| {
            i.platform = Platform::parse(e.text_trimmed());
            Ok(())
        }),
        ("appVersion", |e, i, c| c.populated(e).map(|v| i.app_version = v)),
        ("fileVersion", |e, i, c| c.populated(e).map(|v| i.file_version = v)),
        ("appRegion", |e, i, _| e.text_into(&mut i.app_region)),
    ];

    fn require_all_fields(&self) -> bool {
        false
    }
}

impl FieldPopulator for Header {
    const XML_MAPPING: FieldTable<Self> = &[
        ("wordOrder", |e, i, _| {
            i.word_order = WordOrder::parse(e.text_trimmed())?;
            Ok(())
        }),
        ("textEncoding", |e, i, _| {
            i.text_encoding = TextEncoding::parse(e.text_trimmed());
            Ok(())
        }),
        ("created", |e, i, c| c.populated(e).map(|v| i.created = v)),
        ("modified", |e, i, c| c.populated(e).map(|v| i.modified = v)),
    ];

    fn require_all_fields(&self) -> bool {
        false
    }
}
