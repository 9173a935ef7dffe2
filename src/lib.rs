//! musx-dom
//!
//! Decodes EnigmaXML, the XML form of a Finale notation file, into a typed
//! in-memory document model.
//!
//! A [`Document`] owns one pool per record category (options, others,
//! details, entries, texts). Records refer to each other by numeric id and
//! are resolved through the document, so the model has no reference cycles.
//! Once decoded the document is read-only.
//!
//! ```no_run
//! use musx_dom::{DocumentFactory, dom::others::Staff};
//!
//! let xml = std::fs::read_to_string("score.enigmaxml")?;
//! let document = DocumentFactory::create(&xml)?;
//! if let Some(staff) = document.others().get::<Staff>(0, 1) {
//!     println!("{}", staff.full_name(&document));
//! }
//! document.iterate_entries(0, 1, 1, 0, |info| {
//!     println!("{} + {}", info.elapsed_duration, info.actual_duration);
//!     true
//! })?;
//! # Ok::<(), musx_dom::MusxError>(())
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod factory;
pub mod utils;
pub mod xml;

// Re-export commonly used types
pub use config::{DecodeConfig, EnumPolicy, FallbackPolicy, IntegrityPolicy, ScopeFallback};
pub use dom::{Document, EntryInfo};
pub use error::{IntegrityError, MusxError, Result};
pub use factory::DocumentFactory;
pub use utils::{Fraction, ScoreFileEncoder};
