//! Entries: the notes and rests of a layer, chained by entry number.
//!
//! Entries are stored in the [`EntryPool`](super::EntryPool) and refer to
//! their neighbours by number, never by reference.

use std::sync::Arc;

use super::{Document, Edu, EntryNumber, NoteNumber, Record};
use crate::error::{IntegrityError, MusxError, Result};
use crate::factory::populator::{FieldPopulator, FieldTable};
use crate::utils::Fraction;

/// Undotted note values, as their duration in Edus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NoteType {
    Maxima = 0x8000,
    Longa = 0x4000,
    Breve = 0x2000,
    Whole = 0x1000,
    Half = 0x0800,
    Quarter = 0x0400,
    Eighth = 0x0200,
    Note16th = 0x0100,
    Note32nd = 0x0080,
    Note64th = 0x0040,
    Note128th = 0x0020,
    Note256th = 0x0010,
    Note512th = 0x0008,
    Note1024th = 0x0004,
    Note2048th = 0x0002,
}

impl NoteType {
    fn from_edu(edu: Edu) -> Option<Self> {
        let note_type = match edu {
            0x8000 => NoteType::Maxima,
            0x4000 => NoteType::Longa,
            0x2000 => NoteType::Breve,
            0x1000 => NoteType::Whole,
            0x0800 => NoteType::Half,
            0x0400 => NoteType::Quarter,
            0x0200 => NoteType::Eighth,
            0x0100 => NoteType::Note16th,
            0x0080 => NoteType::Note32nd,
            0x0040 => NoteType::Note64th,
            0x0020 => NoteType::Note128th,
            0x0010 => NoteType::Note256th,
            0x0008 => NoteType::Note512th,
            0x0004 => NoteType::Note1024th,
            0x0002 => NoteType::Note2048th,
            _ => return None,
        };
        Some(note_type)
    }

    pub fn edu(self) -> Edu {
        self as Edu
    }
}

// ============================================================================
// NOTE
// ============================================================================

/// One pitch of an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Note {
    note_id: NoteNumber,
    /// Diatonic displacement from the tonic (or from C in keyless scores)
    pub harm_lev: i32,
    /// Chromatic alteration relative to the key signature
    pub harm_alt: i32,
    pub is_valid: bool,
    pub show_acci: bool,
}

impl Note {
    pub fn new(note_id: NoteNumber) -> Self {
        Self {
            note_id,
            ..Default::default()
        }
    }

    /// Stable id of the note; unaffected by reordering within the chord.
    pub fn note_id(&self) -> NoteNumber {
        self.note_id
    }
}

impl Record for Note {
    const XML_NODE_NAME: &'static str = "note";
}

impl FieldPopulator for Note {
    const XML_MAPPING: FieldTable<Self> = &[
        ("harmLev", |e, i, _| e.text_into(&mut i.harm_lev)),
        ("harmAlt", |e, i, _| e.text_into(&mut i.harm_alt)),
        ("isValid", |e, i, _| e.text_into(&mut i.is_valid)),
        ("showAcci", |e, i, _| e.text_into(&mut i.show_acci)),
    ];

    fn require_all_fields(&self) -> bool {
        false
    }
}

// ============================================================================
// ENTRY
// ============================================================================

/// A note, chord or rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    entnum: EntryNumber,
    prev: EntryNumber,
    next: EntryNumber,
    /// Nominal duration, ignoring tuplets
    pub duration: Edu,
    /// Must match `notes.len()` when notes are present
    pub num_notes: i32,
    pub is_valid: bool,
    /// False for a rest
    pub is_note: bool,
    pub voice2: bool,
    pub artic_detail: bool,
    /// Starts a beam (any beam breaks here)
    pub beam: bool,
    pub stem_detail: bool,
    pub sorted: bool,
    pub lyric_detail: bool,
    pub performance_data: bool,
    pub smart_shape_detail: bool,
    pub freeze_beam: bool,
    pub notes: Vec<Note>,
}

impl Entry {
    /// `prev` and `next` are entry numbers, 0 when there is no neighbour.
    pub fn new(entnum: EntryNumber, prev: EntryNumber, next: EntryNumber) -> Self {
        Self {
            entnum,
            prev,
            next,
            ..Default::default()
        }
    }

    pub fn entnum(&self) -> EntryNumber {
        self.entnum
    }

    pub fn next_entnum(&self) -> EntryNumber {
        self.next
    }

    pub fn prev_entnum(&self) -> EntryNumber {
        self.prev
    }

    pub fn next(&self, document: &Document) -> Option<Arc<Entry>> {
        self.follow(document, self.next, "next")
    }

    pub fn previous(&self, document: &Document) -> Option<Arc<Entry>> {
        self.follow(document, self.prev, "previous")
    }

    fn follow(&self, document: &Document, entnum: EntryNumber, which: &str) -> Option<Arc<Entry>> {
        if entnum == 0 {
            return None;
        }
        let entry = document.entries().get(entnum);
        if entry.is_none() {
            log::warn!(
                "entry {} has {} entry {} that does not exist",
                self.entnum,
                which,
                entnum
            );
        }
        entry
    }

    /// Undotted note value of the duration.
    pub fn calc_note_type(&self) -> Result<NoteType> {
        if self.duration <= 1 || self.duration >= 0x10000 {
            return Err(MusxError::invalid_argument(format!(
                "duration {} is out of range for a note type",
                self.duration
            )));
        }
        let msb = 1 << (Edu::BITS - 1 - self.duration.leading_zeros());
        NoteType::from_edu(msb).ok_or_else(|| {
            MusxError::invalid_argument(format!("duration {} has no note type", self.duration))
        })
    }

    /// Number of augmentation dots: the run of set bits below the note type.
    pub fn calc_augmentation_dots(&self) -> Result<u32> {
        let mut count = 0;
        let mut bit = self.calc_note_type()?.edu() >> 1;
        while bit != 0 && self.duration & bit != 0 {
            count += 1;
            bit >>= 1;
        }
        Ok(count)
    }

    /// Nominal duration as a fraction of a whole note.
    pub fn calc_fraction(&self) -> Fraction {
        Fraction::from_edu(self.duration)
    }
}

impl Record for Entry {
    const XML_NODE_NAME: &'static str = "entry";

    fn integrity_check(&self) -> std::result::Result<(), IntegrityError> {
        if !self.notes.is_empty() && self.num_notes as usize != self.notes.len() {
            return Err(IntegrityError::new(
                Self::XML_NODE_NAME,
                format!("entnum {}", self.entnum),
                format!("numNotes is {} but there are {} notes", self.num_notes, self.notes.len()),
            ));
        }
        Ok(())
    }
}

impl FieldPopulator for Entry {
    const XML_MAPPING: FieldTable<Self> = &[
        ("dura", |e, i, _| e.text_into(&mut i.duration)),
        ("numNotes", |e, i, _| e.text_into(&mut i.num_notes)),
        ("isValid", |e, i, _| e.text_into(&mut i.is_valid)),
        ("isNote", |e, i, _| e.text_into(&mut i.is_note)),
        ("v2", |e, i, _| e.text_into(&mut i.voice2)),
        ("articDetail", |e, i, _| e.text_into(&mut i.artic_detail)),
        ("beam", |e, i, _| e.text_into(&mut i.beam)),
        ("stemDetail", |e, i, _| e.text_into(&mut i.stem_detail)),
        ("sorted", |e, i, _| e.text_into(&mut i.sorted)),
        ("lyricDetail", |e, i, _| e.text_into(&mut i.lyric_detail)),
        ("performanceData", |e, i, _| e.text_into(&mut i.performance_data)),
        ("smartShapeDetail", |e, i, _| e.text_into(&mut i.smart_shape_detail)),
        ("freezeBeam", |e, i, _| e.text_into(&mut i.freeze_beam)),
        ("note", |e, i, c| {
            let mut note = Note::new(e.required_attribute("id")?);
            note.populate(e, c)?;
            i.notes.push(note);
            Ok(())
        }),
    ];

    fn require_all_fields(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with(duration: Edu) -> Entry {
        Entry {
            duration,
            ..Entry::new(1, 0, 0)
        }
    }

    #[test]
    fn test_note_type_from_duration() {
        assert_eq!(entry_with(1024).calc_note_type().unwrap(), NoteType::Quarter);
        assert_eq!(entry_with(1536).calc_note_type().unwrap(), NoteType::Quarter);
        assert_eq!(entry_with(4096).calc_note_type().unwrap(), NoteType::Whole);
        assert_eq!(entry_with(2).calc_note_type().unwrap(), NoteType::Note2048th);
    }

    #[test]
    fn test_note_type_out_of_range() {
        for duration in [0, 1, 0x10000] {
            assert!(matches!(
                entry_with(duration).calc_note_type(),
                Err(MusxError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_augmentation_dots() {
        assert_eq!(entry_with(1024).calc_augmentation_dots().unwrap(), 0);
        assert_eq!(entry_with(1536).calc_augmentation_dots().unwrap(), 1);
        assert_eq!(entry_with(1792).calc_augmentation_dots().unwrap(), 2);
        // a gap stops the count
        assert_eq!(entry_with(1024 + 256).calc_augmentation_dots().unwrap(), 0);
    }

    #[test]
    fn test_calc_fraction() {
        assert_eq!(entry_with(1536).calc_fraction(), Fraction::new(3, 8).unwrap());
    }

    #[test]
    fn test_note_count_integrity() {
        let mut entry = entry_with(1024);
        entry.num_notes = 2;
        assert!(entry.integrity_check().is_ok());
        entry.notes.push(Note::new(1));
        assert!(entry.integrity_check().is_err());
        entry.notes.push(Note::new(2));
        assert!(entry.integrity_check().is_ok());
    }
}
