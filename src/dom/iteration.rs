//! Entry iteration
//!
//! Walks the entries of one layer of a staff and measure, in order, and
//! reports for each the time elapsed before it and its actual duration once
//! any enclosing tuplets are applied. The caller's callback returns `false`
//! to stop early.

use std::sync::Arc;

use super::details::{GFrameHold, TupletDef};
use super::others::Frame;
use super::{Cmper, Document, Entry, LayerIndex, PooledRecord, MAX_LAYERS};
use crate::error::{MusxError, Result};
use crate::utils::Fraction;

/// One entry as seen by an iteration callback.
#[derive(Debug, Clone)]
pub struct EntryInfo {
    pub staff: Cmper,
    pub measure: Cmper,
    pub layer_index: LayerIndex,
    pub entry: Arc<Entry>,
    /// Time from the start of the measure to this entry
    pub elapsed_duration: Fraction,
    /// Nominal duration scaled by every active tuplet
    pub actual_duration: Fraction,
}

pub(crate) fn check_layer_index(layer_index: LayerIndex) -> Result<()> {
    if layer_index >= MAX_LAYERS {
        return Err(MusxError::invalid_argument(format!(
            "invalid layer index [{}]",
            layer_index
        )));
    }
    Ok(())
}

/// A tuplet still consuming entries.
struct TupletState {
    /// Symbolic duration not yet covered by entries
    remaining: Fraction,
    /// Actual time per unit of symbolic time
    ratio: Fraction,
}

impl TupletState {
    /// `None` for a tuplet that cannot scale time (a zero count or unit).
    fn new(tuplet: &TupletDef) -> Option<Self> {
        let display = tuplet.calc_display_duration();
        let reference = tuplet.calc_reference_duration();
        if display.is_zero() || reference.is_zero() {
            log::warn!(
                "tuplet {} on entry {} has a zero duration; ignoring it",
                tuplet.inci(),
                tuplet.entry_number()
            );
            return None;
        }
        let ratio = reference.checked_div(display).ok()?;
        Some(Self { remaining: display, ratio })
    }
}

impl GFrameHold {
    /// Walk the entries of one layer. Returns `Ok(false)` if the callback
    /// stopped the walk. Missing frames and broken entry links are logged
    /// and end the layer without error.
    pub fn iterate_entries<F>(&self, document: &Document, layer_index: LayerIndex, mut iterator: F) -> Result<bool>
    where
        F: FnMut(&EntryInfo) -> bool,
    {
        check_layer_index(layer_index)?;
        let frame_id = self.frames[layer_index];
        if frame_id == 0 {
            return Ok(true);
        }

        let part_id = self.part_id();
        let frame_incis = document.others().get_array::<Frame>(part_id, frame_id);
        let frame = match frame_incis.iter().find(|frame| frame.start_entry != 0) {
            Some(frame) => frame,
            None => {
                log::warn!(
                    "staff {} measure {} points to frame {} with no start entry",
                    self.staff(),
                    self.measure(),
                    frame_id
                );
                return Ok(true);
            }
        };
        let mut current = match document.entries().get(frame.start_entry) {
            Some(entry) => entry,
            None => {
                log::warn!(
                    "staff {} measure {} starts at entry {} that does not exist",
                    self.staff(),
                    self.measure(),
                    frame.start_entry
                );
                return Ok(true);
            }
        };

        // a pickup stored as a frame offset starts the clock late
        let mut elapsed = frame_incis
            .iter()
            .fold(Fraction::zero(), |sum, frame| sum + Fraction::from_edu(frame.start_time));
        let mut active: Vec<TupletState> = Vec::new();

        loop {
            let entnum = current.entnum();
            active.extend(
                document
                    .details()
                    .get_array_for_entry::<TupletDef>(part_id, entnum)
                    .iter()
                    .filter_map(|tuplet| TupletState::new(tuplet)),
            );
            let ratio = active.iter().fold(Fraction::one(), |product, t| product * t.ratio);
            let actual = current.calc_fraction() * ratio;

            let info = EntryInfo {
                staff: self.staff(),
                measure: self.measure(),
                layer_index,
                entry: Arc::clone(&current),
                elapsed_duration: elapsed,
                actual_duration: actual,
            };
            if !iterator(&info) {
                return Ok(false);
            }
            if entnum == frame.end_entry {
                break;
            }

            elapsed += actual;
            for tuplet in active.iter_mut() {
                tuplet.remaining -= actual.checked_div(tuplet.ratio)?;
            }
            active.retain(|tuplet| tuplet.remaining > Fraction::zero());

            current = match current.next(document) {
                Some(next) => next,
                None => break,
            };
        }
        Ok(true)
    }

    /// Walk every layer in order, stopping if the callback stops any of them.
    pub fn iterate_all_layers<F>(&self, document: &Document, mut iterator: F) -> Result<bool>
    where
        F: FnMut(&EntryInfo) -> bool,
    {
        for layer_index in 0..MAX_LAYERS {
            if !self.iterate_entries(document, layer_index, &mut iterator)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
