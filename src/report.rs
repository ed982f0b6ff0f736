//! Presentation of a finished schedule.
//!
//! [`ScheduleReport`] resolves a [`Schedule`] into per-slot
//! `(time label, program, rating)` rows plus the total rating, ready for a
//! table renderer or serialization.

use std::fmt;

use crate::ga::Schedule;
use crate::rating::RatingTable;

/// Maps slot indices to wall-clock hour labels.
///
/// The default layout starts at 06:00, one slot per hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotLayout {
    /// Hour of slot 0, in `0..24`.
    pub start_hour: u32,
}

impl Default for SlotLayout {
    fn default() -> Self {
        Self { start_hour: 6 }
    }
}

impl SlotLayout {
    /// Number of slots from `start_hour` through 23:00.
    ///
    /// ```
    /// use u_airtime::report::SlotLayout;
    ///
    /// assert_eq!(SlotLayout::default().slots_until_midnight(), 18);
    /// ```
    pub fn slots_until_midnight(&self) -> usize {
        24usize.saturating_sub(self.start_hour as usize)
    }

    /// `HH:00` label of `slot`, wrapping past midnight.
    pub fn label(&self, slot: usize) -> String {
        let hour = (self.start_hour as usize + slot) % 24;
        format!("{hour:02}:00")
    }
}

/// One row of a [`ScheduleReport`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotEntry {
    /// Wall-clock label, e.g. `06:00`.
    pub time_label: String,
    /// Program name.
    pub program: String,
    /// Rating of the program in this slot.
    pub rating: f64,
}

/// A schedule resolved against its rating table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleReport {
    /// One entry per slot, in slot order.
    pub entries: Vec<SlotEntry>,
    /// Sum of the entry ratings.
    pub total: f64,
}

impl ScheduleReport {
    /// Builds the report for `schedule`.
    ///
    /// # Panics
    /// Panics if the schedule refers to programs or slots outside `table`.
    pub fn new(table: &RatingTable, schedule: &Schedule, layout: &SlotLayout) -> Self {
        let entries: Vec<SlotEntry> = schedule
            .programs
            .iter()
            .enumerate()
            .map(|(slot, &id)| SlotEntry {
                time_label: layout.label(slot),
                program: table.name(id).to_string(),
                rating: table.rating(id, slot),
            })
            .collect();
        let total = entries.iter().map(|e| e.rating).sum();
        Self { entries, total }
    }
}

impl fmt::Display for ScheduleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .entries
            .iter()
            .map(|e| e.program.len())
            .max()
            .unwrap_or(0)
            .max("Program".len());

        writeln!(f, "{:<9} {:<width$} {:>8}", "Time Slot", "Program", "Rating")?;
        for e in &self.entries {
            writeln!(f, "{:<9} {:<width$} {:>8.3}", e.time_label, e.program, e.rating)?;
        }
        write!(f, "Total Ratings: {:.3}", self.total)
    }
}
