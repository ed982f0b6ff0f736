//! Program catalog and per-slot audience ratings.
//!
//! A [`RatingTable`] is loaded once per run and shared read-only by every
//! component of the search. Schedules refer to programs by [`ProgramId`],
//! the program's position in catalog order.
//!
//! # Input format
//!
//! [`RatingTable::from_csv_reader`] reads a header line followed by one row
//! per program:
//!
//! ```text
//! Type of Program,Hour 6,Hour 7,Hour 8
//! news,0.1,0.1,0.4
//! live_soccer,0.0,0.0,0.0
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::ScheduleError;

/// Index of a program in a [`RatingTable`]'s catalog.
pub type ProgramId = usize;

/// A program and its rating at each slot index.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    /// Program identifier.
    pub name: String,
    /// Rating at slot `i`, for `i` in `0..slot_count`.
    pub ratings: Vec<f64>,
}

impl Program {
    /// Creates a program from a name and its ratings.
    pub fn new(name: impl Into<String>, ratings: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            ratings,
        }
    }
}

/// Immutable lookup of program ratings by slot.
///
/// # Invariants
///
/// - The catalog is non-empty and program names are unique.
/// - Every program has exactly [`slot_count`](Self::slot_count) ratings.
/// - Every rating is finite.
#[derive(Debug, Clone)]
pub struct RatingTable {
    programs: Vec<Program>,
    index: HashMap<String, ProgramId>,
    slot_count: usize,
}

impl RatingTable {
    /// Builds a table, checking the invariants listed on the type.
    pub fn new(programs: Vec<Program>) -> Result<Self, ScheduleError> {
        let first = programs
            .first()
            .ok_or_else(|| ScheduleError::data("rating table has no programs"))?;
        let slot_count = first.ratings.len();
        if slot_count == 0 {
            return Err(ScheduleError::data(format!(
                "program '{}' has no ratings",
                first.name
            )));
        }

        let mut index = HashMap::with_capacity(programs.len());
        for (id, program) in programs.iter().enumerate() {
            if program.ratings.len() != slot_count {
                return Err(ScheduleError::data(format!(
                    "program '{}' has {} ratings, expected {}",
                    program.name,
                    program.ratings.len(),
                    slot_count
                )));
            }
            if let Some(slot) = program.ratings.iter().position(|r| !r.is_finite()) {
                return Err(ScheduleError::data(format!(
                    "program '{}' has a non-finite rating at slot {}",
                    program.name, slot
                )));
            }
            if index.insert(program.name.clone(), id).is_some() {
                return Err(ScheduleError::data(format!(
                    "duplicate program '{}'",
                    program.name
                )));
            }
        }

        Ok(Self {
            programs,
            index,
            slot_count,
        })
    }

    /// Parses a CSV rating source: a header line, then `name,r0,r1,...` rows.
    ///
    /// Blank lines are skipped. Fields may be wrapped in double quotes.
    pub fn from_csv_reader<R: BufRead>(reader: R) -> Result<Self, ScheduleError> {
        let mut programs = Vec::new();
        let mut lines = reader.lines().enumerate();

        match lines.next() {
            Some((_, header)) => {
                header?;
            }
            None => return Err(ScheduleError::data("rating source is empty")),
        }

        for (i, line) in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let line_no = i + 1;
            let mut fields = split_fields(&line).into_iter();
            let name = fields.next().unwrap_or_default();
            if name.is_empty() {
                return Err(ScheduleError::data(format!(
                    "line {line_no}: missing program name"
                )));
            }
            let ratings = fields
                .map(|f| {
                    f.parse::<f64>().map_err(|_| {
                        ScheduleError::data(format!("line {line_no}: invalid rating '{f}'"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            programs.push(Program::new(name, ratings));
        }

        Self::new(programs)
    }

    /// Opens and parses a CSV rating file.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, ScheduleError> {
        let file = File::open(path.as_ref())?;
        Self::from_csv_reader(BufReader::new(file))
    }

    /// Number of programs in the catalog.
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// Always `false`; an empty table cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Number of ratings per program.
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Catalog in id order.
    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    /// Name of the program with the given id.
    ///
    /// # Panics
    /// Panics if `id` is not a catalog index.
    pub fn name(&self, id: ProgramId) -> &str {
        &self.programs[id].name
    }

    /// Looks up a program id by name.
    pub fn id_of(&self, name: &str) -> Option<ProgramId> {
        self.index.get(name).copied()
    }

    /// Rating of program `id` at `slot`.
    ///
    /// # Panics
    /// Panics if `id` or `slot` is out of range.
    #[inline]
    pub fn rating(&self, id: ProgramId, slot: usize) -> f64 {
        self.programs[id].ratings[slot]
    }

    /// Resolves program names into ids.
    pub fn resolve(&self, names: &[&str]) -> Result<Vec<ProgramId>, ScheduleError> {
        names
            .iter()
            .map(|n| {
                self.id_of(n)
                    .ok_or_else(|| ScheduleError::data(format!("unknown program '{n}'")))
            })
            .collect()
    }
}

/// Splits one CSV line, honouring double-quoted fields.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}
