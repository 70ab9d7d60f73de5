//! Bijective school name <-> code index
//!
//! Schools are kept in first-seen order; that order is the school axis of
//! the enrollment tensor. Both hash maps only record positions into the
//! ordered school list, so a name and its code always resolve to the same
//! entry.
//!
//! ```rust
//! use enrollment_db::index::SchoolIndex;
//!
//! # fn main() -> enrollment_db::Result<()> {
//! let index = SchoolIndex::build([
//!     ("Alpha High", 101),
//!     ("Alpha High", 101),
//!     ("Beta High", 202),
//! ])?;
//!
//! let school = index.resolve("202")?;
//! assert_eq!(school.name(), "Beta High");
//! assert_eq!(index.position_of_code(202)?, 1);
//! # Ok(())
//! # }
//! ```

use crate::{Error, Result};
use arrow::array::{Array, AsArray, RecordBatch};
use arrow::compute;
use arrow::datatypes::{DataType, Int64Type};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Numeric school code
pub type SchoolCode = i64;

/// Metadata column holding school names
pub const NAME_COLUMN: &str = "School Name";

/// Metadata column holding school codes
pub const CODE_COLUMN: &str = "School Code";

/// Message returned when an identifier matches no school
pub const LOOKUP_MESSAGE: &str = "You MUST enter a VALID school name or code.";

/// A school's display name and code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct School {
    name: String,
    code: SchoolCode,
}

impl School {
    /// Create a school entry
    #[must_use]
    pub fn new(name: impl Into<String>, code: SchoolCode) -> Self {
        Self {
            name: name.into(),
            code,
        }
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// School code
    #[must_use]
    pub const fn code(&self) -> SchoolCode {
        self.code
    }
}

impl fmt::Display for School {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "School Name: {}, School Code: {}", self.name, self.code)
    }
}

/// Ordered, bijective school index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchoolIndex {
    schools: Vec<School>,
    by_name: FxHashMap<String, usize>,
    by_code: FxHashMap<SchoolCode, usize>,
}

impl SchoolIndex {
    /// Build from (name, code) rows, collapsing exact duplicates
    ///
    /// # Errors
    /// - [`Error::DuplicateName`] if a name appears with two different codes
    /// - [`Error::DuplicateCode`] if a code appears with two different names
    pub fn build<I, S>(table: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, SchoolCode)>,
        S: Into<String>,
    {
        let mut index = Self::default();
        let mut rows = 0usize;

        for (name, code) in table {
            rows += 1;
            let name = name.into();
            match (index.by_name.get(&name), index.by_code.get(&code)) {
                (Some(&by_name), Some(&by_code)) if by_name == by_code => {}
                (Some(&existing), _) => {
                    return Err(Error::DuplicateName {
                        first: index.schools[existing].code,
                        second: code,
                        name,
                    });
                }
                (None, Some(&existing)) => {
                    return Err(Error::DuplicateCode {
                        code,
                        first: index.schools[existing].name.clone(),
                        second: name,
                    });
                }
                (None, None) => {
                    let position = index.schools.len();
                    index.by_name.insert(name.clone(), position);
                    index.by_code.insert(code, position);
                    index.schools.push(School { name, code });
                }
            }
        }

        debug!(rows, schools = index.len(), "Built school index");
        Ok(index)
    }

    /// Build from Arrow batches with `School Name` and `School Code` columns
    ///
    /// Any integer (or integer-looking) code column is cast to Int64.
    ///
    /// # Errors
    /// Returns [`Error::StorageError`] if a column is missing, a cell is null or the
    /// code column cannot be cast, plus any [`SchoolIndex::build`] error
    pub fn from_batches(batches: &[RecordBatch]) -> Result<Self> {
        let mut table = Vec::new();

        for batch in batches {
            let names = compute::cast(column(batch, NAME_COLUMN)?, &DataType::Utf8)
                .map_err(|e| Error::StorageError(format!("Cannot read {NAME_COLUMN:?} as text: {e}")))?;
            let codes = compute::cast(column(batch, CODE_COLUMN)?, &DataType::Int64)
                .map_err(|e| Error::StorageError(format!("Cannot read {CODE_COLUMN:?} as integer: {e}")))?;
            let names = names.as_string::<i32>();
            let codes = codes.as_primitive::<Int64Type>();

            for row in 0..batch.num_rows() {
                if names.is_null(row) || codes.is_null(row) {
                    return Err(Error::StorageError(format!(
                        "Metadata row {} has an empty school name or code",
                        table.len()
                    )));
                }
                table.push((names.value(row).to_string(), codes.value(row)));
            }
        }

        Self::build(table)
    }

    /// Resolve a user-supplied school name or code
    ///
    /// An exact, case-sensitive name match wins. Otherwise the trimmed
    /// identifier is parsed as a code.
    ///
    /// # Errors
    /// Returns [`Error::LookupError`] if neither the name nor the code is known, or
    /// the identifier is not a number
    pub fn resolve(&self, identifier: &str) -> Result<&School> {
        if let Some(&position) = self.by_name.get(identifier) {
            return Ok(&self.schools[position]);
        }

        identifier
            .trim()
            .parse::<SchoolCode>()
            .ok()
            .and_then(|code| self.by_code.get(&code))
            .map(|&position| &self.schools[position])
            .ok_or_else(|| {
                debug!(identifier, "School lookup failed");
                Error::LookupError(LOOKUP_MESSAGE.to_string())
            })
    }

    /// Zero-based insertion position of a code (its school axis position)
    ///
    /// # Errors
    /// Returns [`Error::LookupError`] if the code is unknown
    pub fn position_of_code(&self, code: SchoolCode) -> Result<usize> {
        self.by_code
            .get(&code)
            .copied()
            .ok_or_else(|| Error::LookupError(format!("Unknown school code: {code}")))
    }

    /// Name registered for a code
    #[must_use]
    pub fn name_for(&self, code: SchoolCode) -> Option<&str> {
        self.by_code
            .get(&code)
            .map(|&position| self.schools[position].name.as_str())
    }

    /// Code registered for a name
    #[must_use]
    pub fn code_for(&self, name: &str) -> Option<SchoolCode> {
        self.by_name
            .get(name)
            .map(|&position| self.schools[position].code)
    }

    /// School at a school-axis position
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&School> {
        self.schools.get(position)
    }

    /// Schools in school-axis order
    pub fn iter(&self) -> std::slice::Iter<'_, School> {
        self.schools.iter()
    }

    /// Number of unique schools
    #[must_use]
    pub fn len(&self) -> usize {
        self.schools.len()
    }

    /// True if no schools are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schools.is_empty()
    }
}

impl<'a> IntoIterator for &'a SchoolIndex {
    type Item = &'a School;
    type IntoIter = std::slice::Iter<'a, School>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a arrow::array::ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| Error::StorageError(format!("Missing metadata column {name:?}")))
}
