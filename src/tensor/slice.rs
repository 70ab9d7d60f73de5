//! One school's (years, grades) history

use super::{Grade, GRADES, YEARS};
use crate::{Error, Result};
use arrow::array::{Array, Float64Array};

/// A (10, 3) slice of the enrollment tensor with the school axis fixed
///
/// Cells are stored year-major: `[y0g10, y0g11, y0g12, y1g10, ...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolSlice {
    values: Float64Array,
}

impl SchoolSlice {
    pub(super) fn from_array(values: Float64Array) -> Self {
        debug_assert_eq!(values.len(), YEARS * GRADES);
        Self { values }
    }

    /// Build a slice directly from ten `[grade10, grade11, grade12]` rows
    ///
    /// NaN cells are treated as missing.
    ///
    /// # Errors
    /// Returns [`Error::ShapeError`] unless exactly ten rows are given
    pub fn from_rows(rows: &[[f64; GRADES]]) -> Result<Self> {
        if rows.len() != YEARS {
            return Err(Error::ShapeError(format!(
                "school slice needs {YEARS} year rows, got {}",
                rows.len()
            )));
        }
        let values: Float64Array = rows
            .iter()
            .flatten()
            .map(|&v| (!v.is_nan()).then_some(v))
            .collect();
        Ok(Self { values })
    }

    /// Cell at (year, grade), `None` if missing or out of range
    #[must_use]
    pub fn get(&self, year: usize, grade: usize) -> Option<f64> {
        if year >= YEARS || grade >= GRADES {
            return None;
        }
        let offset = year * GRADES + grade;
        self.values.is_valid(offset).then(|| self.values.value(offset))
    }

    /// One grade column across all years
    pub fn grade_column(&self, grade: Grade) -> impl Iterator<Item = Option<f64>> + '_ {
        (0..YEARS).map(move |year| self.get(year, grade.index()))
    }

    /// One year row across all grades
    pub fn year_row(&self, year: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        (0..GRADES).map(move |grade| self.get(year, grade))
    }

    /// Present (non-missing) cells in year-major order
    pub fn present(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().flatten()
    }

    /// Underlying Arrow array
    #[must_use]
    pub const fn values(&self) -> &Float64Array {
        &self.values
    }
}
