//! Enrollment tensor (year, school, grade)
//!
//! The tensor is built once from ten flat year rows and never mutated.
//! Cells live in a single Arrow `Float64Array` in (year, school, grade)
//! row-major order; missing counts (NaN in the raw rows) become Arrow nulls
//! so every reduction can skip them.
//!
//! ```rust
//! use enrollment_db::tensor::{EnrollmentTensor, GRADES, SCHOOLS, YEARS};
//!
//! # fn main() -> enrollment_db::Result<()> {
//! let rows = vec![vec![120.0; SCHOOLS * GRADES]; YEARS];
//! let tensor = EnrollmentTensor::new(&rows)?;
//!
//! let (shape, rank) = tensor.shape_and_rank();
//! assert_eq!(shape.dims(), [10, 20, 3]);
//! assert_eq!(rank, 3);
//! # Ok(())
//! # }
//! ```

mod slice;

pub use slice::SchoolSlice;

use crate::{Error, Result};
use arrow::array::{Array, AsArray, Float64Array, UInt32Array};
use arrow::compute;
use arrow::datatypes::Float64Type;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Number of years on the year axis
pub const YEARS: usize = 10;

/// Number of schools on the school axis
pub const SCHOOLS: usize = 20;

/// Number of grades on the grade axis (10, 11, 12)
pub const GRADES: usize = 3;

/// Tensor rank
pub const RANK: usize = 3;

/// Values in one raw year row (school-major, grade-minor)
pub const ROW_LEN: usize = SCHOOLS * GRADES;

/// Total cell count
pub const CELLS: usize = YEARS * ROW_LEN;

/// Tensor shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    /// Year axis length
    pub years: usize,
    /// School axis length
    pub schools: usize,
    /// Grade axis length
    pub grades: usize,
}

impl Shape {
    /// The fixed enrollment shape (10, 20, 3)
    pub const ENROLLMENT: Self = Self {
        years: YEARS,
        schools: SCHOOLS,
        grades: GRADES,
    };

    /// Axis lengths as an array, outermost first
    #[must_use]
    pub const fn dims(self) -> [usize; RANK] {
        [self.years, self.schools, self.grades]
    }

    /// Total number of cells
    #[must_use]
    pub const fn len(self) -> usize {
        self.years * self.schools * self.grades
    }

    /// True if any axis is empty
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.years, self.schools, self.grades)
    }
}

/// Grade on the grade axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    /// Grade 10 (index 0)
    Ten,
    /// Grade 11 (index 1)
    Eleven,
    /// Grade 12 (index 2), the graduating class
    Twelve,
}

impl Grade {
    /// All grades in axis order
    pub const ALL: [Self; GRADES] = [Self::Ten, Self::Eleven, Self::Twelve];

    /// Position on the grade axis
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Ten => 0,
            Self::Eleven => 1,
            Self::Twelve => 2,
        }
    }

    /// School grade number (10, 11 or 12)
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Ten => 10,
            Self::Eleven => 11,
            Self::Twelve => 12,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "grade {}", self.number())
    }
}

/// Immutable (year, school, grade) enrollment tensor
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentTensor {
    data: Float64Array,
}

impl EnrollmentTensor {
    /// Reshape ten flat year rows into a (10, 20, 3) tensor
    ///
    /// Each row holds one year: 20 schools x 3 grades, school-major.
    /// Row 0 is the earliest year. NaN cells are stored as missing.
    ///
    /// # Errors
    /// Returns [`Error::ShapeError`] if there are not exactly ten rows or any row
    /// does not hold exactly 60 values
    pub fn new<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        if rows.len() != YEARS {
            return Err(Error::ShapeError(format!(
                "expected {YEARS} year rows, got {}",
                rows.len()
            )));
        }

        let mut values = Vec::with_capacity(CELLS);
        for (year, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != ROW_LEN {
                return Err(Error::ShapeError(format!(
                    "year row {year} has {} values, expected {ROW_LEN} ({SCHOOLS} schools x {GRADES} grades)",
                    row.len()
                )));
            }
            values.extend(row.iter().map(|&v| (!v.is_nan()).then_some(v)));
        }

        let data = Float64Array::from(values);
        debug!(
            cells = data.len(),
            missing = data.null_count(),
            "Built enrollment tensor"
        );
        Ok(Self { data })
    }

    /// Tensor shape, always (10, 20, 3)
    #[must_use]
    pub const fn shape(&self) -> Shape {
        Shape::ENROLLMENT
    }

    /// Shape and rank
    #[must_use]
    pub const fn shape_and_rank(&self) -> (Shape, usize) {
        (Shape::ENROLLMENT, RANK)
    }

    /// Number of cells
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false for a constructed tensor
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// All cells, (year, school, grade) row-major
    #[must_use]
    pub const fn values(&self) -> &Float64Array {
        &self.data
    }

    /// Single cell, `None` if missing or out of range
    #[must_use]
    pub fn get(&self, year: usize, school: usize, grade: usize) -> Option<f64> {
        if year >= YEARS || school >= SCHOOLS || grade >= GRADES {
            return None;
        }
        let offset = Self::offset(year, school, grade);
        self.data.is_valid(offset).then(|| self.data.value(offset))
    }

    /// All 60 cells of one year (zero-copy)
    ///
    /// # Errors
    /// Returns [`Error::IndexError`] if `year` is outside [0, 9]
    pub fn year_values(&self, year: usize) -> Result<Float64Array> {
        check_axis("year", year, YEARS)?;
        Ok(self.data.slice(year * ROW_LEN, ROW_LEN))
    }

    /// One grade across all schools for one year
    ///
    /// # Errors
    /// Returns [`Error::IndexError`] if `year` is outside [0, 9]
    pub fn grade_values(&self, year: usize, grade: Grade) -> Result<Float64Array> {
        check_axis("year", year, YEARS)?;
        let indices: Vec<usize> = (0..SCHOOLS)
            .map(|school| Self::offset(year, school, grade.index()))
            .collect();
        self.gather(&indices)
    }

    /// One school's (10, 3) history
    ///
    /// # Errors
    /// Returns [`Error::IndexError`] if `school` is outside [0, 19]
    pub fn school_slice(&self, school: usize) -> Result<SchoolSlice> {
        check_axis("school", school, SCHOOLS)?;
        let indices: Vec<usize> = (0..YEARS)
            .flat_map(|year| (0..GRADES).map(move |grade| Self::offset(year, school, grade)))
            .collect();
        Ok(SchoolSlice::from_array(self.gather(&indices)?))
    }

    const fn offset(year: usize, school: usize, grade: usize) -> usize {
        (year * SCHOOLS + school) * GRADES + grade
    }

    #[allow(clippy::cast_possible_truncation)]
    fn gather(&self, indices: &[usize]) -> Result<Float64Array> {
        // CELLS fits comfortably in u32
        let indices = UInt32Array::from_iter_values(indices.iter().map(|&i| i as u32));
        let taken = compute::take(&self.data, &indices, None)?;
        Ok(taken.as_primitive::<Float64Type>().clone())
    }
}

fn check_axis(axis: &'static str, position: usize, len: usize) -> Result<()> {
    if position >= len {
        return Err(Error::IndexError {
            axis,
            position,
            len,
        });
    }
    Ok(())
}
