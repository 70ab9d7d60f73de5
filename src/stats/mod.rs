//! Descriptive statistics over school slices and the full tensor
//!
//! Stateless free functions. Missing cells are skipped by every reduction;
//! a statistic with no qualifying values fails with [`Error::EmptySet`]
//! instead of producing NaN.

use crate::tensor::{EnrollmentTensor, Grade, SchoolSlice, YEARS};
use crate::{Error, Result};
use arrow::array::{Array, Float64Array};
use arrow::compute;
use serde::{Deserialize, Serialize};

/// Default threshold for [`median_above_threshold`]
pub const DEFAULT_MEDIAN_THRESHOLD: f64 = 500.0;

/// Mean enrollment per grade over all years
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeMeans {
    /// Grade 10 mean
    pub grade_10: f64,
    /// Grade 11 mean
    pub grade_11: f64,
    /// Grade 12 mean
    pub grade_12: f64,
}

impl GradeMeans {
    /// Mean for one grade
    #[must_use]
    pub const fn get(&self, grade: Grade) -> f64 {
        match grade {
            Grade::Ten => self.grade_10,
            Grade::Eleven => self.grade_11,
            Grade::Twelve => self.grade_12,
        }
    }

    /// Means in grade-axis order
    #[must_use]
    pub const fn as_array(&self) -> [f64; 3] {
        [self.grade_10, self.grade_11, self.grade_12]
    }
}

/// Whole-dataset statistics, missing cells ignored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Mean cell value in the earliest year
    pub mean_first_year: f64,
    /// Mean cell value in the latest year
    pub mean_last_year: f64,
    /// Total grade 12 enrollment in the latest year
    pub graduating_class: f64,
    /// Highest single-cell enrollment
    pub max_enrollment: f64,
    /// Lowest single-cell enrollment
    pub min_enrollment: f64,
}

/// Mean of each grade column across the year axis
///
/// # Errors
/// Returns [`Error::EmptySet`] if a grade column has no recorded values
pub fn grade_means(slice: &SchoolSlice) -> Result<GradeMeans> {
    let mean_of = |grade: Grade| {
        mean(slice.grade_column(grade).flatten())
            .ok_or_else(|| Error::EmptySet(format!("no {grade} enrollments recorded")))
    };

    Ok(GradeMeans {
        grade_10: mean_of(Grade::Ten)?,
        grade_11: mean_of(Grade::Eleven)?,
        grade_12: mean_of(Grade::Twelve)?,
    })
}

/// Highest and lowest single-cell enrollment, as `(max, min)`
///
/// # Errors
/// Returns [`Error::EmptySet`] if the slice has no recorded values
pub fn max_min(slice: &SchoolSlice) -> Result<(f64, f64)> {
    extremes(slice.present())
        .ok_or_else(|| Error::EmptySet("no enrollments recorded for this school".to_string()))
}

/// Sum across grades for every year, earliest first
#[must_use]
pub fn total_per_year(slice: &SchoolSlice) -> [f64; YEARS] {
    std::array::from_fn(|year| slice.year_row(year).flatten().sum())
}

/// Sum of [`total_per_year`]
#[must_use]
pub fn ten_year_total(slice: &SchoolSlice) -> f64 {
    total_per_year(slice).iter().sum()
}

/// Mean of [`total_per_year`]
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean_total_enrollment(slice: &SchoolSlice) -> f64 {
    ten_year_total(slice) / YEARS as f64
}

/// Median of all cells strictly greater than `threshold`
///
/// An even number of qualifying cells yields the mean of the middle two.
///
/// # Errors
/// Returns [`Error::EmptySet`] if no cell exceeds `threshold`
pub fn median_above_threshold(slice: &SchoolSlice, threshold: f64) -> Result<f64> {
    let mut values: Vec<f64> = slice.present().filter(|&v| v > threshold).collect();
    median(&mut values)
        .ok_or_else(|| Error::EmptySet(format!("no enrollments over {threshold}")))
}

/// Earliest/latest year means, latest graduating class and global extremes
///
/// # Errors
/// Returns [`Error::EmptySet`] if the earliest or latest year, or the whole
/// tensor, has no recorded values
pub fn dataset_wide_stats(tensor: &EnrollmentTensor) -> Result<DatasetSummary> {
    let first = tensor.year_values(0)?;
    let last = tensor.year_values(YEARS - 1)?;
    let graduating = tensor.grade_values(YEARS - 1, Grade::Twelve)?;
    let all = tensor.values();

    let empty = |what: &str| Error::EmptySet(format!("no enrollments recorded for {what}"));

    Ok(DatasetSummary {
        mean_first_year: array_mean(&first).ok_or_else(|| empty("the earliest year"))?,
        mean_last_year: array_mean(&last).ok_or_else(|| empty("the latest year"))?,
        graduating_class: compute::sum(&graduating).unwrap_or(0.0),
        max_enrollment: compute::max(all).ok_or_else(|| empty("any school"))?,
        min_enrollment: compute::min(all).ok_or_else(|| empty("any school"))?,
    })
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[allow(clippy::cast_precision_loss)]
fn array_mean(array: &Float64Array) -> Option<f64> {
    let count = array.len() - array.null_count();
    if count == 0 {
        return None;
    }
    compute::sum(array).map(|sum| sum / count as f64)
}

fn extremes(mut values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let first = values.next()?;
    Some(values.fold((first, first), |(max, min), v| (max.max(v), min.min(v))))
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
