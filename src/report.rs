//! Per-school and dataset-wide reports
//!
//! Reports bundle the statistics for presentation. They serialize with
//! `serde` and render as plain text with whole-number values.

use crate::config::DatasetConfig;
use crate::index::School;
use crate::stats::{self, DatasetSummary, GradeMeans};
use crate::tensor::{EnrollmentTensor, Grade, SchoolSlice};
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Total enrollment for one calendar year
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearTotal {
    /// Calendar year
    pub year: i32,
    /// Sum across grades
    pub total: f64,
}

/// Full statistics report for one school
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolReport {
    /// Resolved school
    pub school: School,
    /// Mean enrollment per grade
    pub grade_means: GradeMeans,
    /// Highest single-grade enrollment
    pub highest: f64,
    /// Lowest single-grade enrollment
    pub lowest: f64,
    /// Total enrollment per year, earliest first
    pub totals_by_year: Vec<YearTotal>,
    /// Sum of all yearly totals
    pub ten_year_total: f64,
    /// Mean yearly total
    pub mean_total: f64,
    /// Threshold used for `median_above_threshold`
    pub median_threshold: f64,
    /// Median of enrollments above the threshold, `None` if there are none
    pub median_above_threshold: Option<f64>,
}

impl SchoolReport {
    /// Compute every per-school statistic for `slice`
    ///
    /// # Errors
    /// Returns [`Error::EmptySet`] if the slice has no values for a grade;
    /// an empty median set is recorded as `None` instead
    pub fn new(school: School, slice: &SchoolSlice, config: &DatasetConfig) -> Result<Self> {
        let grade_means = stats::grade_means(slice)?;
        let (highest, lowest) = stats::max_min(slice)?;
        let totals_by_year = stats::total_per_year(slice)
            .iter()
            .enumerate()
            .map(|(year, &total)| YearTotal {
                year: config.year_label(year),
                total,
            })
            .collect();
        let median_above_threshold =
            match stats::median_above_threshold(slice, config.median_threshold) {
                Ok(median) => Some(median),
                Err(Error::EmptySet(_)) => None,
                Err(e) => return Err(e),
            };

        Ok(Self {
            school,
            grade_means,
            highest,
            lowest,
            totals_by_year,
            ten_year_total: stats::ten_year_total(slice),
            mean_total: stats::mean_total_enrollment(slice),
            median_threshold: config.median_threshold,
            median_above_threshold,
        })
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    /// Returns [`Error::Other`] if serialization fails
    pub fn to_json(&self) -> Result<String> {
        to_json(self)
    }
}

impl fmt::Display for SchoolReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for grade in Grade::ALL {
            writeln!(
                f,
                "Mean enrollment for {grade}: {:.0}",
                self.grade_means.get(grade)
            )?;
        }
        writeln!(f, "Highest enrollment for a single grade: {:.0}", self.highest)?;
        writeln!(f, "Lowest enrollment for a single grade: {:.0}", self.lowest)?;
        for YearTotal { year, total } in &self.totals_by_year {
            writeln!(f, "Total enrollment in {year}: {total:.0}")?;
        }
        writeln!(f, "Total ten year enrollment: {:.0}", self.ten_year_total)?;
        writeln!(
            f,
            "Mean total enrollment over 10 years: {:.0}",
            self.mean_total
        )?;
        match self.median_above_threshold {
            Some(median) => write!(
                f,
                "For all enrollments over {:.0}, the median value was: {median:.0}",
                self.median_threshold
            ),
            None => write!(
                f,
                "No enrollments over {:.0} were recorded",
                self.median_threshold
            ),
        }
    }
}

/// Dataset-wide statistics labelled with calendar years
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DatasetReport {
    /// Calendar year of year index 0
    pub first_year: i32,
    /// Calendar year of the latest year index
    pub last_year: i32,
    /// Underlying statistics
    #[serde(flatten)]
    pub summary: DatasetSummary,
}

impl DatasetReport {
    /// Compute dataset-wide statistics for `tensor`
    ///
    /// # Errors
    /// Propagates [`stats::dataset_wide_stats`] errors
    pub fn new(tensor: &EnrollmentTensor, config: &DatasetConfig) -> Result<Self> {
        Ok(Self {
            first_year: config.first_year,
            last_year: config.last_year(),
            summary: stats::dataset_wide_stats(tensor)?,
        })
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    /// Returns [`Error::Other`] if serialization fails
    pub fn to_json(&self) -> Result<String> {
        to_json(self)
    }
}

impl fmt::Display for DatasetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(f, "Mean enrollment in {}: {:.0}", self.first_year, s.mean_first_year)?;
        writeln!(f, "Mean enrollment in {}: {:.0}", self.last_year, s.mean_last_year)?;
        writeln!(
            f,
            "Total graduating class of {}: {:.0}",
            self.last_year, s.graduating_class
        )?;
        writeln!(f, "Highest enrollment for a single grade: {:.0}", s.max_enrollment)?;
        write!(f, "Lowest enrollment for a single grade: {:.0}", s.min_enrollment)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| Error::Other(format!("Failed to serialize report: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::{GRADES, YEARS};

    fn report_for(rows: &[[f64; GRADES]]) -> SchoolReport {
        let slice = SchoolSlice::from_rows(rows).unwrap();
        SchoolReport::new(
            School::new("Alpha High", 101),
            &slice,
            &DatasetConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_school_report_text() {
        let report = report_for(&[[100.0, 200.0, 200.0]; YEARS]);
        let text = report.to_string();

        assert!(text.contains("Mean enrollment for grade 10: 100"));
        assert!(text.contains("Mean enrollment for grade 12: 200"));
        assert!(text.contains("Highest enrollment for a single grade: 200"));
        assert!(text.contains("Total enrollment in 2013: 500"));
        assert!(text.contains("Total enrollment in 2022: 500"));
        assert!(text.contains("Total ten year enrollment: 5000"));
        assert!(text.contains("Mean total enrollment over 10 years: 500"));
        assert!(text.ends_with("No enrollments over 500 were recorded"));
    }

    #[test]
    fn test_school_report_median_line() {
        let report = report_for(&[[600.0, 700.0, 800.0]; YEARS]);
        assert_eq!(report.median_above_threshold, Some(700.0));
        assert!(report
            .to_string()
            .ends_with("For all enrollments over 500, the median value was: 700"));
    }

    #[test]
    fn test_school_report_json() {
        let report = report_for(&[[100.0, 200.0, 200.0]; YEARS]);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["school"]["code"], 101);
        assert_eq!(json["totals_by_year"].as_array().unwrap().len(), YEARS);
        assert_eq!(json["totals_by_year"][0]["year"], 2013);
        assert!(json["median_above_threshold"].is_null());
    }

    #[test]
    fn test_school_report_rejects_empty_grade() {
        let slice = SchoolSlice::from_rows(&[[f64::NAN, 1.0, 1.0]; YEARS]).unwrap();
        let err = SchoolReport::new(
            School::new("Alpha High", 101),
            &slice,
            &DatasetConfig::default(),
        )
        .unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_dataset_report_text() {
        let tensor =
            EnrollmentTensor::new(&vec![vec![250.0; crate::tensor::ROW_LEN]; YEARS]).unwrap();
        let report = DatasetReport::new(&tensor, &DatasetConfig::default()).unwrap();
        let text = report.to_string();

        assert!(text.contains("Mean enrollment in 2013: 250"));
        assert!(text.contains("Mean enrollment in 2022: 250"));
        assert!(text.contains("Total graduating class of 2022: 5000"));
        assert!(text.ends_with("Lowest enrollment for a single grade: 250"));

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["last_year"], 2022);
        assert_eq!(json["graduating_class"], 5000.0);
    }
}
