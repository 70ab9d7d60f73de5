//! School dataset: enrollment tensor joined with the school index
//!
//! The index stores schools in first-seen order and that order is the
//! tensor's school axis. Construction checks that the two agree on the
//! number of schools; [`SchoolDataset::school_slice`] is the only place a
//! code is turned into a tensor position.
//!
//! ```rust
//! use enrollment_db::dataset::SchoolDataset;
//! use enrollment_db::tensor::{ROW_LEN, YEARS};
//!
//! # fn main() -> enrollment_db::Result<()> {
//! let rows = vec![vec![150.0; ROW_LEN]; YEARS];
//! let table: Vec<(String, i64)> = (0..20)
//!     .map(|i| (format!("School {i}"), 1000 + i))
//!     .collect();
//!
//! let dataset = SchoolDataset::builder()
//!     .first_year(2013)
//!     .median_threshold(500.0)
//!     .build(&rows, table)?;
//!
//! let report = dataset.query("1004")?;
//! assert_eq!(report.school.name(), "School 4");
//! assert_eq!(report.ten_year_total, 4500.0);
//! # Ok(())
//! # }
//! ```

use crate::config::DatasetConfig;
use crate::index::{School, SchoolCode, SchoolIndex};
use crate::report::{DatasetReport, SchoolReport};
use crate::tensor::{EnrollmentTensor, SchoolSlice};
use crate::{Error, Result};
use std::ops::RangeInclusive;
use tracing::{debug, info};

/// Immutable enrollment dataset
#[derive(Debug, Clone)]
pub struct SchoolDataset {
    tensor: EnrollmentTensor,
    index: SchoolIndex,
    config: DatasetConfig,
}

impl SchoolDataset {
    /// Create a dataset builder
    #[must_use]
    pub fn builder() -> SchoolDatasetBuilder {
        SchoolDatasetBuilder::default()
    }

    /// Build with the default configuration
    ///
    /// # Errors
    /// See [`SchoolDatasetBuilder::build`]
    pub fn new<R, I, S>(rows: &[R], table: I) -> Result<Self>
    where
        R: AsRef<[f64]>,
        I: IntoIterator<Item = (S, SchoolCode)>,
        S: Into<String>,
    {
        Self::builder().build(rows, table)
    }

    /// Join an already built tensor and index
    ///
    /// # Errors
    /// - [`Error::ConsistencyError`] if the index does not cover exactly the
    ///   tensor's school axis
    /// - [`Error::ConfigError`] if `config` is invalid
    pub fn from_parts(
        tensor: EnrollmentTensor,
        index: SchoolIndex,
        config: DatasetConfig,
    ) -> Result<Self> {
        config.validate()?;

        let schools = tensor.shape().schools;
        if index.len() != schools {
            return Err(Error::ConsistencyError(format!(
                "metadata lists {} unique schools but the enrollment data has {schools}",
                index.len()
            )));
        }

        info!(
            shape = %tensor.shape(),
            schools = index.len(),
            first_year = config.first_year,
            "School dataset ready"
        );
        Ok(Self {
            tensor,
            index,
            config,
        })
    }

    /// Resolve a school name or code
    ///
    /// # Errors
    /// Returns [`Error::LookupError`] if the identifier matches no school
    pub fn lookup_school(&self, identifier: &str) -> Result<&School> {
        self.index.resolve(identifier)
    }

    /// A school's (years, grades) history by code
    ///
    /// # Errors
    /// Returns [`Error::LookupError`] if the code is unknown
    pub fn school_slice(&self, code: SchoolCode) -> Result<SchoolSlice> {
        let position = self.index.position_of_code(code)?;
        debug!(code, position, "Slicing school axis");
        self.tensor.school_slice(position)
    }

    /// Resolve an identifier and compute the full school report
    ///
    /// # Errors
    /// Returns [`Error::LookupError`] for an unknown identifier, or
    /// [`Error::EmptySet`] if the school has no data for a grade
    pub fn query(&self, identifier: &str) -> Result<SchoolReport> {
        let school = self.lookup_school(identifier)?;
        let slice = self.school_slice(school.code())?;
        SchoolReport::new(school.clone(), &slice, &self.config)
    }

    /// Dataset-wide statistics
    ///
    /// # Errors
    /// Returns [`Error::EmptySet`] if the earliest or latest year is empty
    pub fn summary(&self) -> Result<DatasetReport> {
        DatasetReport::new(&self.tensor, &self.config)
    }

    /// Enrollment tensor
    #[must_use]
    pub const fn tensor(&self) -> &EnrollmentTensor {
        &self.tensor
    }

    /// School index
    #[must_use]
    pub const fn index(&self) -> &SchoolIndex {
        &self.index
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// Calendar years covered by the year axis, earliest first
    #[must_use]
    pub const fn years(&self) -> RangeInclusive<i32> {
        self.config.first_year..=self.config.last_year()
    }
}

/// Builder for [`SchoolDataset`]
#[derive(Debug, Clone, Default)]
pub struct SchoolDatasetBuilder {
    config: DatasetConfig,
}

impl SchoolDatasetBuilder {
    /// Calendar year of year index 0
    #[must_use]
    pub const fn first_year(mut self, year: i32) -> Self {
        self.config.first_year = year;
        self
    }

    /// Threshold for the median statistic in school reports
    #[must_use]
    pub fn median_threshold(mut self, threshold: f64) -> Self {
        self.config.median_threshold = threshold;
        self
    }

    /// Replace the whole configuration
    #[must_use]
    pub const fn config(mut self, config: DatasetConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the tensor and index and join them
    ///
    /// # Errors
    /// - [`Error::ShapeError`] for malformed year rows
    /// - [`Error::DuplicateName`] / [`Error::DuplicateCode`] for corrupt metadata
    /// - [`Error::ConsistencyError`] if the unique school count is not 20
    /// - [`Error::ConfigError`] for an invalid configuration
    pub fn build<R, I, S>(self, rows: &[R], table: I) -> Result<SchoolDataset>
    where
        R: AsRef<[f64]>,
        I: IntoIterator<Item = (S, SchoolCode)>,
        S: Into<String>,
    {
        let tensor = EnrollmentTensor::new(rows)?;
        let index = SchoolIndex::build(table)?;
        SchoolDataset::from_parts(tensor, index, self.config)
    }

    /// Build from year rows and an already built index
    ///
    /// # Errors
    /// Same as [`SchoolDatasetBuilder::build`], minus metadata errors
    pub fn build_with_index<R: AsRef<[f64]>>(
        self,
        rows: &[R],
        index: SchoolIndex,
    ) -> Result<SchoolDataset> {
        let tensor = EnrollmentTensor::new(rows)?;
        SchoolDataset::from_parts(tensor, index, self.config)
    }
}
