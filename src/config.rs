//! Dataset configuration
//!
//! Defaults match the enrollment data this crate was built for: ten school
//! years starting 2013, median reported over enrollments above 500.

use crate::stats::DEFAULT_MEDIAN_THRESHOLD;
use crate::tensor::YEARS;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default calendar year of year index 0
pub const DEFAULT_FIRST_YEAR: i32 = 2013;

/// Query-time settings for a [`SchoolDataset`](crate::dataset::SchoolDataset)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Calendar year of year index 0
    pub first_year: i32,
    /// Enrollments strictly above this value feed the median statistic
    pub median_threshold: f64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            first_year: DEFAULT_FIRST_YEAR,
            median_threshold: DEFAULT_MEDIAN_THRESHOLD,
        }
    }
}

impl DatasetConfig {
    /// Parse from JSON; missing fields take their defaults
    ///
    /// # Errors
    /// Returns [`Error::ConfigError`] on malformed JSON or an invalid value
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::ConfigError(format!("Invalid dataset config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the threshold is finite and every year index has a label
    ///
    /// # Errors
    /// Returns [`Error::ConfigError`] if `median_threshold` is NaN or infinite,
    /// or if the last year would overflow `i32`
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn validate(&self) -> Result<()> {
        if self.first_year.checked_add(YEARS as i32 - 1).is_none() {
            return Err(Error::ConfigError(format!(
                "first_year {} leaves no room for {YEARS} year labels",
                self.first_year
            )));
        }
        if !self.median_threshold.is_finite() {
            return Err(Error::ConfigError(format!(
                "median_threshold must be finite, got {}",
                self.median_threshold
            )));
        }
        Ok(())
    }

    /// Calendar year of a year index
    ///
    /// Saturates at `i32::MAX` for configurations that fail [`validate`](Self::validate).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn year_label(&self, year_index: usize) -> i32 {
        self.first_year.saturating_add(year_index as i32)
    }

    /// Calendar year of the latest year index
    #[must_use]
    pub const fn last_year(&self) -> i32 {
        self.year_label(YEARS - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DatasetConfig::default();
        assert_eq!(config.first_year, 2013);
        assert_eq!(config.last_year(), 2022);
        assert!((config.median_threshold - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_json_partial() {
        let config = DatasetConfig::from_json(r#"{ "first_year": 2001 }"#).unwrap();
        assert_eq!(config.first_year, 2001);
        assert_eq!(config.year_label(4), 2005);
        assert!((config.median_threshold - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = DatasetConfig::from_json("first_year = 2001").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_validate_rejects_infinite_threshold() {
        let config = DatasetConfig {
            median_threshold: f64::INFINITY,
            ..DatasetConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_rejects_overflowing_first_year() {
        let err = DatasetConfig::from_json(r#"{ "first_year": 2147483640 }"#).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
        assert!(err.to_string().contains("2147483640"));
    }

    #[test]
    fn test_validate_first_year_at_upper_edge() {
        let config = DatasetConfig {
            first_year: i32::MAX - 9,
            ..DatasetConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.last_year(), i32::MAX);

        let config = DatasetConfig {
            first_year: i32::MAX - 8,
            ..DatasetConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
        assert_eq!(config.year_label(YEARS - 1), i32::MAX);
    }
}
