//! # enrollment-db: Embedded School Enrollment Analytics
//!
//! **Version**: 0.1.0
//!
//! enrollment-db answers descriptive-statistics queries over a fixed
//! ten-year enrollment dataset: 10 years x 20 schools x 3 grades.
//!
//! ## Design
//!
//! - **Tensor**: flat per-year rows reshaped once into an immutable
//!   (year, school, grade) Arrow array; missing counts are nulls
//! - **Index**: one bijective name <-> code mapping whose insertion order is
//!   the tensor's school axis
//! - **Dataset**: joins the two, validating that they describe the same
//!   schools
//! - **Statistics**: stateless reductions over one school's (10, 3) slice or
//!   the whole tensor
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use enrollment_db::dataset::SchoolDataset;
//! use enrollment_db::storage::MetadataTable;
//!
//! # fn year_rows() -> Vec<Vec<f64>> { vec![vec![0.0; 60]; 10] }
//! let index = MetadataTable::load_csv("data/schools.csv")?.to_index()?;
//! let dataset = SchoolDataset::builder()
//!     .first_year(2013)
//!     .build_with_index(&year_rows(), index)?;
//!
//! let report = dataset.query("Centennial High School")?;
//! println!("{}\n{report}", report.school);
//! println!("{}", dataset.summary()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod index;
pub mod report;
pub mod session;
pub mod stats;
pub mod storage;
pub mod tensor;

pub use config::DatasetConfig;
pub use dataset::{SchoolDataset, SchoolDatasetBuilder};
pub use error::{Error, Result};
pub use index::{School, SchoolCode, SchoolIndex};
pub use report::{DatasetReport, SchoolReport};
pub use tensor::{EnrollmentTensor, Grade, SchoolSlice, Shape};
