//! School metadata storage (Arrow CSV/Parquet)
//!
//! Holds the raw metadata table as Arrow record batches. Only the
//! `School Name` and `School Code` columns are read when building the
//! index; any other columns (school year, grade counts, ...) are carried
//! along untouched.

use crate::index::SchoolIndex;
use crate::{Error, Result};
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::record_batch::RecordBatch;
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Rows per record batch when reading CSV
const CSV_BATCH_SIZE: usize = 1024;

/// Metadata table loaded from CSV or Parquet
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    batches: Vec<RecordBatch>,
}

impl MetadataTable {
    /// Create a table from existing batches
    ///
    /// Useful for testing
    #[must_use]
    pub fn new(batches: Vec<RecordBatch>) -> Self {
        Self { batches }
    }

    /// Load a CSV file with a header row, inferring column types
    ///
    /// # Errors
    /// Returns error if the file cannot be opened or parsed
    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)
            .map_err(storage_error(&format!("open CSV file {}", path.display())))?;

        let format = Format::default().with_header(true);
        let (schema, _) = format
            .infer_schema(&mut file, None)
            .map_err(storage_error("infer CSV schema"))?;
        file.seek(SeekFrom::Start(0))?;

        let reader = ReaderBuilder::new(Arc::new(schema))
            .with_format(format)
            .with_batch_size(CSV_BATCH_SIZE)
            .build(file)
            .map_err(storage_error("create CSV reader"))?;

        let batches = reader
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(storage_error("read CSV record batch"))?;

        let table = Self { batches };
        info!(path = %path.display(), rows = table.num_rows(), "Loaded metadata CSV");
        Ok(table)
    }

    /// Load a Parquet file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

        let path = path.as_ref();
        let file = File::open(path)
            .map_err(storage_error(&format!("open Parquet file {}", path.display())))?;

        let batches = ParquetRecordBatchReaderBuilder::try_new(file)
            .map_err(storage_error("parse Parquet file"))?
            .build()
            .map_err(storage_error("create Parquet reader"))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(storage_error("read Parquet record batch"))?;

        let table = Self { batches };
        info!(path = %path.display(), rows = table.num_rows(), "Loaded metadata Parquet");
        Ok(table)
    }

    /// All record batches
    #[must_use]
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Total row count across batches
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    /// Build the school index from the name and code columns
    ///
    /// # Errors
    /// See [`SchoolIndex::from_batches`]
    pub fn to_index(&self) -> Result<SchoolIndex> {
        SchoolIndex::from_batches(&self.batches)
    }
}

/// Wrap a loader failure as `Error::StorageError("Failed to <action>: <cause>")`
fn storage_error<E: std::fmt::Display>(action: &str) -> impl FnOnce(E) -> Error + '_ {
    move |e| Error::StorageError(format!("Failed to {action}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("enrollment_db_{}_{name}", std::process::id()))
    }

    #[test]
    fn test_load_csv_builds_index() {
        let path = temp_path("schools.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "School Year,School Name,School Code,Grade 10").unwrap();
        writeln!(file, "2013,Alpha High,101,250").unwrap();
        writeln!(file, "2014,Alpha High,101,260").unwrap();
        writeln!(file, "2013,Beta High,202,310").unwrap();
        drop(file);

        let table = MetadataTable::load_csv(&path).unwrap();
        assert_eq!(table.num_rows(), 3);

        let index = table.to_index().unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.position_of_code(202).unwrap(), 1);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_csv_missing_file() {
        let err = MetadataTable::load_csv(temp_path("does_not_exist.csv")).unwrap_err();
        assert!(err.to_string().contains("Failed to open CSV file"));
    }

    #[test]
    fn test_load_parquet_missing_file() {
        let err = MetadataTable::load_parquet(temp_path("does_not_exist.parquet")).unwrap_err();
        assert!(err.to_string().contains("Failed to open Parquet file"));
    }

    #[test]
    fn test_load_parquet_rejects_non_parquet() {
        let path = temp_path("not_parquet.parquet");
        std::fs::write(&path, "School Name,School Code\nAlpha High,101\n").unwrap();

        let err = MetadataTable::load_parquet(&path).unwrap_err();
        assert!(matches!(err, Error::StorageError(_)));
        assert!(err.to_string().starts_with("Storage error: Failed to parse Parquet file"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_empty_table() {
        let table = MetadataTable::new(vec![]);
        assert_eq!(table.num_rows(), 0);
        assert!(table.to_index().unwrap().is_empty());
    }
}
