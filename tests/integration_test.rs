//! Integration test: metadata file -> index -> dataset -> session
//!
//! 1. Write the school metadata table as CSV and Parquet
//! 2. Load it back and build the school index
//! 3. Join with the year rows and run an interactive session

mod common;

use arrow::array::{Int64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use enrollment_db::index::{CODE_COLUMN, LOOKUP_MESSAGE, NAME_COLUMN};
use enrollment_db::session::{Session, PROMPT};
use enrollment_db::storage::MetadataTable;
use enrollment_db::SchoolDataset;
use parquet::arrow::ArrowWriter;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("enrollment_db_it_{}_{name}", std::process::id()))
}

fn write_csv(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(path)?;
    writeln!(file, "School Year,School Name,School Code,Grade 10,Grade 11,Grade 12")?;
    for (year, (name, code)) in common::school_table().into_iter().enumerate() {
        writeln!(file, "{},{name},{code},0,0,0", 2013 + year / 20)?;
    }
    Ok(())
}

fn write_parquet(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (names, codes): (Vec<String>, Vec<i64>) = common::school_table().into_iter().unzip();
    let schema = Arc::new(Schema::new(vec![
        Field::new(NAME_COLUMN, DataType::Utf8, false),
        Field::new(CODE_COLUMN, DataType::Int64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(names)),
            Arc::new(Int64Array::from(codes)),
        ],
    )?;

    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

#[test]
fn test_csv_metadata_to_report() {
    let path = temp_path("schools.csv");
    write_csv(&path).unwrap();

    let table = MetadataTable::load_csv(&path).unwrap();
    assert_eq!(table.num_rows(), 200);

    let dataset = SchoolDataset::builder()
        .build_with_index(&common::year_rows(), table.to_index().unwrap())
        .unwrap();
    let report = dataset.query("Juniper High").unwrap();
    assert_eq!(report.school.code(), common::code_of(9));

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_parquet_metadata_matches_csv() {
    let csv_path = temp_path("schools_pq.csv");
    let parquet_path = temp_path("schools.parquet");
    write_csv(&csv_path).unwrap();
    write_parquet(&parquet_path).unwrap();

    let from_csv = MetadataTable::load_csv(&csv_path).unwrap().to_index().unwrap();
    let from_parquet = MetadataTable::load_parquet(&parquet_path)
        .unwrap()
        .to_index()
        .unwrap();
    assert_eq!(from_csv, from_parquet);

    std::fs::remove_file(&csv_path).ok();
    std::fs::remove_file(&parquet_path).ok();
}

#[test]
fn test_session_end_to_end() {
    let dataset = SchoolDataset::new(&common::year_rows(), common::school_table()).unwrap();
    let code = common::code_of(19);
    let input = format!("Atlantis High\nTamarack High\n{code}\nq\nAspen High\n");

    let mut output = Vec::new();
    let answered = Session::new(&dataset)
        .run(input.as_bytes(), &mut output)
        .unwrap();
    let output = String::from_utf8(output).unwrap();

    // input after `q` is never read
    assert_eq!(answered, 2);
    assert_eq!(output.matches(PROMPT).count(), 4);
    assert_eq!(output.matches(LOOKUP_MESSAGE).count(), 1);
    assert_eq!(
        output
            .matches(&format!("School Name: Tamarack High, School Code: {code}"))
            .count(),
        2
    );
    assert!(output.contains("For all enrollments over 500, the median value was: 725"));
    assert!(output.contains("Total graduating class of 2022: 10750"));
    assert!(!output.contains("Aspen High"));
}
