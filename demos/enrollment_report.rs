//! Interactive enrollment report
//!
//! This demo:
//! - Generates ten years of synthetic enrollment for 20 schools
//! - Builds the school index from a metadata CSV (or a generated table)
//! - Runs the interactive query loop on stdin/stdout
//!
//! Run with: cargo run --example enrollment_report [-- path/to/schools.csv]
//! Set `RUST_LOG=enrollment_db=debug` to see construction and lookup logs.

use anyhow::Context;
use enrollment_db::session::Session;
use enrollment_db::storage::MetadataTable;
use enrollment_db::tensor::{GRADES, SCHOOLS, YEARS};
use enrollment_db::{SchoolDataset, SchoolIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let index = match std::env::args().nth(1) {
        Some(path) => MetadataTable::load_csv(&path)
            .and_then(|table| table.to_index())
            .with_context(|| format!("loading school metadata from {path}"))?,
        None => SchoolIndex::build(generated_table())?,
    };

    let dataset = SchoolDataset::builder()
        .first_year(2013)
        .build_with_index(&synthetic_rows(42), index)
        .context("building enrollment dataset")?;

    println!("Known schools:");
    for school in dataset.index() {
        println!("  {:>6}  {}", school.code(), school.name());
    }
    println!();

    let stdin = io::stdin();
    let answered = Session::new(&dataset).run(stdin.lock(), io::stdout().lock())?;
    println!("\nAnswered {answered} queries");

    Ok(())
}

/// Enrollment drifting by a few percent a year around a per-school base
#[allow(clippy::cast_precision_loss)]
fn synthetic_rows(seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let bases: Vec<f64> = (0..SCHOOLS).map(|_| rng.gen_range(150.0..800.0)).collect();

    (0..YEARS)
        .map(|year| {
            bases
                .iter()
                .flat_map(|&base| {
                    let trend = 1.0 + 0.02 * year as f64;
                    (0..GRADES)
                        .map(|grade| {
                            let attrition = 1.0 - 0.04 * grade as f64;
                            (base * trend * attrition * rng.gen_range(0.9..1.1)).round()
                        })
                        .collect::<Vec<_>>()
                })
                .collect()
        })
        .collect()
}

fn generated_table() -> Vec<(String, i64)> {
    const NAMES: [&str; SCHOOLS] = [
        "Centennial", "Crescent Heights", "Dr. E. P. Scarlett", "Ernest Manning",
        "Henry Wise Wood", "James Fowler", "Jack James", "Lester B. Pearson",
        "Lord Beaverbrook", "Nelson Mandela", "Queen Elizabeth", "Robert Thirsk",
        "Sir Winston Churchill", "Western Canada", "William Aberhart", "Bowness",
        "Forest Lawn", "Joane Cardinal-Schubert", "John G. Diefenbaker", "Lord Shaughnessy",
    ];
    NAMES
        .iter()
        .zip(9625i64..)
        .map(|(name, code)| (format!("{name} High School"), code))
        .collect()
}
