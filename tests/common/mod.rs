//! Shared fixtures for integration tests
#![allow(dead_code)]

use enrollment_db::tensor::{GRADES, SCHOOLS, YEARS};

/// School names in school-axis order
pub const SCHOOL_NAMES: [&str; SCHOOLS] = [
    "Aspen High",
    "Birchwood High",
    "Cedar Ridge High",
    "Dogwood High",
    "Elmhurst High",
    "Fir Valley High",
    "Glenwood High",
    "Hawthorn High",
    "Ironwood High",
    "Juniper High",
    "Kingsford High",
    "Larch Park High",
    "Maplewood High",
    "Northgate High",
    "Oakridge High",
    "Pinecrest High",
    "Quarry Hill High",
    "Redwood High",
    "Spruce Meadow High",
    "Tamarack High",
];

/// Code of the school at `position`
#[allow(clippy::cast_possible_wrap)]
pub fn code_of(position: usize) -> i64 {
    9000 + 7 * position as i64
}

/// Enrollment of (year, school, grade): 200 + 25 * school + 10 * year + 5 * grade
#[allow(clippy::cast_precision_loss)]
pub fn cell(year: usize, school: usize, grade: usize) -> f64 {
    (200 + 25 * school + 10 * year + 5 * grade) as f64
}

/// Ten flat year rows, school-major, grade-minor
pub fn year_rows() -> Vec<Vec<f64>> {
    (0..YEARS)
        .map(|year| {
            (0..SCHOOLS)
                .flat_map(|school| (0..GRADES).map(move |grade| cell(year, school, grade)))
                .collect()
        })
        .collect()
}

/// Metadata table with one row per school per year (duplicates included)
pub fn school_table() -> Vec<(String, i64)> {
    (0..YEARS)
        .flat_map(|_| {
            SCHOOL_NAMES
                .iter()
                .enumerate()
                .map(|(position, name)| ((*name).to_string(), code_of(position)))
        })
        .collect()
}
