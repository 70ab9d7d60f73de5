//! Interactive query loop
//!
//! Reads school names or codes line by line and prints the school report
//! followed by the dataset-wide statistics. Unknown schools (and other
//! recoverable errors) are printed and the loop prompts again; `q` or end
//! of input ends the session.

use crate::dataset::SchoolDataset;
use crate::Result;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

/// Input that ends the session
pub const QUIT: &str = "q";

/// Banner printed at the start of a session
pub const BANNER: &str = "School Enrollment Statistics";

/// Prompt printed before every read
pub const PROMPT: &str = "Enter a school name or school code (enter q to leave): ";

/// Query loop over one dataset
pub struct Session<'a> {
    dataset: &'a SchoolDataset,
}

impl<'a> Session<'a> {
    /// Create a session over `dataset`
    #[must_use]
    pub const fn new(dataset: &'a SchoolDataset) -> Self {
        Self { dataset }
    }

    /// Run until `q` or end of input
    ///
    /// Returns the number of queries that produced a report.
    ///
    /// # Errors
    /// Returns IO errors and any non-recoverable dataset error
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<usize> {
        let (shape, rank) = self.dataset.tensor().shape_and_rank();
        writeln!(output, "{BANNER}")?;
        writeln!(output, "Shape of the array: {shape}")?;
        writeln!(output, "Dimensions of the array: {rank}")?;

        let mut answered = 0;
        let mut line = String::new();
        loop {
            write!(output, "{PROMPT}")?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                debug!("Input closed, ending session");
                break;
            }
            let identifier = line.trim_end_matches(['\r', '\n']);
            if identifier == QUIT {
                break;
            }

            match self.answer(identifier, &mut output) {
                Ok(()) => answered += 1,
                Err(e) if e.is_recoverable() => {
                    warn!(identifier, error = %e, "Query failed");
                    writeln!(output, "{e}\n")?;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(answered)
    }

    fn answer<W: Write>(&self, identifier: &str, output: &mut W) -> Result<()> {
        let report = self.dataset.query(identifier)?;
        let summary = self.dataset.summary()?;

        writeln!(output, "\n***Requested School Statistics***\n")?;
        writeln!(output, "{}", report.school)?;
        writeln!(output, "{report}")?;
        writeln!(output, "\n***General Statistics for All Schools***\n")?;
        writeln!(output, "{summary}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::{ROW_LEN, SCHOOLS, YEARS};

    fn dataset() -> SchoolDataset {
        let rows = vec![vec![300.0; ROW_LEN]; YEARS];
        let table: Vec<(String, i64)> = (0..SCHOOLS as i64)
            .map(|i| (format!("School {i}"), 100 + i))
            .collect();
        SchoolDataset::new(&rows, table).unwrap()
    }

    fn run(input: &str) -> (usize, String) {
        let dataset = dataset();
        let mut output = Vec::new();
        let answered = Session::new(&dataset)
            .run(input.as_bytes(), &mut output)
            .unwrap();
        (answered, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_quit_immediately() {
        let (answered, output) = run("q\n");
        assert_eq!(answered, 0);
        assert!(output.starts_with(BANNER));
        assert!(output.contains("Shape of the array: (10, 20, 3)"));
        assert!(output.contains("Dimensions of the array: 3"));
    }

    #[test]
    fn test_lookup_error_reprompts() {
        let (answered, output) = run("Nowhere\n105\nq\n");
        assert_eq!(answered, 1);
        assert!(output.contains(crate::index::LOOKUP_MESSAGE));
        assert!(output.contains("School Name: School 5, School Code: 105"));
        assert!(output.contains("***General Statistics for All Schools***"));
        assert_eq!(output.matches(PROMPT).count(), 3);
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let (answered, output) = run("School 2");
        assert_eq!(answered, 1);
        assert!(output.contains("Total enrollment in 2013: 900"));
    }
}
