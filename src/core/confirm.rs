use crate::domain::model::Totals;
use crate::domain::ports::Confirm;
use crate::utils::error::{PayrollError, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Interactive confirmation on stdin. Enter, "y" or "yes" proceeds;
/// anything else cancels the run.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, rows: usize, totals: &Totals) -> Result<bool> {
        println!();
        println!("Rows to upload: {}", rows);
        println!("Total hours:    {:.2}", totals.hours);
        println!("Checksum:       {:.2}", totals.checksum);
        print!("Proceed? [Y/n] ");
        std::io::stdout().flush()?;

        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        Ok(accepts(&answer))
    }
}

pub(crate) fn accepts(answer: &str) -> bool {
    matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "" | "y" | "yes"
    )
}

/// Ask for the raw CSV path when none was given on the command line.
/// Surrounding quotes from drag-and-drop are trimmed.
pub fn prompt_for_path() -> Result<PathBuf> {
    print!("Path to raw payroll CSV: ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    let trimmed = answer.trim().trim_matches('"').trim_matches('\'').trim();

    if trimmed.is_empty() {
        return Err(PayrollError::config("no raw CSV path given"));
    }
    Ok(PathBuf::from(trimmed))
}
