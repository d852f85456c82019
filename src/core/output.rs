use crate::domain::model::{OutputRecord, RosterRecord, TransformResult};
use crate::utils::error::{PayrollError, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct WriteOutcome {
    pub output_path: PathBuf,
    pub archive_path: PathBuf,
    pub unmatched_report: Option<PathBuf>,
}

/// Write the normalized CSV, archive the raw input, and emit the unmatched
/// roster report. The normalized file goes through a temp file renamed into
/// place only after the archive copy succeeds, so a failed run never leaves
/// a partial dist file behind.
pub fn write_all(
    raw_path: &Path,
    dist_dir: &Path,
    archive_dir: &Path,
    result: &TransformResult,
) -> Result<WriteOutcome> {
    let stem = raw_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("payroll");

    fs::create_dir_all(dist_dir).map_err(|e| {
        PayrollError::output(format!("cannot create dist dir {}: {}", dist_dir.display(), e))
    })?;
    fs::create_dir_all(archive_dir).map_err(|e| {
        PayrollError::output(format!(
            "cannot create archive dir {}: {}",
            archive_dir.display(),
            e
        ))
    })?;

    let output_path = dist_dir.join(format!("{}_normalized.csv", stem));
    let tmp_path = dist_dir.join(format!("{}_normalized.csv.tmp", stem));

    if let Err(e) = write_records(&tmp_path, &result.columns, &result.records) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    let timestamp = Local::now().format("%Y%m%d-%H%M%S");
    let archive_path = archive_dir.join(format!("{}_{}.csv", stem, timestamp));
    if let Err(e) = fs::copy(raw_path, &archive_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(PayrollError::output(format!(
            "cannot archive {} to {}: {}",
            raw_path.display(),
            archive_path.display(),
            e
        )));
    }

    if let Err(e) = fs::rename(&tmp_path, &output_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(PayrollError::output(format!(
            "cannot finalize {}: {}",
            output_path.display(),
            e
        )));
    }

    let unmatched_report = if result.unmatched_roster.is_empty() {
        None
    } else {
        let report_path = dist_dir.join(format!("{}_unmatched.csv", stem));
        write_unmatched(&report_path, &result.roster_columns, &result.unmatched_roster)?;
        Some(report_path)
    };

    Ok(WriteOutcome {
        output_path,
        archive_path,
        unmatched_report,
    })
}

fn write_records(path: &Path, columns: &[String], records: &[OutputRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| PayrollError::output(format!("cannot write {}: {}", path.display(), e)))?;

    let write_error =
        |e: csv::Error| PayrollError::output(format!("cannot write {}: {}", path.display(), e));

    writer.write_record(columns).map_err(write_error)?;
    for record in records {
        let mut row: Vec<String> = record.statics.clone();
        row.push(format!("{:.2}", record.pretax));
        row.push(format!("{:.2}", record.pretax_catchup));
        row.push(format!("{:.2}", record.roth));
        row.push(format!("{:.2}", record.roth_catchup));
        row.push(format!("{:.2}", record.safe_harbor));
        row.push(format!("{:.2}", record.compensation));
        row.push(format!("{:.2}", record.hours));
        writer.write_record(&row).map_err(write_error)?;
    }
    writer
        .flush()
        .map_err(|e| PayrollError::output(format!("cannot write {}: {}", path.display(), e)))?;
    Ok(())
}

fn write_unmatched(path: &Path, columns: &[String], records: &[RosterRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| PayrollError::output(format!("cannot write {}: {}", path.display(), e)))?;

    let write_error =
        |e: csv::Error| PayrollError::output(format!("cannot write {}: {}", path.display(), e));

    writer.write_record(columns).map_err(write_error)?;
    for record in records {
        writer.write_record(&record.values).map_err(write_error)?;
    }
    writer
        .flush()
        .map_err(|e| PayrollError::output(format!("cannot write {}: {}", path.display(), e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Totals;
    use std::io::Write;
    use tempfile::TempDir;

    fn sample_result() -> TransformResult {
        TransformResult {
            columns: vec![
                "First Name".to_string(),
                "Last Name".to_string(),
                "Pretax".to_string(),
                "Pre-Tax Catchup".to_string(),
                "Roth".to_string(),
                "Roth Catchup".to_string(),
                "Safe Harbor Non-Elective".to_string(),
                "Current Period Compensation".to_string(),
                "Current Period Hours Worked".to_string(),
            ],
            roster_columns: vec!["First Name".to_string(), "Last Name".to_string()],
            records: vec![OutputRecord {
                statics: vec!["Jane".to_string(), "Doe".to_string()],
                pretax: 150.0,
                pretax_catchup: 0.0,
                roth: 75.0,
                roth_catchup: 0.0,
                safe_harbor: 50.0,
                compensation: 2400.0,
                hours: 80.0,
            }],
            totals: Totals {
                hours: 80.0,
                checksum: 275.0,
            },
            dropped: 0,
            appended: 0,
            ambiguous: 0,
            unmatched_roster: vec![],
        }
    }

    #[test]
    fn test_write_all_produces_output_and_archive() {
        let dir = TempDir::new().unwrap();
        let raw_path = dir.path().join("in.csv");
        let mut file = std::fs::File::create(&raw_path).unwrap();
        file.write_all(b"raw,content\n1,2\n").unwrap();

        let dist = dir.path().join("dist");
        let archive = dir.path().join("archive");
        let outcome = write_all(&raw_path, &dist, &archive, &sample_result()).unwrap();

        assert_eq!(outcome.output_path, dist.join("in_normalized.csv"));
        let content = std::fs::read_to_string(&outcome.output_path).unwrap();
        assert!(content.starts_with("First Name,Last Name,Pretax"));
        assert!(content.contains("Jane,Doe,150.00,0.00,75.00,0.00,50.00,2400.00,80.00"));

        // Archive is a byte-for-byte copy with a timestamped name.
        assert!(outcome.archive_path.starts_with(&archive));
        let archived = std::fs::read(&outcome.archive_path).unwrap();
        assert_eq!(archived, b"raw,content\n1,2\n");

        assert!(outcome.unmatched_report.is_none());
        assert!(!dist.join("in_normalized.csv.tmp").exists());
    }

    #[test]
    fn test_write_all_emits_unmatched_report() {
        let dir = TempDir::new().unwrap();
        let raw_path = dir.path().join("in.csv");
        std::fs::write(&raw_path, "x\n").unwrap();

        let mut result = sample_result();
        result.unmatched_roster = vec![RosterRecord {
            first_name: "Zoe".to_string(),
            middle_initial: "".to_string(),
            last_name: "Nope".to_string(),
            values: vec!["Zoe".to_string(), "Nope".to_string()],
        }];

        let outcome = write_all(
            &raw_path,
            &dir.path().join("dist"),
            &dir.path().join("archive"),
            &result,
        )
        .unwrap();

        let report = outcome.unmatched_report.unwrap();
        let content = std::fs::read_to_string(report).unwrap();
        assert!(content.contains("Zoe"));
        assert!(content.contains("Nope"));
    }

    #[test]
    fn test_write_all_missing_raw_file_leaves_no_partial_output() {
        let dir = TempDir::new().unwrap();
        let dist = dir.path().join("dist");

        let err = write_all(
            &dir.path().join("gone.csv"),
            &dist,
            &dir.path().join("archive"),
            &sample_result(),
        )
        .unwrap_err();

        assert_eq!(err.exit_code(), 3);
        assert!(!dist.join("gone_normalized.csv").exists());
        assert!(!dist.join("gone_normalized.csv.tmp").exists());
    }
}
