use crate::domain::model::{Roster, RosterRecord};
use crate::utils::error::{PayrollError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

pub const COL_FIRST: &str = "First Name";
pub const COL_MI: &str = "MI";
pub const COL_LAST: &str = "Last Name";

const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xls", "xlsb", "ods"];

/// Load the static roster template from a CSV file or a workbook sheet.
/// All columns beyond the identity triple are passed through verbatim.
pub fn load_roster(path: &Path, sheet: Option<&str>) -> Result<Roster> {
    if !path.exists() {
        return Err(PayrollError::load(format!(
            "roster template not found: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    let rows = if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
        read_workbook(path, sheet)?
    } else {
        read_csv(path)?
    };

    build_roster(rows, path)
}

fn read_csv(path: &Path) -> Result<Vec<Vec<String>>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        PayrollError::load(format!("cannot read roster {}: {}", path.display(), e))
    })?;
    let text = text.trim_start_matches('\u{feff}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }
    Ok(rows)
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook.sheet_names().first().cloned().ok_or_else(|| {
            PayrollError::load(format!("workbook {} has no sheets", path.display()))
        })?,
    };

    let range = workbook.worksheet_range(&sheet_name)?;
    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        other => other.to_string(),
    }
}

fn build_roster(rows: Vec<Vec<String>>, path: &Path) -> Result<Roster> {
    let mut iter = rows.into_iter();
    let header = iter
        .next()
        .filter(|cells| cells.iter().any(|cell| !cell.trim().is_empty()))
        .ok_or_else(|| PayrollError::load(format!("roster {} is empty", path.display())))?;

    let columns: Vec<String> = header.iter().map(|cell| cell.trim().to_string()).collect();

    let find = |name: &str| {
        columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    };
    let first_idx = find(COL_FIRST);
    let mi_idx = find(COL_MI);
    let last_idx = find(COL_LAST);

    let missing: Vec<&str> = [
        (COL_FIRST, first_idx),
        (COL_MI, mi_idx),
        (COL_LAST, last_idx),
    ]
    .iter()
    .filter(|(_, idx)| idx.is_none())
    .map(|(name, _)| *name)
    .collect();
    if !missing.is_empty() {
        return Err(PayrollError::load(format!(
            "roster {} is missing required columns: {}",
            path.display(),
            missing.join(", ")
        )));
    }
    let (first_idx, mi_idx, last_idx) =
        (first_idx.unwrap(), mi_idx.unwrap(), last_idx.unwrap());

    let mut records = Vec::new();
    for mut values in iter {
        if values.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        values.resize(columns.len(), String::new());
        let first_name = values[first_idx].trim().to_string();
        let middle_initial = values[mi_idx].trim().to_string();
        let last_name = values[last_idx].trim().to_string();
        records.push(RosterRecord {
            first_name,
            middle_initial,
            last_name,
            values,
        });
    }

    Ok(Roster { columns, records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_roster_csv() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "roster.csv",
            "SSN,First Name,MI,Last Name,City\n\
             111-22-3333,Jane,A,Doe,Springfield\n\
             222-33-4444,John,,Smith,Shelbyville\n",
        );

        let roster = load_roster(&path, None).unwrap();
        assert_eq!(
            roster.columns,
            vec!["SSN", "First Name", "MI", "Last Name", "City"]
        );
        assert_eq!(roster.records.len(), 2);
        assert_eq!(roster.records[0].first_name, "Jane");
        assert_eq!(roster.records[0].middle_initial, "A");
        assert_eq!(roster.records[1].middle_initial, "");
        assert_eq!(roster.records[1].values[4], "Shelbyville");
    }

    #[test]
    fn test_load_roster_tolerates_bom_and_blank_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "roster.csv",
            "\u{feff}First Name,MI,Last Name\nJane,A,Doe\n,,\n",
        );

        let roster = load_roster(&path, None).unwrap();
        assert_eq!(roster.columns[0], "First Name");
        assert_eq!(roster.records.len(), 1);
    }

    #[test]
    fn test_load_roster_missing_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "roster.csv", "First Name,Last Name\nJane,Doe\n");

        let err = load_roster(&path, None).unwrap_err();
        match err {
            PayrollError::Load { message } => assert!(message.contains("MI")),
            other => panic!("expected Load error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_roster_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_roster(&dir.path().join("nope.csv"), None).unwrap_err();
        assert!(matches!(err, PayrollError::Load { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_load_roster_short_rows_padded() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "roster.csv",
            "First Name,MI,Last Name,Email\nJane,A,Doe\n",
        );

        let roster = load_roster(&path, None).unwrap();
        assert_eq!(roster.records[0].values.len(), 4);
        assert_eq!(roster.records[0].values[3], "");
    }
}
