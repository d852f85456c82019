use crate::domain::model::{norm, RawRecord};
use crate::utils::error::{PayrollError, Result};
use std::collections::{HashMap, HashSet};
use std::path::Path;

// Canonical raw-report column names. Provider exports use several header
// variants; everything is renamed to these before any lookup.
pub const COL_RAW_FIRST: &str = "Employee First Name";
pub const COL_RAW_LAST: &str = "Employee Last Name";
pub const COL_PRETAX: &str = "401k";
pub const COL_PRETAX_CATCHUP: &str = "401k Catchup";
pub const COL_ROTH: &str = "Roth 401K";
pub const COL_ROTH_CATCHUP: &str = "Roth Catchup";
pub const COL_SAFE_HARBOR: &str = "401K Match 2";
pub const COL_GROSS: &str = "Gross Pay";
pub const COL_REG_HOURS: &str = "Regular Hours";
pub const COL_OT_HOURS: &str = "Overtime Hours";
pub const COL_PTO_HOURS: &str = "Vacation/PTO Hours";
pub const COL_PAY_DATE: &str = "Pay Date";

const EXPECTED: [&str; 12] = [
    COL_RAW_LAST,
    COL_RAW_FIRST,
    COL_PRETAX,
    COL_PRETAX_CATCHUP,
    COL_ROTH,
    COL_ROTH_CATCHUP,
    COL_SAFE_HARBOR,
    COL_GROSS,
    COL_REG_HOURS,
    COL_OT_HOURS,
    COL_PTO_HOURS,
    COL_PAY_DATE,
];

const REQUIRED: [&str; 9] = [
    COL_RAW_FIRST,
    COL_RAW_LAST,
    COL_PRETAX,
    COL_ROTH,
    COL_SAFE_HARBOR,
    COL_GROSS,
    COL_REG_HOURS,
    COL_OT_HOURS,
    COL_PTO_HOURS,
];

const ALIASES: &[(&str, &[&str])] = &[
    (COL_ROTH, &["Roth 401k", "Roth401k", "Roth-401k"]),
    (COL_PRETAX, &["401(k)", "401 k", "Pre tax 401k", "Pre-tax 401k"]),
    (
        COL_SAFE_HARBOR,
        &[
            "401k Match2",
            "401K Match2",
            "Safe Harbor Non Elective",
            "Safe Harbor",
        ],
    ),
    (COL_GROSS, &["Gross", "Gross Wages", "Current Period Compensation"]),
    (COL_REG_HOURS, &["Reg Hours", "Regular", "Base Hours"]),
    (COL_OT_HOURS, &["OT Hours", "Overtime"]),
    (
        COL_PTO_HOURS,
        &["PTO Hours", "Vacation Hours", "Paid Time Off", "Leave Hours"],
    ),
    (COL_RAW_FIRST, &["Emp First Name", "Employee First", "First"]),
    (COL_RAW_LAST, &["Emp Last Name", "Employee Last", "Last"]),
    (
        COL_PRETAX_CATCHUP,
        &["401(k) Catchup", "Pre-tax Catchup", "Pre tax Catchup"],
    ),
    (COL_ROTH_CATCHUP, &["Roth 401k Catchup", "Roth 401K Catchup"]),
    (COL_PAY_DATE, &["Paydate", "Pay Dt", "Check Date"]),
];

/// Map a header cell to its canonical column name, if it is one we know.
fn canonical_for(cell: &str) -> Option<&'static str> {
    let cell_norm = norm(cell);
    if cell_norm.is_empty() {
        return None;
    }
    for name in EXPECTED {
        if norm(name) == cell_norm {
            return Some(name);
        }
    }
    for &(canonical, variants) in ALIASES {
        if variants.iter().any(|variant| norm(variant) == cell_norm) {
            return Some(canonical);
        }
    }
    None
}

const SNIFF_LINES: usize = 200;
const DELIMITERS: [char; 3] = [',', ';', '\t'];

/// Locate the header row and delimiter. Provider exports often carry
/// preamble junk (report titles, date ranges, blank lines) before the
/// actual table, so every candidate line is scored by how many expected
/// header tokens it contains and how many distinct cells it has.
fn detect_header(text: &str) -> Result<(usize, char)> {
    let mut best: Option<(usize, usize, usize, char)> = None;

    for &delimiter in &DELIMITERS {
        for (i, line) in text.lines().take(SNIFF_LINES).enumerate() {
            let cells: Vec<&str> = line
                .split(delimiter)
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .collect();
            let hits = cells
                .iter()
                .filter(|cell| canonical_for(cell).is_some())
                .count();
            let diversity = cells.iter().map(|cell| norm(cell)).collect::<HashSet<_>>().len();

            let better = match best {
                None => true,
                Some((best_hits, best_div, _, _)) => (hits, diversity) > (best_hits, best_div),
            };
            if better {
                best = Some((hits, diversity, i, delimiter));
            }
        }
    }

    match best {
        Some((hits, _, index, delimiter)) if hits > 0 => Ok((index, delimiter)),
        _ => text
            .lines()
            .position(|line| line.split(',').any(|cell| !cell.trim().is_empty()))
            .map(|index| (index, ','))
            .ok_or_else(|| PayrollError::load("could not detect a header row")),
    }
}

/// First whitespace token is the first name; a trailing single-letter token
/// (optional period) is a middle initial. Anything longer stays part of a
/// compound first name ("Mary Ann").
pub fn split_first_name(raw: &str) -> (String, Option<String>) {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.len() < 2 {
        return (tokens.first().copied().unwrap_or("").to_string(), None);
    }

    let candidate = tokens[tokens.len() - 1].trim_end_matches('.');
    if candidate.chars().count() == 1 && candidate.chars().all(char::is_alphabetic) {
        (
            tokens[..tokens.len() - 1].join(" "),
            Some(candidate.to_string()),
        )
    } else {
        (tokens.join(" "), None)
    }
}

/// Load the provider's raw CSV into ordered records with canonical column
/// names. Numeric cells stay unparsed; the field mapper validates them.
pub fn load_report(path: &Path) -> Result<Vec<RawRecord>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        PayrollError::load(format!("cannot read raw report {}: {}", path.display(), e))
    })?;
    let text = text.trim_start_matches('\u{feff}');

    let (header_index, delimiter) = detect_header(text)?;
    if header_index > 0 {
        tracing::debug!(line = header_index, "header row found past preamble");
    }

    let body = text
        .lines()
        .skip(header_index)
        .collect::<Vec<_>>()
        .join("\n");
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .from_reader(body.as_bytes());

    // Canonical name per source column; empty-named columns are dropped.
    let columns: Vec<Option<String>> = reader
        .headers()?
        .iter()
        .map(|cell| {
            let trimmed = cell.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(
                    canonical_for(trimmed)
                        .map(str::to_string)
                        .unwrap_or_else(|| trimmed.to_string()),
                )
            }
        })
        .collect();

    let present: HashSet<&str> = columns.iter().flatten().map(String::as_str).collect();
    let missing: Vec<&str> = REQUIRED
        .iter()
        .copied()
        .filter(|column| !present.contains(column))
        .collect();
    if !missing.is_empty() {
        return Err(PayrollError::load(format!(
            "raw report {} is missing required columns: {}",
            path.display(),
            missing.join(", ")
        )));
    }

    let mut records = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let mut values: HashMap<String, String> = HashMap::new();
        for (index, cell) in record.iter().enumerate() {
            if let Some(Some(name)) = columns.get(index) {
                values
                    .entry(name.clone())
                    .or_insert_with(|| cell.trim().to_string());
            }
        }

        let (first_name, middle_initial) =
            split_first_name(values.get(COL_RAW_FIRST).map(String::as_str).unwrap_or(""));
        let last_name = values.get(COL_RAW_LAST).cloned().unwrap_or_default();

        records.push(RawRecord {
            row: i + 1,
            first_name,
            middle_initial,
            last_name,
            values,
        });
    }

    Ok(records)
}
