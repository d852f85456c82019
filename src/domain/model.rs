use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Dynamic upload-template columns, appended after the roster's static
/// columns in this exact order.
pub const DYNAMIC_COLUMNS: [&str; 7] = [
    "Pretax",
    "Pre-Tax Catchup",
    "Roth",
    "Roth Catchup",
    "Safe Harbor Non-Elective",
    "Current Period Compensation",
    "Current Period Hours Worked",
];

/// Static employee reference list loaded from the upload template.
#[derive(Debug, Clone)]
pub struct Roster {
    /// Column headers in template order, preserved verbatim into output.
    pub columns: Vec<String>,
    pub records: Vec<RosterRecord>,
}

#[derive(Debug, Clone)]
pub struct RosterRecord {
    pub first_name: String,
    /// May be empty; disambiguates employees sharing first and last name.
    pub middle_initial: String,
    pub last_name: String,
    /// Cell values aligned with `Roster::columns`.
    pub values: Vec<String>,
}

/// One data row from the provider's raw CSV export.
#[derive(Debug, Clone)]
pub struct RawRecord {
    /// 1-based data row in the source file, for diagnostics.
    pub row: usize,
    pub first_name: String,
    pub middle_initial: Option<String>,
    pub last_name: String,
    /// Cell values keyed by canonical column name. Numeric fields stay as
    /// strings here; the field mapper parses and validates them.
    pub values: HashMap<String, String>,
}

impl RawRecord {
    pub fn value(&self, column: &str) -> &str {
        self.values.get(column).map(String::as_str).unwrap_or("")
    }
}

/// Normalized identity key: lowercased, non-alphanumerics stripped, name
/// suffixes (Jr/Sr/II/III/IV) dropped from the last name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameKey {
    pub first: String,
    pub mi: String,
    pub last: String,
}

const NAME_SUFFIXES: [&str; 5] = ["jr", "sr", "ii", "iii", "iv"];

impl NameKey {
    pub fn new(first: &str, mi: &str, last: &str) -> Self {
        Self {
            first: norm(first),
            mi: norm(mi),
            last: norm(&strip_suffix(last)),
        }
    }

    /// The same key with the middle initial erased.
    pub fn loose(&self) -> Self {
        Self {
            first: self.first.clone(),
            mi: String::new(),
            last: self.last.clone(),
        }
    }
}

static NORM_RE: OnceLock<Regex> = OnceLock::new();

/// Lowercase and strip everything outside [0-9a-z].
pub fn norm(s: &str) -> String {
    let re = NORM_RE.get_or_init(|| Regex::new(r"[^0-9a-z]+").unwrap());
    re.replace_all(&s.to_lowercase(), "").to_string()
}

fn strip_suffix(last: &str) -> String {
    let kept: Vec<&str> = last
        .split_whitespace()
        .filter(|token| !NAME_SUFFIXES.contains(&norm(token).as_str()))
        .collect();
    if kept.is_empty() {
        last.to_string()
    } else {
        kept.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Strict,
    Loose,
}

/// One row of the normalized upload file.
#[derive(Debug, Clone)]
pub struct OutputRecord {
    /// Static template values in roster column order; all blank for rows
    /// appended under --append-missing.
    pub statics: Vec<String>,
    pub pretax: f64,
    pub pretax_catchup: f64,
    pub roth: f64,
    pub roth_catchup: f64,
    pub safe_harbor: f64,
    pub compensation: f64,
    pub hours: f64,
}

impl OutputRecord {
    /// Sum of the five contribution columns, the unit of the run checksum.
    pub fn contribution_total(&self) -> f64 {
        self.pretax + self.pretax_catchup + self.roth + self.roth_catchup + self.safe_harbor
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub hours: f64,
    pub checksum: f64,
}

#[derive(Debug, Clone)]
pub struct ExtractResult {
    pub roster: Roster,
    pub raw: Vec<RawRecord>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    /// Full output header: roster columns then `DYNAMIC_COLUMNS`.
    pub columns: Vec<String>,
    /// Roster header alone, for the unmatched report.
    pub roster_columns: Vec<String>,
    /// Matched rows in (roster order, raw order), appended rows suffixed
    /// in raw-file order.
    pub records: Vec<OutputRecord>,
    pub totals: Totals,
    pub dropped: usize,
    pub appended: usize,
    pub ambiguous: usize,
    pub unmatched_roster: Vec<RosterRecord>,
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(RunSummary),
    /// Operator declined the confirmation prompt; nothing was written.
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub archive_path: PathBuf,
    pub unmatched_report: Option<PathBuf>,
    pub rows_written: usize,
    pub dropped: usize,
    pub ambiguous: usize,
    pub totals: Totals,
}
