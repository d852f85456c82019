use crate::domain::model::{OutputRecord, Totals};
use crate::utils::numeric::round2;

/// Aggregate totals presented to the operator before anything is written:
/// total hours worked and the contribution checksum.
pub fn totals(records: &[OutputRecord]) -> Totals {
    let hours: f64 = records.iter().map(|record| record.hours).sum();
    let checksum: f64 = records
        .iter()
        .map(OutputRecord::contribution_total)
        .sum();
    Totals {
        hours: round2(hours),
        checksum: round2(checksum),
    }
}
