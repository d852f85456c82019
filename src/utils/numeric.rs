use crate::utils::error::{PayrollError, Result};

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parse a currency or hours cell. Provider exports carry "$" prefixes,
/// thousands separators and stray whitespace; blank cells mean zero.
/// Non-numeric or negative values are rejected with the offending row and
/// column named.
pub fn parse_amount(row: usize, column: &str, cell: &str) -> Result<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    let cleaned = trimmed.trim_start_matches('$').replace(',', "");
    let value: f64 = cleaned.trim().parse().map_err(|_| PayrollError::Validation {
        row,
        column: column.to_string(),
        message: format!("'{}' is not a number", cell),
    })?;

    if !value.is_finite() {
        return Err(PayrollError::Validation {
            row,
            column: column.to_string(),
            message: format!("'{}' is not a number", cell),
        });
    }
    if value < 0.0 {
        return Err(PayrollError::Validation {
            row,
            column: column.to_string(),
            message: format!("negative value '{}'", cell),
        });
    }

    Ok(round2(value))
}
