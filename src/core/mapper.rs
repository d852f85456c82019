use crate::core::report::{
    COL_GROSS, COL_OT_HOURS, COL_PRETAX, COL_PRETAX_CATCHUP, COL_PTO_HOURS, COL_REG_HOURS,
    COL_ROTH, COL_ROTH_CATCHUP, COL_SAFE_HARBOR,
};
use crate::domain::model::{OutputRecord, RawRecord};
use crate::utils::error::Result;
use crate::utils::numeric::{parse_amount, round2};

/// Compute the seven dynamic template fields for one raw row. Pure per-row
/// mapping; the caller supplies the static values (roster passthrough, or
/// blanks for appended rows).
pub fn map_fields(raw: &RawRecord, statics: Vec<String>) -> Result<OutputRecord> {
    let amount = |column: &str| parse_amount(raw.row, column, raw.value(column));

    let pretax = amount(COL_PRETAX)?;
    let pretax_catchup = amount(COL_PRETAX_CATCHUP)?;
    let roth = amount(COL_ROTH)?;
    let roth_catchup = amount(COL_ROTH_CATCHUP)?;
    let safe_harbor = amount(COL_SAFE_HARBOR)?;
    let compensation = amount(COL_GROSS)?;

    let regular = amount(COL_REG_HOURS)?;
    let overtime = amount(COL_OT_HOURS)?;
    let vacation = amount(COL_PTO_HOURS)?;

    Ok(OutputRecord {
        statics,
        pretax,
        pretax_catchup,
        roth,
        roth_catchup,
        safe_harbor,
        compensation,
        hours: round2(regular + overtime + vacation),
    })
}
