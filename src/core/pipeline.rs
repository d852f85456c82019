use crate::core::matcher::{MatchPolicy, RosterIndex};
use crate::core::{mapper, output, report, roster, verify};
use crate::domain::model::{
    ExtractResult, NameKey, OutputRecord, RunOutcome, RunSummary, TransformResult,
    DYNAMIC_COLUMNS,
};
use crate::domain::ports::{ConfigProvider, Confirm, Pipeline};
use crate::utils::error::Result;

/// One-shot normalization pipeline: roster + raw report in, confirmed
/// upload CSV out.
pub struct UploadPipeline<C: ConfigProvider, F: Confirm> {
    config: C,
    confirm: F,
    policy: MatchPolicy,
}

impl<C: ConfigProvider, F: Confirm> UploadPipeline<C, F> {
    pub fn new(config: C, confirm: F) -> Self {
        Self {
            config,
            confirm,
            policy: MatchPolicy::standard(),
        }
    }
}

impl<C: ConfigProvider, F: Confirm> Pipeline for UploadPipeline<C, F> {
    fn extract(&self) -> Result<ExtractResult> {
        let roster = roster::load_roster(self.config.template_path(), self.config.sheet())?;
        tracing::info!(
            "Loaded {} roster employees from {}",
            roster.records.len(),
            self.config.template_path().display()
        );

        let raw = report::load_report(self.config.raw_path())?;
        tracing::info!(
            "Loaded {} pay rows from {}",
            raw.len(),
            self.config.raw_path().display()
        );

        Ok(ExtractResult { roster, raw })
    }

    fn transform(&self, data: ExtractResult) -> Result<TransformResult> {
        let ExtractResult { roster, raw } = data;
        let index = RosterIndex::build(&roster);

        let mut matched: Vec<(usize, usize, OutputRecord)> = Vec::new();
        let mut appended: Vec<OutputRecord> = Vec::new();
        let mut matched_roster = vec![false; roster.records.len()];
        let mut dropped = 0;
        let mut ambiguous = 0;

        for (order, record) in raw.into_iter().enumerate() {
            let key = NameKey::new(
                &record.first_name,
                record.middle_initial.as_deref().unwrap_or(""),
                &record.last_name,
            );

            match self.policy.resolve(&key, &index) {
                Some(resolution) => {
                    if resolution.ambiguous {
                        ambiguous += 1;
                        tracing::warn!(
                            row = record.row,
                            "ambiguous loose match for '{} {}'; first roster entry wins",
                            record.first_name,
                            record.last_name
                        );
                    }
                    matched_roster[resolution.roster_index] = true;
                    let statics = roster.records[resolution.roster_index].values.clone();
                    matched.push((
                        resolution.roster_index,
                        order,
                        mapper::map_fields(&record, statics)?,
                    ));
                }
                None if self.config.append_missing() => {
                    let blanks = vec![String::new(); roster.columns.len()];
                    appended.push(mapper::map_fields(&record, blanks)?);
                }
                None => {
                    dropped += 1;
                    tracing::warn!(
                        row = record.row,
                        "no roster match for '{} {}'; row dropped",
                        record.first_name,
                        record.last_name
                    );
                }
            }
        }

        // Output follows roster order; appended rows keep raw-file order
        // at the end.
        matched.sort_by_key(|(roster_index, order, _)| (*roster_index, *order));
        let appended_count = appended.len();
        let mut records: Vec<OutputRecord> =
            matched.into_iter().map(|(_, _, record)| record).collect();
        records.extend(appended);

        let totals = verify::totals(&records);

        let unmatched_roster = roster
            .records
            .iter()
            .zip(&matched_roster)
            .filter(|(_, was_matched)| !**was_matched)
            .map(|(record, _)| record.clone())
            .collect();

        let mut columns = roster.columns.clone();
        columns.extend(DYNAMIC_COLUMNS.iter().map(|name| name.to_string()));

        Ok(TransformResult {
            columns,
            roster_columns: roster.columns,
            records,
            totals,
            dropped,
            appended: appended_count,
            ambiguous,
            unmatched_roster,
        })
    }

    fn load(&self, result: TransformResult) -> Result<RunOutcome> {
        if !self.confirm.confirm(result.records.len(), &result.totals)? {
            tracing::info!("Run cancelled at confirmation; nothing written");
            return Ok(RunOutcome::Cancelled);
        }

        let outcome = output::write_all(
            self.config.raw_path(),
            self.config.dist_dir(),
            self.config.archive_dir(),
            &result,
        )?;

        Ok(RunOutcome::Completed(RunSummary {
            output_path: outcome.output_path,
            archive_path: outcome.archive_path,
            unmatched_report: outcome.unmatched_report,
            rows_written: result.records.len(),
            dropped: result.dropped,
            ambiguous: result.ambiguous,
            totals: result.totals,
        }))
    }
}
