use crate::domain::model::{ExtractResult, RunOutcome, Totals, TransformResult};
use crate::utils::error::Result;
use std::path::Path;

/// Explicit run configuration handed into each component; nothing reads
/// ambient process state.
pub trait ConfigProvider {
    fn raw_path(&self) -> &Path;
    fn template_path(&self) -> &Path;
    fn sheet(&self) -> Option<&str>;
    fn dist_dir(&self) -> &Path;
    fn archive_dir(&self) -> &Path;
    fn append_missing(&self) -> bool;
}

pub trait Pipeline {
    fn extract(&self) -> Result<ExtractResult>;
    fn transform(&self, data: ExtractResult) -> Result<TransformResult>;
    fn load(&self, result: TransformResult) -> Result<RunOutcome>;
}

/// Confirmation capability, injectable so tests can script the answer
/// instead of blocking on a real terminal.
pub trait Confirm {
    fn confirm(&self, rows: usize, totals: &Totals) -> Result<bool>;
}
