pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{CliConfig, RunConfig};
pub use core::{etl::EtlEngine, pipeline::UploadPipeline};
pub use domain::model::{RunOutcome, RunSummary, Totals};
pub use utils::error::{PayrollError, Result};
