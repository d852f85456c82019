pub mod confirm;
pub mod etl;
pub mod mapper;
pub mod matcher;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod roster;
pub mod verify;

pub use crate::domain::model::{ExtractResult, RunOutcome, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Confirm, Pipeline};
pub use crate::utils::error::Result;
