pub mod file_config;

use crate::config::file_config::FileConfig;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_file_extension, validate_non_empty_path, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_TEMPLATE: &str = "templates/roster.csv";
const DEFAULT_DIST_DIR: &str = "dist";
const DEFAULT_ARCHIVE_DIR: &str = "data/archive";

const TEMPLATE_EXTENSIONS: [&str; 5] = ["csv", "xlsx", "xls", "xlsb", "ods"];

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "payroll-fill")]
#[command(about = "Normalize a payroll CSV export into the retirement-account upload template")]
pub struct CliConfig {
    /// Raw payroll CSV; prompted for interactively when omitted
    pub raw: Option<PathBuf>,

    /// Roster template, CSV or workbook (xlsx/xls/xlsb/ods)
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Sheet name when the template is a workbook
    #[arg(long)]
    pub sheet: Option<String>,

    /// Append unmatched employees to the output with blank static fields
    #[arg(long)]
    pub append_missing: bool,

    /// Directory for the normalized output CSV
    #[arg(long)]
    pub dist_dir: Option<PathBuf>,

    /// Directory the raw input is archived into
    #[arg(long)]
    pub archive_dir: Option<PathBuf>,

    /// Optional TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliConfig {
    /// Merge CLI flags over config-file values over built-in defaults.
    /// `raw` must already be resolved (interactively when absent from argv).
    pub fn resolve(&self, raw: PathBuf) -> Result<RunConfig> {
        let file = match &self.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };

        Ok(RunConfig {
            raw,
            template: self
                .template
                .clone()
                .or(file.template.path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE)),
            sheet: self.sheet.clone().or(file.template.sheet),
            dist_dir: self
                .dist_dir
                .clone()
                .or(file.output.dist_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR)),
            archive_dir: self
                .archive_dir
                .clone()
                .or(file.output.archive_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARCHIVE_DIR)),
            append_missing: self.append_missing || file.matching.append_missing.unwrap_or(false),
        })
    }
}

/// Fully-resolved run configuration handed to the pipeline. Components read
/// this struct, never ambient process state.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub raw: PathBuf,
    pub template: PathBuf,
    pub sheet: Option<String>,
    pub dist_dir: PathBuf,
    pub archive_dir: PathBuf,
    pub append_missing: bool,
}

impl ConfigProvider for RunConfig {
    fn raw_path(&self) -> &Path {
        &self.raw
    }

    fn template_path(&self) -> &Path {
        &self.template
    }

    fn sheet(&self) -> Option<&str> {
        self.sheet.as_deref()
    }

    fn dist_dir(&self) -> &Path {
        &self.dist_dir
    }

    fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    fn append_missing(&self) -> bool {
        self.append_missing
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_path("raw", &self.raw)?;
        validate_non_empty_path("template", &self.template)?;
        validate_non_empty_path("dist_dir", &self.dist_dir)?;
        validate_non_empty_path("archive_dir", &self.archive_dir)?;
        validate_file_extension("template", &self.template, &TEMPLATE_EXTENSIONS)?;
        Ok(())
    }
}
