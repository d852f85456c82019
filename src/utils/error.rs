use thiserror::Error;

#[derive(Error, Debug)]
pub enum PayrollError {
    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Load error: {message}")]
    Load { message: String },

    #[error("Validation error at row {row}, column '{column}': {message}")]
    Validation {
        row: usize,
        column: String,
        message: String,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Output error: {message}")]
    Output { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PayrollError {
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Process exit code: 2 for load/validation/config failures, 3 for
    /// output or archive I/O failures. Exit 1 (declined confirmation) is
    /// not an error and never reaches this mapping.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Csv(_)
            | Self::Spreadsheet(_)
            | Self::Load { .. }
            | Self::Validation { .. }
            | Self::Config { .. } => 2,
            Self::Output { .. } | Self::Io(_) => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, PayrollError>;
