use thiserror::Error;

/// Every failure an analysis request can report.
///
/// Component errors are converted into one of these variants before they reach the
/// HTTP boundary, which maps each one to a status code.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Unable to read file: {0}")]
    ParseError(String),

    #[error("{0}")]
    InsufficientColumns(String),

    #[error("Uploaded file contains no data rows.")]
    EmptyTable,

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Invalid agent '{0}'. Expected one of: standard, plus, premium.")]
    InvalidTier(String),

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("No file was uploaded. Send the spreadsheet in a 'file' form field.")]
    MissingFile,

    #[error("Uploaded file exceeds the {limit} byte limit.")]
    UploadTooLarge { limit: usize },

    #[error("File processing failed: {0}")]
    ProcessingFailure(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::ProcessingFailure(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
