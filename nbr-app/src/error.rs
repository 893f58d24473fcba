use nbr_core::IndexError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Configuration Error: {0}")]
    Figment(#[from] figment::Error),

    #[error("Index Error: {0}")]
    Index(#[from] IndexError),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output Error: {0}")]
    Output(String),
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        Self::Output(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output(err.to_string())
    }
}
