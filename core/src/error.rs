use crate::types::CampaignId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdSalesError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Dataset is missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("Malformed row at line {line}: {message}")]
    MalformedRow { line: u64, message: String },

    #[error("Column '{column}' out of range for campaign {campaign_id}: {value}")]
    OutOfRange {
        column: &'static str,
        campaign_id: CampaignId,
        value: String,
    },

    #[error("Dataset contains no rows")]
    EmptyTable,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Chart '{chart}' failed: {message}")]
    Chart { chart: &'static str, message: String },
}

pub type AdSalesResult<T> = Result<T, AdSalesError>;
