use thiserror::Error;

use crate::store::PermissionError;

#[derive(Error, Debug)]
pub enum PickemError {
    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("League file error: {0}")]
    League(String),

    #[error("Permission denied: {0}")]
    Permission(#[from] PermissionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel write error: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),

    #[error("Spreadsheet read error: {0}")]
    Workbook(#[from] calamine::Error),
}

pub type Result<T> = std::result::Result<T, PickemError>;
