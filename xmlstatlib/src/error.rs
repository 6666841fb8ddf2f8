//! Error types for xmlstatlib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while analyzing a document or writing its layout
#[derive(Error, Debug)]
pub enum XmlstatError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document is not well-formed XML
    #[error("failed to parse XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Elements are nested deeper than the parser accepts
    #[error("document nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },

    /// The tree has no root element
    #[error("document has no root element")]
    MissingRoot,

    /// Threshold is negative or not an integer
    #[error("invalid threshold '{0}': expected a non-negative integer")]
    InvalidThreshold(String),

    /// Grid coordinates are 1-based; zero or out-of-range positions are rejected
    #[error("invalid grid position: row {row}, column {column}")]
    InvalidCell { row: u32, column: u32 },

    /// Spreadsheet write error
    #[error("XLSX write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
