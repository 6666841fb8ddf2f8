//! Input options for analysis and layout.
//!
//! This module contains all configuration types that control what the
//! library aggregates and how the aggregated statistics are laid out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::XmlstatError;
use crate::Result;

/// Options for aggregating a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeOptions {
    /// Treat every attribute as a synthetic `element.attribute` tag
    pub attributes: bool,
}

impl AnalyzeOptions {
    /// Create new default options (attributes are not aggregated).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set attribute aggregation
    pub fn with_attributes(mut self, include: bool) -> Self {
        self.attributes = include;
        self
    }
}

/// Minimum group size for a layout block to be listed in full.
///
/// Blocks with fewer entries than the threshold collapse to a single
/// truncation marker. A threshold of zero lists everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Threshold(usize);

impl Threshold {
    /// Validate a signed threshold supplied by a caller.
    pub fn new(value: i64) -> Result<Self> {
        usize::try_from(value)
            .map(Threshold)
            .map_err(|_| XmlstatError::InvalidThreshold(value.to_string()))
    }

    /// The raw threshold value
    pub fn get(self) -> usize {
        self.0
    }

    /// True when a group of `len` entries is too small to be listed.
    pub fn truncates(self, len: usize) -> bool {
        len < self.0
    }
}

impl From<usize> for Threshold {
    fn from(value: usize) -> Self {
        Threshold(value)
    }
}

impl FromStr for Threshold {
    type Err = XmlstatError;

    fn from_str(s: &str) -> Result<Self> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| XmlstatError::InvalidThreshold(s.to_string()))?;
        Threshold::new(value)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Options for writing the table layout.
///
/// Rows and columns are 1-based, matching spreadsheet addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Minimum group size to display in full
    pub threshold: Threshold,
    /// Row every block starts on
    pub start_row: u32,
    /// Column of the first block
    pub start_column: u32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            threshold: Threshold::default(),
            start_row: 1,
            start_column: 1,
        }
    }
}

impl LayoutOptions {
    /// Create new default options (threshold 0, starting at row 1, column 1).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display threshold.
    pub fn threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the row each block starts on.
    pub fn start_row(mut self, row: u32) -> Self {
        self.start_row = row;
        self
    }

    /// Set the column of the first block.
    pub fn start_column(mut self, column: u32) -> Self {
        self.start_column = column;
        self
    }
}
