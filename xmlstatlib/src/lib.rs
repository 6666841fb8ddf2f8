//! # xmlstatlib
//!
//! Statistics over the elements of an XML document, laid out as a paged
//! two-column table.
//!
//! ## Overview
//!
//! A document is walked once, in document order, and every element updates a
//! [`StatsRegistry`]:
//!
//! - **Tags**: how often each element name occurs
//! - **Values**: for leaf elements holding text, how often each distinct
//!   (whitespace-normalized) text occurs under that tag
//! - **Ranges**: for text that parses as an integer, every number seen per
//!   tag, so the minimum and maximum can be reported
//!
//! The registry is then written to a [`GridSink`] by [`write_layout`]: one
//! two-column block for tags without values, one block per tag with values,
//! and a final block of numeric ranges. Blocks smaller than the threshold
//! collapse to a `List Truncated...` marker.
//!
//! ## Features
//!
//! - **Generic tree source**: anything implementing [`TreeNode`] can be
//!   aggregated; `roxmltree` nodes are supported out of the box
//! - **No recursion**: the walk uses an explicit stack
//! - **Optional attribute statistics**: attributes become `element.attribute` tags
//! - **Console or spreadsheet output**: [`MemoryGrid`] and [`XlsxSink`]
//!
//! ## Example
//!
//! ```rust
//! use xmlstatlib::{analyze_str, write_layout, AnalyzeOptions, LayoutOptions, MemoryGrid, Threshold};
//!
//! let xml = "<root><age>5</age><age>12</age><name>Al</name><name>Al</name><empty/></root>";
//! let registry = analyze_str(xml, AnalyzeOptions::new()).unwrap();
//! assert_eq!(registry.tag("age").unwrap().count, 2);
//! assert_eq!(registry.tag("name").unwrap().value("Al").unwrap().count, 2);
//!
//! let mut grid = MemoryGrid::new();
//! let options = LayoutOptions::new().threshold(Threshold::new(1).unwrap());
//! write_layout(&registry, &mut grid, options).unwrap();
//! assert_eq!(grid.text(1, 1), Some("Tag"));
//! ```

pub mod aggregator;
pub mod analyzer;
pub mod error;
pub mod grid;
pub mod layout;
pub mod options;
pub mod stats;
pub mod summary;
pub mod tree;

pub use aggregator::{aggregate, Aggregator};
pub use analyzer::{analyze_document, analyze_file, analyze_str, MAX_NESTING_DEPTH};
pub use error::XmlstatError;
pub use grid::{save_xlsx, CellValue, GridSink, MemoryGrid, XlsxSink, SHEET_NAME};
pub use layout::{format_range, write_layout, TableLayoutWriter, TRUNCATED_MARKER};
pub use options::{AnalyzeOptions, LayoutOptions, Threshold};
pub use stats::{normalize_text, parse_integer, NumberRange, StatsRegistry, Tag, TagId, Value};
pub use summary::{RangeSummary, StatsSummary, TagSummary, ValueSummary};
pub use tree::{NodeKind, TreeNode};

/// Result type for xmlstatlib operations
pub type Result<T> = std::result::Result<T, XmlstatError>;
