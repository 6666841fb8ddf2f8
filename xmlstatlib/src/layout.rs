//! Paged two-column table layout.
//!
//! The registry is written as a row of blocks. Every block occupies one
//! two-column band: names on the left, counts (or ranges) on the right. Each
//! block starts on the start row with a header, then one row per entry, and
//! the next block starts two columns further right.
//!
//! Blocks, in order:
//!
//! 1. Empty tags: `Tag | Count`, one row per tag without values.
//! 2. One block per tag with values: `<tag> | Count`, one row per value.
//! 3. Ranges: `Tag | Range`, one `min – max` row per tag whose numbers span
//!    more than one distinct value. Only tags whose occurrence count reaches
//!    the threshold take part.
//!
//! A block in (1) or (2) with fewer entries than the threshold is collapsed
//! to a single [`TRUNCATED_MARKER`] row.

use log::debug;

use crate::error::XmlstatError;
use crate::grid::{CellValue, GridSink};
use crate::options::{LayoutOptions, Threshold};
use crate::stats::{NumberRange, StatsRegistry};
use crate::Result;

/// Row written in place of a block's entries when it falls below the threshold
pub const TRUNCATED_MARKER: &str = "List Truncated...";

/// Writes a registry into a [`GridSink`] as paged two-column blocks.
pub struct TableLayoutWriter<'s, S: GridSink> {
    sink: &'s mut S,
    options: LayoutOptions,
    /// Column of the next block; `None` once the grid has run out of columns
    column: Option<u32>,
    blocks: usize,
}

impl<'s, S: GridSink> TableLayoutWriter<'s, S> {
    /// Create a writer for `sink`.
    pub fn new(sink: &'s mut S, options: LayoutOptions) -> Self {
        Self {
            sink,
            options,
            column: Some(options.start_column),
            blocks: 0,
        }
    }

    /// Write every block for `registry`, returning the number of blocks written.
    pub fn write(mut self, registry: &StatsRegistry) -> Result<usize> {
        let threshold = self.options.threshold;

        let empty: Vec<(CellValue, CellValue)> = registry
            .empty_tags()
            .map(|t| (CellValue::text(t.name.as_str()), CellValue::count(t.count)))
            .collect();
        // An empty block has nothing to truncate.
        let truncated = !empty.is_empty() && threshold.truncates(empty.len());
        self.write_block(("Tag", "Count"), &empty, truncated)?;

        for tag in registry.value_tags() {
            let rows: Vec<(CellValue, CellValue)> = tag
                .values()
                .iter()
                .map(|v| (CellValue::text(v.name.as_str()), CellValue::count(v.count)))
                .collect();
            let truncated = threshold.truncates(rows.len());
            self.write_block((tag.name.as_str(), "Count"), &rows, truncated)?;
        }

        let qualifying: Vec<&NumberRange> = registry
            .ranges()
            .iter()
            .filter(|range| {
                registry
                    .tag_by_id(range.tag)
                    .is_some_and(|tag| reaches(tag.count, threshold))
            })
            .collect();
        if !qualifying.is_empty() {
            let rows: Vec<(CellValue, CellValue)> = qualifying
                .into_iter()
                .filter(|range| range.is_displayable())
                .filter_map(|range| {
                    let tag = registry.tag_by_id(range.tag)?;
                    let (min, max) = (range.min()?, range.max()?);
                    Some((
                        CellValue::text(tag.name.as_str()),
                        CellValue::text(format_range(min, max)),
                    ))
                })
                .collect();
            self.write_block(("Tag", "Range"), &rows, false)?;
        }

        debug!("layout wrote {} blocks", self.blocks);
        Ok(self.blocks)
    }

    fn write_block(
        &mut self,
        header: (&str, &str),
        rows: &[(CellValue, CellValue)],
        truncated: bool,
    ) -> Result<()> {
        let mut row = self.options.start_row;
        let column = self.column.ok_or(XmlstatError::InvalidCell {
            row,
            column: u32::MAX,
        })?;
        let count_column = right_of(row, column)?;

        self.sink.set_cell(row, column, CellValue::text(header.0))?;
        self.sink.set_cell(row, count_column, CellValue::text(header.1))?;

        if truncated {
            debug!("truncating '{}' block of {} entries", header.0, rows.len());
            row = below(row, column)?;
            self.sink.set_cell(row, column, CellValue::text(TRUNCATED_MARKER))?;
        } else {
            for (name, value) in rows {
                row = below(row, column)?;
                self.sink.set_cell(row, column, name.clone())?;
                self.sink.set_cell(row, count_column, value.clone())?;
            }
        }

        self.column = column.checked_add(2);
        self.blocks += 1;
        Ok(())
    }
}

fn below(row: u32, column: u32) -> Result<u32> {
    row.checked_add(1).ok_or(XmlstatError::InvalidCell { row, column })
}

fn right_of(row: u32, column: u32) -> Result<u32> {
    column.checked_add(1).ok_or(XmlstatError::InvalidCell { row, column })
}

/// Write `registry` into `sink` with the given layout options.
pub fn write_layout<S: GridSink>(
    registry: &StatsRegistry,
    sink: &mut S,
    options: LayoutOptions,
) -> Result<usize> {
    TableLayoutWriter::new(sink, options).write(registry)
}

fn reaches(count: u64, threshold: Threshold) -> bool {
    count >= threshold.get() as u64
}

/// Format a numeric range as `min – max` (en dash).
pub fn format_range(min: i64, max: i64) -> String {
    format!("{} \u{2013} {}", min, max)
}
