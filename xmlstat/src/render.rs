//! Template rendering for CLI output using outstanding

use console::{measure_text_width, Style};
use outstanding::{render_auto, render_with_output, Theme};
use serde::Serialize;
use xmlstatlib::{CellValue, LayoutOptions, MemoryGrid, StatsRegistry, StatsSummary};

/// Include template at compile time
const GRID_TEMPLATE: &str = include_str!("../templates/grid.jinja");

/// Re-export OutputMode for callers
pub use outstanding::OutputMode;

/// Gap between the two columns of a block
const CELL_GAP: &str = "  ";
/// Gap between blocks
const BLOCK_GAP: &str = "    ";

/// Data context for the grid template
#[derive(Debug, Serialize)]
struct GridContext {
    /// Source file name shown above the table
    title: String,
    /// Pre-padded header row
    header: String,
    /// Pre-padded body rows
    rows: Vec<String>,
}

/// Create the theme with styles
fn create_theme() -> Theme {
    Theme::new().add("header", Style::new().bold())
}

/// Lay `grid` out as aligned text lines.
///
/// Rows before `header_row` are skipped. Names are left-aligned and counts
/// right-aligned; each two-column block starting at `first_column` gets a
/// wider gap.
pub fn format_grid(grid: &MemoryGrid, header_row: u32, first_column: u32) -> Vec<String> {
    let max_row = grid.max_row();
    let max_column = grid.max_column();
    if grid.is_empty() || max_row < header_row || max_column < first_column {
        return Vec::new();
    }

    let widths: Vec<usize> = (first_column..=max_column)
        .map(|col| {
            grid.column(col)
                .iter()
                .map(|(_, value)| measure_text_width(&value.to_string()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    (header_row..=max_row)
        .map(|row| {
            let mut line = String::new();
            for (i, col) in (first_column..=max_column).enumerate() {
                if i > 0 {
                    line.push_str(if i % 2 == 0 { BLOCK_GAP } else { CELL_GAP });
                }
                let width = widths[i];
                match grid.get(row, col) {
                    Some(value @ CellValue::Count(_)) => {
                        line.push_str(&format!("{:>width$}", value, width = width))
                    }
                    Some(value) => line.push_str(&pad_right(&value.to_string(), width)),
                    None => line.push_str(&" ".repeat(width)),
                }
            }
            line.trim_end().to_string()
        })
        .collect()
}

/// Left-align by display width, so multi-byte names line up.
fn pad_right(text: &str, width: usize) -> String {
    let used = measure_text_width(text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(used)))
}

/// Render the layout grid under a `title` line using outstanding
pub fn render_table(
    title: &str,
    grid: &MemoryGrid,
    layout: &LayoutOptions,
    output_mode: OutputMode,
) -> Result<String, Box<dyn std::error::Error>> {
    let theme = create_theme();
    let mut lines = format_grid(grid, layout.start_row, layout.start_column).into_iter();

    let context = GridContext {
        title: title.to_string(),
        header: lines.next().unwrap_or_default(),
        rows: lines.collect(),
    };

    let rendered = render_with_output(GRID_TEMPLATE, &context, &theme, output_mode)?;
    Ok(rendered)
}

/// Render an analysis using outstanding's auto dispatch
pub fn render_report(
    title: &str,
    registry: &StatsRegistry,
    grid: &MemoryGrid,
    layout: &LayoutOptions,
    output_mode: OutputMode,
) -> Result<String, Box<dyn std::error::Error>> {
    // For JSON mode, use outstanding's render_auto for serialization
    if output_mode.is_structured() {
        let theme = create_theme();
        let summary = StatsSummary::from_registry(registry);
        return Ok(render_auto(GRID_TEMPLATE, &summary, &theme, output_mode)?);
    }

    render_table(title, grid, layout, output_mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmlstatlib::{analyze_str, write_layout, AnalyzeOptions, GridSink};

    fn sample_grid() -> MemoryGrid {
        let mut grid = MemoryGrid::new();
        grid.set_cell(1, 1, "Tag".into()).unwrap();
        grid.set_cell(1, 2, "Count".into()).unwrap();
        grid.set_cell(2, 1, "root".into()).unwrap();
        grid.set_cell(2, 2, 1u64.into()).unwrap();
        grid.set_cell(1, 3, "age".into()).unwrap();
        grid.set_cell(1, 4, "Count".into()).unwrap();
        grid.set_cell(2, 3, "12".into()).unwrap();
        grid.set_cell(2, 4, 10u64.into()).unwrap();
        grid
    }

    #[test]
    fn test_format_grid_alignment() {
        let lines = format_grid(&sample_grid(), 1, 1);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Tag   Count    age  Count");
        assert_eq!(lines[1], "root      1    12      10");
    }

    #[test]
    fn test_format_empty_grid() {
        assert!(format_grid(&MemoryGrid::new(), 1, 1).is_empty());
    }

    #[test]
    fn test_pad_right_multibyte() {
        assert_eq!(pad_right("é", 3), "é  ");
        assert_eq!(pad_right("long", 2), "long");
    }

    #[test]
    fn test_render_table_text_mode() {
        let output = render_table(
            "people.xml",
            &sample_grid(),
            &LayoutOptions::new(),
            OutputMode::Text,
        )
        .unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "people.xml:");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "Tag   Count    age  Count");
        assert_eq!(lines[3], "root      1    12      10");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_render_report_json() {
        let registry = analyze_str("<a><n>3</n><n>9</n></a>", AnalyzeOptions::new()).unwrap();
        let mut grid = MemoryGrid::new();
        let layout = LayoutOptions::new();
        write_layout(&registry, &mut grid, layout).unwrap();

        let output = render_report("a.xml", &registry, &grid, &layout, OutputMode::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["tags"][1]["name"], "n");
        assert_eq!(parsed["ranges"][0]["min"], 3);
        assert_eq!(parsed["ranges"][0]["max"], 9);
    }
}
