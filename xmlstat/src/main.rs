//! # xmlstat
//!
//! A CLI tool summarizing how often XML tags and values occur.
//!
//! ## Overview
//!
//! xmlstat is built on top of xmlstatlib. It reads an XML file, counts every
//! element name, every distinct text value per element and the numeric range
//! of integer values, then prints the result as a paged table: one two-column
//! block for tags without values, one block per tag with values, and one
//! block of ranges.
//!
//! ## Usage
//!
//! ```bash
//! # Summarize a file
//! xmlstat people.xml
//!
//! # Collapse groups with fewer than 3 entries
//! xmlstat people.xml --threshold 3
//!
//! # Count attributes as element.attribute tags
//! xmlstat people.xml --attributes
//!
//! # Also write the table to a spreadsheet
//! xmlstat people.xml --xlsx people.xlsx
//!
//! # Output the raw statistics as JSON
//! xmlstat people.xml --output json
//! ```

mod render;

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use anyhow::anyhow;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{debug, LevelFilter};
use xmlstatlib::{
    analyze_file, save_xlsx, write_layout, AnalyzeOptions, LayoutOptions, MemoryGrid, Threshold,
};

use crate::render::{render_report, OutputMode};

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("xmlstat")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Tag, value and numeric range statistics for XML documents")
        .arg(
            Arg::new("path")
                .required(true)
                .help("XML file to analyze"),
        )
        .arg(
            Arg::new("threshold")
                .short('t')
                .long("threshold")
                .default_value("1")
                .allow_negative_numbers(true)
                .value_parser(|s: &str| s.parse::<Threshold>().map_err(|e| e.to_string()))
                .help("Minimum group size to list in full; smaller groups are truncated"),
        )
        .arg(
            Arg::new("attributes")
                .short('a')
                .long("attributes")
                .action(ArgAction::SetTrue)
                .help("Count attributes as element.attribute tags"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .default_value("table")
                .value_parser(["table", "text", "term", "json"])
                .help("Output format: table styles only on a terminal, text never, term always"),
        )
        .arg(
            Arg::new("xlsx")
                .short('x')
                .long("xlsx")
                .value_name("FILE")
                .help("Also write the table to an .xlsx spreadsheet"),
        )
        .arg(
            Arg::new("start-row")
                .long("start-row")
                .default_value("1")
                .value_parser(value_parser!(u32).range(1..))
                .help("Row every block starts on (1-based)"),
        )
        .arg(
            Arg::new("start-column")
                .long("start-column")
                .default_value("1")
                .value_parser(value_parser!(u32).range(1..))
                .help("Column of the first block (1-based)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log debug output to stderr"),
        )
}

/// Initialize env_logger on stderr; RUST_LOG overrides the default level.
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}

/// Build layout options from matches
fn extract_layout(matches: &ArgMatches) -> LayoutOptions {
    let threshold = matches
        .get_one::<Threshold>("threshold")
        .copied()
        .unwrap_or_default();
    let start_row = matches.get_one::<u32>("start-row").copied().unwrap_or(1);
    let start_column = matches.get_one::<u32>("start-column").copied().unwrap_or(1);

    LayoutOptions::new()
        .threshold(threshold)
        .start_row(start_row)
        .start_column(start_column)
}

/// Map the --output value onto an outstanding output mode
fn extract_output_mode(matches: &ArgMatches) -> OutputMode {
    matches
        .get_one::<String>("output")
        .map(|s| match s.as_str() {
            "json" => OutputMode::Json,
            "text" => OutputMode::Text,
            "term" => OutputMode::Term,
            _ => OutputMode::Auto,
        })
        .unwrap_or(OutputMode::Auto)
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let path = matches
        .get_one::<String>("path")
        .map(|s| s.as_str())
        .unwrap_or_default();
    let options = AnalyzeOptions::new().with_attributes(matches.get_flag("attributes"));
    let layout = extract_layout(matches);

    let registry = analyze_file(path, options)?;
    debug!("{} distinct tags in {}", registry.len(), path);

    let mut grid = MemoryGrid::new();
    write_layout(&registry, &mut grid, layout)?;

    if let Some(xlsx_path) = matches.get_one::<String>("xlsx") {
        save_xlsx(&grid, xlsx_path)
            .map_err(|e| anyhow!("failed to write spreadsheet '{}': {}", xlsx_path, e))?;
        debug!("wrote spreadsheet {}", xlsx_path);
    }

    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string());
    let output_mode = extract_output_mode(matches);

    let rendered = render_report(&file_name, &registry, &grid, &layout, output_mode)
        .map_err(|e| anyhow!("failed to render output: {}", e))?;
    if rendered.ends_with('\n') {
        print!("{}", rendered);
    } else {
        println!("{}", rendered);
    }
    Ok(())
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_logging(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_valid() {
        build_command().debug_assert();
    }

    #[test]
    fn test_extract_layout() {
        let matches = build_command()
            .try_get_matches_from(["xmlstat", "a.xml", "-t", "4", "--start-row", "2"])
            .unwrap();
        let layout = extract_layout(&matches);
        assert_eq!(layout.threshold.get(), 4);
        assert_eq!(layout.start_row, 2);
        assert_eq!(layout.start_column, 1);
    }

    #[test]
    fn test_extract_output_mode() {
        let mode_for = |value: &str| {
            let matches = build_command()
                .try_get_matches_from(["xmlstat", "a.xml", "-o", value])
                .unwrap();
            extract_output_mode(&matches)
        };
        assert!(matches!(mode_for("table"), OutputMode::Auto));
        assert!(matches!(mode_for("text"), OutputMode::Text));
        assert!(matches!(mode_for("term"), OutputMode::Term));
        assert!(matches!(mode_for("json"), OutputMode::Json));

        let matches = build_command().try_get_matches_from(["xmlstat", "a.xml"]).unwrap();
        assert!(matches!(extract_output_mode(&matches), OutputMode::Auto));
    }

    #[test]
    fn test_unknown_output_rejected() {
        let result = build_command().try_get_matches_from(["xmlstat", "a.xml", "-o", "csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let result = build_command().try_get_matches_from(["xmlstat", "a.xml", "-t", "-2"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_start_row_rejected() {
        let result =
            build_command().try_get_matches_from(["xmlstat", "a.xml", "--start-row", "0"]);
        assert!(result.is_err());
    }
}
