//! High-level analysis API.
//!
//! Entry points that take XML text, a file, or an already-parsed document
//! and return a filled [`StatsRegistry`].

use std::path::Path;

use log::debug;

use crate::aggregator::aggregate;
use crate::error::XmlstatError;
use crate::options::AnalyzeOptions;
use crate::stats::StatsRegistry;
use crate::Result;

/// Deepest element nesting [`analyze_str`] and [`analyze_file`] accept.
///
/// The XML parser recurses once per nesting level, so deeper input is
/// rejected up front instead of exhausting the stack.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Aggregate an already-parsed document.
pub fn analyze_document(
    doc: &roxmltree::Document<'_>,
    options: AnalyzeOptions,
) -> Result<StatsRegistry> {
    let mut registry = StatsRegistry::new();
    aggregate(Some(doc.root_element()), &mut registry, options)?;
    Ok(registry)
}

/// Parse and aggregate XML text.
///
/// A document without a root element fails with
/// [`XmlstatError::MissingRoot`], one nested deeper than
/// [`MAX_NESTING_DEPTH`] with [`XmlstatError::NestingTooDeep`]; any other
/// parse failure is [`XmlstatError::Xml`].
///
/// # Example
///
/// ```rust
/// use xmlstatlib::{analyze_str, AnalyzeOptions};
///
/// let registry = analyze_str("<a><b>1</b><b>2</b></a>", AnalyzeOptions::new()).unwrap();
/// assert_eq!(registry.tag("b").unwrap().count, 2);
/// ```
pub fn analyze_str(text: &str, options: AnalyzeOptions) -> Result<StatsRegistry> {
    if nesting_exceeds(text, MAX_NESTING_DEPTH) {
        return Err(XmlstatError::NestingTooDeep {
            limit: MAX_NESTING_DEPTH,
        });
    }
    let doc = roxmltree::Document::parse(text).map_err(|e| match e {
        roxmltree::Error::NoRootNode => XmlstatError::MissingRoot,
        other => XmlstatError::Xml(other),
    })?;
    analyze_document(&doc, options)
}

/// Read and aggregate an XML file.
///
/// Same limits as [`analyze_str`].
pub fn analyze_file(path: impl AsRef<Path>, options: AnalyzeOptions) -> Result<StatsRegistry> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| XmlstatError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!("read {} bytes from {}", text.len(), path.display());
    analyze_str(&text, options)
}

/// Scan the raw markup and report whether open elements ever nest deeper
/// than `limit`. Comments, CDATA, processing instructions, declarations and
/// quoted attribute values are skipped; malformed markup is left for the
/// parser to report.
fn nesting_exceeds(text: &str, limit: usize) -> bool {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut pos = 0;

    while let Some(offset) = bytes[pos..].iter().position(|&b| b == b'<') {
        let start = pos + offset;
        let rest = &bytes[start..];
        pos = if rest.starts_with(b"<!--") {
            skip_past(bytes, start + 4, b"-->")
        } else if rest.starts_with(b"<![CDATA[") {
            skip_past(bytes, start + 9, b"]]>")
        } else if rest.starts_with(b"<?") {
            skip_past(bytes, start + 2, b"?>")
        } else if rest.starts_with(b"<!") {
            skip_markup(bytes, start + 2)
        } else if rest.starts_with(b"</") {
            depth = depth.saturating_sub(1);
            skip_past(bytes, start + 2, b">")
        } else {
            let end = skip_markup(bytes, start + 1);
            let self_closing = end
                .checked_sub(2)
                .and_then(|i| bytes.get(i))
                .is_some_and(|&b| b == b'/');
            if !self_closing {
                depth += 1;
                if depth > limit {
                    return true;
                }
            }
            end
        };
    }
    false
}

/// Position just past the next `pattern` at or after `from`, or the end.
fn skip_past(bytes: &[u8], from: usize, pattern: &[u8]) -> usize {
    bytes
        .get(from..)
        .and_then(|tail| tail.windows(pattern.len()).position(|w| w == pattern))
        .map_or(bytes.len(), |i| from + i + pattern.len())
}

/// Position just past the `>` closing a tag or declaration, ignoring `>`
/// inside quotes or a bracketed internal subset.
fn skip_markup(bytes: &[u8], from: usize) -> usize {
    let mut quote = None;
    let mut brackets = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'[') => brackets += 1,
            (None, b']') => brackets = brackets.saturating_sub(1),
            (None, b'>') if brackets == 0 => return i + 1,
            _ => {}
        }
    }
    bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_str() {
        let registry = analyze_str("<a><b> x </b></a>", AnalyzeOptions::new()).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.tag("b").unwrap().values()[0].name, "x");
    }

    #[test]
    fn test_analyze_str_malformed() {
        let err = analyze_str("<a><b></a>", AnalyzeOptions::new()).unwrap_err();
        assert!(matches!(err, XmlstatError::Xml(_)));
    }

    #[test]
    fn test_analyze_str_no_root() {
        let err = analyze_str("<!-- nothing here -->", AnalyzeOptions::new()).unwrap_err();
        assert!(matches!(err, XmlstatError::MissingRoot));
    }

    fn nested(depth: usize) -> String {
        format!("{}7{}", "<d>".repeat(depth), "</d>".repeat(depth))
    }

    #[test]
    fn test_analyze_str_at_nesting_limit() {
        let registry = analyze_str(&nested(MAX_NESTING_DEPTH), AnalyzeOptions::new()).unwrap();
        assert_eq!(registry.tag("d").unwrap().count, MAX_NESTING_DEPTH as u64);
    }

    #[test]
    fn test_analyze_str_too_deep() {
        let err = analyze_str(&nested(5_000), AnalyzeOptions::new()).unwrap_err();
        assert!(matches!(
            err,
            XmlstatError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH
            }
        ));
    }

    #[test]
    fn test_nesting_scan_counts_open_elements() {
        assert!(!nesting_exceeds("<a><b/><c></c></a>", 2));
        assert!(nesting_exceeds("<a><b><c/></b></a>", 1));
        assert!(!nesting_exceeds("<a><b/></a><x/>", 1));
    }

    #[test]
    fn test_nesting_scan_skips_non_element_markup() {
        let xml = concat!(
            r#"<?xml version="1.0"?>"#,
            r#"<!DOCTYPE a [<!ENTITY e "<b>">]>"#,
            r#"<a x="/>" y='<c>'><!-- <d> --><![CDATA[<e>]]><?pi <f>?><g/></a>"#,
        );
        assert!(!nesting_exceeds(xml, 1));
    }

    #[test]
    fn test_analyze_file_missing() {
        let err = analyze_file("/nonexistent/file.xml", AnalyzeOptions::new()).unwrap_err();
        assert!(matches!(err, XmlstatError::FileRead { .. }));
    }
}
