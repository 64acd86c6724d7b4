//! Output formatting for annotated records.
//!
//! Records are rendered one after another under an `Object N` header, each
//! field on its own line. Terminal and HTML output paint fields with the
//! reference palette from [`crate::style`]; plain output uses one-character
//! markers instead; JSON output is machine-readable.
//!
//! # Examples
//!
//! ```
//! use jcmp::{classify, format_comparison, Node, OutputFormat, OutputOptions, Record};
//!
//! let records = vec![
//!     Record::new().with("age", Node::Number(30.0)),
//!     Record::new().with("age", Node::Number(31.0)),
//! ];
//! let annotated = classify(&records);
//!
//! let output = format_comparison(&annotated, &OutputFormat::Plain, &OutputOptions::default()).unwrap();
//! assert!(output.contains("! age: 31"));
//! ```

use crate::compare::{summarize, AnnotatedField, AnnotatedRecord, ComparisonSummary, FieldClass};
use crate::error::OutputError;
use crate::style::Color;
use colored::*;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored terminal output with 24-bit ANSI escape codes
    Terminal,
    /// Plain text with class markers, no colors
    Plain,
    /// JSON representation of the classification
    Json,
    /// HTML fragment with inline styles
    Html,
}

/// Options for controlling output formatting.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    /// Hide comparand fields that match the baseline
    pub hide_matches: bool,
    /// Show full pretty-printed values instead of one-line previews
    pub show_values: bool,
    /// Maximum length for previews (ignored with `show_values`)
    pub max_value_length: usize,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            hide_matches: false,
            show_values: false,
            max_value_length: 80,
        }
    }
}

const EMPTY_MESSAGE: &str = "No records to compare.";

/// Formats annotated records according to the specified format and options.
pub fn format_comparison(
    annotated: &[AnnotatedRecord],
    format: &OutputFormat,
    options: &OutputOptions,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Terminal => Ok(format_text(annotated, options, true)),
        OutputFormat::Plain => Ok(format_text(annotated, options, false)),
        OutputFormat::Json => format_json(annotated),
        OutputFormat::Html => Ok(format_html(annotated, options)),
    }
}

fn format_text(annotated: &[AnnotatedRecord], options: &OutputOptions, colored: bool) -> String {
    if annotated.is_empty() {
        return if colored {
            EMPTY_MESSAGE.dimmed().to_string()
        } else {
            EMPTY_MESSAGE.to_string()
        };
    }

    let mut output = String::new();

    for record in annotated {
        let header = record_header(record);
        if colored {
            output.push_str(&header.bold().to_string());
        } else {
            output.push_str(&header);
        }
        output.push('\n');

        for field in record.fields.iter().filter(|f| should_show_field(f, options)) {
            let line = if colored {
                format_field_terminal(field, options)
            } else {
                format_field_plain(field, options)
            };
            output.push_str(&line);
            output.push('\n');
        }

        output.push('\n');
    }

    output.push_str(&format_summary(&summarize(annotated)));

    output
}

fn record_header(record: &AnnotatedRecord) -> String {
    if record.is_baseline() {
        format!("Object {} (baseline)", record.index + 1)
    } else {
        format!("Object {}", record.index + 1)
    }
}

/// Formats a single field painted with its reference style.
fn format_field_terminal(field: &AnnotatedField, options: &OutputOptions) -> String {
    let text = format!("{}: {}", field.key, format_value(field, options));
    let style = field.class.style();

    let mut painted = text.normal();
    if let Color::Hex(r, g, b) = style.foreground {
        painted = painted.truecolor(r, g, b);
    }
    if let Color::Hex(r, g, b) = style.background {
        painted = painted.on_truecolor(r, g, b);
    }

    format!("{} {}", field.class.marker(), painted)
}

fn format_field_plain(field: &AnnotatedField, options: &OutputOptions) -> String {
    format!(
        "{} {}: {}",
        field.class.marker(),
        field.key,
        format_value(field, options)
    )
}

fn format_value(field: &AnnotatedField, options: &OutputOptions) -> String {
    if options.show_values {
        field.value.to_pretty_json()
    } else {
        field.value.preview(options.max_value_length)
    }
}

fn should_show_field(field: &AnnotatedField, options: &OutputOptions) -> bool {
    !(options.hide_matches && field.class == FieldClass::Match)
}

fn format_summary(summary: &ComparisonSummary) -> String {
    let comparands = summary.records.saturating_sub(1);
    if comparands == 0 {
        return "Summary: baseline only".to_string();
    }

    let mut parts = vec![format!(
        "{} comparand{}",
        comparands,
        if comparands == 1 { "" } else { "s" }
    )];
    if summary.matched > 0 {
        parts.push(format!("{} matched", summary.matched));
    }
    if summary.mismatched > 0 {
        parts.push(format!("{} mismatched", summary.mismatched));
    }
    if summary.unique > 0 {
        parts.push(format!("{} unique", summary.unique));
    }
    if summary.missing > 0 {
        parts.push(format!("{} missing", summary.missing));
    }

    format!("Summary: {}", parts.join(", "))
}

fn format_json(annotated: &[AnnotatedRecord]) -> Result<String, OutputError> {
    use serde_json::json;

    let records: Vec<serde_json::Value> = annotated
        .iter()
        .map(|record| {
            let fields: Vec<serde_json::Value> = record
                .fields
                .iter()
                .map(|f| {
                    json!({
                        "key": f.key,
                        "value": f.value.to_json_value(),
                        "class": f.class,
                    })
                })
                .collect();
            json!({
                "index": record.index,
                "fields": fields,
                "missing": record.missing,
            })
        })
        .collect();

    let summary = summarize(annotated);
    let output = json!({
        "records": records,
        "summary": {
            "records": summary.records,
            "matched": summary.matched,
            "mismatched": summary.mismatched,
            "unique": summary.unique,
            "missing": summary.missing,
            "consistent": summary.is_consistent(),
        }
    });

    serde_json::to_string_pretty(&output)
        .map_err(|e| OutputError::JsonSerializationError { source: e })
}

fn format_html(annotated: &[AnnotatedRecord], options: &OutputOptions) -> String {
    if annotated.is_empty() {
        return String::new();
    }

    let mut output = String::from("<div class=\"jcmp-comparison\">\n");

    for record in annotated {
        output.push_str("<div class=\"jcmp-record\">\n");
        output.push_str(&format!(
            "<h6>Object {}</h6>\n<pre>\n",
            record.index + 1
        ));
        for field in record.fields.iter().filter(|f| should_show_field(f, options)) {
            output.push_str(&format!(
                "<div style=\"{}\"><strong>{}</strong>: {}</div>\n",
                field.class.style().css(),
                escape_html(&field.key),
                escape_html(&format_value(field, options)),
            ));
        }
        output.push_str("</pre>\n</div>\n");
    }

    output.push_str("</div>");
    output
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::classify;
    use crate::tree::{Node, Record};

    fn sample() -> Vec<AnnotatedRecord> {
        classify(&[
            Record::new()
                .with("name", Node::String("Jane Doe".to_string()))
                .with("age", Node::Number(30.0)),
            Record::new()
                .with("name", Node::String("Jane Doe".to_string()))
                .with("age", Node::Number(31.0))
                .with("email", Node::String("jane@example.com".to_string())),
        ])
    }

    #[test]
    fn test_format_plain_markers() {
        let output = format_text(&sample(), &OutputOptions::default(), false);
        assert!(output.contains("Object 1 (baseline)"));
        assert!(output.contains("* name: \"Jane Doe\""));
        assert!(output.contains("= name: \"Jane Doe\""));
        assert!(output.contains("! age: 31"));
        assert!(output.contains("+ email: \"jane@example.com\""));
    }

    #[test]
    fn test_format_plain_keeps_multiline_value_on_one_line() {
        let annotated = classify(&[
            Record::new().with("note", Node::String("a".to_string())),
            Record::new().with("note", Node::String("x\nSummary: forged".to_string())),
        ]);
        let output = format_text(&annotated, &OutputOptions::default(), false);
        assert!(output.contains("! note: \"x\\nSummary: forged\""));
        assert!(!output
            .lines()
            .any(|line| line.trim_start().starts_with("Summary: forged")));
    }

    #[test]
    fn test_hide_matches() {
        let options = OutputOptions {
            hide_matches: true,
            ..Default::default()
        };
        let output = format_text(&sample(), &options, false);
        assert!(!output.contains("= name"));
        assert!(output.contains("* name"));
    }

    #[test]
    fn test_format_summary() {
        let summary = summarize(&sample());
        assert_eq!(
            format_summary(&summary),
            "Summary: 1 comparand, 1 matched, 1 mismatched, 1 unique"
        );
        assert_eq!(
            format_summary(&ComparisonSummary {
                records: 1,
                ..Default::default()
            }),
            "Summary: baseline only"
        );
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(
            format_text(&[], &OutputOptions::default(), false),
            "No records to compare."
        );
        assert_eq!(format_html(&[], &OutputOptions::default()), "");
    }

    #[test]
    fn test_show_values_pretty_prints() {
        let annotated = classify(&[Record::new().with(
            "tags",
            Node::Array(vec![Node::String("a".to_string())]),
        )]);
        let options = OutputOptions {
            show_values: true,
            ..Default::default()
        };
        let output = format_text(&annotated, &options, false);
        assert!(output.contains("* tags: [\n  \"a\"\n]"));
    }

    #[test]
    fn test_format_html_styles_and_escapes() {
        let annotated = classify(&[
            Record::new().with("a", Node::String("<b>".to_string())),
            Record::new().with("a", Node::String("x".to_string())),
        ]);
        let output = format_html(&annotated, &OutputOptions::default());
        assert!(output.contains("background-color: #DFF0D8; color: #3C763D"));
        assert!(output.contains("background-color: #FADBD8; color: #31708F"));
        assert!(output.contains("&quot;&lt;b&gt;&quot;"));
        assert!(output.contains("<h6>Object 2</h6>"));
    }

    #[test]
    fn test_format_json_structure() {
        let output = format_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["records"][1]["fields"][1]["class"], "mismatch");
        assert_eq!(value["records"][1]["fields"][2]["class"], "unique_to_comparand");
        assert_eq!(value["records"][1]["fields"][1]["value"], 31);
        assert_eq!(value["summary"]["consistent"], false);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a & 'b'"), "a &amp; &#39;b&#39;");
    }
}
