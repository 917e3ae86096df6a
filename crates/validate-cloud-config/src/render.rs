//! Report rendering: ariadne source snippets, plain lines and JSON.

use crate::hints::{infer_error_code, suggest_fix};
use ariadne::{Color, Config, Label, Report as AriadneReport, ReportKind, Source};
use cloud_config_validation::{Entry, Report, Severity};
use serde::Serialize;
use std::io;
use std::ops::Range;

/// Findings for one input, as emitted by `--format json`.
#[derive(Debug, Serialize)]
pub struct FileReport<'a> {
    pub file: &'a str,
    pub entries: &'a Report,
}

/// Render every entry as an ariadne report against the document source.
pub fn render_text(file: &str, source: &str, report: &Report, color: bool) -> io::Result<String> {
    let mut output = Vec::new();
    for entry in report {
        render_entry(file, source, entry, color, &mut output)?;
    }
    Ok(String::from_utf8_lossy(&output).into_owned())
}

fn render_entry(
    file: &str,
    source: &str,
    entry: &Entry,
    color: bool,
    output: &mut Vec<u8>,
) -> io::Result<()> {
    let (kind, label_color) = match entry.severity {
        Severity::Error => (ReportKind::Error, Color::Red),
        Severity::Warning => (ReportKind::Warning, Color::Yellow),
        Severity::Info => (ReportKind::Advice, Color::Cyan),
    };
    let span = line_span(source, entry.line);

    let mut builder = AriadneReport::build(kind, file.to_string(), span.start)
        .with_config(Config::default().with_color(color))
        .with_message(format!("[{}] {}", infer_error_code(entry), entry.message))
        .with_label(
            Label::new((file.to_string(), span))
                .with_message(entry.severity.as_str())
                .with_color(label_color),
        );
    if let Some(hint) = suggest_fix(entry) {
        builder = builder.with_help(hint);
    }

    builder
        .finish()
        .write((file.to_string(), Source::from(source)), output)
}

/// Character range of a line's content, without trailing whitespace.
///
/// Lines past the end of the source map to an empty range at the end.
fn line_span(source: &str, line: usize) -> Range<usize> {
    let mut offset = 0;
    for (index, text) in source.split('\n').enumerate() {
        if index + 1 == line {
            let len = text.trim_end().chars().count();
            return offset..offset + len;
        }
        offset += text.chars().count() + 1;
    }
    let end = source.chars().count();
    end..end
}

/// One `<file>:line N: severity: message` line per entry.
pub fn render_plain(file: &str, report: &Report) -> String {
    report
        .entries()
        .iter()
        .map(|entry| format!("{}:{}\n", file, entry))
        .collect()
}

pub fn render_json(files: &[FileReport<'_>]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> Report {
        let mut report = Report::new();
        report.warning(2, "unrecognized key \"bogus\"");
        report.error(3, "invalid value bad_host");
        report
    }

    #[test]
    fn test_line_span() {
        let source = "#cloud-config\nbogus: 1  \n\nhostname: a";
        assert_eq!(line_span(source, 1), 0..13);
        assert_eq!(line_span(source, 2), 14..22);
        assert_eq!(line_span(source, 3), 25..25);
        assert_eq!(line_span(source, 4), 26..37);
        assert_eq!(line_span(source, 9), 37..37);
    }

    #[test]
    fn test_line_span_counts_chars() {
        let source = "gecos: Zoë\nbogus: 1";
        assert_eq!(line_span(source, 2), 11..19);
    }

    #[test]
    fn test_plain() {
        assert_eq!(
            render_plain("user-data", &sample_report()),
            "user-data:line 2: warning: unrecognized key \"bogus\"\n\
             user-data:line 3: error: invalid value bad_host\n"
        );
    }

    #[test]
    fn test_json() {
        let report = sample_report();
        let json = render_json(&[FileReport {
            file: "user-data",
            entries: &report,
        }])
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["file"], "user-data");
        assert_eq!(value[0]["entries"][0]["kind"], "warning");
        assert_eq!(value[0]["entries"][1]["line"], 3);
    }

    #[test]
    fn test_text_has_code_message_and_hint() {
        let source = "#cloud-config\nbogus: 1\nhostname: bad_host\n";
        let text = render_text("user-data", source, &sample_report(), false).unwrap();
        assert!(text.contains("[CC-1-10] unrecognized key \"bogus\""));
        assert!(text.contains("[CC-1-12] invalid value bad_host"));
        assert!(text.contains("bogus: 1"));
        assert!(text.contains("Check for typos"));
        assert!(text.contains("user-data"));
    }

    #[test]
    fn test_text_for_empty_report() {
        let text = render_text("user-data", "", &Report::new(), false).unwrap();
        assert!(text.is_empty());
    }
}
