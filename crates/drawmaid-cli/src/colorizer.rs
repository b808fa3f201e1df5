//! Terminal presentation of validation reports
//!
//! Applies ANSI colours with crossterm when the caller asks for them.

use crossterm::style::{Color, Stylize};
use drawmaid::{Compatibility, Diagnostic, ValidationReport};
use std::fmt::Write as _;

fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        format!("{}", text.with(color))
    } else {
        text.to_string()
    }
}

fn verdict_color(compatibility: Compatibility) -> Color {
    match compatibility {
        Compatibility::High => Color::Green,
        Compatibility::Medium => Color::Yellow,
        Compatibility::Low => Color::Red,
    }
}

fn write_section(
    out: &mut String,
    title: &str,
    findings: &[Diagnostic],
    color: Color,
    enabled: bool,
) {
    if findings.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}", paint(title, color, enabled));
    for finding in findings {
        let location = if finding.line == 0 {
            "input".to_string()
        } else {
            format!("line {}", finding.line)
        };
        let _ = writeln!(out, "  {}: {}", location, finding.issue);
        let _ = writeln!(
            out,
            "    {} {}",
            paint("hint:", Color::Cyan, enabled),
            finding.suggestion
        );
    }
}

/// Render a report for humans
pub fn format_report(report: &ValidationReport, color: bool) -> String {
    let mut out = String::new();
    let dialect = report.diagram_type.as_deref().unwrap_or("unknown");
    let (mark, status) = if report.is_valid {
        ("✓", "Valid")
    } else {
        ("✗", "Invalid")
    };
    let headline = format!("{} {} {} diagram", mark, status, dialect);
    let _ = writeln!(
        out,
        "{} (compatibility: {})",
        paint(&headline, verdict_color(report.compatibility), color),
        report.compatibility
    );
    let _ = writeln!(out, "  {} nodes, {} edges", report.node_count, report.edge_count);

    write_section(&mut out, "Issues:", &report.issues, Color::Red, color);
    write_section(&mut out, "Warnings:", &report.warnings, Color::Yellow, color);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_report() {
        let report = drawmaid::validate("flowchart TD\nA --> B --> C");
        let text = format_report(&report, false);
        assert!(text.starts_with("✗ Invalid flowchart diagram (compatibility: low)"));
        assert!(text.contains("Issues:\n  line 2: Chained arrows on one line"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_coloured_report_has_escapes() {
        let report = drawmaid::validate("flowchart LR\nA --> B");
        let text = format_report(&report, true);
        // crossterm drops colour codes itself when NO_COLOR is set
        if std::env::var_os("NO_COLOR").is_none() {
            assert!(text.contains('\u{1b}'));
        }
        assert!(text.contains("Valid flowchart diagram"));
    }
}
