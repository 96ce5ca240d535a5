use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::analysis::ExtractedReport;
use crate::scoring::{Grade, ScoreResult};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format the score as "N/100", colored green (>=80), yellow (>=60) or red
pub fn format_score(score: u32, use_colors: bool) -> String {
    let text = format!("{}/100", score);
    if !use_colors {
        return text;
    }
    if score >= 80 {
        text.green().bold().to_string()
    } else if score >= 60 {
        text.yellow().bold().to_string()
    } else {
        text.red().bold().to_string()
    }
}

fn grade_marker(grade: Grade, use_colors: bool) -> String {
    let marker = format!("[{}]", grade);
    if !use_colors {
        return marker;
    }
    match grade {
        Grade::None => marker,
        Grade::A => marker.yellow().to_string(),
        Grade::B => marker.bright_red().to_string(),
        Grade::C => marker.red().bold().to_string(),
    }
}

/// Format a score result: score line, then one warning per line
pub fn format_result(result: &ScoreResult, use_colors: bool) -> String {
    let mut lines = vec![format!("Score: {}", format_score(result.score, use_colors))];

    if result.warnings.is_empty() {
        lines.push("No findings.".to_string());
    } else {
        for (deduction, warning) in result.deductions.iter().zip(&result.warnings) {
            lines.push(format!(
                "  {} -{:<3} {}",
                grade_marker(deduction.grade, use_colors),
                deduction.points,
                warning
            ));
        }
    }

    lines.join("\n")
}

/// Format report metadata (user and date) when present
pub fn format_report_header(report: &ExtractedReport, use_colors: bool) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(ref uid) = report.user_uid {
        parts.push(format!("User: {}", uid));
    }
    if let Some(date) = report.report_date {
        parts.push(format!("Date: {}", date.format("%Y/%m/%d")));
    }
    if parts.is_empty() {
        return None;
    }

    let header = parts.join("  ");
    Some(if use_colors {
        header.dimmed().to_string()
    } else {
        header
    })
}

/// Format the score and warnings as pretty JSON
pub fn format_result_json(result: &ScoreResult) -> anyhow::Result<String> {
    let value = serde_json::json!({
        "score": result.score,
        "warnings": result.warnings,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Format deductions as tab-separated values for scripting
/// Columns: source, grade, points, warning (no headers, no colors)
pub fn format_tsv(result: &ScoreResult) -> String {
    result
        .deductions
        .iter()
        .zip(&result.warnings)
        .map(|(d, warning)| format!("{}\t{}\t{}\t{}", d.source, d.grade, d.points, warning))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Deduction;
    use chrono::NaiveDate;

    fn sample_result() -> ScoreResult {
        ScoreResult {
            score: 85,
            warnings: vec![
                "Fasting glucose is grade A (105)".to_string(),
                "ALT is grade B (90)".to_string(),
            ],
            deductions: vec![
                Deduction {
                    source: "glucose".to_string(),
                    grade: Grade::A,
                    points: 5,
                },
                Deduction {
                    source: "alt".to_string(),
                    grade: Grade::B,
                    points: 10,
                },
            ],
        }
    }

    #[test]
    fn test_format_score_plain() {
        assert_eq!(format_score(85, false), "85/100");
        assert_eq!(format_score(1, false), "1/100");
    }

    #[test]
    fn test_format_score_colored_contains_value() {
        assert!(format_score(55, true).contains("55/100"));
        assert_ne!(format_score(55, true), "55/100");
    }

    #[test]
    fn test_format_result_plain() {
        let output = format_result(&sample_result(), false);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Score: 85/100");
        assert_eq!(lines[1], "  [A] -5   Fasting glucose is grade A (105)");
        assert_eq!(lines[2], "  [B] -10  ALT is grade B (90)");
    }

    #[test]
    fn test_format_result_no_findings() {
        let result = ScoreResult {
            score: 100,
            warnings: vec![],
            deductions: vec![],
        };
        assert_eq!(format_result(&result, false), "Score: 100/100\nNo findings.");
    }

    #[test]
    fn test_format_report_header() {
        let mut report = ExtractedReport::bare(serde_json::Map::new());
        assert!(format_report_header(&report, false).is_none());

        report.user_uid = Some("u-1".to_string());
        report.report_date = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert_eq!(
            format_report_header(&report, false).unwrap(),
            "User: u-1  Date: 2024/05/01"
        );
    }

    #[test]
    fn test_format_result_json() {
        let json = format_result_json(&sample_result()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["score"], 85);
        assert_eq!(value["warnings"][1], "ALT is grade B (90)");
    }

    #[test]
    fn test_format_tsv() {
        let tsv = format_tsv(&sample_result());
        assert_eq!(
            tsv,
            "glucose\tA\t5\tFasting glucose is grade A (105)\nalt\tB\t10\tALT is grade B (90)"
        );
    }
}
