use super::{parse_object, ExtractionStrategy, Mapping};

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// The whole reply is a JSON object.
pub struct WholeDocument;

impl ExtractionStrategy for WholeDocument {
    fn name(&self) -> &'static str {
        "whole_document"
    }

    fn extract(&self, text: &str) -> Option<Mapping> {
        parse_object(text)
    }
}

/// The interior of a fence labeled `json` (```json, ```JSON, ...).
pub struct FencedBlock;

impl ExtractionStrategy for FencedBlock {
    fn name(&self) -> &'static str {
        "fenced_block"
    }

    fn extract(&self, text: &str) -> Option<Mapping> {
        // ASCII lowercasing keeps byte offsets aligned with `text`
        let lower = text.to_ascii_lowercase();
        let mut search_from = 0;

        while let Some(found) = lower[search_from..].find(JSON_FENCE) {
            let content_start = search_from + found + JSON_FENCE.len();
            let content_end = content_start + text[content_start..].find(FENCE)?;
            if let Some(mapping) = parse_object(&text[content_start..content_end]) {
                return Some(mapping);
            }
            search_from = content_end + FENCE.len();
        }

        None
    }
}

/// The first balanced `{...}` span, parsed as an object.
///
/// Braces inside string literals are ignored, and nesting depth is unbounded.
/// Only the span opened by the first `{` is considered: when it is unbalanced
/// or fails to parse, nothing nested inside it is tried.
pub struct BraceSpan;

impl ExtractionStrategy for BraceSpan {
    fn name(&self) -> &'static str {
        "brace_span"
    }

    fn extract(&self, text: &str) -> Option<Mapping> {
        let start = text.find('{')?;
        let end = matching_brace(text.as_bytes(), start)?;
        parse_object(&text[start..=end])
    }
}

/// Index of the brace closing the one at `start`, if any.
fn matching_brace(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match byte {
            b'\\' if in_string => escape_next = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_whole_document_rejects_prose() {
        assert!(WholeDocument.extract("  {\"a\": 1}\n").is_some());
        assert!(WholeDocument.extract("data: {\"a\": 1}").is_none());
    }

    #[test]
    fn test_fenced_block_case_insensitive() {
        let text = "intro\n```Json\n{\"glucose\": 98}\n```\noutro";
        let mapping = FencedBlock.extract(text).unwrap();
        assert_eq!(mapping["glucose"], json!(98));
    }

    #[test]
    fn test_fenced_block_skips_broken_fence() {
        let text = "```json\n{broken\n```\n\n```json\n{\"a\": 2}\n```";
        let mapping = FencedBlock.extract(text).unwrap();
        assert_eq!(mapping["a"], json!(2));
    }

    #[test]
    fn test_fenced_block_requires_label_and_close() {
        assert!(FencedBlock.extract("```\n{\"a\": 1}\n```").is_none());
        assert!(FencedBlock.extract("```json\n{\"a\": 1}").is_none());
    }

    #[test]
    fn test_brace_span_nested() {
        let text = r#"result => {"vital_stats": {"alt": 35, "ast": 28}} done"#;
        let mapping = BraceSpan.extract(text).unwrap();
        assert_eq!(mapping["vital_stats"]["ast"], json!(28));
    }

    #[test]
    fn test_brace_span_ignores_braces_in_strings() {
        let text = r#"note {"comment": "values in {mg/dL}", "glucose": 101}"#;
        let mapping = BraceSpan.extract(text).unwrap();
        assert_eq!(mapping["glucose"], json!(101));
    }

    #[test]
    fn test_brace_span_handles_escaped_quotes() {
        let text = r#"{"text": "say \"hi\" {", "n": 1}"#;
        let mapping = BraceSpan.extract(text).unwrap();
        assert_eq!(mapping["n"], json!(1));
    }

    #[test]
    fn test_brace_span_only_tries_first_span() {
        let text = r#"template {name} then {"a": 1}"#;
        assert!(BraceSpan.extract(text).is_none());
    }

    #[test]
    fn test_brace_span_rejects_malformed_report_without_inner_fallback() {
        // Trailing comma makes the outer object invalid; the nested
        // vital_stats object must not be returned in its place
        let text = r#"Result: {"user_uid": "u1", "vital_stats": {"glucose": 105}, "note": "x",} end"#;
        assert!(BraceSpan.extract(text).is_none());
    }

    #[test]
    fn test_brace_span_large_unbalanced_input() {
        let text = "{".repeat(200_000);
        assert!(BraceSpan.extract(&text).is_none());

        let text = format!("{}{}", "{\"a\": ".repeat(50_000), "1");
        assert!(BraceSpan.extract(&text).is_none());
    }

    #[test]
    fn test_brace_span_unbalanced() {
        assert!(BraceSpan.extract(r#"{"a": 1"#).is_none());
        assert!(BraceSpan.extract("}{").is_none());
    }

    #[test]
    fn test_brace_span_with_multibyte_text() {
        let text = "健檢結果如下：{\"血糖\": 95}。謝謝";
        let mapping = BraceSpan.extract(text).unwrap();
        assert_eq!(mapping["血糖"], json!(95));
    }
}
