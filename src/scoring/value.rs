use serde_json::Value;
use std::fmt;

/// Qualitative lab result marker, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QualitativeToken {
    Negative,
    Trace,
    Plus,
    TwoPlus,
    ThreePlus,
    FourPlus,
}

impl QualitativeToken {
    /// Ordinal rank used for numeric comparison (0..=3).
    pub fn rank(self) -> u8 {
        match self {
            QualitativeToken::Negative => 0,
            QualitativeToken::Trace | QualitativeToken::Plus => 1,
            QualitativeToken::TwoPlus | QualitativeToken::ThreePlus => 2,
            QualitativeToken::FourPlus => 3,
        }
    }

    /// Recognize a token. Expects trimmed, lowercased input.
    fn parse(token: &str) -> Option<Self> {
        match token {
            "負" | "negative" | "(-)" | "-" | "陰性" | "neg" => Some(QualitativeToken::Negative),
            "+/-" | "±" | "trace" => Some(QualitativeToken::Trace),
            "+" | "(+)" | "positive" | "陽性" => Some(QualitativeToken::Plus),
            "++" => Some(QualitativeToken::TwoPlus),
            "+++" => Some(QualitativeToken::ThreePlus),
            "++++" => Some(QualitativeToken::FourPlus),
            _ => None,
        }
    }
}

impl fmt::Display for QualitativeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QualitativeToken::Negative => "(-)",
            QualitativeToken::Trace => "+/-",
            QualitativeToken::Plus => "+",
            QualitativeToken::TwoPlus => "++",
            QualitativeToken::ThreePlus => "+++",
            QualitativeToken::FourPlus => "++++",
        };
        f.write_str(s)
    }
}

/// A raw measurement normalized into a comparable form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeasurementValue {
    Missing,
    Numeric(f64),
    Qualitative(QualitativeToken),
}

impl MeasurementValue {
    /// Numeric view: the value itself, or the rank of a qualitative token.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            MeasurementValue::Missing => None,
            MeasurementValue::Numeric(n) => Some(*n),
            MeasurementValue::Qualitative(token) => Some(f64::from(token.rank())),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, MeasurementValue::Missing)
    }

    /// True for a negative token or a plain zero.
    pub fn is_negative(&self) -> bool {
        match self {
            MeasurementValue::Qualitative(token) => *token == QualitativeToken::Negative,
            MeasurementValue::Numeric(n) => *n == 0.0,
            MeasurementValue::Missing => false,
        }
    }
}

/// Normalize a raw JSON value. Never fails: anything unusable is `Missing`.
pub fn normalize(raw: &Value) -> MeasurementValue {
    match raw {
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.is_finite() => MeasurementValue::Numeric(f),
            _ => MeasurementValue::Missing,
        },
        Value::String(s) => normalize_text(s),
        _ => MeasurementValue::Missing,
    }
}

fn normalize_text(s: &str) -> MeasurementValue {
    let token = s.trim().to_lowercase();
    if let Some(q) = QualitativeToken::parse(&token) {
        return MeasurementValue::Qualitative(q);
    }
    match token.parse::<f64>() {
        Ok(f) if f.is_finite() => MeasurementValue::Numeric(f),
        _ => MeasurementValue::Missing,
    }
}

/// Render a raw value the way it appeared in the report, for warnings.
pub fn display_raw(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Format a number without a trailing ".0" for whole values.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_passthrough() {
        assert_eq!(normalize(&json!(105)), MeasurementValue::Numeric(105.0));
        assert_eq!(normalize(&json!(1.25)), MeasurementValue::Numeric(1.25));
    }

    #[test]
    fn test_numeric_text() {
        assert_eq!(normalize(&json!(" 98.6 ")), MeasurementValue::Numeric(98.6));
        assert_eq!(normalize(&json!("-3")), MeasurementValue::Numeric(-3.0));
    }

    #[test]
    fn test_negative_tokens() {
        for token in ["負", "negative", "NEGATIVE", "(-)", "-", "陰性"] {
            let value = normalize(&json!(token));
            assert_eq!(
                value,
                MeasurementValue::Qualitative(QualitativeToken::Negative),
                "token {token}"
            );
            assert_eq!(value.numeric(), Some(0.0));
            assert!(value.is_negative());
        }
    }

    #[test]
    fn test_plus_grades_rank() {
        let rank = |s: &str| normalize(&json!(s)).numeric();
        assert_eq!(rank("+/-"), Some(1.0));
        assert_eq!(rank("+"), Some(1.0));
        assert_eq!(rank("++"), Some(2.0));
        assert_eq!(rank("+++"), Some(2.0));
        assert_eq!(rank("++++"), Some(3.0));
        assert_eq!(rank("陽性"), Some(1.0));
    }

    #[test]
    fn test_unparseable_is_missing() {
        assert!(normalize(&json!("see note")).is_missing());
        assert!(normalize(&json!("")).is_missing());
        assert!(normalize(&json!("NaN")).is_missing());
        assert!(normalize(&json!(null)).is_missing());
        assert!(normalize(&json!(true)).is_missing());
        assert!(normalize(&json!([1, 2])).is_missing());
        assert!(normalize(&json!({"v": 1})).is_missing());
    }

    #[test]
    fn test_zero_counts_as_negative() {
        assert!(normalize(&json!(0)).is_negative());
        assert!(!normalize(&json!("+")).is_negative());
        assert!(!MeasurementValue::Missing.is_negative());
    }

    #[test]
    fn test_display_raw() {
        assert_eq!(display_raw(&json!("++ ")), "++");
        assert_eq!(display_raw(&json!(105)), "105");
        assert_eq!(display_raw(&json!(5.5)), "5.5");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(135.0), "135");
        assert_eq!(format_number(85.5), "85.5");
    }
}
