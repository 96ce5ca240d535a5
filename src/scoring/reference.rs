use anyhow::{bail, Result};

/// Parsed reference expression describing the normal range of a metric.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceRange {
    LessThan(f64),
    LessEqual(f64),
    GreaterThan(f64),
    GreaterEqual(f64),
    Between(f64, f64), // Inclusive range: N-M
    /// Qualitative marker such as "(-)": any non-negative result is abnormal
    ExpectedNegative,
}

const NEGATIVE_MARKERS: &[&str] = &["(-)", "negative", "陰性"];

impl ReferenceRange {
    /// Parse a reference expression. Returns `Ok(None)` for a blank expression.
    pub fn parse(s: &str) -> Result<Option<Self>> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(None);
        }

        let lower = s.to_lowercase();
        if NEGATIVE_MARKERS.iter().any(|m| lower.contains(m)) {
            return Ok(Some(ReferenceRange::ExpectedNegative));
        }

        let range = if let Some(val) = strip_any(s, &[">=", "≥"]) {
            ReferenceRange::GreaterEqual(parse_bound(val)?)
        } else if let Some(val) = strip_any(s, &["<=", "≤"]) {
            ReferenceRange::LessEqual(parse_bound(val)?)
        } else if let Some(val) = s.strip_prefix('>') {
            ReferenceRange::GreaterThan(parse_bound(val)?)
        } else if let Some(val) = s.strip_prefix('<') {
            ReferenceRange::LessThan(parse_bound(val)?)
        } else if let Some((low, high)) = split_range(s) {
            let low = parse_bound(low)?;
            let high = parse_bound(high)?;
            if low > high {
                bail!("Lower bound {} exceeds upper bound {}", low, high)
            }
            ReferenceRange::Between(low, high)
        } else {
            bail!("Unrecognized reference expression: {}", s)
        };

        Ok(Some(range))
    }

    /// Whether `value` lies inside the normal range.
    /// Qualitative references never contain a numeric value.
    pub fn contains(&self, value: f64) -> bool {
        match self {
            ReferenceRange::LessThan(n) => value < *n,
            ReferenceRange::LessEqual(n) => value <= *n,
            ReferenceRange::GreaterThan(n) => value > *n,
            ReferenceRange::GreaterEqual(n) => value >= *n,
            ReferenceRange::Between(low, high) => value >= *low && value <= *high,
            ReferenceRange::ExpectedNegative => false,
        }
    }

    pub fn is_expected_negative(&self) -> bool {
        matches!(self, ReferenceRange::ExpectedNegative)
    }
}

fn strip_any<'a>(s: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes.iter().find_map(|p| s.strip_prefix(p))
}

// "100-500" or "100~500"; a leading '-' is a sign, not a separator
fn split_range(s: &str) -> Option<(&str, &str)> {
    let sep = s
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '-' || *c == '~')
        .map(|(i, _)| i)?;
    Some((&s[..sep], &s[sep + 1..]))
}

fn parse_bound(s: &str) -> Result<f64> {
    let value: f64 = s.trim().parse()?;
    if !value.is_finite() {
        bail!("Bound must be finite: {}", s.trim())
    }
    Ok(value)
}
