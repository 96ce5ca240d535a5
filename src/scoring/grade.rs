use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity tier of an out-of-range measurement.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Grade {
    #[default]
    None,
    A,
    B,
    C,
}

impl Grade {
    /// Points subtracted from the score for this grade.
    pub fn deduction(self) -> u32 {
        match self {
            Grade::None => 0,
            Grade::A => 5,
            Grade::B => 10,
            Grade::C => 15,
        }
    }

    /// Parse a band label from the standards file ("A", "B" or "C").
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "A" | "a" => Some(Grade::A),
            "B" | "b" => Some(Grade::B),
            "C" | "c" => Some(Grade::C),
            _ => None,
        }
    }

    pub fn is_none(self) -> bool {
        self == Grade::None
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::None => "none",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deductions() {
        assert_eq!(Grade::None.deduction(), 0);
        assert_eq!(Grade::A.deduction(), 5);
        assert_eq!(Grade::B.deduction(), 10);
        assert_eq!(Grade::C.deduction(), 15);
    }

    #[test]
    fn test_severity_order() {
        assert!(Grade::None < Grade::A);
        assert!(Grade::A < Grade::B);
        assert!(Grade::B < Grade::C);
    }

    #[test]
    fn test_from_label() {
        assert_eq!(Grade::from_label("A"), Some(Grade::A));
        assert_eq!(Grade::from_label(" c "), Some(Grade::C));
        assert_eq!(Grade::from_label("D"), None);
        assert_eq!(Grade::from_label("none"), None);
    }
}
